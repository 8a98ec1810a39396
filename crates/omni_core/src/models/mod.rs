//! Data models for omnistitch.
//!
//! This module contains the core data structures used throughout the crate:
//! - Enums for media kinds, encoding tags and quality profiles
//! - Clip records recognized from camera file names
//! - The per-run action selection

mod clip;
mod enums;
mod options;

// Re-export all public types
pub use clip::{ChapterIndex, ClipFile, RecordingNumber};
pub use enums::{EncodingTag, MediaKind, QualityProfile};
pub use options::{RunOptions, RunOptionsBuilder};
