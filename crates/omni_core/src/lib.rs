//! omnistitch core - clip grouping, chapter reassembly and fisheye stitching.
//!
//! This crate contains all processing logic with no terminal I/O. The
//! `omnistitch` binary lists a directory, asks what to do and hands the
//! result to [`orchestrator`].

pub mod config;
pub mod grouping;
pub mod logging;
pub mod merge;
pub mod models;
pub mod naming;
pub mod orchestrator;
pub mod stitch;
pub mod tagging;
pub mod tools;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
