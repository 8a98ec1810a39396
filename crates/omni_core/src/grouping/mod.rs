//! Grouping of chaptered recordings.
//!
//! Clips are bucketed by media kind and recording number, and each bucket is
//! put into chapter order. Grouping is driven by file names only, so it is
//! computed once per run and stays valid after clips are converted.

mod catalog;

pub use catalog::{ClipCatalog, ClipGroup};
