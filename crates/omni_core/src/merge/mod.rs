//! Reassembly of chaptered recordings.
//!
//! # Architecture
//!
//! - **plan**: turns mergeable groups into `MergePlan`s (inputs in chapter
//!   order plus the derived output name)
//! - the concatenation itself runs through [`crate::tools::MediaTools`]

mod plan;

pub use plan::{merged_file_name, plan_merges, MergePlan};
