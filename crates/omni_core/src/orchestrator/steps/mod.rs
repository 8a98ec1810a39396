//! Pipeline step implementations.

mod convert;
mod merge;

pub use convert::ConvertStep;
pub use merge::MergeStep;
