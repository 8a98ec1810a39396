//! Recognition of camera files by name.

mod parser;

pub use parser::{parse_path, parse_stem, ParsedName};
