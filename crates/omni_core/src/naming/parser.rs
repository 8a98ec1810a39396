//! Camera file name parsing.
//!
//! The camera names every file `G<encoding?><chapter:2><number:4>.<ext>`,
//! e.g. `GH010042.360` is chapter 01 of recording 0042 with encoding `H`.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{ChapterIndex, ClipFile, EncodingTag, MediaKind, RecordingNumber};

/// Groups: [1] encoding, [2] chapter, [3] recording number.
static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^G([HXSP]?)(\d{2})(\d{4})$").expect("valid name pattern"));

/// Fields extracted from a file stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub encoding: EncodingTag,
    pub chapter: ChapterIndex,
    pub number: RecordingNumber,
}

/// Parse a file stem against the naming grammar.
///
/// Returns `None` when the stem does not follow the camera's convention.
/// That is not an error; such files are simply left out of grouping.
pub fn parse_stem(stem: &str) -> Option<ParsedName> {
    let caps = NAME_PATTERN.captures(stem)?;

    Some(ParsedName {
        encoding: EncodingTag::from_letter(caps.get(1)?.as_str())?,
        chapter: ChapterIndex::parse(caps.get(2)?.as_str())?,
        number: RecordingNumber::parse(caps.get(3)?.as_str())?,
    })
}

/// Recognize a file from its path.
///
/// Only files with a known media extension are considered at all.
pub fn parse_path(path: &Path) -> Option<ClipFile> {
    let kind = MediaKind::from_extension(path.extension()?.to_str()?)?;
    let parsed = parse_stem(path.file_stem()?.to_str()?)?;

    Some(ClipFile::new(
        path,
        parsed.encoding,
        parsed.chapter,
        parsed.number,
        kind,
    ))
}
