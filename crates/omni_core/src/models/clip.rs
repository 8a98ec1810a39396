//! Clip file records recognized from the camera's naming scheme.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::enums::{EncodingTag, MediaKind};

/// Chapter index of a split recording.
///
/// Ordered by numeric value, so ordering stays correct if the field ever
/// grows past two digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChapterIndex(u16);

impl ChapterIndex {
    pub fn new(value: u16) -> Self {
        Self(value)
    }

    /// Parse the digit field from a file name.
    pub fn parse(digits: &str) -> Option<Self> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().map(Self)
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for ChapterIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// Identifier shared by every chapter of one recording.
///
/// Kept in its zero-padded form since it is copied verbatim into merged
/// file names.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordingNumber(String);

impl RecordingNumber {
    /// Parse a four-digit field.
    pub fn parse(digits: &str) -> Option<Self> {
        if digits.len() == 4 && digits.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(digits.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordingNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A recognized camera file.
///
/// Records are immutable. Converting a clip yields a new record through
/// [`ClipFile::with_converted_path`]; `source_path` always points at the
/// file originally found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipFile {
    /// Current location of the clip's media.
    pub path: PathBuf,
    /// File the clip was discovered as.
    pub source_path: PathBuf,
    pub encoding: EncodingTag,
    pub chapter: ChapterIndex,
    pub number: RecordingNumber,
    pub kind: MediaKind,
}

impl ClipFile {
    pub fn new(
        path: impl Into<PathBuf>,
        encoding: EncodingTag,
        chapter: ChapterIndex,
        number: RecordingNumber,
        kind: MediaKind,
    ) -> Self {
        let path = path.into();
        Self {
            source_path: path.clone(),
            path,
            encoding,
            chapter,
            number,
            kind,
        }
    }

    /// Record for the same clip after it was replaced by a converted artifact.
    pub fn with_converted_path(&self, converted: impl Into<PathBuf>) -> Self {
        Self {
            path: converted.into(),
            ..self.clone()
        }
    }

    /// Whether this record points at a converted artifact.
    pub fn is_converted(&self) -> bool {
        self.path != self.source_path
    }

    /// Stem of the originally discovered file (`GH010042`).
    pub fn source_stem(&self) -> String {
        stem_of(&self.source_path)
    }

    /// File name of the current path, for log output.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(path: &str, chapter: u16) -> ClipFile {
        ClipFile::new(
            path,
            EncodingTag::H,
            ChapterIndex::new(chapter),
            RecordingNumber::parse("0042").unwrap(),
            MediaKind::Spherical,
        )
    }

    #[test]
    fn chapter_orders_numerically() {
        assert!(ChapterIndex::parse("02").unwrap() < ChapterIndex::parse("10").unwrap());
        assert!(ChapterIndex::parse("9").unwrap() < ChapterIndex::parse("100").unwrap());
        assert_eq!(ChapterIndex::parse("07").unwrap().to_string(), "07");
        assert!(ChapterIndex::parse("0x").is_none());
    }

    #[test]
    fn recording_number_requires_four_digits() {
        assert!(RecordingNumber::parse("0042").is_some());
        assert!(RecordingNumber::parse("042").is_none());
        assert!(RecordingNumber::parse("00a2").is_none());
    }

    #[test]
    fn converted_record_keeps_identity() {
        let original = clip("/in/GH010042.360", 1);
        let converted = original.with_converted_path("/out/GH010042.mov");

        assert!(!original.is_converted());
        assert!(converted.is_converted());
        assert_eq!(converted.source_path, original.path);
        assert_eq!(converted.chapter, original.chapter);
        assert_eq!(converted.source_stem(), "GH010042");
        assert_eq!(converted.display_name(), "GH010042.mov");
    }
}
