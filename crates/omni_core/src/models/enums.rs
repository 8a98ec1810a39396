//! Core enums used throughout the application.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Container categories the camera writes.
///
/// Ordering is the order media kinds are processed in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Dual-fisheye `.360` capture.
    Spherical,
    /// Flat `.mp4` video.
    Mp4,
    /// Low-resolution `.LRV` proxy.
    LowRes,
}

impl MediaKind {
    /// Every recognized kind, in processing order.
    pub fn all() -> &'static [MediaKind] {
        &[Self::Spherical, Self::Mp4, Self::LowRes]
    }

    /// Canonical extension, including the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Spherical => ".360",
            Self::Mp4 => ".mp4",
            Self::LowRes => ".LRV",
        }
    }

    /// Look up a kind from a file extension (with or without the dot).
    ///
    /// Matching ignores ASCII case so `GH010042.MP4` is still recognized.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.strip_prefix('.').unwrap_or(ext);
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.extension()[1..].eq_ignore_ascii_case(ext))
    }

    /// Whether files of this kind go through the stitching pipeline.
    pub fn is_convertible(&self) -> bool {
        matches!(self, Self::Spherical)
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Encoding letter that follows the leading `G` in a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EncodingTag {
    H,
    X,
    S,
    P,
    /// No letter present (`G010042`).
    #[default]
    Unmarked,
}

impl EncodingTag {
    /// Parse the captured letter; the empty string maps to `Unmarked`.
    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "H" => Some(Self::H),
            "X" => Some(Self::X),
            "S" => Some(Self::S),
            "P" => Some(Self::P),
            "" => Some(Self::Unmarked),
            _ => None,
        }
    }

    /// Letter as written in file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::H => "H",
            Self::X => "X",
            Self::S => "S",
            Self::P => "P",
            Self::Unmarked => "",
        }
    }
}

impl std::fmt::Display for EncodingTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Codec quality tier used for every stitching invocation in a run.
///
/// Each tier maps to a DNxHR profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QualityProfile {
    #[default]
    #[serde(rename = "lb")]
    LowBandwidth,
    #[serde(rename = "sq")]
    Standard,
    #[serde(rename = "hq")]
    High,
    #[serde(rename = "hqx")]
    Broadcast,
    #[serde(rename = "444")]
    Finishing,
}

impl QualityProfile {
    /// Get all available profiles, in menu order.
    pub fn all() -> &'static [QualityProfile] {
        &[
            Self::LowBandwidth,
            Self::Standard,
            Self::High,
            Self::Broadcast,
            Self::Finishing,
        ]
    }

    /// Short code accepted on the command line and at the prompt.
    pub fn code(&self) -> &'static str {
        match self {
            Self::LowBandwidth => "lb",
            Self::Standard => "sq",
            Self::High => "hq",
            Self::Broadcast => "hqx",
            Self::Finishing => "444",
        }
    }

    /// Get the display name for this profile.
    pub fn name(&self) -> &'static str {
        match self {
            Self::LowBandwidth => "Low bandwidth",
            Self::Standard => "Standard quality",
            Self::High => "High quality",
            Self::Broadcast => "Broadcast quality",
            Self::Finishing => "Finishing quality",
        }
    }

    /// Value passed to ffmpeg's `-profile:v`.
    pub fn dnxhr_profile(&self) -> String {
        format!("dnxhr_{}", self.code())
    }
}

impl std::fmt::Display for QualityProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

impl FromStr for QualityProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|q| q.code() == s)
            .ok_or_else(|| format!("Invalid quality setting: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_kind_from_extension() {
        assert_eq!(MediaKind::from_extension(".360"), Some(MediaKind::Spherical));
        assert_eq!(MediaKind::from_extension("mp4"), Some(MediaKind::Mp4));
        assert_eq!(MediaKind::from_extension("MP4"), Some(MediaKind::Mp4));
        assert_eq!(MediaKind::from_extension("lrv"), Some(MediaKind::LowRes));
        assert_eq!(MediaKind::from_extension("mov"), None);
    }

    #[test]
    fn only_spherical_is_convertible() {
        assert!(MediaKind::Spherical.is_convertible());
        assert!(!MediaKind::Mp4.is_convertible());
        assert!(!MediaKind::LowRes.is_convertible());
    }

    #[test]
    fn encoding_tag_round_trips_letters() {
        assert_eq!(EncodingTag::from_letter("H"), Some(EncodingTag::H));
        assert_eq!(EncodingTag::from_letter(""), Some(EncodingTag::Unmarked));
        assert_eq!(EncodingTag::from_letter("Q"), None);
        assert_eq!(EncodingTag::Unmarked.as_str(), "");
    }

    #[test]
    fn quality_defaults_to_low_bandwidth() {
        assert_eq!(QualityProfile::default(), QualityProfile::LowBandwidth);
        assert_eq!(QualityProfile::default().dnxhr_profile(), "dnxhr_lb");
    }

    #[test]
    fn quality_parses_codes() {
        assert_eq!("hqx".parse::<QualityProfile>(), Ok(QualityProfile::Broadcast));
        assert_eq!("444".parse::<QualityProfile>(), Ok(QualityProfile::Finishing));
        assert!("ultra".parse::<QualityProfile>().is_err());
    }

    #[test]
    fn quality_serializes_as_code() {
        let json = serde_json::to_string(&QualityProfile::High).unwrap();
        assert_eq!(json, "\"hq\"");
    }
}
