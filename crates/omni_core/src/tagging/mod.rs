//! Spherical video metadata.
//!
//! Converted clips are marked as stitched equirectangular video with the
//! Google spherical XMP namespace so players render them as 360° video.
//! Tags are written in place by exiftool.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default value written to `StitchingSoftware`.
pub const DEFAULT_STITCHING_SOFTWARE: &str = "omnistitch";

/// The spherical tag set applied to converted clips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SphericalTags {
    pub spherical: bool,
    pub stitched: bool,
    pub stitching_software: String,
    pub projection_type: String,
}

impl Default for SphericalTags {
    fn default() -> Self {
        Self::equirectangular(DEFAULT_STITCHING_SOFTWARE)
    }
}

impl SphericalTags {
    /// Tags for a stitched equirectangular clip.
    pub fn equirectangular(software: impl Into<String>) -> Self {
        Self {
            spherical: true,
            stitched: true,
            stitching_software: software.into(),
            projection_type: "equirectangular".to_string(),
        }
    }

    /// exiftool assignments, one per tag.
    pub fn assignments(&self) -> Vec<String> {
        vec![
            format!("-XMP-GSpherical:Spherical={}", self.spherical),
            format!("-XMP-GSpherical:Stitched={}", self.stitched),
            format!("-XMP-GSpherical:StitchingSoftware={}", self.stitching_software),
            format!("-XMP-GSpherical:ProjectionType={}", self.projection_type),
        ]
    }

    /// Full exiftool argument list tagging `file` in place.
    pub fn exiftool_args(&self, file: &Path) -> Vec<String> {
        let mut args = vec![
            "-api".to_string(),
            "LargeFileSupport=1".to_string(),
            "-overwrite_original".to_string(),
        ];
        args.extend(self.assignments());
        args.push(file.to_string_lossy().to_string());
        args
    }
}
