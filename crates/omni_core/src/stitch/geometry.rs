//! Fixed sensor geometry of the dual-fisheye capture.
//!
//! Each stream frame holds three cube-face columns side by side. The outer
//! two are built from a hemisphere strip laid out as
//!
//! ```text
//! | flat (624) | seam (128) | flat (624) |
//! ```
//!
//! where the seam is re-blended and squeezed into a 96 px slot so each outer
//! face ends up 1344 px wide. The middle face is a plain 1344×1344 crop.

use serde::{Deserialize, Serialize};

use super::errors::{StitchError, StitchResult};

/// A rectangular source region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

impl Rect {
    pub fn new(width: u32, height: u32, x: u32, y: u32) -> Self {
        Self {
            width,
            height,
            x,
            y,
        }
    }

    /// First column after the region.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }
}

/// Crop regions for one hemisphere strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HemisphereRegions {
    pub leading: Rect,
    pub seam: Rect,
    pub trailing: Rect,
}

/// Stream specifiers inside the camera container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamLayout {
    /// Main fisheye stream.
    pub main: String,
    /// Secondary stream supplying the other half of the sphere.
    pub auxiliary: String,
    /// Audio track carried through unchanged.
    pub audio: String,
}

impl Default for StreamLayout {
    fn default() -> Self {
        Self {
            main: "0:0".to_string(),
            auxiliary: "0:5".to_string(),
            audio: "0:a:0".to_string(),
        }
    }
}

/// Pixel geometry of the sensor frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorGeometry {
    /// Height of every strip and face.
    pub strip_height: u32,
    /// Width of the undistorted regions either side of a seam.
    pub flat_width: u32,
    /// Width of the source strip covering a seam.
    pub seam_width: u32,
    /// Width the blended seam is scaled to.
    pub seam_slot_width: u32,
    /// Width of a finished cube face.
    pub face_width: u32,
    /// Left edge of the first hemisphere strip.
    pub left_x: u32,
    /// Left edge of the middle face crop.
    pub middle_x: u32,
    /// Left edge of the second hemisphere strip.
    pub right_x: u32,
}

impl Default for SensorGeometry {
    fn default() -> Self {
        Self {
            strip_height: 1344,
            flat_width: 624,
            seam_width: 128,
            seam_slot_width: 96,
            face_width: 1344,
            left_x: 0,
            middle_x: 1376,
            right_x: 2720,
        }
    }
}

impl SensorGeometry {
    /// Columns blended at each seam (half the seam strip).
    pub fn blend_width(&self) -> u32 {
        self.seam_width / 2
    }

    /// Width of a full hemisphere strip in the source.
    pub fn hemisphere_width(&self) -> u32 {
        2 * self.flat_width + self.seam_width
    }

    /// Minimum source frame width the crops need.
    pub fn source_width(&self) -> u32 {
        (self.right_x + self.hemisphere_width()).max(self.middle_x + self.face_width)
    }

    /// Size of one stacked half (three faces wide).
    pub fn half_size(&self) -> (u32, u32) {
        (3 * self.face_width, self.strip_height)
    }

    /// Size of the EAC composite before reprojection.
    pub fn composite_size(&self) -> (u32, u32) {
        (3 * self.face_width, 2 * self.strip_height)
    }

    pub fn left_hemisphere(&self) -> HemisphereRegions {
        self.hemisphere_at(self.left_x)
    }

    pub fn right_hemisphere(&self) -> HemisphereRegions {
        self.hemisphere_at(self.right_x)
    }

    /// Unblended middle face.
    pub fn middle_face(&self) -> Rect {
        Rect::new(self.face_width, self.strip_height, self.middle_x, 0)
    }

    fn hemisphere_at(&self, x: u32) -> HemisphereRegions {
        let h = self.strip_height;
        let seam_x = x + self.flat_width;
        HemisphereRegions {
            leading: Rect::new(self.flat_width, h, x, 0),
            seam: Rect::new(self.seam_width, h, seam_x, 0),
            trailing: Rect::new(self.flat_width, h, seam_x + self.seam_width, 0),
        }
    }

    /// Check that regions tile into square faces without gaps.
    pub fn validate(&self) -> StitchResult<()> {
        if self.seam_width == 0 || self.seam_width % 2 != 0 {
            return Err(StitchError::invalid_geometry(format!(
                "seam width {} must be even and non-zero",
                self.seam_width
            )));
        }
        if 2 * self.flat_width + self.seam_slot_width != self.face_width {
            return Err(StitchError::invalid_geometry(format!(
                "2 x flat ({}) + seam slot ({}) must equal face width ({})",
                self.flat_width, self.seam_slot_width, self.face_width
            )));
        }
        if self.face_width != self.strip_height {
            return Err(StitchError::invalid_geometry(format!(
                "faces must be square, got {}x{}",
                self.face_width, self.strip_height
            )));
        }
        if self.left_x + self.hemisphere_width() > self.middle_x
            || self.middle_x + self.face_width > self.right_x
        {
            return Err(StitchError::invalid_geometry(
                "hemisphere strips overlap the middle face",
            ));
        }
        Ok(())
    }
}
