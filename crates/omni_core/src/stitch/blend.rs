//! Seam de-ghosting blend.
//!
//! Each lens boundary is covered by a strip twice as wide as the blend.
//! Across the first `width` columns the strip fades from its own samples
//! into the samples `width` columns to the right:
//!
//! ```text
//! out(x, y) = p(x + w, y) * (x + 1) / (w + 1) + p(x, y) * (w + 1 - (x + 1)) / (w + 1)
//! ```
//!
//! for `0 <= x <= w`, and `out(x, y) = p(x, y)` beyond. The same weights are
//! used for luma, both chroma planes and alpha.

use serde::{Deserialize, Serialize};

use super::graph::Interpolation;

/// Parameters of one seam blend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeamBlend {
    /// Number of blended columns (also the shift between the two samples).
    pub width: u32,
    /// How ffmpeg samples the shifted pixel.
    pub interpolation: Interpolation,
}

impl SeamBlend {
    pub fn new(width: u32, interpolation: Interpolation) -> Self {
        Self {
            width,
            interpolation,
        }
    }

    /// Denominator of the ramp.
    pub fn divisor(&self) -> u32 {
        self.width + 1
    }

    /// Whether column `x` lies on the ramp.
    pub fn blends(&self, x: u32) -> bool {
        x <= self.width
    }

    /// Weight of the shifted sample at column `x`.
    ///
    /// Rises from `1/(w+1)` at `x = 0` to exactly `1` at `x = w`; zero off
    /// the ramp.
    pub fn shifted_weight(&self, x: u32) -> f32 {
        if self.blends(x) {
            (x + 1) as f32 / self.divisor() as f32
        } else {
            0.0
        }
    }

    /// Blend one sample given the unshifted `p(x, y)` and shifted
    /// `p(x + w, y)` values.
    pub fn blend_sample(&self, x: u32, unshifted: f32, shifted: f32) -> f32 {
        if !self.blends(x) {
            return unshifted;
        }
        let div = self.divisor() as f32;
        let k = (x + 1) as f32;
        shifted * (k / div) + unshifted * ((div - k) / div)
    }

    /// ffmpeg `geq` expression for one plane.
    pub fn expression(&self) -> String {
        let w = self.width;
        let div = self.divisor();
        format!(
            "if(between(X, 0, {w}), (p((X+{w}),Y)*(((X+1))/{div}))+(p(X,Y)*(({div}-((X+1)))/{div})), p(X,Y))"
        )
    }

    /// Complete `geq` filter applying the blend to all four planes.
    pub fn render(&self) -> String {
        let expr = self.expression();
        format!(
            "geq=lum='{e}':cb='{e}':cr='{e}':a='{e}':interpolation={i}",
            e = expr,
            i = self.interpolation.geq_code()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blend() -> SeamBlend {
        SeamBlend::new(64, Interpolation::Bilinear)
    }

    #[test]
    fn divisor_is_width_plus_one() {
        assert_eq!(blend().divisor(), 65);
    }

    #[test]
    fn start_of_ramp_is_dominated_by_unshifted_sample() {
        let b = blend();
        let out = b.blend_sample(0, 100.0, 165.0);
        // 165/65 + 100*64/65
        assert!((out - 101.0).abs() < 1e-4);
        assert!((b.shifted_weight(0) - 1.0 / 65.0).abs() < 1e-6);
    }

    #[test]
    fn end_of_ramp_equals_shifted_sample() {
        let b = blend();
        assert_eq!(b.shifted_weight(64), 1.0);
        assert!((b.blend_sample(64, 10.0, 200.0) - 200.0).abs() < 1e-4);
    }

    #[test]
    fn identity_beyond_ramp() {
        let b = blend();
        assert_eq!(b.blend_sample(65, 10.0, 200.0), 10.0);
        assert_eq!(b.blend_sample(127, 42.0, 0.0), 42.0);
        assert_eq!(b.shifted_weight(65), 0.0);
    }

    #[test]
    fn ramp_is_monotonic() {
        let b = blend();
        let mut last = -1.0;
        for x in 0..=64 {
            let w = b.shifted_weight(x);
            assert!(w > last);
            last = w;
        }
    }

    #[test]
    fn renders_geq_for_all_planes() {
        let filter = SeamBlend::new(64, Interpolation::Nearest).render();
        assert!(filter.starts_with("geq=lum='if(between(X, 0, 64), (p((X+64),Y)*(((X+1))/65))"));
        assert!(filter.contains(":cb='"));
        assert!(filter.contains(":cr='"));
        assert!(filter.contains(":a='"));
        assert!(filter.ends_with(":interpolation=n"));
        assert_eq!(filter.matches("/65").count(), 4 * 2);
    }
}
