//! CPU reference evaluator for the planar part of the stitching graph.
//!
//! Evaluates crops, seam blends, scales and stacks on single planes so each
//! region of the graph can be checked against the geometry it is built from.
//! Reprojection is left to ffmpeg and is not evaluated here.

use std::collections::HashMap;

use super::blend::SeamBlend;
use super::errors::{StitchError, StitchResult};
use super::geometry::Rect;
use super::graph::{FilterGraph, FilterNode, FilterOp};

/// A single image plane of floating point samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl Plane {
    /// Create a plane filled with `value`.
    pub fn filled(width: u32, height: u32, value: f32) -> Self {
        Self {
            width,
            height,
            data: vec![value; (width * height) as usize],
        }
    }

    /// Create a plane from a function of the sample coordinates.
    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> f32) -> Self {
        let mut data = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Sample at `(x, y)`.
    ///
    /// # Panics
    /// Panics if the coordinates are outside the plane.
    pub fn get(&self, x: u32, y: u32) -> f32 {
        assert!(x < self.width && y < self.height, "sample out of range");
        self.data[(y * self.width + x) as usize]
    }

    /// Sample with coordinates clamped to the plane edge, as ffmpeg does
    /// for out-of-range `p(X,Y)` lookups.
    fn get_clamped(&self, x: i64, y: i64) -> f32 {
        let x = x.clamp(0, self.width as i64 - 1) as u32;
        let y = y.clamp(0, self.height as i64 - 1) as u32;
        self.data[(y * self.width + x) as usize]
    }

    pub fn crop(&self, rect: Rect) -> StitchResult<Self> {
        if rect.right() > self.width || rect.y + rect.height > self.height {
            return Err(StitchError::RegionOutOfBounds {
                width: rect.width,
                height: rect.height,
                x: rect.x,
                y: rect.y,
                frame_width: self.width,
                frame_height: self.height,
            });
        }
        Ok(Self::from_fn(rect.width, rect.height, |x, y| {
            self.get(rect.x + x, rect.y + y)
        }))
    }

    pub fn seam_blend(&self, blend: &SeamBlend) -> Self {
        Self::from_fn(self.width, self.height, |x, y| {
            let shifted = self.get_clamped(x as i64 + blend.width as i64, y as i64);
            blend.blend_sample(x, self.get(x, y), shifted)
        })
    }

    /// Resample with a bicubic kernel (ffmpeg's default scaler).
    pub fn scale(&self, width: u32, height: u32) -> Self {
        let horizontal = if width == self.width {
            self.clone()
        } else {
            let x_ratio = self.width as f64 / width as f64;
            Self::from_fn(width, self.height, |x, y| {
                let src = (x as f64 + 0.5) * x_ratio - 0.5;
                cubic_sample(src, |i| self.get_clamped(i, y as i64))
            })
        };

        if height == horizontal.height {
            return horizontal;
        }
        let y_ratio = horizontal.height as f64 / height as f64;
        Self::from_fn(width, height, |x, y| {
            let src = (y as f64 + 0.5) * y_ratio - 0.5;
            cubic_sample(src, |i| horizontal.get_clamped(x as i64, i))
        })
    }

    pub fn hstack(planes: &[&Plane]) -> StitchResult<Self> {
        let first = planes.first().ok_or(StitchError::InputCount {
            node: "hstack".to_string(),
            expected: 2,
            actual: 0,
        })?;
        for p in &planes[1..] {
            if p.height != first.height {
                return Err(StitchError::SizeMismatch {
                    op: "hstack",
                    left: first.size(),
                    right: p.size(),
                });
            }
        }
        let width = planes.iter().map(|p| p.width).sum();
        let mut data = Vec::with_capacity((width * first.height) as usize);
        for y in 0..first.height {
            for p in planes {
                let row = (y * p.width) as usize;
                data.extend_from_slice(&p.data[row..row + p.width as usize]);
            }
        }
        Ok(Self {
            width,
            height: first.height,
            data,
        })
    }

    pub fn vstack(planes: &[&Plane]) -> StitchResult<Self> {
        let first = planes.first().ok_or(StitchError::InputCount {
            node: "vstack".to_string(),
            expected: 2,
            actual: 0,
        })?;
        for p in &planes[1..] {
            if p.width != first.width {
                return Err(StitchError::SizeMismatch {
                    op: "vstack",
                    left: first.size(),
                    right: p.size(),
                });
            }
        }
        let height = planes.iter().map(|p| p.height).sum();
        let mut data = Vec::with_capacity((first.width * height) as usize);
        for p in planes {
            data.extend_from_slice(&p.data);
        }
        Ok(Self {
            width: first.width,
            height,
            data,
        })
    }
}

/// Catmull-Rom interpolation at fractional position `pos`.
fn cubic_sample(pos: f64, sample: impl Fn(i64) -> f32) -> f32 {
    let base = pos.floor();
    let t = pos - base;
    let i = base as i64;

    let p0 = sample(i - 1) as f64;
    let p1 = sample(i) as f64;
    let p2 = sample(i + 1) as f64;
    let p3 = sample(i + 2) as f64;

    let value = p1
        + 0.5
            * t
            * (p2 - p0 + t * (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3 + t * (3.0 * (p1 - p2) + p3 - p0)));
    value as f32
}

/// Evaluate the graph until `target` is produced.
///
/// `inputs` maps stream specifiers (`"0:0"`) to planes. Format conversions
/// are no-ops on a single plane.
pub fn evaluate(
    graph: &FilterGraph,
    inputs: &HashMap<String, Plane>,
    target: &str,
) -> StitchResult<Plane> {
    let mut pads: HashMap<String, Plane> = HashMap::new();

    for node in &graph.nodes {
        let plane = evaluate_node(node, inputs, &pads)?;
        if node.output == target {
            return Ok(plane);
        }
        pads.insert(node.output.clone(), plane);
    }

    Err(StitchError::unknown_pad(target))
}

fn evaluate_node(
    node: &FilterNode,
    inputs: &HashMap<String, Plane>,
    pads: &HashMap<String, Plane>,
) -> StitchResult<Plane> {
    let sources = node
        .inputs
        .iter()
        .map(|pad| {
            pads.get(pad.name())
                .or_else(|| inputs.get(pad.name()))
                .ok_or_else(|| StitchError::unknown_pad(pad.name()))
        })
        .collect::<StitchResult<Vec<&Plane>>>()?;

    let mut ops = node.ops.iter();
    let first = ops
        .next()
        .ok_or_else(|| StitchError::Unsupported(format!("empty node '{}'", node.output)))?;

    let expected = first.input_count();
    if sources.len() != expected {
        return Err(StitchError::InputCount {
            node: node.output.clone(),
            expected,
            actual: sources.len(),
        });
    }

    let mut current = match first {
        FilterOp::HStack { .. } => Plane::hstack(&sources)?,
        FilterOp::VStack { .. } => Plane::vstack(&sources)?,
        op => apply(sources[0], op)?,
    };
    for op in ops {
        current = apply(&current, op)?;
    }
    Ok(current)
}

fn apply(plane: &Plane, op: &FilterOp) -> StitchResult<Plane> {
    match op {
        FilterOp::Crop(rect) => plane.crop(*rect),
        FilterOp::Format(_) => Ok(plane.clone()),
        FilterOp::SeamBlend(blend) => Ok(plane.seam_blend(blend)),
        FilterOp::Scale { width, height } => Ok(plane.scale(*width, *height)),
        FilterOp::HStack { .. } | FilterOp::VStack { .. } | FilterOp::Reproject { .. } => {
            Err(StitchError::Unsupported(op.name().to_string()))
        }
    }
}
