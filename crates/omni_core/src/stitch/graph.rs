//! Declarative description of the stitching filter graph.
//!
//! The graph is plain data: a list of nodes, each reading one or more pads,
//! applying a chain of operations and producing a labelled pad. It renders
//! to an ffmpeg `-filter_complex` string and can be evaluated region by
//! region with [`super::reference`].

use serde::{Deserialize, Serialize};

use super::blend::SeamBlend;
use super::geometry::{HemisphereRegions, Rect, SensorGeometry, StreamLayout};

/// Sampling mode used by a resampling operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    Nearest,
    Bilinear,
    Bicubic,
}

impl Interpolation {
    /// Value for `geq`'s `interpolation` option.
    pub fn geq_code(&self) -> &'static str {
        match self {
            // geq only knows nearest and bilinear.
            Interpolation::Nearest => "n",
            Interpolation::Bilinear | Interpolation::Bicubic => "b",
        }
    }

    /// Value for `v360`'s `interp` option.
    pub fn v360_code(&self) -> &'static str {
        match self {
            Interpolation::Nearest => "near",
            Interpolation::Bilinear => "line",
            Interpolation::Bicubic => "cubic",
        }
    }
}

/// Pixel format forced between operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelFormat {
    Yuvj420p,
}

impl PixelFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            PixelFormat::Yuvj420p => "yuvj420p",
        }
    }
}

/// Sphere layouts understood by the reprojection step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Projection {
    /// Equi-angular cubemap.
    Eac,
    Equirectangular,
}

impl Projection {
    pub fn v360_code(&self) -> &'static str {
        match self {
            Projection::Eac => "eac",
            Projection::Equirectangular => "e",
        }
    }
}

/// One operation in a node's chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOp {
    Crop(Rect),
    Format(PixelFormat),
    SeamBlend(SeamBlend),
    Scale { width: u32, height: u32 },
    /// Join inputs left to right.
    HStack { inputs: usize },
    /// Join inputs top to bottom.
    VStack { inputs: usize },
    Reproject {
        from: Projection,
        to: Projection,
        interpolation: Interpolation,
    },
}

impl FilterOp {
    /// Number of pads this operation consumes when it starts a chain.
    pub fn input_count(&self) -> usize {
        match self {
            FilterOp::HStack { inputs } | FilterOp::VStack { inputs } => *inputs,
            _ => 1,
        }
    }

    /// Short name for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            FilterOp::Crop(_) => "crop",
            FilterOp::Format(_) => "format",
            FilterOp::SeamBlend(_) => "geq",
            FilterOp::Scale { .. } => "scale",
            FilterOp::HStack { .. } => "hstack",
            FilterOp::VStack { .. } => "vstack",
            FilterOp::Reproject { .. } => "v360",
        }
    }

    /// Render as an ffmpeg filter.
    pub fn render(&self) -> String {
        match self {
            FilterOp::Crop(r) => format!("crop={}:{}:x={}:y={}", r.width, r.height, r.x, r.y),
            FilterOp::Format(fmt) => format!("format={}", fmt.as_str()),
            FilterOp::SeamBlend(blend) => blend.render(),
            FilterOp::Scale { width, height } => format!("scale={}:{}", width, height),
            FilterOp::HStack { inputs } => format!("hstack=inputs={}", inputs),
            FilterOp::VStack { inputs } => format!("vstack=inputs={}", inputs),
            FilterOp::Reproject {
                from,
                to,
                interpolation,
            } => format!(
                "v360={}:{}:interp={}",
                from.v360_code(),
                to.v360_code(),
                interpolation.v360_code()
            ),
        }
    }
}

/// Input of a node: a container stream or a labelled intermediate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pad {
    Stream(String),
    Label(String),
}

impl Pad {
    pub fn stream(spec: impl Into<String>) -> Self {
        Pad::Stream(spec.into())
    }

    pub fn label(name: impl Into<String>) -> Self {
        Pad::Label(name.into())
    }

    /// Name the pad is referenced by.
    pub fn name(&self) -> &str {
        match self {
            Pad::Stream(s) | Pad::Label(s) => s,
        }
    }

    pub fn render(&self) -> String {
        format!("[{}]", self.name())
    }
}

/// A chain of operations producing one labelled pad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterNode {
    pub inputs: Vec<Pad>,
    pub ops: Vec<FilterOp>,
    pub output: String,
}

impl FilterNode {
    pub fn new(inputs: Vec<Pad>, ops: Vec<FilterOp>, output: impl Into<String>) -> Self {
        Self {
            inputs,
            ops,
            output: output.into(),
        }
    }

    pub fn render(&self) -> String {
        let inputs: String = self.inputs.iter().map(Pad::render).collect();
        let chain: Vec<String> = self.ops.iter().map(FilterOp::render).collect();
        format!("{}{}[{}]", inputs, chain.join(","), self.output)
    }
}

/// Complete stitching graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterGraph {
    pub nodes: Vec<FilterNode>,
    /// Label of the final video pad.
    pub output: String,
}

impl FilterGraph {
    /// Render for ffmpeg's `-filter_complex`.
    pub fn render(&self) -> String {
        self.nodes
            .iter()
            .map(FilterNode::render)
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Find the node producing `label`.
    pub fn node(&self, label: &str) -> Option<&FilterNode> {
        self.nodes.iter().find(|n| n.output == label)
    }
}

/// Label of the stacked bottom half.
pub const BOTTOM_HALF: &str = "bottom";
/// Label of the stacked top half.
pub const TOP_HALF: &str = "top";
/// Label of the EAC composite before reprojection.
pub const COMPOSITE: &str = "complete";
/// Label of the final reprojected video.
pub const OUTPUT: &str = "v";

/// Build the stitching graph for a sensor geometry.
///
/// The main stream forms the bottom half with bilinear seam sampling, the
/// auxiliary stream forms the top half with nearest-neighbour sampling.
pub fn build_stitch_graph(geometry: &SensorGeometry, streams: &StreamLayout) -> FilterGraph {
    let mut nodes = Vec::new();

    half_nodes(
        &mut nodes,
        geometry,
        &streams.main,
        BOTTOM_HALF,
        Interpolation::Bilinear,
    );
    half_nodes(
        &mut nodes,
        geometry,
        &streams.auxiliary,
        TOP_HALF,
        Interpolation::Nearest,
    );

    nodes.push(FilterNode::new(
        vec![Pad::label(BOTTOM_HALF), Pad::label(TOP_HALF)],
        vec![FilterOp::VStack { inputs: 2 }],
        COMPOSITE,
    ));
    nodes.push(FilterNode::new(
        vec![Pad::label(COMPOSITE)],
        vec![FilterOp::Reproject {
            from: Projection::Eac,
            to: Projection::Equirectangular,
            interpolation: Interpolation::Bicubic,
        }],
        OUTPUT,
    ));

    FilterGraph {
        nodes,
        output: OUTPUT.to_string(),
    }
}

/// Nodes building one three-face half from a single stream.
fn half_nodes(
    nodes: &mut Vec<FilterNode>,
    geometry: &SensorGeometry,
    stream: &str,
    prefix: &str,
    seam_interpolation: Interpolation,
) {
    let left = format!("{}_left_done", prefix);
    let middle = format!("{}_middle", prefix);
    let right = format!("{}_right_done", prefix);

    hemisphere_nodes(
        nodes,
        geometry,
        geometry.left_hemisphere(),
        stream,
        &format!("{}_left", prefix),
        &left,
        seam_interpolation,
    );

    nodes.push(FilterNode::new(
        vec![Pad::stream(stream)],
        vec![FilterOp::Crop(geometry.middle_face())],
        middle.clone(),
    ));

    hemisphere_nodes(
        nodes,
        geometry,
        geometry.right_hemisphere(),
        stream,
        &format!("{}_right", prefix),
        &right,
        seam_interpolation,
    );

    nodes.push(FilterNode::new(
        vec![Pad::label(left), Pad::label(middle), Pad::label(right)],
        vec![FilterOp::HStack { inputs: 3 }],
        prefix,
    ));
}

/// Nodes for `[flat][blended seam][flat]` of one hemisphere.
fn hemisphere_nodes(
    nodes: &mut Vec<FilterNode>,
    geometry: &SensorGeometry,
    regions: HemisphereRegions,
    stream: &str,
    prefix: &str,
    output: &str,
    seam_interpolation: Interpolation,
) {
    let fmt = FilterOp::Format(PixelFormat::Yuvj420p);
    let blend = SeamBlend::new(geometry.blend_width(), seam_interpolation);
    let seam_label = format!("{}_seam", prefix);
    let leading_label = format!("{}_leading", prefix);
    let trailing_label = format!("{}_trailing", prefix);

    nodes.push(FilterNode::new(
        vec![Pad::stream(stream)],
        vec![
            FilterOp::Crop(regions.seam),
            fmt.clone(),
            FilterOp::SeamBlend(blend),
            FilterOp::Crop(Rect::new(
                geometry.blend_width(),
                geometry.strip_height,
                0,
                0,
            )),
            fmt.clone(),
            FilterOp::Scale {
                width: geometry.seam_slot_width,
                height: geometry.strip_height,
            },
        ],
        seam_label.clone(),
    ));
    nodes.push(FilterNode::new(
        vec![Pad::stream(stream)],
        vec![FilterOp::Crop(regions.leading), fmt.clone()],
        leading_label.clone(),
    ));
    nodes.push(FilterNode::new(
        vec![Pad::stream(stream)],
        vec![FilterOp::Crop(regions.trailing), fmt],
        trailing_label.clone(),
    ));
    nodes.push(FilterNode::new(
        vec![
            Pad::label(leading_label),
            Pad::label(seam_label),
            Pad::label(trailing_label),
        ],
        vec![FilterOp::HStack { inputs: 3 }],
        output,
    ));
}
