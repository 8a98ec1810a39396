//! Dual-fisheye to equirectangular stitching.
//!
//! The camera stores two hemisphere strips plus a middle face per stream.
//! Stitching hides each lens seam with a short linear blend, assembles the
//! strips into an equi-angular cubemap (main stream below, auxiliary stream
//! above) and reprojects the result to equirectangular.
//!
//! # Architecture
//!
//! - **geometry**: fixed crop regions of the sensor frames
//! - **blend**: seam de-ghosting weights and the matching `geq` expression
//! - **graph**: declarative filter graph rendered for ffmpeg
//! - **reference**: CPU evaluation of the planar stages for verification
//! - **command**: ffmpeg argument list for one clip

mod blend;
mod command;
mod errors;
mod geometry;
mod graph;
pub mod reference;

pub use blend::SeamBlend;
pub use command::{converted_path, StitchCommand, Stitcher, CONVERTED_SUFFIX};
pub use errors::{StitchError, StitchResult};
pub use geometry::{HemisphereRegions, Rect, SensorGeometry, StreamLayout};
pub use graph::{
    build_stitch_graph, FilterGraph, FilterNode, FilterOp, Interpolation, Pad, PixelFormat,
    Projection, BOTTOM_HALF, COMPOSITE, OUTPUT, TOP_HALF,
};
