//! Error types for stitching graph construction and evaluation.

use thiserror::Error;

/// Errors from the stitching module.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StitchError {
    /// Geometry constants do not tile into faces.
    #[error("Invalid sensor geometry: {0}")]
    InvalidGeometry(String),

    /// A crop reaches outside its input.
    #[error("Crop {width}x{height}+{x}+{y} exceeds {frame_width}x{frame_height} input")]
    RegionOutOfBounds {
        width: u32,
        height: u32,
        x: u32,
        y: u32,
        frame_width: u32,
        frame_height: u32,
    },

    /// Stacked inputs disagree in size.
    #[error("Cannot {op}: input sizes {left:?} and {right:?} differ")]
    SizeMismatch {
        op: &'static str,
        left: (u32, u32),
        right: (u32, u32),
    },

    /// A node refers to a pad that was never produced.
    #[error("Unknown pad '{0}'")]
    UnknownPad(String),

    /// The operation has no reference implementation.
    #[error("Operation '{0}' is not supported by the reference evaluator")]
    Unsupported(String),

    /// Node has the wrong number of inputs for its operation.
    #[error("Node '{node}' expects {expected} input(s), got {actual}")]
    InputCount {
        node: String,
        expected: usize,
        actual: usize,
    },
}

impl StitchError {
    pub fn invalid_geometry(message: impl Into<String>) -> Self {
        Self::InvalidGeometry(message.into())
    }

    pub fn unknown_pad(name: impl Into<String>) -> Self {
        Self::UnknownPad(name.into())
    }
}

/// Result type for stitching operations.
pub type StitchResult<T> = Result<T, StitchError>;
