//! External media tools.
//!
//! Stitching, tagging and concatenation are delegated to ffmpeg and
//! exiftool. Steps only see the [`MediaTools`] trait, so runs can be driven
//! against a fake in tests.

mod ffmpeg;
mod runner;

use std::path::Path;

use crate::logging::RunLogger;
use crate::merge::MergePlan;
use crate::models::QualityProfile;
use crate::orchestrator::StepResult;
use crate::tagging::SphericalTags;

pub use ffmpeg::FfmpegTools;
pub use runner::{run_tool, ToolCommand};

/// Blocking media operations used by the pipeline steps.
pub trait MediaTools: Send + Sync {
    /// Stitch a dual-fisheye `.360` clip into an equirectangular `output`.
    fn stitch(
        &self,
        input: &Path,
        output: &Path,
        quality: QualityProfile,
        logger: &RunLogger,
    ) -> StepResult<()>;

    /// Write spherical metadata into `file` in place.
    fn tag(&self, file: &Path, tags: &SphericalTags, logger: &RunLogger) -> StepResult<()>;

    /// Join the plan's inputs into its output using the list at `list_path`.
    ///
    /// The list file already exists when this is called.
    fn concat(&self, plan: &MergePlan, list_path: &Path, logger: &RunLogger) -> StepResult<()>;
}
