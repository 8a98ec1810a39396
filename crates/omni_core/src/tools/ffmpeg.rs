//! ffmpeg and exiftool backed [`MediaTools`].

use std::fs;
use std::path::Path;

use crate::config::Settings;
use crate::logging::RunLogger;
use crate::merge::MergePlan;
use crate::models::QualityProfile;
use crate::orchestrator::{StepError, StepResult};
use crate::stitch::Stitcher;
use crate::tagging::SphericalTags;

use super::runner::{run_tool, ToolCommand};
use super::MediaTools;

/// Media tools that shell out to ffmpeg and exiftool.
pub struct FfmpegTools {
    ffmpeg: String,
    exiftool: String,
    stitcher: Stitcher,
    log_json: bool,
}

impl FfmpegTools {
    pub fn new(ffmpeg: impl Into<String>, exiftool: impl Into<String>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            exiftool: exiftool.into(),
            stitcher: Stitcher::default(),
            log_json: false,
        }
    }

    /// Tools configured from the `tools` and `logging` settings sections.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.tools.ffmpeg, &settings.tools.exiftool)
            .with_command_json(settings.logging.show_command_json)
    }

    /// Use a different stitching graph.
    pub fn with_stitcher(mut self, stitcher: Stitcher) -> Self {
        self.stitcher = stitcher;
        self
    }

    /// Also log every command as a JSON argument array.
    pub fn with_command_json(mut self, enabled: bool) -> Self {
        self.log_json = enabled;
        self
    }

    pub fn stitch_command(&self, input: &Path, output: &Path, quality: QualityProfile) -> ToolCommand {
        ToolCommand::new("ffmpeg", &self.ffmpeg).args(self.stitcher.command(quality, input, output))
    }

    pub fn tag_command(&self, file: &Path, tags: &SphericalTags) -> ToolCommand {
        ToolCommand::new("exiftool", &self.exiftool).args(tags.exiftool_args(file))
    }

    pub fn concat_command(&self, plan: &MergePlan, list_path: &Path) -> ToolCommand {
        ToolCommand::new("ffmpeg", &self.ffmpeg)
            .args(["-y", "-f", "concat", "-safe", "0", "-i"])
            .path_arg(list_path)
            .args(["-c", "copy"])
            .path_arg(&plan.output)
    }
}

impl MediaTools for FfmpegTools {
    fn stitch(
        &self,
        input: &Path,
        output: &Path,
        quality: QualityProfile,
        logger: &RunLogger,
    ) -> StepResult<()> {
        ensure_parent(output)?;
        run_tool(&self.stitch_command(input, output, quality), logger, self.log_json)
    }

    fn tag(&self, file: &Path, tags: &SphericalTags, logger: &RunLogger) -> StepResult<()> {
        run_tool(&self.tag_command(file, tags), logger, self.log_json)
    }

    fn concat(&self, plan: &MergePlan, list_path: &Path, logger: &RunLogger) -> StepResult<()> {
        ensure_parent(&plan.output)?;
        run_tool(&self.concat_command(plan, list_path), logger, self.log_json)
    }
}

fn ensure_parent(path: &Path) -> StepResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| StepError::io_error("creating output directory", e))?;
    }
    Ok(())
}
