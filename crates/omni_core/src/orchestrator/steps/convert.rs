//! Convert step - stitches every `.360` clip and tags the result.

use crate::models::{ClipFile, MediaKind, RecordingNumber};
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, ConvertedClip, RunState, StepOutcome};
use crate::stitch::converted_path;

/// Convert step for dual-fisheye clips.
///
/// Each clip is stitched to `<output_dir>/<stem>.mov`, tagged as spherical
/// video, and then replaces its original record in the catalog so later
/// merge steps pick up the converted file.
pub struct ConvertStep;

impl ConvertStep {
    pub fn new() -> Self {
        Self
    }

    /// Clips still pointing at their original capture, in processing order.
    fn pending(state: &RunState) -> Vec<(RecordingNumber, usize, ClipFile)> {
        state
            .catalog
            .groups(MediaKind::Spherical)
            .flat_map(|group| {
                group
                    .clips()
                    .iter()
                    .enumerate()
                    .filter(|(_, clip)| !clip.is_converted())
                    .map(|(index, clip)| (group.number.clone(), index, clip.clone()))
            })
            .collect()
    }
}

impl Default for ConvertStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for ConvertStep {
    fn name(&self) -> &str {
        "Convert"
    }

    fn description(&self) -> String {
        "Stitch .360 clips to equirectangular .mov".to_string()
    }

    fn validate_input(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        for (_, _, clip) in Self::pending(state) {
            if !clip.path.exists() {
                return Err(StepError::file_not_found(clip.path.display().to_string()));
            }
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        let pending = Self::pending(state);
        if pending.is_empty() {
            return Ok(StepOutcome::Skipped("no .360 clips found".to_string()));
        }

        std::fs::create_dir_all(&ctx.output_dir)
            .map_err(|e| StepError::io_error("creating output directory", e))?;

        let quality = ctx.options.quality;
        let tags = ctx.spherical_tags();
        let total = pending.len();

        ctx.logger.info(&format!(
            "Converting {} clip(s) with {} ({})",
            total,
            quality.dnxhr_profile(),
            quality.name()
        ));

        for (i, (number, index, clip)) in pending.into_iter().enumerate() {
            ctx.logger
                .section(&format!("{}/{}: {}", i + 1, total, clip.display_name()));

            let output = converted_path(&clip.path, &ctx.output_dir);
            ctx.tools.stitch(&clip.path, &output, quality, &ctx.logger)?;
            ctx.tools.tag(&output, &tags, &ctx.logger)?;

            let converted = clip.with_converted_path(&output);
            state
                .catalog
                .replace_clip(MediaKind::Spherical, &number, index, converted)
                .ok_or_else(|| {
                    StepError::other(format!(
                        "{} vanished from recording {}",
                        clip.display_name(),
                        number
                    ))
                })?;

            state.converted.push(ConvertedClip {
                source: clip.source_path.clone(),
                output,
                quality,
            });
        }

        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        if !Self::pending(state).is_empty() {
            return Err(StepError::invalid_output("some .360 clips were not converted"));
        }
        for converted in &state.converted {
            if !converted.output.exists() {
                return Err(StepError::invalid_output(format!(
                    "converted file missing: {}",
                    converted.output.display()
                )));
            }
        }
        Ok(())
    }
}
