//! Merge step - joins chaptered recordings with a stream copy.

use std::fs;

use crate::merge::{plan_merges, MergePlan};
use crate::models::MediaKind;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, MergeOutput, RunState, StepOutcome};
use crate::stitch::CONVERTED_SUFFIX;

/// Merge step for one media kind.
///
/// Plans are computed from the catalog as it is when the step runs, so a
/// merge after conversion joins the converted files.
pub struct MergeStep {
    kind: MediaKind,
    /// Output extension override.
    suffix: Option<&'static str>,
    name: String,
}

impl MergeStep {
    /// Merge converted `.360` recordings into `.mov` files.
    pub fn converted() -> Self {
        Self {
            kind: MediaKind::Spherical,
            suffix: Some(CONVERTED_SUFFIX),
            name: format!("Merge {}", CONVERTED_SUFFIX),
        }
    }

    /// Merge recordings of `kind` in their original container.
    pub fn raw(kind: MediaKind) -> Self {
        Self {
            kind,
            suffix: None,
            name: format!("Merge {}", kind.extension()),
        }
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    fn is_converted_merge(&self) -> bool {
        self.suffix.is_some()
    }

    fn plans(&self, ctx: &Context, state: &RunState) -> Vec<MergePlan> {
        plan_merges(&state.catalog, self.kind, &ctx.output_dir, self.suffix)
    }

    fn merge_one(&self, ctx: &Context, plan: &MergePlan) -> StepResult<()> {
        let list_path = ctx.work_dir.join(plan.list_file_name());
        let list = plan
            .concat_list()
            .map_err(|e| StepError::io_error("resolving merge inputs", e))?;
        fs::write(&list_path, list)
            .map_err(|e| StepError::io_error("writing concat list", e))?;

        ctx.tools.concat(plan, &list_path, &ctx.logger)?;

        fs::remove_file(&list_path).map_err(|e| StepError::io_error("removing concat list", e))
    }
}

impl PipelineStep for MergeStep {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> String {
        if self.is_converted_merge() {
            "Merge converted .mov chapters".to_string()
        } else {
            format!("Merge {} chapters", self.kind.extension())
        }
    }

    fn validate_input(&self, ctx: &Context, state: &RunState) -> StepResult<()> {
        for plan in self.plans(ctx, state) {
            if self.is_converted_merge() {
                let group = state.catalog.group(self.kind, &plan.number);
                let all_converted = group.map_or(false, |g| g.clips().iter().all(|c| c.is_converted()));
                if !all_converted {
                    return Err(StepError::invalid_input(format!(
                        "recording {} has chapters that were not converted",
                        plan.number
                    )));
                }
            }
            if let Some(missing) = plan.inputs.iter().find(|p| !p.exists()) {
                return Err(StepError::file_not_found(missing.display().to_string()));
            }
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        let plans = self.plans(ctx, state);
        if plans.is_empty() {
            return Ok(StepOutcome::Skipped(format!(
                "no chaptered {} recordings",
                self.kind.extension()
            )));
        }

        fs::create_dir_all(&ctx.output_dir)
            .map_err(|e| StepError::io_error("creating output directory", e))?;
        fs::create_dir_all(&ctx.work_dir)
            .map_err(|e| StepError::io_error("creating work directory", e))?;

        for plan in plans {
            ctx.logger.section(&format!(
                "Recording {}: {} chapters",
                plan.number,
                plan.inputs.len()
            ));
            self.merge_one(ctx, &plan)?;

            state.merged.push(MergeOutput {
                kind: plan.kind,
                number: plan.number,
                chapters: plan.inputs.len(),
                output: plan.output,
            });
        }

        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        for merged in state.merged.iter().filter(|m| m.kind == self.kind) {
            if !merged.output.exists() {
                return Err(StepError::invalid_output(format!(
                    "merged file missing: {}",
                    merged.output.display()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::steps::ConvertStep;
    use crate::orchestrator::test_support::{RecordingTools, TestRun, ToolCall};

    fn concat_calls(run: &TestRun) -> Vec<(String, String)> {
        run.tools
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                ToolCall::Concat { output, list } => Some((
                    output.file_name().unwrap().to_string_lossy().to_string(),
                    list,
                )),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn merges_raw_chapters_in_order() {
        let run = TestRun::new();
        run.touch(&["GH030050.mp4", "GH010050.mp4", "GH020050.mp4", "GH010051.mp4"]);

        let ctx = run.context();
        let mut state = RunState::new("run", run.catalog());
        let step = MergeStep::raw(MediaKind::Mp4);

        step.validate_input(&ctx, &state).unwrap();
        assert_eq!(step.execute(&ctx, &mut state).unwrap(), StepOutcome::Success);
        step.validate_output(&ctx, &state).unwrap();

        let calls = concat_calls(&run);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "GH--0050-merged.mp4");
        let expected: String = ["GH010050.mp4", "GH020050.mp4", "GH030050.mp4"]
            .iter()
            .map(|n| format!("file '{}'\n", run.input_dir().join(n).display()))
            .collect();
        assert_eq!(calls[0].1, expected);

        assert_eq!(state.merged.len(), 1);
        assert_eq!(state.merged[0].chapters, 3);
    }

    #[test]
    fn removes_list_file_after_success() {
        let run = TestRun::new();
        run.touch(&["GH010050.LRV", "GH020050.LRV"]);

        let ctx = run.context();
        let mut state = RunState::new("run", run.catalog());
        MergeStep::raw(MediaKind::LowRes).execute(&ctx, &mut state).unwrap();

        assert!(run.output_dir().join("GH--0050-merged.LRV").exists());
        assert_eq!(std::fs::read_dir(run.work_dir()).unwrap().count(), 0);
    }

    #[test]
    fn skips_when_nothing_is_chaptered() {
        let run = TestRun::new();
        run.touch(&["GH010050.mp4", "GH010051.mp4"]);

        let ctx = run.context();
        let mut state = RunState::new("run", run.catalog());
        let outcome = MergeStep::raw(MediaKind::Mp4).execute(&ctx, &mut state).unwrap();

        assert!(matches!(outcome, StepOutcome::Skipped(_)));
        assert!(run.tools.calls().is_empty());
    }

    #[test]
    fn converted_merge_uses_converted_files() {
        let run = TestRun::new();
        run.touch(&["GH010042.360", "GH020042.360", "GH010043.360"]);

        let ctx = run.context();
        let mut state = RunState::new("run", run.catalog());
        ConvertStep::new().execute(&ctx, &mut state).unwrap();

        let step = MergeStep::converted();
        step.validate_input(&ctx, &state).unwrap();
        step.execute(&ctx, &mut state).unwrap();

        let calls = concat_calls(&run);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "GH--0042-merged.mov");
        assert!(calls[0].1.contains("GH010042.mov"));
        assert!(calls[0].1.contains("GH020042.mov"));
        assert!(!calls[0].1.contains(".360"));
    }

    #[test]
    fn converted_merge_requires_conversion() {
        let run = TestRun::new();
        run.touch(&["GH010042.360", "GH020042.360"]);

        let ctx = run.context();
        let state = RunState::new("run", run.catalog());
        let err = MergeStep::converted().validate_input(&ctx, &state).unwrap_err();
        assert!(matches!(err, StepError::InvalidInput(_)));
    }

    #[test]
    fn concat_failure_keeps_list_for_inspection() {
        let run = TestRun::with_tools(RecordingTools::failing_on("--0050"));
        run.touch(&["GH010050.mp4", "GH020050.mp4"]);

        let ctx = run.context();
        let mut state = RunState::new("run", run.catalog());
        let err = MergeStep::raw(MediaKind::Mp4).execute(&ctx, &mut state).unwrap_err();

        assert!(matches!(err, StepError::CommandFailed { .. }));
        assert!(run.work_dir().join("GH--0050-merged.concat.txt").exists());
        assert!(state.merged.is_empty());
    }

    #[test]
    fn step_names_follow_kind() {
        assert_eq!(MergeStep::converted().name(), "Merge .mov");
        assert_eq!(MergeStep::raw(MediaKind::LowRes).name(), "Merge .LRV");
        assert_eq!(MergeStep::raw(MediaKind::Mp4).kind(), MediaKind::Mp4);
    }
}
