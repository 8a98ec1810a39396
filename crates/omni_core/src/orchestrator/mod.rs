//! Pipeline orchestrator for coordinating a run.
//!
//! A run converts and merges the clips of one directory. The work is split
//! into steps that validate, execute, and record their results in
//! `RunState`.
//!
//! # Architecture
//!
//! ```text
//! Pipeline
//!     ├── Step: Convert        (stitch + tag every .360 clip)
//!     ├── Step: Merge .mov     (or Merge .360 when not converting)
//!     ├── Step: Merge .mp4
//!     └── Step: Merge .LRV
//! ```
//!
//! # Example
//!
//! ```ignore
//! use omni_core::orchestrator::{create_pipeline, Context, RunState};
//!
//! let pipeline = create_pipeline(&options);
//! let ctx = Context::new(settings, options, "run", input_dir, output_dir, work_dir, logger, tools);
//! let mut state = RunState::new("run-1", catalog);
//!
//! let result = pipeline.run(&ctx, &mut state)?;
//! println!("Completed: {:?}", result.steps_completed);
//! ```

mod errors;
mod pipeline;
mod prompts;
mod step;
pub mod steps;
mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use errors::{PipelineError, PipelineResult, StepError, StepResult};
pub use pipeline::{Pipeline, PipelineRunResult};
pub use prompts::{available_prompts, offers_conversion, PromptOffer};
pub use step::PipelineStep;
pub use steps::{ConvertStep, MergeStep};
pub use types::{Context, ConvertedClip, MergeOutput, RunState, StepOutcome};

use crate::models::{MediaKind, RunOptions};

/// Build the pipeline for the selected actions.
///
/// Conversion always runs first so that the `.360` merge sees converted
/// files. Converted and raw `.360` merges are mutually exclusive; the
/// converted merge wins when both were requested.
pub fn create_pipeline(options: &RunOptions) -> Pipeline {
    let mut pipeline = Pipeline::new();

    if options.convert {
        pipeline.add_step(ConvertStep::new());
    }

    if options.convert && options.merge_converted {
        pipeline.add_step(MergeStep::converted());
    } else if options.wants_raw_merge(MediaKind::Spherical) {
        pipeline.add_step(MergeStep::raw(MediaKind::Spherical));
    }

    for kind in [MediaKind::Mp4, MediaKind::LowRes] {
        if options.wants_raw_merge(kind) {
            pipeline.add_step(MergeStep::raw(kind));
        }
    }

    pipeline
}
