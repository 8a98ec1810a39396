//! Core types for the orchestrator pipeline.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::grouping::ClipCatalog;
use crate::logging::RunLogger;
use crate::models::{MediaKind, QualityProfile, RecordingNumber, RunOptions};
use crate::tagging::SphericalTags;
use crate::tools::MediaTools;

/// Read-only context passed to pipeline steps.
///
/// Contains run configuration and shared resources that steps can read
/// but not modify. Mutable state goes in `RunState`.
pub struct Context {
    /// Application settings.
    pub settings: Settings,
    /// Choices made before the run started.
    pub options: RunOptions,
    /// Run name/identifier.
    pub run_name: String,
    /// Directory the clips were listed from.
    pub input_dir: PathBuf,
    /// Directory receiving converted and merged files.
    pub output_dir: PathBuf,
    /// Scratch directory for concat list files.
    pub work_dir: PathBuf,
    /// Per-run logger.
    pub logger: Arc<RunLogger>,
    /// External media tools.
    pub tools: Arc<dyn MediaTools>,
}

impl Context {
    /// Create a new context for a run.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        settings: Settings,
        options: RunOptions,
        run_name: impl Into<String>,
        input_dir: PathBuf,
        output_dir: PathBuf,
        work_dir: PathBuf,
        logger: Arc<RunLogger>,
        tools: Arc<dyn MediaTools>,
    ) -> Self {
        Self {
            settings,
            options,
            run_name: run_name.into(),
            input_dir,
            output_dir,
            work_dir,
            logger,
            tools,
        }
    }

    /// Tag set written to every converted clip.
    pub fn spherical_tags(&self) -> SphericalTags {
        SphericalTags::equirectangular(self.settings.conversion.stitching_software.clone())
    }
}

/// Mutable run state that accumulates results from pipeline steps.
///
/// The catalog is the only part a step rewrites: conversion replaces a clip
/// record with its converted successor. Everything else is append-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunState {
    /// Unique run identifier.
    pub run_id: String,
    /// When the run started.
    pub started_at: Option<String>,
    /// Current clip catalog.
    pub catalog: ClipCatalog,
    /// Clips converted by the Convert step.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub converted: Vec<ConvertedClip>,
    /// Files produced by merge steps.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub merged: Vec<MergeOutput>,
}

impl RunState {
    /// Create a new run state over a freshly built catalog.
    pub fn new(run_id: impl Into<String>, catalog: ClipCatalog) -> Self {
        Self {
            run_id: run_id.into(),
            started_at: Some(chrono::Local::now().to_rfc3339()),
            catalog,
            ..Default::default()
        }
    }

    /// Every file this run created, in creation order.
    pub fn produced_files(&self) -> Vec<&Path> {
        self.converted
            .iter()
            .map(|c| c.output.as_path())
            .chain(self.merged.iter().map(|m| m.output.as_path()))
            .collect()
    }
}

/// Record of one stitched clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertedClip {
    /// Original `.360` file.
    pub source: PathBuf,
    /// Stitched, tagged `.mov`.
    pub output: PathBuf,
    pub quality: QualityProfile,
}

/// Record of one reassembled recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeOutput {
    pub kind: MediaKind,
    pub number: RecordingNumber,
    /// Number of chapters joined.
    pub chapters: usize,
    pub output: PathBuf,
}

/// Result of executing a pipeline step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Step completed successfully.
    Success,
    /// Step was skipped (nothing to do, but not an error).
    Skipped(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_state_lists_produced_files() {
        let mut state = RunState::new("run-1", ClipCatalog::default());
        assert!(state.produced_files().is_empty());

        state.converted.push(ConvertedClip {
            source: PathBuf::from("GH010043.360"),
            output: PathBuf::from("Converted/GH010043.mov"),
            quality: QualityProfile::default(),
        });
        state.merged.push(MergeOutput {
            kind: MediaKind::Spherical,
            number: RecordingNumber::parse("0042").unwrap(),
            chapters: 2,
            output: PathBuf::from("Converted/GH--0042-merged.mov"),
        });

        assert_eq!(
            state.produced_files(),
            vec![
                Path::new("Converted/GH010043.mov"),
                Path::new("Converted/GH--0042-merged.mov"),
            ]
        );
    }

    #[test]
    fn run_state_serializes() {
        let state = RunState::new("run-456", ClipCatalog::default());
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"run_id\":\"run-456\""));
        assert!(!json.contains("\"merged\""));
    }
}
