//! Fixtures for step and pipeline tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tempfile::TempDir;

use crate::config::Settings;
use crate::grouping::ClipCatalog;
use crate::logging::{LogConfig, RunLogger};
use crate::merge::MergePlan;
use crate::models::{QualityProfile, RunOptions};
use crate::tagging::SphericalTags;
use crate::tools::MediaTools;

use super::errors::{StepError, StepResult};
use super::types::Context;

#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    Stitch {
        input: PathBuf,
        output: PathBuf,
        quality: QualityProfile,
    },
    Tag {
        file: PathBuf,
    },
    Concat {
        output: PathBuf,
        list: String,
    },
}

/// Fake tools that create empty outputs and record every call.
#[derive(Default)]
pub struct RecordingTools {
    calls: Mutex<Vec<ToolCall>>,
    fail_on: Option<String>,
}

impl RecordingTools {
    /// Fail any call whose target file name contains `needle`.
    pub fn failing_on(needle: &str) -> Self {
        Self {
            fail_on: Some(needle.to_string()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<ToolCall> {
        self.calls.lock().clone()
    }

    fn check(&self, target: &Path) -> StepResult<()> {
        let name = target.to_string_lossy();
        match &self.fail_on {
            Some(needle) if name.contains(needle.as_str()) => {
                Err(StepError::command_failed("fake", 1, format!("refusing {}", name)))
            }
            _ => Ok(()),
        }
    }
}

impl MediaTools for RecordingTools {
    fn stitch(
        &self,
        input: &Path,
        output: &Path,
        quality: QualityProfile,
        _logger: &RunLogger,
    ) -> StepResult<()> {
        self.check(input)?;
        fs::write(output, b"").map_err(|e| StepError::io_error("fake stitch", e))?;
        self.calls.lock().push(ToolCall::Stitch {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            quality,
        });
        Ok(())
    }

    fn tag(&self, file: &Path, _tags: &SphericalTags, _logger: &RunLogger) -> StepResult<()> {
        self.check(file)?;
        self.calls.lock().push(ToolCall::Tag {
            file: file.to_path_buf(),
        });
        Ok(())
    }

    fn concat(&self, plan: &MergePlan, list_path: &Path, _logger: &RunLogger) -> StepResult<()> {
        self.check(&plan.output)?;
        let list =
            fs::read_to_string(list_path).map_err(|e| StepError::io_error("fake concat", e))?;
        fs::write(&plan.output, b"").map_err(|e| StepError::io_error("fake concat", e))?;
        self.calls.lock().push(ToolCall::Concat {
            output: plan.output.clone(),
            list,
        });
        Ok(())
    }
}

/// A temporary input directory with a run context around it.
pub struct TestRun {
    dir: TempDir,
    pub tools: Arc<RecordingTools>,
    pub options: RunOptions,
    logger: Arc<RunLogger>,
}

impl TestRun {
    pub fn new() -> Self {
        Self::with_tools(RecordingTools::default())
    }

    pub fn with_tools(tools: RecordingTools) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let logger = RunLogger::new("test", dir.path().join("logs"), LogConfig::default(), None)
            .unwrap();
        Self {
            dir,
            tools: Arc::new(tools),
            options: RunOptions::default(),
            logger: Arc::new(logger),
        }
    }

    pub fn input_dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join("Converted")
    }

    pub fn work_dir(&self) -> PathBuf {
        self.dir.path().join("work")
    }

    /// Create empty files in the input directory.
    pub fn touch(&self, names: &[&str]) {
        for name in names {
            fs::write(self.dir.path().join(name), b"").unwrap();
        }
    }

    /// Catalog of the input directory.
    pub fn catalog(&self) -> ClipCatalog {
        let entries = fs::read_dir(self.dir.path())
            .unwrap()
            .map(|e| e.unwrap().path());
        ClipCatalog::build(entries)
    }

    pub fn context(&self) -> Context {
        fs::create_dir_all(self.output_dir()).unwrap();
        fs::create_dir_all(self.work_dir()).unwrap();
        Context::new(
            Settings::default(),
            self.options.clone(),
            "test",
            self.input_dir().to_path_buf(),
            self.output_dir(),
            self.work_dir(),
            Arc::clone(&self.logger),
            Arc::clone(&self.tools) as Arc<dyn MediaTools>,
        )
    }
}
