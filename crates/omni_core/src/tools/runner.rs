//! Blocking child process execution with run logging.

use std::path::Path;
use std::process::Command;

use crate::logging::RunLogger;
use crate::orchestrator::{StepError, StepResult};

/// Number of stderr lines carried in a `CommandFailed` error.
const ERROR_MESSAGE_LINES: usize = 5;

/// An external program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    /// Short tool name used in logs and errors.
    pub tool: String,
    /// Program name or path.
    pub program: String,
    pub args: Vec<String>,
}

impl ToolCommand {
    pub fn new(tool: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy())
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Command line as shown in the run log.
    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// Run `command` to completion.
///
/// Output lines go to the logger's tail buffer. A nonzero exit shows the
/// tail and fails with the last stderr lines as the message.
pub fn run_tool(command: &ToolCommand, logger: &RunLogger, log_json: bool) -> StepResult<()> {
    logger.command(&command.display());
    if log_json {
        logger.log_args_json(&command.args);
    }

    logger.clear_tail();

    let result = Command::new(&command.program)
        .args(&command.args)
        .output()
        .map_err(|e| StepError::io_error(format!("executing {}", command.tool), e))?;

    let stdout = String::from_utf8_lossy(&result.stdout);
    for line in stdout.lines() {
        logger.output_line(line, false);
    }
    let stderr = String::from_utf8_lossy(&result.stderr);
    for line in stderr.lines() {
        logger.output_line(line, true);
    }

    if result.status.success() {
        return Ok(());
    }

    // Killed by a signal
    let exit_code = result.status.code().unwrap_or(-1);
    logger.show_tail(&format!("{} output", command.tool));

    Err(StepError::command_failed(
        &command.tool,
        exit_code,
        last_lines(&stderr, ERROR_MESSAGE_LINES),
    ))
}

fn last_lines(text: &str, count: usize) -> String {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(count);
    lines[start..].join("\n")
}
