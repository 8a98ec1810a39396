//! Log file for one omnistitch run.
//!
//! Lines go to `<logs_folder>/<run_name>.log` and, when a callback is set,
//! to the console. ffmpeg and exiftool output is held in a bounded tail and
//! only printed when a tool fails, unless compact mode is off.

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use parking_lot::Mutex;

use super::types::{LogCallback, LogConfig, LogLevel, MessagePrefix};

pub struct RunLogger {
    log_path: PathBuf,
    /// `None` once dropped.
    file: Mutex<Option<BufWriter<File>>>,
    callback: Option<LogCallback>,
    config: LogConfig,
    tail: Mutex<VecDeque<String>>,
}

impl RunLogger {
    /// Create `<log_dir>/<run_name>.log`, truncating an existing file.
    pub fn new(
        run_name: impl Into<String>,
        log_dir: impl AsRef<Path>,
        config: LogConfig,
        callback: Option<LogCallback>,
    ) -> io::Result<Self> {
        let run_name = run_name.into();
        let log_dir = log_dir.as_ref();
        fs::create_dir_all(log_dir)?;

        let log_path = log_dir.join(format!("{}.log", sanitize_filename(&run_name)));
        let mut file = BufWriter::new(File::create(&log_path)?);
        writeln!(
            file,
            "# omnistitch {} run {} started {}",
            crate::version(),
            run_name,
            Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;

        Ok(Self {
            log_path,
            file: Mutex::new(Some(file)),
            callback,
            tail: Mutex::new(VecDeque::with_capacity(config.error_tail)),
            config,
        })
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Write `message` if `level` passes the configured minimum.
    pub fn log(&self, level: LogLevel, message: &str) {
        if level < self.config.level {
            return;
        }
        self.emit(message);
    }

    pub fn info(&self, message: &str) {
        tracing::info!("{}", message);
        self.log(LogLevel::Info, message);
    }

    pub fn debug(&self, message: &str) {
        tracing::debug!("{}", message);
        self.log(LogLevel::Debug, message);
    }

    pub fn error(&self, message: &str) {
        tracing::error!("{}", message);
        self.log(LogLevel::Error, &MessagePrefix::Error.format(message));
    }

    /// `$ <command line>`
    pub fn command(&self, command: &str) {
        tracing::debug!("Running: {}", command);
        self.log(LogLevel::Info, &MessagePrefix::Command.format(command));
    }

    /// Step banner.
    pub fn phase(&self, phase_name: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Phase.format(phase_name));
    }

    /// Per-clip or per-recording heading inside a step.
    pub fn section(&self, section_name: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Section.format(section_name));
    }

    pub fn success(&self, message: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Success.format(message));
    }

    /// One line of tool output. Always kept in the tail; written out only
    /// when compact mode is off.
    pub fn output_line(&self, line: &str, is_stderr: bool) {
        {
            let mut tail = self.tail.lock();
            if tail.len() >= self.config.error_tail {
                tail.pop_front();
            }
            tail.push_back(line.to_string());
        }

        if !self.config.compact {
            let prefix = if is_stderr { "[stderr] " } else { "" };
            self.emit(&format!("{}{}", prefix, line));
        }
    }

    /// Dump the tail under a `[<tool>/tail]` header.
    pub fn show_tail(&self, tool: &str) {
        let lines = self.tail();
        if lines.is_empty() {
            return;
        }
        self.emit(&format!("[{}/tail]", tool));
        for line in &lines {
            self.emit(line);
        }
    }

    /// Forget output from the previous tool.
    pub fn clear_tail(&self) {
        self.tail.lock().clear();
    }

    pub fn tail(&self) -> Vec<String> {
        self.tail.lock().iter().cloned().collect()
    }

    /// Debug-level dump of a tool's argument list as a JSON array.
    pub fn log_args_json(&self, tokens: &[String]) {
        if let Ok(json) = serde_json::to_string_pretty(tokens) {
            self.log(LogLevel::Debug, &json);
        }
    }

    pub fn flush(&self) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.flush();
        }
    }

    fn emit(&self, message: &str) {
        let line = if self.config.show_timestamps {
            format!("[{}] {}", Local::now().format("%H:%M:%S"), message)
        } else {
            message.to_string()
        };

        if let Some(file) = self.file.lock().as_mut() {
            let _ = writeln!(file, "{}", line);
        }
        if let Some(callback) = &self.callback {
            callback(&line);
        }
    }
}

impl Drop for RunLogger {
    fn drop(&mut self) {
        if let Some(mut file) = self.file.lock().take() {
            let _ = file.flush();
        }
    }
}

/// Replace characters that are not allowed in file names.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}

pub struct RunLoggerBuilder {
    run_name: String,
    log_dir: PathBuf,
    config: LogConfig,
    callback: Option<LogCallback>,
}

impl RunLoggerBuilder {
    pub fn new(run_name: impl Into<String>, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            run_name: run_name.into(),
            log_dir: log_dir.into(),
            config: LogConfig::default(),
            callback: None,
        }
    }

    pub fn config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    pub fn callback(mut self, callback: LogCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    pub fn build(self) -> io::Result<RunLogger> {
        RunLogger::new(self.run_name, self.log_dir, self.config, self.callback)
    }
}
