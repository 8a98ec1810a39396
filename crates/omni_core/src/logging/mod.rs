//! Logging infrastructure for omnistitch.
//!
//! This module provides:
//! - Per-run loggers with file + console callback output
//! - Compact mode that keeps ffmpeg/exiftool chatter out of the log
//! - Tail buffer for error diagnosis
//! - Integration with the `tracing` ecosystem
//!
//! # Example
//!
//! ```no_run
//! use omni_core::logging::{LogConfig, RunLogger};
//!
//! let logger = RunLogger::new("run", "/path/to/logs", LogConfig::default(), None).unwrap();
//!
//! logger.phase("Convert");
//! logger.command("ffmpeg -i GH010042.360 ...");
//! logger.success("Converted GH010042.360");
//! ```

mod run_logger;
mod types;

use std::path::Path;

pub use run_logger::{RunLogger, RunLoggerBuilder};
pub use types::{LogCallback, LogConfig, LogLevel, MessagePrefix};

pub use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize global tracing subscriber for application-wide logging.
///
/// This sets up a subscriber that:
/// - Respects RUST_LOG environment variable
/// - Falls back to the provided default level
/// - Outputs to stderr with timestamps
///
/// Should be called once at application startup.
pub fn init_tracing(default_level: LogLevel) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(env_filter(default_level))
        .init();
}

/// Like [`init_tracing`], plus a daily rolling file
/// (`omnistitch.<date>.log`) under `log_dir`.
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// lifetime of the program. Fails without installing anything when the log
/// directory cannot be created.
pub fn init_tracing_with_file(
    default_level: LogLevel,
    log_dir: &Path,
) -> Result<WorkerGuard, InitError> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("omnistitch")
        .filename_suffix("log")
        .build(log_dir)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(env_filter(default_level))
        .init();

    Ok(guard)
}

/// `RUST_LOG` when set, otherwise everything at `default_level` and above.
fn env_filter(default_level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::default()
            .add_directive(LevelFilter::from_level(default_level.to_tracing_level()).into())
    })
}
