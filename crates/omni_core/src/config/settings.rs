//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use serde::{Deserialize, Serialize};

use crate::logging::{LogConfig, LogLevel};
use crate::models::QualityProfile;
use crate::tagging::DEFAULT_STITCHING_SOFTWARE;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// External tool locations.
    #[serde(default)]
    pub tools: ToolSettings,

    /// Conversion defaults.
    #[serde(default)]
    pub conversion: ConversionSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Settings {
    /// Run logger configuration derived from the logging section.
    pub fn log_config(&self, verbose: bool) -> LogConfig {
        LogConfig {
            level: if verbose { LogLevel::Debug } else { LogLevel::Info },
            compact: self.logging.compact && !verbose,
            error_tail: self.logging.error_tail as usize,
            show_timestamps: self.logging.show_timestamps,
        }
    }
}

/// Output, work and log folders.
///
/// Relative folders are resolved against the input directory of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSettings {
    /// Folder receiving converted and merged files.
    #[serde(default = "default_output_folder")]
    pub output_folder: String,

    /// Scratch folder for concat list files.
    #[serde(default = "default_work_folder")]
    pub work_folder: String,

    /// Folder for run log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,
}

fn default_output_folder() -> String {
    "Converted".to_string()
}

fn default_work_folder() -> String {
    ".omnistitch-work".to_string()
}

fn default_logs_folder() -> String {
    ".omnistitch-logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            output_folder: default_output_folder(),
            work_folder: default_work_folder(),
            logs_folder: default_logs_folder(),
        }
    }
}

/// Program names or paths of the external tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSettings {
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: String,

    #[serde(default = "default_exiftool")]
    pub exiftool: String,
}

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}

fn default_exiftool() -> String {
    "exiftool".to_string()
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            ffmpeg: default_ffmpeg(),
            exiftool: default_exiftool(),
        }
    }
}

/// Conversion defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionSettings {
    /// Profile preselected at the quality prompt.
    #[serde(default)]
    pub default_quality: QualityProfile,

    /// Value written to the `StitchingSoftware` tag.
    #[serde(default = "default_stitching_software")]
    pub stitching_software: String,
}

fn default_stitching_software() -> String {
    DEFAULT_STITCHING_SOFTWARE.to_string()
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            default_quality: QualityProfile::default(),
            stitching_software: default_stitching_software(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Keep tool output out of the run log.
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Number of tool output lines to show when a tool fails.
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,

    /// Prefix log lines with the time of day.
    #[serde(default = "default_true")]
    pub show_timestamps: bool,

    /// Log every external command as a JSON argument array.
    #[serde(default)]
    pub show_command_json: bool,
}

fn default_true() -> bool {
    true
}

fn default_error_tail() -> u32 {
    20
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            compact: true,
            error_tail: default_error_tail(),
            show_timestamps: true,
            show_command_json: false,
        }
    }
}

/// Configuration sections that can be updated independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Paths,
    Tools,
    Conversion,
    Logging,
}

impl ConfigSection {
    /// All sections, in file order.
    pub fn all() -> &'static [ConfigSection] {
        &[
            ConfigSection::Paths,
            ConfigSection::Tools,
            ConfigSection::Conversion,
            ConfigSection::Logging,
        ]
    }

    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "paths",
            ConfigSection::Tools => "tools",
            ConfigSection::Conversion => "conversion",
            ConfigSection::Logging => "logging",
        }
    }

    /// Comment written above the section in generated files.
    pub fn comment(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "Output, work and log folders (relative to the input directory)",
            ConfigSection::Tools => "External tool programs",
            ConfigSection::Conversion => "Stitching defaults",
            ConfigSection::Logging => "Logging configuration",
        }
    }
}
