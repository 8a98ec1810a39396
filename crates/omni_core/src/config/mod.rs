//! Configuration management for omnistitch.
//!
//! This module provides:
//! - TOML-based configuration with logical sections
//! - Atomic file writes (write to temp, then rename)
//! - Validation on load with automatic defaults
//!
//! # Example
//!
//! ```no_run
//! use omni_core::config::ConfigManager;
//!
//! let mut config = ConfigManager::new("settings.toml");
//! config.load_or_create().unwrap();
//!
//! println!("ffmpeg: {}", config.settings().tools.ffmpeg);
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    ConfigSection, ConversionSettings, LoggingSettings, PathSettings, Settings, ToolSettings,
};
