//! Configuration management for vidbatch.
//!
//! This module provides:
//! - TOML-based settings with logical sections
//! - Defaults for every field, so partial files are valid
//! - Conversion into the immutable [`ProcessingConfig`](crate::models::ProcessingConfig)
//!
//! # Example
//!
//! ```no_run
//! use vidbatch_core::config::ConfigManager;
//!
//! let mut config = ConfigManager::new("vidbatch.toml");
//! config.load().unwrap();
//!
//! println!("Target width: {}", config.settings().transcode.width);
//! let processing = config.settings().to_processing_config("out");
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    LoggingSettings, OutputSettings, Settings, ToolSettings, TranscodeSettings,
};
