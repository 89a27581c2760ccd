//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::logging::{LogConfig, LogLevel};
use crate::models::{
    ConfigValidationError, NamingPolicy, ProcessingConfig, DEFAULT_HEIGHT, DEFAULT_SPEED_FACTOR,
    DEFAULT_WIDTH,
};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Transform parameters.
    #[serde(default)]
    pub transcode: TranscodeSettings,

    /// Placement of extracted and transcoded files.
    #[serde(default)]
    pub output: OutputSettings,

    /// External tool locations.
    #[serde(default)]
    pub tools: ToolSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Settings {
    /// Build the runtime configuration for a run writing to `output_root`.
    pub fn to_processing_config(&self, output_root: impl Into<PathBuf>) -> ProcessingConfig {
        ProcessingConfig::new(output_root)
            .with_dimensions(self.transcode.width, self.transcode.height)
            .with_speed_factor(self.transcode.speed)
            .with_extensions(&self.transcode.extensions)
            .with_drop_audio(self.transcode.drop_audio)
            .with_policy(self.output.policy)
            .with_overwrite_extracted(self.output.overwrite_extracted)
            .with_ffmpeg(&self.tools.ffmpeg)
    }

    /// Validate the values that do not depend on an output root.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.to_processing_config(".").validate()
    }

    /// Logger configuration derived from the `[logging]` section.
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.logging.level,
            compact: self.logging.compact,
            error_tail: self.logging.error_tail as usize,
            show_timestamps: self.logging.timestamps,
        }
    }
}

/// Transform parameters applied to every candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscodeSettings {
    /// Target width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Target height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Presentation timestamp multiplier.
    #[serde(default = "default_speed")]
    pub speed: f64,

    /// Accepted video extensions (case-insensitive, dot optional).
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Strip the audio stream from outputs.
    #[serde(default = "default_true")]
    pub drop_audio: bool,
}

fn default_width() -> u32 {
    DEFAULT_WIDTH
}

fn default_height() -> u32 {
    DEFAULT_HEIGHT
}

fn default_speed() -> f64 {
    DEFAULT_SPEED_FACTOR
}

fn default_extensions() -> Vec<String> {
    vec!["mp4".to_string()]
}

fn default_true() -> bool {
    true
}

impl Default for TranscodeSettings {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            speed: default_speed(),
            extensions: default_extensions(),
            drop_audio: true,
        }
    }
}

/// Output placement settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Naming policy.
    #[serde(default)]
    pub policy: NamingPolicy,

    /// Replace files already present at extraction paths.
    #[serde(default = "default_true")]
    pub overwrite_extracted: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            policy: NamingPolicy::default(),
            overwrite_extracted: true,
        }
    }
}

/// External tool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSettings {
    /// ffmpeg executable (name on PATH or absolute path).
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: String,
}

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            ffmpeg: default_ffmpeg(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Minimum level for batch log lines.
    #[serde(default)]
    pub level: LogLevel,

    /// Keep tool output out of the live log.
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Number of tool output lines shown after a failure.
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,

    /// Prefix batch log lines with the wall-clock time.
    #[serde(default = "default_true")]
    pub timestamps: bool,
}

fn default_error_tail() -> u32 {
    20
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            compact: true,
            error_tail: default_error_tail(),
            timestamps: true,
        }
    }
}
