//! Immutable runtime configuration for one batch run.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use super::enums::NamingPolicy;

/// Default target width in pixels.
pub const DEFAULT_WIDTH: u32 = 540;
/// Default target height in pixels.
pub const DEFAULT_HEIGHT: u32 = 410;
/// Default presentation timestamp multiplier.
pub const DEFAULT_SPEED_FACTOR: f64 = 0.5;
/// Smallest speed factor; `setpts` and output names print two decimals.
pub const MIN_SPEED_FACTOR: f64 = 0.01;

/// Reasons a [`ProcessingConfig`] is rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    #[error("width and height must be positive (got {width}x{height})")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("speed factor must be a positive finite number (got {0})")]
    InvalidSpeedFactor(f64),

    #[error("speed factor must be at least 0.01 with at most two decimals (got {0})")]
    UnrepresentableSpeedFactor(f64),

    #[error("at least one video extension is required")]
    NoExtensions,

    #[error("invalid extension '{0}'")]
    InvalidExtension(String),

    #[error("output root must not be empty")]
    EmptyOutputRoot,
}

/// Configuration resolved once at startup and passed down the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingConfig {
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
    /// PTS multiplier. Below 1.0 speeds playback up, above 1.0 slows it down.
    pub speed_factor: f64,
    /// Directory receiving extracted and transcoded files.
    pub output_root: PathBuf,
    /// Placement and naming policy.
    pub policy: NamingPolicy,
    /// Lowercase extensions (without dot) that qualify for transcoding.
    pub extensions: Vec<String>,
    /// Strip the audio stream from transcoded output.
    pub drop_audio: bool,
    /// Replace files that already exist at an extraction path.
    pub overwrite_extracted: bool,
    /// Transcoding tool executable.
    pub ffmpeg: PathBuf,
}

impl ProcessingConfig {
    /// Config with default transform parameters for the given output root.
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            speed_factor: DEFAULT_SPEED_FACTOR,
            output_root: output_root.into(),
            policy: NamingPolicy::default(),
            extensions: vec!["mp4".to_string()],
            drop_audio: true,
            overwrite_extracted: true,
            ffmpeg: PathBuf::from("ffmpeg"),
        }
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_speed_factor(mut self, speed_factor: f64) -> Self {
        self.speed_factor = speed_factor;
        self
    }

    pub fn with_policy(mut self, policy: NamingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the accepted extensions. Leading dots and case are normalized.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| normalize_extension(ext.as_ref()))
            .collect();
        self
    }

    pub fn with_drop_audio(mut self, drop_audio: bool) -> Self {
        self.drop_audio = drop_audio;
        self
    }

    pub fn with_overwrite_extracted(mut self, overwrite: bool) -> Self {
        self.overwrite_extracted = overwrite;
        self
    }

    pub fn with_ffmpeg(mut self, ffmpeg: impl Into<PathBuf>) -> Self {
        self.ffmpeg = ffmpeg.into();
        self
    }

    /// Check every invariant the pipeline relies on.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigValidationError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }

        if !self.speed_factor.is_finite() || self.speed_factor <= 0.0 {
            return Err(ConfigValidationError::InvalidSpeedFactor(self.speed_factor));
        }

        let rounded = (self.speed_factor * 100.0).round() / 100.0;
        if self.speed_factor < MIN_SPEED_FACTOR || (rounded - self.speed_factor).abs() > 1e-9 {
            return Err(ConfigValidationError::UnrepresentableSpeedFactor(
                self.speed_factor,
            ));
        }

        if self.extensions.is_empty() {
            return Err(ConfigValidationError::NoExtensions);
        }

        for ext in &self.extensions {
            if ext.is_empty() || ext.contains(['/', '\\', '.']) {
                return Err(ConfigValidationError::InvalidExtension(ext.clone()));
            }
        }

        if self.output_root.as_os_str().is_empty() {
            return Err(ConfigValidationError::EmptyOutputRoot);
        }

        Ok(())
    }

    /// Whether `extension` (any case, no dot) is an accepted video extension.
    pub fn accepts_extension(&self, extension: &str) -> bool {
        self.extensions
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(extension))
    }
}

/// Lowercase, without leading dots.
fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}
