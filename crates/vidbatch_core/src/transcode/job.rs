//! Transcode job description.

use std::path::PathBuf;

use serde::Serialize;

/// One rescale + retime operation, derived per candidate entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscodeJob {
    /// Extracted input file.
    pub input_path: PathBuf,
    /// Destination of the transcoded file. Overwritten if present.
    pub output_path: PathBuf,
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
    /// Presentation timestamp multiplier.
    pub speed_factor: f64,
    /// Strip the audio stream.
    pub drop_audio: bool,
}

impl TranscodeJob {
    /// Scale filter argument, `WIDTH:HEIGHT`.
    pub fn scale_arg(&self) -> String {
        format!("{}:{}", self.width, self.height)
    }

    /// Timestamp filter argument, `FACTOR*PTS` with two decimals.
    pub fn setpts_arg(&self) -> String {
        format!("{:.2}*PTS", self.speed_factor)
    }
}
