//! Transcoding through an external media tool.
//!
//! The pipeline only sees the [`Transcoder`] trait, so tests can swap the
//! real [`FfmpegTranscoder`] for a fake that never spawns a process.

mod ffmpeg;
mod job;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub use ffmpeg::{atempo_chain, build_ffmpeg_args, FfmpegTranscoder};
pub use job::TranscodeJob;

/// Error type for transcoding.
#[derive(Error, Debug)]
pub enum TranscodeError {
    /// The tool could not be started.
    #[error("Failed to launch {tool}: {source}")]
    Launch {
        tool: String,
        #[source]
        source: io::Error,
    },

    /// The tool ran and reported failure.
    #[error("{tool} failed ({}): {message}", describe_exit(.exit_code))]
    Failed {
        tool: String,
        exit_code: Option<i32>,
        message: String,
    },

    /// Communication with the running tool failed.
    #[error("I/O error while running {tool}: {source}")]
    Io {
        tool: String,
        #[source]
        source: io::Error,
    },

    /// The tool succeeded but the output file is missing.
    #[error("Output file missing after transcode: {}", .0.display())]
    OutputMissing(PathBuf),
}

impl TranscodeError {
    /// Create a failed-run error.
    pub fn failed(tool: impl Into<String>, exit_code: Option<i32>, message: impl Into<String>) -> Self {
        Self::Failed {
            tool: tool.into(),
            exit_code,
            message: message.into(),
        }
    }
}

fn describe_exit(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

/// Result type for transcoding.
pub type TranscodeResult<T> = Result<T, TranscodeError>;

/// Something that can execute a [`TranscodeJob`].
///
/// Implementations block until the job is finished and perform no retries.
pub trait Transcoder: Send + Sync {
    /// Tool name, for logging and error context.
    fn name(&self) -> &str;

    /// Run one job to completion.
    fn transcode(&self, job: &TranscodeJob) -> TranscodeResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_error_displays_exit_code() {
        let err = TranscodeError::failed("ffmpeg", Some(1), "Invalid data found");
        let msg = err.to_string();
        assert!(msg.contains("ffmpeg"));
        assert!(msg.contains("exit code 1"));
        assert!(msg.contains("Invalid data found"));
    }

    #[test]
    fn signal_termination_is_described() {
        let err = TranscodeError::failed("ffmpeg", None, "");
        assert!(err.to_string().contains("terminated by signal"));
    }
}
