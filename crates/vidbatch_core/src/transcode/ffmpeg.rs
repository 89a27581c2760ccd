//! FFmpeg-backed transcoder.
//!
//! Runs one `ffmpeg` process per job:
//!
//! ```text
//! ffmpeg -hide_banner -nostdin -nostats -y -i <input> \
//!     -vf scale=<W>:<H>,setpts=<F>*PTS -an <output>
//! ```
//!
//! Both output streams are read line by line while the process runs and
//! forwarded to the batch logger, so its tail buffer holds whatever the tool
//! printed last. Only stderr lines make up the error message of a failed run.
//! The exit status is the only success signal.

use std::collections::VecDeque;
use std::ffi::OsString;
use std::io::{self, BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::thread;

use super::job::TranscodeJob;
use super::{TranscodeError, TranscodeResult, Transcoder};
use crate::logging::BatchLogger;

/// Lines of stderr kept for the error message of a failed run.
const FAILURE_TAIL_LINES: usize = 8;

/// Lower and upper bound of a single ffmpeg `atempo` stage.
const ATEMPO_MIN: f64 = 0.5;
const ATEMPO_MAX: f64 = 2.0;

/// Build the `atempo` filter chain that retimes audio to match `speed_factor`.
///
/// Audio has to play `1 / speed_factor` times faster. Each stage is kept
/// within ffmpeg's `[0.5, 2.0]` range.
pub fn atempo_chain(speed_factor: f64) -> String {
    let mut tempo = 1.0 / speed_factor;
    let mut stages = Vec::new();

    while tempo > ATEMPO_MAX {
        stages.push(ATEMPO_MAX);
        tempo /= ATEMPO_MAX;
    }
    while tempo < ATEMPO_MIN {
        stages.push(ATEMPO_MIN);
        tempo /= ATEMPO_MIN;
    }
    stages.push(tempo);

    stages
        .iter()
        .map(|t| format!("atempo={}", t))
        .collect::<Vec<_>>()
        .join(",")
}

/// Build the ffmpeg argument list for `job` (program name excluded).
pub fn build_ffmpeg_args(job: &TranscodeJob) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-hide_banner", "-nostdin", "-nostats", "-y", "-i"]
        .iter()
        .map(OsString::from)
        .collect();
    args.push(job.input_path.clone().into_os_string());

    args.push("-vf".into());
    args.push(format!("scale={},setpts={}", job.scale_arg(), job.setpts_arg()).into());

    if job.drop_audio {
        args.push("-an".into());
    } else {
        args.push("-af".into());
        args.push(atempo_chain(job.speed_factor).into());
    }

    args.push(job.output_path.clone().into_os_string());
    args
}

/// Transcoder that shells out to ffmpeg.
pub struct FfmpegTranscoder {
    program: PathBuf,
    tool_name: String,
    logger: Option<Arc<BatchLogger>>,
}

impl FfmpegTranscoder {
    /// Use `program` (a name on PATH or a path to the binary).
    pub fn new(program: impl Into<PathBuf>) -> Self {
        let program = program.into();
        let tool_name = program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "ffmpeg".to_string());

        Self {
            program,
            tool_name,
            logger: None,
        }
    }

    /// Forward tool output and commands to `logger`.
    pub fn with_logger(mut self, logger: Arc<BatchLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Run `<program> -version` to make sure the tool can be launched.
    pub fn check_available(&self) -> TranscodeResult<()> {
        let status = Command::new(&self.program)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| TranscodeError::Launch {
                tool: self.tool_name.clone(),
                source,
            })?;

        if !status.success() {
            return Err(TranscodeError::failed(
                &self.tool_name,
                status.code(),
                "version check failed",
            ));
        }

        tracing::debug!("{} is available at {}", self.tool_name, self.program.display());
        Ok(())
    }

    fn command_line(&self, args: &[OsString]) -> String {
        std::iter::once(self.program.as_os_str())
            .chain(args.iter().map(|a| a.as_os_str()))
            .map(|a| {
                let a = a.to_string_lossy();
                if a.contains(char::is_whitespace) {
                    format!("\"{}\"", a)
                } else {
                    a.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn forward_line(&self, line: &str, is_stderr: bool) {
        tracing::trace!(target: "vidbatch::ffmpeg", "{}", line);
        if let Some(ref logger) = self.logger {
            logger.output_line(line, is_stderr);
        }
    }
}

/// Call `on_line` for every non-empty line of `reader`, lossily decoded.
fn read_lines(reader: impl Read, mut on_line: impl FnMut(&str)) -> io::Result<()> {
    for chunk in BufReader::new(reader).split(b'\n') {
        let chunk = chunk?;
        let line = String::from_utf8_lossy(&chunk);
        let line = line.trim_end();
        if !line.is_empty() {
            on_line(line);
        }
    }
    Ok(())
}

impl Transcoder for FfmpegTranscoder {
    fn name(&self) -> &str {
        &self.tool_name
    }

    fn transcode(&self, job: &TranscodeJob) -> TranscodeResult<()> {
        let args = build_ffmpeg_args(job);
        let command_line = self.command_line(&args);

        tracing::debug!("Running: {}", command_line);
        if let Some(ref logger) = self.logger {
            logger.command(&command_line);
            logger.clear_tail();
        }

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| TranscodeError::Launch {
                tool: self.tool_name.clone(),
                source,
            })?;

        let mut tail: VecDeque<String> = VecDeque::with_capacity(FAILURE_TAIL_LINES);

        let read_result = thread::scope(|scope| {
            if let Some(stdout) = child.stdout.take() {
                scope.spawn(move || {
                    if let Err(e) = read_lines(stdout, |line| self.forward_line(line, false)) {
                        tracing::debug!("Stopped reading {} stdout: {}", self.tool_name, e);
                    }
                });
            }

            let result = match child.stderr.take() {
                Some(stderr) => read_lines(stderr, |line| {
                    self.forward_line(line, true);
                    if tail.len() >= FAILURE_TAIL_LINES {
                        tail.pop_front();
                    }
                    tail.push_back(line.to_string());
                }),
                None => Ok(()),
            };

            // The stdout reader only sees EOF once the process is gone.
            if result.is_err() {
                let _ = child.kill();
            }
            result
        });

        if let Err(source) = read_result {
            let _ = child.wait();
            return Err(TranscodeError::Io {
                tool: self.tool_name.clone(),
                source,
            });
        }

        let status = child.wait().map_err(|source| TranscodeError::Io {
            tool: self.tool_name.clone(),
            source,
        })?;

        if !status.success() {
            if let Some(ref logger) = self.logger {
                logger.show_tail(&self.tool_name);
            }
            let message = tail.into_iter().collect::<Vec<_>>().join("\n");
            return Err(TranscodeError::failed(&self.tool_name, status.code(), message));
        }

        if !job.output_path.exists() {
            return Err(TranscodeError::OutputMissing(job.output_path.clone()));
        }

        Ok(())
    }
}
