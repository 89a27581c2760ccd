use std::path::PathBuf;

use clap::Parser;
use vidbatch_core::config::Settings;
use vidbatch_core::models::NamingPolicy;

/// Command-line arguments for vidbatch.
///
/// Transform options are optional so that a value from `--config` is only
/// replaced when the flag is actually given.
#[derive(Parser, Debug)]
#[command(name = "vidbatch")]
#[command(version)]
#[command(about = "Rescale and retime every video inside a zip archive")]
#[command(long_about = "Extracts a zip archive into an output directory and runs \
    each matching video through ffmpeg (scale + setpts, audio dropped).\n\n\
    EXAMPLES:\n    \
    vidbatch --zip clips.zip --output out\n    \
    vidbatch --zip clips.zip --output out --width 1280 --height 720 --speed 0.25\n    \
    vidbatch --zip clips.zip --output out --policy flat --json")]
pub struct Args {
    /// Input zip archive
    #[arg(long)]
    pub zip: PathBuf,

    /// Output directory (created if missing)
    #[arg(long)]
    pub output: PathBuf,

    /// Target width in pixels [default: 540]
    #[arg(long)]
    pub width: Option<u32>,

    /// Target height in pixels [default: 410]
    #[arg(long)]
    pub height: Option<u32>,

    /// Presentation timestamp multiplier (0.5 = twice as fast), at least 0.01
    /// with at most two decimals [default: 0.5]
    #[arg(long)]
    pub speed: Option<f64>,

    /// Naming policy: mirrored or flat [default: mirrored]
    #[arg(long)]
    pub policy: Option<NamingPolicy>,

    /// Video extension to process, repeatable [default: mp4]
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Keep the audio stream, retimed to the new speed
    #[arg(long)]
    pub keep_audio: bool,

    /// Fail instead of replacing files that already exist in the output
    #[arg(long)]
    pub no_overwrite: bool,

    /// ffmpeg executable [default: ffmpeg]
    #[arg(long)]
    pub ffmpeg: Option<String>,

    /// TOML settings file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write a batch log file into this directory
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Debug logging with live ffmpeg output
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the batch report as JSON
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Overlay the flags that were given onto `settings`.
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(width) = self.width {
            settings.transcode.width = width;
        }
        if let Some(height) = self.height {
            settings.transcode.height = height;
        }
        if let Some(speed) = self.speed {
            settings.transcode.speed = speed;
        }
        if !self.extensions.is_empty() {
            settings.transcode.extensions = self.extensions.clone();
        }
        if self.keep_audio {
            settings.transcode.drop_audio = false;
        }
        if let Some(policy) = self.policy {
            settings.output.policy = policy;
        }
        if self.no_overwrite {
            settings.output.overwrite_extracted = false;
        }
        if let Some(ref ffmpeg) = self.ffmpeg {
            settings.tools.ffmpeg = ffmpeg.clone();
        }
    }

    /// Name of the batch, from the archive's file stem.
    pub fn batch_name(&self) -> String {
        self.zip
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "batch".to_string())
    }
}
