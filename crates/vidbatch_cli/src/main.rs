//! vidbatch - rescale and retime every video inside a zip archive.

mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use vidbatch_core::config::ConfigManager;
use vidbatch_core::logging::{init_tracing, BatchLogger, LogConfig, LogLevel};
use vidbatch_core::orchestrator::{BatchContext, BatchRunner};
use vidbatch_core::transcode::FfmpegTranscoder;

use cli::Args;

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", render_chain(&err));
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    init_tracing(if args.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Warn
    });

    let mut settings = ConfigManager::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;
    args.apply_to(&mut settings);
    tracing::debug!("Effective settings: {:?}", settings);

    let config = settings.to_processing_config(&args.output);
    let log_config = if args.verbose {
        LogConfig::verbose()
    } else {
        settings.log_config()
    };

    let batch_name = args.batch_name();
    let mut builder = BatchLogger::builder(&batch_name)
        .config(log_config)
        .callback(Box::new(|line| eprintln!("{}", line)));
    if let Some(ref dir) = args.log_dir {
        builder = builder.log_dir(dir);
    }
    let logger = Arc::new(builder.build().context("Failed to create batch log file")?);

    let ffmpeg = FfmpegTranscoder::new(&config.ffmpeg).with_logger(Arc::clone(&logger));
    ffmpeg
        .check_available()
        .with_context(|| format!("Cannot run {}", config.ffmpeg.display()))?;

    let ctx = BatchContext::new(config, batch_name, logger, Arc::new(ffmpeg));
    let report = BatchRunner::new(ctx).run(&args.zip)?;

    if args.json {
        println!("{}", report.to_json()?);
        eprintln!("All videos processed successfully!");
    } else {
        println!("All videos processed successfully!");
    }

    Ok(())
}

/// Top-level message plus any causes it does not already spell out.
fn render_chain(err: &anyhow::Error) -> String {
    let mut rendered = err.to_string();
    for cause in err.chain().skip(1) {
        let text = cause.to_string();
        if !rendered.contains(&text) {
            rendered.push_str(": ");
            rendered.push_str(&text);
        }
    }
    rendered
}
