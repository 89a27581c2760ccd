//! Logging infrastructure for vidbatch.
//!
//! This module provides:
//! - A per-batch logger with optional file + line callback output
//! - Compact mode that keeps tool output in a tail buffer
//! - Integration with the `tracing` ecosystem
//!
//! # Example
//!
//! ```no_run
//! use vidbatch_core::logging::{BatchLogger, LogConfig};
//!
//! let logger = BatchLogger::builder("clips")
//!     .log_dir("/tmp/vidbatch-logs")
//!     .config(LogConfig::default())
//!     .build()
//!     .unwrap();
//!
//! logger.phase("clips.zip");
//! logger.command("ffmpeg -i in.mp4 ...");
//! logger.success("Batch completed");
//! ```

mod batch_logger;
mod types;

pub use batch_logger::{BatchLogger, BatchLoggerBuilder};
pub use types::{LineCallback, LogConfig, LogLevel, MessagePrefix};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// Respects `RUST_LOG`, falling back to `default_level`. Output goes to
/// stderr. Calling it twice is a no-op.
pub fn init_tracing(default_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_str()));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .try_init();
}

/// Initialize tracing for tests (only logs warnings and above).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_tracing_twice_does_not_panic() {
        init_tracing(LogLevel::Warn);
        init_tracing(LogLevel::Debug);
    }
}
