//! Batch orchestrator.
//!
//! Walks an archive's entries in order and runs every file entry through a
//! fixed sequence of steps. The first failure stops the batch.
//!
//! # Architecture
//!
//! ```text
//! BatchRunner
//!     └── for each entry (archive order)
//!         ├── PathPlanner::plan
//!         ├── directory → ensure_directory
//!         └── file
//!             ├── Step: Extract
//!             ├── Step: Transcode
//!             └── Step: Cleanup (flat policy)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use vidbatch_core::orchestrator::{BatchContext, BatchRunner};
//!
//! let ctx = BatchContext::new(config, "clips", logger, Arc::new(ffmpeg));
//! let report = BatchRunner::new(ctx).run(Path::new("clips.zip"))?;
//! println!("{} outputs", report.outputs_produced());
//! ```

mod batch;
mod errors;
mod step;
pub mod steps;
mod types;

pub use batch::BatchRunner;
pub use errors::{BatchError, BatchResult, ErrorKind, StepError, StepResult};
pub use step::EntryStep;
pub use steps::{CleanupStep, ExtractStep, TranscodeStep};
pub use types::{BatchContext, BatchPhase, BatchReport, EntryState, SkippedEntry, StepOutcome};
