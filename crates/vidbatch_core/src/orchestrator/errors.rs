//! Error types for the batch orchestrator.
//!
//! Errors carry context that chains through layers:
//! Batch → Entry → Step → Operation

use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::archive::ArchiveError;
use crate::extraction::ExtractionError;
use crate::models::ConfigValidationError;
use crate::planner::PlanError;
use crate::transcode::TranscodeError;

/// Coarse classification of a batch failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The archive could not be opened or is corrupt.
    ArchiveOpen,
    /// An entry's data could not be read.
    EntryRead,
    /// Writing to the output location failed.
    ExtractionIo,
    /// The external tool failed to launch or reported failure.
    ExternalTool,
    /// An intermediate file could not be removed.
    Cleanup,
    /// An entry could not be mapped to a safe, unique path.
    Plan,
    /// The configuration was rejected.
    Config,
    /// A step's pre- or post-condition did not hold.
    Validation,
}

/// Top-level batch error with batch or entry context.
#[derive(Error, Debug)]
pub enum BatchError {
    /// The configuration failed validation before anything was touched.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigValidationError),

    /// The output root could not be prepared.
    #[error("Batch '{batch_name}' setup failed for '{}': {source}", path.display())]
    Setup {
        batch_name: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The archive could not be opened.
    #[error("Failed to open archive: {source}")]
    Open {
        #[source]
        source: ArchiveError,
    },

    /// A step failed while processing an entry.
    #[error("Entry {index} ('{entry}') failed at step '{step}': {source}")]
    EntryFailed {
        index: usize,
        entry: String,
        step: String,
        #[source]
        source: StepError,
    },
}

impl BatchError {
    /// Create an entry failed error.
    pub fn entry_failed(
        index: usize,
        entry: impl Into<String>,
        step: impl Into<String>,
        source: StepError,
    ) -> Self {
        Self::EntryFailed {
            index,
            entry: entry.into(),
            step: step.into(),
            source,
        }
    }

    /// Create a setup error.
    pub fn setup(batch_name: impl Into<String>, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Setup {
            batch_name: batch_name.into(),
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            BatchError::InvalidConfig(_) => ErrorKind::Config,
            BatchError::Setup { .. } => ErrorKind::ExtractionIo,
            BatchError::Open { .. } => ErrorKind::ArchiveOpen,
            BatchError::EntryFailed { source, .. } => source.kind(),
        }
    }

    /// Index of the entry that failed, if the failure was entry-level.
    pub fn entry_index(&self) -> Option<usize> {
        match self {
            BatchError::EntryFailed { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// Error from an entry step with operation context.
#[derive(Error, Debug)]
pub enum StepError {
    #[error("Planning failed: {0}")]
    Plan(#[from] PlanError),

    #[error("{0}")]
    Archive(#[from] ArchiveError),

    #[error("{0}")]
    Extraction(#[from] ExtractionError),

    #[error("{0}")]
    Transcode(#[from] TranscodeError),

    /// An intermediate file could not be removed.
    #[error("Failed to remove intermediate '{}': {source}", path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Input validation failed.
    #[error("Input validation failed: {0}")]
    InvalidInput(String),

    /// Output validation failed.
    #[error("Output validation failed: {0}")]
    InvalidOutput(String),
}

impl StepError {
    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create an invalid output error.
    pub fn invalid_output(message: impl Into<String>) -> Self {
        Self::InvalidOutput(message.into())
    }

    /// Create a cleanup error.
    pub fn cleanup(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Cleanup {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StepError::Plan(_) => ErrorKind::Plan,
            StepError::Archive(ArchiveError::EntryRead { .. }) => ErrorKind::EntryRead,
            StepError::Archive(_) => ErrorKind::ArchiveOpen,
            StepError::Extraction(e) if e.is_read_error() => ErrorKind::EntryRead,
            StepError::Extraction(_) => ErrorKind::ExtractionIo,
            StepError::Transcode(_) => ErrorKind::ExternalTool,
            StepError::Cleanup { .. } => ErrorKind::Cleanup,
            StepError::InvalidInput(_) | StepError::InvalidOutput(_) => ErrorKind::Validation,
        }
    }
}

/// Result type for step operations.
pub type StepResult<T> = Result<T, StepError>;

/// Result type for batch operations.
pub type BatchResult<T> = Result<T, BatchError>;
