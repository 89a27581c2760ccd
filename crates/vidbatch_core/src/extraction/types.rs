//! Types for extraction operations.

use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Error type for extraction operations.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// A parent or target directory could not be created.
    #[error("Failed to create directory '{}': {source}", path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The destination exists and overwriting was not requested.
    #[error("Refusing to overwrite existing file '{}'", .0.display())]
    AlreadyExists(PathBuf),

    /// The destination file could not be created.
    #[error("Failed to create file '{}': {source}", path.display())]
    CreateFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading the entry stream failed.
    #[error("Failed to read entry data for '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing the destination failed.
    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The destination filesystem is full.
    #[error("Disk full while writing '{}'", path.display())]
    DiskFull { path: PathBuf },
}

impl ExtractionError {
    /// Whether the failure happened on the read side (entry stream).
    pub fn is_read_error(&self) -> bool {
        matches!(self, ExtractionError::Read { .. })
    }
}

/// Result type for extraction operations.
pub type ExtractionResult<T> = Result<T, ExtractionError>;

/// Options controlling file extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Replace a file already present at the destination.
    pub overwrite: bool,
}

impl ExtractOptions {
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

/// A file written by the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedFile {
    /// Where the entry was written.
    pub path: PathBuf,
    /// Bytes copied from the entry stream.
    pub bytes_written: u64,
    /// Whether an existing file was replaced.
    pub replaced_existing: bool,
}
