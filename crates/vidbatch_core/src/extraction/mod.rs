//! Materializing archive entries on disk.
//!
//! - **File extraction**: stream an entry into a destination file, creating
//!   parent directories on demand
//! - **Directory creation**: idempotent "create if missing"
//!
//! A failed extraction never leaves a truncated file behind: the partial
//! destination is removed before the error is returned.

mod extractor;
mod types;

pub use extractor::{ensure_directory, extract_to};
pub use types::{ExtractOptions, ExtractedFile, ExtractionError, ExtractionResult};
