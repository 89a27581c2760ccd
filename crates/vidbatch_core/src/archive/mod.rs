//! Read-only access to zip archives.
//!
//! The archive is opened once, its entry table is snapshotted in archive
//! order, and each entry's bytes are streamed on demand. The underlying
//! reader is owned by [`ZipArchiveReader`] and released when it drops.

mod reader;
mod types;

pub use reader::{EntrySource, ZipArchiveReader};
pub use types::{ArchiveError, ArchiveResult, Entry};
