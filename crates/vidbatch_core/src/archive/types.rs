//! Types for archive access.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

/// Error type for archive operations.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The archive path does not exist.
    #[error("Archive not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The archive file exists but could not be opened.
    #[error("Failed to open archive '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The central directory or an entry header is unreadable.
    #[error("Archive '{archive}' is corrupt: {source}")]
    Corrupt {
        archive: String,
        #[source]
        source: zip::result::ZipError,
    },

    /// An entry's data stream could not be opened.
    #[error("Failed to read entry '{name}': {source}")]
    EntryRead {
        name: String,
        #[source]
        source: zip::result::ZipError,
    },
}

/// Result type for archive operations.
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Snapshot of one record in the archive's central directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// Position in the archive.
    pub index: usize,
    /// Name exactly as stored in the archive.
    pub name: String,
    /// Whether the record is a directory.
    pub is_dir: bool,
    /// Uncompressed size in bytes.
    pub size: u64,
    /// Name as a relative path that cannot escape an extraction root.
    ///
    /// `None` when the stored name is absolute, contains `..` that escapes,
    /// or contains a NUL byte.
    pub safe_path: Option<PathBuf>,
}

impl Entry {
    /// Last path component of the entry name.
    pub fn base_name(&self) -> Option<&str> {
        self.name
            .trim_end_matches(['/', '\\'])
            .rsplit(['/', '\\'])
            .next()
            .filter(|s| !s.is_empty())
    }

    /// Extension of the base name, without the dot, in original case.
    pub fn extension(&self) -> Option<&str> {
        let base = self.base_name()?;
        let (stem, ext) = base.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext)
    }

    pub fn safe_path(&self) -> Option<&Path> {
        self.safe_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> Entry {
        Entry {
            index: 0,
            name: name.to_string(),
            is_dir: name.ends_with('/'),
            size: 0,
            safe_path: Some(PathBuf::from(name)),
        }
    }

    #[test]
    fn base_name_strips_directories() {
        assert_eq!(entry("a/b/clip.mp4").base_name(), Some("clip.mp4"));
        assert_eq!(entry("clip.mp4").base_name(), Some("clip.mp4"));
        assert_eq!(entry("a/b/").base_name(), Some("b"));
        assert_eq!(entry("win\\path\\clip.mp4").base_name(), Some("clip.mp4"));
    }

    #[test]
    fn extension_keeps_case() {
        assert_eq!(entry("CLIP.MP4").extension(), Some("MP4"));
        assert_eq!(entry("a/clip.tar.mp4").extension(), Some("mp4"));
        assert_eq!(entry("README").extension(), None);
        assert_eq!(entry(".mp4").extension(), None);
    }

    #[test]
    fn error_messages_name_the_entry() {
        let err = ArchiveError::EntryRead {
            name: "a/clip.mp4".to_string(),
            source: zip::result::ZipError::FileNotFound,
        };
        assert!(err.to_string().contains("a/clip.mp4"));
    }
}
