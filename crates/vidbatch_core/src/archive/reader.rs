//! Zip archive reader.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use super::types::{ArchiveError, ArchiveResult, Entry};

/// Sequential source of archive entries and their byte streams.
///
/// Object safe so the orchestrator does not depend on the reader type.
pub trait EntrySource {
    /// Entries in archive order.
    fn entries(&self) -> &[Entry];

    /// Open the data stream of `entry`.
    fn open_stream(&mut self, entry: &Entry) -> ArchiveResult<Box<dyn Read + '_>>;

    /// Human-readable origin, for logs and reports.
    fn label(&self) -> &str {
        "archive"
    }
}

/// A zip archive opened for reading.
///
/// Owns the underlying reader; dropping the value releases the file handle.
pub struct ZipArchiveReader<R: Read + Seek> {
    archive: zip::ZipArchive<R>,
    /// Human-readable origin used in error messages.
    label: String,
    entries: Vec<Entry>,
}

impl ZipArchiveReader<BufReader<File>> {
    /// Open the archive at `path`.
    pub fn open(path: &Path) -> ArchiveResult<Self> {
        if !path.exists() {
            return Err(ArchiveError::NotFound(path.to_path_buf()));
        }

        let file = File::open(path).map_err(|source| ArchiveError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        Self::with_label(BufReader::new(file), path.display().to_string())
    }
}

impl<R: Read + Seek> ZipArchiveReader<R> {
    /// Read an archive from any seekable reader.
    pub fn from_reader(reader: R) -> ArchiveResult<Self> {
        Self::with_label(reader, "<reader>".to_string())
    }

    fn with_label(reader: R, label: String) -> ArchiveResult<Self> {
        let mut archive = zip::ZipArchive::new(reader).map_err(|source| ArchiveError::Corrupt {
            archive: label.clone(),
            source,
        })?;

        let mut entries = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            // Raw access reads the header without preparing decompression.
            let file = archive
                .by_index_raw(index)
                .map_err(|source| ArchiveError::Corrupt {
                    archive: label.clone(),
                    source,
                })?;

            entries.push(Entry {
                index,
                name: file.name().to_string(),
                is_dir: file.is_dir(),
                size: file.size(),
                safe_path: file.enclosed_name().map(|p| p.to_path_buf()),
            });
        }

        tracing::debug!("Opened archive {} with {} entries", label, entries.len());

        Ok(Self {
            archive,
            label,
            entries,
        })
    }
}

impl<R: Read + Seek> EntrySource for ZipArchiveReader<R> {
    fn entries(&self) -> &[Entry] {
        &self.entries
    }

    fn open_stream(&mut self, entry: &Entry) -> ArchiveResult<Box<dyn Read + '_>> {
        let file = self
            .archive
            .by_index(entry.index)
            .map_err(|source| ArchiveError::EntryRead {
                name: entry.name.clone(),
                source,
            })?;
        Ok(Box::new(file))
    }

    fn label(&self) -> &str {
        &self.label
    }
}
