//! Stream-to-file extraction.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;

use super::types::{ExtractOptions, ExtractedFile, ExtractionError, ExtractionResult};

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Create `path` and its parents if missing.
///
/// Returns `true` when the directory did not exist before.
pub fn ensure_directory(path: &Path) -> ExtractionResult<bool> {
    if path.is_dir() {
        return Ok(false);
    }

    fs::create_dir_all(path).map_err(|source| ExtractionError::CreateDirectory {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(true)
}

/// Copy `stream` into a new file at `dest`.
///
/// Missing parent directories are created. An existing destination is an
/// error unless `options.overwrite` is set. On failure the partially written
/// destination is removed.
pub fn extract_to(
    stream: &mut dyn Read,
    dest: &Path,
    options: &ExtractOptions,
) -> ExtractionResult<ExtractedFile> {
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }

    let existed = dest.exists();
    if existed && !options.overwrite {
        return Err(ExtractionError::AlreadyExists(dest.to_path_buf()));
    }

    let mut file = open_destination(dest, options)?;

    match copy_stream(stream, &mut file, dest) {
        Ok(bytes_written) => Ok(ExtractedFile {
            path: dest.to_path_buf(),
            bytes_written,
            replaced_existing: existed,
        }),
        Err(err) => {
            drop(file);
            if let Err(e) = fs::remove_file(dest) {
                tracing::warn!(
                    "Could not remove partial file {}: {}",
                    dest.display(),
                    e
                );
            }
            Err(err)
        }
    }
}

fn open_destination(dest: &Path, options: &ExtractOptions) -> ExtractionResult<File> {
    let result = if options.overwrite {
        File::create(dest)
    } else {
        OpenOptions::new().write(true).create_new(true).open(dest)
    };

    result.map_err(|source| {
        if source.kind() == io::ErrorKind::AlreadyExists {
            ExtractionError::AlreadyExists(dest.to_path_buf())
        } else {
            ExtractionError::CreateFile {
                path: dest.to_path_buf(),
                source,
            }
        }
    })
}

/// Copy loop that keeps read and write failures apart.
fn copy_stream(stream: &mut dyn Read, file: &mut File, dest: &Path) -> ExtractionResult<u64> {
    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    let mut total = 0u64;

    loop {
        let read = match stream.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(ExtractionError::Read {
                    path: dest.to_path_buf(),
                    source,
                })
            }
        };

        file.write_all(&buffer[..read])
            .map_err(|source| write_error(dest, source))?;
        total += read as u64;
    }

    file.flush().map_err(|source| write_error(dest, source))?;
    Ok(total)
}

fn write_error(dest: &Path, source: io::Error) -> ExtractionError {
    if source.kind() == io::ErrorKind::StorageFull {
        ExtractionError::DiskFull {
            path: dest.to_path_buf(),
        }
    } else {
        ExtractionError::Write {
            path: dest.to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    /// Yields some bytes, then fails.
    struct FailingReader {
        sent: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.sent {
                return Err(io::Error::new(io::ErrorKind::InvalidData, "crc mismatch"));
            }
            self.sent = true;
            buf[..4].copy_from_slice(b"part");
            Ok(4)
        }
    }

    #[test]
    fn creates_missing_parents() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("a/b/clip.mp4");

        let extracted = extract_to(
            &mut Cursor::new(b"frames".to_vec()),
            &dest,
            &ExtractOptions::default(),
        )
        .unwrap();

        assert_eq!(extracted.bytes_written, 6);
        assert!(!extracted.replaced_existing);
        assert_eq!(fs::read(&dest).unwrap(), b"frames");
    }

    #[test]
    fn refuses_to_overwrite_by_default() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("clip.mp4");
        fs::write(&dest, b"old").unwrap();

        let result = extract_to(
            &mut Cursor::new(b"new".to_vec()),
            &dest,
            &ExtractOptions::default(),
        );

        assert!(matches!(result, Err(ExtractionError::AlreadyExists(_))));
        assert_eq!(fs::read(&dest).unwrap(), b"old");
    }

    #[test]
    fn overwrites_when_asked() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("clip.mp4");
        fs::write(&dest, b"old-and-longer").unwrap();

        let extracted = extract_to(
            &mut Cursor::new(b"new".to_vec()),
            &dest,
            &ExtractOptions::default().overwrite(true),
        )
        .unwrap();

        assert!(extracted.replaced_existing);
        assert_eq!(fs::read(&dest).unwrap(), b"new");
    }

    #[test]
    fn read_failure_removes_partial_file() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("clip.mp4");

        let err = extract_to(
            &mut FailingReader { sent: false },
            &dest,
            &ExtractOptions::default(),
        )
        .unwrap_err();

        assert!(err.is_read_error());
        assert!(!dest.exists());
    }

    #[test]
    fn ensure_directory_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("x/y");

        assert!(ensure_directory(&path).unwrap());
        assert!(!ensure_directory(&path).unwrap());
        assert!(path.is_dir());
    }

    #[test]
    fn directory_blocked_by_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("taken");
        fs::write(&path, b"").unwrap();

        assert!(matches!(
            ensure_directory(&path),
            Err(ExtractionError::CreateDirectory { .. })
        ));
    }
}
