//! JSON snapshot file codec.
//!
//! # Responsibility
//! - Serialize the task collection into a pretty-printed JSON array.
//! - Replace the snapshot file via temp file + rename in the same directory.
//! - Read a snapshot back, treating a missing file as "nothing to restore".

use super::{LoadError, PersistError, PersistResult, SnapshotTarget};
use crate::model::task::Task;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Encodes tasks as the on-disk snapshot document.
pub fn encode_snapshot(tasks: &[Task]) -> PersistResult<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(tasks)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Decodes a snapshot document. `path` is only used for error context.
pub fn decode_snapshot(bytes: &[u8], path: &Path) -> Result<Vec<Task>, LoadError> {
    serde_json::from_slice(bytes).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a snapshot file.
///
/// Returns `Ok(None)` when the file does not exist.
///
/// # Errors
/// - `LoadError::Read` for any other I/O failure.
/// - `LoadError::Parse` when the content is not a JSON array of tasks.
pub fn read_snapshot(path: &Path) -> Result<Option<Vec<Task>>, LoadError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(LoadError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    decode_snapshot(&bytes, path).map(Some)
}

/// Snapshot target writing a JSON file on the local filesystem.
#[derive(Debug, Clone)]
pub struct JsonFileTarget {
    path: PathBuf,
}

impl JsonFileTarget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_err(&self, source: std::io::Error) -> PersistError {
        PersistError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl SnapshotTarget for JsonFileTarget {
    fn write_snapshot(&self, tasks: &[Task]) -> PersistResult<()> {
        let bytes = encode_snapshot(tasks)?;

        // The temp file must live next to the target so the rename stays on
        // one filesystem.
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = NamedTempFile::new_in(dir).map_err(|err| self.write_err(err))?;
        file.write_all(&bytes).map_err(|err| self.write_err(err))?;
        file.as_file()
            .sync_all()
            .map_err(|err| self.write_err(err))?;
        file.persist(&self.path)
            .map_err(|err| self.write_err(err.error))?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
