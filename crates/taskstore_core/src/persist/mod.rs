//! Snapshot persistence for the task store.
//!
//! # Responsibility
//! - Encode/decode the full task collection as a JSON snapshot file.
//! - Mirror the store to a durable target in the background after mutations.
//!
//! # Invariants
//! - Snapshot files are replaced atomically; a load never observes a torn write.
//! - Background write failures are logged, never propagated to mutation callers.
//! - No snapshot I/O happens while the store lock is held.

use crate::model::task::Task;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

mod sidecar;
mod snapshot;

pub use sidecar::PersistenceSidecar;
pub use snapshot::{decode_snapshot, encode_snapshot, read_snapshot, JsonFileTarget};

pub type PersistResult<T> = Result<T, PersistError>;

/// Errors raised while writing a snapshot.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write snapshot `{}`: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to spawn persistence worker: {0}")]
    Spawn(#[source] io::Error),
}

/// Errors raised while restoring a snapshot at bootstrap.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read snapshot `{}`: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse snapshot `{}`: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid persisted task data: {0}")]
    InvalidData(String),
}

/// Durable medium the persistence worker writes full snapshots to.
pub trait SnapshotTarget: Send + Sync {
    /// Replaces the persisted snapshot with `tasks`.
    fn write_snapshot(&self, tasks: &[Task]) -> PersistResult<()>;

    /// Short human-readable label used in log events.
    fn describe(&self) -> String;
}
