//! Task use-case service.
//!
//! # Responsibility
//! - Bootstrap a persistent store from its snapshot file before serving calls.
//! - Provide stable CRUD entry points for facades (CLI, transports).
//!
//! # Invariants
//! - Service APIs never bypass store validation or locking.
//! - A failed bootstrap load is either logged and tolerated or returned,
//!   as chosen by `LoadPolicy`.

use crate::clock::{Clock, SystemClock};
use crate::model::task::{Task, TaskId};
use crate::persist::{JsonFileTarget, LoadError, PersistError};
use crate::repo::task_repo::{StoreResult, TaskListQuery, TaskStore};
use log::{error, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// What to do when the snapshot file exists but cannot be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Log the failure and start with an empty store.
    #[default]
    Continue,
    /// Return the failure to the caller.
    Abort,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Shared-handle service wrapper around a [`TaskStore`].
#[derive(Clone)]
pub struct TaskService {
    store: Arc<TaskStore>,
    data_file: Option<PathBuf>,
}

impl TaskService {
    /// Wraps an existing store.
    pub fn new(store: Arc<TaskStore>) -> Self {
        Self {
            store,
            data_file: None,
        }
    }

    /// Opens a store mirrored to `data_file`, restoring its previous content.
    ///
    /// # Errors
    /// - `ServiceError::Persist` when the persistence worker cannot start.
    /// - `ServiceError::Load` when loading fails and `policy` is `Abort`.
    pub fn open(data_file: &Path, policy: LoadPolicy) -> Result<Self, ServiceError> {
        Self::open_with_clock(data_file, policy, Arc::new(SystemClock))
    }

    /// Same as [`TaskService::open`] with an explicit time source.
    pub fn open_with_clock(
        data_file: &Path,
        policy: LoadPolicy,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ServiceError> {
        let target = Arc::new(JsonFileTarget::new(data_file));
        let store = TaskStore::persistent(target, clock)?;

        if let Err(err) = store.load_from_file(data_file) {
            match policy {
                LoadPolicy::Continue => warn!(
                    "event=store_load module=service status=error policy=continue source={} error={}",
                    data_file.display(),
                    err
                ),
                LoadPolicy::Abort => {
                    error!(
                        "event=store_load module=service status=error policy=abort source={} error={}",
                        data_file.display(),
                        err
                    );
                    return Err(err.into());
                }
            }
        }

        Ok(Self {
            store: Arc::new(store),
            data_file: Some(data_file.to_path_buf()),
        })
    }

    /// Snapshot file backing this service, if any.
    pub fn data_file(&self) -> Option<&Path> {
        self.data_file.as_deref()
    }

    /// Shared handle to the underlying store.
    pub fn store(&self) -> &Arc<TaskStore> {
        &self.store
    }

    pub fn create_task(&self, title: &str) -> StoreResult<Task> {
        self.store.create(title)
    }

    pub fn get_task(&self, id: TaskId) -> StoreResult<Task> {
        self.store.get(id)
    }

    pub fn update_task(&self, id: TaskId, title: &str, done: bool) -> StoreResult<Task> {
        self.store.update(id, title, done)
    }

    pub fn delete_task(&self, id: TaskId) -> StoreResult<()> {
        self.store.delete(id)
    }

    /// Lists one page of tasks; see [`TaskStore::list_paginated`].
    pub fn list_tasks(&self, query: &TaskListQuery) -> Vec<Task> {
        self.store.list_page(query)
    }

    /// Waits for pending snapshot writes. Facades call this before exiting.
    pub fn flush(&self) {
        self.store.flush();
    }
}
