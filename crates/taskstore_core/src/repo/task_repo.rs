//! In-memory task store with background snapshot mirroring.
//!
//! # Responsibility
//! - Provide thread-safe CRUD and paginated listing over the task collection.
//! - Own the id generator and keep it ahead of every id ever handed out.
//! - Trigger a background persist after every successful mutation.
//!
//! # Invariants
//! - One `RwLock` guards both the collection and the id generator.
//! - Write paths validate titles before taking the lock.
//! - Callers only ever receive owned copies of records.
//! - No I/O happens while the lock is held.

use crate::clock::{Clock, SystemClock};
use crate::model::task::{validate_title, Task, TaskId, TitleValidationError};
use crate::persist::{
    read_snapshot, LoadError, PersistResult, PersistenceSidecar, SnapshotTarget,
};
use chrono::Duration;
use log::{info, trace};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Page number used when the caller passes `page < 1`.
pub const DEFAULT_PAGE: i64 = 1;
/// Page size used when the caller passes `limit < 1`.
pub const DEFAULT_LIMIT: i64 = 10;
/// Upper bound for the page size.
pub const MAX_LIMIT: i64 = 100;

pub type StoreResult<T> = Result<T, StoreError>;

/// Caller-visible store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error(transparent)]
    InvalidTitle(#[from] TitleValidationError),
    #[error("task not found: {0}")]
    NotFound(TaskId),
    #[error("task id space exhausted")]
    IdSpaceExhausted,
}

/// Listing options: pagination plus an optional `done` filter.
///
/// Out-of-range values are normalized by [`TaskListQuery::normalized`] rather
/// than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskListQuery {
    pub page: i64,
    pub limit: i64,
    pub done: Option<bool>,
}

impl Default for TaskListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            done: None,
        }
    }
}

impl TaskListQuery {
    pub fn new(page: i64, limit: i64, done: Option<bool>) -> Self {
        Self { page, limit, done }
    }

    /// Applies page/limit defaults and the limit cap.
    pub fn normalized(self) -> Self {
        let page = if self.page < 1 { DEFAULT_PAGE } else { self.page };
        let limit = if self.limit < 1 {
            DEFAULT_LIMIT
        } else {
            self.limit.min(MAX_LIMIT)
        };
        Self {
            page,
            limit,
            done: self.done,
        }
    }

    /// Offset into the filtered set, or `None` when it does not fit in `usize`.
    fn offset(&self) -> Option<usize> {
        let offset = (self.page - 1).checked_mul(self.limit)?;
        usize::try_from(offset).ok()
    }

    fn matches(&self, task: &Task) -> bool {
        self.done.map_or(true, |done| task.done == done)
    }
}

#[derive(Debug, Default)]
struct StoreState {
    items: BTreeMap<TaskId, Task>,
    last_id: TaskId,
}

/// Authoritative in-memory task collection.
///
/// Share it across threads behind an `Arc`. Records are kept in a `BTreeMap`,
/// so every listing is ordered by ascending id.
pub struct TaskStore {
    state: Arc<RwLock<StoreState>>,
    clock: Arc<dyn Clock>,
    sidecar: Option<PersistenceSidecar>,
}

impl TaskStore {
    /// Creates a store without background persistence, using wall-clock time.
    pub fn in_memory() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates a store without background persistence.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState::default())),
            clock,
            sidecar: None,
        }
    }

    /// Creates a store that mirrors every mutation to `target`.
    ///
    /// # Errors
    /// - Returns `PersistError::Spawn` when the persistence worker cannot start.
    pub fn persistent(
        target: Arc<dyn SnapshotTarget>,
        clock: Arc<dyn Clock>,
    ) -> PersistResult<Self> {
        let state = Arc::new(RwLock::new(StoreState::default()));
        let snapshot_state = Arc::clone(&state);
        let sidecar = PersistenceSidecar::spawn(target, move || {
            snapshot_state.read().items.values().cloned().collect()
        })?;

        Ok(Self {
            state,
            clock,
            sidecar: Some(sidecar),
        })
    }

    /// Creates a task with a freshly allocated id.
    ///
    /// # Errors
    /// - `InvalidTitle` when the title length is out of range.
    /// - `IdSpaceExhausted` when the generator has reached `TaskId::MAX`; the
    ///   store is left unchanged.
    pub fn create(&self, title: &str) -> StoreResult<Task> {
        validate_title(title)?;

        let task = {
            let mut state = self.state.write();
            let id = state
                .last_id
                .checked_add(1)
                .ok_or(StoreError::IdSpaceExhausted)?;
            state.last_id = id;
            let task = Task::new(id, title, self.clock.now());
            state.items.insert(task.id, task.clone());
            task
        };

        info!(
            "event=task_create module=repo status=ok task_id={}",
            task.id
        );
        self.schedule_persist();
        Ok(task)
    }

    /// Returns a copy of the task with `id`.
    pub fn get(&self, id: TaskId) -> StoreResult<Task> {
        self.state
            .read()
            .items
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    /// Replaces title and done flag of an existing task.
    ///
    /// The title is validated before the lookup, so an invalid title reports
    /// `InvalidTitle` even for an unknown id.
    pub fn update(&self, id: TaskId, title: &str, done: bool) -> StoreResult<Task> {
        validate_title(title)?;

        let task = {
            let mut state = self.state.write();
            let task = state.items.get_mut(&id).ok_or(StoreError::NotFound(id))?;
            let now = self.clock.now();
            task.updated_at = if now > task.updated_at {
                now
            } else {
                task.updated_at + Duration::nanoseconds(1)
            };
            task.title = title.to_string();
            task.done = done;
            task.clone()
        };

        info!(
            "event=task_update module=repo status=ok task_id={} done={}",
            task.id, task.done
        );
        self.schedule_persist();
        Ok(task)
    }

    /// Removes the task with `id`. Its id is never handed out again.
    pub fn delete(&self, id: TaskId) -> StoreResult<()> {
        {
            let mut state = self.state.write();
            if state.items.remove(&id).is_none() {
                return Err(StoreError::NotFound(id));
            }
        }

        info!("event=task_delete module=repo status=ok task_id={}", id);
        self.schedule_persist();
        Ok(())
    }

    /// Returns copies of all tasks, ordered by id.
    pub fn list(&self) -> Vec<Task> {
        self.state.read().items.values().cloned().collect()
    }

    /// Filters by `done`, then returns one page of the filtered set.
    ///
    /// `page < 1` means page 1, `limit < 1` means 10, and `limit` is capped
    /// at 100. A page past the end yields an empty vector.
    pub fn list_paginated(&self, page: i64, limit: i64, done: Option<bool>) -> Vec<Task> {
        self.list_page(&TaskListQuery::new(page, limit, done))
    }

    /// Query-struct form of [`TaskStore::list_paginated`].
    pub fn list_page(&self, query: &TaskListQuery) -> Vec<Task> {
        let query = query.normalized();
        let Some(offset) = query.offset() else {
            return Vec::new();
        };
        // Normalized limit is within 1..=MAX_LIMIT.
        let limit = query.limit as usize;

        self.state
            .read()
            .items
            .values()
            .filter(|task| query.matches(task))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Number of tasks currently stored.
    pub fn len(&self) -> usize {
        self.state.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().items.is_empty()
    }

    /// Restores tasks from a snapshot file.
    ///
    /// Returns the number of restored tasks; a missing file restores nothing.
    ///
    /// # Errors
    /// - `LoadError::Read` / `LoadError::Parse` for unreadable or malformed files.
    /// - `LoadError::InvalidData` when a record breaks a task invariant.
    pub fn load_from_file(&self, path: &Path) -> Result<usize, LoadError> {
        match read_snapshot(path)? {
            Some(tasks) => self.load_tasks(tasks),
            None => {
                info!(
                    "event=store_load module=repo status=ok source={} tasks=0 reason=missing",
                    path.display()
                );
                Ok(0)
            }
        }
    }

    /// Inserts a batch of previously persisted tasks.
    ///
    /// All records are validated before any is inserted. The id generator is
    /// advanced to at least the largest restored id. Does not trigger a persist.
    /// Loaded records never replace live ones.
    ///
    /// # Errors
    /// - `LoadError::InvalidData` for a non-positive id, an invalid title,
    ///   `updatedAt < createdAt`, an id repeated within the batch, an id
    ///   already present in the store, or `TaskId::MAX` (no id would be left
    ///   for the next create).
    pub fn load_tasks(&self, tasks: Vec<Task>) -> Result<usize, LoadError> {
        let mut seen = HashSet::with_capacity(tasks.len());
        for task in &tasks {
            task.validate().map_err(LoadError::InvalidData)?;
            if task.id == TaskId::MAX {
                return Err(LoadError::InvalidData(format!(
                    "task id {} leaves no room for new ids",
                    task.id
                )));
            }
            if !seen.insert(task.id) {
                return Err(LoadError::InvalidData(format!(
                    "duplicate task id {}",
                    task.id
                )));
            }
        }

        let count = tasks.len();
        let mut state = self.state.write();
        if let Some(task) = tasks.iter().find(|task| state.items.contains_key(&task.id)) {
            return Err(LoadError::InvalidData(format!(
                "task id {} already present",
                task.id
            )));
        }
        for task in tasks {
            state.last_id = state.last_id.max(task.id);
            state.items.insert(task.id, task);
        }
        let last_id = state.last_id;
        drop(state);

        info!(
            "event=store_load module=repo status=ok tasks={} last_id={}",
            count, last_id
        );
        Ok(count)
    }

    /// Blocks until every persist scheduled so far has been written.
    ///
    /// No-op for stores without background persistence.
    pub fn flush(&self) {
        if let Some(sidecar) = &self.sidecar {
            sidecar.flush();
        }
    }

    fn schedule_persist(&self) {
        match &self.sidecar {
            Some(sidecar) => sidecar.schedule(),
            None => trace!("event=persist_schedule module=repo status=skipped reason=in_memory"),
        }
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::in_memory()
    }
}
