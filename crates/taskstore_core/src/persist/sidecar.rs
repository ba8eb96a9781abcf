//! Background snapshot writer.
//!
//! # Responsibility
//! - Accept fire-and-forget persist requests from store mutations.
//! - Coalesce bursts into a single pending write and serialize all writes.
//!
//! # Invariants
//! - `schedule()` never blocks on I/O.
//! - Writes happen one at a time, so an older snapshot never lands after a
//!   newer one.
//! - Dropping the sidecar drains outstanding requests before the worker exits.
//! - A panicking target is contained to the write that raised it; the worker
//!   keeps serving requests and `flush()` still returns.

use super::{PersistError, PersistResult, SnapshotTarget};
use crate::model::task::Task;
use log::{debug, error, info};
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

const WORKER_THREAD_NAME: &str = "taskstore-persist";

/// Request bookkeeping shared between callers and the worker.
///
/// `requested` grows on every schedule, `taken` marks the request generation
/// the worker is currently writing, `completed` the last one it finished.
#[derive(Debug, Default)]
struct Slot {
    requested: u64,
    taken: u64,
    completed: u64,
    shutdown: bool,
}

impl Slot {
    fn has_pending(&self) -> bool {
        self.taken < self.requested
    }
}

#[derive(Default)]
struct Shared {
    slot: Mutex<Slot>,
    wake: Condvar,
    drained: Condvar,
}

/// Single-slot persistence worker owned by a task store.
pub struct PersistenceSidecar {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
    target_label: String,
}

impl PersistenceSidecar {
    /// Starts the worker thread.
    ///
    /// `snapshot` is called on the worker thread and must copy the collection
    /// under its own read lock.
    ///
    /// # Errors
    /// - Returns `PersistError::Spawn` when the OS refuses to start the thread.
    pub fn spawn<F>(target: Arc<dyn SnapshotTarget>, snapshot: F) -> PersistResult<Self>
    where
        F: Fn() -> Vec<Task> + Send + 'static,
    {
        let shared = Arc::new(Shared::default());
        let target_label = target.describe();
        let worker_shared = Arc::clone(&shared);

        let worker = std::thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || run_worker(&worker_shared, target.as_ref(), &snapshot))
            .map_err(PersistError::Spawn)?;

        info!(
            "event=sidecar_start module=persist status=ok target={}",
            target_label
        );

        Ok(Self {
            shared,
            worker: Some(worker),
            target_label,
        })
    }

    /// Requests a snapshot write and returns immediately.
    pub fn schedule(&self) {
        let mut slot = self.shared.slot.lock();
        slot.requested += 1;
        self.shared.wake.notify_one();
    }

    /// Blocks until every request scheduled before this call has been written
    /// (or has failed and been logged).
    pub fn flush(&self) {
        let mut slot = self.shared.slot.lock();
        let target = slot.requested;
        while slot.completed < target {
            self.shared.drained.wait(&mut slot);
        }
    }

    pub fn target_label(&self) -> &str {
        &self.target_label
    }
}

impl Drop for PersistenceSidecar {
    fn drop(&mut self) {
        {
            let mut slot = self.shared.slot.lock();
            slot.shutdown = true;
            self.shared.wake.notify_one();
        }

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!(
                    "event=sidecar_stop module=persist status=error target={} error=worker_panicked",
                    self.target_label
                );
                return;
            }
        }

        info!(
            "event=sidecar_stop module=persist status=ok target={}",
            self.target_label
        );
    }
}

fn run_worker<F>(shared: &Shared, target: &dyn SnapshotTarget, snapshot: &F)
where
    F: Fn() -> Vec<Task>,
{
    let mut slot = shared.slot.lock();
    loop {
        while !slot.has_pending() && !slot.shutdown {
            shared.wake.wait(&mut slot);
        }
        if !slot.has_pending() {
            break;
        }

        // Everything requested so far is covered by the snapshot taken below.
        let generation = slot.requested;
        slot.taken = generation;
        MutexGuard::unlocked(&mut slot, || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| write_once(target, snapshot)));
            if outcome.is_err() {
                error!(
                    "event=persist_write module=persist status=error target={} error=panic",
                    target.describe()
                );
            }
        });
        slot.completed = generation;
        shared.drained.notify_all();
    }
}

fn write_once<F>(target: &dyn SnapshotTarget, snapshot: &F)
where
    F: Fn() -> Vec<Task>,
{
    let started_at = Instant::now();
    let tasks = snapshot();

    match target.write_snapshot(&tasks) {
        Ok(()) => debug!(
            "event=persist_write module=persist status=ok target={} tasks={} duration_ms={}",
            target.describe(),
            tasks.len(),
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=persist_write module=persist status=error target={} tasks={} duration_ms={} error={}",
            target.describe(),
            tasks.len(),
            started_at.elapsed().as_millis(),
            err
        ),
    }
}
