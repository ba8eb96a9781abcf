#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use taskstore_core::{Clock, TaskStore};

/// Deterministic clock advanced by hand.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()),
        })
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// In-memory store driven by a fresh manual clock.
pub fn manual_store() -> (TaskStore, Arc<ManualClock>) {
    let clock = ManualClock::new();
    (TaskStore::with_clock(clock.clone()), clock)
}

/// Creates `count` tasks; every third one is marked done.
pub fn seed(store: &TaskStore, count: usize) {
    for index in 0..count {
        let task = store.create(&format!("task number {index}")).unwrap();
        if index % 3 == 0 {
            store.update(task.id, &task.title, true).unwrap();
        }
    }
}
