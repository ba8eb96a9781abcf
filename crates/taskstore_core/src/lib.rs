//! Core logic for the task store.
//! This crate is the single source of truth for task invariants.

pub mod clock;
pub mod config;
pub mod logging;
pub mod model;
pub mod persist;
pub mod repo;
pub mod service;

pub use clock::{Clock, SystemClock};
pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::task::{validate_title, Task, TaskId, TitleValidationError};
pub use persist::{JsonFileTarget, LoadError, PersistError, SnapshotTarget};
pub use repo::task_repo::{StoreError, StoreResult, TaskListQuery, TaskStore};
pub use service::task_service::{LoadPolicy, ServiceError, TaskService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
