//! Domain model for the task store.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every task is identified by a store-assigned positive `TaskId`.
//! - Deletion erases the record; ids are never handed out again.

pub mod task;
