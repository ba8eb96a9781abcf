//! Repository layer: the authoritative task collection.
//!
//! # Responsibility
//! - Own task records and the id generator behind one lock.
//! - Return semantic errors (`InvalidTitle`, `NotFound`) to callers.
//!
//! # Invariants
//! - Write paths validate titles before mutating anything.
//! - Every successful mutation schedules a background snapshot write.

pub mod task_repo;
