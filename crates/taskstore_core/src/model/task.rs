//! Task domain model.
//!
//! # Responsibility
//! - Define the single record owned by the task store.
//! - Own the title validation rule shared by create/update/load paths.
//!
//! # Invariants
//! - `id` is strictly positive and never reused for another task.
//! - `title` length stays within `TITLE_MIN_CHARS..=TITLE_MAX_CHARS`.
//! - `updated_at` is never earlier than `created_at`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Store-assigned task identifier.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = i64;

/// Minimum title length, in characters.
pub const TITLE_MIN_CHARS: usize = 3;
/// Maximum title length, in characters.
pub const TITLE_MAX_CHARS: usize = 100;

/// Validation error for task titles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TitleValidationError {
    #[error("title must be between 3 and 100 characters, got {len}")]
    Length { len: usize },
}

/// Canonical task record.
///
/// Serialized with camelCase keys to match the snapshot file schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub done: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a fresh, not-done task with both timestamps set to `now`.
    ///
    /// Does not validate `title`; callers go through [`validate_title`] first.
    pub fn new(id: TaskId, title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: title.into(),
            done: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validates record-level invariants.
    ///
    /// Used on the load path, where records come from outside the store.
    pub fn validate(&self) -> Result<(), String> {
        if self.id <= 0 {
            return Err(format!("task id must be positive, got {}", self.id));
        }
        if let Err(err) = validate_title(&self.title) {
            return Err(format!("task {}: {err}", self.id));
        }
        if self.updated_at < self.created_at {
            return Err(format!(
                "task {}: updatedAt {} is earlier than createdAt {}",
                self.id,
                self.updated_at.to_rfc3339(),
                self.created_at.to_rfc3339()
            ));
        }
        Ok(())
    }
}

/// Checks the title length rule.
///
/// Length is counted in Unicode scalar values, not bytes.
pub fn validate_title(title: &str) -> Result<(), TitleValidationError> {
    let len = title.chars().count();
    if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&len) {
        return Err(TitleValidationError::Length { len });
    }
    Ok(())
}
