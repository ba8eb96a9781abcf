//! Runtime configuration resolved from environment variables.
//!
//! # Environment Variables
//! - `TASKS_DATA_FILE`: snapshot path (default `tasks.json`).
//! - `TASKS_LOG_LEVEL`: `trace|debug|info|warn|error` (default per build mode).
//! - `TASKS_LOG_DIR`: absolute log directory; file logging is off when unset.
//!
//! Empty or whitespace-only values are treated as unset.

use crate::logging::{default_log_level, normalize_level};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

pub const DATA_FILE_VAR: &str = "TASKS_DATA_FILE";
pub const LOG_LEVEL_VAR: &str = "TASKS_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "TASKS_LOG_DIR";

pub const DEFAULT_DATA_FILE: &str = "tasks.json";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("environment variable `{0}` is not valid UTF-8")]
    NotUnicode(&'static str),
    #[error("{0}")]
    InvalidLogLevel(String),
    #[error("`TASKS_LOG_DIR` must be an absolute path, got `{0}`")]
    RelativeLogDir(String),
}

/// Resolved process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_file: PathBuf,
    pub log_level: &'static str,
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    /// - Returns `ConfigError` for non-UTF-8 values, an unknown log level, or
    ///   a relative log directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name))
    }

    /// Same as [`AppConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Result<String, env::VarError>,
    {
        let read = |name: &'static str| -> Result<Option<String>, ConfigError> {
            match lookup(name) {
                Ok(value) => {
                    let trimmed = value.trim();
                    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
                }
                Err(env::VarError::NotPresent) => Ok(None),
                Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode(name)),
            }
        };

        let data_file = read(DATA_FILE_VAR)?
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

        let log_level = match read(LOG_LEVEL_VAR)? {
            Some(value) => normalize_level(&value).map_err(ConfigError::InvalidLogLevel)?,
            None => default_log_level(),
        };

        let log_dir = match read(LOG_DIR_VAR)? {
            Some(value) => {
                let path = PathBuf::from(&value);
                if !path.is_absolute() {
                    return Err(ConfigError::RelativeLogDir(value));
                }
                Some(path)
            }
            None => None,
        };

        Ok(Self {
            data_file,
            log_level,
            log_dir,
        })
    }
}
