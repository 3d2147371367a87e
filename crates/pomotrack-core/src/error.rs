//! Core error types for pomotrack-core.
//!
//! Validation failures are the only errors a user can trigger through the
//! session engine; storage and configuration errors come from the adapters
//! around it.

use std::path::PathBuf;
use thiserror::Error;

use crate::board::{ProjectId, TaskId};
use crate::timer::Mode;

/// Core error type for pomotrack-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistent store errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistent store errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked by another process
    #[error("Database is locked")]
    Locked,

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Validation errors.
///
/// The two edit variants carry the messages shown to the user when a typed
/// duration is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid values. Minutes and seconds must be less than 60 (got {minutes:02}:{seconds:02}).")]
    InvalidTimeField { minutes: u32, seconds: u32 },

    #[error("The maximum time is 3 hours (03:00:00); got {total_secs} seconds.")]
    DurationTooLong { total_secs: u64 },

    #[error("{mode} duration must be between 1 and 180 minutes (got {minutes})")]
    DurationOutOfRange { mode: Mode, minutes: u32 },

    #[error("{field} must not be empty")]
    EmptyName { field: &'static str },

    #[error("Pomodoro count must be between 1 and 99 (got {0})")]
    PomodoroCountOutOfRange(u32),

    #[error("Unknown project: {0}")]
    UnknownProject(ProjectId),

    #[error("Unknown task: {0}")]
    UnknownTask(TaskId),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg)
                if e.code == rusqlite::ErrorCode::DatabaseLocked =>
            {
                StorageError::Locked
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
