mod config;
pub mod database;
mod memory;

pub use config::{Config, NotificationsConfig, TimerConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::{Result, StorageError};

/// Key of the per-mode duration record.
pub const SETTINGS_KEY: &str = "settings";
/// Key of the ordered task list.
pub const TASKS_KEY: &str = "tasks";
/// Key of the ordered project list.
pub const PROJECTS_KEY: &str = "projects";

/// Durable key-value storage holding serialized records.
pub trait Store {
    /// # Errors
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// # Errors
    /// Returns an error if the backend cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: Store + ?Sized> Store for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// Read and decode a record.
///
/// A missing key, an unreadable backend or a value that no longer decodes
/// all yield `None`; the caller falls back to defaults.
pub fn load_json<T: DeserializeOwned>(store: &dyn Store, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(key, error = %e, "failed to read stored record");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "stored record is malformed, using defaults");
            None
        }
    }
}

/// Encode and write a record.
///
/// # Errors
/// Returns an error if encoding or the write fails.
pub fn save_json<T: Serialize + ?Sized>(store: &mut dyn Store, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)?;
    Ok(())
}

/// Returns the data directory, creating it if needed.
///
/// `POMOTRACK_HOME` overrides the location. Otherwise it is
/// `~/.config/pomotrack`, or `~/.config/pomotrack-dev` when
/// `POMOTRACK_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("POMOTRACK_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("POMOTRACK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("pomotrack-dev")
            } else {
                base_dir.join("pomotrack")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
