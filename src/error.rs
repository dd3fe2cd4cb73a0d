//! Error types shared by the store, the task form and configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Failure writing to (or reading from) the key-value backend.
///
/// Read and decode failures never reach callers of
/// [`crate::persist::PersistentStore::load`]; they are logged and replaced by
/// the caller's default. Writes surface this error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no task ids left above {last}")]
    IdsExhausted { last: u64 },
    #[error("failed to serialize value for key '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Reasons a form submission is refused.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Title is required")]
    EmptyTitle,
    #[error("Unrecognised due date '{0}' (use YYYY-MM-DD, today, tomorrow or in Nd)")]
    InvalidDueDate(String),
    #[error("Task {0} no longer exists")]
    MissingTask(u64),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
