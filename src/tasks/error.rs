//! Task store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing the key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The data directory could not be created.
    #[error("failed to create data directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading a stored value failed.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a stored value failed.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The key cannot be used as a file name.
    #[error("invalid store key: {0:?}")]
    InvalidKey(String),

    /// A stored value is not valid JSON for the expected shape.
    #[error("malformed data under key {key}: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Serializing a value failed.
    #[error("failed to serialize data for key {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors resolving a user-supplied task selector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskLookupError {
    #[error("no task matches '{0}'")]
    NotFound(String),

    #[error("'{0}' matches more than one task, use a longer id prefix")]
    Ambiguous(String),
}

impl StoreError {
    /// Returns true if the stored data itself is bad rather than the storage.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }

    /// Returns true if the app can keep running with an in-memory task list.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InvalidKey(_))
    }
}
