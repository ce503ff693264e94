//! Storage error types for record persistence.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while persisting or loading records.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StorageError {
    /// The record has no storage handle bound to it.
    #[error("Record '{key}' is not bound to a store")]
    Unbound {
        /// Key of the record that could not be saved
        key: String,
    },

    /// The key cannot be used by this store.
    #[error("Invalid record key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    /// File I/O error.
    #[error("File I/O error at {}", path.display())]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stored record could not be encoded or decoded.
    #[error("Serialization failed for record '{key}'")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A persisted file uses a format version this build cannot read.
    #[error("Unsupported storage format version {found}; only version {supported} is supported")]
    UnsupportedVersion { found: u8, supported: u8 },
}

impl StorageError {
    /// Check if this error indicates a missing storage binding.
    pub fn is_unbound(&self) -> bool {
        matches!(self, StorageError::Unbound { .. })
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        matches!(self, StorageError::FileIo { .. })
    }

    /// Check if this error is a serialization failure.
    pub fn is_serialization_error(&self) -> bool {
        matches!(self, StorageError::Serialization { .. })
    }
}

impl From<StorageError> for crate::Error {
    fn from(err: StorageError) -> Self {
        crate::Error::Storage(err)
    }
}
