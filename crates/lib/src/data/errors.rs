//! Error types for nested property operations.

use thiserror::Error;

/// Errors raised while writing into a nested property tree.
///
/// Reads never fail: a path that cannot be followed is simply absent.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataError {
    /// A non-leaf segment of the path holds a scalar where a mapping is needed.
    #[error("Path conflict at '{segment}' while writing '{path}': found {found}, expected a mapping")]
    PathConflict {
        /// The full path being written
        path: String,
        /// The prefix of the path that holds the conflicting value
        segment: String,
        /// Type name of the value found at `segment`
        found: &'static str,
    },

    /// The path has no components.
    #[error("Invalid path: {path:?}")]
    InvalidPath { path: String },
}

impl DataError {
    /// Check if this error is a path conflict.
    pub fn is_path_conflict(&self) -> bool {
        matches!(self, DataError::PathConflict { .. })
    }

    /// Get the path involved in this error.
    pub fn path(&self) -> &str {
        match self {
            DataError::PathConflict { path, .. } | DataError::InvalidPath { path } => path,
        }
    }
}

impl From<DataError> for crate::Error {
    fn from(err: DataError) -> Self {
        crate::Error::Data(err)
    }
}
