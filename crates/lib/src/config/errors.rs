//! Configuration error types.

use thiserror::Error;

/// Errors caused by a broken runtime context or configuration.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// No directory is registered for a record type.
    ///
    /// Records of this type cannot be rebuilt in the current context.
    #[error("No directory registered for record type '{type_id}'")]
    DirectoryNotFound {
        /// The record type that could not be resolved
        type_id: String,
    },

    /// A configuration value is present but unusable.
    #[error("Invalid configuration at '{path}': {reason}")]
    InvalidConfig { path: String, reason: String },

    /// The configuration file could not be read.
    #[error("Failed to read configuration from {path}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigurationError {
    /// Check if this error means a record type could not be resolved.
    pub fn is_directory_not_found(&self) -> bool {
        matches!(self, ConfigurationError::DirectoryNotFound { .. })
    }

    /// Check if this error is about an invalid configuration value.
    pub fn is_invalid_config(&self) -> bool {
        matches!(
            self,
            ConfigurationError::InvalidConfig { .. } | ConfigurationError::Unreadable { .. }
        )
    }
}

impl From<ConfigurationError> for crate::Error {
    fn from(err: ConfigurationError) -> Self {
        crate::Error::Configuration(err)
    }
}
