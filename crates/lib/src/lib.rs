//!
//! Tessera: user accounts for content stores.
//! This library provides the data layer behind account management: nested
//! element trees, schemas, persistence, authentication and authorization.
//!
//! ## Core Concepts
//!
//! * **Properties (`data::Properties`)**: A tree of values addressed by dot paths (`access.site.login`).
//! * **Blueprints (`blueprint::Blueprint`)**: Schemas declaring fields, defaults, validation constraints and per-field merge strategies.
//! * **Records (`record::Record`)**: A keyed element tree bound to a pluggable store (`record::RecordStore`).
//! * **Accounts (`user::UserRecord`)**: Records with password authentication and runtime login state, obtained through a `user::UserDirectory`.
//! * **Authorization (`auth::AuthorizationEngine`)**: Group and per-account permission evaluation.
//! * **Configuration (`config::ConfigStore`)**: Settings read by dot path, passed explicitly to the components that need them.

pub mod auth;
pub mod blueprint;
pub mod config;
pub mod data;
pub mod encoding;
pub mod record;
pub mod user;

/// Result type used throughout the Tessera library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Tessera library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured errors from nested property writes
    #[error(transparent)]
    Data(data::DataError),

    /// Structured errors from blueprint merging and validation
    #[error(transparent)]
    Blueprint(blueprint::BlueprintError),

    /// Structured errors from record persistence
    #[error(transparent)]
    Storage(record::StorageError),

    /// Broken runtime context or configuration
    #[error(transparent)]
    Configuration(config::ConfigurationError),

    /// Structured errors from account management
    #[error(transparent)]
    User(user::UserError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
            Error::Data(_) => "data",
            Error::Blueprint(_) => "blueprint",
            Error::Storage(_) => "record",
            Error::Configuration(_) => "config",
            Error::User(_) => "user",
        }
    }

    /// Check if this error is a nested path conflict.
    pub fn is_path_conflict(&self) -> bool {
        match self {
            Error::Data(data_err) => data_err.is_path_conflict(),
            _ => false,
        }
    }

    /// Check if this error is a batched validation failure.
    pub fn is_validation_error(&self) -> bool {
        match self {
            Error::Blueprint(blueprint_err) => blueprint_err.is_validation_error(),
            _ => false,
        }
    }

    /// The validation failure carried by this error, if any.
    pub fn validation(&self) -> Option<&blueprint::ValidationError> {
        match self {
            Error::Blueprint(blueprint_err) => blueprint_err.validation(),
            _ => None,
        }
    }

    /// Check if this error is a merge shape mismatch.
    pub fn is_merge_type_error(&self) -> bool {
        match self {
            Error::Blueprint(blueprint_err) => blueprint_err.is_merge_type_error(),
            _ => false,
        }
    }

    /// Check if this error is storage-related.
    pub fn is_storage_error(&self) -> bool {
        matches!(self, Error::Storage(_))
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        match self {
            Error::Io(_) => true,
            Error::Storage(storage_err) => storage_err.is_io_error(),
            _ => false,
        }
    }

    /// Check if this error comes from a broken runtime context or
    /// configuration.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }

    /// Check if this error indicates a conflict (already exists).
    pub fn is_conflict(&self) -> bool {
        match self {
            Error::User(user_err) => user_err.is_already_exists(),
            _ => false,
        }
    }

    /// Check if this error is account-related.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Error::User(_))
    }
}
