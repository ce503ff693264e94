//! Error types for the account system.

use thiserror::Error;

/// Errors raised by account management.
///
/// Failed logins and denied actions are not errors; they are reported as
/// `false` by [`UserRecord::login`](super::UserRecord::login) and
/// [`UserRecord::authorize`](super::UserRecord::authorize).
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum UserError {
    #[error("Username already exists: {username}")]
    AlreadyExists { username: String },

    #[error("Invalid username '{username}': must match {pattern}")]
    InvalidUsername { username: String, pattern: String },

    #[error("Password hashing failed: {reason}")]
    HashingFailed { reason: String },
}

impl UserError {
    /// Check if this error is a username collision.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, UserError::AlreadyExists { .. })
    }

    /// Check if this error is a rejected username.
    pub fn is_invalid_username(&self) -> bool {
        matches!(self, UserError::InvalidUsername { .. })
    }
}

impl From<UserError> for crate::Error {
    fn from(err: UserError) -> Self {
        crate::Error::User(err)
    }
}
