//! Error types for blueprint operations.

use thiserror::Error;

use super::validation::ValidationError;

/// Structured errors for blueprint construction, merging and validation.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BlueprintError {
    /// One or more field constraints were violated.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A mapping was merged into a non-mapping field, or the reverse.
    #[error("Cannot merge {found} into '{path}': expected {expected}")]
    MergeType {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    /// The blueprint definition itself is malformed.
    #[error("Invalid blueprint definition for '{field}': {reason}")]
    InvalidDefinition { field: String, reason: String },
}

impl BlueprintError {
    /// Check if this error is a batched validation failure.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, BlueprintError::Validation(_))
    }

    /// Check if this error is a merge type mismatch.
    pub fn is_merge_type_error(&self) -> bool {
        matches!(self, BlueprintError::MergeType { .. })
    }

    /// Get the validation details, if this is a validation failure.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            BlueprintError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BlueprintError> for crate::Error {
    fn from(err: BlueprintError) -> Self {
        crate::Error::Blueprint(err)
    }
}

impl From<ValidationError> for crate::Error {
    fn from(err: ValidationError) -> Self {
        crate::Error::Blueprint(BlueprintError::Validation(err))
    }
}
