//! Error types for the progress engines

use thiserror::Error;

/// Domain error raised by the engines and surfaced to the service layer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProgressError {
    /// Referenced record does not exist or belongs to another user
    #[error("Not found: {0}")]
    NotFound(String),

    /// A field is missing or outside its declared range
    #[error("Validation error: {0}")]
    Validation(String),

    /// An optional collaborator record is absent; callers degrade instead of failing
    #[error("Missing prerequisite: {0}")]
    MissingPrerequisite(String),
}

/// Result alias for engine operations
pub type ProgressResult<T> = Result<T, ProgressError>;
