//! Error types for calc-fields-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while addressing or editing a document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Non-positive counts, zero stride, negative indices, empty names
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Sheet, cell or name absent where a collaborator call requires it
    #[error("Not found: {0}")]
    NotFound(String),

    /// Selection is not a single range, tracker used out of order, merge conflicts
    #[error("Structural precondition failed: {0}")]
    StructuralPreconditionFailed(String),

    /// The document session is disposed or the host rejected the call
    #[error("Document session unavailable: {0}")]
    CollaboratorUnavailable(String),

    /// Invalid A1-style address text
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),
}

impl Error {
    /// Create an [`Error::InvalidArgument`] with a message
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Create an [`Error::NotFound`] with a message
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Error::NotFound(msg.into())
    }

    /// Create an [`Error::StructuralPreconditionFailed`] with a message
    pub fn precondition<S: Into<String>>(msg: S) -> Self {
        Error::StructuralPreconditionFailed(msg.into())
    }

    /// Create an [`Error::CollaboratorUnavailable`] with a message
    pub fn unavailable<S: Into<String>>(msg: S) -> Self {
        Error::CollaboratorUnavailable(msg.into())
    }

    /// Whether this error is an argument error, surfaced to callers immediately
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }
}
