//! Store error types.
//!
//! Errors that can occur during content store operations:
//! - `NotFound`: no record bound to the identifier
//! - `Unavailable`: transport failure or timeout (retryable)
//! - `Io`: underlying storage system errors

use thiserror::Error;

/// Errors that can occur during content store operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No record is bound to the identifier.
    #[error("content not found: {id}")]
    NotFound {
        /// Identifier that was not found
        id: String,
    },

    /// Transport failure or timeout.
    ///
    /// Transient - the caller may retry with backoff. Never conflated with
    /// share expiry.
    #[error("store unavailable: {reason}")]
    Unavailable {
        /// What failed
        reason: String,
    },

    /// I/O error (file system, database, etc.)
    #[error("I/O error: {0}")]
    Io(String),
}

impl StoreError {
    /// Returns true if this error is transient and may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}
