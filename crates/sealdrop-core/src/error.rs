//! Share lifecycle error taxonomy.
//!
//! One enum for the full create/resolve/consume surface:
//! - `NotFound`, `Expired`, `MalformedEnvelope`, `Decryption`,
//!   `InvalidDownloadLimit`: terminal, surfaced to the end user
//! - `Busy`, `StoreUnavailable`: transient, retried by the caller with
//!   backoff
//!
//! User-facing messages deliberately collapse the terminal availability
//! errors into one string so callers cannot build an oracle over which
//! invariant failed; decryption failures stay distinct because they signal
//! secret mismatch or corruption, never expiry.

use sealdrop_crypto::CryptoError;
use thiserror::Error;

use crate::{envelope::EnvelopeError, store::StoreError};

/// Errors that can occur during share lifecycle operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShareError {
    /// Token or referenced content unknown to the store. Terminal.
    #[error("share not found")]
    NotFound,

    /// Share invalidated by time or by download count. Terminal.
    #[error("share expired")]
    Expired,

    /// Stored envelope record does not decode. Terminal.
    #[error("malformed envelope: {reason}")]
    MalformedEnvelope {
        /// What failed to decode
        reason: String,
    },

    /// Ciphertext failed to decrypt. Terminal.
    ///
    /// Secret mismatch or corruption - distinct from expiry and never
    /// conflated with it.
    #[error("decryption failed: {0}")]
    Decryption(CryptoError),

    /// Download limit choice was zero. Terminal, creation-time only.
    #[error("download limit must be positive, got {got}")]
    InvalidDownloadLimit {
        /// The rejected choice
        got: u32,
    },

    /// Quota update lost too many races in a row. Retryable.
    #[error("share busy after {attempts} contended attempts")]
    Busy {
        /// How many conditional writes were attempted
        attempts: u32,
    },

    /// Store transport failure or timeout. Retryable.
    #[error("store unavailable: {reason}")]
    StoreUnavailable {
        /// What failed
        reason: String,
    },
}

impl ShareError {
    /// Returns true if this error is transient and may succeed on retry.
    ///
    /// Only lock/CAS contention and store transport failures qualify.
    /// Expiry is never retryable and a timeout is never reported as expiry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Busy { .. } | Self::StoreUnavailable { .. })
    }

    /// Short non-technical message for end users.
    ///
    /// `NotFound`, `Expired` and `MalformedEnvelope` share one message so
    /// the response cannot distinguish which invariant failed.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NotFound | Self::Expired | Self::MalformedEnvelope { .. } => {
                "This link has expired or was already used."
            },
            Self::Decryption(_) => "This file could not be decrypted.",
            Self::InvalidDownloadLimit { .. } => "The download limit must be at least 1.",
            Self::Busy { .. } | Self::StoreUnavailable { .. } => {
                "The service is busy. Please try again."
            },
        }
    }
}

impl From<EnvelopeError> for ShareError {
    fn from(err: EnvelopeError) -> Self {
        match err {
            EnvelopeError::InvalidDownloadLimit { got } => Self::InvalidDownloadLimit { got },
            EnvelopeError::Malformed { reason } => Self::MalformedEnvelope { reason },
            // Exhausted quota observed at consumption time is expiry by count
            EnvelopeError::QuotaExhausted { .. } => Self::Expired,
        }
    }
}

impl From<StoreError> for ShareError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Self::NotFound,
            StoreError::Unavailable { reason } => Self::StoreUnavailable { reason },
            StoreError::Io(reason) => Self::StoreUnavailable { reason },
        }
    }
}

impl From<CryptoError> for ShareError {
    fn from(err: CryptoError) -> Self {
        Self::Decryption(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryability() {
        assert!(ShareError::Busy { attempts: 8 }.is_retryable());
        assert!(ShareError::StoreUnavailable { reason: "timeout".into() }.is_retryable());

        assert!(!ShareError::NotFound.is_retryable());
        assert!(!ShareError::Expired.is_retryable());
        assert!(!ShareError::MalformedEnvelope { reason: "x".into() }.is_retryable());
        assert!(!ShareError::Decryption(CryptoError::AuthenticationFailed).is_retryable());
    }

    #[test]
    fn availability_errors_share_one_user_message() {
        let not_found = ShareError::NotFound.user_message();
        assert_eq!(not_found, ShareError::Expired.user_message());
        assert_eq!(
            not_found,
            ShareError::MalformedEnvelope { reason: "x".into() }.user_message()
        );
    }

    #[test]
    fn decryption_message_is_distinct_from_expiry() {
        let decryption =
            ShareError::Decryption(CryptoError::AuthenticationFailed).user_message();
        assert_ne!(decryption, ShareError::Expired.user_message());
    }

    #[test]
    fn store_errors_map_to_taxonomy() {
        assert_eq!(
            ShareError::from(StoreError::NotFound { id: "x".into() }),
            ShareError::NotFound
        );
        assert!(matches!(
            ShareError::from(StoreError::Unavailable { reason: "t/o".into() }),
            ShareError::StoreUnavailable { .. }
        ));
    }
}
