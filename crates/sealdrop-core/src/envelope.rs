//! Share envelope: the persisted record binding a ciphertext to its policy.
//!
//! An envelope is written once at upload time and never deleted. Every field
//! is write-once except `downloads_consumed`, which advances through
//! [`ShareEnvelope::record_consumption`] - the lifecycle manager commits
//! that mutation with a conditional store write so racing downloads cannot
//! double-spend quota.
//!
//! The wire encoding is CBOR with camelCase field names and a
//! `schemaVersion` field. Unknown fields are ignored on read so future
//! fields can be added without breaking old envelopes; missing required
//! fields are a malformed record, not a crash.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::ContentId;

/// Current envelope schema version.
pub const ENVELOPE_SCHEMA_VERSION: u16 = 1;

/// Errors from envelope construction, mutation, or decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    /// Download limit choice was zero.
    #[error("download limit must be positive, got {got}")]
    InvalidDownloadLimit {
        /// The rejected choice
        got: u32,
    },

    /// Stored record does not decode as an envelope.
    ///
    /// Covers undecodable CBOR, missing required fields, and schema
    /// versions this build cannot read.
    #[error("malformed envelope: {reason}")]
    Malformed {
        /// What failed to decode
        reason: String,
    },

    /// Consumption would exceed the download limit.
    ///
    /// The `downloadsConsumed <= downloadLimit` invariant is checked here,
    /// before any ciphertext is released.
    #[error("download quota exhausted: {consumed} of {limit}")]
    QuotaExhausted {
        /// Downloads already recorded
        consumed: u32,
        /// The envelope's limit
        limit: u32,
    },
}

/// Fixed durations a time-limited share can be valid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShareDuration {
    /// One hour from creation
    OneHour,
    /// Twenty-four hours from creation
    OneDay,
    /// Seven days from creation
    SevenDays,
}

impl ShareDuration {
    /// Duration in milliseconds.
    pub fn as_millis(self) -> u64 {
        const HOUR_MS: u64 = 60 * 60 * 1000;
        match self {
            Self::OneHour => HOUR_MS,
            Self::OneDay => 24 * HOUR_MS,
            Self::SevenDays => 7 * 24 * HOUR_MS,
        }
    }
}

/// Expiry policy of a share. Exactly one policy is active per envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExpiryPolicy {
    /// Valid for exactly one download, no time bound.
    ///
    /// Always forces the download limit to 1, overriding any numeric
    /// choice supplied alongside it.
    OneTime,
    /// Valid until a fixed duration after creation elapses.
    Duration(ShareDuration),
}

/// Descriptive attributes of the plaintext file.
///
/// Carried for presentation only; never trusted for security decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAttributes {
    /// Original file name
    pub original_name: String,
    /// MIME type as reported by the uploader
    pub mime_type: String,
    /// Plaintext size in bytes
    pub size_bytes: u64,
}

/// Validity of a share at a point in time.
///
/// `Consumed` and `Expired` are terminal; no transition leaves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareState {
    /// Quota remains and any time bound has not elapsed.
    Active {
        /// Downloads still available
        downloads_remaining: u32,
    },
    /// Download quota is exhausted.
    Consumed,
    /// Time bound has elapsed.
    Expired,
}

/// The persisted share record.
///
/// Immutable once published except `downloads_consumed`; in particular
/// `ciphertext_ref` never changes after creation (prevents link hijacking).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareEnvelope {
    /// Schema version of this record
    pub schema_version: u16,
    /// Original file name (presentation only)
    pub original_name: String,
    /// MIME type (presentation only)
    pub mime_type: String,
    /// Plaintext size in bytes (presentation only)
    pub size_bytes: u64,
    /// Creation timestamp, epoch milliseconds
    pub created_at_ms: u64,
    /// Active expiry policy
    pub expiry_policy: ExpiryPolicy,
    /// Maximum number of downloads
    pub download_limit: u32,
    /// Downloads recorded so far, monotonically increasing
    pub downloads_consumed: u32,
    /// Content identifier of the sealed ciphertext blob
    pub ciphertext_ref: ContentId,
}

impl ShareEnvelope {
    /// Build a new envelope at upload time.
    ///
    /// `OneTime` forces `download_limit = 1` regardless of the supplied
    /// choice - one-time takes priority over the numeric control.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDownloadLimit` if `download_limit` is zero.
    pub fn build(
        attrs: FileAttributes,
        policy: ExpiryPolicy,
        download_limit: u32,
        ciphertext_ref: ContentId,
        now_ms: u64,
    ) -> Result<Self, EnvelopeError> {
        if download_limit == 0 {
            return Err(EnvelopeError::InvalidDownloadLimit { got: download_limit });
        }

        let download_limit = match policy {
            ExpiryPolicy::OneTime => 1,
            ExpiryPolicy::Duration(_) => download_limit,
        };

        Ok(Self {
            schema_version: ENVELOPE_SCHEMA_VERSION,
            original_name: attrs.original_name,
            mime_type: attrs.mime_type,
            size_bytes: attrs.size_bytes,
            created_at_ms: now_ms,
            expiry_policy: policy,
            download_limit,
            downloads_consumed: 0,
            ciphertext_ref,
        })
    }

    /// When this share stops being valid by time, if it has a time bound.
    pub fn expires_at_ms(&self) -> Option<u64> {
        match self.expiry_policy {
            ExpiryPolicy::OneTime => None,
            ExpiryPolicy::Duration(d) => Some(self.created_at_ms.saturating_add(d.as_millis())),
        }
    }

    /// Validity at `now_ms`.
    ///
    /// Time-expiry and count-expiry are independent; either suffices to
    /// invalidate. A fetch must observe `Active` before any ciphertext is
    /// released.
    pub fn state(&self, now_ms: u64) -> ShareState {
        if let Some(expires_at) = self.expires_at_ms()
            && now_ms >= expires_at
        {
            return ShareState::Expired;
        }
        if self.downloads_consumed >= self.download_limit {
            return ShareState::Consumed;
        }
        ShareState::Active { downloads_remaining: self.download_limit - self.downloads_consumed }
    }

    /// Copy of this envelope with one more download recorded.
    ///
    /// The only mutation path; every other field carries over unchanged.
    ///
    /// # Errors
    ///
    /// Returns `QuotaExhausted` if the limit is already reached.
    pub fn record_consumption(&self) -> Result<Self, EnvelopeError> {
        if self.downloads_consumed >= self.download_limit {
            return Err(EnvelopeError::QuotaExhausted {
                consumed: self.downloads_consumed,
                limit: self.download_limit,
            });
        }

        let mut next = self.clone();
        next.downloads_consumed += 1;
        Ok(next)
    }

    /// Encode to the CBOR wire representation.
    pub fn encode(&self) -> Result<Vec<u8>, EnvelopeError> {
        let mut out = Vec::new();
        ciborium::into_writer(self, &mut out)
            .map_err(|e| EnvelopeError::Malformed { reason: e.to_string() })?;
        Ok(out)
    }

    /// Decode from the CBOR wire representation.
    ///
    /// Unknown fields are ignored; missing required fields and schema
    /// versions outside `1..=ENVELOPE_SCHEMA_VERSION` are malformed.
    pub fn decode(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        let envelope: Self = ciborium::from_reader(bytes)
            .map_err(|e| EnvelopeError::Malformed { reason: e.to_string() })?;

        if envelope.schema_version == 0 || envelope.schema_version > ENVELOPE_SCHEMA_VERSION {
            return Err(EnvelopeError::Malformed {
                reason: format!("unreadable schema version {}", envelope.schema_version),
            });
        }

        Ok(envelope)
    }
}
