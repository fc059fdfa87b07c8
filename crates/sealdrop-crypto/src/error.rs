//! Crypto error types.
//!
//! Errors that can occur while sealing or opening a blob:
//! - `MalformedBlob`: input does not parse as a sealed blob
//! - `UnsupportedVersion`: header version this build cannot read
//! - `AuthenticationFailed`: wrong secret or tampered ciphertext
//! - `NoMatchingSecret`: no secret in the rotation chain verifies
//! - `EmptySecretChain`: a chain was constructed with zero secrets

use thiserror::Error;

/// Errors that can occur during seal/open operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Input does not parse as a sealed blob.
    ///
    /// Covers short input, bad magic bytes, and a body shorter than one
    /// authentication tag. The offset/expectation context is diagnostic
    /// only and safe to log.
    #[error("malformed sealed blob: {reason}")]
    MalformedBlob {
        /// What failed to parse
        reason: &'static str,
    },

    /// Header declares a format version this build cannot read.
    #[error("unsupported sealed blob version: {version}")]
    UnsupportedVersion {
        /// Version byte from the header
        version: u8,
    },

    /// Authentication failed during decryption.
    ///
    /// Wrong secret or tampered ciphertext - the AEAD tag did not verify.
    /// No plaintext is ever returned on this error (all-or-nothing).
    #[error("authentication failed")]
    AuthenticationFailed,

    /// No secret in the rotation chain decrypts this blob.
    ///
    /// Every candidate was tried in order and all failed authentication.
    #[error("no secret in the rotation chain matches this blob")]
    NoMatchingSecret,

    /// Secret chain was constructed with zero secrets.
    #[error("secret chain must contain at least one secret")]
    EmptySecretChain,
}
