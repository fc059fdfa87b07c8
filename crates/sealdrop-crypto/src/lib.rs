//! Sealdrop Cryptographic Engine
//!
//! Password-keyed authenticated encryption for ephemeral file shares. Pure
//! functions with deterministic outputs. Callers provide random bytes for
//! deterministic testing.
//!
//! # Sealed Blob Lifecycle
//!
//! Every share is encrypted under a single platform-wide secret, never a
//! per-user key. A sealed blob is self-describing: its header carries the
//! KDF salt, iteration count and AEAD nonce, so decryption needs only a
//! candidate secret.
//!
//! ```text
//! Platform Secret (rotation chain, newest first)
//!        │
//!        ▼
//! PBKDF2-HMAC-SHA256 → 32-byte key (per blob, fresh salt)
//!        │
//!        ▼
//! XChaCha20-Poly1305 → ciphertext || tag
//!        │
//!        ▼
//! Header ∥ body → self-describing sealed blob
//! ```
//!
//! # Security
//!
//! Confidentiality and integrity:
//! - XChaCha20-Poly1305 AEAD; failed tag verification returns no plaintext
//! - Fresh random salt and nonce per blob bind each key to one ciphertext
//!
//! Rotation:
//! - [`SecretChain`] holds every still-valid secret, newest first
//! - New blobs seal under the head; opening tries candidates in order and
//!   stops at the first tag that verifies
//! - Retiring the oldest secret orphans only blobs sealed under it
//!
//! Hygiene:
//! - Derived keys and retired secrets are zeroized
//! - [`Secret`] has a redacted `Debug` impl; material never reaches logs

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod engine;
mod error;
mod format;
mod secrets;

pub use engine::{DEFAULT_KDF_ITERATIONS, SealParams, open, open_with_chain, seal};
pub use error::CryptoError;
pub use format::{FORMAT_VERSION, HEADER_SIZE, MAGIC, NONCE_SIZE, SALT_SIZE, SealedBlob, TAG_SIZE};
pub use secrets::{Secret, SecretChain};
