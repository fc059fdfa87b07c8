//! Platform secret rotation chain.
//!
//! The platform encrypts every share under a single process-wide secret.
//! Rotation replaces that secret without breaking outstanding links: the
//! chain holds every still-valid secret ordered newest first, new blobs are
//! sealed under the head, and decryption tries candidates in order.

use std::fmt;

use zeroize::Zeroize;

use crate::error::CryptoError;

/// A single platform secret.
///
/// Wraps the raw passphrase bytes and zeroizes them on drop. Deliberately
/// has no `Display` impl and a redacted `Debug` impl so secret material
/// never reaches logs.
#[derive(Clone)]
pub struct Secret {
    bytes: Vec<u8>,
}

impl Secret {
    /// Create a secret from a passphrase string.
    pub fn new(passphrase: impl Into<String>) -> Self {
        let mut passphrase = passphrase.into();
        let bytes = passphrase.as_bytes().to_vec();
        passphrase.zeroize();
        Self { bytes }
    }

    /// Raw passphrase bytes for key derivation.
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(..)")
    }
}

/// Ordered list of platform secrets, newest first.
///
/// The head secret seals new blobs; all entries are decryption candidates.
/// The chain is never empty.
#[derive(Debug, Clone)]
pub struct SecretChain {
    secrets: Vec<Secret>,
}

impl SecretChain {
    /// Create a chain with a single active secret.
    pub fn new(active: Secret) -> Self {
        Self { secrets: vec![active] }
    }

    /// Create a chain from an ordered rotation list, newest first.
    ///
    /// # Errors
    ///
    /// Returns `EmptySecretChain` if the list is empty.
    pub fn from_rotation_list(secrets: Vec<Secret>) -> Result<Self, CryptoError> {
        if secrets.is_empty() {
            return Err(CryptoError::EmptySecretChain);
        }
        Ok(Self { secrets })
    }

    /// The newest secret, used to seal new blobs.
    pub fn active(&self) -> &Secret {
        // Invariant: constructors reject empty chains
        &self.secrets[0]
    }

    /// Rotate in a new secret as the head.
    ///
    /// Existing secrets remain as decryption candidates so outstanding
    /// links keep working.
    pub fn rotate(&mut self, new_active: Secret) {
        self.secrets.insert(0, new_active);
    }

    /// Drop the oldest secret from the chain.
    ///
    /// Blobs sealed under it become undecryptable. No-op if it would
    /// empty the chain.
    pub fn retire_oldest(&mut self) {
        if self.secrets.len() > 1 {
            self.secrets.pop();
        }
    }

    /// Decryption candidates in trial order (newest first).
    pub fn candidates(&self) -> impl Iterator<Item = &Secret> {
        self.secrets.iter()
    }

    /// Number of secrets in the chain.
    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    /// Whether the chain is empty. Always false by construction.
    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}
