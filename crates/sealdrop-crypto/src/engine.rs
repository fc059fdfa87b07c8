//! Sealing and opening of blobs under a password-derived key.
//!
//! All functions are pure - random bytes must be provided by the caller.
//! This enables deterministic testing and keeps the crate runtime-free.

use chacha20poly1305::{
    XChaCha20Poly1305, XNonce,
    aead::{Aead, KeyInit},
};
use hmac::Hmac;
use sha2::Sha256;
use zeroize::Zeroize;

use crate::{
    error::CryptoError,
    format::{NONCE_SIZE, SALT_SIZE, SealedBlob},
    secrets::{Secret, SecretChain},
};

/// Default PBKDF2 iteration count for new blobs.
///
/// OWASP guidance for PBKDF2-HMAC-SHA256. Decryption always uses the count
/// embedded in the blob header, so this can be raised without breaking
/// outstanding links.
pub const DEFAULT_KDF_ITERATIONS: u32 = 600_000;

/// Caller-supplied sealing parameters.
///
/// Salt and nonce MUST be fresh cryptographically secure random bytes in
/// production; tests may pass fixed values for determinism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SealParams {
    /// PBKDF2 iteration count, embedded in the blob header
    pub iterations: u32,
    /// PBKDF2 salt
    pub salt: [u8; SALT_SIZE],
    /// XChaCha20 nonce
    pub nonce: [u8; NONCE_SIZE],
}

impl SealParams {
    /// Parameters with the default iteration count.
    pub fn new(salt: [u8; SALT_SIZE], nonce: [u8; NONCE_SIZE]) -> Self {
        Self { iterations: DEFAULT_KDF_ITERATIONS, salt, nonce }
    }

    /// Parameters with an explicit iteration count.
    ///
    /// Iteration counts below the default weaken the KDF; intended for
    /// tests, which would otherwise spend seconds per derivation.
    pub fn with_iterations(iterations: u32, salt: [u8; SALT_SIZE], nonce: [u8; NONCE_SIZE]) -> Self {
        Self { iterations, salt, nonce }
    }
}

/// Derive a 32-byte AEAD key from a secret via PBKDF2-HMAC-SHA256.
fn derive_key(secret: &Secret, salt: &[u8; SALT_SIZE], iterations: u32) -> [u8; 32] {
    let mut key = [0u8; 32];
    let Ok(()) = pbkdf2::pbkdf2::<Hmac<Sha256>>(secret.as_bytes(), salt, iterations, &mut key)
    else {
        unreachable!("PBKDF2-HMAC-SHA256 accepts any output length");
    };
    key
}

/// Seal plaintext into a self-describing blob.
///
/// The blob embeds the salt, nonce and iteration count, so opening it needs
/// only a candidate secret.
pub fn seal(plaintext: &[u8], secret: &Secret, params: &SealParams) -> Vec<u8> {
    let mut key = derive_key(secret, &params.salt, params.iterations);
    let cipher = XChaCha20Poly1305::new((&key).into());
    key.zeroize();

    let Ok(body) = cipher.encrypt(XNonce::from_slice(&params.nonce), plaintext) else {
        unreachable!("XChaCha20-Poly1305 encryption cannot fail with valid inputs");
    };

    SealedBlob::encode(params.iterations, &params.salt, &params.nonce, &body)
}

/// Open a sealed blob with a single candidate secret.
///
/// All-or-nothing: on any failure no plaintext bytes are returned.
///
/// # Errors
///
/// - `MalformedBlob` / `UnsupportedVersion`: input does not parse
/// - `AuthenticationFailed`: wrong secret or tampered ciphertext
pub fn open(blob: &[u8], secret: &Secret) -> Result<Vec<u8>, CryptoError> {
    let parsed = SealedBlob::parse(blob)?;

    let mut key = derive_key(secret, &parsed.salt, parsed.iterations);
    let cipher = XChaCha20Poly1305::new((&key).into());
    key.zeroize();

    cipher
        .decrypt(XNonce::from_slice(&parsed.nonce), parsed.body)
        .map_err(|_| CryptoError::AuthenticationFailed)
}

/// Open a sealed blob, trying each secret in the rotation chain.
///
/// Candidates are tried newest first and the first success wins. Format
/// errors abort immediately - retrying a blob that does not parse under a
/// different secret cannot help.
///
/// # Errors
///
/// - `MalformedBlob` / `UnsupportedVersion`: input does not parse
/// - `NoMatchingSecret`: every candidate failed authentication
pub fn open_with_chain(blob: &[u8], chain: &SecretChain) -> Result<Vec<u8>, CryptoError> {
    // Parse once up front so format errors are not masked as secret misses
    SealedBlob::parse(blob)?;

    for secret in chain.candidates() {
        match open(blob, secret) {
            Ok(plaintext) => return Ok(plaintext),
            Err(CryptoError::AuthenticationFailed) => {},
            Err(other) => return Err(other),
        }
    }

    Err(CryptoError::NoMatchingSecret)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::format::{HEADER_SIZE, TAG_SIZE};

    // Fast KDF for tests; production uses DEFAULT_KDF_ITERATIONS
    const TEST_ITERATIONS: u32 = 1000;

    fn test_params() -> SealParams {
        SealParams::with_iterations(TEST_ITERATIONS, [0x42; SALT_SIZE], [0x17; NONCE_SIZE])
    }

    #[test]
    fn seal_open_roundtrip() {
        let secret = Secret::new("platform-secret");
        let plaintext = b"attack at dawn";

        let blob = seal(plaintext, &secret, &test_params());
        let opened = open(&blob, &secret).unwrap();

        assert_eq!(opened, plaintext);
    }

    #[test]
    fn roundtrip_empty_plaintext() {
        let secret = Secret::new("platform-secret");
        let blob = seal(b"", &secret, &test_params());

        assert_eq!(blob.len(), HEADER_SIZE + TAG_SIZE);
        assert_eq!(open(&blob, &secret).unwrap(), b"");
    }

    #[test]
    fn wrong_secret_fails_authentication() {
        let blob = seal(b"secret payload", &Secret::new("right"), &test_params());

        let result = open(&blob, &Secret::new("wrong"));
        assert_eq!(result, Err(CryptoError::AuthenticationFailed));
    }

    #[test]
    fn tampered_body_fails_authentication() {
        let secret = Secret::new("platform-secret");
        let mut blob = seal(b"original", &secret, &test_params());

        let last = blob.len() - 1;
        blob[last] ^= 0xFF;

        assert_eq!(open(&blob, &secret), Err(CryptoError::AuthenticationFailed));
    }

    #[test]
    fn tampered_salt_fails_authentication() {
        // Header fields feed key derivation, so flipping them must also fail
        let secret = Secret::new("platform-secret");
        let mut blob = seal(b"original", &secret, &test_params());

        blob[9] ^= 0xFF;

        assert_eq!(open(&blob, &secret), Err(CryptoError::AuthenticationFailed));
    }

    #[test]
    fn truncated_blob_is_malformed() {
        let secret = Secret::new("platform-secret");
        let blob = seal(b"some longer plaintext here", &secret, &test_params());

        let result = open(&blob[..HEADER_SIZE + TAG_SIZE - 1], &secret);
        assert!(matches!(result, Err(CryptoError::MalformedBlob { .. })));
    }

    #[test]
    fn ciphertext_size_is_plaintext_plus_overhead() {
        let secret = Secret::new("platform-secret");
        let plaintext = vec![0xAB; 1024];

        let blob = seal(&plaintext, &secret, &test_params());
        assert_eq!(blob.len(), HEADER_SIZE + plaintext.len() + TAG_SIZE);
    }

    #[test]
    fn decryption_uses_embedded_iteration_count() {
        // Seal at one count, open without being told the count
        let secret = Secret::new("platform-secret");
        let params = SealParams::with_iterations(1234, [0x01; SALT_SIZE], [0x02; NONCE_SIZE]);

        let blob = seal(b"payload", &secret, &params);
        assert_eq!(open(&blob, &secret).unwrap(), b"payload");
    }

    #[test]
    fn chain_opens_with_old_secret_after_rotation() {
        let old = Secret::new("v1");
        let blob = seal(b"sealed before rotation", &old, &test_params());

        let mut chain = SecretChain::new(old);
        chain.rotate(Secret::new("v2"));

        assert_eq!(open_with_chain(&blob, &chain).unwrap(), b"sealed before rotation");
    }

    #[test]
    fn chain_with_no_match_fails() {
        let blob = seal(b"payload", &Secret::new("unknown"), &test_params());

        let chain =
            SecretChain::from_rotation_list(vec![Secret::new("v2"), Secret::new("v1")]).unwrap();

        assert_eq!(open_with_chain(&blob, &chain), Err(CryptoError::NoMatchingSecret));
    }

    #[test]
    fn chain_reports_format_errors_not_secret_miss() {
        let chain = SecretChain::new(Secret::new("v1"));
        let result = open_with_chain(b"not a sealed blob", &chain);
        assert!(matches!(result, Err(CryptoError::MalformedBlob { .. })));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Property: open(seal(p, s), s) == p for arbitrary payloads and secrets
        #[test]
        fn prop_roundtrip(
            plaintext in proptest::collection::vec(any::<u8>(), 0..2048),
            passphrase in "[a-zA-Z0-9]{1,32}",
            salt in any::<[u8; SALT_SIZE]>(),
            nonce in any::<[u8; NONCE_SIZE]>(),
        ) {
            let secret = Secret::new(passphrase);
            let params = SealParams::with_iterations(TEST_ITERATIONS, salt, nonce);

            let blob = seal(&plaintext, &secret, &params);
            prop_assert_eq!(open(&blob, &secret).unwrap(), plaintext);
        }

        /// Property: a different passphrase never decrypts
        #[test]
        fn prop_wrong_secret_always_fails(
            plaintext in proptest::collection::vec(any::<u8>(), 0..256),
            pass_a in "[a-z]{4,16}",
            pass_b in "[A-Z]{4,16}",
        ) {
            // Character classes are disjoint, so the passphrases differ
            let blob = seal(
                &plaintext,
                &Secret::new(pass_a),
                &SealParams::with_iterations(TEST_ITERATIONS, [0; SALT_SIZE], [0; NONCE_SIZE]),
            );
            prop_assert_eq!(
                open(&blob, &Secret::new(pass_b)),
                Err(CryptoError::AuthenticationFailed)
            );
        }
    }
}
