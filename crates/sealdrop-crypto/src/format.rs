//! Sealed blob wire format.
//!
//! A sealed blob is self-describing: everything needed to decrypt it except
//! the secret itself travels in the header. Layout (integers big-endian):
//!
//! ```text
//! offset  size  field
//! 0       4     magic = "SDRP"
//! 4       1     version = 1
//! 5       4     KDF iteration count (u32)
//! 9       16    PBKDF2 salt
//! 25      24    XChaCha20 nonce
//! 49      ..    ciphertext || 16-byte Poly1305 tag
//! ```

use crate::error::CryptoError;

/// Magic bytes identifying a sealed blob.
pub const MAGIC: [u8; 4] = *b"SDRP";

/// Current sealed blob format version.
pub const FORMAT_VERSION: u8 = 1;

/// PBKDF2 salt size in bytes.
pub const SALT_SIZE: usize = 16;

/// XChaCha20 nonce size in bytes.
pub const NONCE_SIZE: usize = 24;

/// Poly1305 tag size in bytes.
pub const TAG_SIZE: usize = 16;

/// Total header size preceding the ciphertext body.
pub const HEADER_SIZE: usize = 4 + 1 + 4 + SALT_SIZE + NONCE_SIZE;

/// Parsed view of a sealed blob.
///
/// Borrows the ciphertext body from the input buffer; header fields are
/// copied out since they are small and fixed-size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedBlob<'a> {
    /// KDF iteration count embedded at seal time
    pub iterations: u32,
    /// PBKDF2 salt
    pub salt: [u8; SALT_SIZE],
    /// XChaCha20 nonce
    pub nonce: [u8; NONCE_SIZE],
    /// Ciphertext including the 16-byte Poly1305 tag
    pub body: &'a [u8],
}

impl<'a> SealedBlob<'a> {
    /// Parse a sealed blob from raw bytes.
    ///
    /// # Errors
    ///
    /// - `MalformedBlob` if the input is shorter than a header plus one tag,
    ///   the magic bytes are wrong, or the iteration count is zero
    /// - `UnsupportedVersion` if the version byte is not one we can read
    pub fn parse(bytes: &'a [u8]) -> Result<Self, CryptoError> {
        if bytes.len() < HEADER_SIZE + TAG_SIZE {
            return Err(CryptoError::MalformedBlob { reason: "input shorter than header plus tag" });
        }
        if bytes[0..4] != MAGIC {
            return Err(CryptoError::MalformedBlob { reason: "bad magic bytes" });
        }

        let version = bytes[4];
        if version != FORMAT_VERSION {
            return Err(CryptoError::UnsupportedVersion { version });
        }

        let mut iter_bytes = [0u8; 4];
        iter_bytes.copy_from_slice(&bytes[5..9]);
        let iterations = u32::from_be_bytes(iter_bytes);
        if iterations == 0 {
            return Err(CryptoError::MalformedBlob { reason: "zero KDF iteration count" });
        }

        let mut salt = [0u8; SALT_SIZE];
        salt.copy_from_slice(&bytes[9..9 + SALT_SIZE]);

        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&bytes[9 + SALT_SIZE..HEADER_SIZE]);

        Ok(Self { iterations, salt, nonce, body: &bytes[HEADER_SIZE..] })
    }

    /// Serialize a header followed by the ciphertext body.
    ///
    /// The inverse of [`SealedBlob::parse`].
    pub fn encode(iterations: u32, salt: &[u8; SALT_SIZE], nonce: &[u8; NONCE_SIZE], body: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_SIZE + body.len());
        out.extend_from_slice(&MAGIC);
        out.push(FORMAT_VERSION);
        out.extend_from_slice(&iterations.to_be_bytes());
        out.extend_from_slice(salt);
        out.extend_from_slice(nonce);
        out.extend_from_slice(body);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_blob() -> Vec<u8> {
        SealedBlob::encode(1000, &[0x11; SALT_SIZE], &[0x22; NONCE_SIZE], &[0x33; TAG_SIZE + 4])
    }

    #[test]
    fn parse_roundtrip() {
        let bytes = valid_blob();
        let blob = SealedBlob::parse(&bytes).unwrap();

        assert_eq!(blob.iterations, 1000);
        assert_eq!(blob.salt, [0x11; SALT_SIZE]);
        assert_eq!(blob.nonce, [0x22; NONCE_SIZE]);
        assert_eq!(blob.body, &[0x33; TAG_SIZE + 4]);
    }

    #[test]
    fn rejects_truncated_input() {
        let bytes = valid_blob();
        // Anything shorter than header + tag must fail, down to empty input
        for len in 0..HEADER_SIZE + TAG_SIZE {
            let result = SealedBlob::parse(&bytes[..len]);
            assert!(matches!(result, Err(CryptoError::MalformedBlob { .. })), "len {len}");
        }
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = valid_blob();
        bytes[0] = b'X';
        assert!(matches!(SealedBlob::parse(&bytes), Err(CryptoError::MalformedBlob { .. })));
    }

    #[test]
    fn rejects_unknown_version() {
        let mut bytes = valid_blob();
        bytes[4] = 2;
        assert_eq!(
            SealedBlob::parse(&bytes),
            Err(CryptoError::UnsupportedVersion { version: 2 })
        );
    }

    #[test]
    fn rejects_zero_iterations() {
        let mut bytes = valid_blob();
        bytes[5..9].copy_from_slice(&0u32.to_be_bytes());
        assert!(matches!(SealedBlob::parse(&bytes), Err(CryptoError::MalformedBlob { .. })));
    }

    #[test]
    fn minimum_size_is_empty_plaintext() {
        // Header plus a bare tag parses: an empty plaintext is legal
        let bytes = SealedBlob::encode(1, &[0; SALT_SIZE], &[0; NONCE_SIZE], &[0; TAG_SIZE]);
        let blob = SealedBlob::parse(&bytes).unwrap();
        assert_eq!(blob.body.len(), TAG_SIZE);
    }
}
