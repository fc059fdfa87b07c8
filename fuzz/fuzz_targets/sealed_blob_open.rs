//! Fuzz target for sealed blob parsing and opening
//!
//! This fuzzer feeds arbitrary bytes to the blob parser and the full open
//! path (header parse, KDF, AEAD verification) with a fixed secret chain:
//! - Truncated and oversized headers
//! - Corrupt magic, version, iteration count
//! - Bodies shorter than one authentication tag
//!
//! The fuzzer should NEVER panic and must never return plaintext for
//! unauthenticated input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sealdrop_crypto::{open, open_with_chain, Secret, SecretChain, SealedBlob};

fuzz_target!(|data: &[u8]| {
    // Parsing arbitrary bytes must never panic
    let _ = SealedBlob::parse(data);

    // A low-iteration blob would still take the KDF path; cap the embedded
    // iteration count so hostile headers cannot stall the fuzzer
    if let Ok(blob) = SealedBlob::parse(data) {
        if blob.iterations > 10_000 {
            return;
        }
    } else {
        // Open must agree with the parser and reject without panicking
        let secret = Secret::new("fuzz-secret");
        assert!(open(data, &secret).is_err());
        return;
    }

    let chain = SecretChain::new(Secret::new("fuzz-secret"));
    // Arbitrary bytes were not sealed under this secret; opening must fail
    // (authentication) without panicking
    let _ = open_with_chain(data, &chain);
});
