//! Content store abstraction for Sealdrop
//!
//! Trait-based abstraction over a content-addressed blob store. The core
//! never inspects identifiers - any content-addressing scheme qualifies.
//! Ciphertext blobs are append-only; the envelope record additionally needs
//! one conditional write primitive so the consumption counter can advance
//! atomically under racing downloads.

mod error;
mod flaky;
mod memory;

use std::fmt;

use async_trait::async_trait;
pub use error::StoreError;
pub use flaky::FlakyStore;
pub use memory::MemoryStore;
use serde::{Deserialize, Serialize};

/// Opaque content identifier.
///
/// Minted by the store from the content at first `put`. The core treats it
/// as an opaque string; it doubles as the share token when it addresses an
/// envelope record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    /// Wrap a raw identifier string.
    ///
    /// For store implementations and for reconstructing a token received
    /// from a share link.
    pub fn from_raw(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Content store abstraction.
///
/// Must be Send + Sync (shared across concurrent requests). Network-backed
/// implementations should not apply their own unbounded waits - the
/// lifecycle manager wraps every call in a timeout.
///
/// # Identifier binding
///
/// `put` is append-only and content-addressed. `compare_and_swap` mutates
/// the record *bound to* an identifier minted earlier; the identifier does
/// not change when the bytes do. Mutable-pointer backends (a database row
/// keyed by the original content id, IPNS over IPFS) implement this
/// natively; backends without conditional writes must serialize swaps per
/// identifier behind a lock.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Store a blob, returning its content identifier.
    ///
    /// Append-only: storing the same bytes twice returns the same
    /// identifier and is not an error.
    async fn put(&self, bytes: &[u8]) -> Result<ContentId, StoreError>;

    /// Fetch the record currently bound to an identifier.
    async fn get(&self, id: &ContentId) -> Result<Vec<u8>, StoreError>;

    /// Atomically replace the record bound to `id` iff its current bytes
    /// equal `expected`.
    ///
    /// Returns `Ok(false)` when the current bytes differ (a concurrent
    /// writer won the race) - that is an outcome, not an error. This is the
    /// one linearizable read-modify-write the share lifecycle requires.
    async fn compare_and_swap(
        &self,
        id: &ContentId,
        expected: &[u8],
        replacement: &[u8],
    ) -> Result<bool, StoreError>;
}
