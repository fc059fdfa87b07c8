#![allow(clippy::disallowed_types, reason = "Synchronous in-memory operations only")]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use super::{ContentId, ContentStore, StoreError};

/// In-memory content store for testing and single-process deployments.
///
/// Identifiers are hex-encoded SHA-256 of the bytes at first `put`. All
/// state is wrapped in Arc<Mutex<>> to allow Clone and concurrent access.
/// Thread-safe through Mutex, but uses `lock().expect()` which will panic
/// if the mutex is poisoned - acceptable for test code. The mutex is never
/// held across an await point.
#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    /// Create a new empty `MemoryStore`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently stored.
    ///
    /// Useful for debugging and testing.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned (a thread panicked while
    /// holding the lock). This is acceptable for test/simulation code.
    #[allow(clippy::expect_used)]
    pub fn record_count(&self) -> usize {
        self.records.lock().expect("Mutex poisoned").len()
    }

    /// Overwrite the record bound to an identifier, unconditionally.
    ///
    /// Test helper for planting malformed or stale records; production
    /// code goes through `compare_and_swap`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. Acceptable for test code.
    #[allow(clippy::expect_used)]
    pub fn plant(&self, id: &ContentId, bytes: Vec<u8>) {
        self.records.lock().expect("Mutex poisoned").insert(id.as_str().to_owned(), bytes);
    }

    fn content_id_for(bytes: &[u8]) -> ContentId {
        let digest = Sha256::digest(bytes);
        ContentId::from_raw(hex::encode(digest))
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. This is acceptable for
    /// test code.
    #[allow(clippy::expect_used)]
    async fn put(&self, bytes: &[u8]) -> Result<ContentId, StoreError> {
        let id = Self::content_id_for(bytes);
        let mut records = self.records.lock().expect("Mutex poisoned");

        // Idempotent: same bytes hash to the same id
        records.entry(id.as_str().to_owned()).or_insert_with(|| bytes.to_vec());

        Ok(id)
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. This is acceptable for
    /// test code.
    #[allow(clippy::expect_used)]
    async fn get(&self, id: &ContentId) -> Result<Vec<u8>, StoreError> {
        let records = self.records.lock().expect("Mutex poisoned");

        records
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound { id: id.as_str().to_owned() })
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. This is acceptable for
    /// test code.
    #[allow(clippy::expect_used)]
    async fn compare_and_swap(
        &self,
        id: &ContentId,
        expected: &[u8],
        replacement: &[u8],
    ) -> Result<bool, StoreError> {
        let mut records = self.records.lock().expect("Mutex poisoned");

        let current = records
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::NotFound { id: id.as_str().to_owned() })?;

        if current.as_slice() != expected {
            return Ok(false);
        }

        *current = replacement.to_vec();
        Ok(true)
    }
}
