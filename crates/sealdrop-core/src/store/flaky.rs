//! Flaky store wrapper for fault injection testing
//!
//! Store wrapper that randomly fails operations to test error handling and
//! the retryable error taxonomy. Used to ensure the lifecycle manager
//! surfaces store failures as `StoreUnavailable`, never as expiry.

#![allow(clippy::disallowed_types, reason = "Locking simple RNG state")]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{ContentId, ContentStore, StoreError};

/// Flaky store wrapper that randomly injects failures
///
/// Delegates to an underlying store but fails operations with
/// `StoreError::Unavailable` based on a configured failure rate. Uses
/// Arc<Mutex<>> for the RNG state, making it Clone and thread-safe.
#[derive(Clone)]
pub struct FlakyStore<S> {
    inner: S,
    /// Failure rate (0.0 = never fail, 1.0 = always fail)
    failure_rate: f64,
    /// RNG state for deterministic chaos
    rng: Arc<Mutex<FlakyRng>>,
    /// Operation counter, for failure scheduling in tests
    operation_count: Arc<Mutex<usize>>,
    /// Operation ordinals (1-based) that always fail, regardless of rate
    fail_on_ops: Vec<usize>,
}

/// Simple deterministic RNG for chaos injection
///
/// Linear congruential generator for fast, deterministic randomness, so
/// chaos tests are reproducible with the same seed.
struct FlakyRng {
    state: u64,
}

impl FlakyRng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Generate next random value [0.0, 1.0)
    fn next(&mut self) -> f64 {
        // LCG constants from Numerical Recipes
        const A: u64 = 1_664_525;
        const C: u64 = 1_013_904_223;
        const M: u64 = 1u64 << 32;

        self.state = (A.wrapping_mul(self.state).wrapping_add(C)) % M;
        (self.state as f64) / (M as f64)
    }

    fn should_fail(&mut self, failure_rate: f64) -> bool {
        self.next() < failure_rate
    }
}

impl<S> FlakyStore<S> {
    /// Create a new flaky store wrapper
    ///
    /// # Panics
    ///
    /// Panics if `failure_rate` is not in [0.0, 1.0]
    pub fn new(inner: S, failure_rate: f64) -> Self {
        Self::with_seed(inner, failure_rate, 0x5EA1_D809_0000_0001)
    }

    /// Create with explicit seed for reproducible chaos
    ///
    /// # Panics
    ///
    /// Panics if `failure_rate` is not in [0.0, 1.0]
    pub fn with_seed(inner: S, failure_rate: f64, seed: u64) -> Self {
        assert!(
            (0.0..=1.0).contains(&failure_rate),
            "failure_rate must be between 0.0 and 1.0, got {failure_rate}"
        );

        Self {
            inner,
            failure_rate,
            rng: Arc::new(Mutex::new(FlakyRng::new(seed))),
            operation_count: Arc::new(Mutex::new(0)),
            fail_on_ops: Vec::new(),
        }
    }

    /// Create a wrapper that fails exactly the given operation ordinals
    /// (1-based) and nothing else.
    ///
    /// Deterministic alternative to a failure rate, for tests that need a
    /// specific call to fail - e.g. "the second write" during `create`.
    pub fn failing_ops(inner: S, ops: &[usize]) -> Self {
        Self {
            inner,
            failure_rate: 0.0,
            rng: Arc::new(Mutex::new(FlakyRng::new(0))),
            operation_count: Arc::new(Mutex::new(0)),
            fail_on_ops: ops.to_vec(),
        }
    }

    /// Underlying store (for checking state after chaos).
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Total number of store operations attempted.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. Acceptable for test code.
    #[allow(clippy::expect_used)]
    pub fn operation_count(&self) -> usize {
        *self.operation_count.lock().expect("Mutex poisoned")
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. Acceptable for test code.
    #[allow(clippy::expect_used)]
    fn inject(&self, op: &'static str) -> Result<(), StoreError> {
        let ordinal = {
            let mut count = self.operation_count.lock().expect("Mutex poisoned");
            *count += 1;
            *count
        };

        let scheduled = self.fail_on_ops.contains(&ordinal);
        let rolled =
            self.rng.lock().expect("Mutex poisoned").should_fail(self.failure_rate);

        if scheduled || rolled {
            return Err(StoreError::Unavailable { reason: format!("injected fault in {op}") });
        }
        Ok(())
    }
}

#[async_trait]
impl<S: ContentStore> ContentStore for FlakyStore<S> {
    async fn put(&self, bytes: &[u8]) -> Result<ContentId, StoreError> {
        self.inject("put")?;
        self.inner.put(bytes).await
    }

    async fn get(&self, id: &ContentId) -> Result<Vec<u8>, StoreError> {
        self.inject("get")?;
        self.inner.get(id).await
    }

    async fn compare_and_swap(
        &self,
        id: &ContentId,
        expected: &[u8],
        replacement: &[u8],
    ) -> Result<bool, StoreError> {
        self.inject("compare_and_swap")?;
        self.inner.compare_and_swap(id, expected, replacement).await
    }
}
