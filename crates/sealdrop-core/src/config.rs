//! Lifecycle manager configuration.

use std::time::Duration;

use sealdrop_crypto::DEFAULT_KDF_ITERATIONS;

/// Tuning knobs for [`crate::ShareLifecycleManager`].
///
/// Process-wide configuration; the platform secret chain is supplied
/// separately at manager construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Upper bound on every store suspension point.
    ///
    /// No operation is allowed to block indefinitely; an elapsed timeout
    /// surfaces as a retryable `StoreUnavailable`, never as expiry.
    pub op_timeout: Duration,

    /// Conditional-write attempts per `consume` before giving up with
    /// `Busy`.
    pub max_swap_attempts: u32,

    /// PBKDF2 iteration count for newly sealed blobs.
    ///
    /// Decryption always uses the count embedded in the blob, so changing
    /// this never breaks outstanding links. Tests lower it for speed.
    pub kdf_iterations: u32,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            op_timeout: Duration::from_secs(10),
            max_swap_attempts: 8,
            kdf_iterations: DEFAULT_KDF_ITERATIONS,
        }
    }
}
