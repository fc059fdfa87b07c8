//! Property-based tests for the share lifecycle
//!
//! These verify invariants that must hold for all inputs: quota exhaustion
//! is exact, and read-only probes never spend quota.

use proptest::prelude::*;
use sealdrop_core::{
    ExpiryPolicy, FileAttributes, ManagerConfig, MemoryStore, Secret, SecretChain,
    ShareDuration, ShareError, ShareLifecycleManager,
};

const T0: u64 = 1_700_000_000_000;

fn manager() -> ShareLifecycleManager<MemoryStore> {
    ShareLifecycleManager::with_config(
        MemoryStore::new(),
        SecretChain::new(Secret::new("platform-secret")),
        ManagerConfig { kdf_iterations: 1000, ..ManagerConfig::default() },
    )
}

fn attrs(size: u64) -> FileAttributes {
    FileAttributes {
        original_name: "prop.bin".to_owned(),
        mime_type: "application/octet-stream".to_owned(),
        size_bytes: size,
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .expect("runtime")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Property: a limit-k share yields its payload exactly k times, then
    /// fails as expired forever
    #[test]
    fn prop_quota_exhaustion_is_exact(
        payload in proptest::collection::vec(any::<u8>(), 1..512),
        limit in 1u32..5,
    ) {
        runtime().block_on(async {
            let mgr = manager();
            let token = mgr
                .create(
                    attrs(payload.len() as u64),
                    &payload,
                    ExpiryPolicy::Duration(ShareDuration::SevenDays),
                    limit,
                    T0,
                )
                .await
                .unwrap();

            for _ in 0..limit {
                prop_assert_eq!(mgr.consume(&token, T0).await.unwrap(), payload.clone());
            }
            for _ in 0..3 {
                prop_assert_eq!(mgr.consume(&token, T0).await, Err(ShareError::Expired));
            }
            Ok(())
        })?;
    }

    /// Property: N resolves followed by consumption still allow the full
    /// original quota
    #[test]
    fn prop_resolve_is_free(
        payload in proptest::collection::vec(any::<u8>(), 1..128),
        limit in 1u32..4,
        probes in 0usize..12,
    ) {
        runtime().block_on(async {
            let mgr = manager();
            let token = mgr
                .create(
                    attrs(payload.len() as u64),
                    &payload,
                    ExpiryPolicy::Duration(ShareDuration::OneDay),
                    limit,
                    T0,
                )
                .await
                .unwrap();

            for _ in 0..probes {
                let manifest = mgr.resolve(&token, T0).await.unwrap();
                prop_assert_eq!(manifest.downloads_remaining, limit);
            }

            for _ in 0..limit {
                prop_assert_eq!(mgr.consume(&token, T0).await.unwrap(), payload.clone());
            }
            prop_assert_eq!(mgr.consume(&token, T0).await, Err(ShareError::Expired));
            Ok(())
        })?;
    }

    /// Property: a share is valid strictly before its expiry instant and
    /// invalid from it onward
    #[test]
    fn prop_time_expiry_boundary(
        offset_before in 1u64..3_600_000,
        offset_after in 0u64..3_600_000,
    ) {
        runtime().block_on(async {
            let mgr = manager();
            let token = mgr
                .create(
                    attrs(4),
                    b"tick",
                    ExpiryPolicy::Duration(ShareDuration::OneHour),
                    10,
                    T0,
                )
                .await
                .unwrap();
            let expires_at = T0 + 3_600_000;

            prop_assert!(mgr.resolve(&token, expires_at - offset_before).await.is_ok());
            prop_assert_eq!(
                mgr.resolve(&token, expires_at + offset_after).await.unwrap_err(),
                ShareError::Expired
            );
            Ok(())
        })?;
    }
}
