//! Share lifecycle orchestration.
//!
//! [`ShareLifecycleManager`] ties the crypto engine, the envelope model and
//! the content store together:
//!
//! ```text
//! create:  seal → put(ciphertext) → build envelope → put(envelope) → token
//! resolve: get(envelope) → validate → manifest          (read-only)
//! consume: get(envelope) → validate → CAS(counter + 1) → get(ciphertext)
//!          → decrypt
//! ```
//!
//! Consumption is recorded *before* ciphertext is released: the conditional
//! write on the envelope record is the single linearization point, so N
//! requests racing a one-download share produce exactly one winner. Losers
//! re-read, observe the spent quota and fail as expired; repeated lost races
//! beyond the configured bound fail as `Busy` instead.
//!
//! Every store call is wrapped in a timeout. An elapsed timeout is a
//! retryable `StoreUnavailable`, never expiry.

use std::future::Future;

use rand::RngCore;
use sealdrop_crypto::{NONCE_SIZE, SALT_SIZE, SealParams, SecretChain, open_with_chain, seal};

use crate::{
    config::ManagerConfig,
    envelope::{ExpiryPolicy, FileAttributes, ShareEnvelope, ShareState},
    error::ShareError,
    manifest::FileManifest,
    store::{ContentId, ContentStore, StoreError},
};

/// Format the share link for a token.
///
/// The entire addressing and access-control state of a share is recoverable
/// from this single URL; no server-side session exists. `origin` is the
/// host (and optional port) without a scheme.
pub fn share_url(origin: &str, token: &ContentId) -> String {
    format!("https://{origin}/file/{token}")
}

/// Orchestrates creation and consumption of ephemeral shares.
///
/// Holds no per-share state: everything that matters is persisted in the
/// envelope record, so any number of manager instances (or processes) can
/// serve the same store concurrently.
pub struct ShareLifecycleManager<S> {
    store: S,
    secrets: SecretChain,
    config: ManagerConfig,
}

impl<S: ContentStore> ShareLifecycleManager<S> {
    /// Create a manager with default configuration.
    pub fn new(store: S, secrets: SecretChain) -> Self {
        Self::with_config(store, secrets, ManagerConfig::default())
    }

    /// Create a manager with explicit configuration.
    pub fn with_config(store: S, secrets: SecretChain, config: ManagerConfig) -> Self {
        Self { store, secrets, config }
    }

    /// Encrypt a file, publish it, and return the share token.
    ///
    /// Two store writes: ciphertext first, then the envelope. If the
    /// envelope write fails the ciphertext blob is left behind as
    /// unreachable garbage in the append-only store and the whole call
    /// fails hard - no token is ever returned for a half-published share.
    ///
    /// # Errors
    ///
    /// - `InvalidDownloadLimit` if `download_limit` is zero
    /// - `StoreUnavailable` on store failure or timeout (retryable)
    pub async fn create(
        &self,
        attrs: FileAttributes,
        plaintext: &[u8],
        policy: ExpiryPolicy,
        download_limit: u32,
        now_ms: u64,
    ) -> Result<ContentId, ShareError> {
        // Validate before writing anything so an invalid request cannot
        // orphan a ciphertext blob
        if download_limit == 0 {
            return Err(ShareError::InvalidDownloadLimit { got: download_limit });
        }

        let sealed = seal(plaintext, self.secrets.active(), &self.fresh_seal_params());
        tracing::debug!(plaintext_len = plaintext.len(), sealed_len = sealed.len(), "sealed payload");

        let ciphertext_ref = self.timed("put ciphertext", self.store.put(&sealed)).await?;

        let envelope =
            ShareEnvelope::build(attrs, policy, download_limit, ciphertext_ref, now_ms)?;
        let record = envelope.encode()?;

        let token = self.timed("put envelope", self.store.put(&record)).await?;

        tracing::info!(
            token = %token,
            ciphertext_ref = %envelope.ciphertext_ref,
            download_limit = envelope.download_limit,
            "share created"
        );
        Ok(token)
    }

    /// Fetch descriptive metadata for a share without consuming it.
    ///
    /// Read-only probe: never mutates the consumption counter, so viewing
    /// a download page does not count as a download.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the token is unknown to the store
    /// - `Expired` if the share is invalid by time or by count
    /// - `MalformedEnvelope` if the stored record does not decode
    /// - `StoreUnavailable` on store failure or timeout (retryable)
    pub async fn resolve(
        &self,
        token: &ContentId,
        now_ms: u64,
    ) -> Result<FileManifest, ShareError> {
        let record = self.timed("get envelope", self.store.get(token)).await?;
        let envelope = ShareEnvelope::decode(&record)?;

        match envelope.state(now_ms) {
            ShareState::Active { .. } => Ok(FileManifest::from_envelope(&envelope, now_ms)),
            ShareState::Consumed | ShareState::Expired => {
                tracing::debug!(token = %token, "resolve on invalid share");
                Err(ShareError::Expired)
            },
        }
    }

    /// Consume one unit of quota and return the decrypted file.
    ///
    /// Re-validates exactly as `resolve` does, then records the download
    /// with a conditional write on the envelope record. Only after the
    /// increment is durably recorded does ciphertext leave the store. The
    /// conditional write is all-or-nothing; a partially incremented
    /// counter cannot occur.
    ///
    /// # Errors
    ///
    /// - `NotFound`, `Expired`, `MalformedEnvelope` as for `resolve`
    /// - `Busy` after too many lost conditional-write races (retryable)
    /// - `Decryption` on secret mismatch or corrupted ciphertext
    /// - `StoreUnavailable` on store failure or timeout (retryable)
    pub async fn consume(
        &self,
        token: &ContentId,
        now_ms: u64,
    ) -> Result<Vec<u8>, ShareError> {
        let envelope = self.claim_quota(token, now_ms).await?;

        let sealed =
            self.timed("get ciphertext", self.store.get(&envelope.ciphertext_ref)).await?;
        let plaintext = open_with_chain(&sealed, &self.secrets)?;

        tracing::info!(
            token = %token,
            downloads_consumed = envelope.downloads_consumed,
            download_limit = envelope.download_limit,
            plaintext_len = plaintext.len(),
            "share consumed"
        );
        Ok(plaintext)
    }

    /// Atomically advance the consumption counter, retrying lost races.
    ///
    /// Returns the updated envelope once its record is durably swapped in.
    async fn claim_quota(
        &self,
        token: &ContentId,
        now_ms: u64,
    ) -> Result<ShareEnvelope, ShareError> {
        for attempt in 1..=self.config.max_swap_attempts {
            let record = self.timed("get envelope", self.store.get(token)).await?;
            let envelope = ShareEnvelope::decode(&record)?;

            match envelope.state(now_ms) {
                ShareState::Active { .. } => {},
                ShareState::Consumed | ShareState::Expired => return Err(ShareError::Expired),
            }

            let updated = envelope.record_consumption()?;
            let swapped = self
                .timed(
                    "swap envelope",
                    self.store.compare_and_swap(token, &record, &updated.encode()?),
                )
                .await?;

            if swapped {
                return Ok(updated);
            }
            tracing::debug!(token = %token, attempt, "lost quota race, re-reading");
        }

        tracing::warn!(
            token = %token,
            attempts = self.config.max_swap_attempts,
            "quota update contended past bound"
        );
        Err(ShareError::Busy { attempts: self.config.max_swap_attempts })
    }

    /// Wrap a store call in the configured timeout.
    async fn timed<T>(
        &self,
        op: &'static str,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, ShareError> {
        match tokio::time::timeout(self.config.op_timeout, call).await {
            Ok(result) => result.map_err(ShareError::from),
            Err(_) => {
                tracing::warn!(op, timeout_ms = self.config.op_timeout.as_millis() as u64, "store call timed out");
                Err(ShareError::StoreUnavailable { reason: format!("{op} timed out") })
            },
        }
    }

    fn fresh_seal_params(&self) -> SealParams {
        let mut salt = [0u8; SALT_SIZE];
        let mut nonce = [0u8; NONCE_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut salt);
        rand::rngs::OsRng.fill_bytes(&mut nonce);
        SealParams::with_iterations(self.config.kdf_iterations, salt, nonce)
    }
}
