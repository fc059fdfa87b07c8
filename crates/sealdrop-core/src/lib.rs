//! Sealdrop Ephemeral Share Lifecycle Engine
//!
//! A sender encrypts a file, publishes it to a content-addressed store, and
//! shares one link. The link lets a capped number of recipients retrieve
//! and decrypt the file before the share self-destructs by time or by
//! download count.
//!
//! # Architecture
//!
//! ```text
//! Upload:    seal ──▶ ContentStore::put(ciphertext)
//!                          │
//!                          ▼
//!            ShareEnvelope::build ──▶ ContentStore::put(envelope)
//!                                          │
//!                                          ▼
//!                                   share token (envelope content id)
//!
//! Download:  ContentStore::get(envelope) ──▶ validate
//!                  │                            │
//!                  ▼                            ▼
//!            resolve: manifest only      consume: CAS counter, then
//!            (never counts)              get(ciphertext) ──▶ open
//! ```
//!
//! Consumption state lives in the authoritative envelope record, never in a
//! viewer's local state - the conditional write on that record is the one
//! linearizable step, so a one-download link hands out plaintext exactly
//! once no matter how many tabs race it.
//!
//! The content store is an external collaborator behind [`ContentStore`];
//! any blob store addressable by a content hash qualifies. [`MemoryStore`]
//! serves tests and single-process deployments, [`FlakyStore`] injects
//! faults for chaos coverage.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod envelope;
mod error;
mod manager;
mod manifest;
mod store;

pub use config::ManagerConfig;
pub use envelope::{
    ENVELOPE_SCHEMA_VERSION, EnvelopeError, ExpiryPolicy, FileAttributes, ShareDuration,
    ShareEnvelope, ShareState,
};
pub use error::ShareError;
pub use manager::{ShareLifecycleManager, share_url};
pub use manifest::FileManifest;
// Re-exported so embedding applications configure secrets without a direct
// dependency on the crypto crate
pub use sealdrop_crypto::{Secret, SecretChain};
pub use store::{ContentId, ContentStore, FlakyStore, MemoryStore, StoreError};
