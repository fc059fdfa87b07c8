//! Descriptive manifest returned by `resolve`.

use serde::{Deserialize, Serialize};

use crate::envelope::{ShareEnvelope, ShareState};

/// Descriptive metadata of a still-valid share.
///
/// Everything a download page needs to render before the recipient commits
/// to consuming the share. Carries no ciphertext and no secret-derived
/// material; producing one never counts as a download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileManifest {
    /// Original file name
    pub original_name: String,
    /// MIME type as reported by the uploader
    pub mime_type: String,
    /// Plaintext size in bytes
    pub size_bytes: u64,
    /// Creation timestamp, epoch milliseconds
    pub created_at_ms: u64,
    /// Time bound, if the share has one
    pub expires_at_ms: Option<u64>,
    /// Downloads still available
    pub downloads_remaining: u32,
}

impl FileManifest {
    /// Manifest for an envelope known to be `Active` at `now_ms`.
    pub(crate) fn from_envelope(envelope: &ShareEnvelope, now_ms: u64) -> Self {
        let downloads_remaining = match envelope.state(now_ms) {
            ShareState::Active { downloads_remaining } => downloads_remaining,
            ShareState::Consumed | ShareState::Expired => 0,
        };

        Self {
            original_name: envelope.original_name.clone(),
            mime_type: envelope.mime_type.clone(),
            size_bytes: envelope.size_bytes,
            created_at_ms: envelope.created_at_ms,
            expires_at_ms: envelope.expires_at_ms(),
            downloads_remaining,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        envelope::{ExpiryPolicy, FileAttributes, ShareDuration},
        store::ContentId,
    };

    #[test]
    fn manifest_mirrors_envelope_metadata() {
        let envelope = ShareEnvelope::build(
            FileAttributes {
                original_name: "notes.txt".to_owned(),
                mime_type: "text/plain".to_owned(),
                size_bytes: 42,
            },
            ExpiryPolicy::Duration(ShareDuration::OneHour),
            3,
            ContentId::from_raw("cid"),
            1000,
        )
        .unwrap();

        let manifest = FileManifest::from_envelope(&envelope, 1000);

        assert_eq!(manifest.original_name, "notes.txt");
        assert_eq!(manifest.mime_type, "text/plain");
        assert_eq!(manifest.size_bytes, 42);
        assert_eq!(manifest.created_at_ms, 1000);
        assert_eq!(manifest.expires_at_ms, Some(1000 + 60 * 60 * 1000));
        assert_eq!(manifest.downloads_remaining, 3);
    }

    #[test]
    fn one_time_manifest_has_no_expiry_instant() {
        let envelope = ShareEnvelope::build(
            FileAttributes {
                original_name: "secret.bin".to_owned(),
                mime_type: "application/octet-stream".to_owned(),
                size_bytes: 10,
            },
            ExpiryPolicy::OneTime,
            1,
            ContentId::from_raw("cid"),
            0,
        )
        .unwrap();

        let manifest = FileManifest::from_envelope(&envelope, 0);
        assert_eq!(manifest.expires_at_ms, None);
        assert_eq!(manifest.downloads_remaining, 1);
    }
}
