//! Pinning client error types.

use metacert_core::ContentRef;

/// Errors from publishing content to the pinning service.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// HTTP transport failure — service unreachable or timed out.
    #[error("pinning service unreachable: {source}")]
    Transport {
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status (auth failure,
    /// payload rejected, size limit, internal error).
    #[error("pinning service rejected the request: HTTP {status}: {body}")]
    ServiceRejected {
        /// HTTP status code.
        status: u16,
        /// Response body excerpt for diagnostics.
        body: String,
    },

    /// The service returned 2xx but the body did not carry a usable
    /// content identifier.
    #[error("pinning service returned an unusable response: {reason}")]
    InvalidResponse {
        /// What was wrong with the body.
        reason: String,
    },

    /// The metadata pin (step two) failed after the asset pin (step
    /// one) succeeded. The asset remains pinned but orphaned — nothing
    /// references it yet. The caller decides whether to retry the
    /// metadata pin against `orphaned_asset` or discard the reference.
    #[error("metadata pin failed after asset was pinned as {orphaned_asset}: {source}")]
    MetadataPinFailed {
        /// The already-pinned, now-orphaned asset reference.
        orphaned_asset: ContentRef,
        /// The failure that interrupted step two.
        #[source]
        source: Box<UploadError>,
    },

    /// The metadata document could not be serialized.
    #[error("failed to serialize metadata document: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Client-side configuration problem (malformed base URL, invalid
    /// credential characters).
    #[error("pinning client configuration error: {0}")]
    Config(String),
}
