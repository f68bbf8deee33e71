//! # Two-Step Publish Pipeline
//!
//! Publishing a credential's content means pinning two linked objects:
//! first the artwork, then a metadata document that references it.
//!
//! The two steps are NOT atomic. If the metadata pin fails after the
//! asset pin succeeded, the asset stays pinned with nothing referencing
//! it. That inconsistency window is a documented property of the
//! pipeline, surfaced as [`UploadError::MetadataPinFailed`] with the
//! orphaned reference attached — the caller retries step two or
//! discards the reference. Nothing is retried or masked here.

use metacert_core::{ContentRef, CredentialMetadata};

use crate::client::PinataClient;
use crate::error::UploadError;

/// An asset to publish: opaque bytes plus the original filename, which
/// becomes the pin name. Lives in memory only for the duration of the
/// publish call — there is no on-disk staging to clean up.
#[derive(Debug, Clone)]
pub struct Asset {
    /// Raw file contents.
    pub bytes: Vec<u8>,
    /// Original filename (e.g. `cert.png`).
    pub file_name: String,
}

/// The two linked references produced by a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedCredential {
    /// Reference to the pinned artwork (raw form).
    pub asset_ref: ContentRef,
    /// Reference to the pinned metadata document (raw form).
    pub metadata_ref: ContentRef,
    /// Gateway-resolvable URL for the metadata document. This is the
    /// string embedded on-chain by the mint transaction.
    pub metadata_url: String,
}

/// Content publisher: owns the pinning client and the publish pipeline.
#[derive(Debug)]
pub struct Publisher {
    client: PinataClient,
}

impl Publisher {
    /// Wrap a configured pinning client.
    pub fn new(client: PinataClient) -> Self {
        Self { client }
    }

    /// Publish `asset` and its derived metadata document.
    ///
    /// Steps:
    /// 1. pin the asset under its original filename → `asset_ref`;
    /// 2. build [`CredentialMetadata`] named `"{subject_name}'s
    ///    {title}"` with `image = asset_ref`;
    /// 3. pin the serialized document as `metadata.json` → `metadata_ref`.
    ///
    /// A step-1 failure aborts with the underlying [`UploadError`]; a
    /// step-3 failure yields [`UploadError::MetadataPinFailed`] carrying
    /// the orphaned `asset_ref`.
    pub async fn publish(
        &self,
        asset: Asset,
        subject_name: &str,
        title: &str,
        description: &str,
    ) -> Result<PublishedCredential, UploadError> {
        let asset_ref = self.client.pin_file(asset.bytes, &asset.file_name).await?;

        let metadata =
            CredentialMetadata::new(subject_name, title, description, asset_ref.clone());

        let metadata_ref = match self.client.pin_json(&metadata, "metadata.json").await {
            Ok(r) => r,
            Err(source) => {
                tracing::error!(
                    asset_ref = %asset_ref,
                    error = %source,
                    "metadata pin failed; asset is pinned but orphaned"
                );
                return Err(UploadError::MetadataPinFailed {
                    orphaned_asset: asset_ref,
                    source: Box::new(source),
                });
            }
        };

        let metadata_url = metadata_ref.gateway_url(self.client.gateway_host());
        tracing::info!(
            asset_ref = %asset_ref,
            metadata_ref = %metadata_ref,
            "published credential content"
        );

        Ok(PublishedCredential {
            asset_ref,
            metadata_ref,
            metadata_url,
        })
    }
}
