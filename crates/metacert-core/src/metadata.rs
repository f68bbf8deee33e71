//! # Credential Metadata
//!
//! The human-readable credential document pinned as the second
//! content-addressed object. The `image` field references the first
//! (the artwork), linking the two objects by content identifier.

use serde::{Deserialize, Serialize};

use crate::content::ContentRef;

/// The pinned metadata document: `{name, description, image}`.
///
/// Field names are part of the wire format — renderers and the ledger's
/// `tokenURI` consumers parse exactly these keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialMetadata {
    /// Display name, composed as `"{subject}'s {title}"`.
    pub name: String,
    /// Free-form description of the credential.
    pub description: String,
    /// Reference to the pinned artwork.
    pub image: ContentRef,
}

impl CredentialMetadata {
    /// Build the document for a credential awarded to `subject_name`
    /// with the given title, linking the already-pinned artwork.
    pub fn new(
        subject_name: &str,
        title: &str,
        description: impl Into<String>,
        image: ContentRef,
    ) -> Self {
        Self {
            name: format!("{subject_name}'s {title}"),
            description: description.into(),
            image,
        }
    }
}
