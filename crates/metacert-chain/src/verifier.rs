//! # Credential Verifier
//!
//! Read-only composition over the contract bindings: check holdership,
//! then resolve the recorded content reference into the parsed
//! metadata document. Reads never mutate ledger state — repeated calls
//! return identical results.

use std::time::Duration;

use metacert_core::{Address, ContentRef, CredentialMetadata, TokenUid};

use crate::contract::CertLedger;
use crate::error::ChainError;

/// Configuration for content resolution.
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// Gateway host raw references are rewritten against
    /// (default: `https://ipfs.io`).
    pub gateway_host: String,
    /// Metadata fetch timeout in seconds (default: 30).
    pub timeout_secs: u64,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            gateway_host: metacert_core::content::DEFAULT_GATEWAY.to_string(),
            timeout_secs: 30,
        }
    }
}

impl VerifierConfig {
    /// Override the resolution gateway host.
    pub fn with_gateway(mut self, gateway_host: impl Into<String>) -> Self {
        self.gateway_host = gateway_host.into();
        self
    }
}

/// A resolved credential document, with both references already
/// rewritten to gateway-resolvable URLs for a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMetadata {
    /// The parsed document.
    pub metadata: CredentialMetadata,
    /// Resolvable URL the document was fetched from.
    pub metadata_url: String,
    /// Resolvable URL of the artwork referenced by the document.
    pub image_url: String,
}

/// Fetch a metadata document from its gateway URL and parse it.
///
/// Shared with the indexer, which resolves each discovered credential
/// under the same rules.
pub(crate) async fn fetch_metadata(
    client: &reqwest::Client,
    url: &str,
) -> Result<CredentialMetadata, ChainError> {
    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|e| ChainError::MetadataUnavailable {
            reason: format!("fetch of {url} failed: {e}"),
        })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(ChainError::MetadataUnavailable {
            reason: format!("fetch of {url} returned HTTP {status}"),
        });
    }

    resp.json::<CredentialMetadata>()
        .await
        .map_err(|e| ChainError::MetadataUnavailable {
            reason: format!("document at {url} did not parse: {e}"),
        })
}

/// Read-only verifier over a shared ledger connection.
#[derive(Debug, Clone)]
pub struct CredentialVerifier {
    ledger: CertLedger,
    http: reqwest::Client,
    gateway_host: String,
}

impl CredentialVerifier {
    /// Build a verifier. The ledger handle shares its RPC connection
    /// with other read-side components.
    pub fn new(ledger: CertLedger, config: VerifierConfig) -> Result<Self, ChainError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ChainError::MetadataUnavailable {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            ledger,
            http,
            gateway_host: config.gateway_host,
        })
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn gateway_host(&self) -> &str {
        &self.gateway_host
    }

    /// Whether `owner` holds credential `token_uid`. Returns `false`
    /// both when someone else holds it and when the token does not
    /// exist — callers treat either as "verification failed".
    pub async fn verify(&self, owner: &Address, token_uid: TokenUid) -> Result<bool, ChainError> {
        self.ledger.verify_cert(owner, token_uid).await
    }

    /// Resolve the metadata document recorded for `token_uid`.
    ///
    /// The stored reference is accepted in raw or gateway form,
    /// rewritten against the configured gateway, fetched, and parsed.
    /// The image reference inside the document is rewritten the same
    /// way before being handed to a renderer.
    pub async fn resolve(&self, token_uid: TokenUid) -> Result<ResolvedMetadata, ChainError> {
        let uri = self.ledger.token_uri(token_uid).await?;
        let reference =
            ContentRef::new(uri.as_str()).map_err(|_| ChainError::MetadataUnavailable {
                reason: format!("stored tokenURI {uri:?} is not a content reference"),
            })?;

        let metadata_url = reference.gateway_url(&self.gateway_host);
        let metadata = fetch_metadata(&self.http, &metadata_url).await?;
        let image_url = metadata.image.gateway_url(&self.gateway_host);

        Ok(ResolvedMetadata {
            metadata,
            metadata_url,
            image_url,
        })
    }

    /// Full verification flow: resolve only after the ownership check
    /// passes; a negative check short-circuits to
    /// [`ChainError::VerificationFailed`] without touching the gateway.
    pub async fn verify_and_resolve(
        &self,
        owner: &Address,
        token_uid: TokenUid,
    ) -> Result<ResolvedMetadata, ChainError> {
        if !self.verify(owner, token_uid).await? {
            return Err(ChainError::VerificationFailed {
                owner: owner.clone(),
                token_uid,
            });
        }
        self.resolve(token_uid).await
    }
}
