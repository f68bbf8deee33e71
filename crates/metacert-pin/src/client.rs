//! # Pinning Service HTTP Client
//!
//! Typed client for a Pinata-compatible pinning API. Each pin request
//! is a multipart POST to `/pinning/pinFileToIPFS` carrying the file
//! part plus two JSON text parts:
//!
//! - `pinataMetadata` — `{"name": <pin name>}`
//! - `pinataOptions` — `{"cidVersion": 1}`
//!
//! Authentication is a bearer JWT sent as a default header. The service
//! answers `{"IpfsHash": "<cid>"}` on success.
//!
//! ## Timeout & Retry
//!
//! A per-request timeout is configured on the client (default 60s —
//! uploads carry whole artwork files). Retries are NOT built in:
//! publishing failures abort the issuance attempt and surface to the
//! caller, whose retry policy this crate does not second-guess.

use std::time::Duration;

use metacert_core::ContentRef;
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::error::UploadError;

/// Path of the pin endpoint, relative to the configured base URL.
const PIN_FILE_PATH: &str = "/pinning/pinFileToIPFS";

/// Configuration for the pinning client.
#[derive(Debug, Clone)]
pub struct PinataConfig {
    /// Base URL of the pinning API (e.g. `https://api.pinata.cloud`).
    pub base_url: String,
    /// Bearer JWT for authentication. Wiped from memory on drop.
    pub jwt: Zeroizing<String>,
    /// Gateway host used to derive resolvable URLs for pinned objects
    /// (e.g. `https://gateway.pinata.cloud`).
    pub gateway_host: String,
    /// Request timeout in seconds (default: 60).
    pub timeout_secs: u64,
}

impl PinataConfig {
    /// Create a configuration with the default Pinata gateway and a
    /// 60-second timeout.
    pub fn new(base_url: impl Into<String>, jwt: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            jwt: Zeroizing::new(jwt.into()),
            gateway_host: "https://gateway.pinata.cloud".to_string(),
            timeout_secs: 60,
        }
    }

    /// Override the resolution gateway host.
    pub fn with_gateway(mut self, gateway_host: impl Into<String>) -> Self {
        self.gateway_host = gateway_host.into();
        self
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Success body of the pin endpoint.
#[derive(Debug, Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
}

/// HTTP client for the pinning service.
///
/// Cheap to clone is not a goal — construct once and share behind an
/// `Arc` across async tasks.
#[derive(Debug)]
pub struct PinataClient {
    client: reqwest::Client,
    base_url: String,
    gateway_host: String,
}

impl PinataClient {
    /// Build a client from configuration.
    ///
    /// Fails with [`UploadError::Config`] if the base URL does not
    /// parse or the JWT contains characters unusable in a header.
    pub fn new(config: PinataConfig) -> Result<Self, UploadError> {
        url::Url::parse(&config.base_url)
            .map_err(|e| UploadError::Config(format!("invalid base URL: {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                let mut auth = reqwest::header::HeaderValue::from_str(&format!(
                    "Bearer {}",
                    config.jwt.as_str()
                ))
                .map_err(|_| {
                    UploadError::Config("invalid JWT characters".to_string())
                })?;
                auth.set_sensitive(true);
                headers.insert(reqwest::header::AUTHORIZATION, auth);
                headers
            })
            .build()
            .map_err(|e| UploadError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            gateway_host: config.gateway_host,
        })
    }

    /// Gateway host this client derives resolvable URLs against.
    pub fn gateway_host(&self) -> &str {
        &self.gateway_host
    }

    /// Pin an opaque binary object under `pin_name` and return its
    /// content reference in raw form.
    pub async fn pin_file(
        &self,
        bytes: Vec<u8>,
        pin_name: &str,
    ) -> Result<ContentRef, UploadError> {
        let size = bytes.len();
        let part = reqwest::multipart::Part::bytes(bytes).file_name(pin_name.to_string());
        let cid = self.pin_part(part, pin_name).await?;
        tracing::info!(pin_name, size, cid = %cid, "pinned file");
        Ok(cid)
    }

    /// Serialize `document` as JSON and pin it under `pin_name`.
    pub async fn pin_json<T: serde::Serialize>(
        &self,
        document: &T,
        pin_name: &str,
    ) -> Result<ContentRef, UploadError> {
        let bytes = serde_json::to_vec(document)?;
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(pin_name.to_string())
            .mime_str("application/json")
            .map_err(|e| UploadError::Config(format!("invalid mime type: {e}")))?;
        let cid = self.pin_part(part, pin_name).await?;
        tracing::info!(pin_name, cid = %cid, "pinned JSON document");
        Ok(cid)
    }

    async fn pin_part(
        &self,
        file_part: reqwest::multipart::Part,
        pin_name: &str,
    ) -> Result<ContentRef, UploadError> {
        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text(
                "pinataMetadata",
                serde_json::json!({ "name": pin_name }).to_string(),
            )
            .text(
                "pinataOptions",
                serde_json::json!({ "cidVersion": 1 }).to_string(),
            );

        let url = format!("{}{}", self.base_url, PIN_FILE_PATH);
        let resp = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|source| UploadError::Transport { source })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(UploadError::ServiceRejected {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: PinResponse = resp.json().await.map_err(|e| UploadError::InvalidResponse {
            reason: format!("body did not parse as a pin receipt: {e}"),
        })?;

        ContentRef::from_cid(&parsed.ipfs_hash).map_err(|_| UploadError::InvalidResponse {
            reason: format!("service returned malformed hash {:?}", parsed.ipfs_hash),
        })
    }
}
