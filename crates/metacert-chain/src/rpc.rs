//! # JSON-RPC Transport
//!
//! Thin JSON-RPC 2.0 client over HTTPS. One shared instance serves the
//! verifier and the indexer within a session — independent read calls
//! are safe concurrently; the indexer's sequential windowing is a
//! voluntary throttle on top, not a lock.
//!
//! ## Range-limit classification
//!
//! Public providers reject `eth_getLogs` queries that span more blocks
//! than their tier allows, and say so only in the error message. The
//! marker list in [`RpcError::is_range_limit`] is the single place that
//! classification lives — callers match on the classifier, never on
//! message substrings.

use std::time::Duration;

use serde::Deserialize;

/// Provider messages that mean "your block range is too large".
/// Matched case-insensitively against the JSON-RPC error message.
const RANGE_LIMIT_MARKERS: &[&str] = &[
    "block range",
    "range is too large",
    "query returned more than",
];

/// Errors from JSON-RPC calls.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// Transport failure — endpoint unreachable or request timed out.
    #[error("RPC endpoint unreachable: {source}")]
    Transport {
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint answered with a non-success HTTP status.
    #[error("RPC endpoint returned HTTP {status}")]
    Http {
        /// HTTP status code.
        status: u16,
    },

    /// The provider returned a JSON-RPC error object.
    #[error("RPC rejected {method}: {message} (code {code})")]
    Rpc {
        /// The method that was rejected.
        method: String,
        /// Provider error code.
        code: i64,
        /// Provider error message.
        message: String,
    },

    /// The response body did not parse as JSON-RPC at all.
    #[error("invalid RPC response: {reason}")]
    InvalidResponse {
        /// What was wrong with the body.
        reason: String,
    },

    /// Client-side configuration problem.
    #[error("RPC client configuration error: {0}")]
    Config(String),
}

impl RpcError {
    /// Whether the provider rejected the call for its block-range size.
    pub fn is_range_limit(&self) -> bool {
        match self {
            Self::Rpc { message, .. } => {
                let lower = message.to_lowercase();
                RANGE_LIMIT_MARKERS.iter().any(|m| lower.contains(m))
            }
            _ => false,
        }
    }
}

/// Configuration for the JSON-RPC client.
#[derive(Debug, Clone)]
pub struct RpcConfig {
    /// JSON-RPC endpoint URL (HTTPS in production).
    pub url: String,
    /// Request timeout in seconds (default: 30).
    pub timeout_secs: u64,
}

impl RpcConfig {
    /// Create a configuration with the default timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_secs: 30,
        }
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    result: Option<serde_json::Value>,
    error: Option<RpcErrorBody>,
}

/// JSON-RPC 2.0 client. Clone is cheap — the underlying connection
/// pool is shared.
#[derive(Debug, Clone)]
pub struct RpcClient {
    client: reqwest::Client,
    url: String,
}

impl RpcClient {
    /// Build a client from configuration.
    pub fn new(config: RpcConfig) -> Result<Self, RpcError> {
        url::Url::parse(&config.url)
            .map_err(|e| RpcError::Config(format!("invalid endpoint URL: {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RpcError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: config.url,
        })
    }

    /// Send one JSON-RPC request and return its `result` field.
    pub async fn call(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, RpcError> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1,
        });

        let resp = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|source| RpcError::Transport { source })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RpcError::Http {
                status: status.as_u16(),
            });
        }

        let envelope: RpcEnvelope =
            resp.json().await.map_err(|e| RpcError::InvalidResponse {
                reason: format!("body did not parse as JSON-RPC: {e}"),
            })?;

        if let Some(err) = envelope.error {
            return Err(RpcError::Rpc {
                method: method.to_string(),
                code: err.code,
                message: err.message,
            });
        }

        // `result: null` is a legitimate answer (pending receipt,
        // unknown transaction); hand it through as JSON null.
        Ok(envelope.result.unwrap_or(serde_json::Value::Null))
    }
}

/// Render a block number as the 0x-prefixed hex quantity the wire
/// format uses.
pub(crate) fn to_hex_quantity(n: u64) -> String {
    format!("0x{n:x}")
}

/// Parse a 0x-prefixed hex quantity.
pub(crate) fn from_hex_quantity(s: &str) -> Result<u64, RpcError> {
    u64::from_str_radix(s.trim_start_matches("0x"), 16).map_err(|e| {
        RpcError::InvalidResponse {
            reason: format!("invalid hex quantity {s:?}: {e}"),
        }
    })
}
