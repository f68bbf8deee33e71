//! # Transaction Confirmation Tracker
//!
//! A submitted mutating call moves through
//! `Submitted → Confirmed(receipt) | Rejected(error)`. The tracker
//! models the wait as an explicit awaitable task with a typed terminal
//! result — no callback registration — polling the ledger for a receipt
//! until inclusion or a configured timeout.
//!
//! ## Minted-identifier extraction
//!
//! The minted token UID is located by matching the `certMinted`
//! signature across the receipt's logs. Emitted-event ordering depends
//! on contract internals, so the position of the mint record is not
//! assumed; the record's presence is validated before any field is
//! read.

use std::time::Duration;

use metacert_core::TokenUid;
use serde::Deserialize;

use crate::abi;
use crate::error::ChainError;
use crate::rpc::{from_hex_quantity, RpcClient, RpcError};

/// A pending reference to a submitted mutating call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxHandle {
    /// The transaction hash the ledger assigned at submission.
    pub hash: String,
}

/// One emitted event record inside a confirmed receipt, in emission
/// order.
#[derive(Debug, Clone, Deserialize)]
pub struct LogRecord {
    /// Emitting contract.
    pub address: String,
    /// Indexed topics; topic0 is the event signature hash.
    pub topics: Vec<String>,
    /// Non-indexed payload words.
    pub data: String,
}

/// Wire shape of `eth_getTransactionReceipt`.
#[derive(Debug, Deserialize)]
struct RawReceipt {
    status: Option<String>,
    #[serde(rename = "blockNumber")]
    block_number: Option<String>,
    #[serde(rename = "transactionHash")]
    transaction_hash: String,
    #[serde(default)]
    logs: Vec<LogRecord>,
}

/// The terminal record of a confirmed transaction.
#[derive(Debug, Clone)]
pub struct TxReceipt {
    /// Hash of the included transaction.
    pub transaction_hash: String,
    /// Block the transaction landed in.
    pub block_number: u64,
    /// Emitted event records, in emission order.
    pub logs: Vec<LogRecord>,
}

impl TxReceipt {
    /// Extract the minted token UID from this receipt's `certMinted`
    /// event. Fails with a typed error when the receipt carries no such
    /// event or its payload is malformed — never indexes blindly.
    pub fn minted_token_uid(&self) -> Result<TokenUid, ChainError> {
        let record = self
            .logs
            .iter()
            .find(|log| {
                log.topics
                    .first()
                    .is_some_and(|t| t.eq_ignore_ascii_case(abi::CERT_MINTED_TOPIC))
            })
            .ok_or_else(|| ChainError::TransactionFailed {
                reason: format!(
                    "receipt for {} carries no certMinted event among {} logs",
                    self.transaction_hash,
                    self.logs.len()
                ),
            })?;
        let body = abi::decode_body(&record.data)?;
        Ok(TokenUid(abi::decode_u64(&body, 0)?))
    }
}

/// Configuration for confirmation polling.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Pause between receipt polls (default: 2s).
    pub poll_interval: Duration,
    /// Give up waiting after this long (default: 120s).
    pub timeout: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Awaits inclusion of submitted transactions.
#[derive(Debug, Clone)]
pub struct ConfirmationTracker {
    rpc: RpcClient,
    config: TrackerConfig,
}

impl ConfirmationTracker {
    /// Build a tracker over a shared transport.
    pub fn new(rpc: RpcClient, config: TrackerConfig) -> Self {
        Self { rpc, config }
    }

    /// Suspend until the network reports inclusion of `handle`.
    ///
    /// Returns the receipt on success. Fails with
    /// [`ChainError::TransactionFailed`] if the call reverted (receipt
    /// status `0x0`) or the configured timeout elapsed while the
    /// transaction was still pending.
    pub async fn await_confirmation(&self, handle: &TxHandle) -> Result<TxReceipt, ChainError> {
        let deadline = tokio::time::Instant::now() + self.config.timeout;

        loop {
            let result = self
                .rpc
                .call(
                    "eth_getTransactionReceipt",
                    serde_json::json!([handle.hash]),
                )
                .await?;

            if !result.is_null() {
                let raw: RawReceipt =
                    serde_json::from_value(result).map_err(|e| RpcError::InvalidResponse {
                        reason: format!("receipt did not parse: {e}"),
                    })?;

                if raw.status.as_deref() == Some("0x0") {
                    return Err(ChainError::TransactionFailed {
                        reason: format!("transaction {} reverted", raw.transaction_hash),
                    });
                }

                let block_number = raw
                    .block_number
                    .as_deref()
                    .map(from_hex_quantity)
                    .transpose()?
                    .unwrap_or(0);

                tracing::info!(
                    tx_hash = %raw.transaction_hash,
                    block_number,
                    logs = raw.logs.len(),
                    "transaction confirmed"
                );
                return Ok(TxReceipt {
                    transaction_hash: raw.transaction_hash,
                    block_number,
                    logs: raw.logs,
                });
            }

            if tokio::time::Instant::now() + self.config.poll_interval > deadline {
                return Err(ChainError::TransactionFailed {
                    reason: format!(
                        "confirmation of {} timed out after {:?}",
                        handle.hash, self.config.timeout
                    ),
                });
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }
}
