//! # Contract Bindings
//!
//! Typed bindings for the credential contract's entry points, built on
//! the JSON-RPC transport and the minimal ABI codec.
//!
//! ## Signing
//!
//! Mutating calls go out as `eth_sendTransaction` with a configured
//! sender account — transaction signing is delegated to the RPC
//! endpoint's key management. This client holds no private keys. A
//! ledger constructed without a sender can read but not write; writes
//! fail with [`ChainError::NotConnected`].

use metacert_core::{Address, BlockRange, Issuer, IssuerUid, TokenUid};
use serde::Deserialize;

use crate::abi::{self, Token};
use crate::error::ChainError;
use crate::rpc::{from_hex_quantity, to_hex_quantity, RpcClient, RpcError};
use crate::tracker::TxHandle;

/// Configuration for the contract bindings.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Deployed contract address.
    pub contract_address: Address,
    /// Sender account for mutating calls, managed by the RPC provider.
    /// `None` means read-only: no signing identity is connected.
    pub sender: Option<Address>,
}

impl LedgerConfig {
    /// Read-only configuration.
    pub fn read_only(contract_address: Address) -> Self {
        Self {
            contract_address,
            sender: None,
        }
    }

    /// Attach a provider-managed sender account for mutating calls.
    pub fn with_sender(mut self, sender: Address) -> Self {
        self.sender = Some(sender);
        self
    }
}

/// A `certMinted` event row recovered from the ledger's logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintEvent {
    /// The minted token identifier carried in the event data.
    pub token_uid: TokenUid,
    /// Block the event was emitted in.
    pub block_number: u64,
    /// Hash of the originating transaction.
    pub transaction_hash: String,
    /// Position of the log within its block.
    pub log_index: u64,
}

/// Wire shape of an `eth_getLogs` row.
#[derive(Debug, Deserialize)]
struct RawLog {
    topics: Vec<String>,
    data: String,
    #[serde(rename = "blockNumber")]
    block_number: String,
    #[serde(rename = "transactionHash")]
    transaction_hash: String,
    #[serde(rename = "logIndex")]
    log_index: Option<String>,
}

/// Typed client for the credential contract.
#[derive(Debug, Clone)]
pub struct CertLedger {
    rpc: RpcClient,
    contract: Address,
    sender: Option<Address>,
}

impl CertLedger {
    /// Bind a transport to a deployed contract.
    pub fn new(rpc: RpcClient, config: LedgerConfig) -> Self {
        Self {
            rpc,
            contract: config.contract_address,
            sender: config.sender,
        }
    }

    /// The deployed contract address these bindings target.
    pub fn contract_address(&self) -> &Address {
        &self.contract
    }

    /// The transport, for components that share the connection.
    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    async fn eth_call(&self, data: String) -> Result<Vec<u8>, ChainError> {
        let params = serde_json::json!([
            { "to": self.contract.as_str(), "data": data },
            "latest",
        ]);
        let result = self.rpc.call("eth_call", params).await?;
        let body = result.as_str().ok_or_else(|| {
            RpcError::InvalidResponse {
                reason: "eth_call result is not a string".to_string(),
            }
        })?;
        Ok(abi::decode_body(body)?)
    }

    async fn send_transaction(&self, data: String) -> Result<TxHandle, ChainError> {
        let sender = self.sender.as_ref().ok_or(ChainError::NotConnected)?;
        let params = serde_json::json!([{
            "from": sender.as_str(),
            "to": self.contract.as_str(),
            "data": data,
        }]);
        let result = self.rpc.call("eth_sendTransaction", params).await?;
        let hash = result.as_str().ok_or_else(|| {
            RpcError::InvalidResponse {
                reason: "eth_sendTransaction result is not a string".to_string(),
            }
        })?;
        tracing::info!(tx_hash = hash, "submitted transaction");
        Ok(TxHandle {
            hash: hash.to_string(),
        })
    }

    /// Whether `owner` currently holds credential `token_uid`.
    ///
    /// `false` covers both "not the owner" and "token does not exist";
    /// the entry point does not distinguish them.
    pub async fn verify_cert(
        &self,
        owner: &Address,
        token_uid: TokenUid,
    ) -> Result<bool, ChainError> {
        let data = abi::encode_call(
            abi::VERIFY_CERT_SELECTOR,
            &[Token::Addr(owner), Token::Uint(token_uid.0)],
        )?;
        let body = self.eth_call(data).await?;
        Ok(abi::decode_bool(&body)?)
    }

    /// The metadata URL recorded for `token_uid` at mint time.
    pub async fn token_uri(&self, token_uid: TokenUid) -> Result<String, ChainError> {
        let data = abi::encode_call(abi::TOKEN_URI_SELECTOR, &[Token::Uint(token_uid.0)])?;
        let body = self.eth_call(data).await?;
        Ok(abi::decode_string(&body, 0)?)
    }

    /// The current holder of `token_uid`.
    pub async fn owner_of(&self, token_uid: TokenUid) -> Result<Address, ChainError> {
        let data = abi::encode_call(abi::OWNER_OF_SELECTOR, &[Token::Uint(token_uid.0)])?;
        let body = self.eth_call(data).await?;
        Ok(abi::decode_address(&body, 0)?)
    }

    /// Look up the issuer registry. Returns the raw record — an empty
    /// name marks an absent slot (the contract zeroes unknown UIDs
    /// rather than failing).
    pub async fn issuer_mapping(&self, uid: IssuerUid) -> Result<Issuer, ChainError> {
        let data = abi::encode_call(abi::ISSUER_MAPPING_SELECTOR, &[Token::Uint(uid.0)])?;
        let body = self.eth_call(data).await?;
        let (account_address, name, physical_address, govt_uid) =
            abi::decode_issuer_tuple(&body)?;
        Ok(Issuer {
            account_address,
            name,
            physical_address,
            govt_uid,
        })
    }

    /// Current head block number.
    pub async fn head_block(&self) -> Result<u64, ChainError> {
        let result = self
            .rpc
            .call("eth_blockNumber", serde_json::json!([]))
            .await?;
        let hex = result.as_str().ok_or_else(|| RpcError::InvalidResponse {
            reason: "eth_blockNumber result is not a string".to_string(),
        })?;
        Ok(from_hex_quantity(hex)?)
    }

    /// The sender (`from`) of a transaction, used to attribute a mint
    /// event to its economic origin.
    pub async fn transaction_sender(&self, tx_hash: &str) -> Result<Address, ChainError> {
        let result = self
            .rpc
            .call("eth_getTransactionByHash", serde_json::json!([tx_hash]))
            .await?;
        if result.is_null() {
            return Err(RpcError::InvalidResponse {
                reason: format!("transaction {tx_hash} not found"),
            }
            .into());
        }
        let from = result
            .get("from")
            .and_then(|f| f.as_str())
            .ok_or_else(|| RpcError::InvalidResponse {
                reason: format!("transaction {tx_hash} carries no sender"),
            })?;
        Address::new(from).map_err(|_| {
            RpcError::InvalidResponse {
                reason: format!("transaction {tx_hash} sender is malformed"),
            }
            .into()
        })
    }

    /// Fetch `certMinted` events for one scan window, preserving the
    /// provider's log order.
    pub async fn cert_minted_logs(
        &self,
        window: BlockRange,
    ) -> Result<Vec<MintEvent>, ChainError> {
        let params = serde_json::json!([{
            "address": self.contract.as_str(),
            "topics": [abi::CERT_MINTED_TOPIC],
            "fromBlock": to_hex_quantity(window.from_block()),
            "toBlock": to_hex_quantity(window.to_block()),
        }]);
        let result = self.rpc.call("eth_getLogs", params).await?;
        let raw: Vec<RawLog> =
            serde_json::from_value(result).map_err(|e| RpcError::InvalidResponse {
                reason: format!("eth_getLogs result did not parse: {e}"),
            })?;

        let mut events = Vec::with_capacity(raw.len());
        for log in raw {
            // Only logs carrying the mint signature in topic0 belong here.
            let matches_signature = log
                .topics
                .first()
                .is_some_and(|t| t.eq_ignore_ascii_case(abi::CERT_MINTED_TOPIC));
            if !matches_signature {
                tracing::warn!(tx_hash = %log.transaction_hash, "skipping log with foreign topic");
                continue;
            }
            let body = abi::decode_body(&log.data)?;
            let token_uid = TokenUid(abi::decode_u64(&body, 0)?);
            events.push(MintEvent {
                token_uid,
                block_number: from_hex_quantity(&log.block_number)?,
                transaction_hash: log.transaction_hash,
                log_index: log
                    .log_index
                    .as_deref()
                    .map(from_hex_quantity)
                    .transpose()?
                    .unwrap_or(0),
            });
        }
        Ok(events)
    }

    /// Submit a mint transaction binding `token_uid` to `owner` with
    /// the given metadata URL. Returns a pending handle — the call may
    /// still be rejected before inclusion.
    pub async fn mint_cert(
        &self,
        token_uid: TokenUid,
        owner: &Address,
        metadata_url: &str,
    ) -> Result<TxHandle, ChainError> {
        if metadata_url.is_empty() {
            return Err(ChainError::InvalidArgument {
                reason: "metadata URL must not be empty".to_string(),
            });
        }
        let data = abi::encode_call(
            abi::MINT_CERT_SELECTOR,
            &[
                Token::Uint(token_uid.0),
                Token::Addr(owner),
                Token::Str(metadata_url),
            ],
        )?;
        self.send_transaction(data).await
    }

    /// Submit an issuer registration. `govt_uid` and
    /// `chain_id_selector` must be positive; `name` must be non-empty.
    pub async fn register_issuer(
        &self,
        name: &str,
        physical_address: &str,
        govt_uid: u64,
        chain_id_selector: u64,
    ) -> Result<TxHandle, ChainError> {
        if name.is_empty() {
            return Err(ChainError::InvalidArgument {
                reason: "issuer name must not be empty".to_string(),
            });
        }
        if govt_uid == 0 {
            return Err(ChainError::InvalidArgument {
                reason: "government UID must be positive".to_string(),
            });
        }
        if chain_id_selector == 0 {
            return Err(ChainError::InvalidArgument {
                reason: "chain ID selector must be positive".to_string(),
            });
        }
        let data = abi::encode_call(
            abi::REGISTER_ISSUER_SELECTOR,
            &[
                Token::Str(name),
                Token::Str(physical_address),
                Token::Uint(govt_uid),
                Token::Uint(chain_id_selector),
            ],
        )?;
        self.send_transaction(data).await
    }
}
