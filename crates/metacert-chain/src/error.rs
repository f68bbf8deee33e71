//! Ledger client error types.
//!
//! One taxonomy for everything past the pinning step: connection state,
//! argument validation, transaction lifecycle, verification, content
//! resolution, and indexing. Transport and codec causes are wrapped so
//! callers can still reach them through `source()`.

use metacert_core::{Address, IssuerUid, TokenUid};

use crate::abi::AbiError;
use crate::rpc::RpcError;

/// Errors from ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// A mutating call was attempted without a configured sender
    /// account — there is no signing identity to submit as.
    #[error("no signing identity connected; configure a sender account")]
    NotConnected,

    /// A mint/register parameter is missing or malformed.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// Which argument, and what was wrong with it.
        reason: String,
    },

    /// A submitted transaction reverted or its confirmation timed out.
    #[error("transaction failed: {reason}")]
    TransactionFailed {
        /// Revert/timeout diagnostics.
        reason: String,
    },

    /// The ownership check came back negative. Covers both "not the
    /// owner" and "token does not exist" — the ledger entry point does
    /// not distinguish them.
    #[error("verification failed: {owner} does not hold credential {token_uid}")]
    VerificationFailed {
        /// The address that was checked.
        owner: Address,
        /// The credential that was checked.
        token_uid: TokenUid,
    },

    /// The credential's metadata document could not be fetched or
    /// parsed.
    #[error("credential metadata unavailable: {reason}")]
    MetadataUnavailable {
        /// Fetch/parse diagnostics.
        reason: String,
    },

    /// The issuer registry has no entry under this UID.
    #[error("issuer {issuer_uid} not found in registry")]
    IssuerNotFound {
        /// The UID that was looked up.
        issuer_uid: IssuerUid,
    },

    /// A scan was requested with inverted bounds.
    #[error("invalid scan range: from {from_block} > to {to_block}")]
    InvalidRange {
        /// Requested lower bound.
        from_block: u64,
        /// Requested upper bound.
        to_block: u64,
    },

    /// JSON-RPC transport or provider failure.
    #[error("ledger RPC error: {0}")]
    Rpc(#[from] RpcError),

    /// The ledger answered with data this client could not decode.
    #[error("ABI decode error: {0}")]
    Abi(#[from] AbiError),
}

impl ChainError {
    /// Whether this error is the provider rejecting a log query for
    /// its block-range size, making a degraded retry worthwhile.
    pub fn is_range_limit(&self) -> bool {
        matches!(self, Self::Rpc(e) if e.is_range_limit())
    }
}
