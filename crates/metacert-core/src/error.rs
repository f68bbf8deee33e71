//! Validation error hierarchy for domain-primitive construction.

use thiserror::Error;

/// Errors from validating domain primitives at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The string is neither a raw `ipfs://<cid>` reference nor a
    /// gateway `https://<host>/ipfs/<cid>` URL.
    #[error("invalid content reference: {0}")]
    InvalidContentRef(String),

    /// The string is not a 0x-prefixed 40-hex-digit account address.
    #[error("invalid account address: {0}")]
    InvalidAddress(String),

    /// A block range with `from_block > to_block`.
    #[error("invalid block range: from {from_block} > to {to_block}")]
    InvalidRange {
        /// Requested lower bound.
        from_block: u64,
        /// Requested upper bound.
        to_block: u64,
    },
}
