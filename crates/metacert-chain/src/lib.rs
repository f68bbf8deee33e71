//! # metacert-chain — Ledger Client
//!
//! Everything this stack speaks to the credential ledger:
//!
//! - [`rpc`] — JSON-RPC 2.0 transport with provider error
//!   classification. One [`rpc::RpcClient`] is shared across the
//!   read-side components of a session.
//! - [`abi`] — minimal calldata codec for the contract's entry points;
//!   selectors precomputed, decodes bounds-checked.
//! - [`contract`] — typed bindings: reads via `eth_call`, writes via
//!   `eth_sendTransaction` with a provider-managed sender (no key
//!   custody here).
//! - [`tracker`] — awaitable transaction confirmation with a typed
//!   terminal result and signature-matched mint-UID extraction.
//! - [`verifier`] — holdership checks plus content resolution.
//! - [`indexer`] — chunked, rate-limit-aware historical scan of mint
//!   events.
//!
//! All configuration is passed in at construction; nothing reads
//! ambient global state.

pub mod abi;
pub mod contract;
pub mod error;
pub mod indexer;
pub mod rpc;
pub mod tracker;
pub mod verifier;

pub use contract::{CertLedger, LedgerConfig, MintEvent};
pub use error::ChainError;
pub use indexer::{
    HistoricalIndexer, IndexerConfig, IssuedCredential, ScanProgress, WindowRetryPolicy,
};
pub use rpc::{RpcClient, RpcConfig, RpcError};
pub use tracker::{ConfirmationTracker, LogRecord, TrackerConfig, TxHandle, TxReceipt};
pub use verifier::{CredentialVerifier, ResolvedMetadata, VerifierConfig};
