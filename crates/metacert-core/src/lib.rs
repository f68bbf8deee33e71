//! # metacert-core — Foundational Types for the MetaCert Stack
//!
//! I/O-free domain types shared by the pinning client, the ledger client,
//! and the API surface:
//!
//! - [`ContentRef`] — content-addressed reference in raw (`ipfs://`) or
//!   gateway (`https://…/ipfs/`) form, interchangeable by prefix
//!   substitution.
//! - [`CredentialMetadata`] — the human-readable credential document
//!   pinned alongside the artwork.
//! - [`Address`], [`TokenUid`], [`IssuerUid`] — ledger identifier
//!   newtypes. You cannot pass a token UID where an issuer UID is
//!   expected.
//! - [`Issuer`], [`Credential`] — ledger-resident records.
//! - [`BlockRange`] — a scan window over ledger history with a
//!   gap-free, overlap-free partition iterator.
//!
//! All validation happens at construction time; a value of one of these
//! types is well-formed by definition. Nothing in this crate performs
//! network or filesystem I/O.

pub mod content;
pub mod error;
pub mod metadata;
pub mod range;
pub mod types;

pub use content::ContentRef;
pub use error::ValidationError;
pub use metadata::CredentialMetadata;
pub use range::BlockRange;
pub use types::{Address, Credential, Issuer, IssuerUid, TokenUid};
