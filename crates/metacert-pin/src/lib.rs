//! # metacert-pin — Content Publisher
//!
//! Client of the content-addressed pinning service and the two-step
//! publish pipeline that turns an artwork file plus display fields into
//! two linked, pinned objects:
//!
//! 1. the asset itself, pinned under its original filename;
//! 2. a [`metacert_core::CredentialMetadata`] document referencing the
//!    asset by content identifier, pinned as `metadata.json`.
//!
//! The gateway-resolvable URL of the second object is what a mint
//! transaction embeds on-chain.
//!
//! ## Failure model
//!
//! Publishing failures abort the issuance attempt and surface as typed
//! [`UploadError`]s — no retries happen inside this crate. The
//! non-atomic two-step pipeline has one documented partial-failure
//! mode: see [`UploadError::MetadataPinFailed`].

pub mod client;
pub mod error;
pub mod publish;

pub use client::{PinataClient, PinataConfig};
pub use error::UploadError;
pub use publish::{Asset, PublishedCredential, Publisher};
