//! # Ledger Identifier Newtypes and Records
//!
//! Domain primitives for the ledger side of the stack. Identifiers are
//! distinct types; records mirror what the contract stores.
//!
//! [`Address`] equality and hashing are case-insensitive: checksummed
//! and lowercased renderings of the same account compare equal, which
//! is what the event-origin filtering in the indexer relies on.

use serde::{Deserialize, Serialize};

use crate::content::ContentRef;
use crate::error::ValidationError;

/// A 0x-prefixed, 40-hex-digit account address.
///
/// The original casing is preserved for display; comparisons and
/// hashing normalize to lowercase.
#[derive(Debug, Clone, Serialize)]
pub struct Address(String);

impl Address {
    /// Parse and validate an address string.
    ///
    /// Returns [`ValidationError::InvalidAddress`] unless the string is
    /// `0x` followed by exactly 40 hex digits.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        if raw.len() == 42
            && raw.starts_with("0x")
            && raw[2..].chars().all(|c| c.is_ascii_hexdigit())
        {
            Ok(Self(raw))
        } else {
            Err(ValidationError::InvalidAddress(raw))
        }
    }

    /// The address as originally rendered.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The canonical lowercase rendering used for comparison.
    pub fn to_lowercase(&self) -> String {
        self.0.to_lowercase()
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for Address {}

impl std::hash::Hash for Address {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_lowercase().hash(state);
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Address {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// The numeric identifier of a minted credential token.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TokenUid(pub u64);

impl std::fmt::Display for TokenUid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The numeric identifier of a registered issuing authority.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct IssuerUid(pub u64);

impl std::fmt::Display for IssuerUid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered issuing authority, as stored in the ledger's issuer
/// registry. An empty `name` marks an absent registry slot — the
/// contract returns zeroed fields for unknown UIDs rather than failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issuer {
    /// The account that signs this authority's mint transactions.
    pub account_address: Address,
    /// Registered display name.
    pub name: String,
    /// Physical (postal) address of the authority.
    pub physical_address: String,
    /// Government-assigned registration number.
    pub govt_uid: u64,
}

impl Issuer {
    /// Whether this record is a real registration. The registry hands
    /// back zeroed fields for unknown UIDs; the name field is the
    /// discriminator.
    pub fn is_registered(&self) -> bool {
        !self.name.is_empty()
    }
}

/// A ledger-resident credential: token bound to an owner and a
/// metadata reference at mint time. `metadata_ref` is immutable once
/// minted; `owner` may change by later transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// The minted token identifier.
    pub token_uid: TokenUid,
    /// Current holder.
    pub owner: Address,
    /// Reference to the pinned metadata document.
    pub metadata_ref: ContentRef,
    /// The authority that minted it.
    pub issuer_uid: IssuerUid,
}
