//! # Content References
//!
//! A [`ContentRef`] addresses an immutable object on the
//! content-addressed storage network. Two renderings exist and are
//! interchangeable by prefix substitution:
//!
//! - raw protocol form: `ipfs://<cid>`
//! - gateway-resolvable form: `https://<gateway-host>/ipfs/<cid>`
//!
//! Constructors accept either form and normalize to the raw form; the
//! gateway form is derived on demand. Consumers must accept both.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Raw protocol scheme prefix.
pub const IPFS_SCHEME: &str = "ipfs://";

/// Path segment every gateway rendering carries.
const GATEWAY_PATH: &str = "/ipfs/";

/// Default public resolution gateway.
pub const DEFAULT_GATEWAY: &str = "https://ipfs.io";

/// A content identifier reference, stored in raw `ipfs://<cid>` form.
///
/// Immutable and globally unique: the CID is derived from the pinned
/// object's bytes, so two equal references address identical content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ContentRef(String);

impl ContentRef {
    /// Parse a reference from either the raw or the gateway form.
    ///
    /// Returns [`ValidationError::InvalidContentRef`] for strings in
    /// neither form or with an empty CID suffix.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        let cid = if let Some(cid) = raw.strip_prefix(IPFS_SCHEME) {
            cid
        } else if let Some(idx) = raw.find(GATEWAY_PATH) {
            if !raw.starts_with("https://") && !raw.starts_with("http://") {
                return Err(ValidationError::InvalidContentRef(raw));
            }
            &raw[idx + GATEWAY_PATH.len()..]
        } else {
            return Err(ValidationError::InvalidContentRef(raw));
        };

        if cid.is_empty() || cid.contains('/') || cid.contains(char::is_whitespace) {
            return Err(ValidationError::InvalidContentRef(raw));
        }
        Ok(Self(format!("{IPFS_SCHEME}{cid}")))
    }

    /// Build a reference directly from a bare CID, as returned by the
    /// pinning service.
    pub fn from_cid(cid: impl AsRef<str>) -> Result<Self, ValidationError> {
        Self::new(format!("{IPFS_SCHEME}{}", cid.as_ref()))
    }

    /// The raw `ipfs://<cid>` rendering.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The bare content identifier, without any scheme.
    pub fn cid(&self) -> &str {
        // Constructed with the scheme prefix; strip cannot fail.
        self.0.strip_prefix(IPFS_SCHEME).unwrap_or(&self.0)
    }

    /// Derive the gateway-resolvable form for `gateway_host`
    /// (e.g. `https://ipfs.io`), substituting the scheme prefix and
    /// preserving the CID suffix.
    pub fn gateway_url(&self, gateway_host: &str) -> String {
        format!(
            "{}{}{}",
            gateway_host.trim_end_matches('/'),
            GATEWAY_PATH,
            self.cid()
        )
    }
}

impl std::fmt::Display for ContentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ContentRef {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// Deserializes as a plain string, then routes through `new()` so that
// invalid values are rejected at deserialization time. Gateway-form
// strings arriving in pinned documents normalize to the raw form.
impl<'de> Deserialize<'de> for ContentRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}
