use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of hex characters kept from a content hash when a raw record has no `oid`.
const CONTENT_ID_LEN: usize = 12;

/// Canonical order ID, namespaced by source kind (`open-`, `executed-`, `twap-`, `cancelled-`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// ID from the venue's own order number.
    pub fn from_venue(prefix: &str, oid: &str) -> Self {
        Self(format!("{prefix}-{oid}"))
    }

    /// Deterministic ID for a record that carries no venue order number.
    ///
    /// Hashes the record's canonical bytes together with its position in its
    /// source list, so byte-identical records in one batch still get distinct
    /// IDs and the same batch always yields the same IDs.
    pub fn from_content(prefix: &str, canonical: &[u8], position: usize) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(canonical);
        hasher.update(&(position as u64).to_le_bytes());
        let hash = hasher.finalize().to_hex();
        Self(format!("{prefix}-{}", &hash.as_str()[..CONTENT_ID_LEN]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trade leg ID. Positional: derived from the matcher's running output length.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradeId(pub String);

impl TradeId {
    pub fn new(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
