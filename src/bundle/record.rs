//! The JSON record sealed inside an export bundle.
//!
//! ```json
//! {
//!   "data": "<base64 payload>",
//!   "metadata": {
//!     "key": "db-url",
//!     "vault": "team/api",
//!     "label": "/home/me/.env",
//!     "comment": "Last modified: 2026-10-16T09:30:00.123456Z",
//!     "history": [
//!       { "data": "<base64>", "label": "...", "timestamp": "2026-10-15T08:00:00.000000Z" }
//!     ]
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

/// An exported entry: current payload plus metadata and history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleRecord {
    /// The current payload (base64 in JSON).
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub data: Vec<u8>,

    pub metadata: BundleMetadata,
}

/// Everything about the entry except its current payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleMetadata {
    pub key: String,

    /// Vault the entry was exported from.  Informational: imports
    /// always target the importer's active vault.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// Superseded versions, newest first.
    #[serde(default)]
    pub history: Vec<BundleHistoryEntry>,
}

/// One superseded version inside a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleHistoryEntry {
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub data: Vec<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// RFC 3339 time at which this version was superseded.
    pub timestamp: String,
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

pub(crate) fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let encoded = BASE64.encode(data);
    serializer.serialize_str(&encoded)
}

pub(crate) fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}
