//! OS keyring adapter for the secure store.
//!
//! Stores each account as its own credential in the operating system's
//! secure credential store:
//! - macOS: Keychain
//! - Windows: Credential Manager
//! - Linux: kernel keyutils
//!
//! A credential holds a small JSON record with the payload (base64) and
//! the label/comment attributes.  OS keyrings cannot be enumerated
//! portably, so the adapter keeps its own index of the account names it
//! has written in one extra credential.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{ItemAttributes, SecureStore, StoreError, StoredItem, UNKNOWN_STATUS_CODE};
use crate::bundle::record::{base64_decode, base64_encode};

/// Default keyring service name.
pub const DEFAULT_SERVICE: &str = "envpocket";

/// Account name of the index credential.  Matches neither entry prefix.
const INDEX_ACCOUNT: &str = "__envpocket_index__";

/// What is serialized into each credential's secret.
#[derive(Serialize, Deserialize)]
struct KeyringRecord {
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    data: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
}

/// `SecureStore` backed by the platform credential store.
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    /// Create a store scoped to a keyring service name.
    pub fn new(service: &str) -> Self {
        Self {
            service: service.to_string(),
        }
    }

    fn entry(&self, account: &str) -> Result<::keyring::Entry, StoreError> {
        ::keyring::Entry::new(&self.service, account).map_err(map_keyring_error)
    }

    /// Read the raw secret of an account, `None` if absent.
    fn read_secret(&self, account: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match self.entry(account)?.get_secret() {
            Ok(secret) => Ok(Some(secret)),
            Err(::keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(map_keyring_error(e)),
        }
    }

    fn read_index(&self) -> Result<BTreeSet<String>, StoreError> {
        match self.read_secret(INDEX_ACCOUNT)? {
            Some(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                StoreError::status(UNKNOWN_STATUS_CODE, format!("keyring index is corrupt: {e}"))
            }),
            None => Ok(BTreeSet::new()),
        }
    }

    fn write_index(&self, index: &BTreeSet<String>) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(index).map_err(|e| {
            StoreError::status(UNKNOWN_STATUS_CODE, format!("keyring index encoding: {e}"))
        })?;
        self.entry(INDEX_ACCOUNT)?
            .set_secret(&bytes)
            .map_err(map_keyring_error)
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE)
    }
}

impl SecureStore for KeyringStore {
    fn put(
        &mut self,
        account: &str,
        data: &[u8],
        label: Option<&str>,
        comment: Option<&str>,
    ) -> Result<(), StoreError> {
        let record = KeyringRecord {
            data: data.to_vec(),
            label: label.map(str::to_string),
            comment: comment.map(str::to_string),
        };
        let bytes = serde_json::to_vec(&record).map_err(|e| {
            StoreError::status(UNKNOWN_STATUS_CODE, format!("record encoding: {e}"))
        })?;

        // The credential store overwrites in place, so no Duplicate here.
        indexed_write(
            || {
                let mut index = self.read_index()?;
                if index.insert(account.to_string()) {
                    self.write_index(&index)?;
                }
                Ok(())
            },
            || {
                self.entry(account)?
                    .set_secret(&bytes)
                    .map_err(map_keyring_error)
            },
        )?;
        tracing::debug!(account, "keyring item written");
        Ok(())
    }

    fn get(&self, account: &str) -> Result<Option<StoredItem>, StoreError> {
        let Some(bytes) = self.read_secret(account)? else {
            return Ok(None);
        };
        let record: KeyringRecord = serde_json::from_slice(&bytes).map_err(|e| {
            StoreError::status(
                UNKNOWN_STATUS_CODE,
                format!("keyring item '{account}' is not an envpocket record: {e}"),
            )
        })?;
        Ok(Some(StoredItem {
            data: record.data,
            label: record.label,
            comment: record.comment,
        }))
    }

    fn delete(&mut self, account: &str) -> Result<bool, StoreError> {
        let existed = match self.entry(account)?.delete_credential() {
            Ok(()) => true,
            Err(::keyring::Error::NoEntry) => false, // Already gone, that's fine.
            Err(e) => return Err(map_keyring_error(e)),
        };

        let mut index = self.read_index()?;
        if index.remove(account) {
            self.write_index(&index)?;
        }
        Ok(existed)
    }

    fn list_all(&self) -> Result<Vec<ItemAttributes>, StoreError> {
        let mut items = Vec::new();
        for account in self.read_index()? {
            // Stale index names (removed outside envpocket) are skipped.
            match self.get(&account)? {
                Some(item) => items.push(ItemAttributes {
                    account,
                    label: item.label,
                    comment: item.comment,
                }),
                None => tracing::debug!(%account, "skipping stale keyring index entry"),
            }
        }
        Ok(items)
    }
}

/// Record the account in the index, then write it.
///
/// A secret is never stored without an index entry.  A stale index entry
/// left by a failed write is skipped by `list_all`.
fn indexed_write(
    index: impl FnOnce() -> Result<(), StoreError>,
    write: impl FnOnce() -> Result<(), StoreError>,
) -> Result<(), StoreError> {
    index()?;
    write()
}

/// Translate a `keyring::Error` into a store status.
fn map_keyring_error(err: ::keyring::Error) -> StoreError {
    let code = match &err {
        ::keyring::Error::PlatformFailure(_) => 1,
        ::keyring::Error::NoStorageAccess(_) => 2,
        ::keyring::Error::NoEntry => 3,
        ::keyring::Error::BadEncoding(_) => 4,
        ::keyring::Error::TooLong(_, _) => 5,
        ::keyring::Error::Invalid(_, _) => 6,
        ::keyring::Error::Ambiguous(_) => 7,
        _ => UNKNOWN_STATUS_CODE,
    };
    StoreError::status(code, format!("keyring: {err}"))
}
