//! Secure store capability consumed by the entry layer.
//!
//! The entry layer only ever talks to a `SecureStore`: a flat map from
//! opaque account names to bytes plus two optional text attributes
//! (a label and a comment).  Two adapters are provided:
//! - `KeyringStore`: the OS credential store via the `keyring` crate
//! - `MemoryStore`: a deterministic in-process map used by tests

pub mod keyring;
pub mod memory;

use thiserror::Error;

pub use self::keyring::KeyringStore;
pub use memory::MemoryStore;

/// Status code reported when an item with the same account already exists.
pub const DUPLICATE_ITEM_CODE: i32 = -25299;

/// Status code used when an adapter cannot be more specific.
pub const UNKNOWN_STATUS_CODE: i32 = -1;

/// An error status returned by a `SecureStore` adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// `put` targeted an account that already exists.
    #[error("an item with this account name already exists")]
    Duplicate,

    /// Any other failure, with the adapter's status code.
    #[error("{message}")]
    Status { code: i32, message: String },
}

impl StoreError {
    /// Shorthand for an opaque failure with a code and message.
    pub fn status(code: i32, message: impl Into<String>) -> Self {
        StoreError::Status {
            code,
            message: message.into(),
        }
    }

    /// The numeric status code of this error.
    pub fn code(&self) -> i32 {
        match self {
            StoreError::Duplicate => DUPLICATE_ITEM_CODE,
            StoreError::Status { code, .. } => *code,
        }
    }
}

/// An item read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredItem {
    pub data: Vec<u8>,
    pub label: Option<String>,
    pub comment: Option<String>,
}

/// The attributes of an item, as returned by `list_all` (no payload).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemAttributes {
    pub account: String,
    pub label: Option<String>,
    pub comment: Option<String>,
}

/// A flat, account-addressed secure key-value store.
///
/// Calls block until complete and are not transactional across accounts.
pub trait SecureStore {
    /// Add an item.  Adapters that cannot overwrite in place return
    /// `StoreError::Duplicate` when the account already exists.
    fn put(
        &mut self,
        account: &str,
        data: &[u8],
        label: Option<&str>,
        comment: Option<&str>,
    ) -> Result<(), StoreError>;

    /// Read an item.  Returns `Ok(None)` when the account does not exist.
    fn get(&self, account: &str) -> Result<Option<StoredItem>, StoreError>;

    /// Remove an item.  Returns whether it existed.
    fn delete(&mut self, account: &str) -> Result<bool, StoreError>;

    /// Enumerate every item this application owns.
    fn list_all(&self) -> Result<Vec<ItemAttributes>, StoreError>;
}
