//! In-memory `SecureStore` used by tests.
//!
//! Behaves like a keychain that refuses to overwrite: `put` on an
//! existing account returns `StoreError::Duplicate`.  Writes can be made
//! to fail for selected account prefixes to exercise error paths.

use std::collections::BTreeMap;

use super::{ItemAttributes, SecureStore, StoreError, StoredItem};

/// Status code returned by injected failures.
pub const INJECTED_FAILURE_CODE: i32 = -34018;

/// A deterministic, ordered, process-local store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: BTreeMap<String, StoredItem>,
    failing_prefixes: Vec<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `put` and `delete` on accounts starting with `prefix` fail.
    pub fn fail_writes_with_prefix(&mut self, prefix: &str) {
        self.failing_prefixes.push(prefix.to_string());
    }

    /// Stop injecting failures.
    pub fn clear_failures(&mut self) {
        self.failing_prefixes.clear();
    }

    /// Number of items currently stored (any account family).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All account names, in order.
    pub fn accounts(&self) -> Vec<String> {
        self.items.keys().cloned().collect()
    }

    fn check_writable(&self, account: &str) -> Result<(), StoreError> {
        if self
            .failing_prefixes
            .iter()
            .any(|p| account.starts_with(p.as_str()))
        {
            return Err(StoreError::status(
                INJECTED_FAILURE_CODE,
                format!("write to '{account}' rejected"),
            ));
        }
        Ok(())
    }
}

impl SecureStore for MemoryStore {
    fn put(
        &mut self,
        account: &str,
        data: &[u8],
        label: Option<&str>,
        comment: Option<&str>,
    ) -> Result<(), StoreError> {
        self.check_writable(account)?;
        if self.items.contains_key(account) {
            return Err(StoreError::Duplicate);
        }
        self.items.insert(
            account.to_string(),
            StoredItem {
                data: data.to_vec(),
                label: label.map(str::to_string),
                comment: comment.map(str::to_string),
            },
        );
        Ok(())
    }

    fn get(&self, account: &str) -> Result<Option<StoredItem>, StoreError> {
        Ok(self.items.get(account).cloned())
    }

    fn delete(&mut self, account: &str) -> Result<bool, StoreError> {
        self.check_writable(account)?;
        Ok(self.items.remove(account).is_some())
    }

    fn list_all(&self) -> Result<Vec<ItemAttributes>, StoreError> {
        Ok(self
            .items
            .iter()
            .map(|(account, item)| ItemAttributes {
                account: account.clone(),
                label: item.label.clone(),
                comment: item.comment.clone(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get_returns_item() {
        let mut store = MemoryStore::new();
        store.put("a", b"data", Some("label"), None).unwrap();

        let item = store.get("a").unwrap().unwrap();
        assert_eq!(item.data, b"data");
        assert_eq!(item.label.as_deref(), Some("label"));
        assert_eq!(item.comment, None);
    }

    #[test]
    fn put_existing_account_is_duplicate() {
        let mut store = MemoryStore::new();
        store.put("a", b"1", None, None).unwrap();
        assert_eq!(store.put("a", b"2", None, None), Err(StoreError::Duplicate));
        assert_eq!(store.get("a").unwrap().unwrap().data, b"1");
    }

    #[test]
    fn delete_reports_whether_item_existed() {
        let mut store = MemoryStore::new();
        store.put("a", b"1", None, None).unwrap();
        assert!(store.delete("a").unwrap());
        assert!(!store.delete("a").unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn injected_failures_apply_by_prefix() {
        let mut store = MemoryStore::new();
        store.fail_writes_with_prefix("bad:");

        let err = store.put("bad:x", b"1", None, None).unwrap_err();
        assert_eq!(err.code(), INJECTED_FAILURE_CODE);
        assert!(store.put("good:x", b"1", None, None).is_ok());

        store.clear_failures();
        assert!(store.put("bad:x", b"1", None, None).is_ok());
    }

    #[test]
    fn list_all_is_ordered_by_account() {
        let mut store = MemoryStore::new();
        store.put("b", b"", None, Some("c")).unwrap();
        store.put("a", b"", None, None).unwrap();

        let accounts: Vec<String> = store
            .list_all()
            .unwrap()
            .into_iter()
            .map(|i| i.account)
            .collect();
        assert_eq!(accounts, vec!["a", "b"]);
    }
}
