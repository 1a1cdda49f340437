//! High-level entry operations used by CLI commands.
//!
//! `EntryStore` composes the account name codec, the wildcard matcher,
//! and the history reconstruction over a `SecureStore`, scoped to one
//! vault chosen at construction.
//!
//! None of the multi-item sequences here are atomic.  `save` copies the
//! current value to history and then overwrites it; `delete` removes the
//! current item and then each history item.  Both are safe to retry.

use std::collections::BTreeMap;

use super::clock::{Clock, SystemClock};
use super::entry::{
    modified_comment, parse_modified_comment, DeleteReport, Entry, EntrySummary, HistoryVersion,
    ImportOutcome, Origin, PatternDeleteReport, SaveOutcome, VaultListing,
};
use super::history;
use super::keys::{self, encode_current, encode_history, format_timestamp, validate_key};
use super::vault::Vault;
use super::wildcard::WildcardPattern;
use crate::bundle::{self, BundleHistoryEntry, BundleMetadata, BundleRecord};
use crate::errors::{EnvPocketError, Result};
use crate::store::{SecureStore, StoreError, StoredItem};

/// The main entry handle.  Create one per command with the active vault.
pub struct EntryStore<S: SecureStore> {
    store: S,
    vault: Option<Vault>,
    clock: Box<dyn Clock>,
}

impl<S: SecureStore> EntryStore<S> {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Scope a secure store to `vault` (`None` = default scope).
    pub fn new(store: S, vault: Option<Vault>) -> Self {
        Self::with_clock(store, vault, SystemClock)
    }

    /// Like `new`, with an explicit time source for history timestamps.
    pub fn with_clock(store: S, vault: Option<Vault>, clock: impl Clock + 'static) -> Self {
        Self {
            store,
            vault,
            clock: Box::new(clock),
        }
    }

    // ------------------------------------------------------------------
    // Entry operations
    // ------------------------------------------------------------------

    /// Save `payload` as the current value of `key`.
    ///
    /// An existing current value is first copied to a history entry
    /// stamped with the current time.  That copy is best-effort: if it
    /// fails, a warning is logged and returned in the outcome, and the
    /// new value is still written.  Only a failure to write the new
    /// current value fails the save.
    pub fn save(&mut self, key: &str, payload: &[u8], origin: &Origin) -> Result<SaveOutcome> {
        validate_key(key)?;
        let now = self.clock.now();
        self.save_at(key, payload, Some(origin.label()), &modified_comment(now), now)
    }

    fn save_at(
        &mut self,
        key: &str,
        payload: &[u8],
        label: Option<&str>,
        comment: &str,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<SaveOutcome> {
        let current = encode_current(self.vault.as_ref(), key);

        let (had_previous, history_warning) = match self.store.get(&current) {
            Ok(Some(previous)) => {
                let account = encode_history(self.vault.as_ref(), key, now);
                let warning = match self.write_item(&account, &previous) {
                    Ok(()) => {
                        tracing::debug!(key, %account, "rotated previous value to history");
                        None
                    }
                    Err(e) => {
                        tracing::warn!(key, error = %e, "could not copy previous value to history");
                        Some(format!("previous version was not kept in history: {e}"))
                    }
                };
                (true, warning)
            }
            Ok(None) => (false, None),
            Err(e) => {
                tracing::warn!(key, error = %e, "could not read previous value for history");
                (
                    false,
                    Some(format!("could not check for a previous version: {e}")),
                )
            }
        };

        let item = StoredItem {
            data: payload.to_vec(),
            label: label.map(str::to_string),
            comment: Some(comment.to_string()),
        };
        self.write_item(&current, &item)?;
        tracing::debug!(key, had_previous, "saved current value");

        Ok(SaveOutcome {
            had_previous,
            history_warning,
        })
    }

    /// Read the current value of `key`, or the version `version` saves back.
    ///
    /// `Some(0)` is the most recently superseded value.
    pub fn get(&self, key: &str, version: Option<usize>) -> Result<Entry> {
        validate_key(key)?;
        match version {
            None => {
                let item = self
                    .store
                    .get(&encode_current(self.vault.as_ref(), key))?
                    .ok_or_else(|| EnvPocketError::NotFound(key.to_string()))?;
                Ok(Entry {
                    key: key.to_string(),
                    last_modified: item.comment.as_deref().and_then(parse_modified_comment),
                    origin: item.label.as_deref().map(Origin::from_label),
                    payload: item.data,
                })
            }
            Some(index) => {
                let versions = self.history_index(key)?;
                if versions.is_empty() && !self.exists(key)? {
                    return Err(EnvPocketError::NotFound(key.to_string()));
                }
                let (account, timestamp) =
                    versions
                        .get(index)
                        .ok_or_else(|| EnvPocketError::InvalidVersionIndex {
                            key: key.to_string(),
                            index,
                            available: versions.len(),
                        })?;
                let item = self
                    .store
                    .get(account)?
                    .ok_or_else(|| EnvPocketError::NotFound(format!("{key} (version {index})")))?;
                Ok(Entry {
                    key: key.to_string(),
                    payload: item.data,
                    origin: item.label.as_deref().map(Origin::from_label),
                    last_modified: Some(*timestamp),
                })
            }
        }
    }

    /// All superseded versions of `key`, newest first.
    pub fn history(&self, key: &str) -> Result<Vec<HistoryVersion>> {
        validate_key(key)?;
        if !self.exists(key)? {
            return Err(EnvPocketError::NotFound(key.to_string()));
        }

        let mut versions = Vec::new();
        for (index, (account, timestamp)) in self.history_index(key)?.into_iter().enumerate() {
            // Items removed between listing and reading are skipped.
            let Some(item) = self.store.get(&account)? else {
                continue;
            };
            versions.push(HistoryVersion {
                index,
                account,
                timestamp,
                origin: item.label.as_deref().map(Origin::from_label),
                size: item.data.len(),
            });
        }
        Ok(versions)
    }

    /// Delete `key` and all of its history.
    ///
    /// History items are removed even when no current value exists, but
    /// the call then fails with `NotFound`.
    pub fn delete(&mut self, key: &str) -> Result<DeleteReport> {
        validate_key(key)?;
        let report = self.remove_all(key)?;
        if !report.current_removed {
            return Err(EnvPocketError::NotFound(key.to_string()));
        }
        Ok(report)
    }

    /// Remove the current item and every history item of `key`.
    ///
    /// A missing current item is not an error here.
    fn remove_all(&mut self, key: &str) -> Result<DeleteReport> {
        let history_accounts: Vec<String> = self
            .history_index(key)?
            .into_iter()
            .map(|(account, _)| account)
            .collect();

        let current_removed = self
            .store
            .delete(&encode_current(self.vault.as_ref(), key))?;

        let mut history_removed = 0;
        let mut first_error: Option<StoreError> = None;
        for account in &history_accounts {
            match self.store.delete(account) {
                Ok(true) => history_removed += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(key, %account, error = %e, "could not delete history entry");
                    first_error.get_or_insert(e);
                }
            }
        }
        tracing::debug!(key, current_removed, history_removed, "deleted entry");

        if let Some(e) = first_error {
            return Err(e.into());
        }
        Ok(DeleteReport {
            current_removed,
            history_removed,
        })
    }

    /// Delete every key in scope matching a wildcard pattern.
    ///
    /// Every candidate is attempted, including keys left with history but
    /// no current value.  Fails with `NoMatches` when nothing matches and
    /// with `PartialDelete` when any single deletion failed.
    pub fn delete_matching(&mut self, pattern: &str) -> Result<PatternDeleteReport> {
        let candidates = self.match_keys(pattern)?;
        if candidates.is_empty() {
            return Err(EnvPocketError::NoMatches(pattern.to_string()));
        }

        let mut report = PatternDeleteReport::default();
        let mut failed_keys = Vec::new();
        for key in &candidates {
            match self.remove_all(key) {
                Ok(r) => report.deleted.push((key.clone(), r)),
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "pattern delete failed for key");
                    failed_keys.push(key.clone());
                }
            }
        }

        if !failed_keys.is_empty() {
            return Err(EnvPocketError::PartialDelete {
                attempted: candidates.len(),
                deleted: report.deleted.len(),
                failed_keys,
            });
        }
        Ok(report)
    }

    /// Summaries of every entry in scope, sorted by key.
    ///
    /// Keys that only have history (an interrupted delete) are included
    /// with no last-modified time or origin.
    pub fn list(&self) -> Result<Vec<EntrySummary>> {
        let mut summaries: BTreeMap<String, EntrySummary> = BTreeMap::new();

        for item in self.store.list_all()? {
            let Some(decoded) = keys::decode(&item.account) else {
                continue;
            };
            if !decoded.in_scope(self.vault.as_ref()) {
                continue;
            }
            if decoded.is_history() {
                if decoded.parsed_timestamp().is_none() {
                    continue;
                }
                summaries
                    .entry(decoded.key.clone())
                    .or_insert_with(|| EntrySummary::empty(decoded.key))
                    .history_count += 1;
            } else {
                let summary = summaries
                    .entry(decoded.key.clone())
                    .or_insert_with(|| EntrySummary::empty(decoded.key));
                summary.last_modified = item.comment.as_deref().and_then(parse_modified_comment);
                summary.origin = item.label.as_deref().map(Origin::from_label);
            }
        }

        Ok(summaries.into_values().collect())
    }

    /// Vaults seen across the whole store, ignoring the active scope.
    pub fn list_vaults(&self) -> Result<VaultListing> {
        let mut listing = VaultListing::default();
        for item in self.store.list_all()? {
            let Some(decoded) = keys::decode(&item.account) else {
                continue;
            };
            let is_current = !decoded.is_history();
            match decoded.vault {
                Some(vault) => {
                    let count = listing.vaults.entry(vault).or_default();
                    if is_current {
                        *count += 1;
                    }
                }
                None if is_current => listing.default_count += 1,
                None => {}
            }
        }
        Ok(listing)
    }

    /// Sorted keys in scope whose name matches `pattern`.
    ///
    /// A key counts if it has a current value or any history entry with a
    /// readable timestamp.
    pub fn match_keys(&self, pattern: &str) -> Result<Vec<String>> {
        let matcher = WildcardPattern::compile(pattern);
        let mut matched: Vec<String> = self
            .store
            .list_all()?
            .into_iter()
            .filter_map(|item| keys::decode(&item.account))
            .filter(|d| d.in_scope(self.vault.as_ref()))
            .filter(|d| !d.is_history() || d.parsed_timestamp().is_some())
            .map(|d| d.key)
            .filter(|k| matcher.matches(k))
            .collect();
        matched.sort();
        matched.dedup();
        Ok(matched)
    }

    // ------------------------------------------------------------------
    // Export / import
    // ------------------------------------------------------------------

    /// Export `key` with its full history as an encrypted bundle.
    pub fn export(&self, key: &str, passphrase: &[u8]) -> Result<Vec<u8>> {
        validate_key(key)?;
        let current = self
            .store
            .get(&encode_current(self.vault.as_ref(), key))?
            .ok_or_else(|| EnvPocketError::NotFound(key.to_string()))?;

        let mut history = Vec::new();
        for (account, timestamp) in self.history_index(key)? {
            let Some(item) = self.store.get(&account)? else {
                continue;
            };
            history.push(BundleHistoryEntry {
                data: item.data,
                label: item.label,
                timestamp: format_timestamp(timestamp),
            });
        }

        let record = BundleRecord {
            data: current.data,
            metadata: BundleMetadata {
                key: key.to_string(),
                vault: self.vault.as_ref().map(|v| v.as_str().to_string()),
                label: current.label,
                comment: current.comment,
                history,
            },
        };
        tracing::debug!(key, versions = record.metadata.history.len(), "exporting entry");
        bundle::seal(&record, passphrase)
    }

    /// Import a bundle into the active scope.
    ///
    /// The current value goes through the normal save path, so an
    /// existing local value is kept as history.  Exported history is then
    /// written back at its original timestamps.
    pub fn import(&mut self, bundle_bytes: &[u8], passphrase: &[u8]) -> Result<ImportOutcome> {
        let record = bundle::open(bundle_bytes, passphrase)?;
        let meta = record.metadata;

        validate_key(&meta.key)
            .map_err(|e| EnvPocketError::ParseError(format!("bundle key: {e}")))?;
        let mut history = Vec::with_capacity(meta.history.len());
        for version in meta.history {
            let timestamp = keys::parse_timestamp(&version.timestamp).ok_or_else(|| {
                EnvPocketError::ParseError(format!(
                    "invalid history timestamp '{}'",
                    version.timestamp
                ))
            })?;
            history.push((timestamp, version));
        }

        let now = self.clock.now();
        let comment = meta.comment.unwrap_or_else(|| modified_comment(now));
        let saved = self.save_at(&meta.key, &record.data, meta.label.as_deref(), &comment, now)?;

        let mut history_restored = 0;
        let mut history_failed = 0;
        for (timestamp, version) in history {
            let account = encode_history(self.vault.as_ref(), &meta.key, timestamp);
            let item = StoredItem {
                data: version.data,
                label: version.label,
                comment: None,
            };
            match self.write_item(&account, &item) {
                Ok(()) => history_restored += 1,
                Err(e) => {
                    tracing::warn!(key = %meta.key, %account, error = %e, "could not restore history entry");
                    history_failed += 1;
                }
            }
        }

        Ok(ImportOutcome {
            key: meta.key,
            source_vault: meta.vault,
            had_previous: saved.had_previous,
            history_restored,
            history_failed,
        })
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The active vault, `None` for the default scope.
    pub fn vault(&self) -> Option<&Vault> {
        self.vault.as_ref()
    }

    /// Returns `true` if `key` has a current value in scope.
    pub fn exists(&self, key: &str) -> Result<bool> {
        Ok(self
            .store
            .get(&encode_current(self.vault.as_ref(), key))?
            .is_some())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn history_index(&self, key: &str) -> Result<Vec<(String, chrono::DateTime<chrono::Utc>)>> {
        let accounts = self.store.list_all()?.into_iter().map(|item| item.account);
        Ok(history::history_versions(accounts, self.vault.as_ref(), key))
    }

    /// Write an item, replacing any existing item with the same account.
    fn write_item(&mut self, account: &str, item: &StoredItem) -> std::result::Result<(), StoreError> {
        let put = |store: &mut S| {
            store.put(
                account,
                &item.data,
                item.label.as_deref(),
                item.comment.as_deref(),
            )
        };
        match put(&mut self.store) {
            Err(StoreError::Duplicate) => {
                self.store.delete(account)?;
                put(&mut self.store)
            }
            other => other,
        }
    }
}
