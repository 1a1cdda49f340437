//! Entry types returned by `EntryStore` operations.
//!
//! An entry's payload lives in the secure store as raw bytes.  Two text
//! attributes travel with it: the label (where the payload came from)
//! and the comment (`Last modified: <timestamp>`).

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};

use super::keys::{format_timestamp, parse_timestamp};

/// Label stored for entries saved from a direct value rather than a file.
pub const DIRECT_VALUE_LABEL: &str = "<direct value>";

const COMMENT_PREFIX: &str = "Last modified: ";

/// Where an entry's payload came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Read from a file at this path.
    File(String),
    /// Given directly on the command line or stdin.
    DirectValue,
}

impl Origin {
    /// The label stored alongside the payload.
    pub fn label(&self) -> &str {
        match self {
            Origin::File(path) => path,
            Origin::DirectValue => DIRECT_VALUE_LABEL,
        }
    }

    pub fn from_label(label: &str) -> Self {
        if label == DIRECT_VALUE_LABEL {
            Origin::DirectValue
        } else {
            Origin::File(label.to_string())
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::File(path) => f.write_str(path),
            Origin::DirectValue => f.write_str("direct value"),
        }
    }
}

/// Build the comment attribute for an entry written at `at`.
pub fn modified_comment(at: DateTime<Utc>) -> String {
    format!("{COMMENT_PREFIX}{}", format_timestamp(at))
}

/// Recover the timestamp from a comment written by `modified_comment`.
pub fn parse_modified_comment(comment: &str) -> Option<DateTime<Utc>> {
    parse_timestamp(comment.strip_prefix(COMMENT_PREFIX)?)
}

/// An entry value read back from the store (current or historical).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub payload: Vec<u8>,
    pub origin: Option<Origin>,
    /// For current entries, parsed from the comment; for history
    /// entries, the time the version was superseded.
    pub last_modified: Option<DateTime<Utc>>,
}

/// One superseded version of an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryVersion {
    /// Position in the history, 0 = most recently superseded.
    pub index: usize,
    pub account: String,
    pub timestamp: DateTime<Utc>,
    pub origin: Option<Origin>,
    pub size: usize,
}

/// One row of `EntryStore::list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySummary {
    pub key: String,
    pub last_modified: Option<DateTime<Utc>>,
    pub history_count: usize,
    pub origin: Option<Origin>,
}

impl EntrySummary {
    pub(crate) fn empty(key: String) -> Self {
        Self {
            key,
            last_modified: None,
            history_count: 0,
            origin: None,
        }
    }
}

/// Result of `EntryStore::list_vaults`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VaultListing {
    /// Vault name -> number of current entries in it.
    pub vaults: BTreeMap<String, usize>,
    /// Number of current entries in the default (no vault) scope.
    pub default_count: usize,
}

/// Result of `EntryStore::save`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    /// A current entry existed and was superseded.
    pub had_previous: bool,
    /// Set when copying the previous version to history failed.
    pub history_warning: Option<String>,
}

/// Result of deleting one key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteReport {
    pub current_removed: bool,
    pub history_removed: usize,
}

/// Result of deleting every key matching a pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternDeleteReport {
    pub deleted: Vec<(String, DeleteReport)>,
}

impl PatternDeleteReport {
    pub fn history_removed(&self) -> usize {
        self.deleted.iter().map(|(_, r)| r.history_removed).sum()
    }
}

/// Result of `EntryStore::import`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    pub key: String,
    /// The vault recorded in the bundle (informational only).
    pub source_vault: Option<String>,
    pub had_previous: bool,
    pub history_restored: usize,
    pub history_failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn origin_label_round_trip() {
        let file = Origin::File("/home/me/.env".into());
        assert_eq!(Origin::from_label(file.label()), file);
        assert_eq!(
            Origin::from_label(Origin::DirectValue.label()),
            Origin::DirectValue
        );
    }

    #[test]
    fn comment_round_trip() {
        let at = Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        let comment = modified_comment(at);
        assert_eq!(comment, "Last modified: 2026-03-04T05:06:07.000000Z");
        assert_eq!(parse_modified_comment(&comment), Some(at));
    }

    #[test]
    fn foreign_comments_do_not_parse() {
        assert_eq!(parse_modified_comment("hello"), None);
        assert_eq!(parse_modified_comment("Last modified: soon"), None);
    }
}
