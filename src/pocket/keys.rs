//! Account name encoding.
//!
//! Every item in the secure store is addressed by one account name
//! derived from `(vault, key, timestamp)`:
//!
//! ```text
//! current:  envpocket:[<vault>::]<key>
//! history:  envpocket-history:[<vault>::]<key>:<RFC 3339 timestamp>
//! ```
//!
//! Neither prefix is a prefix of the other, so any account name is
//! classified as current, history, or foreign.  Nothing is escaped:
//! keys must not contain `:` (see `validate_key`), vault names cannot
//! contain it by construction.

use chrono::{DateTime, SecondsFormat, Utc};

use super::vault::Vault;
use crate::errors::{EnvPocketError, Result};

/// Prefix of current-entry account names.
pub const CURRENT_PREFIX: &str = "envpocket:";

/// Prefix of history-entry account names.
pub const HISTORY_PREFIX: &str = "envpocket-history:";

const VAULT_SEPARATOR: &str = "::";
const TIMESTAMP_SEPARATOR: char = ':';

/// Maximum length of an entry key.
pub const MAX_KEY_LEN: usize = 256;

/// A decoded account name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountKey {
    pub vault: Option<String>,
    pub key: String,
    /// Raw timestamp text; `Some` exactly for history accounts.
    pub timestamp: Option<String>,
}

impl AccountKey {
    pub fn is_history(&self) -> bool {
        self.timestamp.is_some()
    }

    /// Whether this account belongs to the given vault scope.
    pub fn in_scope(&self, vault: Option<&Vault>) -> bool {
        self.vault.as_deref() == vault.map(Vault::as_str)
    }

    /// The parsed history timestamp, if present and well-formed.
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp.as_deref().and_then(parse_timestamp)
    }
}

/// Account name of the current entry for `(vault, key)`.
pub fn encode_current(vault: Option<&Vault>, key: &str) -> String {
    format!("{CURRENT_PREFIX}{}", scoped(vault, key))
}

/// Account name of the history entry for `(vault, key)` demoted at `timestamp`.
pub fn encode_history(vault: Option<&Vault>, key: &str, timestamp: DateTime<Utc>) -> String {
    format!(
        "{HISTORY_PREFIX}{}{TIMESTAMP_SEPARATOR}{}",
        scoped(vault, key),
        format_timestamp(timestamp)
    )
}

fn scoped(vault: Option<&Vault>, key: &str) -> String {
    match vault {
        Some(v) => format!("{v}{VAULT_SEPARATOR}{key}"),
        None => key.to_string(),
    }
}

/// Decode an account name.  Returns `None` for foreign or malformed names.
pub fn decode(account: &str) -> Option<AccountKey> {
    if let Some(rest) = account.strip_prefix(HISTORY_PREFIX) {
        let (vault, rest) = split_vault(rest);
        let (key, timestamp) = rest.split_once(TIMESTAMP_SEPARATOR)?;
        if key.is_empty() || timestamp.is_empty() {
            return None;
        }
        return Some(AccountKey {
            vault,
            key: key.to_string(),
            timestamp: Some(timestamp.to_string()),
        });
    }

    let rest = account.strip_prefix(CURRENT_PREFIX)?;
    let (vault, key) = split_vault(rest);
    if key.is_empty() {
        return None;
    }
    Some(AccountKey {
        vault,
        key: key.to_string(),
        timestamp: None,
    })
}

fn split_vault(rest: &str) -> (Option<String>, &str) {
    match rest.split_once(VAULT_SEPARATOR) {
        Some((vault, remainder)) => (Some(vault.to_string()), remainder),
        None => (None, rest),
    }
}

/// Format a timestamp the way it appears in account names and comments.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse an RFC 3339 timestamp into UTC.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Validate that an entry key can be encoded unambiguously.
///
/// Keys must be non-empty, at most 256 characters, and must not contain
/// `:` (account name separator) or the wildcard characters `*` and `?`.
pub fn validate_key(key: &str) -> Result<()> {
    let reason = if key.is_empty() {
        "key cannot be empty".to_string()
    } else if key.chars().count() > MAX_KEY_LEN {
        format!("key cannot exceed {MAX_KEY_LEN} characters")
    } else if key.contains(':') {
        "key cannot contain ':'".to_string()
    } else if key.contains(['*', '?']) {
        "key cannot contain wildcard characters '*' or '?'".to_string()
    } else if key.chars().any(char::is_control) {
        "key cannot contain control characters".to_string()
    } else {
        return Ok(());
    };

    Err(EnvPocketError::InvalidKey {
        key: key.to_string(),
        reason,
    })
}
