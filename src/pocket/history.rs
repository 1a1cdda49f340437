//! Reconstruct the version history of one key from a raw account listing.

use chrono::{DateTime, Utc};

use super::keys::{self, HISTORY_PREFIX};
use super::vault::Vault;

/// History accounts of `(vault, key)` with their timestamps, newest first.
///
/// `accounts` may contain anything: current entries, other keys, other
/// vaults, or names belonging to other applications.  History names
/// whose timestamp does not parse are dropped.  Equal timestamps are
/// ordered by account name so the result is deterministic.
pub fn history_versions<I, S>(
    accounts: I,
    vault: Option<&Vault>,
    key: &str,
) -> Vec<(String, DateTime<Utc>)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut versions: Vec<(String, DateTime<Utc>)> = accounts
        .into_iter()
        .filter(|a| a.as_ref().starts_with(HISTORY_PREFIX))
        .filter_map(|a| {
            let account = a.as_ref();
            let decoded = keys::decode(account)?;
            if !decoded.in_scope(vault) || decoded.key != key {
                return None;
            }
            match decoded.parsed_timestamp() {
                Some(ts) => Some((account.to_string(), ts)),
                None => {
                    tracing::warn!(account, "dropping history entry with unparseable timestamp");
                    None
                }
            }
        })
        .collect();

    versions.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));
    versions
}

/// History account names of `(vault, key)`, newest first.
///
/// Index `i` is the version superseded `i` saves before the latest one.
pub fn history_accounts<I, S>(accounts: I, vault: Option<&Vault>, key: &str) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    history_versions(accounts, vault, key)
        .into_iter()
        .map(|(account, _)| account)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pocket::keys::{encode_current, encode_history};
    use chrono::TimeZone;

    fn at(secs: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, secs).unwrap()
    }

    #[test]
    fn orders_newest_first() {
        let accounts = vec![
            encode_history(None, "k", at(1)),
            encode_history(None, "k", at(3)),
            encode_history(None, "k", at(2)),
        ];
        let history = history_accounts(&accounts, None, "k");
        assert_eq!(
            history,
            vec![
                encode_history(None, "k", at(3)),
                encode_history(None, "k", at(2)),
                encode_history(None, "k", at(1)),
            ]
        );
    }

    #[test]
    fn ignores_current_foreign_and_other_scopes() {
        let team = Vault::new("team").unwrap();
        let accounts = vec![
            encode_current(None, "k"),
            "someone-else:k".to_string(),
            encode_history(None, "other", at(1)),
            encode_history(Some(&team), "k", at(2)),
            encode_history(None, "k", at(3)),
        ];

        let root = history_accounts(&accounts, None, "k");
        assert_eq!(root, vec![encode_history(None, "k", at(3))]);

        let vaulted = history_accounts(&accounts, Some(&team), "k");
        assert_eq!(vaulted, vec![encode_history(Some(&team), "k", at(2))]);
    }

    #[test]
    fn drops_unparseable_timestamps() {
        let accounts = vec![
            "envpocket-history:k:garbage".to_string(),
            encode_history(None, "k", at(1)),
        ];
        let history = history_versions(&accounts, None, "k");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].1, at(1));
    }

    #[test]
    fn ties_are_broken_by_account_name() {
        let a = "envpocket-history:k:2026-01-01T00:00:00Z".to_string();
        let b = "envpocket-history:k:2026-01-01T00:00:00+00:00".to_string();
        let first = history_accounts([&a, &b], None, "k");
        let second = history_accounts([&b, &a], None, "k");
        assert_eq!(first, second);
    }

    #[test]
    fn empty_listing_yields_empty_history() {
        let none: Vec<String> = Vec::new();
        assert!(history_accounts(&none, None, "k").is_empty());
    }
}
