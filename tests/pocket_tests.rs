//! Integration tests for versioned entries over the in-memory store.

use chrono::{DateTime, Duration, TimeZone, Utc};

use envpocket::errors::EnvPocketError;
use envpocket::pocket::{EntryStore, Origin, SteppingClock, Vault};
use envpocket::store::{MemoryStore, SecureStore};

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap()
}

/// Helper: an entry store over a fresh memory store with a stepping clock.
fn entries(vault: Option<&str>) -> EntryStore<MemoryStore> {
    scoped(MemoryStore::new(), vault)
}

fn scoped(store: MemoryStore, vault: Option<&str>) -> EntryStore<MemoryStore> {
    EntryStore::with_clock(
        store,
        vault.map(|v| Vault::new(v).unwrap()),
        SteppingClock::new(start(), Duration::seconds(1)),
    )
}

// ---------------------------------------------------------------------------
// Save / get
// ---------------------------------------------------------------------------

#[test]
fn save_then_get_returns_payload_and_origin() {
    let mut e = entries(None);
    let outcome = e
        .save("db-url", b"postgres://a", &Origin::DirectValue)
        .unwrap();
    assert!(!outcome.had_previous);
    assert!(outcome.history_warning.is_none());

    let entry = e.get("db-url", None).unwrap();
    assert_eq!(entry.payload, b"postgres://a");
    assert_eq!(entry.origin, Some(Origin::DirectValue));
    assert_eq!(entry.last_modified, Some(start()));
}

#[test]
fn save_stores_current_account_with_comment() {
    let mut e = entries(None);
    e.save("api", b"k", &Origin::File("/tmp/api.env".into()))
        .unwrap();

    let item = e.store().get("envpocket:api").unwrap().unwrap();
    assert_eq!(item.label.as_deref(), Some("/tmp/api.env"));
    assert_eq!(
        item.comment.as_deref(),
        Some("Last modified: 2026-10-16T09:30:00.000000Z")
    );
}

#[test]
fn get_missing_key_is_not_found() {
    let e = entries(None);
    assert!(matches!(
        e.get("nope", None),
        Err(EnvPocketError::NotFound(_))
    ));
    assert!(matches!(
        e.get("nope", Some(0)),
        Err(EnvPocketError::NotFound(_))
    ));
}

#[test]
fn invalid_keys_are_rejected() {
    let mut e = entries(None);
    for key in ["", "a:b", "star*", "what?"] {
        assert!(
            matches!(
                e.save(key, b"x", &Origin::DirectValue),
                Err(EnvPocketError::InvalidKey { .. })
            ),
            "key {key:?} should be rejected"
        );
    }
    assert!(e.store().is_empty());
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[test]
fn three_saves_keep_two_versions_newest_first() {
    let mut e = entries(None);
    e.save("db-url", b"v1", &Origin::DirectValue).unwrap();
    e.save("db-url", b"v2", &Origin::DirectValue).unwrap();
    let outcome = e.save("db-url", b"v3", &Origin::DirectValue).unwrap();
    assert!(outcome.had_previous);

    assert_eq!(e.get("db-url", None).unwrap().payload, b"v3");
    assert_eq!(e.get("db-url", Some(0)).unwrap().payload, b"v2");
    assert_eq!(e.get("db-url", Some(1)).unwrap().payload, b"v1");

    let versions = e.history("db-url").unwrap();
    assert_eq!(versions.len(), 2);
    assert_eq!(versions[0].index, 0);
    assert_eq!(versions[0].timestamp, start() + Duration::seconds(2));
    assert_eq!(versions[1].timestamp, start() + Duration::seconds(1));
    assert_eq!(versions[0].size, 2);
}

#[test]
fn db_url_scenario() {
    let mut e = entries(None);
    e.save("db-url", b"postgres://a", &Origin::DirectValue)
        .unwrap();
    e.save("db-url", b"postgres://b", &Origin::DirectValue)
        .unwrap();

    assert_eq!(e.get("db-url", None).unwrap().payload, b"postgres://b");
    assert_eq!(e.get("db-url", Some(0)).unwrap().payload, b"postgres://a");
    assert_eq!(e.history("db-url").unwrap().len(), 1);
}

#[test]
fn version_index_out_of_range() {
    let mut e = entries(None);
    e.save("k", b"v1", &Origin::DirectValue).unwrap();
    e.save("k", b"v2", &Origin::DirectValue).unwrap();

    match e.get("k", Some(1)) {
        Err(EnvPocketError::InvalidVersionIndex {
            index, available, ..
        }) => {
            assert_eq!(index, 1);
            assert_eq!(available, 1);
        }
        other => panic!("expected InvalidVersionIndex, got {other:?}"),
    }
}

#[test]
fn history_of_fresh_entry_is_empty() {
    let mut e = entries(None);
    e.save("k", b"v1", &Origin::DirectValue).unwrap();
    assert!(e.history("k").unwrap().is_empty());
}

#[test]
fn history_keeps_origin_of_replaced_value() {
    let mut e = entries(None);
    e.save("k", b"from-file", &Origin::File("/srv/.env".into()))
        .unwrap();
    e.save("k", b"typed", &Origin::DirectValue).unwrap();

    let versions = e.history("k").unwrap();
    assert_eq!(versions[0].origin, Some(Origin::File("/srv/.env".into())));
}

#[test]
fn failed_history_copy_does_not_block_save() {
    let mut e = entries(None);
    e.save("k", b"v1", &Origin::DirectValue).unwrap();

    e.store_mut().fail_writes_with_prefix("envpocket-history:");
    let outcome = e.save("k", b"v2", &Origin::DirectValue).unwrap();

    assert!(outcome.had_previous);
    assert!(outcome.history_warning.is_some());
    assert_eq!(e.get("k", None).unwrap().payload, b"v2");
    assert!(e.history("k").unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Vault isolation
// ---------------------------------------------------------------------------

#[test]
fn vaults_are_isolated() {
    let mut team = entries(Some("team"));
    team.save("db-url", b"team-db", &Origin::DirectValue)
        .unwrap();

    let mut default = scoped(team.into_inner(), None);
    assert!(matches!(
        default.get("db-url", None),
        Err(EnvPocketError::NotFound(_))
    ));
    default
        .save("db-url", b"root-db", &Origin::DirectValue)
        .unwrap();

    let team = scoped(default.into_inner(), Some("team"));
    assert_eq!(team.get("db-url", None).unwrap().payload, b"team-db");
    assert!(team.history("db-url").unwrap().is_empty());
    assert_eq!(team.list().unwrap().len(), 1);
}

#[test]
fn match_all_stays_inside_the_scope() {
    let mut team = entries(Some("team"));
    team.save("x", b"team", &Origin::DirectValue).unwrap();

    let mut root = scoped(team.into_inner(), None);
    root.save("y", b"root", &Origin::DirectValue).unwrap();
    assert_eq!(root.match_keys("*").unwrap(), ["y"]);

    let team = scoped(root.into_inner(), Some("team"));
    assert_eq!(team.match_keys("*").unwrap(), ["x"]);
}

#[test]
fn list_vaults_counts_current_entries() {
    let mut a = entries(Some("a"));
    a.save("one", b"1", &Origin::DirectValue).unwrap();
    a.save("one", b"2", &Origin::DirectValue).unwrap();
    a.save("two", b"2", &Origin::DirectValue).unwrap();

    let mut root = scoped(a.into_inner(), None);
    root.save("x", b"x", &Origin::DirectValue).unwrap();

    let listing = root.list_vaults().unwrap();
    assert_eq!(listing.default_count, 1);
    assert_eq!(listing.vaults.get("a"), Some(&2));
    assert_eq!(listing.vaults.len(), 1);
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_is_sorted_with_history_counts() {
    let mut e = entries(None);
    e.save("zeta", b"z", &Origin::DirectValue).unwrap();
    e.save("alpha", b"a1", &Origin::DirectValue).unwrap();
    e.save("alpha", b"a2", &Origin::DirectValue).unwrap();

    let list = e.list().unwrap();
    let keys: Vec<&str> = list.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, ["alpha", "zeta"]);
    assert_eq!(list[0].history_count, 1);
    assert_eq!(list[1].history_count, 0);
    assert_eq!(list[0].origin, Some(Origin::DirectValue));
}

#[test]
fn list_ignores_foreign_accounts() {
    let mut store = MemoryStore::new();
    store.put("someone-else", b"x", None, None).unwrap();
    let e = scoped(store, None);
    assert!(e.list().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_removes_current_and_history() {
    let mut e = entries(None);
    e.save("k", b"v1", &Origin::DirectValue).unwrap();
    e.save("k", b"v2", &Origin::DirectValue).unwrap();
    e.save("k", b"v3", &Origin::DirectValue).unwrap();
    e.save("other", b"o", &Origin::DirectValue).unwrap();

    let report = e.delete("k").unwrap();
    assert!(report.current_removed);
    assert_eq!(report.history_removed, 2);

    assert_eq!(e.store().accounts(), ["envpocket:other"]);
}

#[test]
fn delete_missing_key_is_not_found() {
    let mut e = entries(None);
    assert!(matches!(e.delete("ghost"), Err(EnvPocketError::NotFound(_))));
}

#[test]
fn delete_does_not_touch_other_vaults() {
    let mut a = entries(Some("a"));
    a.save("k", b"a", &Origin::DirectValue).unwrap();
    let mut b = scoped(a.into_inner(), Some("b"));
    b.save("k", b"b", &Origin::DirectValue).unwrap();

    b.delete("k").unwrap();
    let a = scoped(b.into_inner(), Some("a"));
    assert_eq!(a.get("k", None).unwrap().payload, b"a");
}

#[test]
fn wildcard_delete_removes_only_matches() {
    let mut e = entries(None);
    for key in ["test-1", "test-2", "test-10", "prod-1"] {
        e.save(key, b"x", &Origin::DirectValue).unwrap();
    }
    e.save("test-1", b"y", &Origin::DirectValue).unwrap();

    assert_eq!(e.match_keys("test-?").unwrap(), ["test-1", "test-2"]);

    let report = e.delete_matching("test-*").unwrap();
    let deleted: Vec<&str> = report.deleted.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(deleted, ["test-1", "test-10", "test-2"]);
    assert_eq!(report.history_removed(), 1);

    let remaining: Vec<String> = e.list().unwrap().into_iter().map(|s| s.key).collect();
    assert_eq!(remaining, ["prod-1"]);
}

#[test]
fn wildcard_delete_without_matches() {
    let mut e = entries(None);
    e.save("prod", b"x", &Origin::DirectValue).unwrap();
    assert!(matches!(
        e.delete_matching("test-*"),
        Err(EnvPocketError::NoMatches(_))
    ));
}

#[test]
fn wildcard_delete_reports_partial_failure() {
    let mut e = entries(None);
    e.save("a-1", b"x", &Origin::DirectValue).unwrap();
    e.save("a-2", b"x", &Origin::DirectValue).unwrap();
    e.store_mut().fail_writes_with_prefix("envpocket:a-2");

    match e.delete_matching("a-*") {
        Err(EnvPocketError::PartialDelete {
            attempted,
            deleted,
            failed_keys,
        }) => {
            assert_eq!(attempted, 2);
            assert_eq!(deleted, 1);
            assert_eq!(failed_keys, ["a-2"]);
        }
        other => panic!("expected PartialDelete, got {other:?}"),
    }
}
