//! Pocket module: versioned entries in a secure store.
//!
//! This module provides:
//! - `Vault` namespace names (`vault`)
//! - The account name codec (`keys`)
//! - Wildcard key patterns (`wildcard`)
//! - History reconstruction from account listings (`history`)
//! - Entry and report types (`entry`)
//! - Time sources (`clock`)
//! - The high-level `EntryStore` (`store`)

pub mod clock;
pub mod entry;
pub mod history;
pub mod keys;
pub mod store;
pub mod vault;
pub mod wildcard;

// Re-export the most commonly used items.
pub use clock::{Clock, SteppingClock, SystemClock};
pub use entry::{
    DeleteReport, Entry, EntrySummary, HistoryVersion, ImportOutcome, Origin,
    PatternDeleteReport, SaveOutcome, VaultListing, DIRECT_VALUE_LABEL,
};
pub use store::EntryStore;
pub use vault::Vault;
pub use wildcard::{is_pattern, WildcardPattern};
