//! Encrypted export bundles for sharing one entry and its history.
//!
//! This module provides:
//! - The JSON record sealed inside a bundle (`record`)
//! - The binary framing, key derivation, and encryption (`format`)

pub mod format;
pub mod record;

pub use format::{open, seal, FILE_EXTENSION, MAGIC};
pub use record::{BundleHistoryEntry, BundleMetadata, BundleRecord};
