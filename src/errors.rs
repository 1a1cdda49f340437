use thiserror::Error;

use crate::store::StoreError;

/// All errors that can occur in envpocket.
#[derive(Debug, Error)]
pub enum EnvPocketError {
    // --- Entry errors ---
    #[error("Entry '{0}' not found")]
    NotFound(String),

    #[error("Version {index} of '{key}' does not exist ({available} version(s) in history)")]
    InvalidVersionIndex {
        key: String,
        index: usize,
        available: usize,
    },

    #[error("No entries match pattern '{0}'")]
    NoMatches(String),

    #[error(
        "Deleted {deleted} of {attempted} matching entries — failed: {}",
        .failed_keys.join(", ")
    )]
    PartialDelete {
        attempted: usize,
        deleted: usize,
        failed_keys: Vec<String>,
    },

    #[error("Invalid entry key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("Invalid vault name '{name}': {reason}")]
    InvalidVault { name: String, reason: String },

    // --- Export bundle errors ---
    #[error("Invalid export file: too short to contain a header")]
    InvalidFormat,

    #[error("Invalid export file: unrecognized header")]
    InvalidHeader,

    #[error("Export file is corrupted or truncated")]
    Corrupted,

    #[error("Decryption failed — wrong passphrase or corrupted data")]
    DecryptionFailed,

    #[error("Could not parse decrypted export data: {0}")]
    ParseError(String),

    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    // --- Secure store errors ---
    #[error("Secure store error ({code}): {message}")]
    StoreFailure { code: i32, message: String },

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

impl From<StoreError> for EnvPocketError {
    fn from(err: StoreError) -> Self {
        let code = err.code();
        EnvPocketError::StoreFailure {
            code,
            message: err.to_string(),
        }
    }
}

/// Convenience type alias for envpocket results.
pub type Result<T> = std::result::Result<T, EnvPocketError>;
