//! Binary export bundle format.
//!
//! A `.envpocket` bundle has this layout:
//!
//! ```text
//! [ENVPOCKET_V1: 12 bytes][salt: 32 bytes][nonce: 12 bytes][ciphertext][tag: 16 bytes]
//! ```
//!
//! - **Magic** (`ENVPOCKET_V1`): identifies the file and its version.
//! - **Salt**: random, fed to PBKDF2-HMAC-SHA256 (100 000 iterations)
//!   together with the passphrase to derive the AES-256 key.
//! - **Nonce**: random AES-GCM nonce.
//! - **Ciphertext**: the encrypted JSON `BundleRecord`.
//! - **Tag**: the GCM authentication tag.

use zeroize::Zeroizing;

use super::record::BundleRecord;
use crate::crypto::{self, NONCE_LEN, SALT_LEN, TAG_LEN};
use crate::errors::{EnvPocketError, Result};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic bytes at the start of every bundle.
pub const MAGIC: &[u8; 12] = b"ENVPOCKET_V1";

/// Conventional file extension for bundles (not enforced).
pub const FILE_EXTENSION: &str = "envpocket";

const MAGIC_LEN: usize = MAGIC.len();

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Serialize and encrypt a record under `passphrase`.
pub fn seal(record: &BundleRecord, passphrase: &[u8]) -> Result<Vec<u8>> {
    let plaintext = Zeroizing::new(
        serde_json::to_vec(record)
            .map_err(|e| EnvPocketError::EncryptionFailed(format!("record encoding: {e}")))?,
    );

    let salt = crypto::generate_salt();
    let key = crypto::derive_key(passphrase, &salt);
    let sealed = crypto::encrypt(key.as_bytes(), &plaintext)?;

    let total = MAGIC_LEN + SALT_LEN + NONCE_LEN + sealed.ciphertext.len() + TAG_LEN;
    let mut buf = Vec::with_capacity(total);
    buf.extend_from_slice(MAGIC); // 12 bytes
    buf.extend_from_slice(&salt); // 32 bytes
    buf.extend_from_slice(&sealed.nonce); // 12 bytes
    buf.extend_from_slice(&sealed.ciphertext);
    buf.extend_from_slice(&sealed.tag); // 16 bytes
    Ok(buf)
}

/// Validate, decrypt, and parse a bundle produced by `seal`.
pub fn open(bundle: &[u8], passphrase: &[u8]) -> Result<BundleRecord> {
    // --- Fixed-size prefix ---

    if bundle.len() <= MAGIC_LEN {
        return Err(EnvPocketError::InvalidFormat);
    }
    let (magic, rest) = bundle.split_at(MAGIC_LEN);
    if magic != MAGIC {
        return Err(EnvPocketError::InvalidHeader);
    }

    if rest.len() <= SALT_LEN + NONCE_LEN {
        return Err(EnvPocketError::Corrupted);
    }
    let (salt, rest) = rest.split_at(SALT_LEN);
    let (nonce, rest) = rest.split_at(NONCE_LEN);

    // --- Ciphertext and trailing tag ---

    if rest.len() <= TAG_LEN {
        return Err(EnvPocketError::Corrupted);
    }
    let (ciphertext, tag) = rest.split_at(rest.len() - TAG_LEN);

    let key = crypto::derive_key(passphrase, salt);
    let plaintext = Zeroizing::new(crypto::decrypt(key.as_bytes(), nonce, ciphertext, tag)?);

    serde_json::from_slice(&plaintext).map_err(|e| EnvPocketError::ParseError(e.to_string()))
}
