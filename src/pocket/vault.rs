//! Vault names: isolated namespaces for entry keys.

use std::fmt;
use std::str::FromStr;

use crate::errors::{EnvPocketError, Result};

/// Maximum length of a vault name in characters.
pub const MAX_VAULT_LEN: usize = 100;

/// A validated vault name.
///
/// Vault names are opaque path-like strings (`team/backend`); two vaults
/// are either equal or unrelated, no prefix relationship is implied.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Vault(String);

impl Vault {
    /// Validate and wrap a vault name.
    ///
    /// Allowed: ASCII letters, digits, `/`, `_`, `-`; 1 to 100 characters.
    pub fn new(name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(invalid(name, "vault name cannot be empty"));
        }
        if name.len() > MAX_VAULT_LEN {
            return Err(invalid(
                name,
                &format!("vault name cannot exceed {MAX_VAULT_LEN} characters"),
            ));
        }
        if !name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'/' || b == b'_' || b == b'-')
        {
            return Err(invalid(
                name,
                "only ASCII letters, digits, '/', '_' and '-' are allowed",
            ));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn invalid(name: &str, reason: &str) -> EnvPocketError {
    EnvPocketError::InvalidVault {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

impl FromStr for Vault {
    type Err = EnvPocketError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for Vault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
