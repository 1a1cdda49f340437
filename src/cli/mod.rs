//! CLI module: the clap parser, output helpers and command implementations.

pub mod commands;
pub mod output;

use clap::Parser;

use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{EnvPocketError, Result};
use crate::pocket::{EntryStore, Vault};
use crate::store::KeyringStore;

/// Minimum passphrase length for new export bundles.
const MIN_PASSPHRASE_LEN: usize = 8;

/// Environment variable consulted before prompting for a passphrase.
pub const PASSPHRASE_ENV: &str = "ENVPOCKET_PASSPHRASE";

/// envpocket CLI: versioned secrets in your OS keyring.
#[derive(Parser)]
#[command(
    name = "envpocket",
    about = "Versioned secret files and values in your OS keyring",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault (namespace) to operate in (default: the root scope)
    #[arg(long, global = true, env = "ENVPOCKET_VAULT")]
    pub vault: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Save a file or value (previous value is kept in history)
    Save {
        /// Entry key (e.g. db-url)
        key: String,
        /// File to store (omit to use --value, stdin, or a prompt)
        file: Option<String>,
        /// Store this value directly instead of a file
        #[arg(long, conflicts_with = "file")]
        value: Option<String>,
    },

    /// Retrieve an entry (current value or a history version)
    Get {
        /// Entry key
        key: String,
        /// Write to this file instead of stdout
        output: Option<String>,
        /// History version to read (0 = most recently replaced)
        #[arg(long = "version", value_name = "N")]
        version_index: Option<usize>,
    },

    /// Delete an entry and its history (supports * and ? wildcards)
    Delete {
        /// Entry key or wildcard pattern (e.g. "test-*")
        key: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// List entries in the active vault
    List,

    /// Show the version history of an entry
    History {
        /// Entry key
        key: String,
    },

    /// List all vaults
    Vaults,

    /// Export an entry and its history to an encrypted file
    Export {
        /// Entry key
        key: String,
        /// Output file (conventionally *.envpocket)
        file: String,
    },

    /// Import an entry from an encrypted export file
    Import {
        /// Path to the .envpocket file
        file: String,
    },

    /// Show version
    Version,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        shell: String,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Open the entry store for the vault selected on the command line,
/// in the environment, or in `.envpocket.toml`.
pub fn open_entries(cli: &Cli) -> Result<EntryStore<KeyringStore>> {
    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?;
    let vault = settings.resolve_vault(cli.vault.as_deref())?;
    tracing::debug!(vault = ?vault, service = %settings.keyring_service, "opening entry store");
    Ok(EntryStore::new(
        KeyringStore::new(&settings.keyring_service),
        vault,
    ))
}

/// Human-readable name of a vault scope.
pub fn scope_label(vault: Option<&Vault>) -> String {
    match vault {
        Some(v) => format!("vault '{v}'"),
        None => "default vault".to_string(),
    }
}

/// Get the bundle passphrase, trying in order:
/// 1. `ENVPOCKET_PASSPHRASE` env var (scripts/CI)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the passphrase is wiped from memory on drop.
pub fn prompt_passphrase() -> Result<Zeroizing<String>> {
    if let Some(pw) = passphrase_from_env() {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter export passphrase")
        .interact()
        .map_err(|e| EnvPocketError::CommandFailed(format!("passphrase prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new passphrase with confirmation (used by `export`).
///
/// Also respects `ENVPOCKET_PASSPHRASE` for scripted usage.
/// Enforces a minimum passphrase length.
pub fn prompt_new_passphrase() -> Result<Zeroizing<String>> {
    if let Some(pw) = passphrase_from_env() {
        check_passphrase_len(&pw)?;
        return Ok(pw);
    }

    loop {
        let pw = dialoguer::Password::new()
            .with_prompt("Choose export passphrase")
            .with_confirmation(
                "Confirm export passphrase",
                "Passphrases do not match, try again",
            )
            .interact()
            .map_err(|e| EnvPocketError::CommandFailed(format!("passphrase prompt: {e}")))?;

        if check_passphrase_len(&pw).is_err() {
            output::warning(&format!(
                "Passphrase must be at least {MIN_PASSPHRASE_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(Zeroizing::new(pw));
    }
}

fn passphrase_from_env() -> Option<Zeroizing<String>> {
    std::env::var(PASSPHRASE_ENV)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}

fn check_passphrase_len(pw: &str) -> Result<()> {
    if pw.chars().count() < MIN_PASSPHRASE_LEN {
        return Err(EnvPocketError::CommandFailed(format!(
            "passphrase must be at least {MIN_PASSPHRASE_LEN} characters"
        )));
    }
    Ok(())
}
