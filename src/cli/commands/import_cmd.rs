//! `envpocket import`: restore an entry from an encrypted bundle.

use std::fs;

use crate::cli::output;
use crate::cli::{open_entries, prompt_passphrase, scope_label, Cli};
use crate::errors::{EnvPocketError, Result};

/// Execute the `import` command.
pub fn execute(cli: &Cli, file: &str) -> Result<()> {
    let bytes = fs::read(file)
        .map_err(|e| EnvPocketError::CommandFailed(format!("cannot read {file}: {e}")))?;

    let mut entries = open_entries(cli)?;
    let passphrase = prompt_passphrase()?;
    let outcome = entries.import(&bytes, passphrase.as_bytes())?;
    let scope = scope_label(entries.vault());

    if let Some(source) = &outcome.source_vault {
        if entries.vault().map(|v| v.as_str()) != Some(source.as_str()) {
            output::info(&format!("'{}' was exported from vault '{source}'", outcome.key));
        }
    }

    output::success(&format!("Imported '{}' into {scope}", outcome.key));

    if outcome.had_previous {
        output::info("The previous local value was moved to history.");
    }
    if outcome.history_restored > 0 {
        output::info(&format!(
            "Restored {} history version(s)",
            outcome.history_restored
        ));
    }
    if outcome.history_failed > 0 {
        output::warning(&format!(
            "{} history version(s) could not be restored",
            outcome.history_failed
        ));
    }

    Ok(())
}
