//! `envpocket save`: store a file or value, keeping the old one in history.

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::Path;

use crate::cli::output;
use crate::cli::{open_entries, scope_label, Cli};
use crate::errors::{EnvPocketError, Result};
use crate::pocket::Origin;

/// Execute the `save` command.
pub fn execute(cli: &Cli, key: &str, file: Option<&str>, value: Option<&str>) -> Result<()> {
    // Determine the payload from one of four sources.
    let (payload, origin) = if let Some(path) = file {
        // Source 1: A file on disk.
        let source = Path::new(path);
        let bytes = fs::read(source).map_err(|e| {
            EnvPocketError::CommandFailed(format!("cannot read {}: {e}", source.display()))
        })?;
        let label = fs::canonicalize(source)
            .unwrap_or_else(|_| source.to_path_buf())
            .display()
            .to_string();
        (bytes, Origin::File(label))
    } else if let Some(v) = value {
        // Source 2: Inline value on the command line.
        output::warning("Value provided on command line — it may appear in shell history.");
        (v.as_bytes().to_vec(), Origin::DirectValue)
    } else if !io::stdin().is_terminal() {
        // Source 3: Piped input (stdin is not a terminal).
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        (buf, Origin::DirectValue)
    } else {
        // Source 4: Interactive secure prompt.
        let v = dialoguer::Password::new()
            .with_prompt(format!("Enter value for {key}"))
            .interact()
            .map_err(|e| EnvPocketError::CommandFailed(format!("input prompt: {e}")))?;
        (v.into_bytes(), Origin::DirectValue)
    };

    let mut entries = open_entries(cli)?;
    let outcome = entries.save(key, &payload, &origin)?;
    let scope = scope_label(entries.vault());

    if let Some(warning) = &outcome.history_warning {
        output::warning(warning);
    }

    if outcome.had_previous {
        output::success(&format!(
            "Updated '{key}' in {scope} (previous version kept in history)"
        ));
    } else {
        output::success(&format!("Saved '{key}' to {scope}"));
    }

    output::tip(&format!("Retrieve it with: envpocket get {key}"));

    Ok(())
}
