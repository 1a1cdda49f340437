//! `envpocket export`: write an entry and its history to an encrypted
//! bundle that can be carried to another machine.

use std::fs;
use std::path::Path;

use crate::bundle::FILE_EXTENSION;
use crate::cli::output;
use crate::cli::{open_entries, prompt_new_passphrase, Cli};
use crate::errors::{EnvPocketError, Result};

/// Execute the `export` command.
pub fn execute(cli: &Cli, key: &str, dest: &str) -> Result<()> {
    let entries = open_entries(cli)?;

    // Fail before prompting if there is nothing to export.
    if !entries.exists(key)? {
        return Err(EnvPocketError::NotFound(key.to_string()));
    }

    let passphrase = prompt_new_passphrase()?;
    let bundle = entries.export(key, passphrase.as_bytes())?;

    let dest_path = Path::new(dest);
    fs::write(dest_path, &bundle)
        .map_err(|e| EnvPocketError::CommandFailed(format!("failed to write {dest}: {e}")))?;

    output::success(&format!("Exported '{key}' to {dest}"));

    if !dest_path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(FILE_EXTENSION))
    {
        output::tip(&format!(
            "Export files conventionally use the .{FILE_EXTENSION} extension."
        ));
    }
    output::tip(&format!("Import elsewhere with: envpocket import {dest}"));

    Ok(())
}
