//! `envpocket history`: show the superseded versions of an entry.

use crate::cli::output;
use crate::cli::{open_entries, Cli};
use crate::errors::Result;

/// Execute the `history` command.
pub fn execute(cli: &Cli, key: &str) -> Result<()> {
    let entries = open_entries(cli)?;
    let versions = entries.history(key)?;

    if versions.is_empty() {
        output::info(&format!("'{key}' has no history yet."));
        return Ok(());
    }

    output::info(&format!("'{key}' — {} previous version(s)", versions.len()));
    output::print_history_table(&versions);
    output::tip(&format!("Retrieve one with: envpocket get {key} --version <N>"));

    Ok(())
}
