//! `envpocket list`: display the entries of the active vault.

use crate::cli::output;
use crate::cli::{open_entries, scope_label, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let entries = open_entries(cli)?;
    let summaries = entries.list()?;

    output::info(&format!(
        "{} — {} entr{}",
        scope_label(entries.vault()),
        summaries.len(),
        if summaries.len() == 1 { "y" } else { "ies" }
    ));

    output::print_entries_table(&summaries);

    Ok(())
}
