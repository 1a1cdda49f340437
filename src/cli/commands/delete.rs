//! `envpocket delete`: remove an entry (or every entry matching a
//! wildcard) together with its history.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{open_entries, scope_label, Cli};
use crate::errors::{EnvPocketError, Result};
use crate::pocket::is_pattern;

/// Execute the `delete` command.
pub fn execute(cli: &Cli, key: &str, force: bool) -> Result<()> {
    let mut entries = open_entries(cli)?;
    let scope = scope_label(entries.vault());

    if is_pattern(key) {
        let candidates = entries.match_keys(key)?;
        if candidates.is_empty() {
            return Err(EnvPocketError::NoMatches(key.to_string()));
        }

        output::info(&format!(
            "{} entr{} in {scope} match '{key}':",
            candidates.len(),
            if candidates.len() == 1 { "y" } else { "ies" }
        ));
        for name in &candidates {
            println!("  {name}");
        }

        let prompt = format!(
            "Delete these {} entries and their history?",
            candidates.len()
        );
        if !force && !confirm(&prompt)? {
            output::info("Cancelled.");
            return Ok(());
        }

        let report = entries.delete_matching(key)?;
        output::success(&format!(
            "Deleted {} entr{} ({} history version(s))",
            report.deleted.len(),
            if report.deleted.len() == 1 { "y" } else { "ies" },
            report.history_removed()
        ));
        return Ok(());
    }

    if !force && !confirm(&format!("Delete '{key}' and all of its history from {scope}?"))? {
        output::info("Cancelled.");
        return Ok(());
    }

    let report = entries.delete(key)?;
    output::success(&format!(
        "Deleted '{key}' ({} history version(s) removed)",
        report.history_removed
    ));

    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| EnvPocketError::CommandFailed(format!("confirm prompt: {e}")))
}
