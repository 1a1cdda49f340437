//! `envpocket vaults`: list every vault seen in the keyring.

use crate::cli::output;
use crate::cli::{open_entries, Cli};
use crate::errors::Result;

/// Execute the `vaults` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let entries = open_entries(cli)?;
    let listing = entries.list_vaults()?;

    output::info(&format!(
        "{} named vault(s), {} entr{} in the default vault",
        listing.vaults.len(),
        listing.default_count,
        if listing.default_count == 1 { "y" } else { "ies" }
    ));
    output::print_vaults_table(&listing, entries.vault().map(|v| v.as_str()));
    output::tip("Select a vault with --vault <NAME> or ENVPOCKET_VAULT.");

    Ok(())
}
