//! `envpocket version`: print the installed version.

use crate::cli::output;
use crate::errors::Result;

/// Execute the `version` command.
pub fn execute() -> Result<()> {
    println!("envpocket {}", env!("CARGO_PKG_VERSION"));
    output::tip("Entries live in your OS keyring under the 'envpocket' service by default.");
    Ok(())
}
