//! `envpocket get`: write an entry's current or historical value.

use std::fs;
use std::io::{self, Write};

use crate::cli::output;
use crate::cli::{open_entries, Cli};
use crate::errors::{EnvPocketError, Result};

/// Execute the `get` command.
pub fn execute(
    cli: &Cli,
    key: &str,
    output_path: Option<&str>,
    version_index: Option<usize>,
) -> Result<()> {
    let entries = open_entries(cli)?;
    let entry = entries.get(key, version_index)?;

    match output_path {
        Some(dest) => {
            fs::write(dest, &entry.payload).map_err(|e| {
                EnvPocketError::CommandFailed(format!("failed to write {dest}: {e}"))
            })?;
            let which = match version_index {
                Some(i) => format!("version {i} of '{key}'"),
                None => format!("'{key}'"),
            };
            output::success(&format!("Wrote {which} to {dest}"));
        }
        None => {
            // Raw bytes to stdout, no decoration.
            let mut stdout = io::stdout().lock();
            stdout.write_all(&entry.payload)?;
            stdout.flush()?;
        }
    }

    Ok(())
}
