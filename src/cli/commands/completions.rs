//! `envpocket completions`: print a shell completion script.
//!
//!   envpocket completions bash > ~/.local/share/bash-completion/completions/envpocket
//!   envpocket completions zsh > "${fpath[1]}/_envpocket"

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::{EnvPocketError, Result};

const BIN_NAME: &str = "envpocket";

/// Shell names accepted on the command line, with their generators.
const SHELLS: [(&str, Shell); 5] = [
    ("bash", Shell::Bash),
    ("zsh", Shell::Zsh),
    ("fish", Shell::Fish),
    ("powershell", Shell::PowerShell),
    ("elvish", Shell::Elvish),
];

/// Execute the `completions` command.
pub fn execute(shell: &str) -> Result<()> {
    let shell = parse_shell(shell)?;
    render(shell, &mut io::stdout().lock());
    Ok(())
}

fn render(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, BIN_NAME, out);
}

fn parse_shell(name: &str) -> Result<Shell> {
    let wanted = name.to_ascii_lowercase();
    SHELLS
        .iter()
        .find(|(known, _)| *known == wanted)
        .map(|(_, shell)| *shell)
        .ok_or_else(|| {
            let names: Vec<&str> = SHELLS.iter().map(|(n, _)| *n).collect();
            EnvPocketError::CommandFailed(format!(
                "unknown shell '{name}' (supported: {})",
                names.join(", ")
            ))
        })
}
