use clap::Parser;
use envpocket::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    // Diagnostics go to stderr so `get` output on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("envpocket=warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Save {
            ref key,
            ref file,
            ref value,
        } => envpocket::cli::commands::save::execute(&cli, key, file.as_deref(), value.as_deref()),
        Commands::Get {
            ref key,
            ref output,
            version_index,
        } => envpocket::cli::commands::get::execute(&cli, key, output.as_deref(), version_index),
        Commands::Delete { ref key, force } => {
            envpocket::cli::commands::delete::execute(&cli, key, force)
        }
        Commands::List => envpocket::cli::commands::list::execute(&cli),
        Commands::History { ref key } => envpocket::cli::commands::history::execute(&cli, key),
        Commands::Vaults => envpocket::cli::commands::vaults::execute(&cli),
        Commands::Export { ref key, ref file } => {
            envpocket::cli::commands::export::execute(&cli, key, file)
        }
        Commands::Import { ref file } => envpocket::cli::commands::import_cmd::execute(&cli, file),
        Commands::Version => envpocket::cli::commands::version::execute(),
        Commands::Completions { ref shell } => {
            envpocket::cli::commands::completions::execute(shell)
        }
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        envpocket::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
