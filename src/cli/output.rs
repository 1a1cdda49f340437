//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use chrono::{DateTime, Local, Utc};
use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::pocket::{EntrySummary, HistoryVersion, VaultListing};

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Format a timestamp in local time for tables.
pub fn format_time(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(t) => t
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => "-".to_string(),
    }
}

/// Format a byte count in human-readable form.
#[allow(clippy::cast_precision_loss)] // Payload sizes are well within f64 precision range
pub fn format_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Print a table of entries (Key, Last Modified, History, Origin).
pub fn print_entries_table(entries: &[EntrySummary]) {
    if entries.is_empty() {
        info("No entries in this vault yet.");
        tip("Run `envpocket save <KEY> <FILE>` to add your first entry.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Key", "Last Modified", "History", "Origin"]);

    for e in entries {
        table.add_row(vec![
            e.key.clone(),
            format_time(e.last_modified),
            e.history_count.to_string(),
            e.origin
                .as_ref()
                .map_or_else(|| "-".to_string(), ToString::to_string),
        ]);
    }

    println!("{table}");
}

/// Print a table of history versions (Version, Replaced At, Origin, Size).
pub fn print_history_table(versions: &[HistoryVersion]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Version", "Replaced At", "Origin", "Size"]);

    for v in versions {
        table.add_row(vec![
            v.index.to_string(),
            format_time(Some(v.timestamp)),
            v.origin
                .as_ref()
                .map_or_else(|| "-".to_string(), ToString::to_string),
            format_size(v.size),
        ]);
    }

    println!("{table}");
}

/// Print a table of vaults with their entry counts.
pub fn print_vaults_table(listing: &VaultListing, active: Option<&str>) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Vault", "Entries", "Active"]);

    let marker = |is_active: bool| {
        if is_active {
            style("*").green().bold().to_string()
        } else {
            String::new()
        }
    };

    table.add_row(vec![
        "(default)".to_string(),
        listing.default_count.to_string(),
        marker(active.is_none()),
    ]);
    for (name, count) in &listing.vaults {
        table.add_row(vec![
            name.clone(),
            count.to_string(),
            marker(active == Some(name.as_str())),
        ]);
    }

    println!("{table}");
}
