//! One module per subcommand.

pub mod completions;
pub mod delete;
pub mod export;
pub mod get;
pub mod history;
pub mod import_cmd;
pub mod list;
pub mod save;
pub mod vaults;
pub mod version;
