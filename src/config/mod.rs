//! Project configuration loaded from `.envpocket.toml`.

pub mod settings;

pub use settings::Settings;
