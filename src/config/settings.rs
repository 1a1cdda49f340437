use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{EnvPocketError, Result};
use crate::pocket::Vault;
use crate::store::keyring::DEFAULT_SERVICE;

/// Project-level configuration, loaded from `.envpocket.toml`.
///
/// Every field has a sensible default so envpocket works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Vault to use when neither `--vault` nor `ENVPOCKET_VAULT` is set.
    #[serde(default)]
    pub default_vault: Option<String>,

    /// Service name under which entries are stored in the OS keyring.
    #[serde(default = "default_keyring_service")]
    pub keyring_service: String,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_keyring_service() -> String {
    DEFAULT_SERVICE.to_string()
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_vault: None,
            keyring_service: default_keyring_service(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".envpocket.toml";

    /// Load settings from `<project_dir>/.envpocket.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            EnvPocketError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        if settings.keyring_service.is_empty() {
            return Err(EnvPocketError::ConfigError(format!(
                "{}: keyring_service cannot be empty",
                config_path.display()
            )));
        }

        Ok(settings)
    }

    /// Resolve the active vault.
    ///
    /// An explicit selection (flag or environment) wins over the config
    /// default.  An empty selection means the default scope.
    pub fn resolve_vault(&self, selected: Option<&str>) -> Result<Option<Vault>> {
        match selected.or(self.default_vault.as_deref()) {
            None | Some("") => Ok(None),
            Some(name) => Vault::new(name).map(Some),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.default_vault, None);
        assert_eq!(s.keyring_service, "envpocket");
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.keyring_service, "envpocket");
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
default_vault = "team/api"
keyring_service = "envpocket-test"
"#;
        fs::write(tmp.path().join(".envpocket.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.default_vault.as_deref(), Some("team/api"));
        assert_eq!(settings.keyring_service, "envpocket-test");
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".envpocket.toml"), "default_vault = \"prod\"\n").unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.default_vault.as_deref(), Some("prod"));
        assert_eq!(settings.keyring_service, "envpocket");
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".envpocket.toml"), "not valid {{toml").unwrap();
        assert!(Settings::load(tmp.path()).is_err());
    }

    #[test]
    fn load_rejects_empty_service() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".envpocket.toml"), "keyring_service = \"\"\n").unwrap();
        assert!(Settings::load(tmp.path()).is_err());
    }

    #[test]
    fn explicit_vault_wins_over_config() {
        let s = Settings {
            default_vault: Some("config".into()),
            ..Settings::default()
        };
        let vault = s.resolve_vault(Some("flag")).unwrap().unwrap();
        assert_eq!(vault.as_str(), "flag");

        let vault = s.resolve_vault(None).unwrap().unwrap();
        assert_eq!(vault.as_str(), "config");
    }

    #[test]
    fn empty_selection_is_default_scope() {
        let s = Settings {
            default_vault: Some("config".into()),
            ..Settings::default()
        };
        assert_eq!(s.resolve_vault(Some("")).unwrap(), None);
        assert_eq!(Settings::default().resolve_vault(None).unwrap(), None);
    }

    #[test]
    fn invalid_vault_name_is_rejected() {
        assert!(Settings::default().resolve_vault(Some("bad name")).is_err());
    }
}
