//! Front-end settings, read from an optional TOML file

use rpg_core::config::{default_catalog, load_balance, load_catalog, ConfigError};
use rpg_core::{BalanceTables, PassiveCatalog};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Balance override; the built-in tables are used when unset
    pub balance_path: Option<PathBuf>,
    pub catalog_path: Option<PathBuf>,
    pub save_path: PathBuf,
    pub log_dir: PathBuf,
    pub pacing_ms: u64,
    /// World difficulty for a new character; saves carry their own
    pub difficulty: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            balance_path: None,
            catalog_path: None,
            save_path: PathBuf::from("rpg_save.json"),
            log_dir: PathBuf::from("logs"),
            pacing_ms: 600,
            difficulty: 1.0,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }

    pub fn tables(&self) -> Result<BalanceTables, SettingsError> {
        match &self.balance_path {
            Some(path) => Ok(load_balance(path)?),
            None => Ok(BalanceTables::default()),
        }
    }

    pub fn catalog(&self) -> Result<PassiveCatalog, SettingsError> {
        match &self.catalog_path {
            Some(path) => Ok(load_catalog(path)?),
            None => Ok(default_catalog()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = Settings::parse("pacing_ms = 250\ndifficulty = 2.5\n").unwrap();
        assert_eq!(settings.pacing(), Duration::from_millis(250));
        assert!((settings.difficulty - 2.5).abs() < f64::EPSILON);
        assert_eq!(settings.save_path, PathBuf::from("rpg_save.json"));
        assert!(settings.balance_path.is_none());
    }

    #[test]
    fn test_builtin_tables_and_catalog() {
        let settings = Settings::default();
        assert_eq!(settings.tables().unwrap(), BalanceTables::default());
        assert!(!settings.catalog().unwrap().is_empty());
    }

    #[test]
    fn test_missing_balance_file() {
        let settings = Settings {
            balance_path: Some(PathBuf::from("/nonexistent/balance.toml")),
            ..Settings::default()
        };
        assert!(matches!(settings.tables(), Err(SettingsError::Config(_))));
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            Settings::parse("pacing_ms = \"fast\""),
            Err(SettingsError::Parse(_))
        ));
    }
}
