//! Configuration loading from TOML files

mod balance;
mod passives;

pub use balance::{
    BalanceTables, CombatBalance, ItemBalance, LootBalance, MonsterBalance, MonsterRarityConfig,
    MonsterRarityTable, PlayerBalance, RarityTable, StanceModifiers, StanceTable,
};
pub use passives::{default_catalog, load_catalog, parse_catalog};

use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

/// Load a TOML file and deserialize it
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Load a TOML string and deserialize it
pub fn parse_toml<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let config: T = toml::from_str(content)?;
    Ok(config)
}

/// Load balance tables from a TOML file, rejecting invalid values
pub fn load_balance(path: &Path) -> Result<BalanceTables, ConfigError> {
    let tables: BalanceTables = load_toml(path)?;
    tables.validate()?;
    Ok(tables)
}

/// Parse balance tables from a TOML string, rejecting invalid values
pub fn parse_balance(content: &str) -> Result<BalanceTables, ConfigError> {
    let tables: BalanceTables = parse_toml(content)?;
    tables.validate()?;
    Ok(tables)
}
