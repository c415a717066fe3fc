//! Passive skill catalog loading

use super::ConfigError;
use crate::passive::{PassiveCatalog, SkillBonus};
use std::collections::HashSet;
use std::path::Path;

/// Load the passive catalog from a TOML file
pub fn load_catalog(path: &Path) -> Result<PassiveCatalog, ConfigError> {
    let catalog: PassiveCatalog = super::load_toml(path)?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

/// Load the passive catalog from a TOML string
pub fn parse_catalog(content: &str) -> Result<PassiveCatalog, ConfigError> {
    let catalog: PassiveCatalog = super::parse_toml(content)?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

/// Catalog shipped with the crate
pub fn default_catalog() -> PassiveCatalog {
    let toml = include_str!("../../config/passives.toml");
    parse_catalog(toml).unwrap_or_else(|err| {
        tracing::error!(%err, "bundled passive catalog failed to load");
        PassiveCatalog::default()
    })
}

fn validate_catalog(catalog: &PassiveCatalog) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for entry in catalog.entries() {
        if !seen.insert(entry.id.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate passive id '{}'",
                entry.id
            )));
        }
        if entry.max_rank() == 0 {
            return Err(ConfigError::ValidationError(format!(
                "passive '{}' has a max rank of 0",
                entry.id
            )));
        }
        if let SkillBonus::Proc(proc) = &entry.bonus {
            if !(0.0..=1.0).contains(&proc.chance) {
                return Err(ConfigError::ValidationError(format!(
                    "passive '{}' has chance {} outside [0, 1]",
                    entry.id, proc.chance
                )));
            }
        }
    }

    for entry in catalog.entries() {
        if let Some(required) = &entry.requires {
            if !seen.contains(required.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "passive '{}' requires unknown passive '{}'",
                    entry.id, required
                )));
            }
        }
    }
    Ok(())
}
