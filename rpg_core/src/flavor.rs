//! Flavor text collaborator
//!
//! Lore, narration and portraits are cosmetic. Every request has a local
//! fallback, and nothing in the engine waits on or branches on the result.

use crate::monster::Monster;
use crate::passive::PassiveSkill;
use crate::types::{Item, Rarity};
use thiserror::Error;

/// Failure of a flavor request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlavorError {
    #[error("Flavor provider unavailable: {0}")]
    Unavailable(String),
    #[error("Flavor provider returned an empty result")]
    Empty,
}

/// Source of cosmetic text and images
pub trait FlavorProvider {
    fn identify_lore(&self, item: &Item) -> Result<String, FlavorError>;

    fn narrate_hit(
        &self,
        attacker: &str,
        defender: &str,
        damage: f64,
        crit: bool,
    ) -> Result<String, FlavorError>;

    fn encounter_intro(&self, monster: &Monster) -> Result<String, FlavorError>;

    fn skill_aphorism(&self, skill: &PassiveSkill) -> Result<String, FlavorError>;

    /// Image reference for a hero portrait
    fn portrait(&self, description: &str) -> Result<Option<String>, FlavorError>;
}

/// Unwrap a flavor result, substituting the fallback on error or empty text
pub fn with_fallback(result: Result<String, FlavorError>, fallback: impl FnOnce() -> String) -> String {
    match result {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            tracing::warn!(error = %FlavorError::Empty, "using fallback flavor text");
            fallback()
        }
        Err(err) => {
            tracing::warn!(error = %err, "using fallback flavor text");
            fallback()
        }
    }
}

/// Deterministic local flavor, always available
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineFlavor;

impl OfflineFlavor {
    pub fn lore(&self, item: &Item) -> String {
        match item.rarity {
            Rarity::Common => format!("A plain {}, serviceable and unremarkable.", item.base_name.to_lowercase()),
            Rarity::Magic => format!("Faint runes shimmer along the {}.", item.base_name.to_lowercase()),
            Rarity::Rare => format!("{} was forged for someone who did not live to claim it.", item.name),
            Rarity::Unique => format!("Legends speak of {}. Few who carried it died old.", item.name),
        }
    }

    pub fn narration(&self, attacker: &str, defender: &str, damage: f64, crit: bool) -> String {
        if crit {
            format!("{attacker} finds a gap and strikes {defender} for {damage:.0}!")
        } else {
            format!("{attacker} hits {defender} for {damage:.0}.")
        }
    }

    pub fn intro(&self, monster: &Monster) -> String {
        if monster.rarity.is_boss() {
            format!("The air turns cold. {} has come for you.", monster.name)
        } else {
            format!("A level {} {} blocks the path.", monster.level, monster.name)
        }
    }

    pub fn aphorism(&self, skill: &PassiveSkill) -> String {
        format!("{} grows stronger with practice.", skill.name)
    }
}

impl FlavorProvider for OfflineFlavor {
    fn identify_lore(&self, item: &Item) -> Result<String, FlavorError> {
        Ok(self.lore(item))
    }

    fn narrate_hit(
        &self,
        attacker: &str,
        defender: &str,
        damage: f64,
        crit: bool,
    ) -> Result<String, FlavorError> {
        Ok(self.narration(attacker, defender, damage, crit))
    }

    fn encounter_intro(&self, monster: &Monster) -> Result<String, FlavorError> {
        Ok(self.intro(monster))
    }

    fn skill_aphorism(&self, skill: &PassiveSkill) -> Result<String, FlavorError> {
        Ok(self.aphorism(skill))
    }

    fn portrait(&self, _description: &str) -> Result<Option<String>, FlavorError> {
        Ok(None)
    }
}
