//! Passive skills - the learnable catalog, owned instances and the equipped set

mod proc;
mod roller;
pub mod sets;

pub use proc::{EffectTarget, ProcCondition, ProcCost, ProcDefinition, ProcEffect, Trigger};
pub use roller::{
    generate_passive_skill, grant_skill, spend_skill_point, RollFilter, RolledSkill,
    SkillPointError, SkillPointOutcome,
};
pub use sets::{set_bonus, synergy, SetBonus, SetProc, Synergy, SET_BONUSES, SYNERGIES};

use crate::types::{Rarity, StatType};
use serde::{Deserialize, Serialize};

/// Rank cap for catalog entries that do not override it
pub const DEFAULT_MAX_RANK: u32 = 5;

/// School a passive skill belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Pyromancy,
    Cryomancy,
    Toxicology,
    Hemomancy,
    Warding,
    Swiftness,
    Arcana,
    Warfare,
    Fortune,
}

impl Theme {
    pub fn all() -> &'static [Theme] {
        &[
            Theme::Pyromancy,
            Theme::Cryomancy,
            Theme::Toxicology,
            Theme::Hemomancy,
            Theme::Warding,
            Theme::Swiftness,
            Theme::Arcana,
            Theme::Warfare,
            Theme::Fortune,
        ]
    }
}

/// What a catalog entry grants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SkillBonus {
    /// Flat stat, value = base_value + (rank - 1) * value_per_level
    Stat {
        stat: StatType,
        base_value: f64,
        value_per_level: f64,
    },
    Proc(ProcDefinition),
}

/// Static definition of a learnable passive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    pub theme: Theme,
    pub rarity: Rarity,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub max_rank: Option<u32>,
    /// Catalog id that must already be owned before this can be unlocked
    #[serde(default)]
    pub requires: Option<String>,
    pub bonus: SkillBonus,
}

impl CatalogEntry {
    pub fn max_rank(&self) -> u32 {
        self.max_rank.unwrap_or(DEFAULT_MAX_RANK)
    }

    /// Flat stat value at a rank, None for proc skills
    pub fn value_at(&self, rank: u32) -> Option<(StatType, f64)> {
        match &self.bonus {
            SkillBonus::Stat {
                stat,
                base_value,
                value_per_level,
            } => Some((
                *stat,
                base_value + rank.saturating_sub(1) as f64 * value_per_level,
            )),
            SkillBonus::Proc(_) => None,
        }
    }

    pub fn proc(&self) -> Option<&ProcDefinition> {
        match &self.bonus {
            SkillBonus::Proc(proc) => Some(proc),
            SkillBonus::Stat { .. } => None,
        }
    }
}

/// A passive the player owns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassiveSkill {
    pub id: String,
    pub name: String,
    pub theme: Theme,
    pub rank: u32,
    pub max_rank: u32,
    #[serde(default)]
    pub stat: Option<StatType>,
    /// Derived from rank; only ever written through `from_entry`
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub proc: Option<ProcDefinition>,
}

impl PassiveSkill {
    /// Build an owned instance of a catalog entry at a rank
    pub fn from_entry(entry: &CatalogEntry, rank: u32) -> Self {
        let rank = rank.clamp(1, entry.max_rank());
        let (stat, value) = match entry.value_at(rank) {
            Some((stat, value)) => (Some(stat), value),
            None => (None, 0.0),
        };
        PassiveSkill {
            id: entry.id.clone(),
            name: entry.name.clone(),
            theme: entry.theme,
            rank,
            max_rank: entry.max_rank(),
            stat,
            value,
            proc: entry.proc().copied(),
        }
    }

    pub fn is_maxed(&self) -> bool {
        self.rank >= self.max_rank
    }

    /// Same skill one rank higher, value recomputed
    pub fn upgraded(&self, entry: &CatalogEntry) -> Self {
        PassiveSkill::from_entry(entry, self.rank + 1)
    }
}

/// Static pool of learnable passives
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PassiveCatalog {
    #[serde(rename = "passives", default)]
    entries: Vec<CatalogEntry>,
}

impl PassiveCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        PassiveCatalog { entries }
    }

    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn by_theme(&self, theme: Theme) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(move |e| e.theme == theme)
    }
}

/// Ordered ids of the owned passives that are switched on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EquippedSkills(Vec<String>);

impl EquippedSkills {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids(ids: Vec<String>) -> Self {
        let mut equipped = EquippedSkills::new();
        for id in ids {
            equipped.equip(id, usize::MAX);
        }
        equipped
    }

    /// Equip an id if there is room and it is not already equipped
    pub fn equip(&mut self, id: impl Into<String>, capacity: usize) -> bool {
        let id = id.into();
        if self.0.len() >= capacity || self.contains(&id) {
            return false;
        }
        self.0.push(id);
        true
    }

    pub fn unequip(&mut self, id: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|e| e != id);
        before != self.0.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|e| e == id)
    }

    pub fn ids(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strength_entry() -> CatalogEntry {
        CatalogEntry {
            id: "iron_grip".to_string(),
            name: "Iron Grip".to_string(),
            theme: Theme::Warfare,
            rarity: Rarity::Common,
            description: String::new(),
            max_rank: None,
            requires: None,
            bonus: SkillBonus::Stat {
                stat: StatType::Strength,
                base_value: 3.0,
                value_per_level: 2.0,
            },
        }
    }

    #[test]
    fn test_value_derived_from_rank() {
        let entry = strength_entry();
        let skill = PassiveSkill::from_entry(&entry, 1);
        assert!((skill.value - 3.0).abs() < f64::EPSILON);

        let upgraded = skill.upgraded(&entry);
        assert_eq!(upgraded.rank, 2);
        assert!((upgraded.value - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rank_clamped_to_cap() {
        let entry = strength_entry();
        let skill = PassiveSkill::from_entry(&entry, 99);
        assert_eq!(skill.rank, DEFAULT_MAX_RANK);
        assert!(skill.is_maxed());
    }

    #[test]
    fn test_equipped_capacity_and_dedup() {
        let mut equipped = EquippedSkills::new();
        assert!(equipped.equip("a", 2));
        assert!(!equipped.equip("a", 2));
        assert!(equipped.equip("b", 2));
        assert!(!equipped.equip("c", 2));
        assert!(equipped.unequip("a"));
        assert_eq!(equipped.ids(), &["b".to_string()]);
    }
}
