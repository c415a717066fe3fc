//! Monsters - rarity tiers, maledict affixes and per-encounter generation

mod affix;
pub(crate) mod generator;

pub use affix::{affix_bonus, AffixEffect, AffixReaction, MaledictAffix};
pub use generator::{generate_monster, generate_monster_with_rng, roll_monster_rarity};

use crate::config::{CombatBalance, MonsterBalance};
use crate::types::Attributes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Six-step monster rarity scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonsterRarity {
    Common,
    Uncommon,
    Rare,
    Elite,
    Legendary,
    Unique,
}

impl MonsterRarity {
    /// Most common first
    pub fn all() -> &'static [MonsterRarity] {
        &[
            MonsterRarity::Common,
            MonsterRarity::Uncommon,
            MonsterRarity::Rare,
            MonsterRarity::Elite,
            MonsterRarity::Legendary,
            MonsterRarity::Unique,
        ]
    }

    pub fn is_boss(&self) -> bool {
        *self == MonsterRarity::Unique
    }
}

impl fmt::Display for MonsterRarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MonsterRarity::Common => "Common",
            MonsterRarity::Uncommon => "Uncommon",
            MonsterRarity::Rare => "Rare",
            MonsterRarity::Elite => "Elite",
            MonsterRarity::Legendary => "Legendary",
            MonsterRarity::Unique => "Unique",
        };
        write!(f, "{name}")
    }
}

/// A generated enemy. Derived stats are fixed at creation; only
/// `current_hp` changes during a battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub level: u32,
    pub rarity: MonsterRarity,
    pub attributes: Attributes,
    pub max_hp: f64,
    /// May dip below zero until the death check runs
    pub current_hp: f64,
    pub damage: f64,
    pub armor: f64,
    pub crit_chance: f64,
    pub dodge_chance: f64,
    pub life_steal: f64,
    pub thorns: f64,
    pub maledicts: Vec<MaledictAffix>,
}

impl Monster {
    pub fn is_alive(&self) -> bool {
        self.current_hp > 0.0
    }

    pub fn has_maledict(&self, affix: MaledictAffix) -> bool {
        self.maledicts.contains(&affix)
    }

    /// Turn-order agility, slowed per chill stack
    pub fn agility(&self, chill_stacks: u32, combat: &CombatBalance) -> f64 {
        (self.attributes.dexterity * combat.chill_agility_factor.powi(chill_stacks as i32)).max(1.0)
    }

    pub fn xp_reward(&self, balance: &MonsterBalance) -> u32 {
        let multiplier = balance.rarities.get(self.rarity).xp_multiplier;
        (balance.base_xp_per_level * self.level as f64 * multiplier).floor() as u32
    }

    pub fn gold_reward(&self, balance: &MonsterBalance) -> u32 {
        let multiplier = balance.rarities.get(self.rarity).gold_multiplier;
        (balance.base_gold_per_level * self.level as f64 * multiplier).floor() as u32
    }
}
