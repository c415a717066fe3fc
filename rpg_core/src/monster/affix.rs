//! Maledict affixes - elite monster modifiers

use crate::passive::Trigger;
use crate::types::StatType;
use serde::{Deserialize, Serialize};

/// What a reactive maledict does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AffixEffect {
    /// Shield the monster against the next hit
    ReflectShield { duration: u32 },
    /// Set the player on fire
    BurnOnHit { value: f64, duration: u32 },
    /// Reorder the pending turn queue
    ShuffleTurns,
    /// Poison pool under the player
    PoisonHazard { value: f64, duration: u32 },
}

/// Chance-gated reaction carried by a maledict
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffixReaction {
    pub trigger: Trigger,
    pub chance: f64,
    pub effect: AffixEffect,
}

/// Elite modifier drawn onto non-common monsters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaledictAffix {
    Brutal,
    Ironclad,
    Vital,
    Swift,
    Arcane,
    Executioner,
    Thorned,
    Vampiric,
    Reflective,
    Infernal,
    Chaotic,
    Plagued,
}

impl MaledictAffix {
    /// The fixed pool affixes are drawn from
    pub fn all() -> &'static [MaledictAffix] {
        &[
            MaledictAffix::Brutal,
            MaledictAffix::Ironclad,
            MaledictAffix::Vital,
            MaledictAffix::Swift,
            MaledictAffix::Arcane,
            MaledictAffix::Executioner,
            MaledictAffix::Thorned,
            MaledictAffix::Vampiric,
            MaledictAffix::Reflective,
            MaledictAffix::Infernal,
            MaledictAffix::Chaotic,
            MaledictAffix::Plagued,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            MaledictAffix::Brutal => "Brutal",
            MaledictAffix::Ironclad => "Ironclad",
            MaledictAffix::Vital => "Vital",
            MaledictAffix::Swift => "Swift",
            MaledictAffix::Arcane => "Arcane",
            MaledictAffix::Executioner => "Executioner",
            MaledictAffix::Thorned => "Thorned",
            MaledictAffix::Vampiric => "Vampiric",
            MaledictAffix::Reflective => "Reflective",
            MaledictAffix::Infernal => "Infernal",
            MaledictAffix::Chaotic => "Chaotic",
            MaledictAffix::Plagued => "Plagued",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MaledictAffix::Brutal => "+25% damage",
            MaledictAffix::Ironclad => "+40% armor",
            MaledictAffix::Vital => "+30% vitality",
            MaledictAffix::Swift => "+25% dexterity, harder to hit",
            MaledictAffix::Arcane => "+20% intelligence, +5% crit",
            MaledictAffix::Executioner => "Double damage against wounded foes",
            MaledictAffix::Thorned => "Reflects 15% of your damage",
            MaledictAffix::Vampiric => "Heals for 10% of damage dealt",
            MaledictAffix::Reflective => "May raise a shield when struck",
            MaledictAffix::Infernal => "Hits may set you ablaze",
            MaledictAffix::Chaotic => "Warps the order of battle",
            MaledictAffix::Plagued => "Leaves poison pools underfoot",
        }
    }

    /// Percent bonuses per stat. Crit chance is added flat.
    pub fn modifiers(&self) -> &'static [(StatType, f64)] {
        match self {
            MaledictAffix::Brutal => &[(StatType::Damage, 25.0)],
            MaledictAffix::Ironclad => &[(StatType::Armor, 40.0)],
            MaledictAffix::Vital => &[(StatType::Vitality, 30.0)],
            MaledictAffix::Swift => &[(StatType::Dexterity, 25.0)],
            MaledictAffix::Arcane => &[(StatType::Intelligence, 20.0), (StatType::CritChance, 5.0)],
            _ => &[],
        }
    }

    pub fn thorns(&self) -> f64 {
        match self {
            MaledictAffix::Thorned => 15.0,
            _ => 0.0,
        }
    }

    pub fn life_steal(&self) -> f64 {
        match self {
            MaledictAffix::Vampiric => 10.0,
            _ => 0.0,
        }
    }

    pub fn reaction(&self) -> Option<AffixReaction> {
        let (trigger, chance, effect) = match self {
            MaledictAffix::Reflective => (
                Trigger::OnTakeDamage,
                0.25,
                AffixEffect::ReflectShield { duration: 2 },
            ),
            MaledictAffix::Infernal => (
                Trigger::OnHit,
                0.3,
                AffixEffect::BurnOnHit {
                    value: 0.03,
                    duration: 3,
                },
            ),
            MaledictAffix::Chaotic => (Trigger::OnStartTurn, 0.2, AffixEffect::ShuffleTurns),
            MaledictAffix::Plagued => (
                Trigger::OnStartTurn,
                0.25,
                AffixEffect::PoisonHazard {
                    value: 0.02,
                    duration: 3,
                },
            ),
            _ => return None,
        };
        Some(AffixReaction {
            trigger,
            chance,
            effect,
        })
    }

    /// Whether this affix raises dexterity, which also grants extra dodge
    pub fn boosts_dexterity(&self) -> bool {
        self.modifiers()
            .iter()
            .any(|(stat, value)| *stat == StatType::Dexterity && *value > 0.0)
    }
}

/// Percent bonus summed across affixes for one stat
pub fn affix_bonus(affixes: &[MaledictAffix], stat: StatType) -> f64 {
    affixes
        .iter()
        .flat_map(|a| a.modifiers().iter())
        .filter(|(s, _)| *s == stat)
        .map(|(_, value)| value)
        .sum()
}
