//! Balance tables - every tuning constant the engine reads

use super::ConfigError;
use crate::monster::MonsterRarity;
use crate::types::{Rarity, Stance};
use serde::{Deserialize, Serialize};

/// Tunable balance constants.
///
/// Shared verbatim by the live battle driver and the headless simulator, so
/// swapping a table changes both in lockstep. Every section defaults
/// independently, which lets a TOML override name only what it changes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceTables {
    pub player: PlayerBalance,
    pub items: ItemBalance,
    pub combat: CombatBalance,
    pub loot: LootBalance,
    pub monster: MonsterBalance,
}

impl BalanceTables {
    /// Reject values that would break the engine's invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        let loot = &self.loot;
        for (name, cap) in [
            ("unique_cap", loot.unique_cap),
            ("rare_cap", loot.rare_cap),
            ("magic_cap", loot.magic_cap),
            ("base_drop_chance", loot.base_drop_chance),
        ] {
            if !(0.0..=1.0).contains(&cap) {
                return Err(ConfigError::ValidationError(format!(
                    "loot.{name} must be within [0, 1], got {cap}"
                )));
            }
        }

        for stance in Stance::all() {
            let modifiers = self.combat.stances.get(*stance);
            if modifiers.damage <= 0.0 || modifiers.mitigation <= 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "stance {stance:?} multipliers must be positive"
                )));
            }
        }

        if self.combat.chill_agility_factor <= 0.0 || self.combat.chill_agility_factor > 1.0 {
            return Err(ConfigError::ValidationError(
                "combat.chill_agility_factor must be within (0, 1]".to_string(),
            ));
        }

        let mut previous = 0.0;
        for rarity in MonsterRarity::all().iter().rev() {
            let threshold = self.monster.rarities.get(*rarity).threshold;
            if threshold < previous {
                return Err(ConfigError::ValidationError(format!(
                    "monster rarity thresholds must be cumulative, {rarity:?} is below a rarer tier"
                )));
            }
            previous = threshold;
        }

        Ok(())
    }
}

/// Per-rarity lookup table for item rarities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RarityTable<T> {
    pub common: T,
    pub magic: T,
    pub rare: T,
    pub unique: T,
}

impl<T: Copy> RarityTable<T> {
    pub fn get(&self, rarity: Rarity) -> T {
        match rarity {
            Rarity::Common => self.common,
            Rarity::Magic => self.magic,
            Rarity::Rare => self.rare,
            Rarity::Unique => self.unique,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerBalance {
    /// Starting value of each core attribute
    pub base_attribute: f64,
    pub base_damage: f64,
    pub base_armor: f64,
    pub base_magic_find: f64,
    pub base_crit_chance: f64,
    pub base_dodge_chance: f64,
    pub hp_per_vitality: f64,
    pub hp_per_level: f64,
    pub stat_points_per_level: u32,
    pub skill_points_per_level: u32,
    /// XP to next level = xp_base * level ^ xp_exponent
    pub xp_base: f64,
    pub xp_exponent: f64,
    /// Maximum number of equipped passives
    pub max_equipped_skills: usize,
}

impl Default for PlayerBalance {
    fn default() -> Self {
        PlayerBalance {
            base_attribute: 10.0,
            base_damage: 5.0,
            base_armor: 0.0,
            base_magic_find: 0.0,
            base_crit_chance: 5.0,
            base_dodge_chance: 5.0,
            hp_per_vitality: 5.0,
            hp_per_level: 10.0,
            stat_points_per_level: 3,
            skill_points_per_level: 1,
            xp_base: 100.0,
            xp_exponent: 1.5,
            max_equipped_skills: 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemBalance {
    /// Gold per item level before rarity scaling
    pub base_multiplier: f64,
    pub rarity_multipliers: RarityTable<f64>,
    /// Sale value multiplier for unidentified items
    pub unidentified_penalty: f64,
    /// Merchant buy price = sell value * markup
    pub buy_markup: f64,
    pub identify_cost: RarityTable<u32>,
}

impl Default for ItemBalance {
    fn default() -> Self {
        ItemBalance {
            base_multiplier: 10.0,
            rarity_multipliers: RarityTable {
                common: 1.0,
                magic: 2.0,
                rare: 5.0,
                unique: 15.0,
            },
            unidentified_penalty: 0.5,
            buy_markup: 3.0,
            identify_cost: RarityTable {
                common: 0,
                magic: 25,
                rare: 100,
                unique: 500,
            },
        }
    }
}

/// Damage and mitigation multipliers for one stance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StanceModifiers {
    pub damage: f64,
    pub mitigation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StanceTable {
    pub aggressive: StanceModifiers,
    pub balanced: StanceModifiers,
    pub defensive: StanceModifiers,
}

impl StanceTable {
    pub fn get(&self, stance: Stance) -> StanceModifiers {
        match stance {
            Stance::Aggressive => self.aggressive,
            Stance::Balanced => self.balanced,
            Stance::Defensive => self.defensive,
        }
    }
}

impl Default for StanceTable {
    fn default() -> Self {
        StanceTable {
            aggressive: StanceModifiers {
                damage: 1.3,
                mitigation: 0.7,
            },
            balanced: StanceModifiers {
                damage: 1.0,
                mitigation: 1.0,
            },
            defensive: StanceModifiers {
                damage: 0.7,
                mitigation: 1.5,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatBalance {
    pub crit_multiplier: f64,
    /// Flat mitigation = armor * armor_mitigation
    pub armor_mitigation: f64,
    pub stances: StanceTable,
    pub damage_roll_min: f64,
    pub damage_roll_max: f64,
    /// Agility is multiplied by this once per chill stack
    pub chill_agility_factor: f64,
    /// Bonus against a frozen target
    pub shatter_multiplier: f64,
    /// Bonus against a poisoned target while biohazard is active
    pub biohazard_multiplier: f64,
    /// Player HP fraction below which executioners double their hits
    pub executioner_threshold: f64,
    pub executioner_multiplier: f64,
    pub frostburn_multiplier: f64,
    pub flee_chance: f64,
    pub max_status_stacks: u32,
    /// A new turn batch is appended when fewer tokens than this remain
    pub queue_refill_threshold: usize,
    /// Safety cutoff for the headless simulator
    pub simulator_turn_cap: u32,
}

impl Default for CombatBalance {
    fn default() -> Self {
        CombatBalance {
            crit_multiplier: 1.5,
            armor_mitigation: 0.5,
            stances: StanceTable::default(),
            damage_roll_min: 0.8,
            damage_roll_max: 1.2,
            chill_agility_factor: 0.8,
            shatter_multiplier: 1.5,
            biohazard_multiplier: 1.2,
            executioner_threshold: 0.3,
            executioner_multiplier: 2.0,
            frostburn_multiplier: 2.0,
            flee_chance: 0.5,
            max_status_stacks: 10,
            queue_refill_threshold: 2,
            simulator_turn_cap: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LootBalance {
    pub base_drop_chance: f64,
    /// Added to the drop chance per difficulty step above 1
    pub difficulty_scaling: f64,
    /// Magic find percent to rarity multiplier conversion
    pub magic_find_factor: f64,
    pub base_unique_chance: f64,
    pub base_rare_chance: f64,
    pub base_magic_chance: f64,
    pub unique_cap: f64,
    pub rare_cap: f64,
    pub magic_cap: f64,
}

impl Default for LootBalance {
    fn default() -> Self {
        LootBalance {
            base_drop_chance: 0.4,
            difficulty_scaling: 0.1,
            magic_find_factor: 0.01,
            base_unique_chance: 0.01,
            base_rare_chance: 0.05,
            base_magic_chance: 0.25,
            unique_cap: 0.10,
            rare_cap: 0.30,
            magic_cap: 0.90,
        }
    }
}

/// Multipliers and elite-affix count for one monster rarity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonsterRarityConfig {
    /// Cumulative roll threshold; a roll below it qualifies for this tier
    pub threshold: f64,
    pub stat_multiplier: f64,
    pub xp_multiplier: f64,
    pub gold_multiplier: f64,
    pub maledict_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonsterRarityTable {
    pub common: MonsterRarityConfig,
    pub uncommon: MonsterRarityConfig,
    pub rare: MonsterRarityConfig,
    pub elite: MonsterRarityConfig,
    pub legendary: MonsterRarityConfig,
    pub unique: MonsterRarityConfig,
}

impl MonsterRarityTable {
    pub fn get(&self, rarity: MonsterRarity) -> MonsterRarityConfig {
        match rarity {
            MonsterRarity::Common => self.common,
            MonsterRarity::Uncommon => self.uncommon,
            MonsterRarity::Rare => self.rare,
            MonsterRarity::Elite => self.elite,
            MonsterRarity::Legendary => self.legendary,
            MonsterRarity::Unique => self.unique,
        }
    }
}

impl Default for MonsterRarityTable {
    fn default() -> Self {
        MonsterRarityTable {
            common: MonsterRarityConfig {
                threshold: 1.0,
                stat_multiplier: 1.0,
                xp_multiplier: 1.0,
                gold_multiplier: 1.0,
                maledict_count: 0,
            },
            uncommon: MonsterRarityConfig {
                threshold: 0.35,
                stat_multiplier: 1.2,
                xp_multiplier: 1.5,
                gold_multiplier: 1.5,
                maledict_count: 1,
            },
            rare: MonsterRarityConfig {
                threshold: 0.15,
                stat_multiplier: 1.5,
                xp_multiplier: 2.0,
                gold_multiplier: 2.5,
                maledict_count: 2,
            },
            elite: MonsterRarityConfig {
                threshold: 0.06,
                stat_multiplier: 1.8,
                xp_multiplier: 3.0,
                gold_multiplier: 4.0,
                maledict_count: 3,
            },
            legendary: MonsterRarityConfig {
                threshold: 0.02,
                stat_multiplier: 2.2,
                xp_multiplier: 5.0,
                gold_multiplier: 7.0,
                maledict_count: 4,
            },
            unique: MonsterRarityConfig {
                threshold: 0.005,
                stat_multiplier: 3.0,
                xp_multiplier: 10.0,
                gold_multiplier: 15.0,
                maledict_count: 5,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonsterBalance {
    /// Core attribute = (base_attribute + level * attribute_per_level) * multipliers
    pub base_attribute: f64,
    pub attribute_per_level: f64,
    pub hp_per_vitality: f64,
    pub hp_per_level: f64,
    pub damage_per_strength: f64,
    pub damage_per_level: f64,
    pub armor_per_dexterity: f64,
    pub armor_per_level: f64,
    pub crit_per_intelligence: f64,
    pub dodge_per_dexterity: f64,
    pub base_crit_chance: f64,
    pub base_dodge_chance: f64,
    /// Shift applied to every rarity threshold per difficulty step above 1
    pub difficulty_rarity_shift: f64,
    pub crit_cap: f64,
    pub dodge_cap: f64,
    /// Dodge bonus granted when any affix boosts dexterity
    pub dexterity_affix_dodge: f64,
    pub base_xp_per_level: f64,
    pub base_gold_per_level: f64,
    pub rarities: MonsterRarityTable,
}

impl Default for MonsterBalance {
    fn default() -> Self {
        MonsterBalance {
            base_attribute: 10.0,
            attribute_per_level: 2.0,
            hp_per_vitality: 8.0,
            hp_per_level: 20.0,
            damage_per_strength: 0.6,
            damage_per_level: 3.0,
            armor_per_dexterity: 0.5,
            armor_per_level: 2.0,
            crit_per_intelligence: 0.1,
            dodge_per_dexterity: 0.1,
            base_crit_chance: 5.0,
            base_dodge_chance: 5.0,
            difficulty_rarity_shift: 0.1,
            crit_cap: 50.0,
            dodge_cap: 50.0,
            dexterity_affix_dodge: 10.0,
            base_xp_per_level: 20.0,
            base_gold_per_level: 5.0,
            rarities: MonsterRarityTable::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_toml;

    #[test]
    fn test_default_tables_validate() {
        let tables = BalanceTables::default();
        assert!(tables.validate().is_ok());
        assert!((tables.combat.crit_multiplier - 1.5).abs() < f64::EPSILON);
        assert!((tables.loot.magic_cap - 0.9).abs() < f64::EPSILON);
        assert_eq!(tables.monster.rarities.unique.maledict_count, 5);
    }

    #[test]
    fn test_partial_override() {
        let toml = r#"
[combat]
crit_multiplier = 2.0
flee_chance = 0.75

[loot]
unique_cap = 0.2
"#;

        let tables: BalanceTables = parse_toml(toml).unwrap();
        assert!((tables.combat.crit_multiplier - 2.0).abs() < f64::EPSILON);
        assert!((tables.combat.flee_chance - 0.75).abs() < f64::EPSILON);
        assert!((tables.loot.unique_cap - 0.2).abs() < f64::EPSILON);
        // Untouched fields keep their defaults
        assert!((tables.combat.armor_mitigation - 0.5).abs() < f64::EPSILON);
        assert!((tables.player.hp_per_level - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validation_rejects_bad_cap() {
        let mut tables = BalanceTables::default();
        tables.loot.rare_cap = 1.5;
        assert!(matches!(tables.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validation_rejects_unordered_thresholds() {
        let mut tables = BalanceTables::default();
        tables.monster.rarities.unique.threshold = 0.5;
        assert!(tables.validate().is_err());
    }
}
