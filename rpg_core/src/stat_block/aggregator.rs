//! StatAccumulator - Collects stat contributions before deriving PlayerStats

use crate::config::PlayerBalance;
use crate::passive::Theme;
use crate::stat_block::{ActiveProc, PlayerStats};
use crate::types::StatType;

/// Accumulates stat contributions from every source
///
/// Sources only ever add. Cross-derived stats, clamping and rounding happen
/// once, in `finalize`.
#[derive(Debug, Clone, Default)]
pub struct StatAccumulator {
    // === Attributes ===
    pub strength_flat: f64,
    pub dexterity_flat: f64,
    pub intelligence_flat: f64,
    pub vitality_flat: f64,

    // === Offense ===
    pub damage_flat: f64,
    pub attack_speed_flat: f64,
    pub crit_chance_flat: f64,
    pub life_steal_flat: f64,

    // === Defense ===
    pub armor_flat: f64,
    pub max_hp_flat: f64,
    pub dodge_chance_flat: f64,

    // === Utility ===
    pub magic_find_flat: f64,

    // === Passive tree state ===
    pub active_set_bonuses: Vec<Theme>,
    pub active_synergies: Vec<String>,
    pub procs: Vec<ActiveProc>,
}

impl StatAccumulator {
    /// Create a new empty accumulator
    pub fn new() -> Self {
        StatAccumulator::default()
    }

    /// Add a flat contribution to one stat
    pub fn apply_stat_type(&mut self, stat: StatType, value: f64) {
        match stat {
            StatType::Strength => self.strength_flat += value,
            StatType::Dexterity => self.dexterity_flat += value,
            StatType::Intelligence => self.intelligence_flat += value,
            StatType::Vitality => self.vitality_flat += value,
            StatType::Damage => self.damage_flat += value,
            StatType::AttackSpeed => self.attack_speed_flat += value,
            StatType::Armor => self.armor_flat += value,
            StatType::MaxHp => self.max_hp_flat += value,
            StatType::CritChance => self.crit_chance_flat += value,
            StatType::DodgeChance => self.dodge_chance_flat += value,
            StatType::MagicFind => self.magic_find_flat += value,
            StatType::LifeSteal => self.life_steal_flat += value,
        }
    }

    /// Derive the battle-ready snapshot
    pub fn finalize(self, level: u32, balance: &PlayerBalance) -> PlayerStats {
        let strength = self.strength_flat;
        let dexterity = self.dexterity_flat;
        let intelligence = self.intelligence_flat;
        let vitality = self.vitality_flat;

        // Cross-derived stats
        let damage = self.damage_flat + (strength * 0.5).floor();
        let armor = self.armor_flat + (dexterity * 0.5).floor();
        let dodge_chance = self.dodge_chance_flat + dexterity * 0.2;
        let crit_chance = self.crit_chance_flat + intelligence * 0.2;
        let max_hp = vitality * balance.hp_per_vitality
            + level as f64 * balance.hp_per_level
            + self.max_hp_flat;

        PlayerStats {
            level,
            strength: round1(strength),
            dexterity: round1(dexterity),
            intelligence: round1(intelligence),
            vitality: round1(vitality),
            damage: round1(damage),
            armor: round1(armor),
            max_hp: round1(max_hp.max(1.0)),
            attack_speed: round1(self.attack_speed_flat),
            crit_chance: round1(crit_chance.min(100.0)),
            dodge_chance: round1(dodge_chance.min(75.0)),
            magic_find: round1(self.magic_find_flat),
            life_steal: round1(self.life_steal_flat),
            active_set_bonuses: self.active_set_bonuses,
            active_synergies: self.active_synergies,
            procs: self.procs,
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
