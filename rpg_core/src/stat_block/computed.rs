//! Computed/derived combat values for PlayerStats

use crate::config::CombatBalance;
use crate::stat_block::PlayerStats;
use crate::types::Stance;

impl PlayerStats {
    /// Turn-order agility: dexterity slowed per chill stack
    pub fn agility(&self, chill_stacks: u32, combat: &CombatBalance) -> f64 {
        (self.dexterity * combat.chill_agility_factor.powi(chill_stacks as i32)).max(1.0)
    }

    /// Damage multiplier of the chosen stance
    pub fn stance_damage(&self, stance: Stance, combat: &CombatBalance) -> f64 {
        combat.stances.get(stance).damage
    }

    /// Flat damage removed from incoming hits under a stance
    pub fn mitigation(&self, stance: Stance, combat: &CombatBalance) -> f64 {
        self.armor * combat.armor_mitigation * combat.stances.get(stance).mitigation
    }

    pub fn has_synergy(&self, id: &str) -> bool {
        self.active_synergies.iter().any(|s| s == id)
    }
}
