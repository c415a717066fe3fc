//! Proc definitions - chance-based abilities fired by combat events

use crate::effects::StatusKind;
use serde::{Deserialize, Serialize};

/// Combat event that can fire a proc
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    OnStartTurn,
    OnHit,
    OnCrit,
    OnTakeDamage,
    OnDodge,
}

/// Who a status effect from a proc lands on, relative to the caster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectTarget {
    Caster,
    Opponent,
}

/// Precondition that must hold for a proc to fire
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProcCondition {
    /// Caster HP strictly below this percent of max
    HpBelow { percent: f64 },
    /// Battle turn counter is a multiple of `every`
    TurnMultiple { every: u32 },
    /// The opponent currently carries this status
    TargetHas { status: StatusKind },
}

/// Resource spent when the proc fires
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProcCost {
    /// Percent of the caster's current HP
    CurrentHp { percent: f64 },
}

/// What a proc does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProcEffect {
    /// Bonus hit for caster damage times multiplier
    Damage { multiplier: f64 },
    /// Extra hits, each a percent of the triggering hit
    MultiHit { hits: u32, percent: f64 },
    /// Heal a percent of max HP
    Heal { percent: f64 },
    /// Remove every debuff on the caster
    Cleanse,
    /// Full negation of the next incoming hit
    Shield { duration: u32 },
    /// Buff or debuff for a number of turns
    Status {
        status: StatusKind,
        target: EffectTarget,
        value: f64,
        duration: u32,
    },
}

/// A complete proc: trigger, gate and effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProcDefinition {
    pub trigger: Trigger,
    /// Probability in [0, 1] at rank 1
    pub chance: f64,
    #[serde(default)]
    pub chance_per_rank: f64,
    /// Turns of the caster before the proc can fire again
    #[serde(default)]
    pub cooldown: Option<u32>,
    #[serde(default)]
    pub condition: Option<ProcCondition>,
    #[serde(default)]
    pub cost: Option<ProcCost>,
    pub effect: ProcEffect,
}

impl ProcDefinition {
    /// Fire chance at a given rank, capped at certainty
    pub fn chance_at(&self, rank: u32) -> f64 {
        (self.chance + rank.saturating_sub(1) as f64 * self.chance_per_rank).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chance_scales_with_rank() {
        let proc = ProcDefinition {
            trigger: Trigger::OnHit,
            chance: 0.2,
            chance_per_rank: 0.05,
            cooldown: None,
            condition: None,
            cost: None,
            effect: ProcEffect::Cleanse,
        };
        assert!((proc.chance_at(1) - 0.2).abs() < 1e-9);
        assert!((proc.chance_at(3) - 0.3).abs() < 1e-9);
        assert!((proc.chance_at(100) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_effect_tagging() {
        let json = serde_json::to_string(&ProcEffect::MultiHit { hits: 2, percent: 0.5 }).unwrap();
        assert!(json.contains("\"type\":\"multi_hit\""));

        let parsed: ProcCondition = toml::from_str("type = \"hp_below\"\npercent = 40.0").unwrap();
        assert_eq!(parsed, ProcCondition::HpBelow { percent: 40.0 });
    }
}
