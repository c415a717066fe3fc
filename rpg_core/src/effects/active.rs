//! Cross-battle effects - buffs and debuffs that last a number of battles

use crate::types::StatType;
use serde::{Deserialize, Serialize};

/// Temporary stat modifier measured in battles rather than turns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub name: String,
    pub stat: StatType,
    /// Signed value, negative for debuffs
    pub value: f64,
    pub battles_remaining: u32,
}

impl ActiveEffect {
    pub fn new(name: impl Into<String>, stat: StatType, value: f64, battles: u32) -> Self {
        ActiveEffect {
            name: name.into(),
            stat,
            value,
            battles_remaining: battles,
        }
    }

    pub fn is_debuff(&self) -> bool {
        self.value < 0.0
    }

    pub fn is_active(&self) -> bool {
        self.battles_remaining > 0
    }
}

/// Add an effect. Re-applying an effect of the same name extends its duration
/// without stacking its value.
pub fn apply_active_effect(effects: &mut Vec<ActiveEffect>, effect: ActiveEffect) {
    if let Some(existing) = effects.iter_mut().find(|e| e.name == effect.name) {
        existing.battles_remaining += effect.battles_remaining;
        tracing::debug!(
            name = %existing.name,
            battles = existing.battles_remaining,
            "extended active effect"
        );
    } else {
        effects.push(effect);
    }
}

/// Count every effect down by one battle, dropping expired ones.
/// Returns the names of the effects that expired.
pub fn tick_active_effects(effects: &mut Vec<ActiveEffect>) -> Vec<String> {
    for effect in effects.iter_mut() {
        effect.battles_remaining = effect.battles_remaining.saturating_sub(1);
    }
    let expired = effects
        .iter()
        .filter(|e| !e.is_active())
        .map(|e| e.name.clone())
        .collect();
    effects.retain(ActiveEffect::is_active);
    expired
}
