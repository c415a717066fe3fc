//! Intra-battle status effects and their stacking rules

use crate::types::Side;
use serde::{Deserialize, Serialize};

/// Kind of a combat status effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    /// Fraction of max HP lost per stack each turn
    Burn,
    Poison,
    /// Skips the holder's action
    Freeze,
    Stun,
    /// Each stack slows agility
    Chill,
    /// Fraction of max HP healed per stack each turn
    Regen,
    /// Crit chance points, also raises the crit multiplier by value / 100
    CritBoost,
    /// Negates the next hit, then breaks
    Shield,
    DodgeBoost,
    /// Damage percent per stack
    ScalingStrength,
    /// Damage percent lost
    Weaken,
}

impl StatusKind {
    /// Damage and regen over time plus chill accumulate stacks; crowd control,
    /// shields and flat buffs only refresh.
    pub fn stacks_intensity(&self) -> bool {
        matches!(
            self,
            StatusKind::Burn
                | StatusKind::Poison
                | StatusKind::Regen
                | StatusKind::Chill
                | StatusKind::ScalingStrength
        )
    }

    pub fn is_damage_over_time(&self) -> bool {
        matches!(self, StatusKind::Burn | StatusKind::Poison)
    }

    pub fn is_incapacitating(&self) -> bool {
        matches!(self, StatusKind::Freeze | StatusKind::Stun)
    }

    /// Harmful to the holder, removed by cleanse
    pub fn is_debuff(&self) -> bool {
        matches!(
            self,
            StatusKind::Burn
                | StatusKind::Poison
                | StatusKind::Freeze
                | StatusKind::Stun
                | StatusKind::Chill
                | StatusKind::Weaken
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusKind::Burn => "Burn",
            StatusKind::Poison => "Poison",
            StatusKind::Freeze => "Freeze",
            StatusKind::Stun => "Stun",
            StatusKind::Chill => "Chill",
            StatusKind::Regen => "Regen",
            StatusKind::CritBoost => "Crit Boost",
            StatusKind::Shield => "Shield",
            StatusKind::DodgeBoost => "Dodge Boost",
            StatusKind::ScalingStrength => "Scaling Strength",
            StatusKind::Weaken => "Weaken",
        }
    }
}

/// A temporary modifier on one side of a battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatStatusEffect {
    /// Stacking key together with the target side
    pub name: String,
    pub kind: StatusKind,
    pub target: Side,
    /// Remaining turns of the holder
    pub duration: u32,
    pub value: f64,
    pub stacks: u32,
}

impl CombatStatusEffect {
    /// Create an effect named after its kind
    pub fn new(kind: StatusKind, target: Side, duration: u32, value: f64) -> Self {
        CombatStatusEffect {
            name: kind.label().to_lowercase().replace(' ', "_"),
            kind,
            target,
            duration,
            value,
            stacks: 1,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_stacks(mut self, stacks: u32) -> Self {
        self.stacks = stacks.max(1);
        self
    }

    /// Value scaled by stack count
    pub fn magnitude(&self) -> f64 {
        self.value * self.stacks as f64
    }

    /// HP change this effect causes on the holder's turn. Negative is damage.
    pub fn tick_amount(&self, max_hp: f64) -> f64 {
        match self.kind {
            StatusKind::Burn | StatusKind::Poison => -(max_hp * self.magnitude()).floor(),
            StatusKind::Regen => (max_hp * self.magnitude()).floor(),
            _ => 0.0,
        }
    }

    /// Merge a re-application of the same effect into this one
    pub fn refresh(&mut self, incoming: &CombatStatusEffect, max_stacks: u32) {
        if self.kind.stacks_intensity() {
            self.stacks = (self.stacks + incoming.stacks.max(1)).min(max_stacks.max(1));
        } else {
            self.stacks = 1;
        }
        self.duration = incoming.duration;
        if incoming.value > self.value {
            self.value = incoming.value;
        }
    }
}

/// HP change produced by one effect during a status resolution step
#[derive(Debug, Clone, PartialEq)]
pub struct EffectTick {
    pub name: String,
    pub kind: StatusKind,
    pub amount: f64,
}

/// All status effects in one battle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusEffects {
    effects: Vec<CombatStatusEffect>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an effect, consolidating with an existing one of the same name
    /// on the same side.
    pub fn apply(&mut self, effect: CombatStatusEffect, max_stacks: u32) {
        if let Some(existing) = self
            .effects
            .iter_mut()
            .find(|e| e.name == effect.name && e.target == effect.target)
        {
            existing.refresh(&effect, max_stacks);
        } else {
            let mut effect = effect;
            if !effect.kind.stacks_intensity() {
                effect.stacks = 1;
            }
            effect.stacks = effect.stacks.clamp(1, max_stacks.max(1));
            self.effects.push(effect);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CombatStatusEffect> {
        self.effects.iter()
    }

    pub fn on(&self, side: Side) -> impl Iterator<Item = &CombatStatusEffect> {
        self.effects.iter().filter(move |e| e.target == side)
    }

    pub fn has(&self, side: Side, kind: StatusKind) -> bool {
        self.on(side).any(|e| e.kind == kind)
    }

    pub fn is_incapacitated(&self, side: Side) -> bool {
        self.on(side).any(|e| e.kind.is_incapacitating())
    }

    /// Total stacks of a kind on a side
    pub fn stacks(&self, side: Side, kind: StatusKind) -> u32 {
        self.on(side).filter(|e| e.kind == kind).map(|e| e.stacks).sum()
    }

    /// Summed magnitude (value * stacks) of a kind on a side
    pub fn magnitude(&self, side: Side, kind: StatusKind) -> f64 {
        self.on(side)
            .filter(|e| e.kind == kind)
            .map(|e| e.magnitude())
            .sum()
    }

    /// Remove the first effect of a kind on a side, returning it
    pub fn consume(&mut self, side: Side, kind: StatusKind) -> Option<CombatStatusEffect> {
        let index = self
            .effects
            .iter()
            .position(|e| e.target == side && e.kind == kind)?;
        Some(self.effects.remove(index))
    }

    /// Remove every debuff on a side, returning how many were removed
    pub fn cleanse(&mut self, side: Side) -> usize {
        let before = self.effects.len();
        self.effects
            .retain(|e| !(e.target == side && e.kind.is_debuff()));
        before - self.effects.len()
    }

    /// Compute over-time HP changes for a side, then count down its
    /// durations and drop expired effects.
    pub fn resolve(&mut self, side: Side, max_hp: f64) -> Vec<EffectTick> {
        let ticks = self
            .on(side)
            .filter_map(|e| {
                let amount = e.tick_amount(max_hp);
                (amount != 0.0).then(|| EffectTick {
                    name: e.name.clone(),
                    kind: e.kind,
                    amount,
                })
            })
            .collect();

        for effect in self.effects.iter_mut().filter(|e| e.target == side) {
            effect.duration = effect.duration.saturating_sub(1);
        }
        self.effects.retain(|e| e.duration > 0);

        ticks
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: u32 = 10;

    #[test]
    fn test_burn_accumulates_stacks() {
        let mut effects = StatusEffects::new();
        effects.apply(CombatStatusEffect::new(StatusKind::Burn, Side::Enemy, 3, 0.05), MAX);
        effects.resolve(Side::Enemy, 100.0);
        effects.apply(CombatStatusEffect::new(StatusKind::Burn, Side::Enemy, 3, 0.05), MAX);

        let burn = effects.on(Side::Enemy).next().unwrap();
        assert_eq!(effects.len(), 1);
        assert_eq!(burn.stacks, 2);
        assert_eq!(burn.duration, 3);
    }

    #[test]
    fn test_stun_never_stacks() {
        let mut effects = StatusEffects::new();
        effects.apply(CombatStatusEffect::new(StatusKind::Stun, Side::Player, 1, 0.0), MAX);
        effects.apply(CombatStatusEffect::new(StatusKind::Stun, Side::Player, 2, 0.0), MAX);

        let stun = effects.on(Side::Player).next().unwrap();
        assert_eq!(stun.stacks, 1);
        assert_eq!(stun.duration, 2);
    }

    #[test]
    fn test_shield_initial_stacks_capped_at_one() {
        let mut effects = StatusEffects::new();
        effects.apply(
            CombatStatusEffect::new(StatusKind::Shield, Side::Player, 2, 0.0).with_stacks(4),
            MAX,
        );
        assert_eq!(effects.stacks(Side::Player, StatusKind::Shield), 1);
    }

    #[test]
    fn test_stronger_value_wins() {
        let mut effects = StatusEffects::new();
        effects.apply(CombatStatusEffect::new(StatusKind::CritBoost, Side::Player, 2, 30.0), MAX);
        effects.apply(CombatStatusEffect::new(StatusKind::CritBoost, Side::Player, 2, 10.0), MAX);
        assert!((effects.magnitude(Side::Player, StatusKind::CritBoost) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_stack_cap() {
        let mut effects = StatusEffects::new();
        for _ in 0..5 {
            effects.apply(CombatStatusEffect::new(StatusKind::Poison, Side::Enemy, 3, 0.01), 3);
        }
        assert_eq!(effects.stacks(Side::Enemy, StatusKind::Poison), 3);
    }

    #[test]
    fn test_same_kind_different_sides_are_separate() {
        let mut effects = StatusEffects::new();
        effects.apply(CombatStatusEffect::new(StatusKind::Chill, Side::Enemy, 3, 0.0), MAX);
        effects.apply(CombatStatusEffect::new(StatusKind::Chill, Side::Player, 3, 0.0), MAX);
        assert_eq!(effects.len(), 2);
        assert_eq!(effects.stacks(Side::Enemy, StatusKind::Chill), 1);
    }

    #[test]
    fn test_resolve_damage_scales_with_stacks() {
        let mut effects = StatusEffects::new();
        effects.apply(
            CombatStatusEffect::new(StatusKind::Poison, Side::Player, 2, 0.5).with_stacks(3),
            MAX,
        );
        let ticks = effects.resolve(Side::Player, 10.0);
        assert_eq!(ticks.len(), 1);
        assert!((ticks[0].amount + 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_resolve_counts_down_only_that_side() {
        let mut effects = StatusEffects::new();
        effects.apply(CombatStatusEffect::new(StatusKind::Regen, Side::Player, 1, 0.1), MAX);
        effects.apply(CombatStatusEffect::new(StatusKind::Burn, Side::Enemy, 1, 0.1), MAX);

        let ticks = effects.resolve(Side::Player, 50.0);
        assert!((ticks[0].amount - 5.0).abs() < 1e-9);
        assert!(!effects.has(Side::Player, StatusKind::Regen));
        assert!(effects.has(Side::Enemy, StatusKind::Burn));
    }

    #[test]
    fn test_cleanse_keeps_buffs() {
        let mut effects = StatusEffects::new();
        effects.apply(CombatStatusEffect::new(StatusKind::Burn, Side::Player, 3, 0.1), MAX);
        effects.apply(CombatStatusEffect::new(StatusKind::Stun, Side::Player, 1, 0.0), MAX);
        effects.apply(CombatStatusEffect::new(StatusKind::Shield, Side::Player, 2, 0.0), MAX);

        assert_eq!(effects.cleanse(Side::Player), 2);
        assert!(effects.has(Side::Player, StatusKind::Shield));
    }

    #[test]
    fn test_consume_shield() {
        let mut effects = StatusEffects::new();
        effects.apply(CombatStatusEffect::new(StatusKind::Shield, Side::Enemy, 2, 0.0), MAX);
        assert!(effects.consume(Side::Enemy, StatusKind::Shield).is_some());
        assert!(effects.consume(Side::Enemy, StatusKind::Shield).is_none());
    }
}
