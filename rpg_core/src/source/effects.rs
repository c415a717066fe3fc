//! ActiveEffectSource - Cross-battle buffs and debuffs

use crate::effects::ActiveEffect;
use crate::source::StatSource;
use crate::stat_block::StatAccumulator;

/// Signed stat contributions of the active effects
pub struct ActiveEffectSource<'a> {
    pub effects: &'a [ActiveEffect],
}

impl<'a> ActiveEffectSource<'a> {
    pub fn new(effects: &'a [ActiveEffect]) -> Self {
        ActiveEffectSource { effects }
    }
}

impl StatSource for ActiveEffectSource<'_> {
    fn id(&self) -> &str {
        "active_effects"
    }

    fn priority(&self) -> i32 {
        200 // Effects apply last
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        for effect in self.effects.iter().filter(|e| e.is_active()) {
            stats.apply_stat_type(effect.stat, effect.value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StatType;

    #[test]
    fn test_debuff_subtracts() {
        let effects = vec![
            ActiveEffect::new("Blessing", StatType::Strength, 5.0, 2),
            ActiveEffect::new("Curse", StatType::Armor, -3.0, 1),
            ActiveEffect::new("Faded", StatType::Damage, 10.0, 0),
        ];
        let mut acc = StatAccumulator::new();
        ActiveEffectSource::new(&effects).apply(&mut acc);
        assert!((acc.strength_flat - 5.0).abs() < f64::EPSILON);
        assert!((acc.armor_flat + 3.0).abs() < f64::EPSILON);
        assert!(acc.damage_flat.abs() < f64::EPSILON);
    }
}
