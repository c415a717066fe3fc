//! BaseStatsSource - Allocated attributes plus balance-table bases

use crate::config::PlayerBalance;
use crate::source::StatSource;
use crate::stat_block::StatAccumulator;
use crate::types::Attributes;

/// Character attributes and the flat bases every character starts with
pub struct BaseStatsSource<'a> {
    pub attributes: Attributes,
    pub balance: &'a PlayerBalance,
}

impl<'a> BaseStatsSource<'a> {
    pub fn new(attributes: Attributes, balance: &'a PlayerBalance) -> Self {
        BaseStatsSource {
            attributes,
            balance,
        }
    }
}

impl StatSource for BaseStatsSource<'_> {
    fn id(&self) -> &str {
        "base_stats"
    }

    fn priority(&self) -> i32 {
        -100 // Base stats apply first
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        stats.strength_flat += self.attributes.strength;
        stats.dexterity_flat += self.attributes.dexterity;
        stats.intelligence_flat += self.attributes.intelligence;
        stats.vitality_flat += self.attributes.vitality;

        stats.damage_flat += self.balance.base_damage;
        stats.armor_flat += self.balance.base_armor;
        stats.magic_find_flat += self.balance.base_magic_find;
        stats.crit_chance_flat += self.balance.base_crit_chance;
        stats.dodge_chance_flat += self.balance.base_dodge_chance;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_stats_seed() {
        let balance = PlayerBalance::default();
        let source = BaseStatsSource::new(Attributes::uniform(10.0), &balance);
        let mut acc = StatAccumulator::new();
        source.apply(&mut acc);

        assert!((acc.strength_flat - 10.0).abs() < f64::EPSILON);
        assert!((acc.vitality_flat - 10.0).abs() < f64::EPSILON);
        assert!((acc.damage_flat - 5.0).abs() < f64::EPSILON);
        assert!((acc.crit_chance_flat - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_base_stats_priority() {
        let balance = PlayerBalance::default();
        let source = BaseStatsSource::new(Attributes::default(), &balance);
        assert_eq!(source.priority(), -100);
    }
}
