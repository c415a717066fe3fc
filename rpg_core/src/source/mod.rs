//! StatSource - Trait and implementations for stat providers

mod base_stats;
mod effects;
mod gear;
mod passives;

pub use base_stats::BaseStatsSource;
pub use effects::ActiveEffectSource;
pub use gear::GearSource;
pub use passives::{PassiveSource, SetBonusSource};

use crate::stat_block::StatAccumulator;

/// Trait for anything that contributes stats to a PlayerStats snapshot
pub trait StatSource {
    /// Unique identifier for this source
    fn id(&self) -> &str;

    /// Priority for application order (higher = applied later)
    /// Default priority is 0.
    /// Priorities used by the aggregator:
    /// - Base stats: -100
    /// - Equipped passives: 0
    /// - Set bonuses and synergies: 50
    /// - Gear: 100
    /// - Active effects: 200
    fn priority(&self) -> i32 {
        0
    }

    /// Apply this source's stats to the accumulator
    fn apply(&self, stats: &mut StatAccumulator);
}
