//! PlayerStats - Battle-ready snapshot derived from every stat source
//!
//! Pipeline, applied in source priority order:
//! 1. Base attributes and balance-table bases
//! 2. Equipped passives (all owned passives when nothing is equipped)
//! 3. Theme set bonuses
//! 4. Synergies between active set bonuses
//! 5. Equipped items
//! 6. Cross-battle active effects
//! 7. Cross-derived stats, then clamping and rounding

mod aggregator;
mod computed;

pub use aggregator::StatAccumulator;

use crate::config::BalanceTables;
use crate::effects::ActiveEffect;
use crate::passive::{PassiveSkill, ProcDefinition, Theme};
use crate::source::{
    ActiveEffectSource, BaseStatsSource, GearSource, PassiveSource, SetBonusSource, StatSource,
};
use crate::types::{Attributes, EquipmentSlot, Item};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Proc carried by an active passive skill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveProc {
    pub skill_id: String,
    pub name: String,
    pub rank: u32,
    pub proc: ProcDefinition,
}

/// Fully resolved player stats. Recomputed from source state, never stored
/// as a source of truth.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub level: u32,
    pub strength: f64,
    pub dexterity: f64,
    pub intelligence: f64,
    pub vitality: f64,
    pub damage: f64,
    pub armor: f64,
    pub max_hp: f64,
    pub attack_speed: f64,
    pub crit_chance: f64,
    pub dodge_chance: f64,
    pub magic_find: f64,
    pub life_steal: f64,
    pub active_set_bonuses: Vec<Theme>,
    pub active_synergies: Vec<String>,
    pub procs: Vec<ActiveProc>,
}

/// Everything the aggregator reads
#[derive(Debug, Clone, Copy)]
pub struct StatInputs<'a> {
    pub base_attributes: Attributes,
    pub equipment: &'a BTreeMap<EquipmentSlot, Item>,
    pub owned_passives: &'a [PassiveSkill],
    pub level: u32,
    /// Unspent points; carried for parity with the save shape, adds nothing
    pub stat_points: u32,
    pub active_effects: &'a [ActiveEffect],
    pub equipped_skill_ids: &'a [String],
}

/// Owned passives that contribute stats.
///
/// Saves written before the equipped set existed have no equipped ids; those
/// characters get every owned passive, as they did when the save was written.
pub fn active_passives<'a>(
    owned: &'a [PassiveSkill],
    equipped_ids: &[String],
) -> Vec<&'a PassiveSkill> {
    if equipped_ids.is_empty() {
        return owned.iter().collect();
    }
    equipped_ids
        .iter()
        .filter_map(|id| owned.iter().find(|s| &s.id == id))
        .collect()
}

/// Combine every source into PlayerStats. Pure: identical inputs give
/// identical output.
pub fn calculate_player_stats(inputs: &StatInputs<'_>, tables: &BalanceTables) -> PlayerStats {
    let active = active_passives(inputs.owned_passives, inputs.equipped_skill_ids);

    let mut sources: Vec<Box<dyn StatSource + '_>> = vec![
        Box::new(BaseStatsSource::new(inputs.base_attributes, &tables.player)),
        Box::new(PassiveSource::new(&active)),
        Box::new(SetBonusSource::new(&active)),
        Box::new(ActiveEffectSource::new(inputs.active_effects)),
    ];
    for item in inputs.equipment.values() {
        sources.push(Box::new(GearSource::new(item)));
    }

    // Sort sources by priority
    sources.sort_by_key(|s| s.priority());

    let mut accumulator = StatAccumulator::new();
    for source in &sources {
        source.apply(&mut accumulator);
    }

    accumulator.finalize(inputs.level, &tables.player)
}
