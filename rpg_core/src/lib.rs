//! rpg_core - Combat simulation and character-power engine for a loot RPG
//!
//! This library provides:
//! - Balance tables: every tunable constant, loadable from TOML
//! - Loot and monster generators
//! - Passive skill catalog, roller and set bonuses
//! - Stat aggregation: PlayerStats from attributes, gear, passives and effects
//! - Combat: turn batches, status effects, procs, live pacing
//! - Headless simulation for balance reports

pub mod character;
pub mod combat;
pub mod config;
pub mod effects;
pub mod flavor;
pub mod loot;
pub mod monster;
pub mod passive;
pub mod prelude;
pub mod save;
pub mod simulation;
pub mod source;
pub mod stat_block;
pub mod types;

// Re-export core types for convenience
pub use character::{Character, CharacterError, VictoryRewards};
pub use combat::{
    calculate_turns, Battle, BattleEvent, BattleOutcome, BattleState, LiveDriver, LogCategory,
    TurnBatch,
};
pub use config::{BalanceTables, ConfigError};
pub use effects::{ActiveEffect, CombatStatusEffect, StatusEffects, StatusKind};
pub use flavor::{FlavorError, FlavorProvider, OfflineFlavor};
pub use loot::{calculate_item_value, generate_loot, generate_loot_with_rng, identify_item};
pub use monster::{generate_monster, generate_monster_with_rng, MaledictAffix, Monster, MonsterRarity};
pub use passive::{generate_passive_skill, PassiveCatalog, PassiveSkill, Theme};
pub use save::{SaveError, SaveState};
pub use simulation::{run_simulation, simulate_battle, SimulationConfig, SimulationReport};
pub use source::StatSource;
pub use stat_block::{calculate_player_stats, PlayerStats, StatAccumulator, StatInputs};
pub use types::{Attribute, Attributes, EquipmentSlot, Item, Rarity, Side, Stance, StatType};
