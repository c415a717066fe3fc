//! Prelude module for convenient imports
//!
//! ```rust
//! use rpg_core::prelude::*;
//! ```

// Core types
pub use crate::types::{Attribute, Attributes, EquipmentSlot, Item, Rarity, Side, Stance, StatType};

// Stats
pub use crate::stat_block::{calculate_player_stats, PlayerStats, StatInputs};
pub use crate::character::Character;

// Generators
pub use crate::loot::{generate_loot, generate_loot_with_rng};
pub use crate::monster::{generate_monster, generate_monster_with_rng, Monster};
pub use crate::passive::{generate_passive_skill, PassiveCatalog, PassiveSkill};

// Combat
pub use crate::combat::{Battle, BattleEvent, BattleOutcome, BattleState, LiveDriver, LogCategory};
pub use crate::effects::{ActiveEffect, CombatStatusEffect, StatusKind};

// Config
pub use crate::config::{default_catalog, BalanceTables};
