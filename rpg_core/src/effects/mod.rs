//! Status effects inside a battle and cross-battle active effects

mod active;
mod status;

pub use active::{apply_active_effect, tick_active_effects, ActiveEffect};
pub use status::{CombatStatusEffect, EffectTick, StatusEffects, StatusKind};
