//! Combat engine - Turn batches, attack resolution, triggers and pacing

mod battle;
mod driver;
mod events;
mod resolution;
mod result;
mod triggers;
mod turns;

pub use battle::Battle;
pub use driver::{LiveDriver, DEFAULT_PACING};
pub use events::{BattleEvent, BattleOutcome, BattleState, LogCategory};
pub use resolution::{roll_enemy_hit, roll_player_hit};
pub use result::{mitigate, HitResult};
pub use turns::{calculate_turns, TurnBatch, TurnQueue};
