//! Battle state, outcomes and the events a battle emits

use crate::monster::Monster;
use serde::{Deserialize, Serialize};

/// Lifecycle of one battle instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleState {
    #[default]
    Idle,
    Fighting,
    Victory,
    Defeat,
    Fled,
}

/// How a finished battle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleOutcome {
    Victory,
    Defeat,
    Fled,
}

impl BattleOutcome {
    pub fn state(&self) -> BattleState {
        match self {
            BattleOutcome::Victory => BattleState::Victory,
            BattleOutcome::Defeat => BattleState::Defeat,
            BattleOutcome::Fled => BattleState::Fled,
        }
    }
}

/// Kind of a game-visible log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogCategory {
    Combat,
    System,
    Narrative,
    Loot,
}

/// Something the host should show or react to
#[derive(Debug, Clone, PartialEq)]
pub enum BattleEvent {
    Log {
        message: String,
        category: LogCategory,
    },
    /// Fired once; the monster carries its final HP
    Victory(Monster),
    Defeat,
    Fled,
    /// A landed player hit the host may narrate. Purely cosmetic.
    NarrationRequested {
        attacker: String,
        defender: String,
        damage: f64,
        crit: bool,
    },
}

impl BattleEvent {
    pub fn combat(message: impl Into<String>) -> Self {
        BattleEvent::Log {
            message: message.into(),
            category: LogCategory::Combat,
        }
    }

    pub fn system(message: impl Into<String>) -> Self {
        BattleEvent::Log {
            message: message.into(),
            category: LogCategory::System,
        }
    }
}
