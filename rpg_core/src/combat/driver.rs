//! LiveDriver - Paces a battle against wall-clock time

use super::battle::Battle;
use super::events::{BattleEvent, BattleOutcome};
use crate::monster::Monster;
use crate::stat_block::PlayerStats;
use rand::Rng;
use std::time::{Duration, Instant};

/// Delay between resolved actions
pub const DEFAULT_PACING: Duration = Duration::from_millis(600);

/// Resolves at most one queued action per pacing interval. The host calls
/// `poll` from its own event loop; there is no background thread.
pub struct LiveDriver<R: Rng> {
    battle: Battle<R>,
    pacing: Duration,
    next_action: Option<Instant>,
}

impl<R: Rng> LiveDriver<R> {
    pub fn new(battle: Battle<R>) -> Self {
        LiveDriver {
            battle,
            pacing: DEFAULT_PACING,
            next_action: None,
        }
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn start(&mut self, player: PlayerStats, monster: Monster, now: Instant) {
        self.battle.start(player, monster);
        self.next_action = Some(now + self.pacing);
    }

    /// Resolve one action if the pacing deadline has passed
    pub fn poll(&mut self, now: Instant) -> Option<BattleOutcome> {
        let deadline = self.next_action?;
        if now < deadline {
            return None;
        }

        let outcome = self.battle.resolve_turn();
        self.next_action = self.battle.is_fighting().then(|| now + self.pacing);
        outcome
    }

    pub fn flee(&mut self) -> Option<BattleOutcome> {
        let outcome = self.battle.flee();
        if !self.battle.is_fighting() {
            self.next_action = None;
        }
        outcome
    }

    /// Stop the timer and discard the battle
    pub fn cancel(&mut self) {
        self.next_action = None;
        self.battle.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.next_action.is_some()
    }

    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.next_action
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    pub fn battle(&self) -> &Battle<R> {
        &self.battle
    }

    pub fn battle_mut(&mut self) -> &mut Battle<R> {
        &mut self.battle
    }

    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        self.battle.drain_events()
    }
}
