//! Battle - One fight between the player and a monster
//!
//! Every transition is an explicit call. `resolve_turn` consumes one token of
//! the turn queue; the live driver calls it on a pacing timer and the
//! simulator calls it in a tight loop.

use super::events::{BattleEvent, BattleOutcome, BattleState, LogCategory};
use super::resolution::{roll_enemy_hit, roll_player_hit};
use super::turns::{calculate_turns, TurnBatch, TurnQueue};
use crate::config::BalanceTables;
use crate::effects::{CombatStatusEffect, StatusEffects, StatusKind};
use crate::monster::Monster;
use crate::passive::Trigger;
use crate::stat_block::PlayerStats;
use crate::types::{Side, Stance};
use rand::Rng;
use std::collections::HashMap;

/// Exclusive owner of all mutable state of one battle
pub struct Battle<R: Rng> {
    pub(super) rng: R,
    pub(super) tables: BalanceTables,
    pub(super) state: BattleState,
    pub(super) last_outcome: Option<BattleOutcome>,
    pub(super) player: PlayerStats,
    pub(super) player_hp: f64,
    pub(super) monster: Option<Monster>,
    pub(super) queue: TurnQueue,
    pub(super) effects: StatusEffects,
    pub(super) stance: Stance,
    /// Tokens resolved so far
    pub(super) turn: u32,
    /// Remaining cooldown per proc skill id, counted in player turns
    pub(super) cooldowns: HashMap<String, u32>,
    pub(super) events: Vec<BattleEvent>,
}

impl<R: Rng> Battle<R> {
    pub fn new(tables: BalanceTables, rng: R) -> Self {
        Battle {
            rng,
            tables,
            state: BattleState::Idle,
            last_outcome: None,
            player: PlayerStats::default(),
            player_hp: 0.0,
            monster: None,
            queue: TurnQueue::new(),
            effects: StatusEffects::new(),
            stance: Stance::Balanced,
            turn: 0,
            cooldowns: HashMap::new(),
            events: Vec::new(),
        }
    }

    /// Begin a fight: full HP, fresh queue, no effects, balanced stance
    pub fn start(&mut self, player: PlayerStats, monster: Monster) {
        if self.state == BattleState::Fighting {
            tracing::warn!("starting a battle over one in progress");
        }

        self.player_hp = player.max_hp;
        self.player = player;
        self.effects.clear();
        self.queue.clear();
        self.cooldowns.clear();
        self.stance = Stance::Balanced;
        self.turn = 0;
        self.last_outcome = None;
        self.state = BattleState::Fighting;

        tracing::info!(
            monster = %monster.name,
            rarity = %monster.rarity,
            level = monster.level,
            "battle started"
        );
        self.log(
            format!("{} {} appears!", monster.icon, monster.name),
            LogCategory::System,
        );
        self.monster = Some(monster);
        self.refill_queue();
    }

    pub fn state(&self) -> BattleState {
        self.state
    }

    pub fn is_fighting(&self) -> bool {
        self.state == BattleState::Fighting
    }

    pub fn last_outcome(&self) -> Option<BattleOutcome> {
        self.last_outcome
    }

    pub fn player(&self) -> &PlayerStats {
        &self.player
    }

    pub fn player_hp(&self) -> f64 {
        self.player_hp
    }

    pub fn monster(&self) -> Option<&Monster> {
        self.monster.as_ref()
    }

    pub fn effects(&self) -> &StatusEffects {
        &self.effects
    }

    pub fn queue(&self) -> &TurnQueue {
        &self.queue
    }

    pub fn stance(&self) -> Stance {
        self.stance
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn tables(&self) -> &BalanceTables {
        &self.tables
    }

    pub fn set_stance(&mut self, stance: Stance) {
        if self.stance != stance {
            self.stance = stance;
            self.log(format!("Stance: {stance:?}"), LogCategory::System);
        }
    }

    /// Apply a status effect through the stacking rules
    pub fn apply_status(&mut self, effect: CombatStatusEffect) {
        if !self.is_fighting() {
            return;
        }
        tracing::debug!(name = %effect.name, target = ?effect.target, "status applied");
        self.effects
            .apply(effect, self.tables.combat.max_status_stacks);
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    /// Resolve the next queued action. Returns the outcome if this action
    /// ended the battle.
    pub fn resolve_turn(&mut self) -> Option<BattleOutcome> {
        if !self.is_fighting() {
            return None;
        }

        self.refill_queue();
        let actor = self.queue.pop()?;
        self.turn += 1;

        // Checked before durations tick so a one-turn freeze still costs a turn
        let incapacitated = self.effects.is_incapacitated(actor);
        if actor == Side::Player {
            for remaining in self.cooldowns.values_mut() {
                *remaining = remaining.saturating_sub(1);
            }
        }
        tracing::debug!(turn = self.turn, ?actor, incapacitated, "resolving turn");

        self.process_triggers(Trigger::OnStartTurn, actor, 0.0);
        if let Some(outcome) = self.check_end() {
            return Some(outcome);
        }

        self.resolve_status(actor);
        if let Some(outcome) = self.check_end() {
            return Some(outcome);
        }

        if incapacitated {
            let name = self.side_name(actor);
            self.log(format!("{name} cannot act!"), LogCategory::Combat);
            return None;
        }

        match actor {
            Side::Player => self.player_attack(),
            Side::Enemy => self.enemy_attack(),
        }
        self.check_end()
    }

    /// One escape attempt. Failure costs the front of the queue.
    pub fn flee(&mut self) -> Option<BattleOutcome> {
        if !self.is_fighting() {
            return None;
        }

        if self.rng.gen::<f64>() < self.tables.combat.flee_chance {
            self.log("You escaped!", LogCategory::System);
            return Some(self.finish(BattleOutcome::Fled));
        }

        self.log("Failed to escape!", LogCategory::System);
        self.queue.pop();
        None
    }

    /// Abandon the battle without an outcome. Nothing further is applied.
    pub fn cancel(&mut self) {
        if self.is_fighting() {
            tracing::info!(turn = self.turn, "battle cancelled");
        }
        self.clear_battle_state();
        self.state = BattleState::Idle;
    }

    /// Batch sized from current agility, chill included
    pub fn current_batch(&self) -> TurnBatch {
        let combat = &self.tables.combat;
        let player = self
            .player
            .agility(self.effects.stacks(Side::Player, StatusKind::Chill), combat);
        let enemy = self
            .monster
            .as_ref()
            .map(|m| m.agility(self.effects.stacks(Side::Enemy, StatusKind::Chill), combat))
            .unwrap_or(1.0);
        calculate_turns(player, enemy)
    }

    fn refill_queue(&mut self) {
        if self.queue.len() < self.tables.combat.queue_refill_threshold || self.queue.is_empty() {
            let batch = self.current_batch();
            self.queue.push_batch(&batch);
        }
    }

    /// Damage and regen over time for one side, then its durations tick
    fn resolve_status(&mut self, side: Side) {
        let max_hp = match side {
            Side::Player => self.player.max_hp,
            Side::Enemy => self.monster.as_ref().map(|m| m.max_hp).unwrap_or(0.0),
        };
        let name = self.side_name(side);

        for tick in self.effects.resolve(side, max_hp) {
            if tick.amount < 0.0 {
                self.damage(side, -tick.amount);
                self.log(
                    format!("{name} takes {:.0} {} damage", -tick.amount, tick.kind.label()),
                    LogCategory::Combat,
                );
            } else {
                self.heal(side, tick.amount);
                self.log(
                    format!("{name} regenerates {:.0} HP", tick.amount),
                    LogCategory::Combat,
                );
            }
        }
    }

    pub(super) fn player_attack(&mut self) {
        let Some(monster) = self.monster.as_ref() else {
            return;
        };
        let hit = roll_player_hit(
            &self.player,
            monster,
            &self.effects,
            self.stance,
            &self.tables.combat,
            &mut self.rng,
        );
        let monster_name = monster.name.clone();
        let thorns = monster.thorns;

        if hit.shattered {
            self.log("Shattering strike!", LogCategory::Combat);
        }

        if self.effects.consume(Side::Enemy, StatusKind::Shield).is_some() {
            self.log(
                format!("{monster_name}'s shield absorbs the blow!"),
                LogCategory::Combat,
            );
            return;
        }

        self.damage(Side::Enemy, hit.final_damage);
        let message = if hit.crit {
            format!("Critical! You hit {monster_name} for {:.0}", hit.final_damage)
        } else {
            format!("You hit {monster_name} for {:.0}", hit.final_damage)
        };
        self.log(message, LogCategory::Combat);
        self.events.push(BattleEvent::NarrationRequested {
            attacker: "You".to_string(),
            defender: monster_name.clone(),
            damage: hit.final_damage,
            crit: hit.crit,
        });
        if self.check_end().is_some() {
            return;
        }

        self.process_triggers(Trigger::OnHit, Side::Player, hit.final_damage);
        if hit.crit {
            self.process_triggers(Trigger::OnCrit, Side::Player, hit.final_damage);
        }
        self.process_triggers(Trigger::OnTakeDamage, Side::Enemy, hit.final_damage);
        if self.check_end().is_some() {
            return;
        }

        let stolen = (hit.final_damage * self.player.life_steal / 100.0).floor();
        if stolen > 0.0 {
            self.heal(Side::Player, stolen);
            self.log(format!("You drain {stolen:.0} HP"), LogCategory::Combat);
        }

        if thorns > 0.0 {
            let reflected = (self.player.damage * thorns / 100.0).floor();
            if reflected > 0.0 {
                self.damage(Side::Player, reflected);
                self.log(
                    format!("{monster_name}'s thorns deal {reflected:.0} to you"),
                    LogCategory::Combat,
                );
            }
        }
    }

    pub(super) fn enemy_attack(&mut self) {
        let dodge = self.player.dodge_chance + self.effects.magnitude(Side::Player, StatusKind::DodgeBoost);
        if self.rng.gen::<f64>() * 100.0 < dodge {
            let name = self.side_name(Side::Enemy);
            self.log(format!("You dodge {name}'s attack!"), LogCategory::Combat);
            self.process_triggers(Trigger::OnDodge, Side::Player, 0.0);
            return;
        }

        let Some(monster) = self.monster.as_ref() else {
            return;
        };
        let combat = &self.tables.combat;
        let hit = roll_enemy_hit(monster, self.player_hp, self.player.max_hp, combat, &mut self.rng);
        let monster_name = monster.name.clone();
        let life_steal = monster.life_steal;

        let weaken = self.effects.magnitude(Side::Enemy, StatusKind::Weaken);
        let mut hit = hit;
        hit.raw_damage *= (1.0 - weaken).max(0.0);
        let hit = hit.with_mitigation(self.player.mitigation(self.stance, combat));

        if self.effects.consume(Side::Player, StatusKind::Shield).is_some() {
            self.log(
                format!("Your shield absorbs {monster_name}'s attack!"),
                LogCategory::Combat,
            );
            return;
        }

        self.damage(Side::Player, hit.final_damage);
        let mut message = format!("{monster_name} hits you for {:.0}", hit.final_damage);
        if hit.executed {
            message.push_str(" (execute)");
        }
        if hit.crit {
            message.push_str(" (critical)");
        }
        self.log(message, LogCategory::Combat);
        if self.check_end().is_some() {
            return;
        }

        let stolen = (hit.final_damage * life_steal / 100.0).floor();
        if stolen > 0.0 {
            self.heal(Side::Enemy, stolen);
        }

        self.process_triggers(Trigger::OnHit, Side::Enemy, hit.final_damage);
        self.process_triggers(Trigger::OnTakeDamage, Side::Player, hit.final_damage);
    }

    /// End the battle if either side is down. Defeat wins a double knockout.
    pub(super) fn check_end(&mut self) -> Option<BattleOutcome> {
        if !self.is_fighting() {
            return self.last_outcome;
        }
        if self.player_hp <= 0.0 {
            return Some(self.finish(BattleOutcome::Defeat));
        }
        if self.monster.as_ref().is_some_and(|m| m.current_hp <= 0.0) {
            return Some(self.finish(BattleOutcome::Victory));
        }
        None
    }

    fn finish(&mut self, outcome: BattleOutcome) -> BattleOutcome {
        let monster = self.monster.take();
        tracing::info!(?outcome, turns = self.turn, player_hp = self.player_hp, "battle finished");

        match outcome {
            BattleOutcome::Victory => {
                if let Some(monster) = monster {
                    self.log(format!("{} is defeated!", monster.name), LogCategory::System);
                    self.events.push(BattleEvent::Victory(monster));
                }
            }
            BattleOutcome::Defeat => {
                self.log("You have been defeated...", LogCategory::System);
                self.events.push(BattleEvent::Defeat);
            }
            BattleOutcome::Fled => self.events.push(BattleEvent::Fled),
        }

        self.clear_battle_state();
        self.state = outcome.state();
        self.last_outcome = Some(outcome);
        outcome
    }

    fn clear_battle_state(&mut self) {
        self.monster = None;
        self.queue.clear();
        self.effects.clear();
        self.cooldowns.clear();
    }

    pub(super) fn damage(&mut self, side: Side, amount: f64) {
        match side {
            Side::Player => self.player_hp -= amount,
            Side::Enemy => {
                if let Some(monster) = self.monster.as_mut() {
                    monster.current_hp -= amount;
                }
            }
        }
    }

    pub(super) fn heal(&mut self, side: Side, amount: f64) {
        match side {
            Side::Player => self.player_hp = (self.player_hp + amount).min(self.player.max_hp),
            Side::Enemy => {
                if let Some(monster) = self.monster.as_mut() {
                    monster.current_hp = (monster.current_hp + amount).min(monster.max_hp);
                }
            }
        }
    }

    pub(super) fn side_name(&self, side: Side) -> String {
        match side {
            Side::Player => "You".to_string(),
            Side::Enemy => self
                .monster
                .as_ref()
                .map(|m| m.name.clone())
                .unwrap_or_else(|| "The enemy".to_string()),
        }
    }

    pub(super) fn log(&mut self, message: impl Into<String>, category: LogCategory) {
        self.events.push(BattleEvent::Log {
            message: message.into(),
            category,
        });
    }
}
