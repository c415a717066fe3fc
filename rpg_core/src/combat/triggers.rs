//! Trigger dispatch - procs, set bonuses, synergies and maledict reactions

use super::battle::Battle;
use super::events::LogCategory;
use crate::effects::{CombatStatusEffect, StatusKind};
use crate::monster::AffixEffect;
use crate::passive::sets::{BLOODLUST, BLOOD_WARD, FROSTBURN, TEMPEST};
use crate::passive::{set_bonus, EffectTarget, ProcCondition, ProcCost, ProcEffect, Trigger};
use crate::types::Side;
use rand::Rng;

/// Share of damage taken that blood ward heals back
const BLOOD_WARD_HEAL: f64 = 0.2;
/// HP fraction below which bloodlust strikes again
const BLOODLUST_THRESHOLD: f64 = 0.5;
const BLOODLUST_DAMAGE: f64 = 0.5;
const TEMPEST_DODGE: f64 = 15.0;
const TEMPEST_DURATION: u32 = 2;

impl<R: Rng> Battle<R> {
    /// Fire everything the actor has bound to a trigger. `damage` is the
    /// damage that caused the trigger, zero for turn starts and dodges.
    pub(super) fn process_triggers(&mut self, trigger: Trigger, actor: Side, damage: f64) {
        if !self.is_fighting() {
            return;
        }
        match actor {
            Side::Player => self.player_triggers(trigger, damage),
            Side::Enemy => self.enemy_triggers(trigger),
        }
    }

    fn player_triggers(&mut self, trigger: Trigger, damage: f64) {
        let enemy_chilled = self.effects.has(Side::Enemy, StatusKind::Chill);

        let procs: Vec<_> = self
            .player
            .procs
            .iter()
            .filter(|p| p.proc.trigger == trigger)
            .cloned()
            .collect();
        for active in procs {
            if !self.is_fighting() {
                return;
            }
            if self.cooldowns.get(&active.skill_id).copied().unwrap_or(0) > 0 {
                continue;
            }
            if let Some(condition) = active.proc.condition {
                if !self.condition_holds(condition) {
                    continue;
                }
            }
            if self.rng.gen::<f64>() >= active.proc.chance_at(active.rank) {
                continue;
            }
            if let Some(ProcCost::CurrentHp { percent }) = active.proc.cost {
                let cost = (self.player_hp * percent / 100.0).floor();
                if cost >= self.player_hp {
                    continue;
                }
                self.player_hp -= cost;
            }
            if let Some(cooldown) = active.proc.cooldown {
                self.cooldowns.insert(active.skill_id.clone(), cooldown);
            }

            tracing::debug!(skill = %active.skill_id, ?trigger, "proc fired");
            self.log(format!("{} triggers!", active.name), LogCategory::Combat);
            self.apply_proc_effect(active.proc.effect, damage, &active.name);
            self.check_end();
        }

        let set_procs: Vec<_> = self
            .player
            .active_set_bonuses
            .iter()
            .filter_map(|theme| set_bonus(*theme))
            .filter_map(|bonus| bonus.proc.map(|proc| (bonus.name, proc)))
            .filter(|(_, proc)| proc.trigger == trigger)
            .collect();
        for (name, proc) in set_procs {
            if !self.is_fighting() {
                return;
            }
            if self.rng.gen::<f64>() >= proc.chance {
                continue;
            }
            self.log(format!("{name} surges!"), LogCategory::Combat);
            self.apply_proc_effect(proc.effect, damage, name);
            self.check_end();
        }

        if self.is_fighting() {
            self.synergy_triggers(trigger, damage, enemy_chilled);
        }
    }

    fn condition_holds(&self, condition: ProcCondition) -> bool {
        match condition {
            ProcCondition::HpBelow { percent } => {
                self.player.max_hp > 0.0 && self.player_hp / self.player.max_hp * 100.0 < percent
            }
            ProcCondition::TurnMultiple { every } => every > 0 && self.turn % every == 0,
            ProcCondition::TargetHas { status } => self.effects.has(Side::Enemy, status),
        }
    }

    fn apply_proc_effect(&mut self, effect: ProcEffect, damage: f64, source: &str) {
        match effect {
            ProcEffect::Damage { multiplier } => {
                let amount = (self.player.damage * multiplier).floor();
                self.strike_enemy(amount, source);
            }
            ProcEffect::MultiHit { hits, percent } => {
                let amount = (damage * percent).floor();
                for _ in 0..hits {
                    if !self.is_fighting() {
                        break;
                    }
                    self.strike_enemy(amount, source);
                }
            }
            ProcEffect::Heal { percent } => {
                let amount = (self.player.max_hp * percent).floor();
                self.heal(Side::Player, amount);
                self.log(format!("{source} restores {amount:.0} HP"), LogCategory::Combat);
            }
            ProcEffect::Cleanse => {
                let removed = self.effects.cleanse(Side::Player);
                if removed > 0 {
                    self.log(format!("{source} purges {removed} ailments"), LogCategory::Combat);
                }
            }
            ProcEffect::Shield { duration } => {
                self.apply_status(CombatStatusEffect::new(StatusKind::Shield, Side::Player, duration, 1.0));
                self.log(format!("{source} raises a shield"), LogCategory::Combat);
            }
            ProcEffect::Status {
                status,
                target,
                value,
                duration,
            } => {
                let side = match target {
                    EffectTarget::Caster => Side::Player,
                    EffectTarget::Opponent => Side::Enemy,
                };
                self.apply_status(CombatStatusEffect::new(status, side, duration, value));
                let name = self.side_name(side);
                self.log(format!("{name}: {}", status.label()), LogCategory::Combat);
            }
        }
    }

    /// Direct trigger damage, not reduced by armor or shields
    fn strike_enemy(&mut self, amount: f64, source: &str) {
        if amount <= 0.0 {
            return;
        }
        self.damage(Side::Enemy, amount);
        self.log(format!("{source} deals {amount:.0} damage"), LogCategory::Combat);
        self.check_end();
    }

    fn synergy_triggers(&mut self, trigger: Trigger, damage: f64, enemy_chilled: bool) {
        match trigger {
            Trigger::OnHit => {
                if enemy_chilled && self.player.has_synergy(FROSTBURN) {
                    let burst = (self.player.damage * self.tables.combat.frostburn_multiplier).floor();
                    self.strike_enemy(burst, "Frostburn");
                }
                let low = self.player_hp < self.player.max_hp * BLOODLUST_THRESHOLD;
                if low && self.is_fighting() && self.player.has_synergy(BLOODLUST) {
                    self.strike_enemy((damage * BLOODLUST_DAMAGE).floor(), "Bloodlust");
                }
            }
            Trigger::OnCrit => {
                if self.player.has_synergy(TEMPEST) {
                    self.apply_status(CombatStatusEffect::new(
                        StatusKind::DodgeBoost,
                        Side::Player,
                        TEMPEST_DURATION,
                        TEMPEST_DODGE,
                    ));
                    self.log("Tempest quickens your step", LogCategory::Combat);
                }
            }
            Trigger::OnTakeDamage => {
                let amount = (damage * BLOOD_WARD_HEAL).floor();
                if amount > 0.0 && self.player.has_synergy(BLOOD_WARD) {
                    self.heal(Side::Player, amount);
                    self.log(format!("Blood Ward restores {amount:.0} HP"), LogCategory::Combat);
                }
            }
            Trigger::OnStartTurn | Trigger::OnDodge => {}
        }
    }

    fn enemy_triggers(&mut self, trigger: Trigger) {
        let Some(monster) = self.monster.as_ref() else {
            return;
        };
        let reactions: Vec<_> = monster
            .maledicts
            .iter()
            .filter_map(|affix| affix.reaction().map(|r| (*affix, r)))
            .filter(|(_, reaction)| reaction.trigger == trigger)
            .collect();
        let monster_name = monster.name.clone();

        for (affix, reaction) in reactions {
            if !self.is_fighting() {
                return;
            }
            if self.rng.gen::<f64>() >= reaction.chance {
                continue;
            }
            tracing::debug!(affix = affix.name(), ?trigger, "maledict reacted");

            match reaction.effect {
                AffixEffect::ReflectShield { duration } => {
                    self.apply_status(CombatStatusEffect::new(StatusKind::Shield, Side::Enemy, duration, 1.0));
                    self.log(format!("{monster_name} raises a reflective ward"), LogCategory::Combat);
                }
                AffixEffect::BurnOnHit { value, duration } => {
                    self.apply_status(
                        CombatStatusEffect::new(StatusKind::Burn, Side::Player, duration, value)
                            .named("infernal_burn"),
                    );
                    self.log(format!("{monster_name} sets you ablaze"), LogCategory::Combat);
                }
                AffixEffect::ShuffleTurns => {
                    self.queue.shuffle(&mut self.rng);
                    self.log("Chaos twists the order of battle", LogCategory::Combat);
                }
                AffixEffect::PoisonHazard { value, duration } => {
                    self.apply_status(
                        CombatStatusEffect::new(StatusKind::Poison, Side::Player, duration, value)
                            .named("plague_pool"),
                    );
                    self.log(format!("{monster_name} spreads a plague pool"), LogCategory::Combat);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::combat::Battle;
    use crate::config::{BalanceTables, MonsterBalance};
    use crate::effects::{CombatStatusEffect, StatusKind};
    use crate::monster::generator::build_monster;
    use crate::monster::{MaledictAffix, Monster, MonsterRarity};
    use crate::passive::sets::{BLOOD_WARD, FROSTBURN};
    use crate::passive::{ProcCondition, ProcCost, ProcDefinition, ProcEffect, Theme, Trigger};
    use crate::stat_block::{ActiveProc, PlayerStats};
    use crate::types::Side;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn player() -> PlayerStats {
        PlayerStats {
            level: 1,
            dexterity: 10.0,
            damage: 20.0,
            max_hp: 100.0,
            ..PlayerStats::default()
        }
    }

    fn monster(maledicts: Vec<MaledictAffix>) -> Monster {
        let mut monster = build_monster(1, MonsterRarity::Rare, 1.0, maledicts, &MonsterBalance::default());
        monster.max_hp = 10_000.0;
        monster.current_hp = 10_000.0;
        monster
    }

    fn battle(player: PlayerStats, monster: Monster) -> Battle<ChaCha8Rng> {
        let mut battle = Battle::new(BalanceTables::default(), ChaCha8Rng::seed_from_u64(11));
        battle.start(player, monster);
        battle.drain_events();
        battle
    }

    fn proc(trigger: Trigger, effect: ProcEffect) -> ActiveProc {
        ActiveProc {
            skill_id: "test".to_string(),
            name: "Test".to_string(),
            rank: 1,
            proc: ProcDefinition {
                trigger,
                chance: 1.0,
                chance_per_rank: 0.0,
                cooldown: None,
                condition: None,
                cost: None,
                effect,
            },
        }
    }

    fn enemy_hp(battle: &Battle<ChaCha8Rng>) -> f64 {
        battle.monster().map(|m| m.current_hp).unwrap_or_default()
    }

    #[test]
    fn test_hp_condition_gates_proc() {
        let mut caster = player();
        let mut heal = proc(Trigger::OnTakeDamage, ProcEffect::Heal { percent: 0.25 });
        heal.proc.condition = Some(ProcCondition::HpBelow { percent: 30.0 });
        caster.procs.push(heal);
        let mut battle = battle(caster, monster(Vec::new()));

        battle.player_hp = 50.0;
        battle.process_triggers(Trigger::OnTakeDamage, Side::Player, 10.0);
        assert!((battle.player_hp() - 50.0).abs() < f64::EPSILON);

        battle.player_hp = 20.0;
        battle.process_triggers(Trigger::OnTakeDamage, Side::Player, 10.0);
        assert!((battle.player_hp() - 45.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hp_cost_is_paid() {
        let mut caster = player();
        let mut strike = proc(Trigger::OnHit, ProcEffect::Damage { multiplier: 1.0 });
        strike.proc.cost = Some(ProcCost::CurrentHp { percent: 10.0 });
        caster.procs.push(strike);
        let mut battle = battle(caster, monster(Vec::new()));

        battle.process_triggers(Trigger::OnHit, Side::Player, 15.0);
        assert!((battle.player_hp() - 90.0).abs() < f64::EPSILON);
        assert!((enemy_hp(&battle) - 9_980.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_multi_hit_uses_triggering_damage() {
        let mut caster = player();
        caster.procs.push(proc(Trigger::OnHit, ProcEffect::MultiHit { hits: 2, percent: 0.4 }));
        let mut battle = battle(caster, monster(Vec::new()));

        battle.process_triggers(Trigger::OnHit, Side::Player, 25.0);
        assert!((enemy_hp(&battle) - 9_980.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_target_has_condition() {
        let mut caster = player();
        let mut freeze = proc(
            Trigger::OnHit,
            ProcEffect::Status {
                status: StatusKind::Freeze,
                target: crate::passive::EffectTarget::Opponent,
                value: 1.0,
                duration: 1,
            },
        );
        freeze.proc.condition = Some(ProcCondition::TargetHas { status: StatusKind::Chill });
        caster.procs.push(freeze);
        let mut battle = battle(caster, monster(Vec::new()));

        battle.process_triggers(Trigger::OnHit, Side::Player, 10.0);
        assert!(!battle.effects().has(Side::Enemy, StatusKind::Freeze));

        battle.apply_status(CombatStatusEffect::new(StatusKind::Chill, Side::Enemy, 3, 1.0));
        battle.process_triggers(Trigger::OnHit, Side::Player, 10.0);
        assert!(battle.effects().has(Side::Enemy, StatusKind::Freeze));
    }

    #[test]
    fn test_cleanse_removes_debuffs() {
        let mut caster = player();
        caster.procs.push(proc(Trigger::OnStartTurn, ProcEffect::Cleanse));
        let mut battle = battle(caster, monster(Vec::new()));
        battle.apply_status(CombatStatusEffect::new(StatusKind::Poison, Side::Player, 3, 0.1));

        battle.process_triggers(Trigger::OnStartTurn, Side::Player, 0.0);
        assert!(!battle.effects().has(Side::Player, StatusKind::Poison));
    }

    #[test]
    fn test_frostburn_bursts_chilled_enemy() {
        let mut caster = player();
        caster.active_synergies.push(FROSTBURN.to_string());
        let mut battle = battle(caster, monster(Vec::new()));

        battle.process_triggers(Trigger::OnHit, Side::Player, 10.0);
        assert!((enemy_hp(&battle) - 10_000.0).abs() < f64::EPSILON);

        battle.apply_status(CombatStatusEffect::new(StatusKind::Chill, Side::Enemy, 3, 1.0));
        battle.process_triggers(Trigger::OnHit, Side::Player, 10.0);
        assert!((enemy_hp(&battle) - 9_960.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_blood_ward_heals_share_of_hit() {
        let mut caster = player();
        caster.active_synergies.push(BLOOD_WARD.to_string());
        let mut battle = battle(caster, monster(Vec::new()));
        battle.player_hp = 50.0;

        battle.process_triggers(Trigger::OnTakeDamage, Side::Player, 30.0);
        assert!((battle.player_hp() - 56.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_set_bonus_proc_fires() {
        let mut caster = player();
        caster.active_set_bonuses.push(Theme::Arcana);
        // Arcane Lattice fires 30% of crits; enough crits make it certain
        let mut battle = battle(caster, monster(Vec::new()));
        for _ in 0..50 {
            battle.process_triggers(Trigger::OnCrit, Side::Player, 10.0);
        }
        assert!(enemy_hp(&battle) < 10_000.0);
    }

    #[test]
    fn test_plagued_pools_poison() {
        let mut battle = battle(player(), monster(vec![MaledictAffix::Plagued]));
        for _ in 0..50 {
            battle.process_triggers(Trigger::OnStartTurn, Side::Enemy, 0.0);
        }
        assert!(battle.effects().has(Side::Player, StatusKind::Poison));
        assert!(battle.effects().stacks(Side::Player, StatusKind::Poison) <= 10);
    }

    #[test]
    fn test_chaotic_shuffle_keeps_tokens() {
        let mut battle = battle(player(), monster(vec![MaledictAffix::Chaotic]));
        let before = battle.queue().len();
        for _ in 0..20 {
            battle.process_triggers(Trigger::OnStartTurn, Side::Enemy, 0.0);
        }
        assert_eq!(battle.queue().len(), before);
    }

    #[test]
    fn test_triggers_ignored_once_finished() {
        let mut caster = player();
        caster.procs.push(proc(Trigger::OnHit, ProcEffect::Damage { multiplier: 1.0 }));
        let mut battle = battle(caster, monster(Vec::new()));
        battle.cancel();

        battle.process_triggers(Trigger::OnHit, Side::Player, 10.0);
        assert!(battle.drain_events().is_empty());
    }
}
