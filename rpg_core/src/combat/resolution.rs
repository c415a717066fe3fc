//! Attack rolls - Turn stats into a HitResult

use super::result::HitResult;
use crate::config::CombatBalance;
use crate::effects::{StatusEffects, StatusKind};
use crate::monster::{MaledictAffix, Monster};
use crate::passive::sets::BIOHAZARD;
use crate::stat_block::PlayerStats;
use crate::types::{Side, Stance};
use rand::Rng;

/// Uniform damage multiplier within the configured roll band
fn damage_roll(combat: &CombatBalance, rng: &mut impl Rng) -> f64 {
    let (min, max) = (combat.damage_roll_min, combat.damage_roll_max);
    min + rng.gen::<f64>() * (max - min).max(0.0)
}

/// Roll the player's attack against a monster.
///
/// Order of modifiers:
/// 1. Damage roll and stance multiplier
/// 2. Scaling strength and weaken on the player
/// 3. Shatter against a frozen target, biohazard against a poisoned one
/// 4. Crit against crit chance plus any crit boost
/// 5. Flat armor mitigation, floored at 1
pub fn roll_player_hit(
    player: &PlayerStats,
    monster: &Monster,
    effects: &StatusEffects,
    stance: Stance,
    combat: &CombatBalance,
    rng: &mut impl Rng,
) -> HitResult {
    let mut damage = player.damage * damage_roll(combat, rng) * player.stance_damage(stance, combat);

    damage *= 1.0 + effects.magnitude(Side::Player, StatusKind::ScalingStrength) / 100.0;
    damage *= (1.0 - effects.magnitude(Side::Player, StatusKind::Weaken)).max(0.0);

    let shattered = effects.has(Side::Enemy, StatusKind::Freeze);
    if shattered {
        damage *= combat.shatter_multiplier;
    }
    if effects.has(Side::Enemy, StatusKind::Poison) && player.has_synergy(BIOHAZARD) {
        damage *= combat.biohazard_multiplier;
    }

    let crit_boost = effects.magnitude(Side::Player, StatusKind::CritBoost);
    let crit = rng.gen::<f64>() * 100.0 < player.crit_chance + crit_boost;
    if crit {
        damage *= combat.crit_multiplier + crit_boost / 100.0;
    }

    HitResult {
        raw_damage: damage,
        crit,
        shattered,
        ..HitResult::default()
    }
    .with_mitigation(monster.armor * combat.armor_mitigation)
}

/// Roll a monster's attack before mitigation. Executioners double the hit
/// while the player is below the threshold fraction of max HP.
pub fn roll_enemy_hit(
    monster: &Monster,
    player_hp: f64,
    player_max_hp: f64,
    combat: &CombatBalance,
    rng: &mut impl Rng,
) -> HitResult {
    let mut damage = monster.damage * damage_roll(combat, rng);

    let executed = monster.has_maledict(MaledictAffix::Executioner)
        && player_hp < player_max_hp * combat.executioner_threshold;
    if executed {
        damage *= combat.executioner_multiplier;
    }

    let crit = rng.gen::<f64>() * 100.0 < monster.crit_chance;
    if crit {
        damage *= combat.crit_multiplier;
    }

    HitResult {
        raw_damage: damage,
        crit,
        executed,
        ..HitResult::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MonsterBalance;
    use crate::effects::CombatStatusEffect;
    use crate::monster::generator::build_monster;
    use crate::monster::MonsterRarity;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn player(damage: f64) -> PlayerStats {
        PlayerStats {
            damage,
            max_hp: 100.0,
            ..PlayerStats::default()
        }
    }

    fn monster(maledicts: Vec<MaledictAffix>) -> Monster {
        build_monster(5, MonsterRarity::Rare, 1.0, maledicts, &MonsterBalance::default())
    }

    #[test]
    fn test_executioner_doubles_below_threshold() {
        let combat = CombatBalance::default();
        let enemy = monster(vec![MaledictAffix::Executioner]);

        for seed in 0..20 {
            let mut low_rng = ChaCha8Rng::seed_from_u64(seed);
            let mut high_rng = ChaCha8Rng::seed_from_u64(seed);
            let low = roll_enemy_hit(&enemy, 29.0, 100.0, &combat, &mut low_rng);
            let high = roll_enemy_hit(&enemy, 100.0, 100.0, &combat, &mut high_rng);

            assert!(low.executed);
            assert!(!high.executed);
            assert!((low.raw_damage - 2.0 * high.raw_damage).abs() < 1e-9);
        }
    }

    #[test]
    fn test_executioner_needs_affix() {
        let combat = CombatBalance::default();
        let enemy = monster(vec![MaledictAffix::Brutal]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let hit = roll_enemy_hit(&enemy, 1.0, 100.0, &combat, &mut rng);
        assert!(!hit.executed);
    }

    #[test]
    fn test_player_hit_within_roll_band() {
        let combat = CombatBalance::default();
        let mut enemy = monster(Vec::new());
        enemy.armor = 0.0;
        let effects = StatusEffects::new();
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        for _ in 0..200 {
            let hit = roll_player_hit(&player(100.0), &enemy, &effects, Stance::Balanced, &combat, &mut rng);
            assert!(!hit.crit);
            assert!(hit.final_damage >= 80.0 && hit.final_damage <= 120.0);
        }
    }

    #[test]
    fn test_shatter_against_frozen_target() {
        let combat = CombatBalance::default();
        let mut enemy = monster(Vec::new());
        enemy.armor = 0.0;
        let mut frozen = StatusEffects::new();
        frozen.apply(CombatStatusEffect::new(StatusKind::Freeze, Side::Enemy, 1, 0.0), 10);

        let mut rng_a = ChaCha8Rng::seed_from_u64(4);
        let mut rng_b = ChaCha8Rng::seed_from_u64(4);
        let normal = roll_player_hit(&player(40.0), &enemy, &StatusEffects::new(), Stance::Balanced, &combat, &mut rng_a);
        let shatter = roll_player_hit(&player(40.0), &enemy, &frozen, Stance::Balanced, &combat, &mut rng_b);

        assert!(shatter.shattered);
        assert!((shatter.raw_damage - normal.raw_damage * 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_guaranteed_crit_with_boost() {
        let combat = CombatBalance::default();
        let mut enemy = monster(Vec::new());
        enemy.armor = 0.0;
        let mut effects = StatusEffects::new();
        effects.apply(CombatStatusEffect::new(StatusKind::CritBoost, Side::Player, 2, 100.0), 10);
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let hit = roll_player_hit(&player(10.0), &enemy, &effects, Stance::Balanced, &combat, &mut rng);
        assert!(hit.crit);
        // 1.5 base multiplier plus 100 / 100 from the boost
        assert!(hit.raw_damage >= 10.0 * 0.8 * 2.5 - 1e-9);
    }

    #[test]
    fn test_armor_floor() {
        let combat = CombatBalance::default();
        let mut enemy = monster(Vec::new());
        enemy.armor = 1_000.0;
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let hit = roll_player_hit(&player(5.0), &enemy, &StatusEffects::new(), Stance::Aggressive, &combat, &mut rng);
        assert!((hit.final_damage - 1.0).abs() < f64::EPSILON);
    }
}
