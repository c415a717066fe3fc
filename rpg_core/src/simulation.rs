//! Headless battle simulation
//!
//! Runs the same rules as the live driver with no pacing. Each battle works
//! on its own clone of the inputs and its own seeded RNG, so a report is
//! reproducible from its seed.

use crate::combat::{Battle, BattleOutcome};
use crate::config::BalanceTables;
use crate::monster::{generate_monster_with_rng, Monster};
use crate::stat_block::PlayerStats;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Which monster each iteration fights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Opponent {
    /// The same monster every time
    Fixed(Monster),
    /// A fresh monster per iteration
    Generated { level: u32, difficulty: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub iterations: u32,
    pub seed: u64,
    pub opponent: Opponent,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            iterations: 1000,
            seed: 0,
            opponent: Opponent::Generated {
                level: 1,
                difficulty: 1.0,
            },
        }
    }
}

/// Result of one simulated battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleReport {
    pub win: bool,
    /// Hit the turn cap without a result
    pub timed_out: bool,
    pub turns: u32,
    pub player_hp_left: f64,
    pub enemy_hp_left: f64,
}

/// Aggregate over many simulated battles. Timeouts count as losses for
/// the win rate and are also reported on their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub iterations: u32,
    pub wins: u32,
    pub losses: u32,
    pub timeouts: u32,
    pub win_rate: f64,
    pub avg_turns: f64,
    /// Mean player HP remaining across wins
    pub avg_player_hp_left: f64,
}

impl SimulationReport {
    pub fn from_battles(battles: &[BattleReport]) -> Self {
        let iterations = battles.len() as u32;
        let wins = battles.iter().filter(|b| b.win).count() as u32;
        let timeouts = battles.iter().filter(|b| b.timed_out).count() as u32;
        let losses = iterations - wins;

        let avg_turns = if battles.is_empty() {
            0.0
        } else {
            battles.iter().map(|b| b.turns as f64).sum::<f64>() / battles.len() as f64
        };
        let avg_player_hp_left = battles
            .iter()
            .filter(|b| b.win)
            .map(|b| b.player_hp_left)
            .sum::<f64>()
            / wins.max(1) as f64;

        SimulationReport {
            iterations,
            wins,
            losses,
            timeouts,
            win_rate: wins as f64 / iterations.max(1) as f64,
            avg_turns,
            avg_player_hp_left,
        }
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Battles:        {}\n", self.iterations));
        out.push_str(&format!(
            "Wins:           {} ({:.1}%)\n",
            self.wins,
            self.win_rate * 100.0
        ));
        out.push_str(&format!("Losses:         {}\n", self.losses));
        out.push_str(&format!("  of which cap:  {}\n", self.timeouts));
        out.push_str(&format!("Avg turns:      {:.1}\n", self.avg_turns));
        out.push_str(&format!("Avg HP on win:  {:.1}\n", self.avg_player_hp_left));
        out
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Fight one battle to completion or the turn cap
pub fn simulate_battle<R: Rng>(
    player: &PlayerStats,
    monster: &Monster,
    tables: &BalanceTables,
    rng: R,
) -> BattleReport {
    let cap = tables.combat.simulator_turn_cap;
    let mut battle = Battle::new(tables.clone(), rng);
    battle.start(player.clone(), monster.clone());

    let mut outcome = None;
    let mut enemy_hp_left = monster.current_hp;
    while outcome.is_none() && battle.turn() < cap {
        outcome = battle.resolve_turn();
        if let Some(current) = battle.monster() {
            enemy_hp_left = current.current_hp;
        }
    }

    // The slain monster only survives in the victory event
    for event in battle.drain_events() {
        if let crate::combat::BattleEvent::Victory(slain) = event {
            enemy_hp_left = slain.current_hp;
        }
    }

    if outcome.is_none() {
        battle.cancel();
    }

    BattleReport {
        win: outcome == Some(BattleOutcome::Victory),
        timed_out: outcome.is_none(),
        turns: battle.turn(),
        player_hp_left: battle.player_hp(),
        enemy_hp_left,
    }
}

/// Run `config.iterations` independent battles, seeding iteration `i` with
/// `seed + i`
pub fn run_simulation(
    player: &PlayerStats,
    tables: &BalanceTables,
    config: &SimulationConfig,
) -> SimulationReport {
    let battles: Vec<BattleReport> = (0..config.iterations)
        .map(|i| {
            let mut rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(i as u64));
            let monster = match &config.opponent {
                Opponent::Fixed(monster) => monster.clone(),
                Opponent::Generated { level, difficulty } => {
                    generate_monster_with_rng(*level, *difficulty, tables, &mut rng)
                }
            };
            simulate_battle(player, &monster, tables, rng)
        })
        .collect();

    let report = SimulationReport::from_battles(&battles);
    tracing::info!(
        iterations = report.iterations,
        wins = report.wins,
        timeouts = report.timeouts,
        win_rate = report.win_rate,
        "simulation finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monster::generator::build_monster;
    use crate::monster::MonsterRarity;
    use crate::stat_block::{calculate_player_stats, StatInputs};
    use crate::types::Attributes;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn fresh_player(tables: &BalanceTables) -> PlayerStats {
        let equipment = BTreeMap::new();
        let inputs = StatInputs {
            base_attributes: Attributes::uniform(10.0),
            equipment: &equipment,
            owned_passives: &[],
            level: 1,
            stat_points: 0,
            active_effects: &[],
            equipped_skill_ids: &[],
        };
        calculate_player_stats(&inputs, tables)
    }

    #[test]
    fn test_simulation_is_reproducible() {
        let tables = BalanceTables::default();
        let player = fresh_player(&tables);
        let config = SimulationConfig {
            iterations: 50,
            seed: 99,
            ..SimulationConfig::default()
        };

        let first = run_simulation(&player, &tables, &config);
        let second = run_simulation(&player, &tables, &config);
        assert_eq!(first, second);
        assert_eq!(first.wins + first.losses, 50);
    }

    #[test]
    fn test_source_inputs_untouched() {
        let tables = BalanceTables::default();
        let player = fresh_player(&tables);
        let monster = build_monster(1, MonsterRarity::Common, 1.0, Vec::new(), &tables.monster);
        let snapshot = (player.clone(), monster.clone());

        simulate_battle(&player, &monster, &tables, ChaCha8Rng::seed_from_u64(1));
        assert_eq!((player, monster), snapshot);
    }

    #[test]
    fn test_stalemate_hits_cap() {
        let tables = BalanceTables::default();
        let mut player = fresh_player(&tables);
        player.armor = 1_000_000.0;
        player.max_hp = 1_000_000.0;
        player.dodge_chance = 0.0;
        let mut monster = build_monster(1, MonsterRarity::Common, 1.0, Vec::new(), &tables.monster);
        monster.armor = 1_000_000.0;
        monster.max_hp = 1_000_000.0;
        monster.current_hp = 1_000_000.0;

        let report = simulate_battle(&player, &monster, &tables, ChaCha8Rng::seed_from_u64(3));
        assert!(report.timed_out);
        assert!(!report.win);
        assert_eq!(report.turns, tables.combat.simulator_turn_cap);

        let summary = SimulationReport::from_battles(&[report]);
        assert_eq!(summary.timeouts, 1);
        assert_eq!(summary.losses, 1);
        assert!((summary.win_rate - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_overpowered_player_always_wins() {
        let tables = BalanceTables::default();
        let mut player = fresh_player(&tables);
        player.damage = 100_000.0;
        player.dexterity = 10_000.0;
        let config = SimulationConfig {
            iterations: 20,
            seed: 5,
            ..SimulationConfig::default()
        };

        let report = run_simulation(&player, &tables, &config);
        assert_eq!(report.wins, 20);
        assert!((report.win_rate - 1.0).abs() < f64::EPSILON);
        assert!((report.avg_turns - 1.0).abs() < f64::EPSILON);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_battles_terminate_within_cap(
            seed in any::<u64>(),
            level in 1u32..30,
            difficulty in 1.0f64..5.0,
        ) {
            let tables = BalanceTables::default();
            let player = fresh_player(&tables);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let monster = generate_monster_with_rng(level, difficulty, &tables, &mut rng);

            let report = simulate_battle(&player, &monster, &tables, rng);
            prop_assert!(report.turns <= tables.combat.simulator_turn_cap);
            if report.win {
                prop_assert!(report.enemy_hp_left <= 0.0);
                prop_assert!(report.player_hp_left > 0.0);
            }
        }
    }
}
