//! simulate - Headless balance runs against the live combat rules

use clap::Parser;
use rpg_core::config::{load_balance, ConfigError};
use rpg_core::simulation::Opponent;
use rpg_core::{
    run_simulation, Attributes, BalanceTables, Character, SaveError, SaveState, SimulationConfig,
    SimulationReport,
};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
enum SimulateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Save(#[from] SaveError),

    #[error("Failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Parser)]
#[command(name = "simulate")]
#[command(about = "Fight many seeded battles and report the win rate", long_about = None)]
struct Args {
    /// Number of battles
    #[arg(short = 'n', long, default_value_t = 1000)]
    iterations: u32,

    /// Base seed; battle i uses seed + i
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Monster level
    #[arg(short, long, default_value_t = 1)]
    level: u32,

    /// World difficulty
    #[arg(short, long, default_value_t = 1.0)]
    difficulty: f64,

    /// Player built from a save file instead of a fresh character
    #[arg(long)]
    save: Option<PathBuf>,

    /// Starting value of every attribute for a fresh character
    #[arg(long)]
    attributes: Option<f64>,

    /// Balance override (TOML)
    #[arg(short, long)]
    balance: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Output<'a> {
    config: &'a SimulationConfig,
    report: &'a SimulationReport,
}

fn main() -> Result<(), SimulateError> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let tables = match &args.balance {
        Some(path) => load_balance(path)?,
        None => BalanceTables::default(),
    };

    let mut character = match &args.save {
        Some(path) => SaveState::read_from(path)?.character(),
        None => Character::new(&tables.player),
    };
    if let Some(value) = args.attributes {
        character.attributes = Attributes::uniform(value);
    }
    let player = character.stats(&tables);

    let config = SimulationConfig {
        iterations: args.iterations,
        seed: args.seed,
        opponent: Opponent::Generated {
            level: args.level,
            difficulty: args.difficulty,
        },
    };
    let report = run_simulation(&player, &tables, &config);

    if args.json {
        let output = Output {
            config: &config,
            report: &report,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!(
            "Level {} player vs level {} monsters at difficulty {:.2} (seed {})",
            player.level, args.level, args.difficulty, args.seed
        );
        print!("{}", report.to_text());
    }
    Ok(())
}
