//! rpg_tui - Terminal front end for the loot RPG engine

mod app;
mod settings;
mod ui;

use app::App;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, backend::CrosstermBackend, Terminal};
use rpg_core::{Character, LogCategory, SaveError, SaveState, Stance};
use settings::{Settings, SettingsError};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Error, Debug)]
enum StartupError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Save(#[from] SaveError),

    #[error("Terminal error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Parser)]
#[command(name = "rpg_tui")]
#[command(about = "Fight, loot and level up in the terminal", long_about = None)]
#[command(version)]
struct Args {
    /// Settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for monsters, loot and combat rolls
    #[arg(short, long)]
    seed: Option<u64>,

    /// Ignore any existing save and start a fresh character
    #[arg(long)]
    new: bool,
}

fn main() -> Result<(), StartupError> {
    let args = Args::parse();
    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    // Held until exit so buffered lines are flushed
    let _guard = setup_logging(&settings.log_dir)?;

    let tables = settings.tables()?;
    let catalog = settings.catalog()?;
    let save = if !args.new && settings.save_path.exists() {
        tracing::info!(path = %settings.save_path.display(), "loading save");
        SaveState::read_from(&settings.save_path)?
    } else {
        let mut fresh = SaveState::capture(&Character::new(&tables.player));
        fresh.world_difficulty = settings.difficulty;
        fresh
    };
    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, "starting");

    let mut app = App::new(&settings, tables, catalog, save, seed);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = app.save() {
        tracing::error!(%err, "failed to save on exit");
    }
    Ok(result?)
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match (key.code, key.modifiers) {
                    (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => break,
                    (KeyCode::Tab, _) => app.next_tab(),
                    (KeyCode::BackTab, _) => app.prev_tab(),
                    (KeyCode::Up, _) | (KeyCode::Char('k'), _) => app.on_up(),
                    (KeyCode::Down, _) | (KeyCode::Char('j'), _) => app.on_down(),
                    (KeyCode::Enter, _) => app.on_enter(),
                    (KeyCode::Char(' '), _) => app.on_space(),
                    (KeyCode::Char('n'), _) => app.start_battle(Instant::now()),
                    (KeyCode::Char('f'), _) => app.flee(),
                    (KeyCode::Char('1'), _) => app.set_stance(Stance::Aggressive),
                    (KeyCode::Char('2'), _) => app.set_stance(Stance::Balanced),
                    (KeyCode::Char('3'), _) => app.set_stance(Stance::Defensive),
                    (KeyCode::Char('s'), _) => app.sell_selected(),
                    (KeyCode::Char('i'), _) => app.identify_selected(),
                    (KeyCode::Char('w'), _) => {
                        if let Err(err) = app.save() {
                            tracing::error!(%err, "save failed");
                            app.push_log(err.to_string(), LogCategory::System);
                        }
                    }
                    _ => {}
                }
            }
        }

        app.tick(Instant::now());
    }
    Ok(())
}

/// Log to a file only; stdout belongs to the terminal UI
fn setup_logging(log_dir: &Path) -> io::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;
    let file_appender = tracing_appender::rolling::never(log_dir, "rpg_tui.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    tracing::info!(dir = %log_dir.display(), "logging initialized");
    Ok(guard)
}
