//! Application state

use crate::settings::Settings;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rpg_core::flavor::with_fallback;
use rpg_core::passive::RollFilter;
use rpg_core::{
    generate_loot_with_rng, generate_monster_with_rng, generate_passive_skill, Attribute,
    BalanceTables, Battle, BattleEvent, Character, CharacterError, FlavorProvider, LiveDriver,
    LogCategory, Monster, OfflineFlavor, PassiveCatalog, PlayerStats, Rarity, SaveError,
    SaveState, Stance,
};
use std::path::PathBuf;
use std::time::Instant;

/// Oldest lines are dropped past this
const MAX_LOG_LINES: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Stats,
    Equipment,
    Combat,
    Skills,
    Help,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Stats, Tab::Equipment, Tab::Combat, Tab::Skills, Tab::Help]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tab::Stats => "Stats",
            Tab::Equipment => "Equip",
            Tab::Combat => "Combat",
            Tab::Skills => "Skills",
            Tab::Help => "Help",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    pub message: String,
    pub category: LogCategory,
}

pub struct App {
    pub current_tab: Tab,
    pub tables: BalanceTables,
    pub catalog: PassiveCatalog,
    pub character: Character,
    /// Recomputed after every change to the character
    pub stats: PlayerStats,
    pub driver: LiveDriver<ChaCha8Rng>,
    pub rng: ChaCha8Rng,
    pub flavor: OfflineFlavor,
    pub difficulty: f64,
    /// Carried into every new battle
    pub stance: Stance,
    pub save_path: PathBuf,
    /// Loaded save; world fields pass through untouched
    pub save_state: SaveState,
    pub log: Vec<LogLine>,
    pub log_scroll: usize,
    pub selected_attribute: usize,
    pub selected_item: usize,
    pub selected_skill: usize,
    pub wins: u32,
    pub losses: u32,
}

impl App {
    pub fn new(
        settings: &Settings,
        tables: BalanceTables,
        catalog: PassiveCatalog,
        save_state: SaveState,
        seed: u64,
    ) -> Self {
        let character = save_state.character();
        let battle = Battle::new(tables.clone(), ChaCha8Rng::seed_from_u64(seed));
        let driver = LiveDriver::new(battle).with_pacing(settings.pacing());
        let stats = character.stats(&tables);

        let mut app = App {
            current_tab: Tab::Combat,
            tables,
            catalog,
            character,
            stats,
            driver,
            rng: ChaCha8Rng::seed_from_u64(seed.wrapping_add(1)),
            flavor: OfflineFlavor,
            difficulty: save_state.world_difficulty,
            stance: Stance::Balanced,
            save_path: settings.save_path.clone(),
            save_state,
            log: Vec::new(),
            log_scroll: 0,
            selected_attribute: 0,
            selected_item: 0,
            selected_skill: 0,
            wins: 0,
            losses: 0,
        };
        app.push_log("Press [n] to seek a fight.", LogCategory::System);
        app
    }

    // === Navigation ===

    pub fn next_tab(&mut self) {
        let tabs = Tab::all();
        let idx = tabs.iter().position(|t| *t == self.current_tab).unwrap_or(0);
        self.current_tab = tabs[(idx + 1) % tabs.len()];
    }

    pub fn prev_tab(&mut self) {
        let tabs = Tab::all();
        let idx = tabs.iter().position(|t| *t == self.current_tab).unwrap_or(0);
        self.current_tab = tabs[(idx + tabs.len() - 1) % tabs.len()];
    }

    pub fn on_up(&mut self) {
        match self.current_tab {
            Tab::Stats => self.selected_attribute = self.selected_attribute.saturating_sub(1),
            Tab::Equipment => self.selected_item = self.selected_item.saturating_sub(1),
            Tab::Combat => self.log_scroll = self.log_scroll.saturating_add(1),
            Tab::Skills => self.selected_skill = self.selected_skill.saturating_sub(1),
            Tab::Help => {}
        }
    }

    pub fn on_down(&mut self) {
        match self.current_tab {
            Tab::Stats => {
                let last = Attribute::all().len() - 1;
                self.selected_attribute = (self.selected_attribute + 1).min(last);
            }
            Tab::Equipment => {
                let last = self.character.inventory.len().saturating_sub(1);
                self.selected_item = (self.selected_item + 1).min(last);
            }
            Tab::Combat => self.log_scroll = self.log_scroll.saturating_sub(1),
            Tab::Skills => {
                let last = self.catalog.len().saturating_sub(1);
                self.selected_skill = (self.selected_skill + 1).min(last);
            }
            Tab::Help => {}
        }
    }

    pub fn on_enter(&mut self) {
        match self.current_tab {
            Tab::Stats => self.allocate_selected(),
            Tab::Equipment => self.equip_selected(),
            Tab::Skills => self.spend_on_selected(),
            Tab::Combat | Tab::Help => {}
        }
    }

    pub fn on_space(&mut self) {
        if self.current_tab == Tab::Skills {
            self.toggle_selected_skill();
        }
    }

    // === Character ===

    pub fn refresh_stats(&mut self) {
        self.stats = self.character.stats(&self.tables);
    }

    pub fn allocate_selected(&mut self) {
        let attribute = Attribute::all()[self.selected_attribute.min(Attribute::all().len() - 1)];
        match self.character.allocate_stat_point(attribute) {
            Ok(value) => {
                self.refresh_stats();
                self.push_log(format!("{attribute:?} raised to {value:.0}"), LogCategory::System);
            }
            Err(err) => self.report(err),
        }
    }

    pub fn equip_selected(&mut self) {
        match self.character.equip_from_inventory(self.selected_item) {
            Ok(()) => {
                self.refresh_stats();
                self.push_log("Equipment changed", LogCategory::System);
            }
            Err(err) => self.report(err),
        }
    }

    pub fn sell_selected(&mut self) {
        match self.character.sell(self.selected_item, &self.tables) {
            Ok(gold) => {
                self.clamp_item_selection();
                self.push_log(format!("Sold for {gold} gold"), LogCategory::Loot);
            }
            Err(err) => self.report(err),
        }
    }

    pub fn identify_selected(&mut self) {
        match self
            .character
            .identify(self.selected_item, &self.tables, &self.flavor)
        {
            Ok(cost) => {
                let name = self.character.inventory[self.selected_item].name.clone();
                self.push_log(format!("Identified {name} for {cost} gold"), LogCategory::Loot);
            }
            Err(err) => self.report(err),
        }
    }

    pub fn spend_on_selected(&mut self) {
        let Some(entry) = self.catalog.entries().get(self.selected_skill) else {
            return;
        };
        let id = entry.id.clone();
        match self
            .character
            .spend_skill_point(&self.catalog, &id, &self.tables.player)
        {
            Ok(outcome) => {
                self.refresh_stats();
                self.push_log(format!("{outcome:?}"), LogCategory::System);
            }
            Err(err) => self.report(err),
        }
    }

    pub fn toggle_selected_skill(&mut self) {
        let Some(entry) = self.catalog.entries().get(self.selected_skill) else {
            return;
        };
        let id = entry.id.clone();
        if self.character.unequip_skill(&id) {
            self.refresh_stats();
            return;
        }
        match self.character.equip_skill(&id, &self.tables.player) {
            Ok(()) => self.refresh_stats(),
            Err(err) => self.report(err),
        }
    }

    pub fn save(&mut self) -> Result<(), SaveError> {
        self.save_state.update_from(&self.character);
        self.save_state.world_difficulty = self.difficulty;
        self.save_state.write_to(&self.save_path)?;
        tracing::info!(path = %self.save_path.display(), "game saved");
        self.push_log(
            format!("Saved to {}", self.save_path.display()),
            LogCategory::System,
        );
        Ok(())
    }

    // === Battles ===

    pub fn start_battle(&mut self, now: Instant) {
        if self.driver.is_running() {
            return;
        }
        let monster = generate_monster_with_rng(
            self.character.level,
            self.difficulty,
            &self.tables,
            &mut self.rng,
        );
        let intro = with_fallback(self.flavor.encounter_intro(&monster), || {
            self.flavor.intro(&monster)
        });
        self.push_log(intro, LogCategory::Narrative);
        self.log_scroll = 0;
        self.driver.start(self.stats.clone(), monster, now);
        self.driver.battle_mut().set_stance(self.stance);
    }

    pub fn flee(&mut self) {
        if self.driver.is_running() {
            self.driver.flee();
            self.process_events();
        }
    }

    pub fn set_stance(&mut self, stance: Stance) {
        self.stance = stance;
        if self.driver.is_running() {
            self.driver.battle_mut().set_stance(stance);
            self.process_events();
        } else {
            self.push_log(format!("Stance: {stance:?}"), LogCategory::System);
        }
    }

    /// Advance the live battle and apply whatever it reported
    pub fn tick(&mut self, now: Instant) {
        self.driver.poll(now);
        self.process_events();
    }

    fn process_events(&mut self) {
        for event in self.driver.drain_events() {
            match event {
                BattleEvent::Log { message, category } => self.push_log(message, category),
                BattleEvent::NarrationRequested {
                    attacker,
                    defender,
                    damage,
                    crit,
                } => {
                    let line = with_fallback(
                        self.flavor.narrate_hit(&attacker, &defender, damage, crit),
                        || self.flavor.narration(&attacker, &defender, damage, crit),
                    );
                    self.push_log(line, LogCategory::Narrative);
                }
                BattleEvent::Victory(monster) => self.on_victory(&monster),
                BattleEvent::Defeat => self.on_defeat(),
                BattleEvent::Fled => self.push_log("You escaped.", LogCategory::System),
            }
        }
    }

    fn on_victory(&mut self, monster: &Monster) {
        self.wins += 1;
        let rewards = self.character.record_victory(monster, &self.tables);
        self.push_log(
            format!(
                "{} slain: +{} xp, +{} gold",
                monster.name, rewards.xp, rewards.gold
            ),
            LogCategory::Loot,
        );
        for name in rewards.expired_effects {
            self.push_log(format!("{name} wore off"), LogCategory::System);
        }

        if let Some(item) = generate_loot_with_rng(
            monster.level,
            self.difficulty,
            self.stats.magic_find,
            &self.tables,
            &mut self.rng,
        ) {
            let name = item.display_name();
            match self.character.add_to_inventory(item) {
                Ok(()) => self.push_log(format!("Found {name}"), LogCategory::Loot),
                Err(CharacterError::InventoryFull) => {
                    self.push_log(format!("{name} left behind, bags full"), LogCategory::Loot)
                }
                Err(err) => self.report(err),
            }
        }

        // Bosses only reward Rare and better passives
        let filter = monster
            .rarity
            .is_boss()
            .then(|| RollFilter::at_least(Rarity::Rare));
        for _ in 0..rewards.levels_gained {
            self.push_log(
                format!("Level up! Now level {}", self.character.level),
                LogCategory::System,
            );
            let Some(rolled) = generate_passive_skill(
                &self.catalog,
                &self.character.passives,
                filter.as_ref(),
                &mut self.rng,
            ) else {
                continue;
            };
            let line = with_fallback(self.flavor.skill_aphorism(&rolled.skill), || {
                self.flavor.aphorism(&rolled.skill)
            });
            self.character.grant_passive(rolled, &self.tables.player);
            self.push_log(line, LogCategory::Narrative);
        }

        self.refresh_stats();
    }

    fn on_defeat(&mut self) {
        self.losses += 1;
        self.push_log("You were defeated.", LogCategory::System);
        for name in self.character.record_defeat() {
            self.push_log(format!("{name} wore off"), LogCategory::System);
        }
        self.refresh_stats();
    }

    // === Log ===

    pub fn push_log(&mut self, message: impl Into<String>, category: LogCategory) {
        self.log.push(LogLine {
            message: message.into(),
            category,
        });
        if self.log.len() > MAX_LOG_LINES {
            let excess = self.log.len() - MAX_LOG_LINES;
            self.log.drain(..excess);
        }
    }

    fn report(&mut self, err: CharacterError) {
        tracing::debug!(%err, "action rejected");
        self.push_log(err.to_string(), LogCategory::System);
    }

    fn clamp_item_selection(&mut self) {
        let last = self.character.inventory.len().saturating_sub(1);
        self.selected_item = self.selected_item.min(last);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpg_core::config::default_catalog;
    use rpg_core::save::Loadout;
    use std::time::Duration;

    fn app(seed: u64) -> App {
        let settings = Settings {
            pacing_ms: 10,
            save_path: std::env::temp_dir().join(format!("rpg_tui_test_{seed}.json")),
            ..Settings::default()
        };
        let tables = BalanceTables::default();
        let save = SaveState::capture(&Character::new(&tables.player));
        App::new(&settings, tables, default_catalog(), save, seed)
    }

    fn run_to_end(app: &mut App) {
        let mut now = Instant::now();
        app.start_battle(now);
        for _ in 0..10_000 {
            if !app.driver.is_running() {
                break;
            }
            now += Duration::from_millis(10);
            app.tick(now);
        }
    }

    #[test]
    fn test_tab_cycle() {
        let mut app = app(1);
        app.current_tab = Tab::Stats;
        app.prev_tab();
        assert_eq!(app.current_tab, Tab::Help);
        app.next_tab();
        app.next_tab();
        assert_eq!(app.current_tab, Tab::Equipment);
    }

    #[test]
    fn test_battle_runs_to_an_outcome() {
        let mut app = app(7);
        run_to_end(&mut app);
        assert!(!app.driver.is_running());
        assert_eq!(app.wins + app.losses, 1);
        assert!(app.log.iter().any(|l| l.category == LogCategory::Narrative));
    }

    #[test]
    fn test_start_is_ignored_mid_battle() {
        let mut app = app(3);
        let now = Instant::now();
        app.start_battle(now);
        let first = app.driver.battle().monster().cloned();
        app.start_battle(now);
        assert_eq!(app.driver.battle().monster().cloned(), first);
    }

    #[test]
    fn test_victory_pays_out() {
        let mut app = app(11);
        app.stats.damage = 100_000.0;
        app.stats.dexterity = 10_000.0;
        run_to_end(&mut app);
        assert_eq!(app.wins, 1);
        assert!(app.character.gold > 0 || app.character.xp > 0 || app.character.level > 1);
    }

    #[test]
    fn test_allocate_without_points_is_rejected() {
        let mut app = app(2);
        app.current_tab = Tab::Stats;
        let before = app.character.attributes;
        app.on_enter();
        assert_eq!(app.character.attributes, before);
        assert_eq!(
            app.log.last().map(|l| l.message.clone()),
            Some(CharacterError::NoStatPoints.to_string())
        );
    }

    #[test]
    fn test_allocate_refreshes_stats() {
        let mut app = app(2);
        app.character.stat_points = 1;
        app.current_tab = Tab::Stats;
        app.selected_attribute = 0;
        let before = app.stats.strength;
        app.on_enter();
        assert!(app.stats.strength > before);
        assert_eq!(app.character.stat_points, 0);
    }

    #[test]
    fn test_log_is_capped() {
        let mut app = app(4);
        for i in 0..(MAX_LOG_LINES + 20) {
            app.push_log(format!("line {i}"), LogCategory::Combat);
        }
        assert_eq!(app.log.len(), MAX_LOG_LINES);
        assert_eq!(
            app.log.last().map(|l| l.message.as_str()),
            Some(format!("line {}", MAX_LOG_LINES + 19).as_str())
        );
    }

    #[test]
    fn test_save_writes_character() {
        let mut app = app(5);
        app.character.gold = 77;
        app.save().unwrap();
        let loaded = SaveState::read_from(&app.save_path).unwrap();
        assert_eq!(loaded.character(), app.character);
        std::fs::remove_file(&app.save_path).ok();
    }

    #[test]
    fn test_save_keeps_world_state() {
        let settings = Settings {
            save_path: std::env::temp_dir().join("rpg_tui_test_world.json"),
            ..Settings::default()
        };
        let tables = BalanceTables::default();
        let mut save = SaveState::capture(&Character::new(&tables.player));
        save.world_difficulty = 2.5;
        save.current_area_id = "forest".to_string();
        save.portrait = Some("hero.png".to_string());
        save.loadouts.push(Loadout {
            name: "Fire".to_string(),
            skill_ids: Vec::new(),
        });

        let mut app = App::new(&settings, tables, default_catalog(), save, 6);
        assert_eq!(app.difficulty, 2.5);
        app.character.gold = 40;
        app.save().unwrap();

        let loaded = SaveState::read_from(&app.save_path).unwrap();
        assert_eq!(loaded.gold, 40);
        assert_eq!(loaded.world_difficulty, 2.5);
        assert_eq!(loaded.current_area_id, "forest");
        assert_eq!(loaded.portrait.as_deref(), Some("hero.png"));
        assert_eq!(loaded.loadouts.len(), 1);
        std::fs::remove_file(&app.save_path).ok();
    }
}
