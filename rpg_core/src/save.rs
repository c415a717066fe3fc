//! Persisted save state
//!
//! The shape the storage layer reads and writes. Fields added after the
//! first save format carry serde defaults so older saves still load.

use crate::character::{Character, DEFAULT_INVENTORY_SIZE};
use crate::effects::ActiveEffect;
use crate::passive::{EquippedSkills, PassiveSkill};
use crate::types::{Attributes, EquipmentSlot, Item};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("Failed to read save file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to encode save: {0}")]
    EncodeError(serde_json::Error),

    #[error("Failed to decode save: {0}")]
    DecodeError(serde_json::Error),
}

/// Named set of equipped skill ids the player can swap between
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loadout {
    pub name: String,
    pub skill_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    #[default]
    Locked,
    Unlocked,
    Cleared,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveState {
    pub level: u32,
    pub xp: u64,
    pub gold: u32,
    pub base_attributes: Attributes,
    pub stat_points: u32,
    pub skill_points: u32,
    /// Each with id, rank and derived value
    pub passives: Vec<PassiveSkill>,
    /// Absent in legacy saves, which then apply every owned passive
    #[serde(default)]
    pub equipped_skill_ids: Vec<String>,
    #[serde(default)]
    pub loadouts: Vec<Loadout>,
    #[serde(default)]
    pub active_effects: Vec<ActiveEffect>,
    pub inventory: Vec<Item>,
    #[serde(default = "default_inventory_size")]
    pub inventory_capacity: usize,
    pub equipment: BTreeMap<EquipmentSlot, Item>,
    #[serde(default)]
    pub world_nodes: BTreeMap<String, NodeState>,
    #[serde(default)]
    pub current_area_id: String,
    /// Percent
    #[serde(default)]
    pub area_progress: f64,
    #[serde(default = "default_difficulty")]
    pub world_difficulty: f64,
    #[serde(default)]
    pub merchant_stock: Vec<Item>,
    #[serde(default)]
    pub ground_items: Vec<Item>,
    #[serde(default)]
    pub portrait: Option<String>,
    /// Seconds since the Unix epoch
    pub timestamp: u64,
}

fn default_inventory_size() -> usize {
    DEFAULT_INVENTORY_SIZE
}

fn default_difficulty() -> f64 {
    1.0
}

fn now_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl SaveState {
    /// Snapshot a character. World fields start at their defaults.
    pub fn capture(character: &Character) -> Self {
        SaveState {
            level: character.level,
            xp: character.xp,
            gold: character.gold,
            base_attributes: character.attributes,
            stat_points: character.stat_points,
            skill_points: character.skill_points,
            passives: character.passives.clone(),
            equipped_skill_ids: character.equipped_skills.ids().to_vec(),
            loadouts: Vec::new(),
            active_effects: character.active_effects.clone(),
            inventory: character.inventory.clone(),
            inventory_capacity: character.inventory_capacity,
            equipment: character.equipment.clone(),
            world_nodes: BTreeMap::new(),
            current_area_id: String::new(),
            area_progress: 0.0,
            world_difficulty: default_difficulty(),
            merchant_stock: Vec::new(),
            ground_items: Vec::new(),
            portrait: None,
            timestamp: now_timestamp(),
        }
    }

    /// Refresh the character fields in place, keeping world state, loadouts
    /// and the portrait as they were loaded
    pub fn update_from(&mut self, character: &Character) {
        self.level = character.level;
        self.xp = character.xp;
        self.gold = character.gold;
        self.base_attributes = character.attributes;
        self.stat_points = character.stat_points;
        self.skill_points = character.skill_points;
        self.passives = character.passives.clone();
        self.equipped_skill_ids = character.equipped_skills.ids().to_vec();
        self.active_effects = character.active_effects.clone();
        self.inventory = character.inventory.clone();
        self.inventory_capacity = character.inventory_capacity;
        self.equipment = character.equipment.clone();
        self.timestamp = now_timestamp();
    }

    /// Rebuild the character this save describes
    pub fn character(&self) -> Character {
        Character {
            level: self.level,
            xp: self.xp,
            gold: self.gold,
            attributes: self.base_attributes,
            stat_points: self.stat_points,
            skill_points: self.skill_points,
            passives: self.passives.clone(),
            equipped_skills: EquippedSkills::from_ids(self.equipped_skill_ids.clone()),
            active_effects: self.active_effects.clone(),
            equipment: self.equipment.clone(),
            inventory: self.inventory.clone(),
            inventory_capacity: self.inventory_capacity,
        }
    }

    pub fn to_json(&self) -> Result<String, SaveError> {
        serde_json::to_string_pretty(self).map_err(SaveError::EncodeError)
    }

    pub fn from_json(json: &str) -> Result<Self, SaveError> {
        serde_json::from_str(json).map_err(SaveError::DecodeError)
    }

    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), SaveError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, SaveError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BalanceTables;
    use crate::loot::generate_item;
    use crate::passive::Theme;
    use crate::types::{Rarity, StatType};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn hero() -> Character {
        let tables = BalanceTables::default();
        let mut rng = StdRng::seed_from_u64(12);
        let mut hero = Character::new(&tables.player);
        hero.gold = 321;
        hero.passives.push(PassiveSkill {
            id: "kindling".to_string(),
            name: "Kindling".to_string(),
            theme: Theme::Pyromancy,
            rank: 2,
            max_rank: 5,
            stat: Some(StatType::Intelligence),
            value: 3.0,
            proc: None,
        });
        hero.equipped_skills.equip("kindling", 6);
        hero.equip(generate_item(EquipmentSlot::MainHand, Rarity::Rare, 4, &mut rng));
        hero.inventory.push(generate_item(EquipmentSlot::Ring, Rarity::Unique, 4, &mut rng));
        hero.apply_effect(ActiveEffect::new("Well Fed", StatType::MaxHp, 10.0, 3));
        hero
    }

    #[test]
    fn test_json_round_trip() {
        let mut save = SaveState::capture(&hero());
        save.world_nodes.insert("forest".to_string(), NodeState::Cleared);
        save.current_area_id = "forest".to_string();
        save.area_progress = 42.5;
        save.loadouts.push(Loadout {
            name: "Fire".to_string(),
            skill_ids: vec!["kindling".to_string()],
        });

        let json = save.to_json().unwrap();
        let loaded = SaveState::from_json(&json).unwrap();
        assert_eq!(loaded, save);
        assert_eq!(loaded.character(), hero());
    }

    #[test]
    fn test_legacy_save_without_equipped_ids() {
        let save = SaveState::capture(&hero());
        let mut value: serde_json::Value = serde_json::from_str(&save.to_json().unwrap()).unwrap();
        let object = value.as_object_mut().unwrap();
        object.remove("equipped_skill_ids");
        object.remove("world_difficulty");

        let loaded = SaveState::from_json(&value.to_string()).unwrap();
        assert!(loaded.equipped_skill_ids.is_empty());
        assert!((loaded.world_difficulty - 1.0).abs() < f64::EPSILON);

        // Legacy characters apply every owned passive
        let tables = BalanceTables::default();
        let stats = loaded.character().stats(&tables);
        let fresh = Character::new(&tables.player).stats(&tables);
        assert!(stats.intelligence > fresh.intelligence);
    }

    #[test]
    fn test_update_keeps_world_state() {
        let mut save = SaveState::capture(&hero());
        save.world_difficulty = 2.5;
        save.current_area_id = "forest".to_string();
        save.area_progress = 10.0;
        save.world_nodes.insert("forest".to_string(), NodeState::Unlocked);
        save.loadouts.push(Loadout {
            name: "Fire".to_string(),
            skill_ids: vec!["kindling".to_string()],
        });
        save.merchant_stock.push(save.inventory[0].clone());
        save.portrait = Some("hero.png".to_string());
        let before = save.clone();

        let mut character = save.character();
        character.gold += 50;
        character.level += 1;
        save.update_from(&character);

        let json = save.to_json().unwrap();
        let reloaded = SaveState::from_json(&json).unwrap();
        assert_eq!(reloaded.gold, before.gold + 50);
        assert_eq!(reloaded.level, before.level + 1);
        assert_eq!(reloaded.world_difficulty, 2.5);
        assert_eq!(reloaded.current_area_id, "forest");
        assert_eq!(reloaded.area_progress, 10.0);
        assert_eq!(reloaded.world_nodes, before.world_nodes);
        assert_eq!(reloaded.loadouts, before.loadouts);
        assert_eq!(reloaded.merchant_stock, before.merchant_stock);
        assert_eq!(reloaded.portrait.as_deref(), Some("hero.png"));
        assert_eq!(reloaded.character(), character);
    }

    #[test]
    fn test_garbage_is_decode_error() {
        assert!(matches!(
            SaveState::from_json("{ not json"),
            Err(SaveError::DecodeError(_))
        ));
    }
}
