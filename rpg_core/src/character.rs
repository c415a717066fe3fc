//! Character - Owned progression state fed to the aggregator and battles

use crate::config::{BalanceTables, PlayerBalance};
use crate::effects::{apply_active_effect, tick_active_effects, ActiveEffect};
use crate::flavor::FlavorProvider;
use crate::loot::{calculate_item_value, identify_item, IdentifyError};
use crate::monster::Monster;
use crate::passive::{
    grant_skill, spend_skill_point, EquippedSkills, PassiveCatalog, PassiveSkill, RolledSkill,
    SkillPointError, SkillPointOutcome,
};
use crate::stat_block::{calculate_player_stats, PlayerStats, StatInputs};
use crate::types::{Attribute, Attributes, EquipmentSlot, Item};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

pub const DEFAULT_INVENTORY_SIZE: usize = 24;

/// A rejected character action. State is unchanged when one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CharacterError {
    #[error("No stat points available")]
    NoStatPoints,
    #[error("{item} cannot be equipped in the {slot} slot")]
    WrongSlot { item: String, slot: String },
    #[error("Inventory is full")]
    InventoryFull,
    #[error("No item at inventory position {0}")]
    NoSuchItem(usize),
    #[error("Nothing equipped in the {0} slot")]
    SlotEmpty(String),
    #[error("Skill not owned: {0}")]
    SkillNotOwned(String),
    #[error("All {0} skill slots are in use")]
    SkillSlotsFull(usize),
    #[error("{0} is already equipped")]
    SkillAlreadyEquipped(String),
    #[error(transparent)]
    SkillPoint(#[from] SkillPointError),
    #[error(transparent)]
    Identify(#[from] IdentifyError),
}

/// Rewards handed out after a won battle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VictoryRewards {
    pub xp: u64,
    pub gold: u32,
    pub levels_gained: u32,
    pub expired_effects: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub level: u32,
    pub xp: u64,
    pub gold: u32,
    pub attributes: Attributes,
    pub stat_points: u32,
    pub skill_points: u32,
    pub passives: Vec<PassiveSkill>,
    #[serde(default)]
    pub equipped_skills: EquippedSkills,
    #[serde(default)]
    pub active_effects: Vec<ActiveEffect>,
    pub equipment: BTreeMap<EquipmentSlot, Item>,
    pub inventory: Vec<Item>,
    pub inventory_capacity: usize,
}

impl Character {
    pub fn new(balance: &PlayerBalance) -> Self {
        Character {
            level: 1,
            xp: 0,
            gold: 0,
            attributes: Attributes::uniform(balance.base_attribute),
            stat_points: 0,
            skill_points: 0,
            passives: Vec::new(),
            equipped_skills: EquippedSkills::new(),
            active_effects: Vec::new(),
            equipment: BTreeMap::new(),
            inventory: Vec::new(),
            inventory_capacity: DEFAULT_INVENTORY_SIZE,
        }
    }

    pub fn stat_inputs(&self) -> StatInputs<'_> {
        StatInputs {
            base_attributes: self.attributes,
            equipment: &self.equipment,
            owned_passives: &self.passives,
            level: self.level,
            stat_points: self.stat_points,
            active_effects: &self.active_effects,
            equipped_skill_ids: self.equipped_skills.ids(),
        }
    }

    pub fn stats(&self, tables: &BalanceTables) -> PlayerStats {
        calculate_player_stats(&self.stat_inputs(), tables)
    }

    // === Progression ===

    pub fn xp_to_next_level(&self, balance: &PlayerBalance) -> u64 {
        (balance.xp_base * (self.level as f64).powf(balance.xp_exponent)).floor() as u64
    }

    /// Add xp, levelling as many times as it covers. Returns levels gained.
    pub fn gain_xp(&mut self, amount: u64, balance: &PlayerBalance) -> u32 {
        self.xp += amount;
        let mut gained = 0;
        loop {
            let needed = self.xp_to_next_level(balance).max(1);
            if self.xp < needed {
                break;
            }
            self.xp -= needed;
            self.level += 1;
            self.stat_points += balance.stat_points_per_level;
            self.skill_points += balance.skill_points_per_level;
            gained += 1;
        }
        if gained > 0 {
            tracing::info!(level = self.level, gained, "level up");
        }
        gained
    }

    pub fn allocate_stat_point(&mut self, attribute: Attribute) -> Result<f64, CharacterError> {
        if self.stat_points == 0 {
            return Err(CharacterError::NoStatPoints);
        }
        self.stat_points -= 1;
        let value = self.attributes.get_mut(attribute);
        *value += 1.0;
        Ok(*value)
    }

    // === Items ===

    /// Put an item in its own slot, returning whatever was there
    pub fn equip(&mut self, item: Item) -> Option<Item> {
        self.equipment.insert(item.slot, item)
    }

    /// Put an item in a named slot. Items only fit their own slot.
    pub fn equip_to(&mut self, slot: EquipmentSlot, item: Item) -> Result<Option<Item>, CharacterError> {
        if item.slot != slot {
            return Err(CharacterError::WrongSlot {
                item: item.display_name(),
                slot: slot.name().to_string(),
            });
        }
        Ok(self.equip(item))
    }

    /// Equip an inventory item; the displaced item takes its place
    pub fn equip_from_inventory(&mut self, index: usize) -> Result<(), CharacterError> {
        if index >= self.inventory.len() {
            return Err(CharacterError::NoSuchItem(index));
        }
        let item = self.inventory.remove(index);
        if let Some(previous) = self.equip(item) {
            self.inventory.insert(index, previous);
        }
        Ok(())
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> Result<(), CharacterError> {
        if !self.equipment.contains_key(&slot) {
            return Err(CharacterError::SlotEmpty(slot.name().to_string()));
        }
        if !self.has_inventory_space() {
            return Err(CharacterError::InventoryFull);
        }
        if let Some(item) = self.equipment.remove(&slot) {
            self.inventory.push(item);
        }
        Ok(())
    }

    pub fn has_inventory_space(&self) -> bool {
        self.inventory.len() < self.inventory_capacity
    }

    pub fn add_to_inventory(&mut self, item: Item) -> Result<(), CharacterError> {
        if !self.has_inventory_space() {
            tracing::warn!(item = %item.display_name(), "inventory full, item left behind");
            return Err(CharacterError::InventoryFull);
        }
        self.inventory.push(item);
        Ok(())
    }

    /// Sell an inventory item, returning the gold received
    pub fn sell(&mut self, index: usize, tables: &BalanceTables) -> Result<u32, CharacterError> {
        if index >= self.inventory.len() {
            return Err(CharacterError::NoSuchItem(index));
        }
        let item = self.inventory.remove(index);
        let value = calculate_item_value(&item, &tables.items);
        self.gold += value;
        Ok(value)
    }

    pub fn identify(
        &mut self,
        index: usize,
        tables: &BalanceTables,
        flavor: &impl FlavorProvider,
    ) -> Result<u32, CharacterError> {
        let item = self
            .inventory
            .get_mut(index)
            .ok_or(CharacterError::NoSuchItem(index))?;
        Ok(identify_item(item, &mut self.gold, &tables.items, flavor)?)
    }

    // === Passives ===

    pub fn spend_skill_point(
        &mut self,
        catalog: &PassiveCatalog,
        id: &str,
        balance: &PlayerBalance,
    ) -> Result<SkillPointOutcome, CharacterError> {
        Ok(spend_skill_point(
            catalog,
            id,
            &mut self.skill_points,
            &mut self.passives,
            &mut self.equipped_skills,
            balance.max_equipped_skills,
        )?)
    }

    /// Store a rolled skill. New skills are switched on while slots remain.
    pub fn grant_passive(&mut self, rolled: RolledSkill, balance: &PlayerBalance) -> bool {
        let id = rolled.skill.id.clone();
        grant_skill(&mut self.passives, rolled.skill);
        rolled.is_new && self.equipped_skills.equip(id, balance.max_equipped_skills)
    }

    pub fn equip_skill(&mut self, id: &str, balance: &PlayerBalance) -> Result<(), CharacterError> {
        if !self.passives.iter().any(|s| s.id == id) {
            return Err(CharacterError::SkillNotOwned(id.to_string()));
        }
        if self.equipped_skills.contains(id) {
            return Err(CharacterError::SkillAlreadyEquipped(id.to_string()));
        }
        if !self.equipped_skills.equip(id, balance.max_equipped_skills) {
            return Err(CharacterError::SkillSlotsFull(balance.max_equipped_skills));
        }
        Ok(())
    }

    pub fn unequip_skill(&mut self, id: &str) -> bool {
        self.equipped_skills.unequip(id)
    }

    // === Battles ===

    pub fn apply_effect(&mut self, effect: ActiveEffect) {
        apply_active_effect(&mut self.active_effects, effect);
    }

    /// Collect rewards for a slain monster and count effects down
    pub fn record_victory(&mut self, monster: &Monster, tables: &BalanceTables) -> VictoryRewards {
        let xp = monster.xp_reward(&tables.monster) as u64;
        let gold = monster.gold_reward(&tables.monster);
        self.gold += gold;
        let levels_gained = self.gain_xp(xp, &tables.player);
        let expired_effects = tick_active_effects(&mut self.active_effects);

        VictoryRewards {
            xp,
            gold,
            levels_gained,
            expired_effects,
        }
    }

    /// A lost battle still uses up a battle of every effect
    pub fn record_defeat(&mut self) -> Vec<String> {
        tick_active_effects(&mut self.active_effects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flavor::OfflineFlavor;
    use crate::loot::generate_item;
    use crate::monster::generator::build_monster;
    use crate::monster::MonsterRarity;
    use crate::passive::{CatalogEntry, SkillBonus, Theme};
    use crate::types::{Rarity, StatType};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn item(slot: EquipmentSlot, rarity: Rarity) -> Item {
        let mut rng = StdRng::seed_from_u64(8);
        generate_item(slot, rarity, 3, &mut rng)
    }

    fn catalog() -> PassiveCatalog {
        let entry = |id: &str, theme| CatalogEntry {
            id: id.to_string(),
            name: id.to_string(),
            theme,
            rarity: Rarity::Common,
            description: String::new(),
            max_rank: Some(2),
            requires: None,
            bonus: SkillBonus::Stat {
                stat: StatType::Strength,
                base_value: 2.0,
                value_per_level: 1.0,
            },
        };
        PassiveCatalog::new(vec![
            entry("might", Theme::Warfare),
            entry("grit", Theme::Warfare),
        ])
    }

    #[test]
    fn test_level_up_grants_points() {
        let balance = PlayerBalance::default();
        let mut hero = Character::new(&balance);
        assert_eq!(hero.xp_to_next_level(&balance), 100);

        // 100 for level 1 -> 2, floor(100 * 2^1.5) = 282 for 2 -> 3
        let gained = hero.gain_xp(400, &balance);
        assert_eq!(gained, 2);
        assert_eq!(hero.level, 3);
        assert_eq!(hero.xp, 18);
        assert_eq!(hero.stat_points, 6);
        assert_eq!(hero.skill_points, 2);
    }

    #[test]
    fn test_allocate_stat_point() {
        let balance = PlayerBalance::default();
        let mut hero = Character::new(&balance);
        assert_eq!(hero.allocate_stat_point(Attribute::Strength), Err(CharacterError::NoStatPoints));

        hero.stat_points = 1;
        assert_eq!(hero.allocate_stat_point(Attribute::Strength), Ok(11.0));
        assert_eq!(hero.stat_points, 0);
    }

    #[test]
    fn test_equip_swaps_and_rejects_wrong_slot() {
        let mut hero = Character::new(&PlayerBalance::default());
        let helm = item(EquipmentSlot::Head, Rarity::Magic);
        let boots = item(EquipmentSlot::Feet, Rarity::Common);

        assert!(matches!(
            hero.equip_to(EquipmentSlot::Head, boots.clone()),
            Err(CharacterError::WrongSlot { .. })
        ));
        assert!(hero.equipment.is_empty());

        assert_eq!(hero.equip(helm.clone()), None);
        let second = item(EquipmentSlot::Head, Rarity::Rare);
        assert_eq!(hero.equip(second), Some(helm));
    }

    #[test]
    fn test_equip_from_inventory_swaps_back() {
        let mut hero = Character::new(&PlayerBalance::default());
        let first = item(EquipmentSlot::Ring, Rarity::Common);
        let second = item(EquipmentSlot::Ring, Rarity::Magic);
        hero.equip(first.clone());
        hero.add_to_inventory(second.clone()).unwrap();

        hero.equip_from_inventory(0).unwrap();
        assert_eq!(hero.equipment.get(&EquipmentSlot::Ring), Some(&second));
        assert_eq!(hero.inventory, vec![first]);
    }

    #[test]
    fn test_full_inventory_rejects() {
        let mut hero = Character::new(&PlayerBalance::default());
        hero.inventory_capacity = 1;
        hero.add_to_inventory(item(EquipmentSlot::Legs, Rarity::Common)).unwrap();
        assert_eq!(
            hero.add_to_inventory(item(EquipmentSlot::Legs, Rarity::Common)),
            Err(CharacterError::InventoryFull)
        );
        assert_eq!(hero.inventory.len(), 1);
    }

    #[test]
    fn test_sell_and_identify() {
        let tables = BalanceTables::default();
        let mut hero = Character::new(&tables.player);
        hero.add_to_inventory(item(EquipmentSlot::Neck, Rarity::Unique)).unwrap();
        hero.add_to_inventory(item(EquipmentSlot::Hands, Rarity::Common)).unwrap();

        assert!(matches!(
            hero.identify(0, &tables, &OfflineFlavor),
            Err(CharacterError::Identify(IdentifyError::InsufficientGold { .. }))
        ));

        let value = hero.sell(1, &tables).unwrap();
        assert!(value >= 1);
        assert_eq!(hero.gold, value);
        assert_eq!(hero.inventory.len(), 1);
    }

    #[test]
    fn test_skill_points_and_equipping() {
        let balance = PlayerBalance::default();
        let catalog = catalog();
        let mut hero = Character::new(&balance);

        assert!(matches!(
            hero.spend_skill_point(&catalog, "might", &balance),
            Err(CharacterError::SkillPoint(SkillPointError::NoPoints))
        ));

        hero.skill_points = 2;
        hero.spend_skill_point(&catalog, "might", &balance).unwrap();
        assert!(hero.equipped_skills.contains("might"));

        assert!(hero.unequip_skill("might"));
        assert_eq!(
            hero.equip_skill("grit", &balance),
            Err(CharacterError::SkillNotOwned("grit".to_string()))
        );
        hero.equip_skill("might", &balance).unwrap();
        assert_eq!(
            hero.equip_skill("might", &balance),
            Err(CharacterError::SkillAlreadyEquipped("might".to_string()))
        );
    }

    #[test]
    fn test_victory_rewards_tick_effects() {
        let tables = BalanceTables::default();
        let mut hero = Character::new(&tables.player);
        hero.apply_effect(ActiveEffect::new("Blessing", StatType::Damage, 5.0, 1));
        let monster = build_monster(1, MonsterRarity::Common, 1.0, Vec::new(), &tables.monster);

        let rewards = hero.record_victory(&monster, &tables);
        assert_eq!(rewards.gold, monster.gold_reward(&tables.monster));
        assert_eq!(hero.gold, rewards.gold);
        assert_eq!(rewards.expired_effects, vec!["Blessing".to_string()]);
        assert!(hero.active_effects.is_empty());
    }

    #[test]
    fn test_stats_follow_equipment() {
        let tables = BalanceTables::default();
        let mut hero = Character::new(&tables.player);
        let before = hero.stats(&tables);

        let mut sword = item(EquipmentSlot::MainHand, Rarity::Common);
        sword.stats.clear();
        sword.push_stat(StatType::Damage, 7);
        hero.equip(sword);

        let after = hero.stats(&tables);
        assert!((after.damage - before.damage - 7.0).abs() < 1e-9);
    }
}
