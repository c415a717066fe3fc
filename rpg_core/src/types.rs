//! Core types shared by the generators, the aggregator and the combat engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Equipment slot for gear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSlot {
    MainHand,
    OffHand,
    Head,
    Chest,
    Hands,
    Legs,
    Feet,
    Neck,
    Ring,
}

impl EquipmentSlot {
    /// Get all equipment slots
    pub fn all() -> &'static [EquipmentSlot] {
        &[
            EquipmentSlot::MainHand,
            EquipmentSlot::OffHand,
            EquipmentSlot::Head,
            EquipmentSlot::Chest,
            EquipmentSlot::Hands,
            EquipmentSlot::Legs,
            EquipmentSlot::Feet,
            EquipmentSlot::Neck,
            EquipmentSlot::Ring,
        ]
    }

    pub fn category(&self) -> SlotCategory {
        match self {
            EquipmentSlot::MainHand => SlotCategory::Weapon,
            EquipmentSlot::Neck | EquipmentSlot::Ring => SlotCategory::Jewelry,
            _ => SlotCategory::Armor,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EquipmentSlot::MainHand => "Main Hand",
            EquipmentSlot::OffHand => "Off Hand",
            EquipmentSlot::Head => "Head",
            EquipmentSlot::Chest => "Chest",
            EquipmentSlot::Hands => "Hands",
            EquipmentSlot::Legs => "Legs",
            EquipmentSlot::Feet => "Feet",
            EquipmentSlot::Neck => "Neck",
            EquipmentSlot::Ring => "Ring",
        }
    }
}

/// Broad slot grouping that decides which stats an item can roll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotCategory {
    Weapon,
    Armor,
    Jewelry,
}

/// Item rarity tier, ordered Common < Magic < Rare < Unique
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Magic,
    Rare,
    Unique,
}

impl Rarity {
    pub fn all() -> &'static [Rarity] {
        &[Rarity::Common, Rarity::Magic, Rarity::Rare, Rarity::Unique]
    }

    /// Number of distinct stats an item of this rarity rolls
    pub fn stat_count(&self) -> usize {
        match self {
            Rarity::Common => 1,
            Rarity::Magic => 2,
            Rarity::Rare => 4,
            Rarity::Unique => 6,
        }
    }

    /// Multiplier applied to every rolled stat value
    pub fn stat_multiplier(&self) -> f64 {
        match self {
            Rarity::Common => 1.0,
            Rarity::Magic => 1.2,
            Rarity::Rare => 1.5,
            Rarity::Unique => 2.0,
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rarity::Common => "Common",
            Rarity::Magic => "Magic",
            Rarity::Rare => "Rare",
            Rarity::Unique => "Unique",
        };
        f.write_str(name)
    }
}

/// Every stat an item, passive, set bonus or effect can contribute to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatType {
    Strength,
    Dexterity,
    Intelligence,
    Vitality,
    Damage,
    AttackSpeed,
    Armor,
    MaxHp,
    CritChance,
    DodgeChance,
    MagicFind,
    LifeSteal,
}

impl StatType {
    pub fn label(&self) -> &'static str {
        match self {
            StatType::Strength => "Strength",
            StatType::Dexterity => "Dexterity",
            StatType::Intelligence => "Intelligence",
            StatType::Vitality => "Vitality",
            StatType::Damage => "Damage",
            StatType::AttackSpeed => "Attack Speed",
            StatType::Armor => "Armor",
            StatType::MaxHp => "Max HP",
            StatType::CritChance => "Crit Chance",
            StatType::DodgeChance => "Dodge Chance",
            StatType::MagicFind => "Magic Find",
            StatType::LifeSteal => "Life Steal",
        }
    }

    /// Whether the value reads as a percentage in the UI
    pub fn is_percent(&self) -> bool {
        matches!(
            self,
            StatType::AttackSpeed
                | StatType::CritChance
                | StatType::DodgeChance
                | StatType::MagicFind
                | StatType::LifeSteal
        )
    }
}

/// The four core attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Strength,
    Dexterity,
    Intelligence,
    Vitality,
}

impl Attribute {
    pub fn all() -> &'static [Attribute] {
        &[
            Attribute::Strength,
            Attribute::Dexterity,
            Attribute::Intelligence,
            Attribute::Vitality,
        ]
    }
}

/// Attribute block used for player base attributes and monster attributes
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Attributes {
    pub strength: f64,
    pub dexterity: f64,
    pub intelligence: f64,
    pub vitality: f64,
}

impl Attributes {
    pub fn uniform(value: f64) -> Self {
        Attributes {
            strength: value,
            dexterity: value,
            intelligence: value,
            vitality: value,
        }
    }

    pub fn get(&self, attribute: Attribute) -> f64 {
        match attribute {
            Attribute::Strength => self.strength,
            Attribute::Dexterity => self.dexterity,
            Attribute::Intelligence => self.intelligence,
            Attribute::Vitality => self.vitality,
        }
    }

    pub fn get_mut(&mut self, attribute: Attribute) -> &mut f64 {
        match attribute {
            Attribute::Strength => &mut self.strength,
            Attribute::Dexterity => &mut self.dexterity,
            Attribute::Intelligence => &mut self.intelligence,
            Attribute::Vitality => &mut self.vitality,
        }
    }
}

/// A (stat, value) pair rolled on an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStat {
    pub stat: StatType,
    pub value: i32,
}

/// A procedurally generated piece of equipment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    /// True name, revealed once identified
    pub name: String,
    pub base_name: String,
    pub slot: EquipmentSlot,
    pub rarity: Rarity,
    /// Ordered stat list, no stat type appears twice
    pub stats: Vec<ItemStat>,
    pub item_level: u32,
    pub identified: bool,
    pub icon: String,
    #[serde(default)]
    pub flavor: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl Item {
    /// Name shown to the player; unidentified items stay obscured
    pub fn display_name(&self) -> String {
        if self.identified {
            self.name.clone()
        } else {
            format!("Unidentified {}", self.base_name)
        }
    }

    /// Stats visible to the player. Unidentified items still apply their
    /// full stats in combat.
    pub fn visible_stats(&self) -> &[ItemStat] {
        if self.identified {
            &self.stats
        } else {
            &[]
        }
    }

    pub fn stat(&self, stat: StatType) -> Option<i32> {
        self.stats.iter().find(|s| s.stat == stat).map(|s| s.value)
    }

    /// Insert a stat unless that stat type is already present
    pub fn push_stat(&mut self, stat: StatType, value: i32) -> bool {
        if self.stat(stat).is_some() {
            return false;
        }
        self.stats.push(ItemStat { stat, value });
        true
    }
}

/// The two sides of a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}

/// Player-selectable combat posture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stance {
    Aggressive,
    #[default]
    Balanced,
    Defensive,
}

impl Stance {
    pub fn all() -> &'static [Stance] {
        &[Stance::Aggressive, Stance::Balanced, Stance::Defensive]
    }
}
