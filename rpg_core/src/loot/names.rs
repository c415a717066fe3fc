//! Item base names, display names and icons

use crate::types::{EquipmentSlot, Rarity, StatType};
use rand::seq::SliceRandom;
use rand::Rng;

pub fn base_names(slot: EquipmentSlot) -> &'static [&'static str] {
    match slot {
        EquipmentSlot::MainHand => &["Sword", "Axe", "Mace", "Dagger", "Spear", "Staff", "Bow"],
        EquipmentSlot::OffHand => &["Shield", "Buckler", "Tome", "Orb"],
        EquipmentSlot::Head => &["Helm", "Hood", "Circlet"],
        EquipmentSlot::Chest => &["Chainmail", "Robe", "Breastplate", "Leather Vest"],
        EquipmentSlot::Hands => &["Gauntlets", "Gloves", "Bracers"],
        EquipmentSlot::Legs => &["Greaves", "Leggings", "Trousers"],
        EquipmentSlot::Feet => &["Boots", "Sandals", "Sabatons"],
        EquipmentSlot::Neck => &["Amulet", "Pendant", "Torc"],
        EquipmentSlot::Ring => &["Ring", "Band", "Signet"],
    }
}

pub fn random_base_name(slot: EquipmentSlot, rng: &mut impl Rng) -> &'static str {
    base_names(slot).choose(rng).copied().unwrap_or("Trinket")
}

/// Prefix keyed on an item's leading stat
fn stat_prefix(stat: StatType) -> &'static str {
    match stat {
        StatType::Strength => "Mighty",
        StatType::Dexterity => "Nimble",
        StatType::Intelligence => "Wise",
        StatType::Vitality => "Hale",
        StatType::Damage => "Cruel",
        StatType::AttackSpeed => "Swift",
        StatType::Armor => "Sturdy",
        StatType::MaxHp => "Vigorous",
        StatType::CritChance => "Keen",
        StatType::DodgeChance => "Elusive",
        StatType::MagicFind => "Lucky",
        StatType::LifeSteal => "Vampiric",
    }
}

const RARE_SUFFIXES: &[&str] = &[
    "of the Fox",
    "of Embers",
    "of the Bear",
    "of Ruin",
    "of the Tide",
    "of Whispers",
    "of the Wolf",
];

const UNIQUE_NAMES: &[&str] = &[
    "Dawnbreaker",
    "Grimfang",
    "Soulreaver",
    "Whisperwind",
    "Ashen Vow",
    "Starfall",
    "Hollowheart",
];

/// True name of an item, shown once identified
pub fn item_name(
    base_name: &str,
    rarity: Rarity,
    lead_stat: Option<StatType>,
    rng: &mut impl Rng,
) -> String {
    let prefix = lead_stat.map(stat_prefix).unwrap_or("Fine");
    match rarity {
        Rarity::Common => base_name.to_string(),
        Rarity::Magic => format!("{prefix} {base_name}"),
        Rarity::Rare => {
            let suffix = RARE_SUFFIXES.choose(rng).copied().unwrap_or("of Fortune");
            format!("{prefix} {base_name} {suffix}")
        }
        Rarity::Unique => {
            let name = UNIQUE_NAMES.choose(rng).copied().unwrap_or("Nameless");
            format!("{name}, the {base_name}")
        }
    }
}

/// Icon for a slot; weapons pick theirs from the base name
pub fn item_icon(slot: EquipmentSlot, base_name: &str) -> &'static str {
    match slot {
        EquipmentSlot::MainHand => {
            let weapon_icons = [
                ("Bow", "🏹"),
                ("Staff", "🪄"),
                ("Dagger", "🗡"),
                ("Axe", "🪓"),
                ("Mace", "🔨"),
            ];
            weapon_icons
                .iter()
                .find(|(needle, _)| base_name.contains(needle))
                .map(|(_, icon)| *icon)
                .unwrap_or("⚔")
        }
        EquipmentSlot::OffHand => "🛡",
        EquipmentSlot::Head => "🪖",
        EquipmentSlot::Chest => "👕",
        EquipmentSlot::Hands => "🧤",
        EquipmentSlot::Legs => "👖",
        EquipmentSlot::Feet => "👢",
        EquipmentSlot::Neck => "📿",
        EquipmentSlot::Ring => "💍",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_weapon_icon_special_cases() {
        assert_eq!(item_icon(EquipmentSlot::MainHand, "Bow"), "🏹");
        assert_eq!(item_icon(EquipmentSlot::MainHand, "Sword"), "⚔");
        assert_eq!(item_icon(EquipmentSlot::Ring, "Bow"), "💍");
    }

    #[test]
    fn test_names_by_rarity() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(item_name("Helm", Rarity::Common, None, &mut rng), "Helm");
        assert_eq!(
            item_name("Helm", Rarity::Magic, Some(StatType::Armor), &mut rng),
            "Sturdy Helm"
        );
        assert!(item_name("Helm", Rarity::Rare, Some(StatType::Armor), &mut rng).starts_with("Sturdy Helm of"));
        assert!(item_name("Helm", Rarity::Unique, None, &mut rng).ends_with(", the Helm"));
    }
}
