//! Procedural item drops

use super::names::{item_icon, item_name, random_base_name};
use crate::config::{BalanceTables, LootBalance};
use crate::types::{EquipmentSlot, Item, Rarity, SlotCategory, StatType};
use rand::seq::SliceRandom;
use rand::Rng;

/// Effective per-tier thresholds of a rarity roll
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RarityChances {
    pub unique: f64,
    pub rare: f64,
    pub magic: f64,
}

/// Chance that a kill drops anything at all
pub fn drop_chance(difficulty: f64, balance: &LootBalance) -> f64 {
    (balance.base_drop_chance + (difficulty - 1.0) * balance.difficulty_scaling).clamp(0.0, 1.0)
}

/// Rarity thresholds for a difficulty and magic find, each clamped to its cap
pub fn rarity_chances(difficulty: f64, magic_find: f64, balance: &LootBalance) -> RarityChances {
    let difficulty = difficulty.max(0.0);
    let mf = 1.0 + magic_find.max(0.0) * balance.magic_find_factor;

    let unique = balance.base_unique_chance * difficulty * difficulty.powf(1.2) * mf;
    let rare = balance.base_rare_chance * difficulty * 1.5 * mf;
    let magic = (balance.base_magic_chance + difficulty * 0.1) * mf;

    RarityChances {
        unique: unique.min(balance.unique_cap),
        rare: rare.min(balance.rare_cap),
        magic: magic.min(balance.magic_cap),
    }
}

/// One uniform roll, highest qualifying tier wins
pub fn roll_item_rarity(chances: &RarityChances, rng: &mut impl Rng) -> Rarity {
    let roll: f64 = rng.gen();
    if roll < chances.unique {
        Rarity::Unique
    } else if roll < chances.rare {
        Rarity::Rare
    } else if roll < chances.magic {
        Rarity::Magic
    } else {
        Rarity::Common
    }
}

pub fn roll_random_slot(rng: &mut impl Rng) -> EquipmentSlot {
    EquipmentSlot::all()
        .choose(rng)
        .copied()
        .unwrap_or(EquipmentSlot::MainHand)
}

/// Stats a slot can roll
pub fn stat_candidates(slot: EquipmentSlot) -> &'static [StatType] {
    match slot.category() {
        SlotCategory::Weapon => &[
            StatType::Damage,
            StatType::AttackSpeed,
            StatType::Strength,
            StatType::Dexterity,
            StatType::CritChance,
            StatType::LifeSteal,
        ],
        SlotCategory::Armor => &[
            StatType::Armor,
            StatType::MaxHp,
            StatType::Vitality,
            StatType::Strength,
            StatType::Dexterity,
            StatType::Intelligence,
            StatType::DodgeChance,
        ],
        SlotCategory::Jewelry => &[
            StatType::CritChance,
            StatType::DodgeChance,
            StatType::MagicFind,
            StatType::Intelligence,
            StatType::LifeSteal,
            StatType::MaxHp,
            StatType::Strength,
        ],
    }
}

/// (min, max) roll at level 0 and growth per item level
fn stat_curve(stat: StatType) -> (i32, i32, f64) {
    match stat {
        StatType::Damage => (2, 5, 0.5),
        StatType::AttackSpeed => (2, 6, 0.1),
        StatType::Strength | StatType::Dexterity | StatType::Intelligence | StatType::Vitality => {
            (1, 4, 0.4)
        }
        StatType::Armor => (2, 6, 0.8),
        StatType::MaxHp => (5, 15, 2.0),
        StatType::CritChance | StatType::DodgeChance => (1, 3, 0.05),
        StatType::MagicFind => (3, 8, 0.3),
        StatType::LifeSteal => (1, 3, 0.03),
    }
}

fn roll_stat_value(stat: StatType, level: u32, rarity: Rarity, rng: &mut impl Rng) -> i32 {
    let (min, max, per_level) = stat_curve(stat);
    let base = rng.gen_range(min..=max) as f64 + level as f64 * per_level;
    ((base * rarity.stat_multiplier()).round() as i32).max(1)
}

/// Build an item of a known slot and rarity
pub fn generate_item(
    slot: EquipmentSlot,
    rarity: Rarity,
    level: u32,
    rng: &mut impl Rng,
) -> Item {
    let base_name = random_base_name(slot, rng);

    let mut item = Item {
        id: format!("item-{:016x}", rng.gen::<u64>()),
        name: String::new(),
        base_name: base_name.to_string(),
        slot,
        rarity,
        stats: Vec::with_capacity(rarity.stat_count()),
        item_level: level,
        identified: rarity != Rarity::Unique,
        icon: item_icon(slot, base_name).to_string(),
        flavor: None,
        image: None,
    };

    for stat in stat_candidates(slot).choose_multiple(rng, rarity.stat_count()) {
        let value = roll_stat_value(*stat, level, rarity, rng);
        item.push_stat(*stat, value);
    }

    let lead_stat = item.stats.first().map(|s| s.stat);
    item.name = item_name(base_name, rarity, lead_stat, rng);
    item
}

/// Roll a drop with thread RNG
pub fn generate_loot(
    level: u32,
    difficulty: f64,
    magic_find: f64,
    tables: &BalanceTables,
) -> Option<Item> {
    generate_loot_with_rng(level, difficulty, magic_find, tables, &mut rand::thread_rng())
}

/// Roll a drop: gate on drop chance, then slot, rarity and stats.
/// A failed gate is a normal empty result.
pub fn generate_loot_with_rng(
    level: u32,
    difficulty: f64,
    magic_find: f64,
    tables: &BalanceTables,
    rng: &mut impl Rng,
) -> Option<Item> {
    let balance = &tables.loot;
    if rng.gen::<f64>() >= drop_chance(difficulty, balance) {
        return None;
    }

    let slot = roll_random_slot(rng);
    let rarity = roll_item_rarity(&rarity_chances(difficulty, magic_find, balance), rng);
    let item = generate_item(slot, rarity, level, rng);

    tracing::info!(
        name = %item.display_name(),
        %rarity,
        slot = slot.name(),
        level,
        "generated loot"
    );
    Some(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_candidates_cover_unique_stat_count() {
        for slot in EquipmentSlot::all() {
            assert!(stat_candidates(*slot).len() >= Rarity::Unique.stat_count());
        }
        assert!(stat_candidates(EquipmentSlot::MainHand).contains(&StatType::Damage));
        assert!(stat_candidates(EquipmentSlot::Chest).contains(&StatType::Armor));
        assert!(stat_candidates(EquipmentSlot::Ring).contains(&StatType::MagicFind));
    }

    #[test]
    fn test_generated_items_have_distinct_stats() {
        let mut rng = StdRng::seed_from_u64(42);
        for rarity in Rarity::all() {
            for slot in EquipmentSlot::all() {
                let item = generate_item(*slot, *rarity, 10, &mut rng);
                assert_eq!(item.stats.len(), rarity.stat_count());
                let mut seen: Vec<StatType> = item.stats.iter().map(|s| s.stat).collect();
                seen.dedup();
                seen.sort_by_key(|s| s.label());
                seen.dedup();
                assert_eq!(seen.len(), item.stats.len());
                assert!(item.stats.iter().all(|s| s.value >= 1));
            }
        }
    }

    #[test]
    fn test_only_uniques_start_unidentified() {
        let mut rng = StdRng::seed_from_u64(3);
        let unique = generate_item(EquipmentSlot::Neck, Rarity::Unique, 5, &mut rng);
        assert!(!unique.identified);
        assert!(unique.display_name().starts_with("Unidentified"));
        assert!(unique.visible_stats().is_empty());

        let common = generate_item(EquipmentSlot::Neck, Rarity::Common, 5, &mut rng);
        assert!(common.identified);
    }

    #[test]
    fn test_base_rarity_chances() {
        let chances = rarity_chances(1.0, 0.0, &LootBalance::default());
        assert!((chances.unique - 0.01).abs() < 1e-9);
        assert!((chances.rare - 0.075).abs() < 1e-9);
        assert!((chances.magic - 0.35).abs() < 1e-9);
    }

    #[test]
    fn test_level_one_loot_floor() {
        let tables = BalanceTables::default();
        let mut rng = StdRng::seed_from_u64(2024);
        let mut drops = 0;
        let mut uniques = 0;
        let mut above_common = 0;
        for _ in 0..10_000 {
            if let Some(item) = generate_loot_with_rng(1, 1.0, 0.0, &tables, &mut rng) {
                drops += 1;
                if item.rarity == Rarity::Unique {
                    uniques += 1;
                }
                if item.rarity > Rarity::Common {
                    above_common += 1;
                }
            }
        }
        // ~40% drop, 1% of drops unique, 35% above common
        assert!(drops > 3700 && drops < 4300, "drops = {drops}");
        let unique_rate = uniques as f64 / drops as f64;
        assert!(unique_rate < 0.025, "unique rate = {unique_rate}");
        let above_rate = above_common as f64 / drops as f64;
        assert!(above_rate < tables.loot.magic_cap);
        assert!(above_rate > 0.3 && above_rate < 0.4, "above common = {above_rate}");
    }

    proptest! {
        #[test]
        fn prop_rarity_caps_respected(
            difficulty in 0.0f64..1_000.0,
            magic_find in 0.0f64..10_000.0,
        ) {
            let balance = LootBalance::default();
            let chances = rarity_chances(difficulty, magic_find, &balance);
            prop_assert!(chances.unique <= balance.unique_cap);
            prop_assert!(chances.rare <= balance.rare_cap);
            prop_assert!(chances.magic <= balance.magic_cap);
            prop_assert!(drop_chance(difficulty, &balance) <= 1.0);
        }
    }
}
