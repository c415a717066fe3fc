//! Monster generation

use super::affix::{affix_bonus, MaledictAffix};
use super::{Monster, MonsterRarity};
use crate::config::{BalanceTables, MonsterBalance};
use crate::types::{Attributes, StatType};
use rand::seq::SliceRandom;
use rand::Rng;

const BASE_NAMES: &[&str] = &[
    "Goblin", "Skeleton", "Dire Wolf", "Bandit", "Ghoul", "Cave Spider", "Orc", "Wraith",
    "Cultist", "Bog Troll",
];

const ELITE_PREFIXES: &[&str] = &[
    "Savage", "Dread", "Cursed", "Vile", "Ancient", "Blighted", "Frenzied", "Hollow",
];

const BOSS_EPITHETS: &[&str] = &[
    "the Devourer",
    "the Undying",
    "Bane of Kings",
    "the Hollow Crown",
    "Eater of Light",
    "the Last Winter",
];

/// Roll a rarity. Thresholds shift upward with difficulty and are checked
/// from the rarest tier down against a single roll.
pub fn roll_monster_rarity(
    difficulty: f64,
    balance: &MonsterBalance,
    rng: &mut impl Rng,
) -> MonsterRarity {
    let shift = (difficulty - 1.0) * balance.difficulty_rarity_shift;
    let roll: f64 = rng.gen();

    for rarity in MonsterRarity::all().iter().rev() {
        if roll < balance.rarities.get(*rarity).threshold + shift {
            return *rarity;
        }
    }
    MonsterRarity::Common
}

/// Generate a monster with thread RNG
pub fn generate_monster(level: u32, difficulty: f64, tables: &BalanceTables) -> Monster {
    generate_monster_with_rng(level, difficulty, tables, &mut rand::thread_rng())
}

/// Generate a monster for one encounter
pub fn generate_monster_with_rng(
    level: u32,
    difficulty: f64,
    tables: &BalanceTables,
    rng: &mut impl Rng,
) -> Monster {
    let balance = &tables.monster;
    let level = level.max(1);
    let rarity = roll_monster_rarity(difficulty, balance, rng);
    let config = balance.rarities.get(rarity);

    let maledicts: Vec<MaledictAffix> = MaledictAffix::all()
        .choose_multiple(rng, config.maledict_count)
        .copied()
        .collect();

    let mut monster = build_monster(level, rarity, difficulty, maledicts, balance);
    monster.id = format!("monster-{:016x}", rng.gen::<u64>());
    monster.name = monster_name(rarity, rng);
    monster.icon = if rarity.is_boss() { "☠" } else { "👹" }.to_string();

    tracing::info!(
        name = %monster.name,
        level,
        %rarity,
        maledicts = monster.maledicts.len(),
        "generated monster"
    );
    monster
}

/// Derive every stat of a monster. Pure, so tests can build monsters with a
/// chosen rarity and affix list.
pub(crate) fn build_monster(
    level: u32,
    rarity: MonsterRarity,
    difficulty: f64,
    maledicts: Vec<MaledictAffix>,
    balance: &MonsterBalance,
) -> Monster {
    let config = balance.rarities.get(rarity);
    let base = (balance.base_attribute + level as f64 * balance.attribute_per_level)
        * config.stat_multiplier
        * difficulty;

    let scaled = |stat: StatType| base * (1.0 + affix_bonus(&maledicts, stat) / 100.0);
    let attributes = Attributes {
        strength: scaled(StatType::Strength),
        dexterity: scaled(StatType::Dexterity),
        intelligence: scaled(StatType::Intelligence),
        vitality: scaled(StatType::Vitality),
    };

    let level = level as f64;
    let max_hp = (attributes.vitality * balance.hp_per_vitality + level * balance.hp_per_level).floor();
    let damage = ((attributes.strength * balance.damage_per_strength + level * balance.damage_per_level)
        * (1.0 + affix_bonus(&maledicts, StatType::Damage) / 100.0))
        .floor();
    let armor = ((attributes.dexterity * balance.armor_per_dexterity + level * balance.armor_per_level)
        * (1.0 + affix_bonus(&maledicts, StatType::Armor) / 100.0))
        .floor();

    let crit_chance = (attributes.intelligence * balance.crit_per_intelligence
        + affix_bonus(&maledicts, StatType::CritChance)
        + balance.base_crit_chance)
        .min(balance.crit_cap);
    let dex_affix_dodge = if maledicts.iter().any(|m| m.boosts_dexterity()) {
        balance.dexterity_affix_dodge
    } else {
        0.0
    };
    let dodge_chance = (attributes.dexterity * balance.dodge_per_dexterity
        + dex_affix_dodge
        + balance.base_dodge_chance)
        .min(balance.dodge_cap);

    Monster {
        id: String::new(),
        name: String::new(),
        icon: String::new(),
        level: level as u32,
        rarity,
        attributes,
        max_hp,
        current_hp: max_hp,
        damage,
        armor,
        crit_chance,
        dodge_chance,
        life_steal: maledicts.iter().map(|m| m.life_steal()).sum(),
        thorns: maledicts.iter().map(|m| m.thorns()).sum(),
        maledicts,
    }
}

fn monster_name(rarity: MonsterRarity, rng: &mut impl Rng) -> String {
    let base = BASE_NAMES.choose(rng).copied().unwrap_or("Monster");
    if rarity == MonsterRarity::Common {
        return base.to_string();
    }
    let prefix = ELITE_PREFIXES.choose(rng).copied().unwrap_or("Dread");
    if rarity.is_boss() {
        let epithet = BOSS_EPITHETS.choose(rng).copied().unwrap_or("the Nameless");
        format!("{prefix} {base}, {epithet}")
    } else {
        format!("{prefix} {base}")
    }
}
