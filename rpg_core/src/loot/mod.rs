//! Loot - item drops, naming, pricing and identification

mod generator;
mod names;
mod value;

pub use generator::{
    drop_chance, generate_item, generate_loot, generate_loot_with_rng, rarity_chances,
    roll_item_rarity, roll_random_slot, stat_candidates, RarityChances,
};
pub use names::{base_names, item_icon, item_name};
pub use value::{calculate_buy_price, calculate_item_value, identify_item, IdentifyError};
