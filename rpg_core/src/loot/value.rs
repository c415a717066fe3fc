//! Item pricing and identification

use crate::config::ItemBalance;
use crate::flavor::{with_fallback, FlavorProvider, OfflineFlavor};
use crate::types::Item;
use thiserror::Error;

/// Why an identification request was refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifyError {
    #[error("{0} is already identified")]
    AlreadyIdentified(String),
    #[error("Identifying costs {cost} gold, you have {available}")]
    InsufficientGold { cost: u32, available: u32 },
}

/// Merchant sell value
pub fn calculate_item_value(item: &Item, balance: &ItemBalance) -> u32 {
    let stat_total: f64 = item.stats.iter().map(|s| s.value.unsigned_abs() as f64).sum();
    let mut value = (item.item_level as f64 * balance.base_multiplier + stat_total)
        * balance.rarity_multipliers.get(item.rarity);
    if !item.identified {
        value *= balance.unidentified_penalty;
    }
    (value.floor() as u32).max(1)
}

/// Merchant asking price
pub fn calculate_buy_price(item: &Item, balance: &ItemBalance) -> u32 {
    (calculate_item_value(item, balance) as f64 * balance.buy_markup).floor() as u32
}

/// Pay to reveal an item's true name and attach its lore.
///
/// Returns the gold spent. Rejections leave the item and gold unchanged.
pub fn identify_item(
    item: &mut Item,
    gold: &mut u32,
    balance: &ItemBalance,
    flavor: &impl FlavorProvider,
) -> Result<u32, IdentifyError> {
    if item.identified {
        return Err(IdentifyError::AlreadyIdentified(item.name.clone()));
    }
    let cost = balance.identify_cost.get(item.rarity);
    if *gold < cost {
        return Err(IdentifyError::InsufficientGold {
            cost,
            available: *gold,
        });
    }

    *gold -= cost;
    item.identified = true;
    let lore = with_fallback(flavor.identify_lore(item), || OfflineFlavor.lore(item));
    item.flavor = Some(lore);

    tracing::info!(name = %item.name, cost, "identified item");
    Ok(cost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EquipmentSlot, ItemStat, Rarity, StatType};

    fn item(rarity: Rarity, identified: bool) -> Item {
        Item {
            id: "item-1".to_string(),
            name: "Soulreaver, the Sword".to_string(),
            base_name: "Sword".to_string(),
            slot: EquipmentSlot::MainHand,
            rarity,
            stats: vec![
                ItemStat {
                    stat: StatType::Damage,
                    value: 12,
                },
                ItemStat {
                    stat: StatType::Strength,
                    value: -2,
                },
            ],
            item_level: 5,
            identified,
            icon: "⚔".to_string(),
            flavor: None,
            image: None,
        }
    }

    #[test]
    fn test_item_value() {
        let balance = ItemBalance::default();
        // (5 * 10 + 14) * 15
        assert_eq!(calculate_item_value(&item(Rarity::Unique, true), &balance), 960);
        assert_eq!(calculate_item_value(&item(Rarity::Unique, false), &balance), 480);
        assert_eq!(calculate_buy_price(&item(Rarity::Common, true), &balance), 192);
    }

    #[test]
    fn test_identify_charges_and_reveals() {
        let balance = ItemBalance::default();
        let mut unique = item(Rarity::Unique, false);
        let mut gold = 600;

        let cost = identify_item(&mut unique, &mut gold, &balance, &OfflineFlavor).unwrap();
        assert_eq!(cost, 500);
        assert_eq!(gold, 100);
        assert!(unique.identified);
        assert_eq!(unique.display_name(), "Soulreaver, the Sword");
        assert!(unique.flavor.is_some());
    }

    #[test]
    fn test_identify_rejections_leave_state() {
        let balance = ItemBalance::default();
        let mut unique = item(Rarity::Unique, false);
        let mut gold = 10;
        assert_eq!(
            identify_item(&mut unique, &mut gold, &balance, &OfflineFlavor),
            Err(IdentifyError::InsufficientGold {
                cost: 500,
                available: 10
            })
        );
        assert_eq!(gold, 10);
        assert!(!unique.identified);

        let mut known = item(Rarity::Magic, true);
        assert!(matches!(
            identify_item(&mut known, &mut gold, &balance, &OfflineFlavor),
            Err(IdentifyError::AlreadyIdentified(_))
        ));
    }
}
