//! GearSource - Stats from equipped items

use crate::source::StatSource;
use crate::stat_block::StatAccumulator;
use crate::types::Item;

/// Stats from one equipped item. Unidentified items count in full.
pub struct GearSource<'a> {
    pub item: &'a Item,
}

impl<'a> GearSource<'a> {
    pub fn new(item: &'a Item) -> Self {
        GearSource { item }
    }
}

impl StatSource for GearSource<'_> {
    fn id(&self) -> &str {
        &self.item.id
    }

    fn priority(&self) -> i32 {
        100
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        for stat in &self.item.stats {
            stats.apply_stat_type(stat.stat, stat.value as f64);
        }
    }
}
