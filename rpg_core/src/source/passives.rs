//! PassiveSource and SetBonusSource - Stats from equipped passive skills

use crate::passive::{PassiveSkill, Theme, SET_BONUSES, SYNERGIES};
use crate::source::StatSource;
use crate::stat_block::{ActiveProc, StatAccumulator};
use std::collections::BTreeMap;

/// Flat stats and procs of the active passives
pub struct PassiveSource<'a> {
    pub skills: &'a [&'a PassiveSkill],
}

impl<'a> PassiveSource<'a> {
    pub fn new(skills: &'a [&'a PassiveSkill]) -> Self {
        PassiveSource { skills }
    }
}

impl StatSource for PassiveSource<'_> {
    fn id(&self) -> &str {
        "passives"
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        for skill in self.skills {
            if let Some(stat) = skill.stat {
                stats.apply_stat_type(stat, skill.value);
            }
            if let Some(proc) = skill.proc {
                stats.procs.push(ActiveProc {
                    skill_id: skill.id.clone(),
                    name: skill.name.clone(),
                    rank: skill.rank,
                    proc,
                });
            }
        }
    }
}

/// Theme set bonuses unlocked by the active passives, and the synergies
/// between them
pub struct SetBonusSource<'a> {
    pub skills: &'a [&'a PassiveSkill],
}

impl<'a> SetBonusSource<'a> {
    pub fn new(skills: &'a [&'a PassiveSkill]) -> Self {
        SetBonusSource { skills }
    }

    /// Distinct active skill ids per theme
    fn theme_counts(&self) -> BTreeMap<Theme, usize> {
        let mut ids: BTreeMap<Theme, Vec<&str>> = BTreeMap::new();
        for skill in self.skills {
            let entry = ids.entry(skill.theme).or_default();
            if !entry.contains(&skill.id.as_str()) {
                entry.push(&skill.id);
            }
        }
        ids.into_iter().map(|(theme, ids)| (theme, ids.len())).collect()
    }
}

impl StatSource for SetBonusSource<'_> {
    fn id(&self) -> &str {
        "set_bonuses"
    }

    fn priority(&self) -> i32 {
        50
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        let counts = self.theme_counts();

        for bonus in SET_BONUSES {
            let count = counts.get(&bonus.theme).copied().unwrap_or(0);
            if count < bonus.required {
                continue;
            }
            stats.active_set_bonuses.push(bonus.theme);
            for (stat, value) in bonus.stats {
                stats.apply_stat_type(*stat, *value);
            }
        }

        // Synergies gate combat behavior only
        for synergy in SYNERGIES {
            let (a, b) = synergy.themes;
            if stats.active_set_bonuses.contains(&a) && stats.active_set_bonuses.contains(&b) {
                stats.active_synergies.push(synergy.id.to_string());
            }
        }
    }
}
