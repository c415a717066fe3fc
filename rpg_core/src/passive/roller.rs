//! Passive skill rolls and skill-point unlocks

use super::{CatalogEntry, EquippedSkills, PassiveCatalog, PassiveSkill};
use crate::types::Rarity;
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

/// Narrows the candidate pool of a reward roll
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RollFilter {
    pub rarity: Option<Rarity>,
    pub min_rarity: Option<Rarity>,
    pub exclude: Vec<Rarity>,
}

impl RollFilter {
    pub fn exact(rarity: Rarity) -> Self {
        RollFilter {
            rarity: Some(rarity),
            ..Default::default()
        }
    }

    pub fn at_least(rarity: Rarity) -> Self {
        RollFilter {
            min_rarity: Some(rarity),
            ..Default::default()
        }
    }

    pub fn matches(&self, rarity: Rarity) -> bool {
        if self.rarity.is_some_and(|r| r != rarity) {
            return false;
        }
        if self.min_rarity.is_some_and(|min| rarity < min) {
            return false;
        }
        !self.exclude.contains(&rarity)
    }
}

/// Result of a reward roll
#[derive(Debug, Clone, PartialEq)]
pub struct RolledSkill {
    pub skill: PassiveSkill,
    /// False when the roll upgraded an owned skill
    pub is_new: bool,
}

fn owned_rank<'a>(owned: &'a [PassiveSkill], id: &str) -> Option<&'a PassiveSkill> {
    owned.iter().find(|s| s.id == id)
}

fn can_advance(owned: &[PassiveSkill], entry: &CatalogEntry) -> bool {
    owned_rank(owned, &entry.id).map_or(true, |s| s.rank < entry.max_rank())
}

/// Roll a passive reward.
///
/// Maxed skills never enter the pool. When the filter leaves nothing the roll
/// falls back to Common entries. An already-owned pick comes back as the next
/// rank of that skill, never as a duplicate.
pub fn generate_passive_skill(
    catalog: &PassiveCatalog,
    owned: &[PassiveSkill],
    filter: Option<&RollFilter>,
    rng: &mut impl Rng,
) -> Option<RolledSkill> {
    let default_filter = RollFilter::default();
    let filter = filter.unwrap_or(&default_filter);

    let mut pool: Vec<&CatalogEntry> = catalog
        .entries()
        .iter()
        .filter(|e| filter.matches(e.rarity) && can_advance(owned, e))
        .collect();

    if pool.is_empty() {
        pool = catalog
            .entries()
            .iter()
            .filter(|e| e.rarity == Rarity::Common && can_advance(owned, e))
            .collect();
    }

    let entry = pool.choose(rng)?;
    let rolled = match owned_rank(owned, &entry.id) {
        Some(existing) => RolledSkill {
            skill: existing.upgraded(entry),
            is_new: false,
        },
        None => RolledSkill {
            skill: PassiveSkill::from_entry(entry, 1),
            is_new: true,
        },
    };

    tracing::debug!(
        id = %rolled.skill.id,
        rank = rolled.skill.rank,
        is_new = rolled.is_new,
        "rolled passive skill"
    );
    Some(rolled)
}

/// Store a rolled skill, replacing the owned entry with the same id
pub fn grant_skill(owned: &mut Vec<PassiveSkill>, skill: PassiveSkill) {
    match owned.iter_mut().find(|s| s.id == skill.id) {
        Some(existing) => *existing = skill,
        None => owned.push(skill),
    }
}

/// Why a skill point could not be spent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkillPointError {
    #[error("No skill points available")]
    NoPoints,
    #[error("Unknown skill: {0}")]
    UnknownSkill(String),
    #[error("{skill} requires {required}")]
    MissingPrerequisite { skill: String, required: String },
    #[error("{0} is already at max rank")]
    MaxRank(String),
}

/// What a successful skill-point spend did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillPointOutcome {
    Unlocked { id: String, equipped: bool },
    Upgraded { id: String, rank: u32 },
}

/// Spend one skill point on a catalog id.
///
/// Unowned ids are unlocked (prerequisite permitting) and auto-equipped while
/// slots remain; owned ids are upgraded below their cap. Exactly one point is
/// consumed on success. Rejections leave every argument untouched.
pub fn spend_skill_point(
    catalog: &PassiveCatalog,
    id: &str,
    skill_points: &mut u32,
    owned: &mut Vec<PassiveSkill>,
    equipped: &mut EquippedSkills,
    equip_capacity: usize,
) -> Result<SkillPointOutcome, SkillPointError> {
    if *skill_points == 0 {
        return Err(SkillPointError::NoPoints);
    }
    let entry = catalog
        .get(id)
        .ok_or_else(|| SkillPointError::UnknownSkill(id.to_string()))?;

    let outcome = match owned.iter_mut().find(|s| s.id == id) {
        Some(existing) => {
            if existing.rank >= entry.max_rank() {
                return Err(SkillPointError::MaxRank(entry.name.clone()));
            }
            *existing = existing.upgraded(entry);
            SkillPointOutcome::Upgraded {
                id: id.to_string(),
                rank: existing.rank,
            }
        }
        None => {
            if let Some(required) = &entry.requires {
                if owned_rank(owned, required).is_none() {
                    return Err(SkillPointError::MissingPrerequisite {
                        skill: entry.name.clone(),
                        required: required.clone(),
                    });
                }
            }
            owned.push(PassiveSkill::from_entry(entry, 1));
            let equipped_now = equipped.equip(id, equip_capacity);
            SkillPointOutcome::Unlocked {
                id: id.to_string(),
                equipped: equipped_now,
            }
        }
    };

    *skill_points -= 1;
    Ok(outcome)
}
