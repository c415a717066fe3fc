//! Theme set bonuses and cross-theme synergies

use super::proc::{EffectTarget, ProcEffect, Trigger};
use super::Theme;
use crate::effects::StatusKind;
use crate::types::StatType;

/// Chance-gated trigger carried by an active set bonus
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetProc {
    pub trigger: Trigger,
    pub chance: f64,
    pub effect: ProcEffect,
}

/// Reward for equipping enough distinct skills of one theme
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetBonus {
    pub theme: Theme,
    pub name: &'static str,
    /// Distinct equipped skills of the theme needed to activate
    pub required: usize,
    pub stats: &'static [(StatType, f64)],
    pub proc: Option<SetProc>,
}

/// Pairing of two active set bonuses. Synergies grant no stats, they only
/// unlock combat behavior keyed on their id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Synergy {
    pub id: &'static str,
    pub name: &'static str,
    pub themes: (Theme, Theme),
    pub description: &'static str,
}

pub const FROSTBURN: &str = "frostburn";
pub const BIOHAZARD: &str = "biohazard";
pub const BLOOD_WARD: &str = "blood_ward";
pub const TEMPEST: &str = "tempest";
pub const BLOODLUST: &str = "bloodlust";

pub const SET_BONUSES: &[SetBonus] = &[
    SetBonus {
        theme: Theme::Pyromancy,
        name: "Inferno Pact",
        required: 3,
        stats: &[(StatType::Damage, 5.0), (StatType::Intelligence, 3.0)],
        proc: Some(SetProc {
            trigger: Trigger::OnHit,
            chance: 0.25,
            effect: ProcEffect::Status {
                status: StatusKind::Burn,
                target: EffectTarget::Opponent,
                value: 0.04,
                duration: 3,
            },
        }),
    },
    SetBonus {
        theme: Theme::Cryomancy,
        name: "Glacial Heart",
        required: 3,
        stats: &[(StatType::Armor, 6.0), (StatType::Vitality, 3.0)],
        proc: Some(SetProc {
            trigger: Trigger::OnHit,
            chance: 0.25,
            effect: ProcEffect::Status {
                status: StatusKind::Chill,
                target: EffectTarget::Opponent,
                value: 1.0,
                duration: 3,
            },
        }),
    },
    SetBonus {
        theme: Theme::Toxicology,
        name: "Venom Covenant",
        required: 3,
        stats: &[(StatType::Dexterity, 4.0), (StatType::CritChance, 2.0)],
        proc: Some(SetProc {
            trigger: Trigger::OnHit,
            chance: 0.3,
            effect: ProcEffect::Status {
                status: StatusKind::Poison,
                target: EffectTarget::Opponent,
                value: 0.03,
                duration: 4,
            },
        }),
    },
    SetBonus {
        theme: Theme::Hemomancy,
        name: "Crimson Thirst",
        required: 3,
        stats: &[(StatType::LifeSteal, 5.0), (StatType::Vitality, 4.0)],
        proc: Some(SetProc {
            trigger: Trigger::OnTakeDamage,
            chance: 0.15,
            effect: ProcEffect::Status {
                status: StatusKind::Regen,
                target: EffectTarget::Caster,
                value: 0.05,
                duration: 3,
            },
        }),
    },
    SetBonus {
        theme: Theme::Warding,
        name: "Bulwark",
        required: 3,
        stats: &[(StatType::Armor, 10.0), (StatType::MaxHp, 20.0)],
        proc: Some(SetProc {
            trigger: Trigger::OnTakeDamage,
            chance: 0.15,
            effect: ProcEffect::Shield { duration: 2 },
        }),
    },
    SetBonus {
        theme: Theme::Swiftness,
        name: "Quicksilver",
        required: 3,
        stats: &[(StatType::Dexterity, 6.0), (StatType::DodgeChance, 5.0)],
        proc: Some(SetProc {
            trigger: Trigger::OnDodge,
            chance: 0.5,
            effect: ProcEffect::Status {
                status: StatusKind::CritBoost,
                target: EffectTarget::Caster,
                value: 20.0,
                duration: 2,
            },
        }),
    },
    SetBonus {
        theme: Theme::Arcana,
        name: "Arcane Lattice",
        required: 3,
        stats: &[(StatType::Intelligence, 6.0), (StatType::CritChance, 5.0)],
        proc: Some(SetProc {
            trigger: Trigger::OnCrit,
            chance: 0.3,
            effect: ProcEffect::Damage { multiplier: 0.5 },
        }),
    },
    SetBonus {
        theme: Theme::Warfare,
        name: "Warlord's Creed",
        required: 3,
        stats: &[(StatType::Strength, 6.0), (StatType::Damage, 4.0)],
        proc: Some(SetProc {
            trigger: Trigger::OnStartTurn,
            chance: 0.2,
            effect: ProcEffect::Status {
                status: StatusKind::ScalingStrength,
                target: EffectTarget::Caster,
                value: 5.0,
                duration: 5,
            },
        }),
    },
    SetBonus {
        theme: Theme::Fortune,
        name: "Gilded Path",
        required: 3,
        stats: &[(StatType::MagicFind, 25.0), (StatType::CritChance, 3.0)],
        proc: None,
    },
];

pub const SYNERGIES: &[Synergy] = &[
    Synergy {
        id: FROSTBURN,
        name: "Frostburn",
        themes: (Theme::Pyromancy, Theme::Cryomancy),
        description: "Hits against a chilled enemy erupt for double damage",
    },
    Synergy {
        id: BIOHAZARD,
        name: "Biohazard",
        themes: (Theme::Toxicology, Theme::Pyromancy),
        description: "Deal 20% more damage to poisoned enemies",
    },
    Synergy {
        id: BLOOD_WARD,
        name: "Blood Ward",
        themes: (Theme::Hemomancy, Theme::Warding),
        description: "Recover a fifth of every blow you take",
    },
    Synergy {
        id: TEMPEST,
        name: "Tempest",
        themes: (Theme::Swiftness, Theme::Arcana),
        description: "Critical strikes grant a burst of evasion",
    },
    Synergy {
        id: BLOODLUST,
        name: "Bloodlust",
        themes: (Theme::Warfare, Theme::Hemomancy),
        description: "Below half health, every hit strikes again for half damage",
    },
];

pub fn set_bonus(theme: Theme) -> Option<&'static SetBonus> {
    SET_BONUSES.iter().find(|b| b.theme == theme)
}

pub fn synergy(id: &str) -> Option<&'static Synergy> {
    SYNERGIES.iter().find(|s| s.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_theme_has_a_set_bonus() {
        for theme in Theme::all() {
            assert!(set_bonus(*theme).is_some(), "missing set bonus for {theme:?}");
        }
    }

    #[test]
    fn test_synergy_lookup() {
        let frostburn = synergy(FROSTBURN).unwrap();
        assert_eq!(frostburn.themes, (Theme::Pyromancy, Theme::Cryomancy));
        assert!(synergy("nonexistent").is_none());
    }
}
