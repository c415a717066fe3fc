//! HitResult - Breakdown of one attack

use serde::{Deserialize, Serialize};

/// Result of rolling one attack against a defender
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HitResult {
    // === Damage Breakdown ===
    /// Damage after every multiplier, before armor
    pub raw_damage: f64,
    /// Flat amount removed by armor
    pub mitigated: f64,
    /// Damage dealt, floored and never below 1
    pub final_damage: f64,

    // === Flags ===
    pub crit: bool,
    /// Struck a frozen target
    pub shattered: bool,
    /// Executioner doubled the hit
    pub executed: bool,
}

impl HitResult {
    /// Apply a flat reduction to `raw_damage`, flooring at 1
    pub fn with_mitigation(mut self, reduction: f64) -> Self {
        self.final_damage = mitigate(self.raw_damage, reduction);
        self.mitigated = (self.raw_damage - self.final_damage).max(0.0);
        self
    }
}

/// Subtract flat mitigation and floor the result, minimum 1 damage
pub fn mitigate(raw: f64, reduction: f64) -> f64 {
    (raw - reduction.max(0.0)).floor().max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mitigation_floors_at_one() {
        assert!((mitigate(30.7, 10.0) - 20.0).abs() < f64::EPSILON);
        assert!((mitigate(3.0, 50.0) - 1.0).abs() < f64::EPSILON);
        assert!((mitigate(12.0, -4.0) - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_with_mitigation_breakdown() {
        let hit = HitResult {
            raw_damage: 25.5,
            crit: true,
            ..HitResult::default()
        }
        .with_mitigation(5.0);

        assert!((hit.final_damage - 20.0).abs() < f64::EPSILON);
        assert!((hit.mitigated - 5.5).abs() < f64::EPSILON);
        assert!(hit.crit);
    }
}
