//! Attack resolution math
//!
//! A player attack commits a capped slice of the player's army. Damage is
//! applied to the defender in two passes:
//! 1. Counter-chain: tank > infantry, warship > tank, fighter > warship,
//!    infantry > fighter, at fixed multipliers, in that order.
//! 2. Attrition: every committed unit removes one defender unit of its own type.
//!
//! All counts floor at zero.

use serde::{Deserialize, Serialize};

use crate::core::config::CombatConfig;
use crate::core::types::{Army, CountryId};

/// Units committed by one attack: the player's army capped per type
pub fn attack_force(available: &Army, caps: &Army) -> Army {
    available.capped(caps)
}

/// Defender fighters destroyed by attacking infantry
fn fighter_losses(infantry: u32, multiplier: f64) -> u32 {
    // float -> int `as` saturates, so huge products clamp to u32::MAX
    (f64::from(infantry) * multiplier).floor() as u32
}

/// First pass: asymmetric counter damage
pub fn apply_counter_chain(defender: &Army, force: &Army, config: &CombatConfig) -> Army {
    let mut out = *defender;
    out.infantry = out
        .infantry
        .saturating_sub(force.tank.saturating_mul(config.tank_vs_infantry));
    out.tank = out
        .tank
        .saturating_sub(force.warship.saturating_mul(config.warship_vs_tank));
    out.warship = out
        .warship
        .saturating_sub(force.fighter.saturating_mul(config.fighter_vs_warship));
    out.fighter = out
        .fighter
        .saturating_sub(fighter_losses(force.infantry, config.infantry_vs_fighter));
    out
}

/// Both passes: the defender army left after the attack
pub fn resolve(defender: &Army, force: &Army, config: &CombatConfig) -> Army {
    apply_counter_chain(defender, force, config).saturating_sub(force)
}

/// What one resolved attack did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackReport {
    pub target: CountryId,
    /// Units the player lost (the committed force)
    pub force: Army,
    pub defender_before: Army,
    pub defender_after: Army,
}

impl AttackReport {
    pub fn defender_losses(&self) -> Army {
        self.defender_before.saturating_sub(&self.defender_after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> CombatConfig {
        CombatConfig::default()
    }

    #[test]
    fn test_force_is_capped() {
        let caps = cfg().attack_caps;
        assert_eq!(
            attack_force(&Army::new(5000, 200, 30, 30), &caps),
            Army::new(100, 10, 2, 2)
        );
        assert_eq!(
            attack_force(&Army::new(50, 0, 0, 1), &caps),
            Army::new(50, 0, 0, 1)
        );
    }

    #[test]
    fn test_infantry_only_attack() {
        let force = Army::new(50, 0, 0, 0);
        let defender = Army::new(100, 0, 0, 0);

        let chained = apply_counter_chain(&defender, &force, &cfg());
        assert_eq!(chained.infantry, 100);

        let after = resolve(&defender, &force, &cfg());
        assert_eq!(after, Army::new(50, 0, 0, 0));
    }

    #[test]
    fn test_full_force_against_default_country() {
        let force = Army::new(100, 10, 2, 2);
        let defender = Army::new(3000, 100, 20, 20);

        // infantry: 3000 - 10*20 - 100 = 2700
        // tank:     100 - 2*4 - 10    = 82
        // warship:  20 - 2*4 - 2      = 10
        // fighter:  20 - 150 -> 0
        assert_eq!(
            resolve(&defender, &force, &cfg()),
            Army::new(2700, 82, 10, 0)
        );
    }

    #[test]
    fn test_fighter_losses_floor() {
        let force = Army::new(3, 0, 0, 0);
        let defender = Army::new(0, 0, 0, 10);
        // floor(3 * 1.5) = 4
        assert_eq!(apply_counter_chain(&defender, &force, &cfg()).fighter, 6);
    }

    #[test]
    fn test_report_losses() {
        let report = AttackReport {
            target: CountryId::from("C1"),
            force: Army::new(50, 0, 0, 0),
            defender_before: Army::new(100, 3, 0, 0),
            defender_after: Army::new(50, 3, 0, 0),
        };
        assert_eq!(report.defender_losses(), Army::new(50, 0, 0, 0));
    }
}
