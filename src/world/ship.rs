//! Ship state.

use serde::{Deserialize, Serialize};

use super::order::WeaponMode;
use super::vec2::Vec2;

/// Complete state for one ship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipState {
    pub position: Vec2,
    /// Recomputed every substep from the movement order; not integrated.
    pub velocity: Vec2,
    /// Radians in `[0, 2π)`, 0 = east.
    pub heading: f64,
    pub shields: f64,
    /// Available energy ("AE").
    pub energy: f64,
    pub weapon_mode: WeaponMode,
    /// Seconds until the weapon may fire again.
    pub weapon_cooldown: f64,
    /// Set for the single interval in which the weapon mode is switched.
    pub reconfiguring: bool,
}

impl ShipState {
    /// A stationary ship with the given vitals, wide weapon, ready to fire.
    pub fn new(position: Vec2, heading: f64, shields: f64, energy: f64) -> Self {
        ShipState {
            position,
            velocity: Vec2::ZERO,
            heading,
            shields,
            energy,
            weapon_mode: WeaponMode::Wide,
            weapon_cooldown: 0.0,
            reconfiguring: false,
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.shields <= 0.0
    }

    /// Ready to fire: not reconfiguring and cooldown fully elapsed.
    pub fn weapon_ready(&self) -> bool {
        !self.reconfiguring && self.weapon_cooldown <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ship_is_ready() {
        let ship = ShipState::new(Vec2::new(1.0, 2.0), 0.0, 100.0, 100.0);
        assert!(ship.weapon_ready());
        assert!(!ship.is_destroyed());
        assert_eq!(ship.velocity, Vec2::ZERO);
    }

    #[test]
    fn reconfiguring_blocks_readiness() {
        let mut ship = ShipState::new(Vec2::ZERO, 0.0, 100.0, 100.0);
        ship.reconfiguring = true;
        assert!(!ship.weapon_ready());
        ship.reconfiguring = false;
        ship.weapon_cooldown = 0.1;
        assert!(!ship.weapon_ready());
    }
}
