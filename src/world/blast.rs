//! Blast zone state.
//!
//! A blast zone is the persistent area effect left by a detonated
//! projectile. It grows, holds, then shrinks, damaging every ship inside it,
//! including the ship that launched the projectile.

use serde::{Deserialize, Serialize};

use super::ids::{EntityId, ShipId};
use super::vec2::Vec2;

/// Lifecycle phase of a blast zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlastPhase {
    Expanding,
    Persisting,
    Dissipating,
}

/// A persistent damaging area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlastZone {
    pub id: EntityId,
    /// Bookkeeping only. The owner is damaged like anyone else.
    pub owner: ShipId,
    pub center: Vec2,
    /// Total damage a ship would take sitting inside for one full interval.
    pub base_damage: f64,
    pub phase: BlastPhase,
    /// Seconds since detonation.
    pub age: f64,
    pub radius: f64,
}

impl BlastZone {
    /// A freshly detonated zone: zero age, zero radius, expanding.
    pub fn new(id: EntityId, owner: ShipId, center: Vec2, base_damage: f64) -> Self {
        BlastZone {
            id,
            owner,
            center,
            base_damage,
            phase: BlastPhase::Expanding,
            age: 0.0,
            radius: 0.0,
        }
    }

    /// Strict containment: a ship exactly on the rim is outside.
    pub fn contains(&self, point: Vec2) -> bool {
        self.center.distance_to(point) < self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_zone_starts_expanding_at_zero_radius() {
        let zone = BlastZone::new(EntityId(3), ShipId::A, Vec2::new(5.0, 5.0), 45.0);
        assert_eq!(zone.phase, BlastPhase::Expanding);
        assert_eq!(zone.age, 0.0);
        assert_eq!(zone.radius, 0.0);
        assert!(!zone.contains(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn rim_is_outside() {
        let mut zone = BlastZone::new(EntityId(1), ShipId::B, Vec2::new(50.0, 0.0), 45.0);
        zone.radius = 15.0;
        assert!(zone.contains(Vec2::new(64.9, 0.0)));
        assert!(!zone.contains(Vec2::new(65.0, 0.0)));
    }
}
