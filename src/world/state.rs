//! World snapshot and invariant checking.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use super::blast::BlastZone;
use super::ids::{EntityId, ShipId, ALL_SHIPS};
use super::projectile::ProjectileState;
use super::ship::ShipState;
use crate::config::Config;

/// Slack allowed on upper bounds when checking a snapshot.
const BOUND_TOLERANCE: f64 = 1e-9;

/// A state that should be impossible after any resolver step.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("{ship} {field} out of range: {value}")]
    ShipField {
        ship: ShipId,
        field: &'static str,
        value: f64,
    },

    #[error("{ship} has non-finite {field}")]
    ShipNotFinite { ship: ShipId, field: &'static str },

    #[error("projectile {id} {field} out of range: {value}")]
    ProjectileField {
        id: EntityId,
        field: &'static str,
        value: f64,
    },

    #[error("{owner} owns {count} projectiles (max {max})")]
    TooManyProjectiles {
        owner: ShipId,
        count: usize,
        max: usize,
    },

    #[error("blast zone {id} {field} out of range: {value}")]
    BlastField {
        id: EntityId,
        field: &'static str,
        value: f64,
    },

    #[error("entity id {id} is not below next_entity_id {next}")]
    StaleEntityId { id: EntityId, next: u32 },

    #[error("entity ids out of order: {previous} then {current}")]
    UnorderedIds {
        previous: EntityId,
        current: EntityId,
    },
}

/// Complete snapshot of a match at a decision boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    /// Number of intervals resolved so far.
    pub turn: u32,
    /// Indexed by [`ShipId::index`].
    pub ships: [ShipState; 2],
    /// Kept in ascending id order.
    pub projectiles: Vec<ProjectileState>,
    /// Kept in creation order.
    pub blast_zones: Vec<BlastZone>,
    pub next_entity_id: u32,
}

impl WorldState {
    pub fn new(ship_a: ShipState, ship_b: ShipState) -> Self {
        WorldState {
            turn: 0,
            ships: [ship_a, ship_b],
            projectiles: Vec::new(),
            blast_zones: Vec::new(),
            next_entity_id: 0,
        }
    }

    pub fn ship(&self, id: ShipId) -> &ShipState {
        &self.ships[id.index()]
    }

    pub fn ship_mut(&mut self, id: ShipId) -> &mut ShipState {
        &mut self.ships[id.index()]
    }

    /// Hands out the next entity id.
    pub fn alloc_id(&mut self) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    pub fn projectiles_owned_by(&self, owner: ShipId) -> impl Iterator<Item = &ProjectileState> {
        self.projectiles.iter().filter(move |p| p.owner == owner)
    }

    pub fn projectile(&self, id: EntityId) -> Option<&ProjectileState> {
        self.projectiles.iter().find(|p| p.id == id)
    }

    /// Verifies every range and bookkeeping invariant of the snapshot.
    pub fn check_invariants(&self, config: &Config) -> Result<(), InvariantViolation> {
        for ship_id in ALL_SHIPS {
            check_ship(ship_id, self.ship(ship_id), config)?;

            let count = self.projectiles_owned_by(ship_id).count();
            if count > config.projectile.max_active_per_ship {
                return Err(InvariantViolation::TooManyProjectiles {
                    owner: ship_id,
                    count,
                    max: config.projectile.max_active_per_ship,
                });
            }
        }

        let mut previous: Option<EntityId> = None;
        for p in &self.projectiles {
            if let Some(prev) = previous {
                if p.id <= prev {
                    return Err(InvariantViolation::UnorderedIds {
                        previous: prev,
                        current: p.id,
                    });
                }
            }
            previous = Some(p.id);
            self.check_entity_id(p.id)?;

            let field = |field, value| InvariantViolation::ProjectileField { id: p.id, field, value };
            if !p.position.is_finite() || !p.velocity.is_finite() {
                return Err(field("position", p.position.x));
            }
            if !(0.0..TAU).contains(&p.heading) {
                return Err(field("heading", p.heading));
            }
            if !(p.fuel >= 0.0 && p.fuel <= config.projectile.fuel_capacity + BOUND_TOLERANCE) {
                return Err(field("fuel", p.fuel));
            }
            if let Some(timer) = p.detonation_timer {
                if !timer.is_finite() {
                    return Err(field("detonation_timer", timer));
                }
            }
        }

        let max_radius = config.projectile.blast_radius_units;
        for zone in &self.blast_zones {
            self.check_entity_id(zone.id)?;
            let field = |field, value| InvariantViolation::BlastField { id: zone.id, field, value };
            if !(zone.radius >= 0.0 && zone.radius <= max_radius + BOUND_TOLERANCE) {
                return Err(field("radius", zone.radius));
            }
            if !(zone.age >= 0.0 && zone.age.is_finite()) {
                return Err(field("age", zone.age));
            }
            if !(zone.base_damage >= 0.0 && zone.base_damage.is_finite()) {
                return Err(field("base_damage", zone.base_damage));
            }
        }

        Ok(())
    }

    fn check_entity_id(&self, id: EntityId) -> Result<(), InvariantViolation> {
        if id.0 >= self.next_entity_id {
            return Err(InvariantViolation::StaleEntityId {
                id,
                next: self.next_entity_id,
            });
        }
        Ok(())
    }
}

fn check_ship(id: ShipId, ship: &ShipState, config: &Config) -> Result<(), InvariantViolation> {
    if !ship.position.is_finite() {
        return Err(InvariantViolation::ShipNotFinite { ship: id, field: "position" });
    }
    if !ship.velocity.is_finite() {
        return Err(InvariantViolation::ShipNotFinite { ship: id, field: "velocity" });
    }

    let out_of_range = |field, value| InvariantViolation::ShipField { ship: id, field, value };
    if !(0.0..TAU).contains(&ship.heading) {
        return Err(out_of_range("heading", ship.heading));
    }
    if !(ship.shields >= 0.0 && ship.shields <= config.ship.max_shields + BOUND_TOLERANCE) {
        return Err(out_of_range("shields", ship.shields));
    }
    if !(ship.energy >= 0.0 && ship.energy <= config.ship.max_energy + BOUND_TOLERANCE) {
        return Err(out_of_range("energy", ship.energy));
    }
    if !(ship.weapon_cooldown >= 0.0 && ship.weapon_cooldown.is_finite()) {
        return Err(out_of_range("weapon_cooldown", ship.weapon_cooldown));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::blast::BlastZone;
    use crate::world::vec2::Vec2;

    fn sample() -> WorldState {
        WorldState::new(
            ShipState::new(Vec2::new(100.0, 250.0), 0.0, 100.0, 100.0),
            ShipState::new(Vec2::new(900.0, 250.0), std::f64::consts::PI, 100.0, 100.0),
        )
    }

    fn projectile(state: &mut WorldState, owner: ShipId) -> ProjectileState {
        let id = state.alloc_id();
        ProjectileState {
            id,
            owner,
            position: Vec2::new(10.0, 10.0),
            velocity: Vec2::ZERO,
            heading: 0.0,
            fuel: 40.0,
            detonation_timer: None,
            just_launched: false,
        }
    }

    #[test]
    fn fresh_world_is_valid() {
        sample().check_invariants(&Config::default()).unwrap();
    }

    #[test]
    fn alloc_id_is_monotonic() {
        let mut state = sample();
        assert_eq!(state.alloc_id(), EntityId(0));
        assert_eq!(state.alloc_id(), EntityId(1));
        assert_eq!(state.next_entity_id, 2);
    }

    #[test]
    fn ship_lookup_by_id() {
        let mut state = sample();
        state.ship_mut(ShipId::B).shields = 42.0;
        assert_eq!(state.ship(ShipId::B).shields, 42.0);
        assert_eq!(state.ships[1].shields, 42.0);
        assert_eq!(state.ship(ShipId::A).shields, 100.0);
    }

    #[test]
    fn negative_shields_rejected() {
        let mut state = sample();
        state.ship_mut(ShipId::A).shields = -0.5;
        let err = state.check_invariants(&Config::default()).unwrap_err();
        assert!(matches!(err, InvariantViolation::ShipField { field: "shields", .. }));
    }

    #[test]
    fn heading_must_be_normalized() {
        let mut state = sample();
        state.ship_mut(ShipId::B).heading = TAU;
        assert!(state.check_invariants(&Config::default()).is_err());
    }

    #[test]
    fn nan_position_rejected() {
        let mut state = sample();
        state.ship_mut(ShipId::A).position.x = f64::NAN;
        let err = state.check_invariants(&Config::default()).unwrap_err();
        assert_eq!(err.to_string(), "ship_a has non-finite position");
    }

    #[test]
    fn too_many_projectiles_rejected() {
        let mut state = sample();
        for _ in 0..5 {
            let p = projectile(&mut state, ShipId::A);
            state.projectiles.push(p);
        }
        let err = state.check_invariants(&Config::default()).unwrap_err();
        assert!(matches!(err, InvariantViolation::TooManyProjectiles { count: 5, .. }));
    }

    #[test]
    fn unallocated_id_rejected() {
        let mut state = sample();
        state
            .blast_zones
            .push(BlastZone::new(EntityId(7), ShipId::A, Vec2::ZERO, 10.0));
        let err = state.check_invariants(&Config::default()).unwrap_err();
        assert!(matches!(err, InvariantViolation::StaleEntityId { .. }));
    }

    #[test]
    fn oversized_blast_rejected() {
        let mut state = sample();
        let id = state.alloc_id();
        let mut zone = BlastZone::new(id, ShipId::B, Vec2::ZERO, 10.0);
        zone.radius = 15.5;
        state.blast_zones.push(zone);
        assert!(state.check_invariants(&Config::default()).is_err());
    }

    #[test]
    fn projectiles_owned_by_filters() {
        let mut state = sample();
        for owner in [ShipId::A, ShipId::B, ShipId::A] {
            let p = projectile(&mut state, owner);
            state.projectiles.push(p);
        }
        assert_eq!(state.projectiles_owned_by(ShipId::A).count(), 2);
        assert_eq!(state.projectiles_owned_by(ShipId::B).count(), 1);
        assert!(state.projectile(EntityId(1)).is_some());
        assert!(state.projectile(EntityId(9)).is_none());
    }

    #[test]
    fn snapshot_serializes() {
        let state = sample();
        let json = serde_json::to_string(&state).unwrap();
        let back: WorldState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
