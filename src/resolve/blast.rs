//! Blast zone lifecycle and area damage.

use tracing::debug;

use super::events::{EventKind, EventLog};
use crate::config::Config;
use crate::world::{BlastPhase, WorldState, ALL_SHIPS};

/// Tolerance applied at phase boundaries.
const PHASE_EPSILON: f64 = 1e-9;

/// Phase and radius of a zone of the given age, or `None` once it is spent.
pub fn zone_shape(age: f64, config: &Config) -> Option<(BlastPhase, f64)> {
    let p = &config.projectile;
    let max = p.blast_radius_units;
    let expanded = p.blast_expansion_seconds;
    let persisted = expanded + p.blast_persistence_seconds;
    let dissipated = persisted + p.blast_dissipation_seconds;

    if age >= dissipated - PHASE_EPSILON {
        None
    } else if age < expanded - PHASE_EPSILON {
        Some((BlastPhase::Expanding, max * age / p.blast_expansion_seconds))
    } else if age < persisted - PHASE_EPSILON {
        Some((BlastPhase::Persisting, max))
    } else {
        let fraction = (age - persisted) / p.blast_dissipation_seconds;
        Some((BlastPhase::Dissipating, (max * (1.0 - fraction)).clamp(0.0, max)))
    }
}

/// Ages every zone by one substep and removes the ones that have dissipated.
pub(crate) fn advance_zones(state: &mut WorldState, config: &Config, log: &mut EventLog, substep: u32, dt: f64) {
    state.blast_zones.retain_mut(|zone| {
        zone.age += dt;
        match zone_shape(zone.age, config) {
            Some((phase, radius)) => {
                zone.phase = phase;
                zone.radius = radius;
                true
            }
            None => {
                debug!(zone = %zone.id, age = zone.age, "blast zone expired");
                log.push(
                    substep,
                    EventKind::BlastZoneExpired {
                        blast_zone: zone.id,
                        owner: zone.owner,
                    },
                );
                false
            }
        }
    });
}

/// Area damage one zone deals per substep.
pub fn damage_per_substep(base_damage: f64, config: &Config, dt: f64) -> f64 {
    base_damage / config.decision_interval() * dt
}

/// Damages every ship inside every zone. Owners are not exempt and
/// overlapping zones stack.
pub(crate) fn apply_area_damage(state: &mut WorldState, config: &Config, log: &mut EventLog, substep: u32, dt: f64) {
    for zone in &state.blast_zones {
        let damage = damage_per_substep(zone.base_damage, config, dt);
        if damage <= 0.0 {
            continue;
        }
        for ship_id in ALL_SHIPS {
            let ship = &mut state.ships[ship_id.index()];
            if !zone.contains(ship.position) {
                continue;
            }
            let distance = zone.center.distance_to(ship.position);
            ship.shields = (ship.shields - damage).max(0.0);
            log.push(
                substep,
                EventKind::AreaDamage {
                    ship: ship_id,
                    blast_zone: zone.id,
                    zone_owner: zone.owner,
                    damage,
                    phase: zone.phase,
                    radius: zone.radius,
                    distance,
                },
            );
        }
    }
}
