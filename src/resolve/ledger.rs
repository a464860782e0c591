//! Energy, cooldown and fuel accounting.

use crate::config::Config;
use crate::world::{MovementDirection, ProjectileManeuver, ProjectileState, RotationCommand, ShipState};

/// Cooldowns within this distance of zero are treated as elapsed.
const COOLDOWN_SNAP: f64 = 1e-9;

/// Counts the weapon cooldown down by one substep.
pub fn decay_cooldown(ship: &mut ShipState, dt: f64) {
    let remaining = ship.weapon_cooldown - dt;
    ship.weapon_cooldown = if remaining <= COOLDOWN_SNAP { 0.0 } else { remaining };
}

/// Applies regeneration minus movement and rotation costs for one substep.
pub fn settle_energy(
    ship: &mut ShipState,
    movement: MovementDirection,
    rotation: RotationCommand,
    config: &Config,
    dt: f64,
) {
    let net = config.ship.energy_regen_per_second
        - config.movement_cost(movement)
        - config.rotation_cost(rotation);
    ship.energy = (ship.energy + net * dt).clamp(0.0, config.ship.max_energy);
}

/// Pays for a launch. Validation guarantees the ship can afford it.
pub fn charge_launch(ship: &mut ShipState, config: &Config) {
    ship.energy = (ship.energy - config.projectile.launch_cost_ae).max(0.0);
}

/// Burns projectile fuel for one substep. Launch-interval projectiles burn at
/// the straight rate whatever they were told.
pub fn burn_fuel(
    projectile: &mut ProjectileState,
    maneuver: ProjectileManeuver,
    config: &Config,
    dt: f64,
) {
    let maneuver = if projectile.just_launched {
        ProjectileManeuver::Straight
    } else {
        maneuver
    };
    projectile.fuel = (projectile.fuel - config.maneuver_burn(maneuver) * dt)
        .clamp(0.0, config.projectile.fuel_capacity);
}
