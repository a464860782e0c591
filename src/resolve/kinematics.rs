//! Per-substep motion for ships and projectiles.

use crate::config::Config;
use crate::world::{
    normalize_heading, MovementDirection, ProjectileManeuver, ProjectileState, RotationCommand,
    ShipState, Vec2,
};

/// Rotates, then moves, a ship by one substep.
///
/// Velocity is recomputed from the current heading every call; `Stop`
/// zeroes it immediately.
pub fn step_ship(
    ship: &mut ShipState,
    movement: MovementDirection,
    rotation: RotationCommand,
    config: &Config,
    dt: f64,
) {
    ship.heading = normalize_heading(ship.heading + config.rotation_rate(rotation) * dt);

    ship.velocity = match movement {
        MovementDirection::Stop => Vec2::ZERO,
        direction => Vec2::from_angle(
            ship.heading + direction.offset_degrees().to_radians(),
            config.ship.base_speed_units_per_second,
        ),
    };
    ship.position += ship.velocity * dt;
}

/// Moves a projectile by one substep. Launch-interval projectiles fly straight.
pub fn step_projectile(
    projectile: &mut ProjectileState,
    maneuver: ProjectileManeuver,
    config: &Config,
    dt: f64,
) {
    if !projectile.just_launched {
        projectile.heading =
            normalize_heading(projectile.heading + config.maneuver_rate(maneuver) * dt);
    }
    projectile.velocity =
        Vec2::from_angle(projectile.heading, config.projectile.speed_units_per_second);
    projectile.position += projectile.velocity * dt;
}
