//! Simulation state types.
//!
//! Ships, projectiles, blast zones, orders and the world snapshot that ties
//! them together. Everything here is plain data plus small helpers; the
//! resolver owns all state transitions.

pub mod blast;
pub mod ids;
pub mod order;
pub mod projectile;
pub mod ship;
pub mod state;
pub mod vec2;

pub use blast::{BlastPhase, BlastZone};
pub use ids::{EntityId, ShipId, ALL_SHIPS};
pub use order::{
    MovementDirection, Orders, ProjectileCommand, ProjectileManeuver, RotationCommand,
    WeaponAction, WeaponMode, ALL_MANEUVERS, ALL_MOVEMENTS, ALL_ROTATIONS,
};
pub use projectile::ProjectileState;
pub use ship::ShipState;
pub use state::{InvariantViolation, WorldState};
pub use vec2::{normalize_heading, wrap_signed, Vec2};
