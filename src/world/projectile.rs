//! Projectile (torpedo) state.

use serde::{Deserialize, Serialize};

use super::ids::{EntityId, ShipId};
use super::vec2::Vec2;

/// Complete state for one projectile in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileState {
    pub id: EntityId,
    pub owner: ShipId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub heading: f64,
    /// Remaining fuel; doubles as warhead yield at detonation.
    pub fuel: f64,
    /// Seconds until scheduled self-destruct, if a timer is armed.
    #[serde(default)]
    pub detonation_timer: Option<f64>,
    /// Turning is disabled for the interval in which the projectile launched.
    #[serde(default)]
    pub just_launched: bool,
}
