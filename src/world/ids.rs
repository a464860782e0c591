//! Identifiers for ships and dynamic entities.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two combatants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShipId {
    #[serde(rename = "ship_a")]
    A,
    #[serde(rename = "ship_b")]
    B,
}

/// Both ships in resolution order. Ship A is always processed first.
pub const ALL_SHIPS: [ShipId; 2] = [ShipId::A, ShipId::B];

impl ShipId {
    /// Index into per-ship arrays.
    pub const fn index(self) -> usize {
        match self {
            ShipId::A => 0,
            ShipId::B => 1,
        }
    }

    pub const fn opponent(self) -> ShipId {
        match self {
            ShipId::A => ShipId::B,
            ShipId::B => ShipId::A,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ShipId::A => "ship_a",
            ShipId::B => "ship_b",
        }
    }
}

impl fmt::Display for ShipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifier of a projectile or blast zone.
///
/// Allocated from the world's counter, so ids never repeat within a match and
/// a detonation's blast zone always has a larger id than its projectile.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
