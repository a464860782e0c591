//! Events emitted while resolving a turn.
//!
//! Events are pure output. The resolver never reads them back, so they can be
//! logged, replayed or dropped without affecting the simulation.

use serde::{Deserialize, Serialize};

use crate::world::{BlastPhase, EntityId, ShipId, Vec2, WeaponMode};

/// Why a projectile detonated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetonationCause {
    Timer,
    FuelDepleted,
}

/// What happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    WeaponReconfigured {
        ship: ShipId,
        mode: WeaponMode,
    },
    ProjectileLaunched {
        ship: ShipId,
        projectile: EntityId,
        position: Vec2,
        heading: f64,
    },
    WeaponHit {
        attacker: ShipId,
        target: ShipId,
        mode: WeaponMode,
        damage: f64,
        distance: f64,
    },
    ProjectileDetonated {
        projectile: EntityId,
        owner: ShipId,
        position: Vec2,
        fuel: f64,
        base_damage: f64,
        blast_zone: EntityId,
        cause: DetonationCause,
    },
    AreaDamage {
        ship: ShipId,
        blast_zone: EntityId,
        zone_owner: ShipId,
        damage: f64,
        phase: BlastPhase,
        radius: f64,
        distance: f64,
    },
    BlastZoneExpired {
        blast_zone: EntityId,
        owner: ShipId,
    },
    ShipDestroyed {
        ship: ShipId,
    },
}

/// A timestamped event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Turn number after the resolve that produced this event.
    pub turn: u32,
    /// 0 for interval-start actions, otherwise the 1-based substep.
    pub substep: u32,
    /// Seconds into the interval: `substep * dt`.
    pub time: f64,
    pub kind: EventKind,
}

/// Append-only event buffer for one resolve call.
#[derive(Debug)]
pub(crate) struct EventLog {
    turn: u32,
    dt: f64,
    events: Vec<Event>,
}

impl EventLog {
    pub(crate) fn new(turn: u32, dt: f64) -> Self {
        EventLog {
            turn,
            dt,
            events: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, substep: u32, kind: EventKind) {
        self.events.push(Event {
            turn: self.turn,
            substep,
            time: substep as f64 * self.dt,
            kind,
        });
    }

    pub(crate) fn len(&self) -> usize {
        self.events.len()
    }

    pub(crate) fn into_events(self) -> Vec<Event> {
        self.events
    }
}
