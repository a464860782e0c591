//! Skirmish: a deterministic turn resolver for two-ship space duels.
//!
//! Ships issue orders once per decision interval; the resolver integrates the
//! interval in fixed substeps and returns the next world snapshot plus an
//! ordered event log. Around it sit the config loader, the token protocol for
//! orders, a match runner and JSONL replay records.

pub mod arena;
pub mod config;
pub mod protocol;
pub mod replay;
pub mod resolve;
pub mod world;

pub use config::{Config, ConfigError};
pub use resolve::{resolve_turn, Event, EventKind, Resolver};
pub use world::{Orders, ShipId, WorldState};
