//! Turn resolution.
//!
//! Advances a world snapshot through one decision interval given both ships'
//! orders. The interval is integrated in fixed substeps; every substep runs
//! motion, accounting, direct fire, blast aging, detonations and area damage
//! in that order, then verifies the world's invariants.

pub mod blast;
pub mod events;
pub mod kinematics;
pub mod ledger;
pub mod validate;
pub mod weapons;

use std::collections::BTreeMap;

use tracing::trace;

pub use events::{DetonationCause, Event, EventKind};
pub use validate::validate_orders;

use self::events::EventLog;
use crate::config::Config;
use crate::world::{
    EntityId, Orders, ProjectileCommand, ProjectileManeuver, WorldState, ALL_SHIPS,
};

/// Resolves turns against a fixed configuration.
///
/// Holds nothing but the config, so one resolver can serve any number of
/// matches.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    config: &'a Config,
}

impl<'a> Resolver<'a> {
    pub fn new(config: &'a Config) -> Self {
        Resolver { config }
    }

    pub fn config(&self) -> &'a Config {
        self.config
    }

    /// Resolves one decision interval.
    ///
    /// # Panics
    ///
    /// Panics if the world breaks an invariant after any substep. That means
    /// the input snapshot was corrupt or the resolver has a bug; continuing
    /// would make replays unfaithful.
    pub fn resolve(
        &self,
        mut state: WorldState,
        orders_a: &Orders,
        orders_b: &Orders,
    ) -> (WorldState, Vec<Event>) {
        let config = self.config;
        let dt = config.dt();
        let substeps = config.substep_count();

        state.turn += 1;
        let mut log = EventLog::new(state.turn, dt);

        let orders = [
            validate_orders(ALL_SHIPS[0], orders_a, &state, config),
            validate_orders(ALL_SHIPS[1], orders_b, &state, config),
        ];
        let maneuvers = arm_projectiles(&mut state, &orders);
        weapons::apply_weapon_actions(&mut state, &orders, config, &mut log);

        let mut alive = [!state.ships[0].is_destroyed(), !state.ships[1].is_destroyed()];

        for substep in 1..=substeps {
            for ship_id in ALL_SHIPS {
                let order = &orders[ship_id.index()];
                let ship = state.ship_mut(ship_id);
                kinematics::step_ship(ship, order.movement, order.rotation, config, dt);
                ledger::decay_cooldown(ship, dt);
                ledger::settle_energy(ship, order.movement, order.rotation, config, dt);
            }

            for projectile in &mut state.projectiles {
                let maneuver = maneuvers
                    .get(&projectile.id)
                    .copied()
                    .unwrap_or(ProjectileManeuver::Straight);
                kinematics::step_projectile(projectile, maneuver, config, dt);
                ledger::burn_fuel(projectile, maneuver, config, dt);
            }
            weapons::tick_timers(&mut state, dt);

            weapons::fire_weapons(&mut state, config, &mut log, substep);
            blast::advance_zones(&mut state, config, &mut log, substep, dt);
            weapons::detonate_projectiles(&mut state, config, &mut log, substep);
            blast::apply_area_damage(&mut state, config, &mut log, substep, dt);

            for ship_id in ALL_SHIPS {
                let idx = ship_id.index();
                if alive[idx] && state.ships[idx].is_destroyed() {
                    alive[idx] = false;
                    log.push(substep, EventKind::ShipDestroyed { ship: ship_id });
                }
            }

            if let Err(violation) = state.check_invariants(config) {
                panic!(
                    "invariant violated at turn {} substep {}: {}",
                    state.turn, substep, violation
                );
            }
        }

        finish_interval(&mut state);

        trace!(
            turn = state.turn,
            events = log.len(),
            projectiles = state.projectiles.len(),
            blast_zones = state.blast_zones.len(),
            shields_a = state.ships[0].shields,
            shields_b = state.ships[1].shields,
            "turn resolved"
        );
        (state, log.into_events())
    }
}

/// Resolves one decision interval with the given configuration.
///
/// Pure apart from tracing: identical inputs give identical outputs.
pub fn resolve_turn(
    state: WorldState,
    orders_a: &Orders,
    orders_b: &Orders,
    config: &Config,
) -> (WorldState, Vec<Event>) {
    Resolver::new(config).resolve(state, orders_a, orders_b)
}

/// Arms detonation timers and collects this interval's maneuvers.
fn arm_projectiles(
    state: &mut WorldState,
    orders: &[Orders; 2],
) -> BTreeMap<EntityId, ProjectileManeuver> {
    let mut maneuvers = BTreeMap::new();
    for order in orders {
        for (&id, &command) in &order.projectile_commands {
            match command {
                ProjectileCommand::Maneuver(maneuver) => {
                    maneuvers.insert(id, maneuver);
                }
                ProjectileCommand::DetonateAfter(delay) => {
                    if let Some(p) = state.projectiles.iter_mut().find(|p| p.id == id) {
                        p.detonation_timer = Some(delay);
                    }
                }
            }
        }
    }
    maneuvers
}

/// Clears the single-interval flags. A ship that spent the interval
/// reconfiguring comes out ready to fire.
fn finish_interval(state: &mut WorldState) {
    for ship in &mut state.ships {
        if ship.reconfiguring {
            ship.reconfiguring = false;
            ship.weapon_cooldown = 0.0;
        }
    }
    for projectile in &mut state.projectiles {
        projectile.just_launched = false;
    }
}
