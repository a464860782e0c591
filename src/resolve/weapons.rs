//! Weapon resolution: mode switches, launches, direct fire and detonations.

use tracing::debug;

use super::events::{DetonationCause, EventKind, EventLog};
use super::ledger::charge_launch;
use crate::config::Config;
use crate::world::{
    wrap_signed, BlastZone, Orders, ProjectileState, ShipId, Vec2, WeaponAction, WorldState,
    ALL_SHIPS,
};

/// Tolerance for a detonation countdown reaching zero.
const TIMER_EPSILON: f64 = 1e-9;

/// Carries out validated weapon actions at the start of an interval.
///
/// Ship A acts before ship B, so launch ids are deterministic.
pub(crate) fn apply_weapon_actions(
    state: &mut WorldState,
    orders: &[Orders; 2],
    config: &Config,
    log: &mut EventLog,
) {
    for ship_id in ALL_SHIPS {
        match orders[ship_id.index()].weapon {
            WeaponAction::Maintain => {}
            WeaponAction::Switch(mode) => {
                let ship = state.ship_mut(ship_id);
                ship.weapon_mode = mode;
                ship.reconfiguring = true;
                log.push(0, EventKind::WeaponReconfigured { ship: ship_id, mode });
            }
            WeaponAction::Launch => launch(state, ship_id, config, log),
        }
    }
}

fn launch(state: &mut WorldState, ship_id: ShipId, config: &Config, log: &mut EventLog) {
    let id = state.alloc_id();
    let ship = state.ship_mut(ship_id);
    charge_launch(ship, config);
    let (position, heading) = (ship.position, ship.heading);

    state.projectiles.push(ProjectileState {
        id,
        owner: ship_id,
        position,
        velocity: Vec2::from_angle(heading, config.projectile.speed_units_per_second),
        heading,
        fuel: config.projectile.fuel_capacity,
        detonation_timer: None,
        just_launched: true,
    });
    debug!(ship = %ship_id, projectile = %id, "projectile launched");
    log.push(
        0,
        EventKind::ProjectileLaunched {
            ship: ship_id,
            projectile: id,
            position,
            heading,
        },
    );
}

/// Checks one hit per ready ship, ship A first.
///
/// Ship B's check sees the shields left by ship A's shot but fires
/// regardless, so simultaneous kills are possible.
pub(crate) fn fire_weapons(state: &mut WorldState, config: &Config, log: &mut EventLog, substep: u32) {
    for attacker in ALL_SHIPS {
        let target = attacker.opponent();
        let target_position = state.ship(target).position;

        let ship = state.ship(attacker);
        if !ship.weapon_ready() {
            continue;
        }
        let mode = ship.weapon_mode;
        let weapon = config.weapon_mode(mode);

        let distance = ship.position.distance_to(target_position);
        if distance > weapon.range_units {
            continue;
        }
        let offset = wrap_signed(ship.position.bearing_to(target_position) - ship.heading);
        if offset.abs() > config.half_arc(mode) {
            continue;
        }

        let damage = weapon.damage;
        let cooldown = weapon.cooldown_seconds;
        state.ship_mut(attacker).weapon_cooldown = cooldown;
        let victim = state.ship_mut(target);
        victim.shields = (victim.shields - damage).max(0.0);

        log.push(
            substep,
            EventKind::WeaponHit {
                attacker,
                target,
                mode,
                damage,
                distance,
            },
        );
    }
}

/// Counts down armed timers by one substep.
pub fn tick_timers(state: &mut WorldState, dt: f64) {
    for projectile in &mut state.projectiles {
        if let Some(timer) = projectile.detonation_timer.as_mut() {
            *timer -= dt;
        }
    }
}

/// Detonates every projectile whose timer expired or whose fuel ran out.
///
/// Projectiles are visited in id order; each leaves one new blast zone.
pub(crate) fn detonate_projectiles(
    state: &mut WorldState,
    config: &Config,
    log: &mut EventLog,
    substep: u32,
) {
    let mut remaining = Vec::with_capacity(state.projectiles.len());
    for projectile in std::mem::take(&mut state.projectiles) {
        let cause = match projectile.detonation_timer {
            Some(timer) if timer <= TIMER_EPSILON => Some(DetonationCause::Timer),
            _ if projectile.fuel <= 0.0 => Some(DetonationCause::FuelDepleted),
            _ => None,
        };
        let Some(cause) = cause else {
            remaining.push(projectile);
            continue;
        };

        let zone_id = state.alloc_id();
        let base_damage = projectile.fuel * config.projectile.blast_damage_multiplier;
        state.blast_zones.push(BlastZone::new(
            zone_id,
            projectile.owner,
            projectile.position,
            base_damage,
        ));
        debug!(
            projectile = %projectile.id,
            zone = %zone_id,
            fuel = projectile.fuel,
            ?cause,
            "projectile detonated"
        );
        log.push(
            substep,
            EventKind::ProjectileDetonated {
                projectile: projectile.id,
                owner: projectile.owner,
                position: projectile.position,
                fuel: projectile.fuel,
                base_damage,
                blast_zone: zone_id,
                cause,
            },
        );
    }
    state.projectiles = remaining;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{EntityId, MovementDirection, RotationCommand, ShipState, WeaponMode};
    use std::f64::consts::PI;

    fn facing(distance: f64) -> WorldState {
        WorldState::new(
            ShipState::new(Vec2::new(500.0, 250.0), 0.0, 100.0, 100.0),
            ShipState::new(Vec2::new(500.0 + distance, 250.0), PI, 100.0, 100.0),
        )
    }

    fn kinds(log: EventLog) -> Vec<EventKind> {
        log.into_events().into_iter().map(|e| e.kind).collect()
    }

    #[test]
    fn both_ships_hit_in_range() {
        let config = Config::default();
        let mut state = facing(20.0);
        let mut log = EventLog::new(1, 0.1);
        fire_weapons(&mut state, &config, &mut log, 1);
        assert_eq!(state.ship(ShipId::A).shields, 85.0);
        assert_eq!(state.ship(ShipId::B).shields, 85.0);
        assert_eq!(state.ship(ShipId::A).weapon_cooldown, 3.5);
        let kinds = kinds(log);
        assert_eq!(kinds.len(), 2);
        assert!(matches!(kinds[0], EventKind::WeaponHit { attacker: ShipId::A, .. }));
        assert!(matches!(kinds[1], EventKind::WeaponHit { attacker: ShipId::B, .. }));
    }

    #[test]
    fn out_of_range_misses() {
        let config = Config::default();
        let mut state = facing(30.5);
        let mut log = EventLog::new(1, 0.1);
        fire_weapons(&mut state, &config, &mut log, 1);
        assert_eq!(log.len(), 0);
    }

    #[test]
    fn range_boundary_is_inclusive() {
        let config = Config::default();
        let mut state = facing(30.0);
        let mut log = EventLog::new(1, 0.1);
        fire_weapons(&mut state, &config, &mut log, 1);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn focused_arc_is_narrow() {
        let config = Config::default();
        let mut state = facing(40.0);
        state.ship_mut(ShipId::A).weapon_mode = WeaponMode::Focused;
        state.ship_mut(ShipId::A).heading = 4.0_f64.to_radians();
        let mut log = EventLog::new(1, 0.1);
        fire_weapons(&mut state, &config, &mut log, 1);
        assert_eq!(state.ship(ShipId::B).shields, 65.0);

        let mut state = facing(40.0);
        state.ship_mut(ShipId::A).weapon_mode = WeaponMode::Focused;
        state.ship_mut(ShipId::A).heading = 2.0 * PI - 5.5_f64.to_radians();
        let mut log = EventLog::new(1, 0.1);
        fire_weapons(&mut state, &config, &mut log, 1);
        assert_eq!(state.ship(ShipId::B).shields, 100.0);
    }

    #[test]
    fn target_behind_is_missed() {
        let config = Config::default();
        let mut state = facing(20.0);
        state.ship_mut(ShipId::A).heading = PI;
        let mut log = EventLog::new(1, 0.1);
        fire_weapons(&mut state, &config, &mut log, 1);
        assert_eq!(state.ship(ShipId::B).shields, 100.0);
        assert_eq!(state.ship(ShipId::A).shields, 85.0);
    }

    #[test]
    fn reconfiguring_ship_holds_fire() {
        let config = Config::default();
        let mut state = facing(20.0);
        state.ship_mut(ShipId::B).reconfiguring = true;
        let mut log = EventLog::new(1, 0.1);
        fire_weapons(&mut state, &config, &mut log, 1);
        assert_eq!(state.ship(ShipId::A).shields, 100.0);
        assert_eq!(state.ship(ShipId::B).shields, 85.0);
    }

    #[test]
    fn shields_clamp_at_zero() {
        let config = Config::default();
        let mut state = facing(20.0);
        state.ship_mut(ShipId::B).shields = 4.0;
        let mut log = EventLog::new(1, 0.1);
        fire_weapons(&mut state, &config, &mut log, 1);
        assert_eq!(state.ship(ShipId::B).shields, 0.0);
    }

    #[test]
    fn launch_and_switch_at_interval_start() {
        let config = Config::default();
        let mut state = facing(200.0);
        let orders = [
            Orders::new(MovementDirection::Stop, RotationCommand::None, WeaponAction::Launch),
            Orders::new(
                MovementDirection::Stop,
                RotationCommand::None,
                WeaponAction::Switch(WeaponMode::Focused),
            ),
        ];
        let mut log = EventLog::new(1, 0.1);
        apply_weapon_actions(&mut state, &orders, &config, &mut log);

        assert_eq!(state.ship(ShipId::A).energy, 80.0);
        assert_eq!(state.projectiles.len(), 1);
        let p = &state.projectiles[0];
        assert_eq!(p.id, EntityId(0));
        assert!(p.just_launched);
        assert_eq!(p.fuel, 40.0);
        assert_eq!(p.position, Vec2::new(500.0, 250.0));

        let b = state.ship(ShipId::B);
        assert_eq!(b.weapon_mode, WeaponMode::Focused);
        assert!(b.reconfiguring);
        assert_eq!(b.energy, 100.0);

        let events = log.into_events();
        assert!(events.iter().all(|e| e.substep == 0));
        assert!(matches!(events[0].kind, EventKind::ProjectileLaunched { ship: ShipId::A, .. }));
        assert!(matches!(
            events[1].kind,
            EventKind::WeaponReconfigured { ship: ShipId::B, mode: WeaponMode::Focused }
        ));
    }

    fn armed(state: &mut WorldState, fuel: f64, timer: Option<f64>) -> EntityId {
        let id = state.alloc_id();
        state.projectiles.push(ProjectileState {
            id,
            owner: ShipId::A,
            position: Vec2::new(10.0, 20.0),
            velocity: Vec2::ZERO,
            heading: 0.0,
            fuel,
            detonation_timer: timer,
            just_launched: false,
        });
        id
    }

    #[test]
    fn timer_detonation_creates_zone() {
        let config = Config::default();
        let mut state = facing(200.0);
        let fused = armed(&mut state, 30.0, Some(0.1));
        let idle = armed(&mut state, 30.0, None);

        tick_timers(&mut state, 0.1);
        let mut log = EventLog::new(1, 0.1);
        detonate_projectiles(&mut state, &config, &mut log, 7);

        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].id, idle);
        assert_eq!(state.blast_zones.len(), 1);
        let zone = &state.blast_zones[0];
        assert_eq!(zone.id, EntityId(2));
        assert_eq!(zone.base_damage, 45.0);
        assert_eq!(zone.center, Vec2::new(10.0, 20.0));
        let events = log.into_events();
        assert_eq!(events.len(), 1);
        match &events[0].kind {
            EventKind::ProjectileDetonated {
                projectile, cause, ..
            } => {
                assert_eq!(*projectile, fused);
                assert_eq!(*cause, DetonationCause::Timer);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn empty_tank_detonates() {
        let config = Config::default();
        let mut state = facing(200.0);
        armed(&mut state, 0.0, None);
        let mut log = EventLog::new(1, 0.1);
        detonate_projectiles(&mut state, &config, &mut log, 3);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.blast_zones[0].base_damage, 0.0);
        assert!(matches!(
            log.into_events()[0].kind,
            EventKind::ProjectileDetonated { cause: DetonationCause::FuelDepleted, .. }
        ));
    }
}
