//! Order validation.
//!
//! Turns whatever a controller asked for into something the resolver can
//! execute. Nothing here fails: illegal pieces are dropped or downgraded and
//! the rest of the order stands.

use tracing::debug;

use crate::config::Config;
use crate::world::{Orders, ProjectileCommand, ShipId, WeaponAction, WorldState};

/// Returns the sanitised version of `orders` for `ship_id`.
pub fn validate_orders(
    ship_id: ShipId,
    orders: &Orders,
    state: &WorldState,
    config: &Config,
) -> Orders {
    let ship = state.ship(ship_id);
    let mut valid = Orders::new(orders.movement, orders.rotation, orders.weapon);

    for (&id, &command) in &orders.projectile_commands {
        let owned = state.projectile(id).is_some_and(|p| p.owner == ship_id);
        if !owned {
            debug!(ship = %ship_id, projectile = %id, "dropping command for unknown projectile");
            continue;
        }
        if let ProjectileCommand::DetonateAfter(delay) = command {
            if !delay.is_finite() || delay < 0.0 || delay > config.decision_interval() {
                debug!(ship = %ship_id, projectile = %id, delay, "dropping out-of-range detonation delay");
                continue;
            }
        }
        valid.projectile_commands.insert(id, command);
    }

    valid.weapon = match orders.weapon {
        WeaponAction::Launch => {
            let active = state.projectiles_owned_by(ship_id).count();
            if active >= config.projectile.max_active_per_ship {
                debug!(ship = %ship_id, active, "launch dropped: projectile limit reached");
                WeaponAction::Maintain
            } else if ship.energy < config.projectile.launch_cost_ae {
                debug!(ship = %ship_id, energy = ship.energy, "launch dropped: insufficient energy");
                WeaponAction::Maintain
            } else {
                WeaponAction::Launch
            }
        }
        WeaponAction::Switch(mode) if mode == ship.weapon_mode => WeaponAction::Maintain,
        other => other,
    };

    valid
}
