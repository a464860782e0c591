//! Token form of orders.
//!
//! Controllers (scripts, bots, language models) speak in loose string tokens
//! such as `"FORWARD_LEFT"` or `"detonate_after:8.5"`. This module converts
//! between that form and the typed [`Orders`] the resolver consumes.
//!
//! Parsing never fails as a whole: an unknown movement becomes `STOP`, an
//! unknown rotation becomes `NONE`, an unknown weapon action keeps the current
//! configuration, and an unreadable projectile entry is dropped.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::world::ids::EntityId;
use crate::world::order::{
    MovementDirection, Orders, ProjectileCommand, ProjectileManeuver, RotationCommand,
    WeaponAction,
};

const DETONATE_PREFIX: &str = "detonate_after";

/// Errors from decoding a single projectile token.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OrderTokenError {
    #[error("invalid projectile id: '{0}'")]
    InvalidProjectileId(String),

    #[error("invalid detonation delay: '{0}'")]
    InvalidDelay(String),

    #[error("unknown projectile action: '{0}'")]
    UnknownAction(String),
}

/// Orders as loose string tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawOrders {
    pub movement: String,
    pub rotation: String,
    pub weapon_action: String,
    /// Projectile id (decimal) to maneuver token or `detonate_after:<seconds>`.
    pub torpedo_orders: BTreeMap<String, String>,
}

impl Default for RawOrders {
    fn default() -> Self {
        format_orders(&Orders::idle())
    }
}

impl RawOrders {
    pub fn new(movement: &str, rotation: &str, weapon_action: &str) -> Self {
        RawOrders {
            movement: movement.to_string(),
            rotation: rotation.to_string(),
            weapon_action: weapon_action.to_string(),
            torpedo_orders: BTreeMap::new(),
        }
    }

    pub fn with_torpedo(mut self, id: &str, action: &str) -> Self {
        self.torpedo_orders.insert(id.to_string(), action.to_string());
        self
    }
}

/// Decodes one projectile action token.
pub fn parse_projectile_action(token: &str) -> Result<ProjectileCommand, OrderTokenError> {
    let token = token.trim();
    if let Some((head, tail)) = token.split_once(':') {
        if head.trim().eq_ignore_ascii_case(DETONATE_PREFIX) {
            let delay: f64 = tail
                .trim()
                .parse()
                .map_err(|_| OrderTokenError::InvalidDelay(tail.trim().to_string()))?;
            return Ok(ProjectileCommand::DetonateAfter(delay));
        }
        return Err(OrderTokenError::UnknownAction(token.to_string()));
    }
    ProjectileManeuver::from_token(token)
        .map(ProjectileCommand::Maneuver)
        .ok_or_else(|| OrderTokenError::UnknownAction(token.to_string()))
}

fn parse_projectile_id(token: &str) -> Result<EntityId, OrderTokenError> {
    token
        .trim()
        .parse::<u32>()
        .map(EntityId)
        .map_err(|_| OrderTokenError::InvalidProjectileId(token.to_string()))
}

/// Converts token orders into typed orders, defaulting anything unrecognised.
pub fn parse_orders(raw: &RawOrders) -> Orders {
    let movement = MovementDirection::from_token(&raw.movement).unwrap_or_else(|| {
        warn!(token = %raw.movement, "unknown movement token, using STOP");
        MovementDirection::Stop
    });

    let rotation = RotationCommand::from_token(&raw.rotation).unwrap_or_else(|| {
        warn!(token = %raw.rotation, "unknown rotation token, using NONE");
        RotationCommand::None
    });

    let weapon = WeaponAction::from_token(&raw.weapon_action).unwrap_or_else(|| {
        warn!(token = %raw.weapon_action, "unknown weapon action, maintaining configuration");
        WeaponAction::Maintain
    });

    let mut orders = Orders::new(movement, rotation, weapon);
    for (id_token, action_token) in &raw.torpedo_orders {
        let parsed = parse_projectile_id(id_token)
            .and_then(|id| parse_projectile_action(action_token).map(|cmd| (id, cmd)));
        match parsed {
            Ok((id, command)) => {
                orders.projectile_commands.insert(id, command);
            }
            Err(err) => warn!(id = %id_token, action = %action_token, "dropping projectile order: {err}"),
        }
    }
    orders
}

/// Converts typed orders back into canonical tokens.
pub fn format_orders(orders: &Orders) -> RawOrders {
    let torpedo_orders = orders
        .projectile_commands
        .iter()
        .map(|(id, command)| {
            let action = match command {
                ProjectileCommand::Maneuver(m) => m.token().to_string(),
                ProjectileCommand::DetonateAfter(delay) => format!("{DETONATE_PREFIX}:{delay}"),
            };
            (id.to_string(), action)
        })
        .collect();

    RawOrders {
        movement: orders.movement.token().to_string(),
        rotation: orders.rotation.token().to_string(),
        weapon_action: orders.weapon.token().to_string(),
        torpedo_orders,
    }
}
