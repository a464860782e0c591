//! Order types issued once per decision interval.
//!
//! Every command set is a closed enum. Free-form tokens are mapped onto these
//! types at the protocol boundary, so an unknown command cannot reach the
//! resolver.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ids::EntityId;

/// Direction of travel relative to the ship's heading.
///
/// Movement never changes heading; combine with [`RotationCommand`] for
/// independent facing control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementDirection {
    Forward,
    ForwardLeft,
    ForwardRight,
    Left,
    Right,
    Backward,
    BackwardLeft,
    BackwardRight,
    #[default]
    Stop,
}

pub const ALL_MOVEMENTS: [MovementDirection; 9] = [
    MovementDirection::Forward,
    MovementDirection::ForwardLeft,
    MovementDirection::ForwardRight,
    MovementDirection::Left,
    MovementDirection::Right,
    MovementDirection::Backward,
    MovementDirection::BackwardLeft,
    MovementDirection::BackwardRight,
    MovementDirection::Stop,
];

impl MovementDirection {
    /// Velocity offset from heading in degrees. Left is positive.
    pub const fn offset_degrees(self) -> f64 {
        match self {
            MovementDirection::Forward | MovementDirection::Stop => 0.0,
            MovementDirection::ForwardLeft => 45.0,
            MovementDirection::ForwardRight => -45.0,
            MovementDirection::Left => 90.0,
            MovementDirection::Right => -90.0,
            MovementDirection::Backward => 180.0,
            MovementDirection::BackwardLeft => 135.0,
            MovementDirection::BackwardRight => -135.0,
        }
    }

    pub const fn token(self) -> &'static str {
        match self {
            MovementDirection::Forward => "FORWARD",
            MovementDirection::ForwardLeft => "FORWARD_LEFT",
            MovementDirection::ForwardRight => "FORWARD_RIGHT",
            MovementDirection::Left => "LEFT",
            MovementDirection::Right => "RIGHT",
            MovementDirection::Backward => "BACKWARD",
            MovementDirection::BackwardLeft => "BACKWARD_LEFT",
            MovementDirection::BackwardRight => "BACKWARD_RIGHT",
            MovementDirection::Stop => "STOP",
        }
    }

    /// Parses an order token, ignoring ASCII case and surrounding whitespace.
    pub fn from_token(token: &str) -> Option<MovementDirection> {
        let token = token.trim();
        ALL_MOVEMENTS
            .into_iter()
            .find(|m| m.token().eq_ignore_ascii_case(token))
    }
}

/// Heading change command, independent of movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RotationCommand {
    #[default]
    None,
    SoftLeft,
    SoftRight,
    HardLeft,
    HardRight,
}

pub const ALL_ROTATIONS: [RotationCommand; 5] = [
    RotationCommand::None,
    RotationCommand::SoftLeft,
    RotationCommand::SoftRight,
    RotationCommand::HardLeft,
    RotationCommand::HardRight,
];

impl RotationCommand {
    pub const fn token(self) -> &'static str {
        match self {
            RotationCommand::None => "NONE",
            RotationCommand::SoftLeft => "SOFT_LEFT",
            RotationCommand::SoftRight => "SOFT_RIGHT",
            RotationCommand::HardLeft => "HARD_LEFT",
            RotationCommand::HardRight => "HARD_RIGHT",
        }
    }

    pub fn from_token(token: &str) -> Option<RotationCommand> {
        let token = token.trim();
        ALL_ROTATIONS
            .into_iter()
            .find(|r| r.token().eq_ignore_ascii_case(token))
    }
}

/// Directional weapon configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeaponMode {
    /// Broad arc, short range, light damage.
    #[default]
    Wide,
    /// Narrow arc, long range, heavy damage.
    Focused,
}

/// What the ship does with its weapon this interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponAction {
    #[default]
    Maintain,
    Switch(WeaponMode),
    Launch,
}

impl WeaponAction {
    pub const fn token(self) -> &'static str {
        match self {
            WeaponAction::Maintain => "MAINTAIN_CONFIG",
            WeaponAction::Switch(WeaponMode::Wide) => "CONFIGURE_WIDE",
            WeaponAction::Switch(WeaponMode::Focused) => "CONFIGURE_FOCUSED",
            WeaponAction::Launch => "LAUNCH_TORPEDO",
        }
    }

    pub fn from_token(token: &str) -> Option<WeaponAction> {
        let token = token.trim();
        [
            WeaponAction::Maintain,
            WeaponAction::Switch(WeaponMode::Wide),
            WeaponAction::Switch(WeaponMode::Focused),
            WeaponAction::Launch,
        ]
        .into_iter()
        .find(|a| a.token().eq_ignore_ascii_case(token))
    }
}

/// Steering for a projectile during one interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectileManeuver {
    #[default]
    Straight,
    SoftLeft,
    SoftRight,
    HardLeft,
    HardRight,
}

pub const ALL_MANEUVERS: [ProjectileManeuver; 5] = [
    ProjectileManeuver::Straight,
    ProjectileManeuver::SoftLeft,
    ProjectileManeuver::SoftRight,
    ProjectileManeuver::HardLeft,
    ProjectileManeuver::HardRight,
];

impl ProjectileManeuver {
    pub const fn token(self) -> &'static str {
        match self {
            ProjectileManeuver::Straight => "STRAIGHT",
            ProjectileManeuver::SoftLeft => "SOFT_LEFT",
            ProjectileManeuver::SoftRight => "SOFT_RIGHT",
            ProjectileManeuver::HardLeft => "HARD_LEFT",
            ProjectileManeuver::HardRight => "HARD_RIGHT",
        }
    }

    pub fn from_token(token: &str) -> Option<ProjectileManeuver> {
        let token = token.trim();
        ALL_MANEUVERS
            .into_iter()
            .find(|m| m.token().eq_ignore_ascii_case(token))
    }
}

/// A sub-command addressed to one of the ship's own projectiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectileCommand {
    Maneuver(ProjectileManeuver),
    /// Self-destruct after this many seconds into the interval.
    DetonateAfter(f64),
}

/// The full set of commands one ship issues for a decision interval.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Orders {
    pub movement: MovementDirection,
    pub rotation: RotationCommand,
    pub weapon: WeaponAction,
    /// Keyed by projectile id; ordered so iteration is deterministic.
    #[serde(default)]
    pub projectile_commands: BTreeMap<EntityId, ProjectileCommand>,
}

impl Orders {
    /// Holds position: STOP, no rotation, keep weapon mode.
    pub fn idle() -> Self {
        Orders::default()
    }

    pub fn new(movement: MovementDirection, rotation: RotationCommand, weapon: WeaponAction) -> Self {
        Orders {
            movement,
            rotation,
            weapon,
            projectile_commands: BTreeMap::new(),
        }
    }

    pub fn with_projectile(mut self, id: EntityId, command: ProjectileCommand) -> Self {
        self.projectile_commands.insert(id, command);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_tokens_roundtrip() {
        for m in ALL_MOVEMENTS {
            assert_eq!(MovementDirection::from_token(m.token()), Some(m));
        }
        assert_eq!(MovementDirection::from_token("SIDEWAYS"), None);
    }

    #[test]
    fn tokens_ignore_case_and_whitespace() {
        assert_eq!(
            MovementDirection::from_token("  forward_left "),
            Some(MovementDirection::ForwardLeft)
        );
        assert_eq!(
            RotationCommand::from_token("hard_right"),
            Some(RotationCommand::HardRight)
        );
        assert_eq!(
            WeaponAction::from_token("launch_torpedo"),
            Some(WeaponAction::Launch)
        );
    }

    #[test]
    fn weapon_action_tokens() {
        assert_eq!(
            WeaponAction::from_token("CONFIGURE_FOCUSED"),
            Some(WeaponAction::Switch(WeaponMode::Focused))
        );
        assert_eq!(WeaponAction::from_token("FIRE_EVERYTHING"), None);
    }

    #[test]
    fn lateral_offsets_are_mirrored() {
        assert_eq!(
            MovementDirection::Left.offset_degrees(),
            -MovementDirection::Right.offset_degrees()
        );
        assert_eq!(
            MovementDirection::BackwardLeft.offset_degrees(),
            -MovementDirection::BackwardRight.offset_degrees()
        );
    }

    #[test]
    fn idle_orders_are_safe_defaults() {
        let o = Orders::idle();
        assert_eq!(o.movement, MovementDirection::Stop);
        assert_eq!(o.rotation, RotationCommand::None);
        assert_eq!(o.weapon, WeaponAction::Maintain);
        assert!(o.projectile_commands.is_empty());
    }
}
