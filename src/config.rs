//! Game configuration.
//!
//! Every tunable constant lives here as one immutable value that is passed
//! explicitly into the resolver. Configs are read from JSON, checked field by
//! field, and rejected with a list of every problem found.

use std::f64::consts::PI;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::world::order::{MovementDirection, ProjectileManeuver, RotationCommand, WeaponMode};

/// Relative tolerance for "interval is a whole number of substeps".
const SUBSTEP_FIT_TOLERANCE: f64 = 1e-9;

/// Errors that can occur while loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config json at {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid configuration:\n{}", list_problems(.0))]
    Invalid(Vec<String>),
}

fn list_problems(problems: &[String]) -> String {
    problems
        .iter()
        .map(|p| format!("  - {p}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Simulation timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    /// Length of one decision interval in seconds.
    pub decision_interval_seconds: f64,
    /// Length of one substep in seconds.
    pub physics_tick_rate_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShipConfig {
    pub starting_shields: f64,
    pub max_shields: f64,
    pub starting_energy: f64,
    pub max_energy: f64,
    pub energy_regen_per_second: f64,
    pub base_speed_units_per_second: f64,
}

/// Energy burned per second by each movement direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MovementConfig {
    pub forward_ae_per_second: f64,
    pub forward_diagonal_ae_per_second: f64,
    pub lateral_ae_per_second: f64,
    pub backward_ae_per_second: f64,
    pub backward_diagonal_ae_per_second: f64,
    pub stop_ae_per_second: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RotationConfig {
    pub none_ae_per_second: f64,
    pub soft_turn_ae_per_second: f64,
    pub soft_turn_degrees_per_second: f64,
    pub hard_turn_ae_per_second: f64,
    pub hard_turn_degrees_per_second: f64,
}

/// Parameters of one weapon mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeaponModeConfig {
    /// Full firing arc, centred on the heading.
    pub arc_degrees: f64,
    pub range_units: f64,
    pub damage: f64,
    pub cooldown_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeaponConfig {
    pub wide: WeaponModeConfig,
    pub focused: WeaponModeConfig,
    pub reconfiguration_time_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectileConfig {
    pub launch_cost_ae: f64,
    pub fuel_capacity: f64,
    pub speed_units_per_second: f64,
    pub hard_turn_degrees_per_second: f64,
    pub soft_turn_degrees_per_second: f64,
    pub max_active_per_ship: usize,
    pub burn_straight_per_second: f64,
    pub burn_soft_turn_per_second: f64,
    pub burn_hard_turn_per_second: f64,
    pub blast_expansion_seconds: f64,
    pub blast_persistence_seconds: f64,
    pub blast_dissipation_seconds: f64,
    pub blast_radius_units: f64,
    pub blast_damage_multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArenaConfig {
    pub width_units: f64,
    pub height_units: f64,
    pub spawn_distance_units: f64,
}

/// Complete game configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub ship: ShipConfig,
    pub movement: MovementConfig,
    pub rotation: RotationConfig,
    pub weapon: WeaponConfig,
    pub projectile: ProjectileConfig,
    pub arena: ArenaConfig,
}

impl Default for Config {
    /// The reference balance: 15 s decisions integrated at 0.1 s.
    fn default() -> Self {
        Config {
            simulation: SimulationConfig {
                decision_interval_seconds: 15.0,
                physics_tick_rate_seconds: 0.1,
            },
            ship: ShipConfig {
                starting_shields: 100.0,
                max_shields: 100.0,
                starting_energy: 100.0,
                max_energy: 100.0,
                energy_regen_per_second: 0.333,
                base_speed_units_per_second: 3.0,
            },
            movement: MovementConfig {
                forward_ae_per_second: 0.33,
                forward_diagonal_ae_per_second: 0.53,
                lateral_ae_per_second: 0.67,
                backward_ae_per_second: 0.67,
                backward_diagonal_ae_per_second: 0.80,
                stop_ae_per_second: 0.0,
            },
            rotation: RotationConfig {
                none_ae_per_second: 0.0,
                soft_turn_ae_per_second: 0.13,
                soft_turn_degrees_per_second: 1.0,
                hard_turn_ae_per_second: 0.33,
                hard_turn_degrees_per_second: 3.0,
            },
            weapon: WeaponConfig {
                wide: WeaponModeConfig {
                    arc_degrees: 90.0,
                    range_units: 30.0,
                    damage: 15.0,
                    cooldown_seconds: 3.5,
                },
                focused: WeaponModeConfig {
                    arc_degrees: 10.0,
                    range_units: 50.0,
                    damage: 35.0,
                    cooldown_seconds: 3.5,
                },
                reconfiguration_time_seconds: 15.0,
            },
            projectile: ProjectileConfig {
                launch_cost_ae: 20.0,
                fuel_capacity: 40.0,
                speed_units_per_second: 4.0,
                hard_turn_degrees_per_second: 3.0,
                soft_turn_degrees_per_second: 1.0,
                max_active_per_ship: 4,
                burn_straight_per_second: 0.30,
                burn_soft_turn_per_second: 0.50,
                burn_hard_turn_per_second: 0.70,
                blast_expansion_seconds: 5.0,
                blast_persistence_seconds: 60.0,
                blast_dissipation_seconds: 5.0,
                blast_radius_units: 15.0,
                blast_damage_multiplier: 1.5,
            },
            arena: ArenaConfig {
                width_units: 1000.0,
                height_units: 500.0,
                spawn_distance_units: 800.0,
            },
        }
    }
}

impl Config {
    /// Reads, parses and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Config::from_json_str(&raw)
    }

    /// Parses and validates a JSON config document.
    pub fn from_json_str(raw: &str) -> Result<Config, ConfigError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let config: Config = serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
            let path = err.path().to_string();
            ConfigError::Parse {
                path: if path.is_empty() { ".".to_string() } else { path },
                message: err.into_inner().to_string(),
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every value range and cross-field rule, reporting all failures.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();
        let mut positive = |name: &str, value: f64| {
            if !(value > 0.0 && value.is_finite()) {
                problems.push(format!("{name} must be > 0 (got: {value})"));
            }
        };

        let sim = &self.simulation;
        positive("simulation.decision_interval_seconds", sim.decision_interval_seconds);
        positive("simulation.physics_tick_rate_seconds", sim.physics_tick_rate_seconds);

        let ship = &self.ship;
        positive("ship.starting_shields", ship.starting_shields);
        positive("ship.max_shields", ship.max_shields);
        positive("ship.starting_energy", ship.starting_energy);
        positive("ship.max_energy", ship.max_energy);
        positive("ship.base_speed_units_per_second", ship.base_speed_units_per_second);

        for (name, mode) in [("wide", &self.weapon.wide), ("focused", &self.weapon.focused)] {
            positive(&format!("weapon.{name}.range_units"), mode.range_units);
            positive(&format!("weapon.{name}.damage"), mode.damage);
        }

        let p = &self.projectile;
        positive("projectile.launch_cost_ae", p.launch_cost_ae);
        positive("projectile.fuel_capacity", p.fuel_capacity);
        positive("projectile.speed_units_per_second", p.speed_units_per_second);
        positive("projectile.blast_expansion_seconds", p.blast_expansion_seconds);
        positive("projectile.blast_persistence_seconds", p.blast_persistence_seconds);
        positive("projectile.blast_dissipation_seconds", p.blast_dissipation_seconds);
        positive("projectile.blast_radius_units", p.blast_radius_units);
        positive("projectile.blast_damage_multiplier", p.blast_damage_multiplier);

        positive("arena.width_units", self.arena.width_units);
        positive("arena.height_units", self.arena.height_units);
        positive("arena.spawn_distance_units", self.arena.spawn_distance_units);

        let mut non_negative = |name: &str, value: f64| {
            if !(value >= 0.0 && value.is_finite()) {
                problems.push(format!("{name} must be >= 0 (got: {value})"));
            }
        };

        non_negative("ship.energy_regen_per_second", ship.energy_regen_per_second);

        let m = &self.movement;
        non_negative("movement.forward_ae_per_second", m.forward_ae_per_second);
        non_negative("movement.forward_diagonal_ae_per_second", m.forward_diagonal_ae_per_second);
        non_negative("movement.lateral_ae_per_second", m.lateral_ae_per_second);
        non_negative("movement.backward_ae_per_second", m.backward_ae_per_second);
        non_negative("movement.backward_diagonal_ae_per_second", m.backward_diagonal_ae_per_second);
        non_negative("movement.stop_ae_per_second", m.stop_ae_per_second);

        let r = &self.rotation;
        non_negative("rotation.none_ae_per_second", r.none_ae_per_second);
        non_negative("rotation.soft_turn_ae_per_second", r.soft_turn_ae_per_second);
        non_negative("rotation.soft_turn_degrees_per_second", r.soft_turn_degrees_per_second);
        non_negative("rotation.hard_turn_ae_per_second", r.hard_turn_ae_per_second);
        non_negative("rotation.hard_turn_degrees_per_second", r.hard_turn_degrees_per_second);

        non_negative("weapon.wide.cooldown_seconds", self.weapon.wide.cooldown_seconds);
        non_negative("weapon.focused.cooldown_seconds", self.weapon.focused.cooldown_seconds);

        non_negative("projectile.hard_turn_degrees_per_second", p.hard_turn_degrees_per_second);
        non_negative("projectile.soft_turn_degrees_per_second", p.soft_turn_degrees_per_second);
        non_negative("projectile.burn_straight_per_second", p.burn_straight_per_second);
        non_negative("projectile.burn_soft_turn_per_second", p.burn_soft_turn_per_second);
        non_negative("projectile.burn_hard_turn_per_second", p.burn_hard_turn_per_second);

        for (name, mode) in [("wide", &self.weapon.wide), ("focused", &self.weapon.focused)] {
            if !(mode.arc_degrees > 0.0 && mode.arc_degrees <= 360.0) {
                problems.push(format!(
                    "weapon.{name}.arc_degrees must be > 0 and <= 360 (got: {})",
                    mode.arc_degrees
                ));
            }
        }

        if sim.physics_tick_rate_seconds > sim.decision_interval_seconds {
            problems.push(format!(
                "simulation.physics_tick_rate_seconds must be <= decision_interval_seconds (got: {} > {})",
                sim.physics_tick_rate_seconds, sim.decision_interval_seconds
            ));
        } else if sim.physics_tick_rate_seconds > 0.0 && sim.decision_interval_seconds > 0.0 {
            let steps = (sim.decision_interval_seconds / sim.physics_tick_rate_seconds).round();
            let covered = steps * sim.physics_tick_rate_seconds;
            if (covered - sim.decision_interval_seconds).abs()
                > SUBSTEP_FIT_TOLERANCE * sim.decision_interval_seconds
            {
                problems.push(format!(
                    "simulation.decision_interval_seconds must be a whole number of ticks (got: {} / {})",
                    sim.decision_interval_seconds, sim.physics_tick_rate_seconds
                ));
            }
        }

        if ship.max_shields < ship.starting_shields {
            problems.push(format!(
                "ship.max_shields must be >= starting_shields (got: {} < {})",
                ship.max_shields, ship.starting_shields
            ));
        }
        if ship.max_energy < ship.starting_energy {
            problems.push(format!(
                "ship.max_energy must be >= starting_energy (got: {} < {})",
                ship.max_energy, ship.starting_energy
            ));
        }

        if self.weapon.reconfiguration_time_seconds != sim.decision_interval_seconds {
            problems.push(format!(
                "weapon.reconfiguration_time_seconds must equal decision_interval_seconds (got: {} != {})",
                self.weapon.reconfiguration_time_seconds, sim.decision_interval_seconds
            ));
        }

        if p.max_active_per_ship == 0 {
            problems.push("projectile.max_active_per_ship must be > 0 (got: 0)".to_string());
        }

        if self.arena.spawn_distance_units > self.arena.width_units {
            problems.push(format!(
                "arena.spawn_distance_units must be <= width_units (got: {} > {})",
                self.arena.spawn_distance_units, self.arena.width_units
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems))
        }
    }

    /// Substep length in seconds.
    pub fn dt(&self) -> f64 {
        self.simulation.physics_tick_rate_seconds
    }

    pub fn decision_interval(&self) -> f64 {
        self.simulation.decision_interval_seconds
    }

    /// Number of substeps per decision interval.
    pub fn substep_count(&self) -> u32 {
        (self.simulation.decision_interval_seconds / self.simulation.physics_tick_rate_seconds)
            .round() as u32
    }

    /// Energy per second burned by a movement direction.
    pub fn movement_cost(&self, movement: MovementDirection) -> f64 {
        let m = &self.movement;
        match movement {
            MovementDirection::Forward => m.forward_ae_per_second,
            MovementDirection::ForwardLeft | MovementDirection::ForwardRight => {
                m.forward_diagonal_ae_per_second
            }
            MovementDirection::Left | MovementDirection::Right => m.lateral_ae_per_second,
            MovementDirection::Backward => m.backward_ae_per_second,
            MovementDirection::BackwardLeft | MovementDirection::BackwardRight => {
                m.backward_diagonal_ae_per_second
            }
            MovementDirection::Stop => m.stop_ae_per_second,
        }
    }

    /// Energy per second burned by a rotation command.
    pub fn rotation_cost(&self, rotation: RotationCommand) -> f64 {
        let r = &self.rotation;
        match rotation {
            RotationCommand::None => r.none_ae_per_second,
            RotationCommand::SoftLeft | RotationCommand::SoftRight => r.soft_turn_ae_per_second,
            RotationCommand::HardLeft | RotationCommand::HardRight => r.hard_turn_ae_per_second,
        }
    }

    /// Signed ship turn rate in radians per second. Left is positive.
    pub fn rotation_rate(&self, rotation: RotationCommand) -> f64 {
        let r = &self.rotation;
        let degrees = match rotation {
            RotationCommand::None => 0.0,
            RotationCommand::SoftLeft => r.soft_turn_degrees_per_second,
            RotationCommand::SoftRight => -r.soft_turn_degrees_per_second,
            RotationCommand::HardLeft => r.hard_turn_degrees_per_second,
            RotationCommand::HardRight => -r.hard_turn_degrees_per_second,
        };
        degrees.to_radians()
    }

    /// Signed projectile turn rate in radians per second.
    pub fn maneuver_rate(&self, maneuver: ProjectileManeuver) -> f64 {
        let p = &self.projectile;
        let degrees = match maneuver {
            ProjectileManeuver::Straight => 0.0,
            ProjectileManeuver::SoftLeft => p.soft_turn_degrees_per_second,
            ProjectileManeuver::SoftRight => -p.soft_turn_degrees_per_second,
            ProjectileManeuver::HardLeft => p.hard_turn_degrees_per_second,
            ProjectileManeuver::HardRight => -p.hard_turn_degrees_per_second,
        };
        degrees.to_radians()
    }

    /// Fuel per second burned by a projectile maneuver.
    pub fn maneuver_burn(&self, maneuver: ProjectileManeuver) -> f64 {
        let p = &self.projectile;
        match maneuver {
            ProjectileManeuver::Straight => p.burn_straight_per_second,
            ProjectileManeuver::SoftLeft | ProjectileManeuver::SoftRight => {
                p.burn_soft_turn_per_second
            }
            ProjectileManeuver::HardLeft | ProjectileManeuver::HardRight => {
                p.burn_hard_turn_per_second
            }
        }
    }

    pub fn weapon_mode(&self, mode: WeaponMode) -> &WeaponModeConfig {
        match mode {
            WeaponMode::Wide => &self.weapon.wide,
            WeaponMode::Focused => &self.weapon.focused,
        }
    }

    /// Half of the mode's firing arc, in radians.
    pub fn half_arc(&self, mode: WeaponMode) -> f64 {
        self.weapon_mode(mode).arc_degrees * PI / 360.0
    }

    /// Age at which a blast zone has fully dissipated.
    pub fn blast_lifetime(&self) -> f64 {
        let p = &self.projectile;
        p.blast_expansion_seconds + p.blast_persistence_seconds + p.blast_dissipation_seconds
    }
}
