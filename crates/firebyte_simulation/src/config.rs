//! Tunable combat parameters (stats, weapon, timing)
//!
//! Defaults match the shipped prototype. `CombatConfig` can be loaded from a
//! RON file; every config is validated before a model is built from it.
//! Gameplay operations never fail, only construction does.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Construction-time configuration fault
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {field} = {value}: {reason}")]
    InvalidValue {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("failed to parse combat config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("failed to read combat config: {0}")]
    Io(#[from] std::io::Error),
}

fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            value: value as f64,
            reason: "must be finite and > 0",
        })
    }
}

fn require_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            value: value as f64,
            reason: "must be finite and >= 0",
        })
    }
}

/// Shortest accepted regeneration period (seconds)
pub const MIN_REGEN_INTERVAL: f32 = 0.001;

/// Base stats of one actor (level 1 values)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsConfig {
    pub max_health: f32,
    pub max_energy: f32,
    /// Units per second
    pub health_regen_rate: f32,
    /// Units per second
    pub energy_regen_rate: f32,
    pub xp_multiplier: f32,
    /// Regeneration tick period (seconds)
    pub regen_interval: f32,
    /// XP credited to whoever kills this actor
    #[serde(default)]
    pub xp_value: u32,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self::player()
    }
}

impl StatsConfig {
    pub fn player() -> Self {
        Self {
            max_health: 100.0,
            max_energy: 100.0,
            health_regen_rate: 2.0,
            energy_regen_rate: 5.0,
            xp_multiplier: 1.0,
            regen_interval: 0.1,
            xp_value: 0,
        }
    }

    pub fn enemy() -> Self {
        Self {
            xp_value: 50,
            ..Self::player()
        }
    }

    /// Shooting-range targets: no regeneration
    pub fn destructible(max_health: f32) -> Self {
        Self {
            max_health,
            health_regen_rate: 0.0,
            energy_regen_rate: 0.0,
            ..Self::player()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("max_health", self.max_health)?;
        require_positive("max_energy", self.max_energy)?;
        require_non_negative("health_regen_rate", self.health_regen_rate)?;
        require_non_negative("energy_regen_rate", self.energy_regen_rate)?;
        require_positive("xp_multiplier", self.xp_multiplier)?;
        require_positive("regen_interval", self.regen_interval)?;
        if self.regen_interval < MIN_REGEN_INTERVAL {
            return Err(ConfigError::InvalidValue {
                field: "regen_interval",
                value: self.regen_interval as f64,
                reason: "must be >= 0.001",
            });
        }
        Ok(())
    }
}

/// Firearm parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponConfig {
    /// Magazine capacity
    pub max_ammo: u32,
    /// Starting reserve (also restored by `reset_weapon`)
    pub reserve_ammo: u32,
    pub rounds_per_minute: f32,
    pub reload_seconds: f32,
    pub base_damage: f32,
    /// Max ray-cast distance (meters)
    pub range: f32,
    /// Collision layers the shot ray can hit
    pub collision_mask: u32,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self::assault_rifle()
    }
}

impl WeaponConfig {
    pub fn assault_rifle() -> Self {
        Self {
            max_ammo: 30,
            reserve_ammo: 90,
            rounds_per_minute: 600.0,
            reload_seconds: 2.0,
            base_damage: 25.0,
            range: 1000.0,
            collision_mask: 1,
        }
    }

    /// Seconds between two shots
    pub fn fire_interval_seconds(&self) -> f32 {
        60.0 / self.rounds_per_minute
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_ammo == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_ammo",
                value: 0.0,
                reason: "magazine must hold at least one round",
            });
        }
        require_positive("rounds_per_minute", self.rounds_per_minute)?;
        require_positive("reload_seconds", self.reload_seconds)?;
        require_positive("base_damage", self.base_damage)?;
        require_positive("range", self.range)?;
        Ok(())
    }
}

/// Whole combat setup, loadable from `combat.ron`
#[derive(Debug, Clone, PartialEq, Resource, Serialize, Deserialize)]
pub struct CombatConfig {
    pub player_stats: StatsConfig,
    pub enemy_stats: StatsConfig,
    pub weapon: WeaponConfig,
    /// Delay between death and actor removal (death effects window)
    pub death_grace_seconds: f32,
    /// FixedUpdate rate
    pub simulation_hz: f64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            player_stats: StatsConfig::player(),
            enemy_stats: StatsConfig::enemy(),
            weapon: WeaponConfig::assault_rifle(),
            death_grace_seconds: 3.0,
            simulation_hz: 60.0,
        }
    }
}

impl CombatConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.player_stats.validate()?;
        self.enemy_stats.validate()?;
        self.weapon.validate()?;
        require_non_negative("death_grace_seconds", self.death_grace_seconds)?;
        if !(self.simulation_hz.is_finite() && self.simulation_hz > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "simulation_hz",
                value: self.simulation_hz,
                reason: "must be finite and > 0",
            });
        }
        Ok(())
    }

    /// Parse + validate
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    pub fn to_ron_string(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }
}
