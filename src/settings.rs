//! Race and vehicle tuning
//!
//! Defaults reproduce the stock game. Hosts may load overrides from JSON;
//! every field is optional.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Configuration could not be loaded or is out of range
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse race config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid race config: {0}")]
    Invalid(String),
}

/// Per-vehicle handling parameters (all rates are per simulation tick)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleTuning {
    /// Normal top speed
    pub max_speed: f32,
    /// Top speed while boosting
    pub boost_max_speed: f32,
    pub acceleration: f32,
    pub brake_force: f32,
    /// Heading change per tick at low speed (radians)
    pub turn_speed: f32,
    /// Passive speed loss per tick
    pub friction: f32,
    /// Boost duration in ticks
    pub boost_ticks: u32,
    /// Instant speed added on boost
    pub boost_bump: f32,
    /// Body size for collision corners
    pub width: f32,
    pub height: f32,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            max_speed: MAX_SPEED,
            boost_max_speed: BOOST_MAX_SPEED,
            acceleration: ACCELERATION,
            brake_force: BRAKE_FORCE,
            turn_speed: TURN_SPEED,
            friction: FRICTION,
            boost_ticks: BOOST_TICKS,
            boost_bump: BOOST_BUMP,
            width: CAR_WIDTH,
            height: CAR_HEIGHT,
        }
    }
}

/// Race rules and opponent behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    pub total_laps: u32,
    pub starting_boost_charges: u8,
    pub max_boost_charges: u8,
    /// Charges granted at each completed lap
    pub lap_boost_grant: u8,
    /// AI acceleration multiplier
    pub ai_aggressiveness: f32,
    /// AI top speed as a fraction of its max speed
    pub ai_speed_cap: f32,
    pub vehicle: VehicleTuning,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            total_laps: TOTAL_LAPS,
            starting_boost_charges: STARTING_BOOST_CHARGES,
            max_boost_charges: MAX_BOOST_CHARGES,
            lap_boost_grant: LAP_BOOST_GRANT,
            ai_aggressiveness: AI_AGGRESSIVENESS,
            ai_speed_cap: AI_SPEED_CAP,
            vehicle: VehicleTuning::default(),
        }
    }
}

impl RaceConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let v = &self.vehicle;
        if self.total_laps == 0 {
            return Err(ConfigError::Invalid("total_laps must be at least 1".into()));
        }
        if self.starting_boost_charges > self.max_boost_charges {
            return Err(ConfigError::Invalid(format!(
                "starting_boost_charges ({}) exceeds max_boost_charges ({})",
                self.starting_boost_charges, self.max_boost_charges
            )));
        }
        if !(self.ai_speed_cap > 0.0 && self.ai_speed_cap <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "ai_speed_cap must be in (0, 1], got {}",
                self.ai_speed_cap
            )));
        }
        if !(self.ai_aggressiveness > 0.0) {
            return Err(ConfigError::Invalid("ai_aggressiveness must be positive".into()));
        }
        if !(v.max_speed > 0.0) {
            return Err(ConfigError::Invalid("max_speed must be positive".into()));
        }
        if v.boost_max_speed < v.max_speed {
            return Err(ConfigError::Invalid(format!(
                "boost_max_speed ({}) is below max_speed ({})",
                v.boost_max_speed, v.max_speed
            )));
        }
        let rates = [
            ("acceleration", v.acceleration),
            ("brake_force", v.brake_force),
            ("turn_speed", v.turn_speed),
            ("friction", v.friction),
            ("boost_bump", v.boost_bump),
            ("width", v.width),
            ("height", v.height),
        ];
        for (name, value) in rates {
            if !(value >= 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be non-negative")));
            }
        }
        Ok(())
    }
}
