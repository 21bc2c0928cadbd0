//! Game state and core simulation types
//!
//! Everything one race needs lives in [`GameState`]; the tick function is
//! its only writer.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ai::{AiController, Autopilot};
use super::race::RaceState;
use super::track::Track;
use super::vehicle::{Driver, Vehicle};
use crate::consts::*;
use crate::settings::{ConfigError, RaceConfig};

/// Grid heading for both vehicles (facing up the screen)
pub const START_HEADING: f32 = -std::f32::consts::FRAC_PI_2;

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Tuning applied at every race start
    pub config: RaceConfig,
    pub track: Track,
    pub player: Vehicle,
    pub opponent: Vehicle,
    pub race: RaceState,
    /// Drives the player in idle mode
    pub autopilot: Autopilot,
    /// Simulation ticks since the race started
    pub time_ticks: u64,
}

impl GameState {
    /// Stock track with the given tuning
    pub fn new(config: RaceConfig) -> Self {
        Self::with_track(config, Track::default())
    }

    pub fn with_track(config: RaceConfig, track: Track) -> Self {
        let start = track.start_position();
        let player = Vehicle::player(start, config.vehicle.clone());
        let opponent = Vehicle::ai(
            Self::opponent_grid_slot(start),
            config.vehicle.clone(),
            AiController::new(config.ai_aggressiveness, config.ai_speed_cap),
        );
        let race = RaceState::new(&config);

        Self {
            config,
            track,
            player,
            opponent,
            race,
            autopilot: Autopilot::default(),
            time_ticks: 0,
        }
    }

    fn opponent_grid_slot(start: Vec2) -> Vec2 {
        start - Vec2::new(AI_START_OFFSET, 0.0)
    }

    /// Replace the tuning; it takes effect at the next race start
    pub fn set_config(&mut self, config: RaceConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    fn apply_config(&mut self) {
        self.player.tuning = self.config.vehicle.clone();
        self.opponent.tuning = self.config.vehicle.clone();
        if let Driver::Ai(ai) = &mut self.opponent.driver {
            ai.aggressiveness = self.config.ai_aggressiveness;
            ai.speed_cap = self.config.ai_speed_cap;
        }
        self.race = RaceState::new(&self.config);
    }

    /// Start or restart the race at `now_ms`: apply the current config, reset
    /// race state and put both vehicles back on the grid
    pub fn start_race(&mut self, now_ms: f64) {
        self.apply_config();
        let start = self.track.start_position();
        self.player.reset(start, START_HEADING);
        self.opponent
            .reset(Self::opponent_grid_slot(start), START_HEADING);
        self.autopilot.reset();
        self.race.start(now_ms);
        self.time_ticks = 0;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(RaceConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::VehicleTuning;
    use crate::sim::{RacePhase, Role};

    #[test]
    fn test_initial_grid() {
        let state = GameState::default();
        assert_eq!(state.player.role(), Role::Player);
        assert_eq!(state.opponent.role(), Role::Ai);
        assert_eq!(state.player.pos, state.track.waypoints[0]);
        assert_eq!(state.opponent.pos, state.track.waypoints[0] - Vec2::new(40.0, 0.0));
        assert_eq!(state.race.phase, RacePhase::NotStarted);
    }

    #[test]
    fn test_start_race_repositions_vehicles() {
        let mut state = GameState::default();
        state.player.pos = Vec2::new(1.0, 2.0);
        state.player.speed = 5.0;
        state.player.heading = 1.0;
        state.opponent.pos = Vec2::new(3.0, 4.0);
        state.opponent.speed = 6.0;

        state.start_race(500.0);

        assert_eq!(state.player.pos, state.track.start_position());
        assert_eq!(state.player.heading, START_HEADING);
        assert_eq!(state.player.speed, 0.0);
        assert_eq!(state.opponent.speed, 0.0);
        assert_eq!(state.opponent.heading, START_HEADING);
        assert_eq!(state.race.phase, RacePhase::Running);
        assert_eq!(state.race.current_lap_start_ms, 500.0);
    }

    #[test]
    fn test_config_applies_at_next_start() {
        let mut state = GameState::default();
        state.start_race(0.0);

        let config = RaceConfig {
            total_laps: 5,
            ai_speed_cap: 0.5,
            vehicle: VehicleTuning {
                max_speed: 6.0,
                ..Default::default()
            },
            ..Default::default()
        };
        state.set_config(config).unwrap();
        // Running race keeps its rules until restarted
        assert_eq!(state.race.total_laps, 3);

        state.start_race(100.0);
        assert_eq!(state.race.total_laps, 5);
        assert_eq!(state.player.max_speed, 6.0);
        assert_eq!(state.opponent.tuning.max_speed, 6.0);
        match &state.opponent.driver {
            Driver::Ai(ai) => assert_eq!(ai.speed_cap, 0.5),
            Driver::Player => panic!("opponent lost its AI driver"),
        }
    }

    #[test]
    fn test_set_config_rejects_invalid() {
        let mut state = GameState::default();
        let config = RaceConfig {
            total_laps: 0,
            ..Default::default()
        };
        assert!(state.set_config(config).is_err());
        assert_eq!(state.config, RaceConfig::default());
    }
}
