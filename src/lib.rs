//! Drift Circuit - A top-down circuit racer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (vehicle physics, track, laps)
//! - `platform`: Browser/native platform abstraction
//! - `settings`: Data-driven race and vehicle tuning

pub mod platform;
pub mod settings;
pub mod sim;

pub use settings::{ConfigError, RaceConfig, VehicleTuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, physics rates are per tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Play field dimensions; the track is centred in it
    pub const FIELD_WIDTH: f32 = 1200.0;
    pub const FIELD_HEIGHT: f32 = 800.0;

    /// Angular samples per boundary ring
    pub const TRACK_SAMPLES: usize = 12;
    /// Ring wobble frequency (lobes per revolution)
    pub const TRACK_LOBES: f32 = 3.0;
    pub const OUTER_BASE_RADIUS: f32 = 350.0;
    pub const OUTER_WOBBLE: f32 = 50.0;
    pub const INNER_BASE_RADIUS: f32 = 200.0;
    pub const INNER_WOBBLE: f32 = 30.0;
    pub const WAYPOINT_BASE_RADIUS: f32 = 275.0;
    pub const WAYPOINT_WOBBLE: f32 = 40.0;

    /// Checkpoints (evenly spaced, id 0 is start/finish)
    pub const CHECKPOINT_COUNT: usize = 4;
    pub const CHECKPOINT_RING_RADIUS: f32 = 275.0;
    pub const CHECKPOINT_CAPTURE_RADIUS: f32 = 40.0;

    /// Vehicle body
    pub const CAR_WIDTH: f32 = 30.0;
    pub const CAR_HEIGHT: f32 = 50.0;

    /// Vehicle dynamics (per tick)
    pub const MAX_SPEED: f32 = 8.0;
    pub const BOOST_MAX_SPEED: f32 = 12.0;
    pub const ACCELERATION: f32 = 0.15;
    pub const BRAKE_FORCE: f32 = 0.3;
    pub const TURN_SPEED: f32 = 0.05;
    pub const FRICTION: f32 = 0.05;
    /// Turn rate loss at full speed (fraction)
    pub const HIGH_SPEED_TURN_LOSS: f32 = 0.3;
    /// Velocity blend toward heading at full speed
    pub const GRIP: f32 = 0.85;

    /// Drift lean
    pub const DRIFT_SPEED_THRESHOLD: f32 = 4.0;
    pub const DRIFT_BUILD: f32 = 0.1;
    pub const DRIFT_DECAY: f32 = 0.95;

    /// Boost
    pub const BOOST_TICKS: u32 = 60;
    pub const BOOST_BUMP: f32 = 3.0;

    /// Trail history for rendering
    pub const TRAIL_LENGTH: usize = 20;

    /// AI driver
    pub const AI_WAYPOINT_CAPTURE_RADIUS: f32 = 50.0;
    pub const AI_TURN_FACTOR: f32 = 0.8;
    pub const AI_STEER_DEADBAND: f32 = 0.1;
    pub const AI_SPEED_CAP: f32 = 0.85;
    pub const AI_AGGRESSIVENESS: f32 = 0.7;
    /// AI grid slot, left of the player
    pub const AI_START_OFFSET: f32 = 40.0;

    /// Race rules
    pub const TOTAL_LAPS: u32 = 3;
    pub const STARTING_BOOST_CHARGES: u8 = 3;
    pub const MAX_BOOST_CHARGES: u8 = 5;
    pub const LAP_BOOST_GRANT: u8 = 2;

    /// HUD speed readout scale
    pub const SPEED_DISPLAY_SCALE: f32 = 15.0;
}

/// Normalized angle to (-π, π]
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    while angle > PI {
        angle -= TAU;
    }
    while angle <= -PI {
        angle += TAU;
    }
    angle
}

/// Unit vector pointing along a heading (screen space, y down)
#[inline]
pub fn heading_vector(heading: f32) -> Vec2 {
    Vec2::new(heading.cos(), heading.sin())
}

/// Convert polar (r, theta) around `center` to cartesian
#[inline]
pub fn polar_to_cartesian(center: Vec2, r: f32, theta: f32) -> Vec2 {
    center + Vec2::new(r * theta.cos(), r * theta.sin())
}
