//! Deterministic simulation module
//!
//! All racing logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Wall-clock time is passed in, never read
//! - Stable iteration order (checkpoints by id)
//! - No rendering or platform dependencies

pub mod ai;
pub mod collision;
pub mod race;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod track;
pub mod vehicle;

pub use ai::{AiCommand, AiController, Autopilot};
pub use collision::{resolve_track_collision, vehicle_corners};
pub use race::{LapOutcome, RacePhase, RaceState};
pub use snapshot::{RaceSnapshot, format_lap_time, speed_readout};
pub use state::{GameState, START_HEADING};
pub use tick::{FixedStepper, TickInput, TickReport, tick};
pub use track::{
    Checkpoint, CheckpointEvent, CheckpointProgress, START_CHECKPOINT, StartLine, Track,
    TrackError, point_in_polygon,
};
pub use vehicle::{Driver, InputIntent, Role, TrailPoint, Vehicle};
