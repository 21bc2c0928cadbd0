//! Read-only view handed to the renderer and HUD each frame

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::race::RacePhase;
use super::state::GameState;
use super::vehicle::{Role, TrailPoint, Vehicle};
use crate::consts::SPEED_DISPLAY_SCALE;

/// Drawable vehicle state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleView {
    pub role: Role,
    pub pos: Vec2,
    pub heading: f32,
    pub width: f32,
    pub height: f32,
    pub drift: f32,
    pub boost_active: bool,
    /// Oldest first
    pub trail: Vec<TrailPoint>,
}

impl From<&Vehicle> for VehicleView {
    fn from(v: &Vehicle) -> Self {
        Self {
            role: v.role(),
            pos: v.pos,
            heading: v.heading,
            width: v.tuning.width,
            height: v.tuning.height,
            drift: v.drift,
            boost_active: v.boost_active,
            trail: v.trail.iter().copied().collect(),
        }
    }
}

/// Checkpoint marker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckpointView {
    pub id: u8,
    pub pos: Vec2,
    pub passed: bool,
}

/// HUD values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub phase: RacePhase,
    pub lap: u32,
    pub total_laps: u32,
    pub lap_time_ms: f64,
    pub best_lap_ms: Option<f64>,
    pub boost_charges: u8,
    /// Speedometer readout
    pub speed: u32,
}

/// Everything that changes frame to frame. Static track geometry is read
/// once from [`GameState::track`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceSnapshot {
    pub vehicles: Vec<VehicleView>,
    pub checkpoints: Vec<CheckpointView>,
    pub hud: Hud,
}

impl RaceSnapshot {
    pub fn capture(state: &GameState, now_ms: f64) -> Self {
        let race = &state.race;
        let checkpoints = state
            .track
            .checkpoints
            .iter()
            .map(|c| CheckpointView {
                id: c.id,
                pos: c.pos,
                passed: race.checkpoints.is_passed(c.id),
            })
            .collect();

        Self {
            // Opponent first so the player draws on top
            vehicles: vec![
                VehicleView::from(&state.opponent),
                VehicleView::from(&state.player),
            ],
            checkpoints,
            hud: Hud {
                phase: race.phase,
                lap: race.current_lap,
                total_laps: race.total_laps,
                lap_time_ms: race.current_lap_elapsed(now_ms),
                best_lap_ms: race.best_lap_ms,
                boost_charges: race.boost_charges,
                speed: speed_readout(state.player.speed),
            },
        }
    }
}

/// Speedometer value for a simulation speed
pub fn speed_readout(speed: f32) -> u32 {
    (speed.max(0.0) * SPEED_DISPLAY_SCALE).floor() as u32
}

/// Format a lap time as `m:ss.t`
pub fn format_lap_time(ms: f64) -> String {
    let ms = ms.max(0.0) as u64;
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1000;
    let tenths = (ms % 1000) / 100;
    format!("{minutes}:{seconds:02}.{tenths}")
}
