//! Fixed timestep simulation tick
//!
//! Core race loop that advances the simulation one step at a time, in a
//! fixed order: player, opponent, boundary checks, then checkpoints.

use serde::{Deserialize, Serialize};

use super::collision::resolve_track_collision;
use super::race::LapOutcome;
use super::state::GameState;
use super::track::CheckpointEvent;
use super::vehicle::InputIntent;
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Player controls
    pub player: InputIntent,
    /// Start/restart the race (one-shot)
    pub restart: bool,
    /// Idle/demo mode - autopilot drives the player
    pub idle_mode: bool,
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub player_collided: bool,
    pub opponent_collided: bool,
    pub checkpoint: CheckpointEvent,
    pub lap: LapOutcome,
}

impl Default for TickReport {
    fn default() -> Self {
        Self {
            player_collided: false,
            opponent_collided: false,
            checkpoint: CheckpointEvent::None,
            lap: LapOutcome::None,
        }
    }
}

/// Advance the game state by one fixed timestep.
///
/// `now_ms` is the host's wall clock, used only for lap timing.
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64) -> TickReport {
    if input.restart {
        state.start_race(now_ms);
        return TickReport::default();
    }

    // Nothing moves before the start or after the finish
    if !state.race.is_running() {
        return TickReport::default();
    }

    state.time_ticks += 1;

    let player_input = if input.idle_mode {
        state.autopilot.intent(&state.player, &state.track.waypoints)
    } else {
        input.player
    };

    state.player.update(
        &player_input,
        &state.track.waypoints,
        &mut state.race.boost_charges,
    );
    // The opponent ignores intent and never boosts, but shares the signature
    let mut no_charges = 0;
    state.opponent.update(
        &InputIntent::default(),
        &state.track.waypoints,
        &mut no_charges,
    );

    let player_collided = resolve_track_collision(&mut state.player, &state.track);
    let opponent_collided = resolve_track_collision(&mut state.opponent, &state.track);

    let checkpoint = state
        .track
        .check_checkpoint(&mut state.race.checkpoints, state.player.pos);
    let lap = state.race.on_checkpoint(checkpoint, now_ms);

    TickReport {
        player_collided,
        opponent_collided,
        checkpoint,
        lap,
    }
}

/// Decouples simulation rate from presentation rate.
///
/// Frame time accumulates and is drained in whole [`SIM_DT`] steps, capped
/// at [`MAX_SUBSTEPS`] per frame to avoid a spiral of death.
#[derive(Debug, Clone, Default)]
pub struct FixedStepper {
    accumulator: f32,
}

impl FixedStepper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leftover time not yet simulated (seconds)
    pub fn pending(&self) -> f32 {
        self.accumulator
    }

    /// Run as many ticks as `frame_dt` seconds allow.
    ///
    /// One-shot inputs (`restart`) are cleared once a tick has consumed them.
    /// Returns the report of every tick run this frame.
    pub fn advance(
        &mut self,
        state: &mut GameState,
        input: &mut TickInput,
        frame_dt: f32,
        now_ms: f64,
    ) -> Vec<TickReport> {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut reports = Vec::new();
        while self.accumulator >= SIM_DT && (reports.len() as u32) < MAX_SUBSTEPS {
            reports.push(tick(state, input, now_ms));
            self.accumulator -= SIM_DT;
            input.restart = false;
        }
        // Drop time we could not catch up on
        if reports.len() as u32 == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        reports
    }
}
