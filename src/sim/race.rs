//! Race progression: laps, lap timing and the boost-charge economy
//!
//! Timestamps are host wall-clock milliseconds. The race never reads a clock
//! itself, which keeps it deterministic under test.

use serde::{Deserialize, Serialize};

use super::track::{CheckpointEvent, CheckpointProgress};
use crate::settings::RaceConfig;

/// Current phase of the race
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RacePhase {
    /// Waiting for the start signal
    NotStarted,
    /// Vehicles are racing
    Running,
    /// Final lap done, waiting for a restart
    Finished,
}

/// What a checkpoint result did to the race
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LapOutcome {
    /// Nothing lap-related happened
    None,
    /// A lap was completed and the next one started
    LapCompleted { lap: u32, lap_ms: f64 },
    /// The final lap was completed
    Finished { lap_ms: f64, total_ms: f64 },
}

/// Scalar race state shown to the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceState {
    pub phase: RacePhase,
    /// 1-indexed, never above `total_laps`
    pub current_lap: u32,
    pub total_laps: u32,
    /// Fastest lap from lap 2 onward (ms)
    pub best_lap_ms: Option<f64>,
    pub race_start_ms: f64,
    pub current_lap_start_ms: f64,
    /// Durations of every completed lap (ms), in order
    pub lap_times: Vec<f64>,
    /// Race time at the finish (ms)
    pub total_time_ms: Option<f64>,
    /// Shared boost pool
    pub boost_charges: u8,
    pub max_boost_charges: u8,
    starting_boost_charges: u8,
    lap_boost_grant: u8,
    /// Player's checkpoint flags for the current lap
    pub checkpoints: CheckpointProgress,
}

impl RaceState {
    pub fn new(config: &RaceConfig) -> Self {
        Self {
            phase: RacePhase::NotStarted,
            current_lap: 1,
            total_laps: config.total_laps.max(1),
            best_lap_ms: None,
            race_start_ms: 0.0,
            current_lap_start_ms: 0.0,
            lap_times: Vec::new(),
            total_time_ms: None,
            boost_charges: config.starting_boost_charges.min(config.max_boost_charges),
            max_boost_charges: config.max_boost_charges,
            starting_boost_charges: config.starting_boost_charges,
            lap_boost_grant: config.lap_boost_grant,
            checkpoints: CheckpointProgress::default(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == RacePhase::Running
    }

    /// Reset everything and go green at `now_ms`
    pub fn start(&mut self, now_ms: f64) {
        self.phase = RacePhase::Running;
        self.current_lap = 1;
        self.best_lap_ms = None;
        self.race_start_ms = now_ms;
        self.current_lap_start_ms = now_ms;
        self.lap_times.clear();
        self.total_time_ms = None;
        self.boost_charges = self.starting_boost_charges.min(self.max_boost_charges);
        self.checkpoints.reset();
        log::info!("Race started: {} laps", self.total_laps);
    }

    /// Time on the current lap (ms); frozen at zero outside a running race
    pub fn current_lap_elapsed(&self, now_ms: f64) -> f64 {
        if self.is_running() {
            (now_ms - self.current_lap_start_ms).max(0.0)
        } else {
            0.0
        }
    }

    /// Feed the player's checkpoint result for this tick
    pub fn on_checkpoint(&mut self, event: CheckpointEvent, now_ms: f64) -> LapOutcome {
        match event {
            CheckpointEvent::Lap => self.complete_lap(now_ms),
            CheckpointEvent::Checkpoint(id) => {
                log::debug!("Lap {}: checkpoint {} collected", self.current_lap, id);
                LapOutcome::None
            }
            CheckpointEvent::None => LapOutcome::None,
        }
    }

    fn complete_lap(&mut self, now_ms: f64) -> LapOutcome {
        if !self.is_running() {
            return LapOutcome::None;
        }

        let lap_ms = now_ms - self.current_lap_start_ms;
        self.lap_times.push(lap_ms);

        // Lap 1 includes the standing start, so it never counts as best
        if self.current_lap > 1 && self.best_lap_ms.is_none_or(|best| lap_ms < best) {
            self.best_lap_ms = Some(lap_ms);
        }

        if self.current_lap >= self.total_laps {
            let total_ms = now_ms - self.race_start_ms;
            self.phase = RacePhase::Finished;
            self.total_time_ms = Some(total_ms);
            log::info!(
                "Race complete in {:.1}s, best lap {}",
                total_ms / 1000.0,
                self.best_lap_ms
                    .map_or_else(|| "n/a".to_string(), |b| format!("{:.1}s", b / 1000.0))
            );
            return LapOutcome::Finished { lap_ms, total_ms };
        }

        let lap = self.current_lap;
        self.current_lap += 1;
        self.current_lap_start_ms = now_ms;
        self.boost_charges = self
            .boost_charges
            .saturating_add(self.lap_boost_grant)
            .min(self.max_boost_charges);
        log::info!(
            "Lap {} complete in {:.1}s, {} boost charges",
            lap,
            lap_ms / 1000.0,
            self.boost_charges
        );
        LapOutcome::LapCompleted { lap, lap_ms }
    }
}
