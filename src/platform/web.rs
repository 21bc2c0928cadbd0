//! Browser host binding
//!
//! The page owns the canvas, keyboard/touch listeners and the
//! `requestAnimationFrame` loop; it calls [`WebRace::frame`] once per frame
//! and draws from the JSON snapshot.

use wasm_bindgen::prelude::*;

use super::{init_logging, now_ms};
use crate::settings::RaceConfig;
use crate::sim::{FixedStepper, GameState, InputIntent, LapOutcome, RaceSnapshot, TickInput};

#[wasm_bindgen]
pub struct WebRace {
    state: GameState,
    stepper: FixedStepper,
    input: TickInput,
    last_frame_ms: Option<f64>,
}

#[wasm_bindgen]
impl WebRace {
    /// Create a race, optionally from a JSON config
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WebRace, JsValue> {
        init_logging();
        let config = match config_json {
            Some(json) => {
                RaceConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?
            }
            None => RaceConfig::default(),
        };
        log::info!("Drift Circuit starting...");
        Ok(Self {
            state: GameState::new(config),
            stepper: FixedStepper::new(),
            input: TickInput::default(),
            last_frame_ms: None,
        })
    }

    /// Replace the tuning from JSON; applied at the next start
    pub fn set_config(&mut self, config_json: &str) -> Result<(), JsValue> {
        RaceConfig::from_json(config_json)
            .and_then(|config| self.state.set_config(config))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Queue a start/restart for the next tick
    pub fn start(&mut self) {
        self.input.restart = true;
    }

    pub fn set_input(
        &mut self,
        accelerate: bool,
        brake: bool,
        steer_left: bool,
        steer_right: bool,
        boost: bool,
    ) {
        self.input.player = InputIntent {
            accelerate,
            brake,
            steer_left,
            steer_right,
            boost,
        };
    }

    pub fn set_idle_mode(&mut self, idle: bool) {
        self.input.idle_mode = idle;
    }

    /// Advance by the time since the last frame. Returns true when the race
    /// finished during this frame.
    pub fn frame(&mut self) -> bool {
        let now = now_ms();
        let dt = self
            .last_frame_ms
            .map_or(0.0, |last| ((now - last) / 1000.0) as f32);
        self.last_frame_ms = Some(now);

        self.stepper
            .advance(&mut self.state, &mut self.input, dt, now)
            .iter()
            .any(|r| matches!(r.lap, LapOutcome::Finished { .. }))
    }

    /// Per-frame drawable state as JSON
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&RaceSnapshot::capture(&self.state, now_ms()))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Static track geometry as JSON (fetch once)
    pub fn track_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.track).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
