//! Vehicle kinematics
//!
//! One vehicle type for both racers. Who produces the per-tick controls is
//! decided by the vehicle's [`Driver`]: the player's intent snapshot or the
//! waypoint-chasing [`AiController`].

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ai::{AiCommand, AiController};
use crate::consts::*;
use crate::heading_vector;
use crate::settings::VehicleTuning;

/// Per-tick control snapshot for a controllable vehicle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputIntent {
    pub accelerate: bool,
    pub brake: bool,
    pub steer_left: bool,
    pub steer_right: bool,
    pub boost: bool,
}

/// Which racer a vehicle is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Player,
    Ai,
}

/// Source of a vehicle's controls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Driver {
    /// Controlled by the host's input snapshot
    Player,
    /// Computer opponent
    Ai(AiController),
}

/// Trail sample for rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub heading: f32,
}

/// A racer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    /// Centre of the body
    pub pos: Vec2,
    /// Radians, screen space (y down); -π/2 faces up
    pub heading: f32,
    /// Scalar speed along the heading, never negative
    pub speed: f32,
    /// Actual motion per tick; lags the heading at speed
    pub vel: Vec2,
    /// Visual lean, 0-1
    pub drift: f32,
    pub boost_active: bool,
    /// Boost ticks remaining
    pub boost_ticks: u32,
    /// Current speed cap (raised while boosting)
    pub max_speed: f32,
    /// Recent poses, oldest first
    pub trail: VecDeque<TrailPoint>,
    pub driver: Driver,
    pub tuning: VehicleTuning,
}

impl Vehicle {
    pub fn new(pos: Vec2, driver: Driver, tuning: VehicleTuning) -> Self {
        Self {
            pos,
            heading: -std::f32::consts::FRAC_PI_2,
            speed: 0.0,
            vel: Vec2::ZERO,
            drift: 0.0,
            boost_active: false,
            boost_ticks: 0,
            max_speed: tuning.max_speed,
            trail: VecDeque::with_capacity(TRAIL_LENGTH + 1),
            driver,
            tuning,
        }
    }

    pub fn player(pos: Vec2, tuning: VehicleTuning) -> Self {
        Self::new(pos, Driver::Player, tuning)
    }

    pub fn ai(pos: Vec2, tuning: VehicleTuning, controller: AiController) -> Self {
        Self::new(pos, Driver::Ai(controller), tuning)
    }

    pub fn role(&self) -> Role {
        match self.driver {
            Driver::Player => Role::Player,
            Driver::Ai(_) => Role::Ai,
        }
    }

    /// Body size (width across, height along the heading axis)
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.tuning.width, self.tuning.height)
    }

    /// Put the vehicle back on the grid, at rest
    pub fn reset(&mut self, pos: Vec2, heading: f32) {
        self.pos = pos;
        self.heading = heading;
        self.speed = 0.0;
        self.vel = Vec2::ZERO;
        self.drift = 0.0;
        self.boost_active = false;
        self.boost_ticks = 0;
        self.max_speed = self.tuning.max_speed;
        self.trail.clear();
        if let Driver::Ai(ai) = &mut self.driver {
            ai.reset();
        }
    }

    /// Advance one tick.
    ///
    /// `input` is only read for the player; AI vehicles steer toward
    /// `waypoints`. Boosting draws from the shared `boost_charges` pool.
    pub fn update(&mut self, input: &InputIntent, waypoints: &[Vec2], boost_charges: &mut u8) {
        let ai_command = match &mut self.driver {
            Driver::Player => None,
            Driver::Ai(ai) => Some(ai.steer(self.pos, self.heading, waypoints)),
        };
        match ai_command {
            Some(command) => self.apply_ai(command),
            None => self.apply_input(input, boost_charges),
        }

        self.integrate();

        if self.speed > 0.0 {
            self.speed = (self.speed - self.tuning.friction).max(0.0);
        }

        if self.boost_active {
            self.boost_ticks = self.boost_ticks.saturating_sub(1);
            if self.boost_ticks == 0 {
                self.boost_active = false;
                self.max_speed = self.tuning.max_speed;
                log::debug!("Boost expired at speed {:.2}", self.speed);
            }
        }

        self.record_trail();
        self.drift *= DRIFT_DECAY;
    }

    fn apply_input(&mut self, input: &InputIntent, boost_charges: &mut u8) {
        if input.accelerate {
            self.speed = (self.speed + self.tuning.acceleration).min(self.max_speed);
        }
        if input.brake {
            self.speed = (self.speed - self.tuning.brake_force).max(0.0);
        }

        // Sharper at low speed, no turning at a standstill
        let turn_multiplier = 1.0 - self.load() * HIGH_SPEED_TURN_LOSS;
        let turn = self.tuning.turn_speed * turn_multiplier * (self.speed / 2.0).min(1.0);

        if input.steer_left {
            self.heading -= turn;
            self.build_drift();
        }
        if input.steer_right {
            self.heading += turn;
            self.build_drift();
        }

        if input.boost {
            self.activate_boost(boost_charges);
        }
    }

    fn apply_ai(&mut self, command: AiCommand) {
        self.heading += command.steer * self.tuning.turn_speed * AI_TURN_FACTOR;
        self.speed = (self.speed + self.tuning.acceleration * command.throttle)
            .min(self.max_speed * command.speed_cap)
            .max(0.0);
    }

    fn build_drift(&mut self) {
        if self.speed > DRIFT_SPEED_THRESHOLD {
            self.drift = (self.drift + DRIFT_BUILD).min(1.0);
        }
    }

    /// Blend velocity toward the heading, then move.
    ///
    /// The blend weakens as speed builds, so a fast vehicle carries its old
    /// direction out of a turn.
    fn integrate(&mut self) {
        let target = heading_vector(self.heading) * self.speed;
        let grip = self.speed_ratio() * GRIP;
        self.vel = self.vel * (1.0 - grip) + target * grip;
        self.pos += self.vel;
    }

    /// Speed as a fraction of the current cap, 0-1
    pub fn speed_ratio(&self) -> f32 {
        self.load().min(1.0)
    }

    /// Speed over the current cap, above 1 while coasting out of a boost
    fn load(&self) -> f32 {
        if self.max_speed <= 0.0 {
            return 0.0;
        }
        self.speed / self.max_speed
    }

    /// Start a boost if a charge is available and none is running.
    /// Returns whether a boost started.
    pub fn activate_boost(&mut self, boost_charges: &mut u8) -> bool {
        if *boost_charges == 0 || self.boost_active {
            return false;
        }
        self.boost_active = true;
        self.boost_ticks = self.tuning.boost_ticks;
        self.max_speed = self.tuning.boost_max_speed;
        self.speed = (self.speed + self.tuning.boost_bump).min(self.max_speed);
        *boost_charges -= 1;
        log::debug!("Boost activated, {} charges left", boost_charges);
        true
    }

    fn record_trail(&mut self) {
        self.trail.push_back(TrailPoint {
            pos: self.pos,
            heading: self.heading,
        });
        while self.trail.len() > TRAIL_LENGTH {
            self.trail.pop_front();
        }
    }
}
