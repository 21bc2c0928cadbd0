//! Waypoint-chasing drivers
//!
//! The opponent turns at a fixed rate toward the next waypoint, with a small
//! deadband so it does not wobble on the straights. The autopilot uses the
//! same targeting but emits a plain [`InputIntent`], so it can stand in for
//! the player in attract mode.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::vehicle::{InputIntent, Vehicle};
use crate::consts::*;
use crate::normalize_angle;

/// Controls produced by the AI for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiCommand {
    /// -1 turn left, 0 hold, 1 turn right
    pub steer: f32,
    /// Acceleration multiplier
    pub throttle: f32,
    /// Top speed as a fraction of the vehicle's current cap
    pub speed_cap: f32,
}

/// Opponent driver state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiController {
    /// Index of the waypoint being chased
    pub target: usize,
    pub aggressiveness: f32,
    pub speed_cap: f32,
}

impl Default for AiController {
    fn default() -> Self {
        Self::new(AI_AGGRESSIVENESS, AI_SPEED_CAP)
    }
}

impl AiController {
    pub fn new(aggressiveness: f32, speed_cap: f32) -> Self {
        Self {
            target: 0,
            aggressiveness,
            speed_cap,
        }
    }

    pub fn reset(&mut self) {
        self.target = 0;
    }

    /// Pick this tick's controls for a vehicle at `pos` facing `heading`
    pub fn steer(&mut self, pos: Vec2, heading: f32, waypoints: &[Vec2]) -> AiCommand {
        let steer = match heading_error(&mut self.target, pos, heading, waypoints) {
            Some(diff) if diff > AI_STEER_DEADBAND => 1.0,
            Some(diff) if diff < -AI_STEER_DEADBAND => -1.0,
            _ => 0.0,
        };
        AiCommand {
            steer,
            throttle: self.aggressiveness,
            speed_cap: self.speed_cap,
        }
    }
}

/// Signed turn (radians, (-π, π]) from `heading` to the current waypoint.
///
/// Advances `target` (wrapping) once the waypoint is within capture range; the
/// angle for this tick still comes from the waypoint just reached. Returns
/// `None` with no waypoints or when the vehicle sits exactly on the waypoint.
pub fn heading_error(target: &mut usize, pos: Vec2, heading: f32, waypoints: &[Vec2]) -> Option<f32> {
    if waypoints.is_empty() {
        return None;
    }
    *target %= waypoints.len();

    let delta = waypoints[*target] - pos;
    if delta.length() < AI_WAYPOINT_CAPTURE_RADIUS {
        *target = (*target + 1) % waypoints.len();
    }
    if delta == Vec2::ZERO {
        return None;
    }

    Some(normalize_angle(delta.y.atan2(delta.x) - heading))
}

/// Stand-in driver for the player (attract mode)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Autopilot {
    pub target: usize,
}

impl Autopilot {
    /// Turn error beyond which the autopilot brakes at speed
    const BRAKE_ERROR: f32 = 0.6;
    const BRAKE_SPEED: f32 = 5.0;
    /// Only boost when lined up and already quick
    const BOOST_ERROR: f32 = 0.05;
    const BOOST_SPEED: f32 = 6.0;

    pub fn reset(&mut self) {
        self.target = 0;
    }

    pub fn intent(&mut self, vehicle: &Vehicle, waypoints: &[Vec2]) -> InputIntent {
        let Some(diff) = heading_error(&mut self.target, vehicle.pos, vehicle.heading, waypoints)
        else {
            return InputIntent {
                accelerate: true,
                ..Default::default()
            };
        };

        let sharp = diff.abs() > Self::BRAKE_ERROR;
        InputIntent {
            // Keep rolling when slow, or the car cannot turn at all
            accelerate: !sharp || vehicle.speed < Self::BRAKE_SPEED,
            brake: sharp && vehicle.speed > Self::BRAKE_SPEED,
            steer_left: diff < -AI_STEER_DEADBAND,
            steer_right: diff > AI_STEER_DEADBAND,
            boost: diff.abs() < Self::BOOST_ERROR && vehicle.speed > Self::BOOST_SPEED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::VehicleTuning;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn ring() -> Vec<Vec2> {
        vec![
            Vec2::new(200.0, 0.0),
            Vec2::new(0.0, 200.0),
            Vec2::new(-200.0, 0.0),
            Vec2::new(0.0, -200.0),
        ]
    }

    #[test]
    fn test_steers_toward_target() {
        let mut ai = AiController::default();
        // Target dead ahead to the right (angle 0), facing up (-π/2): turn right
        let cmd = ai.steer(Vec2::ZERO, -FRAC_PI_2, &ring());
        assert_eq!(cmd.steer, 1.0);
        // Facing down (π/2): turn left
        let cmd = ai.steer(Vec2::ZERO, FRAC_PI_2, &ring());
        assert_eq!(cmd.steer, -1.0);
    }

    #[test]
    fn test_deadband_holds_course() {
        let mut ai = AiController::default();
        let cmd = ai.steer(Vec2::ZERO, 0.05, &ring());
        assert_eq!(cmd.steer, 0.0);
        assert_eq!(cmd.throttle, AI_AGGRESSIVENESS);
        assert_eq!(cmd.speed_cap, AI_SPEED_CAP);
    }

    #[test]
    fn test_advances_and_wraps_waypoints() {
        let mut target = 3;
        let waypoints = ring();
        let diff = heading_error(&mut target, Vec2::new(0.0, -190.0), 0.0, &waypoints).unwrap();
        assert_eq!(target, 0);
        // Still aimed at (0, -200), the waypoint just reached
        assert!((diff + FRAC_PI_2).abs() < 1e-5);

        // Next tick picks up (200, 0) from (0, -190)
        let diff = heading_error(&mut target, Vec2::new(0.0, -190.0), 0.0, &waypoints).unwrap();
        assert_eq!(target, 0);
        assert!(diff > 0.0 && diff < FRAC_PI_2);
    }

    #[test]
    fn test_capture_tick_keeps_reached_waypoint_heading() {
        let mut ai = AiController::default();
        // Waypoint 0 is 40 units dead ahead
        let cmd = ai.steer(Vec2::new(160.0, 0.0), 0.0, &ring());
        assert_eq!(ai.target, 1);
        assert_eq!(cmd.steer, 0.0);
    }

    #[test]
    fn test_zero_distance_counts_as_arrived() {
        let mut target = 1;
        let waypoints = ring();
        assert!(heading_error(&mut target, waypoints[1], 0.0, &waypoints).is_none());
        assert_eq!(target, 2);

        let diff = heading_error(&mut target, waypoints[1], 0.0, &waypoints).unwrap();
        assert_eq!(target, 2);
        assert!((diff.abs() - PI * 0.75).abs() < 1e-4);
    }

    #[test]
    fn test_out_of_range_target_is_wrapped() {
        let mut target = 17;
        assert!(heading_error(&mut target, Vec2::new(500.0, 500.0), 0.0, &ring()).is_some());
        assert!(target < 4);
    }

    #[test]
    fn test_empty_waypoints() {
        let mut target = 0;
        assert!(heading_error(&mut target, Vec2::ZERO, 0.0, &[]).is_none());
        let mut ai = AiController::default();
        assert_eq!(ai.steer(Vec2::ZERO, 0.0, &[]).steer, 0.0);
    }

    #[test]
    fn test_ai_vehicle_stays_under_cap() {
        let mut car = Vehicle::ai(Vec2::ZERO, VehicleTuning::default(), AiController::default());
        let mut charges = 3;
        for _ in 0..600 {
            car.update(&InputIntent::default(), &ring(), &mut charges);
            assert!(car.speed <= MAX_SPEED * AI_SPEED_CAP);
        }
        assert!(car.speed > MAX_SPEED * AI_SPEED_CAP - 0.1);
        // Never touches the player's boost pool
        assert_eq!(charges, 3);
    }

    #[test]
    fn test_ai_vehicle_progresses_round_ring() {
        // Wide enough that every waypoint sits outside the turning circle
        let waypoints: Vec<Vec2> = ring().iter().map(|p| *p * 5.0).collect();
        let mut car = Vehicle::ai(Vec2::new(900.0, 300.0), VehicleTuning::default(), AiController::default());
        let mut charges = 0;
        let mut visited = std::collections::HashSet::new();
        for _ in 0..3000 {
            car.update(&InputIntent::default(), &waypoints, &mut charges);
            if let crate::sim::Driver::Ai(ai) = &car.driver {
                visited.insert(ai.target);
            }
        }
        assert_eq!(visited.len(), 4);
    }

    #[test]
    fn test_autopilot_intent() {
        let mut pilot = Autopilot::default();
        let mut car = Vehicle::player(Vec2::ZERO, VehicleTuning::default());
        car.heading = -FRAC_PI_2;
        car.speed = 7.0;
        let intent = pilot.intent(&car, &ring());
        assert!(intent.steer_right);
        assert!(!intent.steer_left);
        assert!(intent.brake);

        car.heading = 0.0;
        let intent = pilot.intent(&car, &ring());
        assert!(intent.accelerate);
        assert!(intent.boost);
        assert!(!intent.steer_left && !intent.steer_right);
    }
}
