//! Track geometry and checkpoint queries
//!
//! The circuit is an annulus between two closed polygons. Both rings and the
//! AI waypoint ring are sampled at the same angles, so index `i` of each ring
//! lies on the same ray from the centre.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::polar_to_cartesian;

/// Id of the start/finish checkpoint
pub const START_CHECKPOINT: u8 = 0;

/// Upper bound on checkpoints (progress is a `u32` bitset)
pub const MAX_CHECKPOINTS: usize = 32;

/// Invalid track layout
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackError {
    #[error("ring lengths differ: outer={outer}, inner={inner}, waypoints={waypoints}")]
    RingLengthMismatch {
        outer: usize,
        inner: usize,
        waypoints: usize,
    },
    #[error("boundary rings need at least 3 vertices, got {0}")]
    TooFewVertices(usize),
    #[error("track has no checkpoints")]
    NoCheckpoints,
    #[error("track has {0} checkpoints, at most 32 are supported")]
    TooManyCheckpoints(usize),
}

/// A capture zone that must be visited each lap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Stable id; 0 is the start/finish checkpoint
    pub id: u8,
    pub pos: Vec2,
    /// Angular slot around the track centre
    pub angle: f32,
}

/// Start/finish line across boundary vertex 0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StartLine {
    pub outer: Vec2,
    pub inner: Vec2,
}

/// Result of a checkpoint query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckpointEvent {
    /// Not in range of any uncollected checkpoint
    None,
    /// Collected the checkpoint with this id
    Checkpoint(u8),
    /// Returned to the start checkpoint with every other checkpoint collected
    Lap,
}

/// Per-lap checkpoint state, owned by the race rather than the track
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointProgress {
    passed: u32,
    /// Vehicle was inside the start checkpoint's zone last query
    in_start_zone: bool,
}

impl CheckpointProgress {
    pub fn is_passed(&self, id: u8) -> bool {
        self.passed & (1 << id) != 0
    }

    fn mark(&mut self, id: u8) {
        self.passed |= 1 << id;
    }

    /// Clear all passed flags (lap completion)
    pub fn clear_passed(&mut self) {
        self.passed = 0;
    }

    /// Full reset (race restart)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Every checkpoint other than the start one is collected
    pub fn sectors_complete(&self, checkpoint_count: usize) -> bool {
        (1..checkpoint_count as u8).all(|id| self.is_passed(id))
    }
}

/// Immutable circuit geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub center: Vec2,
    pub outer: Vec<Vec2>,
    pub inner: Vec<Vec2>,
    pub waypoints: Vec<Vec2>,
    pub checkpoints: Vec<Checkpoint>,
    pub start_line: StartLine,
}

impl Default for Track {
    fn default() -> Self {
        Self::generate(Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0))
    }
}

impl Track {
    /// Build the stock three-lobed circuit around `center`
    pub fn generate(center: Vec2) -> Self {
        let mut outer = Vec::with_capacity(TRACK_SAMPLES);
        let mut inner = Vec::with_capacity(TRACK_SAMPLES);
        let mut waypoints = Vec::with_capacity(TRACK_SAMPLES);

        for i in 0..TRACK_SAMPLES {
            let angle = i as f32 / TRACK_SAMPLES as f32 * std::f32::consts::TAU;
            let wobble = (angle * TRACK_LOBES).sin();
            outer.push(polar_to_cartesian(center, OUTER_BASE_RADIUS + wobble * OUTER_WOBBLE, angle));
            inner.push(polar_to_cartesian(center, INNER_BASE_RADIUS + wobble * INNER_WOBBLE, angle));
            waypoints.push(polar_to_cartesian(
                center,
                WAYPOINT_BASE_RADIUS + wobble * WAYPOINT_WOBBLE,
                angle,
            ));
        }

        let checkpoints = (0..CHECKPOINT_COUNT)
            .map(|i| {
                let angle = i as f32 / CHECKPOINT_COUNT as f32 * std::f32::consts::TAU;
                Checkpoint {
                    id: i as u8,
                    pos: polar_to_cartesian(center, CHECKPOINT_RING_RADIUS, angle),
                    angle,
                }
            })
            .collect();

        let start_line = StartLine {
            outer: outer[0],
            inner: inner[0],
        };

        Self {
            center,
            outer,
            inner,
            waypoints,
            checkpoints,
            start_line,
        }
    }

    /// Build a track from explicit rings. Checkpoint ids follow slice order.
    pub fn from_rings(
        center: Vec2,
        outer: Vec<Vec2>,
        inner: Vec<Vec2>,
        waypoints: Vec<Vec2>,
        checkpoints: &[Vec2],
    ) -> Result<Self, TrackError> {
        if outer.len() != inner.len() || outer.len() != waypoints.len() {
            return Err(TrackError::RingLengthMismatch {
                outer: outer.len(),
                inner: inner.len(),
                waypoints: waypoints.len(),
            });
        }
        if outer.len() < 3 {
            return Err(TrackError::TooFewVertices(outer.len()));
        }
        if checkpoints.is_empty() {
            return Err(TrackError::NoCheckpoints);
        }
        if checkpoints.len() > MAX_CHECKPOINTS {
            return Err(TrackError::TooManyCheckpoints(checkpoints.len()));
        }

        let checkpoints = checkpoints
            .iter()
            .enumerate()
            .map(|(i, &pos)| {
                let d = pos - center;
                Checkpoint {
                    id: i as u8,
                    pos,
                    angle: d.y.atan2(d.x),
                }
            })
            .collect();
        let start_line = StartLine {
            outer: outer[0],
            inner: inner[0],
        };

        Ok(Self {
            center,
            outer,
            inner,
            waypoints,
            checkpoints,
            start_line,
        })
    }

    /// Inside the outer ring and outside the inner ring
    pub fn is_on_track(&self, point: Vec2) -> bool {
        point_in_polygon(point, &self.outer) && !point_in_polygon(point, &self.inner)
    }

    /// Where vehicles line up on (re)start
    pub fn start_position(&self) -> Vec2 {
        self.waypoints[0]
    }

    /// Collect the first in-range checkpoint for a vehicle at `pos`.
    ///
    /// Checkpoints are scanned in id order. Non-start checkpoints latch on
    /// their passed flag. The start checkpoint only reacts when the vehicle
    /// enters its zone: with all others collected that entry is a lap (all
    /// flags clear), otherwise it is marked like any other checkpoint.
    pub fn check_checkpoint(&self, progress: &mut CheckpointProgress, pos: Vec2) -> CheckpointEvent {
        let mut entered_start = false;
        if let Some(start) = self.checkpoints.iter().find(|c| c.id == START_CHECKPOINT) {
            let inside = pos.distance(start.pos) < CHECKPOINT_CAPTURE_RADIUS;
            entered_start = inside && !progress.in_start_zone;
            progress.in_start_zone = inside;
        }

        for checkpoint in &self.checkpoints {
            if pos.distance(checkpoint.pos) >= CHECKPOINT_CAPTURE_RADIUS {
                continue;
            }

            if checkpoint.id == START_CHECKPOINT {
                if !entered_start {
                    continue;
                }
                if progress.sectors_complete(self.checkpoints.len()) {
                    progress.clear_passed();
                    return CheckpointEvent::Lap;
                }
                if progress.is_passed(START_CHECKPOINT) {
                    continue;
                }
            } else if progress.is_passed(checkpoint.id) {
                continue;
            }

            progress.mark(checkpoint.id);
            return CheckpointEvent::Checkpoint(checkpoint.id);
        }

        CheckpointEvent::None
    }
}

/// Even-odd ray cast against a closed polygon.
///
/// Uses the half-open edge rule, so a point on a left or bottom edge counts
/// as inside and a point on a right or top edge as outside.
pub fn point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    let mut inside = false;
    let mut j = polygon.len().wrapping_sub(1);
    for (i, &a) in polygon.iter().enumerate() {
        let b = polygon[j];
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn square(half: f32) -> Vec<Vec2> {
        vec![
            Vec2::new(-half, -half),
            Vec2::new(half, -half),
            Vec2::new(half, half),
            Vec2::new(-half, half),
        ]
    }

    /// Visit every non-start checkpoint, then the start one
    fn drive_sectors(track: &Track, progress: &mut CheckpointProgress) -> Vec<CheckpointEvent> {
        let mut events = Vec::new();
        for id in 1..track.checkpoints.len() {
            events.push(track.check_checkpoint(progress, track.checkpoints[id].pos));
        }
        events.push(track.check_checkpoint(progress, track.checkpoints[0].pos));
        events
    }

    #[test]
    fn test_generated_rings_are_aligned() {
        let track = Track::default();
        assert_eq!(track.outer.len(), TRACK_SAMPLES);
        assert_eq!(track.inner.len(), TRACK_SAMPLES);
        assert_eq!(track.waypoints.len(), TRACK_SAMPLES);
        assert_eq!(track.checkpoints.len(), CHECKPOINT_COUNT);
        for i in 0..TRACK_SAMPLES {
            let o = (track.outer[i] - track.center).normalize();
            let n = (track.inner[i] - track.center).normalize();
            let w = (track.waypoints[i] - track.center).normalize();
            assert!(o.distance(n) < 1e-4);
            assert!(o.distance(w) < 1e-4);
        }
    }

    #[test]
    fn test_start_line_collocated_with_checkpoint_zero() {
        let track = Track::default();
        assert_eq!(track.start_line.outer, track.outer[0]);
        assert_eq!(track.start_line.inner, track.inner[0]);
        let cp0 = track.checkpoints[0];
        assert_eq!(cp0.id, START_CHECKPOINT);
        // Both on the ray at angle 0
        assert!((cp0.pos.y - track.center.y).abs() < 1e-3);
        assert!((track.start_line.outer.y - track.center.y).abs() < 1e-3);
    }

    #[test]
    fn test_is_on_track_annulus() {
        let track = Track::default();
        // Hole in the middle
        assert!(!track.is_on_track(track.center));
        // Far outside
        assert!(!track.is_on_track(Vec2::new(-5000.0, -5000.0)));
        // Racing line and checkpoints are on the tarmac
        for w in &track.waypoints {
            assert!(track.is_on_track(*w));
        }
        for c in &track.checkpoints {
            assert!(track.is_on_track(c.pos));
        }
    }

    #[test]
    fn test_point_in_square() {
        let poly = square(10.0);
        assert!(point_in_polygon(Vec2::ZERO, &poly));
        assert!(point_in_polygon(Vec2::new(9.9, -9.9), &poly));
        assert!(!point_in_polygon(Vec2::new(10.1, 0.0), &poly));
        assert!(!point_in_polygon(Vec2::new(0.0, 20.0), &poly));
        // Half-open edges: left edge in, right edge out
        assert!(point_in_polygon(Vec2::new(-10.0, 0.0), &poly));
        assert!(!point_in_polygon(Vec2::new(10.0, 0.0), &poly));
    }

    #[test]
    fn test_point_in_empty_polygon() {
        assert!(!point_in_polygon(Vec2::ZERO, &[]));
    }

    #[test]
    fn test_from_rings_rejects_mismatch() {
        let err = Track::from_rings(
            Vec2::ZERO,
            square(100.0),
            square(50.0),
            vec![Vec2::ZERO; 3],
            &[Vec2::new(75.0, 0.0)],
        )
        .unwrap_err();
        assert_eq!(
            err,
            TrackError::RingLengthMismatch {
                outer: 4,
                inner: 4,
                waypoints: 3
            }
        );
    }

    #[test]
    fn test_from_rings_rejects_degenerate() {
        let err = Track::from_rings(
            Vec2::ZERO,
            vec![Vec2::ZERO; 2],
            vec![Vec2::ZERO; 2],
            vec![Vec2::ZERO; 2],
            &[Vec2::ZERO],
        )
        .unwrap_err();
        assert_eq!(err, TrackError::TooFewVertices(2));

        let err =
            Track::from_rings(Vec2::ZERO, square(100.0), square(50.0), square(75.0), &[]).unwrap_err();
        assert_eq!(err, TrackError::NoCheckpoints);
    }

    #[test]
    fn test_lap_after_all_sectors() {
        let track = Track::default();
        let mut progress = CheckpointProgress::default();
        let events = drive_sectors(&track, &mut progress);
        assert_eq!(
            events,
            vec![
                CheckpointEvent::Checkpoint(1),
                CheckpointEvent::Checkpoint(2),
                CheckpointEvent::Checkpoint(3),
                CheckpointEvent::Lap,
            ]
        );
        // Flags cleared for the next lap
        assert!(!progress.is_passed(1));
        assert!(!progress.is_passed(0));
    }

    #[test]
    fn test_start_first_is_not_a_lap() {
        let track = Track::default();
        let mut progress = CheckpointProgress::default();
        let cp0 = track.checkpoints[0].pos;
        assert_eq!(track.check_checkpoint(&mut progress, cp0), CheckpointEvent::Checkpoint(0));
        assert!(progress.is_passed(0));
        // Sitting in the zone does nothing more
        assert_eq!(track.check_checkpoint(&mut progress, cp0), CheckpointEvent::None);
    }

    #[test]
    fn test_lap_fires_after_early_start_touch() {
        // Vehicles line up inside the start zone
        let track = Track::default();
        let mut progress = CheckpointProgress::default();
        let cp0 = track.checkpoints[0].pos;
        track.check_checkpoint(&mut progress, cp0);
        let events = drive_sectors(&track, &mut progress);
        assert_eq!(events.iter().filter(|e| **e == CheckpointEvent::Lap).count(), 1);
        assert_eq!(events.last(), Some(&CheckpointEvent::Lap));
    }

    #[test]
    fn test_lap_fires_once_while_lingering() {
        let track = Track::default();
        let mut progress = CheckpointProgress::default();
        drive_sectors(&track, &mut progress);
        let cp0 = track.checkpoints[0].pos;
        for _ in 0..10 {
            assert_ne!(track.check_checkpoint(&mut progress, cp0), CheckpointEvent::Lap);
        }
    }

    #[test]
    fn test_sector_checkpoint_latches() {
        let track = Track::default();
        let mut progress = CheckpointProgress::default();
        let cp2 = track.checkpoints[2].pos;
        assert_eq!(track.check_checkpoint(&mut progress, cp2), CheckpointEvent::Checkpoint(2));
        assert_eq!(track.check_checkpoint(&mut progress, cp2), CheckpointEvent::None);
    }

    #[test]
    fn test_out_of_range_is_none() {
        let track = Track::default();
        let mut progress = CheckpointProgress::default();
        let far = track.checkpoints[1].pos + Vec2::new(CHECKPOINT_CAPTURE_RADIUS + 1.0, 0.0);
        assert_eq!(track.check_checkpoint(&mut progress, far), CheckpointEvent::None);
        assert_eq!(track.check_checkpoint(&mut progress, track.center), CheckpointEvent::None);
    }

    proptest! {
        #[test]
        fn prop_center_hole_and_far_field(x in -4000.0f32..4000.0, y in -4000.0f32..4000.0) {
            let track = Track::default();
            let p = Vec2::new(x, y);
            let dist = p.distance(track.center);
            // Inside the smallest inner radius, or beyond the largest outer one
            if dist < INNER_BASE_RADIUS - INNER_WOBBLE - 1.0 || dist > OUTER_BASE_RADIUS + OUTER_WOBBLE + 1.0 {
                prop_assert!(!track.is_on_track(p));
            }
        }
    }
}
