//! Vehicle vs. track boundary
//!
//! Soft collision model: a vehicle with any body corner off the tarmac loses
//! half its speed. Position is never corrected, so staying off track keeps
//! halving the speed every tick.

use glam::Vec2;

use super::track::Track;
use super::vehicle::Vehicle;

/// Speed multiplier applied on a boundary hit
pub const OFF_TRACK_PENALTY: f32 = 0.5;

/// Body corners in world space, rotated about the centre by the heading
pub fn vehicle_corners(vehicle: &Vehicle) -> [Vec2; 4] {
    let half = vehicle.size() / 2.0;
    let rotation = Vec2::from_angle(vehicle.heading);
    [
        Vec2::new(-half.x, -half.y),
        Vec2::new(half.x, -half.y),
        Vec2::new(-half.x, half.y),
        Vec2::new(half.x, half.y),
    ]
    .map(|offset| vehicle.pos + rotation.rotate(offset))
}

/// Apply the off-track penalty. Returns whether the vehicle hit a boundary.
pub fn resolve_track_collision(vehicle: &mut Vehicle, track: &Track) -> bool {
    let off_track = vehicle_corners(vehicle)
        .iter()
        .any(|&corner| !track.is_on_track(corner));
    if off_track {
        vehicle.speed *= OFF_TRACK_PENALTY;
        log::trace!(
            "Boundary hit at ({:.1}, {:.1}), speed now {:.2}",
            vehicle.pos.x,
            vehicle.pos.y,
            vehicle.speed
        );
    }
    off_track
}
