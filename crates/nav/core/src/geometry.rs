//! Vector helpers for stepping and turning on the horizontal plane.
//!
//! World space is right-handed with `+Y` up; actors face along `+Z` by default.
use glam::{Quat, Vec3};

/// Moves `current` towards `target` by at most `max_distance`, never overshooting.
pub fn move_towards(current: Vec3, target: Vec3, max_distance: f32) -> Vec3 {
    let delta = target - current;
    let distance = delta.length();
    if distance <= max_distance || distance <= f32::EPSILON {
        return target;
    }
    current + delta / distance * max_distance
}

/// Unit direction from `from` to `to` with the vertical component dropped.
///
/// Returns `Vec3::ZERO` when both points share the same horizontal position.
pub fn horizontal_direction(from: Vec3, to: Vec3) -> Vec3 {
    Vec3::new(to.x - from.x, 0.0, to.z - from.z).normalize_or_zero()
}

/// Rotates `current` towards `target` by at most `max_radians`.
///
/// Both vectors are treated as directions; the result is unit length. Opposite
/// vectors turn around the world up axis.
pub fn rotate_towards(current: Vec3, target: Vec3, max_radians: f32) -> Vec3 {
    let from = current.normalize_or_zero();
    let to = target.normalize_or_zero();
    if from == Vec3::ZERO || to == Vec3::ZERO {
        return to;
    }

    let angle = from.angle_between(to);
    if angle <= max_radians {
        return to;
    }

    let axis = from.cross(to);
    let axis = if axis.length_squared() <= f32::EPSILON {
        Vec3::Y
    } else {
        axis.normalize()
    };
    (Quat::from_axis_angle(axis, max_radians) * from).normalize_or_zero()
}

/// True when `a` and `b` are within `radius` of each other on both horizontal axes.
pub fn within_horizontal_radius(a: Vec3, b: Vec3, radius: f32) -> bool {
    (a.x - b.x).abs() < radius && (a.z - b.z).abs() < radius
}
