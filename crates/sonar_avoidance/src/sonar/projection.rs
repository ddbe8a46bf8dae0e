//! Local-space projection helpers.
//!
//! Local space puts the sonar's forward direction on +x. Angles are measured
//! in the local x/z plane, `θ = atan2(z, x)`.

use glam::{Mat3, Quat, Vec2, Vec3};

pub use crate::constants::fold_to_principal_range;

/// Rotation whose local +x axis is `forward`.
///
/// Like a look rotation, except forward is x rather than z. Degenerate input
/// (zero forward, forward parallel to up) yields a non-finite rotation that
/// sonar validation rejects.
#[inline]
pub fn direction_to_rotation(forward: Vec3, up: Vec3) -> Quat {
  let forward = forward.normalize_or_zero();
  let side = up.cross(forward).normalize();
  Quat::from_mat3(&Mat3::from_cols(forward, side.cross(forward), side))
}

/// Rotate a world vector into local space.
#[inline]
pub fn to_local(rotation: Quat, value: Vec3) -> Vec3 {
  rotation.conjugate() * value
}

/// Rotate a local vector into world space.
#[inline]
pub fn to_world(rotation: Quat, value: Vec3) -> Vec3 {
  rotation * value
}

/// Local unit direction for `angle`: `(cos θ, 0, sin θ)`.
#[inline]
pub fn angle_to_direction(angle: f32) -> Vec3 {
  let (sin, cos) = angle.sin_cos();
  Vec3::new(cos, 0.0, sin)
}

/// Local angle of a local direction: `atan2(z, x)`.
#[inline]
pub fn direction_to_angle(direction: Vec3) -> f32 {
  direction.z.atan2(direction.x)
}

/// Local x/z plane coordinates of a local vector.
#[inline]
pub fn planar(value: Vec3) -> Vec2 {
  Vec2::new(value.x, value.z)
}

/// Lift planar coordinates back into local space at height `y`.
#[inline]
pub fn unplanar(value: Vec2, y: f32) -> Vec3 {
  Vec3::new(value.x, y, value.y)
}
