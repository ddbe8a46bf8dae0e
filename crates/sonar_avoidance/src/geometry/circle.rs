//! Circle - 2D circle in the sonar's local plane.

use glam::Vec2;

/// Circle with center and radius.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Circle {
  /// Center point.
  pub center: Vec2,
  /// Radius (non negative).
  pub radius: f32,
}

impl Circle {
  /// Create a new circle.
  #[inline]
  pub fn new(center: Vec2, radius: f32) -> Self {
    debug_assert!(radius >= 0.0, "Circle radius must be non negative");
    Self { center, radius }
  }

  /// Check if two circles overlap. Touching circles don't.
  #[inline]
  pub fn overlaps(&self, other: &Circle) -> bool {
    let reach = self.radius + other.radius;
    self.center.distance_squared(other.center) < reach * reach
  }
}
