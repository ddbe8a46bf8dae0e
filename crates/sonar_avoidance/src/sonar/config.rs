//! SonarConfig - geometry a sonar is built from.

use glam::{Quat, Vec3};

use super::projection::direction_to_rotation;
use crate::error::{SonarError, SonarResult};

/// Geometry of one sonar episode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SonarConfig {
  /// World-space position of the sonar.
  pub position: Vec3,

  /// World-from-local rotation. Local +x is forward.
  pub rotation: Quat,

  /// Radius of the agent itself. Obstacles are inflated by it.
  pub inner_radius: f32,

  /// Distance ahead within which obstacles are tracked.
  pub outer_radius: f32,

  /// Speed the agent will travel at, in any direction.
  pub speed: f32,
}

impl SonarConfig {
  /// Placeholder geometry for arenas that haven't been set yet.
  /// Deliberately invalid (zero outer radius).
  pub const UNSET: Self = Self {
    position: Vec3::ZERO,
    rotation: Quat::IDENTITY,
    inner_radius: 0.0,
    outer_radius: 0.0,
    speed: 0.0,
  };

  /// Create a config from an explicit rotation.
  pub fn new(
    position: Vec3,
    rotation: Quat,
    inner_radius: f32,
    outer_radius: f32,
    speed: f32,
  ) -> Self {
    Self {
      position,
      rotation,
      inner_radius,
      outer_radius,
      speed,
    }
  }

  /// Create a config looking along `direction` (forward is local +x, not z).
  pub fn looking_along(
    position: Vec3,
    direction: Vec3,
    up: Vec3,
    inner_radius: f32,
    outer_radius: f32,
    speed: f32,
  ) -> Self {
    Self::new(
      position,
      direction_to_rotation(direction, up),
      inner_radius,
      outer_radius,
      speed,
    )
  }

  /// Check construction arguments.
  pub fn validate(&self) -> SonarResult<()> {
    if !self.rotation.is_finite() || self.rotation.length_squared() <= 0.0 {
      return Err(SonarError::InvalidRotation);
    }
    if !(self.inner_radius >= 0.0) {
      return Err(SonarError::NegativeInnerRadius(self.inner_radius));
    }
    if !(self.outer_radius > 0.0) {
      return Err(SonarError::NonPositiveOuterRadius(self.outer_radius));
    }
    Ok(())
  }

  /// Validated copy with a unit rotation.
  pub(crate) fn normalized(self) -> SonarResult<Self> {
    self.validate()?;
    Ok(Self {
      rotation: self.rotation.normalize(),
      ..self
    })
  }

  /// Combined distance at which an obstacle can still matter.
  #[inline]
  pub fn horizon(&self) -> f32 {
    self.outer_radius + self.inner_radius
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
