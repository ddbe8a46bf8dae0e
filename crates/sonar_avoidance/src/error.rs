//! Error types for sonar construction.

use thiserror::Error;

/// Errors that can occur when constructing or reconstructing a sonar.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SonarError {
  /// Rotation has a NaN/infinite component or is the zero quaternion.
  #[error("Rotation cannot be zero or Infinite/NaN")]
  InvalidRotation,

  /// Inner radius is negative.
  #[error("Inner radius must be non negative, got {0}")]
  NegativeInnerRadius(f32),

  /// Outer radius is zero or negative.
  #[error("Outer radius must be greater than zero, got {0}")]
  NonPositiveOuterRadius(f32),
}

/// Result type for sonar construction.
pub type SonarResult<T> = std::result::Result<T, SonarError>;
