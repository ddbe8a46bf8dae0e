//! Angle domain constants for the sonar tree.
//!
//! # Angle Domain
//!
//! ```text
//!                      +π/2 (local +z)
//!                          │
//!            right half    │    (0, π]
//!                          │
//!   ±π ────────────────────●──────────────────── 0  (local +x, forward)
//!                          │
//!            left half     │    (-π, 0)
//!                          │
//!                      -π/2 (local -z)
//! ```
//!
//! Every interval stored in the tree lives inside `[-π, π]` and never wraps.
//! Obstacles crossing the ±π seam are split before they reach the tree.

use std::f32::consts::PI;

/// Half extent of the angle domain. The root spans `[-SONAR_ANGLE, SONAR_ANGLE]`.
pub const SONAR_ANGLE: f32 = PI;

/// Full turn in radians.
pub const FULL_TURN: f32 = 2.0 * PI;

/// Nodes reserved up front by [`SonarAvoidance::with_capacity`] callers that
/// don't care. Covers the 3-node skeleton plus a handful of splits.
///
/// [`SonarAvoidance::with_capacity`]: crate::sonar::SonarAvoidance::with_capacity
pub const DEFAULT_NODE_CAPACITY: usize = 16;

/// Number of nodes in a freshly cleared tree (root + left + right).
pub const SKELETON_NODE_COUNT: usize = 3;

/// Fold an angle back into `(-π, π]` by adding or subtracting one full turn.
///
/// Obstacles never need more than a single fold.
#[inline]
pub fn fold_to_principal_range(angle: f32) -> f32 {
  if angle > SONAR_ANGLE {
    angle - FULL_TURN
  } else if angle < -SONAR_ANGLE {
    angle + FULL_TURN
  } else {
    angle
  }
}

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
