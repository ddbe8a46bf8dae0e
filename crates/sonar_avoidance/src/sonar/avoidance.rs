//! SonarAvoidance - one agent's sonar for one query episode.
//!
//! Wraps a [`SonarTree`] with the geometry it was built for and the three
//! insertion front-ends: raw local wedges, world directions with an angular
//! width, and moving circles.
//!
//! # Lifecycle
//!
//! ```text
//!   with_capacity ──set──► ready ──release──► released
//!                           ▲  │
//!                   new ────┘  └── clear / set (new episode)
//! ```
//!
//! Every operation other than construction debug-asserts the sonar is ready.

use glam::{Quat, Vec2, Vec3};

use super::config::SonarConfig;
use super::node::{NodeHandle, SonarNode};
use super::projection::{
  angle_to_direction, direction_to_angle, fold_to_principal_range, planar, to_local, to_world,
};
use super::tree::{Leaves, SonarTree};
use crate::constants::{DEFAULT_NODE_CAPACITY, FULL_TURN, SONAR_ANGLE};
use crate::error::SonarResult;
use crate::geometry::{moving_circles, Circle, Collision, Line};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lifecycle {
  Unset,
  Ready,
  Released,
}

/// Angular free-space tree positioned in the world.
///
/// Cloning deep-copies the node arena; the copy and the original evolve
/// independently.
#[derive(Clone, Debug)]
pub struct SonarAvoidance {
  config: SonarConfig,
  tree: SonarTree,
  state: Lifecycle,
}

impl SonarAvoidance {
  /// Create a ready sonar.
  ///
  /// # Errors
  /// Returns the first construction argument that fails validation.
  pub fn new(config: SonarConfig) -> SonarResult<Self> {
    let mut sonar = Self::with_capacity(DEFAULT_NODE_CAPACITY);
    sonar.set(config)?;
    Ok(sonar)
  }

  /// Allocate the arena without geometry. Call [`set`](Self::set) before use.
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      config: SonarConfig::UNSET,
      tree: SonarTree::with_capacity(capacity),
      state: Lifecycle::Unset,
    }
  }

  /// Re-validate and store new geometry, then start a new episode.
  ///
  /// On error the sonar is left as it was.
  pub fn set(&mut self, config: SonarConfig) -> SonarResult<()> {
    debug_assert!(
      self.state != Lifecycle::Released,
      "SonarAvoidance::set called after release"
    );
    self.config = config.normalized()?;
    self.tree.clear();
    self.state = Lifecycle::Ready;
    Ok(())
  }

  /// Drop every obstacle and rebuild the 3-node skeleton. Keeps the arena.
  #[track_caller]
  pub fn clear(&mut self) {
    self.check_is_created();
    self.tree.clear();
  }

  /// Free the arena. The sonar can't be used afterwards.
  ///
  /// Releasing twice is a usage error.
  #[track_caller]
  pub fn release(&mut self) {
    debug_assert!(
      self.state != Lifecycle::Released,
      "SonarAvoidance released twice"
    );
    self.tree.release();
    self.state = Lifecycle::Released;
  }

  /// Check if the sonar has geometry and hasn't been released.
  #[inline]
  pub fn is_created(&self) -> bool {
    self.state == Lifecycle::Ready
  }

  // =========================================================================
  // Accessors
  // =========================================================================

  /// Geometry the sonar was last set with (rotation normalized).
  #[inline]
  pub fn config(&self) -> &SonarConfig {
    &self.config
  }

  #[inline]
  pub fn position(&self) -> Vec3 {
    self.config.position
  }

  #[inline]
  pub fn rotation(&self) -> Quat {
    self.config.rotation
  }

  #[inline]
  pub fn inner_radius(&self) -> f32 {
    self.config.inner_radius
  }

  #[inline]
  pub fn outer_radius(&self) -> f32 {
    self.config.outer_radius
  }

  #[inline]
  pub fn speed(&self) -> f32 {
    self.config.speed
  }

  /// Nodes allocated in the arena this episode.
  #[inline]
  pub fn node_count(&self) -> usize {
    self.tree.len()
  }

  /// Node at `handle`.
  #[track_caller]
  pub fn node(&self, handle: NodeHandle) -> &SonarNode {
    self.check_is_created();
    self.tree.node(handle)
  }

  /// Root node. Always internal, spanning the full domain.
  #[track_caller]
  pub fn root(&self) -> &SonarNode {
    self.node(NodeHandle::ROOT)
  }

  /// Leaves in ascending angle order, blocked ones included.
  #[track_caller]
  pub fn leaves(&self) -> Leaves<'_> {
    self.check_is_created();
    self.tree.leaves(NodeHandle::ROOT)
  }

  /// Total free angle in radians.
  #[track_caller]
  pub fn free_measure(&self) -> f32 {
    self.check_is_created();
    self.tree.free_measure()
  }

  // =========================================================================
  // Insertion
  // =========================================================================

  /// Block a local wedge. Must not cross the ±π seam.
  ///
  /// Returns `false` for a zero-length wedge, which changes nothing.
  #[track_caller]
  pub fn insert_wedge(&mut self, wedge: Line) -> bool {
    self.check_is_created();
    if wedge.is_degenerate() {
      #[cfg(feature = "tracing")]
      tracing::trace!(?wedge, "degenerate wedge skipped");
      return false;
    }
    self.tree.insert(NodeHandle::ROOT, wedge);
    true
  }

  /// Block `angular_width` radians centered on a world `direction`.
  ///
  /// A width of a full turn or more blocks everything. Returns `false` when
  /// the direction has no component in the sonar plane or the width isn't
  /// positive.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "sonar::insert_direction"))]
  #[track_caller]
  pub fn insert_direction(&mut self, direction: Vec3, angular_width: f32) -> bool {
    self.check_is_created();
    let local = to_local(self.config.rotation, direction);
    if planar(local) == Vec2::ZERO || !(angular_width > 0.0) {
      #[cfg(feature = "tracing")]
      tracing::trace!(?direction, angular_width, "degenerate direction skipped");
      return false;
    }

    let center = direction_to_angle(local);
    let half = angular_width * 0.5;
    self.insert_range(center - half, center + half)
  }

  /// Block every travel direction that collides with a moving circle.
  ///
  /// `position` and `velocity` are in world space. Returns `false` when no
  /// direction collides within the horizon.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "sonar::insert_moving_circle"))]
  #[track_caller]
  pub fn insert_moving_circle(&mut self, position: Vec3, velocity: Vec3, radius: f32) -> bool {
    match self.obstacle_collision(position, velocity, radius) {
      Some(collision) => self.insert_range(collision.angles.from, collision.angles.to),
      None => false,
    }
  }

  /// Colliding local angle range and contact times of a moving circle,
  /// without touching the tree.
  #[track_caller]
  pub fn obstacle_collision(&self, position: Vec3, velocity: Vec3, radius: f32) -> Option<Collision> {
    self.check_is_created();
    let (obstacle, obstacle_velocity) = self.local_obstacle(position, velocity, radius);
    let agent = Circle::new(Vec2::ZERO, self.config.inner_radius);
    moving_circles(
      &obstacle,
      obstacle_velocity,
      &agent,
      self.config.speed,
      self.config.horizon(),
    )
  }

  /// Obstacle circle and velocity in the sonar plane.
  pub(crate) fn local_obstacle(
    &self,
    position: Vec3,
    velocity: Vec3,
    radius: f32,
  ) -> (Circle, Vec2) {
    let rotation = self.config.rotation;
    let offset = to_local(rotation, position - self.config.position);
    (
      Circle::new(planar(offset), radius),
      planar(to_local(rotation, velocity)),
    )
  }

  /// Insert `[from, to]`, splitting at the seam when the folded range wraps.
  fn insert_range(&mut self, from: f32, to: f32) -> bool {
    if to - from >= FULL_TURN {
      self.tree.insert(NodeHandle::ROOT, Line::new(-SONAR_ANGLE, SONAR_ANGLE));
      return true;
    }

    let from = fold_to_principal_range(from);
    let to = fold_to_principal_range(to);
    if from <= to {
      return self.insert_wedge(Line::new(from, to));
    }

    // Both pieces descend from the root: a range wider than a half turn
    // folds to a `from` below 0 and must reach into the left half too
    #[cfg(feature = "tracing")]
    tracing::trace!(from, to, "wedge split at seam");
    self.tree.insert(NodeHandle::ROOT, Line::new(from, SONAR_ANGLE));
    self.tree.insert(NodeHandle::ROOT, Line::new(-SONAR_ANGLE, to));
    true
  }

  // =========================================================================
  // Queries
  // =========================================================================

  /// Local angle of the open edge closest to straight ahead.
  ///
  /// Always an edge of a free interval, never an interior angle. `None` when
  /// everything is blocked.
  #[track_caller]
  pub fn find_closest_angle(&self) -> Option<f32> {
    self.check_is_created();
    let angle = self.tree.closest_open_angle();
    #[cfg(feature = "tracing")]
    if angle.is_none() {
      tracing::trace!("sonar fully blocked");
    }
    angle
  }

  /// World-space unit direction of [`find_closest_angle`](Self::find_closest_angle).
  #[track_caller]
  pub fn find_closest_direction(&self) -> Option<Vec3> {
    self
      .find_closest_angle()
      .map(|angle| to_world(self.config.rotation, angle_to_direction(angle)))
  }

  #[inline]
  #[track_caller]
  fn check_is_created(&self) {
    debug_assert!(
      self.is_created(),
      "SonarAvoidance used before set() or after release()"
    );
  }
}

#[cfg(test)]
#[path = "avoidance_test.rs"]
mod avoidance_test;
