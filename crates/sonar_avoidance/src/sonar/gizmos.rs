//! Debug drawing hooks.
//!
//! The library never draws anything itself. Callers implement [`DrawArc`] and
//! [`DrawCircle`] on top of whatever immediate-mode gizmo API they have and
//! hand it to [`draw_sonar`] / [`draw_obstacle`].

use glam::{Vec2, Vec3};

use super::avoidance::SonarAvoidance;
use super::projection::{angle_to_direction, to_world, unplanar};
use crate::geometry::{moving_circles_with_velocity, Circle};

/// Straight RGBA color, components in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GizmoColor {
  pub r: f32,
  pub g: f32,
  pub b: f32,
  pub a: f32,
}

impl GizmoColor {
  /// Free interval arcs.
  pub const FREE_SPACE: Self = Self::new(0.0, 1.0, 0.0, 0.2);
  /// Obstacle circles at contact time.
  pub const OBSTACLE: Self = Self::new(1.0, 0.0, 0.0, 0.2);
  /// Agent circles at contact time.
  pub const AGENT: Self = Self::new(0.0, 0.0, 1.0, 0.2);

  pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
    Self { r, g, b, a }
  }
}

/// Solid arc sink.
pub trait DrawArc {
  /// Draw a filled arc around `center`, starting at the unit vector `from`
  /// and sweeping `angle` radians counter-clockwise about `normal`.
  fn draw_arc(
    &mut self,
    center: Vec3,
    normal: Vec3,
    from: Vec3,
    angle: f32,
    radius: f32,
    color: GizmoColor,
  );
}

/// Wire circle sink.
pub trait DrawCircle {
  /// Draw a circle around `center` in the plane orthogonal to `normal`.
  fn draw_circle(&mut self, center: Vec3, normal: Vec3, radius: f32, color: GizmoColor);
}

/// Draw one arc per open leaf at the outer radius.
///
/// Returns the number of arcs drawn.
pub fn draw_sonar(sonar: &SonarAvoidance, drawer: &mut impl DrawArc) -> usize {
  let rotation = sonar.rotation();
  // Angles grow from local +x toward local +z, a counter-clockwise turn about -y
  let normal = to_world(rotation, Vec3::NEG_Y);

  let mut drawn = 0;
  for (_, free) in sonar.leaves().filter(|(_, free)| !free.is_degenerate()) {
    drawer.draw_arc(
      sonar.position(),
      normal,
      to_world(rotation, angle_to_direction(free.from)),
      free.length(),
      sonar.outer_radius(),
      GizmoColor::FREE_SPACE,
    );
    drawn += 1;
  }
  drawn
}

/// Sample `iterations` travel directions across the range a moving circle
/// blocks and draw the obstacle and the agent where they first touch.
///
/// Returns the number of sampled directions that produced a contact.
pub fn draw_obstacle(
  sonar: &SonarAvoidance,
  drawer: &mut impl DrawCircle,
  position: Vec3,
  velocity: Vec3,
  radius: f32,
  iterations: usize,
) -> usize {
  let Some(collision) = sonar.obstacle_collision(position, velocity, radius) else {
    return 0;
  };

  let rotation = sonar.rotation();
  let normal = to_world(rotation, Vec3::Y);
  let (obstacle, obstacle_velocity) = sonar.local_obstacle(position, velocity, radius);
  let agent = Circle::new(Vec2::ZERO, sonar.inner_radius());
  let steps = iterations.max(2);

  let mut drawn = 0;
  for step in 0..steps {
    let angle = collision.angles.from + collision.angles.length() * step as f32 / (steps - 1) as f32;
    let agent_velocity = Vec2::from_angle(angle) * sonar.speed();
    let Some((enter, _)) =
      moving_circles_with_velocity(&obstacle, obstacle_velocity, &agent, agent_velocity)
    else {
      continue;
    };
    let time = if enter.is_finite() { enter.max(0.0) } else { 0.0 };

    let world = |local: Vec2| sonar.position() + to_world(rotation, unplanar(local, 0.0));
    drawer.draw_circle(
      world(obstacle.center + obstacle_velocity * time),
      normal,
      obstacle.radius,
      GizmoColor::OBSTACLE,
    );
    drawer.draw_circle(
      world(agent_velocity * time),
      normal,
      agent.radius,
      GizmoColor::AGENT,
    );
    drawn += 1;
  }
  drawn
}
