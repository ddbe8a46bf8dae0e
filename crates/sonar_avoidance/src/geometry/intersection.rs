//! Moving-circle collision.
//!
//! Converts a moving circular obstacle into the contiguous range of travel
//! angles for which an agent, moving at a fixed speed in an unknown direction,
//! would touch it within a horizon.
//!
//! # Velocity Obstacle
//!
//! With `d` the obstacle offset from the agent, `R` the sum of radii and `w`
//! the obstacle velocity relative to the agent, the gap closes when
//! `|d + w t| = R`:
//!
//! ```text
//! (w·w) t² + 2 (d·w) t + (d·d - R²) = 0
//! ```
//!
//! The agent velocity `s (cos θ, sin θ)` sweeps a circle of radius `s`. The
//! directions that collide before `T = horizon / s` are the part of that circle
//! inside the cone toward the obstacle, truncated by the disk `(d / T + v, R / T)`.
//! The switch points between colliding and free directions are the cone edges
//! and the truncation disk crossing the speed circle; every arc between two
//! switch points is classified by testing its midpoint.

use glam::Vec2;
use smallvec::SmallVec;

use super::{Circle, Line};
use crate::constants::{fold_to_principal_range, FULL_TURN, SONAR_ANGLE};

/// Switch points closer than this are treated as one.
const ANGLE_EPSILON: f32 = 1e-6;

/// Colliding travel angles and the contact time bounds over them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collision {
  /// Travel angles that collide. `from` is in `(-π, π]`, `to` may exceed `π`
  /// when the range crosses the seam. Never longer than a full turn.
  pub angles: Line,
  /// Earliest contact time (clamped to 0) and latest separation time over
  /// the colliding directions.
  pub times: Line,
}

/// Contact times of two circles moving at known velocities.
///
/// Returns `(t0, t1)` with `t0 <= t1`, the times at which the circles start
/// and stop touching. Either may be negative (contact in the past). Returns
/// `None` when they never touch. Circles that overlap and don't move relative
/// to each other touch forever.
pub fn moving_circles_with_velocity(
  obstacle: &Circle,
  obstacle_velocity: Vec2,
  agent: &Circle,
  agent_velocity: Vec2,
) -> Option<(f32, f32)> {
  contact_times(
    obstacle.center - agent.center,
    obstacle_velocity - agent_velocity,
    obstacle.radius + agent.radius,
  )
}

/// Range of agent travel angles that collide with a moving obstacle within
/// `horizon` distance of travel.
///
/// `agent_speed` is the scalar speed the agent will travel at in whichever
/// direction it picks. Returns `None` when no direction collides, including
/// a non-positive speed or horizon.
pub fn moving_circles(
  obstacle: &Circle,
  obstacle_velocity: Vec2,
  agent: &Circle,
  agent_speed: f32,
  horizon: f32,
) -> Option<Collision> {
  if !(agent_speed > 0.0) || !(horizon > 0.0) || !agent_speed.is_finite() {
    return None;
  }

  let encounter = Encounter {
    offset: obstacle.center - agent.center,
    obstacle_velocity,
    speed: agent_speed,
    radius: obstacle.radius + agent.radius,
    time_horizon: horizon / agent_speed,
  };
  encounter.colliding_range()
}

fn contact_times(offset: Vec2, velocity: Vec2, radius: f32) -> Option<(f32, f32)> {
  let a = velocity.dot(velocity);
  let b = offset.dot(velocity);
  let c = offset.dot(offset) - radius * radius;

  if a <= 0.0 {
    return (c <= 0.0).then_some((f32::NEG_INFINITY, f32::INFINITY));
  }

  let discriminant = b * b - a * c;
  if discriminant < 0.0 {
    return None;
  }
  let root = discriminant.sqrt();
  Some(((-b - root) / a, (-b + root) / a))
}

/// One obstacle seen from one agent.
struct Encounter {
  offset: Vec2,
  obstacle_velocity: Vec2,
  speed: f32,
  radius: f32,
  time_horizon: f32,
}

/// Arc of travel directions between two consecutive switch points.
struct Arc {
  start: f32,
  end: f32,
  times: Option<(f32, f32)>,
}

impl Encounter {
  #[inline]
  fn overlapping(&self) -> bool {
    self.offset.length_squared() <= self.radius * self.radius
  }

  #[inline]
  fn relative_velocity(&self, angle: f32) -> Vec2 {
    self.obstacle_velocity - Vec2::from_angle(angle) * self.speed
  }

  /// Contact times if travelling at `angle` collides within the horizon.
  ///
  /// Already overlapping circles collide in every direction that closes the
  /// gap further.
  fn collision_at(&self, angle: f32) -> Option<(f32, f32)> {
    let velocity = self.relative_velocity(angle);
    if self.overlapping() {
      if self.offset.dot(velocity) >= 0.0 {
        return None;
      }
      return contact_times(self.offset, velocity, self.radius);
    }

    contact_times(self.offset, velocity, self.radius)
      .filter(|&(t0, t1)| t1 >= 0.0 && t0 <= self.time_horizon)
  }

  /// Angles where `collision_at` may flip, folded to `(-π, π]` and sorted.
  fn switch_angles(&self) -> SmallVec<[f32; 8]> {
    let mut angles = SmallVec::new();
    let distance = self.offset.length();
    let v = self.obstacle_velocity;
    let s = self.speed;

    if self.overlapping() {
      // Closing-speed sign flips where u·d̂ = (v·d̂) / s
      if distance > 0.0 {
        let k = v.dot(self.offset) / (s * distance);
        if k.abs() <= 1.0 {
          let base = angle_of(self.offset);
          let spread = k.acos();
          angles.push(base + spread);
          angles.push(base - spread);
        }
      }
    } else {
      // Cone edges: w = v - s u parallel to an edge direction e
      let approach = -self.offset / distance;
      let half_angle = (self.radius / distance).asin();
      for edge in [half_angle, -half_angle] {
        let e = Vec2::from_angle(edge).rotate(approach);
        let b = v.dot(e);
        let discriminant = b * b - (v.length_squared() - s * s);
        if discriminant < 0.0 {
          continue;
        }
        let root = discriminant.sqrt();
        for lambda in [b - root, b + root] {
          angles.push(angle_of(v - lambda * e));
        }
      }

      // Truncation: contact exactly at the time horizon
      let center = self.offset / self.time_horizon + v;
      let cap_radius = self.radius / self.time_horizon;
      let center_distance = center.length();
      if center_distance > 0.0
        && center_distance <= s + cap_radius
        && center_distance >= (s - cap_radius).abs()
      {
        let cos = (s * s + center_distance * center_distance - cap_radius * cap_radius)
          / (2.0 * s * center_distance);
        let base = angle_of(center);
        let spread = cos.clamp(-1.0, 1.0).acos();
        angles.push(base + spread);
        angles.push(base - spread);
      }
    }

    for angle in angles.iter_mut() {
      *angle = fold_to_principal_range(*angle);
    }
    angles.sort_by(f32::total_cmp);
    angles.dedup_by(|a: &mut f32, b: &mut f32| (*a - *b).abs() <= ANGLE_EPSILON);
    angles
  }

  fn colliding_range(&self) -> Option<Collision> {
    let switches = self.switch_angles();

    if switches.is_empty() {
      return self.collision_at(0.0).map(|times| Collision {
        angles: Line::new(-SONAR_ANGLE, SONAR_ANGLE),
        times: times_line(std::iter::once(times)),
      });
    }

    let count = switches.len();
    let arcs: SmallVec<[Arc; 8]> = (0..count)
      .map(|i| {
        let start = switches[i];
        let end = if i + 1 < count {
          switches[i + 1]
        } else {
          switches[0] + FULL_TURN
        };
        let middle = fold_to_principal_range((start + end) * 0.5);
        Arc {
          start,
          end,
          times: self.collision_at(middle),
        }
      })
      .collect();

    let hits = arcs.iter().filter_map(|arc| arc.times);
    if arcs.iter().all(|arc| arc.times.is_some()) {
      return Some(Collision {
        angles: Line::new(-SONAR_ANGLE, SONAR_ANGLE),
        times: times_line(hits),
      });
    }
    let free = arcs.iter().position(|arc| arc.times.is_none())?;
    if arcs.iter().all(|arc| arc.times.is_none()) {
      return None;
    }

    let angles = enclosing_range(&arcs, free);
    Some(Collision {
      angles,
      times: times_line(hits),
    })
  }
}

/// Smallest contiguous range covering every colliding arc.
///
/// Walks the arcs once around the circle starting right after the free arc
/// at `free`, unwrapping angles so the walk is monotonic, then drops the
/// largest gap between colliding runs.
fn enclosing_range(arcs: &[Arc], free: usize) -> Line {
  let count = arcs.len();
  let mut runs: SmallVec<[Line; 4]> = SmallVec::new();
  let mut open: Option<Line> = None;

  for step in 1..=count {
    let index = (free + step) % count;
    let wrap = if free + step >= count { FULL_TURN } else { 0.0 };
    let arc = &arcs[index];
    let (start, end) = (arc.start + wrap, arc.end + wrap);

    match (arc.times.is_some(), open.as_mut()) {
      (true, Some(run)) => run.to = end,
      (true, None) => open = Some(Line::new(start, end)),
      (false, _) => runs.extend(open.take()),
    }
  }
  runs.extend(open.take());

  // Gap after run j; the last gap wraps around to the first run
  let first = runs[0];
  let last = runs[runs.len() - 1];
  let mut widest = (runs.len() - 1, first.from + FULL_TURN - last.to);
  for j in 0..runs.len() - 1 {
    let gap = runs[j + 1].from - runs[j].to;
    if gap > widest.1 {
      widest = (j, gap);
    }
  }

  let (mut from, mut to) = if widest.0 == runs.len() - 1 {
    (first.from, last.to)
  } else {
    (runs[widest.0 + 1].from, runs[widest.0].to + FULL_TURN)
  };

  while from > SONAR_ANGLE {
    from -= FULL_TURN;
    to -= FULL_TURN;
  }
  while from <= -SONAR_ANGLE {
    from += FULL_TURN;
    to += FULL_TURN;
  }
  Line::new(from, to)
}

fn times_line(times: impl Iterator<Item = (f32, f32)>) -> Line {
  let (enter, exit) = times.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), (t0, t1)| {
    (lo.min(t0), hi.max(t1))
  });
  if enter > exit {
    return Line::point(0.0);
  }
  Line::new(enter.max(0.0), exit.max(0.0))
}

#[inline]
fn angle_of(v: Vec2) -> f32 {
  v.y.atan2(v.x)
}

#[cfg(test)]
#[path = "intersection_test.rs"]
mod intersection_test;
