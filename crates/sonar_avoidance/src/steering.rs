//! Per-agent steering on top of the sonar, and the parallel crowd batch.
//!
//! One query episode per agent and step:
//!
//! 1. Look from the agent toward its destination, seeing no farther than
//!    `min(sonar_radius, distance to destination)`.
//! 2. Insert every other agent as a moving circle.
//! 3. Block a wedge behind the current velocity so the agent doesn't flip
//!    between two equally good sides.
//! 4. Travel along the open edge closest to the destination.
//!
//! Batches read a snapshot of the crowd, steer every agent independently in
//! parallel, then [`integrate`] applies the result.

use glam::Vec3;
use rayon::prelude::*;
use serde::Deserialize;
use web_time::Instant;

use crate::constants::DEFAULT_NODE_CAPACITY;
use crate::sonar::{SonarAvoidance, SonarConfig};

/// Distance added to an agent's stop distance before it counts as arrived.
const STOP_EPSILON: f32 = 0.01;

/// Crowd-wide avoidance tuning.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AvoidanceSettings {
  /// Maximum distance ahead an agent looks for obstacles.
  pub sonar_radius: f32,
  /// Width in degrees of the wedge blocked behind the current velocity.
  pub cut_back_vision_angle: f32,
  /// When fully blocked, keep heading for the destination unless the next
  /// step would run into another agent.
  pub tight_formation: bool,
  /// Agents move in the x/z plane (y up). Otherwise x/y with -z up.
  pub is_3d: bool,
  /// Rate at which velocity converges to the steering impulse, per second.
  pub acceleration: f32,
}

impl AvoidanceSettings {
  pub const DEFAULT: Self = Self {
    sonar_radius: 6.0,
    cut_back_vision_angle: 135.0,
    tight_formation: false,
    is_3d: true,
    acceleration: 8.0,
  };

  /// Up axis of the movement plane.
  #[inline]
  pub fn up(&self) -> Vec3 {
    if self.is_3d {
      Vec3::Y
    } else {
      Vec3::NEG_Z
    }
  }
}

impl Default for AvoidanceSettings {
  fn default() -> Self {
    Self::DEFAULT
  }
}

/// Kinematic state of one agent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentState {
  pub position: Vec3,
  pub velocity: Vec3,
  pub destination: Vec3,
  pub radius: f32,
  /// Travel speed the agent steers at.
  pub speed: f32,
  /// Agent counts as arrived within this distance of its destination.
  pub stop_distance: f32,
  /// Whether the agent avoids others or walks straight through them.
  pub avoid: bool,
}

impl AgentState {
  /// Resting agent with unit speed and half-unit radius.
  pub fn new(position: Vec3, destination: Vec3) -> Self {
    Self {
      position,
      velocity: Vec3::ZERO,
      destination,
      radius: 0.5,
      speed: 1.0,
      stop_distance: 0.2,
      avoid: true,
    }
  }

  /// Check if the agent is close enough to its destination to stop.
  #[inline]
  pub fn is_stopped(&self) -> bool {
    self.position.distance(self.destination) < self.stop_distance + STOP_EPSILON
  }

  /// Unit direction to the destination, zero when already there.
  #[inline]
  pub fn desired_direction(&self) -> Vec3 {
    (self.destination - self.position).normalize_or_zero()
  }
}

/// Steering result for one agent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Steering {
  /// Velocity the agent wants to reach.
  pub impulse: Vec3,
  /// Sonar nodes allocated to reach the decision. 0 without a sonar.
  pub node_count: usize,
  /// Every direction was blocked.
  pub blocked: bool,
}

/// Impulse for an agent that doesn't avoid: straight at the destination,
/// zero once stopped.
pub fn desired_impulse(agent: &AgentState) -> Vec3 {
  if agent.is_stopped() || !(agent.speed > 0.0) {
    return Vec3::ZERO;
  }
  agent.desired_direction() * agent.speed
}

/// Run one sonar episode for `agents[agent_index]` against every other agent.
///
/// # Panics
/// Panics if `agent_index` is out of bounds.
pub fn avoid(
  agent_index: usize,
  agents: &[AgentState],
  settings: &AvoidanceSettings,
  delta_time: f32,
) -> Steering {
  let mut sonar = SonarAvoidance::with_capacity(DEFAULT_NODE_CAPACITY);
  let steering = avoid_with(&mut sonar, agent_index, agents, settings, delta_time);
  sonar.release();
  steering
}

/// Steer `agents[agent_index]`: avoid when it wants to, head straight for
/// the destination otherwise.
pub fn steer(
  agent_index: usize,
  agents: &[AgentState],
  settings: &AvoidanceSettings,
  delta_time: f32,
) -> Steering {
  let mut sonar = SonarAvoidance::with_capacity(DEFAULT_NODE_CAPACITY);
  let steering = steer_with(&mut sonar, agent_index, agents, settings, delta_time);
  sonar.release();
  steering
}

/// Steering for a whole crowd.
#[derive(Clone, Debug, Default)]
pub struct BatchOutput {
  /// One entry per agent, same order as the input.
  pub steering: Vec<Steering>,
  /// Wall time of the batch in microseconds.
  pub batch_time_us: u64,
}

impl BatchOutput {
  /// Sonar nodes allocated across the batch.
  pub fn node_count(&self) -> usize {
    self.steering.iter().map(|s| s.node_count).sum()
  }

  /// Agents whose sonar was fully blocked.
  pub fn blocked_count(&self) -> usize {
    self.steering.iter().filter(|s| s.blocked).count()
  }
}

/// Steer every agent in parallel against the same snapshot.
///
/// Each rayon worker reuses one sonar arena across the agents it handles.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "steering::avoid_batch"))]
pub fn avoid_batch(
  agents: &[AgentState],
  settings: &AvoidanceSettings,
  delta_time: f32,
) -> BatchOutput {
  let start = Instant::now();

  let steering: Vec<Steering> = (0..agents.len())
    .into_par_iter()
    .map_init(
      || SonarAvoidance::with_capacity(DEFAULT_NODE_CAPACITY),
      |sonar, index| steer_with(sonar, index, agents, settings, delta_time),
    )
    .collect();

  let batch_time_us = start.elapsed().as_micros() as u64;

  #[cfg(feature = "tracing")]
  tracing::debug!(
    agents = agents.len(),
    batch_time_us,
    "avoidance batch complete"
  );

  BatchOutput {
    steering,
    batch_time_us,
  }
}

/// Advance the crowd by `delta_time` toward the steering impulses.
///
/// Velocity eases toward the impulse at `settings.acceleration`; a step never
/// overshoots the destination.
///
/// # Panics
/// Panics if `steering` is shorter than `agents`.
pub fn integrate(
  agents: &mut [AgentState],
  steering: &[Steering],
  settings: &AvoidanceSettings,
  delta_time: f32,
) {
  assert!(
    steering.len() >= agents.len(),
    "Missing steering for {} agents",
    agents.len() - steering.len()
  );

  for (agent, steering) in agents.iter_mut().zip(steering) {
    if agent.is_stopped() || !(agent.speed > 0.0) {
      agent.velocity = Vec3::ZERO;
      continue;
    }

    let blend = (delta_time * settings.acceleration).clamp(0.0, 1.0);
    agent.velocity = agent.velocity.lerp(steering.impulse, blend);
    if agent.velocity == Vec3::ZERO {
      continue;
    }

    let distance = agent.position.distance(agent.destination);
    agent.position += (agent.velocity * delta_time).clamp_length_max(distance);
  }
}

fn steer_with(
  sonar: &mut SonarAvoidance,
  agent_index: usize,
  agents: &[AgentState],
  settings: &AvoidanceSettings,
  delta_time: f32,
) -> Steering {
  let agent = &agents[agent_index];
  if agent.is_stopped() || !(agent.speed > 0.0) {
    return Steering::default();
  }
  if !agent.avoid {
    return Steering {
      impulse: desired_impulse(agent),
      ..Steering::default()
    };
  }
  avoid_with(sonar, agent_index, agents, settings, delta_time)
}

fn avoid_with(
  sonar: &mut SonarAvoidance,
  agent_index: usize,
  agents: &[AgentState],
  settings: &AvoidanceSettings,
  delta_time: f32,
) -> Steering {
  let agent = &agents[agent_index];
  let desired = agent.desired_direction();
  if desired == Vec3::ZERO {
    return Steering::default();
  }

  // Never look past the destination
  let sonar_radius = settings
    .sonar_radius
    .min(agent.position.distance(agent.destination));
  let current_speed = agent.velocity.length();
  let config = SonarConfig::looking_along(
    agent.position,
    desired,
    settings.up(),
    agent.radius,
    sonar_radius,
    current_speed,
  );
  if let Err(_err) = sonar.set(config) {
    #[cfg(feature = "tracing")]
    tracing::trace!(agent_index, error = %_err, "sonar rejected, heading straight");
    return Steering {
      impulse: desired * agent.speed,
      ..Steering::default()
    };
  }

  // Where the agent would be after one more step straight ahead
  let next_step = agent.position + desired * current_speed * delta_time;
  let (step_circle, _) = sonar.local_obstacle(next_step, Vec3::ZERO, agent.radius);
  let mut desired_occluded = false;

  for (index, other) in agents.iter().enumerate() {
    if index == agent_index {
      continue;
    }
    sonar.insert_moving_circle(other.position, other.velocity, other.radius);

    if settings.tight_formation && !desired_occluded {
      let (other_circle, _) = sonar.local_obstacle(other.position, Vec3::ZERO, other.radius);
      desired_occluded = step_circle.overlaps(&other_circle);
    }
  }

  sonar.insert_direction(
    -agent.velocity.normalize_or_zero(),
    settings.cut_back_vision_angle.to_radians(),
  );

  let found = sonar.find_closest_direction();
  let direction = match found {
    Some(direction) => direction,
    None if settings.tight_formation && !desired_occluded => desired,
    None => Vec3::ZERO,
  };

  Steering {
    impulse: direction * agent.speed,
    node_count: sonar.node_count(),
    blocked: found.is_none(),
  }
}

#[cfg(test)]
#[path = "steering_test.rs"]
mod steering_test;
