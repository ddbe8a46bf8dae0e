use std::f32::consts::FRAC_PI_4;

use super::*;

// =========================================================================
// Helpers
// =========================================================================

fn walker(position: Vec3, destination: Vec3, velocity: Vec3) -> AgentState {
  AgentState {
    velocity,
    ..AgentState::new(position, destination)
  }
}

/// Agent surrounded by eight resting agents close enough to block every
/// direction.
fn surrounded() -> Vec<AgentState> {
  let mut agents = vec![walker(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), Vec3::X)];
  for i in 0..8 {
    let (sin, cos) = (i as f32 * FRAC_PI_4).sin_cos();
    let position = Vec3::new(1.2 * cos, 0.0, 1.2 * sin);
    agents.push(AgentState::new(position, position));
  }
  agents
}

fn crowd() -> Vec<AgentState> {
  vec![
    walker(Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 0.0), Vec3::X),
    walker(Vec3::new(4.0, 0.0, 0.3), Vec3::new(-6.0, 0.0, 0.3), Vec3::NEG_X),
    walker(Vec3::new(2.0, 0.0, -3.0), Vec3::new(2.0, 0.0, 5.0), Vec3::Z),
    walker(Vec3::new(-1.0, 0.0, 2.0), Vec3::new(6.0, 0.0, -2.0), Vec3::ZERO),
    AgentState::new(Vec3::new(3.0, 0.0, 1.0), Vec3::new(3.0, 0.0, 1.0)),
    AgentState {
      avoid: false,
      ..walker(Vec3::new(5.0, 0.0, -1.0), Vec3::new(-5.0, 0.0, 1.0), Vec3::NEG_X)
    },
  ]
}

// =========================================================================
// Settings
// =========================================================================

#[test]
fn test_default_settings() {
  let settings = AvoidanceSettings::default();
  assert_eq!(settings, AvoidanceSettings::DEFAULT);
  assert_eq!(settings.sonar_radius, 6.0);
  assert_eq!(settings.cut_back_vision_angle, 135.0);
  assert!(!settings.tight_formation);
  assert!(settings.is_3d);
  assert_eq!(settings.acceleration, 8.0);
  assert_eq!(settings.up(), Vec3::Y);
}

#[test]
fn test_settings_from_partial_toml() {
  let settings: AvoidanceSettings =
    toml::from_str("sonar_radius = 4.0\ntight_formation = true").expect("Valid settings");
  assert_eq!(settings.sonar_radius, 4.0);
  assert!(settings.tight_formation);
  assert_eq!(settings.acceleration, AvoidanceSettings::DEFAULT.acceleration);

  let empty: AvoidanceSettings = toml::from_str("").expect("Empty settings");
  assert_eq!(empty, AvoidanceSettings::DEFAULT);
}

// =========================================================================
// Single agent
// =========================================================================

#[test]
fn test_stopped_agent_has_no_impulse() {
  let agent = AgentState::new(Vec3::ONE, Vec3::new(1.1, 1.0, 1.0));
  assert!(agent.is_stopped());
  assert_eq!(desired_impulse(&agent), Vec3::ZERO);
  assert_eq!(
    steer(0, &[agent], &AvoidanceSettings::DEFAULT, 0.02),
    Steering::default()
  );
}

#[test]
fn test_lone_agent_heads_straight() {
  let agents = [walker(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), Vec3::X)];
  let steering = steer(0, &agents, &AvoidanceSettings::DEFAULT, 0.02);

  assert!((steering.impulse - Vec3::X).length() < 1e-5, "{steering:?}");
  assert!(!steering.blocked);
  assert!(steering.node_count >= 3);
}

#[test]
fn test_lone_agent_heads_straight_in_2d() {
  let settings = AvoidanceSettings {
    is_3d: false,
    ..AvoidanceSettings::DEFAULT
  };
  let agents = [walker(Vec3::ZERO, Vec3::new(0.0, 8.0, 0.0), Vec3::Y)];
  let steering = avoid(0, &agents, &settings, 0.02);
  assert!((steering.impulse - Vec3::Y).length() < 1e-5, "{steering:?}");
}

/// Agents heading at each other step aside, away from the other's offset.
#[test]
fn test_head_on_agent_deviates() {
  let agents = [
    walker(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), Vec3::X),
    walker(Vec3::new(4.0, 0.0, 0.3), Vec3::new(-6.0, 0.0, 0.3), Vec3::NEG_X),
  ];
  let steering = avoid(0, &agents, &AvoidanceSettings::DEFAULT, 0.02);

  assert!(!steering.blocked);
  assert!((steering.impulse.length() - 1.0).abs() < 1e-5);
  assert!(steering.impulse.y.abs() < 1e-5);
  assert!(
    steering.impulse.normalize().dot(Vec3::X) < 0.99,
    "impulse {:?} should leave the straight line",
    steering.impulse
  );
  assert!(steering.impulse.z < 0.0, "Other agent sits on +z: {steering:?}");
}

#[test]
fn test_non_avoiding_agent_ignores_others() {
  let agents = [
    AgentState {
      avoid: false,
      ..walker(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), Vec3::X)
    },
    walker(Vec3::new(2.0, 0.0, 0.0), Vec3::new(-6.0, 0.0, 0.0), Vec3::NEG_X),
  ];
  let steering = steer(0, &agents, &AvoidanceSettings::DEFAULT, 0.02);
  assert_eq!(steering.impulse, Vec3::X);
  assert_eq!(steering.node_count, 0);
}

/// Resting agent has zero sonar speed, so nothing collides yet.
#[test]
fn test_resting_agent_starts_straight() {
  let agents = [
    AgentState::new(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)),
    AgentState::new(Vec3::new(3.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0)),
  ];
  let steering = avoid(0, &agents, &AvoidanceSettings::DEFAULT, 0.02);
  assert!((steering.impulse - Vec3::X).length() < 1e-5);
}

#[test]
fn test_surrounded_agent_is_blocked() {
  let agents = surrounded();
  let steering = avoid(0, &agents, &AvoidanceSettings::DEFAULT, 0.02);
  assert!(steering.blocked);
  assert_eq!(steering.impulse, Vec3::ZERO);
}

#[test]
fn test_tight_formation_pushes_through_when_step_is_clear() {
  let settings = AvoidanceSettings {
    tight_formation: true,
    ..AvoidanceSettings::DEFAULT
  };
  let agents = surrounded();
  let steering = avoid(0, &agents, &settings, 0.02);
  assert!(steering.blocked);
  assert!((steering.impulse - Vec3::X).length() < 1e-5, "{steering:?}");
}

#[test]
fn test_tight_formation_holds_when_step_is_occluded() {
  let settings = AvoidanceSettings {
    tight_formation: true,
    ..AvoidanceSettings::DEFAULT
  };
  let agents = surrounded();
  // Half a second at unit speed lands inside the agent ahead
  let steering = avoid(0, &agents, &settings, 0.5);
  assert!(steering.blocked);
  assert_eq!(steering.impulse, Vec3::ZERO);
}

// =========================================================================
// Batch
// =========================================================================

#[test]
fn test_batch_matches_sequential() {
  let agents = crowd();
  let settings = AvoidanceSettings::DEFAULT;
  let output = avoid_batch(&agents, &settings, 0.02);

  assert_eq!(output.steering.len(), agents.len());
  for (index, batched) in output.steering.iter().enumerate() {
    assert_eq!(*batched, steer(index, &agents, &settings, 0.02), "agent {index}");
  }
  assert_eq!(
    output.node_count(),
    output.steering.iter().map(|s| s.node_count).sum::<usize>()
  );
}

#[test]
fn test_batch_counts_blocked_agents() {
  let agents = surrounded();
  let output = avoid_batch(&agents, &AvoidanceSettings::DEFAULT, 0.02);
  // Only the walker queries a sonar; the ring is at rest on its destinations
  assert_eq!(output.blocked_count(), 1);
}

#[test]
fn test_empty_batch() {
  let output = avoid_batch(&[], &AvoidanceSettings::DEFAULT, 0.02);
  assert!(output.steering.is_empty());
  assert_eq!(output.node_count(), 0);
}

// =========================================================================
// Integration
// =========================================================================

#[test]
fn test_integrate_eases_toward_impulse() {
  let mut agents = [AgentState::new(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0))];
  let steering = [Steering {
    impulse: Vec3::X,
    ..Steering::default()
  }];
  integrate(&mut agents, &steering, &AvoidanceSettings::DEFAULT, 0.1);

  assert!((agents[0].velocity - Vec3::new(0.8, 0.0, 0.0)).length() < 1e-6);
  assert!((agents[0].position - Vec3::new(0.08, 0.0, 0.0)).length() < 1e-6);
}

#[test]
fn test_integrate_never_overshoots() {
  let mut agents = [AgentState {
    stop_distance: 0.0,
    ..walker(
      Vec3::new(9.95, 0.0, 0.0),
      Vec3::new(10.0, 0.0, 0.0),
      Vec3::new(10.0, 0.0, 0.0),
    )
  }];
  let steering = [Steering {
    impulse: Vec3::new(10.0, 0.0, 0.0),
    ..Steering::default()
  }];
  integrate(&mut agents, &steering, &AvoidanceSettings::DEFAULT, 0.1);
  assert!((agents[0].position - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-5);
}

#[test]
fn test_integrate_stops_arrived_agents() {
  let mut agents = [walker(Vec3::ZERO, Vec3::new(0.1, 0.0, 0.0), Vec3::X)];
  integrate(
    &mut agents,
    &[Steering::default()],
    &AvoidanceSettings::DEFAULT,
    0.1,
  );
  assert_eq!(agents[0].velocity, Vec3::ZERO);
  assert_eq!(agents[0].position, Vec3::ZERO);
}

/// Two agents swapping sides never end a step interpenetrating deeply.
#[test]
fn test_crossing_agents_keep_apart() {
  let settings = AvoidanceSettings::DEFAULT;
  let mut agents = vec![
    walker(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0), Vec3::X),
    walker(Vec3::new(5.0, 0.0, 0.1), Vec3::new(-5.0, 0.0, 0.1), Vec3::NEG_X),
  ];

  let mut closest = f32::INFINITY;
  for _ in 0..600 {
    let output = avoid_batch(&agents, &settings, 0.02);
    integrate(&mut agents, &output.steering, &settings, 0.02);
    closest = closest.min(agents[0].position.distance(agents[1].position));
  }

  assert!(closest > 0.5, "closest approach {closest}");
  assert!(agents[0].position.x > 0.0 && agents[1].position.x < 0.0);
}
