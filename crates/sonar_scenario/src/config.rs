//! Scenario file parsing.

use anyhow::{Context, Result};
use glam::Vec3;
use serde::Deserialize;
use sonar_avoidance::{AgentState, AvoidanceSettings};
use std::path::Path;

/// Root of a scenario TOML file.
#[derive(Debug, Deserialize)]
pub struct Scenario {
	/// Crowd-wide avoidance tuning.
	#[serde(default)]
	pub settings: AvoidanceSettings,
	/// Number of fixed steps to simulate.
	#[serde(default = "default_steps")]
	pub steps: usize,
	/// Fixed step length in seconds.
	#[serde(default = "default_delta_time")]
	pub delta_time: f32,
	/// Agent definitions.
	pub agents: Vec<AgentConfig>,
}

/// One agent in the scenario.
#[derive(Debug, Deserialize)]
pub struct AgentConfig {
	pub position: [f32; 3],
	pub destination: [f32; 3],
	#[serde(default = "default_radius")]
	pub radius: f32,
	#[serde(default = "default_speed")]
	pub speed: f32,
	#[serde(default = "default_stop_distance")]
	pub stop_distance: f32,
	/// Initial velocity (defaults to rest).
	pub velocity: Option<[f32; 3]>,
	/// Whether the agent avoids the others.
	#[serde(default = "default_avoid")]
	pub avoid: bool,
}

fn default_steps() -> usize {
	600
}

fn default_delta_time() -> f32 {
	0.02
}

fn default_radius() -> f32 {
	0.5
}

fn default_speed() -> f32 {
	1.0
}

fn default_stop_distance() -> f32 {
	0.2
}

fn default_avoid() -> bool {
	true
}

impl Scenario {
	/// Load a scenario from a TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read scenario file: {}", path.display()))?;
		Self::parse(&content)
	}

	/// Parse and validate scenario TOML.
	pub fn parse(content: &str) -> Result<Self> {
		let scenario: Scenario =
			toml::from_str(content).with_context(|| "Failed to parse scenario TOML")?;

		if scenario.agents.is_empty() {
			anyhow::bail!("Scenario must have at least one agent");
		}
		if !(scenario.delta_time > 0.0) {
			anyhow::bail!("delta_time must be positive, got {}", scenario.delta_time);
		}
		if let Some(index) = scenario.agents.iter().position(|a| !(a.radius >= 0.0)) {
			anyhow::bail!(
				"Agent {} radius must be non negative, got {}",
				index,
				scenario.agents[index].radius
			);
		}

		Ok(scenario)
	}

	/// Initial crowd state.
	pub fn agents(&self) -> Vec<AgentState> {
		self.agents.iter().map(AgentConfig::state).collect()
	}
}

impl AgentConfig {
	fn state(&self) -> AgentState {
		AgentState {
			position: Vec3::from_array(self.position),
			velocity: self.velocity.map_or(Vec3::ZERO, Vec3::from_array),
			destination: Vec3::from_array(self.destination),
			radius: self.radius,
			speed: self.speed,
			stop_distance: self.stop_distance,
			avoid: self.avoid,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_with_defaults() {
		let scenario = Scenario::parse(
			r#"
			[[agents]]
			position = [0.0, 0.0, 0.0]
			destination = [5.0, 0.0, 0.0]
			"#,
		)
		.unwrap();

		assert_eq!(scenario.steps, 600);
		assert_eq!(scenario.settings, AvoidanceSettings::DEFAULT);

		let agents = scenario.agents();
		assert_eq!(agents.len(), 1);
		assert_eq!(agents[0].destination, Vec3::new(5.0, 0.0, 0.0));
		assert_eq!(agents[0].velocity, Vec3::ZERO);
		assert!(agents[0].avoid);
	}

	#[test]
	fn test_parse_settings_table() {
		let scenario = Scenario::parse(
			r#"
			steps = 10
			delta_time = 0.1

			[settings]
			sonar_radius = 3.0
			is_3d = false

			[[agents]]
			position = [0.0, 0.0, 0.0]
			destination = [0.0, 5.0, 0.0]
			velocity = [0.0, 1.0, 0.0]
			avoid = false
			"#,
		)
		.unwrap();

		assert_eq!(scenario.steps, 10);
		assert_eq!(scenario.settings.sonar_radius, 3.0);
		assert!(!scenario.settings.is_3d);
		assert_eq!(scenario.settings.acceleration, 8.0);
		assert_eq!(scenario.agents()[0].velocity, Vec3::Y);
	}

	#[test]
	fn test_parse_rejects_empty_crowd() {
		let err = Scenario::parse("steps = 5\nagents = []").unwrap_err();
		assert!(err.to_string().contains("at least one agent"));
	}

	#[test]
	fn test_parse_rejects_bad_step() {
		let err = Scenario::parse(
			r#"
			delta_time = 0.0
			[[agents]]
			position = [0.0, 0.0, 0.0]
			destination = [1.0, 0.0, 0.0]
			"#,
		)
		.unwrap_err();
		assert!(err.to_string().contains("delta_time"));
	}
}
