//! Crowd scenario runner.
//!
//! Loads a TOML scenario, steps every agent with sonar avoidance at a fixed
//! time step and prints how the crowd got on: who arrived, how close any two
//! agents came, and how often a sonar was fully blocked.

mod config;

use anyhow::Result;
use clap::Parser;
use sonar_avoidance::metrics::AvoidanceMetrics;
use sonar_avoidance::{avoid_batch, integrate, AgentState};
use std::path::PathBuf;

use config::Scenario;

/// Crowd scenario runner for sonar avoidance.
#[derive(Parser, Debug)]
#[command(name = "sonar_scenario")]
#[command(about = "Steps a crowd scenario with sonar avoidance")]
struct Args {
	/// Path to scenario TOML file.
	#[arg(short, long)]
	config: PathBuf,

	/// Override the number of steps from the scenario.
	#[arg(short, long)]
	steps: Option<usize>,

	/// Print agent positions every N steps (0 = final state only).
	#[arg(short, long, default_value_t = 0)]
	report_every: usize,
}

fn main() -> Result<()> {
	let args = Args::parse();

	println!("Loading scenario from: {}", args.config.display());
	let scenario = Scenario::load(&args.config)?;
	let steps = args.steps.unwrap_or(scenario.steps);
	let settings = scenario.settings;
	let delta_time = scenario.delta_time;
	let mut agents = scenario.agents();

	println!(
		"Simulating {} agents for {} steps of {}s",
		agents.len(),
		steps,
		delta_time
	);

	let mut metrics = AvoidanceMetrics::new();
	let mut closest_approach = closest_pair(&agents);
	let mut blocked_queries = 0usize;
	let mut all_arrived_at = None;

	for step in 1..=steps {
		let output = avoid_batch(&agents, &settings, delta_time);
		integrate(&mut agents, &output.steering, &settings, delta_time);

		blocked_queries += output.blocked_count();
		metrics.record_batch(
			output.steering.len(),
			output.node_count(),
			output.blocked_count(),
			output.batch_time_us,
		);
		if let Some(distance) = closest_pair(&agents) {
			closest_approach = Some(closest_approach.map_or(distance, |c: f32| c.min(distance)));
		}

		if args.report_every > 0 && step % args.report_every == 0 {
			println!("\nStep {step}");
			print_agents(&agents);
		}

		if all_arrived_at.is_none() && agents.iter().all(AgentState::is_stopped) {
			all_arrived_at = Some(step);
		}
	}

	println!("\nFinal state");
	print_agents(&agents);

	let arrived = agents.iter().filter(|a| a.is_stopped()).count();
	println!("\nArrived: {}/{}", arrived, agents.len());
	match all_arrived_at {
		Some(step) => println!("All agents arrived after {:.2}s", step as f32 * delta_time),
		None => println!("Not every agent arrived"),
	}
	if let Some(distance) = closest_approach {
		println!("Closest center distance: {distance:.3}");
	}
	println!("Fully blocked sonar queries: {blocked_queries}");

	if sonar_avoidance::metrics::is_enabled() {
		println!(
			"Batch time: avg {:.1}us, last {}us, {:.1} sonar nodes per agent",
			metrics.avg_batch_timing_us(),
			metrics.last_batch_us,
			metrics.nodes_per_agent()
		);
	}

	Ok(())
}

fn print_agents(agents: &[AgentState]) {
	for (index, agent) in agents.iter().enumerate() {
		let p = agent.position;
		let v = agent.velocity;
		println!(
			"  agent {:>3}: pos ({:>7.2}, {:>7.2}, {:>7.2})  vel ({:>5.2}, {:>5.2}, {:>5.2}){}",
			index,
			p.x,
			p.y,
			p.z,
			v.x,
			v.y,
			v.z,
			if agent.is_stopped() { "  arrived" } else { "" }
		);
	}
}

/// Smallest center distance between any two agents.
fn closest_pair(agents: &[AgentState]) -> Option<f32> {
	let mut closest: Option<f32> = None;
	for (i, a) in agents.iter().enumerate() {
		for b in &agents[i + 1..] {
			let distance = a.position.distance(b.position);
			closest = Some(closest.map_or(distance, |c| c.min(distance)));
		}
	}
	closest
}
