//! Engine-agnostic metrics collection for crowd avoidance batches.
//!
//! Feature-gated and runtime-toggled to ensure zero overhead when disabled.
//!
//! # Usage
//!
//! ```ignore
//! use sonar_avoidance::metrics::{AvoidanceMetrics, COLLECT_METRICS};
//! use sonar_avoidance::steering::avoid_batch;
//!
//! // Compile with --features metrics
//! // Runtime toggle:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! let output = avoid_batch(&agents, &settings, delta_time);
//! metrics.record_batch(
//!     output.steering.len(),
//!     output.node_count(),
//!     output.blocked_count(),
//!     output.batch_time_us,
//! );
//! ```

use std::collections::VecDeque;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;
use std::sync::atomic::AtomicBool;

/// Runtime toggle for metrics collection.
/// Set to false to disable metrics gathering at runtime.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
    #[cfg(feature = "metrics")]
    {
        COLLECT_METRICS.load(Ordering::Relaxed)
    }
    #[cfg(not(feature = "metrics"))]
    {
        false
    }
}

/// Rolling window for storing recent values (e.g., timing history).
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    buffer: VecDeque<T>,
    capacity: usize,
}

impl<T> RollingWindow<T> {
    /// Create a new rolling window with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new value, evicting the oldest if at capacity.
    pub fn push(&mut self, value: T) {
        if self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Iterate over values (oldest to newest).
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buffer.iter()
    }

    /// Get the most recent value.
    pub fn last(&self) -> Option<&T> {
        self.buffer.back()
    }
}

impl RollingWindow<u64> {
    pub fn sum(&self) -> u64 {
        self.buffer.iter().sum()
    }

    /// Average of all values, 0 when empty.
    pub fn average(&self) -> f64 {
        if self.buffer.is_empty() {
            0.0
        } else {
            self.sum() as f64 / self.buffer.len() as f64
        }
    }

    /// Get min and max values.
    pub fn min_max(&self) -> Option<(u64, u64)> {
        let min = *self.buffer.iter().min()?;
        let max = *self.buffer.iter().max()?;
        Some((min, max))
    }
}

impl Default for RollingWindow<u64> {
    fn default() -> Self {
        Self::new(128) // ~2 seconds of fixed steps at 60Hz
    }
}

/// Crowd statistics updated once per avoidance batch.
#[derive(Debug, Clone, Default)]
pub struct AvoidanceMetrics {
    // Last batch snapshot
    /// Agents steered in the last batch.
    pub last_agent_count: usize,
    /// Agents whose sonar was fully blocked in the last batch.
    pub last_blocked_agents: usize,
    /// Sonar nodes allocated across all agents in the last batch.
    pub last_node_count: usize,
    /// Last batch time in microseconds.
    pub last_batch_us: u64,

    // Timing
    /// Rolling window of batch times in microseconds.
    pub batch_timings: RollingWindow<u64>,
    /// Rolling window of nodes allocated per batch.
    pub node_counts: RollingWindow<u64>,

    /// Total batches recorded this session.
    pub total_batches: u64,
    /// Total fully blocked sonar queries this session.
    pub total_blocked: u64,
}

impl AvoidanceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all metrics to zero.
    pub fn reset(&mut self) {
        self.last_agent_count = 0;
        self.last_blocked_agents = 0;
        self.last_node_count = 0;
        self.last_batch_us = 0;
        self.batch_timings.clear();
        self.node_counts.clear();
        // Don't reset totals - they're cumulative
    }

    /// Record one avoidance batch.
    pub fn record_batch(
        &mut self,
        agent_count: usize,
        node_count: usize,
        blocked_agents: usize,
        timing_us: u64,
    ) {
        if !is_enabled() {
            return;
        }

        self.last_agent_count = agent_count;
        self.last_node_count = node_count;
        self.last_blocked_agents = blocked_agents;
        self.last_batch_us = timing_us;

        self.batch_timings.push(timing_us);
        self.node_counts.push(node_count as u64);

        self.total_batches += 1;
        self.total_blocked += blocked_agents as u64;
    }

    /// Get average batch timing in microseconds.
    pub fn avg_batch_timing_us(&self) -> f64 {
        self.batch_timings.average()
    }

    /// Average sonar nodes per agent in the last batch.
    pub fn nodes_per_agent(&self) -> f64 {
        if self.last_agent_count == 0 {
            0.0
        } else {
            self.last_node_count as f64 / self.last_agent_count as f64
        }
    }
}

#[cfg(all(test, feature = "metrics"))]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_window() {
        let mut window = RollingWindow::new(3);
        assert!(window.is_empty());

        window.push(10u64);
        window.push(20);
        window.push(30);
        assert_eq!(window.len(), 3);
        assert_eq!(window.sum(), 60);
        assert_eq!(window.average(), 20.0);

        // Push one more, oldest should be evicted
        window.push(40);
        assert_eq!(window.len(), 3);
        assert_eq!(window.sum(), 90);
        assert_eq!(window.last(), Some(&40));

        assert_eq!(window.min_max(), Some((20, 40)));
    }

    #[test]
    fn test_record_batch() {
        let mut metrics = AvoidanceMetrics::new();

        metrics.record_batch(10, 45, 1, 1000);
        metrics.record_batch(10, 35, 0, 3000);

        assert_eq!(metrics.total_batches, 2);
        assert_eq!(metrics.total_blocked, 1);
        assert_eq!(metrics.last_blocked_agents, 0);
        assert_eq!(metrics.avg_batch_timing_us(), 2000.0);
        assert_eq!(metrics.nodes_per_agent(), 3.5);
    }

    #[test]
    fn test_reset_keeps_totals() {
        let mut metrics = AvoidanceMetrics::new();
        metrics.record_batch(4, 12, 2, 500);
        metrics.reset();

        assert!(metrics.batch_timings.is_empty());
        assert_eq!(metrics.last_agent_count, 0);
        assert_eq!(metrics.total_batches, 1);
        assert_eq!(metrics.total_blocked, 2);
    }
}
