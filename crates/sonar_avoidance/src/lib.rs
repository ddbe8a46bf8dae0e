//! sonar_avoidance - Engine independent local avoidance for crowds
//!
//! Each agent owns a "sonar": a tree partitioning the travel directions
//! around it into free and blocked intervals. Nearby agents and wedges are
//! subtracted from the free space, then the agent heads along the open
//! direction closest to where it wants to go.
//!
//! # Features
//!
//! - **Angular free-space tree**: append-only arena, exact interval
//!   subtraction, order independent results
//! - **Moving-circle obstacles**: truncated velocity obstacle turning a moving
//!   agent into the range of travel angles that would hit it
//! - **Crowd steering**: one sonar per agent per step, batched with rayon
//! - **Debug drawing**: engine-agnostic arc/circle hooks
//!
//! # Example
//!
//! ```ignore
//! use glam::Vec3;
//! use sonar_avoidance::{SonarAvoidance, SonarConfig};
//!
//! let config = SonarConfig::looking_along(position, to_destination, Vec3::Y, 0.5, 6.0, speed);
//! let mut sonar = SonarAvoidance::new(config)?;
//!
//! for other in &neighbours {
//!     sonar.insert_moving_circle(other.position, other.velocity, other.radius);
//! }
//!
//! if let Some(direction) = sonar.find_closest_direction() {
//!     velocity = direction * speed;
//! }
//! sonar.release();
//! ```

pub mod constants;
pub mod error;

// Re-export commonly used items
pub use constants::{fold_to_principal_range, FULL_TURN, SONAR_ANGLE};
pub use error::{SonarError, SonarResult};

// Planar primitives: angle ranges, circles, moving-circle collision
pub mod geometry;
pub use geometry::{Circle, Collision, Line};

// Angular free-space tree
pub mod sonar;
pub use sonar::{NodeHandle, SonarAvoidance, SonarConfig, SonarNode};

// Per-agent steering and parallel crowd batches
pub mod steering;
pub use steering::{avoid_batch, integrate, AgentState, AvoidanceSettings, BatchOutput, Steering};

// Engine-agnostic metrics
pub mod metrics;
