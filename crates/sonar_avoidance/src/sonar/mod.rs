//! Sonar module: the angular free-space tree and its world-space wrapper.
//!
//! A sonar is rebuilt every query episode: set its geometry, insert every
//! nearby obstacle, ask for the open direction closest to straight ahead,
//! then clear or release it.
//!
//! ```text
//!   world obstacle ──to_local──► planar circle ──moving_circles──► wedge
//!                                                                    │
//!   world direction ◄──to_world── closest edge ◄── SonarTree ◄───────┘
//! ```
//!
//! # Module Structure
//!
//! - [`node`]: `NodeHandle`, `SonarNode` - arena handles and leaf/internal nodes
//! - [`tree`]: `SonarTree` - append-only arena, wedge subtraction, closest edge
//! - [`config`]: `SonarConfig` - geometry and its validation
//! - [`avoidance`]: `SonarAvoidance` - lifecycle and insertion front-ends
//! - [`projection`]: world/local transforms and angle/direction conversion
//! - [`gizmos`]: debug drawing hooks

pub mod avoidance;
pub mod config;
pub mod gizmos;
pub mod node;
pub mod projection;
pub mod tree;

// Re-exports
pub use avoidance::SonarAvoidance;
pub use config::SonarConfig;
pub use gizmos::{draw_obstacle, draw_sonar, DrawArc, DrawCircle, GizmoColor};
pub use node::{NodeHandle, SonarNode};
pub use tree::{Leaves, SonarTree};
