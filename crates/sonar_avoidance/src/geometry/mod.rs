//! Planar geometry primitives consumed by the sonar tree.
//!
//! - [`line`]: `Line` - closed range on the angle axis with exact subtraction
//! - [`circle`]: `Circle` - 2D circle with an overlap test
//! - [`intersection`]: moving-circle collision, converting a moving obstacle
//!   into the range of agent travel angles that hit it

pub mod circle;
pub mod intersection;
pub mod line;

// Re-exports
pub use circle::Circle;
pub use intersection::{moving_circles, moving_circles_with_velocity, Collision};
pub use line::{Cut, Line};
