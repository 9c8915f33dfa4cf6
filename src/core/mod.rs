//! Core types shared by every layer of the survey stack:
//! - [`GridCoord`] and [`WorldPoint`]: coordinate types
//! - [`DomainBounds`]: the rectangular survey domain
//! - [`RobotState`]: robot kinematic state

mod bounds;
mod point;
mod robot;

pub use bounds::DomainBounds;
pub use point::{GridCoord, WorldPoint};
pub use robot::RobotState;
