//! Occupancy grid and rasterised line walking.
//!
//! The grid is built once per episode from the environment's obstacle
//! predicate and is read-only afterwards. Every path the planners return is
//! collision-free against this snapshot.

mod occupancy;
pub mod raycaster;

pub use occupancy::OccupancyGrid;
pub use raycaster::BresenhamLine;
