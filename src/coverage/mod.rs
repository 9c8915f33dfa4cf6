//! Full-domain coverage sweep.
//!
//! [`SweepPattern`] lays out the boustrophedon waypoints; [`CoveragePlanner`]
//! drives the robot through them, detouring around obstacles with A* and
//! recording one measurement per reached waypoint.

mod pattern;
mod planner;

pub use pattern::SweepPattern;
pub use planner::{CoveragePlanner, CoverageStats, CoverageStatus};
