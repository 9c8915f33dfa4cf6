//! Path planning on the occupancy grid.
//!
//! - **A* Search**: shortest 8-connected collision-free cell paths
//! - **Path Smoothing**: line-of-sight shortcutting of the raw cell path
//!
//! ## Planning a route
//!
//! ```rust,ignore
//! use kshetra::pathfinding::plan_route;
//!
//! match plan_route(&grid, robot.position, target) {
//!     Ok(route) => println!("{} waypoints, {:.1} long", route.waypoints.len(), route.length),
//!     Err(e) => println!("fall back: {}", e),
//! }
//! ```

pub mod astar;
pub mod smoothing;

pub use astar::{AStarPlanner, PathFailure, PathResult};
pub use smoothing::{PathSmoother, path_length};

use crate::core::{GridCoord, WorldPoint};
use crate::error::Result;
use crate::grid::OccupancyGrid;

/// A smoothed route between two world points.
#[derive(Clone, Debug)]
pub struct Route {
    /// Smoothed cells, start and goal inclusive
    pub cells: Vec<GridCoord>,
    /// Cell centres of `cells`
    pub waypoints: Vec<WorldPoint>,
    /// Unsmoothed A* cost in world units
    pub raw_cost: f32,
    /// Length of the smoothed polyline in world units
    pub length: f32,
}

/// Search and smooth in one call.
pub fn plan_route(grid: &OccupancyGrid, start: WorldPoint, goal: WorldPoint) -> Result<Route> {
    let result = AStarPlanner::new(grid).find_path_world(start, goal)?;
    let cells = PathSmoother::new(grid).smooth(&result.path_grid);
    let waypoints: Vec<WorldPoint> = cells.iter().map(|c| grid.grid_to_world(*c)).collect();
    let length = path_length(&waypoints);

    Ok(Route {
        cells,
        waypoints,
        raw_cost: result.cost * grid.resolution(),
        length,
    })
}
