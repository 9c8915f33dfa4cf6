//! A* pathfinding algorithm.
//!
//! Implements A* search on the occupancy grid with:
//! - 8-connected movement, cost 1 straight and √2 diagonal
//! - No diagonal corner cutting past occupied cells
//! - Euclidean heuristic (admissible and consistent for these costs)
//! - Deterministic expansion: equal `f` pops the earliest-discovered node

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::fmt;

use tracing::{debug, trace};

use crate::core::{GridCoord, WorldPoint};
use crate::error::{KshetraError, Result};
use crate::grid::OccupancyGrid;

const DIAGONAL_COST: f32 = std::f32::consts::SQRT_2;

/// A node in the A* search
#[derive(Clone, Debug)]
struct AStarNode {
    coord: GridCoord,
    g_cost: f32, // Cost from start
    f_cost: f32, // g_cost + heuristic
    seq: u64,    // Discovery order
}

impl Eq for AStarNode {}

impl PartialEq for AStarNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Ord for AStarNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior, then oldest first
        other
            .f_cost
            .total_cmp(&self.f_cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for AStarNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Reason for path failure
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathFailure {
    /// Start cell is occupied
    StartBlocked,
    /// Goal cell is occupied
    GoalBlocked,
    /// Start or goal is outside the grid
    OutOfBounds,
    /// Search exhausted with both ends free
    Unreachable,
}

impl fmt::Display for PathFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            PathFailure::StartBlocked => "start cell is occupied",
            PathFailure::GoalBlocked => "goal cell is occupied",
            PathFailure::OutOfBounds => "start or goal outside the grid",
            PathFailure::Unreachable => "goal unreachable from start",
        };
        f.write_str(reason)
    }
}

/// Result of a successful A* search
#[derive(Clone, Debug)]
pub struct PathResult {
    /// Raw cell-by-cell path, start and goal inclusive
    pub path_grid: Vec<GridCoord>,
    /// Cell centres of `path_grid`
    pub path_world: Vec<WorldPoint>,
    /// Accumulated edge cost in cells
    pub cost: f32,
    /// Number of nodes expanded during search
    pub nodes_expanded: usize,
}

impl PathResult {
    /// Path length in cells
    pub fn length_cells(&self) -> usize {
        self.path_grid.len()
    }

    /// Path length in world units
    pub fn length(&self) -> f32 {
        super::path_length(&self.path_world)
    }
}

/// A* pathfinder over an occupancy snapshot
pub struct AStarPlanner<'a> {
    grid: &'a OccupancyGrid,
}

impl<'a> AStarPlanner<'a> {
    pub fn new(grid: &'a OccupancyGrid) -> Self {
        Self { grid }
    }

    /// Find a path from start to goal (grid coordinates)
    pub fn find_path(&self, start: GridCoord, goal: GridCoord) -> Result<PathResult> {
        trace!(
            "[AStar] find_path: start=({},{}) goal=({},{})",
            start.x, start.y, goal.x, goal.y
        );

        if !self.grid.is_valid_coord(start) || !self.grid.is_valid_coord(goal) {
            debug!("[AStar] FAILED: OutOfBounds - start or goal outside grid");
            return Err(KshetraError::NoPathFound(PathFailure::OutOfBounds));
        }
        if self.grid.is_occupied(start) {
            debug!("[AStar] FAILED: StartBlocked at ({},{})", start.x, start.y);
            return Err(KshetraError::NoPathFound(PathFailure::StartBlocked));
        }
        if self.grid.is_occupied(goal) {
            debug!("[AStar] FAILED: GoalBlocked at ({},{})", goal.x, goal.y);
            return Err(KshetraError::NoPathFound(PathFailure::GoalBlocked));
        }

        let mut open_set = BinaryHeap::new();
        let mut closed_set = HashSet::new();
        let mut came_from: HashMap<GridCoord, GridCoord> = HashMap::new();
        let mut g_scores: HashMap<GridCoord, f32> = HashMap::new();
        let mut seq = 0u64;

        open_set.push(AStarNode {
            coord: start,
            g_cost: 0.0,
            f_cost: start.euclidean_distance(&goal),
            seq,
        });
        g_scores.insert(start, 0.0);

        let mut nodes_expanded = 0;

        while let Some(current) = open_set.pop() {
            if !closed_set.insert(current.coord) {
                continue;
            }
            nodes_expanded += 1;

            if current.coord == goal {
                return Ok(self.reconstruct_path(&came_from, goal, current.g_cost, nodes_expanded));
            }

            for (i, neighbor) in current.coord.neighbors_8().into_iter().enumerate() {
                if closed_set.contains(&neighbor) || !self.grid.can_step(current.coord, neighbor) {
                    continue;
                }

                // neighbors_8 lists the four axis moves first
                let move_cost = if i >= 4 { DIAGONAL_COST } else { 1.0 };
                let tentative_g = current.g_cost + move_cost;

                let known_g = g_scores.get(&neighbor).copied().unwrap_or(f32::INFINITY);
                if tentative_g < known_g {
                    came_from.insert(neighbor, current.coord);
                    g_scores.insert(neighbor, tentative_g);

                    seq += 1;
                    open_set.push(AStarNode {
                        coord: neighbor,
                        g_cost: tentative_g,
                        f_cost: tentative_g + neighbor.euclidean_distance(&goal),
                        seq,
                    });
                }
            }
        }

        debug!(
            "[AStar] FAILED: Unreachable after expanding {} nodes",
            nodes_expanded
        );
        Err(KshetraError::NoPathFound(PathFailure::Unreachable))
    }

    /// Find a path between the cells containing two world points
    pub fn find_path_world(&self, start: WorldPoint, goal: WorldPoint) -> Result<PathResult> {
        self.find_path(self.grid.world_to_grid(start), self.grid.world_to_grid(goal))
    }

    fn reconstruct_path(
        &self,
        came_from: &HashMap<GridCoord, GridCoord>,
        goal: GridCoord,
        cost: f32,
        nodes_expanded: usize,
    ) -> PathResult {
        let mut path_grid = vec![goal];
        let mut current = goal;
        while let Some(&prev) = came_from.get(&current) {
            path_grid.push(prev);
            current = prev;
        }
        path_grid.reverse();

        let path_world = path_grid
            .iter()
            .map(|c| self.grid.grid_to_world(*c))
            .collect();

        trace!(
            "[AStar] SUCCESS: path length={} cells, cost={:.2}, nodes_expanded={}",
            path_grid.len(),
            cost,
            nodes_expanded
        );

        PathResult {
            path_grid,
            path_world,
            cost,
            nodes_expanded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn open_grid(size: usize) -> OccupancyGrid {
        OccupancyGrid::empty(size, size, 1.0, WorldPoint::ZERO)
    }

    #[test]
    fn test_straight_path() {
        let grid = open_grid(10);
        let result = AStarPlanner::new(&grid)
            .find_path(GridCoord::new(1, 5), GridCoord::new(8, 5))
            .unwrap();

        assert_eq!(result.length_cells(), 8);
        assert_relative_eq!(result.cost, 7.0);
        assert_eq!(result.path_grid.first(), Some(&GridCoord::new(1, 5)));
        assert_eq!(result.path_grid.last(), Some(&GridCoord::new(8, 5)));
    }

    #[test]
    fn test_diagonal_path_cost() {
        let grid = open_grid(10);
        let result = AStarPlanner::new(&grid)
            .find_path(GridCoord::new(0, 0), GridCoord::new(9, 9))
            .unwrap();
        assert_relative_eq!(result.cost, 9.0 * DIAGONAL_COST, epsilon = 1e-4);
        assert_eq!(result.length_cells(), 10);
    }

    #[test]
    fn test_path_around_block() {
        let mut grid = open_grid(10);
        grid.fill_rect(GridCoord::new(4, 4), GridCoord::new(5, 5));

        let result = AStarPlanner::new(&grid)
            .find_path(GridCoord::new(0, 0), GridCoord::new(9, 9))
            .unwrap();

        let direct = GridCoord::new(0, 0).euclidean_distance(&GridCoord::new(9, 9));
        assert!(result.cost > direct);
        assert!(result.cost < 18.0);
        for w in result.path_grid.windows(2) {
            assert!(grid.can_step(w[0], w[1]));
        }
    }

    #[test]
    fn test_no_corner_cutting() {
        let mut grid = open_grid(3);
        grid.set_occupied(GridCoord::new(1, 0), true);
        let result = AStarPlanner::new(&grid)
            .find_path(GridCoord::new(0, 0), GridCoord::new(1, 1))
            .unwrap();
        assert_eq!(
            result.path_grid,
            vec![GridCoord::new(0, 0), GridCoord::new(0, 1), GridCoord::new(1, 1)]
        );
    }

    #[test]
    fn test_goal_blocked() {
        let mut grid = open_grid(10);
        grid.set_occupied(GridCoord::new(9, 9), true);
        let err = AStarPlanner::new(&grid)
            .find_path(GridCoord::new(0, 0), GridCoord::new(9, 9))
            .unwrap_err();
        assert!(matches!(
            err,
            KshetraError::NoPathFound(PathFailure::GoalBlocked)
        ));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_start_blocked_and_out_of_bounds() {
        let mut grid = open_grid(5);
        grid.set_occupied(GridCoord::new(0, 0), true);
        let planner = AStarPlanner::new(&grid);

        assert!(matches!(
            planner.find_path(GridCoord::new(0, 0), GridCoord::new(4, 4)),
            Err(KshetraError::NoPathFound(PathFailure::StartBlocked))
        ));
        assert!(matches!(
            planner.find_path(GridCoord::new(1, 1), GridCoord::new(5, 4)),
            Err(KshetraError::NoPathFound(PathFailure::OutOfBounds))
        ));
    }

    #[test]
    fn test_enclosed_goal_unreachable() {
        let mut grid = open_grid(10);
        grid.fill_rect(GridCoord::new(6, 6), GridCoord::new(8, 8));
        grid.set_occupied(GridCoord::new(7, 7), false);

        let err = AStarPlanner::new(&grid)
            .find_path(GridCoord::new(0, 0), GridCoord::new(7, 7))
            .unwrap_err();
        assert!(matches!(
            err,
            KshetraError::NoPathFound(PathFailure::Unreachable)
        ));
    }

    #[test]
    fn test_start_equals_goal() {
        let grid = open_grid(4);
        let result = AStarPlanner::new(&grid)
            .find_path(GridCoord::new(2, 2), GridCoord::new(2, 2))
            .unwrap();
        assert_eq!(result.path_grid, vec![GridCoord::new(2, 2)]);
        assert_eq!(result.cost, 0.0);
    }

    #[test]
    fn test_repeatable() {
        let mut grid = open_grid(20);
        grid.fill_rect(GridCoord::new(8, 2), GridCoord::new(9, 17));
        let planner = AStarPlanner::new(&grid);

        let a = planner
            .find_path(GridCoord::new(2, 10), GridCoord::new(17, 10))
            .unwrap();
        let b = planner
            .find_path(GridCoord::new(2, 10), GridCoord::new(17, 10))
            .unwrap();
        assert_eq!(a.path_grid, b.path_grid);
        assert_eq!(a.nodes_expanded, b.nodes_expanded);
    }

    #[test]
    fn test_heap_prefers_earlier_discovery_on_ties() {
        let mut heap = BinaryHeap::new();
        for (seq, x) in [(3, 3), (1, 1), (2, 2)] {
            heap.push(AStarNode {
                coord: GridCoord::new(x, 0),
                g_cost: 0.0,
                f_cost: 5.0,
                seq,
            });
        }
        heap.push(AStarNode {
            coord: GridCoord::new(9, 0),
            g_cost: 0.0,
            f_cost: 4.0,
            seq: 10,
        });

        let order: Vec<i32> = std::iter::from_fn(|| heap.pop().map(|n| n.coord.x)).collect();
        assert_eq!(order, vec![9, 1, 2, 3]);
    }
}
