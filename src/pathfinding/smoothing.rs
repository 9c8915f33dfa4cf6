//! Line-of-sight path smoothing.
//!
//! Collapses a raw A* cell path into the fewest straight segments the grid
//! allows. Each kept segment passes [`OccupancyGrid::line_of_sight`], so the
//! result stays collision-free, and by the triangle inequality it is never
//! longer than the input.

use crate::core::{GridCoord, WorldPoint};
use crate::grid::OccupancyGrid;

/// Path smoother
pub struct PathSmoother<'a> {
    grid: &'a OccupancyGrid,
}

impl<'a> PathSmoother<'a> {
    pub fn new(grid: &'a OccupancyGrid) -> Self {
        Self { grid }
    }

    /// Greedy shortcutting: from each kept cell, jump to the furthest later
    /// cell that is still in line of sight.
    pub fn smooth(&self, path: &[GridCoord]) -> Vec<GridCoord> {
        if path.len() <= 2 {
            return path.to_vec();
        }

        let mut smoothed = vec![path[0]];
        let mut i = 0;

        while i < path.len() - 1 {
            let furthest = ((i + 2)..path.len())
                .rev()
                .find(|&j| self.grid.line_of_sight(path[i], path[j]))
                .unwrap_or(i + 1);

            smoothed.push(path[furthest]);
            i = furthest;
        }

        smoothed
    }

    /// Smooth and convert to cell centres
    pub fn smooth_world(&self, path: &[GridCoord]) -> Vec<WorldPoint> {
        self.smooth(path)
            .into_iter()
            .map(|c| self.grid.grid_to_world(c))
            .collect()
    }
}

/// Calculate total length of a path
pub fn path_length(path: &[WorldPoint]) -> f32 {
    path.windows(2).map(|w| w[0].distance(&w[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathfinding::AStarPlanner;

    fn centres(grid: &OccupancyGrid, path: &[GridCoord]) -> Vec<WorldPoint> {
        path.iter().map(|c| grid.grid_to_world(*c)).collect()
    }

    #[test]
    fn test_clear_line_collapses_to_endpoints() {
        let grid = OccupancyGrid::empty(12, 12, 1.0, WorldPoint::ZERO);
        let result = AStarPlanner::new(&grid)
            .find_path(GridCoord::new(1, 2), GridCoord::new(10, 7))
            .unwrap();

        let smoothed = PathSmoother::new(&grid).smooth(&result.path_grid);
        assert_eq!(smoothed, vec![GridCoord::new(1, 2), GridCoord::new(10, 7)]);
    }

    #[test]
    fn test_smoothing_keeps_corner_around_wall() {
        let mut grid = OccupancyGrid::empty(12, 12, 1.0, WorldPoint::ZERO);
        grid.fill_rect(GridCoord::new(6, 0), GridCoord::new(6, 8));

        let result = AStarPlanner::new(&grid)
            .find_path(GridCoord::new(2, 2), GridCoord::new(10, 2))
            .unwrap();
        let smoothed = PathSmoother::new(&grid).smooth(&result.path_grid);

        assert!(smoothed.len() >= 3);
        assert_eq!(smoothed.first(), result.path_grid.first());
        assert_eq!(smoothed.last(), result.path_grid.last());
        for w in smoothed.windows(2) {
            assert!(grid.line_of_sight(w[0], w[1]));
        }
        let raw_len = path_length(&result.path_world);
        let smooth_len = path_length(&centres(&grid, &smoothed));
        assert!(smooth_len <= raw_len + 1e-4);
    }

    #[test]
    fn test_short_paths_unchanged() {
        let grid = OccupancyGrid::empty(4, 4, 1.0, WorldPoint::ZERO);
        let smoother = PathSmoother::new(&grid);
        assert!(smoother.smooth(&[]).is_empty());
        let pair = [GridCoord::new(0, 0), GridCoord::new(3, 1)];
        assert_eq!(smoother.smooth(&pair), pair.to_vec());
    }

    #[test]
    fn test_path_length() {
        let path = [
            WorldPoint::new(0.0, 0.0),
            WorldPoint::new(3.0, 4.0),
            WorldPoint::new(3.0, 6.0),
        ];
        assert_eq!(path_length(&path), 7.0);
        assert_eq!(path_length(&path[..1]), 0.0);
    }
}
