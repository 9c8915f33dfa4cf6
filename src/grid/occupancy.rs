//! Occupancy grid snapshot of the environment.
//!
//! The grid uses a coordinate system where:
//! - (0, 0) is the cell whose lower-left corner is `origin`
//! - Cell (x, y) covers `origin + [x, x+1) * resolution` by `origin + [y, y+1) * resolution`
//! - Occupancy of a cell is the environment predicate sampled at the cell centre

use tracing::debug;

use super::raycaster::BresenhamLine;
use crate::core::{GridCoord, WorldPoint};
use crate::environment::Environment;
use crate::error::{KshetraError, Result};

/// Immutable-per-episode occupancy grid.
#[derive(Clone, Debug)]
pub struct OccupancyGrid {
    occupied: Vec<bool>,
    width: usize,
    height: usize,
    resolution: f32,
    origin: WorldPoint,
}

impl OccupancyGrid {
    /// Create an all-free grid.
    pub fn empty(width: usize, height: usize, resolution: f32, origin: WorldPoint) -> Self {
        Self {
            occupied: vec![false; width * height],
            width,
            height,
            resolution,
            origin,
        }
    }

    /// Sample the environment's obstacle predicate at every cell centre.
    ///
    /// When the resolution does not divide the domain, the last column and
    /// row have centres outside it; those cells are marked occupied.
    pub fn from_environment<E: Environment + ?Sized>(env: &E, resolution: f32) -> Result<Self> {
        if resolution.is_nan() || resolution <= 0.0 {
            return Err(KshetraError::Config(format!(
                "grid resolution must be positive, got {}",
                resolution
            )));
        }

        let bounds = env.bounds();
        let width = (bounds.width() / resolution).ceil() as usize;
        let height = (bounds.height() / resolution).ceil() as usize;
        let mut grid = Self::empty(width, height, resolution, bounds.min);

        for y in 0..height {
            for x in 0..width {
                let centre = grid.grid_to_world(GridCoord::new(x as i32, y as i32));
                if !bounds.contains(centre) || env.is_obstacle(centre) {
                    grid.occupied[y * width + x] = true;
                }
            }
        }

        debug!(
            "[Grid] {}x{} cells at {:.2}, {} occupied",
            width,
            height,
            resolution,
            grid.occupied_count()
        );
        Ok(grid)
    }

    /// Mark a cell. Out-of-range coordinates are ignored.
    pub fn set_occupied(&mut self, coord: GridCoord, occupied: bool) {
        if let Some(idx) = self.index(coord) {
            self.occupied[idx] = occupied;
        }
    }

    /// Mark every cell in the inclusive rectangle `from..=to`.
    pub fn fill_rect(&mut self, from: GridCoord, to: GridCoord) {
        for y in from.y.min(to.y)..=from.y.max(to.y) {
            for x in from.x.min(to.x)..=from.x.max(to.x) {
                self.set_occupied(GridCoord::new(x, y), true);
            }
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    #[inline]
    pub fn origin(&self) -> WorldPoint {
        self.origin
    }

    #[inline]
    fn index(&self, coord: GridCoord) -> Option<usize> {
        if self.is_valid_coord(coord) {
            Some(coord.y as usize * self.width + coord.x as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn is_valid_coord(&self, coord: GridCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as usize) < self.width
            && (coord.y as usize) < self.height
    }

    /// Is the cell blocked? Cells outside the grid count as blocked.
    #[inline]
    pub fn is_occupied(&self, coord: GridCoord) -> bool {
        self.index(coord).is_none_or(|idx| self.occupied[idx])
    }

    #[inline]
    pub fn is_free(&self, coord: GridCoord) -> bool {
        !self.is_occupied(coord)
    }

    /// Is the cell containing a world point blocked?
    #[inline]
    pub fn is_occupied_at(&self, point: WorldPoint) -> bool {
        self.is_occupied(self.world_to_grid(point))
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied.iter().filter(|&&o| o).count()
    }

    /// Convert world coordinates to the containing cell
    #[inline]
    pub fn world_to_grid(&self, point: WorldPoint) -> GridCoord {
        GridCoord::new(
            ((point.x - self.origin.x) / self.resolution).floor() as i32,
            ((point.y - self.origin.y) / self.resolution).floor() as i32,
        )
    }

    /// Convert a cell to the world coordinates of its centre
    #[inline]
    pub fn grid_to_world(&self, coord: GridCoord) -> WorldPoint {
        WorldPoint::new(
            self.origin.x + (coord.x as f32 + 0.5) * self.resolution,
            self.origin.y + (coord.y as f32 + 0.5) * self.resolution,
        )
    }

    /// Can the robot move between two 8-adjacent cells?
    ///
    /// The destination must be free, and a diagonal step may not squeeze
    /// between two cells that touch the corner it crosses.
    #[inline]
    pub fn can_step(&self, from: GridCoord, to: GridCoord) -> bool {
        if self.is_occupied(to) {
            return false;
        }
        if from.is_diagonal_to(&to) {
            return self.is_free(GridCoord::new(to.x, from.y))
                && self.is_free(GridCoord::new(from.x, to.y));
        }
        true
    }

    /// Rasterised line-of-sight test between two cells.
    pub fn line_of_sight(&self, from: GridCoord, to: GridCoord) -> bool {
        if self.is_occupied(from) {
            return false;
        }
        let mut prev = from;
        for cell in BresenhamLine::new(from, to).skip(1) {
            if !self.can_step(prev, cell) {
                return false;
            }
            prev = cell;
        }
        true
    }

    /// Line-of-sight between the cells containing two world points.
    pub fn segment_clear(&self, from: WorldPoint, to: WorldPoint) -> bool {
        self.line_of_sight(self.world_to_grid(from), self.world_to_grid(to))
    }

    /// Centres of occupied cells within `radius` of `point`, row-major order.
    pub fn occupied_within(&self, point: WorldPoint, radius: f32) -> Vec<WorldPoint> {
        let center = self.world_to_grid(point);
        let reach = (radius / self.resolution).ceil() as i32;
        let radius_sq = radius * radius;

        let mut cells = Vec::new();
        for y in (center.y - reach)..=(center.y + reach) {
            for x in (center.x - reach)..=(center.x + reach) {
                let coord = GridCoord::new(x, y);
                if !self.is_valid_coord(coord) || !self.is_occupied(coord) {
                    continue;
                }
                let world = self.grid_to_world(coord);
                if world.distance_squared(&point) < radius_sq {
                    cells.push(world);
                }
            }
        }
        cells
    }

    /// Every free cell, row-major
    pub fn free_cells(&self) -> impl Iterator<Item = GridCoord> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).filter_map(move |x| {
                let coord = GridCoord::new(x as i32, y as i32);
                self.is_free(coord).then_some(coord)
            })
        })
    }

    /// ASCII rendering for debugging (`#` occupied, `.` free), top row first.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                let occupied = self.occupied[y * self.width + x];
                out.push(if occupied { '#' } else { '.' });
            }
            out.push('\n');
        }
        out
    }
}
