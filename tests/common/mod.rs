//! Shared fixtures for integration tests.

#![allow(dead_code)]

use kshetra::{
    DomainBounds, GridCoord, KshetraConfig, Obstacle, OccupancyGrid, SignalField,
    SimulatedEnvironment, WorldPoint,
};

/// Square domain anchored at the origin.
pub fn bounds(size: f32) -> DomainBounds {
    DomainBounds::from_size(size, size).unwrap()
}

/// Field whose weakest value sits at `center`, rising linearly away from it.
pub fn bowl_field(size: f32, center: WorldPoint) -> SignalField {
    SignalField::from_fn(bounds(size), 1.0, move |p| -90.0 + 0.1 * p.distance(&center))
}

pub fn environment(
    size: f32,
    center: WorldPoint,
    obstacles: Vec<Obstacle>,
) -> SimulatedEnvironment {
    SimulatedEnvironment::new(bounds(size), bowl_field(size, center), obstacles)
}

/// 60x60 domain with two obstacles crossing sweep rows and the field
/// minimum in the open north-east corner.
pub fn two_block_environment() -> SimulatedEnvironment {
    environment(
        60.0,
        WorldPoint::new(48.0, 48.0),
        vec![
            Obstacle::new(WorldPoint::new(20.0, 20.0), 10.0, 10.0),
            Obstacle::new(WorldPoint::new(38.0, 8.0), 6.0, 14.0),
        ],
    )
}

/// Short dwell timers so episodes finish quickly.
pub fn fast_config(size: f32) -> KshetraConfig {
    let mut config = KshetraConfig::default();
    config.domain.width = size;
    config.domain.height = size;
    config.navigation.measuring_dwell_ticks = 3;
    config.navigation.visualizing_dwell_ticks = 3;
    config
}

/// Empty grid with a filled rectangle of cells (inclusive corners).
pub fn grid_with_block(size: usize, from: GridCoord, to: GridCoord) -> OccupancyGrid {
    let mut grid = OccupancyGrid::empty(size, size, 1.0, WorldPoint::ZERO);
    grid.fill_rect(from, to);
    grid
}

/// Every consecutive pair of cells has an unobstructed straight line.
pub fn assert_collision_free(grid: &OccupancyGrid, path: &[GridCoord]) {
    for pair in path.windows(2) {
        assert!(
            grid.line_of_sight(pair[0], pair[1]),
            "segment {:?} -> {:?} crosses an obstacle",
            pair[0],
            pair[1]
        );
    }
}
