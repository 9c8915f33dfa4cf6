//! Seeded random environments.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use super::{Environment, Obstacle, SignalField, SimulatedEnvironment};
use crate::core::{DomainBounds, WorldPoint};

/// Parameters for random environment generation.
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    pub num_obstacles: usize,
    /// Obstacle side length range `[min, max)`
    pub obstacle_min_size: f32,
    pub obstacle_max_size: f32,
    /// Keep-out band along the domain edge for obstacle corners
    pub edge_margin: f32,
    pub field_resolution: f32,
    pub smoothing_sigma: f32,
    pub value_min: f32,
    pub value_max: f32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            num_obstacles: 5,
            obstacle_min_size: 8.0,
            obstacle_max_size: 20.0,
            edge_margin: 10.0,
            field_resolution: 1.0,
            smoothing_sigma: 8.0,
            value_min: -90.0,
            value_max: -30.0,
        }
    }
}

/// Builds a [`SimulatedEnvironment`] and a start position from a seed.
pub struct EnvironmentGenerator {
    config: GeneratorConfig,
    rng: StdRng,
}

impl EnvironmentGenerator {
    /// Rejection-sampling budget per obstacle and for the start position
    const MAX_ATTEMPTS: usize = 100;

    pub fn new(config: GeneratorConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Pick a random obstacle-free start inside the inner region of the domain.
    ///
    /// Call before [`generate`](Self::generate) so obstacles can be kept off it.
    pub fn random_start(&mut self, bounds: &DomainBounds) -> WorldPoint {
        let margin_x = self.config.edge_margin.min(bounds.width() / 2.0);
        let margin_y = self.config.edge_margin.min(bounds.height() / 2.0);
        let x = uniform(&mut self.rng, bounds.min.x + margin_x, bounds.max.x - margin_x);
        let y = uniform(&mut self.rng, bounds.min.y + margin_y, bounds.max.y - margin_y);
        WorldPoint::new(x.floor(), y.floor())
    }

    /// Generate field and obstacles. No obstacle covers the cell of `start`
    /// (a `keep_clear` square of side `cell_size` anchored at the start cell).
    pub fn generate(
        &mut self,
        bounds: DomainBounds,
        start: WorldPoint,
        cell_size: f32,
    ) -> SimulatedEnvironment {
        let field = SignalField::generate(
            bounds,
            self.config.field_resolution,
            self.config.smoothing_sigma,
            self.config.value_min,
            self.config.value_max,
            &mut self.rng,
        );

        let keep_clear = Obstacle::new(
            WorldPoint::new(
                bounds.min.x + ((start.x - bounds.min.x) / cell_size).floor() * cell_size,
                bounds.min.y + ((start.y - bounds.min.y) / cell_size).floor() * cell_size,
            ),
            cell_size,
            cell_size,
        );

        let mut obstacles = Vec::with_capacity(self.config.num_obstacles);
        for i in 0..self.config.num_obstacles {
            match self.random_obstacle(&bounds, &keep_clear) {
                Some(o) => {
                    debug!(
                        "[EnvGen] obstacle {}: ({:.1},{:.1}) {:.1}x{:.1}",
                        i, o.origin.x, o.origin.y, o.width, o.height
                    );
                    obstacles.push(o);
                }
                None => warn!("[EnvGen] could not place obstacle {} clear of start", i),
            }
        }

        SimulatedEnvironment::new(bounds, field, obstacles)
    }

    /// Convenience: random start, then an environment that keeps it clear.
    pub fn generate_with_start(
        &mut self,
        bounds: DomainBounds,
        cell_size: f32,
    ) -> (SimulatedEnvironment, WorldPoint) {
        let start = self.random_start(&bounds);
        let env = self.generate(bounds, start, cell_size);
        debug_assert!(!env.is_obstacle(start));
        (env, start)
    }

    fn random_obstacle(&mut self, bounds: &DomainBounds, keep_clear: &Obstacle) -> Option<Obstacle> {
        let c = &self.config;
        let max_size = c.obstacle_max_size;
        let hi_x = (bounds.max.x - c.edge_margin - max_size).max(bounds.min.x + c.edge_margin);
        let hi_y = (bounds.max.y - c.edge_margin - max_size).max(bounds.min.y + c.edge_margin);
        let (lo_x, lo_y) = (bounds.min.x + c.edge_margin, bounds.min.y + c.edge_margin);
        let (min_size, max_size) = (c.obstacle_min_size, c.obstacle_max_size);

        for _ in 0..Self::MAX_ATTEMPTS {
            let origin = WorldPoint::new(
                uniform(&mut self.rng, lo_x, hi_x).floor(),
                uniform(&mut self.rng, lo_y, hi_y).floor(),
            );
            let width = uniform(&mut self.rng, min_size, max_size).floor().max(1.0);
            let height = uniform(&mut self.rng, min_size, max_size).floor().max(1.0);
            let candidate = Obstacle::new(origin, width, height);
            if !overlaps(&candidate, keep_clear) {
                return Some(candidate);
            }
        }
        None
    }
}

fn uniform(rng: &mut StdRng, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

fn overlaps(a: &Obstacle, b: &Obstacle) -> bool {
    a.origin.x < b.origin.x + b.width
        && b.origin.x < a.origin.x + a.width
        && a.origin.y < b.origin.y + b.height
        && b.origin.y < a.origin.y + a.height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obstacles_never_cover_start() {
        let bounds = DomainBounds::from_size(100.0, 100.0).unwrap();
        for seed in 0..20 {
            let config = GeneratorConfig {
                num_obstacles: 12,
                ..Default::default()
            };
            let mut generator = EnvironmentGenerator::new(config, seed);
            let (env, start) = generator.generate_with_start(bounds, 1.0);
            assert!(!env.is_obstacle(start), "seed {} covered start", seed);
            assert!(bounds.contains(start));
        }
    }

    #[test]
    fn test_same_seed_same_world() {
        let bounds = DomainBounds::from_size(60.0, 60.0).unwrap();
        let (a, sa) = EnvironmentGenerator::new(GeneratorConfig::default(), 3)
            .generate_with_start(bounds, 1.0);
        let (b, sb) = EnvironmentGenerator::new(GeneratorConfig::default(), 3)
            .generate_with_start(bounds, 1.0);

        assert_eq!(sa, sb);
        assert_eq!(a.obstacles(), b.obstacles());
        let p = WorldPoint::new(33.3, 12.1);
        assert_eq!(a.sample(p), b.sample(p));
    }

    #[test]
    fn test_overlap() {
        let a = Obstacle::new(WorldPoint::new(0.0, 0.0), 2.0, 2.0);
        let b = Obstacle::new(WorldPoint::new(1.0, 1.0), 2.0, 2.0);
        let c = Obstacle::new(WorldPoint::new(2.0, 0.0), 2.0, 2.0);
        assert!(overlaps(&a, &b));
        assert!(!overlaps(&a, &c));
    }
}
