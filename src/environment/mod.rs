//! The survey environment: a scalar signal field plus static obstacles.
//!
//! The navigation stack only sees the [`Environment`] trait. The concrete
//! [`SimulatedEnvironment`] generates a smoothed random field and random
//! rectangular obstacles from a seed, so an episode is fully reproducible.

mod field;
mod generator;
mod obstacle;

pub use field::SignalField;
pub use generator::{EnvironmentGenerator, GeneratorConfig};
pub use obstacle::Obstacle;

use crate::core::{DomainBounds, WorldPoint};

/// Read-only view of the world the robot surveys.
///
/// Implementations must be pure for the duration of an episode: repeated
/// queries at the same point return the same answer.
pub trait Environment {
    /// Scalar field value at a continuous coordinate. Lower is weaker.
    fn sample(&self, point: WorldPoint) -> f32;

    /// Is the point inside an obstacle?
    fn is_obstacle(&self, point: WorldPoint) -> bool;

    /// Domain bounds.
    fn bounds(&self) -> DomainBounds;
}

/// Environment backed by a gridded field and a list of rectangles.
#[derive(Clone, Debug)]
pub struct SimulatedEnvironment {
    bounds: DomainBounds,
    field: SignalField,
    obstacles: Vec<Obstacle>,
}

impl SimulatedEnvironment {
    pub fn new(bounds: DomainBounds, field: SignalField, obstacles: Vec<Obstacle>) -> Self {
        Self {
            bounds,
            field,
            obstacles,
        }
    }

    /// Obstacle-free environment.
    pub fn open(bounds: DomainBounds, field: SignalField) -> Self {
        Self::new(bounds, field, Vec::new())
    }

    pub fn field(&self) -> &SignalField {
        &self.field
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }
}

impl Environment for SimulatedEnvironment {
    fn sample(&self, point: WorldPoint) -> f32 {
        self.field.sample(point)
    }

    fn is_obstacle(&self, point: WorldPoint) -> bool {
        self.obstacles.iter().any(|o| o.contains(point))
    }

    fn bounds(&self) -> DomainBounds {
        self.bounds
    }
}
