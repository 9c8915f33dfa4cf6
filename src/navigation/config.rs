//! Configuration for navigation behavior.

use serde::{Deserialize, Serialize};

/// Which controller drives the robot during the navigation phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// A* route with potential-field fallback
    #[default]
    Hybrid,
    /// Momentum descent on the field gradient
    GradientDescent,
}

/// Configuration for the navigation phase state machine and its controllers.
///
/// Distances are in domain units, speeds in domain units per tick.
#[derive(Clone, Debug)]
pub struct NavigationConfig {
    /// Per-tick displacement cap.
    /// Default: 3.0
    pub max_speed: f32,

    /// Ticks spent in Measuring before the target is resolved.
    /// Default: 60
    pub measuring_dwell_ticks: u32,

    /// Ticks spent in Visualizing before navigation starts.
    /// Default: 120
    pub visualizing_dwell_ticks: u32,

    /// Distance to the target that counts as arrival.
    /// Default: 2.0
    pub arrival_tolerance: f32,

    /// Distance to a route waypoint that counts as reached.
    /// Default: 3.0
    pub waypoint_tolerance: f32,

    /// Speed per unit of remaining distance near the target.
    /// Default: 0.5
    pub approach_gain: f32,

    /// Weight of the previous velocity in the momentum update.
    /// Default: 0.5
    pub momentum_decay: f32,

    /// Obstacle cells beyond this distance exert no repulsion.
    /// Default: 5.0
    pub detection_radius: f32,

    /// Repulsion scale.
    /// Default: 0.5
    pub repulsion_gain: f32,

    pub strategy: StrategyKind,

    pub gradient: GradientConfig,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            max_speed: 3.0,
            measuring_dwell_ticks: 60,
            visualizing_dwell_ticks: 120,
            arrival_tolerance: 2.0,
            waypoint_tolerance: 3.0,
            approach_gain: 0.5,
            momentum_decay: 0.5,
            detection_radius: 5.0,
            repulsion_gain: 0.5,
            strategy: StrategyKind::Hybrid,
            gradient: GradientConfig::default(),
        }
    }
}

impl NavigationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for max speed.
    pub fn with_max_speed(mut self, speed: f32) -> Self {
        self.max_speed = speed;
        self
    }

    /// Builder-style setter for both dwell timers.
    pub fn with_dwell_ticks(mut self, measuring: u32, visualizing: u32) -> Self {
        self.measuring_dwell_ticks = measuring;
        self.visualizing_dwell_ticks = visualizing;
        self
    }

    /// Builder-style setter for arrival tolerance.
    pub fn with_arrival_tolerance(mut self, tolerance: f32) -> Self {
        self.arrival_tolerance = tolerance;
        self
    }

    /// Builder-style setter for the strategy.
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }
}

/// Tuning for [`GradientDescentStrategy`](super::GradientDescentStrategy).
#[derive(Clone, Debug)]
pub struct GradientConfig {
    /// Initial step scale applied to the descent direction.
    /// Default: 3.0
    pub learning_rate: f32,

    /// Central-difference offset for the field gradient.
    /// Default: 2.0
    pub gradient_delta: f32,

    /// Per-tick multiplicative decay of the learning rate.
    /// Default: 0.995
    pub anneal_rate: f32,

    /// Floor for the annealed learning rate.
    /// Default: 0.5
    pub min_learning_rate: f32,

    /// Ticks without improvement before a random kick.
    /// Default: 30
    pub stuck_ticks: u32,

    /// Minimum decrease in field value that counts as progress.
    /// Default: 0.1
    pub improvement_threshold: f32,

    /// Kicks allowed before the strategy reports convergence.
    /// Default: 5
    pub max_kicks: u32,

    /// Seed for the kick direction generator.
    /// Default: 0
    pub seed: u64,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            learning_rate: 3.0,
            gradient_delta: 2.0,
            anneal_rate: 0.995,
            min_learning_rate: 0.5,
            stuck_ticks: 30,
            improvement_threshold: 0.1,
            max_kicks: 5,
            seed: 0,
        }
    }
}
