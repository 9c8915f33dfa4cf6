//! Domain, grid, robot, coverage, environment and simulation sections.

use serde::{Deserialize, Serialize};

use crate::core::WorldPoint;
use crate::environment::GeneratorConfig;

use super::defaults;

/// Survey domain section
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DomainSection {
    #[serde(default = "defaults::domain_extent")]
    pub width: f32,

    #[serde(default = "defaults::domain_extent")]
    pub height: f32,

    /// Lower-left corner
    #[serde(default)]
    pub origin_x: f32,

    #[serde(default)]
    pub origin_y: f32,
}

impl Default for DomainSection {
    fn default() -> Self {
        Self {
            width: defaults::domain_extent(),
            height: defaults::domain_extent(),
            origin_x: 0.0,
            origin_y: 0.0,
        }
    }
}

/// Occupancy grid section
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GridSection {
    /// Cell size (domain units)
    #[serde(default = "defaults::resolution")]
    pub resolution: f32,
}

impl Default for GridSection {
    fn default() -> Self {
        Self {
            resolution: defaults::resolution(),
        }
    }
}

/// Robot section
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RobotSection {
    /// Fixed start position; random when either coordinate is absent
    #[serde(default)]
    pub start_x: Option<f32>,

    #[serde(default)]
    pub start_y: Option<f32>,

    /// Per-tick displacement cap during navigation
    #[serde(default = "defaults::max_speed")]
    pub max_speed: f32,
}

impl Default for RobotSection {
    fn default() -> Self {
        Self {
            start_x: None,
            start_y: None,
            max_speed: defaults::max_speed(),
        }
    }
}

impl RobotSection {
    /// Configured start position, if both coordinates are set
    pub fn start(&self) -> Option<WorldPoint> {
        match (self.start_x, self.start_y) {
            (Some(x), Some(y)) => Some(WorldPoint::new(x, y)),
            _ => None,
        }
    }
}

/// Coverage sweep section
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CoverageSection {
    /// Distance between sweep rows and between stops on a row
    #[serde(default = "defaults::sweep_spacing")]
    pub spacing: f32,

    /// Keep-out band along the domain edge
    #[serde(default = "defaults::sweep_margin")]
    pub margin: f32,

    /// Sweep speed (units per tick)
    #[serde(default = "defaults::sweep_speed")]
    pub speed: f32,
}

impl Default for CoverageSection {
    fn default() -> Self {
        Self {
            spacing: defaults::sweep_spacing(),
            margin: defaults::sweep_margin(),
            speed: defaults::sweep_speed(),
        }
    }
}

/// Random environment section
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnvironmentSection {
    /// Seed for field, obstacles and start position
    #[serde(default)]
    pub seed: u64,

    #[serde(default = "defaults::num_obstacles")]
    pub num_obstacles: usize,

    #[serde(default = "defaults::obstacle_min_size")]
    pub obstacle_min_size: f32,

    #[serde(default = "defaults::obstacle_max_size")]
    pub obstacle_max_size: f32,

    /// Keep-out band for obstacle corners and the random start
    #[serde(default = "defaults::edge_margin")]
    pub edge_margin: f32,

    #[serde(default = "defaults::resolution")]
    pub field_resolution: f32,

    /// Blur standard deviation (domain units)
    #[serde(default = "defaults::smoothing_sigma")]
    pub smoothing_sigma: f32,

    #[serde(default = "defaults::value_min")]
    pub value_min: f32,

    #[serde(default = "defaults::value_max")]
    pub value_max: f32,
}

impl Default for EnvironmentSection {
    fn default() -> Self {
        Self {
            seed: 0,
            num_obstacles: defaults::num_obstacles(),
            obstacle_min_size: defaults::obstacle_min_size(),
            obstacle_max_size: defaults::obstacle_max_size(),
            edge_margin: defaults::edge_margin(),
            field_resolution: defaults::resolution(),
            smoothing_sigma: defaults::smoothing_sigma(),
            value_min: defaults::value_min(),
            value_max: defaults::value_max(),
        }
    }
}

impl EnvironmentSection {
    /// Convert to GeneratorConfig
    pub fn to_generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            num_obstacles: self.num_obstacles,
            obstacle_min_size: self.obstacle_min_size,
            obstacle_max_size: self.obstacle_max_size,
            edge_margin: self.edge_margin,
            field_resolution: self.field_resolution,
            smoothing_sigma: self.smoothing_sigma,
            value_min: self.value_min,
            value_max: self.value_max,
        }
    }
}

/// Headless simulation section
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationSection {
    /// Episode tick limit
    #[serde(default = "defaults::max_ticks")]
    pub max_ticks: u64,

    /// Seconds per tick, used for trajectory timestamps
    #[serde(default = "defaults::tick_period")]
    pub tick_period: f32,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            max_ticks: defaults::max_ticks(),
            tick_period: defaults::tick_period(),
        }
    }
}
