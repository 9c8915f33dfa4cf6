//! Main KshetraConfig and conversion methods.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{DomainBounds, WorldPoint};
use crate::environment::GeneratorConfig;
use crate::error::{KshetraError, Result};
use crate::navigation::NavigationConfig;

use super::navigation::NavigationSection;
use super::sections::{
    CoverageSection, DomainSection, EnvironmentSection, GridSection, RobotSection,
    SimulationSection,
};

/// Full Kshetra configuration loaded from TOML
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct KshetraConfig {
    #[serde(default)]
    pub domain: DomainSection,

    #[serde(default)]
    pub grid: GridSection,

    #[serde(default)]
    pub robot: RobotSection,

    #[serde(default)]
    pub coverage: CoverageSection,

    #[serde(default)]
    pub navigation: NavigationSection,

    #[serde(default)]
    pub environment: EnvironmentSection,

    #[serde(default)]
    pub simulation: SimulationSection,
}

fn require(ok: bool, message: impl FnOnce() -> String) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(KshetraError::Config(message()))
    }
}

impl KshetraConfig {
    /// Load and validate configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        debug!("[Config] loading {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no episode can run with.
    pub fn validate(&self) -> Result<()> {
        let d = &self.domain;
        require(d.width > 0.0 && d.height > 0.0, || {
            format!("domain must have positive extent, got {}x{}", d.width, d.height)
        })?;
        require(self.grid.resolution > 0.0, || {
            format!("grid resolution must be positive, got {}", self.grid.resolution)
        })?;
        require(self.robot.max_speed > 0.0, || {
            format!("robot max_speed must be positive, got {}", self.robot.max_speed)
        })?;

        let c = &self.coverage;
        require(c.spacing > 0.0, || {
            format!("coverage spacing must be positive, got {}", c.spacing)
        })?;
        require(c.margin >= 0.0, || {
            format!("coverage margin must be non-negative, got {}", c.margin)
        })?;
        require(c.speed > 0.0, || {
            format!("coverage speed must be positive, got {}", c.speed)
        })?;

        let n = &self.navigation;
        require(n.arrival_tolerance > 0.0 && n.waypoint_tolerance > 0.0, || {
            "navigation tolerances must be positive".to_string()
        })?;
        require(n.detection_radius > 0.0, || {
            format!("detection_radius must be positive, got {}", n.detection_radius)
        })?;
        require((0.0..1.0).contains(&n.momentum_decay), || {
            format!("momentum_decay must be in [0, 1), got {}", n.momentum_decay)
        })?;
        let g = &n.gradient;
        require(g.learning_rate > 0.0 && g.gradient_delta > 0.0, || {
            "gradient learning_rate and gradient_delta must be positive".to_string()
        })?;
        require(g.anneal_rate > 0.0 && g.anneal_rate <= 1.0, || {
            format!("anneal_rate must be in (0, 1], got {}", g.anneal_rate)
        })?;

        let e = &self.environment;
        require(
            e.obstacle_min_size > 0.0 && e.obstacle_min_size <= e.obstacle_max_size,
            || {
                format!(
                    "obstacle size range [{}, {}) is empty",
                    e.obstacle_min_size, e.obstacle_max_size
                )
            },
        )?;
        require(e.field_resolution > 0.0, || {
            format!("field resolution must be positive, got {}", e.field_resolution)
        })?;
        require(e.value_min < e.value_max, || {
            format!("field range [{}, {}] is empty", e.value_min, e.value_max)
        })?;

        require(self.simulation.tick_period > 0.0, || {
            format!("tick_period must be positive, got {}", self.simulation.tick_period)
        })?;

        if let Some(start) = self.robot.start() {
            self.bounds()?.check(start)?;
        }
        Ok(())
    }

    /// Survey domain
    pub fn bounds(&self) -> Result<DomainBounds> {
        let min = WorldPoint::new(self.domain.origin_x, self.domain.origin_y);
        let max = WorldPoint::new(min.x + self.domain.width, min.y + self.domain.height);
        DomainBounds::new(min, max)
    }

    /// Convert to NavigationConfig
    pub fn to_navigation_config(&self) -> NavigationConfig {
        let n = &self.navigation;
        NavigationConfig {
            max_speed: self.robot.max_speed,
            measuring_dwell_ticks: n.measuring_dwell_ticks,
            visualizing_dwell_ticks: n.visualizing_dwell_ticks,
            arrival_tolerance: n.arrival_tolerance,
            waypoint_tolerance: n.waypoint_tolerance,
            approach_gain: n.approach_gain,
            momentum_decay: n.momentum_decay,
            detection_radius: n.detection_radius,
            repulsion_gain: n.repulsion_gain,
            strategy: n.strategy,
            gradient: n.gradient.to_gradient_config(),
        }
    }

    /// Convert to GeneratorConfig
    pub fn to_generator_config(&self) -> GeneratorConfig {
        self.environment.to_generator_config()
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| KshetraError::Config(e.to_string()))
    }
}
