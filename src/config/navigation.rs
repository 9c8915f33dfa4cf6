//! Navigation configuration section.

use serde::{Deserialize, Serialize};

use crate::navigation::{GradientConfig, StrategyKind};

use super::defaults;

/// Navigation settings section
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NavigationSection {
    /// `hybrid` or `gradient_descent`
    #[serde(default)]
    pub strategy: StrategyKind,

    #[serde(default = "defaults::measuring_dwell_ticks")]
    pub measuring_dwell_ticks: u32,

    #[serde(default = "defaults::visualizing_dwell_ticks")]
    pub visualizing_dwell_ticks: u32,

    /// Distance to the target that ends the episode
    #[serde(default = "defaults::arrival_tolerance")]
    pub arrival_tolerance: f32,

    /// Distance for route waypoint reached
    #[serde(default = "defaults::waypoint_tolerance")]
    pub waypoint_tolerance: f32,

    /// Speed per unit of remaining distance near the target
    #[serde(default = "defaults::approach_gain")]
    pub approach_gain: f32,

    #[serde(default = "defaults::momentum_decay")]
    pub momentum_decay: f32,

    /// Repulsion cut-off distance
    #[serde(default = "defaults::detection_radius")]
    pub detection_radius: f32,

    #[serde(default = "defaults::repulsion_gain")]
    pub repulsion_gain: f32,

    /// Gradient descent tuning
    #[serde(default)]
    pub gradient: GradientSettings,
}

impl Default for NavigationSection {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            measuring_dwell_ticks: defaults::measuring_dwell_ticks(),
            visualizing_dwell_ticks: defaults::visualizing_dwell_ticks(),
            arrival_tolerance: defaults::arrival_tolerance(),
            waypoint_tolerance: defaults::waypoint_tolerance(),
            approach_gain: defaults::approach_gain(),
            momentum_decay: defaults::momentum_decay(),
            detection_radius: defaults::detection_radius(),
            repulsion_gain: defaults::repulsion_gain(),
            gradient: GradientSettings::default(),
        }
    }
}

/// Gradient descent settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GradientSettings {
    #[serde(default = "defaults::learning_rate")]
    pub learning_rate: f32,

    /// Central-difference offset
    #[serde(default = "defaults::gradient_delta")]
    pub gradient_delta: f32,

    #[serde(default = "defaults::anneal_rate")]
    pub anneal_rate: f32,

    #[serde(default = "defaults::min_learning_rate")]
    pub min_learning_rate: f32,

    /// Ticks without improvement before a kick
    #[serde(default = "defaults::stuck_ticks")]
    pub stuck_ticks: u32,

    #[serde(default = "defaults::improvement_threshold")]
    pub improvement_threshold: f32,

    #[serde(default = "defaults::max_kicks")]
    pub max_kicks: u32,

    /// Kick direction seed
    #[serde(default)]
    pub seed: u64,
}

impl Default for GradientSettings {
    fn default() -> Self {
        Self {
            learning_rate: defaults::learning_rate(),
            gradient_delta: defaults::gradient_delta(),
            anneal_rate: defaults::anneal_rate(),
            min_learning_rate: defaults::min_learning_rate(),
            stuck_ticks: defaults::stuck_ticks(),
            improvement_threshold: defaults::improvement_threshold(),
            max_kicks: defaults::max_kicks(),
            seed: 0,
        }
    }
}

impl GradientSettings {
    /// Convert to GradientConfig
    pub fn to_gradient_config(&self) -> GradientConfig {
        GradientConfig {
            learning_rate: self.learning_rate,
            gradient_delta: self.gradient_delta,
            anneal_rate: self.anneal_rate,
            min_learning_rate: self.min_learning_rate,
            stuck_ticks: self.stuck_ticks,
            improvement_threshold: self.improvement_threshold,
            max_kicks: self.max_kicks,
            seed: self.seed,
        }
    }
}
