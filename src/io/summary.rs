//! Episode summary, serialised as JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::WorldPoint;
use crate::coverage::CoverageStats;
use crate::error::Result;
use crate::measurement::MeasuredPoint;
use crate::navigation::{EpisodeOutcome, Phase};

/// End-of-run report for one episode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Environment seed
    pub seed: u64,
    /// Navigation strategy name
    pub strategy: String,
    pub ticks: u64,
    /// Phase when the run stopped
    pub phase: Phase,
    /// Absent when the tick limit was hit first
    pub outcome: Option<EpisodeOutcome>,
    pub start: WorldPoint,
    pub final_position: WorldPoint,
    pub target: Option<MeasuredPoint>,
    /// Measurements recorded during coverage
    pub measurements: usize,
    pub coverage: CoverageStats,
    pub distance_travelled: f32,
}

impl EpisodeSummary {
    /// Distance from the final position to the target, if one was resolved
    pub fn final_error(&self) -> Option<f32> {
        self.target
            .map(|t| self.final_position.distance(&t.position))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the summary as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
