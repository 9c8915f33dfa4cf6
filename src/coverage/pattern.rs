//! Boustrophedon sweep generation.
//!
//! ```text
//!   row 2  ●──●──●──●──▶
//!                     │
//!   row 1  ◀──●──●──●──●
//!          │
//!   row 0  ●──●──●──●──▶
//! ```

use crate::core::{DomainBounds, WorldPoint};
use crate::error::{KshetraError, Result};

/// Deterministic back-and-forth waypoint sequence over the domain.
///
/// The pattern ignores obstacles. Blocked waypoints are handled at execution
/// time by the [`CoveragePlanner`](super::CoveragePlanner).
#[derive(Clone, Debug, PartialEq)]
pub struct SweepPattern {
    waypoints: Vec<WorldPoint>,
    rows: usize,
}

impl SweepPattern {
    /// Rows and columns start at `min + margin` and step by `spacing` while
    /// strictly below `max - margin`. Odd rows run right to left.
    pub fn generate(bounds: &DomainBounds, spacing: f32, margin: f32) -> Result<Self> {
        if spacing.is_nan() || spacing <= 0.0 {
            return Err(KshetraError::Config(format!(
                "sweep spacing must be positive, got {}",
                spacing
            )));
        }
        if margin.is_nan() || margin < 0.0 {
            return Err(KshetraError::Config(format!(
                "sweep margin must be non-negative, got {}",
                margin
            )));
        }

        let xs = axis_stops(bounds.min.x + margin, bounds.max.x - margin, spacing);
        let ys = axis_stops(bounds.min.y + margin, bounds.max.y - margin, spacing);

        let mut waypoints = Vec::with_capacity(xs.len() * ys.len());
        for (row, &y) in ys.iter().enumerate() {
            if row % 2 == 0 {
                waypoints.extend(xs.iter().map(|&x| WorldPoint::new(x, y)));
            } else {
                waypoints.extend(xs.iter().rev().map(|&x| WorldPoint::new(x, y)));
            }
        }

        Ok(Self {
            waypoints,
            rows: ys.len(),
        })
    }

    pub fn waypoints(&self) -> &[WorldPoint] {
        &self.waypoints
    }

    pub fn into_waypoints(self) -> Vec<WorldPoint> {
        self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
}

/// `start, start + step, ...` strictly below `end`. Computed by index to
/// avoid accumulating float error.
fn axis_stops(start: f32, end: f32, step: f32) -> Vec<f32> {
    (0..)
        .map(|i| start + i as f32 * step)
        .take_while(|&v| v < end)
        .collect()
}
