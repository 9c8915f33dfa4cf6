//! Per-tick trajectory recording.

use serde::{Deserialize, Serialize};

use crate::core::WorldPoint;

/// One recorded tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryRow {
    pub x: f32,
    pub y: f32,
    /// Field value at the robot position
    pub value: f32,
    /// Seconds since episode start
    pub timestamp: f32,
}

impl TrajectoryRow {
    pub fn position(&self) -> WorldPoint {
        WorldPoint::new(self.x, self.y)
    }
}

/// Collects one [`TrajectoryRow`] per tick.
#[derive(Clone, Debug)]
pub struct TrajectoryRecorder {
    rows: Vec<TrajectoryRow>,
    tick_period: f32,
}

impl TrajectoryRecorder {
    pub fn new(tick_period: f32) -> Self {
        Self {
            rows: Vec::new(),
            tick_period,
        }
    }

    /// Record the robot's state at the end of `tick`.
    pub fn record(&mut self, tick: u64, position: WorldPoint, value: f32) {
        self.rows.push(TrajectoryRow {
            x: position.x,
            y: position.y,
            value,
            timestamp: tick as f32 * self.tick_period,
        });
    }

    pub fn rows(&self) -> &[TrajectoryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total path length over the recorded positions.
    pub fn distance_travelled(&self) -> f32 {
        self.rows
            .windows(2)
            .map(|w| w[0].position().distance(&w[1].position()))
            .sum()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_timestamps_follow_tick_period() {
        let mut recorder = TrajectoryRecorder::new(0.5);
        recorder.record(1, WorldPoint::new(0.0, 0.0), -50.0);
        recorder.record(2, WorldPoint::new(3.0, 4.0), -55.0);

        assert_eq!(recorder.len(), 2);
        assert_relative_eq!(recorder.rows()[1].timestamp, 1.0);
        assert_relative_eq!(recorder.distance_travelled(), 5.0);

        recorder.clear();
        assert!(recorder.is_empty());
        assert_eq!(recorder.distance_travelled(), 0.0);
    }
}
