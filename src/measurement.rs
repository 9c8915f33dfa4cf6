//! Field measurements taken during the coverage sweep.

use serde::{Deserialize, Serialize};

use crate::core::WorldPoint;

/// A field sample taken at a reached waypoint.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeasuredPoint {
    pub position: WorldPoint,
    pub value: f32,
}

impl MeasuredPoint {
    pub fn new(position: WorldPoint, value: f32) -> Self {
        Self { position, value }
    }
}

/// Append-only measurement record.
///
/// Written by the coverage sweep, then frozen when the navigation target is
/// resolved. Appends after freezing are dropped.
#[derive(Clone, Debug, Default)]
pub struct MeasurementLog {
    points: Vec<MeasuredPoint>,
    frozen: bool,
}

impl MeasurementLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a measurement. Returns `false` if the log is frozen.
    pub fn record(&mut self, point: MeasuredPoint) -> bool {
        if self.frozen {
            return false;
        }
        self.points.push(point);
        true
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[MeasuredPoint] {
        &self.points
    }

    /// Weakest measurement. Ties go to the earliest record.
    pub fn minimum(&self) -> Option<MeasuredPoint> {
        self.points.iter().fold(None, |best, p| match best {
            Some(b) if b.value <= p.value => Some(b),
            _ => Some(*p),
        })
    }
}
