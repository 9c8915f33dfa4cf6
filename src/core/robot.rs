//! Robot kinematic state.

use serde::{Deserialize, Serialize};

use super::bounds::DomainBounds;
use super::point::WorldPoint;

/// Position, per-tick velocity and heading of the survey robot.
///
/// Velocity is expressed in domain units per tick, so it is also the
/// displacement applied on the last tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RobotState {
    pub position: WorldPoint,
    pub velocity: WorldPoint,
    /// Heading in radians, CCW from +X. Held when the robot stands still.
    pub heading: f32,
}

impl RobotState {
    /// Robot at rest at `position`, facing +X.
    pub fn at(position: WorldPoint) -> Self {
        Self {
            position,
            velocity: WorldPoint::ZERO,
            heading: 0.0,
        }
    }

    /// Apply one tick of motion.
    ///
    /// The displacement is capped at `max_speed` and the resulting position is
    /// clamped into `bounds`. Returns the displacement actually applied.
    pub fn advance(
        &mut self,
        displacement: WorldPoint,
        max_speed: f32,
        bounds: &DomainBounds,
    ) -> WorldPoint {
        let capped = displacement.clamp_length(max_speed);
        let target = bounds.clamp(self.position + capped);
        let applied = target - self.position;

        self.position = target;
        self.velocity = applied;
        if applied.length() > f32::EPSILON {
            self.heading = applied.heading();
        }
        applied
    }

    /// Stand still for a tick, keeping the heading.
    pub fn hold(&mut self) {
        self.velocity = WorldPoint::ZERO;
    }

    /// Place the robot exactly at `point` (arrival snap), recording the jump
    /// as this tick's velocity.
    pub fn snap_to(&mut self, point: WorldPoint, bounds: &DomainBounds) -> WorldPoint {
        let target = bounds.clamp(point);
        let applied = target - self.position;
        self.position = target;
        self.velocity = applied;
        if applied.length() > f32::EPSILON {
            self.heading = applied.heading();
        }
        applied
    }

    /// Current speed (domain units per tick)
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}
