//! Reactive potential-field controller.
//!
//! Net steering = unit attraction toward the goal + Σ repulsion from occupied
//! cells inside the detection radius. Each cell pushes along `pos - cell`
//! with strength `gain · (1/d − 1/R)`, which is zero at the radius and grows
//! as the robot closes in. Velocity integrates the steering with momentum:
//! `v' = decay · v + net`.

use tracing::trace;

use crate::core::{DomainBounds, RobotState, WorldPoint};
use crate::grid::OccupancyGrid;

use super::config::NavigationConfig;

/// Distance floor for the inverse-distance term
const MIN_DISTANCE: f32 = 0.1;

/// Potential-field steering with momentum.
#[derive(Clone, Debug)]
pub struct PotentialField {
    detection_radius: f32,
    repulsion_gain: f32,
    momentum_decay: f32,
    approach_gain: f32,
    max_speed: f32,
}

/// Outcome of a reactive tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ReactiveStep {
    /// Moved by the given displacement
    Moved(WorldPoint),
    /// Every candidate move entered an occupied cell
    Blocked,
}

impl PotentialField {
    pub fn new(config: &NavigationConfig) -> Self {
        Self {
            detection_radius: config.detection_radius,
            repulsion_gain: config.repulsion_gain,
            momentum_decay: config.momentum_decay,
            approach_gain: config.approach_gain,
            max_speed: config.max_speed,
        }
    }

    /// Unit vector toward the goal.
    pub fn attraction(&self, position: WorldPoint, goal: WorldPoint) -> WorldPoint {
        (goal - position).normalize()
    }

    /// Summed repulsion from occupied cells within the detection radius.
    pub fn repulsion(&self, position: WorldPoint, grid: &OccupancyGrid) -> WorldPoint {
        let inv_radius = 1.0 / self.detection_radius;
        grid.occupied_within(position, self.detection_radius)
            .into_iter()
            .fold(WorldPoint::ZERO, |acc, cell| {
                let away = position - cell;
                let d = away.length().max(MIN_DISTANCE);
                let strength = self.repulsion_gain * (1.0 / d - inv_radius);
                acc + away.normalize() * strength
            })
    }

    pub fn net_force(
        &self,
        position: WorldPoint,
        goal: WorldPoint,
        grid: &OccupancyGrid,
    ) -> WorldPoint {
        self.attraction(position, goal) + self.repulsion(position, grid)
    }

    /// Per-tick speed limit: `max_speed`, reduced in proportion to the
    /// remaining distance near the goal.
    pub fn speed_limit(&self, distance_to_goal: f32) -> f32 {
        self.max_speed.min(self.approach_gain * distance_to_goal)
    }

    /// Advance the robot one tick.
    ///
    /// If the full displacement would enter an occupied cell the x-only and
    /// then y-only components are tried; failing both, the robot stops and
    /// its momentum is cleared.
    pub fn step(
        &self,
        robot: &mut RobotState,
        goal: WorldPoint,
        grid: &OccupancyGrid,
        bounds: &DomainBounds,
    ) -> ReactiveStep {
        let position = robot.position;
        let net = self.net_force(position, goal, grid);
        let velocity = robot.velocity * self.momentum_decay + net;
        let displacement = velocity.clamp_length(self.speed_limit(position.distance(&goal)));

        let applied = Self::try_move(robot, displacement, grid, bounds);
        if let ReactiveStep::Moved(d) = applied {
            trace!(
                "[Reactive] net=({:.2},{:.2}) step=({:.2},{:.2})",
                net.x, net.y, d.x, d.y
            );
        }
        applied
    }

    /// Apply `displacement`, or its x-only or y-only component, whichever
    /// first stays out of occupied cells. Stops the robot if none does.
    pub fn try_move(
        robot: &mut RobotState,
        displacement: WorldPoint,
        grid: &OccupancyGrid,
        bounds: &DomainBounds,
    ) -> ReactiveStep {
        let position = robot.position;
        let candidates = [
            displacement,
            WorldPoint::new(displacement.x, 0.0),
            WorldPoint::new(0.0, displacement.y),
        ];
        let chosen = candidates
            .into_iter()
            .find(|d| d.length() > 0.0 && !grid.is_occupied_at(bounds.clamp(position + *d)));

        match chosen {
            Some(d) => ReactiveStep::Moved(robot.advance(d, displacement.length(), bounds)),
            None => {
                robot.hold();
                ReactiveStep::Blocked
            }
        }
    }
}
