//! Sweep execution with obstacle detours.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{DomainBounds, RobotState, WorldPoint};
use crate::environment::Environment;
use crate::error::{KshetraError, Result};
use crate::grid::OccupancyGrid;
use crate::measurement::{MeasuredPoint, MeasurementLog};
use crate::navigation::{NavEvent, SkipReason};
use crate::pathfinding::plan_route;

use super::pattern::SweepPattern;

/// Coverage progress after a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoverageStatus {
    InProgress,
    /// Last sweep waypoint reached or skipped
    Complete,
}

/// Sweep counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageStats {
    pub sweep_reached: usize,
    pub detour_reached: usize,
    pub skipped: usize,
    pub detours_planned: usize,
}

impl CoverageStats {
    /// Waypoints that produced a measurement
    pub fn reached(&self) -> usize {
        self.sweep_reached + self.detour_reached
    }
}

/// Drives the robot through a sweep, one tick at a time.
///
/// Waypoints are visited in order at `speed` units per tick. When the
/// straight segment to the next waypoint is blocked, an A* detour is spliced
/// ahead of it. Every reached waypoint, sweep or detour, is measured once.
#[derive(Clone, Debug)]
pub struct CoveragePlanner {
    waypoints: Vec<WorldPoint>,
    index: usize,
    detour: VecDeque<WorldPoint>,
    speed: f32,
    bounds: DomainBounds,
    stats: CoverageStats,
}

impl CoveragePlanner {
    /// Plan a boustrophedon sweep of `bounds`.
    pub fn new(bounds: DomainBounds, spacing: f32, margin: f32, speed: f32) -> Result<Self> {
        let pattern = SweepPattern::generate(&bounds, spacing, margin)?;
        debug!(
            "[Coverage] {} waypoints in {} rows (spacing {:.1}, margin {:.1})",
            pattern.len(),
            pattern.rows(),
            spacing,
            margin
        );
        Ok(Self::with_waypoints(bounds, pattern.into_waypoints(), speed))
    }

    /// Sweep an explicit waypoint list. Points outside `bounds` are clamped.
    pub fn with_waypoints(bounds: DomainBounds, waypoints: Vec<WorldPoint>, speed: f32) -> Self {
        let waypoints = waypoints
            .into_iter()
            .map(|p| match bounds.check(p) {
                Ok(p) => p,
                Err(e) => {
                    warn!("[Coverage] {}, clamping", e);
                    bounds.clamp(p)
                }
            })
            .collect();

        Self {
            waypoints,
            index: 0,
            detour: VecDeque::new(),
            speed,
            bounds,
            stats: CoverageStats::default(),
        }
    }

    pub fn waypoints(&self) -> &[WorldPoint] {
        &self.waypoints
    }

    /// `(processed, total)` sweep waypoints
    pub fn progress(&self) -> (usize, usize) {
        (self.index.min(self.waypoints.len()), self.waypoints.len())
    }

    pub fn stats(&self) -> CoverageStats {
        self.stats
    }

    pub fn is_complete(&self) -> bool {
        self.index >= self.waypoints.len()
    }

    /// Pending detour waypoints followed by the current sweep target.
    pub fn planned_path(&self) -> Vec<WorldPoint> {
        let mut path: Vec<WorldPoint> = self.detour.iter().copied().collect();
        if let Some(&target) = self.waypoints.get(self.index) {
            path.push(target);
        }
        path
    }

    /// Advance one tick.
    pub fn step<E: Environment + ?Sized>(
        &mut self,
        robot: &mut RobotState,
        grid: &OccupancyGrid,
        env: &E,
        log: &mut MeasurementLog,
        events: &mut Vec<NavEvent>,
    ) -> CoverageStatus {
        if let Some(&next) = self.detour.front() {
            self.follow_detour(next, robot, grid, env, log, events);
            return self.status();
        }

        // Drop waypoints that sit inside obstacles
        while let Some(&target) = self.waypoints.get(self.index) {
            if grid.is_free(grid.world_to_grid(target)) {
                break;
            }
            self.skip(target, SkipReason::InsideObstacle, events);
        }

        let Some(&target) = self.waypoints.get(self.index) else {
            robot.hold();
            return CoverageStatus::Complete;
        };

        if !grid.segment_clear(robot.position, target) {
            self.request_detour(target, robot, grid, events);
            robot.hold();
            return self.status();
        }

        if robot.position.distance(&target) < self.speed {
            self.arrive(target, false, robot, env, log, events);
            self.index += 1;
            return self.status();
        }

        let step = (target - robot.position).normalize() * self.speed;
        if grid.is_occupied_at(robot.position + step) {
            self.skip(target, SkipReason::StepBlocked, events);
            robot.hold();
        } else {
            robot.advance(step, self.speed, &self.bounds);
        }
        self.status()
    }

    fn status(&self) -> CoverageStatus {
        if self.is_complete() {
            CoverageStatus::Complete
        } else {
            CoverageStatus::InProgress
        }
    }

    fn follow_detour<E: Environment + ?Sized>(
        &mut self,
        next: WorldPoint,
        robot: &mut RobotState,
        grid: &OccupancyGrid,
        env: &E,
        log: &mut MeasurementLog,
        events: &mut Vec<NavEvent>,
    ) {
        if robot.position.distance(&next) < self.speed {
            self.detour.pop_front();
            self.arrive(next, true, robot, env, log, events);
            return;
        }

        let step = (next - robot.position).normalize() * self.speed;
        if grid.is_occupied_at(robot.position + step) {
            self.detour.clear();
            if let Some(&target) = self.waypoints.get(self.index) {
                self.skip(target, SkipReason::StepBlocked, events);
            }
            robot.hold();
        } else {
            robot.advance(step, self.speed, &self.bounds);
        }
    }

    fn request_detour(
        &mut self,
        target: WorldPoint,
        robot: &RobotState,
        grid: &OccupancyGrid,
        events: &mut Vec<NavEvent>,
    ) {
        match plan_route(grid, robot.position, target) {
            Ok(route) => {
                // Drop the robot's own cell and the target cell; the target
                // is reached through the sweep itself.
                let inner = route.waypoints.len().saturating_sub(1);
                self.detour
                    .extend(route.waypoints.iter().take(inner).skip(1).copied());
                self.stats.detours_planned += 1;
                debug!(
                    "[Coverage] detour to waypoint {}: {} waypoints, {:.1} long",
                    self.index,
                    self.detour.len(),
                    route.length
                );
                events.push(NavEvent::DetourPlanned {
                    index: self.index,
                    waypoints: self.detour.len(),
                });
                if self.detour.is_empty() {
                    // Nothing to splice, so retrying would loop forever
                    self.skip(target, SkipReason::NoDetour, events);
                }
            }
            Err(KshetraError::NoPathFound(reason)) => {
                warn!(
                    "[Coverage] no detour to waypoint {} ({:.1},{:.1}): {}",
                    self.index, target.x, target.y, reason
                );
                events.push(NavEvent::DetourFailed {
                    index: self.index,
                    reason,
                });
                self.skip(target, SkipReason::NoDetour, events);
            }
            Err(e) => {
                warn!("[Coverage] detour planning error: {}", e);
                self.skip(target, SkipReason::NoDetour, events);
            }
        }
    }

    fn arrive<E: Environment + ?Sized>(
        &mut self,
        point: WorldPoint,
        detour: bool,
        robot: &mut RobotState,
        env: &E,
        log: &mut MeasurementLog,
        events: &mut Vec<NavEvent>,
    ) {
        robot.snap_to(point, &self.bounds);
        let value = env.sample(robot.position);
        log.record(MeasuredPoint::new(robot.position, value));

        if detour {
            self.stats.detour_reached += 1;
        } else {
            self.stats.sweep_reached += 1;
        }
        trace!(
            "[Coverage] measured {:.1} at ({:.1},{:.1}){}",
            value,
            robot.position.x,
            robot.position.y,
            if detour { " [detour]" } else { "" }
        );
        events.push(NavEvent::WaypointReached {
            position: robot.position,
            value,
            detour,
        });
    }

    fn skip(&mut self, target: WorldPoint, reason: SkipReason, events: &mut Vec<NavEvent>) {
        debug!(
            "[Coverage] skipping waypoint {} ({:.1},{:.1}): {:?}",
            self.index, target.x, target.y, reason
        );
        events.push(NavEvent::WaypointSkipped {
            index: self.index,
            position: target,
            reason,
        });
        self.stats.skipped += 1;
        self.index += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{Obstacle, SignalField, SimulatedEnvironment};

    fn world(obstacles: Vec<Obstacle>) -> (SimulatedEnvironment, OccupancyGrid) {
        let bounds = DomainBounds::from_size(40.0, 40.0).unwrap();
        let field = SignalField::from_fn(bounds, 1.0, |p| -(p.x + p.y));
        let env = SimulatedEnvironment::new(bounds, field, obstacles);
        let grid = OccupancyGrid::from_environment(&env, 1.0).unwrap();
        (env, grid)
    }

    fn run(
        planner: &mut CoveragePlanner,
        robot: &mut RobotState,
        env: &SimulatedEnvironment,
        grid: &OccupancyGrid,
        log: &mut MeasurementLog,
    ) -> Vec<NavEvent> {
        let mut events = Vec::new();
        for _ in 0..10_000 {
            if planner.step(robot, grid, env, log, &mut events) == CoverageStatus::Complete {
                return events;
            }
        }
        panic!("coverage did not complete");
    }

    #[test]
    fn test_open_sweep_measures_every_waypoint() {
        let (env, grid) = world(Vec::new());
        let mut planner = CoveragePlanner::new(env.bounds(), 5.0, 5.0, 3.0).unwrap();
        let total = planner.waypoints().len();
        let mut robot = RobotState::at(WorldPoint::new(20.0, 20.0));
        let mut log = MeasurementLog::new();

        run(&mut planner, &mut robot, &env, &grid, &mut log);

        assert_eq!(planner.stats().sweep_reached, total);
        assert_eq!(planner.stats().skipped, 0);
        assert_eq!(log.len(), total);
        assert_eq!(log.points()[0].position, WorldPoint::new(5.0, 5.0));
        assert_eq!(planner.progress(), (total, total));
    }

    #[test]
    fn test_waypoint_inside_obstacle_skipped() {
        // Covers sweep point (10, 5)
        let (env, grid) = world(vec![Obstacle::new(WorldPoint::new(9.0, 4.0), 3.0, 3.0)]);
        let mut planner = CoveragePlanner::new(env.bounds(), 5.0, 5.0, 3.0).unwrap();
        let total = planner.waypoints().len();
        let mut robot = RobotState::at(WorldPoint::new(5.0, 5.0));
        let mut log = MeasurementLog::new();

        let events = run(&mut planner, &mut robot, &env, &grid, &mut log);

        let inside: Vec<_> = events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    NavEvent::WaypointSkipped {
                        reason: SkipReason::InsideObstacle,
                        ..
                    }
                )
            })
            .collect();
        assert_eq!(inside.len(), 1);
        assert!(log.points().iter().all(|p| !env.is_obstacle(p.position)));

        let stats = planner.stats();
        assert_eq!(stats.sweep_reached + stats.skipped, total);
        assert_eq!(log.len(), stats.reached());
    }

    #[test]
    fn test_blocked_segment_plans_detour() {
        // Wall between (5,5)..(35,5) row points, leaving the points free
        let (env, grid) = world(vec![Obstacle::new(WorldPoint::new(12.0, 2.0), 2.0, 8.0)]);
        let waypoints = vec![WorldPoint::new(5.5, 5.5), WorldPoint::new(20.5, 5.5)];
        let mut planner = CoveragePlanner::with_waypoints(env.bounds(), waypoints, 3.0);
        let mut robot = RobotState::at(WorldPoint::new(5.5, 5.5));
        let mut log = MeasurementLog::new();

        let events = run(&mut planner, &mut robot, &env, &grid, &mut log);

        assert!(
            events
                .iter()
                .any(|e| matches!(e, NavEvent::DetourPlanned { index: 1, .. }))
        );
        let stats = planner.stats();
        assert_eq!(stats.sweep_reached, 2);
        assert!(stats.detour_reached >= 1);
        assert_eq!(log.len(), stats.reached());
        assert_eq!(robot.position, WorldPoint::new(20.5, 5.5));
        assert!(log.points().iter().all(|p| !env.is_obstacle(p.position)));
    }

    #[test]
    fn test_nearby_waypoint_behind_wall_not_measured() {
        // Full-height wall splits the domain; the waypoint is within one step
        let (env, grid) = world(vec![Obstacle::new(WorldPoint::new(7.0, 0.0), 1.0, 40.0)]);
        let waypoints = vec![WorldPoint::new(8.5, 5.5)];
        let mut planner = CoveragePlanner::with_waypoints(env.bounds(), waypoints, 3.0);
        let mut robot = RobotState::at(WorldPoint::new(6.5, 5.5));
        let mut log = MeasurementLog::new();

        let events = run(&mut planner, &mut robot, &env, &grid, &mut log);

        assert!(log.is_empty());
        assert!(events.iter().any(|e| matches!(e, NavEvent::DetourFailed { index: 0, .. })));
        assert_eq!(planner.stats().skipped, 1);
        assert_eq!(robot.position, WorldPoint::new(6.5, 5.5));
    }

    #[test]
    fn test_nearby_waypoint_behind_wall_reached_by_detour() {
        let (env, grid) = world(vec![Obstacle::new(WorldPoint::new(7.0, 0.0), 1.0, 12.0)]);
        let target = WorldPoint::new(8.5, 5.5);
        let mut planner = CoveragePlanner::with_waypoints(env.bounds(), vec![target], 3.0);
        let mut robot = RobotState::at(WorldPoint::new(6.5, 5.5));
        let mut log = MeasurementLog::new();
        let mut events = Vec::new();

        for _ in 0..200 {
            let before = robot.position;
            let status = planner.step(&mut robot, &grid, &env, &mut log, &mut events);
            assert!(!grid.is_occupied_at(robot.position));
            let after = robot.position;
            if (before.x - 7.5) * (after.x - 7.5) < 0.0 {
                // Crossed the wall column; must be above the wall's end
                let t = (7.5 - before.x) / (after.x - before.x);
                assert!(before.y + t * (after.y - before.y) >= 12.0);
            }
            if status == CoverageStatus::Complete {
                break;
            }
        }

        assert!(planner.is_complete());
        assert!(events.iter().any(|e| matches!(e, NavEvent::DetourPlanned { index: 0, .. })));
        assert_eq!(planner.stats().sweep_reached, 1);
        assert_eq!(robot.position, target);
    }

    #[test]
    fn test_enclosed_waypoint_skipped_without_fault() {
        let ring = vec![
            Obstacle::new(WorldPoint::new(20.0, 20.0), 6.0, 1.0),
            Obstacle::new(WorldPoint::new(20.0, 25.0), 6.0, 1.0),
            Obstacle::new(WorldPoint::new(20.0, 20.0), 1.0, 6.0),
            Obstacle::new(WorldPoint::new(25.0, 20.0), 1.0, 6.0),
        ];
        let (env, grid) = world(ring);
        let waypoints = vec![WorldPoint::new(22.5, 22.5), WorldPoint::new(5.5, 30.5)];
        let mut planner = CoveragePlanner::with_waypoints(env.bounds(), waypoints, 3.0);
        let mut robot = RobotState::at(WorldPoint::new(5.5, 5.5));
        let mut log = MeasurementLog::new();

        let events = run(&mut planner, &mut robot, &env, &grid, &mut log);

        assert!(events.iter().any(|e| matches!(e, NavEvent::DetourFailed { index: 0, .. })));
        assert_eq!(planner.stats().skipped, 1);
        assert_eq!(planner.stats().sweep_reached, 1);
    }

    #[test]
    fn test_out_of_bounds_waypoint_clamped() {
        let bounds = DomainBounds::from_size(10.0, 10.0).unwrap();
        let planner = CoveragePlanner::with_waypoints(
            bounds,
            vec![WorldPoint::new(12.0, 5.0), WorldPoint::new(-1.0, -1.0)],
            1.0,
        );
        assert!(planner.waypoints().iter().all(|p| bounds.contains(*p)));
        assert_eq!(planner.waypoints()[1], WorldPoint::ZERO);
    }

    #[test]
    fn test_empty_sweep_completes_immediately() {
        let (env, grid) = world(Vec::new());
        let mut planner = CoveragePlanner::with_waypoints(env.bounds(), Vec::new(), 3.0);
        let mut robot = RobotState::at(WorldPoint::new(1.0, 1.0));
        let mut log = MeasurementLog::new();
        let mut events = Vec::new();

        let status = planner.step(&mut robot, &grid, &env, &mut log, &mut events);
        assert_eq!(status, CoverageStatus::Complete);
        assert!(log.is_empty());
    }
}
