//! Episode phase state machine.
//!
//! ```text
//! Coverage ──sweep done──▶ Measuring ──dwell──▶ Visualizing ──dwell──▶ Navigation ──arrived──▶ Done
//!                                   (target fixed)                  (route planned)   (or route exhausted)
//! ```
//!
//! The controller is the only owner of the phase. Every [`step`] returns the
//! phase after the tick together with the events it produced, so callers
//! never need shared state to follow the episode.
//!
//! [`step`]: NavigationController::step

use tracing::{debug, info, warn};

use crate::core::{RobotState, WorldPoint};
use crate::coverage::{CoveragePlanner, CoverageStats, CoverageStatus};
use crate::environment::Environment;
use crate::error::KshetraError;
use crate::grid::OccupancyGrid;
use crate::measurement::{MeasuredPoint, MeasurementLog};

use super::config::NavigationConfig;
use super::events::NavEvent;
use super::phase::{EpisodeOutcome, Phase};
use super::strategy::{NavContext, NavigationStrategy, StrategyStatus, create_strategy};

/// Result of a single controller tick.
#[derive(Clone, Debug)]
pub struct NavigationStep {
    /// Phase after this tick.
    pub phase: Phase,
    /// Events raised during this tick, in order.
    pub events: Vec<NavEvent>,
    /// Displacement applied to the robot this tick.
    pub displacement: WorldPoint,
}

/// Drives one survey episode.
///
/// 1. Sweep the domain with the [`CoveragePlanner`], measuring the field
/// 2. Dwell in Measuring, then fix the target at the weakest measurement
/// 3. Dwell in Visualizing, then hand over to the navigation strategy
/// 4. Stop once the robot starts a tick within arrival tolerance
pub struct NavigationController {
    config: NavigationConfig,
    phase: Phase,
    phase_ticks: u32,
    coverage: CoveragePlanner,
    measurements: MeasurementLog,
    target: Option<MeasuredPoint>,
    strategy: Box<dyn NavigationStrategy>,
    outcome: Option<EpisodeOutcome>,
}

impl NavigationController {
    /// Controller in the Coverage phase with the strategy `config` selects.
    pub fn new(config: NavigationConfig, coverage: CoveragePlanner) -> Self {
        let strategy = create_strategy(&config);
        Self::with_strategy(config, coverage, strategy)
    }

    /// Controller with an explicit navigation strategy.
    pub fn with_strategy(
        config: NavigationConfig,
        coverage: CoveragePlanner,
        strategy: Box<dyn NavigationStrategy>,
    ) -> Self {
        info!(
            "[Nav] episode start: {} sweep waypoints, strategy={}",
            coverage.waypoints().len(),
            strategy.name()
        );
        Self {
            config,
            phase: Phase::Coverage,
            phase_ticks: 0,
            coverage,
            measurements: MeasurementLog::new(),
            target: None,
            strategy,
            outcome: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Human-readable status line
    pub fn phase_description(&self) -> String {
        self.phase.description(Some(self.coverage.progress()))
    }

    /// Waypoints the robot is currently working through.
    pub fn planned_path(&self) -> Vec<WorldPoint> {
        match self.phase {
            Phase::Coverage => self.coverage.planned_path(),
            Phase::Navigation => self.strategy.planned_path().to_vec(),
            _ => Vec::new(),
        }
    }

    pub fn measurements(&self) -> &MeasurementLog {
        &self.measurements
    }

    /// Navigation target and its measured value, once resolved.
    pub fn target(&self) -> Option<MeasuredPoint> {
        self.target
    }

    pub fn outcome(&self) -> Option<EpisodeOutcome> {
        self.outcome
    }

    pub fn coverage_stats(&self) -> CoverageStats {
        self.coverage.stats()
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Advance the episode by one tick.
    pub fn step(
        &mut self,
        robot: &mut RobotState,
        grid: &OccupancyGrid,
        env: &dyn Environment,
    ) -> NavigationStep {
        let start = robot.position;
        let mut events = Vec::new();

        match self.phase {
            Phase::Coverage => {
                let status =
                    self.coverage
                        .step(robot, grid, env, &mut self.measurements, &mut events);
                if status == CoverageStatus::Complete {
                    let stats = self.coverage.stats();
                    info!(
                        "[Nav] coverage complete: {} measured ({} detour), {} skipped",
                        stats.reached(),
                        stats.detour_reached,
                        stats.skipped
                    );
                    self.transition(Phase::Measuring, &mut events);
                }
            }
            Phase::Measuring => {
                robot.hold();
                self.phase_ticks += 1;
                if self.phase_ticks >= self.config.measuring_dwell_ticks {
                    self.resolve_target(robot, grid, env, &mut events);
                    self.transition(Phase::Visualizing, &mut events);
                }
            }
            Phase::Visualizing => {
                robot.hold();
                self.phase_ticks += 1;
                if self.phase_ticks >= self.config.visualizing_dwell_ticks {
                    self.enter_navigation(robot, grid, env, &mut events);
                }
            }
            Phase::Navigation => self.navigate(robot, grid, env, &mut events),
            Phase::Done => robot.hold(),
        }

        NavigationStep {
            phase: self.phase,
            events,
            displacement: robot.position - start,
        }
    }

    /// Skip straight to the navigation phase with a fixed target.
    ///
    /// The measurement log is frozen as-is. Returns the events of the phase
    /// change and route planning.
    pub fn start_navigation(
        &mut self,
        target: MeasuredPoint,
        robot: &mut RobotState,
        grid: &OccupancyGrid,
        env: &dyn Environment,
    ) -> Vec<NavEvent> {
        let mut events = Vec::new();
        self.measurements.freeze();
        self.target = Some(target);
        self.enter_navigation(robot, grid, env, &mut events);
        events
    }

    fn transition(&mut self, to: Phase, events: &mut Vec<NavEvent>) {
        info!("[Nav] phase {} -> {}", self.phase, to);
        events.push(NavEvent::PhaseChanged {
            from: self.phase,
            to,
        });
        self.phase = to;
        self.phase_ticks = 0;
    }

    /// Fix the target at the weakest measurement and freeze the log.
    fn resolve_target(
        &mut self,
        robot: &RobotState,
        grid: &OccupancyGrid,
        env: &dyn Environment,
        events: &mut Vec<NavEvent>,
    ) {
        let (target, from_measurements) = match self.measurements.minimum() {
            Some(min) => (min, true),
            None => {
                warn!("[Nav] no measurements, scanning free cells for the minimum");
                (scan_minimum(grid, env, robot), false)
            }
        };
        self.measurements.freeze();
        self.target = Some(target);

        info!(
            "[Nav] target ({:.1},{:.1}) value {:.1} from {} measurements",
            target.position.x,
            target.position.y,
            target.value,
            self.measurements.len()
        );
        events.push(NavEvent::TargetResolved {
            position: target.position,
            value: target.value,
            from_measurements,
        });
    }

    fn enter_navigation(
        &mut self,
        robot: &mut RobotState,
        grid: &OccupancyGrid,
        env: &dyn Environment,
        events: &mut Vec<NavEvent>,
    ) {
        self.transition(Phase::Navigation, events);

        let target = match self.target {
            Some(t) => t,
            None => {
                let t = scan_minimum(grid, env, robot);
                self.target = Some(t);
                t
            }
        };
        let ctx = NavContext {
            target: target.position,
            grid,
            env,
            bounds: env.bounds(),
        };
        let status = self.strategy.begin(&ctx, robot, events);
        self.handle_status(status, robot, events);
    }

    fn navigate(
        &mut self,
        robot: &mut RobotState,
        grid: &OccupancyGrid,
        env: &dyn Environment,
        events: &mut Vec<NavEvent>,
    ) {
        let Some(target) = self.target else {
            robot.hold();
            return;
        };

        let distance = robot.position.distance(&target.position);
        if distance < self.config.arrival_tolerance {
            info!(
                "[Nav] arrived at ({:.1},{:.1}), {:.2} from target",
                robot.position.x, robot.position.y, distance
            );
            robot.hold();
            events.push(NavEvent::Arrived {
                position: robot.position,
                distance,
            });
            self.finish(EpisodeOutcome::Arrived, events);
            return;
        }

        let ctx = NavContext {
            target: target.position,
            grid,
            env,
            bounds: env.bounds(),
        };
        let status = self.strategy.step(&ctx, robot, events);
        self.handle_status(status, robot, events);
    }

    fn handle_status(
        &mut self,
        status: StrategyStatus,
        robot: &mut RobotState,
        events: &mut Vec<NavEvent>,
    ) {
        match status {
            StrategyStatus::Active => {}
            StrategyStatus::Unreachable(cell) => {
                let err = KshetraError::DegenerateObstacleConfiguration(cell);
                warn!("[Nav] {}, ending episode", err);
                robot.hold();
                events.push(NavEvent::TargetUnreachable { cell });
                self.finish(EpisodeOutcome::Unreachable, events);
            }
            StrategyStatus::Converged => {
                debug!("[Nav] strategy converged");
                self.finish(EpisodeOutcome::Converged, events);
            }
            StrategyStatus::RouteExhausted => {
                info!("[Nav] route exhausted, ending episode");
                robot.hold();
                self.finish(EpisodeOutcome::RouteExhausted, events);
            }
        }
    }

    fn finish(&mut self, outcome: EpisodeOutcome, events: &mut Vec<NavEvent>) {
        self.outcome = Some(outcome);
        self.transition(Phase::Done, events);
    }
}

/// Weakest field value over free cell centres, row-major, first wins.
/// Falls back to the robot's own position on a grid with no free cell.
fn scan_minimum(
    grid: &OccupancyGrid,
    env: &dyn Environment,
    robot: &RobotState,
) -> MeasuredPoint {
    grid.free_cells()
        .map(|c| {
            let p = grid.grid_to_world(c);
            MeasuredPoint::new(p, env.sample(p))
        })
        .fold(None, |best: Option<MeasuredPoint>, p| match best {
            Some(b) if b.value <= p.value => Some(b),
            _ => Some(p),
        })
        .unwrap_or_else(|| MeasuredPoint::new(robot.position, env.sample(robot.position)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DomainBounds, GridCoord};
    use crate::environment::{Obstacle, SignalField, SimulatedEnvironment};
    use crate::navigation::FallbackReason;
    use crate::pathfinding::PathFailure;

    fn three_point_field(bounds: DomainBounds) -> SignalField {
        SignalField::from_fn(bounds, 1.0, |p| match (p.x as i32, p.y as i32) {
            (0, 0) => -40.0,
            (5, 5) => -90.0,
            (9, 9) => -60.0,
            _ => -50.0,
        })
    }

    fn setup(
        obstacles: Vec<Obstacle>,
        waypoints: Vec<WorldPoint>,
    ) -> (SimulatedEnvironment, OccupancyGrid, NavigationController) {
        let bounds = DomainBounds::from_size(20.0, 20.0).unwrap();
        let env = SimulatedEnvironment::new(bounds, three_point_field(bounds), obstacles);
        let grid = OccupancyGrid::from_environment(&env, 1.0).unwrap();
        let coverage = CoveragePlanner::with_waypoints(bounds, waypoints, 20.0);
        let config = NavigationConfig::default().with_dwell_ticks(2, 3);
        (env, grid, NavigationController::new(config, coverage))
    }

    #[test]
    fn test_phase_sequence_and_target() {
        let waypoints = vec![
            WorldPoint::new(0.0, 0.0),
            WorldPoint::new(5.0, 5.0),
            WorldPoint::new(9.0, 9.0),
        ];
        let (env, grid, mut nav) = setup(Vec::new(), waypoints);
        let mut robot = RobotState::at(WorldPoint::ZERO);

        let phases: Vec<Phase> = (0..8).map(|_| nav.step(&mut robot, &grid, &env).phase).collect();
        assert_eq!(
            phases,
            vec![
                Phase::Coverage,
                Phase::Coverage,
                Phase::Measuring,
                Phase::Measuring,
                Phase::Visualizing,
                Phase::Visualizing,
                Phase::Visualizing,
                Phase::Navigation,
            ]
        );

        let target = nav.target().unwrap();
        assert_eq!(target.position, WorldPoint::new(5.0, 5.0));
        assert_eq!(target.value, -90.0);
        assert_eq!(nav.measurements().len(), 3);
        assert!(nav.measurements().is_frozen());
    }

    #[test]
    fn test_target_fixed_across_navigation() {
        let waypoints = vec![WorldPoint::new(0.0, 0.0), WorldPoint::new(5.0, 5.0)];
        let (env, grid, mut nav) = setup(Vec::new(), waypoints);
        let mut robot = RobotState::at(WorldPoint::new(0.0, 0.0));

        let mut resolved = Vec::new();
        for _ in 0..100 {
            let step = nav.step(&mut robot, &grid, &env);
            resolved.extend(
                step.events
                    .iter()
                    .filter(|e| matches!(e, NavEvent::TargetResolved { .. }))
                    .cloned(),
            );
            if step.phase == Phase::Done {
                break;
            }
        }
        assert_eq!(resolved.len(), 1);
        assert_eq!(nav.phase(), Phase::Done);
        assert_eq!(nav.outcome(), Some(EpisodeOutcome::Arrived));
        assert_eq!(nav.target().unwrap().position, WorldPoint::new(5.0, 5.0));
    }

    #[test]
    fn test_arrival_advances_on_next_tick() {
        let (env, grid, mut nav) = setup(Vec::new(), Vec::new());
        let mut robot = RobotState::at(WorldPoint::new(10.0, 10.0));
        let target = MeasuredPoint::new(WorldPoint::new(11.0, 11.0), -80.0);

        let events = nav.start_navigation(target, &mut robot, &grid, &env);
        assert!(events.contains(&NavEvent::PhaseChanged {
            from: Phase::Coverage,
            to: Phase::Navigation
        }));
        assert_eq!(nav.phase(), Phase::Navigation);

        let step = nav.step(&mut robot, &grid, &env);
        assert_eq!(step.phase, Phase::Done);
        assert_eq!(step.displacement, WorldPoint::ZERO);
        assert!(matches!(step.events[0], NavEvent::Arrived { .. }));
        assert_eq!(nav.outcome(), Some(EpisodeOutcome::Arrived));
    }

    /// Holds still and reports its route used up on the first step.
    struct ExhaustedRoute;

    impl NavigationStrategy for ExhaustedRoute {
        fn name(&self) -> &'static str {
            "exhausted"
        }

        fn begin(
            &mut self,
            _ctx: &NavContext<'_>,
            _robot: &RobotState,
            _events: &mut Vec<NavEvent>,
        ) -> StrategyStatus {
            StrategyStatus::Active
        }

        fn step(
            &mut self,
            _ctx: &NavContext<'_>,
            _robot: &mut RobotState,
            events: &mut Vec<NavEvent>,
        ) -> StrategyStatus {
            events.push(NavEvent::RouteExhausted);
            StrategyStatus::RouteExhausted
        }

        fn planned_path(&self) -> &[WorldPoint] {
            &[]
        }
    }

    #[test]
    fn test_route_exhaustion_ends_episode() {
        let (env, grid, _) = setup(Vec::new(), Vec::new());
        let coverage = CoveragePlanner::with_waypoints(env.bounds(), Vec::new(), 20.0);
        let mut nav = NavigationController::with_strategy(
            NavigationConfig::default(),
            coverage,
            Box::new(ExhaustedRoute),
        );
        let mut robot = RobotState::at(WorldPoint::new(2.5, 2.5));
        let target = MeasuredPoint::new(WorldPoint::new(15.5, 15.5), -90.0);

        nav.start_navigation(target, &mut robot, &grid, &env);
        let step = nav.step(&mut robot, &grid, &env);

        assert_eq!(step.phase, Phase::Done);
        assert_eq!(step.displacement, WorldPoint::ZERO);
        assert_eq!(step.events[0], NavEvent::RouteExhausted);
        assert_eq!(nav.outcome(), Some(EpisodeOutcome::RouteExhausted));
        assert_eq!(robot.position, WorldPoint::new(2.5, 2.5));
    }

    #[test]
    fn test_occupied_goal_falls_back_without_fault() {
        let obstacle = Obstacle::new(WorldPoint::new(14.0, 14.0), 3.0, 3.0);
        let (env, grid, mut nav) = setup(vec![obstacle], Vec::new());
        let mut robot = RobotState::at(WorldPoint::new(3.5, 3.5));
        let target = MeasuredPoint::new(WorldPoint::new(15.5, 15.5), -90.0);

        let events = nav.start_navigation(target, &mut robot, &grid, &env);
        assert!(events.contains(&NavEvent::FallbackEngaged {
            reason: FallbackReason::NoPath(PathFailure::GoalBlocked)
        }));

        for _ in 0..50 {
            let step = nav.step(&mut robot, &grid, &env);
            assert!(step.displacement.length() <= 3.0 + 1e-4);
            assert!(!grid.is_occupied_at(robot.position));
        }
        assert_ne!(nav.outcome(), Some(EpisodeOutcome::Unreachable));
    }

    #[test]
    fn test_enclosed_target_ends_episode() {
        let ring = vec![
            Obstacle::new(WorldPoint::new(12.0, 12.0), 5.0, 1.0),
            Obstacle::new(WorldPoint::new(12.0, 16.0), 5.0, 1.0),
            Obstacle::new(WorldPoint::new(12.0, 12.0), 1.0, 5.0),
            Obstacle::new(WorldPoint::new(16.0, 12.0), 1.0, 5.0),
        ];
        let (env, grid, mut nav) = setup(ring, Vec::new());
        let mut robot = RobotState::at(WorldPoint::new(2.5, 2.5));
        let target = MeasuredPoint::new(WorldPoint::new(14.5, 14.5), -90.0);

        let events = nav.start_navigation(target, &mut robot, &grid, &env);
        assert!(events.contains(&NavEvent::TargetUnreachable {
            cell: GridCoord::new(14, 14)
        }));
        assert_eq!(nav.phase(), Phase::Done);
        assert_eq!(nav.outcome(), Some(EpisodeOutcome::Unreachable));
    }

    #[test]
    fn test_empty_sweep_scans_grid_for_target() {
        let (env, grid, mut nav) = setup(Vec::new(), Vec::new());
        let mut robot = RobotState::at(WorldPoint::new(2.5, 2.5));

        let mut resolved = None;
        for _ in 0..4 {
            for e in nav.step(&mut robot, &grid, &env).events {
                if let NavEvent::TargetResolved {
                    position,
                    value,
                    from_measurements,
                } = e
                {
                    resolved = Some((position, value, from_measurements));
                }
            }
        }
        let (position, value, from_measurements) = resolved.unwrap();
        assert!(!from_measurements);
        assert_eq!(value, -90.0);
        assert_eq!(position, WorldPoint::new(5.5, 5.5));
    }

    #[test]
    fn test_planned_path_during_phases() {
        let waypoints = vec![WorldPoint::new(3.0, 3.0), WorldPoint::new(8.0, 3.0)];
        let (env, grid, mut nav) = setup(Vec::new(), waypoints);
        assert_eq!(nav.planned_path(), vec![WorldPoint::new(3.0, 3.0)]);
        assert!(nav.phase_description().contains("(0/2)"));

        let mut robot = RobotState::at(WorldPoint::ZERO);
        nav.step(&mut robot, &grid, &env);
        assert_eq!(nav.planned_path(), vec![WorldPoint::new(8.0, 3.0)]);
    }
}
