//! Headless episode simulation.
//!
//! [`Simulation`] owns the environment, the occupancy snapshot, the robot and
//! the [`NavigationController`], and advances them in lockstep one tick at a
//! time. It is what the binary and the integration tests drive.
//!
//! ```rust,ignore
//! use kshetra::{KshetraConfig, Simulation};
//!
//! let mut sim = Simulation::from_config(&KshetraConfig::default())?;
//! let summary = sim.run(10_000);
//! println!("{:?} after {} ticks", summary.outcome, summary.ticks);
//! ```

mod trajectory;

pub use trajectory::{TrajectoryRecorder, TrajectoryRow};

use tracing::{debug, info};

use crate::config::KshetraConfig;
use crate::core::{RobotState, WorldPoint};
use crate::coverage::CoveragePlanner;
use crate::environment::{Environment, EnvironmentGenerator, SimulatedEnvironment};
use crate::error::{KshetraError, Result};
use crate::grid::OccupancyGrid;
use crate::io::EpisodeSummary;
use crate::navigation::{NavEvent, NavigationController, Phase};

/// Result of a single simulation tick.
#[derive(Clone, Debug)]
pub struct SimStep {
    /// Tick number, starting at 1
    pub tick: u64,
    /// Phase after the tick
    pub phase: Phase,
    pub events: Vec<NavEvent>,
    pub position: WorldPoint,
    /// Displacement applied this tick
    pub displacement: WorldPoint,
    /// Field value at the new position
    pub value: f32,
}

/// A complete survey episode.
pub struct Simulation {
    config: KshetraConfig,
    env: SimulatedEnvironment,
    grid: OccupancyGrid,
    start: WorldPoint,
    robot: RobotState,
    controller: NavigationController,
    trajectory: TrajectoryRecorder,
    tick: u64,
}

impl Simulation {
    /// Episode in a given environment.
    ///
    /// Fails if the configuration is invalid or `start` lies outside the
    /// domain or in an occupied cell.
    pub fn new(
        config: &KshetraConfig,
        env: SimulatedEnvironment,
        start: WorldPoint,
    ) -> Result<Self> {
        config.validate()?;
        let start = env.bounds().check(start)?;
        let grid = OccupancyGrid::from_environment(&env, config.grid.resolution)?;
        if grid.is_occupied_at(start) {
            return Err(KshetraError::Config(format!(
                "start ({:.1}, {:.1}) is inside an obstacle",
                start.x, start.y
            )));
        }

        let controller = Self::build_controller(config, &env)?;
        info!(
            "[Sim] {:.0}x{:.0} domain, {} obstacles, start ({:.1},{:.1})",
            env.bounds().width(),
            env.bounds().height(),
            env.obstacles().len(),
            start.x,
            start.y
        );

        Ok(Self {
            config: config.clone(),
            env,
            grid,
            start,
            robot: RobotState::at(start),
            controller,
            trajectory: TrajectoryRecorder::new(config.simulation.tick_period),
            tick: 0,
        })
    }

    /// Generate the environment from the configured seed.
    ///
    /// The start position is the configured one, or a random obstacle-free
    /// point when none is set.
    pub fn from_config(config: &KshetraConfig) -> Result<Self> {
        config.validate()?;
        let bounds = config.bounds()?;
        let mut generator =
            EnvironmentGenerator::new(config.to_generator_config(), config.environment.seed);
        let cell = config.grid.resolution;

        let (env, start) = match config.robot.start() {
            Some(start) => (generator.generate(bounds, start, cell), start),
            None => generator.generate_with_start(bounds, cell),
        };
        Self::new(config, env, start)
    }

    fn build_controller(
        config: &KshetraConfig,
        env: &SimulatedEnvironment,
    ) -> Result<NavigationController> {
        let coverage = CoveragePlanner::new(
            env.bounds(),
            config.coverage.spacing,
            config.coverage.margin,
            config.coverage.speed,
        )?;
        Ok(NavigationController::new(
            config.to_navigation_config(),
            coverage,
        ))
    }

    pub fn environment(&self) -> &SimulatedEnvironment {
        &self.env
    }

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    pub fn robot(&self) -> &RobotState {
        &self.robot
    }

    pub fn controller(&self) -> &NavigationController {
        &self.controller
    }

    pub fn trajectory(&self) -> &TrajectoryRecorder {
        &self.trajectory
    }

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    /// Ticks run so far
    pub fn ticks(&self) -> u64 {
        self.tick
    }

    pub fn is_done(&self) -> bool {
        self.controller.phase().is_terminal()
    }

    /// Advance one tick.
    pub fn step(&mut self) -> SimStep {
        self.tick += 1;
        let nav = self.controller.step(&mut self.robot, &self.grid, &self.env);
        let position = self.robot.position;
        let value = self.env.sample(position);
        self.trajectory.record(self.tick, position, value);

        for event in &nav.events {
            debug!("[Sim] tick {}: {:?}", self.tick, event);
        }

        SimStep {
            tick: self.tick,
            phase: nav.phase,
            events: nav.events,
            position,
            displacement: nav.displacement,
            value,
        }
    }

    /// Run until Done or until `max_ticks` ticks have been run in total.
    pub fn run(&mut self, max_ticks: u64) -> EpisodeSummary {
        while !self.is_done() && self.tick < max_ticks {
            self.step();
        }
        if self.is_done() {
            info!(
                "[Sim] episode finished after {} ticks: {:?}",
                self.tick,
                self.controller.outcome()
            );
        } else {
            info!(
                "[Sim] tick limit {} reached in {}",
                max_ticks,
                self.controller.phase()
            );
        }
        self.summary()
    }

    /// Restart the episode in the same environment from the same start.
    pub fn reset(&mut self) -> Result<()> {
        self.controller = Self::build_controller(&self.config, &self.env)?;
        self.robot = RobotState::at(self.start);
        self.trajectory.clear();
        self.tick = 0;
        info!("[Sim] reset");
        Ok(())
    }

    /// Snapshot of the episode so far.
    pub fn summary(&self) -> EpisodeSummary {
        EpisodeSummary {
            seed: self.config.environment.seed,
            strategy: self.controller.strategy_name().to_string(),
            ticks: self.tick,
            phase: self.controller.phase(),
            outcome: self.controller.outcome(),
            start: self.start,
            final_position: self.robot.position,
            target: self.controller.target(),
            measurements: self.controller.measurements().len(),
            coverage: self.controller.coverage_stats(),
            distance_travelled: self.trajectory.distance_travelled(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DomainBounds;
    use crate::environment::{Obstacle, SignalField};
    use crate::navigation::EpisodeOutcome;

    fn small_config() -> KshetraConfig {
        let mut config = KshetraConfig::default();
        config.domain.width = 40.0;
        config.domain.height = 40.0;
        config.navigation.measuring_dwell_ticks = 5;
        config.navigation.visualizing_dwell_ticks = 5;
        config
    }

    fn bowl_env(obstacles: Vec<Obstacle>) -> SimulatedEnvironment {
        let bounds = DomainBounds::from_size(40.0, 40.0).unwrap();
        let field = SignalField::from_fn(bounds, 1.0, |p| {
            -90.0 + 0.1 * p.distance(&WorldPoint::new(30.0, 30.0))
        });
        SimulatedEnvironment::new(bounds, field, obstacles)
    }

    #[test]
    fn test_rejects_start_inside_obstacle() {
        let env = bowl_env(vec![Obstacle::new(WorldPoint::new(10.0, 10.0), 5.0, 5.0)]);
        let result = Simulation::new(&small_config(), env, WorldPoint::new(12.0, 12.0));
        assert!(matches!(result, Err(KshetraError::Config(_))));
    }

    #[test]
    fn test_rejects_start_outside_domain() {
        let start = WorldPoint::new(50.0, 1.0);
        let result = Simulation::new(&small_config(), bowl_env(Vec::new()), start);
        assert!(matches!(result, Err(KshetraError::InvalidWaypoint(_))));
    }

    #[test]
    fn test_open_episode_arrives_at_weakest_point() {
        let mut sim =
            Simulation::new(&small_config(), bowl_env(Vec::new()), WorldPoint::new(20.0, 20.0))
                .unwrap();
        let summary = sim.run(5_000);

        assert_eq!(summary.phase, Phase::Done);
        assert_eq!(summary.outcome, Some(EpisodeOutcome::Arrived));
        let target = summary.target.unwrap();
        assert_eq!(target.position, WorldPoint::new(30.0, 30.0));
        assert!(summary.final_position.distance(&target.position) < 2.0);
        assert_eq!(summary.measurements, 36);
        assert_eq!(sim.trajectory().len() as u64, summary.ticks);
    }

    #[test]
    fn test_run_respects_tick_limit() {
        let mut sim =
            Simulation::new(&small_config(), bowl_env(Vec::new()), WorldPoint::new(20.0, 20.0))
                .unwrap();
        let summary = sim.run(10);
        assert_eq!(summary.ticks, 10);
        assert_eq!(summary.phase, Phase::Coverage);
        assert!(summary.outcome.is_none());
    }

    #[test]
    fn test_reset_restarts_episode() {
        let mut sim =
            Simulation::new(&small_config(), bowl_env(Vec::new()), WorldPoint::new(20.0, 20.0))
                .unwrap();
        sim.run(50);
        sim.reset().unwrap();

        assert_eq!(sim.ticks(), 0);
        assert_eq!(sim.phase(), Phase::Coverage);
        assert_eq!(sim.robot().position, WorldPoint::new(20.0, 20.0));
        assert!(sim.trajectory().is_empty());
        assert!(sim.controller().measurements().is_empty());
    }

    #[test]
    fn test_from_config_is_reproducible() {
        let mut config = small_config();
        config.environment.seed = 11;
        config.environment.num_obstacles = 2;
        config.environment.edge_margin = 5.0;
        config.environment.obstacle_max_size = 8.0;
        config.environment.obstacle_min_size = 4.0;

        let mut a = Simulation::from_config(&config).unwrap();
        let mut b = Simulation::from_config(&config).unwrap();
        assert_eq!(a.robot().position, b.robot().position);
        for _ in 0..200 {
            assert_eq!(a.step().position, b.step().position);
        }
    }
}
