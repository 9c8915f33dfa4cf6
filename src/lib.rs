//! # Kshetra: Signal-Field Survey and Weakest-Point Navigation
//!
//! A simulated mobile robot sweeps a bounded 2D domain, samples a scalar
//! signal field at each sweep waypoint, then drives to the weakest
//! measurement while avoiding static rectangular obstacles.
//!
//! ## Features
//!
//! - **Boustrophedon Coverage**: row-by-row sweep with A* detours around
//!   obstacles between waypoints
//! - **A* on an Occupancy Grid**: 8-connected, Euclidean heuristic, no corner
//!   cutting, deterministic tie-breaking, line-of-sight smoothing
//! - **Hybrid Navigation**: route following with a momentum potential-field
//!   fallback, or gradient descent on the field as an alternative strategy
//! - **Reproducible Episodes**: seeded environment generation, trajectory CSV
//!   and JSON summary export
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kshetra::{KshetraConfig, Simulation};
//!
//! let config = KshetraConfig::default();
//! let mut sim = Simulation::from_config(&config).unwrap();
//! let summary = sim.run(config.simulation.max_ticks);
//! println!("{:?} in {} ticks", summary.outcome, summary.ticks);
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: Coordinates, domain bounds, robot state
//! - [`environment`]: Signal field, obstacles, seeded generation
//! - [`grid`]: Occupancy grid snapshot and line walking
//! - [`pathfinding`]: A* and path smoothing
//! - [`coverage`]: Sweep pattern and sweep execution
//! - [`navigation`]: Phase state machine and navigation strategies
//! - [`config`]: TOML configuration
//! - [`sim`]: Headless episode driver
//! - [`io`]: Trajectory and summary output
//!
//! ## Episode Flow
//!
//! ```text
//!  ┌──────────┐   sweep    ┌───────────┐  dwell   ┌─────────────┐  dwell   ┌────────────┐
//!  │ Coverage │──complete─▶│ Measuring │─────────▶│ Visualizing │─────────▶│ Navigation │
//!  └────┬─────┘            └───────────┘  target  └─────────────┘  route   └─────┬──────┘
//!       │ measure at each                  fixed                    planned      │ within
//!       ▼ reached waypoint                                                       ▼ tolerance
//!  ┌────────────────┐                                                        ┌──────┐
//!  │ MeasurementLog │────────── minimum ───────────────────────────────────▶ │ Done │
//!  └────────────────┘                                                        └──────┘
//! ```

pub mod config;
pub mod core;
pub mod coverage;
pub mod environment;
pub mod error;
pub mod grid;
pub mod io;
pub mod measurement;
pub mod navigation;
pub mod pathfinding;
pub mod sim;

// Re-export main types at crate root
pub use config::KshetraConfig;
pub use crate::core::{DomainBounds, GridCoord, RobotState, WorldPoint};
pub use environment::{
    Environment, EnvironmentGenerator, Obstacle, SignalField, SimulatedEnvironment,
};
pub use error::{KshetraError, Result};
pub use grid::OccupancyGrid;
pub use measurement::{MeasuredPoint, MeasurementLog};
pub use sim::{SimStep, Simulation, TrajectoryRecorder, TrajectoryRow};

// Re-export navigation types
pub use navigation::{
    EpisodeOutcome, NavEvent, NavigationConfig, NavigationController, NavigationStep,
    NavigationStrategy, Phase, StrategyKind,
};

// Re-export planning types
pub use coverage::{CoveragePlanner, SweepPattern};
pub use pathfinding::{AStarPlanner, PathFailure, Route, plan_route};
