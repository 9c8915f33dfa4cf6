//! Episode control: the phase state machine and the navigation-phase
//! controllers it delegates to.
//!
//! ```text
//! NavigationController
//!   ├── CoveragePlanner       (Coverage phase)
//!   ├── MeasurementLog        (target resolution)
//!   └── dyn NavigationStrategy
//!         ├── HybridRouteStrategy      A* route + PotentialField fallback
//!         └── GradientDescentStrategy  momentum descent + escape kicks
//! ```

mod config;
mod controller;
mod events;
mod phase;
mod potential;
mod strategy;

pub use config::{GradientConfig, NavigationConfig, StrategyKind};
pub use controller::{NavigationController, NavigationStep};
pub use events::{FallbackReason, NavEvent, SkipReason};
pub use phase::{EpisodeOutcome, Phase};
pub use potential::{PotentialField, ReactiveStep};
pub use strategy::{
    GradientDescentStrategy, HybridRouteStrategy, NavContext, NavigationStrategy, StrategyStatus,
    create_strategy,
};
