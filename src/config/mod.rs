//! Unified configuration loading for Kshetra.
//!
//! Loads all configuration from a single TOML file. Every key is optional;
//! missing keys take the defaults in `defaults.rs`.

mod defaults;
mod kshetra;
mod navigation;
mod sections;

pub use kshetra::KshetraConfig;

pub use navigation::{GradientSettings, NavigationSection};
pub use sections::{
    CoverageSection, DomainSection, EnvironmentSection, GridSection, RobotSection,
    SimulationSection,
};
