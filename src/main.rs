//! Kshetra - headless survey runner
//!
//! Generates a seeded environment, runs one survey episode to completion or
//! the tick limit, and optionally writes the trajectory and a summary.
//!
//! ```text
//! kshetra --config survey.toml --seed 7 --trajectory out.csv --summary out.json
//! ```

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kshetra::io::export_trajectory_csv;
use kshetra::{KshetraConfig, NavEvent, Result, Simulation};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML configuration file (defaults used when absent)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Environment seed, overrides the config file
    #[arg(short, long)]
    seed: Option<u64>,

    /// Tick limit, overrides the config file
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Write the per-tick trajectory as CSV
    #[arg(long)]
    trajectory: Option<PathBuf>,

    /// Write the episode summary as JSON
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Log progress every N ticks (0 = never)
    #[arg(long, default_value = "500")]
    progress_interval: u64,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kshetra=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            KshetraConfig::load(path)?
        }
        None if Path::new("kshetra.toml").exists() => {
            info!("Loading configuration from kshetra.toml");
            KshetraConfig::load(Path::new("kshetra.toml"))?
        }
        None => {
            info!("Using default configuration");
            KshetraConfig::default()
        }
    };
    if let Some(seed) = args.seed {
        config.environment.seed = seed;
    }
    let max_ticks = args.max_ticks.unwrap_or(config.simulation.max_ticks);

    info!("Kshetra v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Seed {}, strategy {:?}, tick limit {}",
        config.environment.seed, config.navigation.strategy, max_ticks
    );

    let mut sim = Simulation::from_config(&config)?;
    while !sim.is_done() && sim.ticks() < max_ticks {
        let step = sim.step();
        for event in &step.events {
            if let NavEvent::WaypointSkipped { index, reason, .. } = event {
                info!("Tick {}: sweep waypoint {} skipped ({:?})", step.tick, index, reason);
            }
        }
        if args.progress_interval > 0 && step.tick % args.progress_interval == 0 {
            info!(
                "Tick {}: {} at ({:.1}, {:.1})",
                step.tick,
                sim.controller().phase_description(),
                step.position.x,
                step.position.y
            );
        }
    }
    let summary = sim.run(max_ticks);

    if let Some(path) = &args.trajectory {
        export_trajectory_csv(sim.trajectory().rows(), path)?;
        info!("Saved trajectory: {}", path.display());
    }
    if let Some(path) = &args.summary {
        summary.save(path)?;
        info!("Saved summary: {}", path.display());
    }

    println!("\n=== Survey Summary ===");
    println!("Phase: {}", summary.phase);
    println!("Outcome: {:?}", summary.outcome);
    println!("Ticks: {}", summary.ticks);
    println!("Distance travelled: {:.1}", summary.distance_travelled);
    println!(
        "Coverage: {} measured ({} on detours), {} skipped, {} detours",
        summary.measurements,
        summary.coverage.detour_reached,
        summary.coverage.skipped,
        summary.coverage.detours_planned
    );
    if let Some(target) = summary.target {
        println!(
            "Target: ({:.1}, {:.1}) value {:.2}",
            target.position.x, target.position.y, target.value
        );
    }
    if let Some(err) = summary.final_error() {
        println!("Final distance to target: {:.2}", err);
    }

    Ok(())
}
