// SPDX-License-Identifier: MIT OR Apache-2.0
//! RiverAtlas headless demo.
//!
//! Drives the temporal selection & animation engine against the in-memory
//! simulation through a scripted session:
//! - a full-catalog playback while tiles are still arriving,
//! - a narrowed run over one curated watershed group,
//! - a scrub back to the midpoint followed by a resumed run.
//!
//! Useful for watching the engine's state transitions in logs without a map
//! renderer attached.

use clap::Parser;
use riveratlas_engine::{ConfigError, EngineCommand, EngineConfig};
use riveratlas_sim::{fixtures, Simulation};
use std::path::PathBuf;
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// RiverAtlas - animated river network engine, headless demo
#[derive(Parser, Debug)]
#[command(name = "riveratlas", version, about)]
struct Cli {
    /// Engine config as RON (defaults to the built-in India rivers config)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of tiles the demo dataset is split into
    #[arg(long, default_value_t = 8)]
    tiles: usize,

    /// Features generated per watershed
    #[arg(long, default_value_t = 24)]
    features_per_watershed: usize,
}

/// Demo application errors
#[derive(Debug, Error)]
enum AppError {
    /// IO error reading the config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config parse or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn main() {
    let cli = Cli::parse();

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("riveratlas_app=info".parse().unwrap())
        .add_directive("riveratlas_engine=info".parse().unwrap())
        .add_directive("riveratlas_sim=info".parse().unwrap());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting RiverAtlas demo v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&cli) {
        tracing::error!("Demo failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let config = match &cli.config {
        Some(path) => EngineConfig::from_ron(&std::fs::read_to_string(path)?)?,
        None => EngineConfig::default(),
    };

    let tiles = fixtures::demo_tiles(&config.catalog, cli.features_per_watershed, cli.tiles);
    tracing::info!(
        watersheds = config.catalog.watershed_count(),
        groups = config.catalog.group_names().count(),
        features = tiles.iter().map(Vec::len).sum::<usize>(),
        tiles = tiles.len(),
        "demo dataset ready"
    );

    let mut sim = Simulation::new(config, tiles)?;

    // Act 1: full catalog playback while tiles are still arriving.
    sim.settle(cli.tiles / 2 + 1);
    sim.dispatch(EngineCommand::Play);
    let elapsed = sim.run_until_idle(120_000.0);
    log_state(&sim, "full-catalog run complete", elapsed);

    // Act 2: narrow to one curated group; its range re-resolves as the
    // remaining tiles settle.
    let focus = {
        let catalog = sim.engine().catalog();
        if catalog.group("Coastal Rivers").is_some() {
            "Coastal Rivers".to_string()
        } else {
            catalog
                .group_names()
                .next()
                .map(str::to_string)
                .unwrap_or_default()
        }
    };
    tracing::info!(group = %focus, "narrowing selection");
    sim.dispatch(EngineCommand::SelectNone);
    sim.dispatch(EngineCommand::ToggleGroup(focus));
    sim.step(200.0);
    sim.settle(cli.tiles);
    sim.dispatch(EngineCommand::Play);
    let elapsed = sim.run_until_idle(120_000.0);
    log_state(&sim, "group run complete", elapsed);

    // Act 3: scrub back to the midpoint and resume.
    let range = sim.engine().time_range();
    sim.dispatch(EngineCommand::ScrubTo(range.min + range.span() / 2));
    sim.dispatch(EngineCommand::Play);
    let elapsed = sim.run_until_idle(120_000.0);
    log_state(&sim, "resumed run complete", elapsed);

    sim.engine_mut().shutdown();
    Ok(())
}

fn log_state(sim: &Simulation, what: &str, elapsed_ms: f64) {
    let engine = sim.engine();
    tracing::info!(
        elapsed_ms,
        current = engine.current_time(),
        range_min = engine.time_range().min,
        range_max = engine.time_range().max,
        playing = engine.is_playing(),
        selected = engine.selection().len(),
        visible = sim.renderer().visible_count(),
        "{what}"
    );
}
