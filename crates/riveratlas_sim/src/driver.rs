// SPDX-License-Identifier: MIT OR Apache-2.0
//! Deterministic simulation driver.
//!
//! Owns an engine wired to the in-memory renderer and virtual scheduler and
//! advances them in display-frame steps. Tile loading is explicit: tests and
//! the demo binary decide when data "arrives" and the settle signal fires,
//! which is exactly the eventual-consistency the engine has to absorb.

use crate::renderer::TiledRenderer;
use crate::scheduler::VirtualScheduler;
use riveratlas_engine::{ConfigError, Engine, EngineCommand, EngineConfig, EngineEvent, Feature};

/// Display refresh interval used by the simulation, milliseconds.
pub const FRAME_STEP_MS: f64 = 16.0;

/// An engine running against simulated rendering and scheduling.
pub struct Simulation {
    engine: Engine<TiledRenderer, VirtualScheduler>,
}

impl Simulation {
    /// Build a simulation over a tiled dataset; no tiles are loaded yet.
    pub fn new(config: EngineConfig, tiles: Vec<Vec<Feature>>) -> Result<Self, ConfigError> {
        let engine = Engine::new(
            config,
            TiledRenderer::new(tiles),
            VirtualScheduler::new(FRAME_STEP_MS),
        )?;
        Ok(Self { engine })
    }

    /// The engine under simulation.
    pub fn engine(&self) -> &Engine<TiledRenderer, VirtualScheduler> {
        &self.engine
    }

    /// Mutable access to the engine under simulation.
    pub fn engine_mut(&mut self) -> &mut Engine<TiledRenderer, VirtualScheduler> {
        &mut self.engine
    }

    /// The simulated renderer.
    pub fn renderer(&self) -> &TiledRenderer {
        self.engine.renderer()
    }

    /// The virtual wall clock, milliseconds.
    pub fn now_ms(&self) -> f64 {
        self.engine.scheduler().now_ms()
    }

    /// Forward a UI command to the engine.
    pub fn dispatch(&mut self, command: EngineCommand) {
        self.engine.dispatch(command);
    }

    /// Load up to `tiles` more tiles and deliver the settle signal.
    pub fn settle(&mut self, tiles: usize) {
        self.engine.renderer_mut().load_tiles(tiles);
        self.engine.handle(EngineEvent::DataSettled);
    }

    /// Advance the virtual clock by `ms` and deliver everything that came
    /// due, in due order.
    pub fn step(&mut self, ms: f64) {
        self.engine.scheduler_mut().advance(ms);
        loop {
            let due = self.engine.scheduler_mut().take_due();
            if due.is_empty() {
                break;
            }
            for event in due {
                self.engine.handle(event);
            }
        }
    }

    /// Run in frame steps for a fixed amount of virtual time.
    pub fn run_for(&mut self, ms: f64) {
        let mut elapsed = 0.0;
        while elapsed < ms {
            self.step(FRAME_STEP_MS);
            elapsed += FRAME_STEP_MS;
        }
    }

    /// Run in frame steps until playback stops or `max_ms` elapses; returns
    /// the virtual time consumed.
    pub fn run_until_idle(&mut self, max_ms: f64) -> f64 {
        let mut elapsed = 0.0;
        while self.engine.is_playing() && elapsed < max_ms {
            self.step(FRAME_STEP_MS);
            elapsed += FRAME_STEP_MS;
        }
        elapsed
    }
}
