// SPDX-License-Identifier: MIT OR Apache-2.0
//! Simulation substrate for the RiverAtlas engine.
//!
//! This crate provides the in-memory stand-ins for the engine's injected
//! capabilities:
//! - [`TiledRenderer`]: a spatial renderer whose dataset materializes tile
//!   by tile
//! - [`VirtualScheduler`]: frames and timers over a virtual clock
//! - [`Simulation`]: a deterministic driver stepping an engine wired to both
//! - JSON and generated feature fixtures
//!
//! The end-to-end scenario tests for the engine live here, since they need
//! the full wiring.

pub mod driver;
pub mod fixtures;
pub mod renderer;
pub mod scheduler;

pub use driver::{Simulation, FRAME_STEP_MS};
pub use renderer::TiledRenderer;
pub use scheduler::VirtualScheduler;
