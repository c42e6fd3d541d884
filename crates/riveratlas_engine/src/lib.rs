// SPDX-License-Identifier: MIT OR Apache-2.0
//! Temporal selection & animation engine for RiverAtlas.
//!
//! This crate drives the time-based reveal of river features filtered to a
//! set of selected watersheds:
//! - Selection model over a grouped watershed catalog
//! - Asynchronous time-range resolution against a lazily loading dataset
//! - Monotonic animation clock with selection-dependent durations
//! - Throttled visibility-filter reconciliation
//!
//! ## Architecture
//!
//! The [`Engine`] owns all mutable state and is driven entirely by messages:
//! UI commands through [`Engine::dispatch`] and environment events (frames,
//! timers, data-settled signals) through [`Engine::handle`]. The rendering
//! engine and the frame scheduler are injected capabilities, never globals,
//! so a fake in-memory pair can stand in for tests and headless runs.

pub mod catalog;
pub mod clock;
pub mod config;
pub mod engine;
pub mod events;
pub mod filter;
pub mod range;
pub mod renderer;
pub mod scheduler;
pub mod selection;

#[cfg(test)]
mod testutil;

pub use catalog::{WatershedCatalog, WatershedId};
pub use clock::{AnimationClock, DurationPolicy, DurationTier, Playback, Tick, TierSelector};
pub use config::{ConfigError, EngineConfig};
pub use engine::Engine;
pub use events::{EngineCommand, EngineEvent};
pub use filter::{FilterReconciler, VisibilityPredicate};
pub use range::{RangeResolver, Resolution, TimeRange, Timestamp};
pub use renderer::{Feature, SpatialRenderer};
pub use scheduler::{FrameHandle, FrameScheduler, TimerHandle};
pub use selection::Selection;
