// SPDX-License-Identifier: MIT OR Apache-2.0
//! Commands and events consumed by the engine.
//!
//! Everything that can touch engine state arrives through one of these two
//! enums, on the engine's own turn. Timers, frame callbacks, and settle
//! signals never share mutable closures; they are plain messages, so the
//! ordering invariants hold structurally.

use crate::catalog::WatershedId;
use crate::range::Timestamp;
use crate::scheduler::{FrameHandle, TimerHandle};

/// Requests from the UI boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    /// Toggle a single watershed in or out of the selection
    Toggle(WatershedId),
    /// Toggle a whole catalog group (category checkbox)
    ToggleGroup(String),
    /// Select the entire catalog
    SelectAll,
    /// Clear the selection
    SelectNone,
    /// Start or resume playback
    Play,
    /// Stop playback, keeping the current position
    Pause,
    /// Jump to a timestamp and stop playback
    ScrubTo(Timestamp),
}

/// Notifications from the environment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineEvent {
    /// A requested animation frame fired
    Frame {
        /// Handle the frame was issued under
        handle: FrameHandle,
        /// Host wall clock in milliseconds
        now_ms: f64,
    },
    /// A requested one-shot timer elapsed
    TimerElapsed {
        /// Handle the timer was issued under
        handle: TimerHandle,
    },
    /// The renderer's background tile loading reached a quiescent point
    DataSettled,
}
