// SPDX-License-Identifier: MIT OR Apache-2.0
//! The frame/timer scheduling capability the engine depends on.
//!
//! The engine never sleeps or spins; it asks the host for "run me on the
//! next display frame" and "run me after this delay", and the host answers
//! by delivering [`EngineEvent::Frame`](crate::events::EngineEvent::Frame)
//! and [`EngineEvent::TimerElapsed`](crate::events::EngineEvent::TimerElapsed)
//! carrying the issued handles. Cancellation is cooperative: a delivered
//! event whose handle no longer matches the engine's outstanding request is
//! ignored.

/// Opaque handle for a requested animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Opaque handle for a requested one-shot timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);

/// Injected interface to the host's frame/timer scheduler.
pub trait FrameScheduler {
    /// Request a callback on the next display frame.
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancel a previously requested frame if it has not fired yet.
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Request a one-shot timer after `delay_ms` milliseconds.
    fn request_timer(&mut self, delay_ms: u64) -> TimerHandle;

    /// Cancel a previously requested timer if it has not fired yet.
    fn cancel_timer(&mut self, handle: TimerHandle);
}
