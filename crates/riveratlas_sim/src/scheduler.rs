// SPDX-License-Identifier: MIT OR Apache-2.0
//! A frame/timer scheduler over a virtual clock.
//!
//! Frame requests become due one frame interval after they are requested;
//! timers after their delay. Nothing fires until the driver advances the
//! clock and drains [`VirtualScheduler::take_due`], which makes every run
//! fully deterministic.

use riveratlas_engine::{EngineEvent, FrameHandle, FrameScheduler, TimerHandle};

/// Deterministic scheduler driven by [`advance`](VirtualScheduler::advance).
#[derive(Debug)]
pub struct VirtualScheduler {
    now_ms: f64,
    frame_interval_ms: f64,
    next_handle: u64,
    frames: Vec<(FrameHandle, f64)>,
    timers: Vec<(TimerHandle, f64)>,
}

impl VirtualScheduler {
    /// Create a scheduler with the given display refresh interval.
    pub fn new(frame_interval_ms: f64) -> Self {
        Self {
            now_ms: 0.0,
            frame_interval_ms,
            next_handle: 0,
            frames: Vec::new(),
            timers: Vec::new(),
        }
    }

    /// The virtual wall clock, milliseconds.
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Move the virtual clock forward.
    pub fn advance(&mut self, ms: f64) {
        self.now_ms += ms;
    }

    /// Whether any frame or timer request is still pending.
    pub fn has_pending(&self) -> bool {
        !self.frames.is_empty() || !self.timers.is_empty()
    }

    /// Remove and return every request now due, ordered by due time.
    ///
    /// Frame events carry their due time as the frame timestamp, matching a
    /// display-driven callback.
    pub fn take_due(&mut self) -> Vec<EngineEvent> {
        let now = self.now_ms;
        let mut due: Vec<(f64, EngineEvent)> = Vec::new();

        self.frames.retain(|(handle, at)| {
            if *at <= now {
                due.push((
                    *at,
                    EngineEvent::Frame {
                        handle: *handle,
                        now_ms: *at,
                    },
                ));
                false
            } else {
                true
            }
        });
        self.timers.retain(|(handle, at)| {
            if *at <= now {
                due.push((*at, EngineEvent::TimerElapsed { handle: *handle }));
                false
            } else {
                true
            }
        });

        due.sort_by(|a, b| a.0.total_cmp(&b.0));
        due.into_iter().map(|(_, event)| event).collect()
    }

    fn next_handle(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl FrameScheduler for VirtualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_handle());
        self.frames.push((handle, self.now_ms + self.frame_interval_ms));
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.frames.retain(|(h, _)| *h != handle);
    }

    fn request_timer(&mut self, delay_ms: u64) -> TimerHandle {
        let handle = TimerHandle(self.next_handle());
        self.timers.push((handle, self.now_ms + delay_ms as f64));
        handle
    }

    fn cancel_timer(&mut self, handle: TimerHandle) {
        self.timers.retain(|(h, _)| *h != handle);
    }
}
