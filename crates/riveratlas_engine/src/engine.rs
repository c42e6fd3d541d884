// SPDX-License-Identifier: MIT OR Apache-2.0
//! The composition root: wires selection, range resolution, the clock, and
//! the filter reconciler over the injected renderer and scheduler.
//!
//! All mutable state lives here and is touched only from [`Engine::dispatch`]
//! and [`Engine::handle`], which the host must call from a single logical
//! turn. The temporal ordering rules are:
//!
//! - a selection mutation synchronously cancels the outstanding frame,
//!   resets the clock, and invalidates the resolved range before any later
//!   resolution or reconciliation runs;
//! - range resolution triggered by the debounce timer carries the selection
//!   it was issued for and is discarded if the live selection has moved on;
//! - frame and timer events are no-ops unless their handle matches the
//!   engine's outstanding request.

use crate::catalog::{WatershedCatalog, WatershedId};
use crate::clock::{AnimationClock, DurationPolicy, Tick};
use crate::config::{ConfigError, EngineConfig};
use crate::events::{EngineCommand, EngineEvent};
use crate::filter::FilterReconciler;
use crate::range::{RangeResolver, Resolution, TimeRange, Timestamp};
use crate::renderer::SpatialRenderer;
use crate::scheduler::{FrameHandle, FrameScheduler, TimerHandle};
use crate::selection::Selection;

/// A scheduled range resolution, tagged with the selection it was issued
/// for so a stale result can be rejected on completion.
#[derive(Debug)]
struct PendingResolve {
    timer: TimerHandle,
    selection: Selection,
}

/// The temporal selection & animation engine.
pub struct Engine<R: SpatialRenderer, S: FrameScheduler> {
    catalog: WatershedCatalog,
    durations: DurationPolicy,
    debounce_ms: u64,
    selection: Selection,
    range: TimeRange,
    resolver: RangeResolver,
    clock: AnimationClock,
    reconciler: FilterReconciler,
    renderer: R,
    scheduler: S,
    pending_frame: Option<FrameHandle>,
    pending_resolve: Option<PendingResolve>,
}

impl<R: SpatialRenderer, S: FrameScheduler> Engine<R, S> {
    /// Build an engine over the injected renderer and scheduler.
    ///
    /// The initial state selects the full catalog, parks the clock at the
    /// global minimum, and pushes the corresponding visibility predicate so
    /// the renderer starts out filtered.
    pub fn new(config: EngineConfig, renderer: R, scheduler: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let EngineConfig {
            catalog,
            durations,
            epsilon_secs,
            throttle_ms,
            debounce_ms,
        } = config;

        let range = catalog.global_range();
        let mut engine = Self {
            selection: Selection::full(&catalog),
            catalog,
            durations,
            debounce_ms,
            range,
            resolver: RangeResolver::new(),
            clock: AnimationClock::new(range.min),
            reconciler: FilterReconciler::new(epsilon_secs, throttle_ms),
            renderer,
            scheduler,
            pending_frame: None,
            pending_resolve: None,
        };
        engine
            .reconciler
            .apply_now(engine.clock.current(), &engine.selection, &mut engine.renderer);
        Ok(engine)
    }

    /// Apply a UI command.
    pub fn dispatch(&mut self, command: EngineCommand) {
        tracing::debug!(?command, "dispatch");
        match command {
            EngineCommand::Toggle(id) => self.mutate_selection(|s, _| s.toggle(id)),
            EngineCommand::ToggleGroup(name) => {
                let Some(members) = self.catalog.group(&name).map(<[WatershedId]>::to_vec) else {
                    tracing::warn!(group = %name, "unknown watershed group");
                    return;
                };
                self.mutate_selection(|s, _| s.toggle_group(&members));
            }
            EngineCommand::SelectAll => self.mutate_selection(|s, c| s.select_all(c)),
            EngineCommand::SelectNone => self.mutate_selection(|s, _| s.select_none()),
            EngineCommand::Play => self.play(),
            EngineCommand::Pause => self.pause(),
            EngineCommand::ScrubTo(t) => self.scrub_to(t),
        }
    }

    /// Deliver an environment event.
    pub fn handle(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Frame { handle, now_ms } => self.on_frame(handle, now_ms),
            EngineEvent::TimerElapsed { handle } => self.on_timer(handle),
            EngineEvent::DataSettled => self.on_data_settled(),
        }
    }

    /// Cancel any outstanding frame and timer requests.
    ///
    /// Call before dropping the engine so the host scheduler does not keep
    /// dead callbacks queued.
    pub fn shutdown(&mut self) {
        self.cancel_pending_frame();
        self.cancel_pending_resolve();
    }

    // ---- selection -----------------------------------------------------

    fn mutate_selection(&mut self, mutate: impl FnOnce(&mut Selection, &WatershedCatalog)) {
        // Invariant: reset playback and invalidate the range synchronously,
        // before any scheduled resolution or reconciliation can run.
        self.cancel_pending_frame();
        self.cancel_pending_resolve();
        mutate(&mut self.selection, &self.catalog);
        self.resolver.invalidate();
        self.clock.reset(self.range.min);

        if self.selection.is_full(&self.catalog) || self.selection.is_empty() {
            // Both shapes resolve without scanning; no debounce needed.
            self.run_resolve(self.selection.clone());
        } else {
            self.schedule_resolve();
        }
        self.reconcile_now();
    }

    // ---- range resolution ----------------------------------------------

    fn schedule_resolve(&mut self) {
        let timer = self.scheduler.request_timer(self.debounce_ms);
        self.pending_resolve = Some(PendingResolve {
            timer,
            selection: self.selection.clone(),
        });
    }

    fn run_resolve(&mut self, originated: Selection) {
        if originated != self.selection {
            tracing::debug!("discarding stale range resolution");
            return;
        }
        match self
            .resolver
            .resolve(&originated, &self.catalog, &self.renderer)
        {
            Resolution::Resolved(range) => self.apply_resolution(range),
            Resolution::Pending => {
                // Nothing matched yet; hold the previous range and let the
                // next settle signal retry.
            }
        }
    }

    fn apply_resolution(&mut self, range: TimeRange) {
        if range == self.range {
            return;
        }
        tracing::debug!(min = range.min, max = range.max, "time range updated");
        self.range = range;
        if self.clock.is_playing() {
            // Settle-driven widening mid-playback: keep the run going, just
            // keep the value inside the new range.
            self.clock.clamp_into(range);
        } else {
            self.clock.reset(range.min);
        }
        self.reconcile_now();
    }

    // ---- playback ------------------------------------------------------

    fn play(&mut self) {
        if self.clock.is_playing() {
            return;
        }
        if self.selection.is_empty() {
            tracing::debug!("play rejected: empty selection");
            return;
        }
        // The duration is a function of the selection's current shape and is
        // looked up fresh at every start, never cached across changes.
        let duration = self.durations.duration_for(&self.selection, &self.catalog);
        if !self.clock.play(self.range, duration) {
            tracing::debug!("play rejected: degenerate range");
            return;
        }
        tracing::debug!(duration_ms = duration, from = self.clock.current(), "playback started");
        self.pending_frame = Some(self.scheduler.request_frame());
    }

    fn pause(&mut self) {
        if !self.clock.is_playing() {
            return;
        }
        self.cancel_pending_frame();
        self.clock.pause();
        tracing::debug!(at = self.clock.current(), "playback paused");
    }

    fn scrub_to(&mut self, t: Timestamp) {
        self.cancel_pending_frame();
        self.clock.scrub(t, self.range);
        self.reconcile_now();
    }

    fn on_frame(&mut self, handle: FrameHandle, now_ms: f64) {
        if self.pending_frame != Some(handle) {
            // Superseded by a pause, scrub, or selection change.
            return;
        }
        self.pending_frame = None;
        match self.clock.tick(self.range, now_ms) {
            Tick::Advanced(_) => {
                self.reconcile_throttled(now_ms);
                self.pending_frame = Some(self.scheduler.request_frame());
            }
            Tick::Completed(at) => {
                tracing::debug!(at, "playback completed");
                // The end state must be exact, so bypass the throttle.
                self.reconcile_now();
            }
            Tick::Idle => {}
        }
    }

    fn on_timer(&mut self, handle: TimerHandle) {
        let is_current = self
            .pending_resolve
            .as_ref()
            .is_some_and(|p| p.timer == handle);
        if !is_current {
            // A superseded debounce timer; the reschedule already cancelled
            // it, but a late delivery must still be ignored.
            return;
        }
        if let Some(pending) = self.pending_resolve.take() {
            self.run_resolve(pending.selection);
        }
    }

    fn on_data_settled(&mut self) {
        // More tiles are materialized: partial selections may now span a
        // wider range, and the new geometry is not yet filtered.
        if !self.selection.is_full(&self.catalog) && !self.selection.is_empty() {
            self.run_resolve(self.selection.clone());
        }
        self.reconciler
            .reapply(self.clock.current(), &self.selection, &mut self.renderer);
        self.renderer.request_repaint();
    }

    // ---- reconciliation ------------------------------------------------

    fn reconcile_now(&mut self) {
        self.reconciler
            .apply_now(self.clock.current(), &self.selection, &mut self.renderer);
    }

    fn reconcile_throttled(&mut self, now_ms: f64) {
        self.reconciler
            .apply_throttled(self.clock.current(), &self.selection, now_ms, &mut self.renderer);
    }

    fn cancel_pending_frame(&mut self) {
        if let Some(handle) = self.pending_frame.take() {
            self.scheduler.cancel_frame(handle);
        }
    }

    fn cancel_pending_resolve(&mut self) {
        if let Some(pending) = self.pending_resolve.take() {
            self.scheduler.cancel_timer(pending.timer);
        }
    }

    // ---- read-side for the UI boundary ---------------------------------

    /// The watershed catalog the engine was configured with.
    pub fn catalog(&self) -> &WatershedCatalog {
        &self.catalog
    }

    /// The active selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The currently applied time range.
    pub fn time_range(&self) -> TimeRange {
        self.range
    }

    /// The clock's current timestamp.
    pub fn current_time(&self) -> Timestamp {
        self.clock.current()
    }

    /// Whether playback is running.
    pub fn is_playing(&self) -> bool {
        self.clock.is_playing()
    }

    /// Timeline progress fraction in `[0, 1]`; zero on degenerate ranges.
    pub fn progress(&self) -> f64 {
        self.range.progress_of(self.clock.current())
    }

    /// The injected renderer (host integration and tests).
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Mutable access to the injected renderer.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// The injected scheduler.
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Mutable access to the injected scheduler.
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}
