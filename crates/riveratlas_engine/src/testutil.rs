// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shared in-memory fakes for this crate's unit tests.

use crate::catalog::{WatershedCatalog, WatershedId};
use crate::filter::VisibilityPredicate;
use crate::range::TimeRange;
use crate::renderer::{Feature, SpatialRenderer};
use crate::scheduler::{FrameHandle, FrameScheduler, TimerHandle};
use crate::selection::Selection;
use indexmap::IndexMap;

/// A 22-watershed catalog (`W1`..`W22`) in three groups with the published
/// global bounds.
pub fn test_catalog() -> WatershedCatalog {
    let ids = |lo: usize, hi: usize| -> Vec<WatershedId> {
        (lo..=hi).map(|i| WatershedId::from(format!("W{i}"))).collect()
    };
    let mut groups = IndexMap::new();
    groups.insert("Uplands".to_string(), ids(1, 5));
    groups.insert("Lowlands".to_string(), ids(6, 14));
    groups.insert("Coastal".to_string(), ids(15, 22));
    WatershedCatalog::new(groups, TimeRange::new(1_704_067_260, 1_704_372_500))
}

/// Renderer fake serving a fixed feature list and recording every applied
/// predicate and repaint request.
#[derive(Debug, Default)]
pub struct StaticRenderer {
    /// Features the fake reports as materialized
    pub features: Vec<Feature>,
    /// Whether feature queries are answerable yet
    pub ready: bool,
    /// Every predicate pushed, in order
    pub applied: Vec<VisibilityPredicate>,
    /// Number of repaint requests
    pub repaints: u32,
}

impl StaticRenderer {
    /// A ready renderer with no features.
    pub fn empty() -> Self {
        Self {
            ready: true,
            ..Self::default()
        }
    }

    /// A ready renderer serving `features`.
    pub fn with_features(features: Vec<Feature>) -> Self {
        Self {
            features,
            ready: true,
            ..Self::default()
        }
    }
}

impl SpatialRenderer for StaticRenderer {
    fn is_data_ready(&self) -> bool {
        self.ready
    }

    fn materialized_features(&self, selection: &Selection) -> Vec<Feature> {
        self.features
            .iter()
            .filter(|f| selection.contains(&f.watershed))
            .cloned()
            .collect()
    }

    fn apply_visibility(&mut self, predicate: &VisibilityPredicate) {
        self.applied.push(predicate.clone());
    }

    fn request_repaint(&mut self) {
        self.repaints += 1;
    }
}

/// Scheduler fake that hands out sequential handles and records requests
/// and cancellations without any notion of time.
#[derive(Debug, Default)]
pub struct RecordingScheduler {
    next: u64,
    /// Every frame handle issued
    pub frames: Vec<FrameHandle>,
    /// Frame handles cancelled before firing
    pub cancelled_frames: Vec<FrameHandle>,
    /// Every timer handle issued
    pub timers: Vec<TimerHandle>,
    /// Timer handles cancelled before firing
    pub cancelled_timers: Vec<TimerHandle>,
}

impl RecordingScheduler {
    /// Most recently issued frame handle.
    pub fn last_frame(&self) -> Option<FrameHandle> {
        self.frames.last().copied()
    }

    /// Most recently issued timer handle.
    pub fn last_timer(&self) -> Option<TimerHandle> {
        self.timers.last().copied()
    }
}

impl FrameScheduler for RecordingScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        let handle = FrameHandle(self.next);
        self.frames.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.cancelled_frames.push(handle);
    }

    fn request_timer(&mut self, _delay_ms: u64) -> TimerHandle {
        self.next += 1;
        let handle = TimerHandle(self.next);
        self.timers.push(handle);
        handle
    }

    fn cancel_timer(&mut self, handle: TimerHandle) {
        self.cancelled_timers.push(handle);
    }
}
