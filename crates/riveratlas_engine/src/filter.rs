// SPDX-License-Identifier: MIT OR Apache-2.0
//! Visibility predicates and the filter reconciler.
//!
//! The reconciler translates (current time, selection) into a declarative
//! predicate and pushes it to the renderer. During playback the push rate is
//! throttled to bound filter-evaluation cost; while paused or scrubbing every
//! change applies immediately. When the renderer settles newly loaded tiles
//! the current predicate is re-applied unconditionally, because fresh
//! geometry enters the scene unfiltered.

use crate::catalog::WatershedId;
use crate::range::Timestamp;
use crate::renderer::SpatialRenderer;
use crate::selection::Selection;
use serde::{Deserialize, Serialize};

/// Declarative visibility rule for the renderer.
///
/// A feature is visible iff its timestamp is at most `max_timestamp` and its
/// watershed is in `watersheds`. The bound already includes the epsilon
/// correction; renderers apply it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityPredicate {
    /// Inclusive upper bound on feature timestamps
    pub max_timestamp: Timestamp,
    /// Watersheds whose features may be visible, sorted for stable equality
    pub watersheds: Vec<WatershedId>,
}

impl VisibilityPredicate {
    /// Build the predicate for a clock value and selection.
    ///
    /// `epsilon` nudges the bound forward by roughly one tick's time-delta so
    /// a feature becoming valid on a frame boundary does not appear to lag by
    /// one frame. A visual-continuity correction, not a data change.
    pub fn new(current: Timestamp, selection: &Selection, epsilon: Timestamp) -> Self {
        let mut watersheds: Vec<WatershedId> = selection.iter().cloned().collect();
        watersheds.sort_unstable();
        Self {
            max_timestamp: current + epsilon,
            watersheds,
        }
    }

    /// Whether a single feature passes the predicate.
    pub fn admits(&self, watershed: &WatershedId, timestamp: Timestamp) -> bool {
        timestamp <= self.max_timestamp && self.watersheds.binary_search(watershed).is_ok()
    }
}

/// Pushes visibility predicates to the renderer with playback throttling.
#[derive(Debug)]
pub struct FilterReconciler {
    epsilon: Timestamp,
    throttle_ms: f64,
    last_push_ms: Option<f64>,
    last_applied: Option<VisibilityPredicate>,
}

impl FilterReconciler {
    /// Create a reconciler with the given epsilon (seconds of data time) and
    /// playback throttle interval (wall milliseconds).
    pub fn new(epsilon: Timestamp, throttle_ms: u64) -> Self {
        Self {
            epsilon,
            throttle_ms: throttle_ms as f64,
            last_push_ms: None,
            last_applied: None,
        }
    }

    /// The predicate most recently pushed to the renderer.
    pub fn last_applied(&self) -> Option<&VisibilityPredicate> {
        self.last_applied.as_ref()
    }

    /// Apply immediately, skipping only if the predicate is unchanged.
    ///
    /// Used while paused, after scrubs, on selection changes, and for the
    /// final completion frame.
    pub fn apply_now<R: SpatialRenderer>(
        &mut self,
        current: Timestamp,
        selection: &Selection,
        renderer: &mut R,
    ) {
        let predicate = VisibilityPredicate::new(current, selection, self.epsilon);
        if self.last_applied.as_ref() == Some(&predicate) {
            return;
        }
        renderer.apply_visibility(&predicate);
        self.last_applied = Some(predicate);
    }

    /// Apply during playback, at most once per throttle interval.
    ///
    /// Returns `true` if a predicate was pushed this call.
    pub fn apply_throttled<R: SpatialRenderer>(
        &mut self,
        current: Timestamp,
        selection: &Selection,
        now_ms: f64,
        renderer: &mut R,
    ) -> bool {
        if let Some(last) = self.last_push_ms {
            if now_ms - last < self.throttle_ms {
                return false;
            }
        }
        self.last_push_ms = Some(now_ms);
        let predicate = VisibilityPredicate::new(current, selection, self.epsilon);
        if self.last_applied.as_ref() == Some(&predicate) {
            return false;
        }
        renderer.apply_visibility(&predicate);
        self.last_applied = Some(predicate);
        true
    }

    /// Re-apply the current state unconditionally.
    ///
    /// Called when the renderer reports that pending tiles finished loading:
    /// newly materialized geometry is not yet subject to any filter, so the
    /// dedup cache must be bypassed.
    pub fn reapply<R: SpatialRenderer>(
        &mut self,
        current: Timestamp,
        selection: &Selection,
        renderer: &mut R,
    ) {
        let predicate = VisibilityPredicate::new(current, selection, self.epsilon);
        renderer.apply_visibility(&predicate);
        self.last_applied = Some(predicate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::StaticRenderer;

    fn selection_of(ids: &[&str]) -> Selection {
        let mut selection = Selection::empty();
        for id in ids {
            selection.toggle(WatershedId::from(*id));
        }
        selection
    }

    #[test]
    fn test_predicate_includes_epsilon() {
        let selection = selection_of(&["W1"]);
        let predicate = VisibilityPredicate::new(1_000, &selection, 100);
        assert_eq!(predicate.max_timestamp, 1_100);

        assert!(predicate.admits(&WatershedId::from("W1"), 1_100));
        assert!(!predicate.admits(&WatershedId::from("W1"), 1_101));
        assert!(!predicate.admits(&WatershedId::from("W2"), 1_000));
    }

    #[test]
    fn test_apply_now_dedups_identical_predicates() {
        let selection = selection_of(&["W1", "W2"]);
        let mut renderer = StaticRenderer::empty();
        let mut reconciler = FilterReconciler::new(100, 60);

        reconciler.apply_now(1_000, &selection, &mut renderer);
        reconciler.apply_now(1_000, &selection, &mut renderer);
        assert_eq!(renderer.applied.len(), 1);

        reconciler.apply_now(1_001, &selection, &mut renderer);
        assert_eq!(renderer.applied.len(), 2);
    }

    #[test]
    fn test_throttle_spaces_pushes() {
        let selection = selection_of(&["W1"]);
        let mut renderer = StaticRenderer::empty();
        let mut reconciler = FilterReconciler::new(0, 60);

        assert!(reconciler.apply_throttled(1_000, &selection, 0.0, &mut renderer));
        assert!(!reconciler.apply_throttled(1_010, &selection, 16.0, &mut renderer));
        assert!(!reconciler.apply_throttled(1_020, &selection, 48.0, &mut renderer));
        assert!(reconciler.apply_throttled(1_030, &selection, 64.0, &mut renderer));
        assert_eq!(renderer.applied.len(), 2);
    }

    #[test]
    fn test_reapply_bypasses_dedup() {
        let selection = selection_of(&["W1"]);
        let mut renderer = StaticRenderer::empty();
        let mut reconciler = FilterReconciler::new(100, 60);

        reconciler.apply_now(1_000, &selection, &mut renderer);
        reconciler.reapply(1_000, &selection, &mut renderer);
        assert_eq!(renderer.applied.len(), 2);
        assert_eq!(renderer.applied[0], renderer.applied[1]);
    }

    #[test]
    fn test_predicate_order_is_stable() {
        let a = VisibilityPredicate::new(0, &selection_of(&["W2", "W1"]), 0);
        let b = VisibilityPredicate::new(0, &selection_of(&["W1", "W2"]), 0);
        assert_eq!(a, b);
    }
}
