// SPDX-License-Identifier: MIT OR Apache-2.0
//! Time ranges and the watershed time-range resolver.
//!
//! The resolver computes the animatable `[min, max]` timestamp span for the
//! active selection by scanning whatever geometry the renderer has
//! materialized so far. Tiles load lazily, so a scan sees an incomplete
//! snapshot; successive scans for the same selection only ever widen the
//! estimate, and a scan that matches nothing leaves the previous range in
//! place until more data settles.

use crate::catalog::WatershedCatalog;
use crate::renderer::SpatialRenderer;
use crate::selection::Selection;
use serde::{Deserialize, Serialize};

/// Feature timestamp in epoch seconds.
pub type Timestamp = i64;

/// An inclusive timestamp span with `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Earliest timestamp in the span
    pub min: Timestamp,
    /// Latest timestamp in the span
    pub max: Timestamp,
}

impl TimeRange {
    /// Create a range from two endpoints, in either order.
    pub fn new(a: Timestamp, b: Timestamp) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// A zero-width range anchored at `t`.
    pub fn degenerate_at(t: Timestamp) -> Self {
        Self { min: t, max: t }
    }

    /// Whether the range has zero width and therefore cannot animate.
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    /// Width of the range in seconds.
    pub fn span(&self) -> i64 {
        self.max - self.min
    }

    /// Clamp a timestamp into the range.
    pub fn clamp(&self, t: Timestamp) -> Timestamp {
        t.clamp(self.min, self.max)
    }

    /// Whether `t` falls inside the range, inclusive.
    pub fn contains(&self, t: Timestamp) -> bool {
        t >= self.min && t <= self.max
    }

    /// Union hull of two ranges.
    pub fn widen(&self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Fraction of the range covered up to `t`, clamped to `[0, 1]`.
    ///
    /// Degenerate ranges report zero so callers never divide by a zero span.
    pub fn progress_of(&self, t: Timestamp) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        ((t - self.min) as f64 / self.span() as f64).clamp(0.0, 1.0)
    }
}

/// Outcome of a resolution attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// A usable range was produced
    Resolved(TimeRange),
    /// No matching features are materialized yet; keep the previous range
    Pending,
}

/// Computes the time range spanned by the selected watersheds' features.
///
/// The resolver is invoked again each time the renderer settles more data,
/// so its estimate for a fixed selection is monotonically widening. A
/// selection change must [`invalidate`](RangeResolver::invalidate) it before
/// the next scan.
#[derive(Debug, Default)]
pub struct RangeResolver {
    estimate: Option<TimeRange>,
}

impl RangeResolver {
    /// Create a resolver with no estimate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the current estimate; the next scan starts fresh.
    pub fn invalidate(&mut self) {
        self.estimate = None;
    }

    /// Resolve the range for `selection` against the renderer's current
    /// snapshot of materialized features.
    ///
    /// Full selections short-circuit to the catalog's global bounds and
    /// empty selections to a degenerate range at the global minimum; neither
    /// requires a scan. Partial selections scan the snapshot and return
    /// [`Resolution::Pending`] when nothing matches yet.
    pub fn resolve<R: SpatialRenderer>(
        &mut self,
        selection: &Selection,
        catalog: &WatershedCatalog,
        renderer: &R,
    ) -> Resolution {
        if selection.is_full(catalog) {
            let range = catalog.global_range();
            self.estimate = Some(range);
            return Resolution::Resolved(range);
        }

        if selection.is_empty() {
            let range = TimeRange::degenerate_at(catalog.global_range().min);
            self.estimate = Some(range);
            return Resolution::Resolved(range);
        }

        if !renderer.is_data_ready() {
            tracing::debug!("range scan skipped: renderer data not ready");
            return Resolution::Pending;
        }

        let features = renderer.materialized_features(selection);
        let mut hull: Option<TimeRange> = None;
        for feature in &features {
            if !selection.contains(&feature.watershed) {
                continue;
            }
            let point = TimeRange::degenerate_at(feature.timestamp);
            hull = Some(match hull {
                Some(h) => h.widen(point),
                None => point,
            });
        }

        let Some(hull) = hull else {
            tracing::debug!(
                scanned = features.len(),
                "range scan matched no features; retaining previous range"
            );
            return Resolution::Pending;
        };

        let merged = match self.estimate {
            Some(previous) => previous.widen(hull),
            None => hull,
        };
        self.estimate = Some(merged);
        tracing::debug!(min = merged.min, max = merged.max, "range resolved");
        Resolution::Resolved(merged)
    }
}
