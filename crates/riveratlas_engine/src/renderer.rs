// SPDX-License-Identifier: MIT OR Apache-2.0
//! The spatial renderer capability the engine depends on.
//!
//! The real renderer is a long-lived external object owning global map
//! state. The engine never reaches into it directly; it depends on this
//! trait, which is what lets tests substitute an in-memory renderer.

use crate::catalog::WatershedId;
use crate::filter::VisibilityPredicate;
use crate::range::Timestamp;
use crate::selection::Selection;
use serde::{Deserialize, Serialize};

/// The two attributes of a river feature the engine consumes.
///
/// Features are externally owned; this is a read-only copy and the engine
/// never writes one back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    /// Drainage basin the feature belongs to
    pub watershed: WatershedId,
    /// Moment the feature appears, epoch seconds
    pub timestamp: Timestamp,
}

/// Injected interface to the external spatial rendering engine.
///
/// `materialized_features` has snapshot semantics over already-loaded
/// geometry only; tiles load lazily in the background, so the snapshot is
/// necessarily incomplete until loading quiesces. The renderer's
/// "data settled" notification is delivered to the engine as
/// [`EngineEvent::DataSettled`](crate::events::EngineEvent::DataSettled).
pub trait SpatialRenderer {
    /// Whether the renderer has loaded its style/source definitions enough
    /// to answer feature queries at all.
    fn is_data_ready(&self) -> bool;

    /// Snapshot of the currently materialized features matching `selection`.
    fn materialized_features(&self, selection: &Selection) -> Vec<Feature>;

    /// Install `predicate` as the live visibility filter.
    fn apply_visibility(&mut self, predicate: &VisibilityPredicate);

    /// Ask the renderer to redraw with whatever it currently has.
    fn request_repaint(&mut self);
}
