// SPDX-License-Identifier: MIT OR Apache-2.0
//! Watershed identifiers and the grouped watershed catalog.
//!
//! The catalog is the engine's universe of drainage basins, organized into
//! named geographic groups, plus the dataset's global timestamp bounds. Both
//! are known ahead of time (they are baked into the published tileset), which
//! is what lets the resolver skip scanning when the full universe is
//! selected.

use crate::range::TimeRange;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, dataset-stable identifier for a drainage basin.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WatershedId(String);

impl WatershedId {
    /// Create an identifier from a basin name.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WatershedId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for WatershedId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for WatershedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The universe of watersheds, grouped by geography, with global time bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatershedCatalog {
    groups: IndexMap<String, Vec<WatershedId>>,
    global_range: TimeRange,
}

impl WatershedCatalog {
    /// Create a catalog from ordered groups and the dataset's global bounds.
    pub fn new(groups: IndexMap<String, Vec<WatershedId>>, global_range: TimeRange) -> Self {
        Self {
            groups,
            global_range,
        }
    }

    /// Timestamp bounds of the entire dataset.
    pub fn global_range(&self) -> TimeRange {
        self.global_range
    }

    /// Iterate every watershed in catalog order.
    pub fn universe(&self) -> impl Iterator<Item = &WatershedId> {
        self.groups.values().flatten()
    }

    /// Total number of watersheds.
    pub fn watershed_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Whether the catalog has no watersheds at all.
    pub fn is_empty(&self) -> bool {
        self.groups.values().all(Vec::is_empty)
    }

    /// Whether `id` belongs to the universe.
    pub fn contains(&self, id: &WatershedId) -> bool {
        self.universe().any(|w| w == id)
    }

    /// Members of a named group, if it exists.
    pub fn group(&self, name: &str) -> Option<&[WatershedId]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    /// Iterate group names in catalog order.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// The published India rivers catalog: HydroRIVERS basins grouped by
    /// geography, with the tileset's global timestamp bounds.
    pub fn india_rivers() -> Self {
        let mut groups = IndexMap::new();
        groups.insert(
            "Himalayan Rivers".to_string(),
            ids(&[
                "Ganga",
                "Indus (Up to border)",
                "Brahamaputra",
                "Barak and Others",
            ]),
        );
        groups.insert(
            "Peninsular Rivers".to_string(),
            ids(&[
                "Godavari",
                "Krishna",
                "Cauvery",
                "Mahanadi",
                "Narmada",
                "Tapi",
                "Pennar",
                "Brahmani and Baitarni",
                "Subernarekha",
                "Mahi",
                "Sabarmati",
            ]),
        );
        groups.insert(
            "Coastal Rivers".to_string(),
            ids(&[
                "East flowing rivers between Mahanadi and Pennar",
                "East flowing rivers between Pennar and Kanyakumari",
                "West flowing rivers from Tadri to Kanyakumari",
                "West flowing rivers from Tapi to Tadri",
            ]),
        );
        groups.insert(
            "Rajasthan & Gujarat".to_string(),
            ids(&[
                "West flowing rivers of Kutch and Saurashtra including Luni",
                "Area of Inland drainage in Rajasthan",
            ]),
        );
        Self::new(groups, TimeRange::new(1_704_067_260, 1_704_372_500))
    }
}

fn ids(names: &[&str]) -> Vec<WatershedId> {
    names.iter().map(|n| WatershedId::from(*n)).collect()
}
