// SPDX-License-Identifier: MIT OR Apache-2.0
//! Watershed selection state.
//!
//! A selection is the set of watersheds whose rivers participate in the
//! animation. It is pure data: resetting the clock and invalidating the
//! resolved range on mutation are the engine's responsibility, so the model
//! stays trivially testable.

use crate::catalog::{WatershedCatalog, WatershedId};
use indexmap::IndexSet;

/// The set of currently active watersheds.
///
/// "Full" and "empty" are structural properties, not flags: full means the
/// selection equals the catalog universe, empty means no watershed is
/// active. Equality between selections is set equality, which is what
/// stale-result rejection compares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    active: IndexSet<WatershedId>,
}

impl Selection {
    /// An empty selection.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A selection covering the entire catalog universe.
    pub fn full(catalog: &WatershedCatalog) -> Self {
        Self {
            active: catalog.universe().cloned().collect(),
        }
    }

    /// Whether `id` is active.
    pub fn contains(&self, id: &WatershedId) -> bool {
        self.active.contains(id)
    }

    /// Add `id` if absent, remove it if present.
    ///
    /// Ids not (yet) known to the dataset are accepted; they simply never
    /// match a feature.
    pub fn toggle(&mut self, id: WatershedId) {
        if !self.active.shift_remove(&id) {
            self.active.insert(id);
        }
    }

    /// Activate every watershed in the catalog.
    pub fn select_all(&mut self, catalog: &WatershedCatalog) {
        self.active = catalog.universe().cloned().collect();
    }

    /// Deactivate everything.
    pub fn select_none(&mut self) {
        self.active.clear();
    }

    /// Toggle a whole group: if every member is active, deactivate them all;
    /// otherwise activate the full group.
    pub fn toggle_group(&mut self, members: &[WatershedId]) {
        let all_selected = members.iter().all(|m| self.active.contains(m));
        if all_selected {
            for member in members {
                self.active.shift_remove(member);
            }
        } else {
            for member in members {
                self.active.insert(member.clone());
            }
        }
    }

    /// Number of active members of `members`.
    pub fn group_selected_count(&self, members: &[WatershedId]) -> usize {
        members.iter().filter(|m| self.active.contains(*m)).count()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Whether the selection equals the catalog universe exactly.
    pub fn is_full(&self, catalog: &WatershedCatalog) -> bool {
        self.active.len() == catalog.watershed_count()
            && catalog.universe().all(|id| self.active.contains(id))
    }

    /// Whether the selection equals `members` exactly.
    pub fn matches_group(&self, members: &[WatershedId]) -> bool {
        self.active.len() == members.len() && members.iter().all(|m| self.active.contains(m))
    }

    /// Number of active watersheds.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Iterate active watersheds in activation order.
    pub fn iter(&self) -> impl Iterator<Item = &WatershedId> {
        self.active.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::test_catalog;

    #[test]
    fn test_toggle_adds_and_removes() {
        let mut selection = Selection::empty();
        let id = WatershedId::from("W1");

        selection.toggle(id.clone());
        assert!(selection.contains(&id));

        selection.toggle(id.clone());
        assert!(!selection.contains(&id));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_unknown_ids_are_accepted() {
        let catalog = test_catalog();
        let mut selection = Selection::full(&catalog);

        selection.toggle(WatershedId::from("NotInDataset"));
        assert!(selection.contains(&WatershedId::from("NotInDataset")));
        // An extra unknown id means the selection is no longer the universe.
        assert!(!selection.is_full(&catalog));
    }

    #[test]
    fn test_full_and_empty_are_structural() {
        let catalog = test_catalog();
        let mut selection = Selection::empty();
        assert!(selection.is_empty());
        assert!(!selection.is_full(&catalog));

        selection.select_all(&catalog);
        assert!(selection.is_full(&catalog));

        // Rebuilding the same set by hand is still "full".
        let mut by_hand = Selection::empty();
        for id in catalog.universe() {
            by_hand.toggle(id.clone());
        }
        assert!(by_hand.is_full(&catalog));
        assert_eq!(by_hand, selection);

        selection.select_none();
        assert!(selection.is_empty());
    }

    #[test]
    fn test_toggle_group_selects_then_clears() {
        let catalog = test_catalog();
        let group: Vec<_> = catalog.group("Uplands").unwrap().to_vec();
        let mut selection = Selection::empty();

        selection.toggle_group(&group);
        assert_eq!(selection.group_selected_count(&group), group.len());
        assert!(selection.matches_group(&group));

        // Partially selected groups select the remainder, not clear.
        selection.toggle(group[0].clone());
        selection.toggle_group(&group);
        assert!(selection.matches_group(&group));

        selection.toggle_group(&group);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_matches_group_is_exact() {
        let catalog = test_catalog();
        let group: Vec<_> = catalog.group("Uplands").unwrap().to_vec();
        let mut selection = Selection::empty();
        selection.toggle_group(&group);
        selection.toggle(WatershedId::from("W9"));

        assert!(!selection.matches_group(&group));
    }

    #[test]
    fn test_selection_equality_ignores_order() {
        let mut a = Selection::empty();
        a.toggle(WatershedId::from("W1"));
        a.toggle(WatershedId::from("W2"));

        let mut b = Selection::empty();
        b.toggle(WatershedId::from("W2"));
        b.toggle(WatershedId::from("W1"));

        assert_eq!(a, b);
    }
}
