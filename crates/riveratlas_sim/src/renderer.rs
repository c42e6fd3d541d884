// SPDX-License-Identifier: MIT OR Apache-2.0
//! An in-memory spatial renderer with tile-by-tile materialization.
//!
//! Stands in for the real map renderer: the full dataset is partitioned
//! into tiles, and only loaded tiles answer feature queries, which
//! reproduces the incomplete-snapshot behavior the engine must tolerate.
//! Every applied predicate and repaint request is recorded so tests can
//! assert on the exact push sequence.

use riveratlas_engine::{Feature, Selection, SpatialRenderer, VisibilityPredicate};

/// Fake renderer over a tiled, lazily loaded feature set.
#[derive(Debug)]
pub struct TiledRenderer {
    tiles: Vec<Vec<Feature>>,
    loaded: usize,
    ready: bool,
    applied: Vec<VisibilityPredicate>,
    repaints: u32,
}

impl TiledRenderer {
    /// Create a renderer whose dataset arrives in `tiles`; nothing is
    /// loaded yet.
    pub fn new(tiles: Vec<Vec<Feature>>) -> Self {
        Self {
            tiles,
            loaded: 0,
            ready: true,
            applied: Vec::new(),
            repaints: 0,
        }
    }

    /// Materialize up to `count` more tiles; returns how many actually
    /// loaded.
    pub fn load_tiles(&mut self, count: usize) -> usize {
        let n = count.min(self.tiles.len() - self.loaded);
        self.loaded += n;
        tracing::debug!(loaded = self.loaded, total = self.tiles.len(), "tiles loaded");
        n
    }

    /// Materialize every remaining tile.
    pub fn load_all(&mut self) {
        self.loaded = self.tiles.len();
    }

    /// Number of tiles materialized so far.
    pub fn loaded_tiles(&self) -> usize {
        self.loaded
    }

    /// Total number of tiles in the dataset.
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Simulate the style/source definitions not having loaded yet.
    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// Every predicate applied so far, in order.
    pub fn applied(&self) -> &[VisibilityPredicate] {
        &self.applied
    }

    /// The live predicate, if any has been applied.
    pub fn last_applied(&self) -> Option<&VisibilityPredicate> {
        self.applied.last()
    }

    /// Number of repaint requests received.
    pub fn repaints(&self) -> u32 {
        self.repaints
    }

    /// How many materialized features the live predicate admits.
    pub fn visible_count(&self) -> usize {
        let Some(predicate) = self.last_applied() else {
            return 0;
        };
        self.tiles[..self.loaded]
            .iter()
            .flatten()
            .filter(|f| predicate.admits(&f.watershed, f.timestamp))
            .count()
    }

    /// How many features are materialized in total.
    pub fn materialized_count(&self) -> usize {
        self.tiles[..self.loaded].iter().map(Vec::len).sum()
    }
}

impl SpatialRenderer for TiledRenderer {
    fn is_data_ready(&self) -> bool {
        self.ready
    }

    fn materialized_features(&self, selection: &Selection) -> Vec<Feature> {
        self.tiles[..self.loaded]
            .iter()
            .flatten()
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

#[cfg(test)]
mod tests {
    use super::*;
    use riveratlas_engine::WatershedId;

    fn feature(watershed: &str, timestamp: i64) -> Feature {
        Feature {
            watershed: WatershedId::from(watershed),
            timestamp,
        }
    }

    #[test]
    fn test_only_loaded_tiles_are_queried() {
        let mut renderer = TiledRenderer::new(vec![
            vec![feature("W1", 100)],
            vec![feature("W1", 200), feature("W2", 300)],
        ]);
        let mut selection = Selection::empty();
        selection.toggle(WatershedId::from("W1"));

        assert!(renderer.materialized_features(&selection).is_empty());

        assert_eq!(renderer.load_tiles(1), 1);
        assert_eq!(renderer.materialized_features(&selection).len(), 1);

        renderer.load_all();
        assert_eq!(renderer.materialized_features(&selection).len(), 2);
        assert_eq!(renderer.materialized_count(), 3);
    }

    #[test]
    fn test_load_tiles_saturates() {
        let mut renderer = TiledRenderer::new(vec![vec![feature("W1", 100)]]);
        assert_eq!(renderer.load_tiles(5), 1);
        assert_eq!(renderer.load_tiles(5), 0);
        assert_eq!(renderer.loaded_tiles(), 1);
    }

    #[test]
    fn test_visible_count_follows_predicate() {
        let mut renderer = TiledRenderer::new(vec![vec![
            feature("W1", 100),
            feature("W1", 500),
            feature("W2", 100),
        ]]);
        renderer.load_all();

        let mut selection = Selection::empty();
        selection.toggle(WatershedId::from("W1"));
        let predicate = VisibilityPredicate::new(150, &selection, 0);
        renderer.apply_visibility(&predicate);

        assert_eq!(renderer.visible_count(), 1);
    }
}
