// SPDX-License-Identifier: MIT OR Apache-2.0
//! Feature fixtures: JSON loading and a generated demo dataset.

use riveratlas_engine::{Feature, WatershedCatalog};

/// Parse a flat feature list from JSON.
pub fn features_from_json(s: &str) -> Result<Vec<Feature>, serde_json::Error> {
    serde_json::from_str(s)
}

/// Parse a tiled feature set from JSON (an array of tiles, each an array of
/// features).
pub fn tiles_from_json(s: &str) -> Result<Vec<Vec<Feature>>, serde_json::Error> {
    serde_json::from_str(s)
}

/// Build a deterministic tiled dataset for every watershed in the catalog.
///
/// Each watershed's features occupy a window staggered within the global
/// range, so selecting different subsets resolves to visibly different
/// sub-ranges. Features are dealt round-robin across tiles, so any loading
/// order reveals partial data for most watersheds, which is what exercises
/// the resolver's widening behavior.
pub fn demo_tiles(
    catalog: &WatershedCatalog,
    features_per_watershed: usize,
    tile_count: usize,
) -> Vec<Vec<Feature>> {
    let range = catalog.global_range();
    let span = range.span();
    let n = catalog.watershed_count().max(1) as i64;
    let tile_count = tile_count.max(1);
    let mut tiles: Vec<Vec<Feature>> = vec![Vec::new(); tile_count];

    for (wi, id) in catalog.universe().enumerate() {
        let wi_i = wi as i64;
        let w_start = range.min + span * wi_i / (2 * n);
        let w_end = range.max - span * (n - 1 - wi_i) / (2 * n);
        let w_span = w_end - w_start;

        for k in 0..features_per_watershed {
            let t = if features_per_watershed <= 1 {
                w_start
            } else {
                w_start + w_span * k as i64 / (features_per_watershed as i64 - 1)
            };
            tiles[(wi + k) % tile_count].push(Feature {
                watershed: id.clone(),
                timestamp: t,
            });
        }
    }
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use riveratlas_engine::WatershedId;

    #[test]
    fn test_demo_tiles_cover_every_watershed_within_bounds() {
        let catalog = WatershedCatalog::india_rivers();
        let tiles = demo_tiles(&catalog, 6, 4);
        assert_eq!(tiles.len(), 4);

        let all: Vec<&Feature> = tiles.iter().flatten().collect();
        assert_eq!(all.len(), 6 * catalog.watershed_count());

        let range = catalog.global_range();
        for feature in &all {
            assert!(range.contains(feature.timestamp));
            assert!(catalog.contains(&feature.watershed));
        }
        for id in catalog.universe() {
            assert!(all.iter().any(|f| &f.watershed == id));
        }
    }

    #[test]
    fn test_demo_windows_are_staggered() {
        let catalog = WatershedCatalog::india_rivers();
        let tiles = demo_tiles(&catalog, 4, 1);
        let first = catalog.universe().next().unwrap();
        let last = catalog.universe().last().unwrap();

        let min_of = |id: &WatershedId| {
            tiles[0]
                .iter()
                .filter(|f| &f.watershed == id)
                .map(|f| f.timestamp)
                .min()
                .unwrap()
        };
        assert!(min_of(first) < min_of(last));
    }

    #[test]
    fn test_json_round_trip() {
        let features = vec![
            Feature {
                watershed: WatershedId::from("Ganga"),
                timestamp: 1_704_100_000,
            },
            Feature {
                watershed: WatershedId::from("Krishna"),
                timestamp: 1_704_200_000,
            },
        ];
        let json = serde_json::to_string(&features).unwrap();
        assert_eq!(features_from_json(&json).unwrap(), features);

        let tiles = vec![features.clone(), vec![]];
        let json = serde_json::to_string(&tiles).unwrap();
        assert_eq!(tiles_from_json(&json).unwrap(), tiles);
    }
}
