//! Property-based tests for terrain classification and grid queries.
//!
//! Invariants:
//! - every normalized height classifies against the standard table
//! - classification is monotone in the raw height
//! - distance queries are symmetric and zero on the diagonal
//! - areas and sub-grids have the predicted sizes

use gridforge_world::{Grid, GridConfig, TerrainTable, UNPASSABLE_TERRAIN};
use proptest::prelude::*;

fn query_grid() -> Grid {
    Grid::build(GridConfig {
        dimensions: (200, 200),
        with_terrain: false,
        ..GridConfig::default()
    })
    .expect("grid builds")
}

proptest! {
    /// Property: the standard table covers the entire normalized range.
    #[test]
    fn every_normalized_height_classifies(raw in 0.001f64..=0.999) {
        let table = TerrainTable::standard();
        let info = table.classify(raw).expect("classifies");
        prop_assert!(raw <= info.raw_max);
        prop_assert!(table.get(&info.name).is_some());
    }

    /// Property: higher raw heights never map to a lower terrain code.
    #[test]
    fn classification_is_monotone(a in 0.001f64..=0.999, b in 0.001f64..=0.999) {
        let table = TerrainTable::standard();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let code_lo = table.classify(lo).expect("classifies").code;
        let code_hi = table.classify(hi).expect("classifies").code;
        prop_assert!(code_lo <= code_hi);
    }

    /// Property: passability of a classified cell matches the fixed name set.
    #[test]
    fn unpassable_names_always_have_infinite_entry(raw in 0.001f64..=0.999) {
        let table = TerrainTable::standard();
        let info = table.classify(raw).expect("classifies");
        let in_set = UNPASSABLE_TERRAIN.contains(&info.name.as_str());
        prop_assert_eq!(in_set, info.cost_in.is_infinite());
    }

    /// Property: distance is symmetric and zero only on the diagonal.
    #[test]
    fn distance_is_symmetric(
        a_row in 0u32..20, a_col in 0u32..20,
        b_row in 0u32..20, b_col in 0u32..20,
    ) {
        use gridforge_world::DistanceUnit;
        let grid = query_grid();
        let a = grid.cell_at(a_row, a_col).expect("in bounds").index;
        let b = grid.cell_at(b_row, b_col).expect("in bounds").index;
        let ab = grid.distance(a, b, DistanceUnit::Pixels);
        let ba = grid.distance(b, a, DistanceUnit::Pixels);
        prop_assert_eq!(ab, ba);
        prop_assert_eq!(ab == 0, a == b);
    }

    /// Property: interior areas are full squares, edge areas are clipped.
    #[test]
    fn area_sizes_match_the_clipped_box(
        row in 0u32..20, col in 0u32..20, radius in 0u32..6,
    ) {
        let grid = query_grid();
        let center = grid.cell_at(row, col).expect("in bounds").index;
        let area = grid.get_area(center, radius);

        let row_lo = row.saturating_sub(radius);
        let row_hi = (row + radius).min(19);
        let col_lo = col.saturating_sub(radius);
        let col_hi = (col + radius).min(19);
        let expected = ((row_hi - row_lo + 1) * (col_hi - col_lo + 1)) as usize;
        prop_assert_eq!(area.len(), expected);
        prop_assert!(area.contains(&center));
    }

    /// Property: walks stay on passable cells and start at the start.
    #[test]
    fn walks_are_passable_and_anchored(seed in any::<u64>()) {
        use gridforge_core::{scoped_rng, RngDomain, WorldSeed};
        use gridforge_world::walk;
        let grid = query_grid();
        let mut rng = scoped_rng(WorldSeed(seed), RngDomain::Query);
        let start = grid.cell_at(0, 0).expect("in bounds").index;
        let goal = grid.cell_at(19, 19).expect("in bounds").index;
        let path = walk(&grid, &mut rng, start, goal, 2048);
        prop_assert!(!path.is_empty());
        prop_assert_eq!(path[0], start);
        for &idx in &path {
            prop_assert!(grid.cells()[idx as usize].passable());
        }
    }
}
