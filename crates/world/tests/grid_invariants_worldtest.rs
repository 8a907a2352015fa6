//! Structural invariants of a fully constructed grid.
//!
//! Builds one seeded terrain grid and checks the properties every consumer
//! relies on: symmetric adjacency, passability/cost agreement, and region
//! partitioning.

use gridforge_core::{Direction, WorldSeed};
use gridforge_testkit::{GenerationMetrics, MetricsReport, Snapshot};
use gridforge_world::{
    glyph_rows, Grid, GridConfig, TerrainInfo, TerraformParams, UNPASSABLE_TERRAIN,
};

fn seeded_grid() -> Grid {
    Grid::build(GridConfig {
        seed: WorldSeed(1234),
        dimensions: (500, 500),
        terraform: TerraformParams {
            rivers: 0,
            ..TerraformParams::default()
        },
        ..GridConfig::default()
    })
    .expect("grid builds")
}

#[test]
fn adjacency_is_symmetric_and_edge_slots_are_none() {
    let grid = seeded_grid();
    for cell in grid.cells() {
        for dir in Direction::ALL {
            match cell.neighbor(dir) {
                Some(n) => {
                    let back = grid.cells()[n as usize].neighbor(dir.opposite());
                    assert_eq!(back, Some(cell.index));
                }
                None => {
                    // A missing slot only ever happens on the grid edge.
                    let (dr, dc) = dir.offset();
                    let r = cell.row as i64 + dr as i64;
                    let c = cell.col as i64 + dc as i64;
                    assert!(
                        r < 0
                            || c < 0
                            || r >= grid.row_count() as i64
                            || c >= grid.col_count() as i64
                    );
                }
            }
        }
    }
}

#[test]
fn passability_matches_costs_and_terrain_names() {
    let grid = seeded_grid();
    for cell in grid.cells() {
        if cell.passable() {
            assert!(cell.cost_in.is_finite(), "{}", cell.designation);
            assert!(!UNPASSABLE_TERRAIN.contains(&cell.terrain_name.as_str()));
        } else {
            assert!(cell.cost_in.is_infinite(), "{}", cell.designation);
        }
    }
}

#[test]
fn regions_partition_their_passability_domains() {
    let grid = seeded_grid();

    for (region_idx, region) in grid.landmasses().iter().enumerate() {
        assert!(!region.is_empty());
        for &idx in &region.cells {
            let cell = &grid.cells()[idx as usize];
            assert!(cell.passable());
            assert_eq!(cell.landmass, Some(region_idx as u32));
            assert_eq!(cell.body_of_water, None);
        }
    }
    for (region_idx, region) in grid.bodies_of_water().iter().enumerate() {
        assert!(region.len() >= 100);
        for &idx in &region.cells {
            let cell = &grid.cells()[idx as usize];
            assert!(!cell.passable());
            assert_eq!(cell.body_of_water, Some(region_idx as u32));
        }
    }

    // Every passable cell belongs to exactly one landmass.
    for cell in grid.cells() {
        if cell.passable() {
            assert!(cell.landmass.is_some(), "{}", cell.designation);
        }
    }
}

#[test]
fn cell_region_indices_match_the_registry() {
    // Puddle cleanup converts cells after discovery; the registry must
    // still agree with the per-cell indices afterwards.
    let grid = seeded_grid();
    for cell in grid.cells() {
        if let Some(i) = cell.landmass {
            let region = &grid.landmasses()[i as usize];
            assert!(
                region.cells.binary_search(&cell.index).is_ok(),
                "{} missing from landmass {i}",
                cell.designation
            );
        }
        if let Some(i) = cell.body_of_water {
            let region = &grid.bodies_of_water()[i as usize];
            assert!(
                region.cells.binary_search(&cell.index).is_ok(),
                "{} missing from body of water {i}",
                cell.designation
            );
        }
    }
}

#[test]
fn landmass_coastal_cells_border_ocean() {
    let grid = seeded_grid();
    for region in grid.landmasses() {
        for &idx in &region.coastal {
            let cell = &grid.cells()[idx as usize];
            assert!(cell.coastal());
            let touches_ocean = cell
                .neighbors()
                .any(|n| grid.cells()[n as usize].terrain_name == "OCEAN");
            assert!(touches_ocean, "{}", cell.designation);
        }
    }
}

#[test]
fn no_isolated_single_cell_puddles_remain() {
    let grid = seeded_grid();
    for cell in grid.cells() {
        if cell.passable() {
            continue;
        }
        let neighbors: Vec<u32> = cell.neighbors().collect();
        let all_passable = !neighbors.is_empty()
            && neighbors
                .iter()
                .all(|&n| grid.cells()[n as usize].passable());
        assert!(!all_passable, "puddle survived at {}", cell.designation);
    }
}

#[test]
fn ascii_dump_matches_the_golden_snapshot() {
    let mut grid = Grid::build(GridConfig {
        dimensions: (50, 30),
        with_terrain: false,
        ..GridConfig::default()
    })
    .expect("grid builds");
    let idx = grid.index_of("b00002").expect("designation resolves");
    grid.paint_terrain(idx, &TerrainInfo::river());

    let rows = glyph_rows(&grid);
    Snapshot::for_case(env!("CARGO_MANIFEST_DIR"), "river_glyphs")
        .assert_matches(&rows)
        .expect("snapshot matches");
}

#[test]
fn generation_metrics_report_is_exportable() {
    let grid = seeded_grid();
    let mut report = MetricsReport::new("grid_invariants");
    report.generation = Some(GenerationMetrics {
        cells: grid.cells().len(),
        passable_cells: grid.cells().iter().filter(|c| c.passable()).count(),
        landmasses: grid.landmasses().len(),
        bodies_of_water: grid.bodies_of_water().len(),
        rivers: grid.rivers().len(),
    });
    let path = std::env::temp_dir().join("gridforge-grid-invariants-metrics.json");
    report.write_to(&path).expect("metrics write");
    let _ = std::fs::remove_file(&path);
}
