//! Snapshot persistence round trip on a seeded terrain grid.

use gridforge_core::WorldSeed;
use gridforge_testkit::{MetricsReport, PersistenceMetrics};
use gridforge_world::{load_grid, save_grid, Grid, GridConfig, TerraformParams};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path() -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "gridforge-roundtrip-{}.grid",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn assert_grids_equal(a: &Grid, b: &Grid) {
    assert_eq!(a.seed(), b.seed());
    assert_eq!(a.cell_size(), b.cell_size());
    assert_eq!(a.row_count(), b.row_count());
    assert_eq!(a.col_count(), b.col_count());
    assert_eq!(a.cells().len(), b.cells().len());
    for (ca, cb) in a.cells().iter().zip(b.cells()) {
        assert_eq!(ca.designation, cb.designation);
        assert_eq!(ca.adjacent, cb.adjacent);
        assert_eq!(ca.terrain_name, cb.terrain_name);
        assert_eq!(ca.terrain_code, cb.terrain_code);
        assert_eq!(ca.color, cb.color);
        assert_eq!(ca.glyph, cb.glyph);
        // Bit-exact, infinities included.
        assert_eq!(ca.raw_height.to_bits(), cb.raw_height.to_bits());
        assert_eq!(ca.cost_in.to_bits(), cb.cost_in.to_bits());
        assert_eq!(ca.cost_out.to_bits(), cb.cost_out.to_bits());
        assert_eq!(ca.passable(), cb.passable());
        assert_eq!(ca.coastal(), cb.coastal());
        assert_eq!(ca.landmass, cb.landmass);
        assert_eq!(ca.body_of_water, cb.body_of_water);
    }
    assert_eq!(a.landmasses().len(), b.landmasses().len());
    for (ra, rb) in a.landmasses().iter().zip(b.landmasses()) {
        assert_eq!(ra.kind, rb.kind);
        assert_eq!(ra.cells, rb.cells);
        assert_eq!(ra.coastal, rb.coastal);
    }
    assert_eq!(a.bodies_of_water().len(), b.bodies_of_water().len());
    assert_eq!(a.rivers(), b.rivers());
}

#[test]
fn terrain_grid_survives_save_and_load() {
    let grid = Grid::build(GridConfig {
        seed: WorldSeed(5050),
        dimensions: (500, 500),
        terraform: TerraformParams {
            rivers: 0,
            ..TerraformParams::default()
        },
        ..GridConfig::default()
    })
    .expect("grid builds");

    let path = temp_path();
    save_grid(&path, &grid).expect("save succeeds");
    let loaded = load_grid(&path).expect("load succeeds");
    assert_grids_equal(&grid, &loaded);

    let mut report = MetricsReport::new("persistence_roundtrip");
    report.persistence = Some(PersistenceMetrics {
        raw_bytes: bincode::serialize(&grid).expect("grid serializes").len(),
        file_bytes: std::fs::metadata(&path).expect("snapshot exists").len() as usize,
    });
    let out = std::env::temp_dir().join("gridforge-persistence-metrics.json");
    report.write_to(&out).expect("metrics write");
    let contents = std::fs::read_to_string(&out).expect("metrics readable");
    assert!(contents.contains("file_bytes"));
    let _ = std::fs::remove_file(&out);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn designation_lookups_survive_the_round_trip() {
    let grid = Grid::build(GridConfig {
        dimensions: (200, 200),
        with_terrain: false,
        ..GridConfig::default()
    })
    .expect("grid builds");

    let path = temp_path();
    save_grid(&path, &grid).expect("save succeeds");
    let loaded = load_grid(&path).expect("load succeeds");
    let _ = std::fs::remove_file(&path);

    let cell = loaded.cell("t00020").expect("designation resolves");
    assert_eq!((cell.row, cell.col), (19, 19));
    assert!(loaded.cell("zzz00001").is_err());
}

#[test]
fn missing_file_is_a_clean_error() {
    let err = load_grid("/nonexistent/gridforge/void.grid").unwrap_err();
    assert!(err.to_string().contains("Failed to open"));
}
