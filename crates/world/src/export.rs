//! Read-only export views for renderers and dumps.
//!
//! The core imposes no image or animation format; it hands out ordered cell
//! attribute lists and ASCII glyph rows and leaves encoding to the consumer.

use crate::grid::Grid;
use gridforge_core::Rgba;
use serde::Serialize;

/// One exported cell record.
#[derive(Debug, Clone, Serialize)]
pub struct CellExport {
    /// Horizontal pixel coordinate.
    pub x: i64,
    /// Vertical pixel coordinate.
    pub y: i64,
    /// Terrain name.
    pub terrain: String,
    /// Display color.
    pub color: Rgba,
}

/// Ordered `(x, y, color)` triples in row-major order.
pub fn color_triples(grid: &Grid) -> Vec<(i64, i64, Rgba)> {
    grid.cells()
        .iter()
        .map(|cell| (cell.x, cell.y, cell.color))
        .collect()
}

/// Ordered `(x, y, terrain name)` tuples in row-major order.
pub fn terrain_tuples(grid: &Grid) -> Vec<(i64, i64, String)> {
    grid.cells()
        .iter()
        .map(|cell| (cell.x, cell.y, cell.terrain_name.clone()))
        .collect()
}

/// One string of glyphs per grid row, top to bottom.
pub fn glyph_rows(grid: &Grid) -> Vec<String> {
    let cols = grid.col_count() as usize;
    grid.cells()
        .chunks(cols)
        .map(|row| row.iter().map(|cell| cell.glyph).collect())
        .collect()
}

/// Full cell records as a JSON array, for external tooling.
pub fn cells_json(grid: &Grid) -> serde_json::Result<String> {
    let records: Vec<CellExport> = grid
        .cells()
        .iter()
        .map(|cell| CellExport {
            x: cell.x,
            y: cell.y,
            terrain: cell.terrain_name.clone(),
            color: cell.color,
        })
        .collect();
    serde_json::to_string_pretty(&records)
}
