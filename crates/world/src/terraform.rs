//! Procedural carving on top of a classified grid: rivers, riverbanks, and
//! forests.

use crate::error::WorldError;
use crate::grid::Grid;
use crate::path;
use crate::regions::RegionKind;
use crate::terrain::{TerrainInfo, BANK_GREEN, BANK_GREY, SANDY_GREY};
use crate::cell::CellFlags;
use gridforge_core::{Direction, Rgba};
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::BTreeSet;
use tracing::debug;

/// Knobs for the carving passes.
#[derive(Debug, Clone)]
pub struct TerraformParams {
    /// Rivers to carve during construction.
    pub rivers: u32,
    /// Forests to seed during construction.
    pub forests: u32,
    /// Minimum distance in cells between river mouths. Defaults to a
    /// quarter of the shorter grid dimension when unset.
    pub min_mouth_distance: Option<u64>,
    /// Retry budget for stochastic placement before giving up.
    pub max_attempts: u32,
    /// Required clearance in all four cardinal directions for a forest
    /// seed cell.
    pub forest_min_clearance: u32,
    /// Candidate lengths for the four diagonal forest border rays.
    pub forest_ray_lengths: [u32; 4],
    /// Step ceiling for carving walks.
    pub walk_step_limit: usize,
}

impl Default for TerraformParams {
    fn default() -> Self {
        Self {
            rivers: 2,
            forests: 0,
            min_mouth_distance: None,
            max_attempts: 64,
            forest_min_clearance: 50,
            forest_ray_lengths: [10, 12, 16, 20],
            walk_step_limit: 4096,
        }
    }
}

fn pick<T: Copy>(rng: &mut StdRng, slice: &[T]) -> T {
    slice[rng.gen_range(0..slice.len())]
}

fn far_enough(grid: &Grid, idx: u32, mouths: &[u32], min_distance: u64) -> bool {
    mouths
        .iter()
        .all(|&m| grid.distance_cells(idx, m) >= min_distance)
}

/// Carve `params.rivers` rivers, then repaint the banks.
///
/// Rivers run from the largest landmass's coast toward a lake shore when one
/// exists, otherwise toward another stretch of coast. Every third river after
/// the first branches off the previous river instead of the coast. Mouth
/// placement retries are bounded; the spacing requirement relaxes as the
/// budget drains and exhaustion is a [`WorldError::Generation`].
pub fn set_rivers(
    grid: &mut Grid,
    rng: &mut StdRng,
    params: &TerraformParams,
) -> Result<(), WorldError> {
    if params.rivers == 0 {
        return Ok(());
    }
    let Some(largest) = grid.landmasses().iter().max_by_key(|r| r.len()) else {
        debug!("no landmasses, skipping rivers");
        return Ok(());
    };
    let coast = largest.coastal.clone();
    if coast.is_empty() {
        debug!("largest landmass has no coast, skipping rivers");
        return Ok(());
    }
    let lake_coast: Vec<u32> = grid
        .bodies_of_water()
        .iter()
        .filter(|r| r.kind == RegionKind::Lake)
        .flat_map(|r| r.coastal.iter().copied())
        .collect();
    let base_distance = params.min_mouth_distance.unwrap_or_else(|| {
        (grid.row_count().min(grid.col_count()) / 4) as u64
    });

    let mut mouths: Vec<u32> = Vec::new();
    for river_index in 0..params.rivers {
        let tributary = river_index % 3 == 0 && !grid.rivers().is_empty();
        let start = if tributary {
            let last = &grid.rivers()[grid.rivers().len() - 1];
            pick(rng, last)
        } else {
            place_mouth(grid, rng, &coast, &mouths, base_distance, params.max_attempts)?
        };

        let end_pool: &[u32] = if lake_coast.is_empty() { &coast } else { &lake_coast };
        let mut end_exclusions = mouths.clone();
        end_exclusions.push(start);
        let end = place_mouth(grid, rng, end_pool, &end_exclusions, base_distance, params.max_attempts)?;

        let spine = path::walk(grid, rng, start, end, params.walk_step_limit);
        let river = expand_spine(grid, &spine);
        paint_river(grid, &river);
        debug!(river = river_index, cells = river.len(), "river carved");
        mouths.push(start);
        mouths.push(end);
        grid.push_river(river);
    }

    paint_riverbanks(grid);
    Ok(())
}

fn place_mouth(
    grid: &Grid,
    rng: &mut StdRng,
    pool: &[u32],
    mouths: &[u32],
    base_distance: u64,
    max_attempts: u32,
) -> Result<u32, WorldError> {
    let mut required = base_distance;
    for attempt in 0..max_attempts {
        let candidate = pick(rng, pool);
        if !mouths.contains(&candidate) && far_enough(grid, candidate, mouths, required) {
            return Ok(candidate);
        }
        // Relax the spacing as the budget drains.
        if attempt > 0 && attempt % 16 == 0 {
            required /= 2;
        }
    }
    Err(WorldError::Generation(format!(
        "no river mouth at distance {base_distance} after {max_attempts} attempts"
    )))
}

/// Widen a spine path: four out of every five accumulated cells also pull in
/// their passable neighbors.
pub(crate) fn expand_spine(grid: &Grid, spine: &[u32]) -> Vec<u32> {
    let mut river = Vec::new();
    let mut seen: BTreeSet<u32> = BTreeSet::new();
    for &idx in spine {
        if seen.insert(idx) {
            river.push(idx);
        }
        if river.len() % 5 == 0 {
            continue;
        }
        for neighbor in grid.cells()[idx as usize].neighbors() {
            if grid.cells()[neighbor as usize].passable() && seen.insert(neighbor) {
                river.push(neighbor);
            }
        }
    }
    river
}

fn paint_river(grid: &mut Grid, river: &[u32]) {
    let info = TerrainInfo::river();
    for &idx in river {
        grid.paint_terrain(idx, &info);
        grid.cell_mut(idx).set_flag(CellFlags::RIVER, true);
    }
}

fn riverbank_color(terrain_name: &str) -> Rgba {
    match terrain_name {
        "FOOTHILL" => BANK_GREEN,
        "MOUND" => BANK_GREY,
        _ => SANDY_GREY,
    }
}

/// Repaint the passable fringe of every river cell, keeping water and sand
/// untouched. The bank color follows the terrain it replaces.
fn paint_riverbanks(grid: &mut Grid) {
    let mut banks: Vec<(u32, Rgba)> = Vec::new();
    let mut seen: BTreeSet<u32> = BTreeSet::new();
    for idx in 0..grid.cells().len() {
        if !grid.cells()[idx].river() {
            continue;
        }
        for neighbor in grid.cells()[idx].neighbors() {
            let name = grid.cells()[neighbor as usize].terrain_name.as_str();
            if matches!(name, "RIVER" | "RIVERBANK" | "OCEAN" | "SAND") {
                continue;
            }
            if seen.insert(neighbor) {
                banks.push((neighbor, riverbank_color(name)));
            }
        }
    }
    for (idx, color) in banks {
        grid.paint_terrain(idx, &TerrainInfo::riverbank(color));
    }
}

/// Seed one forest and return the painted cells.
///
/// Picks a cell with enough open ground around it, shoots four diagonal rays
/// of randomized length to get border corners, joins the corners with
/// organic walks, pads the border with one passable ring, and floods the
/// interior by temporarily closing the border (trap-then-restore). Border
/// and interior are painted FOREST.
pub fn seed_forest(
    grid: &mut Grid,
    rng: &mut StdRng,
    params: &TerraformParams,
) -> Result<Vec<u32>, WorldError> {
    let clearance = params.forest_min_clearance;
    let seed = grid
        .random_cell_where(rng, |cell| {
            cell.passable()
                && Direction::CARDINAL
                    .iter()
                    .all(|&dir| grid.clearance(cell.index, dir) >= clearance)
        })
        .ok_or_else(|| {
            WorldError::Generation(format!(
                "no cell with clearance {clearance} in all four directions"
            ))
        })?;

    let mut corners = [seed; 4];
    for (corner, dir) in corners.iter_mut().zip(Direction::DIAGONAL) {
        let length = pick(rng, &params.forest_ray_lengths);
        let mut cursor = seed;
        for _ in 0..length {
            match grid.cells()[cursor as usize].neighbor(dir) {
                Some(next) if grid.cells()[next as usize].passable() => cursor = next,
                _ => break,
            }
        }
        *corner = cursor;
    }

    let mut border: BTreeSet<u32> = BTreeSet::new();
    for i in 0..4 {
        let from = corners[i];
        let to = corners[(i + 1) % 4];
        border.extend(path::walk(grid, rng, from, to, params.walk_step_limit));
    }

    // One ring of padding so walk diagonals cannot leak the flood.
    let mut expanded = border.clone();
    for &idx in &border {
        for neighbor in grid.cells()[idx as usize].neighbors() {
            if grid.cells()[neighbor as usize].passable() {
                expanded.insert(neighbor);
            }
        }
    }

    let saved: Vec<(u32, f64)> = expanded
        .iter()
        .map(|&idx| (idx, grid.cells()[idx as usize].cost_in))
        .collect();
    for &idx in &expanded {
        grid.cell_mut(idx).set_passable(false, f64::INFINITY);
    }
    let interior = grid.clearance_zone(seed);
    for (idx, cost_in) in saved {
        grid.cell_mut(idx).set_passable(true, cost_in);
    }

    let mut forest: BTreeSet<u32> = expanded;
    forest.extend(interior);
    let info = TerrainInfo::forest();
    for &idx in &forest {
        grid.paint_terrain(idx, &info);
        grid.cell_mut(idx).set_flag(CellFlags::FOREST, true);
    }
    debug!(cells = forest.len(), "forest seeded");
    Ok(forest.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridConfig;
    use gridforge_core::{scoped_rng, RngDomain, WorldSeed};

    fn blank_grid(width: u32, height: u32) -> Grid {
        Grid::build(GridConfig {
            dimensions: (width, height),
            with_terrain: false,
            ..GridConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn expand_spine_skips_every_fifth_cell() {
        let grid = blank_grid(300, 30);
        // A straight spine across the middle row.
        let spine: Vec<u32> = (0..20)
            .map(|col| grid.cell_at(1, col).unwrap().index)
            .collect();
        let river = expand_spine(&grid, &spine);
        assert!(river.len() > spine.len());
        // Spine cells always survive expansion.
        for idx in &spine {
            assert!(river.contains(idx));
        }
    }

    #[test]
    fn riverbank_colors_follow_the_replaced_terrain() {
        assert_eq!(riverbank_color("FOOTHILL"), BANK_GREEN);
        assert_eq!(riverbank_color("MOUND"), BANK_GREY);
        assert_eq!(riverbank_color("GRASS"), SANDY_GREY);
        assert_eq!(riverbank_color("PLAIN"), SANDY_GREY);
    }

    #[test]
    fn forest_paints_border_and_interior() {
        let mut grid = blank_grid(600, 600);
        let mut rng = scoped_rng(WorldSeed(11), RngDomain::Terraform);
        let params = TerraformParams {
            forest_min_clearance: 8,
            forest_ray_lengths: [4, 4, 5, 5],
            ..TerraformParams::default()
        };
        let forest = seed_forest(&mut grid, &mut rng, &params).unwrap();
        assert!(forest.len() > 20);
        for &idx in &forest {
            let cell = &grid.cells()[idx as usize];
            assert_eq!(cell.terrain_name, "FOREST");
            assert!(cell.forest());
            assert!(cell.passable());
        }
        // Trap-then-restore must leave the rest of the grid passable.
        for cell in grid.cells() {
            assert!(cell.passable());
        }
    }

    #[test]
    fn forest_fails_cleanly_without_clearance() {
        let mut grid = blank_grid(50, 50);
        let mut rng = scoped_rng(WorldSeed(2), RngDomain::Terraform);
        let params = TerraformParams {
            forest_min_clearance: 50,
            ..TerraformParams::default()
        };
        assert!(matches!(
            seed_forest(&mut grid, &mut rng, &params),
            Err(WorldError::Generation(_))
        ));
    }
}
