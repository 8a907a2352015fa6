//! Connected-component discovery over the passability graph.
//!
//! Landmasses are components of passable cells, bodies of water components of
//! impassable cells, both under 8-connectivity. Water bodies are graded by
//! size; those below the island threshold are discarded outright.

use crate::grid::Grid;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;

/// Minimum component size for a landmass (smaller ones are islands) and for
/// a body of water to be kept at all.
pub const ISLAND_THRESHOLD: usize = 100;
/// Water bodies at or above this size are seas.
pub const SEA_THRESHOLD: usize = 500;
/// Water bodies at or above this size are oceans.
pub const OCEAN_THRESHOLD: usize = 1000;

/// Classification of a connected component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionKind {
    /// Passable component with at least [`ISLAND_THRESHOLD`] cells.
    Landmass,
    /// Passable component below the threshold.
    Island,
    /// Impassable component of [`OCEAN_THRESHOLD`] cells or more.
    Ocean,
    /// Impassable component in `[SEA_THRESHOLD, OCEAN_THRESHOLD)`.
    Sea,
    /// Impassable component in `[ISLAND_THRESHOLD, SEA_THRESHOLD)`.
    Lake,
}

/// One discovered component, with its shoreline subset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    /// Component grade.
    pub kind: RegionKind,
    /// Member cell indices in ascending order.
    pub cells: Vec<u32>,
    /// Coastal subset: for land, members bordering OCEAN terrain; for water,
    /// members bordering a passable cell.
    pub coastal: Vec<u32>,
}

impl Region {
    /// Number of member cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the region has no members.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

fn flood(grid: &Grid, start: u32, passable: bool, seen: &mut [bool]) -> Vec<u32> {
    let mut component = Vec::new();
    let mut queue = VecDeque::from([start]);
    seen[start as usize] = true;
    while let Some(idx) = queue.pop_front() {
        component.push(idx);
        for neighbor in grid.cells()[idx as usize].neighbors() {
            if !seen[neighbor as usize] && grid.cells()[neighbor as usize].passable() == passable {
                seen[neighbor as usize] = true;
                queue.push_back(neighbor);
            }
        }
    }
    component.sort_unstable();
    component
}

fn borders_ocean(grid: &Grid, idx: u32) -> bool {
    grid.cells()[idx as usize]
        .neighbors()
        .any(|n| grid.cells()[n as usize].terrain_name == "OCEAN")
}

fn borders_passable(grid: &Grid, idx: u32) -> bool {
    grid.cells()[idx as usize]
        .neighbors()
        .any(|n| grid.cells()[n as usize].passable())
}

/// Discover all regions, grade them, flag coastal cells, and write the
/// region indices back onto the member cells.
///
/// Runs the puddle cleanup pass last: an impassable cell whose present
/// neighbors are all passable takes on the terrain of its first neighbor.
pub(crate) fn assign_regions(grid: &mut Grid) {
    let cell_count = grid.cells().len();

    for idx in 0..cell_count {
        let cell = grid.cell_mut(idx as u32);
        cell.landmass = None;
        cell.body_of_water = None;
        cell.set_coastal(false);
    }

    let mut seen = vec![false; cell_count];
    let mut landmasses = Vec::new();
    for start in 0..cell_count {
        if seen[start] || !grid.cells()[start].passable() {
            continue;
        }
        let cells = flood(grid, start as u32, true, &mut seen);
        let kind = if cells.len() < ISLAND_THRESHOLD {
            RegionKind::Island
        } else {
            RegionKind::Landmass
        };
        let coastal = cells
            .iter()
            .copied()
            .filter(|&idx| borders_ocean(grid, idx))
            .collect();
        landmasses.push(Region { kind, cells, coastal });
    }

    let mut waters = Vec::new();
    let mut discarded = 0usize;
    for start in 0..cell_count {
        if seen[start] || grid.cells()[start].passable() {
            continue;
        }
        let cells = flood(grid, start as u32, false, &mut seen);
        if cells.len() < ISLAND_THRESHOLD {
            discarded += 1;
            continue;
        }
        let kind = if cells.len() >= OCEAN_THRESHOLD {
            RegionKind::Ocean
        } else if cells.len() >= SEA_THRESHOLD {
            RegionKind::Sea
        } else {
            RegionKind::Lake
        };
        let coastal = cells
            .iter()
            .copied()
            .filter(|&idx| borders_passable(grid, idx))
            .collect();
        waters.push(Region { kind, cells, coastal });
    }

    debug!(
        landmasses = landmasses.len(),
        waters = waters.len(),
        discarded, "regions discovered"
    );

    for (region_idx, region) in landmasses.iter().enumerate() {
        for &idx in &region.cells {
            grid.cell_mut(idx).landmass = Some(region_idx as u32);
        }
        for &idx in &region.coastal {
            grid.cell_mut(idx).set_coastal(true);
        }
    }
    for (region_idx, region) in waters.iter().enumerate() {
        for &idx in &region.cells {
            grid.cell_mut(idx).body_of_water = Some(region_idx as u32);
        }
        for &idx in &region.coastal {
            grid.cell_mut(idx).set_coastal(true);
        }
    }

    // Converted puddle cells join their donor's landmass so the registry
    // and the per-cell indices stay in agreement.
    for idx in fix_puddles(grid) {
        let Some(region_idx) = grid.cells()[idx as usize].landmass else {
            continue;
        };
        let region = &mut landmasses[region_idx as usize];
        if let Err(pos) = region.cells.binary_search(&idx) {
            region.cells.insert(pos, idx);
        }
        if borders_ocean(grid, idx) {
            grid.cell_mut(idx).set_coastal(true);
            if let Err(pos) = region.coastal.binary_search(&idx) {
                region.coastal.insert(pos, idx);
            }
        }
    }

    grid.set_regions(landmasses, waters);
}

/// Convert isolated impassable cells into copies of a passable neighbor,
/// returning the converted indices.
fn fix_puddles(grid: &mut Grid) -> Vec<u32> {
    let mut converted = Vec::new();
    let cell_count = grid.cells().len();
    for idx in 0..cell_count {
        let cell = &grid.cells()[idx];
        if cell.passable() {
            continue;
        }
        let neighbors: Vec<u32> = cell.neighbors().collect();
        if neighbors.is_empty()
            || !neighbors
                .iter()
                .all(|&n| grid.cells()[n as usize].passable())
        {
            continue;
        }
        let donor = neighbors[0] as usize;
        let (name, code, color, glyph, cost_in, cost_out, landmass) = {
            let d = &grid.cells()[donor];
            (
                d.terrain_name.clone(),
                d.terrain_code,
                d.color,
                d.glyph,
                d.cost_in,
                d.cost_out,
                d.landmass,
            )
        };
        let cell = grid.cell_mut(idx as u32);
        cell.terrain_name = name;
        cell.terrain_code = code;
        cell.color = color;
        cell.glyph = glyph;
        cell.cost_out = cost_out;
        cell.body_of_water = None;
        cell.landmass = landmass;
        cell.set_passable(true, cost_in);
        converted.push(idx as u32);
    }
    converted
}
