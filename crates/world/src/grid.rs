//! Grid construction and the query surface.
//!
//! A [`Grid`] owns its cells in a flat arena; every cross-reference is a cell
//! index or a designation string. Construction is a pure function of the
//! [`GridConfig`], including its seed: height synthesis, classification,
//! region discovery, and terraforming each draw from their own scoped RNG
//! stream.

use crate::cell::Cell;
use crate::error::WorldError;
use crate::noise::{self, PerlinConfig};
use crate::path::{self, DistanceUnit};
use crate::regions::{self, Region};
use crate::terraform::{self, TerraformParams};
use crate::terrain::{TerrainInfo, TerrainTable};
use crate::topology;
use gridforge_core::{scoped_rng, Direction, RngDomain, WorldSeed};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

/// Cell-count ceiling enforced unless [`GridConfig::allow_large`] is set.
pub const MAX_CELLS: usize = 1_000_000;

/// Everything grid construction needs, seed included.
#[derive(Debug, Clone)]
pub struct GridConfig {
    /// World seed driving every stochastic stage.
    pub seed: WorldSeed,
    /// Edge length of one square cell, in pixels.
    pub cell_size: u32,
    /// Total grid extent in pixels, `(width, height)`.
    pub dimensions: (u32, u32),
    /// Coordinate divisor for the Perlin field.
    pub noise_scale: f64,
    /// Octave count for the Perlin field.
    pub noise_octaves: u32,
    /// Initial perturbation magnitude for midpoint displacement.
    pub noise_roughness: f64,
    /// Classification table applied to the blended heights.
    pub table: TerrainTable,
    /// When false, skip height synthesis and paint every cell GROUND.
    pub with_terrain: bool,
    /// Lift the [`MAX_CELLS`] ceiling.
    pub allow_large: bool,
    /// River and forest carving knobs.
    pub terraform: TerraformParams,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            seed: WorldSeed(0),
            cell_size: 10,
            dimensions: (1000, 1000),
            noise_scale: 25.0,
            noise_octaves: 38,
            noise_roughness: 0.35,
            table: TerrainTable::standard(),
            with_terrain: true,
            allow_large: false,
            terraform: TerraformParams::default(),
        }
    }
}

impl GridConfig {
    fn validate(&self) -> Result<(usize, usize), WorldError> {
        if self.cell_size == 0 {
            return Err(WorldError::Configuration("cell size must be positive".into()));
        }
        if self.dimensions.0 < self.cell_size || self.dimensions.1 < self.cell_size {
            return Err(WorldError::Configuration(format!(
                "dimensions {:?} smaller than one cell of size {}",
                self.dimensions, self.cell_size
            )));
        }
        if self.noise_scale <= 0.0 {
            return Err(WorldError::Configuration("noise scale must be positive".into()));
        }
        let cols = (self.dimensions.0 / self.cell_size) as usize;
        let rows = (self.dimensions.1 / self.cell_size) as usize;
        if rows * cols > MAX_CELLS && !self.allow_large {
            return Err(WorldError::Configuration(format!(
                "{rows}x{cols} = {} cells exceeds the {MAX_CELLS} ceiling (set allow_large to override)",
                rows * cols
            )));
        }
        Ok((rows, cols))
    }
}

/// A fully constructed grid world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    seed: WorldSeed,
    cell_size: u32,
    rows: u32,
    cols: u32,
    table: TerrainTable,
    cells: Vec<Cell>,
    lookup: HashMap<String, u32>,
    landmasses: Vec<Region>,
    bodies_of_water: Vec<Region>,
    rivers: Vec<Vec<u32>>,
}

impl Grid {
    /// Build a grid from `config`.
    ///
    /// With terrain enabled this synthesizes heights, classifies every cell,
    /// discovers regions, and carves rivers per the terraform parameters.
    pub fn build(config: GridConfig) -> Result<Self, WorldError> {
        let (rows, cols) = config.validate()?;
        debug!(rows, cols, seed = config.seed.0, "building grid");

        let row_names = topology::row_names(rows)?;
        let col_names = topology::col_names(cols)?;

        let mut cells = Vec::with_capacity(rows * cols);
        let mut lookup = HashMap::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                let index = topology::index_of(row, col, cols);
                let designation = format!("{}{}", row_names[row], col_names[col]);
                lookup.insert(designation.clone(), index);
                cells.push(Cell::new(
                    designation,
                    index,
                    row as u32,
                    col as u32,
                    config.cell_size,
                    topology::quadrant_of(row, col, rows, cols),
                    topology::adjacency(row, col, rows, cols),
                ));
            }
        }

        let mut grid = Self {
            seed: config.seed,
            cell_size: config.cell_size,
            rows: rows as u32,
            cols: cols as u32,
            table: config.table,
            cells,
            lookup,
            landmasses: Vec::new(),
            bodies_of_water: Vec::new(),
            rivers: Vec::new(),
        };

        if config.with_terrain {
            grid.synthesize_terrain(
                config.noise_scale,
                config.noise_octaves,
                config.noise_roughness,
            );
            regions::assign_regions(&mut grid);
            let mut rng = scoped_rng(config.seed, RngDomain::Terraform);
            terraform::set_rivers(&mut grid, &mut rng, &config.terraform)?;
            for _ in 0..config.terraform.forests {
                terraform::seed_forest(&mut grid, &mut rng, &config.terraform)?;
            }
        } else {
            let ground = TerrainInfo::ground();
            for cell in &mut grid.cells {
                cell.apply_terrain(&ground);
            }
        }

        debug!(cells = grid.cells.len(), "grid ready");
        Ok(grid)
    }

    fn synthesize_terrain(&mut self, scale: f64, octaves: u32, roughness: f64) {
        let rows = self.rows as usize;
        let cols = self.cols as usize;

        let mut rng = scoped_rng(self.seed, RngDomain::Heightmap);
        let displacement = noise::diamond_square(&mut rng, rows, cols, roughness);
        let coherent = noise::perlin_field(
            &PerlinConfig {
                scale,
                octaves,
                seed: self.seed.fold32(),
                ..PerlinConfig::default()
            },
            rows,
            cols,
        );
        let raw = noise::blend(&displacement, &coherent);

        let ocean = TerrainInfo::ocean_default();
        for row in 0..rows {
            for col in 0..cols {
                let idx = topology::index_of(row, col, cols) as usize;
                let value = raw.get(row, col);
                self.cells[idx].raw_height = value;
                // The 1.5 blend divisor can push heights past the table's
                // final threshold; those fall back to ocean like NaN does.
                match self.table.classify(value) {
                    Ok(info) => {
                        let info = info.clone();
                        self.cells[idx].apply_terrain(&info);
                    }
                    Err(_) => self.cells[idx].apply_terrain(&ocean),
                }
            }
        }
    }

    /// World seed the grid was built from.
    pub fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// Pixel edge length of one cell.
    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Row count.
    pub fn row_count(&self) -> u32 {
        self.rows
    }

    /// Column count.
    pub fn col_count(&self) -> u32 {
        self.cols
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The classification table in effect.
    pub fn table(&self) -> &TerrainTable {
        &self.table
    }

    /// Discovered landmasses and islands.
    pub fn landmasses(&self) -> &[Region] {
        &self.landmasses
    }

    /// Discovered bodies of water (puddles below the keep threshold are
    /// absent).
    pub fn bodies_of_water(&self) -> &[Region] {
        &self.bodies_of_water
    }

    /// Carved river paths, in carving order.
    pub fn rivers(&self) -> &[Vec<u32>] {
        &self.rivers
    }

    pub(crate) fn cell_mut(&mut self, idx: u32) -> &mut Cell {
        &mut self.cells[idx as usize]
    }

    pub(crate) fn set_regions(&mut self, landmasses: Vec<Region>, waters: Vec<Region>) {
        self.landmasses = landmasses;
        self.bodies_of_water = waters;
    }

    pub(crate) fn push_river(&mut self, river: Vec<u32>) {
        self.rivers.push(river);
    }

    /// Resolve a designation to its cell index.
    pub fn index_of(&self, designation: &str) -> Result<u32, WorldError> {
        self.lookup
            .get(designation)
            .copied()
            .ok_or_else(|| WorldError::UnknownCell(designation.to_owned()))
    }

    /// Cell by designation.
    pub fn cell(&self, designation: &str) -> Result<&Cell, WorldError> {
        Ok(&self.cells[self.index_of(designation)? as usize])
    }

    /// Cell at `(row, col)`, when in bounds.
    pub fn cell_at(&self, row: u32, col: u32) -> Option<&Cell> {
        if row < self.rows && col < self.cols {
            Some(&self.cells[topology::index_of(row as usize, col as usize, self.cols as usize) as usize])
        } else {
            None
        }
    }

    /// Repaint one cell with a terrain record.
    pub fn paint_terrain(&mut self, idx: u32, info: &TerrainInfo) {
        self.cells[idx as usize].apply_terrain(info);
    }

    /// Distance between two cells in the requested unit.
    pub fn distance(&self, a: u32, b: u32, unit: DistanceUnit) -> u64 {
        let ca = &self.cells[a as usize];
        let cb = &self.cells[b as usize];
        let pixels = ((ca.x - cb.x) as f64)
            .hypot((ca.y - cb.y) as f64)
            .round() as u64;
        match unit {
            DistanceUnit::Pixels => pixels,
            DistanceUnit::Cells => pixels / self.cell_size as u64,
        }
    }

    pub(crate) fn distance_cells(&self, a: u32, b: u32) -> u64 {
        self.distance(a, b, DistanceUnit::Cells)
    }

    /// Cheapest path between two designations.
    pub fn get_path(&self, from: &str, to: &str) -> Result<(Vec<u32>, f64), WorldError> {
        let start = self.index_of(from)?;
        let goal = self.index_of(to)?;
        path::astar(self, start, goal)
    }

    /// Organic goal-biased walk between two designations.
    pub fn get_walk(
        &self,
        rng: &mut StdRng,
        from: &str,
        to: &str,
        max_steps: usize,
    ) -> Result<Vec<u32>, WorldError> {
        let start = self.index_of(from)?;
        let end = self.index_of(to)?;
        Ok(path::walk(self, rng, start, end, max_steps))
    }

    /// Recompute regions and coastal flags from the current passability
    /// state, for callers that repaint terrain by hand.
    pub fn refresh_regions(&mut self) {
        regions::assign_regions(self);
    }

    /// Square area of cells within `radius` cells of `center`, clipped at
    /// the edges.
    pub fn get_area(&self, center: u32, radius: u32) -> Vec<u32> {
        let cell = &self.cells[center as usize];
        let row_lo = cell.row.saturating_sub(radius);
        let row_hi = (cell.row + radius).min(self.rows - 1);
        let col_lo = cell.col.saturating_sub(radius);
        let col_hi = (cell.col + radius).min(self.cols - 1);
        let mut area = Vec::new();
        for row in row_lo..=row_hi {
            for col in col_lo..=col_hi {
                area.push(topology::index_of(row as usize, col as usize, self.cols as usize));
            }
        }
        area
    }

    /// Rectangular sub-grid spanned by two corner designations (inclusive).
    pub fn get_sub(&self, from: &str, to: &str) -> Result<Vec<u32>, WorldError> {
        let a = &self.cells[self.index_of(from)? as usize];
        let b = &self.cells[self.index_of(to)? as usize];
        let row_lo = a.row.min(b.row);
        let row_hi = a.row.max(b.row);
        let col_lo = a.col.min(b.col);
        let col_hi = a.col.max(b.col);
        let mut sub = Vec::new();
        for row in row_lo..=row_hi {
            for col in col_lo..=col_hi {
                sub.push(topology::index_of(row as usize, col as usize, self.cols as usize));
            }
        }
        Ok(sub)
    }

    /// Members of `area` that touch its outside: any missing neighbor slot
    /// or any neighbor not in the area.
    pub fn get_perimeter(&self, area: &[u32]) -> Vec<u32> {
        let members: HashSet<u32> = area.iter().copied().collect();
        area.iter()
            .copied()
            .filter(|&idx| {
                self.cells[idx as usize]
                    .adjacent
                    .iter()
                    .any(|slot| match slot {
                        Some(n) => !members.contains(n),
                        None => true,
                    })
            })
            .collect()
    }

    /// Compass label from one cell toward another.
    ///
    /// Adjacent cells use the exact slot direction; distant cells fall back
    /// to the dominant bearing of the coordinate delta.
    pub fn get_direction(&self, from: u32, to: u32) -> &'static str {
        let a = &self.cells[from as usize];
        let b = &self.cells[to as usize];
        for dir in Direction::ALL {
            if a.neighbor(dir) == Some(to) {
                return dir.compass();
            }
        }
        let dx = (b.x - a.x) as f64;
        // Screen coordinates grow downward; flip so north is positive.
        let dy = (a.y - b.y) as f64;
        let angle = dy.atan2(dx).to_degrees();
        match angle {
            a if !(-157.5..157.5).contains(&a) => "W",
            a if a >= 112.5 => "NW",
            a if a >= 67.5 => "N",
            a if a >= 22.5 => "NE",
            a if a >= -22.5 => "E",
            a if a >= -67.5 => "SE",
            a if a >= -112.5 => "S",
            _ => "SW",
        }
    }

    /// Uniformly random cell index.
    pub fn random_cell(&self, rng: &mut StdRng) -> u32 {
        rng.gen_range(0..self.cells.len()) as u32
    }

    /// Uniformly random cell index among those matching `predicate`, or
    /// `None` when nothing matches.
    pub fn random_cell_where<F>(&self, rng: &mut StdRng, predicate: F) -> Option<u32>
    where
        F: Fn(&Cell) -> bool,
    {
        let candidates: Vec<u32> = self
            .cells
            .iter()
            .filter(|cell| predicate(cell))
            .map(|cell| cell.index)
            .collect();
        if candidates.is_empty() {
            None
        } else {
            Some(candidates[rng.gen_range(0..candidates.len())])
        }
    }

    /// Cells of quadrant `q` (0..4).
    pub fn quadrant_cells(&self, q: u8) -> Vec<u32> {
        self.cells
            .iter()
            .filter(|cell| cell.quadrant == q)
            .map(|cell| cell.index)
            .collect()
    }

    /// Number of contiguous passable cells from `idx` toward the edge in
    /// `dir`, not counting `idx` itself.
    pub fn clearance(&self, idx: u32, dir: Direction) -> u32 {
        let mut count = 0;
        let mut cursor = idx;
        while let Some(next) = self.cells[cursor as usize].neighbor(dir) {
            if !self.cells[next as usize].passable() {
                break;
            }
            count += 1;
            cursor = next;
        }
        count
    }

    fn span(&self, idx: u32, fwd: Direction, back: Direction) -> Vec<u32> {
        let mut cells = Vec::new();
        let mut cursor = idx;
        for _ in 0..self.clearance(idx, back) {
            match self.cells[cursor as usize].neighbor(back) {
                Some(next) => cursor = next,
                None => break,
            }
        }
        cells.push(cursor);
        while let Some(next) = self.cells[cursor as usize].neighbor(fwd) {
            if !self.cells[next as usize].passable() {
                break;
            }
            cells.push(next);
            cursor = next;
        }
        cells
    }

    /// Passable cells reachable from `idx` through straight row and column
    /// runs: the cell's row span, each span member's column span, and each
    /// of those members' row spans.
    ///
    /// With a closed impassable border around `idx` this fills exactly the
    /// enclosed interior, which is what forest seeding relies on.
    pub fn clearance_zone(&self, idx: u32) -> Vec<u32> {
        if !self.cells[idx as usize].passable() {
            return Vec::new();
        }
        let mut zone: BTreeSet<u32> = BTreeSet::new();
        for a in self.span(idx, Direction::Right, Direction::Left) {
            zone.insert(a);
            for b in self.span(a, Direction::Down, Direction::Up) {
                zone.insert(b);
                for c in self.span(b, Direction::Right, Direction::Left) {
                    zone.insert(c);
                }
            }
        }
        zone.into_iter().collect()
    }
}
