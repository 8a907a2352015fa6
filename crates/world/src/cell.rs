//! Per-cell state: identity, terrain attributes, adjacency, and flags.

use crate::terrain::{is_unpassable_name, TerrainInfo};
use gridforge_core::{Direction, Rgba};
use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Boolean cell state packed into one byte.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CellFlags: u8 {
        /// The cell can be entered by traversal.
        const PASSABLE = 0b0000_0001;
        /// The cell borders OCEAN terrain.
        const COASTAL = 0b0000_0010;
        /// The cell belongs to a carved river.
        const RIVER = 0b0000_0100;
        /// The cell belongs to a seeded forest.
        const FOREST = 0b0000_1000;
    }
}

impl Default for CellFlags {
    fn default() -> Self {
        CellFlags::empty()
    }
}

/// One grid cell. Owned by the grid arena; other cells are referenced by
/// index, never by pointer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    /// Row name + column name, unique within the grid.
    pub designation: String,
    /// Arena index of this cell.
    pub index: u32,
    /// Zero-based row position.
    pub row: u32,
    /// Zero-based column position.
    pub col: u32,
    /// Horizontal pixel coordinate (`col * cell_size`).
    pub x: i64,
    /// Vertical pixel coordinate (`row * cell_size`).
    pub y: i64,
    /// Quadrant index (0..4) at the grid midpoints.
    pub quadrant: u8,
    /// Neighbor indices in fixed slot order; `None` marks a grid edge.
    pub adjacent: [Option<u32>; 8],
    /// Current terrain name.
    pub terrain_name: String,
    /// Stable terrain code.
    pub terrain_code: u16,
    /// Blended raw height, `NaN` until assigned.
    pub raw_height: f64,
    /// Display color.
    pub color: Rgba,
    /// ASCII glyph.
    pub glyph: char,
    /// Cost to enter this cell.
    pub cost_in: f64,
    /// Cost to leave this cell.
    pub cost_out: f64,
    /// Index into the grid's landmass registry, when on land.
    pub landmass: Option<u32>,
    /// Index into the grid's body-of-water registry, when under water.
    pub body_of_water: Option<u32>,
    flags: CellFlags,
}

impl Cell {
    /// Construct a bare cell with no terrain assigned yet.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        designation: String,
        index: u32,
        row: u32,
        col: u32,
        cell_size: u32,
        quadrant: u8,
        adjacent: [Option<u32>; 8],
    ) -> Self {
        Self {
            designation,
            index,
            row,
            col,
            x: col as i64 * cell_size as i64,
            y: row as i64 * cell_size as i64,
            quadrant,
            adjacent,
            terrain_name: "VOID".to_owned(),
            terrain_code: u16::MAX,
            raw_height: f64::NAN,
            color: Rgba::new(0, 0, 0, 0),
            glyph: ' ',
            cost_in: f64::INFINITY,
            cost_out: f64::INFINITY,
            landmass: None,
            body_of_water: None,
            flags: CellFlags::empty(),
        }
    }

    /// Neighbor index in the given direction, `None` at a grid edge.
    pub fn neighbor(&self, dir: Direction) -> Option<u32> {
        self.adjacent[dir.slot()]
    }

    /// Iterate present neighbor indices in slot order.
    pub fn neighbors(&self) -> impl Iterator<Item = u32> + '_ {
        self.adjacent.iter().flatten().copied()
    }

    /// Whether traversal may enter this cell.
    pub fn passable(&self) -> bool {
        self.flags.contains(CellFlags::PASSABLE)
    }

    /// Set passability, keeping the cost fields consistent: an impassable
    /// cell always carries an infinite entry cost, and re-opening a cell
    /// restores the entry cost of its current terrain record.
    pub fn set_passable(&mut self, passable: bool, terrain_cost_in: f64) {
        self.flags.set(CellFlags::PASSABLE, passable);
        self.cost_in = if passable {
            terrain_cost_in
        } else {
            f64::INFINITY
        };
    }

    /// Whether this cell borders OCEAN terrain.
    pub fn coastal(&self) -> bool {
        self.flags.contains(CellFlags::COASTAL)
    }

    pub(crate) fn set_coastal(&mut self, coastal: bool) {
        self.flags.set(CellFlags::COASTAL, coastal);
    }

    /// Whether this cell belongs to a carved river.
    pub fn river(&self) -> bool {
        self.flags.contains(CellFlags::RIVER)
    }

    /// Whether this cell belongs to a seeded forest.
    pub fn forest(&self) -> bool {
        self.flags.contains(CellFlags::FOREST)
    }

    pub(crate) fn set_flag(&mut self, flag: CellFlags, on: bool) {
        self.flags.set(flag, on);
    }

    /// Apply a terrain record to this cell, deriving passability from the
    /// fixed unpassable name set and the record's entry cost.
    pub fn apply_terrain(&mut self, info: &TerrainInfo) {
        self.terrain_name = info.name.clone();
        self.terrain_code = info.code;
        self.color = info.color;
        self.glyph = info.glyph;
        self.cost_in = info.cost_in;
        self.cost_out = info.cost_out;
        let passable = !is_unpassable_name(&info.name) && info.cost_in.is_finite();
        self.flags.set(CellFlags::PASSABLE, passable);
        if !passable {
            self.cost_in = f64::INFINITY;
        }
    }
}
