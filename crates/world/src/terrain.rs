//! Threshold-table terrain classification.
//!
//! A [`TerrainTable`] is an ordered list of entries sorted ascending by
//! `raw_max`; classification picks the first entry whose threshold covers the
//! raw height. The table is validated once at load time so classification
//! itself never has to re-check ordering.

use crate::error::WorldError;
use gridforge_core::Rgba;
use serde::{Deserialize, Serialize};

/// Deep water, used both as a table entry and as the fallback terrain.
pub const OCEAN_BLUE: Rgba = Rgba::new(16, 78, 139, 255);
/// Carved river channel.
pub const RIVER_BLUE: Rgba = Rgba::new(18, 70, 132, 255);
/// Sandy riverbank, applied next to grassland rivers.
pub const SANDY_GREY: Rgba = Rgba::new(188, 182, 134, 255);
/// Grassy riverbank, applied next to foothill rivers.
pub const BANK_GREEN: Rgba = Rgba::new(84, 139, 84, 255);
/// Stony riverbank, applied next to mound rivers.
pub const BANK_GREY: Rgba = Rgba::new(112, 128, 136, 255);
/// Forest canopy.
pub const FOREST_GREEN: Rgba = Rgba::new(74, 130, 70, 255);

const GRASS_GREEN: Rgba = Rgba::new(84, 139, 84, 255);
const PLAIN_GREEN: Rgba = Rgba::new(90, 154, 90, 255);
const FOOTHILL_GREEN: Rgba = Rgba::new(82, 144, 78, 255);
const BEACH_GREEN: Rgba = Rgba::new(99, 170, 112, 255);
const SANDSTONE_GREY: Rgba = Rgba::new(169, 169, 169, 255);
const MOUND_GREY: Rgba = Rgba::new(105, 105, 105, 255);
const HILL_GREEN: Rgba = Rgba::new(91, 101, 91, 255);
const BASE_GREY: Rgba = Rgba::new(112, 128, 136, 255);
const SIDE_GREY: Rgba = Rgba::new(79, 83, 72, 255);
const CRAG_GREY: Rgba = Rgba::new(48, 42, 36, 255);
const SNOW_WHITE: Rgba = Rgba::new(253, 245, 245, 255);

/// Terrain names that are never enterable regardless of cost values.
pub const UNPASSABLE_TERRAIN: [&str; 8] = [
    "OCEAN",
    "BLOCKED",
    "MOUND",
    "HILL",
    "MOUNTAIN_BASE",
    "MOUNTAIN_SIDE",
    "MOUNTAIN_CRAG",
    "MOUNTAIN_PEAK",
];

/// Whether `name` belongs to the fixed unpassable set.
pub fn is_unpassable_name(name: &str) -> bool {
    UNPASSABLE_TERRAIN.contains(&name)
}

/// One terrain descriptor: classification threshold plus display and
/// traversal attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainInfo {
    /// Terrain name, unique within a table.
    pub name: String,
    /// Upper raw-height bound covered by this entry (inclusive).
    pub raw_max: f64,
    /// Stable integer code, unique within a table.
    pub code: u16,
    /// Display color.
    pub color: Rgba,
    /// Cost to enter a cell of this terrain. Infinite means impassable.
    pub cost_in: f64,
    /// Cost to leave a cell of this terrain.
    pub cost_out: f64,
    /// Single-character glyph for ASCII dumps.
    pub glyph: char,
}

impl TerrainInfo {
    fn new(
        name: &str,
        raw_max: f64,
        code: u16,
        color: Rgba,
        cost_in: f64,
        cost_out: f64,
        glyph: char,
    ) -> Self {
        Self {
            name: name.to_owned(),
            raw_max,
            code,
            color,
            cost_in,
            cost_out,
            glyph,
        }
    }

    /// The fallback terrain applied to cells that never received a raw
    /// height. Impassable in both directions.
    pub fn ocean_default() -> Self {
        Self::new("OCEAN", f64::INFINITY, 0, OCEAN_BLUE, f64::INFINITY, f64::INFINITY, '~')
    }

    /// Carved river channel, painted by the terraformer.
    pub fn river() -> Self {
        Self::new("RIVER", f64::INFINITY, 12, RIVER_BLUE, 2.0, 2.0, '=')
    }

    /// Riverbank with a caller-chosen color (depends on the repainted
    /// terrain).
    pub fn riverbank(color: Rgba) -> Self {
        Self::new("RIVERBANK", f64::INFINITY, 13, color, 1.0, 2.0, '-')
    }

    /// Forest canopy, painted by the terraformer.
    pub fn forest() -> Self {
        Self::new("FOREST", f64::INFINITY, 14, FOREST_GREEN, 2.0, 1.0, 'T')
    }

    /// Hard obstruction, never produced by classification.
    pub fn blocked() -> Self {
        Self::new("BLOCKED", f64::INFINITY, 15, Rgba::new(0, 0, 0, 255), f64::INFINITY, f64::INFINITY, 'X')
    }

    /// Featureless passable terrain for grids built without height
    /// synthesis.
    pub fn ground() -> Self {
        Self::new("GROUND", f64::INFINITY, 16, Rgba::new(128, 128, 128, 255), 1.0, 1.0, '.')
    }
}

/// Ordered classification table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainTable {
    entries: Vec<TerrainInfo>,
}

impl TerrainTable {
    /// Build a table from `entries`, validating ordering and coverage.
    ///
    /// Entries must be sorted ascending by `raw_max`, carry unique names and
    /// codes, and the final threshold must reach at least 0.999 so every
    /// normalized height classifies.
    pub fn new(entries: Vec<TerrainInfo>) -> Result<Self, WorldError> {
        if entries.is_empty() {
            return Err(WorldError::Configuration(
                "terrain table must not be empty".into(),
            ));
        }
        for pair in entries.windows(2) {
            if pair[1].raw_max < pair[0].raw_max {
                return Err(WorldError::Configuration(format!(
                    "terrain thresholds out of order: {} ({}) before {} ({})",
                    pair[0].name, pair[0].raw_max, pair[1].name, pair[1].raw_max
                )));
            }
        }
        let last = &entries[entries.len() - 1];
        if last.raw_max < 0.999 {
            return Err(WorldError::Configuration(format!(
                "terrain table does not cover [0, 1]: final threshold {} < 0.999",
                last.raw_max
            )));
        }
        for (i, entry) in entries.iter().enumerate() {
            for other in &entries[i + 1..] {
                if entry.name == other.name {
                    return Err(WorldError::Configuration(format!(
                        "duplicate terrain name: {}",
                        entry.name
                    )));
                }
                if entry.code == other.code {
                    return Err(WorldError::Configuration(format!(
                        "duplicate terrain code: {}",
                        entry.code
                    )));
                }
            }
        }
        Ok(Self { entries })
    }

    /// The default table used by grid construction.
    pub fn standard() -> Self {
        let entries = vec![
            TerrainInfo::new("OCEAN", 0.270, 0, OCEAN_BLUE, f64::INFINITY, f64::INFINITY, '~'),
            TerrainInfo::new("SAND", 0.300, 1, SANDSTONE_GREY, 1.25, 1.0, '.'),
            TerrainInfo::new("BEACH_GRASS", 0.323, 2, BEACH_GREEN, 1.0, 1.0, ','),
            TerrainInfo::new("GRASS", 0.440, 3, GRASS_GREEN, 1.0, 1.0, '"'),
            TerrainInfo::new("PLAIN", 0.572, 4, PLAIN_GREEN, 1.0, 1.0, '"'),
            TerrainInfo::new("FOOTHILL", 0.620, 5, FOOTHILL_GREEN, 1.5, 1.0, 'n'),
            TerrainInfo::new("HILL", 0.660, 6, HILL_GREEN, f64::INFINITY, 2.0, 'n'),
            TerrainInfo::new("MOUND", 0.700, 7, MOUND_GREY, f64::INFINITY, 2.0, 'm'),
            TerrainInfo::new("MOUNTAIN_BASE", 0.800, 8, BASE_GREY, f64::INFINITY, 0.5, 'M'),
            TerrainInfo::new("MOUNTAIN_SIDE", 0.900, 9, SIDE_GREY, f64::INFINITY, 1.0, 'M'),
            TerrainInfo::new("MOUNTAIN_CRAG", 0.970, 10, CRAG_GREY, f64::INFINITY, 2.0, 'M'),
            TerrainInfo::new("MOUNTAIN_PEAK", 0.999, 11, SNOW_WHITE, f64::INFINITY, 2.0, '^'),
        ];
        // Fixed entries, already sorted with unique names and codes.
        Self { entries }
    }

    /// Classify a raw height into the first covering entry.
    pub fn classify(&self, raw: f64) -> Result<&TerrainInfo, WorldError> {
        if raw.is_nan() {
            return Err(WorldError::Classification {
                designation: String::new(),
                raw,
            });
        }
        self.entries
            .iter()
            .find(|entry| raw <= entry.raw_max)
            .ok_or(WorldError::Classification {
                designation: String::new(),
                raw,
            })
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Option<&TerrainInfo> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Iterate entries in threshold order.
    pub fn entries(&self) -> impl Iterator<Item = &TerrainInfo> {
        self.entries.iter()
    }
}
