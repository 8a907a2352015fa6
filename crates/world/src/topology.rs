//! Grid addressing: row/column names, pixel coordinates, adjacency, and
//! quadrants.
//!
//! Cell designations are `row name + column name`, for example `g00023`. Row
//! names enumerate single letters, then letter pairs, then lowercase triples;
//! column names are 1-based zero-padded five-digit strings.

use crate::error::WorldError;
use gridforge_core::Direction;

/// Columns are capped by the five-digit name space.
pub const MAX_COLS: usize = 99_999;

/// Maximum row count the name enumeration can address.
pub const MAX_ROWS: usize = row_name_capacity();

const fn row_name_capacity() -> usize {
    // a..z, A..Z, aa..zz, Ba..Zz, aaa..zzz
    26 + 26 + 26 * 26 + 25 * 26 + 26 * 26 * 26
}

/// Generate the first `count` row names.
///
/// Enumeration order: `a..z`, `A..Z`, lowercase pairs `aa..zz`, pairs with an
/// uppercase first letter starting at `B` (`Ba..Zz`), lowercase triples
/// `aaa..zzz`.
pub fn row_names(count: usize) -> Result<Vec<String>, WorldError> {
    if count == 0 {
        return Err(WorldError::Configuration("row count must be at least 1".into()));
    }
    if count > MAX_ROWS {
        return Err(WorldError::Configuration(format!(
            "row count {count} exceeds addressable maximum {MAX_ROWS}"
        )));
    }

    let lower: Vec<char> = ('a'..='z').collect();
    let upper: Vec<char> = ('A'..='Z').collect();
    let mut names = Vec::with_capacity(count);

    for &c in lower.iter().chain(upper.iter()) {
        names.push(c.to_string());
    }
    for &a in &lower {
        for &b in &lower {
            names.push(format!("{a}{b}"));
        }
    }
    for &a in &upper[1..] {
        for &b in &lower {
            names.push(format!("{a}{b}"));
        }
    }
    'outer: for &a in &lower {
        for &b in &lower {
            for &c in &lower {
                if names.len() >= count {
                    break 'outer;
                }
                names.push(format!("{a}{b}{c}"));
            }
        }
    }

    names.truncate(count);
    Ok(names)
}

/// Generate the first `count` column names (`00001`, `00002`, ...).
pub fn col_names(count: usize) -> Result<Vec<String>, WorldError> {
    if count == 0 {
        return Err(WorldError::Configuration("column count must be at least 1".into()));
    }
    if count > MAX_COLS {
        return Err(WorldError::Configuration(format!(
            "column count {count} exceeds addressable maximum {MAX_COLS}"
        )));
    }
    Ok((1..=count).map(|n| format!("{n:05}")).collect())
}

/// Flat arena index for `(row, col)`.
pub fn index_of(row: usize, col: usize, cols: usize) -> u32 {
    (row * cols + col) as u32
}

/// Inverse of [`index_of`].
pub fn row_col_of(index: u32, cols: usize) -> (usize, usize) {
    let index = index as usize;
    (index / cols, index % cols)
}

/// Neighbor indices for `(row, col)` in fixed slot order.
///
/// Missing neighbors (edge and corner cells) stay `None` so the slot
/// positions never shift.
pub fn adjacency(row: usize, col: usize, rows: usize, cols: usize) -> [Option<u32>; 8] {
    let mut slots = [None; 8];
    for dir in Direction::ALL {
        let (dr, dc) = dir.offset();
        let nr = row as i64 + dr as i64;
        let nc = col as i64 + dc as i64;
        if nr >= 0 && nc >= 0 && (nr as usize) < rows && (nc as usize) < cols {
            slots[dir.slot()] = Some(index_of(nr as usize, nc as usize, cols));
        }
    }
    slots
}

/// Quadrant index for `(row, col)` with the grid split at the midpoints.
///
/// 0 = top-left, 1 = top-right, 2 = bottom-left, 3 = bottom-right.
pub fn quadrant_of(row: usize, col: usize, rows: usize, cols: usize) -> u8 {
    let south = row >= rows.div_ceil(2);
    let east = col >= cols.div_ceil(2);
    (south as u8) * 2 + east as u8
}
