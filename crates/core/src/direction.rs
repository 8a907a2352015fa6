//! Eight-way directions with a fixed adjacency slot order.
//!
//! Every cell stores its neighbors in an eight-slot array indexed by
//! `Direction as usize`. The slot order is load-bearing: pathfinding,
//! clearance walks, and river expansion all index into the array by
//! direction rather than scanning it, and edge cells keep `None` in the
//! missing slots so the mapping never shifts.

use serde::{Deserialize, Serialize};

/// One of the eight grid directions, in adjacency slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    /// Row above, column before (slot 0).
    UpLeft = 0,
    /// Row above (slot 1).
    Up = 1,
    /// Row above, column after (slot 2).
    UpRight = 2,
    /// Column after (slot 3).
    Right = 3,
    /// Row below, column after (slot 4).
    DownRight = 4,
    /// Row below (slot 5).
    Down = 5,
    /// Row below, column before (slot 6).
    DownLeft = 6,
    /// Column before (slot 7).
    Left = 7,
}

impl Direction {
    /// All directions in slot order.
    pub const ALL: [Direction; 8] = [
        Direction::UpLeft,
        Direction::Up,
        Direction::UpRight,
        Direction::Right,
        Direction::DownRight,
        Direction::Down,
        Direction::DownLeft,
        Direction::Left,
    ];

    /// The four cardinal directions.
    pub const CARDINAL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// The four diagonal directions.
    pub const DIAGONAL: [Direction; 4] = [
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownRight,
        Direction::DownLeft,
    ];

    /// Adjacency slot index for this direction.
    pub const fn slot(self) -> usize {
        self as usize
    }

    /// Direction stored at the given slot.
    pub const fn from_slot(slot: usize) -> Option<Direction> {
        match slot {
            0 => Some(Direction::UpLeft),
            1 => Some(Direction::Up),
            2 => Some(Direction::UpRight),
            3 => Some(Direction::Right),
            4 => Some(Direction::DownRight),
            5 => Some(Direction::Down),
            6 => Some(Direction::DownLeft),
            7 => Some(Direction::Left),
            _ => None,
        }
    }

    /// Row/column delta for a single step in this direction.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::UpLeft => (-1, -1),
            Direction::Up => (-1, 0),
            Direction::UpRight => (-1, 1),
            Direction::Right => (0, 1),
            Direction::DownRight => (1, 1),
            Direction::Down => (1, 0),
            Direction::DownLeft => (1, -1),
            Direction::Left => (0, -1),
        }
    }

    /// The structurally opposite direction (and slot).
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::UpLeft => Direction::DownRight,
            Direction::Up => Direction::Down,
            Direction::UpRight => Direction::DownLeft,
            Direction::Right => Direction::Left,
            Direction::DownRight => Direction::UpLeft,
            Direction::Down => Direction::Up,
            Direction::DownLeft => Direction::UpRight,
            Direction::Left => Direction::Right,
        }
    }

    /// Compass label, useful for logs and direction queries.
    pub const fn compass(self) -> &'static str {
        match self {
            Direction::Up => "N",
            Direction::UpRight => "NE",
            Direction::Right => "E",
            Direction::DownRight => "SE",
            Direction::Down => "S",
            Direction::DownLeft => "SW",
            Direction::Left => "W",
            Direction::UpLeft => "NW",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_round_trip() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_slot(dir.slot()), Some(dir));
        }
        assert_eq!(Direction::from_slot(8), None);
    }

    #[test]
    fn opposite_is_involutive() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            let (dr, dc) = dir.offset();
            let (or, oc) = dir.opposite().offset();
            assert_eq!((dr + or, dc + oc), (0, 0));
        }
    }

    #[test]
    fn slot_order_matches_adjacency_layout() {
        // Interior-cell neighbor list order: up-left, up, up-right, right,
        // down-right, down, down-left, left.
        let offsets: Vec<(i32, i32)> = Direction::ALL.iter().map(|d| d.offset()).collect();
        assert_eq!(
            offsets,
            vec![
                (-1, -1),
                (-1, 0),
                (-1, 1),
                (0, 1),
                (1, 1),
                (1, 0),
                (1, -1),
                (0, -1)
            ]
        );
    }
}
