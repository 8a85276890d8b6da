//! Tetromino definitions and canonical spawn layouts
//!
//! Coordinates are `(x, y)` pairs: `x` is the column, `y` is the row counted
//! upward from the bottom of the board.

use serde::{Deserialize, Serialize};

/// Cell value of an empty grid square
pub const EMPTY_CELL: u8 = 0;
/// Cell value written by garbage injection
pub const GARBAGE_CELL: u8 = 8;

/// The 7 shape kinds, in shape-id order (0..=6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    I, // long bar
    J,
    Z,
    O, // square, never rotates
    S,
    L,
    T,
}

impl ShapeKind {
    /// Get all shape kinds in id order
    pub fn all() -> [ShapeKind; 7] {
        [
            ShapeKind::I,
            ShapeKind::J,
            ShapeKind::Z,
            ShapeKind::O,
            ShapeKind::S,
            ShapeKind::L,
            ShapeKind::T,
        ]
    }

    /// Shape id in `0..7`
    pub fn id(&self) -> u8 {
        match self {
            ShapeKind::I => 0,
            ShapeKind::J => 1,
            ShapeKind::Z => 2,
            ShapeKind::O => 3,
            ShapeKind::S => 4,
            ShapeKind::L => 5,
            ShapeKind::T => 6,
        }
    }

    /// Inverse of [`ShapeKind::id`]
    pub fn from_id(id: u8) -> Option<ShapeKind> {
        Self::all().get(id as usize).copied()
    }

    /// Value this kind leaves in the grid once locked (0 stays reserved for empty)
    pub fn cell_value(&self) -> u8 {
        self.id() + 1
    }

    /// Canonical layout used at spawn, relative to the piece position.
    ///
    /// Every layout fits the 4x2 box `x in 0..4, y in 0..2`.
    pub fn spawn_cells(&self) -> [(i32, i32); 4] {
        match self {
            ShapeKind::I => [(0, 1), (1, 1), (2, 1), (3, 1)],
            // X..     (top row is y = 1)
            // XXX
            ShapeKind::J => [(0, 0), (0, 1), (1, 1), (2, 1)],
            ShapeKind::Z => [(0, 0), (1, 0), (1, 1), (2, 1)],
            ShapeKind::O => [(1, 0), (2, 0), (1, 1), (2, 1)],
            ShapeKind::S => [(1, 0), (2, 0), (0, 1), (1, 1)],
            ShapeKind::L => [(2, 0), (0, 1), (1, 1), (2, 1)],
            ShapeKind::T => [(1, 0), (0, 1), (1, 1), (2, 1)],
        }
    }
}

/// Direction for rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}
