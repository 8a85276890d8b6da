//! Rotation tables and horizontal kick data
//!
//! I, S and Z toggle between two hardcoded layouts. J, L and T rotate inside
//! a 3x3 box with `(x, y) -> (y, 2 - x)` for counter-clockwise and the
//! inverse `(x, y) -> (2 - y, x)` for clockwise. O never rotates.

use crate::tetromino::{RotationDirection, ShapeKind};

/// Horizontal offsets tried, in order, when a rotation only fails by
/// leaving the board
pub const KICK_OFFSETS: [i32; 4] = [1, -1, 2, -2];

const I_HORIZONTAL: [(i32, i32); 4] = [(0, 1), (1, 1), (2, 1), (3, 1)];
const I_VERTICAL: [(i32, i32); 4] = [(1, 0), (1, 1), (1, 2), (1, 3)];

const Z_HORIZONTAL: [(i32, i32); 4] = [(0, 0), (1, 0), (1, 1), (2, 1)];
const Z_VERTICAL: [(i32, i32); 4] = [(1, 0), (1, 1), (0, 1), (0, 2)];

const S_HORIZONTAL: [(i32, i32); 4] = [(1, 0), (2, 0), (0, 1), (1, 1)];
const S_VERTICAL: [(i32, i32); 4] = [(0, 0), (0, 1), (1, 1), (1, 2)];

/// Compute the candidate layout for a rotation attempt.
///
/// Returns `None` for the O piece.
pub fn rotated_cells(
    kind: ShapeKind,
    cells: &[(i32, i32); 4],
    direction: RotationDirection,
) -> Option<[(i32, i32); 4]> {
    match kind {
        ShapeKind::O => None,
        ShapeKind::I => Some(toggle(cells, I_HORIZONTAL, I_VERTICAL)),
        ShapeKind::Z => Some(toggle(cells, Z_HORIZONTAL, Z_VERTICAL)),
        ShapeKind::S => Some(toggle(cells, S_HORIZONTAL, S_VERTICAL)),
        ShapeKind::J | ShapeKind::L | ShapeKind::T => Some(cells.map(|(x, y)| match direction {
            RotationDirection::CounterClockwise => (y, 2 - x),
            RotationDirection::Clockwise => (2 - y, x),
        })),
    }
}

/// Two-state toggle: direction is irrelevant
fn toggle(
    cells: &[(i32, i32); 4],
    horizontal: [(i32, i32); 4],
    vertical: [(i32, i32); 4],
) -> [(i32, i32); 4] {
    if *cells == horizontal {
        vertical
    } else {
        horizontal
    }
}
