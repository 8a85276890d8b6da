//! Active falling piece logic

use crate::board::Board;
use crate::rotation::{rotated_cells, KICK_OFFSETS};
use crate::tetromino::{RotationDirection, ShapeKind};

/// Spawn coordinate for a board: centered horizontally, top row of the
/// spawn layout on the top row of the grid
pub fn spawn_position(width: usize, height: usize) -> (i32, i32) {
    (width as i32 / 2 - 2, height as i32 - 2)
}

/// An active falling piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub kind: ShapeKind,
    /// Cell offsets relative to `(x, y)`
    pub cells: [(i32, i32); 4],
    pub x: i32,
    pub y: i32,
}

impl Piece {
    /// Create a new piece in its canonical layout at the spawn position
    pub fn new(kind: ShapeKind, board: &Board) -> Self {
        let (x, y) = spawn_position(board.width(), board.height());
        Self {
            kind,
            cells: kind.spawn_cells(),
            x,
            y,
        }
    }

    /// Get the absolute positions of all 4 blocks
    pub fn block_positions(&self) -> [(i32, i32); 4] {
        self.cells.map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Check if the piece currently overlaps anything
    pub fn collides(&self, board: &Board) -> bool {
        board.collides(&self.cells, self.x, self.y)
    }

    /// Check if the piece rests on the floor or the stack
    pub fn is_grounded(&self, board: &Board) -> bool {
        board.collides(&self.cells, self.x, self.y - 1)
    }

    /// Try to translate the piece, returns true if successful
    pub fn try_move(&mut self, board: &Board, dx: i32, dy: i32) -> bool {
        if board.collides(&self.cells, self.x + dx, self.y + dy) {
            return false;
        }
        self.x += dx;
        self.y += dy;
        true
    }

    pub fn move_left(&mut self, board: &Board) -> bool {
        self.try_move(board, -1, 0)
    }

    pub fn move_down(&mut self, board: &Board) -> bool {
        self.try_move(board, 0, -1)
    }

    /// Try to rotate, with horizontal kicks when the only obstacle is a wall
    /// or the floor. Returns true if the piece changed.
    pub fn rotate(&mut self, direction: RotationDirection, board: &Board) -> bool {
        let Some(rotated) = rotated_cells(self.kind, &self.cells, direction) else {
            return false;
        };

        if !board.collides(&rotated, self.x, self.y) {
            self.cells = rotated;
            return true;
        }

        // Rotating into the stack is never kicked
        if board.overlaps_stack(&rotated, self.x, self.y) {
            return false;
        }

        for kick in KICK_OFFSETS {
            if !board.collides(&rotated, self.x + kick, self.y) {
                self.x += kick;
                self.cells = rotated;
                return true;
            }
        }
        false
    }

    /// Hard drop - move down as far as possible and return distance dropped
    pub fn hard_drop(&mut self, board: &Board) -> u32 {
        let mut distance = 0;
        while self.move_down(board) {
            distance += 1;
        }
        distance
    }

    /// Get the row the piece would land on
    pub fn ghost_y(&self, board: &Board) -> i32 {
        let mut y = self.y;
        while !board.collides(&self.cells, self.x, y - 1) {
            y -= 1;
        }
        y
    }
}
