//! Grid representation, collision detection, line clears and garbage rows

use crate::tetromino::{EMPTY_CELL, GARBAGE_CELL};

/// Standard board dimensions
pub const DEFAULT_WIDTH: usize = 10;
pub const DEFAULT_HEIGHT: usize = 20;

/// Smallest accepted dimension: a piece's bounding box must fit
pub const MIN_DIMENSION: usize = 4;

/// The locked cells of one board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    /// Row-major, row 0 is the bottom, row increases upward
    cells: Vec<u8>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl Board {
    /// Create a new empty board. Dimensions below [`MIN_DIMENSION`] are raised to it.
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.max(MIN_DIMENSION);
        let height = height.max(MIN_DIMENSION);
        Self {
            width,
            height,
            cells: vec![EMPTY_CELL; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    /// Get the cell at a position
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Set a cell at a position
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, value: u8) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = value;
                true
            }
            None => false,
        }
    }

    /// Whether a single square is unavailable to a piece.
    ///
    /// Walls and the floor block; the space above the top row is open.
    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        if x < 0 || x >= self.width as i32 || y < 0 {
            return true;
        }
        if y >= self.height as i32 {
            return false;
        }
        self.cells[y as usize * self.width + x as usize] != EMPTY_CELL
    }

    /// Check if a layout placed at `(px, py)` hits a wall, the floor or the stack
    pub fn collides(&self, cells: &[(i32, i32)], px: i32, py: i32) -> bool {
        cells
            .iter()
            .any(|&(dx, dy)| self.is_blocked(px + dx, py + dy))
    }

    /// Check if any cell of a layout lands on an occupied in-bounds square.
    /// Wall and floor overlaps do not count.
    pub fn overlaps_stack(&self, cells: &[(i32, i32)], px: i32, py: i32) -> bool {
        cells.iter().any(|&(dx, dy)| {
            self.get(px + dx, py + dy)
                .is_some_and(|cell| cell != EMPTY_CELL)
        })
    }

    /// Write a piece into the grid. Cells outside the grid are dropped.
    pub fn lock_cells(&mut self, positions: &[(i32, i32)], value: u8) {
        for &(x, y) in positions {
            self.set(x, y, value);
        }
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        let start = y * self.width;
        self.cells[start..start + self.width]
            .iter()
            .all(|&cell| cell != EMPTY_CELL)
    }

    /// Clear full rows scanning bottom to top and return the number cleared.
    ///
    /// Each cleared row pulls everything above it down by one and the same
    /// index is checked again, so a row that slides into place is examined
    /// exactly once.
    pub fn clear_lines(&mut self) -> usize {
        let mut cleared = 0;
        let mut y = 0;
        while y < self.height {
            if self.is_row_full(y) {
                self.collapse_row(y);
                cleared += 1;
            } else {
                y += 1;
            }
        }
        cleared
    }

    /// Remove row `y`, shift the rows above down, empty the top row
    fn collapse_row(&mut self, y: usize) {
        let w = self.width;
        let start = y * w;
        self.cells.copy_within(start + w.., start);
        let top = (self.height - 1) * w;
        self.cells[top..].fill(EMPTY_CELL);
    }

    /// Push the stack up by `holes.len()` rows and fill the bottom rows with
    /// garbage, one row per hole column. `holes[0]` becomes the bottom row.
    ///
    /// Rows pushed past the top are discarded.
    pub fn push_garbage_rows(&mut self, holes: &[usize]) {
        let count = holes.len().min(self.height);
        if count == 0 {
            return;
        }
        let w = self.width;
        let kept = (self.height - count) * w;
        self.cells.copy_within(0..kept, count * w);
        for (row, &hole) in holes.iter().take(count).enumerate() {
            for x in 0..w {
                self.cells[row * w + x] = if x == hole { EMPTY_CELL } else { GARBAGE_CELL };
            }
        }
    }

    /// Check if the board is completely empty
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&cell| cell == EMPTY_CELL)
    }

    /// Get one row (bottom row is 0)
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.width;
        &self.cells[start..start + self.width]
    }

    /// Raw cell values, row-major from the bottom row
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }
}
