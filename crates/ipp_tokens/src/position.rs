//! Locations within a source file

use derive_more::Display;

/// A row and column within a source, both starting at 1.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Display)]
#[display(fmt = "({}, {})", row, col)]
pub struct Position {
    row: usize,
    col: usize,
}

impl Position {
    /// Creates a new position.
    ///
    /// # Panics
    /// Panics if either `row` or `col` is zero.
    pub fn new(row: usize, col: usize) -> Self {
        assert!(row >= 1 && col >= 1, "positions are 1-based");
        Self { row, col }
    }

    /// The row of this position
    pub fn row(&self) -> usize {
        self.row
    }

    /// The column of this position
    pub fn col(&self) -> usize {
        self.col
    }

    /// Moves the column forward by `by` characters
    pub fn advance(&mut self, by: usize) {
        self.col += by;
    }

    /// Moves to the start of the next row
    pub fn next_row(&mut self) {
        self.row += 1;
        self.col = 1;
    }
}

impl Default for Position {
    fn default() -> Self {
        Self { row: 1, col: 1 }
    }
}
