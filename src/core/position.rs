//! Grid coordinates and orthogonal adjacency.
//!
//! Coordinates are signed so that collaborators can hand in whatever their
//! input layer produced (including negative or oversized values); bounds are
//! checked by the grid, never assumed.

use serde::{Deserialize, Serialize};

/// A (row, column) cell coordinate. Row 0 is the top of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Manhattan distance between two cells.
    #[must_use]
    pub const fn manhattan(self, other: Position) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// True iff `self` and `other` are orthogonal neighbours.
    ///
    /// ```
    /// use rust_match3::core::Position;
    ///
    /// let p = Position::new(3, 3);
    /// assert!(p.is_adjacent(Position::new(3, 4)));
    /// assert!(p.is_adjacent(Position::new(2, 3)));
    /// assert!(!p.is_adjacent(Position::new(4, 4))); // diagonal
    /// assert!(!p.is_adjacent(Position::new(3, 5))); // two apart
    /// assert!(!p.is_adjacent(p));
    /// ```
    #[must_use]
    pub const fn is_adjacent(self, other: Position) -> bool {
        self.manhattan(other) == 1
    }

    /// The cell `delta_row` rows down and `delta_col` columns right.
    #[must_use]
    pub const fn offset(self, delta_row: i32, delta_col: i32) -> Self {
        Self {
            row: self.row + delta_row,
            col: self.col + delta_col,
        }
    }
}

impl From<(i32, i32)> for Position {
    fn from((row, col): (i32, i32)) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Free-function form of [`Position::is_adjacent`].
#[must_use]
pub const fn adjacent(a: Position, b: Position) -> bool {
    a.is_adjacent(b)
}
