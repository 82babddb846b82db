//! Swap validation.
//!
//! `would_match` answers "would this swap clear anything?" on a hypothetical
//! copy of the grid. The real grid is never touched.

use crate::core::{EngineError, InvalidOperation, Position};
use crate::grid::Grid;

use super::detector::find_run_at;

/// Check that `a` and `b` are in bounds, adjacent and both occupied.
pub fn validate_swap(grid: &Grid, a: Position, b: Position) -> Result<(), InvalidOperation> {
    for pos in [a, b] {
        if !grid.contains(pos) {
            return Err(InvalidOperation::OutOfBounds(pos));
        }
    }
    if !a.is_adjacent(b) {
        return Err(InvalidOperation::NotAdjacent(a, b));
    }
    for pos in [a, b] {
        if grid.token_at(pos).is_none() {
            return Err(InvalidOperation::EmptyCell(pos));
        }
    }
    Ok(())
}

/// True iff exchanging the colours at `a` and `b` puts either cell in a run.
///
/// ```
/// use rust_match3::core::{Position, TokenIdAllocator};
/// use rust_match3::grid::Grid;
/// use rust_match3::matching::would_match;
///
/// let mut ids = TokenIdAllocator::new();
/// let grid = Grid::from_colors(
///     &[[0u8, 0, 1, 0], [1, 2, 3, 4], [2, 3, 4, 1], [3, 4, 0, 2]],
///     &mut ids,
/// ).unwrap();
///
/// assert!(would_match(&grid, Position::new(0, 2), Position::new(0, 3)).unwrap());
/// assert!(!would_match(&grid, Position::new(1, 0), Position::new(1, 1)).unwrap());
/// assert!(would_match(&grid, Position::new(0, 0), Position::new(1, 1)).is_err());
/// ```
pub fn would_match(grid: &Grid, a: Position, b: Position) -> Result<bool, EngineError> {
    validate_swap(grid, a, b)?;
    let mut hypothetical = grid.clone();
    hypothetical.swap_colors(a, b)?;
    Ok(find_run_at(&hypothetical, a).is_some() || find_run_at(&hypothetical, b).is_some())
}

/// Every adjacent swap that would match, row-major, right neighbour before
/// down neighbour.
#[must_use]
pub fn legal_swaps(grid: &Grid) -> Vec<(Position, Position)> {
    let mut swaps = Vec::new();
    for pos in grid.positions() {
        for neighbour in [pos.offset(0, 1), pos.offset(1, 0)] {
            if matches!(would_match(grid, pos, neighbour), Ok(true)) {
                swaps.push((pos, neighbour));
            }
        }
    }
    swaps
}
