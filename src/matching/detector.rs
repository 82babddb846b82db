//! Run detection.
//!
//! [`find_run_at`] looks along the row first and only falls back to the
//! column when the row has no run; [`find_all_matches`] seeds it from every
//! unvisited cell in row-major order, so results are fully determined by the
//! grid.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Position, TokenId};
use crate::grid::{ColorId, Grid};

/// Minimum run length that counts as a match.
pub const MIN_RUN: usize = 3;

/// Direction of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Row,
    Column,
}

impl Axis {
    fn step(self) -> (i32, i32) {
        match self {
            Axis::Row => (0, 1),
            Axis::Column => (1, 0),
        }
    }
}

/// A maximal contiguous same-colour segment along one axis.
///
/// Positions are ordered left to right, or top to bottom.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub axis: Axis,
    pub color: ColorId,
    pub positions: SmallVec<[Position; 8]>,
}

impl Run {
    /// Number of cells in the run.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// True iff the run is long enough to clear.
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.len() >= MIN_RUN
    }

    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        self.positions.contains(&pos)
    }

    /// Middle cell (the later one for even lengths).
    #[must_use]
    pub fn middle(&self) -> Option<Position> {
        self.positions.get(self.positions.len() / 2).copied()
    }

    /// Cell shared with `other`, if the two runs cross.
    #[must_use]
    pub fn intersection(&self, other: &Run) -> Option<Position> {
        self.positions.iter().copied().find(|p| other.contains(*p))
    }
}

/// Maximal segment through `pos` along `axis`, whatever its length.
///
/// `None` when `pos` is out of bounds or empty.
#[must_use]
pub fn run_along(grid: &Grid, pos: Position, axis: Axis) -> Option<Run> {
    let color = grid.color_at(pos)?;
    let (dr, dc) = axis.step();

    let mut start = pos;
    while grid.color_at(start.offset(-dr, -dc)) == Some(color) {
        start = start.offset(-dr, -dc);
    }

    let mut positions = SmallVec::new();
    let mut cursor = start;
    while grid.color_at(cursor) == Some(color) {
        positions.push(cursor);
        cursor = cursor.offset(dr, dc);
    }

    Some(Run {
        axis,
        color,
        positions,
    })
}

/// The run of three or more that `pos` heads, horizontal first.
///
/// ```
/// use rust_match3::core::{Position, TokenIdAllocator};
/// use rust_match3::grid::Grid;
/// use rust_match3::matching::{find_run_at, Axis};
///
/// let mut ids = TokenIdAllocator::new();
/// let grid = Grid::from_colors(
///     &[[0u8, 0, 0, 1], [1, 2, 3, 1], [2, 3, 4, 1], [3, 4, 0, 2]],
///     &mut ids,
/// ).unwrap();
///
/// let row = find_run_at(&grid, Position::new(0, 1)).unwrap();
/// assert_eq!(row.axis, Axis::Row);
/// assert_eq!(row.len(), 3);
///
/// // (0, 3) has no row run, so its column is used.
/// let col = find_run_at(&grid, Position::new(0, 3)).unwrap();
/// assert_eq!(col.axis, Axis::Column);
///
/// assert!(find_run_at(&grid, Position::new(1, 1)).is_none());
/// ```
#[must_use]
pub fn find_run_at(grid: &Grid, pos: Position) -> Option<Run> {
    [Axis::Row, Axis::Column]
        .into_iter()
        .filter_map(|axis| run_along(grid, pos, axis))
        .find(Run::is_match)
}

/// Every token currently in a run, deduplicated by identity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchSet {
    runs: Vec<Run>,
    positions: Vec<Position>,
    tokens: Vec<TokenId>,
}

impl MatchSet {
    /// True iff nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of distinct matched tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Runs in discovery order.
    #[must_use]
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Matched cells in discovery order, each once.
    #[must_use]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Matched token ids, parallel to `positions()`.
    #[must_use]
    pub fn tokens(&self) -> &[TokenId] {
        &self.tokens
    }

    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        self.positions.contains(&pos)
    }
}

/// Scan the grid row-major and collect every run of three or more.
pub fn find_all_matches(grid: &Grid) -> MatchSet {
    let dimension = grid.dimension();
    let index = |p: Position| p.row as usize * dimension + p.col as usize;

    let mut visited = vec![false; dimension * dimension];
    let mut seen: FxHashSet<TokenId> = FxHashSet::default();
    let mut set = MatchSet::default();

    for pos in grid.positions() {
        if visited[index(pos)] {
            continue;
        }
        let Some(run) = find_run_at(grid, pos) else {
            visited[index(pos)] = true;
            continue;
        };
        for &cell in &run.positions {
            visited[index(cell)] = true;
            if let Some(token) = grid.token_at(cell) {
                if seen.insert(token.id) {
                    set.positions.push(cell);
                    set.tokens.push(token.id);
                }
            }
        }
        set.runs.push(run);
    }

    set
}
