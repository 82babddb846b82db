//! The square token grid.
//!
//! Cells are stored row-major in an `im::Vector`, so cloning a grid for a
//! collaborator (or for a hypothetical swap) is O(1) and copy-on-write.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::{EngineError, InvalidOperation, Position, TokenId, TokenIdAllocator};

use super::token::{ColorId, Token};

/// Square matrix of optional tokens. Row 0 is the top.
///
/// Between cascade steps every cell is filled; cells are only empty between
/// a clear and the gravity pass that follows it.
///
/// ```
/// use rust_match3::core::{Position, TokenIdAllocator};
/// use rust_match3::grid::Grid;
///
/// let mut ids = TokenIdAllocator::new();
/// let grid = Grid::from_colors(&[[0u8, 1, 2], [1, 2, 0], [2, 0, 1]], &mut ids).unwrap();
///
/// assert_eq!(grid.dimension(), 3);
/// assert_eq!(grid.color_at(Position::new(1, 2)).map(|c| c.raw()), Some(0));
/// assert!(grid.token_at(Position::new(3, 0)).is_none());
/// assert!(grid.token_at(Position::new(-1, 0)).is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    dimension: usize,
    cells: Vector<Option<Token>>,
}

impl Grid {
    /// Create a grid with every cell empty.
    #[must_use]
    pub fn empty(dimension: usize) -> Self {
        Self {
            dimension,
            cells: (0..dimension * dimension).map(|_| None).collect(),
        }
    }

    /// Build a grid from explicit colour rows, allocating fresh ids row-major.
    ///
    /// Rows must form a non-empty square.
    pub fn from_colors<R: AsRef<[u8]>>(
        rows: &[R],
        ids: &mut TokenIdAllocator,
    ) -> Result<Self, EngineError> {
        let dimension = rows.len();
        if dimension == 0 {
            return Err(EngineError::InvalidConfig("grid needs at least one row".into()));
        }
        if let Some((r, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.as_ref().len() != dimension)
        {
            return Err(EngineError::InvalidConfig(format!(
                "row {} has {} cells, expected {}",
                r,
                row.as_ref().len(),
                dimension
            )));
        }

        let mut grid = Self::empty(dimension);
        for (r, row) in rows.iter().enumerate() {
            for (c, &color) in row.as_ref().iter().enumerate() {
                let pos = Position::new(r as i32, c as i32);
                let token = Token::new(ids.alloc(), ColorId(color), pos);
                grid.cells.set(r * dimension + c, Some(token));
            }
        }
        Ok(grid)
    }

    /// Side length.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// True iff `pos` lies inside the grid.
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        self.index(pos).is_some()
    }

    fn index(&self, pos: Position) -> Option<usize> {
        let row = usize::try_from(pos.row).ok()?;
        let col = usize::try_from(pos.col).ok()?;
        (row < self.dimension && col < self.dimension).then_some(row * self.dimension + col)
    }

    fn check_bounds(&self, pos: Position) -> Result<usize, InvalidOperation> {
        self.index(pos).ok_or(InvalidOperation::OutOfBounds(pos))
    }

    /// Token at `pos`; `None` when out of bounds or empty.
    #[must_use]
    pub fn token_at(&self, pos: Position) -> Option<&Token> {
        self.index(pos)
            .and_then(|i| self.cells.get(i))
            .and_then(Option::as_ref)
    }

    /// Mutable token at `pos`.
    pub fn token_at_mut(&mut self, pos: Position) -> Option<&mut Token> {
        let i = self.index(pos)?;
        self.cells.get_mut(i)?.as_mut()
    }

    /// Colour at `pos`.
    #[must_use]
    pub fn color_at(&self, pos: Position) -> Option<ColorId> {
        self.token_at(pos).map(|t| t.color)
    }

    /// Token with the given id, if it is on the grid.
    #[must_use]
    pub fn find(&self, id: TokenId) -> Option<&Token> {
        self.cells.iter().flatten().find(|t| t.id == id)
    }

    /// Put `token` at `pos`, rewriting its position. Returns the previous
    /// occupant.
    pub fn place(
        &mut self,
        pos: Position,
        mut token: Token,
    ) -> Result<Option<Token>, InvalidOperation> {
        let i = self.check_bounds(pos)?;
        token.position = pos;
        Ok(self.cells.set(i, Some(token)))
    }

    /// Fill every empty cell, row-major, with `spawn(pos)`. Returns the
    /// number of cells filled.
    pub fn fill_empty(&mut self, mut spawn: impl FnMut(Position) -> Token) -> usize {
        let dimension = self.dimension;
        let mut filled = 0;
        for (i, cell) in self.cells.iter_mut().enumerate() {
            if cell.is_none() {
                let pos = Position::new((i / dimension) as i32, (i % dimension) as i32);
                let mut token = spawn(pos);
                token.position = pos;
                *cell = Some(token);
                filled += 1;
            }
        }
        filled
    }

    /// Remove and return the token at `pos`.
    pub fn take(&mut self, pos: Position) -> Option<Token> {
        let i = self.index(pos)?;
        self.cells.set(i, None)
    }

    /// Exchange the tokens at `a` and `b`. Ids travel with their tokens.
    pub fn swap_tokens(&mut self, a: Position, b: Position) -> Result<(), InvalidOperation> {
        let (ia, ib) = self.occupied_pair(a, b)?;
        self.cells.swap(ia, ib);
        for (i, pos) in [(ia, a), (ib, b)] {
            if let Some(Some(token)) = self.cells.get_mut(i) {
                token.position = pos;
            }
        }
        Ok(())
    }

    /// Exchange only the colours at `a` and `b`; tokens stay put.
    pub fn swap_colors(&mut self, a: Position, b: Position) -> Result<(), InvalidOperation> {
        let (ia, ib) = self.occupied_pair(a, b)?;
        let color_a = self.cells[ia].map(|t| t.color);
        let color_b = self.cells[ib].map(|t| t.color);
        if let (Some(ca), Some(cb)) = (color_a, color_b) {
            if let Some(Some(token)) = self.cells.get_mut(ia) {
                token.color = cb;
            }
            if let Some(Some(token)) = self.cells.get_mut(ib) {
                token.color = ca;
            }
        }
        Ok(())
    }

    fn occupied_pair(&self, a: Position, b: Position) -> Result<(usize, usize), InvalidOperation> {
        let ia = self.check_bounds(a)?;
        let ib = self.check_bounds(b)?;
        if self.cells[ia].is_none() {
            return Err(InvalidOperation::EmptyCell(a));
        }
        if self.cells[ib].is_none() {
            return Err(InvalidOperation::EmptyCell(b));
        }
        Ok((ia, ib))
    }

    /// Every cell position, row-major.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let d = self.dimension as i32;
        (0..d).flat_map(move |r| (0..d).map(move |c| Position::new(r, c)))
    }

    /// Every token, row-major.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.cells.iter().flatten()
    }

    /// Apply `f` to every token on the grid.
    pub fn for_each_token_mut(&mut self, mut f: impl FnMut(&mut Token)) {
        for token in self.cells.iter_mut().flatten() {
            f(token);
        }
    }

    /// Colours row-major, `None` for empty cells.
    #[must_use]
    pub fn colors(&self) -> Vec<Option<ColorId>> {
        self.cells.iter().map(|cell| cell.map(|t| t.color)).collect()
    }

    /// True iff no cell is empty.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, cell) in self.cells.iter().enumerate() {
            match cell {
                Some(token) => write!(f, "{}", token.color)?,
                None => write!(f, ".")?,
            }
            if (i + 1) % self.dimension == 0 {
                writeln!(f)?;
            } else {
                write!(f, " ")?;
            }
        }
        Ok(())
    }
}
