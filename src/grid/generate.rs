//! Board generation: random fills, refill tokens and match scrubbing.
//!
//! All randomness goes through the [`TokenFactory`], which owns both the
//! session RNG and the id allocator. A fresh grid is filled at random, then
//! scrubbed until it holds no run of three.

use log::{trace, warn};

use crate::core::{GameRng, GameRngState, Position, TokenIdAllocator};
use crate::matching::find_all_matches;

use super::board::Grid;
use super::token::{ColorId, Token};

/// Source of new tokens: fresh ids and random colours.
#[derive(Clone, Debug)]
pub struct TokenFactory {
    rng: GameRng,
    ids: TokenIdAllocator,
    color_count: u8,
}

impl TokenFactory {
    /// Create a factory with a fresh RNG and an allocator starting at 0.
    #[must_use]
    pub fn new(seed: u64, color_count: u8) -> Self {
        Self::from_parts(GameRng::new(seed), TokenIdAllocator::new(), color_count)
    }

    /// Reassemble a factory from saved parts.
    #[must_use]
    pub fn from_parts(rng: GameRng, ids: TokenIdAllocator, color_count: u8) -> Self {
        Self {
            rng,
            ids,
            color_count,
        }
    }

    /// Palette size.
    #[must_use]
    pub fn color_count(&self) -> u8 {
        self.color_count
    }

    /// Spawn a token with a new id and a random colour at `pos`.
    pub fn spawn(&mut self, pos: Position) -> Token {
        let color = ColorId(self.rng.gen_color(self.color_count));
        Token::new(self.ids.alloc(), color, pos)
    }

    /// Give `token` a random colour different from its current one.
    pub fn recolor(&mut self, token: &mut Token) {
        token.color = ColorId(self.rng.gen_other_color(token.color.raw(), self.color_count));
    }

    /// Id allocator, for building grids by hand.
    pub fn ids_mut(&mut self) -> &mut TokenIdAllocator {
        &mut self.ids
    }

    /// Id allocator state.
    #[must_use]
    pub fn ids(&self) -> &TokenIdAllocator {
        &self.ids
    }

    /// RNG state for snapshots.
    #[must_use]
    pub fn rng_state(&self) -> GameRngState {
        self.rng.state()
    }
}

/// Fill a `dimension`² grid at random and scrub it of matches.
///
/// ```
/// use rust_match3::grid::{create_grid, TokenFactory};
/// use rust_match3::matching::find_all_matches;
///
/// let mut factory = TokenFactory::new(42, 5);
/// let grid = create_grid(8, &mut factory, 64);
///
/// assert!(grid.is_full());
/// assert!(find_all_matches(&grid).is_empty());
/// ```
pub fn create_grid(dimension: usize, factory: &mut TokenFactory, max_scrub_passes: usize) -> Grid {
    let mut grid = Grid::empty(dimension);
    grid.fill_empty(|pos| factory.spawn(pos));
    scrub(&mut grid, factory, max_scrub_passes);
    grid
}

/// Recolour every matched cell until the grid is stable. Returns the number
/// of passes that found something to recolour.
///
/// After `max_passes` the remaining runs are broken deterministically with
/// [`break_runs`].
pub fn scrub(grid: &mut Grid, factory: &mut TokenFactory, max_passes: usize) -> usize {
    for pass in 0..max_passes {
        let matches = find_all_matches(grid);
        if matches.is_empty() {
            trace!("scrub settled after {} passes", pass);
            return pass;
        }
        for &pos in matches.positions() {
            if let Some(token) = grid.token_at_mut(pos) {
                factory.recolor(token);
            }
        }
    }

    if !find_all_matches(grid).is_empty() {
        let fixed = break_runs(grid, factory.color_count());
        warn!(
            "scrub hit the {} pass cap; recoloured {} cells deterministically",
            max_passes, fixed
        );
    }
    max_passes
}

/// Deterministically remove every run of three, row-major.
///
/// Each cell that equals both cells to its left, or both cells above it,
/// takes the first palette colour that equals neither pair. Needs at least
/// three colours. Returns the number of cells recoloured.
pub fn break_runs(grid: &mut Grid, color_count: u8) -> usize {
    let cells: Vec<Position> = grid.positions().collect();
    let mut fixed = 0;
    for pos in cells {
        let Some(current) = grid.color_at(pos) else {
            continue;
        };
        let pair = |a: Position, b: Position| match (grid.color_at(a), grid.color_at(b)) {
            (Some(x), Some(y)) if x == y => Some(x),
            _ => None,
        };
        let left = pair(pos.offset(0, -1), pos.offset(0, -2));
        let above = pair(pos.offset(-1, 0), pos.offset(-2, 0));
        if left != Some(current) && above != Some(current) {
            continue;
        }

        let replacement = (0..color_count)
            .map(ColorId)
            .find(|&c| left != Some(c) && above != Some(c));
        if let (Some(color), Some(token)) = (replacement, grid.token_at_mut(pos)) {
            token.color = color;
            fixed += 1;
        }
    }
    fixed
}
