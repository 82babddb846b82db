//! Swap resolution: the cascade loop and everything it scores.
//!
//! A swap resolves in two phases:
//! - **Begin** ([`Cascade::begin`]): swap on the real grid; keep it if either
//!   swapped cell heads a run, otherwise swap back
//! - **Cascade** ([`Cascade::step`]): find matches, award specials, score,
//!   clear, drop and refill, repeat until the grid is stable
//!
//! Hosts either run the loop in one go ([`Cascade::run_to_completion`]) or
//! pace it one step per call, replaying the [`StepEvent`]s for animation.
//!
//! ## Example Usage
//!
//! ```
//! use rust_match3::core::{EngineConfig, Position};
//! use rust_match3::grid::{Grid, TokenFactory};
//! use rust_match3::matching::find_all_matches;
//! use rust_match3::resolve::resolve_swap;
//!
//! let config = EngineConfig::default().with_dimension(5);
//! let mut factory = TokenFactory::new(3, 5);
//! let grid = Grid::from_colors(
//!     &[
//!         [0u8, 0, 1, 2, 3],
//!         [1, 2, 0, 3, 4],
//!         [2, 3, 4, 0, 1],
//!         [3, 4, 2, 1, 0],
//!         [4, 0, 1, 2, 3],
//!     ],
//!     factory.ids_mut(),
//! ).unwrap();
//!
//! let (a, b) = (Position::new(0, 2), Position::new(1, 2));
//! let resolution = resolve_swap(&grid, a, b, &mut factory, &config).unwrap();
//!
//! assert!(resolution.committed);
//! assert_eq!(resolution.steps[0].score_delta, 30);
//! assert!(find_all_matches(&resolution.grid).is_empty());
//! // The input grid is untouched.
//! assert_eq!(grid.color_at(Position::new(0, 2)).map(|c| c.raw()), Some(1));
//! ```

mod gravity;
mod pipeline;
mod scoring;
mod special;

pub use gravity::{apply_gravity, GravityReport};
pub use pipeline::{Cascade, SwapAttempt};
pub use scoring::{score_step, StepScore};
pub use special::classify_specials;

use serde::{Deserialize, Serialize};

use crate::core::{EngineConfig, EngineError, Position};
use crate::events::{CascadeSummary, StepEvent};
use crate::grid::{Grid, TokenFactory};

/// Status returned by stepping a cascade.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionStatus {
    /// One step ran; call again.
    Processing(StepEvent),

    /// Nothing left to match; the grid is stable.
    Complete(CascadeSummary),
}

/// Outcome of [`resolve_swap`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// Grid after the swap and every cascade step (or the input grid, if
    /// the swap reverted).
    pub grid: Grid,
    /// Whether the swap matched and stood.
    pub committed: bool,
    /// Points awarded by the whole cascade.
    pub score_delta: u64,
    /// Step events in order.
    pub steps: Vec<StepEvent>,
    /// Totals; default for a reverted swap.
    pub summary: CascadeSummary,
}

/// Resolve a swap from start to finish without a session.
///
/// Works on a copy of `grid`; only `factory` (ids and RNG) advances.
/// The factory needs a palette of at least three colours, or capped
/// cascades could not be made stable.
pub fn resolve_swap(
    grid: &Grid,
    a: Position,
    b: Position,
    factory: &mut TokenFactory,
    config: &EngineConfig,
) -> Result<Resolution, EngineError> {
    if factory.color_count() < 3 {
        return Err(EngineError::InvalidConfig(format!(
            "token factory needs at least 3 colours, has {}",
            factory.color_count()
        )));
    }
    let mut working = grid.clone();
    match Cascade::begin(&mut working, a, b)? {
        SwapAttempt::Reverted => Ok(Resolution {
            grid: working,
            committed: false,
            score_delta: 0,
            steps: Vec::new(),
            summary: CascadeSummary::default(),
        }),
        SwapAttempt::Committed(mut cascade) => {
            let (steps, summary) = cascade.run_to_completion(&mut working, factory, config);
            Ok(Resolution {
                grid: working,
                committed: true,
                score_delta: summary.score,
                steps,
                summary,
            })
        }
    }
}
