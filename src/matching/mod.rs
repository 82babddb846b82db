//! Match detection and swap validation.
//!
//! ## Detection
//!
//! - [`find_run_at`]: the run a single cell heads (row first, then column)
//! - [`find_all_matches`]: every matched token on the grid, row-major,
//!   deduplicated by token id, with the runs that produced them
//!
//! ## Validation
//!
//! - [`validate_swap`]: bounds, adjacency and occupancy checks
//! - [`would_match`]: pure "does this swap clear anything" predicate
//! - [`legal_swaps`]: every matching swap, for hints

mod detector;
mod validator;

pub use detector::{find_all_matches, find_run_at, run_along, Axis, MatchSet, Run, MIN_RUN};
pub use validator::{legal_swaps, validate_swap, would_match};
