//! Grid model: tokens, the board that holds them, and board generation.
//!
//! ## Key Types
//!
//! - `Token`: A coloured piece with a stable `TokenId` and presentation flags
//! - `Grid`: Square, row-major board backed by a persistent vector
//! - `TokenFactory`: Fresh ids and random colours for fills and refills
//!
//! ## Invariants
//!
//! Outside of an in-flight cascade every cell holds a token and no run of
//! three same-coloured tokens exists.

mod board;
mod generate;
mod token;

pub use board::Grid;
pub use generate::{break_runs, create_grid, scrub, TokenFactory};
pub use token::{ColorId, SpecialKind, Token, TokenFlags};
