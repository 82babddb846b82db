//! # rust-match3
//!
//! Rules engine for an 8×8 tile-matching puzzle: match detection, swap
//! validation, cascade resolution and scoring, behind a small session state
//! machine.
//!
//! ## Design Principles
//!
//! 1. **Caller-Owned State**: A `Session` owns its grid, RNG and clock.
//!    There are no globals, so any number of sessions can run side by side.
//!
//! 2. **Synchronous Resolution**: A swap resolves to completion (or one step
//!    at a time, on request) and reports what happened as ordered events.
//!    Presentation pacing is the host's business.
//!
//! 3. **Rejected Means Unchanged**: Every command returns a `Result`; an
//!    `Err` leaves the grid and session exactly as they were.
//!
//! ## Architecture
//!
//! - **Persistent Grid**: Cells live in an `im::Vector`, so grid snapshots
//!   handed to collaborators are O(1) copy-on-write clones.
//!
//! - **Deterministic**: All randomness flows through one seeded ChaCha8
//!   stream whose position is saved with the session.
//!
//! ## Modules
//!
//! - `core`: Token ids, positions, RNG, configuration, errors
//! - `grid`: Tokens, the grid, board generation
//! - `matching`: Run detection and swap validation
//! - `resolve`: The cascade loop, scoring, specials, gravity
//! - `events`: Step and session notifications
//! - `session`: The game state machine and persistence

pub mod core;
pub mod grid;
pub mod matching;
pub mod resolve;
pub mod events;
pub mod session;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use crate::core::{
    adjacent, EngineConfig, EngineError, GameRng, GameRngState, IllegalState, InvalidOperation,
    Position, ResolutionMode, ScoreTable, SpecialRules, TokenId, TokenIdAllocator,
};

pub use crate::grid::{create_grid, ColorId, Grid, SpecialKind, Token, TokenFactory, TokenFlags};

pub use crate::matching::{
    find_all_matches, find_run_at, legal_swaps, would_match, Axis, MatchSet, Run,
};

pub use crate::resolve::{resolve_swap, Cascade, Resolution, ResolutionStatus, SwapAttempt};

pub use crate::events::{
    CascadeSummary, CascadeTier, EndReason, EventLog, RunShape, SessionEvent, SpecialAward,
    StepEvent, TokenMove,
};

pub use crate::session::{SelectOutcome, Session, SessionPhase, SessionSnapshot, SwapOutcome};
