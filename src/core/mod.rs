//! Core engine types: token ids, positions, RNG, configuration, errors.
//!
//! This module holds the building blocks every other module leans on.
//! Nothing here knows about matching or cascades.

pub mod entity;
pub mod position;
pub mod rng;
pub mod config;
pub mod error;

pub use entity::{TokenId, TokenIdAllocator};
pub use position::{adjacent, Position};
pub use rng::{GameRng, GameRngState};
pub use config::{EngineConfig, ResolutionMode, ScoreTable, SpecialRules};
pub use error::{EngineError, IllegalState, InvalidOperation};
