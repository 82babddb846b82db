//! Deterministic random number generation for board fills and refills.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical boards and refills
//! - **Caller-owned**: Lives inside a session, never in a global
//! - **Serializable**: O(1) state capture and restore for snapshots
//!
//! ```
//! use rust_match3::core::GameRng;
//!
//! let mut a = GameRng::new(7);
//! let mut b = GameRng::new(7);
//!
//! let colors_a: Vec<u8> = (0..16).map(|_| a.gen_color(5)).collect();
//! let colors_b: Vec<u8> = (0..16).map(|_| b.gen_color(5)).collect();
//! assert_eq!(colors_a, colors_b);
//! assert!(colors_a.iter().all(|&c| c < 5));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Deterministic RNG backing every random colour the engine produces.
///
/// Uses ChaCha8 for speed while keeping a stable, seedable stream.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed this RNG was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Pick a colour index uniformly from `0..color_count`.
    pub fn gen_color(&mut self, color_count: u8) -> u8 {
        self.inner.gen_range(0..color_count)
    }

    /// Pick a colour different from `current`, uniformly among the rest of
    /// the palette. Requires `color_count >= 2`.
    pub fn gen_other_color(&mut self, current: u8, color_count: u8) -> u8 {
        let step = self.inner.gen_range(1..color_count);
        ((u16::from(current) + u16::from(step)) % u16::from(color_count)) as u8
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Serializable RNG state for snapshots.
///
/// Uses ChaCha8 word position so capture is O(1) regardless of how many
/// colours have been drawn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}
