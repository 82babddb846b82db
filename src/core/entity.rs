//! Token identification.
//!
//! Every token placed on the grid carries a `TokenId` that stays with it
//! while it swaps and falls. Cleared tokens are gone for good: their ids are
//! never handed out again, not even after a restart.
//!
//! ## Usage
//!
//! ```
//! use rust_match3::core::{TokenId, TokenIdAllocator};
//!
//! let mut ids = TokenIdAllocator::new();
//! let a = ids.alloc();
//! let b = ids.alloc();
//!
//! assert_ne!(a, b);
//! assert!(b > a);
//! assert_eq!(ids.allocated(), 2);
//! ```

use serde::{Deserialize, Serialize};

/// Stable identity of a single token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenId(pub u64);

impl TokenId {
    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for TokenId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token({})", self.0)
    }
}

/// Monotonic source of fresh token ids.
///
/// The allocator only moves forward. Restoring from a snapshot resumes the
/// counter where it left off, so ids stay unique across save/restore.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenIdAllocator {
    next: u64,
}

impl TokenIdAllocator {
    /// Create an allocator starting at id 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume an allocator whose next id is `next`.
    #[must_use]
    pub const fn resume_at(next: u64) -> Self {
        Self { next }
    }

    /// Allocate a new, never before seen id.
    pub fn alloc(&mut self) -> TokenId {
        let id = TokenId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far (also the next raw id).
    #[must_use]
    pub const fn allocated(&self) -> u64 {
        self.next
    }
}
