//! Tokens: the coloured pieces that live in grid cells.

use serde::{Deserialize, Serialize};

use crate::core::{Position, TokenId};

/// Palette index of a token's colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColorId(pub u8);

impl ColorId {
    /// Get the raw palette index.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl From<u8> for ColorId {
    fn from(color: u8) -> Self {
        Self(color)
    }
}

impl std::fmt::Display for ColorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Special marking awarded by match geometry. Cosmetic: the engine reports
/// it and renders nothing from it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialKind {
    #[default]
    None,
    StripedRow,
    StripedColumn,
    Wrapped,
    Bomb,
}

impl SpecialKind {
    /// True for every kind except `None`.
    #[must_use]
    pub const fn is_special(self) -> bool {
        !matches!(self, SpecialKind::None)
    }
}

/// Transient presentation flags. The engine sets them; collaborators
/// decide what they look like.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenFlags {
    /// Currently selected by the player.
    pub selected: bool,
    /// Cleared by the latest cascade step.
    pub matched: bool,
    /// Part of a committed swap whose first step has not run yet.
    pub swapping: bool,
    /// Moved or spawned by the latest gravity pass.
    pub falling: bool,
}

/// A single token on the grid.
///
/// `id` never changes; `position` always mirrors the cell holding the token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub color: ColorId,
    pub position: Position,
    pub flags: TokenFlags,
    pub special: SpecialKind,
}

impl Token {
    /// Create an unflagged token.
    #[must_use]
    pub fn new(id: TokenId, color: ColorId, position: Position) -> Self {
        Self {
            id,
            color,
            position,
            flags: TokenFlags::default(),
            special: SpecialKind::None,
        }
    }

    /// Set the special kind (builder pattern).
    #[must_use]
    pub fn with_special(mut self, special: SpecialKind) -> Self {
        self.special = special;
        self
    }
}
