//! Per-step cascade reports.

use serde::{Deserialize, Serialize};

use crate::core::{Position, TokenId};
use crate::grid::{ColorId, SpecialKind, Token};
use crate::matching::{Axis, Run};

/// Callout tier for a cascade level.
///
/// ```
/// use rust_match3::events::CascadeTier;
///
/// assert_eq!(CascadeTier::from_level(0), CascadeTier::None);
/// assert_eq!(CascadeTier::from_level(2).label(), Some("GREAT"));
/// assert_eq!(CascadeTier::from_level(9), CascadeTier::Unstoppable);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CascadeTier {
    #[default]
    None,
    Nice,
    Great,
    Frenzy,
    Unstoppable,
}

impl CascadeTier {
    #[must_use]
    pub const fn from_level(level: u32) -> Self {
        match level {
            0 => CascadeTier::None,
            1 => CascadeTier::Nice,
            2 => CascadeTier::Great,
            3 => CascadeTier::Frenzy,
            _ => CascadeTier::Unstoppable,
        }
    }

    /// Text shown to the player, if any.
    #[must_use]
    pub const fn label(self) -> Option<&'static str> {
        match self {
            CascadeTier::None => None,
            CascadeTier::Nice => Some("NICE"),
            CascadeTier::Great => Some("GREAT"),
            CascadeTier::Frenzy => Some("FRENZY"),
            CascadeTier::Unstoppable => Some("UNSTOPPABLE"),
        }
    }
}

/// Shape of one cleared run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunShape {
    pub axis: Axis,
    pub color: ColorId,
    pub length: usize,
    pub positions: Vec<Position>,
}

impl From<&Run> for RunShape {
    fn from(run: &Run) -> Self {
        Self {
            axis: run.axis,
            color: run.color,
            length: run.len(),
            positions: run.positions.to_vec(),
        }
    }
}

/// A special kind handed to one token of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialAward {
    pub token: TokenId,
    pub position: Position,
    pub kind: SpecialKind,
}

/// A surviving token dropped by gravity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMove {
    pub token: TokenId,
    pub from: Position,
    pub to: Position,
}

/// Everything one cascade step did, in the order a collaborator should
/// animate it: specials, clear, fall, spawn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepEvent {
    /// 0 for the player's own match, then 1, 2, ...
    pub step_index: usize,

    /// Level the step was scored at.
    pub cascade_level: u32,

    /// Level after this step.
    pub next_level: u32,

    /// Callout for `next_level`.
    pub tier: CascadeTier,

    /// Distinct tokens cleared.
    pub matched_count: usize,

    pub runs: Vec<RunShape>,
    pub specials: Vec<SpecialAward>,
    pub score_delta: u64,

    /// Cleared tokens as they were when removed, `matched` flag set.
    pub cleared: Vec<Token>,

    pub moved: Vec<TokenMove>,
    pub spawned: Vec<Token>,
}

/// Totals for one resolved swap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeSummary {
    /// Cascade steps run.
    pub steps: usize,
    /// Points awarded across all steps.
    pub score: u64,
    /// Highest level reached.
    pub peak_level: u32,
    /// True if the step cap stopped the cascade.
    pub capped: bool,
}
