//! Engine configuration types.
//!
//! Hosts configure the engine at session creation by providing:
//! - `ScoreTable`: Match-size and cascade multipliers
//! - `SpecialRules`: Run sizes that earn a special token
//! - `ResolutionMode`: Whether cascades run in one call or step by step
//! - `EngineConfig`: Combines all configuration
//!
//! Defaults reproduce the classic 8×8, five-colour, 60 second, 20 move game.

use serde::{Deserialize, Serialize};

use super::EngineError;

/// Multipliers applied to each cascade step, stored in tenths so scoring
/// stays in integer arithmetic.
///
/// ```
/// use rust_match3::core::ScoreTable;
///
/// let table = ScoreTable::default();
/// assert_eq!(table.size_tenths(3), 10);
/// assert_eq!(table.size_tenths(4), 15);
/// assert_eq!(table.size_tenths(12), 50);
/// assert_eq!(table.cascade_tenths(0), 10);
/// assert_eq!(table.cascade_tenths(9), 50);
///
/// // 3 tokens × 10 points × 1.0 × 1.0
/// assert_eq!(table.step_score(3, 10, 0), 30);
/// // 4 tokens × 10 points × 1.5 × 2.0
/// assert_eq!(table.step_score(4, 10, 1), 120);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTable {
    /// Multiplier for matched counts 3, 4, 5, ...; the last entry covers
    /// every larger count.
    pub size_tenths: Vec<u32>,

    /// Multiplier for cascade levels 0, 1, 2, ...; the last entry covers
    /// every higher level.
    pub cascade_tenths: Vec<u32>,
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self {
            size_tenths: vec![10, 15, 20, 30, 40, 50],
            cascade_tenths: vec![10, 20, 30, 40, 50],
        }
    }
}

impl ScoreTable {
    /// Match-size multiplier (in tenths) for `count` matched tokens.
    #[must_use]
    pub fn size_tenths(&self, count: usize) -> u32 {
        lookup_clamped(&self.size_tenths, count.saturating_sub(3))
    }

    /// Cascade multiplier (in tenths) for `level`.
    #[must_use]
    pub fn cascade_tenths(&self, level: u32) -> u32 {
        lookup_clamped(&self.cascade_tenths, level as usize)
    }

    /// Score for one cascade step, rounded down.
    #[must_use]
    pub fn step_score(&self, count: usize, base_points: u32, level: u32) -> u64 {
        let raw = count as u64
            * u64::from(base_points)
            * u64::from(self.size_tenths(count))
            * u64::from(self.cascade_tenths(level));
        raw / 100
    }
}

fn lookup_clamped(table: &[u32], index: usize) -> u32 {
    match table.get(index) {
        Some(&value) => value,
        None => table.last().copied().unwrap_or(10),
    }
}

/// Run sizes that award a special token to one representative cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialRules {
    /// Straight run length that earns a striped token.
    pub striped_min: usize,

    /// Straight run length that earns a bomb.
    pub bomb_min: usize,

    /// Combined size of two crossing runs that earns a wrapped token.
    pub wrapped_min: usize,
}

impl Default for SpecialRules {
    fn default() -> Self {
        Self {
            striped_min: 4,
            bomb_min: 5,
            wrapped_min: 5,
        }
    }
}

/// How a committed swap's cascade is driven.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionMode {
    /// The whole cascade runs inside the swap call.
    #[default]
    Immediate,
    /// The session stays locked and the host calls `advance()` per step.
    Stepped,
}

/// Complete engine configuration.
///
/// ```
/// use rust_match3::core::{EngineConfig, ResolutionMode};
///
/// let config = EngineConfig::default()
///     .with_seed(7)
///     .with_move_limit(5)
///     .with_resolution_mode(ResolutionMode::Stepped);
///
/// assert_eq!(config.dimension, 8);
/// assert_eq!(config.move_limit, 5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Side length of the square grid.
    pub dimension: usize,

    /// Number of distinct colours in the palette.
    pub color_count: u8,

    /// Points per matched token before multipliers.
    pub base_points: u32,

    /// Session length in seconds.
    pub time_limit_secs: u32,

    /// Committed swaps allowed per session.
    pub move_limit: u32,

    /// Cascade level ceiling.
    pub max_cascade_level: u32,

    /// Size and cascade multipliers.
    pub score_table: ScoreTable,

    /// Special token thresholds.
    pub special_rules: SpecialRules,

    /// Scrub passes attempted before the deterministic fix kicks in.
    pub max_scrub_passes: usize,

    /// Cascade steps allowed in one resolution before the remaining matches
    /// are recoloured away.
    pub max_cascade_steps: usize,

    /// Cascade driving mode.
    pub resolution_mode: ResolutionMode,

    /// Undrained session events kept before the oldest are dropped.
    pub event_capacity: usize,

    /// RNG seed for fills and refills.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dimension: 8,
            color_count: 5,
            base_points: 10,
            time_limit_secs: 60,
            move_limit: 20,
            max_cascade_level: 4,
            score_table: ScoreTable::default(),
            special_rules: SpecialRules::default(),
            max_scrub_passes: 64,
            max_cascade_steps: 256,
            resolution_mode: ResolutionMode::Immediate,
            event_capacity: 1024,
            seed: 42,
        }
    }
}

impl EngineConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the grid dimension.
    #[must_use]
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Set the palette size.
    #[must_use]
    pub fn with_color_count(mut self, color_count: u8) -> Self {
        self.color_count = color_count;
        self
    }

    /// Set points per matched token.
    #[must_use]
    pub fn with_base_points(mut self, base_points: u32) -> Self {
        self.base_points = base_points;
        self
    }

    /// Set the session length in seconds.
    #[must_use]
    pub fn with_time_limit(mut self, secs: u32) -> Self {
        self.time_limit_secs = secs;
        self
    }

    /// Set the move budget.
    #[must_use]
    pub fn with_move_limit(mut self, moves: u32) -> Self {
        self.move_limit = moves;
        self
    }

    /// Replace the score table.
    #[must_use]
    pub fn with_score_table(mut self, table: ScoreTable) -> Self {
        self.score_table = table;
        self
    }

    /// Set the cascade level ceiling. The cascade table needs an entry for
    /// every level up to it.
    #[must_use]
    pub fn with_max_cascade_level(mut self, level: u32) -> Self {
        self.max_cascade_level = level;
        self
    }

    /// Set how many undrained session events are kept.
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Replace the special token thresholds.
    #[must_use]
    pub fn with_special_rules(mut self, rules: SpecialRules) -> Self {
        self.special_rules = rules;
        self
    }

    /// Set the cascade step cap.
    #[must_use]
    pub fn with_max_cascade_steps(mut self, steps: usize) -> Self {
        self.max_cascade_steps = steps;
        self
    }

    /// Set the scrub pass cap.
    #[must_use]
    pub fn with_max_scrub_passes(mut self, passes: usize) -> Self {
        self.max_scrub_passes = passes;
        self
    }

    /// Set the resolution mode.
    #[must_use]
    pub fn with_resolution_mode(mut self, mode: ResolutionMode) -> Self {
        self.resolution_mode = mode;
        self
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Reject configurations the engine cannot run.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.dimension < 3 {
            return Err(invalid(format!(
                "dimension must be at least 3, got {}",
                self.dimension
            )));
        }
        if self.dimension > i32::MAX as usize / 2 {
            return Err(invalid(format!("dimension {} is too large", self.dimension)));
        }
        if self.color_count < 3 {
            return Err(invalid(format!(
                "color_count must be at least 3, got {}",
                self.color_count
            )));
        }
        if self.time_limit_secs == 0 {
            return Err(invalid("time_limit_secs must be positive".into()));
        }
        if self.move_limit == 0 {
            return Err(invalid("move_limit must be positive".into()));
        }
        if self.score_table.size_tenths.is_empty() {
            return Err(invalid("score_table.size_tenths is empty".into()));
        }
        if self.score_table.cascade_tenths.is_empty() {
            return Err(invalid("score_table.cascade_tenths is empty".into()));
        }
        if self.score_table.cascade_tenths.len() <= self.max_cascade_level as usize {
            return Err(invalid(format!(
                "score_table.cascade_tenths needs {} entries for max_cascade_level {}",
                self.max_cascade_level + 1,
                self.max_cascade_level
            )));
        }
        let rules = &self.special_rules;
        if rules.striped_min < 3 || rules.bomb_min < rules.striped_min {
            return Err(invalid(format!(
                "special thresholds out of order: striped {} bomb {}",
                rules.striped_min, rules.bomb_min
            )));
        }
        if rules.wrapped_min < 5 {
            return Err(invalid(format!(
                "wrapped_min must be at least 5, got {}",
                rules.wrapped_min
            )));
        }
        if self.max_scrub_passes == 0 || self.max_cascade_steps == 0 {
            return Err(invalid("iteration caps must be positive".into()));
        }
        if self.event_capacity == 0 {
            return Err(invalid("event_capacity must be positive".into()));
        }
        Ok(())
    }
}

fn invalid(reason: String) -> EngineError {
    EngineError::InvalidConfig(reason)
}
