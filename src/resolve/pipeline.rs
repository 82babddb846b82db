//! The swap → match → clear → gravity → re-check loop.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::core::{EngineConfig, EngineError, Position};
use crate::events::{CascadeSummary, CascadeTier, RunShape, StepEvent};
use crate::grid::{break_runs, Grid, Token, TokenFactory};
use crate::matching::{find_all_matches, find_run_at, validate_swap, MatchSet};

use super::gravity::apply_gravity;
use super::scoring::score_step;
use super::special::classify_specials;
use super::ResolutionStatus;

/// Result of trying a swap on the real grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SwapAttempt {
    /// Nothing matched; the grid is back as it was.
    Reverted,
    /// The swap stands and a cascade is ready to run.
    Committed(Cascade),
}

/// An in-flight cascade.
///
/// The grid and token factory are passed in on every step rather than
/// borrowed, so the owner can keep answering queries between steps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cascade {
    swapped: [Position; 2],
    level: u32,
    peak_level: u32,
    steps: usize,
    score: u64,
    capped: bool,
}

impl Cascade {
    /// Swap the tokens at `a` and `b`. Keeps the swap if either cell now
    /// heads a run, otherwise swaps back.
    ///
    /// An error means the grid was not touched.
    pub fn begin(grid: &mut Grid, a: Position, b: Position) -> Result<SwapAttempt, EngineError> {
        validate_swap(grid, a, b)?;
        grid.swap_tokens(a, b)?;

        if find_run_at(grid, a).is_none() && find_run_at(grid, b).is_none() {
            grid.swap_tokens(a, b)?;
            debug!("swap {} <-> {} reverted", a, b);
            return Ok(SwapAttempt::Reverted);
        }

        for pos in [a, b] {
            if let Some(token) = grid.token_at_mut(pos) {
                token.flags.swapping = true;
            }
        }
        debug!("swap {} <-> {} committed", a, b);
        Ok(SwapAttempt::Committed(Cascade {
            swapped: [a, b],
            level: 0,
            peak_level: 0,
            steps: 0,
            score: 0,
            capped: false,
        }))
    }

    /// Current cascade level.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Steps run so far.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Points awarded so far.
    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    /// The two cells of the committed swap.
    #[must_use]
    pub fn swapped(&self) -> [Position; 2] {
        self.swapped
    }

    /// Run one cascade step, or settle if nothing matches.
    pub fn step(
        &mut self,
        grid: &mut Grid,
        factory: &mut TokenFactory,
        config: &EngineConfig,
    ) -> ResolutionStatus {
        let matches = find_all_matches(grid);
        if matches.is_empty() {
            return ResolutionStatus::Complete(self.settle(grid));
        }
        if self.steps >= config.max_cascade_steps {
            let fixed = break_runs(grid, factory.color_count());
            warn!(
                "cascade hit the {} step cap; recoloured {} cells without scoring",
                config.max_cascade_steps, fixed
            );
            self.capped = true;
            return ResolutionStatus::Complete(self.settle(grid));
        }

        let specials = classify_specials(grid, &matches, &self.swapped, &config.special_rules);
        for award in &specials {
            if let Some(token) = grid.token_at_mut(award.position) {
                token.special = award.kind;
            }
        }

        let scored_level = self.level;
        let score = score_step(matches.len(), scored_level, config);
        self.level = (self.level + 1).min(config.max_cascade_level);
        self.peak_level = self.peak_level.max(self.level);

        grid.for_each_token_mut(|token| {
            token.flags.swapping = false;
            token.flags.falling = false;
        });
        let cleared = clear(grid, &matches);
        let gravity = apply_gravity(grid, factory);

        let event = StepEvent {
            step_index: self.steps,
            cascade_level: scored_level,
            next_level: self.level,
            tier: CascadeTier::from_level(self.level),
            matched_count: matches.len(),
            runs: matches.runs().iter().map(RunShape::from).collect(),
            specials,
            score_delta: score.points,
            cleared,
            moved: gravity.moved,
            spawned: gravity.spawned,
        };
        self.steps += 1;
        self.score += score.points;

        debug!(
            "cascade step {}: level {} cleared {} for {} points",
            event.step_index, scored_level, event.matched_count, event.score_delta
        );
        ResolutionStatus::Processing(event)
    }

    /// Step until settled, collecting every step event.
    pub fn run_to_completion(
        &mut self,
        grid: &mut Grid,
        factory: &mut TokenFactory,
        config: &EngineConfig,
    ) -> (Vec<StepEvent>, CascadeSummary) {
        let mut events = Vec::new();
        loop {
            match self.step(grid, factory, config) {
                ResolutionStatus::Processing(event) => events.push(event),
                ResolutionStatus::Complete(summary) => return (events, summary),
            }
        }
    }

    fn settle(&mut self, grid: &mut Grid) -> CascadeSummary {
        grid.for_each_token_mut(|token| {
            token.flags.swapping = false;
            token.flags.falling = false;
            token.flags.matched = false;
        });
        self.level = 0;
        CascadeSummary {
            steps: self.steps,
            score: self.score,
            peak_level: self.peak_level,
            capped: self.capped,
        }
    }
}

fn clear(grid: &mut Grid, matches: &MatchSet) -> Vec<Token> {
    matches
        .positions()
        .iter()
        .filter_map(|&pos| grid.take(pos))
        .map(|mut token| {
            token.flags.matched = true;
            token
        })
        .collect()
}
