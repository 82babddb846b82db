//! The game session state machine.

use std::time::Duration;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::core::{
    EngineConfig, EngineError, IllegalState, InvalidOperation, Position, ResolutionMode, TokenId,
};
use crate::events::{CascadeSummary, CascadeTier, EndReason, EventLog, SessionEvent, StepEvent};
use crate::grid::{create_grid, Grid, Token, TokenFactory};
use crate::matching::{legal_swaps, would_match};
use crate::resolve::{Cascade, ResolutionStatus, SwapAttempt};

/// Lifecycle phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    #[default]
    NotStarted,
    Active,
    Over,
}

/// What a swap did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SwapOutcome {
    /// No match; tokens are back where they were and no move was used.
    Reverted,
    /// The swap matched and the whole cascade has run.
    Resolved {
        steps: Vec<StepEvent>,
        summary: CascadeSummary,
    },
    /// The swap matched; call [`Session::advance`] to run the cascade.
    InFlight,
}

/// What a selection did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    Selected(TokenId),
    Deselected(TokenId),
    Swapped(SwapOutcome),
}

/// A single game: grid, clock, moves, score and the command surface that
/// mutates them.
///
/// All state is owned here; nothing is global. Commands return
/// `Err` without changing anything when the rules reject them.
///
/// ```
/// use rust_match3::session::Session;
/// use rust_match3::core::EngineConfig;
///
/// let mut session = Session::new(EngineConfig::default()).unwrap();
/// assert!(session.tick().is_err()); // not started yet
///
/// session.start();
/// assert!(session.is_active());
/// assert_eq!(session.time_left(), 60);
///
/// if let Some((a, b)) = session.hint() {
///     session.swap(a, b).unwrap();
///     assert_eq!(session.moves(), 1);
///     assert!(session.score() >= 30);
/// }
/// assert!(!session.is_processing());
/// ```
#[derive(Clone, Debug)]
pub struct Session {
    pub(super) config: EngineConfig,
    pub(super) phase: SessionPhase,
    pub(super) grid: Grid,
    pub(super) factory: TokenFactory,
    pub(super) score: u64,
    pub(super) high_score: u64,
    pub(super) time_left: u32,
    pub(super) moves: u32,
    pub(super) cascade_level: u32,
    pub(super) selected: Option<TokenId>,
    pub(super) in_flight: Option<Cascade>,
    pub(super) end_reason: Option<EndReason>,
    /// Whole seconds of play already applied to `time_left`.
    pub(super) clock_synced: u64,
    pub(super) events: EventLog,
}

impl Session {
    /// Create a session that has not started yet.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            factory: TokenFactory::new(config.seed, config.color_count),
            grid: Grid::empty(config.dimension),
            phase: SessionPhase::NotStarted,
            score: 0,
            high_score: 0,
            time_left: config.time_limit_secs,
            moves: 0,
            cascade_level: 0,
            selected: None,
            in_flight: None,
            end_reason: None,
            clock_synced: 0,
            events: EventLog::with_capacity(config.event_capacity),
            config,
        })
    }

    /// Seed the high score from external storage.
    #[must_use]
    pub fn with_high_score(mut self, high_score: u64) -> Self {
        self.high_score = self.high_score.max(high_score);
        self
    }

    // === Commands ===

    /// Deal a fresh, stable grid and reset score, clock, moves and cascade.
    ///
    /// Valid in every phase. The high score and the id sequence carry over.
    pub fn start(&mut self) {
        self.grid = create_grid(
            self.config.dimension,
            &mut self.factory,
            self.config.max_scrub_passes,
        );
        self.phase = SessionPhase::Active;
        self.score = 0;
        self.time_left = self.config.time_limit_secs;
        self.moves = 0;
        self.cascade_level = 0;
        self.selected = None;
        self.in_flight = None;
        self.end_reason = None;
        self.clock_synced = 0;
        self.events.push(SessionEvent::Started {
            dimension: self.config.dimension,
            time_limit: self.config.time_limit_secs,
            move_limit: self.config.move_limit,
        });
        info!(
            "session started: {}x{} grid, {} moves, {}s",
            self.config.dimension,
            self.config.dimension,
            self.config.move_limit,
            self.config.time_limit_secs
        );
    }

    /// Single-selection model: select, deselect, move the selection, or
    /// swap with the selected token when `pos` is its neighbour.
    pub fn select_token(&mut self, pos: Position) -> Result<SelectOutcome, EngineError> {
        self.ensure_active()?;
        self.ensure_unlocked()?;
        let token = *self.occupied(pos)?;

        match self.selected_token().copied() {
            Some(current) if current.id == token.id => {
                self.set_selection(None);
                Ok(SelectOutcome::Deselected(token.id))
            }
            Some(current) if current.position.is_adjacent(pos) => {
                let outcome = self.swap(current.position, pos)?;
                Ok(SelectOutcome::Swapped(outcome))
            }
            _ => {
                self.set_selection(Some(token));
                Ok(SelectOutcome::Selected(token.id))
            }
        }
    }

    /// [`select_token`](Self::select_token) by token id.
    pub fn select_token_id(&mut self, id: TokenId) -> Result<SelectOutcome, EngineError> {
        self.ensure_active()?;
        let pos = self
            .grid
            .find(id)
            .map(|t| t.position)
            .ok_or(InvalidOperation::UnknownToken(id))?;
        self.select_token(pos)
    }

    /// Swap the tokens at `a` and `b`.
    ///
    /// A match uses one move and starts a cascade; in immediate mode the
    /// cascade runs to completion before this returns. Any selection is
    /// consumed.
    pub fn swap(&mut self, a: Position, b: Position) -> Result<SwapOutcome, EngineError> {
        self.ensure_active()?;
        self.ensure_unlocked()?;

        match Cascade::begin(&mut self.grid, a, b)? {
            SwapAttempt::Reverted => {
                self.set_selection(None);
                self.events.push(SessionEvent::SwapReverted { a, b });
                Ok(SwapOutcome::Reverted)
            }
            SwapAttempt::Committed(cascade) => {
                self.set_selection(None);
                self.moves += 1;
                self.cascade_level = 0;
                self.in_flight = Some(cascade);
                self.events.push(SessionEvent::SwapCommitted {
                    a,
                    b,
                    moves: self.moves,
                });
                match self.config.resolution_mode {
                    ResolutionMode::Stepped => Ok(SwapOutcome::InFlight),
                    ResolutionMode::Immediate => {
                        let (steps, summary) = self.finish_in_flight();
                        Ok(SwapOutcome::Resolved { steps, summary })
                    }
                }
            }
        }
    }

    /// Run one step of the in-flight cascade.
    pub fn advance(&mut self) -> Result<ResolutionStatus, EngineError> {
        self.ensure_active()?;
        self.step_in_flight()
            .ok_or(EngineError::IllegalState(IllegalState::NothingInFlight))
    }

    /// Count down one second. Reaching zero ends the session, or, while a
    /// cascade is in flight, as soon as it settles.
    pub fn tick(&mut self) -> Result<u32, EngineError> {
        self.ensure_active()?;
        self.clock_synced += 1;
        if self.time_left > 0 {
            self.time_left -= 1;
        }
        if self.time_left == 0 && self.in_flight.is_none() {
            self.end(EndReason::TimeUp);
        }
        Ok(self.time_left)
    }

    /// Bring the clock up to `elapsed` since `start()`. Seconds already
    /// counted are never counted again, so repeated calls are harmless.
    pub fn sync_clock(&mut self, elapsed: Duration) -> Result<u32, EngineError> {
        self.ensure_active()?;
        let target = elapsed.as_secs();
        while self.clock_synced < target && self.phase == SessionPhase::Active {
            if self.time_left == 0 {
                self.clock_synced = target;
                break;
            }
            self.tick()?;
        }
        Ok(self.time_left)
    }

    /// End the session now. A cascade in flight is finished (and scored)
    /// first.
    pub fn end_session(&mut self) -> Result<(), EngineError> {
        self.ensure_active()?;
        if self.in_flight.is_some() {
            self.finish_in_flight();
        }
        if self.phase == SessionPhase::Active {
            self.end(EndReason::Manual);
        }
        Ok(())
    }

    // === Queries ===

    /// Would swapping `a` and `b` match? Never mutates anything.
    pub fn preview_swap(&self, a: Position, b: Position) -> Result<bool, EngineError> {
        if self.phase == SessionPhase::NotStarted {
            return Err(IllegalState::NotStarted.into());
        }
        would_match(&self.grid, a, b)
    }

    /// First matching swap in row-major order.
    #[must_use]
    pub fn hint(&self) -> Option<(Position, Position)> {
        self.legal_swaps().into_iter().next()
    }

    /// Every matching swap on the current grid.
    #[must_use]
    pub fn legal_swaps(&self) -> Vec<(Position, Position)> {
        legal_swaps(&self.grid)
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Read-only view of the live grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Owned copy of the grid. O(1); later changes to the session do not
    /// show through.
    #[must_use]
    pub fn grid_snapshot(&self) -> Grid {
        self.grid.clone()
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    #[must_use]
    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    #[must_use]
    pub fn moves(&self) -> u32 {
        self.moves
    }

    #[must_use]
    pub fn move_limit(&self) -> u32 {
        self.config.move_limit
    }

    #[must_use]
    pub fn moves_left(&self) -> u32 {
        self.config.move_limit.saturating_sub(self.moves)
    }

    #[must_use]
    pub fn cascade_level(&self) -> u32 {
        self.cascade_level
    }

    #[must_use]
    pub fn cascade_tier(&self) -> CascadeTier {
        CascadeTier::from_level(self.cascade_level)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == SessionPhase::Over
    }

    /// True while a cascade is in flight.
    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.in_flight.is_some()
    }

    /// True while new swaps and selections are refused.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Currently selected token.
    #[must_use]
    pub fn selected(&self) -> Option<&Token> {
        self.selected_token()
    }

    #[must_use]
    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    /// Buffered events, oldest first.
    #[must_use]
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Take every buffered event.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        self.events.drain()
    }

    // === Internals ===

    fn ensure_active(&self) -> Result<(), EngineError> {
        match self.phase {
            SessionPhase::Active => Ok(()),
            SessionPhase::NotStarted => Err(IllegalState::NotStarted.into()),
            SessionPhase::Over => Err(IllegalState::SessionOver.into()),
        }
    }

    fn ensure_unlocked(&self) -> Result<(), EngineError> {
        if self.in_flight.is_some() {
            return Err(InvalidOperation::Locked.into());
        }
        Ok(())
    }

    fn occupied(&self, pos: Position) -> Result<&Token, InvalidOperation> {
        if !self.grid.contains(pos) {
            return Err(InvalidOperation::OutOfBounds(pos));
        }
        self.grid.token_at(pos).ok_or(InvalidOperation::EmptyCell(pos))
    }

    fn selected_token(&self) -> Option<&Token> {
        self.selected.and_then(|id| self.grid.find(id))
    }

    fn set_selection(&mut self, token: Option<Token>) {
        if let Some(previous) = self.selected_token().map(|t| (t.id, t.position)) {
            if let Some(t) = self.grid.token_at_mut(previous.1) {
                t.flags.selected = false;
            }
            if token.map(|t| t.id) != Some(previous.0) {
                self.events.push(SessionEvent::Deselected { token: previous.0 });
            }
        }
        self.selected = token.map(|t| t.id);
        if let Some(token) = token {
            if let Some(t) = self.grid.token_at_mut(token.position) {
                t.flags.selected = true;
            }
            self.events.push(SessionEvent::Selected {
                token: token.id,
                position: token.position,
            });
        }
    }

    fn step_in_flight(&mut self) -> Option<ResolutionStatus> {
        let cascade = self.in_flight.as_mut()?;
        let status = cascade.step(&mut self.grid, &mut self.factory, &self.config);
        let level = cascade.level();

        match &status {
            ResolutionStatus::Processing(event) => {
                self.score += event.score_delta;
                self.high_score = self.high_score.max(self.score);
                self.cascade_level = level;
                self.events.push(SessionEvent::Step(event.clone()));
            }
            ResolutionStatus::Complete(summary) => {
                self.in_flight = None;
                self.cascade_level = 0;
                self.events.push(SessionEvent::Settled(*summary));
                debug!(
                    "cascade settled after {} steps for {} points",
                    summary.steps, summary.score
                );
                if self.moves >= self.config.move_limit {
                    self.end(EndReason::MovesExhausted);
                } else if self.time_left == 0 {
                    self.end(EndReason::TimeUp);
                }
            }
        }
        Some(status)
    }

    fn finish_in_flight(&mut self) -> (Vec<StepEvent>, CascadeSummary) {
        let mut steps = Vec::new();
        while let Some(status) = self.step_in_flight() {
            match status {
                ResolutionStatus::Processing(event) => steps.push(event),
                ResolutionStatus::Complete(summary) => return (steps, summary),
            }
        }
        (steps, CascadeSummary::default())
    }

    fn end(&mut self, reason: EndReason) {
        self.set_selection(None);
        self.phase = SessionPhase::Over;
        self.in_flight = None;
        self.end_reason = Some(reason);
        self.events.push(SessionEvent::Ended {
            reason,
            score: self.score,
        });
        info!(
            "session over ({:?}): score {}, high score {}",
            reason, self.score, self.high_score
        );
    }
}
