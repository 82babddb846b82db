//! Session persistence.
//!
//! A [`SessionSnapshot`] captures everything needed to resume a settled
//! session bit-for-bit, including the RNG position, so refills after a
//! restore match the ones the original session would have produced.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::core::{
    EngineConfig, EngineError, GameRng, GameRngState, IllegalState, TokenId, TokenIdAllocator,
};
use crate::events::{EndReason, EventLog};
use crate::grid::{Grid, TokenFactory};
use crate::matching::find_all_matches;

use super::state::{Session, SessionPhase};

/// Serializable state of a settled session. Buffered events are not kept.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub config: EngineConfig,
    pub phase: SessionPhase,
    pub grid: Grid,
    pub rng: GameRngState,
    pub next_token_id: u64,
    pub score: u64,
    pub high_score: u64,
    pub time_left: u32,
    pub moves: u32,
    pub selected: Option<TokenId>,
    pub end_reason: Option<EndReason>,
    pub clock_synced: u64,
}

impl Session {
    /// Capture the session. Refused while a cascade is in flight.
    pub fn snapshot(&self) -> Result<SessionSnapshot, EngineError> {
        if self.in_flight.is_some() {
            return Err(IllegalState::InFlight.into());
        }
        Ok(SessionSnapshot {
            config: self.config.clone(),
            phase: self.phase,
            grid: self.grid.clone(),
            rng: self.factory.rng_state(),
            next_token_id: self.factory.ids().allocated(),
            score: self.score,
            high_score: self.high_score,
            time_left: self.time_left,
            moves: self.moves,
            selected: self.selected,
            end_reason: self.end_reason,
            clock_synced: self.clock_synced,
        })
    }

    /// Rebuild a session from a snapshot.
    pub fn from_snapshot(snapshot: SessionSnapshot) -> Result<Self, EngineError> {
        snapshot.config.validate()?;
        let dimension = snapshot.config.dimension;
        if snapshot.grid.dimension() != dimension {
            return Err(EngineError::Codec(format!(
                "grid is {0}x{0}, config says {1}x{1}",
                snapshot.grid.dimension(),
                dimension
            )));
        }
        if snapshot.phase != SessionPhase::NotStarted
            && (!snapshot.grid.is_full() || snapshot.grid.tokens().count() != dimension * dimension)
        {
            return Err(EngineError::Codec("grid has empty cells".into()));
        }
        if let Some(id) = snapshot.selected {
            if snapshot.grid.find(id).is_none() {
                return Err(EngineError::Codec(format!("selected {} is not on the grid", id)));
            }
        }

        let mut ids = FxHashSet::default();
        if let Some(token) = snapshot.grid.tokens().find(|t| !ids.insert(t.id)) {
            return Err(EngineError::Codec(format!("{} appears twice on the grid", token.id)));
        }
        if let Some(max) = ids.iter().map(|id| id.raw()).max() {
            if snapshot.next_token_id <= max {
                return Err(EngineError::Codec(format!(
                    "next token id {} would reuse ids up to {}",
                    snapshot.next_token_id, max
                )));
            }
        }
        if snapshot.phase != SessionPhase::NotStarted {
            let matches = find_all_matches(&snapshot.grid);
            if !matches.is_empty() {
                return Err(EngineError::Codec(format!(
                    "settled grid still holds {} matched tokens",
                    matches.len()
                )));
            }
        }

        let factory = TokenFactory::from_parts(
            GameRng::from_state(&snapshot.rng),
            TokenIdAllocator::resume_at(snapshot.next_token_id),
            snapshot.config.color_count,
        );
        let events = EventLog::with_capacity(snapshot.config.event_capacity);
        Ok(Self {
            config: snapshot.config,
            phase: snapshot.phase,
            grid: snapshot.grid,
            factory,
            score: snapshot.score,
            high_score: snapshot.high_score.max(snapshot.score),
            time_left: snapshot.time_left,
            moves: snapshot.moves,
            cascade_level: 0,
            selected: snapshot.selected,
            in_flight: None,
            end_reason: snapshot.end_reason,
            clock_synced: snapshot.clock_synced,
            events,
        })
    }

    /// Encode the session with bincode.
    pub fn save(&self) -> Result<Vec<u8>, EngineError> {
        Ok(bincode::serialize(&self.snapshot()?)?)
    }

    /// Decode a session saved with [`save`](Self::save).
    pub fn restore(bytes: &[u8]) -> Result<Self, EngineError> {
        let snapshot: SessionSnapshot = bincode::deserialize(bytes)?;
        Self::from_snapshot(snapshot)
    }
}
