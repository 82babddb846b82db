//! Session-level notifications and the log that buffers them.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::{Position, TokenId};

use super::step::{CascadeSummary, StepEvent};

/// Why a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndReason {
    MovesExhausted,
    TimeUp,
    Manual,
}

/// Something a collaborator may want to animate or play a sound for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    Started {
        dimension: usize,
        time_limit: u32,
        move_limit: u32,
    },
    Selected {
        token: TokenId,
        position: Position,
    },
    Deselected {
        token: TokenId,
    },
    SwapReverted {
        a: Position,
        b: Position,
    },
    SwapCommitted {
        a: Position,
        b: Position,
        moves: u32,
    },
    Step(StepEvent),
    Settled(CascadeSummary),
    Ended {
        reason: EndReason,
        score: u64,
    },
}

/// Ordered buffer of session events.
///
/// The session only ever appends; draining is up to the host. Once
/// `capacity` events are buffered the oldest is dropped for each new one,
/// so a host that never drains still uses bounded memory.
#[derive(Clone, Debug)]
pub struct EventLog {
    events: VecDeque<SessionEvent>,
    capacity: usize,
    dropped: u64,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }
}

/// Capacity used by [`EventLog::new`].
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a log that keeps at most `capacity` events (at least one).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity.min(DEFAULT_EVENT_CAPACITY)),
            capacity,
            dropped: 0,
        }
    }

    pub fn push(&mut self, event: SessionEvent) {
        if self.events.len() >= self.capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(event);
    }

    /// Take every buffered event, oldest first.
    pub fn drain(&mut self) -> Vec<SessionEvent> {
        self.events.drain(..).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Most events kept at once.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Events evicted undrained since the log was created.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn iter(&self) -> impl Iterator<Item = &SessionEvent> {
        self.events.iter()
    }
}
