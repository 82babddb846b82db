//! Engine error taxonomy.
//!
//! Every command returns `Result<_, EngineError>`. A returned error means the
//! command was a no-op: the grid and session are exactly as they were.

use thiserror::Error;

use super::{Position, TokenId};

/// A request the rules reject outright.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum InvalidOperation {
    #[error("position {0} is outside the grid")]
    OutOfBounds(Position),

    #[error("{0} and {1} are not orthogonal neighbours")]
    NotAdjacent(Position, Position),

    #[error("a resolution is in flight")]
    Locked,

    #[error("cell {0} holds no token")]
    EmptyCell(Position),

    #[error("{0} is not on the grid")]
    UnknownToken(TokenId),
}

/// A command issued in a session phase that does not accept it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum IllegalState {
    #[error("session has not been started")]
    NotStarted,

    #[error("session is over")]
    SessionOver,

    #[error("no resolution is in flight")]
    NothingInFlight,

    #[error("a resolution is in flight")]
    InFlight,
}

/// Any error the engine reports.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid operation: {0}")]
    InvalidOperation(#[from] InvalidOperation),

    #[error("illegal state: {0}")]
    IllegalState(#[from] IllegalState),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("snapshot codec: {0}")]
    Codec(String),
}

impl From<bincode::Error> for EngineError {
    fn from(err: bincode::Error) -> Self {
        EngineError::Codec(err.to_string())
    }
}
