//! Notifications for the presentation layer.
//!
//! The engine resolves synchronously and reports what happened as data.
//! Collaborators replay these events with whatever pacing, animation and
//! sound they like; the engine never waits for them.
//!
//! ## Event Types
//!
//! - `StepEvent`: One cascade step (runs, specials, clears, falls, spawns,
//!   score delta, cascade level and tier)
//! - `CascadeSummary`: Totals once a swap has fully settled
//! - `SessionEvent`: Everything a session command did, buffered in an
//!   `EventLog` until drained

mod session_log;
mod step;

pub use session_log::{EndReason, EventLog, SessionEvent};
pub use step::{CascadeSummary, CascadeTier, RunShape, SpecialAward, StepEvent, TokenMove};
