//! Game sessions.
//!
//! ## Lifecycle
//!
//! `NotStarted → Active → Over`, with `start()` valid from every phase.
//! While a cascade is in flight the session is processing and locked: swaps
//! and selections are refused until it settles.
//!
//! ## Commands
//!
//! - `start()`: Deal a stable grid, reset score, clock and moves
//! - `select_token(pos)` / `swap(a, b)`: Player input
//! - `advance()`: Step an in-flight cascade (stepped resolution mode)
//! - `tick()` / `sync_clock(elapsed)`: The countdown
//! - `end_session()`: Finish early
//!
//! ## Persistence
//!
//! `save()` / `restore()` round-trip a settled session through bincode.

mod snapshot;
mod state;

pub use snapshot::SessionSnapshot;
pub use state::{SelectOutcome, Session, SessionPhase, SwapOutcome};
