//! Python bindings for the rust-match3 engine.
//!
//! # Quick Start
//!
//! ```python
//! import rust_match3 as m3
//!
//! session = m3.Session(seed=7)
//! session.start()
//!
//! hint = session.hint()
//! if hint is not None:
//!     (r1, c1), (r2, c2) = hint
//!     session.swap(r1, c1, r2, c2)
//!
//! board = session.colors()          # (8, 8) uint8 array
//! for event in session.drain_events():
//!     print(event.kind, event.score, event.tier)
//! ```

use pyo3::prelude::*;

mod py_events;
mod py_session;

pub use py_events::*;
pub use py_session::*;

/// rust-match3: rules engine for a tile-matching puzzle.
#[pymodule]
fn rust_match3(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySession>()?;
    m.add_class::<PySessionEvent>()?;
    m.add_function(wrap_pyfunction!(tier_label, m)?)?;
    Ok(())
}
