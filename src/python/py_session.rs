//! Session bindings for Python.

use std::time::Duration;

use numpy::{PyArray1, PyArray2, PyArrayMethods};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::core::{EngineConfig, EngineError, Position, ResolutionMode};
use crate::resolve::ResolutionStatus;
use crate::session::{SelectOutcome, Session, SwapOutcome};

use super::py_events::PySessionEvent;

fn to_py_err(err: EngineError) -> PyErr {
    PyErr::new::<PyValueError, _>(err.to_string())
}

/// Python wrapper for Session.
///
/// Commands raise `ValueError` when the rules reject them; the session is
/// left unchanged in that case.
#[pyclass(name = "Session")]
pub struct PySession {
    inner: Session,
}

#[pymethods]
impl PySession {
    /// Create a new session (not yet started).
    ///
    /// # Arguments
    /// - seed: RNG seed for fills and refills
    /// - move_limit / time_limit: Session budget
    /// - stepped: If true, cascades run one `advance()` at a time
    /// - high_score: Previously stored high score
    #[new]
    #[pyo3(signature = (
        seed = 42,
        dimension = 8,
        color_count = 5,
        move_limit = 20,
        time_limit = 60,
        stepped = false,
        high_score = 0
    ))]
    fn new(
        seed: u64,
        dimension: usize,
        color_count: u8,
        move_limit: u32,
        time_limit: u32,
        stepped: bool,
        high_score: u64,
    ) -> PyResult<Self> {
        let mode = if stepped {
            ResolutionMode::Stepped
        } else {
            ResolutionMode::Immediate
        };
        let config = EngineConfig::new()
            .with_seed(seed)
            .with_dimension(dimension)
            .with_color_count(color_count)
            .with_move_limit(move_limit)
            .with_time_limit(time_limit)
            .with_resolution_mode(mode);
        let inner = Session::new(config).map_err(to_py_err)?.with_high_score(high_score);
        Ok(Self { inner })
    }

    fn start(&mut self) {
        self.inner.start();
    }

    /// Select the token at (row, col). Returns "selected", "deselected",
    /// "reverted", "resolved" or "in_flight".
    fn select(&mut self, row: i32, col: i32) -> PyResult<&'static str> {
        let outcome = self
            .inner
            .select_token(Position::new(row, col))
            .map_err(to_py_err)?;
        Ok(match outcome {
            SelectOutcome::Selected(_) => "selected",
            SelectOutcome::Deselected(_) => "deselected",
            SelectOutcome::Swapped(swap) => swap_label(&swap),
        })
    }

    /// Swap two adjacent cells. Returns "reverted", "resolved" or "in_flight".
    fn swap(&mut self, r1: i32, c1: i32, r2: i32, c2: i32) -> PyResult<&'static str> {
        let outcome = self
            .inner
            .swap(Position::new(r1, c1), Position::new(r2, c2))
            .map_err(to_py_err)?;
        Ok(swap_label(&outcome))
    }

    /// Would swapping these cells match?
    fn preview_swap(&self, r1: i32, c1: i32, r2: i32, c2: i32) -> PyResult<bool> {
        self.inner
            .preview_swap(Position::new(r1, c1), Position::new(r2, c2))
            .map_err(to_py_err)
    }

    /// Run one cascade step. Returns True when the cascade has settled.
    fn advance(&mut self) -> PyResult<bool> {
        let status = self.inner.advance().map_err(to_py_err)?;
        Ok(matches!(status, ResolutionStatus::Complete(_)))
    }

    /// Count down one second; returns the time left.
    fn tick(&mut self) -> PyResult<u32> {
        self.inner.tick().map_err(to_py_err)
    }

    /// Catch the clock up to `elapsed` seconds since start.
    fn sync_clock(&mut self, elapsed: f64) -> PyResult<u32> {
        let elapsed = Duration::try_from_secs_f64(elapsed.max(0.0))
            .map_err(|e| PyErr::new::<PyValueError, _>(format!("{}", e)))?;
        self.inner.sync_clock(elapsed).map_err(to_py_err)
    }

    fn end_session(&mut self) -> PyResult<()> {
        self.inner.end_session().map_err(to_py_err)
    }

    /// First matching swap as ((r1, c1), (r2, c2)), or None.
    fn hint(&self) -> Option<((i32, i32), (i32, i32))> {
        self.inner.hint().map(|(a, b)| ((a.row, a.col), (b.row, b.col)))
    }

    /// Every matching swap.
    fn legal_swaps(&self) -> Vec<((i32, i32), (i32, i32))> {
        self.inner
            .legal_swaps()
            .into_iter()
            .map(|(a, b)| ((a.row, a.col), (b.row, b.col)))
            .collect()
    }

    /// Grid colours as a (dimension, dimension) uint8 array. Empty cells
    /// (only visible mid-cascade) are 255.
    fn colors<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let dimension = self.inner.grid().dimension();
        let flat: Vec<u8> = self
            .inner
            .grid()
            .colors()
            .into_iter()
            .map(|c| c.map_or(u8::MAX, |c| c.raw()))
            .collect();
        PyArray1::from_vec_bound(py, flat)
            .reshape([dimension, dimension])
            .map_err(|e| PyErr::new::<PyValueError, _>(format!("{}", e)))
    }

    /// Take every buffered event.
    fn drain_events(&mut self) -> Vec<PySessionEvent> {
        self.inner
            .drain_events()
            .into_iter()
            .map(PySessionEvent)
            .collect()
    }

    /// Serialize to bytes.
    fn save(&self) -> PyResult<Vec<u8>> {
        self.inner.save().map_err(to_py_err)
    }

    /// Rebuild a session from `save()` bytes.
    #[staticmethod]
    fn restore(bytes: Vec<u8>) -> PyResult<Self> {
        let inner = Session::restore(&bytes).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    #[getter]
    fn score(&self) -> u64 {
        self.inner.score()
    }

    #[getter]
    fn high_score(&self) -> u64 {
        self.inner.high_score()
    }

    #[getter]
    fn time_left(&self) -> u32 {
        self.inner.time_left()
    }

    #[getter]
    fn moves(&self) -> u32 {
        self.inner.moves()
    }

    #[getter]
    fn move_limit(&self) -> u32 {
        self.inner.move_limit()
    }

    #[getter]
    fn cascade_level(&self) -> u32 {
        self.inner.cascade_level()
    }

    #[getter]
    fn is_active(&self) -> bool {
        self.inner.is_active()
    }

    #[getter]
    fn is_over(&self) -> bool {
        self.inner.is_over()
    }

    #[getter]
    fn is_processing(&self) -> bool {
        self.inner.is_processing()
    }

    /// Selected cell as (row, col), or None.
    #[getter]
    fn selected(&self) -> Option<(i32, i32)> {
        self.inner
            .selected()
            .map(|t| (t.position.row, t.position.col))
    }

    fn __repr__(&self) -> String {
        format!(
            "Session(score={}, moves={}/{}, time_left={}, over={})",
            self.inner.score(),
            self.inner.moves(),
            self.inner.move_limit(),
            self.inner.time_left(),
            self.inner.is_over()
        )
    }
}

fn swap_label(outcome: &SwapOutcome) -> &'static str {
    match outcome {
        SwapOutcome::Reverted => "reverted",
        SwapOutcome::Resolved { .. } => "resolved",
        SwapOutcome::InFlight => "in_flight",
    }
}
