//! Event bindings for Python.

use pyo3::prelude::*;

use crate::events::{CascadeTier, SessionEvent};

/// Python wrapper for a session event.
///
/// `kind` names the variant; the numeric getters return `None` when the
/// variant carries no such value.
#[pyclass(name = "SessionEvent")]
#[derive(Clone, Debug)]
pub struct PySessionEvent(pub SessionEvent);

#[pymethods]
impl PySessionEvent {
    /// Variant name, e.g. "step" or "swap_committed".
    #[getter]
    fn kind(&self) -> &'static str {
        match &self.0 {
            SessionEvent::Started { .. } => "started",
            SessionEvent::Selected { .. } => "selected",
            SessionEvent::Deselected { .. } => "deselected",
            SessionEvent::SwapReverted { .. } => "swap_reverted",
            SessionEvent::SwapCommitted { .. } => "swap_committed",
            SessionEvent::Step(_) => "step",
            SessionEvent::Settled(_) => "settled",
            SessionEvent::Ended { .. } => "ended",
        }
    }

    /// Points awarded by a step, a settled cascade, or the final score.
    #[getter]
    fn score(&self) -> Option<u64> {
        match &self.0 {
            SessionEvent::Step(step) => Some(step.score_delta),
            SessionEvent::Settled(summary) => Some(summary.score),
            SessionEvent::Ended { score, .. } => Some(*score),
            _ => None,
        }
    }

    #[getter]
    fn cascade_level(&self) -> Option<u32> {
        match &self.0 {
            SessionEvent::Step(step) => Some(step.cascade_level),
            _ => None,
        }
    }

    #[getter]
    fn matched_count(&self) -> Option<usize> {
        match &self.0 {
            SessionEvent::Step(step) => Some(step.matched_count),
            _ => None,
        }
    }

    /// Callout text for a step ("NICE", "GREAT", ...).
    #[getter]
    fn tier(&self) -> Option<&'static str> {
        match &self.0 {
            SessionEvent::Step(step) => step.tier.label(),
            _ => None,
        }
    }

    /// Run lengths cleared by a step.
    #[getter]
    fn run_lengths(&self) -> Vec<usize> {
        match &self.0 {
            SessionEvent::Step(step) => step.runs.iter().map(|r| r.length).collect(),
            _ => Vec::new(),
        }
    }

    /// Swap cells as ((r1, c1), (r2, c2)).
    #[getter]
    fn cells(&self) -> Option<((i32, i32), (i32, i32))> {
        match &self.0 {
            SessionEvent::SwapReverted { a, b } | SessionEvent::SwapCommitted { a, b, .. } => {
                Some(((a.row, a.col), (b.row, b.col)))
            }
            _ => None,
        }
    }

    fn __repr__(&self) -> String {
        match &self.0 {
            SessionEvent::Step(step) => format!(
                "SessionEvent(step, level={}, matched={}, score={}, tier={})",
                step.cascade_level,
                step.matched_count,
                step.score_delta,
                step.tier.label().unwrap_or("-")
            ),
            other => format!("SessionEvent({})", Self(other.clone()).kind()),
        }
    }
}

/// Label for a cascade level, for hosts that only track the number.
#[pyfunction]
pub fn tier_label(level: u32) -> Option<&'static str> {
    CascadeTier::from_level(level).label()
}
