//! Step scoring.

use crate::core::EngineConfig;

/// Breakdown of one step's points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepScore {
    pub matched: usize,
    pub size_tenths: u32,
    pub cascade_tenths: u32,
    pub points: u64,
}

/// Score `matched` distinct tokens cleared at cascade `level`.
///
/// `matched × base_points × size multiplier × cascade multiplier`, rounded
/// down.
///
/// ```
/// use rust_match3::core::EngineConfig;
/// use rust_match3::resolve::score_step;
///
/// let config = EngineConfig::default();
/// assert_eq!(score_step(3, 0, &config).points, 30);
/// assert_eq!(score_step(5, 2, &config).points, 300);
/// ```
#[must_use]
pub fn score_step(matched: usize, level: u32, config: &EngineConfig) -> StepScore {
    let table = &config.score_table;
    StepScore {
        matched,
        size_tenths: table.size_tenths(matched),
        cascade_tenths: table.cascade_tenths(level),
        points: table.step_score(matched, config.base_points, level),
    }
}
