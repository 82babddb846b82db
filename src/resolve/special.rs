//! Special token classification.
//!
//! Each run earns at most one special, checked in order: bomb (long straight
//! run), striped (four in a line, by axis), wrapped (two short runs crossing
//! in an L, T or plus). The special lands on a swapped cell inside the run
//! if there is one, otherwise on the run's middle cell.

use rustc_hash::FxHashSet;

use crate::core::{Position, SpecialRules};
use crate::events::SpecialAward;
use crate::grid::{Grid, SpecialKind};
use crate::matching::{Axis, MatchSet, Run};

/// Decide which tokens of `matches` become special.
#[must_use]
pub fn classify_specials(
    grid: &Grid,
    matches: &MatchSet,
    swapped: &[Position],
    rules: &SpecialRules,
) -> Vec<SpecialAward> {
    let runs = matches.runs();
    let mut consumed = vec![false; runs.len()];
    let mut awarded: FxHashSet<Position> = FxHashSet::default();
    let mut awards = Vec::new();

    for (i, run) in runs.iter().enumerate() {
        if consumed[i] {
            continue;
        }
        consumed[i] = true;

        let choice = if run.len() >= rules.bomb_min {
            representative(run, swapped).map(|cell| (SpecialKind::Bomb, cell))
        } else if run.len() >= rules.striped_min {
            let kind = match run.axis {
                Axis::Row => SpecialKind::StripedRow,
                Axis::Column => SpecialKind::StripedColumn,
            };
            representative(run, swapped).map(|cell| (kind, cell))
        } else {
            let mut partner = None;
            for (j, other) in runs.iter().enumerate().skip(i + 1) {
                if consumed[j] || other.len() >= rules.striped_min {
                    continue;
                }
                if let Some(cell) = wraps(run, other, rules) {
                    partner = Some((j, cell));
                    break;
                }
            }
            partner.map(|(j, cell)| {
                consumed[j] = true;
                (SpecialKind::Wrapped, cell)
            })
        };

        let Some((kind, cell)) = choice else {
            continue;
        };
        if !awarded.insert(cell) {
            continue;
        }
        if let Some(token) = grid.token_at(cell) {
            awards.push(SpecialAward {
                token: token.id,
                position: cell,
                kind,
            });
        }
    }

    awards
}

/// Shared cell of two crossing same-colour runs whose union is big enough.
fn wraps(a: &Run, b: &Run, rules: &SpecialRules) -> Option<Position> {
    if a.axis == b.axis || a.color != b.color {
        return None;
    }
    let shared = a.intersection(b)?;
    (a.len() + b.len() - 1 >= rules.wrapped_min).then_some(shared)
}

fn representative(run: &Run, swapped: &[Position]) -> Option<Position> {
    run.positions
        .iter()
        .copied()
        .find(|p| swapped.contains(p))
        .or_else(|| run.middle())
}
