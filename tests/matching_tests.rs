//! Match detection and swap validation integration tests.

use rust_match3::core::{
    EngineConfig, EngineError, InvalidOperation, Position, TokenIdAllocator,
};
use rust_match3::grid::{ColorId, Grid};
use rust_match3::matching::{
    find_all_matches, find_run_at, legal_swaps, validate_swap, would_match, Axis,
};
use rust_match3::resolve::score_step;

fn grid(rows: &[[u8; 5]; 5]) -> Grid {
    Grid::from_colors(rows, &mut TokenIdAllocator::new()).unwrap()
}

/// Stable 5x5 grid: no runs anywhere.
const STABLE: [[u8; 5]; 5] = [
    [0, 0, 1, 2, 3],
    [1, 2, 0, 3, 4],
    [2, 3, 4, 0, 1],
    [3, 4, 2, 1, 0],
    [4, 0, 1, 2, 3],
];

// =============================================================================
// Detection
// =============================================================================

#[test]
fn test_stable_grid_has_no_matches() {
    let g = grid(&STABLE);
    let matches = find_all_matches(&g);
    assert!(matches.is_empty());
    assert_eq!(matches.len(), 0);
}

#[test]
fn test_single_horizontal_run() {
    let g = grid(&[
        [0, 0, 0, 1, 2],
        [1, 2, 3, 4, 0],
        [2, 3, 4, 0, 1],
        [3, 4, 0, 1, 2],
        [4, 0, 1, 2, 3],
    ]);
    let matches = find_all_matches(&g);

    assert_eq!(matches.len(), 3);
    assert_eq!(matches.runs().len(), 1);
    assert_eq!(matches.runs()[0].axis, Axis::Row);
    assert_eq!(matches.runs()[0].color, ColorId(0));
    assert!(matches.contains(Position::new(0, 2)));
    assert!(!matches.contains(Position::new(0, 3)));
}

#[test]
fn test_crossing_runs_count_shared_cell_once() {
    let g = grid(&[
        [0, 0, 0, 1, 2],
        [0, 2, 3, 4, 1],
        [0, 3, 4, 2, 1],
        [1, 4, 2, 3, 4],
        [2, 1, 3, 4, 0],
    ]);
    let matches = find_all_matches(&g);

    assert_eq!(matches.runs().len(), 2);
    assert_eq!(matches.len(), 5);
    assert_eq!(matches.positions().len(), matches.tokens().len());
}

#[test]
fn test_crossing_runs_score_as_one_group() {
    let g = grid(&[
        [0, 0, 0, 1, 2],
        [0, 2, 3, 4, 1],
        [0, 3, 4, 2, 1],
        [1, 4, 2, 3, 4],
        [2, 1, 3, 4, 0],
    ]);
    let matches = find_all_matches(&g);
    let score = score_step(matches.len(), 0, &EngineConfig::default());

    // Five tokens at the 2.0x size bonus.
    assert_eq!(score.points, 100);
}

#[test]
fn test_find_run_at_prefers_horizontal() {
    let g = grid(&[
        [0, 0, 0, 1, 2],
        [0, 2, 3, 4, 1],
        [0, 3, 4, 2, 1],
        [1, 4, 2, 3, 4],
        [2, 1, 3, 4, 0],
    ]);
    let run = find_run_at(&g, Position::new(0, 0)).unwrap();
    assert_eq!(run.axis, Axis::Row);

    let run = find_run_at(&g, Position::new(2, 0)).unwrap();
    assert_eq!(run.axis, Axis::Column);
    assert_eq!(run.len(), 3);
}

#[test]
fn test_find_run_at_ignores_pairs_and_out_of_bounds() {
    let g = grid(&STABLE);
    assert!(find_run_at(&g, Position::new(0, 0)).is_none());
    assert!(find_run_at(&g, Position::new(9, 9)).is_none());
}

#[test]
fn test_long_run_is_one_run() {
    let g = grid(&[
        [3, 3, 3, 3, 3],
        [1, 2, 0, 1, 2],
        [2, 0, 1, 2, 0],
        [0, 1, 2, 0, 1],
        [1, 2, 0, 1, 2],
    ]);
    let matches = find_all_matches(&g);
    assert_eq!(matches.runs().len(), 1);
    assert_eq!(matches.runs()[0].len(), 5);
}

// =============================================================================
// Swap Validation
// =============================================================================

#[test]
fn test_validate_swap_checks_bounds_first() {
    let g = grid(&STABLE);
    assert_eq!(
        validate_swap(&g, Position::new(0, 4), Position::new(0, 5)),
        Err(InvalidOperation::OutOfBounds(Position::new(0, 5)))
    );
    assert_eq!(
        validate_swap(&g, Position::new(-1, 0), Position::new(3, 3)),
        Err(InvalidOperation::OutOfBounds(Position::new(-1, 0)))
    );
}

#[test]
fn test_validate_swap_rejects_diagonal_and_distant() {
    let g = grid(&STABLE);
    let a = Position::new(1, 1);
    for b in [Position::new(2, 2), Position::new(1, 3), Position::new(1, 1)] {
        assert_eq!(
            validate_swap(&g, a, b),
            Err(InvalidOperation::NotAdjacent(a, b))
        );
    }
}

#[test]
fn test_would_match_is_symmetric_and_pure() {
    let g = grid(&STABLE);
    let before = g.clone();
    let a = Position::new(0, 2);
    let b = Position::new(1, 2);

    assert!(would_match(&g, a, b).unwrap());
    assert!(would_match(&g, b, a).unwrap());
    assert_eq!(g, before);
}

#[test]
fn test_would_match_reports_errors() {
    let g = grid(&STABLE);
    assert!(matches!(
        would_match(&g, Position::new(0, 0), Position::new(2, 0)),
        Err(EngineError::InvalidOperation(InvalidOperation::NotAdjacent(_, _)))
    ));
}

#[test]
fn test_non_matching_swap() {
    let g = grid(&STABLE);
    assert!(!would_match(&g, Position::new(4, 3), Position::new(4, 4)).unwrap());
}

#[test]
fn test_legal_swaps_are_all_matching() {
    let g = grid(&STABLE);
    let swaps = legal_swaps(&g);

    assert!(swaps.contains(&(Position::new(0, 2), Position::new(1, 2))));
    for (a, b) in swaps {
        assert!(a.is_adjacent(b));
        assert!(would_match(&g, a, b).unwrap());
    }
}
