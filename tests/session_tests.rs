//! Session state machine integration tests.

use std::collections::HashSet;
use std::time::Duration;

use rust_match3::core::{
    EngineConfig, EngineError, IllegalState, InvalidOperation, Position, ResolutionMode,
    TokenIdAllocator,
};
use rust_match3::events::{EndReason, SessionEvent};
use rust_match3::grid::Grid;
use rust_match3::matching::find_all_matches;
use rust_match3::resolve::ResolutionStatus;
use rust_match3::session::{SelectOutcome, Session, SessionPhase, SwapOutcome};

/// Stable grid where swapping (0,2) and (1,2) makes three in a row.
const THREE: [[u8; 5]; 5] = [
    [0, 0, 1, 2, 3],
    [1, 2, 0, 3, 4],
    [2, 3, 4, 0, 1],
    [3, 4, 2, 1, 0],
    [4, 0, 1, 2, 3],
];

fn config() -> EngineConfig {
    EngineConfig::default().with_dimension(5).with_seed(3)
}

/// An active session dealt the given grid.
fn session_with(rows: &[[u8; 5]; 5], config: EngineConfig) -> Session {
    let mut session = Session::new(config).unwrap();
    session.start();
    let mut snapshot = session.snapshot().unwrap();
    let mut ids = TokenIdAllocator::resume_at(snapshot.next_token_id);
    snapshot.grid = Grid::from_colors(rows, &mut ids).unwrap();
    snapshot.next_token_id = ids.allocated();
    Session::from_snapshot(snapshot).unwrap()
}

fn a() -> Position {
    Position::new(0, 2)
}

fn b() -> Position {
    Position::new(1, 2)
}

fn no_match() -> (Position, Position) {
    (Position::new(4, 3), Position::new(4, 4))
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn test_new_session_is_not_started() {
    let mut session = Session::new(EngineConfig::default()).unwrap();

    assert_eq!(session.phase(), SessionPhase::NotStarted);
    assert_eq!(session.tick(), Err(IllegalState::NotStarted.into()));
    assert_eq!(
        session.swap(Position::new(0, 0), Position::new(0, 1)),
        Err(IllegalState::NotStarted.into())
    );
    assert_eq!(
        session.select_token(Position::new(0, 0)),
        Err(IllegalState::NotStarted.into())
    );
    assert_eq!(session.end_session(), Err(IllegalState::NotStarted.into()));
}

#[test]
fn test_invalid_config_is_rejected() {
    let result = Session::new(EngineConfig::default().with_color_count(2));
    assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
}

#[test]
fn test_start_deals_stable_grid_and_resets() {
    let mut session = Session::new(EngineConfig::default().with_seed(21)).unwrap();
    session.start();

    assert!(session.is_active());
    assert_eq!(session.score(), 0);
    assert_eq!(session.moves(), 0);
    assert_eq!(session.moves_left(), 20);
    assert_eq!(session.time_left(), 60);
    assert_eq!(session.cascade_level(), 0);
    assert!(session.selected().is_none());
    assert!(session.grid().is_full());
    assert!(find_all_matches(session.grid()).is_empty());
}

#[test]
fn test_restart_keeps_high_score_and_fresh_ids() {
    let mut session = session_with(&THREE, config());
    session.swap(a(), b()).unwrap();
    let first_score = session.score();
    let old_max = session.grid().tokens().map(|t| t.id.raw()).max().unwrap();

    session.start();

    assert_eq!(session.score(), 0);
    assert_eq!(session.moves(), 0);
    assert_eq!(session.high_score(), first_score);
    assert!(session.grid().tokens().all(|t| t.id.raw() > old_max));
}

#[test]
fn test_start_is_valid_after_game_over() {
    let mut session = session_with(&THREE, config());
    session.end_session().unwrap();
    assert!(session.is_over());

    session.start();
    assert!(session.is_active());
    assert_eq!(session.end_reason(), None);
}

#[test]
fn test_commands_fail_once_over() {
    let mut session = session_with(&THREE, config());
    session.end_session().unwrap();

    assert_eq!(session.swap(a(), b()), Err(IllegalState::SessionOver.into()));
    assert_eq!(session.tick(), Err(IllegalState::SessionOver.into()));
    assert_eq!(session.end_session(), Err(IllegalState::SessionOver.into()));
    // Queries still answer.
    assert!(session.preview_swap(a(), b()).unwrap());
}

#[test]
fn test_high_score_seed_is_kept() {
    let mut session = session_with(&THREE, config()).with_high_score(10_000);
    session.swap(a(), b()).unwrap();
    assert!(session.score() < 10_000);
    assert_eq!(session.high_score(), 10_000);
}

// =============================================================================
// Selection
// =============================================================================

#[test]
fn test_select_then_deselect() {
    let mut session = session_with(&THREE, config());
    let pos = Position::new(2, 2);
    let id = session.grid().token_at(pos).unwrap().id;

    assert_eq!(session.select_token(pos), Ok(SelectOutcome::Selected(id)));
    assert_eq!(session.selected().map(|t| t.id), Some(id));
    assert!(session.grid().token_at(pos).unwrap().flags.selected);

    assert_eq!(session.select_token(pos), Ok(SelectOutcome::Deselected(id)));
    assert!(session.selected().is_none());
    assert!(!session.grid().token_at(pos).unwrap().flags.selected);
}

#[test]
fn test_selecting_far_token_moves_selection() {
    let mut session = session_with(&THREE, config());
    session.select_token(Position::new(0, 0)).unwrap();
    let far = Position::new(3, 3);
    let id = session.grid().token_at(far).unwrap().id;

    assert_eq!(session.select_token(far), Ok(SelectOutcome::Selected(id)));
    assert_eq!(session.selected().map(|t| t.position), Some(far));
    assert!(!session.grid().token_at(Position::new(0, 0)).unwrap().flags.selected);
    assert_eq!(session.moves(), 0);
}

#[test]
fn test_selecting_neighbour_swaps() {
    let mut session = session_with(&THREE, config());
    session.select_token(a()).unwrap();

    let outcome = session.select_token(b()).unwrap();

    let SelectOutcome::Swapped(SwapOutcome::Resolved { steps, .. }) = outcome else {
        panic!("expected a resolved swap, got {:?}", outcome);
    };
    assert_eq!(steps[0].score_delta, 30);
    assert_eq!(session.moves(), 1);
    assert!(session.selected().is_none());
}

#[test]
fn test_reverted_selection_swap_clears_selection() {
    let mut session = session_with(&THREE, config());
    let (x, y) = no_match();
    session.select_token(x).unwrap();

    let outcome = session.select_token(y).unwrap();

    assert_eq!(outcome, SelectOutcome::Swapped(SwapOutcome::Reverted));
    assert!(session.selected().is_none());
    assert_eq!(session.moves(), 0);
}

#[test]
fn test_select_out_of_bounds() {
    let mut session = session_with(&THREE, config());
    let pos = Position::new(5, 0);
    assert_eq!(
        session.select_token(pos),
        Err(InvalidOperation::OutOfBounds(pos).into())
    );
}

#[test]
fn test_select_by_id() {
    let mut session = session_with(&THREE, config());
    let id = session.grid().token_at(Position::new(1, 1)).unwrap().id;
    assert_eq!(session.select_token_id(id), Ok(SelectOutcome::Selected(id)));
}

// =============================================================================
// Swaps and Scoring
// =============================================================================

#[test]
fn test_matching_swap_scores_and_uses_a_move() {
    let mut session = session_with(&THREE, config());
    let outcome = session.swap(a(), b()).unwrap();

    let SwapOutcome::Resolved { steps, summary } = outcome else {
        panic!("expected a resolved swap");
    };
    assert_eq!(steps[0].score_delta, 30);
    assert_eq!(session.score(), summary.score);
    assert!(session.score() >= 30);
    assert_eq!(session.moves(), 1);
    assert_eq!(session.cascade_level(), 0);
    assert!(!session.is_processing());
    assert!(find_all_matches(session.grid()).is_empty());
}

#[test]
fn test_non_matching_swap_is_free() {
    let mut session = session_with(&THREE, config());
    let before = session.grid_snapshot();
    let (x, y) = no_match();

    assert_eq!(session.swap(x, y), Ok(SwapOutcome::Reverted));
    assert_eq!(session.moves(), 0);
    assert_eq!(session.score(), 0);
    assert_eq!(session.grid(), &before);
}

#[test]
fn test_rejected_swap_leaves_session_unchanged() {
    let mut session = session_with(&THREE, config());
    let before = session.grid_snapshot();

    let result = session.swap(Position::new(0, 0), Position::new(2, 0));

    assert!(matches!(
        result,
        Err(EngineError::InvalidOperation(InvalidOperation::NotAdjacent(_, _)))
    ));
    assert_eq!(session.grid(), &before);
    assert_eq!(session.moves(), 0);
}

#[test]
fn test_score_never_decreases() {
    let mut session = Session::new(EngineConfig::default().with_seed(12)).unwrap();
    session.start();
    let mut last = 0;
    while session.is_active() {
        let Some((x, y)) = session.hint() else {
            break;
        };
        session.swap(x, y).unwrap();
        assert!(session.score() >= last);
        assert!(session.high_score() >= session.score());
        last = session.score();
    }
}

#[test]
fn test_last_move_ends_the_session() {
    let mut session = session_with(&THREE, config().with_move_limit(1));
    session.swap(a(), b()).unwrap();

    assert!(session.is_over());
    assert_eq!(session.end_reason(), Some(EndReason::MovesExhausted));
    assert_eq!(session.moves_left(), 0);
}

#[test]
fn test_one_move_from_the_limit() {
    let session = session_with(&THREE, config());
    let mut snapshot = session.snapshot().unwrap();
    snapshot.moves = snapshot.config.move_limit - 1;
    let mut session = Session::from_snapshot(snapshot).unwrap();

    let (x, y) = no_match();
    session.swap(x, y).unwrap();
    assert!(session.is_active());

    session.swap(a(), b()).unwrap();
    assert!(session.is_over());
    assert!(!session.is_active());
    assert_eq!(session.moves(), 20);
}

#[test]
fn test_session_stays_active_before_last_move() {
    let mut session = session_with(&THREE, config().with_move_limit(2));
    session.swap(a(), b()).unwrap();
    assert!(session.is_active());
    assert_eq!(session.moves_left(), 1);
}

#[test]
fn test_preview_swap_never_mutates() {
    let session = session_with(&THREE, config());
    let before = session.grid_snapshot();
    assert!(session.preview_swap(a(), b()).unwrap());
    let (x, y) = no_match();
    assert!(!session.preview_swap(x, y).unwrap());
    assert_eq!(session.grid(), &before);
}

#[test]
fn test_hint_is_a_legal_swap() {
    let session = session_with(&THREE, config());
    let hint = session.hint().unwrap();
    assert!(session.legal_swaps().contains(&hint));
    assert!(session.preview_swap(hint.0, hint.1).unwrap());
}

#[test]
fn test_grid_snapshot_is_detached() {
    let mut session = session_with(&THREE, config());
    let snapshot = session.grid_snapshot();
    session.swap(a(), b()).unwrap();
    assert_eq!(
        snapshot.color_at(a()).map(|c| c.raw()),
        Some(1)
    );
    assert_ne!(&snapshot, session.grid());
}

// =============================================================================
// Clock
// =============================================================================

#[test]
fn test_tick_counts_down_to_time_up() {
    let mut session = session_with(&THREE, config().with_time_limit(2));

    assert_eq!(session.tick(), Ok(1));
    assert!(session.is_active());

    assert_eq!(session.tick(), Ok(0));
    assert!(session.is_over());
    assert_eq!(session.end_reason(), Some(EndReason::TimeUp));
}

#[test]
fn test_sync_clock_is_idempotent() {
    let mut session = session_with(&THREE, config());

    assert_eq!(session.sync_clock(Duration::from_secs(10)), Ok(50));
    assert_eq!(session.sync_clock(Duration::from_secs(10)), Ok(50));
    assert_eq!(session.sync_clock(Duration::from_millis(10_900)), Ok(50));
    assert_eq!(session.sync_clock(Duration::from_secs(5)), Ok(50));
    assert_eq!(session.sync_clock(Duration::from_secs(12)), Ok(48));
}

#[test]
fn test_sync_clock_past_the_limit_ends_session() {
    let mut session = session_with(&THREE, config());
    assert_eq!(session.sync_clock(Duration::from_secs(600)), Ok(0));
    assert!(session.is_over());
    assert_eq!(session.end_reason(), Some(EndReason::TimeUp));
}

// =============================================================================
// Stepped Resolution
// =============================================================================

fn stepped() -> EngineConfig {
    config().with_resolution_mode(ResolutionMode::Stepped)
}

#[test]
fn test_stepped_swap_stays_in_flight() {
    let mut session = session_with(&THREE, stepped());

    assert_eq!(session.swap(a(), b()), Ok(SwapOutcome::InFlight));
    assert!(session.is_processing());
    assert!(session.is_locked());
    assert_eq!(session.moves(), 1);
    assert_eq!(session.score(), 0);
}

#[test]
fn test_locked_session_refuses_input() {
    let mut session = session_with(&THREE, stepped());
    session.swap(a(), b()).unwrap();

    assert_eq!(
        session.swap(Position::new(3, 0), Position::new(3, 1)),
        Err(InvalidOperation::Locked.into())
    );
    assert_eq!(
        session.select_token(Position::new(3, 0)),
        Err(InvalidOperation::Locked.into())
    );
    assert!(matches!(
        session.snapshot(),
        Err(EngineError::IllegalState(IllegalState::InFlight))
    ));
}

#[test]
fn test_advance_runs_one_step_at_a_time() {
    let mut session = session_with(&THREE, stepped());
    session.swap(a(), b()).unwrap();

    let ResolutionStatus::Processing(first) = session.advance().unwrap() else {
        panic!("first advance should process");
    };
    assert_eq!(first.cascade_level, 0);
    assert_eq!(first.score_delta, 30);
    assert_eq!(session.score(), 30);
    assert_eq!(session.cascade_level(), 1);

    let summary = loop {
        match session.advance().unwrap() {
            ResolutionStatus::Processing(_) => {}
            ResolutionStatus::Complete(summary) => break summary,
        }
    };
    assert_eq!(summary.score, session.score());
    assert_eq!(session.cascade_level(), 0);
    assert!(!session.is_locked());
    assert_eq!(
        session.advance(),
        Err(IllegalState::NothingInFlight.into())
    );
}

#[test]
fn test_time_up_waits_for_cascade_to_settle() {
    let mut session = session_with(&THREE, stepped().with_time_limit(1));
    session.swap(a(), b()).unwrap();

    assert_eq!(session.tick(), Ok(0));
    assert!(session.is_active());
    assert!(session.is_processing());

    while session.is_processing() {
        session.advance().unwrap();
    }
    assert!(session.is_over());
    assert_eq!(session.end_reason(), Some(EndReason::TimeUp));
    assert!(session.score() >= 30);
}

#[test]
fn test_end_session_finishes_cascade_first() {
    let mut session = session_with(&THREE, stepped());
    session.swap(a(), b()).unwrap();

    session.end_session().unwrap();

    assert!(session.is_over());
    assert!(!session.is_processing());
    assert_eq!(session.end_reason(), Some(EndReason::Manual));
    assert!(session.score() >= 30);
    assert!(find_all_matches(session.grid()).is_empty());
}

// =============================================================================
// Events
// =============================================================================

#[test]
fn test_start_emits_started() {
    let mut session = Session::new(EngineConfig::default()).unwrap();
    session.start();
    assert_eq!(
        session.drain_events(),
        vec![SessionEvent::Started {
            dimension: 8,
            time_limit: 60,
            move_limit: 20
        }]
    );
    assert!(session.events().is_empty());
}

#[test]
fn test_swap_event_order() {
    let mut session = session_with(&THREE, config());
    session.select_token(a()).unwrap();
    session.select_token(b()).unwrap();

    let events = session.drain_events();
    assert!(matches!(events[0], SessionEvent::Selected { position, .. } if position == a()));
    assert!(matches!(events[1], SessionEvent::Deselected { .. }));
    assert!(matches!(events[2], SessionEvent::SwapCommitted { moves: 1, .. }));
    assert!(matches!(&events[3], SessionEvent::Step(step) if step.score_delta == 30));
    assert!(matches!(events[events.len() - 1], SessionEvent::Settled(_)));

    let step_total: u64 = events
        .iter()
        .filter_map(|e| match e {
            SessionEvent::Step(step) => Some(step.score_delta),
            _ => None,
        })
        .sum();
    assert_eq!(step_total, session.score());
}

#[test]
fn test_game_over_event_is_last() {
    let mut session = session_with(&THREE, config().with_move_limit(1));
    session.swap(a(), b()).unwrap();
    let events = session.drain_events();
    assert_eq!(
        events.last(),
        Some(&SessionEvent::Ended {
            reason: EndReason::MovesExhausted,
            score: session.score()
        })
    );
}

#[test]
fn test_undrained_events_stay_bounded() {
    let mut session = Session::new(EngineConfig::default().with_event_capacity(16)).unwrap();
    for _ in 0..1000 {
        session.start();
    }

    assert_eq!(session.events().len(), 16);
    assert_eq!(session.events().dropped(), 1000 - 16);
    assert!(session
        .events()
        .iter()
        .all(|e| matches!(e, SessionEvent::Started { .. })));
}

#[test]
fn test_default_event_capacity_bounds_long_games() {
    let mut session = Session::new(EngineConfig::default().with_seed(5)).unwrap();
    for _ in 0..50 {
        session.start();
        while session.is_active() {
            let Some((x, y)) = session.hint() else {
                break;
            };
            session.swap(x, y).unwrap();
        }
    }
    assert!(session.events().len() <= session.config().event_capacity);
}

#[test]
fn test_reverted_swap_event() {
    let mut session = session_with(&THREE, config());
    let (x, y) = no_match();
    session.swap(x, y).unwrap();
    assert_eq!(
        session.drain_events(),
        vec![SessionEvent::SwapReverted { a: x, b: y }]
    );
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_save_and_restore_mid_game() {
    let mut session = session_with(&THREE, config());
    session.swap(a(), b()).unwrap();
    session.tick().unwrap();

    let restored = Session::restore(&session.save().unwrap()).unwrap();

    assert_eq!(restored.grid(), session.grid());
    assert_eq!(restored.score(), session.score());
    assert_eq!(restored.moves(), 1);
    assert_eq!(restored.time_left(), 59);
    let ids: HashSet<u64> = restored.grid().tokens().map(|t| t.id.raw()).collect();
    assert_eq!(ids.len(), 25);
}
