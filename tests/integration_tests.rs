//! Integration tests for full game sessions driven through the public API

use std::iter::{repeat, Repeat};

use falling_blocks::core::{HighScores, Phase, RandomizerKind, Session, SessionConfig};
use falling_blocks::types::{Cell, GameAction, PieceKind, CLEAR_FLASH_MS, STAGE_WIDTH};

fn session_of(kind: PieceKind) -> Session<Repeat<PieceKind>> {
    let mut session = Session::with_pieces(repeat(kind), 10);
    session.reset();
    session
}

/// Move the active piece so its bounding box starts at `x`, then hard drop
fn drop_at<R: Iterator<Item = PieceKind>>(session: &mut Session<R>, x: i8) {
    let current = session.active().expect("active piece").x;
    let dir = if x < current { -1 } else { 1 };
    for _ in 0..(x - current).abs() {
        assert!(session.move_horizontal(dir));
    }
    assert!(session.hard_drop());
}

/// Five O pieces side by side fill the two bottom rows
fn fill_bottom_two_rows<R: Iterator<Item = PieceKind>>(session: &mut Session<R>) {
    for x in [0, 2, 4, 6, 8] {
        drop_at(session, x);
    }
}

fn falling_cells<R: Iterator<Item = PieceKind>>(session: &Session<R>) -> usize {
    session
        .stage()
        .cells()
        .iter()
        .filter(|c| matches!(c, Cell::Falling(_)))
        .count()
}

#[test]
fn test_game_lifecycle() {
    let mut session = Session::new(&SessionConfig::default());
    assert_eq!(session.phase(), Phase::NotStarted);
    assert!(!session.hard_drop());

    // The drop key doubles as START.
    assert!(session.apply_action(GameAction::HardDrop));
    assert_eq!(session.phase(), Phase::Active);
    assert!(session.active().is_some());
    assert!(!session.game_over());
    assert_eq!(session.score(), 0);
}

#[test]
fn test_o_hard_drop_on_empty_stage() {
    let mut session = session_of(PieceKind::O);
    assert!(session.hard_drop());

    assert!(session.clearing_rows().is_empty());
    assert!(!session.game_over());
    assert_eq!(session.stage().merged_count(), 4);
    for (x, y) in [(3, 18), (4, 18), (3, 19), (4, 19)] {
        assert_eq!(session.stage().get(x, y), Some(Cell::Merged(PieceKind::O)));
    }

    // A fresh piece is falling at the spawn point.
    let active = session.active().unwrap();
    assert_eq!((active.x, active.y), (3, 0));
    assert_eq!(falling_cells(&session), 4);
}

#[test]
fn test_two_row_clear_flash_and_flush() {
    let mut session = session_of(PieceKind::O);
    fill_bottom_two_rows(&mut session);

    assert_eq!(session.phase(), Phase::Clearing);
    assert_eq!(session.clearing_rows(), &[18, 19]);
    assert_eq!(session.drop_interval_ms(), None);
    assert!(session.active().is_none());

    // Input is ignored while the rows flash.
    let before = session.snapshot();
    assert!(!session.apply_action(GameAction::MoveLeft));
    assert!(!session.apply_action(GameAction::RotateCw));
    assert!(!session.apply_action(GameAction::Hold));
    assert!(!session.apply_action(GameAction::SoftDropRelease));
    assert_eq!(session.snapshot(), before);

    assert!(!session.tick(CLEAR_FLASH_MS - 16));
    assert_eq!(session.phase(), Phase::Clearing);
    assert!(session.tick(16));

    assert_eq!(session.phase(), Phase::Active);
    assert_eq!(session.rows_cleared(), 2);
    assert_eq!(session.score(), 100);
    assert_eq!(session.stage().merged_count(), 0);
    assert_eq!(session.drop_interval_ms(), Some(900));
    assert!(session.active().is_some());
}

#[test]
fn test_level_up_speeds_up_gravity() {
    let mut session = session_of(PieceKind::O);
    for _ in 0..5 {
        fill_bottom_two_rows(&mut session);
        assert!(session.flush_rows());
    }
    assert_eq!(session.rows_cleared(), 10);
    assert_eq!(session.level(), 1);
    // Each two-row clear was scored at level 0.
    assert_eq!(session.score(), 500);
    assert_eq!(session.drop_interval_ms(), Some(800));

    fill_bottom_two_rows(&mut session);
    session.flush_rows();
    assert_eq!(session.score(), 500 + 200);
}

#[test]
fn test_hold_twice_is_a_no_op() {
    let pieces = [PieceKind::T, PieceKind::S, PieceKind::Z].into_iter().cycle();
    let mut session = Session::with_pieces(pieces, 10);
    session.reset();
    assert_eq!(session.active().unwrap().kind, PieceKind::T);

    assert!(session.hold());
    assert_eq!(session.held_piece(), Some(PieceKind::T));
    assert_eq!(session.active().unwrap().kind, PieceKind::S);
    assert!(!session.can_hold());

    let before = session.snapshot();
    assert!(!session.hold());
    assert_eq!(session.snapshot(), before);
}

#[test]
fn test_hold_swaps_after_next_spawn() {
    let pieces = [PieceKind::T, PieceKind::S, PieceKind::Z].into_iter().cycle();
    let mut session = Session::with_pieces(pieces, 10);
    session.reset();

    session.hold();
    session.hard_drop();
    assert!(session.can_hold());
    assert_eq!(session.active().unwrap().kind, PieceKind::Z);

    assert!(session.hold());
    let active = session.active().unwrap();
    assert_eq!(active.kind, PieceKind::T);
    assert_eq!((active.x, active.y), (3, -1));
    assert_eq!(session.held_piece(), Some(PieceKind::Z));
    assert!(!session.can_hold());
    assert_eq!(falling_cells(&session), 4);
}

#[test]
fn test_rejected_moves_leave_state_unchanged() {
    let mut session = session_of(PieceKind::O);
    while session.move_horizontal(-1) {}
    assert_eq!(session.active().unwrap().x, 0);

    let before = session.snapshot();
    assert!(!session.move_horizontal(-1));
    assert_eq!(session.snapshot(), before);

    while session.move_horizontal(1) {}
    assert_eq!(session.active().unwrap().x, STAGE_WIDTH as i8 - 2);
}

#[test]
fn test_rotation_against_wall_is_rejected() {
    let mut session = session_of(PieceKind::I);
    // Vertical I hugging the left wall; the horizontal state would stick out.
    while session.move_horizontal(-1) {}
    session.soft_drop_tick();
    let before = session.snapshot();
    assert!(!session.rotate(1));
    assert_eq!(session.snapshot(), before);
}

#[test]
fn test_soft_drop_pauses_and_release_resumes_gravity() {
    let mut session = session_of(PieceKind::T);
    let y = session.active().unwrap().y;

    assert!(session.apply_action(GameAction::SoftDrop));
    assert_eq!(session.active().unwrap().y, y + 1);
    assert_eq!(session.drop_interval_ms(), None);

    // Held: gravity does nothing.
    assert!(!session.tick(5_000));
    assert_eq!(session.active().unwrap().y, y + 1);

    assert!(session.apply_action(GameAction::SoftDropRelease));
    assert_eq!(session.drop_interval_ms(), Some(900));
    assert!(session.tick(900));
    assert_eq!(session.active().unwrap().y, y + 2);
}

#[test]
fn test_gravity_locks_piece_at_floor() {
    let mut session = session_of(PieceKind::O);
    for _ in 0..18 {
        assert!(session.tick(900));
    }
    assert_eq!(session.stage().merged_count(), 0);
    session.tick(900);
    assert_eq!(session.stage().merged_count(), 4);
    assert_eq!(session.active().unwrap().y, 0);
}

#[test]
fn test_topping_out_records_high_score() {
    let mut session = session_of(PieceKind::O);
    fill_bottom_two_rows(&mut session);
    session.flush_rows();
    assert_eq!(session.score(), 100);

    // Stack O pieces in the spawn columns until the next one can't appear.
    for _ in 0..10 {
        session.hard_drop();
    }
    assert!(session.game_over());
    assert_eq!(session.phase(), Phase::GameOver);
    assert_eq!(session.drop_interval_ms(), None);
    assert_eq!(session.high_scores().scores(), &[100]);

    // Nothing moves after game over.
    let before = session.snapshot();
    for action in [GameAction::MoveLeft, GameAction::RotateCw, GameAction::Hold] {
        assert!(!session.apply_action(action));
    }
    assert!(!session.tick(10_000));
    assert_eq!(session.snapshot(), before);

    // Restart keeps the ranking.
    assert!(session.apply_action(GameAction::HardDrop));
    assert_eq!(session.phase(), Phase::Active);
    assert_eq!(session.score(), 0);
    assert_eq!(session.stage().merged_count(), 0);
    assert_eq!(session.high_scores().scores(), &[100]);
}

#[test]
fn test_restored_ranking_survives_a_game() {
    let restored: HighScores = serde_json::from_str("[150, 60]").unwrap();
    let mut session = Session::with_pieces(repeat(PieceKind::O), 10).with_high_scores(restored);
    session.reset();
    assert_eq!(session.high_scores().scores(), &[150, 60]);

    fill_bottom_two_rows(&mut session);
    session.flush_rows();
    for _ in 0..10 {
        session.hard_drop();
    }
    assert!(session.game_over());
    assert_eq!(session.high_scores().scores(), &[150, 100, 60]);
    assert_eq!(
        serde_json::to_string(session.high_scores()).unwrap(),
        "[150,100,60]"
    );
}

#[test]
fn test_restart_mid_game_resets_counters() {
    let mut session = session_of(PieceKind::O);
    fill_bottom_two_rows(&mut session);
    session.flush_rows();
    session.hold();

    assert!(session.apply_action(GameAction::Restart));
    assert_eq!(session.score(), 0);
    assert_eq!(session.rows_cleared(), 0);
    assert_eq!(session.held_piece(), None);
    assert!(session.can_hold());
    assert_eq!(session.drop_interval_ms(), Some(900));
}

#[test]
fn test_random_play_keeps_stage_consistent() {
    let config = SessionConfig {
        seed: 2024,
        randomizer: RandomizerKind::Bag,
        ..SessionConfig::default()
    };
    let mut session = Session::new(&config);
    session.reset();

    let actions = [
        GameAction::MoveLeft,
        GameAction::RotateCw,
        GameAction::MoveRight,
        GameAction::MoveRight,
        GameAction::RotateCcw,
        GameAction::SoftDrop,
        GameAction::Hold,
        GameAction::HardDrop,
    ];

    let mut locks = 0u32;
    for step in 0..2_000usize {
        if session.game_over() {
            break;
        }
        let action = actions[(step * 7 + step / 3) % actions.len()];
        let merged_before = session.stage().merged_count();
        session.apply_action(action);
        session.tick(16);
        if session.stage().merged_count() > merged_before {
            locks += 1;
        }

        match session.phase() {
            Phase::Active => {
                let active = session.active().expect("active piece while playing");
                let visible = active.cells().filter(|&(_, y)| y >= 0).count();
                assert_eq!(falling_cells(&session), visible);
            }
            Phase::Clearing => {
                assert_eq!(session.drop_interval_ms(), None);
                assert_eq!(falling_cells(&session), 0);
                session.flush_rows();
            }
            Phase::GameOver => assert!(session.drop_interval_ms().is_none()),
            Phase::NotStarted => unreachable!(),
        }
        assert_eq!(session.level(), session.rows_cleared() / 10);
    }
    assert!(locks > 0);
}
