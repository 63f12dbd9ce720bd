//! Rule engine adapter tests
//!
//! # Test Organization
//!
//! - `test_load_*` - FEN parsing and serialization
//! - `test_apply_*` - Move application and rejection
//! - `test_status_*` - Terminal state detection
//! - `test_notation_*` - Castling/promotion notation mapping

use super::*;
use crate::game::error::EngineError;
use crate::game::types::{MoveRecord, PieceKind, Side};

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn mv(uci: &str) -> MoveRecord {
    MoveRecord::from_uci(uci).unwrap()
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_load_initial_position() {
    let engine = ShakmatyEngine::new();
    let initial = engine.initial();

    assert_eq!(engine.serialize(&initial), START_FEN);
    assert_eq!(engine.turn(&initial), Side::White, "White should move first");
    assert_eq!(engine.load(START_FEN).unwrap(), initial);
}

#[test]
fn test_load_rejects_garbage() {
    let engine = ShakmatyEngine::new();
    let err = engine.load("not a fen").unwrap_err();
    assert!(matches!(err, EngineError::InvalidFen { .. }));
}

// ============================================================================
// Applying moves
// ============================================================================

#[test]
fn test_apply_legal_move_switches_turn() {
    let engine = ShakmatyEngine::new();
    let after = engine.apply_move(&engine.initial(), &mv("e2e4")).unwrap();

    assert_eq!(engine.turn(&after), Side::Black);
    assert!(after.fen().starts_with("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b"));
}

#[test]
fn test_apply_illegal_move_is_rejected() {
    let engine = ShakmatyEngine::new();
    let initial = engine.initial();

    let err = engine.apply_move(&initial, &mv("e2e5")).unwrap_err();
    assert!(matches!(err, EngineError::IllegalMove { .. }));

    // Black can't move first either
    assert!(engine.apply_move(&initial, &mv("e7e5")).is_err());
}

#[test]
fn test_apply_does_not_touch_input_position() {
    let engine = ShakmatyEngine::new();
    let initial = engine.initial();
    let snapshot = initial.clone();

    let _ = engine.apply_move(&initial, &mv("g1f3")).unwrap();
    assert_eq!(initial, snapshot, "Positions are replaced, never mutated");
}

#[test]
fn test_legal_moves_from_start() {
    let engine = ShakmatyEngine::new();
    let initial = engine.initial();

    assert_eq!(engine.legal_moves(&initial).len(), 20, "White should have 20 moves");

    let knight_moves = engine.legal_moves_from(&initial, "b1".parse().unwrap());
    assert_eq!(knight_moves.len(), 2, "Knight on b1 should have 2 moves");
}

#[test]
fn test_replay_reports_failing_index() {
    let engine = ShakmatyEngine::new();
    let moves = [mv("e2e4"), mv("e7e5"), mv("e4e5")];

    let (index, _) = engine.replay(&engine.initial(), &moves).unwrap_err();
    assert_eq!(index, 2, "Third move is blocked by the e5 pawn");
}

// ============================================================================
// Status detection
// ============================================================================

#[test]
fn test_status_fools_mate() {
    let engine = ShakmatyEngine::new();
    let moves = [mv("f2f3"), mv("e7e5"), mv("g2g4"), mv("d8h4")];
    let mated = engine.replay(&engine.initial(), &moves).unwrap();

    assert_eq!(
        engine.status(&mated),
        GameStatus::Checkmate {
            winner: Side::Black
        }
    );
    assert!(engine.legal_moves(&mated).is_empty());
}

#[test]
fn test_status_stalemate() {
    let engine = ShakmatyEngine::new();
    let stalemate = engine.load("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    assert_eq!(engine.status(&stalemate), GameStatus::Stalemate);
}

#[test]
fn test_status_insufficient_material_is_draw() {
    let engine = ShakmatyEngine::new();
    let bare_kings = engine.load("8/8/4k3/8/8/4K3/8/8 w - - 0 1").unwrap();
    assert_eq!(engine.status(&bare_kings), GameStatus::Draw);
}

#[test]
fn test_status_ongoing_at_start() {
    let engine = ShakmatyEngine::new();
    assert_eq!(engine.status(&engine.initial()), GameStatus::Ongoing);
    assert!(!GameStatus::Ongoing.is_terminal());
}

// ============================================================================
// Notation mapping
// ============================================================================

#[test]
fn test_notation_castling_uses_king_destination() {
    let engine = ShakmatyEngine::new();
    let ready = engine
        .load("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1")
        .unwrap();

    let legal = engine.legal_moves(&ready);
    assert!(legal.contains(&mv("e1g1")), "Kingside castle is e1g1");
    assert!(legal.contains(&mv("e1c1")), "Queenside castle is e1c1");
    assert!(!legal.contains(&mv("e1h1")), "King-takes-rook form is never exposed");

    let castled = engine.apply_move(&ready, &mv("e1g1")).unwrap();
    assert!(castled.fen().starts_with("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R4RK1 b"));
}

#[test]
fn test_notation_promotion_moves() {
    let engine = ShakmatyEngine::new();
    let ready = engine.load("8/P6k/8/8/8/8/8/K7 w - - 0 1").unwrap();
    let from = "a7".parse().unwrap();
    let to = "a8".parse().unwrap();

    assert!(engine.requires_promotion(&ready, from, to));
    assert!(engine.apply_move(&ready, &MoveRecord::new(from, to)).is_err());

    let promoted = engine
        .apply_move(&ready, &MoveRecord::with_promotion(from, to, PieceKind::Knight))
        .unwrap();
    assert!(promoted.fen().starts_with("N7/7k/"));
}
