//! Game Flow Integration Tests
//!
//! Full flows through the session contexts:
//! - Solving and failing puzzles
//! - Puzzle hints, resets and help tiers
//! - Bot games with undo and hint budgets

use std::sync::Arc;
use std::time::Duration;

use xfchess_session::game::ai::FirstLegalMover;
use xfchess_session::game::controller::{DropOutcome, InteractiveGameController};
use xfchess_session::game::error::ValidationError;
use xfchess_session::game::puzzle::{
    PuzzleCatalog, PuzzleDifficulty, PuzzleResult, PuzzleState, PuzzleTiming, SubmitOutcome,
    INCORRECT_MESSAGE, SOLVED_MESSAGE,
};
use xfchess_session::game::resources::{Allowance, HelpTier};
use xfchess_session::game::rules::{RuleEngine, ShakmatyEngine};
use xfchess_session::game::types::{MoveRecord, Side, Square};
use xfchess_session::networking::{
    InMemorySessionService, LifecycleAction, SessionConfig,
};
use xfchess_session::session::{BotSessionContext, PuzzleSessionContext};

const REPLY_DELAY: Duration = Duration::from_millis(1000);

/// Legal's mate, solver plays White and needs three moves
const LEGALS_MATE: &str = r#"[
  {
    "id": "legal",
    "starting_fen": "rn1qkbnr/ppp2ppp/3p4/4p3/2B1P1b1/2N2N2/PPPP1PPP/R1BQK2R b KQkq - 3 4",
    "solution_moves": ["g7g6", "f3e5", "g4d1", "c4f7", "e8e7", "c3d5"],
    "difficulty": "easy"
  }
]"#;

fn mv(uci: &str) -> MoveRecord {
    MoveRecord::from_uci(uci).unwrap()
}

fn sq(s: &str) -> Square {
    s.parse().unwrap()
}

fn engine() -> Arc<dyn RuleEngine> {
    Arc::new(ShakmatyEngine::new())
}

fn puzzle_context(tier: HelpTier) -> PuzzleSessionContext {
    let engine = engine();
    let catalog = PuzzleCatalog::from_json(LEGALS_MATE, engine.as_ref()).unwrap();
    PuzzleSessionContext::new(engine, Arc::new(catalog), tier, PuzzleTiming::default())
}

async fn settle_puzzle(context: &mut PuzzleSessionContext) {
    for _ in 0..500 {
        context.update(Duration::ZERO);
        if !context.is_busy() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    panic!("Puzzle request never finished");
}

/// Fetch the easy puzzle and play its opening reply
async fn started_puzzle(tier: HelpTier) -> PuzzleSessionContext {
    let mut context = puzzle_context(tier);
    context.create(PuzzleDifficulty::Easy);
    settle_puzzle(&mut context).await;
    context.update(Duration::ZERO);
    assert_eq!(
        context.machine().state(),
        PuzzleState::AwaitingSolverMove,
        "Opening reply should have been played"
    );
    context
}

async fn settle_bot(context: &mut BotSessionContext) {
    for _ in 0..500 {
        context.update(Duration::ZERO);
        if !context.is_busy() && !context.controller().is_hint_pending() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    panic!("Bot session request never finished");
}

async fn bot_game(tier: HelpTier) -> (BotSessionContext, Arc<InMemorySessionService>) {
    let engine = engine();
    let service = Arc::new(InMemorySessionService::new(engine.clone()));
    let controller = InteractiveGameController::new(engine, service.clone())
        .with_mover(Box::new(FirstLegalMover));
    let config = SessionConfig {
        help_tier: tier,
        ..SessionConfig::default()
    };
    let mut context = BotSessionContext::with_controller("player", service.clone(), controller, config);

    context.create();
    settle_bot(&mut context).await;
    assert!(context.controller().is_active(), "Game should be created");
    (context, service)
}

// ============================================================================
// Puzzle Solving Tests
// ============================================================================

#[tokio::test]
async fn test_puzzle_solved_end_to_end() {
    let mut context = started_puzzle(HelpTier::Friendly).await;
    assert_eq!(context.machine().orientation(), Side::White);

    for (solver, reply) in [("f3e5", true), ("c4f7", true), ("c3d5", false)] {
        let outcome = context.submit_move(mv(solver)).unwrap();
        if reply {
            assert_eq!(outcome, SubmitOutcome::Correct);
            assert!(context.update(REPLY_DELAY), "Scripted reply after {}", solver);
        } else {
            assert_eq!(outcome, SubmitOutcome::Solved);
        }
    }

    assert_eq!(
        context.machine().state(),
        PuzzleState::Completed(PuzzleResult::Success)
    );
    assert_eq!(context.message(), Some(SOLVED_MESSAGE));
}

#[tokio::test]
async fn test_puzzle_wrong_third_move_fails() {
    //! Two correct moves then a wrong one: failure, position not advanced
    let mut context = started_puzzle(HelpTier::Friendly).await;

    context.submit_move(mv("f3e5")).unwrap();
    context.update(REPLY_DELAY);
    context.submit_move(mv("c4f7")).unwrap();
    context.update(REPLY_DELAY);
    let fen_before = context.machine().fen();

    assert_eq!(
        context.submit_move(mv("c3b5")),
        Ok(SubmitOutcome::Incorrect)
    );
    assert_eq!(
        context.machine().state(),
        PuzzleState::Completed(PuzzleResult::Failure)
    );
    assert_eq!(context.machine().fen(), fen_before);
    assert_eq!(context.message(), Some(INCORRECT_MESSAGE));

    assert_eq!(
        context.submit_move(mv("c3d5")),
        Err(ValidationError::PuzzleCompleted)
    );
}

#[tokio::test]
async fn test_puzzle_move_during_reply_delay_refused() {
    let mut context = started_puzzle(HelpTier::Friendly).await;
    context.submit_move(mv("f3e5")).unwrap();

    assert_eq!(
        context.submit_move(mv("c4f7")),
        Err(ValidationError::AwaitingReply)
    );
    assert_eq!(context.machine().current_index(), 2);
}

#[tokio::test]
async fn test_puzzle_reset_is_idempotent() {
    let mut context = started_puzzle(HelpTier::Friendly).await;
    context.submit_move(mv("f3e5")).unwrap();

    context.reset_puzzle().unwrap();
    let after_one = (context.machine().state(), context.machine().fen());
    context.reset_puzzle().unwrap();
    let after_two = (context.machine().state(), context.machine().fen());

    assert_eq!(after_one, after_two);
    assert_eq!(context.machine().current_index(), 0);

    context.update(REPLY_DELAY * 2);
    assert_eq!(
        context.machine().current_index(),
        1,
        "Only the opening reply is replayed"
    );
}

#[tokio::test]
async fn test_puzzle_hint_costs_budget() {
    let mut context = started_puzzle(HelpTier::Friendly).await;

    assert_eq!(context.request_hint(), Ok([sq("f3"), sq("e5")]));
    assert_eq!(context.hint(), Some([sq("f3"), sq("e5")]));
    assert_eq!(context.help().remaining_hints(), Allowance::Limited(2));

    context.submit_move(mv("f3e5")).unwrap();
    assert_eq!(context.hint(), None, "Hint cleared by the move");
    assert_eq!(
        context.request_hint(),
        Err(ValidationError::AwaitingReply)
    );

    context.reset_puzzle().unwrap();
    assert_eq!(
        context.help().remaining_hints(),
        Allowance::Limited(2),
        "Reset does not refill hints"
    );
}

#[tokio::test]
async fn test_puzzle_hint_refused_on_challenge() {
    let mut context = started_puzzle(HelpTier::Challenge).await;

    assert_eq!(
        context.request_hint(),
        Err(ValidationError::NoHintsRemaining)
    );
    assert_eq!(context.message(), Some("No hints remaining."));
}

#[tokio::test]
async fn test_puzzle_tier_locked_while_solving() {
    let mut context = started_puzzle(HelpTier::Challenge).await;

    assert_eq!(
        context.set_tier(HelpTier::Assisted),
        Err(ValidationError::TierLocked)
    );

    context.close();
    assert_eq!(context.machine().state(), PuzzleState::Idle);
    assert_eq!(
        context.status(LifecycleAction::Close).success(),
        Some("Puzzle closed.")
    );
    context.set_tier(HelpTier::Assisted).unwrap();
    assert!(context.help().remaining_hints().is_unlimited());
}

#[tokio::test]
async fn test_puzzle_create_without_matching_puzzle() {
    let mut context = puzzle_context(HelpTier::Friendly);
    context.create(PuzzleDifficulty::Hard);
    settle_puzzle(&mut context).await;

    assert_eq!(context.machine().state(), PuzzleState::Idle);
    let error = context.status(LifecycleAction::Create).error();
    assert_eq!(error, Some("No hard puzzles available"));
    assert_eq!(context.message(), error);
}

// ============================================================================
// Bot Game Tests
// ============================================================================

#[tokio::test]
async fn test_bot_game_player_move_and_reply() {
    let (mut context, _service) = bot_game(HelpTier::Friendly).await;

    assert_eq!(
        context.on_drop(sq("e2"), sq("e4")),
        Ok(DropOutcome::Moved(mv("e2e4")))
    );
    context.update(Duration::from_millis(800));

    assert_eq!(context.controller().history().len(), 2);
    assert!(context.controller().is_player_turn());
}

#[tokio::test]
async fn test_bot_game_undo_refused_on_challenge() {
    let (mut context, _service) = bot_game(HelpTier::Challenge).await;
    context.on_drop(sq("d2"), sq("d4")).unwrap();
    context.update(Duration::from_millis(800));
    let fen_before = context.controller().fen();

    assert_eq!(
        context.undo_previous_move(),
        Err(ValidationError::NoUndosRemaining)
    );
    assert_eq!(context.controller().fen(), fen_before);
    assert_eq!(context.message(), Some("No undos remaining."));
}

#[tokio::test]
async fn test_bot_game_assisted_help_never_runs_out() {
    let (mut context, _service) = bot_game(HelpTier::Assisted).await;

    for round in 0..5 {
        context.request_hint().unwrap();
        settle_bot(&mut context).await;
        assert!(context.controller().hint().is_some(), "Hint {} should arrive", round);

        context.on_drop(sq("e2"), sq("e4")).unwrap();
        context.update(Duration::from_millis(800));
        context.undo_previous_move().unwrap();
    }

    let help = context.controller().help();
    assert!(help.remaining_hints().is_unlimited());
    assert!(help.remaining_undos().is_unlimited());
}

#[tokio::test]
async fn test_bot_game_tier_change_applies_to_next_game() {
    let (mut context, _service) = bot_game(HelpTier::Friendly).await;

    assert_eq!(
        context.set_tier(HelpTier::Challenge),
        Err(ValidationError::TierLocked)
    );

    context.close().unwrap();
    settle_bot(&mut context).await;
    context.set_tier(HelpTier::Challenge).unwrap();
    assert_eq!(context.default_config().help_tier, HelpTier::Challenge);

    context.create();
    settle_bot(&mut context).await;
    assert_eq!(
        context.controller().help().remaining_undos(),
        Allowance::Limited(0)
    );
}
