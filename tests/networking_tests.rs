//! Session Lifecycle Integration Tests
//!
//! Create, reconnect, forfeit and close through [`BotSessionContext`]
//! against the in-memory service, including offline and slow backends.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use xfchess_session::game::ai::FirstLegalMover;
use xfchess_session::game::controller::InteractiveGameController;
use xfchess_session::game::error::ValidationError;
use xfchess_session::game::resources::HelpTier;
use xfchess_session::game::rules::{RuleEngine, ShakmatyEngine};
use xfchess_session::game::types::{MoveRecord, Side, Square};
use xfchess_session::networking::{
    InMemorySessionService, LifecycleAction, SessionConfig, SessionRecord,
};
use xfchess_session::session::{BotSessionContext, RECONNECTED_MESSAGE};

const USER: &str = "player";

fn mv(uci: &str) -> MoveRecord {
    MoveRecord::from_uci(uci).unwrap()
}

fn sq(s: &str) -> Square {
    s.parse().unwrap()
}

struct Setup {
    context: BotSessionContext,
    service: Arc<InMemorySessionService>,
    engine: Arc<dyn RuleEngine>,
}

fn setup() -> Setup {
    let engine: Arc<dyn RuleEngine> = Arc::new(ShakmatyEngine::new());
    let service = Arc::new(InMemorySessionService::new(engine.clone()));
    let controller = InteractiveGameController::new(engine.clone(), service.clone())
        .with_mover(Box::new(FirstLegalMover));
    let context =
        BotSessionContext::with_controller(USER, service.clone(), controller, SessionConfig::default());
    Setup {
        context,
        service,
        engine,
    }
}

fn stored_record(engine: &Arc<dyn RuleEngine>, moves: &[&str]) -> SessionRecord {
    SessionRecord {
        id: Uuid::new_v4(),
        user_id: USER.to_string(),
        config: SessionConfig {
            help_tier: HelpTier::Friendly,
            ..SessionConfig::default()
        },
        starting_fen: engine.serialize(&engine.initial()),
        moves: moves.iter().map(|uci| mv(uci)).collect(),
        created_at: Utc::now(),
    }
}

async fn settle(context: &mut BotSessionContext) {
    for _ in 0..500 {
        context.update(Duration::ZERO);
        if !context.is_busy() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    panic!("Lifecycle request never finished");
}

/// Run frames for roughly `wall` of real time
async fn run_for(context: &mut BotSessionContext, wall: Duration) {
    let frames = (wall.as_millis() / 5).max(1);
    for _ in 0..frames {
        context.update(Duration::ZERO);
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_starts_game() {
    let mut s = setup();
    s.context.create();
    assert!(s.context.status(LifecycleAction::Create).is_loading());

    settle(&mut s.context).await;

    let status = s.context.status(LifecycleAction::Create);
    assert_eq!(status.success(), Some("New game started."));
    assert!(s.context.controller().is_active());
    assert_eq!(s.service.session_count(), 1);
    assert_eq!(s.context.controller().turn(), Some(Side::White));
}

#[tokio::test]
async fn test_create_offline_leaves_no_session() {
    let mut s = setup();
    s.service.set_offline(true);

    s.context.create();
    settle(&mut s.context).await;

    let error = s.context.status(LifecycleAction::Create).error();
    assert!(
        error.is_some_and(|e| e.contains("unavailable")),
        "Unexpected error {:?}",
        error
    );
    assert!(!s.context.controller().is_active());
    assert_eq!(s.context.message(), error);

    s.context.dismiss(LifecycleAction::Create);
    assert!(s.context.status(LifecycleAction::Create).is_idle());
}

#[tokio::test]
async fn test_slow_create_stays_loading() {
    //! No client-side timeout: a request that never answers keeps loading
    let mut s = setup();
    s.service.set_latency(Duration::from_secs(30));

    s.context.create();
    run_for(&mut s.context, Duration::from_millis(50)).await;

    assert!(s.context.status(LifecycleAction::Create).is_loading());
    assert!(s.context.is_busy());
    assert!(!s.context.controller().is_active());
}

#[tokio::test]
async fn test_create_reissue_replaces_request() {
    let mut s = setup();
    s.service.set_latency(Duration::from_millis(20));

    s.context.create();
    s.context.create();
    settle(&mut s.context).await;

    assert_eq!(s.service.session_count(), 1);
    let session_id = s.context.controller().session_id().unwrap();
    assert!(s.service.record(session_id).is_some());
}

// ============================================================================
// Reconnect
// ============================================================================

#[tokio::test]
async fn test_reconnect_replays_stored_moves() {
    let mut s = setup();
    let record = stored_record(&s.engine, &["e2e4", "e7e5", "g1f3", "b8c6"]);
    s.service.insert_record(record.clone());

    s.context.reconnect().unwrap();
    settle(&mut s.context).await;

    let expected = s
        .engine
        .replay(&s.engine.initial(), &record.moves)
        .unwrap();
    let controller = s.context.controller();
    assert_eq!(controller.session_id(), Some(record.id));
    assert_eq!(controller.fen(), Some(expected.fen().to_string()));
    assert_eq!(controller.turn(), Some(Side::White));
    assert!(controller.is_player_turn());
    assert_eq!(
        s.context.status(LifecycleAction::Reconnect).success(),
        Some(RECONNECTED_MESSAGE)
    );
}

#[tokio::test]
async fn test_reconnect_without_active_game_returns_to_idle() {
    let mut s = setup();

    s.context.reconnect().unwrap();
    settle(&mut s.context).await;

    assert!(s.context.status(LifecycleAction::Reconnect).is_idle());
    assert!(!s.context.controller().is_active());
    assert_eq!(s.context.message(), None);
}

#[tokio::test]
async fn test_reconnect_with_corrupt_history_reports_error() {
    let mut s = setup();
    s.service
        .insert_record(stored_record(&s.engine, &["e2e4", "e2e4"]));

    s.context.reconnect().unwrap();
    settle(&mut s.context).await;

    let error = s.context.status(LifecycleAction::Reconnect).error();
    assert!(error.is_some());
    assert_eq!(s.context.message(), error);
    assert!(!s.context.controller().is_active());
}

#[tokio::test]
async fn test_reconnect_refused_mid_game_keeps_budgets() {
    //! Spent undos stay spent: reconnecting can't reload the running game
    let mut s = setup();
    s.context.set_tier(HelpTier::Friendly).unwrap();
    s.context.create();
    settle(&mut s.context).await;

    for _ in 0..3 {
        s.context.on_drop(sq("e2"), sq("e4")).unwrap();
        s.context.update(Duration::from_millis(800));
        s.context.undo_previous_move().unwrap();
    }
    let session_id = s.context.controller().session_id();

    assert_eq!(s.context.reconnect(), Err(ValidationError::GameInProgress));
    assert!(!s.context.is_busy());
    assert_eq!(
        s.context.message(),
        Some("Finish or close your current game first.")
    );

    s.context.on_drop(sq("e2"), sq("e4")).unwrap();
    s.context.update(Duration::from_millis(800));
    assert_eq!(
        s.context.undo_previous_move(),
        Err(ValidationError::NoUndosRemaining)
    );
    assert_eq!(s.context.controller().session_id(), session_id);
}

// ============================================================================
// Mount
// ============================================================================

#[tokio::test]
async fn test_mount_without_stored_game_creates_one() {
    let mut s = setup();

    s.context.mount();
    settle(&mut s.context).await;

    assert!(s.context.status(LifecycleAction::Reconnect).is_idle());
    assert_eq!(
        s.context.status(LifecycleAction::Create).success(),
        Some("New game started.")
    );
    assert!(s.context.controller().is_active());
    assert_eq!(s.service.session_count(), 1);
}

#[tokio::test]
async fn test_mount_resumes_stored_game() {
    let mut s = setup();
    let record = stored_record(&s.engine, &["e2e4", "e7e5"]);
    s.service.insert_record(record.clone());

    s.context.mount();
    settle(&mut s.context).await;

    assert_eq!(s.context.controller().session_id(), Some(record.id));
    assert_eq!(s.context.controller().history(), record.moves.as_slice());
    assert!(s.context.status(LifecycleAction::Create).is_idle());
    assert_eq!(s.service.session_count(), 1);
}

#[tokio::test]
async fn test_plain_reconnect_after_mount_does_not_create() {
    let mut s = setup();
    s.service.set_offline(true);
    s.context.mount();
    settle(&mut s.context).await;
    assert!(s.context.status(LifecycleAction::Reconnect).error().is_some());

    s.service.set_offline(false);
    s.context.reconnect().unwrap();
    settle(&mut s.context).await;

    assert!(!s.context.controller().is_active());
    assert!(s.context.status(LifecycleAction::Create).is_idle());
    assert_eq!(s.service.session_count(), 0);
}

// ============================================================================
// Forfeit / Close
// ============================================================================

#[tokio::test]
async fn test_forfeit_ends_game() {
    let mut s = setup();
    s.context.create();
    settle(&mut s.context).await;
    let session_id = s.context.controller().session_id().unwrap();

    s.context.forfeit().unwrap();
    settle(&mut s.context).await;

    assert_eq!(
        s.context.status(LifecycleAction::Forfeit).success(),
        Some("Game forfeited.")
    );
    assert!(!s.context.controller().is_active());
    assert!(s.service.record(session_id).is_none());
}

#[tokio::test]
async fn test_failed_forfeit_can_be_retried() {
    let mut s = setup();
    s.context.create();
    settle(&mut s.context).await;
    s.service.set_offline(true);

    s.context.forfeit().unwrap();
    settle(&mut s.context).await;
    assert!(s.context.status(LifecycleAction::Forfeit).error().is_some());
    assert!(s.context.controller().is_active(), "Game survives a failed forfeit");

    s.service.set_offline(false);
    s.context.forfeit().unwrap();
    settle(&mut s.context).await;
    assert!(s.context.status(LifecycleAction::Forfeit).success().is_some());
    assert!(!s.context.controller().is_active());
}

#[tokio::test]
async fn test_close_ends_game() {
    let mut s = setup();
    s.context.create();
    settle(&mut s.context).await;

    s.context.close().unwrap();
    settle(&mut s.context).await;

    assert_eq!(
        s.context.status(LifecycleAction::Close).success(),
        Some("Game closed.")
    );
    assert!(!s.context.controller().is_active());
    assert_eq!(s.service.session_count(), 0);
}

#[tokio::test]
async fn test_forfeit_and_close_need_a_game() {
    let mut s = setup();

    assert_eq!(s.context.forfeit(), Err(ValidationError::NoActiveSession));
    assert_eq!(s.context.close(), Err(ValidationError::NoActiveSession));
    assert!(!s.context.is_busy());
}

#[tokio::test]
async fn test_late_forfeit_leaves_newer_game_alone() {
    //! A forfeit answered after a new game loaded must not end the new game
    let mut s = setup();
    s.context.create();
    settle(&mut s.context).await;

    s.service.set_latency(Duration::from_millis(40));
    s.context.forfeit().unwrap();
    tokio::task::yield_now().await;
    s.service.set_latency(Duration::ZERO);
    s.context.create();
    settle(&mut s.context).await;

    let newer = s.context.controller().session_id();
    assert!(newer.is_some());
    assert!(s.context.status(LifecycleAction::Forfeit).success().is_some());
    assert_eq!(s.context.controller().session_id(), newer);
    assert!(s.context.controller().is_active());
    assert_eq!(s.context.message(), None);
}
