//! Integration tests for XFChess core persistence
//!
//! Settings files and puzzle catalog files on disk, and how their failures
//! surface to the binary.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use xfchess_session::core::{load_settings_from, save_settings_to, ClientSettings, CoreError};
use xfchess_session::game::ai::BotDifficulty;
use xfchess_session::game::puzzle::{PuzzleCatalog, PuzzleDifficulty};
use xfchess_session::game::resources::HelpTier;
use xfchess_session::game::rules::{RuleEngine, ShakmatyEngine};
use xfchess_session::game::types::Side;
use xfchess_session::networking::PuzzleSource;

fn engine() -> Arc<dyn RuleEngine> {
    Arc::new(ShakmatyEngine::new())
}

// ============================================================================
// Settings
// ============================================================================

#[test]
fn test_settings_survive_restart() {
    //! Options saved by one run are what the next run starts with
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("XFChess").join("settings.json");

    let settings = ClientSettings {
        user_id: "bob".to_string(),
        bot_difficulty: BotDifficulty::Easy,
        help_tier: HelpTier::Assisted,
        orientation: Side::Black,
        puzzle_difficulty: PuzzleDifficulty::Hard,
        puzzle_reply_delay_ms: 300,
        puzzle_catalog: Some(dir.path().join("puzzles.json")),
    };
    save_settings_to(&path, &settings).unwrap();

    let loaded = load_settings_from(&path);
    assert_eq!(loaded, settings);
    assert_eq!(loaded.session_config().orientation, Side::Black);
    assert_eq!(
        loaded.puzzle_timing().reply_delay,
        Duration::from_millis(300)
    );
}

#[test]
fn test_partial_settings_fill_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, r#"{ "help_tier": "challenge" }"#).unwrap();

    let loaded = load_settings_from(&path);
    assert_eq!(loaded.help_tier, HelpTier::Challenge);
    assert_eq!(loaded.user_id, ClientSettings::default().user_id);
    assert_eq!(loaded.puzzle_reply_delay_ms, 1000);
}

#[test]
fn test_corrupt_settings_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, "{ not json").unwrap();

    assert_eq!(load_settings_from(&path), ClientSettings::default());
}

// ============================================================================
// Puzzle Catalog Files
// ============================================================================

#[tokio::test]
async fn test_catalog_file_feeds_puzzles() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("puzzles.json");
    fs::write(
        &path,
        r#"[
          {
            "id": "fools",
            "starting_fen": "rnbqkbnr/pppp1ppp/8/4p3/8/5P2/PPPPP1PP/RNBQKBNR w KQkq - 0 2",
            "solution_moves": ["g2g4", "d8h4"],
            "difficulty": "normal",
            "themes": ["mateIn1"]
          }
        ]"#,
    )
    .unwrap();

    let engine = engine();
    let catalog = PuzzleCatalog::load(&path, engine.as_ref()).unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.count(PuzzleDifficulty::Normal), 1);

    let puzzle = catalog.next_puzzle(PuzzleDifficulty::Normal).await.unwrap();
    assert_eq!(puzzle.id, "fools");
    assert_eq!(puzzle.solver_side(engine.as_ref()), Ok(Side::Black));
    assert!(catalog.next_puzzle(PuzzleDifficulty::Easy).await.is_err());
}

#[test]
fn test_catalog_with_unplayable_puzzle_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("puzzles.json");
    fs::write(
        &path,
        r#"[
          {
            "id": "broken",
            "starting_fen": "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "solution_moves": ["e2e4", "e2e4"],
            "difficulty": "easy"
          }
        ]"#,
    )
    .unwrap();

    match PuzzleCatalog::load(&path, engine().as_ref()) {
        Err(CoreError::Catalog { message }) => assert!(
            message.contains("broken"),
            "Error should name the puzzle: {}",
            message
        ),
        other => panic!("Expected catalog error, got {:?}", other.map(|c| c.len())),
    }
}

#[test]
fn test_missing_catalog_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = PuzzleCatalog::load(&dir.path().join("missing.json"), engine().as_ref());
    assert!(matches!(result, Err(CoreError::Io(_))));
}
