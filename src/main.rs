//! XFChess session client
//!
//! Terminal frontend for the session core: plays the bot or runs puzzles
//! against the in-process session service.

mod cli;
mod repl;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use cli::{Cli, Command};
use repl::{BotFrontend, PuzzleFrontend};
use xfchess_session::core::{init_logging, load_settings, save_settings, ClientSettings};
use xfchess_session::game::ai::RandomMover;
use xfchess_session::game::controller::InteractiveGameController;
use xfchess_session::game::puzzle::PuzzleCatalog;
use xfchess_session::game::rules::{RuleEngine, ShakmatyEngine};
use xfchess_session::networking::InMemorySessionService;
use xfchess_session::session::{BotSessionContext, PuzzleSessionContext};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging("info");

    let mut settings = load_settings();
    cli.apply(&mut settings);
    if cli.save {
        save_settings(&settings).context("saving settings")?;
    }

    let engine: Arc<dyn RuleEngine> = Arc::new(ShakmatyEngine::new());
    match cli.command {
        Command::Puzzle { .. } => run_puzzles(engine, settings).await,
        Command::Bot { seed, .. } => run_bot(engine, settings, seed).await,
    }
}

/// Solve puzzles from the configured catalog
async fn run_puzzles(engine: Arc<dyn RuleEngine>, settings: ClientSettings) -> Result<()> {
    let catalog = match &settings.puzzle_catalog {
        Some(path) => PuzzleCatalog::load(path, engine.as_ref())
            .with_context(|| format!("loading puzzle catalog {}", path.display()))?,
        None => PuzzleCatalog::builtin(engine.as_ref()).context("loading built-in puzzles")?,
    };
    info!(
        "[PUZZLE] {} puzzles available, starting at {}",
        catalog.len(),
        settings.puzzle_difficulty
    );

    let mut context = PuzzleSessionContext::new(
        engine,
        Arc::new(catalog),
        settings.help_tier,
        settings.puzzle_timing(),
    );
    context.create(settings.puzzle_difficulty);

    repl::run(PuzzleFrontend::new(context, settings)).await
}

/// Play the bot, resuming an unfinished game or creating a new one
async fn run_bot(
    engine: Arc<dyn RuleEngine>,
    settings: ClientSettings,
    seed: Option<u64>,
) -> Result<()> {
    let service = Arc::new(InMemorySessionService::new(Arc::clone(&engine)));
    let mut controller = InteractiveGameController::new(engine, service.clone());
    if let Some(seed) = seed {
        info!("[BOT] Seeding move choice with {}", seed);
        controller = controller.with_mover(Box::new(RandomMover::seeded(seed)));
    }

    let mut context = BotSessionContext::with_controller(
        settings.user_id.clone(),
        service,
        controller,
        settings.session_config(),
    );
    context.mount();

    repl::run(BotFrontend::new(context, settings)).await
}
