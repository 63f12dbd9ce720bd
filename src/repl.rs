//! Line-based frontends for the session contexts
//!
//! A [`Frontend`] is driven by [`run`]: stdin lines become commands, and a
//! fixed-rate ticker feeds the elapsed wall time into the context's
//! `update`. Everything runs on the tokio main task, so the context is only
//! ever touched from one place.

use anyhow::Result;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};
use web_time::Instant;

use xfchess_session::core::{save_settings, ClientSettings};
use xfchess_session::game::controller::{ClickOutcome, DropOutcome};
use xfchess_session::game::error::ValidationError;
use xfchess_session::game::puzzle::PuzzleDifficulty;
use xfchess_session::game::resources::{HelpBudgetManager, HelpTier};
use xfchess_session::game::types::{MoveRecord, PieceKind, Square};
use xfchess_session::networking::{LifecycleAction, LifecycleStatus};
use xfchess_session::session::{BotSessionContext, PuzzleSessionContext};

/// Frame interval of the REPL loop
const FRAME: Duration = Duration::from_millis(100);

/// What the loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Render,
    Quit,
}

pub trait Frontend {
    fn update(&mut self, delta: Duration) -> bool;
    fn command(&mut self, line: &str) -> Flow;
    fn render(&mut self);
}

/// Drive `frontend` until `quit` or end of input
pub async fn run<F: Frontend>(mut frontend: F) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(FRAME);
    let mut last_frame = Instant::now();

    frontend.render();
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = Instant::now();
                let delta = now.duration_since(last_frame);
                last_frame = now;
                if frontend.update(delta) {
                    frontend.render();
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("[REPL] End of input");
                    break;
                };
                match frontend.command(line.trim()) {
                    Flow::Quit => break,
                    Flow::Render => frontend.render(),
                    Flow::Continue => {}
                }
            }
        }
    }
    Ok(())
}

// ============================================================================
// Shared helpers
// ============================================================================

/// Print a FEN's piece placement as an 8x8 grid, rank 8 at the top
fn print_board(fen: &str) {
    let placement = fen.split_whitespace().next().unwrap_or_default();
    for (row, rank) in placement.split('/').enumerate() {
        let mut line = String::new();
        for c in rank.chars() {
            match c.to_digit(10) {
                Some(empty) => (0..empty).for_each(|_| line.push_str(" .")),
                None => {
                    line.push(' ');
                    line.push(c);
                }
            }
        }
        println!("{}{}", 8 - row, line);
    }
    println!("  a b c d e f g h");
}

fn print_help(help: &HelpBudgetManager) {
    println!(
        "Help: {} | undos {} | hints {}",
        help.tier().label(),
        help.remaining_undos(),
        help.remaining_hints()
    );
    if let Some([from, to]) = help.hint() {
        println!("Hint: move {} to {}", from, to);
    }
}

/// Print finished lifecycle statuses and return the actions to dismiss
fn print_statuses<'a>(
    statuses: impl Iterator<Item = (LifecycleAction, &'a LifecycleStatus)>,
) -> Vec<LifecycleAction> {
    let mut shown = Vec::new();
    for (action, status) in statuses {
        if status.is_loading() {
            println!("[{}] waiting for the server...", action);
        } else if let Some(message) = status.success() {
            println!("{}", message);
            shown.push(action);
        } else if let Some(error) = status.error() {
            println!("[{}] failed: {}", action, error);
            shown.push(action);
        }
    }
    shown
}

fn parse_tier(arg: &str) -> Option<HelpTier> {
    <HelpTier as clap::ValueEnum>::from_str(arg, true).ok()
}

fn persist(settings: &ClientSettings) {
    if let Err(e) = save_settings(settings) {
        warn!("[SETTINGS] Could not save settings: {}", e);
    }
}

fn report<T>(result: Result<T, ValidationError>) -> Flow {
    match result {
        Ok(_) => Flow::Render,
        Err(e) => {
            println!("{}", e);
            Flow::Continue
        }
    }
}

// ============================================================================
// Bot games
// ============================================================================

pub struct BotFrontend {
    context: BotSessionContext,
    settings: ClientSettings,
}

impl BotFrontend {
    pub fn new(context: BotSessionContext, settings: ClientSettings) -> Self {
        Self { context, settings }
    }

    fn play(&mut self, mv: MoveRecord) -> Flow {
        match self.context.on_drop(mv.from, mv.to) {
            Ok(DropOutcome::PromotionRequired) => match mv.promotion {
                Some(kind) => report(self.context.on_promotion_select(kind)),
                None => {
                    println!("Choose a piece: promote q|r|b|n");
                    Flow::Continue
                }
            },
            other => report(other),
        }
    }
}

impl Frontend for BotFrontend {
    fn update(&mut self, delta: Duration) -> bool {
        self.context.update(delta)
    }

    fn command(&mut self, line: &str) -> Flow {
        let mut words = line.split_whitespace();
        let (Some(cmd), arg) = (words.next(), words.next()) else {
            return Flow::Continue;
        };

        match (cmd, arg) {
            ("move" | "m", Some(uci)) => match MoveRecord::from_uci(uci) {
                Ok(mv) => self.play(mv),
                Err(e) => {
                    println!("{}", e);
                    Flow::Continue
                }
            },
            ("click" | "c", Some(square)) => match square.parse::<Square>() {
                Ok(square) => match self.context.on_square_click(square) {
                    Ok(ClickOutcome::Selected) => {
                        let targets = self.context.controller().selection().targets().to_vec();
                        let names: Vec<String> = targets.iter().map(Square::to_string).collect();
                        println!("Targets: {}", names.join(" "));
                        Flow::Continue
                    }
                    Ok(ClickOutcome::PromotionRequired) => {
                        println!("Choose a piece: promote q|r|b|n");
                        Flow::Continue
                    }
                    other => report(other),
                },
                Err(e) => {
                    println!("{}", e);
                    Flow::Continue
                }
            },
            ("promote" | "p", Some(piece)) => {
                match piece.chars().next().and_then(PieceKind::from_char) {
                    Some(kind) => report(self.context.on_promotion_select(kind)),
                    None => {
                        println!("Unknown piece '{}'", piece);
                        Flow::Continue
                    }
                }
            }
            ("cancel", _) => {
                self.context.cancel_promotion();
                Flow::Render
            }
            ("undo", _) => report(self.context.undo_previous_move()),
            ("hint", _) => report(self.context.request_hint()),
            ("new", _) => {
                self.context.create_with(self.settings.session_config());
                Flow::Render
            }
            ("reconnect", _) => report(self.context.reconnect()),
            ("forfeit", _) => report(self.context.forfeit()),
            ("close", _) => report(self.context.close()),
            ("tier", Some(arg)) => match parse_tier(arg) {
                Some(tier) => {
                    let result = self.context.set_tier(tier);
                    if result.is_ok() {
                        self.settings.help_tier = tier;
                        persist(&self.settings);
                    }
                    report(result)
                }
                None => {
                    println!("Tiers: assisted, friendly, challenge");
                    Flow::Continue
                }
            },
            ("status" | "s", _) => Flow::Render,
            ("quit" | "q", _) => Flow::Quit,
            _ => {
                println!(
                    "Commands: move <uci>, click <sq>, promote <q|r|b|n>, cancel, undo, \
                     hint, new, reconnect, forfeit, close, tier <tier>, status, quit"
                );
                Flow::Continue
            }
        }
    }

    fn render(&mut self) {
        let controller = self.context.controller();
        match controller.fen() {
            Some(fen) => {
                print_board(&fen);
                println!("FEN: {}", fen);
                if let (Some(turn), Some(player)) = (controller.turn(), controller.player_side()) {
                    println!(
                        "{} to move (you are {}) | {} | {} moves",
                        turn,
                        player,
                        controller.timer().display(),
                        controller.history().len()
                    );
                }
            }
            None => println!("No game. Type `new` or `reconnect`."),
        }
        print_help(controller.help());

        let shown = print_statuses(
            LifecycleAction::ALL
                .into_iter()
                .map(|action| (action, self.context.status(action))),
        );
        for action in shown {
            self.context.dismiss(action);
        }
        if let Some(message) = self.context.message() {
            println!("{}", message);
        }
    }
}

// ============================================================================
// Puzzles
// ============================================================================

pub struct PuzzleFrontend {
    context: PuzzleSessionContext,
    settings: ClientSettings,
}

impl PuzzleFrontend {
    pub fn new(context: PuzzleSessionContext, settings: ClientSettings) -> Self {
        Self { context, settings }
    }
}

impl Frontend for PuzzleFrontend {
    fn update(&mut self, delta: Duration) -> bool {
        self.context.update(delta)
    }

    fn command(&mut self, line: &str) -> Flow {
        let mut words = line.split_whitespace();
        let (Some(cmd), arg) = (words.next(), words.next()) else {
            return Flow::Continue;
        };

        match (cmd, arg) {
            ("move" | "m", Some(uci)) => match MoveRecord::from_uci(uci) {
                Ok(mv) => report(self.context.submit_move(mv)),
                Err(e) => {
                    println!("{}", e);
                    Flow::Continue
                }
            },
            ("hint", _) => report(self.context.request_hint()),
            ("reset", _) => report(self.context.reset_puzzle()),
            ("next" | "n", _) => {
                self.context.next_puzzle();
                Flow::Render
            }
            ("new", difficulty) => {
                let difficulty = difficulty
                    .and_then(|d| <PuzzleDifficulty as clap::ValueEnum>::from_str(d, true).ok())
                    .unwrap_or(self.settings.puzzle_difficulty);
                self.context.create(difficulty);
                Flow::Render
            }
            ("close", _) => {
                self.context.close();
                Flow::Render
            }
            ("tier", Some(arg)) => match parse_tier(arg) {
                Some(tier) => {
                    let result = self.context.set_tier(tier);
                    if result.is_ok() {
                        self.settings.help_tier = tier;
                        persist(&self.settings);
                    }
                    report(result)
                }
                None => {
                    println!("Tiers: assisted, friendly, challenge");
                    Flow::Continue
                }
            },
            ("status" | "s", _) => Flow::Render,
            ("quit" | "q", _) => Flow::Quit,
            _ => {
                println!(
                    "Commands: move <uci>, hint, reset, next, new [difficulty], close, \
                     tier <tier>, status, quit"
                );
                Flow::Continue
            }
        }
    }

    fn render(&mut self) {
        let machine = self.context.machine();
        match (machine.puzzle(), machine.fen()) {
            (Some(puzzle), Some(fen)) => {
                print_board(&fen);
                println!("FEN: {}", fen);
                println!(
                    "Puzzle {} ({}) | you play {} | {:?} | {}",
                    puzzle.id,
                    puzzle.difficulty,
                    machine.orientation(),
                    machine.state(),
                    machine.timer().display()
                );
            }
            _ => println!("No puzzle. Type `new [easy|normal|hard]`."),
        }
        print_help(self.context.help());

        let shown = print_statuses(
            [LifecycleAction::Create, LifecycleAction::Close]
                .into_iter()
                .map(|action| (action, self.context.status(action))),
        );
        for action in shown {
            self.context.dismiss(action);
        }
        if let Some(message) = self.context.message() {
            println!("{}", message);
        }
    }
}
