//! Interactive bot game controller
//!
//! Owns one bot game: the position, move history, help budgets, click/drop
//! input state and the bot's scheduled reply. Every player command validates
//! first and either applies fully or leaves the game untouched.
//!
//! # Move Flow
//!
//! ```text
//! on_drop / on_square_click / on_promotion_select
//!     └─► validate (active, not over, player's turn, legal)
//!          └─► commit: history + position, clear hint/selection, sync
//!               └─► find_winner ─► terminal? stop timer, cancel reply
//!                    └─► bot to move? schedule BotReply(difficulty delay)
//! ```
//!
//! # Async Requests
//!
//! Hints and history mirroring go to the [`SessionService`] as tokio tasks
//! and are picked up in [`InteractiveGameController::update`]:
//!
//! - A hint is only shown (and only paid for) if the position is still the
//!   one it was requested for. Otherwise it is dropped.
//! - History sync is fire-and-forget; a newer snapshot aborts an older one.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::game::ai::{MoveGenerator, RandomMover};
use crate::game::error::ValidationError;
use crate::game::resources::{
    DelayedMoveScheduler, GameOutcome, HelpBudgetManager, HelpKind, HelpTier, MoveHistory,
    PendingPromotion, Selection, SessionTimer,
};
use crate::game::rules::RuleEngine;
use crate::game::types::{MoveRecord, PieceKind, Position, Side, Square};
use crate::networking::service::{ServiceResult, SessionConfig, SessionRecord, SessionService};
use crate::networking::task::PendingTask;
use crate::session::error::{SessionError, SessionResult};

/// Result of a drop or promotion choice that was accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// The move was applied
    Moved(MoveRecord),
    /// A pawn reached the last rank; waiting for `on_promotion_select`
    PromotionRequired,
}

/// Result of a square click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// An own piece was selected and its targets highlighted
    Selected,
    /// The selection was cleared
    Cleared,
    Moved(MoveRecord),
    PromotionRequired,
}

/// Bot reply scheduled for the given history length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotReply {
    ply: usize,
}

/// Game state that only exists while a session is loaded
#[derive(Debug, Clone)]
struct ActiveGame {
    session_id: Uuid,
    config: SessionConfig,
    starting: Position,
    position: Position,
    history: MoveHistory,
    outcome: Option<GameOutcome>,
}

/// Hint request in flight, tagged with the position it was asked for
#[derive(Debug, Default)]
struct HintRequest {
    fen: Option<String>,
    task: PendingTask<ServiceResult<MoveRecord>>,
}

/// Player-facing controller for a game against the bot
pub struct InteractiveGameController {
    engine: Arc<dyn RuleEngine>,
    service: Arc<dyn SessionService>,
    mover: Box<dyn MoveGenerator>,
    game: Option<ActiveGame>,
    help: HelpBudgetManager,
    selection: Selection,
    promotion: PendingPromotion,
    timer: SessionTimer,
    bot_reply: DelayedMoveScheduler<BotReply>,
    hint: HintRequest,
    sync: PendingTask<ServiceResult<()>>,
    message: Option<String>,
}

impl InteractiveGameController {
    pub fn new(engine: Arc<dyn RuleEngine>, service: Arc<dyn SessionService>) -> Self {
        Self {
            engine,
            service,
            mover: Box::new(RandomMover::new()),
            game: None,
            help: HelpBudgetManager::default(),
            selection: Selection::default(),
            promotion: PendingPromotion::default(),
            timer: SessionTimer::default(),
            bot_reply: DelayedMoveScheduler::default(),
            hint: HintRequest::default(),
            sync: PendingTask::default(),
            message: None,
        }
    }

    /// Replace the bot's move generator
    pub fn with_mover(mut self, mover: Box<dyn MoveGenerator>) -> Self {
        self.mover = mover;
        self
    }

    /// Load `record`, replaying its stored moves
    ///
    /// All-or-nothing: if the start position or any stored move fails, the
    /// controller keeps whatever game it had before. Reloading the session
    /// that is already loaded keeps the spent help budgets.
    pub fn begin(&mut self, record: &SessionRecord) -> SessionResult<()> {
        let starting = self
            .engine
            .load(&record.starting_fen)
            .map_err(|source| SessionError::InvalidStart { source })?;

        let position = self
            .engine
            .replay(&starting, &record.moves)
            .map_err(|(index, source)| SessionError::Replay {
                index,
                mv: record.moves[index],
                source,
            })?;

        self.clear_pending();
        if self.session_id() != Some(record.id) {
            self.help.set_tier(record.config.help_tier);
        }
        self.timer.restart();
        self.message = None;
        self.game = Some(ActiveGame {
            session_id: record.id,
            config: record.config,
            starting,
            position,
            history: MoveHistory::from_moves(record.moves.clone()),
            outcome: None,
        });

        info!(
            "[BOT] Game {} loaded: player {}, {} moves, {} bot, {} help",
            record.id,
            record.config.orientation,
            record.moves.len(),
            record.config.difficulty,
            record.config.help_tier.label()
        );

        if self.find_winner().is_none() {
            self.schedule_bot_reply_if_due();
        }
        Ok(())
    }

    /// Drop the game and everything pending on it
    pub fn end(&mut self) {
        self.clear_pending();
        self.timer.cancel();
        self.help.reset();
        if let Some(game) = self.game.take() {
            debug!("[BOT] Game {} ended", game.session_id);
        }
    }

    fn clear_pending(&mut self) {
        self.bot_reply.cancel();
        self.hint.task.abort();
        self.hint.fen = None;
        self.sync.abort();
        self.selection.clear();
        self.promotion.clear();
        self.help.clear_hint();
    }

    /// Try to move the piece on `from` to `to`
    pub fn on_drop(&mut self, from: Square, to: Square) -> Result<DropOutcome, ValidationError> {
        if let Err(e) = self.check_player_turn() {
            return self.reject(e);
        }

        let Some(game) = self.game.as_ref() else {
            return self.reject(ValidationError::NoActiveSession);
        };
        if self.engine.requires_promotion(&game.position, from, to) {
            debug!("[BOT] Promotion required for {}{}", from, to);
            self.promotion.start(from, to);
            self.selection.clear();
            return Ok(DropOutcome::PromotionRequired);
        }

        self.play_player_move(MoveRecord::new(from, to))
            .map(DropOutcome::Moved)
    }

    /// Complete a pending promotion with `kind`
    pub fn on_promotion_select(&mut self, kind: PieceKind) -> Result<DropOutcome, ValidationError> {
        let Some(mv) = self.promotion.with_piece(kind) else {
            return self.reject(ValidationError::NoPromotionPending);
        };
        if !kind.is_promotion_target() {
            return self.reject(ValidationError::IllegalMove { mv });
        }

        self.promotion.clear();
        self.play_player_move(mv).map(DropOutcome::Moved)
    }

    /// Abandon a pending promotion
    pub fn cancel_promotion(&mut self) {
        self.promotion.clear();
    }

    /// Click-to-move: select an own piece, move to a highlighted target, or clear
    pub fn on_square_click(&mut self, square: Square) -> Result<ClickOutcome, ValidationError> {
        if let Err(e) = self.check_player_turn() {
            self.selection.clear();
            return self.reject(e);
        }

        if let Some(from) = self.selection.selected() {
            if from == square {
                self.selection.clear();
                return Ok(ClickOutcome::Cleared);
            }
            if self.selection.is_target(square) {
                return self.on_drop(from, square).map(|outcome| match outcome {
                    DropOutcome::Moved(mv) => ClickOutcome::Moved(mv),
                    DropOutcome::PromotionRequired => ClickOutcome::PromotionRequired,
                });
            }
        }

        let Some(game) = self.game.as_ref() else {
            return self.reject(ValidationError::NoActiveSession);
        };
        let moves = self.engine.legal_moves_from(&game.position, square);
        if moves.is_empty() {
            self.selection.clear();
            Ok(ClickOutcome::Cleared)
        } else {
            self.selection.select(square, &moves);
            Ok(ClickOutcome::Selected)
        }
    }

    fn check_player_turn(&self) -> Result<(), ValidationError> {
        let game = self.game.as_ref().ok_or(ValidationError::NoActiveSession)?;
        if game.outcome.is_some() {
            return Err(ValidationError::GameOver);
        }
        if self.promotion.is_active() {
            return Err(ValidationError::PromotionPending);
        }
        if self.engine.turn(&game.position) != game.config.orientation {
            return Err(ValidationError::NotYourTurn);
        }
        Ok(())
    }

    fn play_player_move(&mut self, mv: MoveRecord) -> Result<MoveRecord, ValidationError> {
        let Some(game) = self.game.as_ref() else {
            return self.reject(ValidationError::NoActiveSession);
        };

        match self.engine.apply_move(&game.position, &mv) {
            Ok(next) => {
                self.message = None;
                self.commit_move(mv, next);
                self.schedule_bot_reply_if_due();
                Ok(mv)
            }
            Err(e) => {
                debug!("[BOT] Rejected player move: {}", e);
                self.reject(ValidationError::IllegalMove { mv })
            }
        }
    }

    /// Record an applied move and check for the end of the game
    fn commit_move(&mut self, mv: MoveRecord, next: Position) {
        let Some(game) = self.game.as_mut() else {
            return;
        };
        game.history.add_move(mv);
        game.position = next;

        self.help.clear_hint();
        self.selection.clear();
        self.promotion.clear();
        self.sync_history();
        self.find_winner();
    }

    /// Check the engine for a terminal position
    ///
    /// On a terminal position the outcome is recorded, the timer stops and
    /// any scheduled bot reply is cancelled.
    pub fn find_winner(&mut self) -> Option<GameOutcome> {
        let game = self.game.as_mut()?;
        if let Some(outcome) = game.outcome {
            return Some(outcome);
        }

        let outcome = GameOutcome::from_status(self.engine.status(&game.position))?;
        game.outcome = Some(outcome);
        self.timer.stop();
        self.bot_reply.cancel();
        self.message = Some(outcome.message());
        info!(
            "[BOT] Game over: {} after {} moves",
            outcome.message(),
            game.history.len()
        );
        Some(outcome)
    }

    fn schedule_bot_reply_if_due(&mut self) {
        let Some(game) = self.game.as_ref() else {
            return;
        };
        if game.outcome.is_some() || self.engine.turn(&game.position) == game.config.orientation
        {
            return;
        }

        let reply = BotReply {
            ply: game.history.len(),
        };
        let delay = game.config.difficulty.reply_delay();
        self.bot_reply.schedule(reply, delay);
        debug!("[BOT] Reply scheduled in {:?} (ply {})", delay, reply.ply);
    }

    /// Play the bot's move for `reply`
    ///
    /// Ignored if the game moved on since the reply was scheduled.
    fn play_bot_reply(&mut self, reply: BotReply) -> bool {
        let Some(game) = self.game.as_ref() else {
            return false;
        };
        if game.outcome.is_some()
            || game.history.len() != reply.ply
            || self.engine.turn(&game.position) == game.config.orientation
        {
            debug!("[BOT] Dropping stale reply for ply {}", reply.ply);
            return false;
        }

        let legal = self.engine.legal_moves(&game.position);
        let fen = self.engine.serialize(&game.position);
        let Some(mv) = self.mover.choose(&fen, &legal) else {
            warn!("[BOT] No move available in {}", fen);
            return false;
        };

        match self.engine.apply_move(&game.position, &mv) {
            Ok(next) => {
                info!("[BOT] Plays {}", mv);
                self.commit_move(mv, next);
                true
            }
            Err(e) => {
                error!("[BOT] Generator picked an illegal move: {}", e);
                false
            }
        }
    }

    /// Take back the player's last move, and the bot's answer to it
    pub fn undo_previous_move(&mut self) -> Result<(), ValidationError> {
        let Some(game) = self.game.as_ref() else {
            return self.reject(ValidationError::NoActiveSession);
        };
        if game.outcome.is_some() {
            return self.reject(ValidationError::GameOver);
        }
        if let Err(e) = self.help.check(HelpKind::Undo) {
            return self.reject(e);
        }
        let Some(cut) = game
            .history
            .last_index_by(game.config.orientation, game.starting.turn())
        else {
            return self.reject(ValidationError::NothingToUndo);
        };

        let position = match self
            .engine
            .replay(&game.starting, &game.history.as_slice()[..cut])
        {
            Ok(position) => position,
            Err((index, e)) => {
                error!("[BOT] History no longer replays at move {}: {}", index, e);
                return self.reject(ValidationError::NothingToUndo);
            }
        };

        self.bot_reply.cancel();
        self.hint.task.abort();
        self.hint.fen = None;
        self.promotion.clear();
        self.selection.clear();
        self.help.clear_hint();

        let Some(game) = self.game.as_mut() else {
            return self.reject(ValidationError::NoActiveSession);
        };
        let removed = game.history.len() - cut;
        game.history.truncate(cut);
        game.position = position;

        if let Err(e) = self.help.consume(HelpKind::Undo) {
            return self.reject(e);
        }
        self.message = None;
        info!(
            "[HELP] Undid {} moves, undos {}",
            removed,
            self.help.remaining_undos()
        );

        self.sync_history();
        self.schedule_bot_reply_if_due();
        Ok(())
    }

    /// Ask the service for a suggested move
    ///
    /// The budget is only spent when the suggestion arrives for the same
    /// position.
    pub fn request_hint(&mut self) -> Result<(), ValidationError> {
        if let Err(e) = self.check_player_turn() {
            return self.reject(e);
        }
        if self.hint.task.is_pending() {
            return self.reject(ValidationError::HintPending);
        }
        if let Err(e) = self.help.check(HelpKind::Hint) {
            return self.reject(e);
        }

        let Some(game) = self.game.as_ref() else {
            return self.reject(ValidationError::NoActiveSession);
        };
        let fen = self.engine.serialize(&game.position);
        let service = Arc::clone(&self.service);
        let request_fen = fen.clone();

        self.hint.fen = Some(fen);
        self.hint
            .task
            .spawn(async move { service.suggest_move(&request_fen).await });
        debug!("[HINT] Requested");
        Ok(())
    }

    fn poll_hint(&mut self) -> bool {
        let Some(result) = self.hint.task.poll_finished() else {
            return false;
        };
        let requested_for = self.hint.fen.take();

        let mv = match result {
            Ok(Ok(mv)) => mv,
            Ok(Err(e)) => {
                warn!("[HINT] Request failed: {}", e);
                self.message = Some(format!("Hint unavailable: {}", e));
                return false;
            }
            Err(e) => {
                error!("[HINT] Request task failed: {}", e);
                return false;
            }
        };

        let current = self
            .game
            .as_ref()
            .filter(|game| game.outcome.is_none())
            .map(|game| self.engine.serialize(&game.position));
        if current.is_none() || current != requested_for {
            debug!("[HINT] Discarding stale hint {}", mv);
            return false;
        }

        if let Err(e) = self.help.consume(HelpKind::Hint) {
            debug!("[HINT] Arrived without budget: {}", e);
            return false;
        }
        self.help.show_hint(mv.from, mv.to);
        info!("[HINT] {} (hints {})", mv, self.help.remaining_hints());
        true
    }

    /// Change the help tier; refused while a game is in progress
    pub fn set_tier(&mut self, tier: HelpTier) -> Result<(), ValidationError> {
        if self.is_in_progress() {
            return self.reject(ValidationError::TierLocked);
        }
        self.help.set_tier(tier);
        Ok(())
    }

    fn sync_history(&mut self) {
        let Some(game) = self.game.as_ref() else {
            return;
        };
        let service = Arc::clone(&self.service);
        let session_id = game.session_id;
        let moves = game.history.as_slice().to_vec();

        if self
            .sync
            .spawn(async move { service.sync_moves(session_id, moves).await })
        {
            debug!("[SESSION] Superseded an in-flight history sync");
        }
    }

    fn poll_sync(&mut self) {
        match self.sync.poll_finished() {
            Some(Ok(Err(e))) => warn!("[SESSION] History sync failed: {}", e),
            Some(Err(e)) => error!("[SESSION] History sync task failed: {}", e),
            _ => {}
        }
    }

    /// Advance one frame
    ///
    /// Ticks the timer, plays a due bot reply and picks up finished hint and
    /// sync requests. Returns whether the board or hint changed.
    pub fn update(&mut self, delta: Duration) -> bool {
        self.timer.advance(delta);

        let mut changed = false;
        if let Some(reply) = self.bot_reply.advance(delta) {
            changed |= self.play_bot_reply(reply);
        }
        changed |= self.poll_hint();
        self.poll_sync();
        changed
    }

    fn reject<T>(&mut self, err: ValidationError) -> Result<T, ValidationError> {
        debug!("[BOT] Rejected: {}", err);
        self.message = Some(err.to_string());
        Err(err)
    }

    pub fn is_active(&self) -> bool {
        self.game.is_some()
    }

    /// Active and not finished
    pub fn is_in_progress(&self) -> bool {
        self.game.as_ref().is_some_and(|g| g.outcome.is_none())
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.game.as_ref().map(|g| g.session_id)
    }

    pub fn config(&self) -> Option<SessionConfig> {
        self.game.as_ref().map(|g| g.config)
    }

    pub fn position(&self) -> Option<&Position> {
        self.game.as_ref().map(|g| &g.position)
    }

    pub fn fen(&self) -> Option<String> {
        self.position().map(|p| self.engine.serialize(p))
    }

    pub fn turn(&self) -> Option<Side> {
        self.position().map(|p| self.engine.turn(p))
    }

    pub fn player_side(&self) -> Option<Side> {
        self.game.as_ref().map(|g| g.config.orientation)
    }

    pub fn is_player_turn(&self) -> bool {
        self.turn().is_some() && self.turn() == self.player_side()
    }

    pub fn history(&self) -> &[MoveRecord] {
        self.game
            .as_ref()
            .map(|g| g.history.as_slice())
            .unwrap_or(&[])
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.game.as_ref().and_then(|g| g.outcome)
    }

    pub fn help(&self) -> &HelpBudgetManager {
        &self.help
    }

    pub fn hint(&self) -> Option<[Square; 2]> {
        self.help.hint()
    }

    pub fn is_hint_pending(&self) -> bool {
        self.hint.task.is_pending()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn pending_promotion(&self) -> Option<(Square, Square)> {
        self.promotion.squares()
    }

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    pub fn has_pending_bot_reply(&self) -> bool {
        self.bot_reply.is_pending()
    }

    pub fn legal_moves(&self) -> Vec<MoveRecord> {
        if !self.is_player_turn() || self.outcome().is_some() {
            return Vec::new();
        }
        self.position()
            .map(|p| self.engine.legal_moves(p))
            .unwrap_or_default()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }
}

impl std::fmt::Debug for InteractiveGameController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractiveGameController")
            .field("game", &self.game)
            .field("help", &self.help)
            .field("timer", &self.timer)
            .finish_non_exhaustive()
    }
}
