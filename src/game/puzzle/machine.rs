//! Puzzle move validation state machine
//!
//! Drives one puzzle from its starting position to success or failure.
//!
//! # States
//!
//! ```text
//!            start()
//!   Idle ───────────────► AwaitingScriptedReply ◄──────┐
//!                               │  reply fires          │ correct move,
//!                               ▼                       │ script continues
//!                        AwaitingSolverMove ────────────┘
//!                               │
//!              wrong move /     │    last move played
//!                               ▼
//!                    Completed(Failure | Success)
//! ```
//!
//! # Timing
//!
//! The opening reply (`solution_moves[0]`) is scheduled with
//! [`PuzzleTiming::opening_delay`], zero by default, so it lands on the very
//! next frame. Every later scripted reply waits [`PuzzleTiming::reply_delay`].
//! Replies are fired only by [`MoveValidationStateMachine::update`]; a reply
//! carries the script index it was scheduled for and is ignored if the
//! machine has moved on (reset, teardown, completion).

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

use super::definition::{PuzzleDefinition, PuzzleError};
use crate::game::error::ValidationError;
use crate::game::resources::{DelayedMoveScheduler, SessionTimer};
use crate::game::rules::RuleEngine;
use crate::game::types::{MoveRecord, Position, Side};

/// Message shown when the solver plays a wrong move
pub const INCORRECT_MESSAGE: &str = "Incorrect move! Puzzle over.";

/// Message shown when the solver finishes the script
pub const SOLVED_MESSAGE: &str = "Congratulations! You've completed the puzzle.";

/// How a completed puzzle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleResult {
    Success,
    Failure,
}

/// Where the puzzle stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PuzzleState {
    /// No puzzle loaded
    #[default]
    Idle,
    /// The script's next move is scheduled
    AwaitingScriptedReply,
    /// Waiting for the solver to play `solution_moves[current_index]`
    AwaitingSolverMove,
    Completed(PuzzleResult),
}

impl PuzzleState {
    pub fn is_completed(self) -> bool {
        matches!(self, PuzzleState::Completed(_))
    }
}

/// Result of an accepted submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Matched; the script's reply is scheduled
    Correct,
    /// Matched the final move
    Solved,
    /// Did not match; the puzzle is over
    Incorrect,
}

/// Delays for scripted replies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PuzzleTiming {
    pub opening_delay: Duration,
    pub reply_delay: Duration,
}

impl Default for PuzzleTiming {
    fn default() -> Self {
        Self {
            opening_delay: Duration::ZERO,
            reply_delay: Duration::from_millis(1000),
        }
    }
}

/// Scheduled scripted reply, tagged with its script index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScriptedReply {
    index: usize,
}

/// Validates solver moves against a puzzle script
pub struct MoveValidationStateMachine {
    engine: Arc<dyn RuleEngine>,
    timing: PuzzleTiming,
    puzzle: Option<PuzzleDefinition>,
    position: Option<Position>,
    current_index: usize,
    state: PuzzleState,
    orientation: Side,
    message: Option<String>,
    timer: SessionTimer,
    scheduler: DelayedMoveScheduler<ScriptedReply>,
}

impl MoveValidationStateMachine {
    pub fn new(engine: Arc<dyn RuleEngine>) -> Self {
        Self::with_timing(engine, PuzzleTiming::default())
    }

    pub fn with_timing(engine: Arc<dyn RuleEngine>, timing: PuzzleTiming) -> Self {
        Self {
            engine,
            timing,
            puzzle: None,
            position: None,
            current_index: 0,
            state: PuzzleState::Idle,
            orientation: Side::White,
            message: None,
            timer: SessionTimer::default(),
            scheduler: DelayedMoveScheduler::default(),
        }
    }

    /// Load `puzzle` and schedule its opening reply
    ///
    /// On error the machine is left exactly as it was.
    pub fn start(&mut self, puzzle: PuzzleDefinition) -> Result<(), PuzzleError> {
        if puzzle.solution_moves.is_empty() {
            return Err(PuzzleError::EmptySolution { id: puzzle.id });
        }

        let position =
            self.engine
                .load(&puzzle.starting_fen)
                .map_err(|source| PuzzleError::InvalidPosition {
                    id: puzzle.id.clone(),
                    source,
                })?;

        self.scheduler.cancel();
        self.orientation = position.turn().opposite();
        self.position = Some(position);
        self.current_index = 0;
        self.state = PuzzleState::AwaitingScriptedReply;
        self.message = None;
        self.timer.restart();
        self.scheduler
            .schedule(ScriptedReply { index: 0 }, self.timing.opening_delay);

        info!(
            "[PUZZLE] Started {} ({} solver moves, solver plays {})",
            puzzle.id,
            puzzle.solver_move_count(),
            self.orientation
        );
        self.puzzle = Some(puzzle);
        Ok(())
    }

    /// Check the solver's move against the script
    ///
    /// A mismatch is not an error: it ends the puzzle and returns
    /// [`SubmitOutcome::Incorrect`] with the position untouched.
    pub fn submit_move(&mut self, candidate: MoveRecord) -> Result<SubmitOutcome, ValidationError> {
        match self.state {
            PuzzleState::Idle => return self.reject(ValidationError::NoActiveSession),
            PuzzleState::Completed(_) => return self.reject(ValidationError::PuzzleCompleted),
            PuzzleState::AwaitingScriptedReply => {
                return self.reject(ValidationError::AwaitingReply)
            }
            PuzzleState::AwaitingSolverMove => {}
        }

        let (Some(puzzle), Some(position)) = (&self.puzzle, &self.position) else {
            return self.reject(ValidationError::NoActiveSession);
        };
        let expected = puzzle.solution_moves[self.current_index];

        if candidate != expected {
            debug!(
                "[PUZZLE] Expected {} at index {}, got {}",
                expected, self.current_index, candidate
            );
            self.finish(PuzzleResult::Failure, INCORRECT_MESSAGE);
            return Ok(SubmitOutcome::Incorrect);
        }

        let next = match self.engine.apply_move(position, &candidate) {
            Ok(next) => next,
            Err(e) => {
                error!("[PUZZLE] Scripted move {} failed to apply: {}", candidate, e);
                self.finish(PuzzleResult::Failure, INCORRECT_MESSAGE);
                return Err(ValidationError::IllegalMove { mv: candidate });
            }
        };

        let script_len = puzzle.solution_moves.len();
        self.position = Some(next);
        self.current_index += 1;
        self.message = None;

        if self.current_index >= script_len {
            self.finish(PuzzleResult::Success, SOLVED_MESSAGE);
            return Ok(SubmitOutcome::Solved);
        }

        self.state = PuzzleState::AwaitingScriptedReply;
        self.scheduler.schedule(
            ScriptedReply {
                index: self.current_index,
            },
            self.timing.reply_delay,
        );
        Ok(SubmitOutcome::Correct)
    }

    /// Play the scripted move at `index`
    ///
    /// Only the scheduler calls this. A reply for any index other than the
    /// current one, or arriving outside `AwaitingScriptedReply`, is stale
    /// and ignored. Returns whether the move was applied.
    pub fn make_opponent_move(&mut self, index: usize) -> bool {
        if self.state != PuzzleState::AwaitingScriptedReply || index != self.current_index {
            debug!(
                "[PUZZLE] Ignoring stale scripted reply {} (state {:?}, index {})",
                index, self.state, self.current_index
            );
            return false;
        }

        let (Some(puzzle), Some(position)) = (&self.puzzle, &self.position) else {
            return false;
        };
        let Some(mv) = puzzle.solution_moves.get(index).copied() else {
            return false;
        };

        match self.engine.apply_move(position, &mv) {
            Ok(next) => {
                let script_len = puzzle.solution_moves.len();
                debug!("[PUZZLE] Opponent plays {} (index {})", mv, index);
                self.position = Some(next);
                self.current_index += 1;

                if self.current_index >= script_len {
                    self.finish(PuzzleResult::Success, SOLVED_MESSAGE);
                } else {
                    self.state = PuzzleState::AwaitingSolverMove;
                }
                true
            }
            Err(e) => {
                error!("[PUZZLE] Scripted reply {} failed to apply: {}", mv, e);
                self.finish(PuzzleResult::Failure, "This puzzle can't be played.");
                false
            }
        }
    }

    /// Restart the current puzzle from its starting position
    pub fn reset(&mut self) -> Result<(), ValidationError> {
        let Some(puzzle) = self.puzzle.clone() else {
            return self.reject(ValidationError::NoActiveSession);
        };

        self.scheduler.cancel();
        self.timer.cancel();
        info!("[PUZZLE] Resetting {}", puzzle.id);
        // the puzzle loaded once already, so this only fails if the engine changed
        self.start(puzzle).map_err(|e| {
            error!("[PUZZLE] Reset failed: {}", e);
            ValidationError::NoActiveSession
        })
    }

    /// Drop the puzzle and return to `Idle`
    pub fn teardown(&mut self) {
        self.scheduler.cancel();
        self.timer.cancel();
        self.puzzle = None;
        self.position = None;
        self.current_index = 0;
        self.state = PuzzleState::Idle;
        self.message = None;
    }

    /// Advance one frame: tick the timer and fire a due scripted reply
    ///
    /// Returns whether a scripted move was applied.
    pub fn update(&mut self, delta: Duration) -> bool {
        self.timer.advance(delta);
        match self.scheduler.advance(delta) {
            Some(reply) => self.make_opponent_move(reply.index),
            None => false,
        }
    }

    fn finish(&mut self, result: PuzzleResult, message: &str) {
        self.scheduler.cancel();
        self.timer.stop();
        self.state = PuzzleState::Completed(result);
        self.message = Some(message.to_string());
        info!(
            "[PUZZLE] Completed with {:?} after {}s",
            result,
            self.timer.elapsed_secs()
        );
    }

    fn reject<T>(&mut self, err: ValidationError) -> Result<T, ValidationError> {
        self.message = Some(err.to_string());
        Err(err)
    }

    pub fn state(&self) -> PuzzleState {
        self.state
    }

    pub fn puzzle(&self) -> Option<&PuzzleDefinition> {
        self.puzzle.as_ref()
    }

    pub fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    pub fn fen(&self) -> Option<String> {
        self.position.as_ref().map(|p| self.engine.serialize(p))
    }

    pub fn turn(&self) -> Option<Side> {
        self.position.as_ref().map(|p| self.engine.turn(p))
    }

    /// Side the solver plays; the board is shown from this side
    pub fn orientation(&self) -> Side {
        self.orientation
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    /// The move the solver is expected to play, if it's their turn
    pub fn expected_move(&self) -> Option<MoveRecord> {
        if self.state != PuzzleState::AwaitingSolverMove {
            return None;
        }
        self.puzzle
            .as_ref()
            .and_then(|p| p.solution_moves.get(self.current_index).copied())
    }

    pub fn has_pending_reply(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Legal moves for the solver, empty unless it's their turn
    pub fn legal_moves(&self) -> Vec<MoveRecord> {
        match (&self.position, self.state) {
            (Some(position), PuzzleState::AwaitingSolverMove) => {
                self.engine.legal_moves(position)
            }
            _ => Vec::new(),
        }
    }
}

impl std::fmt::Debug for MoveValidationStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoveValidationStateMachine")
            .field("puzzle", &self.puzzle.as_ref().map(|p| &p.id))
            .field("state", &self.state)
            .field("current_index", &self.current_index)
            .field("orientation", &self.orientation)
            .finish_non_exhaustive()
    }
}
