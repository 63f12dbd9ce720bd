//! Puzzle session context
//!
//! Wraps the [`MoveValidationStateMachine`] with puzzle fetching and a hint
//! budget. Creating a session fetches the next puzzle from the
//! [`PuzzleSource`] through the lifecycle statuses; closing is local and
//! immediate.
//!
//! A puzzle hint reveals the squares of the expected move and costs one hint
//! from the current tier's budget. Resetting a puzzle doesn't refill it.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::game::error::ValidationError;
use crate::game::puzzle::{
    MoveValidationStateMachine, PuzzleDifficulty, PuzzleState, PuzzleTiming, SubmitOutcome,
};
use crate::game::resources::{HelpBudgetManager, HelpKind, HelpTier};
use crate::game::rules::RuleEngine;
use crate::game::types::{MoveRecord, Square};
use crate::networking::lifecycle::{
    LifecycleAction, LifecycleReply, LifecycleStatus, SessionLifecycleController,
};
use crate::networking::service::{PuzzleSource, ServiceResult};

/// Session context for tactical puzzles
pub struct PuzzleSessionContext {
    source: Arc<dyn PuzzleSource>,
    machine: MoveValidationStateMachine,
    lifecycle: SessionLifecycleController,
    help: HelpBudgetManager,
    difficulty: PuzzleDifficulty,
    /// Rejection of a context-level command (hint, tier)
    notice: Option<String>,
}

impl PuzzleSessionContext {
    pub fn new(
        engine: Arc<dyn RuleEngine>,
        source: Arc<dyn PuzzleSource>,
        tier: HelpTier,
        timing: PuzzleTiming,
    ) -> Self {
        Self {
            source,
            machine: MoveValidationStateMachine::with_timing(engine, timing),
            lifecycle: SessionLifecycleController::new(),
            help: HelpBudgetManager::new(tier),
            difficulty: PuzzleDifficulty::default(),
            notice: None,
        }
    }

    /// Fetch a puzzle of `difficulty` and start it once it arrives
    pub fn create(&mut self, difficulty: PuzzleDifficulty) {
        self.notice = None;
        self.difficulty = difficulty;
        let source = Arc::clone(&self.source);
        self.lifecycle.issue(LifecycleAction::Create, async move {
            source
                .next_puzzle(difficulty)
                .await
                .map(LifecycleReply::Puzzle)
        });
    }

    /// Fetch the next puzzle at the current difficulty
    pub fn next_puzzle(&mut self) {
        self.create(self.difficulty);
    }

    /// Drop the current puzzle
    pub fn close(&mut self) {
        self.lifecycle.cancel(LifecycleAction::Create);
        self.machine.teardown();
        self.help.clear_hint();
        self.lifecycle.succeed(LifecycleAction::Close, "Puzzle closed.");
    }

    pub fn dismiss(&mut self, action: LifecycleAction) {
        self.lifecycle.dismiss(action);
    }

    pub fn submit_move(&mut self, candidate: MoveRecord) -> Result<SubmitOutcome, ValidationError> {
        self.notice = None;
        let outcome = self.machine.submit_move(candidate)?;
        self.help.clear_hint();
        Ok(outcome)
    }

    /// Restart the current puzzle; the hint budget is kept
    pub fn reset_puzzle(&mut self) -> Result<(), ValidationError> {
        self.notice = None;
        self.machine.reset()?;
        self.help.clear_hint();
        Ok(())
    }

    /// Reveal the squares of the expected move
    pub fn request_hint(&mut self) -> Result<[Square; 2], ValidationError> {
        self.notice = None;
        let expected = match self.machine.state() {
            PuzzleState::Idle => return self.reject(ValidationError::NoActiveSession),
            PuzzleState::Completed(_) => return self.reject(ValidationError::PuzzleCompleted),
            PuzzleState::AwaitingScriptedReply => {
                return self.reject(ValidationError::AwaitingReply)
            }
            PuzzleState::AwaitingSolverMove => self.machine.expected_move(),
        };
        let Some(expected) = expected else {
            return self.reject(ValidationError::NoActiveSession);
        };

        if let Err(e) = self.help.consume(HelpKind::Hint) {
            return self.reject(e);
        }
        self.help.show_hint(expected.from, expected.to);
        info!(
            "[HINT] Puzzle hint {}{} (hints {})",
            expected.from,
            expected.to,
            self.help.remaining_hints()
        );
        Ok([expected.from, expected.to])
    }

    /// Change the help tier; refused while a puzzle is being solved
    pub fn set_tier(&mut self, tier: HelpTier) -> Result<(), ValidationError> {
        if matches!(
            self.machine.state(),
            PuzzleState::AwaitingScriptedReply | PuzzleState::AwaitingSolverMove
        ) {
            return self.reject(ValidationError::TierLocked);
        }
        self.help.set_tier(tier);
        Ok(())
    }

    fn reject<T>(&mut self, err: ValidationError) -> Result<T, ValidationError> {
        self.notice = Some(err.to_string());
        Err(err)
    }

    /// Advance one frame: fire scripted replies and apply a fetched puzzle
    pub fn update(&mut self, delta: Duration) -> bool {
        let mut changed = self.machine.update(delta);
        for (action, result) in self.lifecycle.poll() {
            changed |= self.apply_reply(action, result);
        }
        changed
    }

    fn apply_reply(&mut self, action: LifecycleAction, result: ServiceResult<LifecycleReply>) -> bool {
        match (action, result) {
            (LifecycleAction::Create, Ok(LifecycleReply::Puzzle(puzzle))) => {
                let id = puzzle.id.clone();
                match self.machine.start(puzzle) {
                    Ok(()) => {
                        self.help.reset();
                        self.lifecycle.dismiss(LifecycleAction::Close);
                        self.lifecycle.succeed(action, format!("Puzzle {} loaded.", id));
                        true
                    }
                    Err(e) => {
                        self.lifecycle.fail(action, e.to_string());
                        false
                    }
                }
            }
            (action, Ok(reply)) => {
                debug!("[PUZZLE] Ignoring {} reply {:?}", action, reply);
                self.lifecycle
                    .fail(action, format!("Unexpected reply to {}", action));
                false
            }
            (action, Err(e)) => {
                self.lifecycle.fail(action, e.to_string());
                false
            }
        }
    }

    pub fn machine(&self) -> &MoveValidationStateMachine {
        &self.machine
    }

    pub fn help(&self) -> &HelpBudgetManager {
        &self.help
    }

    pub fn hint(&self) -> Option<[Square; 2]> {
        self.help.hint()
    }

    pub fn difficulty(&self) -> PuzzleDifficulty {
        self.difficulty
    }

    pub fn status(&self, action: LifecycleAction) -> &LifecycleStatus {
        self.lifecycle.status(action)
    }

    pub fn is_busy(&self) -> bool {
        self.lifecycle.is_busy()
    }

    /// Latest message for the solver: lifecycle error, own notice, puzzle text
    pub fn message(&self) -> Option<&str> {
        self.lifecycle
            .status(LifecycleAction::Create)
            .error()
            .or(self.notice.as_deref())
            .or_else(|| self.machine.message())
    }
}
