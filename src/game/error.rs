//! Error types for game module
//!
//! Two families live here:
//!
//! - [`EngineError`] - failures reported by the rule engine adapter (bad FEN,
//!   illegal move, unparseable notation)
//! - [`ValidationError`] - local, recoverable rejections of a user command.
//!   Their `Display` text is the user-facing message shown by the client.

use crate::game::types::MoveRecord;

/// Errors reported by a [`crate::game::rules::RuleEngine`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// FEN could not be parsed or describes an impossible position
    #[error("Invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },

    /// Move is not legal in the given position
    #[error("Illegal move {mv} in position '{fen}'")]
    IllegalMove { mv: MoveRecord, fen: String },

    /// Square or move notation could not be parsed
    #[error("Invalid notation: '{notation}'")]
    InvalidNotation { notation: String },
}

/// Result type alias for rule engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Recoverable rejection of a player command
///
/// Never fatal: the session state is untouched and the caller may retry
/// immediately.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("No active game. Start or reconnect a session first.")]
    NoActiveSession,

    #[error("It's not your turn.")]
    NotYourTurn,

    #[error("Illegal move: {mv}")]
    IllegalMove { mv: MoveRecord },

    #[error("The game is over.")]
    GameOver,

    #[error("No undos remaining.")]
    NoUndosRemaining,

    #[error("No hints remaining.")]
    NoHintsRemaining,

    #[error("No move to undo.")]
    NothingToUndo,

    #[error("A hint is already on its way.")]
    HintPending,

    #[error("Puzzle already completed.")]
    PuzzleCompleted,

    #[error("Wait for your opponent's move.")]
    AwaitingReply,

    #[error("Choose a promotion piece first.")]
    PromotionPending,

    #[error("No promotion is waiting for a piece.")]
    NoPromotionPending,

    #[error("Help level can't be changed during a game.")]
    TierLocked,

    #[error("Finish or close your current game first.")]
    GameInProgress,
}
