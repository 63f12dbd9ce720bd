//! Session-level errors
//!
//! These surface when a session record from the backend can't be turned into
//! a local game. They never leave the session half-loaded: the previous local
//! state is kept whenever one of them is returned.

use crate::game::error::EngineError;
use crate::game::types::MoveRecord;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The stored starting position doesn't parse
    #[error("Session has an invalid starting position: {source}")]
    InvalidStart { source: EngineError },

    /// A stored move failed to replay
    #[error("Stored move {index} ({mv}) could not be replayed: {source}")]
    Replay {
        index: usize,
        mv: MoveRecord,
        source: EngineError,
    },
}

/// Result type alias for session operations
pub type SessionResult<T> = Result<T, SessionError>;
