//! Session service seam
//!
//! Everything the client needs from the backend, expressed as an async trait
//! so contexts can hold an `Arc<dyn SessionService>` and spawn requests on
//! tokio. The wire protocol behind a production implementation is not part
//! of this crate; [`crate::networking::InMemorySessionService`] is the
//! reference implementation used by the CLI and the tests.
//!
//! # Requests
//!
//! | Method            | Used by                  |
//! |-------------------|--------------------------|
//! | `create_session`  | lifecycle `Create`       |
//! | `active_session`  | lifecycle `Reconnect`    |
//! | `forfeit`         | lifecycle `Forfeit`      |
//! | `close`           | lifecycle `Close`        |
//! | `suggest_move`    | hints                    |
//! | `sync_moves`      | history mirroring        |

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::ai::BotDifficulty;
use crate::game::puzzle::{PuzzleDefinition, PuzzleDifficulty};
use crate::game::resources::HelpTier;
use crate::game::types::{MoveRecord, Side};

/// Settings a bot session is created with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    pub difficulty: BotDifficulty,
    pub help_tier: HelpTier,
    /// Side the local player controls
    pub orientation: Side,
}

/// Server-side view of a bot session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: Uuid,
    pub user_id: String,
    pub config: SessionConfig,
    pub starting_fen: String,
    pub moves: Vec<MoveRecord>,
    pub created_at: DateTime<Utc>,
}

/// Failure of a remote request
///
/// Always recoverable: the caller keeps its state and the user may retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("Session service unavailable: {0}")]
    Unavailable(String),

    #[error("Session {0} not found")]
    SessionNotFound(Uuid),

    #[error("No {0} puzzles available")]
    NoPuzzles(PuzzleDifficulty),

    #[error("No move to suggest in this position")]
    NoSuggestion,

    #[error("Request rejected: {0}")]
    Rejected(String),
}

/// Result type alias for session service requests
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Backend operations for bot sessions
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Create a new session for `user_id`, replacing any active one
    async fn create_session(
        &self,
        user_id: &str,
        config: SessionConfig,
    ) -> ServiceResult<SessionRecord>;

    /// The user's unfinished session, if any
    async fn active_session(&self, user_id: &str) -> ServiceResult<Option<SessionRecord>>;

    /// Concede the session
    async fn forfeit(&self, session_id: Uuid) -> ServiceResult<()>;

    /// Close the session without a result
    async fn close(&self, session_id: Uuid) -> ServiceResult<()>;

    /// Suggested move for the side to move in `fen`
    async fn suggest_move(&self, fen: &str) -> ServiceResult<MoveRecord>;

    /// Replace the stored move list of the session
    async fn sync_moves(&self, session_id: Uuid, moves: Vec<MoveRecord>) -> ServiceResult<()>;
}

/// Source of puzzles for puzzle sessions
#[async_trait]
pub trait PuzzleSource: Send + Sync {
    async fn next_puzzle(&self, difficulty: PuzzleDifficulty) -> ServiceResult<PuzzleDefinition>;
}
