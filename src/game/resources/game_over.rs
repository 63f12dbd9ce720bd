//! Game outcome tracking
//!
//! A bot game ends when the engine reports a terminal position (checkmate,
//! stalemate, automatic draw) or when the local player forfeits. Once an
//! outcome is recorded the controller refuses further moves until the
//! session is closed or a new one is created.

use crate::game::rules::GameStatus;
use crate::game::types::Side;

/// How a finished game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Checkmate { winner: Side },
    Stalemate,
    Draw,
    Resignation { winner: Side },
}

impl GameOutcome {
    /// Outcome for a terminal engine status, `None` while the game goes on
    pub fn from_status(status: GameStatus) -> Option<Self> {
        match status {
            GameStatus::Ongoing => None,
            GameStatus::Checkmate { winner } => Some(GameOutcome::Checkmate { winner }),
            GameStatus::Stalemate => Some(GameOutcome::Stalemate),
            GameStatus::Draw => Some(GameOutcome::Draw),
        }
    }

    /// Human-readable result text
    pub fn message(&self) -> String {
        match self {
            GameOutcome::Checkmate { winner } => format!("{} wins by checkmate!", winner),
            GameOutcome::Stalemate => "Draw by stalemate".to_string(),
            GameOutcome::Draw => "Draw".to_string(),
            GameOutcome::Resignation { winner } => format!("{} wins by resignation", winner),
        }
    }

    pub fn winner(&self) -> Option<Side> {
        match self {
            GameOutcome::Checkmate { winner } | GameOutcome::Resignation { winner } => {
                Some(*winner)
            }
            GameOutcome::Stalemate | GameOutcome::Draw => None,
        }
    }

    pub fn is_draw(&self) -> bool {
        self.winner().is_none()
    }
}
