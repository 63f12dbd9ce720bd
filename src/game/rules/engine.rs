//! Rule engine trait
//!
//! Implementations must be pure with respect to [`Position`]: the same input
//! always yields the same output and the input is never modified.

use crate::game::error::EngineResult;
use crate::game::types::{MoveRecord, Position, Side, Square};

/// Status of a position as judged by the rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Side to move has at least one legal move and no draw applies
    Ongoing,
    /// Side to move is checkmated; `winner` delivered the mate
    Checkmate { winner: Side },
    /// Side to move has no legal moves but is not in check
    Stalemate,
    /// Automatic draw (insufficient material, seventy-five move rule)
    Draw,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::Ongoing)
    }
}

/// Chess legality and serialization, as consumed by the session core
pub trait RuleEngine: Send + Sync {
    /// The standard starting position
    fn initial(&self) -> Position;

    /// Parse a FEN string into a position
    fn load(&self, fen: &str) -> EngineResult<Position>;

    /// Apply `mv` to `position`, returning the new position
    ///
    /// Fails with [`crate::game::error::EngineError::IllegalMove`] when the
    /// move is not among the legal moves of `position`.
    fn apply_move(&self, position: &Position, mv: &MoveRecord) -> EngineResult<Position>;

    /// All legal moves in `position`
    fn legal_moves(&self, position: &Position) -> Vec<MoveRecord>;

    /// Terminal-state detection for `position`
    fn status(&self, position: &Position) -> GameStatus;

    /// Side to move
    fn turn(&self, position: &Position) -> Side {
        position.turn()
    }

    /// Serialized (FEN) form of `position`
    fn serialize(&self, position: &Position) -> String {
        position.fen().to_string()
    }

    /// Legal moves starting on `from`
    fn legal_moves_from(&self, position: &Position, from: Square) -> Vec<MoveRecord> {
        self.legal_moves(position)
            .into_iter()
            .filter(|mv| mv.from == from)
            .collect()
    }

    /// Whether moving `from` → `to` needs a promotion piece to be chosen
    fn requires_promotion(&self, position: &Position, from: Square, to: Square) -> bool {
        self.legal_moves(position)
            .iter()
            .any(|mv| mv.from == from && mv.to == to && mv.promotion.is_some())
    }

    /// Replay `moves` from `start`, stopping at the first move that fails
    ///
    /// On failure returns the index of the offending move with the error.
    fn replay(
        &self,
        start: &Position,
        moves: &[MoveRecord],
    ) -> Result<Position, (usize, crate::game::error::EngineError)> {
        let mut position = start.clone();
        for (index, mv) in moves.iter().enumerate() {
            position = self
                .apply_move(&position, mv)
                .map_err(|err| (index, err))?;
        }
        Ok(position)
    }
}
