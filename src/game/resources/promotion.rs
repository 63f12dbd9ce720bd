//! Pawn promotion awaiting a piece choice
//!
//! When a dropped pawn reaches the last rank the move can't be applied until
//! the player picks a piece. The controller parks the move here, the UI
//! shows the picker, and `on_promotion_select` completes it.

use crate::game::types::{MoveRecord, PieceKind, Square};

/// A pawn move waiting for its promotion piece
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingPromotion {
    squares: Option<(Square, Square)>,
}

impl PendingPromotion {
    pub fn start(&mut self, from: Square, to: Square) {
        self.squares = Some((from, to));
    }

    pub fn clear(&mut self) {
        self.squares = None;
    }

    pub fn is_active(&self) -> bool {
        self.squares.is_some()
    }

    /// Squares of the parked move
    pub fn squares(&self) -> Option<(Square, Square)> {
        self.squares
    }

    /// Full move for the chosen piece, leaving the pending state untouched
    pub fn with_piece(&self, kind: PieceKind) -> Option<MoveRecord> {
        self.squares
            .map(|(from, to)| MoveRecord::with_promotion(from, to, kind))
    }
}
