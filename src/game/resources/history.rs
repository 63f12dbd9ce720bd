//! Move history tracking
//!
//! Maintains the chronological record of every move applied in a bot game.
//! Together with the starting position it is the source of truth for the
//! board: undo works by truncating the history and replaying it, and
//! reconnect rebuilds the board the same way from the stored copy.
//!
//! Index 0 is the first move played from the starting position, by whichever
//! side was to move there. The mover of any ply is therefore derived from the
//! starting side, see [`MoveHistory::mover_of`].

use crate::game::types::{MoveRecord, Side};

/// Ordered list of applied moves
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveHistory {
    moves: Vec<MoveRecord>,
}

impl MoveHistory {
    pub fn from_moves(moves: Vec<MoveRecord>) -> Self {
        Self { moves }
    }

    /// Append a move. Call only after the engine accepted it.
    pub fn add_move(&mut self, record: MoveRecord) {
        self.moves.push(record);
    }

    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.moves.last()
    }

    /// Number of half-moves (ply) played
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }

    /// Drop every move from `len` onwards
    pub fn truncate(&mut self, len: usize) {
        self.moves.truncate(len);
    }

    pub fn get_move(&self, index: usize) -> Option<&MoveRecord> {
        self.moves.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MoveRecord> {
        self.moves.iter()
    }

    pub fn as_slice(&self) -> &[MoveRecord] {
        &self.moves
    }

    /// Side that played ply `index`, given the side to move at the start
    pub fn mover_of(index: usize, starting_side: Side) -> Side {
        if index % 2 == 0 {
            starting_side
        } else {
            starting_side.opposite()
        }
    }

    /// Index of the most recent ply played by `side`
    pub fn last_index_by(&self, side: Side, starting_side: Side) -> Option<usize> {
        (0..self.moves.len())
            .rev()
            .find(|&index| Self::mover_of(index, starting_side) == side)
    }

    /// Moves in UCI notation separated by spaces
    pub fn to_uci_line(&self) -> String {
        self.moves
            .iter()
            .map(MoveRecord::to_uci)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
