//! Bot move selection
//!
//! Picking a good move is out of scope for the client; the bot only needs a
//! legal one. [`MoveGenerator`] is the seam where a real engine would plug
//! in. [`RandomMover`] picks uniformly among the legal moves.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game::types::MoveRecord;

/// Chooses the bot's reply among the legal moves of the position
pub trait MoveGenerator: Send {
    /// Pick one of `legal_moves`, `None` when the slice is empty
    fn choose(&mut self, fen: &str, legal_moves: &[MoveRecord]) -> Option<MoveRecord>;
}

/// Uniformly random legal move
#[derive(Debug, Clone)]
pub struct RandomMover {
    rng: StdRng,
}

impl RandomMover {
    /// Entropy-seeded mover for real games
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic mover, replays the same choices for the same seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomMover {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveGenerator for RandomMover {
    fn choose(&mut self, _fen: &str, legal_moves: &[MoveRecord]) -> Option<MoveRecord> {
        if legal_moves.is_empty() {
            return None;
        }
        let index = self.rng.random_range(0..legal_moves.len());
        Some(legal_moves[index])
    }
}

/// Always plays the first legal move in engine order
///
/// Handy when a test needs to know the bot's reply in advance.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstLegalMover;

impl MoveGenerator for FirstLegalMover {
    fn choose(&mut self, _fen: &str, legal_moves: &[MoveRecord]) -> Option<MoveRecord> {
        legal_moves.first().copied()
    }
}
