//! Puzzle definitions
//!
//! A puzzle is a starting position plus a scripted line. The side to move in
//! the starting position is the *opponent*: `solution_moves[0]` is its
//! opening reply, the solver plays every odd index and the script answers at
//! every even index.
//!
//! ```text
//! index:   0         1        2         3       ...
//! mover:   opponent  solver   opponent  solver
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::game::error::EngineError;
use crate::game::rules::RuleEngine;
use crate::game::types::{MoveRecord, Side};

/// Difficulty bucket used to pick puzzles
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum PuzzleDifficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl fmt::Display for PuzzleDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PuzzleDifficulty::Easy => write!(f, "easy"),
            PuzzleDifficulty::Normal => write!(f, "normal"),
            PuzzleDifficulty::Hard => write!(f, "hard"),
        }
    }
}

/// A scripted tactical puzzle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleDefinition {
    pub id: String,
    pub starting_fen: String,
    pub solution_moves: Vec<MoveRecord>,
    pub difficulty: PuzzleDifficulty,
    #[serde(default)]
    pub rating: u32,
    #[serde(default)]
    pub popularity: i32,
    #[serde(default)]
    pub themes: Vec<String>,
}

/// Why a puzzle definition can't be played
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PuzzleError {
    #[error("Puzzle {id} has an unusable starting position: {source}")]
    InvalidPosition { id: String, source: EngineError },

    #[error("Puzzle {id} has no solution moves")]
    EmptySolution { id: String },

    #[error("Puzzle {id} move {index} ({mv}) is not legal: {source}")]
    IllegalSolutionMove {
        id: String,
        index: usize,
        mv: MoveRecord,
        source: EngineError,
    },
}

impl PuzzleDefinition {
    /// Whether the move at `index` is played by the solver
    pub fn is_solver_index(index: usize) -> bool {
        index % 2 == 1
    }

    /// Number of moves the solver has to find
    pub fn solver_move_count(&self) -> usize {
        self.solution_moves.len() / 2
    }

    /// Side the solver plays, read from the starting position
    pub fn solver_side(&self, engine: &dyn RuleEngine) -> Result<Side, PuzzleError> {
        engine
            .load(&self.starting_fen)
            .map(|position| position.turn().opposite())
            .map_err(|source| PuzzleError::InvalidPosition {
                id: self.id.clone(),
                source,
            })
    }

    /// Check that the whole script replays legally from the starting position
    pub fn validate(&self, engine: &dyn RuleEngine) -> Result<(), PuzzleError> {
        if self.solution_moves.is_empty() {
            return Err(PuzzleError::EmptySolution {
                id: self.id.clone(),
            });
        }

        let start = engine
            .load(&self.starting_fen)
            .map_err(|source| PuzzleError::InvalidPosition {
                id: self.id.clone(),
                source,
            })?;

        engine
            .replay(&start, &self.solution_moves)
            .map(|_| ())
            .map_err(|(index, source)| PuzzleError::IllegalSolutionMove {
                id: self.id.clone(),
                index,
                mv: self.solution_moves[index],
                source,
            })
    }
}
