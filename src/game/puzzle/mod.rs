//! Tactical puzzles
//!
//! - [`PuzzleDefinition`] - starting FEN plus the scripted solution line
//! - [`PuzzleCatalog`] - validated local puzzles, served round-robin
//! - [`MoveValidationStateMachine`] - plays the script and judges the solver

pub mod catalog;
pub mod definition;
pub mod machine;


pub use catalog::PuzzleCatalog;
pub use definition::{PuzzleDefinition, PuzzleDifficulty, PuzzleError};
pub use machine::{
    MoveValidationStateMachine, PuzzleResult, PuzzleState, PuzzleTiming, SubmitOutcome,
    INCORRECT_MESSAGE, SOLVED_MESSAGE,
};
