//! Chess rules module - the rule engine seam
//!
//! Session logic never inspects board internals. Everything it needs from
//! chess rules goes through the [`RuleEngine`] trait:
//!
//! - load/serialize positions (FEN)
//! - apply a [`MoveRecord`](crate::game::types::MoveRecord) or reject it
//! - enumerate legal moves (selection highlighting, bot replies)
//! - report [`GameStatus`] (checkmate/stalemate/draw detection)
//!
//! # Module Structure
//!
//! - `engine` - The [`RuleEngine`] trait and [`GameStatus`]
//! - `shakmaty_engine` - [`ShakmatyEngine`], the production adapter backed by
//!   the `shakmaty` move generator

pub mod engine;
pub mod shakmaty_engine;

#[cfg(test)]
mod tests;

pub use engine::{GameStatus, RuleEngine};
pub use shakmaty_engine::ShakmatyEngine;
