//! Chess game logic - everything a session needs to play a game
//!
//! Pure, synchronous building blocks with the rule engine behind a trait.
//! Async work (hints, history sync) is started here but always polled back
//! in on the caller's thread, see [`controller`].
//!
//! # Module Organization
//!
//! - `types` - Side, squares, [`MoveRecord`](types::MoveRecord), positions
//! - `error` - Engine errors and player-facing validation errors
//! - `rules` - [`RuleEngine`](rules::RuleEngine) trait and the shakmaty adapter
//! - `resources` - Timer, delayed-move scheduler, help budget, history,
//!   selection, promotion, game outcome
//! - `puzzle` - Puzzle definitions, catalog and the move validation state
//!   machine
//! - `ai` - Bot difficulty and move generators
//! - `controller` - [`InteractiveGameController`](controller::InteractiveGameController)
//!   for games against the bot
//!
//! # Invariants
//!
//! - A move is never applied without passing through the rule engine
//! - The side to move always equals the engine's turn for the current position
//! - At most one deferred opponent move is pending per game; scheduling a new
//!   one replaces the old
//! - Help budgets never go below zero

pub mod ai;
pub mod controller;
pub mod error;
pub mod puzzle;
pub mod resources;
pub mod rules;
pub mod types;
