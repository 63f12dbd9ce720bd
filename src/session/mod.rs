//! Session contexts - one owned state object per game window
//!
//! Each context is an isolated instance composing the game components with
//! the lifecycle controller. Nothing is shared between contexts except the
//! `Arc`'d rule engine and backend services.
//!
//! - [`BotSessionContext`] - a game against the bot, backed by a
//!   [`crate::networking::SessionService`]
//! - [`PuzzleSessionContext`] - a tactical puzzle, fed by a
//!   [`crate::networking::PuzzleSource`]
//!
//! # Frame Model
//!
//! Both contexts are driven by `update(delta)`, called once per frame. All
//! state changes happen inside command methods or `update`, on the caller's
//! thread. Commands that talk to the backend must be called from within a
//! tokio runtime; dropping a context aborts its in-flight requests.

pub mod bot;
pub mod error;
pub mod puzzle;

pub use bot::{BotSessionContext, RECONNECTED_MESSAGE};
pub use error::{SessionError, SessionResult};
pub use puzzle::PuzzleSessionContext;
