//! Bot opponent
//!
//! The bot replies to the player's moves after a difficulty-dependent delay.
//!
//! # Architecture
//!
//! - [`BotDifficulty`]: reply pacing stored with each session
//! - [`MoveGenerator`]: picks the reply from the engine's legal moves
//! - The controller schedules a reply whenever it becomes the bot's turn and
//!   plays it through the same validation path as the player's moves
//!
//! Move *quality* is not modelled. [`RandomMover`] is the default generator.

pub mod mover;
pub mod resource;

pub use mover::{FirstLegalMover, MoveGenerator, RandomMover};
pub use resource::BotDifficulty;
