//! Session resources - the building blocks each session owns
//!
//! Every session context owns its own instance of each resource. Nothing here
//! is global, so two sessions (a bot game and a puzzle) never share state.
//!
//! # Resource Categories
//!
//! ## Timing
//! - [`SessionTimer`] - Elapsed seconds, frame-driven, restartable
//! - [`DelayedMoveScheduler`] - The single pending opponent reply
//!
//! ## Player Help
//! - [`HelpBudgetManager`] - Undo/hint budgets per [`HelpTier`]
//!
//! ## Game History
//! - [`MoveHistory`] - Applied moves, used for undo and reconnect replay
//! - [`GameOutcome`] - Terminal result of a bot game
//!
//! ## Player Interaction
//! - [`Selection`] - Click-to-move selection and highlighted targets
//! - [`PendingPromotion`] - Pawn move waiting for a piece choice

pub mod game_over;
pub mod help;
pub mod history;
pub mod pending;
pub mod promotion;
pub mod selection;
pub mod timer;


pub use game_over::GameOutcome;
pub use help::{Allowance, HelpBudgetManager, HelpKind, HelpTier};
pub use history::MoveHistory;
pub use pending::DelayedMoveScheduler;
pub use promotion::PendingPromotion;
pub use selection::Selection;
pub use timer::{SessionTimer, TICK_INTERVAL};
