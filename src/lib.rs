//! Client-side chess session core
//!
//! Keeps a local chess position, the player's undo/hint budgets, a puzzle's
//! scripted line and the async create/reconnect/forfeit/close lifecycle
//! consistent while requests are in flight and opponent moves are delayed.
//!
//! # Layout
//!
//! - [`core`] - settings persistence, logging, core errors
//! - [`game`] - rules seam, session resources, puzzles, bot controller
//! - [`networking`] - backend traits, in-memory service, lifecycle requests
//! - [`session`] - the bot and puzzle session contexts
//!
//! # Example
//!
//! ```rust,ignore
//! let engine: Arc<dyn RuleEngine> = Arc::new(ShakmatyEngine::new());
//! let service = Arc::new(InMemorySessionService::new(engine.clone()));
//! let mut bot = BotSessionContext::new("alice", engine, service, SessionConfig::default());
//!
//! bot.create();
//! loop {
//!     bot.update(frame_delta);
//!     // render bot.controller().fen(), bot.message(), ...
//! }
//! ```

pub mod core;
pub mod game;
pub mod networking;
pub mod session;
