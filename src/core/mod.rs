//! Core module - application infrastructure shared by every session
//!
//! # Contents
//!
//! - [`ClientSettings`] - user preferences persisted as JSON in the platform
//!   config directory, see [`settings`]
//! - [`CoreError`] / [`CoreResult`] - errors of the settings and catalog I/O
//! - [`init_logging`] - `tracing` subscriber for the binary
//!
//! Nothing here knows about chess; the game and session modules build on it.

pub mod error;
pub mod logging;
pub mod settings;

pub use error::{CoreError, CoreResult};
pub use logging::init_logging;
pub use settings::{
    load_settings, load_settings_from, save_settings, save_settings_to, settings_path,
    ClientSettings,
};
