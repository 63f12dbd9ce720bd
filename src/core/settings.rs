//! Client settings persistence
//!
//! Saves and loads [`ClientSettings`] to/from a JSON file so that the player's
//! identity and preferred session options survive restarts.
//!
//! # File Location
//!
//! Settings are stored as `settings.json` in the platform configuration
//! directory, e.g. `~/.config/XFChess/settings.json` on Linux. If no config
//! directory can be resolved, the current directory is used.
//!
//! # Error Handling
//!
//! - Load failures fall back to default settings
//! - Save failures are returned to the caller, which logs them and carries on

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::core::error::CoreResult;
use crate::game::ai::BotDifficulty;
use crate::game::puzzle::{PuzzleDifficulty, PuzzleTiming};
use crate::game::resources::HelpTier;
use crate::game::types::Side;
use crate::networking::SessionConfig;

/// Settings filename
const SETTINGS_FILENAME: &str = "settings.json";

/// User preferences for new sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Identity sent to the session service
    pub user_id: String,
    pub bot_difficulty: BotDifficulty,
    pub help_tier: HelpTier,
    /// Side the player takes in bot games
    pub orientation: Side,
    pub puzzle_difficulty: PuzzleDifficulty,
    /// Delay before each scripted puzzle reply, in milliseconds
    pub puzzle_reply_delay_ms: u64,
    /// Optional puzzle catalog replacing the built-in set
    pub puzzle_catalog: Option<PathBuf>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            user_id: "local-player".to_string(),
            bot_difficulty: BotDifficulty::default(),
            help_tier: HelpTier::default(),
            orientation: Side::White,
            puzzle_difficulty: PuzzleDifficulty::default(),
            puzzle_reply_delay_ms: 1000,
            puzzle_catalog: None,
        }
    }
}

impl ClientSettings {
    /// Configuration for a new bot session
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            difficulty: self.bot_difficulty,
            help_tier: self.help_tier,
            orientation: self.orientation,
        }
    }

    pub fn puzzle_timing(&self) -> PuzzleTiming {
        PuzzleTiming {
            reply_delay: std::time::Duration::from_millis(self.puzzle_reply_delay_ms),
            ..PuzzleTiming::default()
        }
    }
}

/// Resolve the settings file path
///
/// Falls back to a local `settings.json` if the system config dir cannot be
/// found.
pub fn settings_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "trilltino", "XFChess") {
        proj_dirs.config_dir().join(SETTINGS_FILENAME)
    } else {
        PathBuf::from(SETTINGS_FILENAME)
    }
}

/// Load settings from `path`, using defaults if missing or unreadable
pub fn load_settings_from(path: &Path) -> ClientSettings {
    if !path.exists() {
        info!("[SETTINGS] No settings file found at {:?}. Using defaults.", path);
        return ClientSettings::default();
    }

    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str::<ClientSettings>(&contents) {
            Ok(settings) => {
                info!("[SETTINGS] Loaded settings from {:?}", path);
                settings
            }
            Err(e) => {
                warn!(
                    "[SETTINGS] Failed to parse settings file at {:?}: {}. Using defaults.",
                    path, e
                );
                ClientSettings::default()
            }
        },
        Err(e) => {
            warn!(
                "[SETTINGS] Failed to read settings file at {:?}: {}. Using defaults.",
                path, e
            );
            ClientSettings::default()
        }
    }
}

/// Write `settings` to `path`, creating the directory if needed
pub fn save_settings_to(path: &Path, settings: &ClientSettings) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)?;
    info!("[SETTINGS] Saved settings to {:?}", path);
    Ok(())
}

/// Load settings from the platform config directory
pub fn load_settings() -> ClientSettings {
    load_settings_from(&settings_path())
}

/// Save settings to the platform config directory
pub fn save_settings(settings: &ClientSettings) -> CoreResult<()> {
    save_settings_to(&settings_path(), settings)
}
