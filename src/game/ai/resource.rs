//! Bot opponent configuration
//!
//! The bot doesn't think: its strength is not modelled here. Difficulty only
//! controls how long the client waits before the bot's reply lands on the
//! board, so that a reply never appears in the same frame as the player's
//! move.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Bot difficulty level
///
/// Stored with the session record so a reconnect restores the same pacing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum BotDifficulty {
    /// Quick replies, 0.4 seconds
    Easy,

    /// 0.8 seconds per reply
    #[default]
    Medium,

    /// Slow, deliberate replies, 1.2 seconds
    Hard,
}

impl BotDifficulty {
    /// Delay between the player's move and the bot's reply
    ///
    /// # Returns
    ///
    /// - Easy: 400ms
    /// - Medium: 800ms
    /// - Hard: 1200ms
    pub fn reply_delay(self) -> Duration {
        match self {
            BotDifficulty::Easy => Duration::from_millis(400),
            BotDifficulty::Medium => Duration::from_millis(800),
            BotDifficulty::Hard => Duration::from_millis(1200),
        }
    }
}

impl fmt::Display for BotDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotDifficulty::Easy => write!(f, "Easy"),
            BotDifficulty::Medium => write!(f, "Medium"),
            BotDifficulty::Hard => write!(f, "Hard"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_difficulty_default() {
        //! Medium is what a fresh settings file starts with
        assert_eq!(BotDifficulty::default(), BotDifficulty::Medium);
    }

    #[test]
    fn test_reply_delay_allocation() {
        assert_eq!(BotDifficulty::Easy.reply_delay(), Duration::from_millis(400));
        assert_eq!(BotDifficulty::Medium.reply_delay(), Duration::from_millis(800));
        assert_eq!(BotDifficulty::Hard.reply_delay(), Duration::from_millis(1200));
    }

    #[test]
    fn test_delay_increases_with_difficulty() {
        //! Verifies harder bots take longer to answer
        let easy = BotDifficulty::Easy.reply_delay();
        let medium = BotDifficulty::Medium.reply_delay();
        let hard = BotDifficulty::Hard.reply_delay();

        assert!(easy < medium);
        assert!(medium < hard);
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&BotDifficulty::Hard).unwrap();
        assert_eq!(json, "\"hard\"");

        let parsed: BotDifficulty = serde_json::from_str("\"easy\"").unwrap();
        assert_eq!(parsed, BotDifficulty::Easy);
    }
}
