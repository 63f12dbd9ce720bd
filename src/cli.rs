//! Command-line interface for the session client

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use xfchess_session::core::ClientSettings;
use xfchess_session::game::ai::BotDifficulty;
use xfchess_session::game::puzzle::PuzzleDifficulty;
use xfchess_session::game::resources::HelpTier;
use xfchess_session::game::types::Side;

/// XFChess session client - bot games and tactical puzzles in the terminal
#[derive(Parser, Debug)]
#[command(name = "xfchess-session")]
#[command(about = "Play the bot or solve puzzles against a local session service", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Player identity sent to the session service
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Help level for the session
    #[arg(long, value_enum, global = true)]
    pub tier: Option<HelpTier>,

    /// Write the effective options back to the settings file
    #[arg(long, global = true)]
    pub save: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Solve tactical puzzles
    Puzzle {
        #[arg(short, long, value_enum)]
        difficulty: Option<PuzzleDifficulty>,

        /// JSON puzzle catalog replacing the built-in set
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Delay before each scripted reply, in milliseconds
        #[arg(long)]
        reply_delay_ms: Option<u64>,
    },

    /// Play a game against the bot
    Bot {
        #[arg(short, long, value_enum)]
        difficulty: Option<BotDifficulty>,

        /// Side you play
        #[arg(long, value_enum)]
        orientation: Option<Side>,

        /// Seed for the bot's move choice
        #[arg(long)]
        seed: Option<u64>,
    },
}

impl Cli {
    /// Overlay command-line options on the stored settings
    pub fn apply(&self, settings: &mut ClientSettings) {
        if let Some(user) = &self.user {
            settings.user_id = user.clone();
        }
        if let Some(tier) = self.tier {
            settings.help_tier = tier;
        }

        match &self.command {
            Command::Puzzle {
                difficulty,
                catalog,
                reply_delay_ms,
            } => {
                if let Some(difficulty) = difficulty {
                    settings.puzzle_difficulty = *difficulty;
                }
                if let Some(catalog) = catalog {
                    settings.puzzle_catalog = Some(catalog.clone());
                }
                if let Some(delay) = reply_delay_ms {
                    settings.puzzle_reply_delay_ms = *delay;
                }
            }
            Command::Bot {
                difficulty,
                orientation,
                ..
            } => {
                if let Some(difficulty) = difficulty {
                    settings.bot_difficulty = *difficulty;
                }
                if let Some(orientation) = orientation {
                    settings.orientation = *orientation;
                }
            }
        }
    }
}
