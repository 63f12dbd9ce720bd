//! Undo/hint budgets
//!
//! The player picks a help tier before a game. Each tier maps, through a
//! total function, to an [`Allowance`] that seeds both the undo and the hint
//! counter:
//!
//! | Tier        | Allowance       |
//! |-------------|-----------------|
//! | `Assisted`  | not limited     |
//! | `Friendly`  | 3 of each       |
//! | `Challenge` | none            |
//!
//! Counters only ever go down, and never below zero. An unlimited allowance
//! is a distinct value, not a large number, so it is never displayed as
//! "0 remaining".

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::game::error::ValidationError;
use crate::game::types::Square;

/// Named help level chosen before a session starts
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum HelpTier {
    /// Unlimited undos and hints
    Assisted,
    /// A few undos and hints
    #[default]
    Friendly,
    /// No help at all
    Challenge,
}

impl HelpTier {
    /// Budget granted by this tier
    pub fn allowance(self) -> Allowance {
        match self {
            HelpTier::Assisted => Allowance::Unlimited,
            HelpTier::Friendly => Allowance::Limited(3),
            HelpTier::Challenge => Allowance::Limited(0),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HelpTier::Assisted => "Assisted",
            HelpTier::Friendly => "Friendly",
            HelpTier::Challenge => "Challenge",
        }
    }
}

/// Remaining uses of one kind of help
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Allowance {
    Unlimited,
    Limited(u32),
}

impl Allowance {
    pub fn is_unlimited(self) -> bool {
        matches!(self, Allowance::Unlimited)
    }

    /// Whether at least one more use is available
    pub fn is_available(self) -> bool {
        match self {
            Allowance::Unlimited => true,
            Allowance::Limited(n) => n > 0,
        }
    }
}

impl fmt::Display for Allowance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Allowance::Unlimited => write!(f, "not limited"),
            Allowance::Limited(n) => write!(f, "{} remaining", n),
        }
    }
}

/// Which budget a request draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpKind {
    Undo,
    Hint,
}

/// Tracks undo/hint budgets and the hint currently shown on the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpBudgetManager {
    tier: HelpTier,
    remaining_undos: Allowance,
    remaining_hints: Allowance,
    hint: Option<[Square; 2]>,
}

impl Default for HelpBudgetManager {
    fn default() -> Self {
        Self::new(HelpTier::default())
    }
}

impl HelpBudgetManager {
    pub fn new(tier: HelpTier) -> Self {
        let allowance = tier.allowance();
        Self {
            tier,
            remaining_undos: allowance,
            remaining_hints: allowance,
            hint: None,
        }
    }

    /// Switch tier, refilling both counters and clearing the shown hint
    pub fn set_tier(&mut self, tier: HelpTier) {
        debug!("[HELP] Tier set to {} ({})", tier.label(), tier.allowance());
        *self = Self::new(tier);
    }

    /// Refill both counters for the current tier
    pub fn reset(&mut self) {
        self.set_tier(self.tier);
    }

    pub fn tier(&self) -> HelpTier {
        self.tier
    }

    pub fn remaining(&self, kind: HelpKind) -> Allowance {
        match kind {
            HelpKind::Undo => self.remaining_undos,
            HelpKind::Hint => self.remaining_hints,
        }
    }

    pub fn remaining_undos(&self) -> Allowance {
        self.remaining_undos
    }

    pub fn remaining_hints(&self) -> Allowance {
        self.remaining_hints
    }

    /// Check availability without spending
    pub fn check(&self, kind: HelpKind) -> Result<(), ValidationError> {
        if self.remaining(kind).is_available() {
            Ok(())
        } else {
            Err(match kind {
                HelpKind::Undo => ValidationError::NoUndosRemaining,
                HelpKind::Hint => ValidationError::NoHintsRemaining,
            })
        }
    }

    /// Spend one use; refused at zero, no-op when unlimited
    pub fn consume(&mut self, kind: HelpKind) -> Result<(), ValidationError> {
        self.check(kind)?;

        let slot = match kind {
            HelpKind::Undo => &mut self.remaining_undos,
            HelpKind::Hint => &mut self.remaining_hints,
        };
        if let Allowance::Limited(n) = slot {
            *n -= 1;
        }
        Ok(())
    }

    /// Hint arrow currently displayed, as `[from, to]`
    pub fn hint(&self) -> Option<[Square; 2]> {
        self.hint
    }

    pub fn show_hint(&mut self, from: Square, to: Square) {
        self.hint = Some([from, to]);
    }

    pub fn clear_hint(&mut self) {
        self.hint = None;
    }
}
