//! Local puzzle catalog
//!
//! Puzzles are loaded from JSON (an array of [`PuzzleDefinition`]) and served
//! round-robin per difficulty. Every puzzle is replayed through the rule
//! engine on load, so a catalog never hands out a script that can't be
//! played.
//!
//! A small built-in set ships with the crate and backs the CLI when no
//! catalog file is configured.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

use super::definition::{PuzzleDefinition, PuzzleDifficulty, PuzzleError};
use crate::core::error::{CoreError, CoreResult};
use crate::game::rules::RuleEngine;
use crate::networking::service::{PuzzleSource, ServiceError, ServiceResult};

const BUILTIN_PUZZLES: &str = include_str!("../../../data/puzzles.json");

/// Validated puzzles with a round-robin cursor per difficulty
#[derive(Debug, Default)]
pub struct PuzzleCatalog {
    puzzles: Vec<PuzzleDefinition>,
    cursors: Mutex<HashMap<PuzzleDifficulty, usize>>,
}

impl PuzzleCatalog {
    /// Build a catalog, rejecting it if any puzzle fails validation
    pub fn new(
        puzzles: Vec<PuzzleDefinition>,
        engine: &dyn RuleEngine,
    ) -> Result<Self, PuzzleError> {
        for puzzle in &puzzles {
            puzzle.validate(engine)?;
        }

        Ok(Self {
            puzzles,
            cursors: Mutex::new(HashMap::new()),
        })
    }

    /// Parse a JSON array of puzzles
    pub fn from_json(json: &str, engine: &dyn RuleEngine) -> CoreResult<Self> {
        let puzzles: Vec<PuzzleDefinition> = serde_json::from_str(json)?;
        Self::new(puzzles, engine).map_err(|e| CoreError::Catalog {
            message: e.to_string(),
        })
    }

    /// Load a catalog file
    pub fn load(path: &Path, engine: &dyn RuleEngine) -> CoreResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&json, engine)?;
        info!(
            "[PUZZLE] Loaded {} puzzles from {:?}",
            catalog.len(),
            path
        );
        Ok(catalog)
    }

    /// The puzzles bundled with the crate
    pub fn builtin(engine: &dyn RuleEngine) -> CoreResult<Self> {
        Self::from_json(BUILTIN_PUZZLES, engine)
    }

    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }

    pub fn count(&self, difficulty: PuzzleDifficulty) -> usize {
        self.puzzles
            .iter()
            .filter(|p| p.difficulty == difficulty)
            .count()
    }

    pub fn get(&self, id: &str) -> Option<&PuzzleDefinition> {
        self.puzzles.iter().find(|p| p.id == id)
    }

    /// Next puzzle of `difficulty`, wrapping around at the end
    pub fn next(&self, difficulty: PuzzleDifficulty) -> Option<PuzzleDefinition> {
        let matching: Vec<&PuzzleDefinition> = self
            .puzzles
            .iter()
            .filter(|p| p.difficulty == difficulty)
            .collect();

        if matching.is_empty() {
            warn!("[PUZZLE] No {} puzzles in catalog", difficulty);
            return None;
        }

        let mut cursors = self.cursors.lock();
        let cursor = cursors.entry(difficulty).or_insert(0);
        let puzzle = matching[*cursor % matching.len()].clone();
        *cursor = (*cursor + 1) % matching.len();
        Some(puzzle)
    }
}

#[async_trait]
impl PuzzleSource for PuzzleCatalog {
    async fn next_puzzle(&self, difficulty: PuzzleDifficulty) -> ServiceResult<PuzzleDefinition> {
        self.next(difficulty)
            .ok_or(ServiceError::NoPuzzles(difficulty))
    }
}
