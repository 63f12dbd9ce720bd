//! Square selection for click-to-move input

use crate::game::types::{MoveRecord, Square};

/// Currently selected square and the legal targets highlighted from it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<Square>,
    targets: Vec<Square>,
}

impl Selection {
    /// Select `square`, highlighting the destinations of `moves`
    pub fn select(&mut self, square: Square, moves: &[MoveRecord]) {
        self.selected = Some(square);
        self.targets.clear();
        for mv in moves {
            // promotions yield one move per piece kind on the same square
            if !self.targets.contains(&mv.to) {
                self.targets.push(mv.to);
            }
        }
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.targets.clear();
    }

    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    pub fn targets(&self) -> &[Square] {
        &self.targets
    }

    pub fn is_target(&self, square: Square) -> bool {
        self.targets.contains(&square)
    }

    pub fn is_selected(&self) -> bool {
        self.selected.is_some()
    }
}
