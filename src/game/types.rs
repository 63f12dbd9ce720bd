//! Core chess value types shared by every session component
//!
//! These are deliberately engine-agnostic: the rule engine adapter in
//! [`crate::game::rules`] converts them to and from whatever representation
//! the backing engine uses.
//!
//! # Notation
//!
//! - [`Square`] uses algebraic notation (`"e4"`)
//! - [`MoveRecord`] uses UCI long algebraic notation (`"e2e4"`, `"e7e8q"`)
//! - Castling is written as the king's own move (`"e1g1"`), never king-takes-rook
//!
//! Both types serialize as their notation strings so that puzzle catalogs and
//! session records stay human-readable JSON.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::game::error::EngineError;

/// Which side a player controls or which side is to move
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    White,
    Black,
}

impl Side {
    /// The other side
    pub fn opposite(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => write!(f, "White"),
            Side::Black => write!(f, "Black"),
        }
    }
}

/// Kind of chess piece
///
/// Only [`PieceKind::is_promotion_target`] kinds may appear in
/// [`MoveRecord::promotion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Parse a lowercase or uppercase piece letter (`'q'`, `'N'`, ...)
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Lowercase piece letter as used in UCI promotion suffixes
    pub fn to_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    /// Whether a pawn may promote to this kind
    pub fn is_promotion_target(self) -> bool {
        matches!(
            self,
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen
        )
    }
}

/// Board file (column), 0 = file 'a' through 7 = file 'h'
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct File(u8);

impl File {
    /// Create a file from a character ('a'..='h')
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'a'..='h' => Some(File(c as u8 - b'a')),
            _ => None,
        }
    }

    /// Convert file to character ('a'..='h')
    pub fn to_char(self) -> char {
        (b'a' + self.0) as char
    }

    /// Get the file index (0-7)
    pub fn index(self) -> u8 {
        self.0
    }
}

/// Board rank (row), 0 = rank 1 through 7 = rank 8
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rank(u8);

impl Rank {
    /// Create a rank from its board number (1-8)
    pub fn from_number(n: u8) -> Option<Self> {
        if (1..=8).contains(&n) {
            Some(Rank(n - 1))
        } else {
            None
        }
    }

    /// Convert rank to its board number (1-8)
    pub fn to_number(self) -> u8 {
        self.0 + 1
    }

    /// Get the rank index (0-7)
    pub fn index(self) -> u8 {
        self.0
    }
}

/// Board square, combining [`File`] and [`Rank`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square {
    file: File,
    rank: Rank,
}

impl Square {
    /// Create a square from file and rank indices (both 0-7)
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        if file < 8 && rank < 8 {
            Some(Square {
                file: File(file),
                rank: Rank(rank),
            })
        } else {
            None
        }
    }

    /// Create a square from algebraic notation (e.g., "e4")
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let file = File::from_char(chars.next()?)?;
        let rank_num = chars.next()?.to_digit(10)? as u8;
        if chars.next().is_some() {
            return None;
        }

        Some(Square {
            file,
            rank: Rank::from_number(rank_num)?,
        })
    }

    pub fn file(self) -> File {
        self.file
    }

    pub fn rank(self) -> Rank {
        self.rank
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file.to_char(), self.rank.to_number())
    }
}

impl FromStr for Square {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_algebraic(s).ok_or_else(|| EngineError::InvalidNotation {
            notation: s.to_string(),
        })
    }
}

impl TryFrom<String> for Square {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Square> for String {
    fn from(square: Square) -> Self {
        square.to_string()
    }
}

/// A single move as entered by a player, a script or the bot
///
/// Immutable once created. Equality is exact: `from`, `to` and `promotion`
/// must all match, which is what puzzle validation relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MoveRecord {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl MoveRecord {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    pub fn with_promotion(from: Square, to: Square, promotion: PieceKind) -> Self {
        Self {
            from,
            to,
            promotion: Some(promotion),
        }
    }

    /// Parse UCI long algebraic notation (`e2e4`, `e7e8q`)
    pub fn from_uci(uci: &str) -> Result<Self, EngineError> {
        let invalid = || EngineError::InvalidNotation {
            notation: uci.to_string(),
        };

        let uci = uci.trim();
        if !uci.is_ascii() || !(4..=5).contains(&uci.len()) {
            return Err(invalid());
        }

        let from = Square::from_algebraic(&uci[0..2]).ok_or_else(invalid)?;
        let to = Square::from_algebraic(&uci[2..4]).ok_or_else(invalid)?;
        let promotion = match uci[4..].chars().next() {
            Some(c) => {
                let kind = PieceKind::from_char(c)
                    .filter(|kind| kind.is_promotion_target())
                    .ok_or_else(invalid)?;
                Some(kind)
            }
            None => None,
        };

        Ok(Self {
            from,
            to,
            promotion,
        })
    }

    /// Format as UCI long algebraic notation
    pub fn to_uci(&self) -> String {
        match self.promotion {
            Some(kind) => format!("{}{}{}", self.from, self.to, kind.to_char()),
            None => format!("{}{}", self.from, self.to),
        }
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uci())
    }
}

impl FromStr for MoveRecord {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MoveRecord::from_uci(s)
    }
}

impl TryFrom<String> for MoveRecord {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        MoveRecord::from_uci(&value)
    }
}

impl From<MoveRecord> for String {
    fn from(mv: MoveRecord) -> Self {
        mv.to_uci()
    }
}

/// Opaque board state
///
/// Holds the serialized (FEN) form plus the side to move. Only a
/// [`crate::game::rules::RuleEngine`] produces positions, and every applied
/// move produces a fresh one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    fen: String,
    turn: Side,
}

impl Position {
    /// Build a position from an engine-validated FEN and its side to move
    pub fn new(fen: impl Into<String>, turn: Side) -> Self {
        Self {
            fen: fen.into(),
            turn,
        }
    }

    pub fn fen(&self) -> &str {
        &self.fen
    }

    pub fn turn(&self) -> Side {
        self.turn
    }
}
