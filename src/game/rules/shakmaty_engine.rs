//! Rule engine adapter backed by `shakmaty`
//!
//! Positions cross the seam as FEN strings, so every call re-parses. That
//! keeps [`Position`] engine-agnostic and cheap to clone; a position is only
//! parsed once per command, which is far below anything a player can notice.
//!
//! # Castling
//!
//! `shakmaty` encodes castling as king-takes-rook internally. The adapter
//! rewrites it to the king's destination square (`e1g1`, `e8c8`) so that
//! [`MoveRecord`] equality matches what players and puzzle scripts write.

use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Move, Position as _};
use tracing::error;

use super::engine::{GameStatus, RuleEngine};
use crate::game::error::{EngineError, EngineResult};
use crate::game::types::{MoveRecord, PieceKind, Position, Side, Square};

/// Halfmove clock value at which the seventy-five move rule ends the game
const SEVENTY_FIVE_MOVE_HALFMOVES: u32 = 150;

/// Production [`RuleEngine`] using the `shakmaty` move generator
#[derive(Debug, Clone, Copy, Default)]
pub struct ShakmatyEngine;

impl ShakmatyEngine {
    pub fn new() -> Self {
        Self
    }

    fn parse_fen(fen: &str) -> EngineResult<Chess> {
        let parsed: Fen = fen.parse().map_err(|e: shakmaty::fen::ParseFenError| {
            EngineError::InvalidFen {
                fen: fen.to_string(),
                reason: e.to_string(),
            }
        })?;

        parsed
            .into_position(CastlingMode::Standard)
            .map_err(|e| EngineError::InvalidFen {
                fen: fen.to_string(),
                reason: e.to_string(),
            })
    }

    fn snapshot(chess: &Chess) -> Position {
        let fen = Fen::from_position(chess.clone(), EnPassantMode::Legal);
        Position::new(fen.to_string(), side_of(chess.turn()))
    }

    /// Parse a position that this engine produced earlier
    fn parse(position: &Position) -> Option<Chess> {
        match Self::parse_fen(position.fen()) {
            Ok(chess) => Some(chess),
            Err(e) => {
                error!("[RULES] Position no longer parses: {}", e);
                None
            }
        }
    }
}

impl RuleEngine for ShakmatyEngine {
    fn initial(&self) -> Position {
        Self::snapshot(&Chess::default())
    }

    fn load(&self, fen: &str) -> EngineResult<Position> {
        Self::parse_fen(fen.trim()).map(|chess| Self::snapshot(&chess))
    }

    fn apply_move(&self, position: &Position, mv: &MoveRecord) -> EngineResult<Position> {
        let chess = Self::parse_fen(position.fen())?;

        let legal = chess
            .legal_moves()
            .into_iter()
            .find(|candidate| to_record(candidate).as_ref() == Some(mv));

        match legal {
            Some(found) => {
                let next = chess.play(&found).map_err(|_| EngineError::IllegalMove {
                    mv: *mv,
                    fen: position.fen().to_string(),
                })?;
                Ok(Self::snapshot(&next))
            }
            None => Err(EngineError::IllegalMove {
                mv: *mv,
                fen: position.fen().to_string(),
            }),
        }
    }

    fn legal_moves(&self, position: &Position) -> Vec<MoveRecord> {
        let Some(chess) = Self::parse(position) else {
            return Vec::new();
        };

        chess.legal_moves().iter().filter_map(to_record).collect()
    }

    fn status(&self, position: &Position) -> GameStatus {
        let Some(chess) = Self::parse(position) else {
            return GameStatus::Ongoing;
        };

        if chess.is_checkmate() {
            GameStatus::Checkmate {
                winner: side_of(chess.turn()).opposite(),
            }
        } else if chess.is_stalemate() {
            GameStatus::Stalemate
        } else if chess.is_insufficient_material()
            || chess.halfmoves() >= SEVENTY_FIVE_MOVE_HALFMOVES
        {
            GameStatus::Draw
        } else {
            GameStatus::Ongoing
        }
    }
}

fn side_of(color: Color) -> Side {
    match color {
        Color::White => Side::White,
        Color::Black => Side::Black,
    }
}

fn square_of(square: shakmaty::Square) -> Option<Square> {
    Square::from_algebraic(&square.to_string())
}

/// Convert an engine move to the client's notation
///
/// Drops moves without an origin square (crazyhouse drops never occur in
/// standard chess).
fn to_record(m: &Move) -> Option<MoveRecord> {
    let to = match *m {
        Move::Castle { king, rook } => {
            let file = if rook.file() > king.file() {
                shakmaty::File::G
            } else {
                shakmaty::File::C
            };
            shakmaty::Square::from_coords(file, king.rank())
        }
        _ => m.to(),
    };

    Some(MoveRecord {
        from: square_of(m.from()?)?,
        to: square_of(to)?,
        promotion: m.promotion().and_then(|role| PieceKind::from_char(role.char())),
    })
}
