// src/game/chess.rs

//! Standard chess as a [`Game`], backed by `shakmaty`.

use shakmaty::fen::Fen;
use shakmaty::zobrist::{Zobrist64, ZobristHash};
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Move, Position};

use super::evaluation::{self, piece_value};
use super::{Game, MoveKind, Outcome};
use crate::constants::{Score, PAWN_VALUE};

const FIFTY_MOVE_HALFMOVES: u32 = 100;

#[derive(Debug, thiserror::Error)]
pub enum ChessError {
    #[error("invalid FEN: {0}")]
    Fen(#[from] shakmaty::fen::ParseFenError),

    #[error("invalid position: {0}")]
    Position(String),

    #[error("illegal move: {0}")]
    IllegalMove(String),
}

#[derive(Clone, Debug, Default)]
pub struct ChessGame {
    pos: Chess,
}

impl ChessGame {
    pub fn new(pos: Chess) -> Self {
        Self { pos }
    }

    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        let fen: Fen = fen.parse()?;
        let pos: Chess = fen
            .into_position(CastlingMode::Standard)
            .map_err(|e| ChessError::Position(e.to_string()))?;
        Ok(Self { pos })
    }

    pub fn position(&self) -> &Chess {
        &self.pos
    }

    pub fn fen(&self) -> String {
        Fen::from_position(&self.pos, EnPassantMode::Legal).to_string()
    }
}

impl Game for ChessGame {
    type Move = Move;
    type Key = u64;
    type Error = ChessError;

    fn legal_moves(&self) -> Result<Vec<Move>, ChessError> {
        Ok(self.pos.legal_moves().to_vec())
    }

    fn play(&self, mv: &Move) -> Result<Self, ChessError> {
        if !self.pos.is_legal(*mv) {
            return Err(ChessError::IllegalMove(format!("{mv:?}")));
        }
        let mut pos = self.pos.clone();
        pos.play_unchecked(*mv);
        Ok(Self { pos })
    }

    fn is_check(&self) -> bool {
        self.pos.is_check()
    }

    fn outcome(&self) -> Option<Outcome> {
        let board = self.pos.board();
        let us = self.pos.turn();
        // A missing king can only come from a hand-built setup; score it as
        // lost for whoever lacks one instead of failing the search.
        if board.king_of(us).is_none() {
            return Some(Outcome::Loss);
        }
        if board.king_of(!us).is_none() {
            return Some(Outcome::Win);
        }
        if self.pos.is_insufficient_material() {
            return Some(Outcome::Draw);
        }
        // Checkmate on the hundredth halfmove still counts as mate.
        if self.pos.halfmoves() >= FIFTY_MOVE_HALFMOVES && !self.pos.legal_moves().is_empty() {
            return Some(Outcome::Draw);
        }
        None
    }

    fn evaluate(&self) -> Score {
        evaluation::evaluate(&self.pos)
    }

    fn key(&self) -> u64 {
        self.pos.zobrist_hash::<Zobrist64>(EnPassantMode::Legal).0
    }

    fn classify(&self, mv: &Move) -> MoveKind {
        let promotion_gain = mv
            .promotion()
            .map_or(0, |role| piece_value(role) - PAWN_VALUE);
        match mv.capture() {
            Some(victim) => MoveKind::Capture {
                victim: piece_value(victim) + promotion_gain,
                attacker: piece_value(mv.role()),
            },
            None if mv.promotion().is_some() => MoveKind::Promotion { gain: promotion_gain },
            None => MoveKind::Quiet,
        }
    }
}

/// True if the king of `color` is attacked in `pos`.
pub fn king_attacked(pos: &Chess, color: Color) -> bool {
    let board = pos.board();
    match board.king_of(color) {
        Some(king) => board.attacks_to(king, !color, board.occupied()).any(),
        None => true,
    }
}
