//! Static evaluation of a chess position.

pub mod pst;

use shakmaty::{Board, Chess, Color, Position, Role};

use crate::constants::{
    BISHOP_PHASE_VAL, BISHOP_VALUE, KING_VALUE, KNIGHT_PHASE_VAL, KNIGHT_VALUE, PAWN_VALUE,
    QUEEN_PHASE_VAL, QUEEN_VALUE, ROOK_PHASE_VAL, ROOK_VALUE, TEMPO_BONUS, TOTAL_PHASE,
};

/// Material value of a piece. The king is priced high so that MVV-LVA
/// always treats it as the worst possible attacker.
pub fn piece_value(role: Role) -> i32 {
    match role {
        Role::Pawn => PAWN_VALUE,
        Role::Knight => KNIGHT_VALUE,
        Role::Bishop => BISHOP_VALUE,
        Role::Rook => ROOK_VALUE,
        Role::Queen => QUEEN_VALUE,
        Role::King => KING_VALUE,
    }
}

/// Calculates the game phase.
///
/// The phase is a value between 0 and 256, where 256 means the game is in the
/// opening and 0 means the game is in the endgame.
pub fn game_phase(board: &Board) -> i32 {
    let weighted = board.knights().count() as i32 * KNIGHT_PHASE_VAL
        + board.bishops().count() as i32 * BISHOP_PHASE_VAL
        + board.rooks().count() as i32 * ROOK_PHASE_VAL
        + board.queens().count() as i32 * QUEEN_PHASE_VAL;
    // Promotions can push the sum past the starting total.
    let weighted = weighted.min(TOTAL_PHASE);
    (weighted * 256 + (TOTAL_PHASE / 2)) / TOTAL_PHASE
}

/// Material plus piece-square score for one side, kings excluded from material.
fn side_score(board: &Board, color: Color, phase: i32) -> i32 {
    let mut score = 0;
    for square in board.by_color(color) {
        if let Some(piece) = board.piece_at(square) {
            if piece.role != Role::King {
                score += piece_value(piece.role);
            }
            score += pst::square_bonus(piece.role, color, square, phase);
        }
    }
    score
}

/// Evaluates the board from the perspective of the side to move.
///
/// Returns a score in centipawns.
pub fn evaluate(pos: &Chess) -> i32 {
    let board = pos.board();
    let phase = game_phase(board);
    let us = pos.turn();
    side_score(board, us, phase) - side_score(board, !us, phase) + TEMPO_BONUS
}
