// src/constants.rs

/// Centipawn-like score used throughout the engine.
pub type Score = i32;

// Search
pub const MATE_SCORE: Score = 1_000_000;
pub const INFINITY: Score = MATE_SCORE + 1;
pub const DRAW_SCORE: Score = 0;
pub const MAX_PLY: usize = 256;
pub const MATE_THRESHOLD: Score = MATE_SCORE - MAX_PLY as Score;
pub const MAX_DEPTH: u8 = 64;

// Move ordering
pub const TT_MOVE_SCORE: i32 = 3_000_000;
pub const CAPTURE_SCORE: i32 = 2_000_000;
pub const PROMOTION_SCORE: i32 = 1_500_000;
pub const PRIMARY_KILLER_SCORE: i32 = 900_000;
pub const SECONDARY_KILLER_SCORE: i32 = 800_000;
pub const MAX_HISTORY: i32 = 500_000;

// --- Piece values ---
pub const PAWN_VALUE: i32 = 100;
pub const KNIGHT_VALUE: i32 = 320;
pub const BISHOP_VALUE: i32 = 330;
pub const ROOK_VALUE: i32 = 500;
pub const QUEEN_VALUE: i32 = 900;
pub const KING_VALUE: i32 = 10_000;

// Constants for game phase calculation
pub const QUEEN_PHASE_VAL: i32 = 4;
pub const ROOK_PHASE_VAL: i32 = 2;
pub const BISHOP_PHASE_VAL: i32 = 1;
pub const KNIGHT_PHASE_VAL: i32 = 1;
pub const TOTAL_PHASE: i32 =
    (QUEEN_PHASE_VAL * 2) + (ROOK_PHASE_VAL * 4) + (BISHOP_PHASE_VAL * 4) + (KNIGHT_PHASE_VAL * 4);

pub const TEMPO_BONUS: i32 = 10;

/// Score for the side to move being mated `ply` plies from the root.
#[inline]
pub const fn mated_in(ply: usize) -> Score {
    -MATE_SCORE + ply as Score
}

/// Score for the side to move delivering mate `ply` plies from the root.
#[inline]
pub const fn mate_in(ply: usize) -> Score {
    MATE_SCORE - ply as Score
}

#[inline]
pub const fn is_mate_score(score: Score) -> bool {
    score >= MATE_THRESHOLD || score <= -MATE_THRESHOLD
}
