// src/search/quiescence.rs

//! Quiescence search.
//!
//! At the horizon the main search hands over to a capture-only search so
//! that a position is never judged in the middle of an exchange. A side in
//! check is never quiet: all of its evasions are searched regardless of the
//! remaining quiescence depth.

use crate::constants::{Score, INFINITY, MAX_PLY};
use crate::error::SearchError;
use crate::game::{Game, MoveKind};
use crate::search::negamax::{no_moves_score, outcome_score, SearchOutcome, Searcher};

impl<G: Game> Searcher<'_, G> {
    pub fn quiesce(&mut self, pos: &G, alpha: Score, beta: Score, qdepth: i32, ply: usize) -> SearchOutcome<Score, G> {
        self.visit()?;
        self.stats.qnodes += 1;

        if let Some(outcome) = pos.outcome() {
            return Ok(outcome_score(outcome, ply));
        }
        if ply >= MAX_PLY {
            return Ok(pos.evaluate());
        }
        let moves = pos.legal_moves().map_err(SearchError::Game)?;
        if moves.is_empty() {
            return Ok(no_moves_score(pos, ply));
        }
        self.quiesce_moves(pos, moves, alpha, beta, qdepth, ply)
    }

    /// Quiescence for a node whose legal moves are already known and non-empty.
    pub(super) fn quiesce_moves(
        &mut self,
        pos: &G,
        mut moves: Vec<G::Move>,
        mut alpha: Score,
        beta: Score,
        qdepth: i32,
        ply: usize,
    ) -> SearchOutcome<Score, G> {
        if pos.is_check() {
            self.orderer.order(pos, &mut moves, None, ply, self.config);
            let mut best_score = -INFINITY;
            for mv in moves {
                let child = pos.play(&mv).map_err(SearchError::Game)?;
                let score = -self.quiesce(&child, -beta, -alpha, qdepth - 1, ply + 1)?;
                best_score = best_score.max(score);
                if score > alpha {
                    alpha = score;
                }
                if alpha >= beta {
                    break;
                }
            }
            return Ok(best_score);
        }

        let standing_pat = pos.evaluate();
        if standing_pat >= beta {
            return Ok(beta);
        }
        if alpha < standing_pat {
            alpha = standing_pat;
        }
        if qdepth <= 0 {
            return Ok(alpha);
        }

        let mut noisy: Vec<G::Move> = moves
            .into_iter()
            .filter(|m| self.is_noisy(pos.classify(m)))
            .collect();
        self.orderer.order(pos, &mut noisy, None, ply, self.config);

        for m in noisy {
            if self.config.use_delta_pruning {
                if let MoveKind::Capture { victim, .. } = pos.classify(&m) {
                    // Even winning the piece for free would not reach alpha.
                    if standing_pat + victim + self.config.delta_margin <= alpha {
                        continue;
                    }
                }
            }
            let child = pos.play(&m).map_err(SearchError::Game)?;
            let score = -self.quiesce(&child, -beta, -alpha, qdepth - 1, ply + 1)?;

            if score >= beta {
                return Ok(beta);
            }
            if score > alpha {
                alpha = score;
            }
        }
        Ok(alpha)
    }

    fn is_noisy(&self, kind: MoveKind) -> bool {
        match kind {
            MoveKind::Capture { .. } => true,
            MoveKind::Promotion { .. } => self.config.quiescence_promotions,
            MoveKind::Quiet => false,
        }
    }
}
