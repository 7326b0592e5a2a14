// src/search/negamax.rs

//! Negamax with alpha-beta pruning.
//!
//! Every score is from the point of view of the side to move at the node
//! that returns it; a child's score is negated on the way up and the child
//! is searched with the window `(-beta, -alpha)`.

use std::collections::HashSet;

use crate::constants::{mate_in, mated_in, Score, DRAW_SCORE, INFINITY, MAX_PLY};
use crate::error::SearchError;
use crate::game::{Game, Outcome};
use crate::search::ordering::MoveOrderer;
use crate::search::time::TimeManager;
use crate::search::tt::{score_from_tt, score_to_tt, Bound, TTEntry, TranspositionTable};
use crate::search::{SearchConfig, SearchStats};

pub type SearchOutcome<T, G> = Result<T, SearchError<<G as Game>::Error>>;

/// Score of a rule-based terminal reached `ply` plies from the root.
pub fn outcome_score(outcome: Outcome, ply: usize) -> Score {
    match outcome {
        Outcome::Win => mate_in(ply),
        Outcome::Loss => mated_in(ply),
        Outcome::Draw => DRAW_SCORE,
    }
}

/// Score of a node without legal moves: mated if in check, drawn otherwise.
pub fn no_moves_score<G: Game>(pos: &G, ply: usize) -> Score {
    if pos.is_check() {
        mated_in(ply)
    } else {
        DRAW_SCORE
    }
}

/// State of one search iteration, borrowed from the owning engine.
pub struct Searcher<'a, G: Game> {
    pub(super) config: &'a SearchConfig,
    pub(super) tt: &'a mut TranspositionTable<G::Key, G::Move>,
    pub(super) orderer: &'a mut MoveOrderer<G::Move>,
    pub(super) clock: TimeManager,
    pub(super) stats: SearchStats,
    history: &'a HashSet<G::Key>,
    path: Vec<G::Key>,
}

impl<'a, G: Game> Searcher<'a, G> {
    pub fn new(
        config: &'a SearchConfig,
        tt: &'a mut TranspositionTable<G::Key, G::Move>,
        orderer: &'a mut MoveOrderer<G::Move>,
        history: &'a HashSet<G::Key>,
        clock: TimeManager,
    ) -> Self {
        Self {
            config,
            tt,
            orderer,
            clock,
            stats: SearchStats::default(),
            history,
            path: Vec::new(),
        }
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Counts a node and polls the clock.
    #[inline]
    pub(super) fn visit(&mut self) -> SearchOutcome<(), G> {
        self.stats.nodes += 1;
        if self.clock.tick() {
            return Err(SearchError::Cancelled);
        }
        Ok(())
    }

    fn is_repetition(&self, key: &G::Key) -> bool {
        self.config.repetition_draws && (self.history.contains(key) || self.path.contains(key))
    }

    /// Searches every root move with a full window and returns the best one.
    ///
    /// `moves` must be the non-empty legal move list of `pos`; it is reordered
    /// in place so the next iteration starts from this one's ordering. Ties
    /// go to the move searched first.
    pub fn search_root(&mut self, pos: &G, moves: &mut [G::Move], depth: u8) -> SearchOutcome<(G::Move, Score), G> {
        debug_assert!(!moves.is_empty());
        debug_assert!(depth >= 1);
        self.visit()?;

        let key = pos.key();
        let tt_move = if self.config.use_transposition_table {
            self.tt.probe(&key).and_then(|e| e.best_move.clone())
        } else {
            None
        };
        self.orderer.order(pos, moves, tt_move.as_ref(), 0, self.config);

        // A cancelled iteration may leave keys behind; every iteration starts clean.
        self.path.clear();
        self.path.push(key.clone());

        let mut alpha = -INFINITY;
        let beta = INFINITY;
        let mut best_move = moves[0].clone();
        let mut best_score = -INFINITY;

        for mv in moves.iter() {
            let child = pos.play(mv).map_err(SearchError::Game)?;
            let score = -self.negamax(&child, depth - 1, 1, -beta, -alpha)?;
            if score > best_score {
                best_score = score;
                best_move = mv.clone();
            }
            if score > alpha {
                alpha = score;
            }
        }
        self.path.pop();

        if self.config.use_transposition_table {
            self.tt.store(
                key,
                TTEntry {
                    depth,
                    score: score_to_tt(best_score, 0),
                    bound: Bound::Exact,
                    best_move: Some(best_move.clone()),
                },
            );
        }
        Ok((best_move, best_score))
    }

    pub fn negamax(&mut self, pos: &G, depth: u8, ply: usize, mut alpha: Score, mut beta: Score) -> SearchOutcome<Score, G> {
        self.visit()?;

        if let Some(outcome) = pos.outcome() {
            return Ok(outcome_score(outcome, ply));
        }
        let key = pos.key();
        if ply > 0 && self.is_repetition(&key) {
            return Ok(DRAW_SCORE);
        }
        if ply >= MAX_PLY {
            return Ok(pos.evaluate());
        }

        let mut tt_move = None;
        if self.config.use_transposition_table {
            if let Some(entry) = self.tt.probe(&key) {
                self.stats.tt_hits += 1;
                tt_move = entry.best_move.clone();
                if entry.depth >= depth {
                    let score = score_from_tt(entry.score, ply);
                    match entry.bound {
                        Bound::Exact => {
                            self.stats.tt_cutoffs += 1;
                            return Ok(score);
                        }
                        Bound::Lower => alpha = alpha.max(score),
                        Bound::Upper => beta = beta.min(score),
                    }
                    if alpha >= beta {
                        self.stats.tt_cutoffs += 1;
                        return Ok(score);
                    }
                }
            }
        }

        let mut moves = pos.legal_moves().map_err(SearchError::Game)?;
        if moves.is_empty() {
            return Ok(no_moves_score(pos, ply));
        }

        if depth == 0 {
            if self.config.use_quiescence_search {
                return self.quiesce_moves(pos, moves, alpha, beta, self.config.quiescence_depth, ply);
            }
            return Ok(pos.evaluate());
        }

        self.orderer.order(pos, &mut moves, tt_move.as_ref(), ply, self.config);

        let alpha_orig = alpha;
        let mut best_score = -INFINITY;
        let mut best_move = None;

        self.path.push(key.clone());
        for mv in moves {
            let child = pos.play(&mv).map_err(SearchError::Game)?;
            let score = -self.negamax(&child, depth - 1, ply + 1, -beta, -alpha)?;

            if score > best_score {
                best_score = score;
                best_move = Some(mv.clone());
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                self.stats.beta_cutoffs += 1;
                let kind = pos.classify(&mv);
                self.orderer.record_cutoff(kind, &mv, ply, depth, self.config);
                break;
            }
        }
        self.path.pop();

        // Only reached when every child returned normally.
        if self.config.use_transposition_table {
            let bound = if best_score <= alpha_orig {
                Bound::Upper
            } else if best_score >= beta {
                Bound::Lower
            } else {
                Bound::Exact
            };
            self.tt.store(
                key,
                TTEntry {
                    depth,
                    score: score_to_tt(best_score, ply),
                    bound,
                    best_move,
                },
            );
        }

        Ok(best_score)
    }
}
