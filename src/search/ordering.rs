// src/search/ordering.rs

//! Move ordering.
//!
//! Moves are ranked so that the ones most likely to cause a cutoff come
//! first: the transposition-table move, captures by MVV-LVA, promotions,
//! killer moves, then quiet moves by history score. Ordering only decides
//! how much gets pruned. It never removes a move.

use std::collections::HashMap;
use std::hash::Hash;

use crate::constants::{
    CAPTURE_SCORE, MAX_HISTORY, PRIMARY_KILLER_SCORE, PROMOTION_SCORE, SECONDARY_KILLER_SCORE,
    TT_MOVE_SCORE,
};
use crate::game::{Game, MoveKind};
use crate::search::SearchConfig;

pub struct MoveOrderer<M> {
    killer_moves: Vec<[Option<M>; 2]>,
    history_table: HashMap<M, i32>,
}

impl<M: Clone + Eq + Hash> MoveOrderer<M> {
    pub fn new() -> Self {
        Self {
            killer_moves: Vec::new(),
            history_table: HashMap::new(),
        }
    }

    /// Sorts `moves` best-first. Equal scores keep generation order.
    pub fn order<G: Game<Move = M>>(
        &self,
        pos: &G,
        moves: &mut [M],
        tt_move: Option<&M>,
        ply: usize,
        config: &SearchConfig,
    ) {
        moves.sort_by_cached_key(|m| {
            std::cmp::Reverse(self.score_move(pos.classify(m), m, tt_move, ply, config))
        });
    }

    pub fn score_move(
        &self,
        kind: MoveKind,
        m: &M,
        tt_move: Option<&M>,
        ply: usize,
        config: &SearchConfig,
    ) -> i32 {
        if tt_move == Some(m) {
            return TT_MOVE_SCORE;
        }
        match kind {
            MoveKind::Capture { victim, attacker } => return CAPTURE_SCORE + victim - attacker,
            MoveKind::Promotion { gain } => return PROMOTION_SCORE + gain,
            MoveKind::Quiet => {}
        }
        if config.use_killer_moves {
            if let Some([first, second]) = self.killer_moves.get(ply) {
                if first.as_ref() == Some(m) {
                    return PRIMARY_KILLER_SCORE;
                }
                if second.as_ref() == Some(m) {
                    return SECONDARY_KILLER_SCORE;
                }
            }
        }
        if config.use_history_heuristic {
            return self.history_table.get(m).copied().unwrap_or(0);
        }
        0
    }

    /// Remembers a quiet move that failed high at `ply`.
    pub fn record_cutoff(&mut self, kind: MoveKind, m: &M, ply: usize, depth: u8, config: &SearchConfig) {
        if !kind.is_quiet() {
            return;
        }
        if config.use_killer_moves {
            if self.killer_moves.len() <= ply {
                self.killer_moves.resize(ply + 1, [None, None]);
            }
            let slots = &mut self.killer_moves[ply];
            if slots[0].as_ref() != Some(m) {
                slots[1] = slots[0].take();
                slots[0] = Some(m.clone());
            }
        }
        if config.use_history_heuristic {
            let bonus = i32::from(depth) * i32::from(depth);
            let score = self.history_table.entry(m.clone()).or_insert(0);
            *score = (*score + bonus).min(MAX_HISTORY);
        }
    }

    /// Called once per top-level search: killers are position specific,
    /// history is kept but decays.
    pub fn new_search(&mut self) {
        self.killer_moves.clear();
        self.history_table.retain(|_, score| {
            *score /= 2;
            *score > 0
        });
    }

    pub fn clear(&mut self) {
        self.killer_moves.clear();
        self.history_table.clear();
    }

    pub fn is_killer(&self, m: &M, ply: usize) -> bool {
        self.killer_moves
            .get(ply)
            .is_some_and(|slots| slots.iter().any(|k| k.as_ref() == Some(m)))
    }

    pub fn history_score(&self, m: &M) -> i32 {
        self.history_table.get(m).copied().unwrap_or(0)
    }
}

impl<M: Clone + Eq + Hash> Default for MoveOrderer<M> {
    fn default() -> Self {
        Self::new()
    }
}
