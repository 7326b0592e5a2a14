// src/search.rs

pub mod iterative_deepening;
pub mod negamax;
pub mod ordering;
pub mod quiescence;
pub mod time;
pub mod tt;

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{Score, MAX_DEPTH};
use crate::error::SearchError;
use crate::game::Game;
use ordering::MoveOrderer;
use tt::TranspositionTable;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    /// Deepest iteration the driver will start.
    pub max_depth: u8,
    pub use_transposition_table: bool,
    /// The table is cleared in full once it holds this many entries.
    pub tt_max_entries: usize,
    pub use_quiescence_search: bool,
    pub quiescence_depth: i32,
    /// Treat promotions as noisy moves in quiescence.
    pub quiescence_promotions: bool,
    pub use_delta_pruning: bool,
    pub delta_margin: Score,
    pub use_killer_moves: bool,
    pub use_history_heuristic: bool,
    /// Nodes between two reads of the clock.
    pub node_check_interval: u32,
    /// Do not start a new iteration once this share of the budget is spent.
    pub next_depth_time_fraction: f64,
    /// Score positions already seen in the game or on the search path as draws.
    pub repetition_draws: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            use_transposition_table: true,
            tt_max_entries: 1 << 20,
            use_quiescence_search: true,
            quiescence_depth: 8,
            quiescence_promotions: true,
            use_delta_pruning: false,
            delta_margin: 200,
            use_killer_moves: true,
            use_history_heuristic: true,
            node_check_interval: 256,
            next_depth_time_fraction: 0.5,
            repetition_draws: true,
        }
    }
}

/// The answer of one top-level search.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult<M> {
    pub best_move: M,
    /// Score from the point of view of the side to move at the root.
    pub score: Score,
    /// Last fully completed depth; 0 when no iteration finished.
    pub depth: u8,
    pub nodes: u64,
    pub elapsed: Duration,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub qnodes: u64,
    pub tt_hits: u64,
    pub tt_cutoffs: u64,
    pub beta_cutoffs: u64,
    pub completed_depth: u8,
}

/// A search engine for one game, owning everything that survives between
/// calls: the transposition table and the move ordering heuristics.
///
/// Separate engines share nothing, so one engine per match (or per test) is
/// the intended use.
pub struct Engine<G: Game> {
    config: SearchConfig,
    tt: TranspositionTable<G::Key, G::Move>,
    orderer: MoveOrderer<G::Move>,
    stats: SearchStats,
}

impl<G: Game> Engine<G> {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            tt: TranspositionTable::new(config.tt_max_entries),
            orderer: MoveOrderer::new(),
            stats: SearchStats::default(),
            config,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Statistics of the most recent search.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub fn tt_len(&self) -> usize {
        self.tt.len()
    }

    /// Forgets everything learned in earlier searches.
    pub fn clear(&mut self) {
        self.tt.clear();
        self.orderer.clear();
    }

    /// Picks a move for `pos` within `budget`.
    ///
    /// `history` holds the keys of positions that already occurred in the
    /// game. Returns `Ok(None)` when the side to move has no legal move.
    pub fn choose_move(
        &mut self,
        pos: &G,
        history: &[G::Key],
        budget: Duration,
    ) -> Result<Option<G::Move>, SearchError<G::Error>> {
        Ok(self.search(pos, history, budget)?.map(|r| r.best_move))
    }

    fn history_set(&self, history: &[G::Key]) -> HashSet<G::Key> {
        if self.config.repetition_draws {
            history.iter().cloned().collect()
        } else {
            HashSet::new()
        }
    }
}

impl<G: Game> Default for Engine<G> {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}
