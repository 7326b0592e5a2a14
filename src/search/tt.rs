// src/search/tt.rs

use std::collections::HashMap;
use std::hash::Hash;

use tracing::debug;

use crate::constants::{Score, MATE_THRESHOLD};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    /// The stored score is the true score.
    Exact,
    /// Fail-high: the true score is at least the stored score.
    Lower,
    /// Fail-low: the true score is at most the stored score.
    Upper,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TTEntry<M> {
    pub depth: u8,
    pub score: Score,
    pub bound: Bound,
    pub best_move: Option<M>,
}

/// Position cache keyed by the full position key, so distinct keys never alias.
///
/// Entries are never evicted one by one. Once the table reaches its capacity
/// the next insertion of a new key clears it completely.
pub struct TranspositionTable<K, M> {
    table: HashMap<K, TTEntry<M>>,
    capacity: usize,
    clears: u64,
}

impl<K: Eq + Hash, M> TranspositionTable<K, M> {
    pub fn new(capacity: usize) -> Self {
        Self {
            table: HashMap::new(),
            capacity: capacity.max(1),
            clears: 0,
        }
    }

    pub fn probe(&self, key: &K) -> Option<&TTEntry<M>> {
        self.table.get(key)
    }

    /// Stores `entry` unless a deeper result for the same key is already known.
    pub fn store(&mut self, key: K, entry: TTEntry<M>) {
        if let Some(existing) = self.table.get_mut(&key) {
            if entry.depth >= existing.depth {
                *existing = entry;
            }
            return;
        }
        if self.table.len() >= self.capacity {
            debug!(entries = self.table.len(), "transposition table full, clearing");
            self.table.clear();
            self.clears += 1;
        }
        self.table.insert(key, entry);
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// How many times the table has been wiped for being full.
    pub fn clears(&self) -> u64 {
        self.clears
    }
}

/// Mate scores are stored relative to the node instead of the root, so an
/// entry stays valid when the same position is reached at another ply.
pub fn score_to_tt(score: Score, ply: usize) -> Score {
    if score >= MATE_THRESHOLD {
        score + ply as Score
    } else if score <= -MATE_THRESHOLD {
        score - ply as Score
    } else {
        score
    }
}

pub fn score_from_tt(score: Score, ply: usize) -> Score {
    if score >= MATE_THRESHOLD {
        score - ply as Score
    } else if score <= -MATE_THRESHOLD {
        score + ply as Score
    } else {
        score
    }
}
