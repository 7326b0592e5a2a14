// src/search/iterative_deepening.rs

//! Iterative deepening driver.
//!
//! Searches depth 1, 2, 3, ... until the budget runs out, keeping the result
//! of the deepest iteration that finished. An iteration cut short by the
//! clock is thrown away whole.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::constants::{is_mate_score, Score, MAX_DEPTH};
use crate::error::SearchError;
use crate::game::Game;
use crate::search::negamax::Searcher;
use crate::search::time::{Deadline, TimeManager};
use crate::search::{Engine, SearchResult, SearchStats};

impl<G: Game> Engine<G> {
    /// Like [`Engine::choose_move`], with the score, depth and node count.
    pub fn search(
        &mut self,
        pos: &G,
        history: &[G::Key],
        budget: Duration,
    ) -> Result<Option<SearchResult<G::Move>>, SearchError<G::Error>> {
        let max_depth = self.config.max_depth;
        self.run(pos, history, Deadline::new(budget), max_depth)
    }

    /// Searches to exactly `depth` plies (or until a forced mate is found),
    /// with no time limit.
    pub fn search_to_depth(
        &mut self,
        pos: &G,
        history: &[G::Key],
        depth: u8,
    ) -> Result<Option<SearchResult<G::Move>>, SearchError<G::Error>> {
        self.run(pos, history, Deadline::unbounded(), depth)
    }

    fn run(
        &mut self,
        pos: &G,
        history: &[G::Key],
        deadline: Deadline,
        max_depth: u8,
    ) -> Result<Option<SearchResult<G::Move>>, SearchError<G::Error>> {
        self.stats = SearchStats::default();

        let mut moves = pos.legal_moves().map_err(SearchError::Game)?;
        if moves.is_empty() {
            debug!("no legal moves at the root");
            return Ok(None);
        }
        if moves.len() == 1 {
            let best_move = moves.swap_remove(0);
            debug!(?best_move, "single legal move, skipping search");
            return Ok(Some(SearchResult {
                best_move,
                score: pos.evaluate(),
                depth: 0,
                nodes: 0,
                elapsed: deadline.elapsed(),
            }));
        }

        self.orderer.new_search();
        let history = self.history_set(history);
        let clock = TimeManager::new(deadline, self.config.node_check_interval);
        let mut searcher = Searcher::new(&self.config, &mut self.tt, &mut self.orderer, &history, clock);

        let mut best: Option<(G::Move, Score, u8)> = None;
        for depth in 1..=max_depth.clamp(1, MAX_DEPTH) {
            if searcher.clock.expired() {
                break;
            }
            if best.is_some() && deadline.past_fraction(self.config.next_depth_time_fraction) {
                debug!(depth, "not enough time left for another iteration");
                break;
            }
            match searcher.search_root(pos, &mut moves, depth) {
                Ok((mv, score)) => {
                    info!(
                        depth,
                        score,
                        nodes = searcher.stats.nodes,
                        elapsed_ms = deadline.elapsed().as_millis() as u64,
                        best_move = ?mv,
                        "iteration complete"
                    );
                    best = Some((mv, score, depth));
                    if is_mate_score(score) {
                        break;
                    }
                }
                Err(SearchError::Cancelled) => {
                    debug!(depth, "iteration cancelled, keeping previous result");
                    break;
                }
                Err(err) => return Err(err),
            }
        }

        let mut stats = searcher.stats();
        let (best_move, score, depth) = match best {
            Some(found) => found,
            None => {
                warn!("no iteration completed in time, falling back to move ordering");
                let tt_move = searcher.tt.probe(&pos.key()).and_then(|e| e.best_move.clone());
                searcher.orderer.order(pos, &mut moves, tt_move.as_ref(), 0, searcher.config);
                (moves.swap_remove(0), pos.evaluate(), 0)
            }
        };
        stats.completed_depth = depth;
        self.stats = stats;

        Ok(Some(SearchResult {
            best_move,
            score,
            depth,
            nodes: stats.nodes,
            elapsed: deadline.elapsed(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::tree::{GameTree, TreeMove};
    use crate::search::SearchConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_zero_budget_still_returns_a_legal_move() {
        let mut tree = GameTree::new(0);
        let quiet = tree.add_child(GameTree::ROOT, 0);
        let capture = tree.add_capture(GameTree::ROOT, 0, 300, 100);
        tree.add_child(quiet, 0);
        tree.add_child(capture, 0);
        let pos = tree.into_position();

        let mut engine = Engine::default();
        let result = engine.search(&pos, &[], Duration::ZERO).unwrap().unwrap();
        assert_eq!(result.depth, 0);
        // The fallback is the best move by ordering alone.
        assert_eq!(result.best_move, TreeMove(capture));
        assert_eq!(engine.stats().completed_depth, 0);
    }

    #[test]
    fn test_no_legal_moves_returns_none() {
        let pos = GameTree::new(0).into_position();
        let mut engine = Engine::default();
        assert!(engine.search(&pos, &[], Duration::from_secs(1)).unwrap().is_none());
        assert!(engine.choose_move(&pos, &[], Duration::from_secs(1)).unwrap().is_none());
    }

    #[test]
    fn test_single_legal_move_is_returned_without_searching() {
        let mut tree = GameTree::new(25);
        let only = tree.add_child(GameTree::ROOT, 0);
        tree.add_child(only, 0);
        let pos = tree.into_position();

        let mut engine = Engine::default();
        let result = engine.search(&pos, &[], Duration::from_secs(5)).unwrap().unwrap();
        assert_eq!(result.best_move, TreeMove(only));
        assert_eq!((result.score, result.depth, result.nodes), (25, 0, 0));
        assert_eq!(engine.tt_len(), 0);
    }

    #[test]
    fn test_search_to_depth_reports_the_depth_reached() {
        let mut tree = GameTree::new(0);
        for eval in [30, -20, 10] {
            let child = tree.add_child(GameTree::ROOT, eval);
            let grandchild = tree.add_child(child, -eval);
            tree.add_child(grandchild, eval);
        }
        let pos = tree.into_position();

        let config = SearchConfig { use_quiescence_search: false, ..SearchConfig::default() };
        let mut engine = Engine::new(config);
        let result = engine.search_to_depth(&pos, &[], 2).unwrap().unwrap();
        assert_eq!(result.depth, 2);
        assert_eq!(engine.stats().completed_depth, 2);
        assert!(result.nodes > 0);
        assert!(engine.tt_len() > 0);
    }

    #[test]
    fn test_mate_stops_deepening_early() {
        let mut tree = GameTree::new(0);
        let mated = tree.add_child(GameTree::ROOT, 0);
        tree.set_check(mated, true);
        let other = tree.add_child(GameTree::ROOT, 0);
        tree.add_child(other, 0);
        let pos = tree.into_position();

        let mut engine = Engine::default();
        let result = engine.search_to_depth(&pos, &[], 10).unwrap().unwrap();
        assert_eq!(result.best_move, TreeMove(mated));
        assert_eq!(result.depth, 1);
        assert!(is_mate_score(result.score));
    }

    #[test]
    fn test_clear_empties_the_table() {
        let pos = GameTree::random(&mut StdRng::seed_from_u64(5), 5, 3).into_position();
        let mut engine = Engine::default();
        engine.search_to_depth(&pos, &[], 3).unwrap();
        engine.clear();
        assert_eq!(engine.tt_len(), 0);
    }
}
