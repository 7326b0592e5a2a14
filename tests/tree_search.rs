use rand::rngs::StdRng;
use rand::SeedableRng;

use game_search::constants::{mated_in, Score, DRAW_SCORE};
use game_search::game::tree::{GameTree, TreeError, TreeMove, TreePosition};
use game_search::{Engine, Game, MoveKind, Outcome, SearchConfig, SearchError};

fn no_quiescence() -> SearchConfig {
    SearchConfig { use_quiescence_search: false, ..SearchConfig::default() }
}

/// Exhaustive minimax over the tree, scored like the engine scores terminals.
fn minimax(pos: &TreePosition, depth: u8, ply: usize) -> Score {
    if let Some(outcome) = pos.outcome() {
        return match outcome {
            Outcome::Win => -mated_in(ply),
            Outcome::Loss => mated_in(ply),
            Outcome::Draw => DRAW_SCORE,
        };
    }
    let moves = pos.legal_moves().unwrap();
    if moves.is_empty() {
        return if pos.is_check() { mated_in(ply) } else { DRAW_SCORE };
    }
    if depth == 0 {
        return pos.evaluate();
    }
    moves
        .iter()
        .map(|m| -minimax(&pos.play(m).unwrap(), depth - 1, ply + 1))
        .max()
        .unwrap()
}

#[test]
fn test_engine_matches_minimax_on_random_trees() {
    for seed in 0..60 {
        let pos = GameTree::random(&mut StdRng::seed_from_u64(seed), 6, 4).into_position();
        let mut engine = Engine::new(no_quiescence());
        let Some(result) = engine.search_to_depth(&pos, &[], 5).unwrap() else {
            continue;
        };
        if result.depth == 0 {
            continue;
        }
        let expected = minimax(&pos, result.depth, 0);
        assert_eq!(result.score, expected, "seed {seed}");
        let child = pos.play(&result.best_move).unwrap();
        assert_eq!(-minimax(&child, result.depth - 1, 1), expected, "seed {seed}");
    }
}

#[test]
fn test_transposition_table_is_sound_on_shared_subtrees() {
    let mut tt_cutoffs = 0;
    for seed in 0..100 {
        let pos = GameTree::random_dag(&mut StdRng::seed_from_u64(seed), 4, 3, 3).into_position();
        for depth in 1..=5 {
            let mut engine = Engine::new(no_quiescence());
            let result = engine.search_to_depth(&pos, &[], depth).unwrap().unwrap();
            tt_cutoffs += engine.stats().tt_cutoffs;
            if result.depth == 0 {
                continue;
            }
            assert_eq!(result.score, minimax(&pos, result.depth, 0), "seed {seed}, depth {depth}");
        }
    }
    // Shared nodes really are answered from the table.
    assert!(tt_cutoffs > 0);
}

#[test]
fn test_transposition_table_does_not_change_the_score() {
    let without_tt = SearchConfig { use_transposition_table: false, ..SearchConfig::default() };
    for seed in 200..240 {
        let pos = GameTree::random_dag(&mut StdRng::seed_from_u64(seed), 5, 3, 3).into_position();
        let with = Engine::default().search_to_depth(&pos, &[], 5).unwrap();
        let without = Engine::new(without_tt.clone()).search_to_depth(&pos, &[], 5).unwrap();
        let summary = |r: Option<game_search::SearchResult<TreeMove>>| r.map(|r| (r.score, r.depth));
        assert_eq!(summary(with), summary(without), "seed {seed}");
    }
}

/// Root with a quiet move and a capture that loses the capturing piece.
fn poisoned_capture() -> (TreePosition, TreeMove, TreeMove) {
    let mut tree = GameTree::new(0);
    let capture = tree.add_capture(GameTree::ROOT, -300, 300, 900);
    let recapture = tree.add_capture(capture, -600, 900, 100);
    tree.add_child(recapture, 0);
    let quiet = tree.add_child(GameTree::ROOT, 0);
    let reply = tree.add_child(quiet, 0);
    tree.add_child(reply, 0);
    (tree.into_position(), TreeMove(capture), TreeMove(quiet))
}

#[test]
fn test_quiescence_sees_the_recapture() {
    let (pos, _, quiet) = poisoned_capture();
    let mut engine = Engine::default();
    let result = engine.search_to_depth(&pos, &[], 1).unwrap().unwrap();
    assert_eq!(result.best_move, quiet);
    assert_eq!(result.score, 0);
}

#[test]
fn test_without_quiescence_the_horizon_hides_the_recapture() {
    let (pos, capture, _) = poisoned_capture();
    let mut engine = Engine::new(no_quiescence());
    let result = engine.search_to_depth(&pos, &[], 1).unwrap().unwrap();
    assert_eq!(result.best_move, capture);
    assert_eq!(result.score, 300);
}

#[test]
fn test_free_capture_is_taken() {
    let mut tree = GameTree::new(0);
    let capture = tree.add_capture(GameTree::ROOT, -300, 300, 100);
    tree.add_child(capture, 0);
    let quiet = tree.add_child(GameTree::ROOT, 0);
    tree.add_child(quiet, 0);
    let pos = tree.into_position();

    let mut engine = Engine::default();
    let result = engine.search_to_depth(&pos, &[], 1).unwrap().unwrap();
    assert_eq!(result.best_move, TreeMove(capture));
    assert_eq!(result.score, 300);
}

#[test]
fn test_game_history_turns_a_repeat_into_a_draw() {
    let mut tree = GameTree::new(0);
    let winning = tree.add_child(GameTree::ROOT, -600);
    let modest = tree.add_child(GameTree::ROOT, -100);
    tree.add_child(winning, 0);
    tree.add_child(modest, 0);
    let pos = tree.into_position();

    let mut engine = Engine::new(no_quiescence());
    let result = engine.search_to_depth(&pos, &[winning], 1).unwrap().unwrap();
    assert_eq!(result.best_move, TreeMove(modest));
    assert_eq!(result.score, 100);

    let config = SearchConfig { repetition_draws: false, ..no_quiescence() };
    let result = Engine::new(config).search_to_depth(&pos, &[winning], 1).unwrap().unwrap();
    assert_eq!(result.best_move, TreeMove(winning));
    assert_eq!(result.score, 600);
}

/// A tree position whose move generation fails at one node.
#[derive(Clone, Debug)]
struct Faulty {
    inner: TreePosition,
    broken: usize,
}

impl Game for Faulty {
    type Move = TreeMove;
    type Key = usize;
    type Error = TreeError;

    fn legal_moves(&self) -> Result<Vec<TreeMove>, TreeError> {
        if self.inner.node() == self.broken {
            return Err(TreeError::IllegalMove { node: self.broken, child: self.broken });
        }
        self.inner.legal_moves()
    }

    fn play(&self, mv: &TreeMove) -> Result<Self, TreeError> {
        Ok(Faulty { inner: self.inner.play(mv)?, broken: self.broken })
    }

    fn is_check(&self) -> bool {
        self.inner.is_check()
    }

    fn evaluate(&self) -> Score {
        self.inner.evaluate()
    }

    fn key(&self) -> usize {
        self.inner.key()
    }

    fn classify(&self, mv: &TreeMove) -> MoveKind {
        self.inner.classify(mv)
    }
}

#[test]
fn test_game_model_errors_reach_the_caller() {
    let mut tree = GameTree::new(0);
    let a = tree.add_child(GameTree::ROOT, 0);
    let b = tree.add_child(GameTree::ROOT, 0);
    tree.add_child(a, 0);
    tree.add_child(b, 0);
    let pos = Faulty { inner: tree.into_position(), broken: b };

    let mut engine = Engine::new(no_quiescence());
    let err = engine.search_to_depth(&pos, &[], 3).unwrap_err();
    assert!(matches!(err, SearchError::Game(TreeError::IllegalMove { node, .. }) if node == b));
}
