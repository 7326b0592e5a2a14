use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use shakmaty::{Position, Role, Square};

use game_search::constants::is_mate_score;
use game_search::game::chess::{king_attacked, ChessGame};
use game_search::{Engine, Game, SearchConfig};

fn game(fen: &str) -> ChessGame {
    ChessGame::from_fen(fen).unwrap()
}

#[test]
fn test_finds_back_rank_mate() {
    let pos = game("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
    let mut engine = Engine::default();
    let result = engine.search(&pos, &[], Duration::from_secs(10)).unwrap().unwrap();

    assert_eq!(result.best_move.to(), Square::A8);
    assert!(is_mate_score(result.score));
    let after = pos.play(&result.best_move).unwrap();
    assert!(after.is_check());
    assert!(after.legal_moves().unwrap().is_empty());
}

#[test]
fn test_mate_on_the_hundredth_halfmove_is_still_mate() {
    // Ra8 is the hundredth halfmove without a capture or pawn move.
    let pos = game("6k1/5ppp/8/8/8/8/8/R5K1 w - - 99 80");
    let mut engine = Engine::default();
    let result = engine.search_to_depth(&pos, &[], 2).unwrap().unwrap();

    assert_eq!(result.best_move.to(), Square::A8);
    assert!(is_mate_score(result.score));
    assert_eq!(pos.play(&result.best_move).unwrap().outcome(), None);
}

#[test]
fn test_single_legal_move_returns_immediately() {
    let pos = game("k7/8/8/8/8/8/6r1/7K w - - 0 1");
    let mut engine = Engine::default();
    let result = engine.search(&pos, &[], Duration::from_secs(10)).unwrap().unwrap();

    assert_eq!(result.best_move.to(), Square::G2);
    assert_eq!(result.nodes, 0);
    assert_eq!(result.depth, 0);
}

#[test]
fn test_stalemate_has_no_move() {
    let pos = game("k7/8/8/8/8/8/5q2/7K w - - 0 1");
    let mut engine = Engine::default();
    assert!(engine.choose_move(&pos, &[], Duration::from_secs(1)).unwrap().is_none());
}

#[test]
fn test_zero_budget_returns_a_legal_move() {
    let pos = ChessGame::default();
    let mut engine = Engine::default();
    let mv = engine.choose_move(&pos, &[], Duration::ZERO).unwrap().unwrap();
    assert!(pos.legal_moves().unwrap().contains(&mv));
}

#[test]
fn test_takes_the_hanging_queen() {
    let pos = game("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1");
    let mut engine = Engine::default();
    let result = engine.search_to_depth(&pos, &[], 3).unwrap().unwrap();
    assert_eq!(result.best_move.to(), Square::D5);
    assert_eq!(result.best_move.capture(), Some(Role::Queen));
    assert!(result.score > 0);
}

#[test]
fn test_table_survives_between_searches_until_cleared() {
    let pos = ChessGame::default();
    let mut engine = Engine::default();
    engine.search_to_depth(&pos, &[], 3).unwrap();
    let entries = engine.tt_len();
    assert!(entries > 0);

    let mv = pos.legal_moves().unwrap()[0];
    let reply = pos.play(&mv).unwrap();
    engine.search_to_depth(&reply, &[pos.key()], 2).unwrap();
    assert!(engine.tt_len() > 0);

    engine.clear();
    assert_eq!(engine.tt_len(), 0);
}

#[test]
fn test_chosen_moves_never_leave_the_king_attacked() {
    let config = SearchConfig { max_depth: 2, ..SearchConfig::default() };
    for seed in 0..4 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut pos = ChessGame::default();
        let mut history = Vec::new();
        for _ in 0..12 {
            let moves = pos.legal_moves().unwrap();
            let Some(random_move) = moves.choose(&mut rng) else {
                break;
            };
            history.push(pos.key());
            pos = pos.play(random_move).unwrap();
            if pos.outcome().is_some() {
                break;
            }

            let mut engine = Engine::new(config.clone());
            let Some(result) = engine.search_to_depth(&pos, &history, 2).unwrap() else {
                break;
            };
            let mover = pos.position().turn();
            let after = pos.play(&result.best_move).unwrap();
            assert!(!king_attacked(after.position(), mover), "seed {seed}: {}", pos.fen());
        }
    }
}
