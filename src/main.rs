use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use shakmaty::san::SanPlus;
use shakmaty::CastlingMode;
use tracing::{info, Level};

use game_search::config::{self, PROFILES_DIR};
use game_search::game::chess::ChessGame;
use game_search::{Engine, Game, SearchConfig, SearchResult};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Position to search, in FEN. Defaults to the starting position.
    #[arg(long)]
    fen: Option<String>,

    /// Time budget per move in milliseconds
    #[arg(long, default_value_t = 1000)]
    budget_ms: u64,

    /// Search to a fixed depth instead of using the time budget
    #[arg(long)]
    depth: Option<u8>,

    /// Number of plies to play against itself
    #[arg(long, default_value_t = 1)]
    plies: u32,

    /// Load search settings from a named profile
    #[arg(long)]
    profile: Option<String>,

    #[arg(long, default_value = PROFILES_DIR)]
    profiles_dir: PathBuf,

    /// Save the effective search settings under this name and exit
    #[arg(long)]
    save_profile: Option<String>,

    /// More log output (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
    std::panic::set_hook(Box::new(tracing_panic::panic_hook));

    let search_config = match &args.profile {
        Some(name) => config::load_profile(&args.profiles_dir, name)?,
        None => SearchConfig::default(),
    };

    if let Some(name) = &args.save_profile {
        config::save_profile(&args.profiles_dir, name, &search_config)?;
        println!("Saved profile '{}' to {}", name, args.profiles_dir.display());
        return Ok(());
    }

    let mut game = match &args.fen {
        Some(fen) => ChessGame::from_fen(fen)?,
        None => ChessGame::default(),
    };
    let mut engine = Engine::new(search_config);
    let mut history = vec![game.key()];

    for ply in 0..args.plies {
        if let Some(outcome) = game.outcome() {
            println!("Game over: {:?} for the side to move", outcome);
            break;
        }
        let result = match args.depth {
            Some(depth) => engine.search_to_depth(&game, &history, depth)?,
            None => engine.search(&game, &history, Duration::from_millis(args.budget_ms))?,
        };
        let Some(result) = result else {
            let verdict = if game.is_check() { "checkmate" } else { "stalemate" };
            println!("No legal moves: {}", verdict);
            break;
        };

        report(ply, &game, &result);
        let stats = engine.stats();
        info!(
            qnodes = stats.qnodes,
            tt_hits = stats.tt_hits,
            tt_cutoffs = stats.tt_cutoffs,
            beta_cutoffs = stats.beta_cutoffs,
            tt_entries = engine.tt_len(),
            "search statistics"
        );

        game = game.play(&result.best_move)?;
        history.push(game.key());
    }

    println!("{}", game.fen());
    Ok(())
}

fn report(ply: u32, game: &ChessGame, result: &SearchResult<shakmaty::Move>) {
    let san = SanPlus::from_move(game.position().clone(), result.best_move);
    let uci = result.best_move.to_uci(CastlingMode::Standard);
    println!(
        "{:>3}. {} ({}) score {} depth {} nodes {} time {}ms",
        ply + 1,
        san,
        uci,
        result.score,
        result.depth,
        result.nodes,
        result.elapsed.as_millis()
    );
}
