//! Time-bounded adversarial game-tree search.
//!
//! The engine is generic over a [`game::Game`] model and combines negamax
//! alpha-beta, a transposition table, iterative deepening and quiescence
//! search under a cooperative wall-clock deadline.

pub mod config;
pub mod constants;
pub mod error;
pub mod game;
pub mod search;

pub use error::SearchError;
pub use game::{Game, MoveKind, Outcome};
pub use search::{Engine, SearchConfig, SearchResult, SearchStats};
