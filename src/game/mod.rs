// game/mod.rs

//! The game model consumed by the search.
//!
//! A [`Game`] value is an immutable position snapshot: move generation,
//! move application, check detection and static evaluation. The search
//! never needs to know anything else about the rules.

pub mod chess;
pub mod evaluation;
pub mod tree;

use std::fmt::Debug;
use std::hash::Hash;

use crate::constants::Score;

/// Rule-based game end, seen from the side to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

/// What a move does, as far as ordering and quiescence care.
///
/// Values are on the same scale as [`Game::evaluate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveKind {
    Quiet,
    Capture { victim: Score, attacker: Score },
    Promotion { gain: Score },
}

impl MoveKind {
    pub fn is_quiet(self) -> bool {
        matches!(self, MoveKind::Quiet)
    }
}

pub trait Game: Clone {
    type Move: Clone + Eq + Hash + Debug;
    /// Position identity. Must distinguish the side to move.
    type Key: Clone + Eq + Hash + Debug;
    type Error: std::error::Error;

    /// All legal moves for the side to move. Empty means the game is over.
    fn legal_moves(&self) -> Result<Vec<Self::Move>, Self::Error>;

    /// The position after `mv`. Leaves `self` untouched.
    fn play(&self, mv: &Self::Move) -> Result<Self, Self::Error>;

    fn is_check(&self) -> bool;

    /// Terminal states decided by rule rather than by running out of moves.
    fn outcome(&self) -> Option<Outcome> {
        None
    }

    /// Static evaluation from the point of view of the side to move.
    fn evaluate(&self) -> Score;

    fn key(&self) -> Self::Key;

    fn classify(&self, mv: &Self::Move) -> MoveKind;
}
