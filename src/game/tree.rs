// src/game/tree.rs

//! Explicit game trees.
//!
//! Every node carries its own static evaluation (from the point of view of
//! the side to move at that node), an optional check flag and an optional
//! rule-based outcome. Edges are moves; an edge may point at a node that is
//! already reachable another way, which models a transposition.

use std::sync::Arc;

use rand::Rng;

use super::{Game, MoveKind, Outcome};
use crate::constants::Score;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("node {node} has no move to node {child}")]
    IllegalMove { node: usize, child: usize },
}

/// A move in a [`GameTree`], identified by the node it leads to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TreeMove(pub usize);

#[derive(Clone, Debug)]
struct Edge {
    child: usize,
    kind: MoveKind,
}

#[derive(Clone, Debug)]
struct Node {
    eval: Score,
    in_check: bool,
    outcome: Option<Outcome>,
    edges: Vec<Edge>,
}

impl Node {
    fn leaf(eval: Score) -> Self {
        Self {
            eval,
            in_check: false,
            outcome: None,
            edges: Vec::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct GameTree {
    nodes: Vec<Node>,
}

impl GameTree {
    pub const ROOT: usize = 0;

    pub fn new(root_eval: Score) -> Self {
        Self {
            nodes: vec![Node::leaf(root_eval)],
        }
    }

    pub fn add_child(&mut self, parent: usize, eval: Score) -> usize {
        self.push_child(parent, eval, MoveKind::Quiet)
    }

    pub fn add_capture(&mut self, parent: usize, eval: Score, victim: Score, attacker: Score) -> usize {
        self.push_child(parent, eval, MoveKind::Capture { victim, attacker })
    }

    pub fn add_promotion(&mut self, parent: usize, eval: Score, gain: Score) -> usize {
        self.push_child(parent, eval, MoveKind::Promotion { gain })
    }

    /// Adds a move from `parent` to an existing node.
    pub fn add_edge(&mut self, parent: usize, child: usize, kind: MoveKind) {
        self.nodes[parent].edges.push(Edge { child, kind });
    }

    pub fn set_check(&mut self, node: usize, in_check: bool) {
        self.nodes[node].in_check = in_check;
    }

    pub fn set_outcome(&mut self, node: usize, outcome: Outcome) {
        self.nodes[node].outcome = Some(outcome);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Freezes the tree and returns the root position.
    pub fn into_position(self) -> TreePosition {
        TreePosition {
            tree: Arc::new(self),
            node: Self::ROOT,
        }
    }

    /// A random tree of at most `depth` plies below the root.
    ///
    /// Interior nodes get between zero and `max_branching` children; a node
    /// that draws zero children is terminal and is flagged as in check half
    /// of the time, so both mates and stalemates show up.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, depth: u8, max_branching: usize) -> Self {
        let mut tree = GameTree::new(rng.gen_range(-500..=500));
        tree.grow(rng, Self::ROOT, depth, max_branching.max(1));
        tree
    }

    /// A random layered graph `depth` levels deep with `width` nodes per level.
    ///
    /// Every node above the last level gets between one and `max_branching`
    /// moves into distinct nodes of the next level, so nodes are shared
    /// between parents and one search reaches them along several lines.
    /// Nodes on the last level have no moves and are mated or stalemated.
    pub fn random_dag<R: Rng + ?Sized>(rng: &mut R, depth: u8, width: usize, max_branching: usize) -> Self {
        let width = width.max(1);
        let mut tree = GameTree::new(rng.gen_range(-500..=500));
        let mut level = vec![Self::ROOT];
        for _ in 0..depth {
            let next: Vec<usize> = (0..width)
                .map(|_| {
                    let child = tree.nodes.len();
                    tree.nodes.push(Node::leaf(rng.gen_range(-500..=500)));
                    child
                })
                .collect();
            for &parent in &level {
                let branching = rng.gen_range(1..=max_branching.clamp(1, width));
                for i in rand::seq::index::sample(rng, width, branching).iter() {
                    let child = next[i];
                    let kind = if rng.gen_bool(0.25) {
                        MoveKind::Capture {
                            victim: rng.gen_range(100..=900),
                            attacker: rng.gen_range(100..=900),
                        }
                    } else {
                        MoveKind::Quiet
                    };
                    tree.add_edge(parent, child, kind);
                }
            }
            level = next;
        }
        for &leaf in &level {
            let in_check = rng.gen_bool(0.5);
            tree.set_check(leaf, in_check);
        }
        tree
    }

    fn grow<R: Rng + ?Sized>(&mut self, rng: &mut R, parent: usize, depth: u8, max_branching: usize) {
        if depth == 0 {
            return;
        }
        let branching = rng.gen_range(0..=max_branching);
        if branching == 0 {
            let in_check = rng.gen_bool(0.5);
            self.set_check(parent, in_check);
            return;
        }
        for _ in 0..branching {
            let eval = rng.gen_range(-500..=500);
            let child = if rng.gen_bool(0.25) {
                let victim = rng.gen_range(100..=900);
                let attacker = rng.gen_range(100..=900);
                self.add_capture(parent, eval, victim, attacker)
            } else {
                self.add_child(parent, eval)
            };
            self.grow(rng, child, depth - 1, max_branching);
        }
    }

    fn push_child(&mut self, parent: usize, eval: Score, kind: MoveKind) -> usize {
        let child = self.nodes.len();
        self.nodes.push(Node::leaf(eval));
        self.add_edge(parent, child, kind);
        child
    }
}

/// A position inside a frozen [`GameTree`]. Cloning is cheap.
#[derive(Clone, Debug)]
pub struct TreePosition {
    tree: Arc<GameTree>,
    node: usize,
}

impl TreePosition {
    pub fn node(&self) -> usize {
        self.node
    }

    /// The position at another node of the same tree.
    pub fn at(&self, node: usize) -> TreePosition {
        TreePosition {
            tree: Arc::clone(&self.tree),
            node,
        }
    }

    fn current(&self) -> &Node {
        &self.tree.nodes[self.node]
    }
}

impl Game for TreePosition {
    type Move = TreeMove;
    type Key = usize;
    type Error = TreeError;

    fn legal_moves(&self) -> Result<Vec<TreeMove>, TreeError> {
        Ok(self.current().edges.iter().map(|e| TreeMove(e.child)).collect())
    }

    fn play(&self, mv: &TreeMove) -> Result<Self, TreeError> {
        if self.current().edges.iter().any(|e| e.child == mv.0) {
            Ok(self.at(mv.0))
        } else {
            Err(TreeError::IllegalMove {
                node: self.node,
                child: mv.0,
            })
        }
    }

    fn is_check(&self) -> bool {
        self.current().in_check
    }

    fn outcome(&self) -> Option<Outcome> {
        self.current().outcome
    }

    fn evaluate(&self) -> Score {
        self.current().eval
    }

    fn key(&self) -> usize {
        self.node
    }

    fn classify(&self, mv: &TreeMove) -> MoveKind {
        self.current()
            .edges
            .iter()
            .find(|e| e.child == mv.0)
            .map_or(MoveKind::Quiet, |e| e.kind)
    }
}
