// src/search/time.rs

use std::time::{Duration, Instant};

/// A monotonic start instant plus a budget. Read-only once created.
#[derive(Clone, Copy, Debug)]
pub struct Deadline {
    start: Instant,
    budget: Option<Duration>,
}

impl Deadline {
    pub fn new(budget: Duration) -> Self {
        Self {
            start: Instant::now(),
            budget: Some(budget),
        }
    }

    /// A deadline that never expires.
    pub fn unbounded() -> Self {
        Self {
            start: Instant::now(),
            budget: None,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Time left; `Duration::MAX` for an unbounded deadline.
    pub fn remaining(&self) -> Duration {
        match self.budget {
            Some(budget) => budget.saturating_sub(self.elapsed()),
            None => Duration::MAX,
        }
    }

    pub fn expired(&self) -> bool {
        match self.budget {
            Some(budget) => self.elapsed() >= budget,
            None => false,
        }
    }

    /// True once more than `fraction` of the budget is used up.
    pub fn past_fraction(&self, fraction: f64) -> bool {
        match self.budget {
            Some(budget) => self.elapsed().as_secs_f64() >= budget.as_secs_f64() * fraction,
            None => false,
        }
    }
}

/// Cooperative cancellation for the recursive search.
///
/// The clock is read on the first node and then every `check_interval`
/// nodes. Once expiry has been seen the manager stays stopped.
#[derive(Debug)]
pub struct TimeManager {
    deadline: Deadline,
    check_interval: u64,
    nodes: u64,
    stopped: bool,
}

impl TimeManager {
    pub fn new(deadline: Deadline, check_interval: u32) -> Self {
        Self {
            deadline,
            check_interval: u64::from(check_interval.max(1)),
            nodes: 0,
            stopped: false,
        }
    }

    /// Counts a node visit. Returns true when the search must unwind.
    #[inline]
    pub fn tick(&mut self) -> bool {
        if !self.stopped && self.nodes % self.check_interval == 0 && self.deadline.expired() {
            self.stopped = true;
        }
        self.nodes += 1;
        self.stopped
    }

    /// Reads the clock right now, regardless of the node interval.
    pub fn expired(&mut self) -> bool {
        if !self.stopped && self.deadline.expired() {
            self.stopped = true;
        }
        self.stopped
    }
}
