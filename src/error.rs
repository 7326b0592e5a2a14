//! Error types for the search engine.

/// Reasons a search can stop without producing a score.
///
/// `Cancelled` is the cooperative timeout signal. It unwinds the recursion
/// and is swallowed by the iterative deepening driver, so callers of
/// [`crate::Engine::choose_move`] only ever see `Game`.
#[derive(Debug, thiserror::Error)]
pub enum SearchError<E> {
    #[error("search cancelled: time budget exhausted")]
    Cancelled,

    #[error("game model failure: {0}")]
    Game(#[source] E),
}

impl<E> SearchError<E> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SearchError::Cancelled)
    }
}
