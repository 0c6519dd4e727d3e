//! The engine context: search parameters, the score cache, the played-game
//! history and the move notation, threaded explicitly through every root
//! decision.

use crate::board::Position;
use crate::notation::{CoordinateNotation, MoveNotation};
use crate::rules::legal_successors;
use crate::search::{
    Decision, History, ScoreCache, Search, SearchContext, SearchParams, SearchStats, ThreadManager,
};
use std::path::Path;

pub struct Engine<N: MoveNotation = CoordinateNotation> {
    params: SearchParams,
    cache: ScoreCache,
    history: History,
    notation: N,
}

impl Engine<CoordinateNotation> {
    pub fn new(params: SearchParams) -> Self {
        Self::with_notation(params, CoordinateNotation)
    }
}

impl Default for Engine<CoordinateNotation> {
    fn default() -> Self {
        Self::new(SearchParams::default())
    }
}

impl<N: MoveNotation> Engine<N> {
    pub fn with_notation(params: SearchParams, notation: N) -> Self {
        Self {
            params,
            cache: ScoreCache::new(),
            history: History::new(),
            notation,
        }
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    pub fn cache(&self) -> &ScoreCache {
        &self.cache
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Load cache entries from `path`. Failure leaves whatever was read so
    /// far in the cache and returns `None`.
    pub fn load_cache(&mut self, path: impl AsRef<Path>) -> Option<usize> {
        let path = path.as_ref();
        match self.cache.load(path) {
            Ok(count) => Some(count),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    entries = self.cache.len(),
                    "continuing with partial score cache"
                );
                None
            }
        }
    }

    /// Write the cache to `path`. Failure keeps the cache in memory only.
    pub fn dump_cache(&self, path: impl AsRef<Path>) -> Option<usize> {
        let path = path.as_ref();
        match self.cache.dump(path) {
            Ok(count) => Some(count),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "score cache not written");
                None
            }
        }
    }

    /// Record a move played by either side
    pub fn record_played(&mut self, before: &Position, after: &Position) {
        let descriptor = self.notation.describe(before, after);
        self.history.record(after.key(), descriptor);
    }

    /// Choose a move for `root` with the partitioned search and record it
    pub fn think(&mut self, root: &Position) -> Decision {
        let manager = ThreadManager::new(self.params.threads);
        let decision = manager.search(
            root,
            &mut self.cache,
            &self.history,
            &self.params,
            &self.notation,
        );
        self.record_choice(&decision);
        decision
    }

    /// Same decision on the calling thread only
    pub fn think_sequential(&mut self, root: &Position) -> Decision {
        let mut stats = SearchStats::new();
        stats.start_timing();

        let children = legal_successors(root);
        let ctx = SearchContext {
            cache: &self.cache,
            history: &self.history,
            params: &self.params,
            notation: &self.notation,
        };
        let mut search = Search::new(ctx);
        let choice = search.best_of(root, &children, 0);
        let (fresh, worker_stats) = search.into_parts();
        self.cache.merge(fresh);

        stats.merge(&worker_stats);
        stats.update_timing();
        stats.log_summary();

        let decision = Decision {
            choice,
            failed_workers: Vec::new(),
            stats,
            workers: usize::from(!children.is_empty()),
        };
        self.record_choice(&decision);
        decision
    }

    fn record_choice(&mut self, decision: &Decision) {
        if let Some(choice) = &decision.choice {
            self.history
                .record(choice.position.key(), choice.descriptor.clone());
        }
    }
}
