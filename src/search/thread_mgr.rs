//! Partitioned root search
//!
//! The root's legal successors are split into contiguous partitions, one
//! scoped worker thread per partition. Each worker runs the full root scan
//! over its slice against a read-only view of the score cache and history.
//! After every worker has been joined the reports are merged in partition
//! order and the workers' fresh cache entries are folded into the cache.
//! Nothing is written to shared state while workers run.

use super::cache::ScoreCache;
use super::history::History;
use super::params::SearchParams;
use super::search::{Candidate, Search, SearchContext};
use super::stats::SearchStats;
use crate::board::{Position, PositionKey};
use crate::notation::MoveNotation;
use crate::rules::legal_successors;
use std::any::Any;
use std::collections::HashMap;
use std::thread;

/// A worker that panicked instead of reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerFailure {
    pub worker: usize,
    pub message: String,
}

/// Outcome of one root decision
#[derive(Debug, Clone)]
pub struct Decision {
    /// `None` when no worker produced a candidate, normally because the
    /// root has no legal move
    pub choice: Option<Candidate>,
    pub failed_workers: Vec<WorkerFailure>,
    pub stats: SearchStats,
    /// Number of partitions dispatched
    pub workers: usize,
}

impl Decision {
    /// Some partitions were lost, so the choice covers only part of the root
    pub fn is_degraded(&self) -> bool {
        !self.failed_workers.is_empty()
    }
}

struct WorkerReport {
    best: Option<Candidate>,
    fresh: HashMap<PositionKey, i32>,
    stats: SearchStats,
}

/// Fork-join manager for one root decision at a time
#[derive(Debug, Clone)]
pub struct ThreadManager {
    num_threads: usize,
}

impl ThreadManager {
    /// `num_threads` is an upper bound; 0 means available parallelism
    pub fn new(num_threads: usize) -> Self {
        Self { num_threads }
    }

    /// Pick the best legal successor of `root`, then merge every fresh
    /// score into `cache`
    pub fn search(
        &self,
        root: &Position,
        cache: &mut ScoreCache,
        history: &History,
        params: &SearchParams,
        notation: &dyn MoveNotation,
    ) -> Decision {
        let mut stats = SearchStats::new();
        stats.start_timing();

        let children = legal_successors(root);
        if children.is_empty() {
            stats.update_timing();
            return Decision {
                choice: None,
                failed_workers: Vec::new(),
                stats,
                workers: 0,
            };
        }

        let params = params.clone().threads(self.num_threads);
        let workers = params.worker_count(children.len());
        let groups = partition(children.len(), workers);

        let ctx = SearchContext {
            cache: &*cache,
            history,
            params: &params,
            notation,
        };

        let results: Vec<thread::Result<WorkerReport>> = thread::scope(|s| {
            let handles: Vec<_> = groups
                .iter()
                .map(|&(start, end)| {
                    let part = &children[start..end];
                    s.spawn(move || {
                        let mut search = Search::new(ctx);
                        let best = search.best_of(root, part, start);
                        let (fresh, stats) = search.into_parts();
                        WorkerReport { best, fresh, stats }
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join()).collect()
        });
        let dispatched = results.len();

        let mut choice: Option<Candidate> = None;
        let mut failed_workers = Vec::new();
        let mut fresh_entries = Vec::with_capacity(dispatched);
        for (worker, result) in results.into_iter().enumerate() {
            match result {
                Ok(report) => {
                    stats.merge(&report.stats);
                    fresh_entries.push(report.fresh);
                    if let Some(candidate) = report.best {
                        if candidate.beats(choice.as_ref()) {
                            choice = Some(candidate);
                        }
                    }
                }
                Err(payload) => {
                    let message = panic_message(&*payload);
                    tracing::warn!(worker, %message, "search worker failed");
                    failed_workers.push(WorkerFailure { worker, message });
                }
            }
        }

        for fresh in fresh_entries {
            cache.merge(fresh);
        }

        stats.update_timing();
        stats.log_summary();
        if let Some(c) = &choice {
            tracing::debug!(
                mv = %c.descriptor,
                score = c.score,
                mate = c.mate,
                workers = dispatched,
                cache_entries = cache.len(),
                "root decision"
            );
        }

        Decision {
            choice,
            failed_workers,
            stats,
            workers: dispatched,
        }
    }
}

/// Split `len` moves into `workers` contiguous `(start, end)` ranges whose
/// sizes differ by at most one; the first `len % workers` get the extra move
fn partition(len: usize, workers: usize) -> Vec<(usize, usize)> {
    let workers = workers.clamp(1, len.max(1));
    let (base, extra) = (len / workers, len % workers);
    let mut start = 0;
    (0..workers)
        .map(|i| {
            let end = start + base + usize::from(i < extra);
            let range = (start, end);
            start = end;
            range
        })
        .collect()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::CoordinateNotation;

    struct Exploding;

    impl MoveNotation for Exploding {
        fn describe(&self, before: &Position, after: &Position) -> String {
            // only the knight jumps from b1 blow up
            let text = CoordinateNotation.describe(before, after);
            if text.starts_with("b1") {
                panic!("cannot describe {}", text);
            }
            text
        }
    }

    #[test]
    fn partition_is_balanced_and_contiguous() {
        assert_eq!(
            partition(20, 8),
            vec![(0, 3), (3, 6), (6, 9), (9, 12), (12, 14), (14, 16), (16, 18), (18, 20)]
        );
        assert_eq!(partition(20, 6).len(), 6);
        assert_eq!(partition(3, 16), vec![(0, 1), (1, 2), (2, 3)]);
        for workers in 1..=20 {
            let groups = partition(20, workers);
            assert_eq!(groups.len(), workers);
            assert_eq!(groups.first().map(|g| g.0), Some(0));
            assert_eq!(groups.last().map(|g| g.1), Some(20));
            assert!(groups.windows(2).all(|w| w[0].1 == w[1].0));
            let sizes: Vec<usize> = groups.iter().map(|(a, b)| b - a).collect();
            assert!(sizes.iter().max().unwrap() - sizes.iter().min().unwrap() <= 1);
        }
    }

    #[test]
    fn partitions_agree_with_single_worker() {
        let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
        let pos = Position::from_fen(fen).unwrap();
        let params = SearchParams::new().depth(2);
        let history = History::new();

        let mut single_cache = ScoreCache::new();
        let single = ThreadManager::new(1).search(
            &pos,
            &mut single_cache,
            &history,
            &params,
            &CoordinateNotation,
        );
        let mut split_cache = ScoreCache::new();
        let split = ThreadManager::new(4).search(
            &pos,
            &mut split_cache,
            &history,
            &params,
            &CoordinateNotation,
        );

        let (a, b) = (single.choice.unwrap(), split.choice.unwrap());
        assert_eq!(a.score, b.score);
        assert_eq!(a.index, b.index);
        assert_eq!(split.workers, 4);
        assert_eq!(single_cache, split_cache);
    }

    #[test]
    fn no_legal_move_means_no_choice() {
        let pos = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let mut cache = ScoreCache::new();
        let decision = ThreadManager::new(2).search(
            &pos,
            &mut cache,
            &History::new(),
            &SearchParams::new(),
            &CoordinateNotation,
        );
        assert!(decision.choice.is_none());
        assert_eq!(decision.workers, 0);
        assert!(!decision.is_degraded());
    }

    #[test]
    fn panicking_worker_is_reported() {
        let pos = Position::initial();
        let mut cache = ScoreCache::new();
        // 20 moves over 20 workers: one partition per move
        let decision = ThreadManager::new(20).search(
            &pos,
            &mut cache,
            &History::new(),
            &SearchParams::new().depth(1),
            &Exploding,
        );
        assert!(decision.is_degraded());
        assert_eq!(decision.failed_workers.len(), 2);
        assert!(decision.failed_workers[0].message.contains("b1"));
        let choice = decision.choice.expect("other workers still report");
        assert!(!choice.descriptor.starts_with("b1"));
        assert_eq!(cache.len(), 18);
    }
}
