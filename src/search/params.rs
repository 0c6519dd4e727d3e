//! Search parameters and configuration
//!
//! Controls the fixed search depth, the worker count of the root
//! orchestrator and the repetition heuristics.

use crate::eval::PAWN_VALUE;

/// Search parameters for the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Search depth in plies, counted from the root
    pub depth: u8,

    /// Root partitions searched in parallel (0 = available parallelism)
    pub threads: usize,

    /// Subtracted from a root move that repeats a recently played move
    pub oscillation_penalty: i32,

    /// How many of the most recent played moves count as "recent"
    pub oscillation_window: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            depth: 4,
            threads: 0,
            oscillation_penalty: PAWN_VALUE / 2,
            oscillation_window: 4,
        }
    }
}

impl SearchParams {
    /// Create new search params with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set search depth in plies (at least 1)
    pub fn depth(mut self, depth: u8) -> Self {
        self.depth = depth.max(1);
        self
    }

    /// Set worker count (0 = one per available core)
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Set oscillation penalty (negative values count as 0)
    pub fn oscillation_penalty(mut self, penalty: i32) -> Self {
        self.oscillation_penalty = penalty.max(0);
        self
    }

    /// Set how many recent played moves the oscillation check looks at
    pub fn oscillation_window(mut self, window: usize) -> Self {
        self.oscillation_window = window;
        self
    }

    /// Worker count actually used for a root with `moves` legal moves
    pub fn worker_count(&self, moves: usize) -> usize {
        let wanted = if self.threads == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        } else {
            self.threads
        };
        wanted.min(moves).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let p = SearchParams::new().depth(3).threads(2).oscillation_penalty(10);
        assert_eq!(p.depth, 3);
        assert_eq!(p.threads, 2);
        assert_eq!(p.oscillation_penalty, 10);
        assert_eq!(p.oscillation_window, 4);
        assert_eq!(SearchParams::new().depth(0).depth, 1);
        assert_eq!(SearchParams::new().oscillation_penalty(-5).oscillation_penalty, 0);
    }

    #[test]
    fn worker_count_is_bounded_by_moves() {
        let p = SearchParams::new().threads(8);
        assert_eq!(p.worker_count(3), 3);
        assert_eq!(p.worker_count(20), 8);
        assert_eq!(p.worker_count(0), 1);
        assert!(SearchParams::new().worker_count(20) >= 1);
    }
}
