//! Search statistics and performance metrics
//!
//! Tracks nodes searched, cutoffs, score-cache traffic and timing. Worker
//! statistics are merged into one summary after a parallel decision.

use std::time::{Duration, Instant};

/// Search statistics
#[derive(Debug, Default, Clone)]
pub struct SearchStats {
    /// Total nodes visited by negamax
    pub nodes: u64,

    /// Root children scored
    pub root_nodes: u64,

    /// Alpha-beta cutoffs
    pub cutoffs: u64,

    /// Root children answered from the score cache
    pub cache_hits: u64,

    /// Root children that needed a fresh search
    pub cache_misses: u64,

    /// Search start time
    pub start_time: Option<Instant>,

    /// Time spent searching
    pub search_time: Duration,

    /// Nodes per second rate
    pub nps: u64,
}

impl SearchStats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Start timing
    pub fn start_timing(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Update elapsed time and calculate NPS
    pub fn update_timing(&mut self) {
        if let Some(start) = self.start_time {
            self.search_time = start.elapsed();
            let elapsed_ms = self.search_time.as_millis() as u64;
            if elapsed_ms > 0 {
                self.nps = (self.nodes * 1000) / elapsed_ms;
            }
        }
    }

    pub fn inc_node(&mut self) {
        self.nodes += 1;
    }

    pub fn inc_root_node(&mut self) {
        self.root_nodes += 1;
    }

    pub fn inc_cutoff(&mut self) {
        self.cutoffs += 1;
    }

    pub fn inc_cache_hit(&mut self) {
        self.cache_hits += 1;
    }

    pub fn inc_cache_miss(&mut self) {
        self.cache_misses += 1;
    }

    /// Add another worker's counters into this one (timing is left alone)
    pub fn merge(&mut self, other: &SearchStats) {
        self.nodes += other.nodes;
        self.root_nodes += other.root_nodes;
        self.cutoffs += other.cutoffs;
        self.cache_hits += other.cache_hits;
        self.cache_misses += other.cache_misses;
    }

    /// Emit a summary at debug level
    pub fn log_summary(&self) {
        tracing::debug!(
            nodes = self.nodes,
            root_nodes = self.root_nodes,
            cutoffs = self.cutoffs,
            cache_hits = self.cache_hits,
            cache_misses = self.cache_misses,
            elapsed_ms = self.search_time.as_millis() as u64,
            nps = self.nps,
            "search finished"
        );
    }
}
