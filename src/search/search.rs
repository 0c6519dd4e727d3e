//! Root move selection and negamax search
//!
//! `negamax` is a plain fail-soft alpha-beta over legal successors with no
//! move ordering. The root scan (`Search::best_of`) layers the score cache,
//! the mate shortcut and the history heuristics on top of it.

use super::cache::ScoreCache;
use super::history::History;
use super::params::SearchParams;
use super::stats::SearchStats;
use crate::board::{Position, PositionKey};
use crate::eval::{evaluate, NEG_INF, POS_INF};
use crate::notation::MoveNotation;
use crate::rules::{in_check, legal_successors};
use std::collections::HashMap;

/// Read-only state a root scan consults
///
/// Shared by reference with every worker of a decision.
#[derive(Clone, Copy)]
pub struct SearchContext<'a> {
    pub cache: &'a ScoreCache,
    pub history: &'a History,
    pub params: &'a SearchParams,
    pub notation: &'a dyn MoveNotation,
}

/// A scored root child
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub position: Position,
    pub descriptor: String,
    /// Score from the root mover's point of view, after root overrides
    pub score: i32,
    /// The child is checkmate for the opponent
    pub mate: bool,
    /// Index of the child in the root's legal successor order
    pub index: usize,
}

impl Candidate {
    /// Whether this candidate replaces `current` as the best so far
    ///
    /// A mate is final. Otherwise later equal scores replace earlier ones.
    pub fn beats(&self, current: Option<&Candidate>) -> bool {
        match current {
            None => true,
            Some(best) if best.mate => false,
            Some(_) if self.mate => true,
            Some(best) => self.score >= best.score,
        }
    }
}

/// Root scan over a slice of root children
pub struct Search<'a> {
    ctx: SearchContext<'a>,
    /// Scores computed by this scan and not yet in the shared cache
    fresh: HashMap<PositionKey, i32>,
    stats: SearchStats,
}

impl<'a> Search<'a> {
    pub fn new(ctx: SearchContext<'a>) -> Self {
        Self {
            ctx,
            fresh: HashMap::new(),
            stats: SearchStats::new(),
        }
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Hand back the new cache entries and the counters
    pub fn into_parts(self) -> (HashMap<PositionKey, i32>, SearchStats) {
        (self.fresh, self.stats)
    }

    /// Best of `children`, which are legal successors of `root` starting at
    /// enumeration index `first_index`. `None` only when `children` is empty.
    pub fn best_of(
        &mut self,
        root: &Position,
        children: &[Position],
        first_index: usize,
    ) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;

        for (i, child) in children.iter().enumerate() {
            self.stats.inc_root_node();
            let descriptor = self.ctx.notation.describe(root, child);
            let replies = legal_successors(child);

            if replies.is_empty() && in_check(child) {
                tracing::trace!(mv = %descriptor, "mate in one");
                return Some(Candidate {
                    position: child.clone(),
                    descriptor,
                    score: POS_INF,
                    mate: true,
                    index: first_index + i,
                });
            }

            let key = child.key();
            let mut score = if replies.is_empty() {
                // stalemate
                NEG_INF
            } else {
                let score = self.cached_or_searched(key, child);
                if self.ctx.history.contains_position(&key) {
                    NEG_INF
                } else {
                    score
                }
            };

            if self
                .ctx
                .history
                .is_recent_move(&descriptor, self.ctx.params.oscillation_window)
            {
                score = score.saturating_sub(self.ctx.params.oscillation_penalty);
            }
            tracing::trace!(mv = %descriptor, score, "root child scored");

            let candidate = Candidate {
                position: child.clone(),
                descriptor,
                score,
                mate: false,
                index: first_index + i,
            };
            if candidate.beats(best.as_ref()) {
                best = Some(candidate);
            }
        }

        best
    }

    fn cached_or_searched(&mut self, key: PositionKey, child: &Position) -> i32 {
        let hit = self
            .fresh
            .get(&key)
            .copied()
            .or_else(|| self.ctx.cache.get(&key));
        if let Some(score) = hit {
            self.stats.inc_cache_hit();
            return score;
        }

        self.stats.inc_cache_miss();
        let depth = self.ctx.params.depth.saturating_sub(1);
        let score = -negamax_with_stats(child, depth, NEG_INF, POS_INF, &mut self.stats);
        self.fresh.insert(key, score);
        score
    }
}

/// Fail-soft alpha-beta negamax, scored for the side to move in `pos`
pub fn negamax(pos: &Position, depth: u8, alpha: i32, beta: i32) -> i32 {
    negamax_with_stats(pos, depth, alpha, beta, &mut SearchStats::new())
}

pub fn negamax_with_stats(
    pos: &Position,
    depth: u8,
    mut alpha: i32,
    beta: i32,
    stats: &mut SearchStats,
) -> i32 {
    stats.inc_node();
    if depth == 0 || pos.lost_king() {
        return evaluate(pos);
    }

    for child in legal_successors(pos) {
        let v = -negamax_with_stats(&child, depth - 1, -beta, -alpha, stats);
        if v >= beta {
            stats.inc_cutoff();
            return v;
        }
        if v >= alpha {
            alpha = v;
        }
    }
    alpha
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::CoordinateNotation;

    fn scan(pos: &Position, history: &History, params: &SearchParams) -> Option<Candidate> {
        let cache = ScoreCache::new();
        let ctx = SearchContext {
            cache: &cache,
            history,
            params,
            notation: &CoordinateNotation,
        };
        let children = legal_successors(pos);
        Search::new(ctx).best_of(pos, &children, 0)
    }

    #[test]
    fn depth_zero_is_static_value() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(negamax(&pos, 0, NEG_INF, POS_INF), evaluate(&pos));
    }

    #[test]
    fn finds_back_rank_mate() {
        let pos = Position::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let best = scan(&pos, &History::new(), &SearchParams::new().depth(2)).unwrap();
        assert!(best.mate);
        assert_eq!(best.descriptor, "a1a8");
        assert_eq!(best.score, POS_INF);
    }

    #[test]
    fn cache_hit_skips_search() {
        let pos = Position::initial();
        let children = legal_successors(&pos);
        let mut cache = ScoreCache::new();
        for child in &children {
            cache.insert(child.key(), 0);
        }
        cache.insert(children[3].key(), 500);

        let history = History::new();
        let params = SearchParams::new().depth(3);
        let ctx = SearchContext {
            cache: &cache,
            history: &history,
            params: &params,
            notation: &CoordinateNotation,
        };
        let mut search = Search::new(ctx);
        let best = search.best_of(&pos, &children, 0).unwrap();
        assert_eq!(best.index, 3);
        assert_eq!(best.score, 500);
        assert_eq!(search.stats().nodes, 0);
        assert_eq!(search.stats().cache_hits, 20);
        let (fresh, _) = search.into_parts();
        assert!(fresh.is_empty());
    }

    #[test]
    fn later_ties_replace_earlier() {
        let pos = Position::initial();
        let children = legal_successors(&pos);
        let mut cache = ScoreCache::new();
        for child in &children {
            cache.insert(child.key(), 7);
        }
        let history = History::new();
        let params = SearchParams::new();
        let ctx = SearchContext {
            cache: &cache,
            history: &history,
            params: &params,
            notation: &CoordinateNotation,
        };
        let best = Search::new(ctx).best_of(&pos, &children, 0).unwrap();
        assert_eq!(best.index, children.len() - 1);
    }

    #[test]
    fn huge_penalty_on_a_repeated_move_saturates() {
        let pos = Position::initial();
        let children = legal_successors(&pos);
        let mut history = History::new();
        let last = children.last().unwrap();
        let descriptor = CoordinateNotation.describe(&pos, last);
        history.record(last.key(), descriptor.clone());

        let params = SearchParams::new().depth(1).oscillation_penalty(i32::MAX);
        let best = scan(&pos, &history, &params).unwrap();
        assert_ne!(best.descriptor, descriptor);
        assert!(best.score > NEG_INF);
    }

    #[test]
    fn mate_is_never_replaced() {
        let pos = Position::initial();
        let mate = Candidate {
            position: pos.clone(),
            descriptor: String::new(),
            score: POS_INF,
            mate: true,
            index: 0,
        };
        let big = Candidate {
            score: POS_INF,
            mate: false,
            index: 1,
            ..mate.clone()
        };
        assert!(mate.beats(None));
        assert!(!big.beats(Some(&mate)));
        assert!(mate.beats(Some(&big)));
    }
}
