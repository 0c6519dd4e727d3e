use castellan::board::Position;
use castellan::notation::CoordinateNotation;
use castellan::search::{History, ScoreCache, SearchParams, ThreadManager};

const POSITIONS: &[&str] = &[
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4",
];

#[test]
fn one_worker_and_many_workers_agree() {
    castellan::init();
    let params = SearchParams::new().depth(2);
    let history = History::new();

    for fen in POSITIONS {
        let pos = Position::from_fen(fen).unwrap();
        let mut baseline = None;
        for threads in [1, 2, 3, 7] {
            let mut cache = ScoreCache::new();
            let decision = ThreadManager::new(threads).search(
                &pos,
                &mut cache,
                &history,
                &params,
                &CoordinateNotation,
            );
            assert!(decision.failed_workers.is_empty());
            let choice = decision.choice.expect("every test position has moves");
            match &baseline {
                None => baseline = Some(choice),
                Some(first) => {
                    assert_eq!(choice.score, first.score, "{} with {} threads", fen, threads);
                    assert_eq!(choice.index, first.index, "{} with {} threads", fen, threads);
                }
            }
        }
    }
}

#[test]
fn fresh_scores_are_merged_after_join() {
    let pos = Position::initial();
    let mut cache = ScoreCache::new();
    let history = History::new();
    let params = SearchParams::new().depth(2);

    let manager = ThreadManager::new(4);
    let first = manager.search(&pos, &mut cache, &history, &params, &CoordinateNotation);
    assert_eq!(cache.len(), 20);
    assert_eq!(first.stats.cache_misses, 20);

    // second decision is answered entirely from the cache
    let second = manager.search(&pos, &mut cache, &history, &params, &CoordinateNotation);
    assert_eq!(second.stats.cache_hits, 20);
    assert_eq!(second.stats.nodes, 0);
    assert_eq!(
        first.choice.map(|c| c.score),
        second.choice.map(|c| c.score)
    );
}

#[test]
fn dispatches_one_worker_per_thread() {
    let pos = Position::initial();
    let history = History::new();
    let params = SearchParams::new().depth(1);
    for threads in [6, 8, 12, 15, 20] {
        let mut cache = ScoreCache::new();
        let decision = ThreadManager::new(threads).search(
            &pos,
            &mut cache,
            &history,
            &params,
            &CoordinateNotation,
        );
        assert_eq!(decision.workers, threads, "{} threads", threads);
        assert_eq!(decision.stats.root_nodes, 20);
        assert_eq!(cache.len(), 20);
    }
}

#[test]
fn more_threads_than_moves() {
    // the rook holds the b-file, so Ka7 is the only move
    let pos = Position::from_fen("k7/8/8/8/8/8/8/1R5K b - - 0 1").unwrap();
    let mut cache = ScoreCache::new();
    let decision = ThreadManager::new(16).search(
        &pos,
        &mut cache,
        &History::new(),
        &SearchParams::new().depth(1),
        &CoordinateNotation,
    );
    assert_eq!(decision.workers, 1);
    assert_eq!(decision.choice.unwrap().descriptor, "a8a7");
}
