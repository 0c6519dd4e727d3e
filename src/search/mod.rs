//! Search layer: negamax, the root scan with its cache and history
//! overrides, and the partitioned orchestrator.

pub mod cache;
pub mod history;
pub mod params;
pub mod search;
pub mod stats;
pub mod thread_mgr;

pub use self::cache::ScoreCache;
pub use self::history::History;
pub use self::params::SearchParams;
pub use self::search::{negamax, Candidate, Search, SearchContext};
pub use self::stats::SearchStats;
pub use self::thread_mgr::{Decision, ThreadManager, WorkerFailure};
