//! Castellan: a chess engine built around full-rule move generation,
//! fail-soft negamax with alpha-beta pruning, a persistent position-score
//! cache and a partitioned parallel root search.

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod movegen;
pub mod notation;
pub mod rules;
pub mod search;
pub mod utils;

pub use board::{Color, PieceKind, Position, PositionKey};
pub use engine::Engine;
pub use rules::{in_check, legal_successors, outcome, Outcome};

/// Build the leaper attack tables up front. Lookups build them lazily
/// otherwise.
pub fn init() {
    utils::init_attack_tables();
}
