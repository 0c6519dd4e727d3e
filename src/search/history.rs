//! Played-game history used by the root repetition heuristics.
//!
//! Only moves actually played are recorded, never search exploration.
//! Both sequences are unbounded and read most-recent-first.

use crate::board::PositionKey;

#[derive(Debug, Default, Clone)]
pub struct History {
    positions: Vec<PositionKey>,
    moves: Vec<String>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one played move and the position it reached
    pub fn record(&mut self, key: PositionKey, descriptor: String) {
        self.positions.push(key);
        self.moves.push(descriptor);
    }

    pub fn contains_position(&self, key: &PositionKey) -> bool {
        self.positions.iter().any(|k| k == key)
    }

    /// Whether `descriptor` is among the `window` most recent played moves
    pub fn is_recent_move(&self, descriptor: &str, window: usize) -> bool {
        self.moves().take(window).any(|m| m == descriptor)
    }

    /// Played positions, most recent first
    pub fn positions(&self) -> impl Iterator<Item = &PositionKey> {
        self.positions.iter().rev()
    }

    /// Played move descriptors, most recent first
    pub fn moves(&self) -> impl Iterator<Item = &str> {
        self.moves.iter().rev().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Color, Position};

    #[test]
    fn most_recent_first() {
        let mut history = History::new();
        let start = Position::initial();
        history.record(start.key(), "g1f3".to_string());
        history.record(start.with_side(Color::Black).key(), "g8f6".to_string());

        let moves: Vec<&str> = history.moves().collect();
        assert_eq!(moves, vec!["g8f6", "g1f3"]);
        assert_eq!(history.positions().next(), Some(&start.with_side(Color::Black).key()));
        assert!(history.contains_position(&start.key()));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn recent_move_respects_window() {
        let mut history = History::new();
        let key = Position::initial().key();
        for mv in ["g1f3", "g8f6", "f3g1", "f6g8"] {
            history.record(key, mv.to_string());
        }
        assert!(history.is_recent_move("f6g8", 1));
        assert!(!history.is_recent_move("g1f3", 3));
        assert!(history.is_recent_move("g1f3", 4));
        assert!(!history.is_recent_move("e2e4", 10));
    }
}
