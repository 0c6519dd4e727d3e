//! Move descriptors.
//!
//! The search only needs descriptors as opaque, comparable strings (for
//! the oscillation penalty and the played-move history). The default
//! notation is pure coordinate form: `e2e4`, `e7e8q`, `e1g1`.

use crate::board::{Ply, PlyKind, Position};
use crate::rules::legal_successors;
use crate::utils::square_name;

/// Describes the single ply leading from `before` to `after`
pub trait MoveNotation: Sync {
    fn describe(&self, before: &Position, after: &Position) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CoordinateNotation;

impl MoveNotation for CoordinateNotation {
    fn describe(&self, before: &Position, after: &Position) -> String {
        debug_assert_eq!(after.side(), before.side().opponent());
        after.last_ply().map(coordinate).unwrap_or_default()
    }
}

/// Coordinate text of one ply
pub fn coordinate(ply: &Ply) -> String {
    let mut text = format!("{}{}", square_name(ply.from), square_name(ply.to));
    if let PlyKind::Promotion(kind) = ply.kind {
        text.push(kind.letter());
    }
    text
}

/// The legal successor of `pos` whose coordinate text is `text`
pub fn find_successor(pos: &Position, text: &str) -> Option<Position> {
    let text = text.trim().to_ascii_lowercase();
    legal_successors(pos)
        .into_iter()
        .find(|child| child.last_ply().map(coordinate).as_deref() == Some(text.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PieceKind;

    #[test]
    fn pawn_push_and_promotion_text() {
        let start = Position::initial();
        let e4 = find_successor(&start, "e2e4").expect("e2e4 is legal");
        assert_eq!(CoordinateNotation.describe(&start, &e4), "e2e4");

        let pos = Position::from_fen("7k/P7/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let knight = find_successor(&pos, "a7a8n").expect("underpromotion is legal");
        assert_eq!(knight.piece_at(56), Some(PieceKind::Knight));
        assert!(find_successor(&pos, "a7a8").is_none());
    }

    #[test]
    fn castling_uses_king_squares() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let castled = find_successor(&pos, "E1G1").expect("short castle is legal");
        assert_eq!(CoordinateNotation.describe(&pos, &castled), "e1g1");
    }

    #[test]
    fn unknown_text_finds_nothing() {
        assert!(find_successor(&Position::initial(), "e2e5").is_none());
        assert!(find_successor(&Position::initial(), "").is_none());
    }
}
