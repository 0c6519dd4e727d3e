//! Legality filter on top of the pseudo-legal generator.
//!
//! A successor is illegal when the opponent could capture the mover's king
//! on the very next reply. Castling additionally may not start from check
//! and may not cross an attacked square, tested as "could the opponent's
//! reply take the relocated rook".
//!
//! "Some pseudo-legal reply lands on square X" is answered with a direct
//! attack query that uses the same capture geometry as the generator, so a
//! filtered position costs one expansion instead of two.

use crate::board::{Color, PieceKind, PlyKind, Position};
use crate::movegen::pseudo_successors;
use crate::utils::{iter_bits, king_attacks, knight_attacks, offset, sq, Sq, DIAGONALS, STRAIGHTS};

/// Game state of the side to move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ongoing,
    Checkmate,
    Stalemate,
}

/// True iff some pseudo-legal move of `by` could capture a piece on `target`
pub fn is_attacked(pos: &Position, target: Sq, by: Color) -> bool {
    // Pawns capture diagonally forward, so look one rank behind the target
    for df in [-1, 1] {
        if let Some(s) = offset(target, -by.forward(), df) {
            if pos.square(s).is(PieceKind::Pawn, by) {
                return true;
            }
        }
    }

    if iter_bits(knight_attacks(target)).any(|s| pos.square(s).is(PieceKind::Knight, by)) {
        return true;
    }
    if iter_bits(king_attacks(target)).any(|s| pos.square(s).is(PieceKind::King, by)) {
        return true;
    }

    ray_hits(pos, target, by, &DIAGONALS, PieceKind::Bishop)
        || ray_hits(pos, target, by, &STRAIGHTS, PieceKind::Rook)
}

fn ray_hits(
    pos: &Position,
    target: Sq,
    by: Color,
    dirs: &[(i8, i8); 4],
    slider: PieceKind,
) -> bool {
    for &(dr, df) in dirs {
        let mut cur = target;
        while let Some(s) = offset(cur, dr, df) {
            let square = pos.square(s);
            if !square.is_empty() {
                if square.is(slider, by) || square.is(PieceKind::Queen, by) {
                    return true;
                }
                break;
            }
            cur = s;
        }
    }
    false
}

/// Whether `color`'s king could be taken by the opponent's next move.
/// A side with no king left counts as capturable.
fn king_capturable(pos: &Position, color: Color) -> bool {
    let kings = pos.pieces(PieceKind::King, color);
    kings == 0 || iter_bits(kings).any(|s| is_attacked(pos, s, color.opponent()))
}

/// True iff the side to move has a king the opponent could capture
pub fn in_check(pos: &Position) -> bool {
    king_capturable(pos, pos.side())
}

/// Legal successors of `pos`, in generator order
pub fn legal_successors(pos: &Position) -> Vec<Position> {
    let mover = pos.side();
    let mut mover_in_check: Option<bool> = None;
    let mut legal = Vec::new();

    for child in pseudo_successors(pos) {
        if king_capturable(&child, mover) {
            continue;
        }
        if child.last_ply().map(|ply| ply.kind) == Some(PlyKind::Castle) {
            if *mover_in_check.get_or_insert_with(|| in_check(pos)) {
                continue;
            }
            if castled_through_check(pos, &child) {
                continue;
            }
        }
        legal.push(child);
    }

    legal
}

/// Castling proxy: after castling from `before` into `after`, could the
/// opponent's reply change the rook's new square?
pub fn castled_through_check(before: &Position, after: &Position) -> bool {
    let mover = before.side();
    let home = mover.home_rank();
    let rook_file = if after.square(sq(home, 2)).is(PieceKind::King, mover) {
        3
    } else {
        5
    };
    // Only a capture can change an occupied square
    is_attacked(after, sq(home, rook_file), mover.opponent())
}

/// Checkmate, stalemate or still playing, for the side to move
pub fn outcome(pos: &Position) -> Outcome {
    if !legal_successors(pos).is_empty() {
        Outcome::Ongoing
    } else if in_check(pos) {
        Outcome::Checkmate
    } else {
        Outcome::Stalemate
    }
}

/// Leaf count of the legal move tree to `depth`
pub fn perft(pos: &Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let children = legal_successors(pos);
    if depth == 1 {
        return children.len() as u64;
    }
    children.iter().map(|child| perft(child, depth - 1)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::START_FEN;

    fn pos(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    #[test]
    fn start_position_has_twenty_legal_moves() {
        assert_eq!(legal_successors(&pos(START_FEN)).len(), 20);
        assert!(!in_check(&pos(START_FEN)));
    }

    #[test]
    fn attacks_follow_capture_geometry() {
        let p = pos("4k3/8/8/8/4p3/8/8/4K3 w - - 0 1");
        // Black pawn on e4 attacks d3 and f3 but not e3
        assert!(is_attacked(&p, sq(2, 3), Color::Black));
        assert!(is_attacked(&p, sq(2, 5), Color::Black));
        assert!(!is_attacked(&p, sq(2, 4), Color::Black));
    }

    #[test]
    fn pinned_piece_cannot_move() {
        // White rook on e2 is pinned by the black rook on e8
        let p = pos("4r1k1/8/8/8/8/8/4R3/4K3 w - - 0 1");
        let children = legal_successors(&p);
        assert!(children
            .iter()
            .filter(|c| c.last_ply().map(|ply| ply.from) == Some(sq(1, 4)))
            .all(|c| c.last_ply().map(|ply| ply.to % 8) == Some(4)));
    }

    #[test]
    fn no_castling_out_of_check() {
        let p = pos("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(in_check(&p));
        assert!(!legal_successors(&p)
            .iter()
            .any(|c| c.last_ply().map(|ply| ply.kind) == Some(PlyKind::Castle)));
    }

    #[test]
    fn no_castling_through_attacked_square() {
        // Black rook on f8 covers f1, so only the long castle remains
        let p = pos("5rk1/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        let castles: Vec<Position> = legal_successors(&p)
            .into_iter()
            .filter(|c| c.last_ply().map(|ply| ply.kind) == Some(PlyKind::Castle))
            .collect();
        assert_eq!(castles.len(), 1);
        assert!(castles[0].square(sq(0, 2)).is(PieceKind::King, Color::White));
    }

    #[test]
    fn mate_and_stalemate_are_distinguished() {
        // Back-rank mate
        let mate = pos("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1");
        assert_eq!(outcome(&mate), Outcome::Checkmate);
        // King in the corner with no moves, not attacked
        let stale = pos("7k/5Q2/8/8/8/8/8/6K1 b - - 0 1");
        assert_eq!(outcome(&stale), Outcome::Stalemate);
        assert_eq!(outcome(&pos(START_FEN)), Outcome::Ongoing);
    }

    #[test]
    fn perft_start_shallow() {
        let p = pos(START_FEN);
        assert_eq!(perft(&p, 1), 20);
        assert_eq!(perft(&p, 2), 400);
    }
}
