//! Pseudo-legal successor generation.
//!
//! Every generated successor is a fresh [`Position`] with the side to move
//! flipped. Only piece mechanics are enforced here; self-check and the
//! castling check rules belong to [`crate::rules`].

use crate::board::{Color, PieceKind, Ply, PlyKind, Position};
use crate::utils::{
    file_of, offset, rank_of, sq, Sq, DIAGONALS, KING_OFFSETS, KNIGHT_OFFSETS, STRAIGHTS,
};
use std::collections::VecDeque;

/// Promotion choices pushed to the front of the successor list, in push order
const FRONT_PROMOTIONS: [PieceKind; 2] = [PieceKind::Knight, PieceKind::Queen];
/// Promotion choices pushed to the back of the successor list, in push order
const BACK_PROMOTIONS: [PieceKind; 2] = [PieceKind::Rook, PieceKind::Bishop];

/// All pseudo-legal successors of `pos`
pub fn pseudo_successors(pos: &Position) -> Vec<Position> {
    let mut out = Successors::new(pos);
    let side = pos.side();

    for from in 0..64 {
        if pos.color_at(from) != Some(side) {
            continue;
        }
        match pos.piece_at(from) {
            Some(PieceKind::Pawn) => out.pawn(from),
            Some(PieceKind::Knight) => out.leaper(from, &KNIGHT_OFFSETS),
            Some(PieceKind::Bishop) => out.slider(from, &DIAGONALS),
            Some(PieceKind::Rook) => out.slider(from, &STRAIGHTS),
            Some(PieceKind::Queen) => {
                out.slider(from, &DIAGONALS);
                out.slider(from, &STRAIGHTS);
            }
            Some(PieceKind::King) => {
                out.leaper(from, &KING_OFFSETS);
                out.castles(from);
            }
            None => {}
        }
    }

    out.into_vec()
}

/// Successor accumulator. A deque so promotions can be biased to the front.
struct Successors<'a> {
    parent: &'a Position,
    side: Color,
    list: VecDeque<Position>,
}

impl<'a> Successors<'a> {
    fn new(parent: &'a Position) -> Self {
        Self {
            parent,
            side: parent.side(),
            list: VecDeque::with_capacity(48),
        }
    }

    fn into_vec(self) -> Vec<Position> {
        self.list.into()
    }

    fn can_land(&self, to: Sq) -> bool {
        self.parent.color_at(to) != Some(self.side)
    }

    /// Knight and king steps
    fn leaper(&mut self, from: Sq, offsets: &[(i8, i8); 8]) {
        for &(dr, df) in offsets {
            if let Some(to) = offset(from, dr, df) {
                if self.can_land(to) {
                    self.push_move(from, to);
                }
            }
        }
    }

    /// Ray casting for bishops, rooks and queens
    fn slider(&mut self, from: Sq, dirs: &[(i8, i8); 4]) {
        for &(dr, df) in dirs {
            let mut cur = from;
            while let Some(to) = offset(cur, dr, df) {
                match self.parent.color_at(to) {
                    None => self.push_move(from, to),
                    Some(color) => {
                        if color != self.side {
                            self.push_move(from, to);
                        }
                        break;
                    }
                }
                cur = to;
            }
        }
    }

    fn pawn(&mut self, from: Sq) {
        let parent = self.parent;
        let fwd = self.side.forward();

        if let Some(one) = offset(from, fwd, 0) {
            if parent.is_empty_at(one) {
                self.push_pawn(from, one, PlyKind::Normal);
                if rank_of(from) == self.side.pawn_rank() {
                    if let Some(two) = offset(from, 2 * fwd, 0) {
                        if parent.is_empty_at(two) {
                            self.push_pawn(from, two, PlyKind::DoublePush);
                        }
                    }
                }
            }
        }

        for df in [-1, 1] {
            if let Some(to) = offset(from, fwd, df) {
                if parent.color_at(to) == Some(self.side.opponent()) {
                    self.push_pawn(from, to, PlyKind::Normal);
                }
            }
        }

        if rank_of(from) != self.side.en_passant_rank() {
            return;
        }
        // The victim must have arrived on the previous ply, i.e. its square
        // was empty one position ago.
        let arrived = parent.last_ply().map(|ply| ply.to);
        for df in [-1, 1] {
            let (Some(beside), Some(to)) = (offset(from, 0, df), offset(from, fwd, df)) else {
                continue;
            };
            let victim = parent.square(beside);
            if victim.is(PieceKind::Pawn, self.side.opponent())
                && victim.moved()
                && arrived == Some(beside)
                && parent.is_empty_at(to)
            {
                self.push_pawn(from, to, PlyKind::EnPassant);
            }
        }
    }

    fn castles(&mut self, from: Sq) {
        let parent = self.parent;
        let side = self.side;
        let home = side.home_rank();
        if from != sq(home, 4) || parent.moved_at(from) {
            return;
        }

        let rook_ready = |file: usize| {
            let rook = parent.square(sq(home, file));
            rook.is(PieceKind::Rook, side) && !rook.moved()
        };
        let clear = |files: &[usize]| files.iter().all(|&f| parent.is_empty_at(sq(home, f)));

        if clear(&[5, 6]) && rook_ready(7) {
            self.push_castle(home, 6, 7, 5);
        }
        if clear(&[1, 2, 3]) && rook_ready(0) {
            self.push_castle(home, 2, 0, 3);
        }
    }

    /// Plain relocation; the destination is marked moved
    fn push_move(&mut self, from: Sq, to: Sq) {
        let mut child = self.parent.child(Ply {
            from,
            to,
            kind: PlyKind::Normal,
        });
        child.set_square(to, self.parent.square(from));
        child.set_moved(to, true);
        child.clear(from);
        self.list.push_back(child);
    }

    /// Pawn relocation. Keeps the pawn's own moved flag except on a double
    /// push; fans out into the four promotions on the last rank.
    fn push_pawn(&mut self, from: Sq, to: Sq, kind: PlyKind) {
        let mut child = self.parent.child(Ply { from, to, kind });
        child.set_square(to, self.parent.square(from));
        child.clear(from);

        match kind {
            PlyKind::EnPassant => child.clear(sq(rank_of(from), file_of(to))),
            PlyKind::DoublePush => child.set_moved(to, true),
            _ => {}
        }

        if rank_of(to) != self.side.promotion_rank() {
            self.list.push_back(child);
            return;
        }

        let promote = |piece: PieceKind| {
            let mut promoted = self.parent.child(Ply {
                from,
                to,
                kind: PlyKind::Promotion(piece),
            });
            promoted.set_square(to, child.square(to));
            promoted.set_piece(to, piece);
            promoted.clear(from);
            promoted
        };
        let front: Vec<Position> = FRONT_PROMOTIONS.iter().map(|&p| promote(p)).collect();
        let back: Vec<Position> = BACK_PROMOTIONS.iter().map(|&p| promote(p)).collect();
        for promoted in front {
            self.list.push_front(promoted);
        }
        for promoted in back {
            self.list.push_back(promoted);
        }
    }

    fn push_castle(&mut self, home: usize, king_file: usize, rook_from: usize, rook_to: usize) {
        let (king_sq, king_dest) = (sq(home, 4), sq(home, king_file));
        let (rook_sq, rook_dest) = (sq(home, rook_from), sq(home, rook_to));

        let mut child = self.parent.child(Ply {
            from: king_sq,
            to: king_dest,
            kind: PlyKind::Castle,
        });
        child.set_square(king_dest, self.parent.square(king_sq));
        child.set_square(rook_dest, self.parent.square(rook_sq));
        child.set_moved(king_dest, true);
        child.set_moved(rook_dest, true);
        child.clear(king_sq);
        child.clear(rook_sq);
        self.list.push_back(child);
    }
}
