// Board snapshot: packed squares, side to move and the ply that produced it.
// Square mapping: a1 = 0, b1 = 1, ..., h8 = 63 (rank * 8 + file)

use crate::error::{FenError, KeyError};
use crate::utils::{file_of, parse_square, rank_of, sq, Sq};
use std::fmt;
use std::str::FromStr;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White = 1,
    Black = 2,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Rank holding this side's king and rooks at the start
    pub fn home_rank(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Rank delta of a pawn push
    pub fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Rank pawns start on (double pushes allowed from here)
    pub fn pawn_rank(self) -> usize {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// Rank this side's pawns capture en passant from
    pub fn en_passant_rank(self) -> usize {
        match self {
            Color::White => 4,
            Color::Black => 3,
        }
    }

    /// Rank this side's pawns promote on
    pub fn promotion_rank(self) -> usize {
        self.opponent().home_rank()
    }

    fn from_bits(bits: u8) -> Option<Color> {
        match bits {
            1 => Some(Color::White),
            2 => Some(Color::Black),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn = 1,
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
    King = 6,
}

impl PieceKind {
    fn from_bits(bits: u8) -> Option<PieceKind> {
        match bits {
            1 => Some(PieceKind::Pawn),
            2 => Some(PieceKind::Knight),
            3 => Some(PieceKind::Bishop),
            4 => Some(PieceKind::Rook),
            5 => Some(PieceKind::Queen),
            6 => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Lowercase letter used by FEN and coordinate notation
    pub fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    fn from_letter(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

// From the right: 3 bits piece, 2 bits color, 1 bit moved
const PIECE_MASK: u8 = 0x07;
const COLOR_MASK: u8 = 0x18;
const MOVED_MASK: u8 = 0x20;

/// One packed board square. For pawns "moved" means "advanced two ranks".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Square(u8);

impl Square {
    pub const EMPTY: Square = Square(0);

    pub fn new(kind: PieceKind, color: Color, moved: bool) -> Self {
        let mut bits = kind as u8 | ((color as u8) << 3);
        if moved {
            bits |= MOVED_MASK;
        }
        Square(bits)
    }

    pub fn piece(self) -> Option<PieceKind> {
        PieceKind::from_bits(self.0 & PIECE_MASK)
    }

    pub fn color(self) -> Option<Color> {
        Color::from_bits((self.0 & COLOR_MASK) >> 3)
    }

    pub fn moved(self) -> bool {
        self.0 & MOVED_MASK != 0
    }

    pub fn is_empty(self) -> bool {
        self.piece().is_none()
    }

    pub fn is(self, kind: PieceKind, color: Color) -> bool {
        self.piece() == Some(kind) && self.color() == Some(color)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    fn from_bits(bits: u8) -> Option<Square> {
        if bits & !(PIECE_MASK | COLOR_MASK | MOVED_MASK) != 0 {
            return None;
        }
        let piece = bits & PIECE_MASK;
        let color = (bits & COLOR_MASK) >> 3;
        if piece > 6 || color > 2 {
            return None;
        }
        Some(Square(bits))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlyKind {
    /// Quiet move or capture
    Normal,
    DoublePush,
    EnPassant,
    Castle,
    Promotion(PieceKind),
}

/// The move that produced a position. For castling `from`/`to` are the
/// king's squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ply {
    pub from: Sq,
    pub to: Sq,
    pub kind: PlyKind,
}

/// Immutable board snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    squares: [Square; 64],
    side: Color,
    last: Option<Ply>,
}

impl Position {
    /// Empty board with `side` to move
    pub fn empty(side: Color) -> Self {
        Self {
            squares: [Square::EMPTY; 64],
            side,
            last: None,
        }
    }

    /// Standard starting setup, white to move
    pub fn initial() -> Self {
        use PieceKind::*;
        const BACK_RANK: [PieceKind; 8] = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

        let mut pos = Self::empty(Color::White);
        for (file, &kind) in BACK_RANK.iter().enumerate() {
            pos.set_square(sq(0, file), Square::new(kind, Color::White, false));
            pos.set_square(sq(1, file), Square::new(Pawn, Color::White, false));
            pos.set_square(sq(6, file), Square::new(Pawn, Color::Black, false));
            pos.set_square(sq(7, file), Square::new(kind, Color::Black, false));
        }
        pos
    }

    /// Parse the first four FEN fields. Castling rights become moved flags
    /// on kings and rooks; an en passant square marks the double-stepped
    /// pawn and records its push as the last ply.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let mut fields = fen.split_whitespace();
        let placement = fields.next().ok_or(FenError::MissingField("placement"))?;
        let side = match fields.next().ok_or(FenError::MissingField("side to move"))? {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::Side(other.to_string())),
        };
        let castling = fields.next().unwrap_or("-");
        let en_passant = fields.next().unwrap_or("-");

        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::RankCount(ranks.len()));
        }

        let mut pos = Self::empty(side);
        for (i, row) in ranks.iter().enumerate() {
            let rank = 7 - i;
            let mut file = 0usize;
            for c in row.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as usize;
                    continue;
                }
                let kind = PieceKind::from_letter(c).ok_or(FenError::Piece(c))?;
                if file >= 8 {
                    return Err(FenError::RankWidth { rank: rank + 1 });
                }
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                let moved = matches!(kind, PieceKind::King | PieceKind::Rook);
                pos.set_square(sq(rank, file), Square::new(kind, color, moved));
                file += 1;
            }
            if file != 8 {
                return Err(FenError::RankWidth { rank: rank + 1 });
            }
        }

        // Unmoved kings and rooks are exactly those that still hold rights
        for right in castling.chars() {
            let (color, rook_file) = match right {
                'K' => (Color::White, 7),
                'Q' => (Color::White, 0),
                'k' => (Color::Black, 7),
                'q' => (Color::Black, 0),
                _ => continue,
            };
            let home = color.home_rank();
            if pos.square(sq(home, 4)).is(PieceKind::King, color) {
                pos.set_moved(sq(home, 4), false);
            }
            if pos.square(sq(home, rook_file)).is(PieceKind::Rook, color) {
                pos.set_moved(sq(home, rook_file), false);
            }
        }

        if en_passant != "-" {
            let target = parse_square(en_passant)
                .ok_or_else(|| FenError::EnPassant(en_passant.to_string()))?;
            let pusher = side.opponent();
            let expected_rank = (pusher.pawn_rank() as i8 + pusher.forward()) as usize;
            if rank_of(target) != expected_rank {
                return Err(FenError::EnPassant(en_passant.to_string()));
            }
            let pawn_sq = sq(
                (expected_rank as i8 + pusher.forward()) as usize,
                file_of(target),
            );
            if !pos.square(pawn_sq).is(PieceKind::Pawn, pusher) {
                return Err(FenError::EnPassant(en_passant.to_string()));
            }
            let origin = sq(pusher.pawn_rank(), file_of(target));
            pos.set_moved(pawn_sq, true);
            pos.last = Some(Ply {
                from: origin,
                to: pawn_sq,
                kind: PlyKind::DoublePush,
            });
        }

        Ok(pos)
    }

    pub fn side(&self) -> Color {
        self.side
    }

    /// The ply that produced this position, `None` for a set-up position
    pub fn last_ply(&self) -> Option<&Ply> {
        self.last.as_ref()
    }

    pub fn square(&self, s: Sq) -> Square {
        self.squares[s]
    }

    pub fn piece_at(&self, s: Sq) -> Option<PieceKind> {
        self.squares[s].piece()
    }

    pub fn color_at(&self, s: Sq) -> Option<Color> {
        self.squares[s].color()
    }

    pub fn moved_at(&self, s: Sq) -> bool {
        self.squares[s].moved()
    }

    pub fn is_empty_at(&self, s: Sq) -> bool {
        self.squares[s].is_empty()
    }

    pub fn set_square(&mut self, s: Sq, square: Square) {
        self.squares[s] = square;
    }

    pub fn set_piece(&mut self, s: Sq, kind: PieceKind) {
        self.squares[s].0 = (self.squares[s].0 & !PIECE_MASK) | kind as u8;
    }

    pub fn set_color(&mut self, s: Sq, color: Color) {
        self.squares[s].0 = (self.squares[s].0 & !COLOR_MASK) | ((color as u8) << 3);
    }

    pub fn set_moved(&mut self, s: Sq, moved: bool) {
        if moved {
            self.squares[s].0 |= MOVED_MASK;
        } else {
            self.squares[s].0 &= !MOVED_MASK;
        }
    }

    pub fn clear(&mut self, s: Sq) {
        self.squares[s] = Square::EMPTY;
    }

    /// Fresh copy for the successor reached by `ply`, with the side flipped
    pub fn child(&self, ply: Ply) -> Position {
        Position {
            squares: self.squares,
            side: self.side.opponent(),
            last: Some(ply),
        }
    }

    /// Same board with the given side to move
    pub fn with_side(&self, side: Color) -> Position {
        Position {
            squares: self.squares,
            side,
            last: self.last,
        }
    }

    /// Color-swapped, vertically flipped copy
    pub fn mirrored(&self) -> Position {
        let mut squares = [Square::EMPTY; 64];
        for (s, square) in self.squares.iter().enumerate() {
            squares[s ^ 56] = match (square.piece(), square.color()) {
                (Some(kind), Some(color)) => Square::new(kind, color.opponent(), square.moved()),
                _ => Square::EMPTY,
            };
        }
        Position {
            squares,
            side: self.side.opponent(),
            last: self.last.map(|ply| Ply {
                from: ply.from ^ 56,
                to: ply.to ^ 56,
                kind: ply.kind,
            }),
        }
    }

    /// Bitboard of squares holding `color`'s pieces of `kind`
    pub fn pieces(&self, kind: PieceKind, color: Color) -> u64 {
        self.squares
            .iter()
            .enumerate()
            .filter(|(_, square)| square.is(kind, color))
            .fold(0u64, |bb, (s, _)| bb | (1u64 << s))
    }

    pub fn king_count(&self) -> usize {
        self.squares
            .iter()
            .filter(|square| square.piece() == Some(PieceKind::King))
            .count()
    }

    /// Fewer than two kings on the board: the game is over
    pub fn lost_king(&self) -> bool {
        self.king_count() < 2
    }

    pub fn key(&self) -> PositionKey {
        let mut bytes = [0u8; 65];
        for (b, square) in bytes.iter_mut().zip(self.squares.iter()) {
            *b = square.bits();
        }
        bytes[64] = self.side as u8;
        PositionKey(bytes)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::initial()
    }
}

// Text form offsets every byte into a run of printable, non-whitespace chars
const KEY_CHAR_BASE: u32 = 0xAE;

/// Canonical encoding: 64 square bytes followed by the side to move.
/// Does not include the ply record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionKey([u8; 65]);

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.0.iter() {
            let c = char::from_u32(KEY_CHAR_BASE + b as u32).ok_or(fmt::Error)?;
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl FromStr for PositionKey {
    type Err = KeyError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 65];
        let mut count = 0usize;
        for c in text.chars() {
            if count == 65 {
                return Err(KeyError(format!("longer than 65 characters: {}", text)));
            }
            let raw = (c as u32)
                .checked_sub(KEY_CHAR_BASE)
                .filter(|v| *v <= 0xFF)
                .ok_or_else(|| KeyError(format!("character {:?} out of range", c)))?;
            bytes[count] = raw as u8;
            count += 1;
        }
        if count != 65 {
            return Err(KeyError(format!("expected 65 characters, found {}", count)));
        }
        for (i, &b) in bytes[..64].iter().enumerate() {
            if Square::from_bits(b).is_none() {
                return Err(KeyError(format!("bad square byte {:#x} at {}", b, i)));
            }
        }
        if Color::from_bits(bytes[64]).is_none() {
            return Err(KeyError(format!("bad side byte {:#x}", bytes[64])));
        }
        Ok(PositionKey(bytes))
    }
}
