// Square helpers, bit iteration and precomputed leaper attack tables

/// Square index layout: a1 = 0, b1 = 1, ..., h8 = 63
pub type Sq = usize;

#[inline]
pub fn sq(rank: usize, file: usize) -> Sq {
    rank * 8 + file
}

#[inline]
pub fn rank_of(s: Sq) -> usize {
    s / 8
}

#[inline]
pub fn file_of(s: Sq) -> usize {
    s % 8
}

/// Step from `s` by (rank, file) deltas, `None` when it leaves the board
#[inline]
pub fn offset(s: Sq, dr: i8, df: i8) -> Option<Sq> {
    let r = rank_of(s) as i8 + dr;
    let f = file_of(s) as i8 + df;
    if (0..8).contains(&r) && (0..8).contains(&f) {
        Some(sq(r as usize, f as usize))
    } else {
        None
    }
}

/// Coordinate name of a square ("a1" .. "h8")
pub fn square_name(s: Sq) -> String {
    let file_char = (b'a' + file_of(s) as u8) as char;
    let rank_char = (b'1' + rank_of(s) as u8) as char;
    format!("{}{}", file_char, rank_char)
}

/// Parse a coordinate square name ("e4" -> 28)
pub fn parse_square(name: &str) -> Option<Sq> {
    let bytes = name.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let (file, rank) = (bytes[0], bytes[1]);
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return None;
    }
    Some(sq((rank - b'1') as usize, (file - b'a') as usize))
}

// Bit operations
#[inline]
pub fn pop_lsb(bb: &mut u64) -> Option<Sq> {
    if *bb == 0 {
        return None;
    }
    let lsb = bb.trailing_zeros() as Sq;
    *bb &= *bb - 1;
    Some(lsb)
}

pub struct BitIter {
    bb: u64,
}

impl Iterator for BitIter {
    type Item = Sq;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        pop_lsb(&mut self.bb)
    }
}

#[inline]
pub fn iter_bits(bb: u64) -> BitIter {
    BitIter { bb }
}

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
    (-2, 1),
    (-2, -1),
];

pub const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, 0),
    (-1, -1),
    (-1, 1),
    (1, 0),
    (1, -1),
    (1, 1),
    (0, -1),
    (0, 1),
];

pub const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub const STRAIGHTS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

// Precomputed attack tables using OnceLock for thread safety
use std::sync::OnceLock;

static KNIGHT_ATTACKS: OnceLock<[u64; 64]> = OnceLock::new();
static KING_ATTACKS: OnceLock<[u64; 64]> = OnceLock::new();

fn leaper_table(offsets: &[(i8, i8); 8]) -> [u64; 64] {
    let mut attacks = [0u64; 64];
    for (from, mask) in attacks.iter_mut().enumerate() {
        for &(dr, df) in offsets {
            if let Some(to) = offset(from, dr, df) {
                *mask |= 1u64 << to;
            }
        }
    }
    attacks
}

pub fn init_attack_tables() {
    KNIGHT_ATTACKS.get_or_init(|| leaper_table(&KNIGHT_OFFSETS));
    KING_ATTACKS.get_or_init(|| leaper_table(&KING_OFFSETS));
}

#[inline]
pub fn knight_attacks(s: Sq) -> u64 {
    KNIGHT_ATTACKS.get_or_init(|| leaper_table(&KNIGHT_OFFSETS))[s]
}

#[inline]
pub fn king_attacks(s: Sq) -> u64 {
    KING_ATTACKS.get_or_init(|| leaper_table(&KING_OFFSETS))[s]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_leapers() {
        init_attack_tables();
        // a1 knight reaches b3 and c2
        assert_eq!(knight_attacks(0).count_ones(), 2);
        assert_eq!(king_attacks(0).count_ones(), 3);
        // e4 knight has all eight jumps
        assert_eq!(knight_attacks(sq(3, 4)).count_ones(), 8);
    }

    #[test]
    fn square_names_round_trip() {
        assert_eq!(square_name(0), "a1");
        assert_eq!(square_name(63), "h8");
        assert_eq!(parse_square("e4"), Some(28));
        assert_eq!(parse_square("i9"), None);
        assert_eq!(parse_square("e"), None);
    }

    #[test]
    fn bit_iteration_ascends() {
        let squares: Vec<Sq> = iter_bits(0b1010_0001).collect();
        assert_eq!(squares, vec![0, 5, 7]);
    }
}
