//! Static evaluation: material plus a small bonus for the center.
//!
//! Scores are always relative to the side to move (positive favours the
//! mover). A missing king is reported through the `POS_INF`/`NEG_INF`
//! sentinels, which dominate any material swing but can still be negated.

use crate::board::{PieceKind, Position};
use crate::utils::{file_of, rank_of};

pub const POS_INF: i32 = 1 << 24;
pub const NEG_INF: i32 = -(1 << 24);

// ============================================================================
// MATERIAL VALUES
// ============================================================================
pub const PAWN_VALUE: i32 = 64;
pub const KNIGHT_VALUE: i32 = 192;
pub const BISHOP_VALUE: i32 = 192;
pub const ROOK_VALUE: i32 = 320;
pub const QUEEN_VALUE: i32 = 576;

pub const BISHOP_PAIR_BONUS: i32 = 32;

/// Positional bonus is the material value shifted down by this much
const CENTER_SHIFT: u32 = 6;

pub fn material_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => PAWN_VALUE,
        PieceKind::Knight => KNIGHT_VALUE,
        PieceKind::Bishop => BISHOP_VALUE,
        PieceKind::Rook => ROOK_VALUE,
        PieceKind::Queen => QUEEN_VALUE,
        PieceKind::King => 0,
    }
}

/// Ranks 4-5, files c-f
fn in_center(s: usize) -> bool {
    (3..5).contains(&rank_of(s)) && (2..6).contains(&file_of(s))
}

/// Material balance for the mover, with the bishop-pair bonus.
/// Returns a sentinel when either side has lost its king.
pub fn material_advantage(pos: &Position) -> i32 {
    let player = pos.side();
    let (mut value, mut bishops, mut enemy_bishops) = (0i32, 0u32, 0u32);
    let (mut king, mut enemy_king) = (false, false);

    for s in 0..64 {
        let square = pos.square(s);
        let (Some(kind), Some(color)) = (square.piece(), square.color()) else {
            continue;
        };
        if color == player {
            value += material_value(kind);
            match kind {
                PieceKind::Bishop => bishops += 1,
                PieceKind::King => king = true,
                _ => {}
            }
        } else {
            value -= material_value(kind);
            match kind {
                PieceKind::Bishop => enemy_bishops += 1,
                PieceKind::King => enemy_king = true,
                _ => {}
            }
        }
    }

    if !king {
        return NEG_INF;
    }
    if !enemy_king {
        return POS_INF;
    }

    if bishops > 1 {
        value += BISHOP_PAIR_BONUS;
    }
    if enemy_bishops > 1 {
        value -= BISHOP_PAIR_BONUS;
    }
    value
}

/// Small reward for occupying the center, mirrored as a penalty for the
/// opponent's pieces there
pub fn positional_appeal(pos: &Position) -> i32 {
    let player = pos.side();
    (0..64)
        .filter(|&s| in_center(s))
        .filter_map(|s| {
            let square = pos.square(s);
            let bonus = material_value(square.piece()?) >> CENTER_SHIFT;
            Some(if square.color()? == player { bonus } else { -bonus })
        })
        .sum()
}

/// Full static evaluation from the side to move's point of view
pub fn evaluate(pos: &Position) -> i32 {
    material_advantage(pos) + positional_appeal(pos)
}
