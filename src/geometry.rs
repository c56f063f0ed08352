//! Per-kind movement geometry.
//!
//! Nothing here knows about turns, castling rights or checks: sliding pieces
//! are described by the directions they ray along, knights and kings by fixed
//! target tables, and pawns by their side-dependent push and attack shapes.

use crate::bitboard::Direction::*;
use crate::bitboard::{BitBoard, Direction, Square};
use crate::piece::{PieceKind, Side};

pub const ROOK_DIRECTIONS: [Direction; 4] = [North, South, East, West];
pub const BISHOP_DIRECTIONS: [Direction; 4] = [NorthEast, NorthWest, SouthEast, SouthWest];
pub const QUEEN_DIRECTIONS: [Direction; 8] = [
    North, South, East, West, NorthEast, NorthWest, SouthEast, SouthWest,
];

struct SquareTable([BitBoard; 64]);

impl SquareTable {
    const fn get(&self, square: Square) -> BitBoard {
        self.0[square as usize]
    }
}

struct SidedSquareTable {
    white: SquareTable,
    black: SquareTable,
}

impl SidedSquareTable {
    const fn get(&self, square: Square, side: Side) -> BitBoard {
        match side {
            Side::White => self.white.get(square),
            Side::Black => self.black.get(square),
        }
    }
}

/// Each entry of `steps` is a chain of single-square shifts. A chain that
/// runs off the board contributes nothing.
const fn build_table(steps: &[&[Direction]]) -> SquareTable {
    let mut bbs = [BitBoard::empty(); 64];

    let mut sq_idx = 0;
    while sq_idx < bbs.len() {
        let sq = Square::from_u8(sq_idx as u8);
        let mut sq_bb = BitBoard::empty();

        let mut steps_idx = 0;
        while steps_idx < steps.len() {
            let chain = steps[steps_idx];
            let mut target = BitBoard::from_square(sq);

            let mut chain_idx = 0;
            while chain_idx < chain.len() {
                target = target.shift(chain[chain_idx]);
                if target.is_empty() {
                    break;
                }
                chain_idx += 1;
            }
            sq_bb = sq_bb.const_bit_or(target);
            steps_idx += 1;
        }
        bbs[sq_idx] = sq_bb;
        sq_idx += 1;
    }

    SquareTable(bbs)
}

static KNIGHT_TARGETS: SquareTable = build_table(&[
    &[North, NorthEast],
    &[North, NorthWest],
    &[South, SouthEast],
    &[South, SouthWest],
    &[East, NorthEast],
    &[East, SouthEast],
    &[West, NorthWest],
    &[West, SouthWest],
]);

static KING_TARGETS: SquareTable = build_table(&[
    &[North],
    &[South],
    &[East],
    &[West],
    &[NorthEast],
    &[NorthWest],
    &[SouthEast],
    &[SouthWest],
]);

static PAWN_ATTACKS: SidedSquareTable = SidedSquareTable {
    white: build_table(&[&[NorthEast], &[NorthWest]]),
    black: build_table(&[&[SouthEast], &[SouthWest]]),
};

/// Ray directions of a sliding piece, empty for every other kind.
pub fn sliding_directions(kind: PieceKind) -> &'static [Direction] {
    match kind {
        PieceKind::Rook => &ROOK_DIRECTIONS,
        PieceKind::Bishop => &BISHOP_DIRECTIONS,
        PieceKind::Queen => &QUEEN_DIRECTIONS,
        PieceKind::Pawn | PieceKind::Knight | PieceKind::King => &[],
    }
}

/// Fixed-offset targets of a knight or king, ignoring occupancy.
pub fn leaping_targets(kind: PieceKind, square: Square) -> BitBoard {
    match kind {
        PieceKind::Knight => KNIGHT_TARGETS.get(square),
        PieceKind::King => KING_TARGETS.get(square),
        _ => BitBoard::empty(),
    }
}

/// Walks one ray from `square`, stopping on (and including) the first
/// occupied square.
pub fn ray(square: Square, dir: Direction, occupancy: BitBoard) -> BitBoard {
    let mut targets = BitBoard::empty();
    let mut curr = BitBoard::from_square(square).shift(dir);

    while !curr.is_empty() {
        targets |= curr;
        if !(curr & occupancy).is_empty() {
            break;
        }
        curr = curr.shift(dir);
    }
    targets
}

/// Union of `ray` over `directions`. Blocking squares are included so the
/// caller decides whether they are captures.
pub fn sliding_targets(square: Square, directions: &[Direction], occupancy: BitBoard) -> BitBoard {
    directions
        .iter()
        .fold(BitBoard::empty(), |acc, &dir| acc | ray(square, dir, occupancy))
}

pub const fn pawn_forward(side: Side) -> Direction {
    match side {
        Side::White => North,
        Side::Black => South,
    }
}

/// Squares a pawn of `side` on `square` attacks, whether or not they are
/// occupied.
pub fn pawn_attacks(square: Square, side: Side) -> BitBoard {
    PAWN_ATTACKS.get(square, side)
}

/// Forward pushes: one square if empty, two from the starting row when both
/// squares are empty.
pub fn pawn_pushes(square: Square, side: Side, occupancy: BitBoard) -> BitBoard {
    let forward = pawn_forward(side);
    let single = BitBoard::from_square(square).shift(forward) & !occupancy;

    if single.is_empty() || square.row() != side.pawn_start_row() {
        return single;
    }
    single | (single.shift(forward) & !occupancy)
}
