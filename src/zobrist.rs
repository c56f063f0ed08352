use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bitboard::Square;
use crate::geometry;
use crate::legality;
use crate::piece::{Piece, PieceKind, Side};
use crate::position::{CastleSide, Position};

const RNG_SEED: u64 = 123456789;

struct RandomU64Generator {
    curr: u64,
}

impl RandomU64Generator {
    const fn new(seed: u64) -> Self {
        Self { curr: seed }
    }

    /// Standard Xorshift
    const fn generate(&mut self) -> u64 {
        let mut x = self.curr;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 5;
        self.curr = x;
        x
    }
}

struct ZobristRandomHashes {
    pieces: [u64; 64 * 12],
    black_to_move: u64,
    castling_rights: [u64; 4],
    en_passant_file: [u64; 8],
}

impl ZobristRandomHashes {
    const fn init() -> Self {
        let mut rng = RandomU64Generator::new(RNG_SEED);

        let mut pieces = [0; 64 * 12];
        let mut i = 0;
        while i < pieces.len() {
            pieces[i] = rng.generate();
            i += 1;
        }

        let black_to_move = rng.generate();

        let mut castling_rights = [0; 4];
        let mut i = 0;
        while i < castling_rights.len() {
            castling_rights[i] = rng.generate();
            i += 1;
        }

        let mut en_passant_file = [0; 8];
        let mut i = 0;
        while i < en_passant_file.len() {
            en_passant_file[i] = rng.generate();
            i += 1;
        }

        Self {
            pieces,
            black_to_move,
            castling_rights,
            en_passant_file,
        }
    }

    fn piece(&self, piece: Piece, square: Square) -> u64 {
        let table_idx = piece.kind as usize + piece.side as usize * 6;
        self.pieces[table_idx * 64 + square as usize]
    }
}

static ZOBRIST_RANDOM_HASHES: ZobristRandomHashes = ZobristRandomHashes::init();

/// Hash of everything that makes two positions "the same" for repetition:
/// placement, side to move, castling rights and a usable en passant capture.
/// Clocks are left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct ZobristHash(u64);

impl fmt::Display for ZobristHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl ZobristHash {
    pub fn calculate(position: &Position) -> ZobristHash {
        let keys = &ZOBRIST_RANDOM_HASHES;
        let mut hash = position
            .board
            .pieces()
            .fold(0, |hash, (square, piece)| hash ^ keys.piece(piece, square));

        let to_move = position.state.to_move;
        if to_move == Side::Black {
            hash ^= keys.black_to_move;
        }

        let rights = position.state.castling_rights;
        let castling = [
            (Side::White, CastleSide::KingSide),
            (Side::White, CastleSide::QueenSide),
            (Side::Black, CastleSide::KingSide),
            (Side::Black, CastleSide::QueenSide),
        ];
        for (idx, (side, castle_side)) in castling.into_iter().enumerate() {
            if rights.get(side, castle_side) {
                hash ^= keys.castling_rights[idx];
            }
        }

        // A target no pawn can legally capture on doesn't change which moves
        // exist, so it must not split otherwise identical positions.
        if let Some(target) = position.state.en_passant_target {
            if can_capture_en_passant(position, target) {
                hash ^= keys.en_passant_file[target.col() as usize];
            }
        }

        Self(hash)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

/// Whether a pawn of the side to move has a legal en passant capture onto
/// `target`. Pinned capturers don't count.
fn can_capture_en_passant(position: &Position, target: Square) -> bool {
    let to_move = position.state.to_move;
    let capturers = geometry::pawn_attacks(target, to_move.opposite())
        & position.board.pieces_of(PieceKind::Pawn, to_move);

    capturers.into_iter().any(|square| {
        legality::legal_piece_moves(position, square)
            .iter()
            .any(|mve| mve.dest == target && mve.flags.en_passant)
    })
}
