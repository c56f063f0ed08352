use std::fmt;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::bitboard::Square::*;
use crate::bitboard::{BitBoard, Square};
use crate::piece::{Piece, PieceKind, Side};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub(crate) struct Sides {
    white: BitBoard,
    black: BitBoard,
}

impl Sides {
    fn new() -> Self {
        Self {
            white: BitBoard::empty(),
            black: BitBoard::empty(),
        }
    }

    fn from_squares(white: &[Square], black: &[Square]) -> Self {
        Self {
            white: BitBoard::from_squares(white),
            black: BitBoard::from_squares(black),
        }
    }

    pub(crate) fn get(&self, side: Side) -> BitBoard {
        match side {
            Side::White => self.white,
            Side::Black => self.black,
        }
    }

    fn get_mut(&mut self, side: Side) -> &mut BitBoard {
        match side {
            Side::White => &mut self.white,
            Side::Black => &mut self.black,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub(crate) struct Pieces {
    pawns: Sides,
    knights: Sides,
    bishops: Sides,
    rooks: Sides,
    queens: Sides,
    kings: Sides,
}

impl Pieces {
    fn new() -> Self {
        Self {
            pawns: Sides::new(),
            knights: Sides::new(),
            bishops: Sides::new(),
            rooks: Sides::new(),
            queens: Sides::new(),
            kings: Sides::new(),
        }
    }

    fn start() -> Self {
        Self {
            pawns: Sides::from_squares(
                &[A2, B2, C2, D2, E2, F2, G2, H2],
                &[A7, B7, C7, D7, E7, F7, G7, H7],
            ),
            knights: Sides::from_squares(&[B1, G1], &[B8, G8]),
            bishops: Sides::from_squares(&[C1, F1], &[C8, F8]),
            rooks: Sides::from_squares(&[A1, H1], &[A8, H8]),
            queens: Sides::from_squares(&[D1], &[D8]),
            kings: Sides::from_squares(&[E1], &[E8]),
        }
    }

    pub(crate) fn get(&self, kind: PieceKind) -> &Sides {
        match kind {
            PieceKind::Pawn => &self.pawns,
            PieceKind::Knight => &self.knights,
            PieceKind::Bishop => &self.bishops,
            PieceKind::Rook => &self.rooks,
            PieceKind::Queen => &self.queens,
            PieceKind::King => &self.kings,
        }
    }

    fn get_mut(&mut self, kind: PieceKind) -> &mut Sides {
        match kind {
            PieceKind::Pawn => &mut self.pawns,
            PieceKind::Knight => &mut self.knights,
            PieceKind::Bishop => &mut self.bishops,
            PieceKind::Rook => &mut self.rooks,
            PieceKind::Queen => &mut self.queens,
            PieceKind::King => &mut self.kings,
        }
    }
}

/// Square occupancy, stored as one bitboard per side plus one per
/// (kind, side). The two views are kept in sync by `place` and `clear`, the
/// only mutators.
#[derive(Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Board {
    sides: Sides,
    pieces: Pieces,
}

impl Board {
    pub fn empty() -> Self {
        Self {
            sides: Sides::new(),
            pieces: Pieces::new(),
        }
    }

    pub fn start() -> Self {
        let pieces = Pieces::start();
        let mut sides = Sides::new();
        for side in Side::iter() {
            for kind in PieceKind::iter() {
                *sides.get_mut(side) |= pieces.get(kind).get(side);
            }
        }
        Self { sides, pieces }
    }

    pub fn is_on_board(row: i32, col: i32) -> bool {
        Square::from_coords(row, col).is_some()
    }

    pub fn occupant_at(&self, square: Square) -> Option<Piece> {
        let side = if self.sides.white.is_square_set(square) {
            Side::White
        } else if self.sides.black.is_square_set(square) {
            Side::Black
        } else {
            return None;
        };

        PieceKind::iter()
            .find(|&kind| self.pieces.get(kind).get(side).is_square_set(square))
            .map(|kind| Piece::new(kind, side))
    }

    /// Puts `piece` on `square`, returning whatever stood there before.
    pub fn place(&mut self, square: Square, piece: Piece) -> Option<Piece> {
        let replaced = self.clear(square);
        self.sides.get_mut(piece.side).set_square(square);
        self.pieces
            .get_mut(piece.kind)
            .get_mut(piece.side)
            .set_square(square);
        replaced
    }

    pub fn clear(&mut self, square: Square) -> Option<Piece> {
        let piece = self.occupant_at(square)?;
        self.sides.get_mut(piece.side).clear_square(square);
        self.pieces
            .get_mut(piece.kind)
            .get_mut(piece.side)
            .clear_square(square);
        Some(piece)
    }

    pub fn occupancy(&self) -> BitBoard {
        self.sides.white | self.sides.black
    }

    pub fn side_occupancy(&self, side: Side) -> BitBoard {
        self.sides.get(side)
    }

    pub fn pieces_of(&self, kind: PieceKind, side: Side) -> BitBoard {
        self.pieces.get(kind).get(side)
    }

    /// `None` only on boards assembled by hand without a king for `side`.
    pub fn king_square(&self, side: Side) -> Option<Square> {
        self.pieces_of(PieceKind::King, side).lsb()
    }

    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.occupancy()
            .into_iter()
            .filter_map(|square| self.occupant_at(square).map(|piece| (square, piece)))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut board_str = String::with_capacity(64 + 7);
        Square::list_white_perspective()
            .into_iter()
            .enumerate()
            .for_each(|(idx, square)| {
                let ch = self
                    .occupant_at(square)
                    .map(Piece::to_fen_char)
                    .unwrap_or('.');

                board_str.push(ch);
                if (idx + 1) % 8 == 0 && idx != 63 {
                    board_str.push('\n');
                }
            });
        write!(f, "{}", board_str)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
