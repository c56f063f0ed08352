use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::attacks;
use crate::bitboard::Square::*;
use crate::bitboard::{BitBoard, Square, SquareParseError};
use crate::board::Board;
use crate::geometry;
use crate::piece::{Piece, PieceKind, PieceParseError, Side};
use crate::zobrist::ZobristHash;

mod fen;

pub use fen::{FenParseError, START_FEN};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PositionError {
    #[error("no piece at {0}")]
    MoveNoPiece(Square),

    #[error("to_move is the other side, for move: {0} {1} -> {2}")]
    MoveNotToMove(Side, Square, Square),

    #[error("{0} has {1} kings, want exactly 1")]
    KingCount(Side, u32),

    #[error("{0} is in check but it is not their move")]
    OpponentInCheck(Side),

    #[error("pawn on back rank at {0}")]
    PawnOnBackRank(Square),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("move: want 4 or 5 chars like e2e4 or e7e8q, got {0:?}")]
    Length(String),

    #[error(transparent)]
    Square(#[from] SquareParseError),

    #[error(transparent)]
    Promotion(#[from] PieceParseError),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct MoveFlags {
    pub capture: bool,
    pub en_passant: bool,
    pub castle_king_side: bool,
    pub castle_queen_side: bool,
    pub double_pawn_push: bool,
}

/// A move as proposed by a caller or produced by the generator. Callers only
/// need to fill in the squares and the promotion; the generator sets `flags`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Move {
    pub src: Square,
    pub dest: Square,
    pub promotion: Option<PieceKind>,
    pub flags: MoveFlags,
}

impl Move {
    pub fn new(src: Square, dest: Square) -> Move {
        Self {
            src,
            dest,
            promotion: None,
            flags: MoveFlags::default(),
        }
    }

    pub fn with_promotion(src: Square, dest: Square, promotion: PieceKind) -> Self {
        Self {
            src,
            dest,
            promotion: Some(promotion),
            flags: MoveFlags::default(),
        }
    }

    pub(crate) fn flagged(mut self, flags: MoveFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Whether both moves describe the same input, ignoring generator flags.
    pub fn same_input(&self, other: &Move) -> bool {
        self.src == other.src && self.dest == other.dest && self.promotion == other.promotion
    }

    pub fn is_castle(&self) -> bool {
        self.flags.castle_king_side || self.flags.castle_queen_side
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} -> {:?}", self.src, self.dest)?;
        if let Some(promotion) = self.promotion {
            write!(f, " ({})", promotion)?;
        }
        Ok(())
    }
}

/// Coordinate notation, e.g. `e2e4` or `e7e8q`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(promotion) = self.promotion {
            let promotion_ch: char = promotion.into();
            write!(f, "{}{}{}", self.src, self.dest, promotion_ch)
        } else {
            write!(f, "{}{}", self.src, self.dest)
        }
    }
}

impl FromStr for Move {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(MoveParseError::Length(s.to_string()));
        }

        let src = Square::from_str(&s[0..2])?;
        let dest = Square::from_str(&s[2..4])?;

        match s[4..].chars().next() {
            Some(ch) => Ok(Move::with_promotion(src, dest, PieceKind::try_from(ch)?)),
            None => Ok(Move::new(src, dest)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum CastleSide {
    KingSide,
    QueenSide,
}

impl CastleSide {
    pub const fn rook_src(self, side: Side) -> Square {
        match (self, side) {
            (CastleSide::KingSide, Side::White) => H1,
            (CastleSide::QueenSide, Side::White) => A1,
            (CastleSide::KingSide, Side::Black) => H8,
            (CastleSide::QueenSide, Side::Black) => A8,
        }
    }

    pub const fn rook_dest(self, side: Side) -> Square {
        match (self, side) {
            (CastleSide::KingSide, Side::White) => F1,
            (CastleSide::QueenSide, Side::White) => D1,
            (CastleSide::KingSide, Side::Black) => F8,
            (CastleSide::QueenSide, Side::Black) => D8,
        }
    }

    pub const fn king_src(side: Side) -> Square {
        match side {
            Side::White => E1,
            Side::Black => E8,
        }
    }

    pub const fn king_dest(self, side: Side) -> Square {
        match (self, side) {
            (CastleSide::KingSide, Side::White) => G1,
            (CastleSide::QueenSide, Side::White) => C1,
            (CastleSide::KingSide, Side::Black) => G8,
            (CastleSide::QueenSide, Side::Black) => C8,
        }
    }

    /// Squares that must be empty between king and rook.
    pub fn between(self, side: Side) -> BitBoard {
        match (self, side) {
            (CastleSide::KingSide, Side::White) => BitBoard::from_squares(&[F1, G1]),
            (CastleSide::QueenSide, Side::White) => BitBoard::from_squares(&[B1, C1, D1]),
            (CastleSide::KingSide, Side::Black) => BitBoard::from_squares(&[F8, G8]),
            (CastleSide::QueenSide, Side::Black) => BitBoard::from_squares(&[B8, C8, D8]),
        }
    }

    /// Squares the king crosses or lands on, none of which may be attacked.
    pub fn king_path(self, side: Side) -> BitBoard {
        match (self, side) {
            (CastleSide::KingSide, Side::White) => BitBoard::from_squares(&[F1, G1]),
            (CastleSide::QueenSide, Side::White) => BitBoard::from_squares(&[D1, C1]),
            (CastleSide::KingSide, Side::Black) => BitBoard::from_squares(&[F8, G8]),
            (CastleSide::QueenSide, Side::Black) => BitBoard::from_squares(&[D8, C8]),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Deserialize, Serialize)]
pub struct CastlingRights {
    pub white_king_side: bool,
    pub white_queen_side: bool,
    pub black_king_side: bool,
    pub black_queen_side: bool,
}

impl CastlingRights {
    pub fn start() -> Self {
        Self::new(true, true, true, true)
    }

    pub fn none() -> Self {
        Self::new(false, false, false, false)
    }

    pub fn new(
        white_king_side: bool,
        white_queen_side: bool,
        black_king_side: bool,
        black_queen_side: bool,
    ) -> Self {
        Self {
            white_king_side,
            white_queen_side,
            black_king_side,
            black_queen_side,
        }
    }

    pub fn get(&self, side: Side, castle_side: CastleSide) -> bool {
        match (side, castle_side) {
            (Side::White, CastleSide::KingSide) => self.white_king_side,
            (Side::White, CastleSide::QueenSide) => self.white_queen_side,
            (Side::Black, CastleSide::KingSide) => self.black_king_side,
            (Side::Black, CastleSide::QueenSide) => self.black_queen_side,
        }
    }

    fn clear_side(&mut self, side: Side) {
        match side {
            Side::White => {
                self.white_king_side = false;
                self.white_queen_side = false;
            }
            Side::Black => {
                self.black_king_side = false;
                self.black_queen_side = false;
            }
        }
    }

    /// Anything leaving or landing on a rook's home square ends that right
    /// for good: either the rook moved or it was captured.
    fn clear_rook_square(&mut self, square: Square) {
        match square {
            A1 => self.white_queen_side = false,
            H1 => self.white_king_side = false,
            A8 => self.black_queen_side = false,
            H8 => self.black_king_side = false,
            _ => (),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct State {
    pub to_move: Side,
    pub half_move_clock: u16,
    pub en_passant_target: Option<Square>,
    pub castling_rights: CastlingRights,
    pub full_move_counter: u16,
}

impl State {
    pub fn start() -> Self {
        Self {
            to_move: Side::White,
            half_move_clock: 0,
            en_passant_target: None,
            castling_rights: CastlingRights::start(),
            full_move_counter: 1,
        }
    }
}

/// A board together with everything else needed to decide which moves are
/// available: side to move, castling rights, en passant target and clocks.
#[derive(Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Position {
    pub board: Board,
    pub state: State,
}

impl Position {
    pub fn start() -> Self {
        Self {
            board: Board::start(),
            state: State::start(),
        }
    }

    pub fn new(board: Board, state: State) -> Self {
        Self { board, state }
    }

    pub fn to_move(&self) -> Side {
        self.state.to_move
    }

    pub fn is_in_check(&self) -> bool {
        attacks::is_in_check(self.state.to_move, &self.board)
    }

    pub fn zobrist_hash(&self) -> ZobristHash {
        ZobristHash::calculate(self)
    }

    /// Checks the invariants every playable position has: one king per side,
    /// the side that just moved not left in check, no pawns on a back rank.
    pub fn validate(&self) -> Result<(), PositionError> {
        for side in [Side::White, Side::Black] {
            let kings = self.board.pieces_of(PieceKind::King, side).num_squares_set();
            if kings != 1 {
                return Err(PositionError::KingCount(side, kings));
            }

            let pawns = self.board.pieces_of(PieceKind::Pawn, side);
            if let Some(square) = pawns.into_iter().find(|sq| sq.row() == 0 || sq.row() == 7) {
                return Err(PositionError::PawnOnBackRank(square));
            }
        }

        let waiting = self.state.to_move.opposite();
        if attacks::is_in_check(waiting, &self.board) {
            return Err(PositionError::OpponentInCheck(waiting));
        }

        Ok(())
    }

    /// Applies `mve` without checking that it is legal, returning the captured
    /// piece. Castling, en passant and double pushes are recognised from the
    /// piece and squares, so a bare `Move::new` is enough. A pawn reaching the
    /// last row without a promotion choice becomes a queen.
    pub fn make_move(&mut self, mve: Move) -> Result<Option<Piece>, PositionError> {
        let piece = self
            .board
            .occupant_at(mve.src)
            .ok_or(PositionError::MoveNoPiece(mve.src))?;
        let side = piece.side;

        if side != self.state.to_move {
            return Err(PositionError::MoveNotToMove(side, mve.src, mve.dest));
        }

        let is_pawn = piece.kind == PieceKind::Pawn;
        let is_en_passant =
            is_pawn && mve.src.col() != mve.dest.col() && self.board.occupant_at(mve.dest).is_none();

        let captured = if is_en_passant {
            // The captured pawn sits beside the moving pawn, behind the target
            mve.dest
                .offset(captured_row_delta(side), 0)
                .and_then(|sq| self.board.clear(sq))
        } else {
            self.board.clear(mve.dest)
        };

        self.board.clear(mve.src);
        let placed = if is_pawn && mve.dest.row() == side.promotion_row() {
            Piece::new(mve.promotion.unwrap_or(PieceKind::Queen), side)
        } else {
            piece
        };
        self.board.place(mve.dest, placed);

        if piece.kind == PieceKind::King && mve.src.col().abs_diff(mve.dest.col()) == 2 {
            let castle_side = if mve.dest.col() > mve.src.col() {
                CastleSide::KingSide
            } else {
                CastleSide::QueenSide
            };
            if let Some(rook) = self.board.clear(castle_side.rook_src(side)) {
                self.board.place(castle_side.rook_dest(side), rook);
            }
        }

        if piece.kind == PieceKind::King {
            self.state.castling_rights.clear_side(side);
        }
        self.state.castling_rights.clear_rook_square(mve.src);
        self.state.castling_rights.clear_rook_square(mve.dest);

        self.state.en_passant_target = if is_pawn && mve.src.row().abs_diff(mve.dest.row()) == 2 {
            let (d_row, _) = geometry::pawn_forward(side).offset();
            mve.src.offset(d_row, 0)
        } else {
            None
        };

        if is_pawn || captured.is_some() {
            self.state.half_move_clock = 0;
        } else {
            self.state.half_move_clock = self.state.half_move_clock.saturating_add(1);
        }

        if side == Side::Black {
            self.state.full_move_counter = self.state.full_move_counter.saturating_add(1);
        }
        self.state.to_move = side.opposite();

        debug_assert!(
            self.board.king_square(Side::White).is_some()
                && self.board.king_square(Side::Black).is_some(),
            "position somehow lost a king\n{:?}",
            self
        );

        Ok(captured)
    }
}

/// Row offset from the en passant target to the pawn that gets captured.
const fn captured_row_delta(capturing_side: Side) -> i32 {
    match capturing_side {
        Side::White => -1,
        Side::Black => 1,
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.board, self.to_fen())
    }
}
