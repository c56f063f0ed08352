use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{EnumIter, FromRepr};

/// A square of the board. The discriminant is `row * 8 + col`, where row 0 is
/// White's back rank and column 0 is the a-file.
#[allow(dead_code)]
#[rustfmt::skip]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, FromRepr, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("square: want [a-h][1-8], got {0:?}")]
pub struct SquareParseError(pub String);

impl Square {
    /// Returns `None` when either coordinate is outside of `0..8`.
    pub const fn from_coords(row: i32, col: i32) -> Option<Square> {
        if row < 0 || row > 7 || col < 0 || col > 7 {
            return None;
        }
        Square::from_repr((row * 8 + col) as u8)
    }

    pub const fn row(self) -> u8 {
        self as u8 / 8
    }

    pub const fn col(self) -> u8 {
        self as u8 % 8
    }

    pub(crate) const fn from_u8(idx: u8) -> Square {
        match Square::from_repr(idx) {
            Some(sq) => sq,
            None => panic!("square out of bounds"),
        }
    }

    pub(crate) const fn offset(self, d_row: i32, d_col: i32) -> Option<Square> {
        Square::from_coords(self.row() as i32 + d_row, self.col() as i32 + d_col)
    }

    /// a1 is a dark square.
    pub const fn is_light(self) -> bool {
        (self.row() + self.col()) % 2 == 1
    }

    pub const fn file_char(self) -> char {
        (b'a' + self.col()) as char
    }

    pub const fn rank_char(self) -> char {
        (b'1' + self.row()) as char
    }

    #[rustfmt::skip]
    pub const fn list_white_perspective() -> [Square; 64] {
        [
            Square::A8, Square::B8, Square::C8, Square::D8, Square::E8, Square::F8, Square::G8, Square::H8,
            Square::A7, Square::B7, Square::C7, Square::D7, Square::E7, Square::F7, Square::G7, Square::H7,
            Square::A6, Square::B6, Square::C6, Square::D6, Square::E6, Square::F6, Square::G6, Square::H6,
            Square::A5, Square::B5, Square::C5, Square::D5, Square::E5, Square::F5, Square::G5, Square::H5,
            Square::A4, Square::B4, Square::C4, Square::D4, Square::E4, Square::F4, Square::G4, Square::H4,
            Square::A3, Square::B3, Square::C3, Square::D3, Square::E3, Square::F3, Square::G3, Square::H3,
            Square::A2, Square::B2, Square::C2, Square::D2, Square::E2, Square::F2, Square::G2, Square::H2,
            Square::A1, Square::B1, Square::C1, Square::D1, Square::E1, Square::F1, Square::G1, Square::H1,
        ]
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(SquareParseError(s.to_string()));
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(SquareParseError(s.to_string()));
        }
        Square::from_coords((rank - b'1') as i32, (file - b'a') as i32)
            .ok_or_else(|| SquareParseError(s.to_string()))
    }
}

/// Compass directions from White's point of view: north increases the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    /// (row delta, column delta)
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (1, 0),
            Direction::South => (-1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
            Direction::NorthEast => (1, 1),
            Direction::NorthWest => (1, -1),
            Direction::SouthEast => (-1, 1),
            Direction::SouthWest => (-1, -1),
        }
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Hash, Default, Deserialize, Serialize)]
pub struct BitBoard(u64);

impl BitBoard {
    pub const fn empty() -> Self {
        BitBoard(0)
    }

    pub const fn from_square(square: Square) -> Self {
        BitBoard(1 << (square as u8))
    }

    pub fn from_squares(squares: &[Square]) -> Self {
        BitBoard(squares.iter().fold(0, |board, sq| board | 1 << (*sq as u8)))
    }

    pub fn set_square(&mut self, square: Square) {
        self.0 |= 1 << square as u64
    }

    pub fn clear_square(&mut self, square: Square) {
        self.0 &= !(1 << square as u64)
    }

    pub const fn is_square_set(&self, square: Square) -> bool {
        self.0 & 1 << (square as u64) != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn num_squares_set(self) -> u32 {
        self.0.count_ones()
    }

    /// Moves every set square one step in `dir`, dropping squares that would
    /// leave the board instead of wrapping to the other edge.
    pub const fn shift(self, dir: Direction) -> BitBoard {
        const NOT_A_FILE: u64 = 0xFEFEFEFEFEFEFEFE;
        const NOT_H_FILE: u64 = 0x7F7F7F7F7F7F7F7F;
        let bb = self.0;
        BitBoard(match dir {
            Direction::North => bb << 8,
            Direction::South => bb >> 8,
            Direction::East => (bb & NOT_H_FILE) << 1,
            Direction::West => (bb & NOT_A_FILE) >> 1,
            Direction::NorthEast => (bb & NOT_H_FILE) << 9,
            Direction::NorthWest => (bb & NOT_A_FILE) << 7,
            Direction::SouthEast => (bb & NOT_H_FILE) >> 7,
            Direction::SouthWest => (bb & NOT_A_FILE) >> 9,
        })
    }

    pub fn lsb(self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }
        Square::from_repr(self.0.trailing_zeros() as u8)
    }

    pub fn pop_lsb(&mut self) -> Option<Square> {
        let lsb = self.lsb()?;
        self.0 &= self.0 - 1;
        Some(lsb)
    }

    pub(crate) const fn const_bit_or(self, other: BitBoard) -> BitBoard {
        BitBoard(self.0 | other.0)
    }
}

pub struct BitBoardIter(BitBoard);

impl Iterator for BitBoardIter {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.pop_lsb()
    }
}

impl IntoIterator for BitBoard {
    type Item = Square;
    type IntoIter = BitBoardIter;

    fn into_iter(self) -> Self::IntoIter {
        BitBoardIter(self)
    }
}

impl BitOr for BitBoard {
    type Output = BitBoard;

    fn bitor(self, other: BitBoard) -> BitBoard {
        BitBoard(self.0 | other.0)
    }
}

impl BitOrAssign for BitBoard {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0
    }
}

impl BitAnd for BitBoard {
    type Output = BitBoard;

    fn bitand(self, other: BitBoard) -> BitBoard {
        BitBoard(self.0 & other.0)
    }
}

impl BitAndAssign for BitBoard {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0
    }
}

impl Not for BitBoard {
    type Output = BitBoard;

    fn not(self) -> Self::Output {
        BitBoard(!self.0)
    }
}

impl fmt::Debug for BitBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut board_str = String::with_capacity(64 + 7);

        for (idx, square) in Square::list_white_perspective().into_iter().enumerate() {
            let ch = if self.is_square_set(square) { 'X' } else { '.' };
            board_str.push(ch);
            if (idx + 1) % 8 == 0 && idx != 63 {
                board_str.push('\n');
            }
        }

        write!(f, "{}", board_str)
    }
}
