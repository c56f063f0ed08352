use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PieceParseError {
    #[error("char -> piece: got {0}")]
    FromChar(char),
}

#[derive(Debug, PartialEq, Eq, EnumIter, Clone, Copy, Display, Hash, Deserialize, Serialize)]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub const fn opposite(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Row of the side's king and rooks at the start of the game.
    pub const fn back_row(self) -> u8 {
        match self {
            Side::White => 0,
            Side::Black => 7,
        }
    }

    pub const fn pawn_start_row(self) -> u8 {
        match self {
            Side::White => 1,
            Side::Black => 6,
        }
    }

    pub const fn promotion_row(self) -> u8 {
        match self {
            Side::White => 7,
            Side::Black => 0,
        }
    }
}

#[derive(Debug, PartialEq, Eq, EnumIter, Clone, Copy, Display, Hash, Deserialize, Serialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
    ];

    pub fn is_slider(self) -> bool {
        match self {
            PieceKind::Pawn | PieceKind::Knight | PieceKind::King => false,
            PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => true,
        }
    }

    pub fn is_promotion_choice(self) -> bool {
        Self::PROMOTIONS.contains(&self)
    }
}

impl From<PieceKind> for char {
    fn from(kind: PieceKind) -> char {
        match kind {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }
}

impl TryFrom<char> for PieceKind {
    type Error = PieceParseError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase() {
            'p' => Ok(PieceKind::Pawn),
            'n' => Ok(PieceKind::Knight),
            'b' => Ok(PieceKind::Bishop),
            'r' => Ok(PieceKind::Rook),
            'q' => Ok(PieceKind::Queen),
            'k' => Ok(PieceKind::King),
            _ => Err(PieceParseError::FromChar(value)),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Deserialize, Serialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub side: Side,
}

impl Piece {
    pub const fn new(kind: PieceKind, side: Side) -> Self {
        Self { kind, side }
    }

    /// FEN letter: uppercase for White, lowercase for Black.
    pub fn to_fen_char(self) -> char {
        let ch: char = self.kind.into();
        match self.side {
            Side::White => ch.to_ascii_uppercase(),
            Side::Black => ch,
        }
    }

    pub fn from_fen_char(ch: char) -> Result<Self, PieceParseError> {
        let kind = PieceKind::try_from(ch)?;
        let side = if ch.is_ascii_uppercase() {
            Side::White
        } else {
            Side::Black
        };
        Ok(Piece::new(kind, side))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;
    use test_case::test_case;
    use testresult::TestResult;

    #[test_case('K', Piece::new(PieceKind::King, Side::White))]
    #[test_case('q', Piece::new(PieceKind::Queen, Side::Black))]
    #[test_case('N', Piece::new(PieceKind::Knight, Side::White))]
    #[test_case('p', Piece::new(PieceKind::Pawn, Side::Black))]
    fn test_fen_char(ch: char, want: Piece) -> TestResult {
        let got = Piece::from_fen_char(ch)?;
        assert_eq!(got, want);
        assert_eq!(got.to_fen_char(), ch);
        Ok(())
    }

    #[test]
    fn test_fen_char_invalid() {
        assert_eq!(
            Piece::from_fen_char('x'),
            Err(PieceParseError::FromChar('x'))
        );
    }

    #[test]
    fn test_opposite() {
        for side in Side::iter() {
            assert_ne!(side, side.opposite());
            assert_eq!(side, side.opposite().opposite());
        }
    }
}
