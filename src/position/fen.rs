use std::str::FromStr;

use crate::bitboard::Square;
use crate::board::Board;
use crate::piece::{Piece, Side};
use crate::position::{CastlingRights, Position, PositionError, State};

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FenParseError {
    #[error("num fields: want 4 or 6 got {0}")]
    NumFields(usize),

    #[error("piece placement: got {0}, err at {1}")]
    PiecePlacement(String, usize),

    #[error("side to move: want 'w'|'b' got {0}")]
    SideToMove(String),

    #[error("castling rights given: got {0}, err at idx {1}")]
    CastlingRights(String, usize),

    #[error("en passant target: got {0}")]
    EnPassantTarget(String),

    #[error("halfmove clock: want 0 <= x < 65_536 got {0}")]
    HalfmoveClock(String),

    #[error("full move counter: want 1 <= x < 65_536 got {0}")]
    FullMoveCounter(String),

    #[error("invalid position: {0}")]
    InvalidPosition(#[from] PositionError),
}

impl Position {
    /// Parses a FEN record. The two clock fields may be left off, in which
    /// case they default to `0 1`.
    pub fn from_fen(fen: &str) -> Result<Self, FenParseError> {
        let fields = fen.split_whitespace().collect::<Vec<&str>>();

        if fields.len() != 6 && fields.len() != 4 {
            Err(FenParseError::NumFields(fields.len()))?
        }

        let board = board_from_fen(fields[0])?;

        let to_move = match fields[1] {
            "w" => Side::White,
            "b" => Side::Black,
            _ => Err(FenParseError::SideToMove(String::from(fields[1])))?,
        };

        let half_move_clock = match fields.get(4) {
            Some(field) => field
                .parse::<u16>()
                .map_err(|_| FenParseError::HalfmoveClock(field.to_string()))?,
            None => 0,
        };

        let full_move_counter = match fields.get(5) {
            Some(field) => field
                .parse::<u16>()
                .ok()
                .filter(|&counter| counter >= 1)
                .ok_or_else(|| FenParseError::FullMoveCounter(field.to_string()))?,
            None => 1,
        };

        let state = State {
            castling_rights: castling_rights_from_fen(fields[2])?,
            en_passant_target: en_passant_target_from_fen(fields[3], to_move)?,
            half_move_clock,
            to_move,
            full_move_counter,
        };

        let position = Position { board, state };
        position.validate()?;

        Ok(position)
    }

    pub fn to_fen(&self) -> String {
        let mut pieces = String::with_capacity(64);
        let mut curr_empty_count = 0;

        for (idx, sq) in Square::list_white_perspective().into_iter().enumerate() {
            if let Some(piece) = self.board.occupant_at(sq) {
                if curr_empty_count != 0 {
                    pieces += &curr_empty_count.to_string();
                    curr_empty_count = 0;
                }
                pieces.push(piece.to_fen_char());
            } else {
                curr_empty_count += 1;
            }
            if (idx + 1) % 8 == 0 {
                if curr_empty_count != 0 {
                    pieces += &curr_empty_count.to_string();
                    curr_empty_count = 0;
                }
                if idx != 63 {
                    pieces += "/";
                }
            }
        }

        let side_to_move_char = if self.state.to_move == Side::White {
            'w'
        } else {
            'b'
        };

        let mut castling_rights = String::with_capacity(4);

        if self.state.castling_rights.white_king_side {
            castling_rights += "K";
        }
        if self.state.castling_rights.white_queen_side {
            castling_rights += "Q";
        }
        if self.state.castling_rights.black_king_side {
            castling_rights += "k";
        }
        if self.state.castling_rights.black_queen_side {
            castling_rights += "q";
        }

        if castling_rights.is_empty() {
            castling_rights += "-";
        }

        let en_passant = if let Some(ep_target) = self.state.en_passant_target {
            ep_target.to_string()
        } else {
            "-".to_string()
        };

        format!(
            "{} {} {} {} {} {}",
            pieces,
            side_to_move_char,
            castling_rights,
            en_passant,
            self.state.half_move_clock,
            self.state.full_move_counter
        )
    }
}

impl FromStr for Position {
    type Err = FenParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}

fn castling_rights_from_fen(castling_rights_str: &str) -> Result<CastlingRights, FenParseError> {
    if castling_rights_str == "-" {
        return Ok(CastlingRights::none());
    }

    let mut rights = CastlingRights::none();

    for (idx, ch) in castling_rights_str.chars().enumerate() {
        let flag = match ch {
            'K' => &mut rights.white_king_side,
            'Q' => &mut rights.white_queen_side,
            'k' => &mut rights.black_king_side,
            'q' => &mut rights.black_queen_side,
            _ => {
                return Err(FenParseError::CastlingRights(
                    castling_rights_str.to_string(),
                    idx,
                ))
            }
        };
        if *flag {
            return Err(FenParseError::CastlingRights(
                castling_rights_str.to_string(),
                idx,
            ));
        }
        *flag = true;
    }

    Ok(rights)
}

/// The target has to sit on the row a double push skips over: row 5 when
/// White is to move (Black just pushed), row 2 otherwise.
fn en_passant_target_from_fen(
    en_passant_target_str: &str,
    to_move: Side,
) -> Result<Option<Square>, FenParseError> {
    if en_passant_target_str == "-" {
        return Ok(None);
    }

    let square = Square::from_str(en_passant_target_str)
        .map_err(|_| FenParseError::EnPassantTarget(en_passant_target_str.to_string()))?;

    let want_row = match to_move {
        Side::White => 5,
        Side::Black => 2,
    };
    if square.row() != want_row {
        return Err(FenParseError::EnPassantTarget(
            en_passant_target_str.to_string(),
        ));
    }

    Ok(Some(square))
}

fn board_from_fen(pieces_str: &str) -> Result<Board, FenParseError> {
    let placement_err = |idx: usize| FenParseError::PiecePlacement(pieces_str.to_string(), idx);

    let mut board = Board::empty();
    let mut row: i32 = 7;
    let mut col: i32 = 0;

    for (ch_idx, ch) in pieces_str.chars().enumerate() {
        if ch == '/' {
            if col != 8 || row == 0 {
                return Err(placement_err(ch_idx));
            }
            row -= 1;
            col = 0;
        } else if let Some(digit) = ch.to_digit(10) {
            if digit == 0 || digit > 8 {
                return Err(placement_err(ch_idx));
            }
            col += digit as i32;
            if col > 8 {
                return Err(placement_err(ch_idx));
            }
        } else {
            let piece = Piece::from_fen_char(ch).map_err(|_| placement_err(ch_idx))?;
            let square = Square::from_coords(row, col).ok_or_else(|| placement_err(ch_idx))?;
            board.place(square, piece);
            col += 1;
        }
    }

    if row != 0 || col != 8 {
        return Err(placement_err(pieces_str.len()));
    }

    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::Square::*;
    use crate::piece::PieceKind;
    use test_case::test_case;
    use testresult::TestResult;

    #[test_case("-", CastlingRights::new(false, false, false, false) ; "empty")]
    #[test_case("KQkq", CastlingRights::new(true, true, true, true)  ; "KQkq")]
    #[test_case("Qk", CastlingRights::new(false, true, true, false)  ; "Qk")]
    #[test_case("K", CastlingRights::new(true, false, false, false)  ; "K")]
    fn test_castling_rights_from_fen(inp: &str, want: CastlingRights) -> TestResult {
        let got = castling_rights_from_fen(inp)?;
        assert_eq!(got, want);
        Ok(())
    }

    #[test_case("abc")]
    #[test_case("KK" ; "duplicate")]
    #[test_case("KQ-" ; "dash after rights")]
    fn test_castling_rights_from_fen_invalid(inp: &str) {
        let got = castling_rights_from_fen(inp);
        assert!(matches!(got, Err(FenParseError::CastlingRights(_, _))));
    }

    #[test_case("-", Side::White, None      ; "empty")]
    #[test_case("e3", Side::Black, Some(E3) ; "e3")]
    #[test_case("c6", Side::White, Some(C6) ; "c6")]
    fn test_en_passant_target_from_fen(inp: &str, to_move: Side, want: Option<Square>) -> TestResult {
        let got = en_passant_target_from_fen(inp, to_move)?;
        assert_eq!(got, want);
        Ok(())
    }

    #[test_case("abc", Side::White)]
    #[test_case("e3", Side::White ; "wrong row for side")]
    #[test_case("e4", Side::Black ; "not a skipped square")]
    fn test_en_passant_target_from_fen_invalid(inp: &str, to_move: Side) {
        let got = en_passant_target_from_fen(inp, to_move);
        assert!(matches!(got, Err(FenParseError::EnPassantTarget(_))));
    }

    // 1R2k3/2Q5/8/8/7p/8/5P1P/6K1 b - - 7 42
    #[test]
    fn test_board_from_fen() -> TestResult {
        let board = board_from_fen("1R2k3/2Q5/8/8/7p/8/5P1P/6K1")?;

        let want = [
            (B8, PieceKind::Rook, Side::White),
            (C7, PieceKind::Queen, Side::White),
            (F2, PieceKind::Pawn, Side::White),
            (H2, PieceKind::Pawn, Side::White),
            (G1, PieceKind::King, Side::White),
            (E8, PieceKind::King, Side::Black),
            (H4, PieceKind::Pawn, Side::Black),
        ];
        assert_eq!(board.pieces().count(), want.len());
        for (square, kind, side) in want {
            assert_eq!(board.occupant_at(square), Some(Piece::new(kind, side)));
        }
        Ok(())
    }

    #[test_case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP" ; "seven rows")]
    #[test_case("rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR" ; "nine")]
    #[test_case("rnbqkbnr/ppppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR" ; "long row")]
    #[test_case("rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR" ; "short row")]
    #[test_case("rnbqkbnr/pppxpppp/8/8/8/8/PPPPPPPP/RNBQKBNR" ; "bad char")]
    fn test_board_from_fen_invalid(inp: &str) {
        assert!(matches!(
            board_from_fen(inp),
            Err(FenParseError::PiecePlacement(_, _))
        ));
    }

    #[test_case(Position::start(), START_FEN.to_string() ; "starting position")]
    fn test_to_fen_position(position: Position, want: String) {
        let got = position.to_fen();
        assert_eq!(got, want);
    }

    #[test_case(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1" ; "kiwipete"
    )]
    #[test_case(
        "8/8/8/4k3/8/3P4/5K2/r7 w - - 1 1" ; "random"
    )]
    #[test_case(
        "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3" ; "en passant target"
    )]
    #[test_case(
        "1R2k3/2Q5/8/8/7p/8/5P1P/6K1 b - - 7 42" ; "clocks"
    )]
    fn test_to_fen_string(fen: &str) -> TestResult {
        let pos = Position::from_fen(fen)?;
        let got = pos.to_fen();
        assert_eq!(got, fen);
        Ok(())
    }

    #[test]
    fn test_from_fen_four_fields() -> TestResult {
        let pos = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -")?;
        assert_eq!(pos, Position::start());
        Ok(())
    }

    #[test_case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0", FenParseError::NumFields(5) ; "num fields")]
    #[test_case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1", FenParseError::SideToMove("x".to_string()) ; "side")]
    #[test_case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - a 1", FenParseError::HalfmoveClock("a".to_string()) ; "half move")]
    #[test_case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 0", FenParseError::FullMoveCounter("0".to_string()) ; "full move")]
    #[test_case("rnbqqbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", FenParseError::InvalidPosition(PositionError::KingCount(Side::Black, 0)) ; "no black king")]
    #[test_case("k6R/8/8/8/8/8/8/K7 w - - 0 1", FenParseError::InvalidPosition(PositionError::OpponentInCheck(Side::Black)) ; "opponent in check")]
    fn test_from_fen_invalid(fen: &str, want: FenParseError) {
        assert_eq!(Position::from_fen(fen), Err(want));
    }
}
