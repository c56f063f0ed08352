//! Legal move filtering.
//!
//! A pseudo-legal move is legal when, played on a copy of the position, it
//! does not leave the mover's king attacked. Every candidate is simulated
//! that way; nothing here reasons about pins or check evasions directly.

use crate::attacks;
use crate::bitboard::Square;
use crate::move_gen::{self, PieceMoves};
use crate::piece::Side;
use crate::position::{Move, Position};

/// Plays `mve` on a scratch copy and reports whether the mover's king is
/// safe afterwards. `mve` must come from the move generator.
pub fn is_legal(position: &Position, mve: &Move) -> bool {
    let side = position.state.to_move;
    let mut scratch = position.clone();

    match scratch.make_move(*mve) {
        Ok(_) => !attacks::is_in_check(side, &scratch.board),
        Err(_) => false,
    }
}

pub fn legal_moves(position: &Position, side: Side) -> Vec<Move> {
    move_gen::pseudo_legal_moves(position, side)
        .into_iter()
        .filter(|mve| is_legal(position, mve))
        .collect()
}

/// Legal moves of the piece on `square`. Pieces of the side not to move have
/// none.
pub fn legal_piece_moves(position: &Position, square: Square) -> PieceMoves {
    let mut moves = move_gen::piece_moves(position, square);
    moves.retain(|mve| is_legal(position, mve));
    moves
}

/// Whether the side to move can play anything at all. Stops at the first
/// legal move found.
pub fn has_legal_move(position: &Position) -> bool {
    move_gen::pseudo_legal_moves(position, position.state.to_move)
        .iter()
        .any(|mve| is_legal(position, mve))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::Square::*;
    use std::collections::HashSet;
    use test_case::test_case;
    use testresult::TestResult;

    fn square_pairs(moves: &[Move]) -> HashSet<(Square, Square)> {
        moves.iter().map(|mve| (mve.src, mve.dest)).collect()
    }

    #[test_case("8/8/8/8/k2Pp3/8/8/7K b - d3 0 1", 7 ; "en passant available")]
    #[test_case("8/8/4k3/8/8/4R3/8/7K b - - 0 1", 6 ; "king can't walk into check")]
    #[test_case("8/8/4k3/6N1/8/4R3/3b4/7K b - - 0 1", 5 ; "double check only king moves")]
    #[test_case("7k/8/7r/8/7Q/8/8/K7 b - - 0 1", 6 ; "rook pinned on file")]
    #[test_case("8/8/8/8/k2Pp2R/8/8/7K b - d3 0 1", 6 ; "en passant exposes king")]
    #[test_case("4k3/8/8/8/8/8/P6P/R3K2R w KQ - 0 1", 16 ; "castling")]
    #[test_case("4k3/8/8/8/8/3bb3/P6P/R3K2R w KQ - 0 1", 10 ; "castling through check")]
    #[test_case("4k3/8/8/8/8/8/r4PPK/r7 w - - 0 1", 6 ; "double pin")]
    #[test_case("r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4", 0 ; "scholars mate")]
    fn test_legal_move_count(fen: &str, want: usize) -> TestResult {
        let position = Position::from_fen(fen)?;
        let moves = legal_moves(&position, position.state.to_move);
        assert_eq!(moves.len(), want, "{:?}", moves);
        Ok(())
    }

    #[test_case("k7/6r1/8/8/8/R7/8/7K b - - 0 1", &[(A8, B8), (A8, B7), (G7, A7)] ; "block or step away from checker")]
    #[test_case("k7/1r6/8/3Q4/8/8/8/7K b - - 0 1", &[(A8, B8), (A8, A7)] ; "pinned diagonal")]
    #[test_case("k7/1b6/8/8/8/8/6R1/r6K w - - 0 1", &[(H1, H2)] ; "only king move")]
    #[test_case("7k/8/8/KPp4r/8/8/8/8 w - c6 0 1", &[(B5, B6), (A5, A6), (A5, A4), (A5, B6)] ; "en passant pinned on rank")]
    #[test_case("7k/8/8/8/8/7p/7P/7K w - - 0 1", &[(H1, G1)] ; "king boxed in")]
    #[test_case("7k/8/8/8/8/8/8/1K5q w - - 0 1", &[(B1, A2), (B1, B2), (B1, C2)] ; "king leaves rank")]
    #[test_case("rnb1kbnr/pppq1Q1p/8/1B2p3/4P3/2p5/PPPP1PPP/R1B1K1NR b KQkq - 0 1", &[(E8, F7), (E8, D8)] ; "take the checker or run")]
    #[test_case("4k3/8/8/8/1b6/8/P6P/R3K2R w KQ - 0 1", &[(E1, D1), (E1, F1), (E1, E2), (E1, F2)] ; "in check no castling")]
    fn test_legal_moves(fen: &str, want: &[(Square, Square)]) -> TestResult {
        let position = Position::from_fen(fen)?;
        let got = square_pairs(&legal_moves(&position, position.state.to_move));
        let want: HashSet<(Square, Square)> = want.iter().copied().collect();
        assert_eq!(got, want);
        Ok(())
    }

    #[test]
    fn test_legal_moves_wrong_side() {
        assert!(legal_moves(&Position::start(), Side::Black).is_empty());
        assert_eq!(legal_moves(&Position::start(), Side::White).len(), 20);
    }

    #[test]
    fn test_legal_piece_moves_pinned() -> TestResult {
        let position = Position::from_fen("7k/8/7r/8/7Q/8/8/K7 b - - 0 1")?;
        let moves = legal_piece_moves(&position, H6);
        assert_eq!(
            square_pairs(&moves),
            HashSet::from([(H6, H7), (H6, H5), (H6, H4)])
        );
        Ok(())
    }

    #[test]
    fn test_legal_piece_moves_not_to_move() {
        assert!(legal_piece_moves(&Position::start(), G8).is_empty());
    }

    #[test_case(Position::start(), true ; "start")]
    #[test_case(Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap(), false ; "stalemate")]
    #[test_case(Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3").unwrap(), false ; "fools mate")]
    fn test_has_legal_move(position: Position, want: bool) {
        assert_eq!(has_legal_move(&position), want);
    }
}
