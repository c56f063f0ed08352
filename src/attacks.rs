//! Square attack queries.
//!
//! Attacks are found in reverse: to learn which pieces of `by_side` hit a
//! square, put each piece kind on that square and see which same-kind enemy
//! pieces it would reach.

use crate::bitboard::{BitBoard, Square};
use crate::board::Board;
use crate::geometry;
use crate::piece::{PieceKind, Side};

/// Every piece of `by_side` that attacks `square`. The square's own occupant
/// is irrelevant, so this also answers "would a king be safe here".
pub fn attackers(square: Square, by_side: Side, board: &Board) -> BitBoard {
    let occupancy = board.occupancy();
    let pieces = |kind| board.pieces_of(kind, by_side);

    let pawns = geometry::pawn_attacks(square, by_side.opposite()) & pieces(PieceKind::Pawn);
    let knights =
        geometry::leaping_targets(PieceKind::Knight, square) & pieces(PieceKind::Knight);
    let kings = geometry::leaping_targets(PieceKind::King, square) & pieces(PieceKind::King);

    let queens = pieces(PieceKind::Queen);
    let orthogonal = geometry::sliding_targets(square, &geometry::ROOK_DIRECTIONS, occupancy)
        & (pieces(PieceKind::Rook) | queens);
    let diagonal = geometry::sliding_targets(square, &geometry::BISHOP_DIRECTIONS, occupancy)
        & (pieces(PieceKind::Bishop) | queens);

    pawns | knights | kings | orthogonal | diagonal
}

pub fn is_attacked(square: Square, by_side: Side, board: &Board) -> bool {
    !attackers(square, by_side, board).is_empty()
}

/// Enemy pieces giving check to `side`'s king. Empty if `side` has no king.
pub fn checkers(side: Side, board: &Board) -> BitBoard {
    match board.king_square(side) {
        Some(king) => attackers(king, side.opposite(), board),
        None => BitBoard::empty(),
    }
}

pub fn is_in_check(side: Side, board: &Board) -> bool {
    !checkers(side, board).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::Square::*;
    use crate::position::Position;
    use test_case::test_case;
    use testresult::TestResult;

    #[test_case("4k3/8/8/8/8/8/8/4K2R b - - 0 1", Side::White, E1, BitBoard::empty() ; "no checkers")]
    #[test_case("4k3/8/8/8/8/8/8/R3K3 b - - 0 1", Side::White, E1, BitBoard::empty() ; "rook on other rank")]
    #[test_case("4k3/8/8/8/8/8/8/4K2R w - - 0 1", Side::Black, E8, BitBoard::empty() ; "black no checkers")]
    #[test_case("4k3/8/8/8/8/8/3p4/4K3 w - - 0 1", Side::White, E1, BitBoard::from_square(D2) ; "pawn")]
    #[test_case("4k3/8/8/8/8/3n4/8/4K3 w - - 0 1", Side::White, E1, BitBoard::from_square(D3) ; "knight")]
    #[test_case("4k3/8/8/8/8/8/8/r3K3 w - - 0 1", Side::White, E1, BitBoard::from_square(A1) ; "rook")]
    #[test_case("4k3/8/8/b7/8/8/8/4K3 w - - 0 1", Side::White, E1, BitBoard::from_square(A5) ; "bishop")]
    #[test_case("4k3/8/8/8/4q3/8/8/4K3 w - - 0 1", Side::White, E1, BitBoard::from_square(E4) ; "queen")]
    #[test_case("4k3/8/8/8/4r3/3n4/8/4K3 w - - 0 1", Side::White, E1, BitBoard::from_squares(&[E4, D3]) ; "double check")]
    fn test_checkers(fen: &str, side: Side, king: Square, want: BitBoard) -> TestResult {
        let position = Position::from_fen(fen)?;
        assert_eq!(position.board.king_square(side), Some(king));
        assert_eq!(checkers(side, &position.board), want);
        Ok(())
    }

    #[test]
    fn test_blocked_slider_does_not_attack() -> TestResult {
        let position = Position::from_fen("4k3/8/8/8/4r3/8/4P3/4K3 w - - 0 1")?;
        assert!(!is_in_check(Side::White, &position.board));
        assert!(is_attacked(E3, Side::Black, &position.board));
        assert!(!is_attacked(E1, Side::Black, &position.board));
        Ok(())
    }

    #[test]
    fn test_pawns_attack_diagonally_only() -> TestResult {
        let position = Position::start();
        assert!(is_attacked(D3, Side::White, &position.board));
        assert!(is_attacked(F6, Side::Black, &position.board));
        assert!(!is_attacked(E4, Side::White, &position.board));
        assert!(!is_attacked(E5, Side::Black, &position.board));
        Ok(())
    }

    #[test]
    fn test_attackers_of_empty_square() -> TestResult {
        let position = Position::start();
        // f3 is covered by the g1 knight and the e2 and g2 pawns
        assert_eq!(
            attackers(F3, Side::White, &position.board),
            BitBoard::from_squares(&[G1, E2, G2])
        );
        Ok(())
    }

    #[test]
    fn test_is_in_check_without_king() {
        assert!(!is_in_check(Side::White, &Board::empty()));
    }
}
