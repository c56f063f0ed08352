use chess_rules::bitboard::Square::*;
use chess_rules::{Game, GameStatus, Move, PieceKind, Position, Side, Square};

use test_case::test_case;
use testresult::TestResult;

fn moves(squares: &[(Square, Square)]) -> Vec<Move> {
    squares
        .iter()
        .map(|&(src, dest)| Move::new(src, dest))
        .collect()
}

#[test_case(moves(&[
    (D2, D4),
    (D7, D5),
    (C2, C4),
    (D5, C4),
    (E2, E3),
    (B7, B5),
    (A2, A4),
    (C7, C6),
    (A4, B5),
    (C6, B5),
    (D1, F3),
    (B8, C6),
    (F3, C6),
    (C8, D7),
]), "r2qkbnr/p2bpppp/2Q5/1p6/2pP4/4P3/1P3PPP/RNB1KBNR w KQkq - 1 8" ; "normal")]
#[test_case(moves(&[
    (E2, E4),
    (E7, E5),
    (G1, F3),
    (B8, C6),
    (F1, B5),
    (A7, A6),
    (B5, A4),
    (F8, E7),
    (E1, G1),
]), "r1bqk1nr/1pppbppp/p1n5/4p3/B3P3/5N2/PPPP1PPP/RNBQ1RK1 b kq - 3 5" ; "castling")]
#[test_case(moves(&[
    (D2, D4),
    (E7, E5),
    (D4, D5),
    (E5, E4),
    (D5, D6),
    (E4, E3),
    (D6, C7),
    (E3, F2),
    (E1, F2),
    (D7, D5),
    (C7, D8),
]), "rnbQkbnr/pp3ppp/8/3p4/8/8/PPP1PKPP/RNBQ1BNR b kq - 0 6" ; "promotion")]
#[test_case(moves(&[
    (E2, E4),
    (A7, A6),
    (E4, E5),
    (D7, D5),
    (E5, D6),
]), "rnbqkbnr/1pp1pppp/p2P4/8/8/8/PPPP1PPP/RNBQKBNR b KQkq - 0 3" ; "en passant")]
fn test_play_game(moves: Vec<Move>, want_fen: &str) -> TestResult {
    let mut game = Game::new();
    for mve in moves {
        game.apply_move(mve)?;
    }

    assert_eq!(game.position(), &Position::from_fen(want_fen)?);
    assert_eq!(game.position().to_fen(), want_fen);
    Ok(())
}

#[test]
fn test_promotion_gives_check() -> TestResult {
    let mut game = Game::new();
    let status = moves(&[
        (D2, D4),
        (E7, E5),
        (D4, D5),
        (E5, E4),
        (D5, D6),
        (E4, E3),
        (D6, C7),
        (E3, F2),
        (E1, F2),
        (D7, D5),
    ])
    .into_iter()
    .try_fold(GameStatus::InProgress, |_, mve| game.apply_move(mve))?;
    assert_eq!(status, GameStatus::InProgress);

    let status = game.apply_move(Move::with_promotion(C7, D8, PieceKind::Queen))?;
    assert_eq!(status, GameStatus::Check);
    Ok(())
}

#[test]
fn test_scholars_mate() -> TestResult {
    let mut game = Game::new();
    for mve in ["e2e4", "e7e5", "f1c4", "b8c6", "d1h5", "g8f6", "h5f7"] {
        game.apply_move(mve.parse()?)?;
    }

    assert_eq!(game.status(), GameStatus::Checkmate { winner: Side::White });
    assert!(game.legal_moves().is_empty());
    assert_eq!(game.moves_played().len(), 7);
    Ok(())
}
