use arrayvec::ArrayVec;
use strum::IntoEnumIterator;

use crate::attacks;
use crate::bitboard::{BitBoard, Square};
use crate::geometry;
use crate::piece::{Piece, PieceKind, Side};
use crate::position::{CastleSide, Move, MoveFlags, Position};

/// A queen in the middle of an empty board has 27 targets and a pawn about to
/// promote at most 12 moves, so one piece never has more than this.
const MAX_PIECE_MOVES: usize = 32;

pub type PieceMoves = ArrayVec<Move, MAX_PIECE_MOVES>;

/// Moves of the piece on `square` that obey its movement geometry, whether
/// or not they leave its own king in check. Empty if the square is empty.
///
/// The piece may belong to either side. En passant is only offered to the
/// side to move, since the target square describes the last move played.
pub fn piece_moves(position: &Position, square: Square) -> PieceMoves {
    let mut moves = PieceMoves::new();
    let Some(piece) = position.board.occupant_at(square) else {
        return moves;
    };

    match piece.kind {
        PieceKind::Pawn => gen_pawn_moves(position, square, piece.side, &mut moves),
        PieceKind::Knight => {
            let targets = geometry::leaping_targets(piece.kind, square);
            push_targets(position, square, piece.side, targets, &mut moves);
        }
        PieceKind::King => {
            let targets = geometry::leaping_targets(piece.kind, square);
            push_targets(position, square, piece.side, targets, &mut moves);
            gen_castling_moves(position, square, piece.side, &mut moves);
        }
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
            let targets = geometry::sliding_targets(
                square,
                geometry::sliding_directions(piece.kind),
                position.board.occupancy(),
            );
            push_targets(position, square, piece.side, targets, &mut moves);
        }
    }

    moves
}

/// Pseudo-legal moves of every piece of `side`. Empty when it is not
/// `side`'s turn.
pub fn pseudo_legal_moves(position: &Position, side: Side) -> Vec<Move> {
    if side != position.state.to_move {
        return Vec::new();
    }

    let mut moves = Vec::with_capacity(64);
    for kind in PieceKind::iter() {
        for square in position.board.pieces_of(kind, side) {
            moves.extend(piece_moves(position, square));
        }
    }
    moves
}

/// Adds a move for every target not holding a friendly piece.
fn push_targets(
    position: &Position,
    src: Square,
    side: Side,
    targets: BitBoard,
    moves: &mut PieceMoves,
) {
    let targets = targets & !position.board.side_occupancy(side);
    let enemies = position.board.side_occupancy(side.opposite());

    for dest in targets {
        let flags = MoveFlags {
            capture: enemies.is_square_set(dest),
            ..MoveFlags::default()
        };
        moves.push(Move::new(src, dest).flagged(flags));
    }
}

fn gen_pawn_moves(position: &Position, src: Square, side: Side, moves: &mut PieceMoves) {
    let board = &position.board;
    let enemies = board.side_occupancy(side.opposite());

    for dest in geometry::pawn_pushes(src, side, board.occupancy()) {
        let flags = MoveFlags {
            double_pawn_push: src.row().abs_diff(dest.row()) == 2,
            ..MoveFlags::default()
        };
        push_pawn_move(src, dest, side, flags, moves);
    }

    let attacks = geometry::pawn_attacks(src, side);
    for dest in attacks & enemies {
        let flags = MoveFlags {
            capture: true,
            ..MoveFlags::default()
        };
        push_pawn_move(src, dest, side, flags, moves);
    }

    if side != position.state.to_move {
        return;
    }
    if let Some(target) = position.state.en_passant_target {
        let (d_row, _) = geometry::pawn_forward(side).offset();
        let victim = target
            .offset(-d_row, 0)
            .and_then(|sq| board.occupant_at(sq));

        if attacks.is_square_set(target)
            && board.occupant_at(target).is_none()
            && victim == Some(Piece::new(PieceKind::Pawn, side.opposite()))
        {
            let flags = MoveFlags {
                capture: true,
                en_passant: true,
                ..MoveFlags::default()
            };
            moves.push(Move::new(src, target).flagged(flags));
        }
    }
}

/// Reaching the last row fans out into one move per promotion choice.
fn push_pawn_move(src: Square, dest: Square, side: Side, flags: MoveFlags, moves: &mut PieceMoves) {
    if dest.row() == side.promotion_row() {
        for kind in PieceKind::PROMOTIONS {
            moves.push(Move::with_promotion(src, dest, kind).flagged(flags));
        }
    } else {
        moves.push(Move::new(src, dest).flagged(flags));
    }
}

fn gen_castling_moves(position: &Position, king: Square, side: Side, moves: &mut PieceMoves) {
    let board = &position.board;
    if king != CastleSide::king_src(side) || attacks::is_attacked(king, side.opposite(), board) {
        return;
    }

    let rook = Piece::new(PieceKind::Rook, side);
    for castle_side in [CastleSide::KingSide, CastleSide::QueenSide] {
        if !position.state.castling_rights.get(side, castle_side)
            || board.occupant_at(castle_side.rook_src(side)) != Some(rook)
            || !(castle_side.between(side) & board.occupancy()).is_empty()
        {
            continue;
        }

        let path_attacked = castle_side
            .king_path(side)
            .into_iter()
            .any(|sq| attacks::is_attacked(sq, side.opposite(), board));
        if path_attacked {
            continue;
        }

        let flags = MoveFlags {
            castle_king_side: castle_side == CastleSide::KingSide,
            castle_queen_side: castle_side == CastleSide::QueenSide,
            ..MoveFlags::default()
        };
        moves.push(Move::new(king, castle_side.king_dest(side)).flagged(flags));
    }
}
