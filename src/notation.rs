use crate::attacks;
use crate::bitboard::Square;
use crate::legality;
use crate::piece::PieceKind;
use crate::position::{Move, Position};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("no piece at move src {0}")]
    NoPieceAtSrc(Square),

    #[error("not a legal move: {0}")]
    IllegalMove(Move),
}

/// Standard algebraic notation for `mve`, which must be legal in `position`.
/// A pawn move to the last row without a promotion choice is read as a
/// queen promotion.
pub fn move_to_san(position: &Position, mve: Move) -> Result<String, NotationError> {
    let side = position.state.to_move;
    let piece = position
        .board
        .occupant_at(mve.src)
        .ok_or(NotationError::NoPieceAtSrc(mve.src))?;

    let legal_moves = legality::legal_moves(position, side);
    let wanted = Move {
        promotion: mve.promotion.or(Some(PieceKind::Queen)),
        ..mve
    };
    let mve = legal_moves
        .iter()
        .find(|legal| legal.same_input(&mve))
        .or_else(|| legal_moves.iter().find(|legal| legal.same_input(&wanted)))
        .copied()
        .ok_or(NotationError::IllegalMove(mve))?;

    let mut res = String::with_capacity(7);

    if mve.flags.castle_king_side {
        res.push_str("O-O");
    } else if mve.flags.castle_queen_side {
        res.push_str("O-O-O");
    } else if piece.kind == PieceKind::Pawn {
        if mve.flags.capture {
            res.push(mve.src.file_char());
            res.push('x');
        }
        res.push_str(&mve.dest.to_string());
        if let Some(promotion) = mve.promotion {
            let prom_char: char = promotion.into();
            res.push('=');
            res.push(prom_char.to_ascii_uppercase());
        }
    } else {
        let piece_char: char = piece.kind.into();
        res.push(piece_char.to_ascii_uppercase());

        let rivals: Vec<Square> = legal_moves
            .iter()
            .filter(|other| other.dest == mve.dest && other.src != mve.src)
            .filter(|other| {
                position
                    .board
                    .occupant_at(other.src)
                    .is_some_and(|other_piece| other_piece.kind == piece.kind)
            })
            .map(|other| other.src)
            .collect();

        if !rivals.is_empty() {
            let file_unique = rivals.iter().all(|sq| sq.col() != mve.src.col());
            let rank_unique = rivals.iter().all(|sq| sq.row() != mve.src.row());

            if file_unique {
                res.push(mve.src.file_char());
            } else if rank_unique {
                res.push(mve.src.rank_char());
            } else {
                res.push(mve.src.file_char());
                res.push(mve.src.rank_char());
            }
        }

        if mve.flags.capture {
            res.push('x');
        }
        res.push_str(&mve.dest.to_string());
    }

    let mut after = position.clone();
    after
        .make_move(mve)
        .map_err(|_| NotationError::IllegalMove(mve))?;

    if attacks::is_in_check(after.state.to_move, &after.board) {
        if legality::has_legal_move(&after) {
            res.push('+');
        } else {
            res.push('#');
        }
    }

    Ok(res)
}
