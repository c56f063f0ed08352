//! The game state machine.
//!
//! A [`Game`] owns the current [`Position`] and only ever changes it through
//! [`Game::apply_move`], which either rejects a move and leaves everything as
//! it was, or plays it and recomputes the [`GameStatus`].

use std::fmt;

use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use crate::attacks;
use crate::bitboard::Square;
use crate::board::Board;
use crate::legality;
use crate::move_gen;
use crate::piece::{PieceKind, Side};
use crate::position::{FenParseError, Move, Position, PositionError};
use crate::zobrist::ZobristHash;

/// Half moves without a capture or pawn move after which the game is drawn.
const FIFTY_MOVE_RULE_HALF_MOVES: u16 = 100;

const REPETITIONS_FOR_DRAW: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum DrawReason {
    FiftyMoveRule,
    InsufficientMaterial,
    ThreefoldRepetition,
}

impl fmt::Display for DrawReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            DrawReason::FiftyMoveRule => "fifty move rule",
            DrawReason::InsufficientMaterial => "insufficient material",
            DrawReason::ThreefoldRepetition => "threefold repetition",
        };
        write!(f, "{}", reason)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum GameStatus {
    InProgress,
    /// The side to move is in check but has a way out.
    Check,
    Checkmate {
        winner: Side,
    },
    Stalemate,
    DrawByRule(DrawReason),
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        match self {
            GameStatus::InProgress | GameStatus::Check => false,
            GameStatus::Checkmate { .. } | GameStatus::Stalemate | GameStatus::DrawByRule(_) => {
                true
            }
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::InProgress => write!(f, "in progress"),
            GameStatus::Check => write!(f, "check"),
            GameStatus::Checkmate { winner } => write!(f, "checkmate, {} wins", winner),
            GameStatus::Stalemate => write!(f, "stalemate"),
            GameStatus::DrawByRule(reason) => write!(f, "draw by {}", reason),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("square ({row}, {col}) is off the board")]
    OutOfBounds { row: i32, col: i32 },

    #[error("no piece at {0}")]
    EmptySource(Square),

    #[error("piece at {square} belongs to {side}, who is not to move")]
    WrongSideToMove { side: Side, square: Square },

    #[error("{0} is not a move that piece can make")]
    IllegalGeometry(Move),

    #[error("{0} would leave the mover's king in check")]
    ExposesOwnKing(Move),

    #[error("game is already over: {0}")]
    GameAlreadyOver(GameStatus),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    position: Position,
    status: GameStatus,
    /// Hash of every position reached, the current one last.
    history: Vec<ZobristHash>,
    moves: Vec<Move>,
}

impl Game {
    pub fn new() -> Self {
        let position = Position::start();
        Self {
            history: vec![position.zobrist_hash()],
            position,
            status: GameStatus::InProgress,
            moves: Vec::new(),
        }
    }

    /// Starts a game from an arbitrary position. The position may already be
    /// finished, in which case every move is rejected.
    pub fn from_position(position: Position) -> Result<Self, PositionError> {
        position.validate()?;

        let history = vec![position.zobrist_hash()];
        let status = classify(&position, &history);
        if status.is_terminal() {
            info!("game starts finished: {}", status);
        }

        Ok(Self {
            position,
            status,
            history,
            moves: Vec::new(),
        })
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenParseError> {
        let position = Position::from_fen(fen)?;
        Ok(Self::from_position(position)?)
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn board(&self) -> &Board {
        &self.position.board
    }

    pub fn side_to_move(&self) -> Side {
        self.position.state.to_move
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn history(&self) -> &[ZobristHash] {
        &self.history
    }

    pub fn moves_played(&self) -> &[Move] {
        &self.moves
    }

    /// Legal moves for the side to move, none once the game is over.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.status.is_terminal() {
            return Vec::new();
        }
        legality::legal_moves(&self.position, self.position.state.to_move)
    }

    /// Validates and plays `mve`. On error the game is left untouched.
    ///
    /// A pawn reaching the last row without a promotion choice promotes to a
    /// queen.
    pub fn apply_move(&mut self, mve: Move) -> Result<GameStatus, MoveError> {
        let (resolved, next) = match self.resolve(mve) {
            Ok(resolved) => resolved,
            Err(err) => {
                debug!("rejected {}: {}", mve, err);
                return Err(err);
            }
        };

        self.position = next;
        self.history.push(self.position.zobrist_hash());
        self.moves.push(resolved);
        self.status = classify(&self.position, &self.history);

        trace!("played {}, status {}", resolved, self.status);
        if self.status.is_terminal() {
            info!(
                "game over after {} half moves: {}",
                self.moves.len(),
                self.status
            );
        }

        Ok(self.status)
    }

    /// Coordinate entry point: rows and columns as on the board, (0, 0) being
    /// a1.
    pub fn apply_coords(
        &mut self,
        src_row: i32,
        src_col: i32,
        dest_row: i32,
        dest_col: i32,
        promotion: Option<PieceKind>,
    ) -> Result<GameStatus, MoveError> {
        let square = |row, col| {
            Square::from_coords(row, col).ok_or(MoveError::OutOfBounds { row, col })
        };

        let (src, dest) = match (square(src_row, src_col), square(dest_row, dest_col)) {
            (Ok(src), Ok(dest)) => (src, dest),
            (Err(err), _) | (_, Err(err)) => {
                debug!("rejected coordinates: {}", err);
                return Err(err);
            }
        };

        self.apply_move(Move {
            promotion,
            ..Move::new(src, dest)
        })
    }

    /// Matches `mve` against the generated moves of its piece, checking in
    /// the order callers observe errors. Returns the generated move and the
    /// position after it, which `apply_move` commits as is.
    fn resolve(&self, mve: Move) -> Result<(Move, Position), MoveError> {
        if self.status.is_terminal() {
            return Err(MoveError::GameAlreadyOver(self.status));
        }
        if mve.src == mve.dest {
            return Err(MoveError::IllegalGeometry(mve));
        }

        let piece = self
            .position
            .board
            .occupant_at(mve.src)
            .ok_or(MoveError::EmptySource(mve.src))?;
        if piece.side != self.position.state.to_move {
            return Err(MoveError::WrongSideToMove {
                side: piece.side,
                square: mve.src,
            });
        }

        let candidates = move_gen::piece_moves(&self.position, mve.src);
        let queen_default = Move {
            promotion: Some(PieceKind::Queen),
            ..mve
        };
        let resolved = candidates
            .iter()
            .find(|candidate| candidate.same_input(&mve))
            .or_else(|| match mve.promotion {
                None => candidates
                    .iter()
                    .find(|candidate| candidate.same_input(&queen_default)),
                Some(_) => None,
            })
            .copied()
            .ok_or(MoveError::IllegalGeometry(mve))?;

        let mut next = self.position.clone();
        next.make_move(resolved)
            .map_err(|_| MoveError::IllegalGeometry(mve))?;
        if attacks::is_in_check(piece.side, &next.board) {
            return Err(MoveError::ExposesOwnKing(resolved));
        }

        Ok((resolved, next))
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

/// Status of `position`, the last entry of `history`.
fn classify(position: &Position, history: &[ZobristHash]) -> GameStatus {
    let in_check = position.is_in_check();

    if !legality::has_legal_move(position) {
        return if in_check {
            GameStatus::Checkmate {
                winner: position.state.to_move.opposite(),
            }
        } else {
            GameStatus::Stalemate
        };
    }

    if position.state.half_move_clock >= FIFTY_MOVE_RULE_HALF_MOVES {
        return GameStatus::DrawByRule(DrawReason::FiftyMoveRule);
    }
    if is_insufficient_material(&position.board) {
        return GameStatus::DrawByRule(DrawReason::InsufficientMaterial);
    }
    if let Some(current) = history.last() {
        let repetitions = history.iter().filter(|&hash| hash == current).count();
        if repetitions >= REPETITIONS_FOR_DRAW {
            return GameStatus::DrawByRule(DrawReason::ThreefoldRepetition);
        }
    }

    if in_check {
        GameStatus::Check
    } else {
        GameStatus::InProgress
    }
}

/// Neither side can ever mate: bare kings, a single minor piece, or only
/// bishops that all stand on squares of one colour.
pub fn is_insufficient_material(board: &Board) -> bool {
    let mut knights = 0;
    let mut bishops = Vec::new();

    for (square, piece) in board.pieces() {
        match piece.kind {
            PieceKind::King => (),
            PieceKind::Knight => knights += 1,
            PieceKind::Bishop => bishops.push(square),
            PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
        }
    }

    match (knights, bishops.as_slice()) {
        (0, []) | (1, []) | (0, [_]) => true,
        (0, [first, rest @ ..]) => rest.iter().all(|sq| sq.is_light() == first.is_light()),
        _ => false,
    }
}
