pub mod attacks;
pub mod bitboard;
pub mod board;
pub mod game;
pub mod geometry;
pub mod legality;
pub mod move_gen;
pub mod notation;
pub mod perft;
pub mod piece;
pub mod position;
pub mod zobrist;

pub use bitboard::{BitBoard, Square};
pub use board::Board;
pub use game::{DrawReason, Game, GameStatus, MoveError};
pub use piece::{Piece, PieceKind, Side};
pub use position::{FenParseError, Move, MoveParseError, Position, START_FEN};
pub use zobrist::ZobristHash;
