//! Core chess types: 0x88 board representation, moves, move generation and
//! the incremental hashing the search relies on.

pub mod attacks;
mod castle_rights;
mod color;
mod coords;
mod error;
mod fen;
pub mod movegen;
mod moves;
pub mod perft;
mod piece;
mod piece_kind;
pub mod position;
mod square;
pub mod zobrist;

pub use castle_rights::{CastleRights, CastleSide};
pub use color::Color;
pub use coords::{File, Rank};
pub use error::{FenError, MoveParseError, PositionError};
pub use fen::STARTING_FEN;
pub use movegen::{MoveList, MAX_MOVES};
pub use moves::{Move, MoveKind, PromotionPiece};
pub use piece::Piece;
pub use piece_kind::PieceKind;
pub use position::{Position, PrettyPosition, SquareSet};
pub use square::Square;
