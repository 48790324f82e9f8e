//! Error types for FEN parsing, position validation and move lookup.

use crate::color::Color;

/// Errors produced while parsing a FEN string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    /// Neither the four-field nor the six-field form.
    #[error("expected 4 or 6 FEN fields, found {found}")]
    WrongFieldCount { found: usize },
    #[error("expected 8 ranks in piece placement, found {found}")]
    WrongRankCount { found: usize },
    /// Rank index counts from the top of the diagram (0 = rank 8).
    #[error("rank {rank_index} describes {length} squares, expected 8")]
    BadRankLength { rank_index: usize, length: usize },
    #[error("invalid piece character: '{character}'")]
    InvalidPieceChar { character: char },
    #[error("invalid active color: \"{found}\"")]
    InvalidColor { found: String },
    #[error("invalid castling character: '{character}'")]
    InvalidCastlingChar { character: char },
    #[error("invalid en passant square: \"{found}\"")]
    InvalidEnPassant { found: String },
    #[error("invalid {field}: \"{found}\"")]
    InvalidMoveCounter { field: &'static str, found: String },
    #[error("{field} {value} is above the maximum of {max}")]
    CounterOutOfRange { field: &'static str, value: u32, max: u16 },
    #[error("invalid position: {source}")]
    InvalidPosition {
        #[from]
        source: PositionError,
    },
}

/// Structural problems with a fully parsed placement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("expected 1 king for {color}, found {count}")]
    InvalidKingCount { color: Color, count: usize },
    #[error("pawn on back rank at {square}")]
    PawnOnBackRank { square: String },
    /// More pieces of one kind than a piece list can hold.
    #[error("too many {piece} pieces: {count}")]
    TooManyPieces { piece: char, count: usize },
    #[error("side not to move ({color}) is in check")]
    OpponentInCheck { color: Color },
}

/// Errors produced when turning coordinate notation into a move.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveParseError {
    #[error("malformed move \"{text}\"")]
    Malformed { text: String },
    #[error("illegal move \"{text}\" in this position")]
    Illegal { text: String },
}

#[cfg(test)]
mod tests {
    use super::{FenError, MoveParseError, PositionError};
    use crate::color::Color;

    #[test]
    fn fen_error_display() {
        let err = FenError::WrongFieldCount { found: 3 };
        assert_eq!(err.to_string(), "expected 4 or 6 FEN fields, found 3");
    }

    #[test]
    fn position_error_converts() {
        let err: FenError = PositionError::InvalidKingCount { color: Color::Black, count: 0 }.into();
        assert_eq!(err.to_string(), "invalid position: expected 1 king for b, found 0");
    }

    #[test]
    fn counter_range_display() {
        let err = FenError::CounterOutOfRange { field: "halfmove clock", value: 65535, max: 150 };
        assert_eq!(err.to_string(), "halfmove clock 65535 is above the maximum of 150");
    }

    #[test]
    fn move_parse_error_display() {
        let err = MoveParseError::Illegal { text: "e2e5".to_string() };
        assert_eq!(err.to_string(), "illegal move \"e2e5\" in this position");
    }
}
