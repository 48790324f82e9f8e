//! UCI protocol errors.

use ochre_core::{FenError, MoveParseError};

/// Errors that can occur during UCI protocol handling.
#[derive(Debug, thiserror::Error)]
pub enum UciError {
    /// The `position` command is missing `startpos` or `fen` keyword.
    #[error("malformed position command: missing startpos or fen keyword")]
    MalformedPosition,

    /// Failed to parse a FEN string.
    #[error("invalid FEN \"{fen}\": {source}")]
    InvalidFen {
        /// The FEN string that failed to parse.
        fen: String,
        source: FenError,
    },

    /// A move in the `position` command is not legal where it is played.
    #[error("illegal move {uci_move}: {source}")]
    IllegalMove {
        uci_move: String,
        source: MoveParseError,
    },

    /// A `go` parameter was given without its value.
    #[error("missing value for go parameter {param}")]
    MissingGoValue { param: String },

    /// A `go` parameter value could not be parsed.
    #[error("invalid value for go parameter {param}: {value}")]
    InvalidGoValue { param: String, value: String },

    /// `setoption` without `name`.
    #[error("malformed setoption command")]
    MalformedOption,

    #[error("unknown option: {name}")]
    UnknownOption { name: String },

    #[error("invalid value for option {name}: {value}")]
    InvalidOptionValue { name: String, value: String },

    /// `perft` or `divide` without a usable depth.
    #[error("invalid perft depth: {value}")]
    InvalidPerftDepth { value: String },

    /// The opening book file could not be read.
    #[error("cannot read opening book {path}: {source}")]
    BookRead {
        path: String,
        source: std::io::Error,
    },

    /// The opening book is not made of whole 16-byte entries.
    #[error("opening book length {len} is not a multiple of 16")]
    BookFormat { len: usize },

    /// An I/O error occurred while reading from stdin.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
