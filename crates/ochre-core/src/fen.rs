//! FEN parsing and serialization for [`Position`].

use std::fmt;
use std::str::FromStr;

use crate::castle_rights::CastleRights;
use crate::color::Color;
use crate::coords::{File, Rank};
use crate::error::FenError;
use crate::piece::Piece;
use crate::position::Position;
use crate::square::Square;

/// The standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn parse_placement(field: &str) -> Result<Vec<(Square, Piece)>, FenError> {
    let rows: Vec<&str> = field.split('/').collect();
    if rows.len() != 8 {
        return Err(FenError::WrongRankCount { found: rows.len() });
    }

    let mut placement = Vec::with_capacity(32);
    for (rank_index, (row, rank)) in rows.iter().zip(Rank::ALL.into_iter().rev()).enumerate() {
        let mut file_index = 0usize;
        for c in row.chars() {
            if let Some(run) = c.to_digit(10) {
                if !(1..=8).contains(&run) {
                    return Err(FenError::InvalidPieceChar { character: c });
                }
                file_index += run as usize;
                continue;
            }
            let piece = Piece::from_fen_char(c).ok_or(FenError::InvalidPieceChar { character: c })?;
            let file = File::ALL.get(file_index).copied().ok_or(FenError::BadRankLength {
                rank_index,
                length: file_index + 1,
            })?;
            placement.push((Square::new(rank, file), piece));
            file_index += 1;
        }
        if file_index != 8 {
            return Err(FenError::BadRankLength {
                rank_index,
                length: file_index,
            });
        }
    }
    Ok(placement)
}

/// Past this many reversible half-moves the game is over on the board.
const MAX_HALFMOVE_CLOCK: u16 = 150;
const MAX_FULLMOVE_NUMBER: u16 = 9999;

fn parse_counter(field: &'static str, text: &str, max: u16) -> Result<u16, FenError> {
    let value: u32 = text.parse().map_err(|_| FenError::InvalidMoveCounter {
        field,
        found: text.to_string(),
    })?;
    if value > u32::from(max) {
        return Err(FenError::CounterOutOfRange { field, value, max });
    }
    Ok(value as u16)
}

impl FromStr for Position {
    type Err = FenError;

    /// Accepts the full six-field form and the four-field form without move
    /// counters (which default to `0 1`).
    fn from_str(fen: &str) -> Result<Position, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 && fields.len() != 4 {
            return Err(FenError::WrongFieldCount { found: fields.len() });
        }

        let placement = parse_placement(fields[0])?;

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidColor {
                    found: other.to_string(),
                });
            }
        };

        let castling = CastleRights::from_fen(fields[2])?;

        let en_passant = match fields[3] {
            "-" => None,
            text => {
                // The target square sits behind a pawn the opponent just pushed.
                let expected_rank = match side_to_move {
                    Color::White => Rank::Rank6,
                    Color::Black => Rank::Rank3,
                };
                let sq = Square::from_algebraic(text)
                    .filter(|sq| sq.rank() == expected_rank)
                    .ok_or_else(|| FenError::InvalidEnPassant {
                        found: text.to_string(),
                    })?;
                Some(sq)
            }
        };

        let (halfmove_clock, fullmove_number) = if fields.len() == 6 {
            (
                parse_counter("halfmove clock", fields[4], MAX_HALFMOVE_CLOCK)?,
                parse_counter("fullmove number", fields[5], MAX_FULLMOVE_NUMBER)?,
            )
        } else {
            (0, 1)
        };

        Ok(Position::from_parts(
            &placement,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        )?)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rank) in Rank::ALL.into_iter().rev().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            let mut empty = 0;
            for file in File::ALL {
                match self.piece_at(Square::new(rank, file)) {
                    Some(piece) => {
                        if empty > 0 {
                            write!(f, "{empty}")?;
                            empty = 0;
                        }
                        write!(f, "{}", piece.fen_char())?;
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                write!(f, "{empty}")?;
            }
        }
        write!(f, " {} {} ", self.side_to_move(), self.castling())?;
        match self.en_passant() {
            Some(sq) => write!(f, "{sq}")?,
            None => write!(f, "-")?,
        }
        write!(f, " {} {}", self.halfmove_clock(), self.fullmove_number())
    }
}

#[cfg(test)]
mod tests {
    use super::STARTING_FEN;
    use crate::error::{FenError, PositionError};
    use crate::position::Position;

    #[test]
    fn roundtrip_reference_positions() {
        for fen in [
            STARTING_FEN,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq c6 0 2",
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        ] {
            let pos: Position = fen.parse().unwrap();
            assert_eq!(pos.to_string(), fen);
            assert!(pos.is_consistent());
        }
    }

    #[test]
    fn four_field_form_defaults_counters() {
        let pos: Position = "4k3/8/8/8/8/8/8/4K3 b - -".parse().unwrap();
        assert_eq!(pos.to_string(), "4k3/8/8/8/8/8/8/4K3 b - - 0 1");
    }

    #[test]
    fn rejects_malformed_fields() {
        let cases: [(&str, FenError); 6] = [
            ("8/8/8/8/8/8/8/8 w - - 0", FenError::WrongFieldCount { found: 5 }),
            ("8/8/8/8/8/8/8 w - - 0 1", FenError::WrongRankCount { found: 7 }),
            ("4k3/8/8/8/8/8/8/4K4 w - - 0 1", FenError::BadRankLength { rank_index: 7, length: 9 }),
            ("4k3/8/8/8/8/8/8/4X3 w - - 0 1", FenError::InvalidPieceChar { character: 'X' }),
            ("4k3/8/8/8/8/8/8/4K3 x - - 0 1", FenError::InvalidColor { found: "x".to_string() }),
            ("4k3/8/8/8/8/8/8/4K3 w - e4 0 1", FenError::InvalidEnPassant { found: "e4".to_string() }),
        ];
        for (fen, expected) in cases {
            assert_eq!(fen.parse::<Position>().unwrap_err(), expected, "{fen}");
        }
    }

    #[test]
    fn rejects_impossible_positions() {
        let no_king = "8/8/8/8/8/8/8/4K3 w - - 0 1".parse::<Position>().unwrap_err();
        assert!(matches!(
            no_king,
            FenError::InvalidPosition { source: PositionError::InvalidKingCount { count: 0, .. } }
        ));
        let pawn = "4k3/8/8/8/8/8/8/P3K3 w - - 0 1".parse::<Position>().unwrap_err();
        assert!(matches!(pawn, FenError::InvalidPosition { source: PositionError::PawnOnBackRank { .. } }));
        let checked = "4k3/8/8/8/8/8/8/4KR2 w - - 0 1".parse::<Position>();
        assert!(checked.is_ok());
        let capturable = "4k3/4R3/8/8/8/8/8/4K3 w - - 0 1".parse::<Position>().unwrap_err();
        assert!(matches!(capturable, FenError::InvalidPosition { source: PositionError::OpponentInCheck { .. } }));
    }

    #[test]
    fn bad_counters() {
        let err = "4k3/8/8/8/8/8/8/4K3 w - - x 1".parse::<Position>().unwrap_err();
        assert_eq!(
            err,
            FenError::InvalidMoveCounter {
                field: "halfmove clock",
                found: "x".to_string()
            }
        );
    }

    #[test]
    fn counters_out_of_range() {
        let err = "4k3/8/8/8/8/8/8/R3K3 w - - 65535 1".parse::<Position>().unwrap_err();
        assert_eq!(
            err,
            FenError::CounterOutOfRange {
                field: "halfmove clock",
                value: 65535,
                max: 150
            }
        );
        let err = "4k3/8/8/8/8/8/8/R3K3 w - - 0 70000".parse::<Position>().unwrap_err();
        assert!(matches!(err, FenError::CounterOutOfRange { field: "fullmove number", .. }));

        // The largest accepted counters still survive a move.
        let mut pos: Position = "4k3/8/8/8/8/8/8/R3K3 b - - 150 9999".parse().unwrap();
        let mv = pos.parse_uci_move("e8e7").unwrap();
        pos.make_move(mv);
        assert_eq!(pos.halfmove_clock(), 151);
        assert_eq!(pos.fullmove_number(), 10000);
        pos.unmake_move(mv);
        assert_eq!(pos.to_string(), "4k3/8/8/8/8/8/8/R3K3 b - - 150 9999");
    }
}
