//! Polyglot opening book.
//!
//! A book file is a sequence of 16-byte big-endian entries sorted by key:
//! position key (`u64`), move (`u16`), weight (`u16`) and a learn field
//! (`u32`) that is ignored. Keys use the Polyglot Zobrist scheme, which
//! differs from the engine's own keys.

use std::path::Path;

use rand::Rng;
use rand::seq::SliceRandom;
use shakmaty::fen::Fen;
use shakmaty::zobrist::{Zobrist64, ZobristHash};
use shakmaty::{CastlingMode, Chess, EnPassantMode};
use tracing::warn;

use ochre_core::{Move, Position};

use crate::error::UciError;

const ENTRY_BYTES: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    key: u64,
    raw_move: u16,
    weight: u16,
}

/// An opening book loaded into memory.
#[derive(Debug, Clone)]
pub struct Book {
    entries: Vec<Entry>,
}

impl Book {
    /// Load a book file.
    pub fn open(path: impl AsRef<Path>) -> Result<Book, UciError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| UciError::BookRead {
            path: path.display().to_string(),
            source,
        })?;
        Book::from_bytes(&bytes)
    }

    /// Parse the raw contents of a book file.
    pub fn from_bytes(bytes: &[u8]) -> Result<Book, UciError> {
        if bytes.len() % ENTRY_BYTES != 0 {
            return Err(UciError::BookFormat { len: bytes.len() });
        }
        let mut entries: Vec<Entry> = bytes
            .chunks_exact(ENTRY_BYTES)
            .map(|chunk| {
                let mut key = [0u8; 8];
                key.copy_from_slice(&chunk[..8]);
                Entry {
                    key: u64::from_be_bytes(key),
                    raw_move: u16::from_be_bytes([chunk[8], chunk[9]]),
                    weight: u16::from_be_bytes([chunk[10], chunk[11]]),
                }
            })
            .collect();
        // Lookups need the file's key order; a stable sort keeps it for
        // books that already have it.
        entries.sort_by_key(|e| e.key);
        Ok(Book { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entries_for(&self, key: u64) -> &[Entry] {
        let start = self.entries.partition_point(|e| e.key < key);
        let end = start + self.entries[start..].partition_point(|e| e.key == key);
        &self.entries[start..end]
    }

    /// Every book move for `pos` with its weight, in file order. Entries
    /// that are not legal in `pos` are skipped.
    pub fn moves(&self, pos: &mut Position) -> Vec<(Move, u16)> {
        let Some(key) = polyglot_key(pos) else {
            return Vec::new();
        };
        self.entries_for(key)
            .iter()
            .filter_map(|entry| {
                let text = decode_move(entry.raw_move, pos);
                match pos.parse_uci_move(&text) {
                    Ok(mv) => Some((mv, entry.weight)),
                    Err(e) => {
                        warn!(error = %e, "skipping unusable book entry");
                        None
                    }
                }
            })
            .collect()
    }

    /// Pick a book move for `pos` at random, in proportion to the weights.
    pub fn pick(&self, pos: &mut Position, rng: &mut impl Rng) -> Option<Move> {
        let moves = self.moves(pos);
        match moves.choose_weighted(rng, |&(_, weight)| u32::from(weight)) {
            Ok(&(mv, _)) => Some(mv),
            // All weights zero.
            Err(_) => moves.first().map(|&(mv, _)| mv),
        }
    }
}

/// The Polyglot key of `pos`.
pub fn polyglot_key(pos: &Position) -> Option<u64> {
    let fen: Fen = match pos.to_string().parse() {
        Ok(fen) => fen,
        Err(e) => {
            warn!(error = %e, "position has no Polyglot key");
            return None;
        }
    };
    let chess: Chess = match fen.into_position(CastlingMode::Standard) {
        Ok(chess) => chess,
        Err(e) => {
            warn!(error = %e, "position has no Polyglot key");
            return None;
        }
    };
    let hash: Zobrist64 = chess.zobrist_hash(EnPassantMode::Legal);
    Some(hash.0)
}

/// Turn a Polyglot move into coordinate notation. Castling is stored as
/// the king taking its own rook.
fn decode_move(raw: u16, pos: &Position) -> String {
    let square = |file: u16, rank: u16| {
        let mut s = String::with_capacity(2);
        s.push(char::from(b'a' + file as u8));
        s.push(char::from(b'1' + rank as u8));
        s
    };
    let to = square(raw & 7, (raw >> 3) & 7);
    let from = square((raw >> 6) & 7, (raw >> 9) & 7);
    let promotion = match (raw >> 12) & 7 {
        1 => "n",
        2 => "b",
        3 => "r",
        4 => "q",
        _ => "",
    };

    let king_on_e = |name: &str| {
        ochre_core::Square::from_algebraic(name)
            .and_then(|sq| pos.piece_at(sq))
            .is_some_and(|p| p.kind() == ochre_core::PieceKind::King)
    };
    let to = match (from.as_str(), to.as_str()) {
        ("e1", "h1") | ("e8", "h8") if king_on_e(&from) => format!("g{}", &to[1..]),
        ("e1", "a1") | ("e8", "a8") if king_on_e(&from) => format!("c{}", &to[1..]),
        _ => to,
    };
    format!("{from}{to}{promotion}")
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn encode(from: &str, to: &str) -> u16 {
        let sq = |s: &str| {
            let b = s.as_bytes();
            (u16::from(b[0] - b'a'), u16::from(b[1] - b'1'))
        };
        let (ff, fr) = sq(from);
        let (tf, tr) = sq(to);
        (fr << 9) | (ff << 6) | (tr << 3) | tf
    }

    fn entry_bytes(key: u64, raw_move: u16, weight: u16) -> Vec<u8> {
        let mut bytes = key.to_be_bytes().to_vec();
        bytes.extend_from_slice(&raw_move.to_be_bytes());
        bytes.extend_from_slice(&weight.to_be_bytes());
        bytes.extend_from_slice(&0u32.to_be_bytes());
        bytes
    }

    #[test]
    fn reference_keys() {
        let mut pos = Position::startpos();
        assert_eq!(polyglot_key(&pos), Some(0x463b_9618_1691_fc9c));

        let e4 = pos.parse_uci_move("e2e4").unwrap();
        pos.make_move(e4);
        assert_eq!(polyglot_key(&pos), Some(0x823c_9b50_fd11_4196));

        let d5 = pos.parse_uci_move("d7d5").unwrap();
        pos.make_move(d5);
        assert_eq!(polyglot_key(&pos), Some(0x0756_b944_61c5_0fb0));
    }

    #[test]
    fn rejects_truncated_files() {
        let mut bytes = entry_bytes(1, 0, 1);
        bytes.pop();
        assert!(matches!(Book::from_bytes(&bytes), Err(UciError::BookFormat { len: 15 })));
    }

    #[test]
    fn finds_moves_for_the_position() {
        let mut pos = Position::startpos();
        let key = polyglot_key(&pos).unwrap();
        let mut bytes = entry_bytes(key - 1, encode("a2", "a3"), 5);
        bytes.extend(entry_bytes(key, encode("e2", "e4"), 10));
        bytes.extend(entry_bytes(key, encode("d2", "d4"), 0));
        // Not playable from the start position.
        bytes.extend(entry_bytes(key, encode("e2", "e5"), 3));
        bytes.extend(entry_bytes(key + 1, encode("h2", "h3"), 5));
        let book = Book::from_bytes(&bytes).unwrap();
        assert_eq!(book.len(), 5);

        let moves: Vec<String> = book.moves(&mut pos).iter().map(|(mv, _)| mv.to_uci()).collect();
        assert_eq!(moves, ["e2e4", "d2d4"]);

        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..20 {
            // Zero weight is never picked.
            assert_eq!(book.pick(&mut pos, &mut rng).unwrap().to_uci(), "e2e4");
        }
    }

    #[test]
    fn missing_position_gives_nothing() {
        let book = Book::from_bytes(&entry_bytes(42, encode("e2", "e4"), 1)).unwrap();
        let mut pos = Position::startpos();
        assert!(book.moves(&mut pos).is_empty());
        assert!(book.pick(&mut pos, &mut SmallRng::seed_from_u64(1)).is_none());
    }

    #[test]
    fn castling_is_stored_as_king_takes_rook() {
        let pos: Position = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();
        assert_eq!(decode_move(encode("e1", "h1"), &pos), "e1g1");
        assert_eq!(decode_move(encode("e1", "a1"), &pos), "e1c1");
        assert_eq!(decode_move(encode("e8", "h8"), &pos), "e8g8");
        let promotion = encode("b7", "b8") | (4 << 12);
        assert_eq!(decode_move(promotion, &pos), "b7b8q");
    }
}
