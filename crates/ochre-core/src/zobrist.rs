//! Zobrist keys, generated at compile time.
//!
//! Every feature of a position (a piece on a square, the side to move, a
//! castling configuration, an en-passant file) owns one pseudo-random
//! 64-bit key. A position key is the XOR of the keys of its features, so a
//! move updates it by XOR-ing out what changed and XOR-ing in what appeared.

use crate::castle_rights::CastleRights;
use crate::piece::Piece;
use crate::square::Square;

const SEED: u64 = 0x6f63_6872_655f_3838;

struct Keys {
    piece_square: [[u64; 64]; Piece::COUNT],
    black_to_move: u64,
    castling: [u64; 16],
    en_passant_file: [u64; 8],
}

/// Xorshift64 step. Returns the next state, which is also the output.
const fn xorshift64(mut state: u64) -> u64 {
    state ^= state << 13;
    state ^= state >> 7;
    state ^= state << 17;
    state
}

static KEYS: Keys = {
    let mut keys = Keys {
        piece_square: [[0; 64]; Piece::COUNT],
        black_to_move: 0,
        castling: [0; 16],
        en_passant_file: [0; 8],
    };
    let mut state = SEED;
    let mut piece = 0;
    while piece < Piece::COUNT {
        let mut sq = 0;
        while sq < 64 {
            state = xorshift64(state);
            keys.piece_square[piece][sq] = state;
            sq += 1;
        }
        piece += 1;
    }
    state = xorshift64(state);
    keys.black_to_move = state;
    let mut i = 0;
    while i < 16 {
        state = xorshift64(state);
        keys.castling[i] = state;
        i += 1;
    }
    let mut file = 0;
    while file < 8 {
        state = xorshift64(state);
        keys.en_passant_file[file] = state;
        file += 1;
    }
    keys
};

#[inline]
pub fn piece_square(piece: Piece, sq: Square) -> u64 {
    KEYS.piece_square[piece.index()][sq.index64()]
}

/// XOR-ed in while Black is to move.
#[inline]
pub fn black_to_move() -> u64 {
    KEYS.black_to_move
}

/// One key per castling configuration; `NONE` has a key like any other.
#[inline]
pub fn castling(rights: CastleRights) -> u64 {
    KEYS.castling[rights.bits()]
}

/// Keyed by the file of the en-passant target square.
#[inline]
pub fn en_passant(target: Square) -> u64 {
    KEYS.en_passant_file[target.file().index()]
}

#[cfg(test)]
mod tests {
    use super::KEYS;

    #[test]
    fn all_keys_are_unique_and_nonzero() {
        let mut all: Vec<u64> = KEYS.piece_square.iter().flatten().copied().collect();
        all.push(KEYS.black_to_move);
        all.extend(KEYS.castling);
        all.extend(KEYS.en_passant_file);
        let count = all.len();
        assert_eq!(count, 12 * 64 + 1 + 16 + 8);
        assert!(all.iter().all(|&k| k != 0));
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), count, "some Zobrist keys collide");
    }
}
