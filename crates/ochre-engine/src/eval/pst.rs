//! Piece-square tables.
//!
//! Tables are laid out as a board diagram seen by White: the first row is
//! rank 8, the last row rank 1. Black reads the same table with ranks
//! mirrored, so a black piece on e7 scores like a white piece on e2.

use ochre_core::{Color, Piece, PieceKind, Square};

use super::score::{Score, S};

#[rustfmt::skip]
const PAWN: [Score; 64] = [
    S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0),
    S( 40, 90), S( 45, 90), S( 45, 85), S( 50, 80), S( 50, 80), S( 45, 85), S( 45, 90), S( 40, 90),
    S( 12, 45), S( 15, 45), S( 22, 40), S( 30, 35), S( 30, 35), S( 22, 40), S( 15, 45), S( 12, 45),
    S(  5, 22), S(  8, 20), S( 12, 18), S( 24, 15), S( 24, 15), S( 12, 18), S(  8, 20), S(  5, 22),
    S(  0, 10), S(  2, 10), S(  6,  8), S( 18,  6), S( 18,  6), S(  6,  8), S(  2, 10), S(  0, 10),
    S(  2,  2), S( -2,  2), S( -4,  0), S(  6,  0), S(  6,  0), S( -4,  0), S( -2,  2), S(  2,  2),
    S(  4,  0), S(  6,  0), S(  6, -2), S(-16, -4), S(-16, -4), S(  6, -2), S(  6,  0), S(  4,  0),
    S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0),
];

#[rustfmt::skip]
const KNIGHT: [Score; 64] = [
    S(-60,-45), S(-35,-30), S(-25,-20), S(-20,-15), S(-20,-15), S(-25,-20), S(-35,-30), S(-60,-45),
    S(-35,-30), S(-15,-15), S(  2, -5), S(  6,  0), S(  6,  0), S(  2, -5), S(-15,-15), S(-35,-30),
    S(-25,-20), S(  4, -4), S( 14,  6), S( 18, 10), S( 18, 10), S( 14,  6), S(  4, -4), S(-25,-20),
    S(-20,-15), S(  6,  2), S( 18, 10), S( 24, 16), S( 24, 16), S( 18, 10), S(  6,  2), S(-20,-15),
    S(-20,-15), S(  4,  2), S( 16, 10), S( 22, 16), S( 22, 16), S( 16, 10), S(  4,  2), S(-20,-15),
    S(-25,-20), S(  2, -4), S( 12,  6), S( 14, 10), S( 14, 10), S( 12,  6), S(  2, -4), S(-25,-20),
    S(-35,-30), S(-15,-15), S(  0, -5), S(  4,  0), S(  4,  0), S(  0, -5), S(-15,-15), S(-35,-30),
    S(-60,-45), S(-30,-30), S(-25,-20), S(-20,-15), S(-20,-15), S(-25,-20), S(-30,-30), S(-60,-45),
];

#[rustfmt::skip]
const BISHOP: [Score; 64] = [
    S(-18,-14), S( -8, -8), S( -8, -8), S( -8, -8), S( -8, -8), S( -8, -8), S( -8, -8), S(-18,-14),
    S( -8, -8), S(  2,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  2,  0), S( -8, -8),
    S( -8, -6), S(  0,  2), S(  6,  4), S(  8,  6), S(  8,  6), S(  6,  4), S(  0,  2), S( -8, -6),
    S( -8, -6), S(  6,  2), S(  6,  6), S( 10,  8), S( 10,  8), S(  6,  6), S(  6,  2), S( -8, -6),
    S( -8, -6), S(  2,  2), S( 10,  6), S( 10,  8), S( 10,  8), S( 10,  6), S(  2,  2), S( -8, -6),
    S( -8, -6), S( 10,  2), S( 10,  4), S(  8,  6), S(  8,  6), S( 10,  4), S( 10,  2), S( -8, -6),
    S( -8, -8), S( 12,  0), S(  2,  0), S(  4,  0), S(  4,  0), S(  2,  0), S( 12,  0), S( -8, -8),
    S(-18,-14), S( -8, -8), S(-12, -8), S( -8, -8), S( -8, -8), S(-12, -8), S( -8, -8), S(-18,-14),
];

#[rustfmt::skip]
const ROOK: [Score; 64] = [
    S(  4,  6), S(  4,  6), S(  6,  6), S(  8,  6), S(  8,  6), S(  6,  6), S(  4,  6), S(  4,  6),
    S( 14, 10), S( 18, 10), S( 18, 10), S( 18, 10), S( 18, 10), S( 18, 10), S( 18, 10), S( 14, 10),
    S( -4,  2), S(  0,  2), S(  0,  2), S(  2,  2), S(  2,  2), S(  0,  2), S(  0,  2), S( -4,  2),
    S( -6,  0), S(  0,  0), S(  0,  0), S(  2,  0), S(  2,  0), S(  0,  0), S(  0,  0), S( -6,  0),
    S( -6,  0), S(  0,  0), S(  0,  0), S(  2,  0), S(  2,  0), S(  0,  0), S(  0,  0), S( -6,  0),
    S( -6,  0), S(  0,  0), S(  0,  0), S(  2,  0), S(  2,  0), S(  0,  0), S(  0,  0), S( -6,  0),
    S( -8, -2), S( -2,  0), S(  0,  0), S(  2,  0), S(  2,  0), S(  0,  0), S( -2,  0), S( -8, -2),
    S( -4,  0), S( -2,  0), S(  4,  0), S( 10,  0), S( 10,  0), S(  6,  0), S( -2,  0), S( -4,  0),
];

#[rustfmt::skip]
const QUEEN: [Score; 64] = [
    S(-16,-18), S( -8,-10), S( -8, -8), S( -4, -4), S( -4, -4), S( -8, -8), S( -8,-10), S(-16,-18),
    S( -8,-10), S(  0, -2), S(  2,  2), S(  2,  4), S(  2,  4), S(  2,  2), S(  0, -2), S( -8,-10),
    S( -8, -6), S(  2,  2), S(  4,  6), S(  4,  8), S(  4,  8), S(  4,  6), S(  2,  2), S( -8, -6),
    S( -4, -4), S(  0,  4), S(  4,  8), S(  4, 12), S(  4, 12), S(  4,  8), S(  0,  4), S( -4, -4),
    S( -4, -4), S(  0,  4), S(  4,  8), S(  4, 12), S(  4, 12), S(  4,  8), S(  0,  4), S( -4, -4),
    S( -8, -6), S(  4,  2), S(  4,  6), S(  4,  6), S(  4,  6), S(  4,  6), S(  4,  2), S( -8, -6),
    S( -8,-10), S(  0, -2), S(  4,  0), S(  2,  0), S(  2,  0), S(  0,  0), S(  0, -2), S( -8,-10),
    S(-16,-18), S( -8,-10), S( -8, -8), S(  0, -4), S( -4, -4), S( -8, -8), S( -8,-10), S(-16,-18),
];

/// Shelter in the middlegame, centralization in the ending.
#[rustfmt::skip]
const KING: [Score; 64] = [
    S(-40,-60), S(-45,-35), S(-45,-25), S(-55,-20), S(-55,-20), S(-45,-25), S(-45,-35), S(-40,-60),
    S(-40,-35), S(-45,-15), S(-45, -5), S(-55,  0), S(-55,  0), S(-45, -5), S(-45,-15), S(-40,-35),
    S(-40,-25), S(-45, -5), S(-45, 15), S(-55, 25), S(-55, 25), S(-45, 15), S(-45, -5), S(-40,-25),
    S(-40,-20), S(-45,  0), S(-45, 25), S(-55, 35), S(-55, 35), S(-45, 25), S(-45,  0), S(-40,-20),
    S(-30,-20), S(-35,  0), S(-35, 25), S(-45, 35), S(-45, 35), S(-35, 25), S(-35,  0), S(-30,-20),
    S(-20,-25), S(-25, -5), S(-25, 15), S(-30, 25), S(-30, 25), S(-25, 15), S(-25, -5), S(-20,-25),
    S( 10,-35), S( 10,-15), S( -5, -5), S(-15,  0), S(-15,  0), S( -5, -5), S( 10,-15), S( 10,-35),
    S( 18,-55), S( 28,-35), S( 12,-25), S( -5,-20), S(  0,-20), S( -5,-25), S( 28,-35), S( 18,-55),
];

const TABLES: [&[Score; 64]; PieceKind::COUNT] = [&PAWN, &KNIGHT, &BISHOP, &ROOK, &QUEEN, &KING];

/// Table value for `piece` on `sq`, from that piece's own side's view.
#[inline]
pub fn pst_value(piece: Piece, sq: Square) -> Score {
    let row_major = match piece.color() {
        Color::White => sq.flip_rank().index64(),
        Color::Black => sq.index64(),
    };
    TABLES[piece.kind().index()][row_major]
}

#[cfg(test)]
mod tests {
    use super::pst_value;
    use ochre_core::{Piece, Square};

    #[test]
    fn black_reads_mirrored_table() {
        for (white_sq, black_sq) in [(Square::E2, Square::E7), (Square::G1, Square::G8), (Square::D4, Square::D5)] {
            for (white, black) in [(Piece::WHITE_PAWN, Piece::BLACK_PAWN), (Piece::WHITE_KING, Piece::BLACK_KING)] {
                assert_eq!(pst_value(white, white_sq), pst_value(black, black_sq));
            }
        }
    }

    #[test]
    fn central_knight_beats_rim_knight() {
        let center = pst_value(Piece::WHITE_KNIGHT, Square::E4);
        let rim = pst_value(Piece::WHITE_KNIGHT, Square::A4);
        assert!(center.mg() > rim.mg() && center.eg() > rim.eg());
    }

    #[test]
    fn advanced_pawns_score_higher_in_endgame() {
        assert!(pst_value(Piece::WHITE_PAWN, Square::A7).eg() > pst_value(Piece::WHITE_PAWN, Square::A3).eg());
        assert!(pst_value(Piece::BLACK_PAWN, Square::A2).eg() > pst_value(Piece::BLACK_PAWN, Square::A6).eg());
    }
}
