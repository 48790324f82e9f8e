//! Piece mobility: a bonus for every safe square a piece reaches.
//!
//! A square is safe when no friendly piece stands on it and no enemy pawn
//! attacks it.

use ochre_core::attacks::{BISHOP_DELTAS, KNIGHT_DELTAS, ROOK_DELTAS};
use ochre_core::{Color, Piece, PieceKind, Position, Square};

use super::score::{Score, S};

const KNIGHT_MOBILITY: Score = S(4, 4);
const BISHOP_MOBILITY: Score = S(3, 5);
const ROOK_MOBILITY: Score = S(2, 3);
const QUEEN_MOBILITY: Score = S(1, 2);

/// Mobility, White minus Black.
pub fn mobility(pos: &Position) -> Score {
    side_mobility(pos, Color::White) - side_mobility(pos, Color::Black)
}

/// Squares attacked by the pawns of `color`, indexed by 0x88 slot.
fn pawn_attack_map(pos: &Position, color: Color) -> [bool; Square::SLOTS] {
    let mut map = [false; Square::SLOTS];
    let forward = color.forward();
    for &sq in pos.squares_of(Piece::new(PieceKind::Pawn, color)) {
        for delta in [forward - 1, forward + 1] {
            if let Some(target) = sq.offset(delta) {
                map[target.index()] = true;
            }
        }
    }
    map
}

fn side_mobility(pos: &Position, color: Color) -> Score {
    let unsafe_squares = pawn_attack_map(pos, !color);
    let is_safe = |sq: Square| {
        !unsafe_squares[sq.index()] && pos.piece_at(sq).is_none_or(|p| p.color() != color)
    };

    let mut score = Score::ZERO;
    for &sq in pos.squares_of(Piece::new(PieceKind::Knight, color)) {
        let count = KNIGHT_DELTAS
            .iter()
            .filter_map(|&d| sq.offset(d))
            .filter(|&to| is_safe(to))
            .count();
        score += KNIGHT_MOBILITY * count as i16;
    }

    let sliders = [
        (PieceKind::Bishop, &BISHOP_DELTAS, BISHOP_MOBILITY),
        (PieceKind::Rook, &ROOK_DELTAS, ROOK_MOBILITY),
    ];
    for (kind, deltas, bonus) in sliders {
        for &sq in pos.squares_of(Piece::new(kind, color)) {
            score += bonus * slider_reach(pos, sq, deltas, is_safe);
        }
    }
    for &sq in pos.squares_of(Piece::new(PieceKind::Queen, color)) {
        let reach = slider_reach(pos, sq, &BISHOP_DELTAS, is_safe)
            + slider_reach(pos, sq, &ROOK_DELTAS, is_safe);
        score += QUEEN_MOBILITY * reach;
    }
    score
}

/// Safe squares along each ray up to and including the first occupied one.
fn slider_reach(pos: &Position, from: Square, deltas: &[i8], is_safe: impl Fn(Square) -> bool) -> i16 {
    let mut count = 0;
    for &delta in deltas {
        let mut current = from.offset(delta);
        while let Some(sq) = current {
            if is_safe(sq) {
                count += 1;
            }
            if !pos.is_empty(sq) {
                break;
            }
            current = sq.offset(delta);
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_position_is_zero() {
        assert_eq!(mobility(&Position::startpos()), Score::ZERO);
    }

    #[test]
    fn central_rook_beats_cornered_rook() {
        let pos: Position = "r3k3/8/8/8/4R3/8/8/4K3 w - - 0 1".parse().unwrap();
        // Rook on e4: 7 on the rank, 4 up to the king on e8, 2 down to e2.
        assert_eq!(side_mobility(&pos, Color::White), ROOK_MOBILITY * 13);
        // Rook on a8: 7 down the file, b8 to d8 (e8 is friendly).
        assert_eq!(side_mobility(&pos, Color::Black), ROOK_MOBILITY * 10);
        assert!(mobility(&pos).mg() > 0);
    }

    #[test]
    fn pawn_guarded_squares_do_not_count() {
        // Knight on d4; the pawn on d7 covers c6 and e6, the one on g6 covers f5.
        let pos: Position = "4k3/3p4/6p1/8/3N4/8/8/4K3 w - - 0 1".parse().unwrap();
        assert_eq!(side_mobility(&pos, Color::White), KNIGHT_MOBILITY * 5);
    }

    #[test]
    fn opening_lines_helps_the_mover() {
        let pos: Position = "rnbqkb1r/pppppppp/5n2/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 1 2"
            .parse()
            .unwrap();
        assert!(mobility(&pos).mg() > 0);
    }
}
