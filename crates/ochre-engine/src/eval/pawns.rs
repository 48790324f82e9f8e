//! Pawn structure: doubled, isolated and passed pawns.
//!
//! Depends on pawn placement only, so results are cached by pawn key in
//! the [`PawnTable`](super::cache::PawnTable).

use ochre_core::{Color, Piece, Position, Square};

use super::score::{Score, S};

/// Passed pawn bonus by rank counted from the pawn's own side (index 1 is
/// the starting rank, 6 is one step from promotion).
const PASSED_BONUS: [Score; 8] = [
    S(0, 0),
    S(5, 10),
    S(10, 20),
    S(20, 40),
    S(35, 60),
    S(60, 110),
    S(90, 150),
    S(0, 0),
];

const ISOLATED: Score = S(-12, -18);

/// Applied once for every pawn beyond the first on a file.
const DOUBLED: Score = S(-10, -20);

/// Pawn structure, White minus Black.
pub fn pawn_structure(pos: &Position) -> Score {
    let white = pos.squares_of(Piece::WHITE_PAWN);
    let black = pos.squares_of(Piece::BLACK_PAWN);
    side_structure(white, black, Color::White) - side_structure(black, white, Color::Black)
}

fn side_structure(own: &[Square], enemy: &[Square], color: Color) -> Score {
    let mut per_file = [0i16; 8];
    for sq in own {
        per_file[sq.file().index()] += 1;
    }

    let mut score = Score::ZERO;
    for &count in &per_file {
        if count > 1 {
            score += DOUBLED * (count - 1);
        }
    }

    for &sq in own {
        let file = sq.file().index();
        let neighbours = [file.wrapping_sub(1), file + 1];
        if neighbours.iter().all(|&f| f >= 8 || per_file[f] == 0) {
            score += ISOLATED;
        }
        if is_passed(sq, enemy, color) {
            score += PASSED_BONUS[relative_rank(sq, color)];
        }
    }
    score
}

fn relative_rank(sq: Square, color: Color) -> usize {
    sq.rank().relative_to(color).index()
}

/// No enemy pawn ahead on the same or an adjacent file.
pub fn is_passed(sq: Square, enemy: &[Square], color: Color) -> bool {
    let rank = relative_rank(sq, color);
    let file = sq.file().index() as i32;
    !enemy.iter().any(|&e| {
        (e.file().index() as i32 - file).abs() <= 1 && relative_rank(e, color) > rank
    })
}
