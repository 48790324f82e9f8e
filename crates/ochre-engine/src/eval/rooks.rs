//! Rooks on open and semi-open files, and heavy pieces on the seventh rank.

use ochre_core::{Color, Piece, PieceKind, Position, Square};

use super::score::{Score, S};

/// No pawns of either color on the file.
const ROOK_OPEN_FILE: Score = S(25, 15);

/// No friendly pawn on the file, but an enemy one.
const ROOK_SEMI_OPEN_FILE: Score = S(15, 10);

const ROOK_ON_SEVENTH: Score = S(20, 30);
const QUEEN_ON_SEVENTH: Score = S(10, 10);

/// Rook and queen placement, White minus Black.
pub fn rooks(pos: &Position) -> Score {
    side_rooks(pos, Color::White) - side_rooks(pos, Color::Black)
}

fn pawn_files(pos: &Position, color: Color) -> [bool; 8] {
    let mut files = [false; 8];
    for &sq in pos.squares_of(Piece::new(PieceKind::Pawn, color)) {
        files[sq.file().index()] = true;
    }
    files
}

/// The seventh rank only counts while it holds enemy pawns or cuts the
/// enemy king off on its back rank.
fn seventh_rank_matters(pos: &Position, color: Color) -> bool {
    let enemy = !color;
    let seventh = color.seventh_rank();
    pos.squares_of(Piece::new(PieceKind::Pawn, enemy))
        .iter()
        .any(|sq| sq.rank() == seventh)
        || pos.king_square(enemy).is_some_and(|k| k.rank() == enemy.back_rank())
}

fn on_seventh(sq: Square, color: Color) -> bool {
    sq.rank() == color.seventh_rank()
}

fn side_rooks(pos: &Position, color: Color) -> Score {
    let own = pawn_files(pos, color);
    let enemy = pawn_files(pos, !color);
    let seventh = seventh_rank_matters(pos, color);

    let mut score = Score::ZERO;
    for &sq in pos.squares_of(Piece::new(PieceKind::Rook, color)) {
        let file = sq.file().index();
        if !own[file] {
            score += if enemy[file] { ROOK_SEMI_OPEN_FILE } else { ROOK_OPEN_FILE };
        }
        if seventh && on_seventh(sq, color) {
            score += ROOK_ON_SEVENTH;
        }
    }
    if seventh {
        for &sq in pos.squares_of(Piece::new(PieceKind::Queen, color)) {
            if on_seventh(sq, color) {
                score += QUEEN_ON_SEVENTH;
            }
        }
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_position_is_zero() {
        assert_eq!(rooks(&Position::startpos()), Score::ZERO);
    }

    #[test]
    fn open_and_semi_open_files() {
        // White rook on the open e-file; black rook on the d-file with only a white pawn.
        let pos: Position = "3rk3/ppp2ppp/8/8/3P4/8/PPP2PPP/4RK2 w - - 0 1".parse().unwrap();
        assert_eq!(side_rooks(&pos, Color::White), ROOK_OPEN_FILE);
        assert_eq!(side_rooks(&pos, Color::Black), ROOK_SEMI_OPEN_FILE);
    }

    #[test]
    fn closed_file_gets_nothing() {
        let pos: Position = "4k3/4p3/8/8/8/8/4P3/4RK2 w - - 0 1".parse().unwrap();
        assert_eq!(side_rooks(&pos, Color::White), Score::ZERO);
    }

    #[test]
    fn seventh_rank_needs_a_target() {
        // Pawns on the seventh: rook and queen both score.
        let pos: Position = "6k1/pR3Qpp/8/8/8/8/8/6K1 w - - 0 1".parse().unwrap();
        assert_eq!(
            side_rooks(&pos, Color::White),
            ROOK_OPEN_FILE + ROOK_ON_SEVENTH + QUEEN_ON_SEVENTH
        );

        // King off the back rank and no pawns to attack.
        let pos: Position = "8/1R4k1/8/8/8/8/8/6K1 w - - 0 1".parse().unwrap();
        assert_eq!(side_rooks(&pos, Color::White), ROOK_OPEN_FILE);
    }

    #[test]
    fn black_rook_on_second_rank() {
        let pos: Position = "6k1/8/8/8/8/8/5r2/6K1 b - - 0 1".parse().unwrap();
        assert_eq!(side_rooks(&pos, Color::Black), ROOK_OPEN_FILE + ROOK_ON_SEVENTH);
        assert_eq!(rooks(&pos), -(ROOK_OPEN_FILE + ROOK_ON_SEVENTH));
    }
}
