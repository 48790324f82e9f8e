//! Game phase from the non-pawn material left on the board.

use ochre_core::{Color, Piece, PieceKind, Position};

/// Phase of the starting position. Knight and bishop weigh 1, rook 2, queen 4.
pub const MAX_PHASE: i32 = 24;

const PHASE_WEIGHT: [(PieceKind, i32); 4] = [
    (PieceKind::Knight, 1),
    (PieceKind::Bishop, 1),
    (PieceKind::Rook, 2),
    (PieceKind::Queen, 4),
];

/// `MAX_PHASE` with all officers on the board, 0 when only kings and pawns
/// remain. Extra promoted pieces are clamped.
pub fn game_phase(pos: &Position) -> i32 {
    let mut phase = 0;
    for color in Color::ALL {
        for (kind, weight) in PHASE_WEIGHT {
            phase += pos.count(Piece::new(kind, color)) as i32 * weight;
        }
    }
    phase.min(MAX_PHASE)
}

/// No knights, bishops, rooks or queens on either side.
pub fn is_pawn_ending(pos: &Position) -> bool {
    Color::ALL.into_iter().all(|color| pos.non_pawn_pieces(color) == 0)
}

#[cfg(test)]
mod tests {
    use super::{game_phase, is_pawn_ending, MAX_PHASE};
    use ochre_core::Position;

    #[test]
    fn start_is_full_phase() {
        assert_eq!(game_phase(&Position::startpos()), MAX_PHASE);
        assert!(!is_pawn_ending(&Position::startpos()));
    }

    #[test]
    fn queens_off() {
        let pos: Position = "rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNB1KBNR w KQkq - 0 1".parse().unwrap();
        assert_eq!(game_phase(&pos), 16);
    }

    #[test]
    fn king_and_pawns_only() {
        let pos: Position = "4k3/pp6/8/8/8/8/5PPP/6K1 w - - 0 1".parse().unwrap();
        assert_eq!(game_phase(&pos), 0);
        assert!(is_pawn_ending(&pos));
        let with_knight: Position = "4k3/pp6/8/8/8/8/5PPP/5NK1 w - - 0 1".parse().unwrap();
        assert!(!is_pawn_ending(&with_knight));
    }
}
