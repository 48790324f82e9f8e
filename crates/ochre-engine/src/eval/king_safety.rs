//! King safety: the pawn shield in front of the king and the enemy pieces
//! bearing on the squares around it. Both terms are middlegame only.

use ochre_core::attacks::KING_DELTAS;
use ochre_core::{Color, Piece, PieceKind, Position, Square};

use super::score::{Score, S};

/// Per missing pawn directly in front of the king.
const MISSING_SHIELD_PAWN: Score = S(-30, 0);

/// Attack units contributed by one piece hitting the king zone.
const fn attack_weight(kind: PieceKind) -> usize {
    match kind {
        PieceKind::Knight | PieceKind::Bishop => 2,
        PieceKind::Rook => 3,
        PieceKind::Queen => 5,
        PieceKind::Pawn | PieceKind::King => 0,
    }
}

/// Middlegame penalty by attack units. A lone attacker is never scored.
const KING_DANGER: [i16; 16] = [0, 0, 0, 6, 12, 18, 25, 37, 50, 75, 100, 125, 150, 175, 200, 225];

/// King safety, White minus Black.
pub fn king_safety(pos: &Position) -> Score {
    side_safety(pos, Color::White) - side_safety(pos, Color::Black)
}

fn side_safety(pos: &Position, color: Color) -> Score {
    let Some(king) = pos.king_square(color) else {
        return Score::ZERO;
    };
    shield(pos, king, color) + danger(pos, king, color)
}

fn shield(pos: &Position, king: Square, color: Color) -> Score {
    let pawn = Piece::new(PieceKind::Pawn, color);
    let forward = color.forward();
    let missing = [forward - 1, forward, forward + 1]
        .into_iter()
        .filter_map(|d| king.offset(d))
        .filter(|&sq| pos.piece_at(sq) != Some(pawn))
        .count();
    MISSING_SHIELD_PAWN * missing as i16
}

fn danger(pos: &Position, king: Square, color: Color) -> Score {
    let zone: Vec<Square> = std::iter::once(king)
        .chain(KING_DELTAS.iter().filter_map(|&d| king.offset(d)))
        .collect();

    let mut attackers = 0;
    let mut units = 0;
    for kind in [PieceKind::Knight, PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen] {
        let piece = Piece::new(kind, !color);
        for &from in pos.squares_of(piece) {
            if zone.iter().any(|&sq| pos.piece_attacks(piece, from, sq)) {
                attackers += 1;
                units += attack_weight(kind);
            }
        }
    }
    if attackers < 2 {
        return Score::ZERO;
    }
    S(-KING_DANGER[units.min(KING_DANGER.len() - 1)], 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_position_is_zero() {
        assert_eq!(king_safety(&Position::startpos()), Score::ZERO);
    }

    #[test]
    fn missing_shield_pawn() {
        // White king on g1 without the g2 pawn; black shield complete.
        let pos: Position = "4k3/pppppppp/8/8/8/8/PPPPP1PP/6K1 w - - 0 1".parse().unwrap();
        assert_eq!(side_safety(&pos, Color::White), MISSING_SHIELD_PAWN);
        assert_eq!(side_safety(&pos, Color::Black), Score::ZERO);
        assert_eq!(king_safety(&pos), S(-30, 0));
    }

    #[test]
    fn edge_king_has_a_two_square_shield() {
        let pos: Position = "4k3/pppppppp/8/8/8/8/PP6/K7 w - - 0 1".parse().unwrap();
        assert_eq!(side_safety(&pos, Color::White), Score::ZERO);
    }

    #[test]
    fn single_attacker_is_not_danger() {
        // Only the queen eyes the castled king.
        let pos: Position = "4k3/8/8/8/8/6q1/5PPP/6K1 w - - 0 1".parse().unwrap();
        assert_eq!(danger(&pos, Square::G1, Color::White), Score::ZERO);
    }

    #[test]
    fn several_attackers_are_danger() {
        // Queen on g3 and knight on h3 both reach the squares around g1.
        let pos: Position = "4k3/8/8/8/8/6qn/5PPP/6K1 w - - 0 1".parse().unwrap();
        let units = attack_weight(PieceKind::Queen) + attack_weight(PieceKind::Knight);
        assert_eq!(danger(&pos, Square::G1, Color::White), S(-KING_DANGER[units], 0));
        assert!(king_safety(&pos).mg() < 0);
    }
}
