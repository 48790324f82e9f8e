//! Material balance.

use ochre_core::{Color, Piece, PieceKind, Position};

use super::score::{Score, S};

/// Centipawn value of each kind, indexed by [`PieceKind::index`]. Used where
/// a single number is needed: futility gains and quiescence ordering.
pub const PIECE_VALUE: [i32; PieceKind::COUNT] = [100, 325, 325, 500, 975, 0];

/// Tapered material, indexed by [`PieceKind::index`]. Pawns gain weight in
/// the ending.
pub const MATERIAL: [Score; PieceKind::COUNT] = [
    S(100, 120),
    S(325, 325),
    S(325, 325),
    S(500, 500),
    S(975, 975),
    S(0, 0),
];

const BISHOP_PAIR: Score = S(40, 55);

/// Centipawn value of a piece kind.
#[inline]
pub fn piece_value(kind: PieceKind) -> i32 {
    PIECE_VALUE[kind.index()]
}

/// Material plus bishop pair, White minus Black.
pub fn material(pos: &Position) -> Score {
    let mut score = Score::ZERO;
    for kind in PieceKind::ALL {
        let white = pos.count(Piece::new(kind, Color::White)) as i16;
        let black = pos.count(Piece::new(kind, Color::Black)) as i16;
        score += MATERIAL[kind.index()] * (white - black);
    }
    if pos.count(Piece::WHITE_BISHOP) >= 2 {
        score += BISHOP_PAIR;
    }
    if pos.count(Piece::BLACK_BISHOP) >= 2 {
        score -= BISHOP_PAIR;
    }
    score
}

/// Plain material balance in centipawns from the side to move's view.
pub fn material_eval(pos: &Position) -> i32 {
    let balance: i32 = PieceKind::ALL
        .into_iter()
        .map(|kind| {
            let white = pos.count(Piece::new(kind, Color::White)) as i32;
            let black = pos.count(Piece::new(kind, Color::Black)) as i32;
            (white - black) * piece_value(kind)
        })
        .sum();
    match pos.side_to_move() {
        Color::White => balance,
        Color::Black => -balance,
    }
}

/// Neither side can possibly mate: bare kings, or a single minor piece
/// against a bare king.
pub fn insufficient_material(pos: &Position) -> bool {
    let heavy_or_pawn = [PieceKind::Pawn, PieceKind::Rook, PieceKind::Queen];
    for color in Color::ALL {
        if heavy_or_pawn.iter().any(|&kind| pos.count(Piece::new(kind, color)) > 0) {
            return false;
        }
    }
    let minors: usize = Color::ALL
        .into_iter()
        .map(|color| {
            pos.count(Piece::new(PieceKind::Knight, color)) + pos.count(Piece::new(PieceKind::Bishop, color))
        })
        .sum();
    minors <= 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_is_balanced() {
        let pos = Position::startpos();
        assert_eq!(material(&pos), Score::ZERO);
        assert_eq!(material_eval(&pos), 0);
    }

    #[test]
    fn missing_queen_counts_for_both_views() {
        let white: Position = "rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".parse().unwrap();
        assert_eq!(material(&white), MATERIAL[PieceKind::Queen.index()]);
        assert_eq!(material_eval(&white), 975);

        let black: Position = "rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1".parse().unwrap();
        assert_eq!(material_eval(&black), -975);
    }

    #[test]
    fn bishop_pair_only_for_the_side_keeping_both() {
        let pos: Position = "rn1qk1nr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".parse().unwrap();
        assert_eq!(material(&pos), MATERIAL[PieceKind::Bishop.index()] * 2 + BISHOP_PAIR);
    }

    #[test]
    fn insufficient_material_cases() {
        for (fen, expected) in [
            ("8/8/4k3/8/8/4K3/8/8 w - - 0 1", true),
            ("8/8/4k3/8/8/4KN2/8/8 w - - 0 1", true),
            ("8/8/4kb2/8/8/4KN2/8/8 w - - 0 1", false),
            ("8/8/4k3/8/8/4KR2/8/8 w - - 0 1", false),
            ("8/8/4k3/8/8/4KP2/8/8 w - - 0 1", false),
        ] {
            let pos: Position = fen.parse().unwrap();
            assert_eq!(insufficient_material(&pos), expected, "{fen}");
        }
    }
}
