//! Delta tables for the 0x88 board.
//!
//! On an 0x88 board the difference `to - from` between two squares
//! identifies the geometric relation between them uniquely, so two small
//! tables indexed by `to - from + 128` answer "which pieces could attack
//! across this difference" and "which unit step walks from `from` to `to`".
//! Callers never scan a direction that cannot reach the target.

use crate::color::Color;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::square::Square;

/// Knight jumps.
pub const KNIGHT_DELTAS: [i8; 8] = [33, 31, 18, 14, -14, -18, -31, -33];
/// King steps; also the queen's ray directions.
pub const KING_DELTAS: [i8; 8] = [17, 16, 15, 1, -1, -15, -16, -17];
/// Bishop ray directions.
pub const BISHOP_DELTAS: [i8; 4] = [17, 15, -15, -17];
/// Rook ray directions.
pub const ROOK_DELTAS: [i8; 4] = [16, 1, -1, -16];

/// The family of pieces that can attack across a square difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttackKind {
    /// No piece attacks across this difference.
    None,
    /// One orthogonal step: king, queen, rook.
    OrthogonalStep,
    /// Two or more orthogonal steps: queen, rook.
    OrthogonalRay,
    /// One diagonal step toward rank 8: king, queen, bishop, white pawn.
    DiagonalStepUp,
    /// One diagonal step toward rank 1: king, queen, bishop, black pawn.
    DiagonalStepDown,
    /// Two or more diagonal steps: queen, bishop.
    DiagonalRay,
    Knight,
}

impl AttackKind {
    /// Whether `piece` standing on the source square attacks the target.
    ///
    /// For sliders the path still has to be checked for blockers.
    #[inline]
    pub const fn reaches(self, piece: Piece) -> bool {
        match piece.kind() {
            PieceKind::Pawn => match piece.color() {
                Color::White => matches!(self, AttackKind::DiagonalStepUp),
                Color::Black => matches!(self, AttackKind::DiagonalStepDown),
            },
            PieceKind::Knight => matches!(self, AttackKind::Knight),
            PieceKind::Bishop => self.is_diagonal(),
            PieceKind::Rook => self.is_orthogonal(),
            PieceKind::Queen => self.is_diagonal() || self.is_orthogonal(),
            PieceKind::King => matches!(
                self,
                AttackKind::OrthogonalStep | AttackKind::DiagonalStepUp | AttackKind::DiagonalStepDown
            ),
        }
    }

    #[inline]
    pub const fn is_diagonal(self) -> bool {
        matches!(
            self,
            AttackKind::DiagonalStepUp | AttackKind::DiagonalStepDown | AttackKind::DiagonalRay
        )
    }

    #[inline]
    pub const fn is_orthogonal(self) -> bool {
        matches!(self, AttackKind::OrthogonalStep | AttackKind::OrthogonalRay)
    }
}

const TABLE_LEN: usize = 257;

static ATTACK: [AttackKind; TABLE_LEN] = compute_attack_kinds();
static DELTA: [i8; TABLE_LEN] = compute_deltas();

const fn signum(x: i16) -> i16 {
    if x > 0 {
        1
    } else if x < 0 {
        -1
    } else {
        0
    }
}

const fn abs(x: i16) -> i16 {
    if x < 0 { -x } else { x }
}

/// Classify a rank/file displacement.
const fn classify(dr: i16, df: i16) -> AttackKind {
    let (ar, af) = (abs(dr), abs(df));
    if ar == 0 && af == 0 {
        AttackKind::None
    } else if ar == 0 || af == 0 {
        if ar + af == 1 {
            AttackKind::OrthogonalStep
        } else {
            AttackKind::OrthogonalRay
        }
    } else if ar == af {
        if ar > 1 {
            AttackKind::DiagonalRay
        } else if dr > 0 {
            AttackKind::DiagonalStepUp
        } else {
            AttackKind::DiagonalStepDown
        }
    } else if (ar == 1 && af == 2) || (ar == 2 && af == 1) {
        AttackKind::Knight
    } else {
        AttackKind::None
    }
}

const fn compute_attack_kinds() -> [AttackKind; TABLE_LEN] {
    let mut table = [AttackKind::None; TABLE_LEN];
    let mut dr = -7i16;
    while dr <= 7 {
        let mut df = -7i16;
        while df <= 7 {
            table[(dr * 16 + df + 128) as usize] = classify(dr, df);
            df += 1;
        }
        dr += 1;
    }
    table
}

const fn compute_deltas() -> [i8; TABLE_LEN] {
    let mut table = [0i8; TABLE_LEN];
    let mut dr = -7i16;
    while dr <= 7 {
        let mut df = -7i16;
        while df <= 7 {
            let diff = dr * 16 + df;
            let step = match classify(dr, df) {
                AttackKind::None => 0,
                AttackKind::Knight => diff,
                _ => signum(dr) * 16 + signum(df),
            };
            table[(diff + 128) as usize] = step as i8;
            df += 1;
        }
        dr += 1;
    }
    table
}

#[inline]
const fn table_index(from: Square, to: Square) -> usize {
    (to.index() as isize - from.index() as isize + 128) as usize
}

/// Which pieces on `from` could attack `to`, ignoring blockers.
#[inline]
pub fn attack_kind(from: Square, to: Square) -> AttackKind {
    ATTACK[table_index(from, to)]
}

/// The unit step that walks from `from` toward `to` (the jump itself for a
/// knight), or 0 when the squares share no line.
#[inline]
pub fn step(from: Square, to: Square) -> i8 {
    DELTA[table_index(from, to)]
}

#[cfg(test)]
mod tests {
    use super::{attack_kind, step, AttackKind, KNIGHT_DELTAS};
    use crate::piece::Piece;
    use crate::square::Square;

    #[test]
    fn orthogonal_relations() {
        assert_eq!(attack_kind(Square::E4, Square::E5), AttackKind::OrthogonalStep);
        assert_eq!(attack_kind(Square::E4, Square::E8), AttackKind::OrthogonalRay);
        assert_eq!(attack_kind(Square::A1, Square::H1), AttackKind::OrthogonalRay);
        assert_eq!(step(Square::E4, Square::E8), 16);
        assert_eq!(step(Square::H1, Square::A1), -1);
    }

    #[test]
    fn diagonal_relations_know_pawn_direction() {
        assert_eq!(attack_kind(Square::E4, Square::F5), AttackKind::DiagonalStepUp);
        assert_eq!(attack_kind(Square::E4, Square::D3), AttackKind::DiagonalStepDown);
        assert_eq!(attack_kind(Square::A1, Square::H8), AttackKind::DiagonalRay);
        assert_eq!(step(Square::H8, Square::A1), -17);
        assert_eq!(step(Square::A8, Square::H1), -15);
    }

    #[test]
    fn knight_deltas_are_their_own_step() {
        for delta in KNIGHT_DELTAS {
            if let Some(to) = Square::E4.offset(delta) {
                assert_eq!(attack_kind(Square::E4, to), AttackKind::Knight);
                assert_eq!(step(Square::E4, to), delta);
            }
        }
    }

    #[test]
    fn unrelated_squares() {
        assert_eq!(attack_kind(Square::A1, Square::B4), AttackKind::None);
        assert_eq!(step(Square::A1, Square::B4), 0);
        assert_eq!(attack_kind(Square::H1, Square::A2), AttackKind::None);
    }

    #[test]
    fn pawn_reach_depends_on_color() {
        let up = attack_kind(Square::D4, Square::E5);
        assert!(up.reaches(Piece::WHITE_PAWN));
        assert!(!up.reaches(Piece::BLACK_PAWN));
        assert!(up.reaches(Piece::BLACK_KING));
        assert!(up.reaches(Piece::WHITE_BISHOP));
        assert!(!up.reaches(Piece::WHITE_ROOK));
        let far = attack_kind(Square::D1, Square::D8);
        assert!(far.reaches(Piece::BLACK_QUEEN));
        assert!(!far.reaches(Piece::WHITE_KING));
    }

    #[test]
    fn every_on_board_pair_is_consistent() {
        for from in Square::all() {
            for to in Square::all() {
                let kind = attack_kind(from, to);
                let delta = step(from, to);
                if kind == AttackKind::None {
                    assert_eq!(delta, 0);
                    continue;
                }
                let mut sq = from;
                let mut walked = 0;
                while sq != to {
                    sq = sq.offset(delta).expect("walk stays on board");
                    walked += 1;
                    assert!(walked <= 7);
                }
            }
        }
    }
}
