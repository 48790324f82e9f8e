//! Castling rights as a four-bit set, plus the squares that revoke them.

use std::fmt;

use crate::color::Color;
use crate::error::FenError;
use crate::square::Square;

/// Which wing a castle goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    Short,
    Long,
}

/// Castling rights: bit 0 = white short, 1 = white long, 2 = black short, 3 = black long.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastleRights(u8);

/// For every 0x88 square, the rights lost when a move starts or ends there.
static REVOKED_BY: [CastleRights; Square::SLOTS] = build_revocations();

const fn build_revocations() -> [CastleRights; Square::SLOTS] {
    let mut table = [CastleRights::NONE; Square::SLOTS];
    table[Square::E1.index()] = CastleRights::WHITE_BOTH;
    table[Square::H1.index()] = CastleRights::WHITE_SHORT;
    table[Square::A1.index()] = CastleRights::WHITE_LONG;
    table[Square::E8.index()] = CastleRights::BLACK_BOTH;
    table[Square::H8.index()] = CastleRights::BLACK_SHORT;
    table[Square::A8.index()] = CastleRights::BLACK_LONG;
    table
}

impl CastleRights {
    pub const NONE: CastleRights = CastleRights(0);
    pub const ALL: CastleRights = CastleRights(0b1111);
    pub const WHITE_SHORT: CastleRights = CastleRights(0b0001);
    pub const WHITE_LONG: CastleRights = CastleRights(0b0010);
    pub const BLACK_SHORT: CastleRights = CastleRights(0b0100);
    pub const BLACK_LONG: CastleRights = CastleRights(0b1000);
    pub const WHITE_BOTH: CastleRights = CastleRights(0b0011);
    pub const BLACK_BOTH: CastleRights = CastleRights(0b1100);

    /// Raw bits, usable as an index into a 16-entry table.
    #[inline]
    pub const fn bits(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn contains(self, other: CastleRights) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn insert(self, other: CastleRights) -> CastleRights {
        CastleRights(self.0 | other.0)
    }

    #[inline]
    pub const fn remove(self, other: CastleRights) -> CastleRights {
        CastleRights(self.0 & !other.0)
    }

    /// Single right for one color and wing.
    #[inline]
    pub const fn flag(color: Color, side: CastleSide) -> CastleRights {
        match (color, side) {
            (Color::White, CastleSide::Short) => Self::WHITE_SHORT,
            (Color::White, CastleSide::Long) => Self::WHITE_LONG,
            (Color::Black, CastleSide::Short) => Self::BLACK_SHORT,
            (Color::Black, CastleSide::Long) => Self::BLACK_LONG,
        }
    }

    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.contains(Self::flag(color, side))
    }

    /// Rights remaining after a piece leaves `from` and lands on `to`.
    ///
    /// A king or rook leaving its home square, or anything landing on a
    /// rook home square, forfeits the matching rights for good.
    #[inline]
    pub fn after_move(self, from: Square, to: Square) -> CastleRights {
        self.remove(REVOKED_BY[from.index()]).remove(REVOKED_BY[to.index()])
    }

    /// Parse the FEN castling field (`KQkq`, `-`, ...).
    pub fn from_fen(s: &str) -> Result<CastleRights, FenError> {
        if s == "-" {
            return Ok(CastleRights::NONE);
        }
        s.chars().try_fold(CastleRights::NONE, |rights, c| {
            let flag = match c {
                'K' => Self::WHITE_SHORT,
                'Q' => Self::WHITE_LONG,
                'k' => Self::BLACK_SHORT,
                'q' => Self::BLACK_LONG,
                _ => return Err(FenError::InvalidCastlingChar { character: c }),
            };
            Ok(rights.insert(flag))
        })
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        for (flag, c) in [
            (Self::WHITE_SHORT, 'K'),
            (Self::WHITE_LONG, 'Q'),
            (Self::BLACK_SHORT, 'k'),
            (Self::BLACK_LONG, 'q'),
        ] {
            if self.contains(flag) {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CastleRights({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::{CastleRights, CastleSide};
    use crate::color::Color;
    use crate::square::Square;

    #[test]
    fn fen_parse_and_display() {
        for fen in ["KQkq", "Kq", "k", "-", "Qk"] {
            let rights = CastleRights::from_fen(fen).unwrap();
            let expected_order: String = ['K', 'Q', 'k', 'q']
                .into_iter()
                .filter(|c| fen.contains(*c))
                .collect();
            let expected = if expected_order.is_empty() { "-".to_string() } else { expected_order };
            assert_eq!(rights.to_string(), expected);
        }
        assert!(CastleRights::from_fen("KQxq").is_err());
    }

    #[test]
    fn has_by_color_and_side() {
        let rights = CastleRights::from_fen("Kq").unwrap();
        assert!(rights.has(Color::White, CastleSide::Short));
        assert!(!rights.has(Color::White, CastleSide::Long));
        assert!(rights.has(Color::Black, CastleSide::Long));
    }

    #[test]
    fn king_move_revokes_both_sides() {
        let rights = CastleRights::ALL.after_move(Square::E1, Square::E2);
        assert_eq!(rights, CastleRights::BLACK_BOTH);
    }

    #[test]
    fn rook_capture_on_home_square_revokes() {
        let rights = CastleRights::ALL.after_move(Square::B7, Square::A8);
        assert_eq!(rights, CastleRights::ALL.remove(CastleRights::BLACK_LONG));
        let rights = CastleRights::ALL.after_move(Square::H1, Square::H5);
        assert!(!rights.contains(CastleRights::WHITE_SHORT));
        assert!(rights.contains(CastleRights::WHITE_LONG));
    }

    #[test]
    fn unrelated_move_keeps_rights() {
        assert_eq!(CastleRights::ALL.after_move(Square::G1, Square::F3), CastleRights::ALL);
    }
}
