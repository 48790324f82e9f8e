//! Move representation, bit-packed into a `u32`.

use std::fmt;

use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::square::Square;

const FROM_SHIFT: u32 = 0;
const TO_SHIFT: u32 = 7;
const PIECE_SHIFT: u32 = 14;
const CAPTURE_SHIFT: u32 = 18;
const KIND_SHIFT: u32 = 22;
const SQUARE_MASK: u32 = 0x7F;
const PIECE_MASK: u32 = 0x0F;
const KIND_MASK: u32 = 0x07;

/// The piece a pawn promotes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PromotionPiece {
    Queen = 0,
    Rook = 1,
    Bishop = 2,
    Knight = 3,
}

impl PromotionPiece {
    /// Generation order: strongest first.
    pub const ALL: [PromotionPiece; 4] = [
        PromotionPiece::Queen,
        PromotionPiece::Rook,
        PromotionPiece::Bishop,
        PromotionPiece::Knight,
    ];

    pub const fn kind(self) -> PieceKind {
        match self {
            PromotionPiece::Queen => PieceKind::Queen,
            PromotionPiece::Rook => PieceKind::Rook,
            PromotionPiece::Bishop => PieceKind::Bishop,
            PromotionPiece::Knight => PieceKind::Knight,
        }
    }

    pub const fn uci_char(self) -> char {
        match self {
            PromotionPiece::Queen => 'q',
            PromotionPiece::Rook => 'r',
            PromotionPiece::Bishop => 'b',
            PromotionPiece::Knight => 'n',
        }
    }
}

/// The closed set of move shapes that make/unmake dispatch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Ordinary,
    ShortCastle,
    LongCastle,
    EnPassant,
    Promotion(PromotionPiece),
}

impl MoveKind {
    const fn bits(self) -> u32 {
        match self {
            MoveKind::Ordinary => 0,
            MoveKind::ShortCastle => 1,
            MoveKind::LongCastle => 2,
            MoveKind::EnPassant => 3,
            MoveKind::Promotion(promo) => 4 + promo as u32,
        }
    }

    const fn from_bits(bits: u32) -> MoveKind {
        match bits {
            0 => MoveKind::Ordinary,
            1 => MoveKind::ShortCastle,
            2 => MoveKind::LongCastle,
            3 => MoveKind::EnPassant,
            4 => MoveKind::Promotion(PromotionPiece::Queen),
            5 => MoveKind::Promotion(PromotionPiece::Rook),
            6 => MoveKind::Promotion(PromotionPiece::Bishop),
            _ => MoveKind::Promotion(PromotionPiece::Knight),
        }
    }
}

/// A move packed into 32 bits.
///
/// ```text
/// bits  0-6:  from square (0x88 index)
/// bits  7-13: to square (0x88 index)
/// bits 14-17: moving piece (Piece::index)
/// bits 18-21: captured piece (Piece::index + 1, 0 = none)
/// bits 22-24: kind (ordinary, short castle, long castle, en passant, promotion Q/R/B/N)
/// ```
///
/// Everything a move needs to be unmade is inside the move or in the
/// position's history stack, so the value is self-describing.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move(u32);

impl Move {
    /// The all-zero value. Never produced by move generation.
    pub const NULL: Move = Move(0);

    pub const fn new(
        from: Square,
        to: Square,
        piece: Piece,
        captured: Option<Piece>,
        kind: MoveKind,
    ) -> Move {
        let captured_bits = match captured {
            Some(victim) => victim.index() as u32 + 1,
            None => 0,
        };
        Move(
            (from.index() as u32) << FROM_SHIFT
                | (to.index() as u32) << TO_SHIFT
                | (piece.index() as u32) << PIECE_SHIFT
                | captured_bits << CAPTURE_SHIFT
                | kind.bits() << KIND_SHIFT,
        )
    }

    #[inline]
    pub const fn from(self) -> Square {
        Square::from_index_unchecked(((self.0 >> FROM_SHIFT) & SQUARE_MASK) as u8)
    }

    #[inline]
    pub const fn to(self) -> Square {
        Square::from_index_unchecked(((self.0 >> TO_SHIFT) & SQUARE_MASK) as u8)
    }

    #[inline]
    pub const fn piece(self) -> Piece {
        Piece::ALL[((self.0 >> PIECE_SHIFT) & PIECE_MASK) as usize % Piece::COUNT]
    }

    #[inline]
    pub const fn captured(self) -> Option<Piece> {
        match (self.0 >> CAPTURE_SHIFT) & PIECE_MASK {
            0 => None,
            bits => Piece::from_index(bits as usize - 1),
        }
    }

    #[inline]
    pub const fn kind(self) -> MoveKind {
        MoveKind::from_bits((self.0 >> KIND_SHIFT) & KIND_MASK)
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// True for captures, including en passant.
    #[inline]
    pub const fn is_capture(self) -> bool {
        (self.0 >> CAPTURE_SHIFT) & PIECE_MASK != 0
    }

    /// The promoted-to kind, if this is a promotion.
    #[inline]
    pub const fn promotion(self) -> Option<PieceKind> {
        match self.kind() {
            MoveKind::Promotion(promo) => Some(promo.kind()),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        matches!(self.kind(), MoveKind::ShortCastle | MoveKind::LongCastle)
    }

    /// Coordinate notation as used by UCI, `0000` for the null move.
    pub fn to_uci(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return write!(f, "0000");
        }
        write!(f, "{}{}", self.from(), self.to())?;
        if let MoveKind::Promotion(promo) = self.kind() {
            write!(f, "{}", promo.uci_char())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({self} {:?} {:?}", self.piece(), self.kind())?;
        if let Some(victim) = self.captured() {
            write!(f, " x{victim:?}")?;
        }
        write!(f, ")")
    }
}
