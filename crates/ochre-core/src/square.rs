//! Squares on an 0x88 board.
//!
//! A square index is `rank * 16 + file`. The upper nibble holds the rank and
//! the lower nibble the file, so any index with a bit of `0x88` set lies off
//! the board. Stepping from a square by a signed delta and masking with
//! `0x88` is the whole off-board test.

use std::fmt;

use crate::coords::{File, Rank};

/// An on-board square in 0x88 encoding.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

impl Square {
    /// Number of slots in an 0x88 board array.
    pub const SLOTS: usize = 128;

    #[inline]
    pub const fn new(rank: Rank, file: File) -> Square {
        Square((rank as u8) << 4 | file as u8)
    }

    /// Wrap an 0x88 index, returning `None` if it is off the board.
    #[inline]
    pub const fn from_index(index: u8) -> Option<Square> {
        if index & 0x88 == 0 {
            Some(Square(index))
        } else {
            None
        }
    }

    /// Wrap an index already known to be on the board.
    #[inline]
    pub(crate) const fn from_index_unchecked(index: u8) -> Square {
        debug_assert!(index & 0x88 == 0);
        Square(index)
    }

    /// Step by a signed 0x88 delta, returning `None` when the result leaves the board.
    #[inline]
    pub const fn offset(self, delta: i8) -> Option<Square> {
        let target = self.0 as i16 + delta as i16;
        if target < 0 || target > 0x77 {
            return None;
        }
        Square::from_index(target as u8)
    }

    /// Parse algebraic notation such as `e4`.
    pub fn from_algebraic(s: &str) -> Option<Square> {
        let mut chars = s.chars();
        let file = File::from_char(chars.next()?)?;
        let rank = Rank::from_char(chars.next()?)?;
        if chars.next().is_some() {
            return None;
        }
        Some(Square::new(rank, file))
    }

    /// The 0x88 index, in `0..128`.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The dense index `rank * 8 + file`, in `0..64`.
    #[inline]
    pub const fn index64(self) -> usize {
        ((self.0 >> 4) * 8 + (self.0 & 7)) as usize
    }

    #[inline]
    pub const fn rank(self) -> Rank {
        Rank::ALL[(self.0 >> 4) as usize]
    }

    #[inline]
    pub const fn file(self) -> File {
        File::ALL[(self.0 & 7) as usize]
    }

    /// The same square seen from the other side of the board.
    #[inline]
    pub const fn flip_rank(self) -> Square {
        Square(self.0 ^ 0x70)
    }

    /// Iterate over all 64 squares from A1 to H8.
    pub fn all() -> impl Iterator<Item = Square> {
        (0u8..128).filter_map(Square::from_index)
    }

    pub const A1: Square = Square(0x00);
    pub const B1: Square = Square(0x01);
    pub const C1: Square = Square(0x02);
    pub const D1: Square = Square(0x03);
    pub const E1: Square = Square(0x04);
    pub const F1: Square = Square(0x05);
    pub const G1: Square = Square(0x06);
    pub const H1: Square = Square(0x07);
    pub const A2: Square = Square(0x10);
    pub const B2: Square = Square(0x11);
    pub const C2: Square = Square(0x12);
    pub const D2: Square = Square(0x13);
    pub const E2: Square = Square(0x14);
    pub const F2: Square = Square(0x15);
    pub const G2: Square = Square(0x16);
    pub const H2: Square = Square(0x17);
    pub const A3: Square = Square(0x20);
    pub const B3: Square = Square(0x21);
    pub const C3: Square = Square(0x22);
    pub const D3: Square = Square(0x23);
    pub const E3: Square = Square(0x24);
    pub const F3: Square = Square(0x25);
    pub const G3: Square = Square(0x26);
    pub const H3: Square = Square(0x27);
    pub const A4: Square = Square(0x30);
    pub const B4: Square = Square(0x31);
    pub const C4: Square = Square(0x32);
    pub const D4: Square = Square(0x33);
    pub const E4: Square = Square(0x34);
    pub const F4: Square = Square(0x35);
    pub const G4: Square = Square(0x36);
    pub const H4: Square = Square(0x37);
    pub const A5: Square = Square(0x40);
    pub const B5: Square = Square(0x41);
    pub const C5: Square = Square(0x42);
    pub const D5: Square = Square(0x43);
    pub const E5: Square = Square(0x44);
    pub const F5: Square = Square(0x45);
    pub const G5: Square = Square(0x46);
    pub const H5: Square = Square(0x47);
    pub const A6: Square = Square(0x50);
    pub const B6: Square = Square(0x51);
    pub const C6: Square = Square(0x52);
    pub const D6: Square = Square(0x53);
    pub const E6: Square = Square(0x54);
    pub const F6: Square = Square(0x55);
    pub const G6: Square = Square(0x56);
    pub const H6: Square = Square(0x57);
    pub const A7: Square = Square(0x60);
    pub const B7: Square = Square(0x61);
    pub const C7: Square = Square(0x62);
    pub const D7: Square = Square(0x63);
    pub const E7: Square = Square(0x64);
    pub const F7: Square = Square(0x65);
    pub const G7: Square = Square(0x66);
    pub const H7: Square = Square(0x67);
    pub const A8: Square = Square(0x70);
    pub const B8: Square = Square(0x71);
    pub const C8: Square = Square(0x72);
    pub const D8: Square = Square(0x73);
    pub const E8: Square = Square(0x74);
    pub const F8: Square = Square(0x75);
    pub const G8: Square = Square(0x76);
    pub const H8: Square = Square(0x77);
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({self})")
    }
}
