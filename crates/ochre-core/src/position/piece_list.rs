//! Per-piece square lists with a board-wide reverse index.

use crate::piece::Piece;
use crate::square::Square;

/// Most squares one piece type can occupy: two originals plus eight promotions.
pub const MAX_PER_PIECE: usize = 10;

/// Twelve unordered square lists, one per [`Piece`], plus a reverse index
/// from square to list slot so removal is a swap with the last entry.
///
/// Invariant: for every occupied square `sq` holding `piece`,
/// `squares(piece)[slot_of(sq)] == sq`. Vacant slots and vacant squares are
/// zeroed so that two equal placements compare equal.
#[derive(Clone, PartialEq, Eq)]
pub struct PieceLists {
    lists: [[Square; MAX_PER_PIECE]; Piece::COUNT],
    lens: [u8; Piece::COUNT],
    slot: [u8; Square::SLOTS],
}

impl PieceLists {
    pub const fn new() -> PieceLists {
        PieceLists {
            lists: [[Square::A1; MAX_PER_PIECE]; Piece::COUNT],
            lens: [0; Piece::COUNT],
            slot: [0; Square::SLOTS],
        }
    }

    #[inline]
    pub fn squares(&self, piece: Piece) -> &[Square] {
        let i = piece.index();
        &self.lists[i][..self.lens[i] as usize]
    }

    #[inline]
    pub fn count(&self, piece: Piece) -> usize {
        self.lens[piece.index()] as usize
    }

    #[inline]
    pub fn slot_of(&self, sq: Square) -> usize {
        self.slot[sq.index()] as usize
    }

    /// Append `sq` to `piece`'s list. Returns `false` if the list is full.
    #[inline]
    pub fn add(&mut self, piece: Piece, sq: Square) -> bool {
        let i = piece.index();
        let len = self.lens[i] as usize;
        if len == MAX_PER_PIECE {
            return false;
        }
        self.lists[i][len] = sq;
        self.slot[sq.index()] = len as u8;
        self.lens[i] += 1;
        true
    }

    /// Swap-remove `sq` from `piece`'s list, returning the slot it occupied.
    #[inline]
    pub fn remove(&mut self, piece: Piece, sq: Square) -> u8 {
        let i = piece.index();
        let slot = self.slot[sq.index()];
        let last = self.lens[i] as usize - 1;
        let moved = self.lists[i][last];
        self.lists[i][slot as usize] = moved;
        self.slot[moved.index()] = slot;
        self.slot[sq.index()] = 0;
        self.lists[i][last] = Square::A1;
        self.lens[i] -= 1;
        slot
    }

    /// Undo a [`PieceLists::remove`] that returned `slot`, restoring the
    /// exact list order.
    #[inline]
    pub fn restore(&mut self, piece: Piece, sq: Square, slot: u8) {
        let i = piece.index();
        let len = self.lens[i] as usize;
        if (slot as usize) < len {
            let displaced = self.lists[i][slot as usize];
            self.lists[i][len] = displaced;
            self.slot[displaced.index()] = len as u8;
        }
        self.lists[i][slot as usize] = sq;
        self.slot[sq.index()] = slot;
        self.lens[i] += 1;
    }

    /// Move `piece` from `from` to `to` without changing its slot.
    #[inline]
    pub fn relocate(&mut self, piece: Piece, from: Square, to: Square) {
        let slot = self.slot[from.index()];
        self.lists[piece.index()][slot as usize] = to;
        self.slot[to.index()] = slot;
        self.slot[from.index()] = 0;
    }
}

impl Default for PieceLists {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{PieceLists, MAX_PER_PIECE};
    use crate::piece::Piece;
    use crate::square::Square;

    fn reverse_index_holds(lists: &PieceLists, piece: Piece) {
        for &sq in lists.squares(piece) {
            assert_eq!(lists.squares(piece)[lists.slot_of(sq)], sq);
        }
    }

    #[test]
    fn swap_remove_keeps_reverse_index() {
        let mut lists = PieceLists::new();
        for sq in [Square::A2, Square::B2, Square::C2, Square::D2] {
            assert!(lists.add(Piece::WHITE_PAWN, sq));
        }
        let slot = lists.remove(Piece::WHITE_PAWN, Square::B2);
        assert_eq!(slot, 1);
        assert_eq!(lists.squares(Piece::WHITE_PAWN), &[Square::A2, Square::D2, Square::C2]);
        reverse_index_holds(&lists, Piece::WHITE_PAWN);
    }

    #[test]
    fn restore_is_exact_inverse_of_remove() {
        let mut lists = PieceLists::new();
        for sq in [Square::B1, Square::G1, Square::C3] {
            lists.add(Piece::WHITE_KNIGHT, sq);
        }
        let before = lists.clone();
        for sq in [Square::B1, Square::G1, Square::C3] {
            let slot = lists.remove(Piece::WHITE_KNIGHT, sq);
            lists.restore(Piece::WHITE_KNIGHT, sq, slot);
            assert!(lists == before, "remove/restore of {sq} changed the lists");
        }
    }

    #[test]
    fn relocate_then_back_is_identity() {
        let mut lists = PieceLists::new();
        lists.add(Piece::BLACK_ROOK, Square::A8);
        lists.add(Piece::BLACK_ROOK, Square::H8);
        let before = lists.clone();
        lists.relocate(Piece::BLACK_ROOK, Square::A8, Square::A1);
        assert_eq!(lists.squares(Piece::BLACK_ROOK), &[Square::A1, Square::H8]);
        reverse_index_holds(&lists, Piece::BLACK_ROOK);
        lists.relocate(Piece::BLACK_ROOK, Square::A1, Square::A8);
        assert!(lists == before);
    }

    #[test]
    fn full_list_rejects_add() {
        let mut lists = PieceLists::new();
        for sq in Square::all().take(MAX_PER_PIECE) {
            assert!(lists.add(Piece::WHITE_QUEEN, sq));
        }
        assert!(!lists.add(Piece::WHITE_QUEEN, Square::H8));
        assert_eq!(lists.count(Piece::WHITE_QUEEN), MAX_PER_PIECE);
    }
}
