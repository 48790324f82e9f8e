//! Attack detection on the 0x88 board.

use super::Position;
use crate::attacks::{attack_kind, step};
use crate::color::Color;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::square::Square;

/// A small fixed-capacity set of squares, used for attacker lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SquareSet {
    squares: [Square; 16],
    len: usize,
}

impl SquareSet {
    pub const fn new() -> SquareSet {
        SquareSet {
            squares: [Square::A1; 16],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, sq: Square) {
        if self.len < self.squares.len() {
            self.squares[self.len] = sq;
            self.len += 1;
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Square] {
        &self.squares[..self.len]
    }
}

impl Default for SquareSet {
    fn default() -> Self {
        Self::new()
    }
}

impl Position {
    /// Walk from `from` toward `to` and report whether every square strictly
    /// between them is empty. False when the squares share no line.
    pub fn traverse_delta(&self, from: Square, to: Square) -> bool {
        let kind = attack_kind(from, to);
        if !kind.is_diagonal() && !kind.is_orthogonal() {
            return false;
        }
        let delta = step(from, to);
        let mut current = from.offset(delta);
        while let Some(sq) = current {
            if sq == to {
                return true;
            }
            if self.squares[sq.index()].is_some() {
                return false;
            }
            current = sq.offset(delta);
        }
        false
    }

    /// Whether `piece` standing on `from` attacks `to` on the current board.
    #[inline]
    pub fn piece_attacks(&self, piece: Piece, from: Square, to: Square) -> bool {
        attack_kind(from, to).reaches(piece)
            && (!piece.kind().is_slider() || self.traverse_delta(from, to))
    }

    /// Whether any piece of `by` attacks `sq`.
    pub fn is_attacked(&self, sq: Square, by: Color) -> bool {
        PieceKind::ALL.into_iter().any(|kind| {
            let piece = Piece::new(kind, by);
            self.lists()
                .squares(piece)
                .iter()
                .any(|&from| self.piece_attacks(piece, from, sq))
        })
    }

    /// Squares of all `by` pieces attacking `sq`.
    pub fn attackers(&self, sq: Square, by: Color) -> SquareSet {
        let mut set = SquareSet::new();
        for kind in PieceKind::ALL {
            let piece = Piece::new(kind, by);
            for &from in self.lists().squares(piece) {
                if self.piece_attacks(piece, from, sq) {
                    set.push(from);
                }
            }
        }
        set
    }

    /// Whether the side to move is in check.
    #[inline]
    pub fn is_in_check(&self) -> bool {
        self.is_color_in_check(self.side_to_move)
    }

    #[inline]
    pub fn is_color_in_check(&self, color: Color) -> bool {
        self.king_square(color)
            .is_some_and(|king| self.is_attacked(king, !color))
    }
}

#[cfg(test)]
mod tests {
    use crate::color::Color;
    use crate::position::Position;
    use crate::square::Square;

    #[test]
    fn sliders_are_blocked() {
        let pos: Position = "4k3/8/8/8/4p3/8/8/R3K2r w - - 0 1".parse().unwrap();
        assert!(pos.is_attacked(Square::F1, Color::Black));
        assert!(!pos.is_attacked(Square::D1, Color::Black));
        assert!(pos.is_attacked(Square::E1, Color::Black));
        assert!(pos.is_in_check());
        assert!(!pos.traverse_delta(Square::H1, Square::D1));
        assert!(pos.traverse_delta(Square::E4, Square::E1));
        assert!(!pos.traverse_delta(Square::A1, Square::B3));
    }

    #[test]
    fn pawns_attack_forward_diagonally_only() {
        let pos: Position = "4k3/8/8/3p4/8/8/8/4K3 w - - 0 1".parse().unwrap();
        assert!(pos.is_attacked(Square::C4, Color::Black));
        assert!(pos.is_attacked(Square::E4, Color::Black));
        assert!(!pos.is_attacked(Square::D4, Color::Black));
        assert!(!pos.is_attacked(Square::C6, Color::Black));
    }

    #[test]
    fn attackers_lists_every_piece() {
        let pos: Position = "4k3/8/8/2n5/8/3P4/4K3/3R4 b - - 0 1".parse().unwrap();
        let attackers = pos.attackers(Square::D3, Color::Black);
        assert_eq!(attackers.as_slice(), &[Square::C5]);
        let defenders = pos.attackers(Square::D3, Color::White);
        assert_eq!(defenders.len(), 2);
        assert!(defenders.as_slice().contains(&Square::D1));
        assert!(defenders.as_slice().contains(&Square::E2));
    }

    #[test]
    fn knight_checks_jump_blockers() {
        let pos: Position = "4k3/8/8/8/8/3n4/3PPP2/4K3 w - - 0 1".parse().unwrap();
        assert!(pos.is_in_check());
    }
}
