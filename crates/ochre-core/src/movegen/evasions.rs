//! Pseudo-legal replies to check.

use super::{push_pawn_move, MoveList};
use crate::attacks::{step, KING_DELTAS};
use crate::moves::{Move, MoveKind};
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::position::Position;
use crate::square::Square;

impl Position {
    /// Moves that may get the side to move out of check.
    ///
    /// King steps avoid squares that are attacked with the king still on
    /// its square, so a step along the checking ray can slip through and
    /// must be caught by the legality filter. After that filter the result
    /// equals [`Position::gen_all_legal`].
    pub fn gen_check_evasions(&self, list: &mut MoveList) {
        let us = self.side_to_move();
        let them = !us;
        let Some(king_sq) = self.king_square(us) else {
            return;
        };
        let king = Piece::new(PieceKind::King, us);

        for delta in KING_DELTAS {
            let Some(to) = king_sq.offset(delta) else {
                continue;
            };
            let target = self.piece_at(to);
            if target.is_some_and(|p| p.color() == us) || self.is_attacked(to, them) {
                continue;
            }
            list.push(Move::new(king_sq, to, king, target, MoveKind::Ordinary));
        }

        let checkers = self.attackers(king_sq, them);
        let &[checker_sq] = checkers.as_slice() else {
            return;
        };
        let Some(checker) = self.piece_at(checker_sq) else {
            return;
        };

        self.gen_moves_onto(checker_sq, Some(checker), list);
        if let Some(ep) = self.en_passant()
            && ep.offset(-us.forward()) == Some(checker_sq)
        {
            self.gen_en_passant(ep, list);
        }

        if checker.kind().is_slider() {
            let delta = step(king_sq, checker_sq);
            let mut next = king_sq.offset(delta);
            while let Some(block) = next.filter(|&sq| sq != checker_sq) {
                self.gen_moves_onto(block, None, list);
                if self.en_passant() == Some(block) {
                    self.gen_en_passant(block, list);
                }
                next = block.offset(delta);
            }
        }
    }

    /// Non-king moves of the side to move that land on `target`, which holds
    /// `captured` (or nothing, for interpositions).
    fn gen_moves_onto(&self, target: Square, captured: Option<Piece>, list: &mut MoveList) {
        let us = self.side_to_move();
        let forward = us.forward();
        let pawn = Piece::new(PieceKind::Pawn, us);

        if captured.is_some() {
            for side in [-1, 1] {
                if let Some(from) = target.offset(-forward + side).filter(|&sq| self.piece_at(sq) == Some(pawn)) {
                    push_pawn_move(list, from, target, pawn, captured);
                }
            }
        } else if let Some(behind) = target.offset(-forward) {
            match self.piece_at(behind) {
                Some(p) if p == pawn => push_pawn_move(list, behind, target, pawn, None),
                None => {
                    if let Some(from) = behind
                        .offset(-forward)
                        .filter(|&sq| sq.rank() == us.pawn_rank() && self.piece_at(sq) == Some(pawn))
                    {
                        list.push(Move::new(from, target, pawn, None, MoveKind::Ordinary));
                    }
                }
                Some(_) => {}
            }
        }

        for kind in [PieceKind::Knight, PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen] {
            let piece = Piece::new(kind, us);
            for &from in self.squares_of(piece) {
                if self.piece_attacks(piece, from, target) {
                    list.push(Move::new(from, target, piece, captured, MoveKind::Ordinary));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::MoveList;
    use crate::moves::Move;
    use crate::position::Position;

    fn legal_evasions(pos: &mut Position) -> Vec<String> {
        let mut list = MoveList::new();
        pos.gen_check_evasions(&mut list);
        let mut moves: Vec<String> = list
            .iter()
            .filter(|&mv| pos.is_legal(mv))
            .map(Move::to_uci)
            .collect();
        moves.sort();
        moves
    }

    fn all_legal(pos: &mut Position) -> Vec<String> {
        let mut moves: Vec<String> = pos.gen_all_legal().iter().map(Move::to_uci).collect();
        moves.sort();
        moves
    }

    #[test]
    fn evasions_match_legal_filter() {
        for fen in [
            // rook check, blocks and captures available
            "4k3/8/8/8/8/2n5/3PP3/r3K2R w K - 0 1",
            // knight check
            "4k3/8/8/8/8/3n4/8/4K3 w - - 0 1",
            // double check
            "4r1k1/8/8/8/8/5n2/8/4K3 w - - 0 1",
            // pawn check answered by en passant
            "8/8/8/2k5/3Pp3/8/8/4K3 b - d3 0 1",
            // rook check blocked by a promotion
            "r6K/2P5/8/8/8/8/8/k7 w - - 0 1",
            // bishop check blocked by a double push
            "4k3/8/8/b7/8/8/1P6/4K3 w - - 0 1",
            // checkmate: no evasions at all
            "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3",
        ] {
            let mut pos: Position = fen.parse().unwrap();
            assert!(pos.is_in_check(), "{fen}");
            assert_eq!(legal_evasions(&mut pos), all_legal(&mut pos), "{fen}");
        }
    }

    #[test]
    fn double_check_allows_only_king_moves() {
        let pos: Position = "4r1k1/8/8/8/8/5n2/3B4/4K3 w - - 0 1".parse().unwrap();
        let mut list = MoveList::new();
        pos.gen_check_evasions(&mut list);
        assert!(!list.is_empty());
        assert!(list.iter().all(|mv| mv.from() == crate::square::Square::E1));
    }

    #[test]
    fn evasions_after_every_checking_move() {
        let mut pos: Position = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"
            .parse()
            .unwrap();
        for mv in pos.gen_all_legal().iter() {
            pos.make_move(mv);
            if pos.is_in_check() {
                assert_eq!(legal_evasions(&mut pos), all_legal(&mut pos), "after {mv}");
            }
            pos.unmake_move(mv);
        }
    }
}
