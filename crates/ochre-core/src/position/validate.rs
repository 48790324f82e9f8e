//! Cheap playability checks for moves that did not come from the generator.
//!
//! Moves read back from the transposition table or the killer slots were
//! generated in some other position. Before the search tries them they
//! must be shown to be pseudo-legal here; rejecting a playable move only
//! costs ordering, accepting an unplayable one corrupts the board.

use super::Position;
use crate::attacks::attack_kind;
use crate::castle_rights::CastleSide;
use crate::color::Color;
use crate::coords::File;
use crate::moves::{Move, MoveKind};
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::square::Square;

impl Position {
    /// Whether castling to `side` is currently allowed for the side to move:
    /// rights intact, king and rook at home, the squares between them empty,
    /// and the king's start, transit and destination squares not attacked.
    pub fn can_castle(&self, side: CastleSide) -> bool {
        let us = self.side_to_move;
        if !self.castling.has(us, side) {
            return false;
        }
        let rank = us.back_rank();
        let at = |file| Square::new(rank, file);
        let (rook_file, empty, transit): (File, &[File], [File; 3]) = match side {
            CastleSide::Short => (File::FileH, &[File::FileF, File::FileG], [File::FileE, File::FileF, File::FileG]),
            CastleSide::Long => (
                File::FileA,
                &[File::FileB, File::FileC, File::FileD],
                [File::FileE, File::FileD, File::FileC],
            ),
        };
        self.piece_at(at(File::FileE)) == Some(Piece::new(PieceKind::King, us))
            && self.piece_at(at(rook_file)) == Some(Piece::new(PieceKind::Rook, us))
            && empty.iter().all(|&file| self.is_empty(at(file)))
            && transit.iter().all(|&file| !self.is_attacked(at(file), !us))
    }

    /// Whether `mv` is pseudo-legal in this position.
    ///
    /// Checks the moving piece, the captured piece, the path for sliders,
    /// pawn geometry, promotion consistency, en passant and castling
    /// conditions. Does not check that the mover's king is left safe.
    pub fn validate_hash_move(&self, mv: Move) -> bool {
        if mv.is_null() {
            return false;
        }
        let us = self.side_to_move;
        let piece = mv.piece();
        let from = mv.from();
        let to = mv.to();
        if piece.color() != us || self.piece_at(from) != Some(piece) {
            return false;
        }

        match mv.kind() {
            MoveKind::ShortCastle | MoveKind::LongCastle => {
                let side = if mv.kind() == MoveKind::ShortCastle {
                    CastleSide::Short
                } else {
                    CastleSide::Long
                };
                let king_to = match side {
                    CastleSide::Short => File::FileG,
                    CastleSide::Long => File::FileC,
                };
                piece.kind() == PieceKind::King
                    && to == Square::new(us.back_rank(), king_to)
                    && self.can_castle(side)
            }
            MoveKind::EnPassant => {
                let enemy_pawn = Piece::new(PieceKind::Pawn, !us);
                piece.kind() == PieceKind::Pawn
                    && self.en_passant == Some(to)
                    && mv.captured() == Some(enemy_pawn)
                    && attack_kind(from, to).reaches(piece)
                    && to
                        .offset(-us.forward())
                        .is_some_and(|sq| self.piece_at(sq) == Some(enemy_pawn))
            }
            MoveKind::Ordinary | MoveKind::Promotion(_) => {
                if self.piece_at(to) != mv.captured() {
                    return false;
                }
                if mv.captured().is_some_and(|victim| victim.color() == us) {
                    return false;
                }
                if piece.kind() == PieceKind::Pawn {
                    self.validate_pawn_move(mv, us)
                } else {
                    mv.promotion().is_none() && self.piece_attacks(piece, from, to)
                }
            }
        }
    }

    fn validate_pawn_move(&self, mv: Move, us: Color) -> bool {
        let from = mv.from();
        let to = mv.to();
        let promotes = to.rank() == (!us).back_rank();
        if promotes != mv.promotion().is_some() {
            return false;
        }
        if mv.is_capture() {
            return attack_kind(from, to).reaches(mv.piece());
        }
        let single = from.offset(us.forward());
        if single == Some(to) {
            return true;
        }
        from.rank() == us.pawn_rank()
            && single.is_some_and(|sq| self.is_empty(sq))
            && from.offset(2 * us.forward()) == Some(to)
    }

    /// Whether a quiet killer move is playable here. Captures and
    /// promotions are never killers.
    pub fn validate_killer(&self, mv: Move) -> bool {
        !mv.is_capture() && mv.promotion().is_none() && self.validate_hash_move(mv)
    }
}
