//! Make/unmake of real moves and null moves.

use tracing::error;

use super::{Position, Undo};
use crate::color::Color;
use crate::coords::File;
use crate::moves::{Move, MoveKind};
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::square::Square;
use crate::zobrist;

/// Rook start and end squares for a castle of `color`.
fn castle_rook_squares(color: Color, kind: MoveKind) -> (Square, Square) {
    let rank = color.back_rank();
    match kind {
        MoveKind::LongCastle => (Square::new(rank, File::FileA), Square::new(rank, File::FileD)),
        _ => (Square::new(rank, File::FileH), Square::new(rank, File::FileF)),
    }
}

impl Position {
    /// Apply `mv`, which must come from this position's move generator (or
    /// have passed [`Position::validate_hash_move`]).
    ///
    /// The move may leave the mover's king in check; legality filtering is
    /// the caller's job.
    pub fn make_move(&mut self, mv: Move) {
        let us = self.side_to_move;
        let from = mv.from();
        let to = mv.to();
        let piece = mv.piece();

        let mut undo = Undo {
            en_passant: self.en_passant,
            castling: self.castling,
            halfmove_clock: self.halfmove_clock,
            key: self.key,
            pawn_key: self.pawn_key,
            captured_slot: 0,
            mover_slot: 0,
        };

        if let Some(ep) = self.en_passant.take() {
            self.key ^= zobrist::en_passant(ep);
        }
        self.key ^= zobrist::castling(self.castling);
        self.halfmove_clock = self.halfmove_clock.saturating_add(1);

        if let Some(victim) = mv.captured() {
            self.halfmove_clock = 0;
            if victim.kind() == PieceKind::King {
                error!(%mv, position = %self, "king captured: position is corrupt");
            }
        }

        match mv.kind() {
            MoveKind::Ordinary => {
                if let Some(victim) = mv.captured() {
                    undo.captured_slot = self.take(victim, to);
                }
                self.shift(piece, from, to);
                if piece.kind() == PieceKind::Pawn {
                    self.halfmove_clock = 0;
                    if (to.index() as i16 - from.index() as i16).abs() == 32 {
                        self.en_passant = from.offset(us.forward());
                    }
                }
            }
            MoveKind::ShortCastle | MoveKind::LongCastle => {
                let (rook_from, rook_to) = castle_rook_squares(us, mv.kind());
                self.shift(piece, from, to);
                self.shift(Piece::new(PieceKind::Rook, us), rook_from, rook_to);
            }
            MoveKind::EnPassant => {
                if let (Some(victim), Some(victim_sq)) = (mv.captured(), to.offset(-us.forward())) {
                    undo.captured_slot = self.take(victim, victim_sq);
                }
                self.shift(piece, from, to);
            }
            MoveKind::Promotion(promo) => {
                if let Some(victim) = mv.captured() {
                    undo.captured_slot = self.take(victim, to);
                }
                undo.mover_slot = self.take(piece, from);
                self.put(Piece::new(promo.kind(), us), to);
                self.halfmove_clock = 0;
            }
        }

        self.castling = self.castling.after_move(from, to);
        self.key ^= zobrist::castling(self.castling);
        if let Some(ep) = self.en_passant {
            self.key ^= zobrist::en_passant(ep);
        }
        self.key ^= zobrist::black_to_move();
        if us == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = !us;
        self.history.push(undo);
    }

    /// Reverse the most recent [`Position::make_move`], which must have been `mv`.
    pub fn unmake_move(&mut self, mv: Move) {
        let Some(undo) = self.history.pop() else {
            error!(%mv, "unmake with empty history");
            return;
        };
        let us = !self.side_to_move;
        let from = mv.from();
        let to = mv.to();
        let piece = mv.piece();

        match mv.kind() {
            MoveKind::Ordinary => {
                self.shift(piece, to, from);
                if let Some(victim) = mv.captured() {
                    self.put_at_slot(victim, to, undo.captured_slot);
                }
            }
            MoveKind::ShortCastle | MoveKind::LongCastle => {
                let (rook_from, rook_to) = castle_rook_squares(us, mv.kind());
                self.shift(Piece::new(PieceKind::Rook, us), rook_to, rook_from);
                self.shift(piece, to, from);
            }
            MoveKind::EnPassant => {
                self.shift(piece, to, from);
                if let (Some(victim), Some(victim_sq)) = (mv.captured(), to.offset(-us.forward())) {
                    self.put_at_slot(victim, victim_sq, undo.captured_slot);
                }
            }
            MoveKind::Promotion(promo) => {
                self.take(Piece::new(promo.kind(), us), to);
                self.put_at_slot(piece, from, undo.mover_slot);
                if let Some(victim) = mv.captured() {
                    self.put_at_slot(victim, to, undo.captured_slot);
                }
            }
        }

        if us == Color::Black {
            self.fullmove_number -= 1;
        }
        self.side_to_move = us;
        self.restore(undo);
    }

    /// Pass the turn without moving. Used by null-move pruning.
    pub fn make_null_move(&mut self) {
        self.history.push(Undo {
            en_passant: self.en_passant,
            castling: self.castling,
            halfmove_clock: self.halfmove_clock,
            key: self.key,
            pawn_key: self.pawn_key,
            captured_slot: 0,
            mover_slot: 0,
        });
        if let Some(ep) = self.en_passant.take() {
            self.key ^= zobrist::en_passant(ep);
        }
        self.key ^= zobrist::black_to_move();
        self.side_to_move = !self.side_to_move;
    }

    pub fn unmake_null_move(&mut self) {
        let Some(undo) = self.history.pop() else {
            error!("null unmake with empty history");
            return;
        };
        self.side_to_move = !self.side_to_move;
        self.restore(undo);
    }

    fn restore(&mut self, undo: Undo) {
        self.en_passant = undo.en_passant;
        self.castling = undo.castling;
        self.halfmove_clock = undo.halfmove_clock;
        self.key = undo.key;
        self.pawn_key = undo.pawn_key;
    }
}
