//! Pseudo-legal and legal move generation.
//!
//! Generation is split the way the search consumes it: [`Position::gen_caps`]
//! yields the noisy moves (captures and every promotion), [`Position::gen_noncaps`]
//! the quiet ones, and [`Position::gen_check_evasions`] a reduced set for when
//! the side to move is in check. All three are pseudo-legal: a move may leave
//! the mover's king attacked. [`Position::gen_all_legal`] filters that out.

mod evasions;

use std::ops::Index;

use crate::attacks::{BISHOP_DELTAS, KING_DELTAS, KNIGHT_DELTAS, ROOK_DELTAS};
use crate::castle_rights::CastleSide;
use crate::coords::File;
use crate::error::MoveParseError;
use crate::moves::{Move, MoveKind, PromotionPiece};
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::position::Position;
use crate::square::Square;

/// Capacity of a [`MoveList`]. No legal position has more than 218 moves.
pub const MAX_MOVES: usize = 256;

/// Stack-allocated move buffer with an ordering score beside each move.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    scores: [i32; MAX_MOVES],
    len: usize,
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList {
            moves: [Move::NULL; MAX_MOVES],
            scores: [0; MAX_MOVES],
            len: 0,
        }
    }

    /// Append a move with a zero score.
    #[inline]
    pub fn push(&mut self, mv: Move) {
        debug_assert!(self.len < MAX_MOVES);
        if self.len < MAX_MOVES {
            self.moves[self.len] = mv;
            self.scores[self.len] = 0;
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
    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    /// Iterate the moves by value.
    pub fn iter(&self) -> impl Iterator<Item = Move> + '_ {
        self.as_slice().iter().copied()
    }

    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().contains(&mv)
    }

    #[inline]
    pub fn score(&self, index: usize) -> i32 {
        self.scores[index]
    }

    #[inline]
    pub fn set_score(&mut self, index: usize, score: i32) {
        self.scores[index] = score;
    }

    #[inline]
    pub fn swap(&mut self, a: usize, b: usize) {
        self.moves.swap(a, b);
        self.scores.swap(a, b);
    }

    /// Sort `start..len` by descending score. Equal scores keep their
    /// generation order.
    pub fn sort_from(&mut self, start: usize) {
        for i in start + 1..self.len {
            let mut j = i;
            while j > start && self.scores[j - 1] < self.scores[j] {
                self.swap(j - 1, j);
                j -= 1;
            }
        }
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Move {
        &self.as_slice()[index]
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Push a pawn move, expanding it into the four promotions on the last rank.
fn push_pawn_move(list: &mut MoveList, from: Square, to: Square, pawn: Piece, captured: Option<Piece>) {
    if to.rank() == (!pawn.color()).back_rank() {
        for promo in PromotionPiece::ALL {
            list.push(Move::new(from, to, pawn, captured, MoveKind::Promotion(promo)));
        }
    } else {
        list.push(Move::new(from, to, pawn, captured, MoveKind::Ordinary));
    }
}

/// Direction set and range of a non-pawn piece kind.
fn piece_deltas(kind: PieceKind) -> (&'static [i8], bool) {
    match kind {
        PieceKind::Knight => (&KNIGHT_DELTAS, false),
        PieceKind::Bishop => (&BISHOP_DELTAS, true),
        PieceKind::Rook => (&ROOK_DELTAS, true),
        PieceKind::Queen => (&KING_DELTAS, true),
        PieceKind::King | PieceKind::Pawn => (&KING_DELTAS, false),
    }
}

const OFFICERS: [PieceKind; 5] = [
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
    PieceKind::King,
];

impl Position {
    /// Captures, en passant captures and all promotions (quiet or capturing).
    pub fn gen_caps(&self, list: &mut MoveList) {
        let us = self.side_to_move();
        let forward = us.forward();

        let pawn = Piece::new(PieceKind::Pawn, us);
        for &from in self.squares_of(pawn) {
            for side in [-1, 1] {
                let Some(to) = from.offset(forward + side) else {
                    continue;
                };
                if let Some(victim) = self.piece_at(to).filter(|p| p.color() != us) {
                    push_pawn_move(list, from, to, pawn, Some(victim));
                }
            }
            if from.rank() == us.seventh_rank()
                && let Some(to) = from.offset(forward).filter(|&sq| self.is_empty(sq))
            {
                push_pawn_move(list, from, to, pawn, None);
            }
        }
        if let Some(ep) = self.en_passant() {
            self.gen_en_passant(ep, list);
        }

        for kind in OFFICERS {
            let piece = Piece::new(kind, us);
            let (deltas, slides) = piece_deltas(kind);
            for &from in self.squares_of(piece) {
                for &delta in deltas {
                    let mut next = from.offset(delta);
                    while let Some(to) = next {
                        if let Some(occupant) = self.piece_at(to) {
                            if occupant.color() != us {
                                list.push(Move::new(from, to, piece, Some(occupant), MoveKind::Ordinary));
                            }
                            break;
                        }
                        if !slides {
                            break;
                        }
                        next = to.offset(delta);
                    }
                }
            }
        }
    }

    /// Quiet moves: pushes that do not promote, double pushes, piece moves
    /// to empty squares and castling.
    pub fn gen_noncaps(&self, list: &mut MoveList) {
        let us = self.side_to_move();
        let forward = us.forward();

        let pawn = Piece::new(PieceKind::Pawn, us);
        for &from in self.squares_of(pawn) {
            if from.rank() == us.seventh_rank() {
                continue;
            }
            let Some(single) = from.offset(forward).filter(|&sq| self.is_empty(sq)) else {
                continue;
            };
            list.push(Move::new(from, single, pawn, None, MoveKind::Ordinary));
            if from.rank() == us.pawn_rank()
                && let Some(double) = single.offset(forward).filter(|&sq| self.is_empty(sq))
            {
                list.push(Move::new(from, double, pawn, None, MoveKind::Ordinary));
            }
        }

        for kind in OFFICERS {
            let piece = Piece::new(kind, us);
            let (deltas, slides) = piece_deltas(kind);
            for &from in self.squares_of(piece) {
                for &delta in deltas {
                    let mut next = from.offset(delta);
                    while let Some(to) = next.filter(|&sq| self.is_empty(sq)) {
                        list.push(Move::new(from, to, piece, None, MoveKind::Ordinary));
                        if !slides {
                            break;
                        }
                        next = to.offset(delta);
                    }
                }
            }
        }

        let king = Piece::new(PieceKind::King, us);
        let rank = us.back_rank();
        let home = Square::new(rank, File::FileE);
        if self.can_castle(CastleSide::Short) {
            list.push(Move::new(home, Square::new(rank, File::FileG), king, None, MoveKind::ShortCastle));
        }
        if self.can_castle(CastleSide::Long) {
            list.push(Move::new(home, Square::new(rank, File::FileC), king, None, MoveKind::LongCastle));
        }
    }

    /// En passant captures landing on `ep`, provided the pawn that just
    /// double-pushed is actually behind it.
    pub(crate) fn gen_en_passant(&self, ep: Square, list: &mut MoveList) {
        let us = self.side_to_move();
        let victim = Piece::new(PieceKind::Pawn, !us);
        if ep.offset(-us.forward()).and_then(|sq| self.piece_at(sq)) != Some(victim) {
            return;
        }
        let pawn = Piece::new(PieceKind::Pawn, us);
        for side in [-1, 1] {
            if let Some(from) = ep.offset(-us.forward() + side).filter(|&sq| self.piece_at(sq) == Some(pawn)) {
                list.push(Move::new(from, ep, pawn, Some(victim), MoveKind::EnPassant));
            }
        }
    }

    /// Whether the pseudo-legal `mv` leaves the mover's own king safe.
    pub fn is_legal(&mut self, mv: Move) -> bool {
        let us = self.side_to_move();
        self.make_move(mv);
        let legal = !self.is_color_in_check(us);
        self.unmake_move(mv);
        legal
    }

    /// Every strictly legal move, captures first.
    pub fn gen_all_legal(&mut self) -> MoveList {
        let mut candidates = MoveList::new();
        self.gen_caps(&mut candidates);
        self.gen_noncaps(&mut candidates);

        let mut legal = MoveList::new();
        for mv in candidates.iter() {
            if self.is_legal(mv) {
                legal.push(mv);
            }
        }
        legal
    }

    /// Look up a coordinate-notation move (`e2e4`, `e7e8q`) among the legal moves.
    pub fn parse_uci_move(&mut self, text: &str) -> Result<Move, MoveParseError> {
        let malformed = || MoveParseError::Malformed { text: text.to_string() };
        if !text.is_ascii() || !(4..=5).contains(&text.len()) {
            return Err(malformed());
        }
        Square::from_algebraic(&text[0..2]).ok_or_else(malformed)?;
        Square::from_algebraic(&text[2..4]).ok_or_else(malformed)?;
        if text.len() == 5 && !matches!(&text[4..], "q" | "r" | "b" | "n") {
            return Err(malformed());
        }

        self.gen_all_legal()
            .iter()
            .find(|mv| mv.to_uci() == text)
            .ok_or_else(|| MoveParseError::Illegal { text: text.to_string() })
    }
}
