//! The mutable game state searched by the engine.
//!
//! A [`Position`] is created once (from FEN or the start position) and then
//! mutated in place with [`Position::make_move`] / [`Position::unmake_move`].
//! Every make pushes an [`Undo`] record, and every unmake pops one, so a
//! search can walk the whole tree on a single instance.

mod attack;
mod make;
mod piece_list;
mod validate;

use std::fmt;

use crate::castle_rights::CastleRights;
use crate::color::Color;
use crate::coords::{File, Rank};
use crate::error::PositionError;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::square::Square;
use crate::zobrist;

pub use attack::SquareSet;
pub use piece_list::{PieceLists, MAX_PER_PIECE};

/// Reversible state saved by every make, restored by the matching unmake.
///
/// The captured piece itself travels inside the move; the slot fields
/// remember where removed pieces sat in their lists so unmake restores the
/// lists in their exact prior order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Undo {
    en_passant: Option<Square>,
    castling: CastleRights,
    halfmove_clock: u16,
    key: u64,
    pawn_key: u64,
    captured_slot: u8,
    mover_slot: u8,
}

/// Board contents plus all game state needed to generate and unmake moves.
#[derive(Clone, PartialEq, Eq)]
pub struct Position {
    squares: [Option<Piece>; Square::SLOTS],
    lists: PieceLists,
    side_to_move: Color,
    castling: CastleRights,
    en_passant: Option<Square>,
    halfmove_clock: u16,
    fullmove_number: u16,
    key: u64,
    pawn_key: u64,
    history: Vec<Undo>,
}

impl Position {
    /// An empty board, White to move. Only used while assembling a position.
    fn empty() -> Position {
        Position {
            squares: [None; Square::SLOTS],
            lists: PieceLists::new(),
            side_to_move: Color::White,
            castling: CastleRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            key: 0,
            pawn_key: 0,
            history: Vec::with_capacity(256),
        }
    }

    /// The standard initial position.
    pub fn startpos() -> Position {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut placement = Vec::with_capacity(32);
        for (file, kind) in File::ALL.into_iter().zip(BACK_RANK) {
            placement.push((Square::new(Rank::Rank1, file), Piece::new(kind, Color::White)));
            placement.push((Square::new(Rank::Rank2, file), Piece::WHITE_PAWN));
            placement.push((Square::new(Rank::Rank7, file), Piece::BLACK_PAWN));
            placement.push((Square::new(Rank::Rank8, file), Piece::new(kind, Color::Black)));
        }
        let mut pos = Position::empty();
        for (sq, piece) in placement {
            pos.squares[sq.index()] = Some(piece);
            pos.lists.add(piece, sq);
        }
        pos.castling = CastleRights::ALL;
        pos.refresh_keys();
        pos
    }

    /// Assemble a validated position from its parts. Used by FEN parsing.
    pub(crate) fn from_parts(
        placement: &[(Square, Piece)],
        side_to_move: Color,
        castling: CastleRights,
        en_passant: Option<Square>,
        halfmove_clock: u16,
        fullmove_number: u16,
    ) -> Result<Position, PositionError> {
        let mut pos = Position::empty();
        for &(sq, piece) in placement {
            if piece.kind() == PieceKind::Pawn
                && matches!(sq.rank(), Rank::Rank1 | Rank::Rank8)
            {
                return Err(PositionError::PawnOnBackRank { square: sq.to_string() });
            }
            if !pos.lists.add(piece, sq) {
                return Err(PositionError::TooManyPieces {
                    piece: piece.fen_char(),
                    count: MAX_PER_PIECE + 1,
                });
            }
            pos.squares[sq.index()] = Some(piece);
        }
        for color in Color::ALL {
            let count = pos.lists.count(Piece::new(PieceKind::King, color));
            if count != 1 {
                return Err(PositionError::InvalidKingCount { color, count });
            }
        }
        pos.side_to_move = side_to_move;
        pos.castling = castling;
        pos.en_passant = en_passant;
        pos.halfmove_clock = halfmove_clock;
        pos.fullmove_number = fullmove_number.max(1);
        pos.refresh_keys();

        let waiting = !side_to_move;
        if pos
            .king_square(waiting)
            .is_some_and(|king| pos.is_attacked(king, side_to_move))
        {
            return Err(PositionError::OpponentInCheck { color: waiting });
        }
        Ok(pos)
    }

    fn refresh_keys(&mut self) {
        self.key = self.key_from_scratch();
        self.pawn_key = self.pawn_key_from_scratch();
    }

    /// The position key recomputed from the board, ignoring the incremental value.
    pub fn key_from_scratch(&self) -> u64 {
        let mut key = 0;
        for sq in Square::all() {
            if let Some(piece) = self.squares[sq.index()] {
                key ^= zobrist::piece_square(piece, sq);
            }
        }
        if self.side_to_move == Color::Black {
            key ^= zobrist::black_to_move();
        }
        key ^= zobrist::castling(self.castling);
        if let Some(ep) = self.en_passant {
            key ^= zobrist::en_passant(ep);
        }
        key
    }

    /// The pawn key recomputed from the board.
    pub fn pawn_key_from_scratch(&self) -> u64 {
        [Piece::WHITE_PAWN, Piece::BLACK_PAWN]
            .into_iter()
            .flat_map(|pawn| self.lists.squares(pawn).iter().map(move |&sq| zobrist::piece_square(pawn, sq)))
            .fold(0, |key, k| key ^ k)
    }

    /// Check that board array, piece lists and both keys agree.
    ///
    /// Cheap enough for tests and diagnostics, far too slow for the search.
    pub fn is_consistent(&self) -> bool {
        let mut listed = 0;
        for piece in Piece::ALL {
            for &sq in self.lists.squares(piece) {
                if self.squares[sq.index()] != Some(piece)
                    || self.lists.squares(piece)[self.lists.slot_of(sq)] != sq
                {
                    return false;
                }
                listed += 1;
            }
        }
        let occupied = Square::all().filter(|sq| self.squares[sq.index()].is_some()).count();
        listed == occupied
            && self.key == self.key_from_scratch()
            && self.pawn_key == self.pawn_key_from_scratch()
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()]
    }

    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.squares[sq.index()].is_none()
    }

    /// Squares holding `piece`, in list order.
    #[inline]
    pub fn squares_of(&self, piece: Piece) -> &[Square] {
        self.lists.squares(piece)
    }

    #[inline]
    pub fn count(&self, piece: Piece) -> usize {
        self.lists.count(piece)
    }

    pub(crate) fn lists(&self) -> &PieceLists {
        &self.lists
    }

    /// `None` only if the position has been corrupted by an illegal sequence.
    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.lists
            .squares(Piece::new(PieceKind::King, color))
            .first()
            .copied()
    }

    /// Number of knights, bishops, rooks and queens `color` has.
    pub fn non_pawn_pieces(&self, color: Color) -> usize {
        [PieceKind::Knight, PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen]
            .into_iter()
            .map(|kind| self.lists.count(Piece::new(kind, color)))
            .sum()
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastleRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    #[inline]
    pub fn key(&self) -> u64 {
        self.key
    }

    #[inline]
    pub fn pawn_key(&self) -> u64 {
        self.pawn_key
    }

    /// Moves made (including null moves) since the position was created.
    #[inline]
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    pub fn pretty(&self) -> PrettyPosition<'_> {
        PrettyPosition(self)
    }

    // Board mutation helpers shared by make/unmake. Each keeps the board
    // array, the piece lists and both keys in step.

    #[inline]
    fn toggle_keys(&mut self, piece: Piece, sq: Square) {
        let k = zobrist::piece_square(piece, sq);
        self.key ^= k;
        if piece.kind() == PieceKind::Pawn {
            self.pawn_key ^= k;
        }
    }

    #[inline]
    fn put(&mut self, piece: Piece, sq: Square) {
        self.squares[sq.index()] = Some(piece);
        self.lists.add(piece, sq);
        self.toggle_keys(piece, sq);
    }

    #[inline]
    fn put_at_slot(&mut self, piece: Piece, sq: Square, slot: u8) {
        self.squares[sq.index()] = Some(piece);
        self.lists.restore(piece, sq, slot);
        self.toggle_keys(piece, sq);
    }

    #[inline]
    fn take(&mut self, piece: Piece, sq: Square) -> u8 {
        self.squares[sq.index()] = None;
        self.toggle_keys(piece, sq);
        self.lists.remove(piece, sq)
    }

    #[inline]
    fn shift(&mut self, piece: Piece, from: Square, to: Square) {
        self.squares[from.index()] = None;
        self.squares[to.index()] = Some(piece);
        self.lists.relocate(piece, from, to);
        self.toggle_keys(piece, from);
        self.toggle_keys(piece, to);
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::startpos()
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position(\"{self}\")")
    }
}

/// Renders the board as an 8x8 diagram, rank 8 on top.
pub struct PrettyPosition<'a>(&'a Position);

impl fmt::Display for PrettyPosition<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.into_iter().rev() {
            write!(f, "{rank} ")?;
            for file in File::ALL {
                let c = self.0.piece_at(Square::new(rank, file)).map_or('.', Piece::fen_char);
                write!(f, " {c}")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "   a b c d e f g h")?;
        write!(f, "key: {:016x}", self.0.key())
    }
}
