//! Static Exchange Evaluation (SEE).
//!
//! Plays out the capture sequence on one square with both sides always
//! recapturing with their cheapest piece, and either side free to stop.
//! Sliders standing behind a piece that has just captured join the
//! exchange as x-rays.

use ochre_core::attacks::{attack_kind, step, BISHOP_DELTAS, KING_DELTAS, KNIGHT_DELTAS, ROOK_DELTAS};
use ochre_core::{Color, Move, Piece, PieceKind, Position, Square};

/// Exchange values in pawns, indexed by `PieceKind::index()`.
const SEE_VALUE: [i32; 6] = [1, 3, 3, 5, 9, 99];

/// Longest possible swap list: every piece of both sides plus the victim.
const MAX_SWAPS: usize = 33;

fn value(kind: PieceKind) -> i32 {
    SEE_VALUE[kind.index()]
}

/// The pieces of one side that can still join the exchange.
struct Attackers {
    list: [(Square, i32); 16],
    len: usize,
}

impl Attackers {
    fn new() -> Self {
        Self {
            list: [(Square::A1, 0); 16],
            len: 0,
        }
    }

    fn push(&mut self, sq: Square, value: i32) {
        if self.len < self.list.len() {
            self.list[self.len] = (sq, value);
            self.len += 1;
        }
    }

    /// Remove and return the cheapest attacker.
    fn pop_cheapest(&mut self) -> Option<(Square, i32)> {
        let best = (0..self.len).min_by_key(|&i| self.list[i].1)?;
        let picked = self.list[best];
        self.len -= 1;
        self.list[best] = self.list[self.len];
        Some(picked)
    }
}

struct Exchange<'a> {
    pos: &'a Position,
    target: Square,
    sides: [Attackers; 2],
}

impl<'a> Exchange<'a> {
    /// Gather every piece bearing on `target` except the one on `skip`.
    fn new(pos: &'a Position, target: Square, skip: Square) -> Self {
        let mut exchange = Self {
            pos,
            target,
            sides: [Attackers::new(), Attackers::new()],
        };

        for (color, deltas) in [(Color::White, [-15, -17]), (Color::Black, [15, 17])] {
            for delta in deltas {
                if let Some(sq) = target.offset(delta)
                    && sq != skip
                    && pos.piece_at(sq).is_some_and(|p| p.color() == color && p.kind() == PieceKind::Pawn)
                {
                    exchange.add(sq, color, PieceKind::Pawn);
                }
            }
        }

        for (deltas, kind) in [(&KNIGHT_DELTAS, PieceKind::Knight), (&KING_DELTAS, PieceKind::King)] {
            for &delta in deltas {
                if let Some(sq) = target.offset(delta)
                    && sq != skip
                    && let Some(piece) = pos.piece_at(sq)
                    && piece.kind() == kind
                {
                    exchange.add(sq, piece.color(), kind);
                }
            }
        }

        for (deltas, slider) in [(&ROOK_DELTAS, PieceKind::Rook), (&BISHOP_DELTAS, PieceKind::Bishop)] {
            for &delta in deltas {
                if let Some((sq, piece)) = exchange.first_piece(target, delta)
                    && sq != skip
                    && (piece.kind() == slider || piece.kind() == PieceKind::Queen)
                {
                    exchange.add(sq, piece.color(), piece.kind());
                }
            }
        }

        exchange
    }

    fn add(&mut self, sq: Square, color: Color, kind: PieceKind) {
        self.sides[color.index()].push(sq, value(kind));
    }

    /// First occupied square walking from `from` (exclusive) by `delta`.
    fn first_piece(&self, from: Square, delta: i8) -> Option<(Square, Piece)> {
        let mut current = from.offset(delta);
        while let Some(sq) = current {
            if let Some(piece) = self.pos.piece_at(sq) {
                return Some((sq, piece));
            }
            current = sq.offset(delta);
        }
        None
    }

    /// A piece on `vacated` has left for the target; a slider lined up
    /// behind it now attacks the target too.
    fn add_hidden(&mut self, vacated: Square) {
        let relation = attack_kind(self.target, vacated);
        let slider = if relation.is_diagonal() {
            PieceKind::Bishop
        } else if relation.is_orthogonal() {
            PieceKind::Rook
        } else {
            return;
        };
        let delta = step(self.target, vacated);
        if let Some((sq, piece)) = self.first_piece(vacated, delta)
            && (piece.kind() == slider || piece.kind() == PieceKind::Queen)
        {
            self.add(sq, piece.color(), piece.kind());
        }
    }
}

/// Material balance in centipawns of the exchange started by `mv`, from
/// the mover's view. Non-captures score 0.
pub fn see(pos: &Position, mv: Move) -> i32 {
    let Some(victim) = mv.captured() else {
        return 0;
    };

    let mut exchange = Exchange::new(pos, mv.to(), mv.from());
    let mut scores = [0i32; MAX_SWAPS];
    scores[0] = value(victim.kind());
    let mut on_target = value(mv.piece().kind());
    let mut side = !mv.piece().color();
    exchange.add_hidden(mv.from());

    let mut n = 1;
    while n < MAX_SWAPS {
        let Some((sq, attacker_value)) = exchange.sides[side.index()].pop_cheapest() else {
            break;
        };
        scores[n] = on_target - scores[n - 1];
        on_target = attacker_value;
        exchange.add_hidden(sq);
        side = !side;
        n += 1;
    }

    for i in (1..n).rev() {
        if scores[i - 1] > -scores[i] {
            scores[i - 1] = -scores[i];
        }
    }
    scores[0] * 100
}
