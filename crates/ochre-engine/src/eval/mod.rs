//! Static evaluation: tapered material and piece-square scores, pawn
//! structure, mobility, king safety and rook placement, with hash caches in
//! front.

pub mod cache;
pub mod king_safety;
pub mod material;
pub mod mobility;
pub mod pawns;
pub mod phase;
pub mod pst;
pub mod rooks;
pub mod score;

use ochre_core::{Color, PieceKind, Piece, Position};

use self::cache::{EvalTable, PawnTable};
use self::king_safety::king_safety;
use self::material::{insufficient_material, material};
use self::mobility::mobility;
use self::pawns::pawn_structure;
use self::phase::game_phase;
use self::pst::pst_value;
use self::rooks::rooks;
use self::score::Score;

pub use self::material::material_eval;
pub use self::phase::is_pawn_ending;

/// Default size of each evaluation cache in megabytes.
pub const DEFAULT_CACHE_MB: usize = 8;

/// Evaluator with its own pawn and evaluation caches.
pub struct Evaluator {
    pawns: PawnTable,
    evals: EvalTable,
}

impl Evaluator {
    pub fn new(eval_mb: usize, pawn_mb: usize) -> Evaluator {
        Evaluator {
            pawns: PawnTable::new(pawn_mb),
            evals: EvalTable::new(eval_mb),
        }
    }

    pub fn clear(&mut self) {
        self.pawns.clear();
        self.evals.clear();
    }

    /// Score in centipawns from the side to move's view.
    pub fn evaluate(&mut self, pos: &Position) -> i32 {
        let white_view = match self.evals.probe(pos.key()) {
            Some(cached) => cached,
            None => {
                let fresh = self.white_view(pos);
                self.evals.store(pos.key(), fresh);
                fresh
            }
        };
        match pos.side_to_move() {
            Color::White => white_view,
            Color::Black => -white_view,
        }
    }

    fn white_view(&mut self, pos: &Position) -> i32 {
        if insufficient_material(pos) {
            return 0;
        }

        let pawn_score = match self.pawns.probe(pos.pawn_key()) {
            Some(score) => score,
            None => {
                let score = pawn_structure(pos);
                self.pawns.store(pos.pawn_key(), score);
                score
            }
        };

        let total = material(pos)
            + placement(pos)
            + pawn_score
            + mobility(pos)
            + king_safety(pos)
            + rooks(pos);
        total.taper(game_phase(pos))
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::new(DEFAULT_CACHE_MB, DEFAULT_CACHE_MB)
    }
}

/// Piece-square sum, White minus Black.
fn placement(pos: &Position) -> Score {
    let mut score = Score::ZERO;
    for kind in PieceKind::ALL {
        let white = Piece::new(kind, Color::White);
        let black = Piece::new(kind, Color::Black);
        for &sq in pos.squares_of(white) {
            score += pst_value(white, sq);
        }
        for &sq in pos.squares_of(black) {
            score -= pst_value(black, sq);
        }
    }
    score
}
