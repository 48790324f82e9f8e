//! Iterative deepening, aspiration windows and the tables the search owns.

pub mod control;
pub mod heuristics;
mod negamax;
pub mod ordering;
pub mod rep;
pub mod see;
pub mod tt;

use ochre_core::{Move, Position};
use tracing::debug;

use crate::eval::Evaluator;
use control::SearchControl;
use heuristics::{HistoryTable, KillerTable};
use negamax::{SearchContext, search_root, seed_root_order};
use rep::RepTable;
use tt::TranspositionTable;

/// Score of being checkmated at the root; mated at ply `p` scores
/// `MATE_VALUE + p`.
pub const MATE_VALUE: i32 = -31_999;

/// Scores beyond this magnitude announce a forced mate.
pub const MATE_BOUND: i32 = 31_000;

/// Bound on every score the search produces.
pub const INFINITY: i32 = 32_000;

/// Maximum search depth (in plies) for array sizing and recursion limits.
pub const MAX_PLY: usize = 128;

/// Default transposition table size in megabytes.
pub const DEFAULT_HASH_MB: usize = 16;

/// Half-widths of the aspiration window, widened after each failure on
/// the same side. After the last one the window opens fully.
const ASPIRATION: [i32; 3] = [60, 100, 200];

/// Score of delivering mate on the next move.
const MATE_IN_ONE: i32 = -MATE_VALUE - 1;

/// Convert a mate score to UCI's "mate in N moves" (negative when being
/// mated). `None` for ordinary scores.
pub fn mate_in(score: i32) -> Option<i32> {
    if score > MATE_BOUND {
        let plies = -MATE_VALUE - score;
        Some((plies + 1) / 2)
    } else if score < -MATE_BOUND {
        let plies = score - MATE_VALUE;
        Some(-((plies + 1) / 2))
    } else {
        None
    }
}

/// Result of a completed search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best move found at the highest completed depth.
    /// `Move::NULL` only when there is no legal move.
    pub best_move: Move,
    /// Second move in the PV — the expected reply (for pondering).
    pub ponder_move: Option<Move>,
    /// Full principal variation line.
    pub pv: Vec<Move>,
    /// Evaluation score in centipawns from the engine's perspective.
    pub score: i32,
    /// Total nodes visited during the search.
    pub nodes: u64,
    /// Depth reached.
    pub depth: i32,
}

/// Iterative-deepening searcher with its transposition table, evaluator
/// and ordering heuristics.
pub struct Searcher {
    tt: TranspositionTable,
    evaluator: Evaluator,
    killers: KillerTable,
    history: HistoryTable,
}

impl Searcher {
    /// Create a fresh searcher with a [`DEFAULT_HASH_MB`] transposition table.
    pub fn new() -> Self {
        Self::with_tables(DEFAULT_HASH_MB, Evaluator::default())
    }

    pub fn with_tables(hash_mb: usize, evaluator: Evaluator) -> Self {
        Self {
            tt: TranspositionTable::new(hash_mb),
            evaluator,
            killers: KillerTable::new(),
            history: HistoryTable::new(),
        }
    }

    /// Forget everything learned in earlier searches.
    pub fn clear(&mut self) {
        self.tt.clear();
        self.evaluator.clear();
        self.killers.clear();
        self.history.clear();
    }

    /// Resize the transposition table to the given size in megabytes.
    pub fn resize_tt(&mut self, mb: usize) {
        self.tt = TranspositionTable::new(mb);
    }

    /// Swap in a new evaluator (after its cache sizes changed).
    pub fn set_evaluator(&mut self, evaluator: Evaluator) {
        self.evaluator = evaluator;
    }

    /// Run iterative-deepening search up to `max_depth`.
    ///
    /// `reps` holds the keys of the game so far; the search leaves it as it
    /// found it. Calls `on_iter(depth, score, nodes, pv)` after each
    /// completed iteration, allowing the caller to emit UCI `info` lines.
    pub fn search<F>(
        &mut self,
        pos: &mut Position,
        max_depth: i32,
        control: &SearchControl,
        reps: &mut RepTable,
        mut on_iter: F,
    ) -> SearchResult
    where
        F: FnMut(i32, i32, u64, &[Move]),
    {
        let mut root_moves = pos.gen_all_legal();
        if root_moves.is_empty() {
            let score = if pos.is_in_check() { MATE_VALUE } else { 0 };
            debug!(score, "no legal moves at the root");
            return SearchResult {
                best_move: Move::NULL,
                ponder_move: None,
                pv: Vec::new(),
                score,
                nodes: 0,
                depth: 0,
            };
        }

        self.killers.clear();
        self.history.clear();
        let root_key = pos.key();
        reps.record(root_key);

        let mut ctx = SearchContext {
            pos: &mut *pos,
            tt: &mut self.tt,
            reps: &mut *reps,
            evaluator: &mut self.evaluator,
            killers: &mut self.killers,
            history: &mut self.history,
            control,
            nodes: 0,
            stopped: false,
        };

        seed_root_order(&mut ctx, &mut root_moves);

        let mut best = root_moves[0];
        let mut completed_score = root_moves.score(0);
        let mut completed_depth = 0;
        let mut completed_pv = vec![best];

        for depth in 1..=max_depth.max(1) {
            if ctx.stopped || (depth > 1 && control.should_stop_iterating()) {
                break;
            }

            let mut candidate = best;
            let mut fails = (0usize, 0usize);
            let (mut alpha, mut beta) = if depth == 1 {
                (-INFINITY, INFINITY)
            } else {
                (completed_score - ASPIRATION[0], completed_score + ASPIRATION[0])
            };

            let score = loop {
                let score = search_root(&mut ctx, &mut root_moves, &mut candidate, depth, alpha, beta);
                if ctx.stopped {
                    break score;
                }
                if score <= alpha && alpha > -INFINITY {
                    fails.0 += 1;
                    alpha = widen(completed_score, fails.0, -1);
                } else if score >= beta && beta < INFINITY {
                    fails.1 += 1;
                    beta = widen(completed_score, fails.1, 1);
                } else {
                    break score;
                }
                debug!(depth, alpha, beta, "aspiration re-search");
            };

            if ctx.stopped {
                break;
            }

            best = candidate;
            completed_score = score;
            completed_depth = depth;
            completed_pv = ctx.tt.collect_pv(ctx.pos);
            if completed_pv.first() != Some(&best) {
                completed_pv = vec![best];
            }

            on_iter(depth, score, ctx.nodes, &completed_pv);

            if score == MATE_IN_ONE {
                break;
            }
        }

        let nodes = ctx.nodes;
        reps.remove(root_key);

        SearchResult {
            best_move: best,
            ponder_move: completed_pv.get(1).copied(),
            pv: completed_pv,
            score: completed_score,
            nodes,
            depth: completed_depth,
        }
    }
}

/// Bound of the aspiration window after `fails` failures on one side
/// (`sign` -1 for alpha, +1 for beta).
fn widen(center: i32, fails: usize, sign: i32) -> i32 {
    match ASPIRATION.get(fails) {
        Some(&width) => center + sign * width,
        None => sign * INFINITY,
    }
}

impl std::fmt::Debug for Searcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Searcher").field("tt", &self.tt).finish()
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new()
    }
}
