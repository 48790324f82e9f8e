//! Alpha-beta search with quiescence, and the root move loop.

use ochre_core::{Move, MoveList, PieceKind, Position};

use crate::eval::material::piece_value;
use crate::eval::{Evaluator, is_pawn_ending, material_eval};
use crate::search::control::SearchControl;
use crate::search::heuristics::{HistoryTable, KillerTable};
use crate::search::ordering::{MovePicker, Phase, is_losing_capture, score_quiescence};
use crate::search::rep::RepTable;
use crate::search::tt::{Bound, TranspositionTable};
use crate::search::{INFINITY, MATE_BOUND, MATE_VALUE, MAX_PLY};

/// Futility margins by remaining depth.
const FUTILITY_MARGIN: [i32; 6] = [0, 120, 120, 310, 310, 400];

/// Search state threaded through the recursion.
pub(super) struct SearchContext<'a> {
    pub pos: &'a mut Position,
    pub tt: &'a mut TranspositionTable,
    pub reps: &'a mut RepTable,
    pub evaluator: &'a mut Evaluator,
    pub killers: &'a mut KillerTable,
    pub history: &'a mut HistoryTable,
    pub control: &'a SearchControl,
    /// Search calls made so far, the cadence of the clock check.
    pub nodes: u64,
    /// Set once the control asked to stop; every score after it is void.
    pub stopped: bool,
}

impl SearchContext<'_> {
    fn poll_stop(&mut self) -> bool {
        self.nodes += 1;
        if !self.stopped && self.control.should_stop(self.nodes) {
            self.stopped = true;
        }
        self.stopped
    }

    fn evaluate(&mut self) -> i32 {
        self.evaluator.evaluate(self.pos)
    }
}

/// Alpha-beta search of the current position to `depth` plies.
///
/// `ply` is the distance from the root. Returns a score from the side to
/// move's view; once `ctx.stopped` is set the value is meaningless.
pub(super) fn alpha_beta(
    ctx: &mut SearchContext<'_>,
    depth: i32,
    mut alpha: i32,
    beta: i32,
    allow_null: bool,
    ply: usize,
) -> i32 {
    if ctx.poll_stop() {
        return 0;
    }

    let key = ctx.pos.key();
    if ply > 0 && (ctx.reps.exists(key) || ctx.pos.halfmove_clock() >= 100) {
        return 0;
    }
    if ply >= MAX_PLY - 1 {
        return ctx.evaluate();
    }

    let mut hash_move = Move::NULL;
    if let Some(entry) = ctx.tt.probe(key, ply) {
        hash_move = entry.best_move;
        if entry.depth >= depth {
            match entry.bound {
                Bound::Exact => return entry.score,
                Bound::Upper if entry.score <= alpha => return alpha,
                Bound::Lower if entry.score >= beta => return beta,
                _ => {}
            }
        }
    }

    let in_check = ctx.pos.is_in_check();
    let depth = if in_check { depth + 1 } else { depth };

    if depth <= 0 {
        return quiescence(ctx, alpha, beta, ply);
    }

    let pv_node = beta - alpha > 1;
    let mut threat = false;

    if !pv_node && allow_null && !in_check && depth > 1 && !is_pawn_ending(ctx.pos) {
        let reduction = if depth > 6 { 3 } else { 2 };
        ctx.pos.make_null_move();
        let score = -alpha_beta(ctx, depth - 1 - reduction, -beta, -beta + 1, false, ply + 1);
        ctx.pos.unmake_null_move();
        if ctx.stopped {
            return 0;
        }
        if score >= beta {
            return beta;
        }
        if score < -MATE_BOUND {
            threat = true;
        }
    }

    if hash_move.is_null() && pv_node && depth >= 5 {
        alpha_beta(ctx, depth - 2, alpha, beta, true, ply);
        if ctx.stopped {
            return 0;
        }
        if let Some(mv) = ctx.tt.best_move(key) {
            hash_move = mv;
        }
    }
    if !hash_move.is_null() && !ctx.pos.validate_hash_move(hash_move) {
        hash_move = Move::NULL;
    }

    ctx.reps.record(key);

    let futile = !in_check
        && depth <= 5
        && alpha.abs() < MATE_BOUND
        && material_eval(ctx.pos) + FUTILITY_MARGIN[depth as usize] <= alpha;
    let futility_base = if futile {
        material_eval(ctx.pos) + FUTILITY_MARGIN[depth as usize]
    } else {
        0
    };

    let mover = ctx.pos.side_to_move();
    let mut picker = MovePicker::new(hash_move, ctx.killers.get(ply));
    let mut searched = 0;
    let mut best_move = Move::NULL;
    let mut bound = Bound::Upper;

    while let Some((mv, phase)) = picker.next(ctx.pos, ctx.history) {
        let pawn_push_threat =
            mv.piece().kind() == PieceKind::Pawn && mv.to().rank() == mover.seventh_rank();
        let move_threat = threat || pawn_push_threat;

        ctx.pos.make_move(mv);
        if ctx.pos.is_color_in_check(mover) {
            ctx.pos.unmake_move(mv);
            continue;
        }
        let gives_check = ctx.pos.is_in_check();

        if futile && searched >= 1 && !move_threat && !gives_check {
            let gain = mv.captured().map_or(0, |p| piece_value(p.kind()))
                + mv.promotion().map_or(0, piece_value);
            if futility_base + gain <= alpha {
                ctx.pos.unmake_move(mv);
                continue;
            }
        }

        ctx.history.record_try(mv, depth);

        let score = if searched == 0 {
            -alpha_beta(ctx, depth - 1, -beta, -alpha, true, ply + 1)
        } else {
            let reduce = searched > 3
                && phase == Phase::Quiets
                && depth > 3
                && !move_threat
                && !gives_check
                && !in_check;
            let mut score = if reduce {
                -alpha_beta(ctx, depth - 2, -alpha - 1, -alpha, true, ply + 1)
            } else {
                alpha + 1
            };
            if score > alpha {
                score = -alpha_beta(ctx, depth - 1, -alpha - 1, -alpha, true, ply + 1);
                if score > alpha && score < beta {
                    score = -alpha_beta(ctx, depth - 1, -beta, -alpha, true, ply + 1);
                }
            }
            score
        };
        ctx.pos.unmake_move(mv);
        searched += 1;

        if ctx.stopped {
            ctx.reps.remove(key);
            return 0;
        }

        if score >= beta {
            ctx.history.record_hit(mv, depth);
            ctx.tt.record(key, mv, depth, score, Bound::Lower, ply);
            ctx.reps.remove(key);
            if !mv.is_capture() && mv.promotion().is_none() {
                ctx.killers.store(ply, mv);
            }
            return score;
        }
        if score > alpha {
            alpha = score;
            best_move = mv;
            bound = Bound::Exact;
        }
    }

    ctx.reps.remove(key);

    if searched == 0 {
        return if in_check { MATE_VALUE + ply as i32 } else { 0 };
    }

    let stored_move = if best_move.is_null() { hash_move } else { best_move };
    ctx.tt.record(key, stored_move, depth, alpha, bound, ply);
    alpha
}

/// Captures and promotions until the position is quiet. Fail-hard.
fn quiescence(ctx: &mut SearchContext<'_>, mut alpha: i32, beta: i32, ply: usize) -> i32 {
    if ctx.poll_stop() {
        return 0;
    }
    if ply >= MAX_PLY - 1 {
        return ctx.evaluate();
    }

    let in_check = ctx.pos.is_in_check();
    if !in_check {
        let stand_pat = ctx.evaluate();
        if stand_pat >= beta {
            return beta;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }
    }

    let mut moves = MoveList::new();
    if in_check {
        ctx.pos.gen_check_evasions(&mut moves);
    } else {
        ctx.pos.gen_caps(&mut moves);
    }
    for i in 0..moves.len() {
        moves.set_score(i, score_quiescence(moves[i]));
    }
    moves.sort_from(0);

    let mover = ctx.pos.side_to_move();
    let mut legal = 0;
    for mv in moves.iter() {
        if !in_check && is_losing_capture(ctx.pos, mv) {
            continue;
        }
        ctx.pos.make_move(mv);
        if ctx.pos.is_color_in_check(mover) {
            ctx.pos.unmake_move(mv);
            continue;
        }
        legal += 1;
        let score = -quiescence(ctx, -beta, -alpha, ply + 1);
        ctx.pos.unmake_move(mv);

        if ctx.stopped {
            return 0;
        }
        if score >= beta {
            return beta;
        }
        if score > alpha {
            alpha = score;
        }
    }

    if in_check && legal == 0 {
        return MATE_VALUE + ply as i32;
    }
    alpha
}

/// Give every root move a first ordering score from a quiescence search
/// of the position after it, best first.
pub(super) fn seed_root_order(ctx: &mut SearchContext<'_>, moves: &mut MoveList) {
    for i in 0..moves.len() {
        let mv = moves[i];
        ctx.pos.make_move(mv);
        let score = -alpha_beta(ctx, 0, -INFINITY, INFINITY, true, 1);
        ctx.pos.unmake_move(mv);
        moves.set_score(i, score);
    }
    moves.sort_from(0);
}

/// One pass over the root moves at `depth` inside `(alpha, beta)`.
///
/// `best` is searched first and is replaced whenever a move raises alpha.
/// Each move's ordering score grows by the nodes spent below it. Returns
/// `alpha` on a fail low and `beta` on a fail high.
pub(super) fn search_root(
    ctx: &mut SearchContext<'_>,
    moves: &mut MoveList,
    best: &mut Move,
    depth: i32,
    mut alpha: i32,
    beta: i32,
) -> i32 {
    let found = moves.iter().position(|mv| mv == *best);
    if let Some(index) = found {
        moves.swap(0, index);
        moves.sort_from(1);
    }

    let key = ctx.pos.key();
    let in_check = ctx.pos.is_in_check();

    for i in 0..moves.len() {
        let mv = moves[i];
        let nodes_before = ctx.nodes;

        ctx.pos.make_move(mv);
        let gives_check = ctx.pos.is_in_check();
        let score = if i == 0 {
            -alpha_beta(ctx, depth - 1, -beta, -alpha, true, 1)
        } else {
            let reduce = i > 3 && depth > 3 && !in_check && !gives_check && !mv.is_capture();
            let mut score = if reduce {
                -alpha_beta(ctx, depth - 2, -alpha - 1, -alpha, true, 1)
            } else {
                alpha + 1
            };
            if score > alpha {
                score = -alpha_beta(ctx, depth - 1, -alpha - 1, -alpha, true, 1);
                if score > alpha && score < beta {
                    score = -alpha_beta(ctx, depth - 1, -beta, -alpha, true, 1);
                }
            }
            score
        };
        ctx.pos.unmake_move(mv);

        if ctx.stopped {
            return alpha;
        }

        let spent = (ctx.nodes - nodes_before).min(i32::MAX as u64) as i32;
        moves.set_score(i, moves.score(i).saturating_add(spent));

        if score > alpha {
            *best = mv;
            if score >= beta {
                ctx.tt.record(key, mv, depth, beta, Bound::Lower, 0);
                return beta;
            }
            alpha = score;
            ctx.tt.record(key, mv, depth, alpha, Bound::Exact, 0);
        }
    }
    alpha
}
