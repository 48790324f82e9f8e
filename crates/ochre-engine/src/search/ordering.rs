//! Staged move ordering for the main search and capture ordering for
//! quiescence.
//!
//! The main-search picker hands out moves in phases and only generates a
//! phase's moves when the previous phase is exhausted, so a cutoff on the
//! hash move or a good capture never pays for quiet move generation.

use ochre_core::{Move, MoveList, PieceKind, Position};

use crate::eval::material::piece_value;
use crate::search::heuristics::HistoryTable;
use crate::search::see::see;

/// The phase a move was handed out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Hash,
    GoodCaptures,
    Killers,
    Quiets,
    LosingCaptures,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Hash,
    GenCaptures,
    GoodCaptures,
    Killers,
    GenQuiets,
    Quiets,
    LosingCaptures,
    Done,
}

/// Ordering bonus of a queen promotion in quiescence.
const QUEEN_PROMOTION: i32 = 250_000;

/// Hands out pseudo-legal moves one at a time: the hash move, captures
/// with a non-negative exchange, killers, quiet moves by history, then the
/// losing captures. Legality is left to the caller.
pub struct MovePicker {
    stage: Stage,
    hash_move: Move,
    killers: [Move; 2],
    killer_index: usize,
    captures: MoveList,
    capture_index: usize,
    quiets: MoveList,
    quiet_index: usize,
}

impl MovePicker {
    /// `hash_move` must already be validated for the position (or be
    /// `Move::NULL`).
    pub fn new(hash_move: Move, killers: [Move; 2]) -> Self {
        Self {
            stage: Stage::Hash,
            hash_move,
            killers,
            killer_index: 0,
            captures: MoveList::new(),
            capture_index: 0,
            quiets: MoveList::new(),
            quiet_index: 0,
        }
    }

    pub fn next(&mut self, pos: &Position, history: &HistoryTable) -> Option<(Move, Phase)> {
        loop {
            match self.stage {
                Stage::Hash => {
                    self.stage = Stage::GenCaptures;
                    if !self.hash_move.is_null() {
                        return Some((self.hash_move, Phase::Hash));
                    }
                }
                Stage::GenCaptures => {
                    pos.gen_caps(&mut self.captures);
                    for i in 0..self.captures.len() {
                        let score = see(pos, self.captures[i]);
                        self.captures.set_score(i, score);
                    }
                    self.captures.sort_from(0);
                    self.stage = Stage::GoodCaptures;
                }
                Stage::GoodCaptures => {
                    if self.capture_index >= self.captures.len()
                        || self.captures.score(self.capture_index) < 0
                    {
                        self.stage = Stage::Killers;
                        continue;
                    }
                    let mv = self.captures[self.capture_index];
                    self.capture_index += 1;
                    if mv != self.hash_move {
                        return Some((mv, Phase::GoodCaptures));
                    }
                }
                Stage::Killers => {
                    if self.killer_index >= self.killers.len() {
                        self.stage = Stage::GenQuiets;
                        continue;
                    }
                    let mv = self.killers[self.killer_index];
                    self.killer_index += 1;
                    if !mv.is_null() && mv != self.hash_move && pos.validate_killer(mv) {
                        return Some((mv, Phase::Killers));
                    }
                }
                Stage::GenQuiets => {
                    pos.gen_noncaps(&mut self.quiets);
                    for i in 0..self.quiets.len() {
                        let score = history.score(self.quiets[i]);
                        self.quiets.set_score(i, score);
                    }
                    self.quiets.sort_from(0);
                    self.stage = Stage::Quiets;
                }
                Stage::Quiets => {
                    if self.quiet_index >= self.quiets.len() {
                        self.stage = Stage::LosingCaptures;
                        continue;
                    }
                    let mv = self.quiets[self.quiet_index];
                    self.quiet_index += 1;
                    if mv != self.hash_move && !self.killers.contains(&mv) {
                        return Some((mv, Phase::Quiets));
                    }
                }
                Stage::LosingCaptures => {
                    if self.capture_index >= self.captures.len() {
                        self.stage = Stage::Done;
                        continue;
                    }
                    let mv = self.captures[self.capture_index];
                    self.capture_index += 1;
                    if mv != self.hash_move {
                        return Some((mv, Phase::LosingCaptures));
                    }
                }
                Stage::Done => return None,
            }
        }
    }
}

/// Quiescence ordering: queen promotions first, then most valuable victim
/// by least valuable attacker.
pub fn score_quiescence(mv: Move) -> i32 {
    if mv.promotion() == Some(PieceKind::Queen) {
        return QUEEN_PROMOTION;
    }
    let victim = mv.captured().map_or(0, |p| piece_value(p.kind()));
    256 * victim - piece_value(mv.piece().kind())
}

/// Whether quiescence should skip `mv`: a capture by a more valuable piece
/// that loses material on the exchange. Queen promotions are never skipped.
pub fn is_losing_capture(pos: &Position, mv: Move) -> bool {
    if mv.promotion() == Some(PieceKind::Queen) {
        return false;
    }
    let victim = mv.captured().map_or(0, |p| piece_value(p.kind()));
    victim < piece_value(mv.piece().kind()) && see(pos, mv) < 0
}
