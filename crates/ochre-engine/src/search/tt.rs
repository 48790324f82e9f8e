//! Transposition table: an always-replace hash of search results.
//!
//! One entry per slot, indexed by `key % len` and verified by the upper 32
//! bits of the key. Mate scores are stored relative to the node so that a
//! mate found along one path reports the right distance along another.

use ochre_core::{Move, Position};
use tracing::debug;

use super::MATE_BOUND;

/// Longest line `collect_pv` will follow.
pub const MAX_PV_LEN: usize = 20;

/// How the stored score relates to the true value of the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The score is exact (all moves searched inside the window).
    Exact,
    /// Failed high: the true score is at least this.
    Lower,
    /// Failed low: the true score is at most this.
    Upper,
}

/// A stored search result, scores already converted back to the probing ply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtEntry {
    pub best_move: Move,
    pub depth: i32,
    pub score: i32,
    pub bound: Bound,
}

#[derive(Clone, Copy)]
struct Slot {
    check: u32,
    best_move: Move,
    score: i32,
    depth: i16,
    bound: Option<Bound>,
}

impl Slot {
    const EMPTY: Slot = Slot {
        check: 0,
        best_move: Move::NULL,
        score: 0,
        depth: 0,
        bound: None,
    };
}

/// Convert a score at `ply` into node-relative form for storage.
pub fn score_to_tt(score: i32, ply: usize) -> i32 {
    if score > MATE_BOUND {
        score + ply as i32
    } else if score < -MATE_BOUND {
        score - ply as i32
    } else {
        score
    }
}

/// Reverse of [`score_to_tt`].
pub fn score_from_tt(score: i32, ply: usize) -> i32 {
    if score > MATE_BOUND {
        score - ply as i32
    } else if score < -MATE_BOUND {
        score + ply as i32
    } else {
        score
    }
}

pub struct TranspositionTable {
    slots: Vec<Slot>,
}

impl TranspositionTable {
    /// Allocate a table of about `mb` megabytes (at least one slot).
    pub fn new(mb: usize) -> Self {
        let len = (mb * 1024 * 1024 / std::mem::size_of::<Slot>()).max(1);
        debug!(mb, entries = len, "allocating transposition table");
        Self {
            slots: vec![Slot::EMPTY; len],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.fill(Slot::EMPTY);
    }

    fn index(&self, key: u64) -> usize {
        (key % self.slots.len() as u64) as usize
    }

    /// Store a result, overwriting whatever occupied the slot.
    pub fn record(&mut self, key: u64, best_move: Move, depth: i32, score: i32, bound: Bound, ply: usize) {
        let index = self.index(key);
        self.slots[index] = Slot {
            check: (key >> 32) as u32,
            best_move,
            score: score_to_tt(score, ply),
            depth: depth.clamp(i16::MIN as i32, i16::MAX as i32) as i16,
            bound: Some(bound),
        };
    }

    /// Look up `key`. `None` when the slot is empty or holds another position.
    pub fn probe(&self, key: u64, ply: usize) -> Option<TtEntry> {
        let slot = &self.slots[self.index(key)];
        let bound = slot.bound?;
        if slot.check != (key >> 32) as u32 {
            return None;
        }
        Some(TtEntry {
            best_move: slot.best_move,
            depth: slot.depth as i32,
            score: score_from_tt(slot.score, ply),
            bound,
        })
    }

    /// Stored best move for `key`, if any.
    pub fn best_move(&self, key: u64) -> Option<Move> {
        self.probe(key, 0).map(|entry| entry.best_move).filter(|mv| !mv.is_null())
    }

    /// Follow stored best moves from `pos`, re-validating each one, and
    /// return the line. The position is restored before returning.
    pub fn collect_pv(&self, pos: &mut Position) -> Vec<Move> {
        let mut line = Vec::with_capacity(MAX_PV_LEN);
        while line.len() < MAX_PV_LEN {
            let Some(mv) = self.best_move(pos.key()) else {
                break;
            };
            if !pos.validate_hash_move(mv) || !pos.is_legal(mv) {
                break;
            }
            pos.make_move(mv);
            line.push(mv);
        }
        for &mv in line.iter().rev() {
            pos.unmake_move(mv);
        }
        line
    }
}

impl std::fmt::Debug for TranspositionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranspositionTable")
            .field("entries", &self.slots.len())
            .finish()
    }
}
