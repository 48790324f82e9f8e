//! Killer move table and history heuristic for quiet move ordering.

use ochre_core::Move;

use crate::search::MAX_PLY;

/// Two killer moves per ply — quiet moves that caused beta cutoffs.
pub struct KillerTable {
    slots: [[Move; 2]; MAX_PLY],
}

impl KillerTable {
    /// Create an empty killer table.
    pub fn new() -> Self {
        Self {
            slots: [[Move::NULL; 2]; MAX_PLY],
        }
    }

    pub fn clear(&mut self) {
        self.slots = [[Move::NULL; 2]; MAX_PLY];
    }

    /// Store a killer move at the given ply.
    ///
    /// Shifts slot 0 to slot 1 if the new move differs from slot 0.
    pub fn store(&mut self, ply: usize, mv: Move) {
        if ply >= MAX_PLY {
            return;
        }
        if self.slots[ply][0] != mv {
            self.slots[ply][1] = self.slots[ply][0];
            self.slots[ply][0] = mv;
        }
    }

    /// Both killers at `ply`, most recent first. Empty slots are `Move::NULL`.
    pub fn get(&self, ply: usize) -> [Move; 2] {
        if ply >= MAX_PLY {
            return [Move::NULL; 2];
        }
        self.slots[ply]
    }
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

/// History heuristic indexed by `[from][to]` on the dense 64-square index.
///
/// Every searched quiet move adds its depth to `tries`; a move causing a
/// beta cutoff also adds its depth to `hits`. Quiet moves are ordered by
/// the ratio of the two.
pub struct HistoryTable {
    hits: Box<[[u32; 64]; 64]>,
    tries: Box<[[u32; 64]; 64]>,
}

impl HistoryTable {
    /// Create a zeroed history table.
    pub fn new() -> Self {
        Self {
            hits: Box::new([[0; 64]; 64]),
            tries: Box::new([[0; 64]; 64]),
        }
    }

    pub fn clear(&mut self) {
        *self.hits = [[0; 64]; 64];
        *self.tries = [[0; 64]; 64];
    }

    /// A move was searched at `depth`.
    pub fn record_try(&mut self, mv: Move, depth: i32) {
        let entry = &mut self.tries[mv.from().index64()][mv.to().index64()];
        *entry = entry.saturating_add(depth.max(0) as u32);
    }

    /// A move caused a beta cutoff at `depth`.
    pub fn record_hit(&mut self, mv: Move, depth: i32) {
        let entry = &mut self.hits[mv.from().index64()][mv.to().index64()];
        *entry = entry.saturating_add(depth.max(0) as u32);
    }

    /// Ordering score in `0..=1000`: cutoffs per thousand tries.
    pub fn score(&self, mv: Move) -> i32 {
        let (from, to) = (mv.from().index64(), mv.to().index64());
        let tries = self.tries[from][to];
        if tries == 0 {
            return 0;
        }
        let hits = self.hits[from][to].min(tries);
        (1000 * u64::from(hits) / u64::from(tries)) as i32
    }
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ochre_core::Position;

    fn quiet(uci: &str) -> Move {
        Position::startpos().parse_uci_move(uci).unwrap()
    }

    #[test]
    fn killer_store_and_check() {
        let mut kt = KillerTable::new();
        let mv1 = quiet("e2e4");
        let mv2 = quiet("d2d4");

        kt.store(5, mv1);
        assert_eq!(kt.get(5), [mv1, Move::NULL]);

        // The older killer shifts to slot 1.
        kt.store(5, mv2);
        assert_eq!(kt.get(5), [mv2, mv1]);
    }

    #[test]
    fn killer_same_move_no_shift() {
        let mut kt = KillerTable::new();
        let mv1 = quiet("e2e4");
        let mv2 = quiet("d2d4");

        kt.store(0, mv1);
        kt.store(0, mv2);
        kt.store(0, mv2);
        assert_eq!(kt.get(0), [mv2, mv1]);
    }

    #[test]
    fn killer_different_plies_independent() {
        let mut kt = KillerTable::new();
        let mv = quiet("e2e4");
        kt.store(3, mv);
        assert!(kt.get(3).contains(&mv));
        assert!(!kt.get(4).contains(&mv));
        assert_eq!(kt.get(MAX_PLY), [Move::NULL; 2]);
    }

    #[test]
    fn history_ratio() {
        let mut ht = HistoryTable::new();
        let mv = quiet("g1f3");
        assert_eq!(ht.score(mv), 0);

        ht.record_try(mv, 4);
        ht.record_try(mv, 4);
        ht.record_hit(mv, 4);
        assert_eq!(ht.score(mv), 500);

        ht.clear();
        assert_eq!(ht.score(mv), 0);
    }
}
