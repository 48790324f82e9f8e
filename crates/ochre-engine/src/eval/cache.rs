//! Hash caches for evaluation results.

use std::mem::size_of;

use tracing::debug;

use super::score::Score;

#[derive(Clone, Copy, Default)]
struct Slot {
    check: u32,
    value: i32,
    used: bool,
}

/// Direct-mapped cache of `i32` values keyed by a 64-bit hash. The slot is
/// `key % len` and the high 32 bits of the key confirm a hit.
struct Cache {
    slots: Vec<Slot>,
}

impl Cache {
    fn with_megabytes(mb: usize, name: &'static str) -> Cache {
        let len = (mb.max(1) * 1024 * 1024 / size_of::<Slot>()).max(1);
        debug!(table = name, mb, entries = len, "allocated evaluation cache");
        Cache {
            slots: vec![Slot::default(); len],
        }
    }

    #[inline]
    fn index(&self, key: u64) -> usize {
        (key % self.slots.len() as u64) as usize
    }

    fn probe(&self, key: u64) -> Option<i32> {
        let slot = self.slots[self.index(key)];
        (slot.used && slot.check == (key >> 32) as u32).then_some(slot.value)
    }

    fn store(&mut self, key: u64, value: i32) {
        let index = self.index(key);
        self.slots[index] = Slot {
            check: (key >> 32) as u32,
            value,
            used: true,
        };
    }

    fn clear(&mut self) {
        self.slots.fill(Slot::default());
    }
}

/// Pawn-structure scores keyed by the pawn key.
pub struct PawnTable(Cache);

impl PawnTable {
    pub fn new(mb: usize) -> PawnTable {
        PawnTable(Cache::with_megabytes(mb, "pawn"))
    }

    pub fn probe(&self, pawn_key: u64) -> Option<Score> {
        self.0.probe(pawn_key).map(Score::from_bits)
    }

    pub fn store(&mut self, pawn_key: u64, score: Score) {
        self.0.store(pawn_key, score.to_bits());
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Whole evaluations (White's view) keyed by the position key.
pub struct EvalTable(Cache);

impl EvalTable {
    pub fn new(mb: usize) -> EvalTable {
        EvalTable(Cache::with_megabytes(mb, "eval"))
    }

    pub fn probe(&self, key: u64) -> Option<i32> {
        self.0.probe(key)
    }

    pub fn store(&mut self, key: u64, eval: i32) {
        self.0.store(key, eval);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::score::S;

    #[test]
    fn hit_after_store() {
        let mut table = EvalTable::new(1);
        table.store(0xdead_beef_0000_0042, -37);
        assert_eq!(table.probe(0xdead_beef_0000_0042), Some(-37));
    }

    #[test]
    fn colliding_index_with_other_check_misses() {
        let mut table = EvalTable::new(1);
        let len = table.0.slots.len() as u64;
        let key = 5u64 << 32 | 17;
        // Same slot, different high half.
        let other = key + len * (1 << 32);
        assert_eq!(table.0.index(key), table.0.index(other));
        table.store(key, 11);
        assert_eq!(table.probe(other), None);
        table.store(other, 12);
        assert_eq!(table.probe(key), None);
        assert_eq!(table.probe(other), Some(12));
    }

    #[test]
    fn pawn_table_keeps_both_halves() {
        let mut table = PawnTable::new(1);
        table.store(99 << 32 | 3, S(-12, 40));
        assert_eq!(table.probe(99 << 32 | 3), Some(S(-12, 40)));
        table.clear();
        assert_eq!(table.probe(99 << 32 | 3), None);
    }
}
