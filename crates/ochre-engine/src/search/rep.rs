//! Repetition table: counts of position keys on the current game path.
//!
//! Open addressing with linear probing. A removed entry leaves a tombstone
//! behind so that later keys in the same probe chain stay reachable.

use tracing::error;

const TABLE_BYTES: usize = 1024 * 1024;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Slot {
    Empty,
    Deleted,
    Used { key: u64, count: u32 },
}

pub struct RepTable {
    slots: Vec<Slot>,
}

impl RepTable {
    /// A table of about 1 MB.
    pub fn new() -> Self {
        Self::with_capacity(TABLE_BYTES / std::mem::size_of::<Slot>())
    }

    pub fn with_capacity(len: usize) -> Self {
        Self {
            slots: vec![Slot::Empty; len.max(1)],
        }
    }

    pub fn clear(&mut self) {
        self.slots.fill(Slot::Empty);
    }

    fn probe_order(&self, key: u64) -> impl Iterator<Item = usize> + use<> {
        let len = self.slots.len();
        let start = (key % len as u64) as usize;
        (0..len).map(move |i| (start + i) % len)
    }

    fn find(&self, key: u64) -> Option<usize> {
        for i in self.probe_order(key) {
            match self.slots[i] {
                Slot::Empty => return None,
                Slot::Used { key: stored, .. } if stored == key => return Some(i),
                _ => {}
            }
        }
        None
    }

    /// Count one more occurrence of `key`.
    pub fn record(&mut self, key: u64) {
        if let Some(i) = self.find(key) {
            if let Slot::Used { count, .. } = &mut self.slots[i] {
                *count += 1;
            }
            return;
        }
        let free = self
            .probe_order(key)
            .find(|&i| matches!(self.slots[i], Slot::Empty | Slot::Deleted));
        match free {
            Some(i) => self.slots[i] = Slot::Used { key, count: 1 },
            None => error!(key, "repetition table full"),
        }
    }

    /// Drop one occurrence of `key`.
    pub fn remove(&mut self, key: u64) {
        let Some(i) = self.find(key) else {
            error!(key, "removing a key missing from the repetition table");
            return;
        };
        if let Slot::Used { count, .. } = &mut self.slots[i] {
            *count -= 1;
            if *count == 0 {
                self.slots[i] = Slot::Deleted;
            }
        }
    }

    pub fn exists(&self, key: u64) -> bool {
        self.find(key).is_some()
    }
}

impl Default for RepTable {
    fn default() -> Self {
        Self::new()
    }
}
