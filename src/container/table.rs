//! A Robin Hood open-addressing hash table with backward-shift deletion —
//! the shared engine behind [`crate::container::Map`] and
//! [`crate::container::Set`] (see `DESIGN.md` for the ordered/load-factor
//! decisions this resolves).
//!
//! Slots are a single [`crate::block::Block`] of `Slot<K, V>` enums
//! (`Empty` or `Occupied`), trading a little memory density for safe Rust
//! without `MaybeUninit` or a separate probe-distance byte array. The
//! probe distance is stored as a `u32` alongside the entry rather than in
//! a tightly packed side array, since `Slot` already carries the full
//! entry and cache density matters less as a result.

use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::alloc::Allocator;
use crate::block::Block;
use crate::diagnostics;
use crate::error::{ContainError, ContainResult};

const INITIAL_CAPACITY: usize = 8;

enum Slot<K, V> {
    Empty,
    Occupied { hash: u64, probe: u32, seq: u64, key: K, value: V },
}

impl<K, V> Default for Slot<K, V> {
    fn default() -> Self {
        Slot::Empty
    }
}

pub(crate) struct Table<K: 'static, V: 'static> {
    slots: Block<Slot<K, V>>,
    count: usize,
    ordered: bool,
    next_seq: u64,
}

fn hash_of<K: Hash>(key: &K) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
}

impl<K: Hash + PartialEq + 'static, V: 'static> Table<K, V> {
    pub(crate) fn new(allocator: Rc<Allocator>, ordered: bool) -> Self {
        Self { slots: Block::new(allocator), count: 0, ordered, next_seq: 0 }
    }

    pub(crate) fn allocator(&self) -> &Rc<Allocator> {
        self.slots.allocator()
    }

    pub(crate) fn len(&self) -> usize {
        self.count
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Load factor is fixed at 0.875 (`count * 8 > capacity * 7`).
    fn should_grow(&self) -> bool {
        self.capacity() == 0 || self.count * 8 > self.capacity() * 7
    }

    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        let idx = self.find_slot(hash_of(key), key)?;
        match self.slots.get(idx) {
            Some(Slot::Occupied { value, .. }) => Some(value),
            _ => None,
        }
    }

    pub(crate) fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let idx = self.find_slot(hash_of(key), key)?;
        match self.slots.get_mut(idx) {
            Some(Slot::Occupied { value, .. }) => Some(value),
            _ => None,
        }
    }

    pub(crate) fn contains_key(&self, key: &K) -> bool {
        self.find_slot(hash_of(key), key).is_some()
    }

    /// Insert or overwrite `key`. Returns the previous value, if any.
    pub(crate) fn insert(&mut self, key: K, value: V) -> ContainResult<Option<V>> {
        self.ensure_capacity()?;
        let hash = hash_of(&key);
        self.raw_insert(hash, key, value)
    }

    pub(crate) fn remove(&mut self, key: &K) -> Option<(K, V)> {
        let hash = hash_of(key);
        self.remove_hashed(hash, key)
    }

    fn ensure_capacity(&mut self) -> ContainResult<()> {
        if self.should_grow() {
            let new_cap = if self.capacity() == 0 { INITIAL_CAPACITY } else { self.capacity() * 2 };
            self.rehash(new_cap)?;
        }
        Ok(())
    }

    fn rehash(&mut self, new_cap: usize) -> ContainResult<()> {
        let mut fresh: Block<Slot<K, V>> = Block::with_capacity(Rc::clone(self.slots.allocator()), new_cap)?;
        for _ in 0..new_cap {
            fresh.push_back(Slot::Empty)?;
        }
        let mut old = std::mem::replace(&mut self.slots, fresh);
        self.count = 0;

        let mut drained: Vec<(u64, u64, K, V)> = Vec::new();
        for slot in old.as_mut_slice() {
            if let Slot::Occupied { hash, seq, key, value, .. } = std::mem::take(slot) {
                drained.push((hash, seq, key, value));
            }
        }
        // Draining a `Block` in increasing slot order does not preserve
        // insertion order under Robin Hood displacement; for an ordered
        // table, sort by `seq` first so re-insertion (which reuses the
        // carried `seq`) still reports entries in original order.
        if self.ordered {
            drained.sort_by_key(|(_, seq, _, _)| *seq);
        }

        for (hash, seq, key, value) in drained {
            self.raw_insert_with_seq(hash, seq, key, value)?;
        }
        diagnostics::emit(diagnostics::TABLE_REHASHED, new_cap);
        Ok(())
    }

    fn raw_insert(&mut self, hash: u64, key: K, value: V) -> ContainResult<Option<V>> {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.raw_insert_with_seq(hash, seq, key, value)
    }

    fn raw_insert_with_seq(&mut self, mut hash: u64, seq: u64, mut key: K, mut value: V) -> ContainResult<Option<V>> {
        let cap = self.slots.len();
        let mask = cap - 1;
        let mut idx = hash as usize & mask;
        let mut probe: u32 = 0;
        let mut carried_seq = seq;

        for _ in 0..=cap {
            if matches!(self.slots.get(idx), Some(Slot::Empty)) {
                *self.slots.get_mut(idx).expect("idx is masked into [0, cap)") =
                    Slot::Occupied { hash, probe, seq: carried_seq, key, value };
                self.count += 1;
                return Ok(None);
            }

            let (existing_hash, existing_probe) = match self.slots.get(idx).expect("idx is masked into [0, cap)") {
                Slot::Occupied { hash, probe, .. } => (*hash, *probe),
                Slot::Empty => unreachable!("checked above"),
            };

            if existing_hash == hash {
                let same_key = match self.slots.get(idx).unwrap() {
                    Slot::Occupied { key: k, .. } => *k == key,
                    Slot::Empty => unreachable!("checked above"),
                };
                if same_key {
                    if let Slot::Occupied { value: existing, .. } = self.slots.get_mut(idx).unwrap() {
                        return Ok(Some(std::mem::replace(existing, value)));
                    }
                }
            }

            if existing_probe < probe {
                if let Slot::Occupied { hash: h2, probe: p2, seq: s2, key: k2, value: v2 } =
                    self.slots.get_mut(idx).unwrap()
                {
                    std::mem::swap(h2, &mut hash);
                    std::mem::swap(p2, &mut probe);
                    std::mem::swap(s2, &mut carried_seq);
                    std::mem::swap(k2, &mut key);
                    std::mem::swap(v2, &mut value);
                }
            }

            probe += 1;
            idx = (idx + 1) & mask;
        }

        diagnostics::emit(diagnostics::PROBE_OVERFLOW, cap);
        Err(ContainError::allocate("hash table probe sequence exceeded capacity"))
    }

    fn find_slot(&self, hash: u64, key: &K) -> Option<usize> {
        let cap = self.slots.len();
        if cap == 0 {
            return None;
        }
        let mask = cap - 1;
        let mut idx = hash as usize & mask;
        let mut probe: u32 = 0;

        for _ in 0..=cap {
            match self.slots.get(idx) {
                Some(Slot::Occupied { hash: h, probe: p, key: k, .. }) => {
                    if *h == hash && k == key {
                        return Some(idx);
                    }
                    if *p < probe {
                        return None;
                    }
                }
                _ => return None,
            }
            probe += 1;
            idx = (idx + 1) & mask;
        }
        None
    }

    fn remove_hashed(&mut self, hash: u64, key: &K) -> Option<(K, V)> {
        let idx = self.find_slot(hash, key)?;
        let removed = std::mem::take(self.slots.get_mut(idx).expect("find_slot returned a live index"));
        let (key, value) = match removed {
            Slot::Occupied { key, value, .. } => (key, value),
            Slot::Empty => unreachable!("find_slot only returns occupied indices"),
        };

        let cap = self.slots.len();
        let mask = cap - 1;
        let mut cur = idx;
        loop {
            let next = (cur + 1) & mask;
            let shift = matches!(self.slots.get(next), Some(Slot::Occupied { probe, .. }) if *probe > 0);
            if !shift {
                break;
            }
            let moved = std::mem::take(self.slots.get_mut(next).expect("next is masked into [0, cap)"));
            if let Slot::Occupied { hash, probe, seq, key, value } = moved {
                *self.slots.get_mut(cur).unwrap() = Slot::Occupied { hash, probe: probe - 1, seq, key, value };
            }
            cur = next;
        }

        self.count -= 1;
        Some((key, value))
    }

    pub(crate) fn clear(&mut self) {
        for slot in self.slots.as_mut_slice() {
            *slot = Slot::Empty;
        }
        self.count = 0;
    }

    /// Occupied entries in raw slot order (the unordered iteration rule).
    pub(crate) fn iter_unordered(&self) -> impl Iterator<Item = (&K, &V)> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Occupied { key, value, .. } => Some((key, value)),
            Slot::Empty => None,
        })
    }

    /// Occupied entries sorted by insertion sequence (the ordered
    /// iteration rule). `O(n log n)`, paid at iteration time rather than
    /// maintained incrementally — see `rehash` for why a slot-index-based
    /// auxiliary order array can't survive backward-shift deletion.
    pub(crate) fn iter_ordered(&self) -> Vec<(&K, &V)> {
        let mut entries: Vec<(u64, &K, &V)> = self
            .slots
            .iter()
            .filter_map(|slot| match slot {
                Slot::Occupied { seq, key, value, .. } => Some((*seq, key, value)),
                Slot::Empty => None,
            })
            .collect();
        entries.sort_by_key(|(seq, _, _)| *seq);
        entries.into_iter().map(|(_, k, v)| (k, v)).collect()
    }

    pub(crate) fn entries(&self) -> Vec<(&K, &V)> {
        if self.ordered {
            self.iter_ordered()
        } else {
            self.iter_unordered().collect()
        }
    }
}

impl<K: Hash + PartialEq + 'static, V: Hash + 'static> Table<K, V> {
    /// An order-independent digest of every `(key, value)` pair: slot
    /// layout and insertion order both affect `entries()`'s sequence but
    /// must not affect equality-compatible hashing, so each entry is
    /// hashed on its own and the digests combined with XOR rather than
    /// fed through one hasher in iteration order.
    pub(crate) fn combined_hash(&self) -> u64 {
        self.iter_unordered().fold(0u64, |acc, (key, value)| {
            let mut hasher = std::collections::hash_map::DefaultHasher::new();
            key.hash(&mut hasher);
            value.hash(&mut hasher);
            acc ^ hasher.finish()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allocator() -> Rc<Allocator> {
        Rc::new(Allocator::default())
    }

    #[test]
    fn insert_get_remove_round_trip() {
        let mut t: Table<String, i32> = Table::new(allocator(), false);
        t.insert("a".into(), 1).unwrap();
        t.insert("b".into(), 2).unwrap();
        assert_eq!(t.get(&"a".to_string()), Some(&1));
        assert_eq!(t.remove(&"a".to_string()), Some(("a".to_string(), 1)));
        assert_eq!(t.get(&"a".to_string()), None);
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn rehash_preserves_all_entries() {
        let mut t: Table<i32, i32> = Table::new(allocator(), false);
        for i in 0..200 {
            t.insert(i, i * 2).unwrap();
        }
        assert_eq!(t.len(), 200);
        for i in 0..200 {
            assert_eq!(t.get(&i), Some(&(i * 2)));
        }
    }

    #[test]
    fn ordered_table_iterates_by_insertion_order() {
        let mut t: Table<i32, &'static str> = Table::new(allocator(), true);
        t.insert(3, "c").unwrap();
        t.insert(1, "a").unwrap();
        t.insert(2, "b").unwrap();
        let keys: Vec<i32> = t.entries().into_iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![3, 1, 2]);
    }

    #[test]
    fn ordered_table_keeps_order_across_rehash_and_removal() {
        let mut t: Table<i32, i32> = Table::new(allocator(), true);
        for i in 0..50 {
            t.insert(i, i).unwrap();
        }
        t.remove(&10);
        let keys: Vec<i32> = t.entries().into_iter().map(|(k, _)| *k).collect();
        let mut expected: Vec<i32> = (0..50).filter(|&i| i != 10).collect();
        assert_eq!(keys, expected.drain(..).collect::<Vec<_>>());
    }

    #[test]
    fn reinsert_overwrites_value_without_moving_position() {
        let mut t: Table<i32, i32> = Table::new(allocator(), true);
        t.insert(1, 10).unwrap();
        t.insert(2, 20).unwrap();
        t.insert(1, 99).unwrap();
        let entries = t.entries();
        assert_eq!(entries[0], (&1, &99));
        assert_eq!(entries[1], (&2, &20));
    }
}
