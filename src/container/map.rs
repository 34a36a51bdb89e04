//! `Map<K, V>`: unordered and ordered hash maps collapsed into one generic
//! type over [`crate::container::table::Table`].

use std::hash::Hash;
use std::rc::Rc;

use crate::alloc::Allocator;
use crate::container::pair::Pair;
use crate::container::table::Table;
use crate::error::ContainResult;
use crate::intent::IntentSource;

/// A pool-backed hash map. Construct with [`Map::new`] for raw-slot
/// ("unordered") iteration, or [`Map::ordered`] to have
/// [`Map::iter`]/[`Map::keys`]/[`Map::values`] walk entries in insertion
/// order instead. Both variants share one implementation, distinguished
/// by a flag rather than a separate type (see `DESIGN.md`).
pub struct Map<K: 'static, V: 'static> {
    table: Table<K, V>,
}

impl<K: Hash + PartialEq + 'static, V: 'static> Map<K, V> {
    /// An empty unordered map backed by its own fresh allocator.
    pub fn new() -> Self {
        Self::with_allocator(Rc::new(Allocator::default()))
    }

    /// An empty unordered map backed by `allocator`.
    pub fn with_allocator(allocator: Rc<Allocator>) -> Self {
        Self { table: Table::new(allocator, false) }
    }

    /// An empty map that remembers insertion order for iteration.
    pub fn ordered(allocator: Rc<Allocator>) -> Self {
        Self { table: Table::new(allocator, true) }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    pub fn allocator(&self) -> &Rc<Allocator> {
        self.table.allocator()
    }

    /// Insert `key -> value`, returning the previous value if `key` was
    /// already present. Never panics; the only failure mode is allocator
    /// exhaustion. `key`/`value` may be passed directly (`Move`), by
    /// reference (`Copy`/`Refer`, see [`crate::intent::IntentSource`]),
    /// or wrapped in [`crate::intent::Cloned`]/[`crate::ptr::Disowned`]
    /// for the other intents.
    pub fn insert<SK: IntentSource<K>, SV: IntentSource<V>>(&mut self, key: SK, value: SV) -> ContainResult<Option<V>> {
        self.table.insert(key.into_value(), value.into_value())
    }

    /// Insert only if `key` is absent; returns `false` without touching
    /// the map if it was already present.
    pub fn try_insert<SK: IntentSource<K>, SV: IntentSource<V>>(&mut self, key: SK, value: SV) -> ContainResult<bool> {
        let key = key.into_value();
        if self.table.contains_key(&key) {
            return Ok(false);
        }
        self.table.insert(key, value.into_value())?;
        Ok(true)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.table.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.table.get_mut(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.table.contains_key(key)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.table.remove(key).map(|(_, v)| v)
    }

    pub fn remove_entry(&mut self, key: &K) -> Option<Pair<K, V>> {
        self.table.remove(key).map(|(k, v)| Pair::new(k, v))
    }

    pub fn clear(&mut self) {
        self.table.clear()
    }

    /// Entries in raw slot order for an unordered map, insertion order for
    /// an ordered one.
    pub fn iter(&self) -> std::vec::IntoIter<(&K, &V)> {
        self.table.entries().into_iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.table.entries().into_iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.table.entries().into_iter().map(|(_, v)| v)
    }
}

impl<K: Hash + PartialEq + 'static, V: 'static> Default for Map<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Equal iff both maps hold the same set of `(key, value)` pairs,
/// independent of the ordered/unordered flag or insertion order.
impl<K: Hash + PartialEq + 'static, V: PartialEq + 'static> PartialEq for Map<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: Hash + PartialEq + 'static, V: Eq + 'static> Eq for Map<K, V> {}

/// Hashes to the same value for any two maps that compare equal under
/// [`PartialEq`], regardless of the ordered/unordered flag or insertion
/// order — see [`Table::combined_hash`].
impl<K: Hash + PartialEq + 'static, V: Hash + 'static> std::hash::Hash for Map<K, V> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u64(self.table.combined_hash());
    }
}

impl<K: Hash + PartialEq + std::fmt::Debug + 'static, V: std::fmt::Debug + 'static> std::fmt::Debug for Map<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Matches `std::collections::HashMap`: indexing an absent key panics.
/// The fallible API (`get`/`get_mut`/`try_insert`/`remove`) never does.
impl<K: Hash + PartialEq + 'static, V: 'static> std::ops::Index<&K> for Map<K, V> {
    type Output = V;
    fn index(&self, key: &K) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Hash + PartialEq + 'static, V: 'static> std::ops::IndexMut<&K> for Map<K, V> {
    fn index_mut(&mut self, key: &K) -> &mut V {
        self.get_mut(key).expect("no entry found for key")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_get_remove_round_trip() {
        let mut m: Map<String, i32> = Map::new();
        m.insert::<String, i32>("a".into(), 1).unwrap();
        assert_eq!(m.get(&"a".to_string()), Some(&1));
        assert_eq!(m.remove(&"a".to_string()), Some(1));
        assert!(m.get(&"a".to_string()).is_none());
    }

    #[test]
    fn index_panics_on_missing_key() {
        let m: Map<String, i32> = Map::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| &m[&"missing".to_string()]));
        assert!(result.is_err());
    }

    #[test]
    fn try_insert_refuses_to_overwrite() {
        let mut m: Map<i32, i32> = Map::new();
        assert!(m.try_insert(1, 10).unwrap());
        assert!(!m.try_insert(1, 99).unwrap());
        assert_eq!(m.get(&1), Some(&10));
    }

    #[test]
    fn ordered_map_preserves_insertion_order() {
        let mut m: Map<i32, &'static str> = Map::ordered(Rc::new(Allocator::default()));
        m.insert(3, "c").unwrap();
        m.insert(1, "a").unwrap();
        let keys: Vec<i32> = m.keys().copied().collect();
        assert_eq!(keys, vec![3, 1]);
    }
}
