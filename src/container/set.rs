//! `Set<T>`: a hash set, built as `Table<T, ()>` over the shared map
//! engine with a unit value type.

use std::hash::Hash;
use std::rc::Rc;

use crate::alloc::Allocator;
use crate::container::table::Table;
use crate::error::ContainResult;
use crate::intent::IntentSource;

pub struct Set<T: 'static> {
    table: Table<T, ()>,
}

impl<T: Hash + PartialEq + 'static> Set<T> {
    pub fn new() -> Self {
        Self::with_allocator(Rc::new(Allocator::default()))
    }

    pub fn with_allocator(allocator: Rc<Allocator>) -> Self {
        Self { table: Table::new(allocator, false) }
    }

    pub fn ordered(allocator: Rc<Allocator>) -> Self {
        Self { table: Table::new(allocator, true) }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    pub fn allocator(&self) -> &Rc<Allocator> {
        self.table.allocator()
    }

    /// Insert `value`, returning `true` if it was newly added and `false`
    /// if it was already present (matching `std::collections::HashSet`).
    /// `value` may be passed directly (`Move`), by reference
    /// (`Copy`/`Refer`), or wrapped for any other
    /// [`crate::intent::IntentSource`].
    pub fn insert<S: IntentSource<T>>(&mut self, value: S) -> ContainResult<bool> {
        Ok(self.table.insert(value.into_value(), ())?.is_none())
    }

    pub fn contains(&self, value: &T) -> bool {
        self.table.contains_key(value)
    }

    pub fn remove(&mut self, value: &T) -> bool {
        self.table.remove(value).is_some()
    }

    pub fn clear(&mut self) {
        self.table.clear()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.table.entries().into_iter().map(|(k, _)| k)
    }
}

impl<T: Hash + PartialEq + 'static> Default for Set<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Equal iff both sets hold the same elements, independent of the
/// ordered/unordered flag or insertion order.
impl<T: Hash + PartialEq + 'static> PartialEq for Set<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|v| other.contains(v))
    }
}

impl<T: Hash + Eq + 'static> Eq for Set<T> {}

/// Hashes to the same value for any two sets that compare equal under
/// [`PartialEq`], regardless of the ordered/unordered flag or insertion
/// order — see [`Table::combined_hash`].
impl<T: Hash + PartialEq + 'static> std::hash::Hash for Set<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u64(self.table.combined_hash());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_reports_novelty() {
        let mut s: Set<i32> = Set::new();
        assert!(s.insert(1).unwrap());
        assert!(!s.insert(1).unwrap());
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn contains_and_remove_round_trip() {
        let mut s: Set<&'static str> = Set::new();
        s.insert("a").unwrap();
        assert!(s.contains(&"a"));
        assert!(s.remove(&"a"));
        assert!(!s.contains(&"a"));
    }

    #[test]
    fn ordered_set_iterates_by_insertion_order() {
        let mut s: Set<i32> = Set::ordered(Rc::new(Allocator::default()));
        s.insert(3).unwrap();
        s.insert(1).unwrap();
        let items: Vec<i32> = s.iter().copied().collect();
        assert_eq!(items, vec![3, 1]);
    }
}
