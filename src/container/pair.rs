//! `Pair<K, V>`: an owned key/value pair, carrying an `owned` flag for
//! supporting the `Disown` intent on extraction from a table.

use crate::intent::{Disowned, IntentSource, Intent};

/// A single key/value entry, as handed back by
/// [`crate::container::Map::remove_entry`].
///
/// `owned` tracks whether this pair was built with the `Disown` intent. It
/// is a plain, inspectable flag rather than behavior-affecting, since
/// `Pair<K, V>`'s fields are owned Rust values with their own `Drop`
/// impls regardless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair<K, V> {
    key: K,
    value: V,
    owned: bool,
}

impl<K, V> Pair<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value, owned: true }
    }

    /// Build a pair with the `Disown` intent: `owned()` reports `false`,
    /// signaling callers should not treat this pair as uniquely
    /// responsible for its contents (e.g. when it is a transient view
    /// into a table that still owns the real entry).
    pub fn disowned(key: K, value: V) -> Self {
        Self { key, value, owned: false }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    pub fn owned(&self) -> bool {
        self.owned
    }

    pub fn into_inner(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K, V> IntentSource<(K, V)> for Pair<K, V> {
    const INTENT: Intent = Intent::Move;
    fn into_value(self) -> (K, V) {
        self.into_inner()
    }
}

impl<K, V> From<Disowned<Pair<K, V>>> for Pair<K, V> {
    fn from(wrapped: Disowned<Pair<K, V>>) -> Self {
        let mut pair = wrapped.into_inner();
        pair.owned = false;
        pair
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owned_by_default_disowned_on_request() {
        let p = Pair::new(1, "a");
        assert!(p.owned());
        let d = Pair::disowned(2, "b");
        assert!(!d.owned());
    }

    #[test]
    fn into_inner_recovers_both_fields() {
        let p = Pair::new(1, "a");
        assert_eq!(p.into_inner(), (1, "a"));
    }
}
