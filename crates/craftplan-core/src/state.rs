//! Inventory state.
//!
//! A [`State`] is a multiset of item quantities. Items that are absent have
//! quantity zero and zero quantities are never stored, so two states holding
//! the same non-zero quantities are equal, hash identically and order
//! identically no matter how they were built.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Snapshot of item quantities in an inventory.
///
/// States are values: every update returns a new state and leaves the
/// original untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, u64>")]
pub struct State(BTreeMap<String, u64>);

impl State {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a state from `(item, quantity)` pairs. Later pairs for the same
    /// item override earlier ones.
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, u64)>,
        K: Into<String>,
    {
        let mut quantities = BTreeMap::new();
        for (item, quantity) in pairs {
            let item = item.into();
            if quantity == 0 {
                quantities.remove(&item);
            } else {
                quantities.insert(item, quantity);
            }
        }
        Self(quantities)
    }

    /// Quantity held of `item` (zero when absent).
    pub fn get(&self, item: &str) -> u64 {
        self.0.get(item).copied().unwrap_or(0)
    }

    /// Return a new state with `item` adjusted by `delta`.
    pub fn with_delta(&self, item: &str, delta: i64) -> State {
        let mut next = self.clone();
        if delta < 0 {
            next.take(item, delta.unsigned_abs());
        } else {
            next.give(item, delta.unsigned_abs());
        }
        next
    }

    /// Return a new state with every `consumed` amount removed and then every
    /// `produced` amount added. Amounts are applied exactly.
    pub fn with_changes<'a, C, P>(&self, consumed: C, produced: P) -> State
    where
        C: IntoIterator<Item = (&'a str, u64)>,
        P: IntoIterator<Item = (&'a str, u64)>,
    {
        let mut next = self.clone();
        for (item, amount) in consumed {
            next.take(item, amount);
        }
        for (item, amount) in produced {
            next.give(item, amount);
        }
        next
    }

    fn take(&mut self, item: &str, amount: u64) {
        let current = self.get(item);
        let updated = current.checked_sub(amount);
        debug_assert!(
            updated.is_some(),
            "quantity of '{item}' would become negative ({current} - {amount})"
        );
        self.store(item, updated.unwrap_or(0));
    }

    fn give(&mut self, item: &str, amount: u64) {
        let current = self.get(item);
        let updated = current.checked_add(amount);
        debug_assert!(
            updated.is_some(),
            "quantity of '{item}' would overflow ({current} + {amount})"
        );
        self.store(item, updated.unwrap_or(u64::MAX));
    }

    fn store(&mut self, item: &str, quantity: u64) {
        if quantity == 0 {
            self.0.remove(item);
        } else if let Some(slot) = self.0.get_mut(item) {
            *slot = quantity;
        } else {
            self.0.insert(item.to_string(), quantity);
        }
    }

    /// True if this state holds at least as much of every item as `other`.
    pub fn dominates(&self, other: &State) -> bool {
        other.iter().all(|(item, quantity)| self.get(item) >= quantity)
    }

    /// Iterate over the non-zero entries in item order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.0.iter().map(|(item, quantity)| (item.as_str(), *quantity))
    }

    /// Number of distinct items held.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing is held.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, u64>> for State {
    fn from(quantities: BTreeMap<String, u64>) -> Self {
        Self::from_pairs(quantities)
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for State {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (item, quantity)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{item}: {quantity}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(state: &State) -> u64 {
        let mut hasher = DefaultHasher::new();
        state.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_missing_item_is_zero() {
        let state = State::from_pairs([("wood", 2)]);
        assert_eq!(state.get("wood"), 2);
        assert_eq!(state.get("stone"), 0);
    }

    #[test]
    fn test_equality_ignores_insertion_order_and_zeros() {
        let a = State::from_pairs([("wood", 1), ("plank", 4), ("coal", 0)]);
        let b = State::from_pairs([("coal", 0), ("plank", 4), ("wood", 1)]);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_with_delta_is_copy_on_write() {
        let original = State::from_pairs([("wood", 1)]);
        let next = original.with_delta("wood", -1).with_delta("plank", 4);

        assert_eq!(original.get("wood"), 1);
        assert_eq!(next.get("wood"), 0);
        assert_eq!(next.get("plank"), 4);
        assert_eq!(next, State::from_pairs([("plank", 4)]));
    }

    #[test]
    fn test_with_changes_removes_emptied_entries() {
        let state = State::from_pairs([("ore", 2), ("coal", 1)]);
        let next = state.with_changes([("ore", 2), ("coal", 1)], [("ingot", 2)]);
        assert_eq!(next.iter().collect::<Vec<_>>(), vec![("ingot", 2)]);
    }

    #[test]
    fn test_with_changes_applies_full_u64_amounts() {
        let state = State::from_pairs([("ore", u64::MAX), ("coal", 1)]);
        let next = state.with_changes([("ore", u64::MAX)], [("coal", u64::MAX - 1)]);
        assert_eq!(next.get("ore"), 0);
        assert_eq!(next.get("coal"), u64::MAX);
        assert_eq!(next, State::from_pairs([("coal", u64::MAX)]));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "would become negative")]
    fn test_negative_quantity_panics_in_debug() {
        State::new().with_delta("wood", -1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "would overflow")]
    fn test_quantity_overflow_panics_in_debug() {
        State::from_pairs([("ore", u64::MAX)]).with_changes([("coal", 0)], [("ore", 1)]);
    }

    #[test]
    fn test_dominates() {
        let big = State::from_pairs([("wood", 3), ("plank", 1)]);
        let small = State::from_pairs([("wood", 2)]);
        assert!(big.dominates(&small));
        assert!(!small.dominates(&big));
        assert!(small.dominates(&State::new()));
    }

    #[test]
    fn test_display_lists_non_zero_entries() {
        let state = State::from_pairs([("wood", 0), ("plank", 4), ("bench", 1)]);
        assert_eq!(state.to_string(), "{bench: 1, plank: 4}");
        assert_eq!(State::new().to_string(), "{}");
    }

    #[test]
    fn test_serde_roundtrip_drops_zeros() {
        let state: State = serde_json::from_str(r#"{"wood": 0, "plank": 4}"#).unwrap();
        assert_eq!(state, State::from_pairs([("plank", 4)]));
        assert_eq!(serde_json::to_string(&state).unwrap(), r#"{"plank":4}"#);
    }
}
