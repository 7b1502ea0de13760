//! Self-test masking: a set of hidden keys.
//!
//! The same board type backs every paradigm table (keyed by `CellKey`) and the
//! preposition reference (keyed by entry + field). Present in the set means
//! hidden.

use std::collections::HashSet;
use std::hash::Hash;

#[derive(Clone, Debug)]
pub struct RevealBoard<K> {
    hidden: HashSet<K>,
}

impl<K> Default for RevealBoard<K> {
    fn default() -> Self {
        Self { hidden: HashSet::new() }
    }
}

impl<K: Eq + Hash + Clone> RevealBoard<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one key. Returns `true` if the key is hidden afterwards.
    pub fn toggle(&mut self, key: K) -> bool {
        if self.hidden.remove(&key) {
            false
        } else {
            self.hidden.insert(key);
            true
        }
    }

    /// Bulk switch. Hiding adds every key currently on screen; revealing
    /// clears the whole board, including keys from other views.
    pub fn set_all<I>(&mut self, hidden: bool, visible: I)
    where
        I: IntoIterator<Item = K>,
    {
        if hidden {
            self.hidden.extend(visible);
        } else {
            self.reveal_all();
        }
    }

    pub fn reveal_all(&mut self) {
        self.hidden.clear();
    }

    pub fn is_hidden(&self, key: &K) -> bool {
        self.hidden.contains(key)
    }

    pub fn any_hidden(&self) -> bool {
        !self.hidden.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hidden.len()
    }

    #[cfg(test)]
    pub fn hidden(&self) -> impl Iterator<Item = &K> {
        self.hidden.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn toggle_twice_is_identity() {
        let mut board = RevealBoard::new();
        board.toggle("b");
        let before: HashSet<&str> = board.hidden().copied().collect();

        assert!(board.toggle("a"));
        assert!(board.is_hidden(&"a"));
        assert!(!board.toggle("a"));

        let after: HashSet<&str> = board.hidden().copied().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn hide_then_reveal_leaves_nothing() {
        let mut board = RevealBoard::new();
        board.toggle("outside-view".to_string());
        board.set_all(true, ["x", "y", "z"].map(String::from));
        assert_eq!(board.len(), 4);

        board.set_all(false, Vec::new());
        assert!(!board.any_hidden());
        assert_eq!(board.len(), 0);
    }

    #[test]
    fn hiding_is_idempotent() {
        let mut board = RevealBoard::new();
        board.set_all(true, 0..5u32);
        board.set_all(true, 3..8u32);
        assert_eq!(board.len(), 8);
    }
}
