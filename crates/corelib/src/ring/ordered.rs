//! Sorted position → server map with wrapping successor queries.

use std::collections::BTreeMap;

use crate::node::ServerId;
use crate::token::Token;

/// The ring itself: positions in ascending order, each owned by one server.
///
/// Positions are unique. Inserting a position that is already present is a
/// no-op, so the first writer keeps it; this is also how hash collisions
/// between two servers resolve.
///
/// All lookups are O(log n) in the number of positions.
#[derive(Debug, Clone)]
pub struct OrderedRing<T: Token> {
    entries: BTreeMap<T, ServerId>,
}

impl<T: Token> Default for OrderedRing<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Token> OrderedRing<T> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Insert `server` at `token`. Returns `false` (and changes nothing) if
    /// the position is already taken.
    pub fn insert(&mut self, token: T, server: ServerId) -> bool {
        match self.entries.entry(token) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(server);
                true
            }
        }
    }

    /// Remove the entry at `token`, returning its owner if there was one.
    pub fn remove(&mut self, token: &T) -> Option<ServerId> {
        self.entries.remove(token)
    }

    /// Owner of the exact position `token`.
    pub fn get(&self, token: &T) -> Option<&ServerId> {
        self.entries.get(token)
    }

    /// The entry with the smallest position `>= token`, wrapping to the
    /// smallest position overall. `None` only when the ring is empty.
    pub fn successor(&self, token: &T) -> Option<(&T, &ServerId)> {
        self.entries
            .range(token..)
            .next()
            .or_else(|| self.entries.iter().next())
    }

    /// Every entry exactly once, clockwise, starting at `successor(token)`.
    pub fn clockwise(&self, token: &T) -> impl Iterator<Item = (&T, &ServerId)> {
        self.entries
            .range(token..)
            .chain(self.entries.range(..token))
    }

    /// Entry with the smallest position.
    pub fn first(&self) -> Option<(&T, &ServerId)> {
        self.entries.iter().next()
    }

    /// Entry with the largest position.
    pub fn last(&self) -> Option<(&T, &ServerId)> {
        self.entries.iter().next_back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All `(position, server)` pairs in ascending position order.
    pub fn entries(&self) -> impl Iterator<Item = (&T, &ServerId)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::md5::Md5Token;

    fn ring(entries: &[(i64, &str)]) -> OrderedRing<Md5Token> {
        let mut ring = OrderedRing::new();
        for (pos, server) in entries {
            ring.insert(Md5Token(*pos), ServerId::from(*server));
        }
        ring
    }

    #[test]
    fn test_empty_ring() {
        let ring: OrderedRing<Md5Token> = OrderedRing::new();
        assert!(ring.is_empty());
        assert!(ring.successor(&Md5Token(0)).is_none());
        assert_eq!(ring.clockwise(&Md5Token(0)).count(), 0);
    }

    #[test]
    fn test_first_writer_wins() {
        let mut ring = ring(&[(10, "a")]);
        assert!(!ring.insert(Md5Token(10), ServerId::from("b")));
        assert_eq!(ring.len(), 1);
        assert_eq!(ring.get(&Md5Token(10)).map(ServerId::as_str), Some("a"));
    }

    #[test]
    fn test_successor_exact_and_ceiling() {
        let ring = ring(&[(-50, "a"), (10, "b"), (70, "c")]);
        assert_eq!(ring.successor(&Md5Token(10)).map(|(_, s)| s.as_str()), Some("b"));
        assert_eq!(ring.successor(&Md5Token(11)).map(|(_, s)| s.as_str()), Some("c"));
        assert_eq!(ring.successor(&Md5Token(i64::MIN)).map(|(_, s)| s.as_str()), Some("a"));
    }

    #[test]
    fn test_successor_wraps_to_minimum() {
        let ring = ring(&[(-50, "a"), (10, "b"), (70, "c")]);
        let (token, server) = ring.successor(&Md5Token(71)).unwrap();
        assert_eq!(*token, Md5Token(-50));
        assert_eq!(server, "a");
        assert_eq!(ring.successor(&Md5Token(i64::MAX)).map(|(t, _)| *t), Some(Md5Token(-50)));
    }

    #[test]
    fn test_clockwise_visits_each_entry_once() {
        let ring = ring(&[(-50, "a"), (10, "b"), (70, "c")]);
        let order: Vec<&str> = ring.clockwise(&Md5Token(11)).map(|(_, s)| s.as_str()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_remove() {
        let mut ring = ring(&[(1, "a"), (2, "b")]);
        assert_eq!(ring.remove(&Md5Token(1)).map(|s| s.to_string()), Some("a".to_string()));
        assert!(ring.remove(&Md5Token(1)).is_none());
        assert_eq!(ring.len(), 1);
        assert_eq!(ring.first().map(|(t, _)| *t), Some(Md5Token(2)));
        assert_eq!(ring.last().map(|(t, _)| *t), Some(Md5Token(2)));
    }
}
