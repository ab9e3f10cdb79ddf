//! Empirical remapping impact.
//!
//! Impact is measured by snapshotting the assignment of a sample of keys,
//! applying a membership change, snapshotting again, and reporting the
//! fraction of sampled keys whose server differs. Works with any
//! `RingLookup`, including the modulo baseline.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::node::ServerId;
use crate::ring::RingLookup;

/// Key → server (or absence) captured at one point in time.
///
/// Snapshots own their data and share nothing with the ring they came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentSnapshot {
    assignments: BTreeMap<String, Option<ServerId>>,
}

/// A key whose assignment differs between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyMove {
    pub key: String,
    pub from: Option<ServerId>,
    pub to: Option<ServerId>,
}

impl AssignmentSnapshot {
    /// Resolve every key against `ring`.
    pub fn capture<R, K>(ring: &R, keys: &[K]) -> Self
    where
        R: RingLookup + ?Sized,
        K: AsRef<str>,
    {
        let assignments = keys
            .iter()
            .map(|key| {
                let key = key.as_ref();
                (key.to_owned(), ring.lookup(key).cloned())
            })
            .collect();
        Self { assignments }
    }

    /// Assignment of `key`; `None` if the key was not sampled, `Some(None)`
    /// if it was sampled and resolved to no server.
    pub fn get(&self, key: &str) -> Option<Option<&ServerId>> {
        self.assignments.get(key).map(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&ServerId>)> {
        self.assignments
            .iter()
            .map(|(key, server)| (key.as_str(), server.as_ref()))
    }

    /// Number of this snapshot's keys assigned differently in `after`.
    pub fn changed_against(&self, after: &AssignmentSnapshot) -> usize {
        self.assignments
            .iter()
            .filter(|(key, server)| after.assignments.get(key.as_str()) != Some(*server))
            .count()
    }

    /// Keys assigned differently in `after`, in key order.
    pub fn changed_keys(&self, after: &AssignmentSnapshot) -> Vec<&str> {
        self.assignments
            .iter()
            .filter(|(key, server)| after.assignments.get(key.as_str()) != Some(*server))
            .map(|(key, _)| key.as_str())
            .collect()
    }

    /// Every key whose server differs in `after`, with both sides.
    pub fn moves(&self, after: &AssignmentSnapshot) -> Vec<KeyMove> {
        self.assignments
            .iter()
            .filter_map(|(key, from)| {
                let to = after.assignments.get(key).cloned().flatten();
                (*from != to).then(|| KeyMove {
                    key: key.clone(),
                    from: from.clone(),
                    to,
                })
            })
            .collect()
    }

    /// Per-server key counts; unassigned keys are not counted.
    pub fn load(&self) -> BTreeMap<ServerId, usize> {
        let mut load = BTreeMap::new();
        for server in self.assignments.values().flatten() {
            *load.entry(server.clone()).or_insert(0) += 1;
        }
        load
    }
}

/// Count keys in `keys` whose assignment differs between the snapshots.
///
/// Keys missing from a snapshot count as unassigned there.
pub fn count_changed_assignments<K: AsRef<str>>(
    keys: &[K],
    before: &AssignmentSnapshot,
    after: &AssignmentSnapshot,
) -> usize {
    keys.iter()
        .filter(|key| {
            let key = key.as_ref();
            before.get(key).flatten() != after.get(key).flatten()
        })
        .count()
}

/// Apply `change` to `ring` and return the fraction of `keys` that moved.
///
/// An empty sample observes nothing: the result is 0.0 and `change` is not
/// applied.
pub fn measure_impact<R, K, F>(ring: &mut R, keys: &[K], change: F) -> f64
where
    R: RingLookup + ?Sized,
    K: AsRef<str>,
    F: FnOnce(&mut R),
{
    if keys.is_empty() {
        return 0.0;
    }
    let before = AssignmentSnapshot::capture(&*ring, keys);
    change(&mut *ring);
    let after = AssignmentSnapshot::capture(&*ring, keys);
    let changed = count_changed_assignments(keys, &before, &after);
    let impact = changed as f64 / keys.len() as f64;
    debug!(changed, total = keys.len(), impact, "measured remapping impact");
    impact
}

/// Add `server` to `ring`, returning the fraction of `keys` that moved.
pub fn measure_addition_impact<R, K>(ring: &mut R, keys: &[K], server: &str) -> f64
where
    R: RingLookup + ?Sized,
    K: AsRef<str>,
{
    measure_impact(ring, keys, |ring| {
        ring.add_server(server);
    })
}

/// Remove `server` from `ring`, returning the fraction of `keys` that moved.
pub fn measure_removal_impact<R, K>(ring: &mut R, keys: &[K], server: &str) -> f64
where
    R: RingLookup + ?Sized,
    K: AsRef<str>,
{
    measure_impact(ring, keys, |ring| {
        ring.remove_server(server);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::BasicRing;

    fn snapshot(pairs: &[(&str, Option<&str>)]) -> AssignmentSnapshot {
        AssignmentSnapshot {
            assignments: pairs
                .iter()
                .map(|(k, s)| (k.to_string(), s.map(ServerId::from)))
                .collect(),
        }
    }

    #[test]
    fn test_count_changed_assignments() {
        let before = snapshot(&[
            ("key1", Some("server1")),
            ("key2", Some("server2")),
            ("key3", Some("server1")),
        ]);
        let after = snapshot(&[
            ("key1", Some("server1")),
            ("key2", Some("server3")),
            ("key3", Some("server2")),
        ]);
        let keys = ["key1", "key2", "key3"];

        assert_eq!(count_changed_assignments(&keys, &before, &after), 2);
        assert_eq!(before.changed_against(&after), 2);
        assert_eq!(before.changed_keys(&after), vec!["key2", "key3"]);
    }

    #[test]
    fn test_absence_counts_as_an_assignment() {
        let before = snapshot(&[("key1", None), ("key2", None)]);
        let after = snapshot(&[("key1", Some("server1")), ("key2", None)]);

        let moves = before.moves(&after);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].key, "key1");
        assert_eq!(moves[0].from, None);
        assert_eq!(moves[0].to, Some(ServerId::from("server1")));
    }

    #[test]
    fn test_empty_sample_has_zero_impact() {
        let mut ring = BasicRing::new();
        let keys: [&str; 0] = [];
        assert_eq!(measure_addition_impact(&mut ring, &keys, "server1"), 0.0);
        // The change is not applied when there is nothing to observe.
        assert_eq!(ring.server_count(), 0);
    }

    #[test]
    fn test_capture_and_load() {
        let mut ring = BasicRing::new();
        ring.add_server("server1");
        let keys = ["a", "b", "c"];
        let snap = AssignmentSnapshot::capture(&ring, &keys);

        assert_eq!(snap.len(), 3);
        assert_eq!(snap.get("a"), Some(Some(&ServerId::from("server1"))));
        assert_eq!(snap.get("zzz"), None);
        assert_eq!(snap.load().get("server1"), Some(&3));
    }

    #[test]
    fn test_first_server_moves_every_key() {
        let mut ring = BasicRing::new();
        let keys: Vec<String> = (1..=50).map(|i| format!("key{i}")).collect();
        assert_eq!(measure_addition_impact(&mut ring, &keys, "server1"), 1.0);
        assert_eq!(measure_removal_impact(&mut ring, &keys, "server1"), 1.0);
    }
}
