//! Replica selection over a virtual-node ring.

use std::collections::BTreeSet;

use corelib::RingLookup;
use proptest::prelude::*;
use replication::ReplicatedRing;

fn ring_with(count: usize) -> ReplicatedRing {
    let mut ring = ReplicatedRing::new(100, 3).unwrap();
    for i in 1..=count {
        ring.add_server(&format!("server{i}"));
    }
    ring
}

#[test]
fn test_primary_is_a_member() {
    let ring = ring_with(4);
    let primary = ring.primary_server_for_key("testKey").expect("primary");
    assert!(ring.servers().contains(primary));
}

#[test]
fn test_replica_count_and_order() {
    let ring = ring_with(4);
    let replicas = ring.all_servers_for_key("testKey");

    assert_eq!(replicas.len(), 3);
    let unique: BTreeSet<_> = replicas.servers().iter().collect();
    assert_eq!(unique.len(), 3, "replicas must be distinct");
    assert_eq!(replicas.primary(), ring.primary_server_for_key("testKey"));
    assert!(ring.has_full_replication("testKey"));
}

#[test]
fn test_fewer_servers_than_factor() {
    let ring = ring_with(2);
    assert_eq!(ring.all_servers_for_key("testKey").len(), 2);
    assert!(!ring.has_full_replication("testKey"));
}

#[test]
fn test_different_keys_get_different_replica_sets() {
    let ring = ring_with(4);
    assert_ne!(ring.all_servers_for_key("key1"), ring.all_servers_for_key("key2"));
}

#[test]
fn test_replication_across_cluster_sizes() {
    for count in [1, 2, 3, 4, 5, 10] {
        let ring = ring_with(count);
        let expected = count.min(ring.replication_factor());
        assert_eq!(ring.all_servers_for_key("testKey").len(), expected, "{count} servers");
        assert_eq!(ring.has_full_replication("testKey"), count >= ring.replication_factor());
    }
}

#[test]
fn test_empty_ring() {
    let ring = ReplicatedRing::default();
    assert!(ring.all_servers_for_key("k").is_empty());
    assert_eq!(ring.primary_server_for_key("k"), None);
    assert!(!ring.has_full_replication("k"));
}

#[test]
fn test_removed_server_leaves_every_replica_set() {
    let mut ring = ring_with(5);
    ring.remove_server("server3");
    for i in 0..200 {
        let replicas = ring.all_servers_for_key(&format!("key{i}"));
        assert_eq!(replicas.len(), 3);
        assert!(!replicas.contains("server3"));
    }
}

#[test]
fn test_replicas_shift_by_at_most_one_on_addition() {
    let mut ring = ring_with(5);
    let keys: Vec<String> = (0..300).map(|i| format!("key{i}")).collect();
    let before: Vec<_> = keys.iter().map(|k| ring.all_servers_for_key(k)).collect();

    ring.add_server("server6");
    for (key, old) in keys.iter().zip(before) {
        let new = ring.all_servers_for_key(key);
        let gained = new.servers().iter().filter(|s| !old.servers().contains(*s)).count();
        assert!(gained <= 1, "{key}: {old:?} -> {new:?}");
        if gained == 1 {
            assert!(new.contains("server6"));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// min(N, D) distinct servers, primary first.
    #[test]
    fn prop_replication_bound(
        servers in 0usize..8,
        factor in 1usize..6,
        vnodes in 1usize..20,
        key in ".{0,16}",
    ) {
        let mut ring = ReplicatedRing::new(vnodes, factor).unwrap();
        for i in 0..servers {
            ring.add_server(&format!("s{i}"));
        }

        let replicas = ring.all_servers_for_key(&key);
        prop_assert_eq!(replicas.len(), factor.min(servers));
        let unique: BTreeSet<_> = replicas.servers().iter().collect();
        prop_assert_eq!(unique.len(), replicas.len());
        prop_assert_eq!(replicas.primary(), ring.primary_server_for_key(&key));
        prop_assert_eq!(ring.has_full_replication(&key), servers >= factor);
    }
}
