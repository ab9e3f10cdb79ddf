//! Remapping impact and load distribution on consistent hash rings.

use corelib::impact::{measure_addition_impact, measure_removal_impact, AssignmentSnapshot};
use corelib::ring::{BasicRing, RingLookup, VirtualNodeRing};
use corelib::Topology;

fn sample_keys(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("key{i}")).collect()
}

fn with_servers<R: RingLookup>(mut ring: R, ids: &[&str]) -> R {
    for id in ids {
        ring.add_server(id);
    }
    ring
}

const THREE: [&str; 3] = ["server1", "server2", "server3"];

#[test]
fn test_snapshot_assigns_every_key_to_a_member() {
    let ring = with_servers(BasicRing::new(), &THREE);
    let keys = ["key1", "key2", "key3", "key4", "key5"];
    let snapshot = AssignmentSnapshot::capture(&ring, &keys);

    assert_eq!(snapshot.len(), keys.len());
    let members = ring.servers();
    for key in keys {
        let server = snapshot.get(key).flatten().expect("assigned");
        assert!(members.contains(server));
    }
    assert_eq!(snapshot, AssignmentSnapshot::capture(&ring, &keys));
}

#[test]
fn test_basic_ring_addition_is_local() {
    let mut ring = with_servers(BasicRing::new(), &THREE);
    let keys = sample_keys(1000);
    let before = AssignmentSnapshot::capture(&ring, &keys);

    let impact = measure_addition_impact(&mut ring, &keys, "server4");
    assert!(impact > 0.0, "some keys must move");
    assert!(impact < 0.5, "impact {impact} is not local");

    // Every moved key moved onto the new server.
    let after = AssignmentSnapshot::capture(&ring, &keys);
    let moves = before.moves(&after);
    assert_eq!(moves.len() as f64 / keys.len() as f64, impact);
    assert!(moves.iter().all(|m| m.to.as_ref().is_some_and(|s| s == "server4")));
}

#[test]
fn test_basic_ring_removal_is_local() {
    let mut ring = with_servers(BasicRing::new(), &THREE);
    let keys = sample_keys(1000);
    let before = AssignmentSnapshot::capture(&ring, &keys);

    let impact = measure_removal_impact(&mut ring, &keys, "server3");
    assert!(impact > 0.0);
    assert!(impact < 0.5, "impact {impact} is not local");

    // Only keys that lived on the removed server moved.
    let after = AssignmentSnapshot::capture(&ring, &keys);
    assert!(before
        .moves(&after)
        .iter()
        .all(|m| m.from.as_ref().is_some_and(|s| s == "server3")));
}

#[test]
fn test_virtual_node_ring_changes_are_local() {
    let keys = sample_keys(1000);

    let mut ring = with_servers(VirtualNodeRing::new(150), &THREE);
    let impact = measure_addition_impact(&mut ring, &keys, "server4");
    assert!(impact > 0.0 && impact < 0.5, "addition impact {impact}");

    let mut ring = with_servers(VirtualNodeRing::new(150), &THREE);
    let impact = measure_removal_impact(&mut ring, &keys, "server3");
    assert!(impact > 0.0 && impact < 0.5, "removal impact {impact}");
}

#[test]
fn test_removing_missing_server_moves_nothing() {
    let mut ring = with_servers(VirtualNodeRing::new(50), &THREE);
    let impact = measure_removal_impact(&mut ring, &sample_keys(500), "server9");
    assert_eq!(impact, 0.0);
}

#[test]
fn test_readding_present_server_moves_nothing() {
    let mut ring = with_servers(BasicRing::new(), &THREE);
    let impact = measure_addition_impact(&mut ring, &sample_keys(500), "server2");
    assert_eq!(impact, 0.0);
}

#[test]
fn test_virtual_nodes_distribution() {
    let ring = with_servers(VirtualNodeRing::new(100), &THREE);
    let topology = Topology::from_keys(&ring, &sample_keys(9000));

    assert_eq!(topology.counts().len(), 3);
    for (server, pct) in topology.percentages() {
        assert!((25.0..=42.0).contains(&pct), "{server}: {pct:.1}%");
    }
    assert!(topology.std_dev_percent() < 4.0);
}

#[test]
fn test_more_vnodes_smooth_distribution() {
    let keys = sample_keys(12_000);
    let deviation = |vnodes: usize| {
        let ring = with_servers(VirtualNodeRing::new(vnodes), &THREE);
        Topology::from_keys(&ring, &keys).std_dev_percent()
    };

    let few = deviation(1);
    let many = deviation(500);
    assert!(many < few, "500 vnodes ({many:.2}%) vs 1 vnode ({few:.2}%)");
}

#[test]
fn test_vnode_tiers_stay_within_deviation_limits() {
    let keys = sample_keys(6000);
    let tiers = [
        (10, 15.0),
        (25, 12.0),
        (50, 8.0),
        (100, 6.0),
        (150, 5.0),
        (200, 4.0),
        (300, 3.0),
    ];
    for (vnodes, limit) in tiers {
        let ring = with_servers(VirtualNodeRing::new(vnodes), &THREE);
        let topology = Topology::from_keys(&ring, &keys);
        let deviation = topology.std_dev_percent();
        assert!(deviation <= limit, "{vnodes} vnodes: {deviation:.2}% > {limit}%");
        for (server, pct) in topology.percentages() {
            assert!((20.0..=50.0).contains(&pct), "{vnodes} vnodes, {server}: {pct:.1}%");
        }
    }
}

#[test]
fn test_deviation_trends_down_as_vnodes_grow() {
    // Not monotonic for small counts, so compare averages of the low and
    // high halves.
    let keys = sample_keys(8000);
    let servers = ["serverA", "serverB", "serverC"];
    let deviations: Vec<(usize, f64)> = [10, 30, 50, 100, 200, 400]
        .into_iter()
        .map(|vnodes| {
            let ring = with_servers(VirtualNodeRing::new(vnodes), &servers);
            (vnodes, Topology::from_keys(&ring, &keys).std_dev_percent())
        })
        .collect();

    let average = |slice: &[(usize, f64)]| slice.iter().map(|(_, d)| d).sum::<f64>() / slice.len() as f64;
    let early = average(&deviations[..3]);
    let late = average(&deviations[3..]);
    assert!(late <= early, "late {late:.2}% vs early {early:.2}%: {deviations:?}");

    let worst = deviations.iter().map(|(_, d)| *d).fold(f64::MIN, f64::max);
    let best = deviations.iter().map(|(_, d)| *d).fold(f64::MAX, f64::min);
    assert!(worst > best * 1.3, "worst {worst:.2}% vs best {best:.2}%");
}
