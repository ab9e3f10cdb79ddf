//! Closed-form remapping cost for modulo sharding.
//!
//! With a uniform hash, a key's position `h` is uniform modulo
//! `lcm(N, M)`. It keeps its index across a change from `N` to `M` servers
//! iff `h mod N == h mod M`, which by the Chinese remainder theorem holds
//! for `gcd(N, M)` of every `max(N, M)` residues. Hence
//!
//! ```text
//! impact = 1 - gcd(N, M) / max(N, M)
//! ```
//!
//! Counting indices is exact only when the surviving servers keep their
//! indices. `impact_between_memberships` counts same-server index pairs
//! instead and stays exact under relabelling, including equal-size swaps.

/// Greatest common divisor (Euclid).
pub fn gcd(a: u64, b: u64) -> u64 {
    let (mut x, mut y) = (a, b);
    while y != 0 {
        let t = x % y;
        x = y;
        y = t;
    }
    x
}

/// Least common multiple; 0 if either argument is 0.
pub fn lcm(a: u64, b: u64) -> u64 {
    if a == 0 || b == 0 {
        return 0;
    }
    a / gcd(a, b) * b
}

/// Expected fraction of keys remapped when going from `before` to `after`
/// servers.
///
/// Equal counts give 0 (count-only: a same-size membership swap is not
/// visible here). Going from or to zero servers is a total remap, 1.0.
pub fn impact_between_counts(before: usize, after: usize) -> f64 {
    if before == after {
        return 0.0;
    }
    if before == 0 || after == 0 {
        return 1.0;
    }
    let (n, m) = (before as u64, after as u64);
    1.0 - gcd(n, m) as f64 / n.max(m) as f64
}

/// Expected fraction of keys remapped between two server lists, each in
/// sharder index order.
///
/// Index `i` of `before` and index `j` of `after` are hit together by
/// exactly one residue modulo `lcm` when `i ≡ j (mod gcd)`, and never
/// otherwise. A key is unmoved when that pair names the same server.
pub fn impact_between_memberships<T: PartialEq>(before: &[T], after: &[T]) -> f64 {
    if before == after {
        return 0.0;
    }
    if before.is_empty() || after.is_empty() {
        return 1.0;
    }

    let (n, m) = (before.len() as u64, after.len() as u64);
    let g = gcd(n, m);
    let period = lcm(n, m) as f64;

    let mut unmoved = 0u64;
    for (i, old) in before.iter().enumerate() {
        for (j, new) in after.iter().enumerate() {
            if old == new && (i as u64).abs_diff(j as u64) % g == 0 {
                unmoved += 1;
            }
        }
    }
    1.0 - unmoved as f64 / period
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_gcd_lcm() {
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(3, 4), 1);
        assert_eq!(gcd(0, 5), 5);
        assert_eq!(gcd(5, 0), 5);
        assert_eq!(lcm(4, 6), 12);
        assert_eq!(lcm(0, 6), 0);
    }

    #[test]
    fn test_counts_three_to_four() {
        assert!((impact_between_counts(3, 4) - 0.75).abs() < EPS);
    }

    #[test]
    fn test_counts_three_to_two() {
        assert!((impact_between_counts(3, 2) - 2.0 / 3.0).abs() < EPS);
    }

    #[test]
    fn test_counts_shared_factor() {
        // gcd(4, 6) = 2: a third of keys keep their index.
        assert!((impact_between_counts(4, 6) - 2.0 / 3.0).abs() < EPS);
        assert!((impact_between_counts(6, 3) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_counts_boundaries() {
        assert_eq!(impact_between_counts(0, 5), 1.0);
        assert_eq!(impact_between_counts(5, 0), 1.0);
        assert_eq!(impact_between_counts(0, 0), 0.0);
        assert_eq!(impact_between_counts(7, 7), 0.0);
    }

    #[test]
    fn test_memberships_agree_with_counts_when_prefix_survives() {
        let before = ["s1", "s2", "s3"];
        let after = ["s1", "s2", "s3", "s4"];
        assert!((impact_between_memberships(&before, &after) - 0.75).abs() < EPS);
    }

    #[test]
    fn test_memberships_remove_and_add_two() {
        let before = ["server1", "server2", "server3"];
        let after = ["server1", "server3", "server4", "server5"];
        assert!((impact_between_memberships(&before, &after) - 5.0 / 6.0).abs() < EPS);
    }

    #[test]
    fn test_memberships_equal_size_swap() {
        // Counts alone claim nothing moves; one of three slots changed owner.
        let before = ["a", "b", "c"];
        let after = ["a", "b", "d"];
        assert_eq!(impact_between_counts(3, 3), 0.0);
        assert!((impact_between_memberships(&before, &after) - 1.0 / 3.0).abs() < EPS);
    }

    #[test]
    fn test_memberships_boundaries() {
        let empty: [&str; 0] = [];
        assert_eq!(impact_between_memberships(&empty, &["only"]), 1.0);
        assert_eq!(impact_between_memberships(&["solo"], &empty), 1.0);
        assert_eq!(impact_between_memberships(&empty, &empty), 0.0);
        assert_eq!(impact_between_memberships(&["a", "b"], &["a", "b"]), 0.0);
    }
}
