//! Impact measurement for a modulo sharder.
//!
//! Analytical figures come from `crate::analytical`. Empirical figures
//! apply the change to a private copy, so the measured sharder is never
//! mutated.

use corelib::impact::measure_impact;
use corelib::{RingLookup, ServerId, Topology};
use tracing::debug;

use crate::analytical::{impact_between_counts, impact_between_memberships};
use crate::modulo::ModuloSharder;

/// Read-only view over a `ModuloSharder` for impact questions.
#[derive(Debug, Clone, Copy)]
pub struct ModuloMetrics<'a> {
    sharder: &'a ModuloSharder,
}

impl<'a> ModuloMetrics<'a> {
    pub fn new(sharder: &'a ModuloSharder) -> Self {
        Self { sharder }
    }

    /// Expected fraction of keys remapped by adding one server (N → N+1).
    pub fn impact_of_addition(&self) -> f64 {
        let n = self.sharder.server_count();
        impact_between_counts(n, n + 1)
    }

    /// Expected fraction of keys remapped by removing one server (N → N-1).
    ///
    /// An empty sharder has nothing to remove and reports 0.
    pub fn impact_of_removal(&self) -> f64 {
        let n = self.sharder.server_count();
        if n == 0 {
            return 0.0;
        }
        impact_between_counts(n, n - 1)
    }

    /// Expected impact of adding `server`, from the exact before and after
    /// server lists.
    pub fn membership_impact_of_addition(&self, server: &str) -> f64 {
        let mut after = self.sharder.clone();
        after.add_server(server);
        self.membership_impact(&after)
    }

    /// Expected impact of removing `server`, from the exact server lists.
    pub fn membership_impact_of_removal(&self, server: &str) -> f64 {
        let mut after = self.sharder.clone();
        after.remove_server(server);
        self.membership_impact(&after)
    }

    fn membership_impact(&self, after: &ModuloSharder) -> f64 {
        let before: &[ServerId] = self.sharder.server_list();
        let impact = impact_between_memberships(before, after.server_list());
        debug!(
            before = before.len(),
            after = after.server_count(),
            impact,
            "computed modulo membership impact"
        );
        impact
    }

    /// Apply `change` to a copy of the sharder and return the fraction of
    /// `keys` that moved.
    pub fn measure_impact<K, F>(&self, keys: &[K], change: F) -> f64
    where
        K: AsRef<str>,
        F: FnOnce(&mut ModuloSharder),
    {
        let mut scratch = self.sharder.clone();
        measure_impact(&mut scratch, keys, change)
    }

    pub fn measure_addition_impact<K: AsRef<str>>(&self, keys: &[K], server: &str) -> f64 {
        self.measure_impact(keys, |sharder| {
            sharder.add_server(server);
        })
    }

    pub fn measure_removal_impact<K: AsRef<str>>(&self, keys: &[K], server: &str) -> f64 {
        self.measure_impact(keys, |sharder| {
            sharder.remove_server(server);
        })
    }

    /// Per-server key counts for `keys` under the current membership.
    pub fn distribution<K: AsRef<str>>(&self, keys: &[K]) -> Topology {
        Topology::from_keys(self.sharder, keys)
    }
}
