//! Ring topology views: how keys and position space split across servers.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::node::ServerId;
use crate::ring::{RingLookup, TokenRing};
use crate::token::Token;

/// Key counts per server over a sample of keys.
///
/// Only servers that received at least one key appear in the counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Topology {
    counts: BTreeMap<ServerId, usize>,
    unassigned: usize,
    total: usize,
}

impl Topology {
    pub fn from_keys<R, K>(ring: &R, keys: &[K]) -> Self
    where
        R: RingLookup + ?Sized,
        K: AsRef<str>,
    {
        let mut topology = Topology {
            total: keys.len(),
            ..Default::default()
        };
        for key in keys {
            match ring.lookup(key.as_ref()) {
                Some(server) => *topology.counts.entry(server.clone()).or_insert(0) += 1,
                None => topology.unassigned += 1,
            }
        }
        topology
    }

    pub fn counts(&self) -> &BTreeMap<ServerId, usize> {
        &self.counts
    }

    pub fn count(&self, server: &str) -> usize {
        self.counts.get(server).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn unassigned(&self) -> usize {
        self.unassigned
    }

    /// Share of the sample per server, as percentages.
    pub fn percentages(&self) -> BTreeMap<ServerId, f64> {
        if self.total == 0 {
            return BTreeMap::new();
        }
        self.counts
            .iter()
            .map(|(server, count)| (server.clone(), *count as f64 * 100.0 / self.total as f64))
            .collect()
    }

    /// Population standard deviation of the per-server percentages.
    pub fn std_dev_percent(&self) -> f64 {
        let values: Vec<f64> = self.percentages().into_values().collect();
        std_dev_percent(&values)
    }

    /// Largest single-server share of the sample, in `[0, 1]`.
    pub fn max_share(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let max = self.counts.values().copied().max().unwrap_or(0);
        max as f64 / self.total as f64
    }
}

/// Fraction of the whole position space owned by each server.
///
/// A position owns the arc from its predecessor (exclusive) up to itself
/// (inclusive). Fractions sum to 1 for a non-empty ring.
pub fn ownership<R>(ring: &R) -> BTreeMap<ServerId, f64>
where
    R: TokenRing + ?Sized,
{
    let ordered = ring.ordered();
    let mut shares = BTreeMap::new();
    let Some((last, owner)) = ordered.last() else {
        return shares;
    };
    if ordered.len() == 1 {
        shares.insert(owner.clone(), 1.0);
        return shares;
    }

    let (min, max) = (<R::Token as Token>::min_value(), <R::Token as Token>::max_value());
    let space = min.distance_to(&max) as f64 + 1.0;
    let mut previous = *last;
    for (token, server) in ordered.entries() {
        let arc = previous.distance_to(token) as f64 / space;
        *shares.entry(server.clone()).or_insert(0.0) += arc;
        previous = *token;
    }
    shares
}

/// Population standard deviation; 0 for an empty input.
pub fn std_dev_percent(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    variance.sqrt()
}
