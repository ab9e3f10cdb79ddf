//! Simple replication strategy.
//!
//! Places N replicas on distinct servers, clockwise from the key's position.
//!
//! # Algorithm
//!
//! 1. Find the key's position and its successor on the ring (the primary)
//! 2. Continue clockwise, skipping positions owned by servers already chosen
//! 3. Stop once `min(N, servers)` distinct servers are collected, or after
//!    one full revolution of the ring
//!
//! Replicas follow ring order, never server-id order.
//!
//! # Performance
//!
//! - **Time**: O(log n) to find the primary, then one step per position
//!   walked; with virtual nodes a few positions usually suffice
//! - **Space**: O(r) - the returned placement
//!
//! # Limitations
//!
//! - Doesn't consider data center/rack placement
//! - May place replicas on servers in the same failure domain

use corelib::{Error, Result, TokenRing};
use tracing::trace;

use crate::placement::ReplicaPlacement;
use crate::strategy::ReplicationStrategy;

/// Replication factor used when none is given.
pub const DEFAULT_REPLICATION_FACTOR: usize = 3;

/// Simple replication strategy: N replicas placed clockwise around the ring.
///
/// # Example
///
/// ```rust
/// use corelib::{RingLookup, VirtualNodeRing};
/// use replication::{ReplicationStrategy, SimpleStrategy};
///
/// let strategy = SimpleStrategy::new(3).unwrap();
/// let mut ring = VirtualNodeRing::new(16);
/// for id in ["server1", "server2", "server3", "server4"] {
///     ring.add_server(id);
/// }
///
/// let replicas = strategy.replicas_for_key(&ring, "my-key");
/// assert_eq!(replicas.len(), 3);
/// assert_eq!(replicas.primary(), ring.lookup("my-key"));
/// ```
#[derive(Debug, Clone)]
pub struct SimpleStrategy {
    /// Number of replicas to create (including primary).
    replication_factor: usize,
}

impl SimpleStrategy {
    /// Create a new simple strategy with the given replication factor.
    ///
    /// A factor of zero is a configuration error and is rejected here, so
    /// that per-key lookups stay infallible.
    pub fn new(replication_factor: usize) -> Result<Self> {
        if replication_factor == 0 {
            return Err(Error::InvalidReplicationFactor(replication_factor));
        }
        Ok(Self { replication_factor })
    }
}

impl Default for SimpleStrategy {
    fn default() -> Self {
        Self {
            replication_factor: DEFAULT_REPLICATION_FACTOR,
        }
    }
}

impl ReplicationStrategy for SimpleStrategy {
    fn replication_factor(&self) -> usize {
        self.replication_factor
    }

    fn replicas_for_key<R>(&self, ring: &R, key: &str) -> ReplicaPlacement
    where
        R: TokenRing + ?Sized,
    {
        let available = ring.server_count();
        if available == 0 || ring.ordered().is_empty() {
            return ReplicaPlacement::default();
        }
        let needed = self.replication_factor.min(available);

        let start = ring.token_for(key);
        let mut replicas = ReplicaPlacement::with_capacity(needed);
        let mut walked = 0usize;

        // clockwise() ends after one full revolution, so a ring with fewer
        // selectable servers than `needed` just yields what it has.
        for (_, server) in ring.ordered().clockwise(&start) {
            walked += 1;
            replicas.push_distinct(server);
            if replicas.len() >= needed {
                break;
            }
        }

        trace!(key, walked, replicas = replicas.len(), needed, "selected replicas");
        replicas
    }

    fn name(&self) -> &'static str {
        "SimpleStrategy"
    }
}
