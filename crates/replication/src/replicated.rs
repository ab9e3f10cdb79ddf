//! A virtual-node ring with replica selection composed on top.

use std::collections::BTreeSet;

use corelib::ring::{OrderedRing, RingLookup, TokenRing};
use corelib::{Result, ServerId, VirtualNodeRing};

use crate::placement::ReplicaPlacement;
use crate::strategy::{ReplicationStrategy, SimpleStrategy};

/// Ring that answers "which servers hold this key" as well as "which server
/// owns this key".
///
/// Composition, not layering: the inner ring owns positions and membership,
/// the strategy only walks them. Membership changes go straight to the
/// inner ring.
#[derive(Debug, Clone)]
pub struct ReplicatedRing<R = VirtualNodeRing, S = SimpleStrategy> {
    ring: R,
    strategy: S,
}

impl ReplicatedRing {
    /// Virtual-node ring with `vnodes_per_server` positions per server and
    /// `replication_factor` replicas per key.
    ///
    /// Fails if `replication_factor` is zero.
    pub fn new(vnodes_per_server: usize, replication_factor: usize) -> Result<Self> {
        Ok(Self::with_ring(
            VirtualNodeRing::new(vnodes_per_server),
            SimpleStrategy::new(replication_factor)?,
        ))
    }
}

impl Default for ReplicatedRing {
    fn default() -> Self {
        Self::with_ring(VirtualNodeRing::default(), SimpleStrategy::default())
    }
}

impl<R: TokenRing, S: ReplicationStrategy> ReplicatedRing<R, S> {
    pub fn with_ring(ring: R, strategy: S) -> Self {
        Self { ring, strategy }
    }

    /// The server a key primarily belongs to; same as `lookup`.
    pub fn primary_server_for_key(&self, key: &str) -> Option<&ServerId> {
        self.ring.lookup(key)
    }

    /// Primary and replicas, distinct, in ring order.
    pub fn all_servers_for_key(&self, key: &str) -> ReplicaPlacement {
        self.strategy.replicas_for_key(&self.ring, key)
    }

    /// Whether `key` is stored on a full `replication_factor` servers.
    pub fn has_full_replication(&self, key: &str) -> bool {
        let factor = self.strategy.replication_factor();
        self.ring.server_count() >= factor && self.all_servers_for_key(key).len() == factor
    }

    pub fn replication_factor(&self) -> usize {
        self.strategy.replication_factor()
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn ring(&self) -> &R {
        &self.ring
    }

    pub fn into_inner(self) -> R {
        self.ring
    }
}

impl<R: TokenRing, S: ReplicationStrategy> RingLookup for ReplicatedRing<R, S> {
    fn add_server(&mut self, id: &str) -> bool {
        self.ring.add_server(id)
    }

    fn remove_server(&mut self, id: &str) -> bool {
        self.ring.remove_server(id)
    }

    fn lookup(&self, key: &str) -> Option<&ServerId> {
        self.ring.lookup(key)
    }

    fn server_count(&self) -> usize {
        self.ring.server_count()
    }

    fn servers(&self) -> BTreeSet<ServerId> {
        self.ring.servers()
    }

    fn contains_server(&self, id: &str) -> bool {
        self.ring.contains_server(id)
    }
}

impl<R: TokenRing, S: ReplicationStrategy> TokenRing for ReplicatedRing<R, S> {
    type Token = R::Token;

    fn token_for(&self, key: &str) -> Self::Token {
        self.ring.token_for(key)
    }

    fn ordered(&self) -> &OrderedRing<Self::Token> {
        self.ring.ordered()
    }
}
