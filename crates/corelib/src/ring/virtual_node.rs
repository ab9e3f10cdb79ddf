//! Many positions per server.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace};

use crate::node::{PhysicalServer, ServerId};
use crate::partitioner::{Md5Partitioner, Partitioner};
use crate::ring::ordered::OrderedRing;
use crate::ring::{RingLookup, TokenRing};
use crate::vnode::VirtualNode;

/// Default number of virtual nodes per server.
pub const DEFAULT_VNODES: usize = 150;

/// Consistent hash ring where every physical server owns `vnodes_per_server`
/// positions.
///
/// # Invariants
///
/// - A server's tracked token set is exactly the positions inserted on its
///   behalf; positions lost to a collision are never tracked.
/// - Removing a server removes exactly its tracked set, nothing else.
/// - With zero vnodes a server is registered (it counts and is listed) but
///   owns no positions and is never returned by `lookup`.
#[derive(Debug, Clone)]
pub struct VirtualNodeRing<P: Partitioner = Md5Partitioner> {
    partitioner: P,
    vnodes_per_server: usize,
    ring: OrderedRing<P::TokenType>,
    servers: BTreeMap<ServerId, PhysicalServer<P::TokenType>>,
}

impl VirtualNodeRing {
    pub fn new(vnodes_per_server: usize) -> Self {
        Self::with_partitioner(vnodes_per_server, Md5Partitioner)
    }
}

impl Default for VirtualNodeRing {
    fn default() -> Self {
        Self::new(DEFAULT_VNODES)
    }
}

impl<P: Partitioner> VirtualNodeRing<P> {
    pub fn with_partitioner(vnodes_per_server: usize, partitioner: P) -> Self {
        Self {
            partitioner,
            vnodes_per_server,
            ring: OrderedRing::new(),
            servers: BTreeMap::new(),
        }
    }

    pub fn vnodes_per_server(&self) -> usize {
        self.vnodes_per_server
    }

    /// Number of positions on the ring, across all servers.
    pub fn vnode_count(&self) -> usize {
        self.ring.len()
    }

    /// The physical server record for `id`, if registered.
    pub fn server(&self, id: &str) -> Option<&PhysicalServer<P::TokenType>> {
        self.servers.get(id)
    }

    /// Virtual nodes owned by `id`, in position order.
    pub fn vnodes_of(&self, id: &str) -> Vec<VirtualNode<P::TokenType>> {
        self.servers
            .get(id)
            .map(|server| {
                server
                    .tokens
                    .iter()
                    .map(|token| VirtualNode::new(*token, server.id.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn partitioner_name(&self) -> &'static str {
        self.partitioner.name()
    }
}

impl<P: Partitioner> RingLookup for VirtualNodeRing<P> {
    fn add_server(&mut self, id: &str) -> bool {
        if self.servers.contains_key(id) {
            return false;
        }

        let server_id = ServerId::from(id);
        let mut physical = PhysicalServer::new(server_id.clone());
        for index in 0..self.vnodes_per_server {
            let vnode = VirtualNode::from_index(&self.partitioner, &server_id, index);
            if self.ring.insert(vnode.token, vnode.server) {
                physical.tokens.insert(vnode.token);
            } else {
                trace!(server = id, index, token = ?vnode.token, "vnode position already taken");
            }
        }

        debug!(
            server = id,
            vnodes = physical.token_count(),
            requested = self.vnodes_per_server,
            "added server to ring"
        );
        self.servers.insert(server_id, physical);
        true
    }

    fn remove_server(&mut self, id: &str) -> bool {
        let Some(physical) = self.servers.remove(id) else {
            return false;
        };
        for token in &physical.tokens {
            self.ring.remove(token);
        }
        debug!(server = id, vnodes = physical.token_count(), "removed server from ring");
        true
    }

    fn lookup(&self, key: &str) -> Option<&ServerId> {
        if self.ring.is_empty() {
            return None;
        }
        let token = self.partitioner.position(key);
        self.ring.successor(&token).map(|(_, server)| server)
    }

    fn server_count(&self) -> usize {
        self.servers.len()
    }

    fn servers(&self) -> BTreeSet<ServerId> {
        self.servers.keys().cloned().collect()
    }

    fn contains_server(&self, id: &str) -> bool {
        self.servers.contains_key(id)
    }
}

impl<P: Partitioner> TokenRing for VirtualNodeRing<P> {
    type Token = P::TokenType;

    fn token_for(&self, key: &str) -> Self::Token {
        self.partitioner.position(key)
    }

    fn ordered(&self) -> &OrderedRing<Self::Token> {
        &self.ring
    }
}
