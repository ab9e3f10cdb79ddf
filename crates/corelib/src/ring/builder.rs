//! Builder for virtual-node rings.

use crate::partitioner::{Md5Partitioner, Partitioner};
use crate::ring::virtual_node::{VirtualNodeRing, DEFAULT_VNODES};
use crate::ring::RingLookup;

/// Builds a `VirtualNodeRing` with a fixed vnode count and an initial set
/// of servers.
///
/// ```rust
/// use corelib::{RingBuilder, RingLookup};
///
/// let ring = RingBuilder::new()
///     .with_vnodes(8)
///     .add_server("server1")
///     .add_server("server2")
///     .build();
/// assert_eq!(ring.server_count(), 2);
/// assert_eq!(ring.vnode_count(), 16);
/// ```
#[derive(Debug, Clone)]
pub struct RingBuilder<P: Partitioner = Md5Partitioner> {
    vnodes_per_server: usize,
    partitioner: P,
    servers: Vec<String>,
}

impl RingBuilder {
    pub fn new() -> Self {
        Self {
            vnodes_per_server: DEFAULT_VNODES,
            partitioner: Md5Partitioner,
            servers: Vec::new(),
        }
    }
}

impl Default for RingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Partitioner> RingBuilder<P> {
    /// Number of virtual nodes per server. Zero is allowed.
    pub fn with_vnodes(mut self, vnodes_per_server: usize) -> Self {
        self.vnodes_per_server = vnodes_per_server;
        self
    }

    /// Swap the partitioner that places servers and keys.
    pub fn with_partitioner<Q: Partitioner>(self, partitioner: Q) -> RingBuilder<Q> {
        RingBuilder {
            vnodes_per_server: self.vnodes_per_server,
            partitioner,
            servers: self.servers,
        }
    }

    pub fn add_server(mut self, id: impl Into<String>) -> Self {
        self.servers.push(id.into());
        self
    }

    pub fn add_servers<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.servers.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> VirtualNodeRing<P> {
        let mut ring = VirtualNodeRing::with_partitioner(self.vnodes_per_server, self.partitioner);
        for id in &self.servers {
            ring.add_server(id);
        }
        ring
    }
}
