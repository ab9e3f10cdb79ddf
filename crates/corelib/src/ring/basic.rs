//! One position per server.

use std::collections::BTreeSet;

use tracing::{debug, trace};

use crate::node::ServerId;
use crate::partitioner::{Md5Partitioner, Partitioner};
use crate::ring::ordered::OrderedRing;
use crate::ring::{RingLookup, TokenRing};

/// The plain consistent hash ring: each server sits at `position(id)`, each
/// key belongs to the first server clockwise from `position(key)`.
#[derive(Debug, Clone)]
pub struct BasicRing<P: Partitioner = Md5Partitioner> {
    partitioner: P,
    ring: OrderedRing<P::TokenType>,
}

impl BasicRing {
    pub fn new() -> Self {
        Self::with_partitioner(Md5Partitioner)
    }
}

impl Default for BasicRing {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Partitioner> BasicRing<P> {
    pub fn with_partitioner(partitioner: P) -> Self {
        Self {
            partitioner,
            ring: OrderedRing::new(),
        }
    }

    pub fn partitioner_name(&self) -> &'static str {
        self.partitioner.name()
    }
}

impl<P: Partitioner> RingLookup for BasicRing<P> {
    fn add_server(&mut self, id: &str) -> bool {
        let token = self.partitioner.position(id);
        let inserted = self.ring.insert(token, ServerId::from(id));
        if inserted {
            debug!(server = id, ?token, "added server to ring");
        } else {
            trace!(server = id, ?token, "position already taken");
        }
        inserted
    }

    fn remove_server(&mut self, id: &str) -> bool {
        let token = self.partitioner.position(id);
        // A server that lost a collision never owned this position.
        if self.ring.get(&token).is_some_and(|owner| owner == id) {
            self.ring.remove(&token);
            debug!(server = id, ?token, "removed server from ring");
            true
        } else {
            false
        }
    }

    fn lookup(&self, key: &str) -> Option<&ServerId> {
        if self.ring.is_empty() {
            return None;
        }
        let token = self.partitioner.position(key);
        self.ring.successor(&token).map(|(_, server)| server)
    }

    fn server_count(&self) -> usize {
        self.ring.len()
    }

    fn servers(&self) -> BTreeSet<ServerId> {
        self.ring.entries().map(|(_, server)| server.clone()).collect()
    }

    fn contains_server(&self, id: &str) -> bool {
        let token = self.partitioner.position(id);
        self.ring.get(&token).is_some_and(|owner| owner == id)
    }
}

impl<P: Partitioner> TokenRing for BasicRing<P> {
    type Token = P::TokenType;

    fn token_for(&self, key: &str) -> Self::Token {
        self.partitioner.position(key)
    }

    fn ordered(&self) -> &OrderedRing<Self::Token> {
        &self.ring
    }
}
