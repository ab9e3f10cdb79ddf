//! Consistent hash ring implementation.
//!
//! The ring manages token positions and provides efficient lookup
//! operations for finding the server responsible for a key.
//!
//! Ring variants are composed rather than layered: every variant owns its
//! own `OrderedRing` and partitioner, and exposes the same `RingLookup`
//! capability. Replication composes over any `TokenRing`.

use std::collections::BTreeSet;

pub mod basic;
pub mod builder;
pub mod ordered;
pub mod virtual_node;

pub use basic::BasicRing;
pub use builder::RingBuilder;
pub use ordered::OrderedRing;
pub use virtual_node::{VirtualNodeRing, DEFAULT_VNODES};

use crate::node::ServerId;
use crate::token::Token;

/// The capability every key-to-server assignment scheme exposes.
///
/// Membership changes are total: adding a present server or removing an
/// absent one is a silent no-op. Lookups are pure functions of the current
/// membership and return `None` only when no server can be selected.
pub trait RingLookup {
    /// Add a server. Returns `true` if membership changed.
    fn add_server(&mut self, id: &str) -> bool;

    /// Remove a server. Returns `true` if membership changed.
    fn remove_server(&mut self, id: &str) -> bool;

    /// Server responsible for `key`.
    fn lookup(&self, key: &str) -> Option<&ServerId>;

    /// Number of servers currently registered.
    fn server_count(&self) -> usize;

    /// All servers currently registered.
    fn servers(&self) -> BTreeSet<ServerId>;

    fn contains_server(&self, id: &str) -> bool {
        self.servers().contains(id)
    }

    fn is_empty(&self) -> bool {
        self.server_count() == 0
    }
}

/// A `RingLookup` backed by an ordered ring of positions.
///
/// This is the surface clockwise walks (replica selection, ownership) need.
pub trait TokenRing: RingLookup {
    type Token: Token;

    /// Ring position of `key`.
    fn token_for(&self, key: &str) -> Self::Token;

    /// The positions and their owners.
    fn ordered(&self) -> &OrderedRing<Self::Token>;
}
