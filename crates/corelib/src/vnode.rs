//! Virtual node abstractions.
//!
//! # Virtual Nodes (VNodes) Concept
//!
//! Instead of each physical server having a single position on the ring,
//! each server has many (virtual nodes). This provides:
//!
//! 1. **Better Load Distribution**: More positions = smoother distribution of keys
//! 2. **Gradual Rebalancing**: When servers join/leave, keys move to and from many neighbours
//!
//! The spread of per-server key share shrinks roughly with `1/sqrt(v)` as
//! the vnode count `v` grows, though not monotonically for small `v`.
//!
//! # Performance Characteristics
//!
//! - **Memory**: O(v) per server
//! - **Lookup**: O(log n) where n = total vnodes

use crate::node::ServerId;
use crate::partitioner::Partitioner;
use crate::token::Token;

/// A virtual node on the hash ring.
///
/// Represents a single position owned by a physical server. The position is
/// the hash of `"{server}:{index}"`.
///
/// # Example
///
/// ```rust
/// use corelib::VirtualNode;
/// use corelib::partitioner::Md5Partitioner;
///
/// let vnode = VirtualNode::from_index(&Md5Partitioner, &"server1".into(), 0);
/// assert_eq!(vnode.server().as_str(), "server1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtualNode<T: Token> {
    /// Position on the ring.
    pub token: T,

    /// The physical server that owns this virtual node.
    pub server: ServerId,
}

impl<T: Token> VirtualNode<T> {
    #[inline]
    pub fn new(token: T, server: ServerId) -> Self {
        Self { token, server }
    }

    /// Create the `vnode_index`-th virtual node of `server`.
    pub fn from_index<P>(partitioner: &P, server: &ServerId, vnode_index: usize) -> Self
    where
        P: Partitioner<TokenType = T>,
    {
        let token = partitioner.position(&Self::label(server, vnode_index));
        Self::new(token, server.clone())
    }

    /// The string hashed to place a virtual node: `"server:index"`.
    pub fn label(server: &ServerId, vnode_index: usize) -> String {
        format!("{}:{}", server, vnode_index)
    }

    #[inline]
    pub fn token(&self) -> T {
        self.token
    }

    #[inline]
    pub fn server(&self) -> &ServerId {
        &self.server
    }

    /// Clockwise distance to another virtual node.
    #[inline]
    pub fn distance_to(&self, other: &Self) -> u64 {
        self.token.distance_to(&other.token)
    }
}

impl<T: Token + std::fmt::Display> std::fmt::Display for VirtualNode<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VNode(token={}, server={})", self.token, self.server)
    }
}
