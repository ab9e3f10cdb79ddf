//! Replication strategy abstractions.
//!
//! Replication strategies determine how many replicas to create and where
//! to place them on the ring.
//!
//! - **SimpleStrategy**: N replicas placed on distinct servers, clockwise

pub mod simple;

pub use simple::{SimpleStrategy, DEFAULT_REPLICATION_FACTOR};

use corelib::TokenRing;

use crate::placement::ReplicaPlacement;

/// Trait for replication strategies.
///
/// A replication strategy determines:
/// 1. How many replicas to create for a key
/// 2. Which servers should hold those replicas
///
/// # Thread Safety
///
/// Implementations must be thread-safe (Send + Sync) as they may be
/// shared across threads.
pub trait ReplicationStrategy: Send + Sync + 'static {
    /// Get the number of replicas this strategy creates.
    fn replication_factor(&self) -> usize;

    /// Find replica servers for a given key, primary first.
    ///
    /// Returns fewer than `replication_factor()` servers when the ring has
    /// fewer selectable servers; never fails.
    ///
    /// # Performance
    /// O(log n + w) where n = positions and w = positions walked
    fn replicas_for_key<R>(&self, ring: &R, key: &str) -> ReplicaPlacement
    where
        R: TokenRing + ?Sized;

    /// Get the strategy name (for logging/debugging).
    fn name(&self) -> &'static str;
}
