//! Core token trait definitions.
//!
//! A token is a position on the ring. The trait is minimal so the ordered
//! ring, partitioners, and virtual nodes work over any position space.

use std::fmt::Debug;
use std::hash::Hash;

/// Minimal token trait for the hash ring.
///
/// Tokens are immutable, totally ordered positions. Implementations must be
/// cheap to copy, compare, and hash.
pub trait Token: Copy + Ord + Hash + Send + Sync + Debug + 'static {
    /// Minimum token value (start of ring).
    fn min_value() -> Self;
    /// Maximum token value (end of ring).
    fn max_value() -> Self;
    /// Clockwise distance from `self` to `other` on the ring.
    ///
    /// Wraps past the maximum back to the minimum, so the distance is zero
    /// only when both tokens are equal.
    fn distance_to(&self, other: &Self) -> u64;
}
