//! Replication for consistent hashing.
//!
//! This crate provides pluggable replication strategies that determine
//! which servers hold copies of a key, and a ring that composes a
//! strategy over a virtual-node ring:
//! - How many replicas to create
//! - Where to place replicas (which servers, in which order)

pub mod placement;
pub mod replicated;
pub mod strategy;

pub use placement::ReplicaPlacement;
pub use replicated::ReplicatedRing;
pub use strategy::{ReplicationStrategy, SimpleStrategy, DEFAULT_REPLICATION_FACTOR};
