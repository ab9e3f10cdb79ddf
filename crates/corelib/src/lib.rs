//! Core library for key-to-server assignment on a hash ring.
//!
//! This crate provides the fundamental abstractions:
//! - Token types (ring positions) and the MD5 partitioner that produces them
//! - An ordered ring with wrapping successor lookup
//! - Basic and virtual-node consistent hash rings
//! - Empirical remapping impact measurement
//! - Key distribution statistics (topology)

pub mod error;
pub mod impact;
pub mod node;
pub mod partitioner;
pub mod ring;
pub mod sync;
pub mod token;
pub mod topology;
pub mod vnode;

pub use error::{Error, Result};
pub use impact::AssignmentSnapshot;
pub use node::{PhysicalServer, ServerId};
pub use partitioner::Partitioner;
pub use ring::{BasicRing, OrderedRing, RingBuilder, RingLookup, TokenRing, VirtualNodeRing};
pub use sync::SharedRing;
pub use token::Token;
pub use topology::Topology;
pub use vnode::VirtualNode;
