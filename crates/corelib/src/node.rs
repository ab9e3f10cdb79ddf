//! Server abstractions for the hash ring.
//!
//! Servers are identified by an opaque string `ServerId`. A `PhysicalServer`
//! pairs that id with the ring positions it currently owns.

use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::token::Token;

/// Opaque identifier for a server. Equality is by value.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerId(String);

impl ServerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for ServerId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ServerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for ServerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ServerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ServerId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ServerId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A physical server and the ring positions it owns.
///
/// A basic ring gives every server one position; a virtual-node ring gives
/// it many. The set only ever holds positions that were actually inserted,
/// so it may be smaller than the configured vnode count after a collision,
/// and it may be empty when the ring is configured with zero vnodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhysicalServer<T: Token> {
    pub id: ServerId,
    pub tokens: BTreeSet<T>,
}

impl<T: Token> PhysicalServer<T> {
    pub fn new(id: ServerId) -> Self {
        Self {
            id,
            tokens: BTreeSet::new(),
        }
    }

    /// Number of live positions owned by this server.
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }
}
