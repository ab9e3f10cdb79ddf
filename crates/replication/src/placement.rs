//! Ordered replica sets.

use serde::Serialize;

use corelib::ServerId;

/// Distinct servers holding a key, primary first, then ring order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReplicaPlacement {
    servers: Vec<ServerId>,
}

impl ReplicaPlacement {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            servers: Vec::with_capacity(capacity),
        }
    }

    /// Append `server` unless it is already placed. Returns whether it was
    /// appended.
    pub fn push_distinct(&mut self, server: &ServerId) -> bool {
        // Replica sets are a handful of entries; a scan beats hashing.
        if self.servers.contains(server) {
            return false;
        }
        self.servers.push(server.clone());
        true
    }

    /// The server a key is primarily assigned to.
    pub fn primary(&self) -> Option<&ServerId> {
        self.servers.first()
    }

    pub fn servers(&self) -> &[ServerId] {
        &self.servers
    }

    pub fn contains(&self, server: &str) -> bool {
        self.servers.iter().any(|s| s == server)
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    pub fn into_vec(self) -> Vec<ServerId> {
        self.servers
    }
}

impl IntoIterator for ReplicaPlacement {
    type Item = ServerId;
    type IntoIter = std::vec::IntoIter<ServerId>;

    fn into_iter(self) -> Self::IntoIter {
        self.servers.into_iter()
    }
}

impl<'a> IntoIterator for &'a ReplicaPlacement {
    type Item = &'a ServerId;
    type IntoIter = std::slice::Iter<'a, ServerId>;

    fn into_iter(self) -> Self::IntoIter {
        self.servers.iter()
    }
}
