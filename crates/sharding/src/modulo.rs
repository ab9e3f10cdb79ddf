//! Naive `hash mod N` sharding.

use std::collections::BTreeSet;

use corelib::token::Md5Token;
use corelib::{RingLookup, ServerId};
use tracing::debug;

use crate::metrics::ModuloMetrics;

/// Assigns `key` to `servers[|position(key)| mod servers.len()]`.
///
/// The server list is kept sorted by id, so assignment depends only on
/// membership and never on insertion order. Any change in the server count
/// changes the modulus for every key, which is what makes this scheme remap
/// a large share of keys on each membership change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuloSharder {
    servers: Vec<ServerId>,
}

impl ModuloSharder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index into `servers()` that `key` maps to.
    pub fn index_for_key(&self, key: &str) -> Option<usize> {
        if self.servers.is_empty() {
            return None;
        }
        let position = Md5Token::from_key(key).non_negative();
        Some((position % self.servers.len() as u64) as usize)
    }

    /// Servers in index order.
    pub fn server_list(&self) -> &[ServerId] {
        &self.servers
    }

    /// Read-only impact measurement against this sharder.
    pub fn metrics(&self) -> ModuloMetrics<'_> {
        ModuloMetrics::new(self)
    }
}

impl RingLookup for ModuloSharder {
    fn add_server(&mut self, id: &str) -> bool {
        match self.servers.binary_search_by(|s| s.as_str().cmp(id)) {
            Ok(_) => false,
            Err(index) => {
                self.servers.insert(index, ServerId::from(id));
                debug!(server = id, servers = self.servers.len(), "added server to sharder");
                true
            }
        }
    }

    fn remove_server(&mut self, id: &str) -> bool {
        match self.servers.binary_search_by(|s| s.as_str().cmp(id)) {
            Ok(index) => {
                self.servers.remove(index);
                debug!(server = id, servers = self.servers.len(), "removed server from sharder");
                true
            }
            Err(_) => false,
        }
    }

    fn lookup(&self, key: &str) -> Option<&ServerId> {
        self.index_for_key(key).map(|index| &self.servers[index])
    }

    fn server_count(&self) -> usize {
        self.servers.len()
    }

    fn servers(&self) -> BTreeSet<ServerId> {
        self.servers.iter().cloned().collect()
    }

    fn contains_server(&self, id: &str) -> bool {
        self.servers.binary_search_by(|s| s.as_str().cmp(id)).is_ok()
    }
}
