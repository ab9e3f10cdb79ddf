//! Shared access to a ring from several threads.
//!
//! Rings themselves are plain single-owner values. `SharedRing` puts one
//! behind a single reader-writer lock, so the ordered ring and the
//! server → positions index are always updated together: readers observe a
//! server's whole position set or none of it.

use std::collections::BTreeSet;

use parking_lot::RwLock;

use crate::node::ServerId;
use crate::ring::RingLookup;

#[derive(Debug, Default)]
pub struct SharedRing<R> {
    inner: RwLock<R>,
}

impl<R: RingLookup> SharedRing<R> {
    pub fn new(ring: R) -> Self {
        Self {
            inner: RwLock::new(ring),
        }
    }

    pub fn add_server(&self, id: &str) -> bool {
        self.inner.write().add_server(id)
    }

    pub fn remove_server(&self, id: &str) -> bool {
        self.inner.write().remove_server(id)
    }

    /// Owned copy of the lookup result; the lock is released on return.
    pub fn lookup(&self, key: &str) -> Option<ServerId> {
        self.inner.read().lookup(key).cloned()
    }

    pub fn server_count(&self) -> usize {
        self.inner.read().server_count()
    }

    pub fn servers(&self) -> BTreeSet<ServerId> {
        self.inner.read().servers()
    }

    /// Run `f` under the read lock.
    pub fn read<T>(&self, f: impl FnOnce(&R) -> T) -> T {
        f(&self.inner.read())
    }

    /// Run `f` under the write lock, e.g. a measured membership change.
    pub fn write<T>(&self, f: impl FnOnce(&mut R) -> T) -> T {
        f(&mut self.inner.write())
    }

    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }
}
