//! Thread-safe handle on an [`AddressSpace`].
//!
//! One lock per tree: allocating operations take the write lock, arithmetic and
//! queries take the read lock.

use super::{AddressSpace, LookupKey};
use crate::error::Result;
use crate::models::{NodeId, PrefixNode};
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct SharedAddressSpace {
    inner: Arc<RwLock<AddressSpace>>,
}

impl From<AddressSpace> for SharedAddressSpace {
    fn from(space: AddressSpace) -> Self {
        SharedAddressSpace {
            inner: Arc::new(RwLock::new(space)),
        }
    }
}

impl SharedAddressSpace {
    pub fn new() -> SharedAddressSpace {
        AddressSpace::new().into()
    }

    pub fn root(&self) -> NodeId {
        self.inner.read().root()
    }

    /// Run `f` with shared access to the tree.
    pub fn read<R>(&self, f: impl FnOnce(&AddressSpace) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run `f` with exclusive access, for multi-step allocations.
    pub fn write<R>(&self, f: impl FnOnce(&mut AddressSpace) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// Snapshot of a node.
    pub fn get(&self, id: NodeId) -> Result<PrefixNode> {
        self.inner.read().get(id).cloned()
    }

    pub fn split(&self, id: NodeId, mask_len: Option<u8>, index: u64) -> Result<NodeId> {
        self.inner.write().split(id, mask_len, index)
    }

    pub fn lookup(&self, id: NodeId, key: impl Into<LookupKey>) -> Result<NodeId> {
        self.inner.write().lookup(id, key)
    }

    pub fn attach(&self, parent: NodeId, node: PrefixNode) -> Result<NodeId> {
        self.inner.write().attach(parent, node)
    }

    pub fn remove(&self, parent: NodeId, key: &str) -> Result<NodeId> {
        self.inner.write().remove(parent, key)
    }

    pub fn step(&self, id: NodeId) -> Result<PrefixNode> {
        self.inner.read().step(id)
    }

    pub fn network_address(&self, id: NodeId) -> Result<PrefixNode> {
        self.inner.read().network_address(id)
    }

    pub fn broadcast_address(&self, id: NodeId) -> Result<PrefixNode> {
        self.inner.read().broadcast_address(id)
    }

    pub fn contains(&self, outer: NodeId, inner: NodeId) -> Result<bool> {
        self.inner.read().contains(outer, inner)
    }

    pub fn size(&self, id: NodeId) -> Result<u64> {
        self.inner.read().size(id)
    }
}
