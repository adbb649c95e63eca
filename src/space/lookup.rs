//! Allocate-on-first-access child lookup.

use super::AddressSpace;
use crate::error::{PrefixError, Result};
use crate::models::{block_size, encode, NodeId, PrefixNode};

/// Key for [`AddressSpace::lookup`]: a subnet index or a prefix string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupKey {
    /// Index at the node's default subnet length, taken modulo the node size.
    Index(i64),
    /// Prefix text of an already realized child.
    Text(String),
}

impl From<i64> for LookupKey {
    fn from(index: i64) -> Self {
        LookupKey::Index(index)
    }
}

impl From<i32> for LookupKey {
    fn from(index: i32) -> Self {
        LookupKey::Index(index as i64)
    }
}

impl From<u32> for LookupKey {
    fn from(index: u32) -> Self {
        LookupKey::Index(index as i64)
    }
}

impl From<&str> for LookupKey {
    fn from(text: &str) -> Self {
        LookupKey::Text(text.to_string())
    }
}

impl From<String> for LookupKey {
    fn from(text: String) -> Self {
        LookupKey::Text(text)
    }
}

impl AddressSpace {
    /// Look up a child of `id`.
    ///
    /// Text keys only find existing children. Index keys find the child at that
    /// position and create it through [`split`](Self::split) when it is not
    /// realized yet, so repeated lookups return the same node.
    pub fn lookup(&mut self, id: NodeId, key: impl Into<LookupKey>) -> Result<NodeId> {
        match key.into() {
            LookupKey::Text(text) => self.lookup_text(id, &text),
            LookupKey::Index(index) => self.lookup_index(id, index),
        }
    }

    fn lookup_text(&self, id: NodeId, text: &str) -> Result<NodeId> {
        let node = self.get(id)?;
        let missing = || PrefixError::Key {
            parent: node.to_string(),
            key: text.to_string(),
        };
        let canonical = PrefixNode::from_text(text, None).map_err(|_| missing())?;
        node.children()
            .get(&canonical.to_string())
            .copied()
            .ok_or_else(missing)
    }

    fn lookup_index(&mut self, id: NodeId, index: i64) -> Result<NodeId> {
        let node = self.get(id)?;
        let size = node.size()?;
        let index = (index as i128).rem_euclid(size as i128) as u64;
        let subnet_len = node.default_subnet_len();
        let network_id = node.network_id() as u64 + index * block_size(subnet_len)?;
        let key = format!("{}/{subnet_len}", encode(network_id as u32));

        if let Some(child) = node.children().get(&key) {
            log::trace!("lookup({node}, {index}) -> existing {key}");
            return Ok(*child);
        }
        log::debug!("lookup({node}, {index}): {key} does not exist, creating");
        self.split(id, None, index)
    }
}
