//! Subnetting and address arithmetic on realized nodes.

use super::AddressSpace;
use crate::error::{PrefixError, Result};
use crate::models::{block_size, NodeId, PrefixNode, MAX_LENGTH};

impl AddressSpace {
    /// Carve the `index`-th `/mask_len` subnet out of a node and register it.
    ///
    /// `mask_len` defaults to the node's default subnet length. The child may
    /// not extend past the node's own block nor start at or beyond the node's
    /// boundary.
    pub fn split(&mut self, id: NodeId, mask_len: Option<u8>, index: u64) -> Result<NodeId> {
        self.split_with_subnet_len(id, mask_len, index, None)
    }

    /// [`split`](Self::split) with the child's default subnet length set explicitly.
    pub fn split_with_subnet_len(
        &mut self,
        id: NodeId,
        mask_len: Option<u8>,
        index: u64,
        subnet_len: Option<u8>,
    ) -> Result<NodeId> {
        let node = self.get(id)?;
        let mask_len = mask_len.unwrap_or(node.default_subnet_len());
        if mask_len > MAX_LENGTH {
            return Err(PrefixError::Value(format!(
                "mask length {mask_len} is longer than {MAX_LENGTH}"
            )));
        }
        if mask_len < node.mask_len() {
            return Err(PrefixError::Range(format!(
                "a /{mask_len} does not fit inside {node}"
            )));
        }

        let step = block_size(mask_len)?;
        let candidate_boundary = node.last_address() as u64;
        let boundary = node.boundary() as u64;
        let network_id = index
            .checked_mul(step)
            .and_then(|offset| offset.checked_add(node.network_id() as u64));
        log::trace!(
            "split({node}): (mask_len, network_id, candidate_boundary) = {mask_len}, {network_id:?}, {candidate_boundary}"
        );

        let network_id = match network_id {
            Some(n) if n < boundary && candidate_boundary <= boundary && n + step - 1 <= candidate_boundary => n,
            _ => {
                return Err(PrefixError::Range(format!(
                    "subnet {index} of /{mask_len} is beyond the bounds of {node}"
                )))
            }
        };

        let child = PrefixNode::from_address(
            network_id as u32,
            mask_len,
            Some((id, node)),
            Some(candidate_boundary as u32),
            subnet_len,
        )?;
        log::debug!("split({node}, /{mask_len}, {index}) -> {child}");
        self.register(id, child)
    }

    /// Split a node into `parts` equal subnets and return the first one.
    ///
    /// `parts` must be a power of two; the resulting mask is capped at /32.
    pub fn divide(&mut self, id: NodeId, parts: u64) -> Result<NodeId> {
        if !parts.is_power_of_two() {
            return Err(PrefixError::Value(format!(
                "can only divide into a power of two parts, got {parts}"
            )));
        }
        let node = self.get(id)?;
        let shift = parts.trailing_zeros();
        let mask_len = (node.mask_len() as u32 + shift).min(MAX_LENGTH as u32) as u8;
        log::trace!("divide({node}, {parts}) -> /{mask_len}");
        self.split(id, Some(mask_len), 0)
    }

    /// The sibling that follows a node at the same mask length.
    ///
    /// The result is derived, not registered in any parent.
    pub fn step(&self, id: NodeId) -> Result<PrefixNode> {
        let node = self.get(id)?;
        let next = node.network_id() as u64 + block_size(node.mask_len())?;
        if next >= node.boundary() as u64 {
            return Err(PrefixError::Range(format!(
                "the subnet after {node} is beyond its boundary"
            )));
        }
        let sibling = PrefixNode::from_address(
            next as u32,
            node.mask_len(),
            None,
            None,
            Some(node.default_subnet_len()),
        )?;
        Ok(sibling.linked(node.supernet(), node.boundary()))
    }

    /// Lowest address of a node's block, as a `/32` below the node.
    pub fn network_address(&self, id: NodeId) -> Result<PrefixNode> {
        let node = self.get(id)?;
        self.host(id, node.network_id())
    }

    /// Highest address of a node's block, as a `/32` below the node.
    pub fn broadcast_address(&self, id: NodeId) -> Result<PrefixNode> {
        let node = self.get(id)?;
        self.host(id, node.last_address())
    }

    fn host(&self, id: NodeId, addr: u32) -> Result<PrefixNode> {
        let node = self.get(id)?;
        PrefixNode::from_address(
            addr,
            MAX_LENGTH,
            Some((id, node)),
            Some(node.last_address()),
            Some(MAX_LENGTH),
        )
    }

    /// The `delta`-th default-length subnet of a node, wrapping within the block.
    ///
    /// Negative deltas count back from the end. Not registered.
    pub fn offset(&self, id: NodeId, delta: i64) -> Result<PrefixNode> {
        let node = self.get(id)?;
        let size = node.size()?;
        let index = (delta as i128).rem_euclid(size as i128) as u64;
        let addr = node.network_id() as u64 + index * block_size(node.default_subnet_len())?;
        PrefixNode::from_address(
            addr as u32,
            node.default_subnet_len(),
            Some((id, node)),
            Some(node.last_address()),
            None,
        )
    }

    /// Count of default-length subnets in a node.
    pub fn size(&self, id: NodeId) -> Result<u64> {
        self.get(id)?.size()
    }

    /// True when `inner`'s range lies within `outer`'s.
    pub fn contains(&self, outer: NodeId, inner: NodeId) -> Result<bool> {
        Ok(self.get(outer)?.contains(self.get(inner)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{decode, Supernet};

    fn space_with(prefix: &str, subnet_len: u8) -> (AddressSpace, NodeId) {
        let mut space = AddressSpace::new();
        let root = space.root();
        let node = PrefixNode::from_text(prefix, None)
            .unwrap()
            .with_default_subnet_len(subnet_len)
            .unwrap();
        let id = space.attach(root, node).unwrap();
        (space, id)
    }

    #[test]
    fn test_split_indices() {
        let (mut space, id) = space_with("10.0.0.0/24", 24);
        for (index, expected) in ["10.0.0.0/26", "10.0.0.64/26", "10.0.0.128/26", "10.0.0.192/26"]
            .iter()
            .enumerate()
        {
            let child = space.split(id, Some(26), index as u64).unwrap();
            let node = space.get(child).unwrap();
            assert_eq!(node.to_string(), *expected);
            assert_eq!(node.supernet(), Supernet::Node(id));
            assert_eq!(node.boundary(), decode("10.0.0.255").unwrap());
            assert_eq!(node.default_subnet_len(), 26);
        }
        assert!(matches!(space.split(id, Some(26), 4), Err(PrefixError::Range(_))));
        assert_eq!(space.children(id).unwrap().len(), 4);
    }

    #[test]
    fn test_split_detached_block() {
        let mut space = AddressSpace::new();
        let id = space.insert("10.0.0.0/24".parse().unwrap());
        assert!(space.split(id, Some(26), 3).is_ok());
        assert!(matches!(space.split(id, Some(26), 4), Err(PrefixError::Range(_))));
    }

    #[test]
    fn test_split_uses_default_subnet_len() {
        let (mut space, id) = space_with("10.0.0.0/16", 24);
        let child = space.split(id, None, 5).unwrap();
        assert_eq!(space.get(child).unwrap().to_string(), "10.0.5.0/24");
    }

    #[test]
    fn test_split_rejects_larger_block() {
        let (mut space, id) = space_with("10.0.0.0/24", 24);
        assert!(matches!(space.split(id, Some(16), 0), Err(PrefixError::Range(_))));
        assert!(matches!(space.split(id, Some(33), 0), Err(PrefixError::Value(_))));
        assert!(matches!(space.split(id, Some(26), u64::MAX), Err(PrefixError::Range(_))));
        assert!(space.children(id).unwrap().is_empty());
    }

    #[test]
    fn test_split_twice_gives_new_node() {
        let (mut space, id) = space_with("10.0.0.0/24", 26);
        let first = space.split(id, None, 1).unwrap();
        let second = space.split(id, None, 1).unwrap();
        assert_ne!(first, second);
        assert!(matches!(space.get(first), Err(PrefixError::Key { .. })));
        assert_eq!(space.get(second).unwrap().to_string(), "10.0.0.64/26");
        assert_eq!(space.get(id).unwrap().children().get("10.0.0.64/26"), Some(&second));
    }

    #[test]
    fn test_split_with_subnet_len() {
        let (mut space, id) = space_with("10.0.0.0/16", 24);
        let child = space.split_with_subnet_len(id, None, 2, Some(28)).unwrap();
        let node = space.get(child).unwrap();
        assert_eq!(node.default_subnet_len(), 28);
        assert_eq!(node.size().unwrap(), 16);
        assert!(space.split_with_subnet_len(id, None, 3, Some(20)).is_err());
    }

    #[test]
    fn test_root_split() {
        let mut space = AddressSpace::new();
        let root = space.root();
        let child = space.split(root, Some(8), 10).unwrap();
        assert_eq!(space.get(child).unwrap().to_string(), "10.0.0.0/8");
    }

    #[test]
    fn test_divide() {
        let (mut space, id) = space_with("10.0.0.0/24", 24);
        let quarter = space.divide(id, 4).unwrap();
        assert_eq!(space.get(quarter).unwrap().to_string(), "10.0.0.0/26");
        let host = space.divide(id, 1 << 20).unwrap();
        assert_eq!(space.get(host).unwrap().to_string(), "10.0.0.0/32");
        assert!(matches!(space.divide(id, 3), Err(PrefixError::Value(_))));
        assert!(matches!(space.divide(id, 0), Err(PrefixError::Value(_))));
    }

    #[test]
    fn test_step() {
        let (mut space, id) = space_with("10.0.0.0/24", 26);
        let third = space.split(id, None, 2).unwrap();
        let last = space.split(id, None, 3).unwrap();

        let next = space.step(third).unwrap();
        assert_eq!(next.to_string(), "10.0.0.192/26");
        assert_eq!(next.supernet(), Supernet::Node(id));
        assert_eq!(space.children(id).unwrap().len(), 2);

        assert!(matches!(space.step(last), Err(PrefixError::Range(_))));
    }

    #[test]
    fn test_step_top_of_address_space() {
        let mut space = AddressSpace::new();
        let top = space.insert("255.0.0.0/8".parse().unwrap());
        assert!(matches!(space.step(top), Err(PrefixError::Range(_))));
        assert!(matches!(space.step(space.root()), Err(PrefixError::Range(_))));
    }

    #[test]
    fn test_floor_and_ceil() {
        let (space, id) = space_with("192.168.4.0/22", 22);
        let floor = space.network_address(id).unwrap();
        let ceil = space.broadcast_address(id).unwrap();
        assert_eq!(floor.to_string(), "192.168.4.0/32");
        assert_eq!(ceil.to_string(), "192.168.7.255/32");
        assert_eq!(floor.supernet(), Supernet::Node(id));
        assert_eq!(ceil.boundary(), decode("192.168.7.255").unwrap());
    }

    #[test]
    fn test_network_address_idempotent() {
        let (mut space, id) = space_with("10.9.8.0/24", 24);
        let floor = space.network_address(id).unwrap();
        let floor_id = space.attach(id, floor.clone()).unwrap();
        assert_eq!(space.network_address(floor_id).unwrap(), floor);
    }

    #[test]
    fn test_offset_wraps() {
        let (space, id) = space_with("10.0.0.0/24", 26);
        assert_eq!(space.offset(id, 1).unwrap().to_string(), "10.0.0.64/26");
        assert_eq!(space.offset(id, 5).unwrap().to_string(), "10.0.0.64/26");
        assert_eq!(space.offset(id, -1).unwrap().to_string(), "10.0.0.192/26");
        assert_eq!(space.offset(id, 0).unwrap().supernet(), Supernet::Node(id));
    }

    #[test]
    fn test_offset_hosts() {
        let (space, id) = space_with("10.0.0.0/30", 32);
        assert_eq!(space.offset(id, 2).unwrap().addr(), "10.0.0.2");
        assert_eq!(space.offset(id, 7).unwrap().addr(), "10.0.0.3");
    }

    #[test]
    fn test_size_and_contains() {
        let (mut space, id) = space_with("10.0.0.0/24", 25);
        assert_eq!(space.size(id).unwrap(), 2);
        let upper = space.split(id, None, 1).unwrap();
        assert!(space.contains(id, upper).unwrap());
        assert!(!space.contains(upper, id).unwrap());
        assert!(space.contains(space.root(), upper).unwrap());
    }
}
