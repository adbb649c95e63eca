//! The [`PrefixNode`] tree entity.
//!
//! A node describes one CIDR block plus the bookkeeping needed to allocate
//! inside it. Nodes are immutable once built; linkage to other nodes is held as
//! [`NodeId`] keys into an [`AddressSpace`](crate::space::AddressSpace) arena.

use super::address::{
    broadcast_addr, cut_addr, decode, encode, get_cidr_mask, MAX_ADDRESS, MAX_LENGTH,
};
use crate::error::{PrefixError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

lazy_static! {
    static ref MASK: Regex = Regex::new(r"^\d+$").expect("Invalid Regex?");
}

/// Handle of a node stored in an address space arena.
///
/// A slot can be reused once its node is deleted; the generation tells a stale
/// handle apart from the slot's new occupant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl NodeId {
    pub(crate) fn new(index: usize, generation: u32) -> NodeId {
        NodeId { index, generation }
    }

    /// Arena slot of the node.
    pub fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn generation(&self) -> u32 {
        self.generation
    }
}

/// Upward link of a node.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Supernet {
    /// The node is the root of an address space.
    Root,
    /// Non-owning key of the parent node.
    Node(NodeId),
    /// Built from text or an address, not linked into a tree.
    Detached,
}

/// One CIDR block with its allocation state.
#[derive(Debug, Clone)]
pub struct PrefixNode {
    network_id: u32,
    mask_len: u8,
    default_subnet_len: u8,
    boundary: u32,
    supernet: Supernet,
    pub(crate) children: HashMap<String, NodeId>,
}

impl PrefixNode {
    /// Parse `a.b.c.d/n` or `a.b.c.d`.
    ///
    /// A bare address takes `default_mask_len` as its mask; without one it is a
    /// format error. Host bits are cleared, so `10.0.0.5/24` becomes `10.0.0.0/24`.
    pub fn from_text(text: &str, default_mask_len: Option<u8>) -> Result<PrefixNode> {
        let (addr, mask) = match text.split_once('/') {
            Some((addr, mask)) => (addr, Some(parse_mask(mask, text)?)),
            None => (text, None),
        };
        let mask_len = mask.or(default_mask_len).ok_or_else(|| {
            PrefixError::Format(format!("prefix '{text}' has no mask and no default was given"))
        })?;
        if mask_len > MAX_LENGTH {
            return Err(PrefixError::Format(format!(
                "mask must be an integer between 0 and {MAX_LENGTH}, got {mask_len}"
            )));
        }
        let network_id = decode(addr)?;
        log::trace!("from_text({text}) -> {}/{mask_len}", encode(network_id));
        PrefixNode::from_address(network_id, mask_len, None, None, None)
    }

    /// Build a node from a raw address and mask length.
    ///
    /// With a `supernet` the node inherits its boundary and default subnet
    /// length; `boundary` and `default_subnet_len` override either source. An
    /// inherited default shorter than `mask_len` is raised to `mask_len`.
    pub fn from_address(
        addr: u32,
        mask_len: u8,
        supernet: Option<(NodeId, &PrefixNode)>,
        boundary: Option<u32>,
        default_subnet_len: Option<u8>,
    ) -> Result<PrefixNode> {
        let network_id = cut_addr(addr, mask_len)?;

        let (link, inherited_boundary, inherited_len) = match supernet {
            Some((id, parent)) => (
                Supernet::Node(id),
                parent.boundary,
                parent.default_subnet_len.max(mask_len),
            ),
            None => (Supernet::Detached, MAX_ADDRESS, mask_len),
        };

        let default_subnet_len = match default_subnet_len {
            Some(len) => checked_subnet_len(mask_len, len)?,
            None => inherited_len,
        };

        Ok(PrefixNode {
            network_id,
            mask_len,
            default_subnet_len,
            boundary: boundary.unwrap_or(inherited_boundary),
            supernet: link,
            children: HashMap::new(),
        })
    }

    /// The root block `0.0.0.0/0`.
    pub(crate) fn root() -> PrefixNode {
        PrefixNode {
            network_id: 0,
            mask_len: 0,
            default_subnet_len: 0,
            boundary: MAX_ADDRESS,
            supernet: Supernet::Root,
            children: HashMap::new(),
        }
    }

    /// Same block with a different default subnet length.
    pub fn with_default_subnet_len(mut self, len: u8) -> Result<PrefixNode> {
        self.default_subnet_len = checked_subnet_len(self.mask_len, len)?;
        Ok(self)
    }

    pub(crate) fn linked(mut self, supernet: Supernet, boundary: u32) -> PrefixNode {
        self.supernet = supernet;
        self.boundary = boundary;
        self
    }

    pub fn network_id(&self) -> u32 {
        self.network_id
    }

    pub fn mask_len(&self) -> u8 {
        self.mask_len
    }

    pub fn default_subnet_len(&self) -> u8 {
        self.default_subnet_len
    }

    pub fn boundary(&self) -> u32 {
        self.boundary
    }

    pub fn supernet(&self) -> Supernet {
        self.supernet
    }

    /// Realized child registry, keyed by canonical text.
    pub fn children(&self) -> &HashMap<String, NodeId> {
        &self.children
    }

    /// Address part only, e.g. `169.254.254.1`.
    pub fn addr(&self) -> String {
        encode(self.network_id)
    }

    /// Highest address of this block.
    pub fn last_address(&self) -> u32 {
        broadcast_addr(self.network_id, self.mask_len).unwrap_or(MAX_ADDRESS)
    }

    /// Subnet mask as an address.
    pub fn netmask(&self) -> u32 {
        get_cidr_mask(self.mask_len).unwrap_or(u32::MAX)
    }

    /// Number of `default_subnet_len` blocks inside this one.
    pub fn size(&self) -> Result<u64> {
        if self.default_subnet_len < self.mask_len {
            return Err(PrefixError::Value(format!(
                "subnet length /{} is shorter than {}",
                self.default_subnet_len, self
            )));
        }
        Ok(1u64 << (self.default_subnet_len - self.mask_len))
    }

    /// True when `other`'s whole range lies inside this block.
    pub fn contains(&self, other: &PrefixNode) -> bool {
        self.network_id <= other.network_id && self.last_address() >= other.last_address()
    }

    /// True when the address falls inside this block.
    pub fn contains_addr(&self, addr: u32) -> bool {
        self.network_id <= addr && addr <= self.last_address()
    }
}

fn parse_mask(mask: &str, text: &str) -> Result<u8> {
    if !MASK.is_match(mask) {
        return Err(PrefixError::Format(format!("invalid mask '{mask}' in '{text}'")));
    }
    mask.parse::<u8>()
        .ok()
        .filter(|len| *len <= MAX_LENGTH)
        .ok_or_else(|| {
            PrefixError::Format(format!(
                "mask must be an integer between 0 and {MAX_LENGTH}, got '{mask}'"
            ))
        })
}

fn checked_subnet_len(mask_len: u8, len: u8) -> Result<u8> {
    if len < mask_len || len > MAX_LENGTH {
        Err(PrefixError::Value(format!(
            "subnet length /{len} must be between /{mask_len} and /{MAX_LENGTH}"
        )))
    } else {
        Ok(len)
    }
}

impl FromStr for PrefixNode {
    type Err = PrefixError;

    /// Parse `a.b.c.d/n`; the mask is mandatory.
    fn from_str(s: &str) -> Result<PrefixNode> {
        PrefixNode::from_text(s, None)
    }
}

impl std::fmt::Display for PrefixNode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", encode(self.network_id), self.mask_len)
    }
}

impl PartialEq for PrefixNode {
    fn eq(&self, other: &PrefixNode) -> bool {
        self.network_id == other.network_id && self.mask_len == other.mask_len
    }
}

impl Eq for PrefixNode {}

impl Hash for PrefixNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.network_id.hash(state);
        self.mask_len.hash(state);
    }
}

impl Ord for PrefixNode {
    fn cmp(&self, other: &PrefixNode) -> Ordering {
        (self.network_id, self.mask_len).cmp(&(other.network_id, other.mask_len))
    }
}

impl PartialOrd for PrefixNode {
    fn partial_cmp(&self, other: &PrefixNode) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for PrefixNode {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PrefixNode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<PrefixNode, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PrefixNode::from_text(&s, None).map_err(de::Error::custom)
    }
}
