//! Domain models for prefix allocation.
//!
//! - `address` - dotted-decimal codec and mask arithmetic
//! - [`PrefixNode`] - one CIDR block with its allocation state

mod address;
mod prefix;

// Re-export public types
pub use address::{
    block_size, broadcast_addr, cut_addr, decode, encode, get_cidr_mask, MAX_ADDRESS, MAX_LENGTH,
};
pub use prefix::{NodeId, PrefixNode, Supernet};
