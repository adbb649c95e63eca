//! Hierarchical IPv4 prefix allocation.
//!
//! Blocks live in an [`AddressSpace`] arena rooted at `0.0.0.0/0`. Subnets are
//! carved out with [`AddressSpace::split`] or realized on first access with
//! [`AddressSpace::lookup`], and never escape their parent's range.
//!
//! ```
//! use netbuilder_prefix::{AddressSpace, PrefixNode};
//!
//! let mut space = AddressSpace::new();
//! let p2p = PrefixNode::from_text("169.254.254.0/31", None)
//!     .unwrap()
//!     .with_default_subnet_len(32)
//!     .unwrap();
//! let p2p = space.insert(p2p);
//! assert_eq!(space.network_address(p2p).unwrap().addr(), "169.254.254.0");
//! assert_eq!(space.broadcast_address(p2p).unwrap().addr(), "169.254.254.1");
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod plan;
pub mod space;

use std::error::Error;

pub use error::{PrefixError, Result};
pub use models::{NodeId, PrefixNode, Supernet};
pub use space::{AddressSpace, LookupKey, SharedAddressSpace};

/// Read a plan file and build the address space it describes.
///
/// Returns the space and the ids of the plan's top-level blocks.
pub fn build_space(plan_file: &str) -> std::result::Result<(AddressSpace, Vec<NodeId>), Box<dyn Error>> {
    let plan = plan::read_plan(plan_file)?;
    let mut space = AddressSpace::new();
    let blocks = plan::apply_plan(&mut space, &plan)?;
    log::info!(
        "Built address space from {plan_file}: {} blocks, {} nodes",
        blocks.len(),
        space.len()
    );
    Ok((space, blocks))
}
