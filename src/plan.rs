//! Allocation plans.
//!
//! A plan lists top-level blocks and the subnets to realize inside each of
//! them. It is read from JSON and replayed onto a fresh [`AddressSpace`].

use crate::models::{NodeId, PrefixNode};
use crate::space::AddressSpace;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;

/// Blocks to place under the root, in order.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Plan {
    pub blocks: Vec<BlockPlan>,
}

/// One top-level block and its allocations.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BlockPlan {
    /// CIDR of the block, e.g. `10.0.0.0/16`.
    pub prefix: PrefixNode,
    /// Default subnet length for indexed allocations (defaults to the block mask).
    #[serde(default)]
    pub subnet_len: Option<u8>,
    #[serde(default)]
    pub allocations: Vec<Allocation>,
}

/// A subnet to realize inside a block.
///
/// Without `mask_len` this is an indexed lookup at the block's subnet length;
/// with it, an explicit split at that length.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Allocation {
    pub index: i64,
    #[serde(default)]
    pub mask_len: Option<u8>,
}

/// Read a plan from a JSON file.
pub fn read_plan(plan_file: &str) -> Result<Plan, Box<dyn Error>> {
    if !Path::new(plan_file).exists() {
        return Err(format!("Plan file does not exist: {plan_file}").into());
    }
    log::info!("Reading plan file: {plan_file}");
    let json = std::fs::read_to_string(plan_file)
        .map_err(|e| format!("Error reading plan file {plan_file}: {e}"))?;
    let plan: Plan =
        serde_json::from_str(&json).map_err(|e| format!("Error parsing plan JSON: {e}"))?;
    log::debug!("Plan has {} blocks", plan.blocks.len());
    Ok(plan)
}

/// Replay a plan onto `space`, returning the ids of the top-level blocks.
pub fn apply_plan(space: &mut AddressSpace, plan: &Plan) -> Result<Vec<NodeId>, Box<dyn Error>> {
    let root = space.root();
    let mut blocks = Vec::with_capacity(plan.blocks.len());

    for block in &plan.blocks {
        let mut prefix = block.prefix.clone();
        if let Some(len) = block.subnet_len {
            prefix = prefix.with_default_subnet_len(len)?;
        }
        let id = space
            .attach(root, prefix)
            .map_err(|e| format!("Error placing block {}: {e}", block.prefix))?;

        for alloc in &block.allocations {
            let child = match alloc.mask_len {
                None => space.lookup(id, alloc.index)?,
                Some(mask_len) => {
                    let index = u64::try_from(alloc.index)
                        .map_err(|_| format!("Negative index {} with explicit mask", alloc.index))?;
                    space.split(id, Some(mask_len), index)?
                }
            };
            log::info!("{} <- {}", block.prefix, space.get(child)?);
        }
        blocks.push(id);
    }

    Ok(blocks)
}
