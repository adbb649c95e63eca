//! CSV output of a realized prefix tree.

use crate::error::Result;
use crate::models::{encode, NodeId};
use crate::space::AddressSpace;
use colored::Colorize;

use super::terminal::{format_field, indent};

/// One row of tree output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    /// Distance from the listed top node.
    pub depth: usize,
    /// Canonical prefix text.
    pub prefix: String,
    /// Broadcast address.
    pub broadcast: String,
    /// Subnet mask in dotted decimal.
    pub netmask: String,
    /// Default subnet length of the node.
    pub subnet_len: u8,
    /// Realized children.
    pub used: usize,
    /// Subnets available at the default subnet length.
    pub size: u64,
}

/// Collect rows for `id` and everything realized below it.
///
/// # Arguments
/// * `space` - The address space holding the tree
/// * `id` - The node to start from
///
/// # Returns
/// One row per realized node, depth first, children in address order
pub fn tree_rows(space: &AddressSpace, id: NodeId) -> Result<Vec<TreeRow>> {
    space
        .walk(id)?
        .into_iter()
        .map(|(depth, node_id)| -> Result<TreeRow> {
            let node = space.get(node_id)?;
            Ok(TreeRow {
                depth,
                prefix: node.to_string(),
                broadcast: encode(node.last_address()),
                netmask: encode(node.netmask()),
                subnet_len: node.default_subnet_len(),
                used: node.children().len(),
                size: node.size()?,
            })
        })
        .collect()
}

/// Print the tree below `id` as CSV to stdout.
///
/// # Arguments
/// * `space` - The address space holding the tree
/// * `id` - The node to start from, usually the root
///
/// # Returns
/// * `Ok(())` - All rows printed
/// * `Err` - If `id` does not resolve in `space`
pub fn tree_print(space: &AddressSpace, id: NodeId) -> Result<()> {
    let rows = tree_rows(space, id)?;
    log::info!("#Start tree_print() rows = {}", rows.len());

    println!(
        r#" "depth",             "prefix",       "broadcast",          "netmask", "subnet_len",         "used""#
    );
    for row in &rows {
        println!("{}", format_csv_row(row));
    }
    println!(
        "#{}# {} prefixes below {}",
        "NOTE".on_blue(),
        rows.len().saturating_sub(1),
        space.get(id)?
    );
    Ok(())
}

/// Format a single CSV row.
fn format_csv_row(row: &TreeRow) -> String {
    format!(
        "{depth},{prefix},{broadcast},{netmask},{subnet_len},{used}",
        depth = format_field(row.depth, 8),
        prefix = format_field(indent(row.depth, &row.prefix), 20),
        broadcast = format_field(format!("{}_br", row.broadcast), 18),
        netmask = format_field(&row.netmask, 18),
        subnet_len = format_field(format!("/{}", row.subnet_len), 13),
        used = format_field(format!("{}/{}", row.used, row.size), 15),
    )
}
