//! Output formatting for prefix trees.
//!
//! - `csv` - CSV rows, one per realized prefix
//! - `terminal` - field helpers and a coloured outline view

mod csv;
mod terminal;

pub use csv::{tree_print, tree_rows, TreeRow};
pub use terminal::{format_field, indent, print_tree};
