//! Terminal output utilities.

use crate::error::Result;
use crate::models::NodeId;
use crate::space::AddressSpace;
use colored::Colorize;

/// Format a value as a quoted, right-aligned field.
///
/// # Arguments
/// * `value` - The value to format
/// * `width` - The minimum width of the field
///
/// # Returns
/// A quoted, right-aligned string; values wider than `width` are not cut
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let quoted = format!("\"{}\"", value.to_string());
    format!("{quoted:>width$}")
}

/// Indent text by two spaces per level.
///
/// # Arguments
/// * `depth` - Nesting level below the listed top node
/// * `text` - The text to indent
pub fn indent(depth: usize, text: &str) -> String {
    format!("{}{text}", "  ".repeat(depth))
}

/// Print the realized tree below `id` as an indented, coloured outline.
///
/// Leaves are green; nodes with realized children are bold with a usage count.
///
/// # Arguments
/// * `space` - The address space holding the tree
/// * `id` - The node to start from
///
/// # Returns
/// * `Ok(())` - The outline was printed
/// * `Err` - If `id` does not resolve in `space`
pub fn print_tree(space: &AddressSpace, id: NodeId) -> Result<()> {
    for (depth, node_id) in space.walk(id)? {
        let node = space.get(node_id)?;
        let label = indent(depth, &node.to_string());
        if node.children().is_empty() {
            println!("{}", label.green());
        } else {
            println!("{} {}", label.bold(), format!("({} used)", node.children().len()).dimmed());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_field_short() {
        assert_eq!(format_field("test", 10), "    \"test\"");
    }

    #[test]
    fn test_format_field_long() {
        assert_eq!(format_field("long_value", 5), "\"long_value\"");
    }

    #[test]
    fn test_format_field_number() {
        assert_eq!(format_field(42, 6), "  \"42\"");
    }

    #[test]
    fn test_indent() {
        assert_eq!(indent(0, "10.0.0.0/8"), "10.0.0.0/8");
        assert_eq!(indent(2, "10.1.0.0/16"), "    10.1.0.0/16");
    }
}
