//! Error types for prefix parsing and allocation.

use thiserror::Error;

/// Errors raised by the address codec, prefix construction and the allocation engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrefixError {
    /// Malformed dotted-decimal address or prefix text.
    #[error("Invalid format: {0}")]
    Format(String),

    /// A split or step would land at or beyond the node's boundary.
    #[error("Out of range: {0}")]
    Range(String),

    /// A child prefix (or node handle) that does not exist and can't be created.
    #[error("No such subnet {key} in {parent}")]
    Key { parent: String, key: String },

    /// Internal consistency violation, e.g. subnet length shorter than the mask.
    #[error("Invalid value: {0}")]
    Value(String),
}

pub type Result<T> = std::result::Result<T, PrefixError>;
