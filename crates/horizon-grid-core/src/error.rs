//! Error types for Horizon Grid.

/// A specialized Result type for Horizon Grid operations.
pub type Result<T> = std::result::Result<T, GridError>;

/// Errors reported by grid operations.
///
/// Most widget operations treat bad indices as no-ops and only log them;
/// these variants surface where a caller hands in unvalidated input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    /// Group index outside the current group count.
    #[error("Invalid group index {group} (group count {count})")]
    InvalidGroup { group: usize, count: usize },

    /// Item index outside the group's item list.
    #[error("Invalid item index {item} in group {group} (item count {count})")]
    InvalidItem {
        group: usize,
        item: usize,
        count: usize,
    },

    /// The bridge reported an item type beyond its declared type count.
    #[error("Item type {item_type} out of range (type count {type_count})")]
    ItemTypeOutOfRange { item_type: usize, type_count: usize },

    /// Configuration could not be parsed or failed validation.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The widget has been shut down.
    #[error("The grid has been shut down")]
    Closed,
}

impl GridError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
