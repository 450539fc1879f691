//! Catalog error model.

use thiserror::Error;

use crate::id::ItemId;

/// Result type used across the catalog layer.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog-level error.
///
/// These are expected, recoverable outcomes reported to the caller. Whether a
/// caller logs and continues is its own policy; the store never suppresses them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// An item with this identifier already exists.
    #[error("item {0} already exists")]
    DuplicateItem(ItemId),

    /// No item with this identifier exists.
    #[error("item {0} not found")]
    ItemNotFound(ItemId),

    /// A value failed validation (negative price, rating out of range,
    /// malformed persisted record).
    #[error("validation failed: {0}")]
    Validation(String),
}

impl CatalogError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(id: ItemId) -> Self {
        Self::ItemNotFound(id)
    }

    pub fn duplicate(id: ItemId) -> Self {
        Self::DuplicateItem(id)
    }

    /// True for `ItemNotFound`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ItemNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_item() {
        assert_eq!(
            CatalogError::not_found(ItemId::new(999)).to_string(),
            "item 999 not found"
        );
        assert_eq!(
            CatalogError::duplicate(ItemId::new(101)).to_string(),
            "item 101 already exists"
        );
        assert!(CatalogError::not_found(ItemId::new(1)).is_not_found());
        assert!(!CatalogError::validation("x").is_not_found());
    }
}
