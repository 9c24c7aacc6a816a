use crate::item::{Item, ItemDraft, ItemId, ValidationError};

/// The trait that item storage backends implement.
///
/// Every mutating operation is atomic: it either fully applies or leaves the
/// table untouched.
pub trait ItemStore: Send + Sync {
    /// All items, ordered by id ascending.
    fn list_all(&self) -> Result<Vec<Item>, StoreError>;

    /// Get an item by ID. Fails with [`StoreError::NotFound`] when absent.
    fn get(&self, id: ItemId) -> Result<Item, StoreError>;

    /// Whether a row with this ID exists.
    fn exists(&self, id: ItemId) -> Result<bool, StoreError>;

    /// Insert a new item, assigning its id and creation time.
    fn create(&self, draft: ItemDraft) -> Result<Item, StoreError>;

    /// Overwrite title and description; id and created_at are preserved.
    fn update(&self, id: ItemId, draft: ItemDraft) -> Result<Item, StoreError>;

    /// Permanently remove an item.
    fn delete(&self, id: ItemId) -> Result<(), StoreError>;
}

/// Errors from the item store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Item not found: {0}")]
    NotFound(ItemId),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_display() {
        let err = StoreError::NotFound(42);
        assert!(err.to_string().contains("not found"));
        assert!(err.is_not_found());

        let err = StoreError::from(ValidationError::EmptyField("title"));
        assert!(err.to_string().contains("title"));
        assert!(!err.is_not_found());
    }
}
