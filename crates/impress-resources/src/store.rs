use serde::Serialize;

use crate::collection::CollectionId;
use crate::resource::Resource;

/// A persisted collection row, without its members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionRecord {
    pub id: CollectionId,
    pub name: String,
}

/// The trait that all collection storage backends implement.
pub trait CollectionStore: Send + Sync {
    /// Insert a new collection. The store assigns and returns its id.
    fn insert_collection(&self, name: &str) -> Result<CollectionId, StoreError>;

    /// Get a collection row by id.
    fn get_collection(&self, id: CollectionId) -> Result<Option<CollectionRecord>, StoreError>;

    /// Change a collection's name.
    fn rename_collection(&self, id: CollectionId, name: &str) -> Result<(), StoreError>;

    /// Delete a collection and all of its membership rows.
    fn delete_collection(&self, id: CollectionId) -> Result<(), StoreError>;

    /// Add a resource to a collection.
    fn add_member(&self, id: CollectionId, resource: &Resource) -> Result<(), StoreError>;

    /// Remove a resource from a collection. Returns whether it was a member;
    /// `NotFound` if the collection itself is gone.
    fn remove_member(&self, id: CollectionId, resource: &Resource) -> Result<bool, StoreError>;

    /// Members of a collection in insertion order.
    fn members(&self, id: CollectionId) -> Result<Vec<Resource>, StoreError>;

    /// Every collection that contains `resource`, ordered by id.
    fn collections_containing(&self, resource: &Resource)
        -> Result<Vec<CollectionRecord>, StoreError>;
}

/// Errors from the collection store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Collection not found: {0}")]
    NotFound(CollectionId),

    #[error("Resource {resource} is already in collection {collection}")]
    AlreadyMember {
        collection: CollectionId,
        resource: Resource,
    },

    #[error("Storage error: {0}")]
    Storage(String),
}

#[cfg(feature = "sqlite")]
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
        let err = StoreError::NotFound(7);
        assert!(err.to_string().contains("not found"));

        let err = StoreError::AlreadyMember {
            collection: 3,
            resource: Resource::new("files", "9"),
        };
        assert!(err.to_string().contains("files:9"));
    }
}
