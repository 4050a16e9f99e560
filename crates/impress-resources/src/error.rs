//! Error types for collection operations

use thiserror::Error;

use crate::collection::CollectionId;
use crate::config::ConfigError;
use crate::resource::Resource;
use crate::store::StoreError;

/// Result type alias for collection operations
pub type Result<T> = std::result::Result<T, CollectionError>;

/// Errors surfaced by the [`Manager`](crate::Manager).
///
/// Access checks and name lookups never return these; a denied check is
/// `false`, an unresolvable name is `""`.
#[derive(Error, Debug)]
pub enum CollectionError {
    /// No collection with this id exists
    #[error("Collection not found: {0}")]
    NotFound(CollectionId),

    /// Name is empty or too long
    #[error("Invalid collection name: {0}")]
    InvalidName(String),

    /// Resource is already a member
    #[error("Resource {resource} is already a member of collection {collection}")]
    ResourceAlreadyMember {
        collection: CollectionId,
        resource: Resource,
    },

    /// Configuration rejected by `ResourcesConfig::validate`
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Backing store failure, passed through unchanged
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for CollectionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => CollectionError::NotFound(id),
            StoreError::AlreadyMember {
                collection,
                resource,
            } => CollectionError::ResourceAlreadyMember {
                collection,
                resource,
            },
            other => CollectionError::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_not_found_becomes_collection_not_found() {
        let err: CollectionError = StoreError::NotFound(5).into();
        assert!(matches!(err, CollectionError::NotFound(5)));
    }

    #[test]
    fn config_errors_convert() {
        let err: CollectionError = ConfigError::OutOfRange("max_name_length".into()).into();
        assert!(matches!(err, CollectionError::Config(ConfigError::OutOfRange(_))));
    }

    #[test]
    fn storage_errors_pass_through() {
        let err: CollectionError = StoreError::Storage("disk full".into()).into();
        assert!(matches!(err, CollectionError::Store(StoreError::Storage(_))));
        assert!(err.to_string().contains("disk full"));
    }
}
