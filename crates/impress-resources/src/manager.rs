//! Facade over collection persistence and the provider registry.

use std::sync::Arc;

use crate::cache::ResolutionCache;
use crate::collection::{Collection, CollectionId};
use crate::config::{CollectionsConfig, ResourcesConfig};
use crate::error::{CollectionError, Result};
use crate::provider::ResourceProvider;
use crate::registry::{ProviderRegistry, RegistryError};
use crate::resource::{Resource, User};
use crate::store::{CollectionRecord, CollectionStore};

/// Creates and loads collections, and answers name/access queries by
/// delegating to the registered providers.
///
/// A `Manager` holds no per-request state and can be shared behind an
/// `Arc`. Use [`Manager::scope`] to get a request-lifetime view that owns
/// its own [`ResolutionCache`].
pub struct Manager {
    store: Arc<dyn CollectionStore>,
    registry: ProviderRegistry,
    config: CollectionsConfig,
}

impl std::fmt::Debug for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Manager {
    pub fn new(store: Arc<dyn CollectionStore>, registry: ProviderRegistry) -> Self {
        Self {
            store,
            registry,
            config: CollectionsConfig::default(),
        }
    }

    /// Build a manager after checking `config` with
    /// [`ResourcesConfig::validate`].
    pub fn with_config(
        store: Arc<dyn CollectionStore>,
        registry: ProviderRegistry,
        config: &ResourcesConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            registry,
            config: config.collections.clone(),
        })
    }

    /// Open the SQLite store named by `config` (in-memory if unset).
    #[cfg(feature = "sqlite")]
    pub fn open(config: &ResourcesConfig, registry: ProviderRegistry) -> Result<Self> {
        use crate::sqlite_store::SqliteCollectionStore;

        config.validate()?;
        let store = match &config.database.path {
            Some(path) => SqliteCollectionStore::open(path)?,
            None => SqliteCollectionStore::open_in_memory()?,
        };
        Self::with_config(Arc::new(store), registry, config)
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn register_provider(
        &mut self,
        provider: Arc<dyn ResourceProvider>,
    ) -> std::result::Result<(), RegistryError> {
        self.registry.register(provider)
    }

    /// Start a request: a view of this manager with a fresh resolution cache.
    pub fn scope(&self) -> AccessScope<'_> {
        AccessScope {
            manager: self,
            cache: ResolutionCache::new(),
        }
    }

    // ==================== Collections ====================

    /// Load a collection and its members.
    pub fn get_collection(&self, id: CollectionId) -> Result<Collection> {
        let record = self
            .store
            .get_collection(id)?
            .ok_or(CollectionError::NotFound(id))?;
        self.hydrate(record)
    }

    /// Create an empty collection. The id comes from the store.
    pub fn new_collection(&self, name: &str) -> Result<Collection> {
        let name = self.validate_name(name)?;
        let id = self.store.insert_collection(&name)?;
        tracing::info!(collection = id, name = %name, "created collection");
        Ok(Collection::new(id, name, Vec::new()))
    }

    pub fn rename_collection(&self, collection: &mut Collection, name: &str) -> Result<()> {
        let name = self.validate_name(name)?;
        self.store.rename_collection(collection.id(), &name)?;
        tracing::debug!(collection = collection.id(), name = %name, "renamed collection");
        collection.set_name(name);
        Ok(())
    }

    pub fn delete_collection(&self, collection: Collection) -> Result<()> {
        self.store.delete_collection(collection.id())?;
        tracing::info!(collection = collection.id(), "deleted collection");
        Ok(())
    }

    /// Add `resource` to `collection`, persisting the membership first.
    pub fn add_resource(&self, collection: &mut Collection, resource: Resource) -> Result<()> {
        self.store.add_member(collection.id(), &resource)?;
        tracing::debug!(collection = collection.id(), resource = %resource, "added resource");
        collection.push(resource);
        Ok(())
    }

    /// Remove `resource` from `collection`. Returns whether it was a member.
    pub fn remove_resource(&self, collection: &mut Collection, resource: &Resource) -> Result<bool> {
        let removed = self.store.remove_member(collection.id(), resource)?;
        if removed {
            tracing::debug!(collection = collection.id(), resource = %resource, "removed resource");
        }
        collection.remove(resource);
        Ok(removed)
    }

    /// Every collection containing `resource`, with members loaded.
    pub fn collections_for_resource(&self, resource: &Resource) -> Result<Vec<Collection>> {
        self.store
            .collections_containing(resource)?
            .into_iter()
            .map(|record| self.hydrate(record))
            .collect()
    }

    // ==================== Resources ====================

    /// Build a resource handle. No I/O; existence is checked by providers.
    pub fn get_resource(&self, resource_type: &str, id: &str) -> Resource {
        Resource::new(resource_type, id)
    }

    /// Display name of `resource` as recorded in `cache`, or `""`.
    pub fn display_name(&self, resource: &Resource, cache: &ResolutionCache) -> String {
        self.registry.display_name(resource, cache)
    }

    /// Whether `user` may access `resource`. Never an error.
    pub fn can_access(
        &self,
        resource: &Resource,
        user: Option<&User>,
        cache: &mut ResolutionCache,
    ) -> bool {
        self.registry.can_access(resource, user, cache)
    }

    /// A collection is accessible when at least one of its resources is.
    pub fn can_access_collection(
        &self,
        collection: &Collection,
        user: Option<&User>,
        cache: &mut ResolutionCache,
    ) -> bool {
        collection
            .resources()
            .iter()
            .any(|resource| self.can_access(resource, user, cache))
    }

    /// Collections containing `resource` that `user` can access.
    pub fn accessible_collections(
        &self,
        resource: &Resource,
        user: Option<&User>,
        cache: &mut ResolutionCache,
    ) -> Result<Vec<Collection>> {
        Ok(self
            .collections_for_resource(resource)?
            .into_iter()
            .filter(|collection| self.can_access_collection(collection, user, cache))
            .collect())
    }

    fn hydrate(&self, record: CollectionRecord) -> Result<Collection> {
        let members = self.store.members(record.id)?;
        Ok(Collection::new(record.id, record.name, members))
    }

    fn validate_name(&self, name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CollectionError::InvalidName(
                "name must not be empty".to_string(),
            ));
        }
        let len = name.chars().count();
        if len > self.config.max_name_length {
            return Err(CollectionError::InvalidName(format!(
                "name is {} characters, maximum is {}",
                len, self.config.max_name_length
            )));
        }
        Ok(name.to_string())
    }
}

/// One request's view of a [`Manager`].
///
/// Names resolved by `can_access` are remembered here and used by
/// `display_name` for as long as the scope lives.
pub struct AccessScope<'m> {
    manager: &'m Manager,
    cache: ResolutionCache,
}

impl<'m> AccessScope<'m> {
    pub fn get_collection(&self, id: CollectionId) -> Result<Collection> {
        self.manager.get_collection(id)
    }

    pub fn new_collection(&self, name: &str) -> Result<Collection> {
        self.manager.new_collection(name)
    }

    pub fn get_resource(&self, resource_type: &str, id: &str) -> Resource {
        self.manager.get_resource(resource_type, id)
    }

    pub fn display_name(&self, resource: &Resource) -> String {
        self.manager.display_name(resource, &self.cache)
    }

    pub fn can_access(&mut self, resource: &Resource, user: Option<&User>) -> bool {
        self.manager.can_access(resource, user, &mut self.cache)
    }

    pub fn can_access_collection(&mut self, collection: &Collection, user: Option<&User>) -> bool {
        self.manager
            .can_access_collection(collection, user, &mut self.cache)
    }

    pub fn accessible_collections(
        &mut self,
        resource: &Resource,
        user: Option<&User>,
    ) -> Result<Vec<Collection>> {
        self.manager
            .accessible_collections(resource, user, &mut self.cache)
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    /// End the scope, keeping what it resolved for later name lookups.
    pub fn into_cache(self) -> ResolutionCache {
        self.cache
    }
}
