//! impress-resources: collections of shareable resources and per-type
//! access providers.
//!
//! - **Resource**: a `(type, id)` pair naming something shareable
//! - **Collection**: a named, persisted group of resources
//! - **ResourceProvider**: answers "may this user access it?" and "what is it
//!   called?" for one resource type
//! - **ProviderRegistry**: providers consulted in registration order; the
//!   first grant wins, failures count as "not mine"
//! - **Manager**: collection lifecycle plus access queries, with
//!   [`AccessScope`] carrying the per-request [`ResolutionCache`]
//!
//! ```no_run
//! use std::sync::Arc;
//! use impress_resources::{
//!     FilesProvider, Manager, MemoryFileTree, ProviderRegistry, ResourcesConfig, User,
//! };
//!
//! let tree = MemoryFileTree::new().with_node("alice", 42, "/alice/files/report.pdf");
//! let registry = ProviderRegistry::new()
//!     .with_provider(FilesProvider::new(Arc::new(tree)))?;
//! let manager = Manager::open(&ResourcesConfig::default(), registry)?;
//!
//! let mut team = manager.new_collection("Team A")?;
//! manager.add_resource(&mut team, manager.get_resource("files", "42"))?;
//!
//! let mut scope = manager.scope();
//! let alice = User::new("alice");
//! assert!(scope.can_access_collection(&team, Some(&alice)));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cache;
pub mod collection;
pub mod config;
pub mod error;
pub mod files;
pub mod manager;
pub mod provider;
pub mod registry;
pub mod resource;
pub mod store;
pub mod telemetry;

#[cfg(feature = "sqlite")]
pub mod sqlite_store;

pub use cache::ResolutionCache;
pub use collection::{Collection, CollectionId};
pub use config::{CollectionsConfig, ConfigError, DatabaseConfig, LogConfig, ResourcesConfig};
pub use error::{CollectionError, Result};
pub use files::{FileNode, FileTree, FilesProvider, MemoryFileTree, FILES_RESOURCE_TYPE};
pub use manager::{AccessScope, Manager};
pub use provider::{ResolutionError, ResourceProvider, Verdict};
pub use registry::{ProviderRegistry, RegistryError};
pub use resource::{Resource, User};
pub use store::{CollectionRecord, CollectionStore, StoreError};

#[cfg(feature = "sqlite")]
pub use sqlite_store::SqliteCollectionStore;
