//! Shared managers and providers for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use impress_resources::{
    FilesProvider, Manager, MemoryFileTree, ProviderRegistry, ResolutionCache, ResolutionError,
    Resource, ResourceProvider, ResourcesConfig, User, Verdict,
};

/// Files visible to alice and bob.
pub fn file_tree() -> MemoryFileTree {
    MemoryFileTree::new()
        .with_node("alice", 1, "/alice/files/Documents/plan.md")
        .with_node("alice", 2, "/alice/files/Photos/cat.jpg")
        .with_node("bob", 1, "/bob/files/Shared/plan.md")
        .with_node("bob", 3, "/bob/files/budget.ods")
}

/// Manager with the files provider over [`file_tree`] and an in-memory store.
pub fn files_manager() -> Manager {
    let registry = ProviderRegistry::new()
        .with_provider(FilesProvider::new(Arc::new(file_tree())))
        .unwrap();
    Manager::open(&ResourcesConfig::default(), registry).unwrap()
}

/// Grants every `calendar` resource to any signed-in user.
pub struct CalendarProvider;

impl ResourceProvider for CalendarProvider {
    fn name(&self) -> &str {
        "calendar"
    }

    fn resource_type(&self) -> &str {
        "calendar"
    }

    fn can_access(
        &self,
        resource: &Resource,
        user: Option<&User>,
        cache: &mut ResolutionCache,
    ) -> Result<Verdict, ResolutionError> {
        if !self.handles(resource) {
            return Ok(Verdict::Inconclusive);
        }
        match user {
            Some(user) => {
                cache.record(self.name(), resource, format!("{}'s {}", user.uid(), resource.id()));
                Ok(Verdict::Matched(true))
            }
            None => Ok(Verdict::Matched(false)),
        }
    }
}

/// Fails every call, whatever the resource.
pub struct OfflineProvider;

impl ResourceProvider for OfflineProvider {
    fn name(&self) -> &str {
        "offline"
    }

    fn resource_type(&self) -> &str {
        "files"
    }

    fn display_name(
        &self,
        _resource: &Resource,
        _cache: &ResolutionCache,
    ) -> Result<Option<String>, ResolutionError> {
        Err(ResolutionError::Backend("connection refused".into()))
    }

    fn can_access(
        &self,
        _resource: &Resource,
        _user: Option<&User>,
        _cache: &mut ResolutionCache,
    ) -> Result<Verdict, ResolutionError> {
        Err(ResolutionError::Backend("connection refused".into()))
    }
}
