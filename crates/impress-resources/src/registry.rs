use std::sync::Arc;

use crate::cache::ResolutionCache;
use crate::provider::{ResourceProvider, Verdict};
use crate::resource::{Resource, User};

/// Error from the provider registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Provider already registered: {0}")]
    AlreadyRegistered(String),
}

/// Ordered list of resource providers, consulted in registration order.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn ResourceProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider. Returns error if one with the same name exists.
    pub fn register(&mut self, provider: Arc<dyn ResourceProvider>) -> Result<(), RegistryError> {
        if self.providers.iter().any(|p| p.name() == provider.name()) {
            return Err(RegistryError::AlreadyRegistered(provider.name().to_string()));
        }
        tracing::debug!(
            provider = provider.name(),
            resource_type = provider.resource_type(),
            "registered resource provider"
        );
        self.providers.push(provider);
        Ok(())
    }

    pub fn with_provider(
        mut self,
        provider: impl ResourceProvider + 'static,
    ) -> Result<Self, RegistryError> {
        self.register(Arc::new(provider))?;
        Ok(self)
    }

    pub fn providers(&self) -> &[Arc<dyn ResourceProvider>] {
        &self.providers
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Display name from the first provider that has a non-empty label for
    /// `resource`; empty string if none does.
    pub fn display_name(&self, resource: &Resource, cache: &ResolutionCache) -> String {
        for provider in &self.providers {
            match provider.display_name(resource, cache) {
                Ok(Some(label)) if !label.is_empty() => return label,
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(
                        provider = provider.name(),
                        resource = %resource,
                        "provider failed to resolve name: {}",
                        e
                    );
                }
            }
        }
        String::new()
    }

    /// True as soon as one provider grants access. Errors count as
    /// inconclusive.
    pub fn can_access(
        &self,
        resource: &Resource,
        user: Option<&User>,
        cache: &mut ResolutionCache,
    ) -> bool {
        for provider in &self.providers {
            match provider.can_access(resource, user, cache) {
                Ok(Verdict::Matched(true)) => {
                    tracing::debug!(provider = provider.name(), resource = %resource, "access granted");
                    return true;
                }
                Ok(Verdict::Matched(false)) => {
                    tracing::debug!(provider = provider.name(), resource = %resource, "access denied");
                }
                Ok(Verdict::Inconclusive) => {}
                Err(e) => {
                    tracing::warn!(
                        provider = provider.name(),
                        resource = %resource,
                        "provider failed to check access: {}",
                        e
                    );
                }
            }
        }
        false
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.providers.iter().map(|p| p.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ResolutionError;

    /// Grants everything of its type and labels it with its own name.
    struct Permissive {
        name: &'static str,
        resource_type: &'static str,
    }

    impl ResourceProvider for Permissive {
        fn name(&self) -> &str {
            self.name
        }

        fn resource_type(&self) -> &str {
            self.resource_type
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
            if user.is_none() {
                return Ok(Verdict::Matched(false));
            }
            cache.record(self.name, resource, self.name);
            Ok(Verdict::Matched(true))
        }
    }

    struct Broken;

    impl ResourceProvider for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn resource_type(&self) -> &str {
            "files"
        }

        fn display_name(
            &self,
            _resource: &Resource,
            _cache: &ResolutionCache,
        ) -> Result<Option<String>, ResolutionError> {
            Err(ResolutionError::Backend("storage offline".into()))
        }

        fn can_access(
            &self,
            _resource: &Resource,
            _user: Option<&User>,
            _cache: &mut ResolutionCache,
        ) -> Result<Verdict, ResolutionError> {
            Err(ResolutionError::Backend("storage offline".into()))
        }
    }

    /// Grants `files` resources to a single uid.
    struct Owner {
        name: &'static str,
        owner: &'static str,
    }

    impl ResourceProvider for Owner {
        fn name(&self) -> &str {
            self.name
        }

        fn resource_type(&self) -> &str {
            "files"
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
                Some(user) if user.uid() == self.owner => {
                    cache.record(self.name, resource, self.name);
                    Ok(Verdict::Matched(true))
                }
                _ => Ok(Verdict::Matched(false)),
            }
        }
    }

    fn permissive(name: &'static str) -> Permissive {
        Permissive {
            name,
            resource_type: "files",
        }
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(permissive("a"))).unwrap();
        let err = registry.register(Arc::new(permissive("a"))).unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyRegistered(name) if name == "a"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn empty_registry_denies_and_has_no_names() {
        let registry = ProviderRegistry::new();
        let file = Resource::new("files", "1");
        let mut cache = ResolutionCache::new();

        assert!(!registry.can_access(&file, Some(&User::new("alice")), &mut cache));
        assert_eq!(registry.display_name(&file, &cache), "");
    }

    #[test]
    fn failing_provider_does_not_block_later_grant() {
        let registry = ProviderRegistry::new()
            .with_provider(Broken)
            .unwrap()
            .with_provider(permissive("files"))
            .unwrap();
        let file = Resource::new("files", "1");
        let mut cache = ResolutionCache::new();

        assert!(registry.can_access(&file, Some(&User::new("alice")), &mut cache));
        assert_eq!(registry.display_name(&file, &cache), "files");
    }

    #[test]
    fn first_registered_provider_names_the_resource() {
        let registry = ProviderRegistry::new()
            .with_provider(permissive("first"))
            .unwrap()
            .with_provider(permissive("second"))
            .unwrap();
        let file = Resource::new("files", "1");
        let mut cache = ResolutionCache::new();
        // Both providers have resolved the resource in this cache.
        cache.record("second", &file, "second");
        cache.record("first", &file, "first");

        assert!(registry.can_access(&file, Some(&User::new("alice")), &mut cache));
        assert_eq!(registry.display_name(&file, &cache), "first");
    }

    #[test]
    fn later_provider_names_what_earlier_one_denied() {
        let registry = ProviderRegistry::new()
            .with_provider(Owner {
                name: "first",
                owner: "alice",
            })
            .unwrap()
            .with_provider(Owner {
                name: "second",
                owner: "bob",
            })
            .unwrap();
        let file = Resource::new("files", "1");
        let mut cache = ResolutionCache::new();

        assert!(registry.can_access(&file, Some(&User::new("bob")), &mut cache));
        assert_eq!(cache.label("first", &file), None);
        assert_eq!(registry.display_name(&file, &cache), "second");

        // Once the first provider has a label too, registration order wins.
        assert!(registry.can_access(&file, Some(&User::new("alice")), &mut cache));
        assert_eq!(registry.display_name(&file, &cache), "first");
    }

    #[test]
    fn unmatched_type_is_denied() {
        let registry = ProviderRegistry::new()
            .with_provider(permissive("files"))
            .unwrap();
        let room = Resource::new("room", "abc");
        let mut cache = ResolutionCache::new();

        assert!(!registry.can_access(&room, Some(&User::new("alice")), &mut cache));
        assert!(cache.is_empty());
    }
}
