//! The provider contract: one implementation per resource type.

use crate::cache::ResolutionCache;
use crate::resource::{Resource, User};

/// Outcome of asking a single provider about a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The resource is of this provider's type; the flag says whether the
    /// user may access it.
    Matched(bool),
    /// Not this provider's resource. The registry moves on.
    Inconclusive,
}

impl Verdict {
    pub fn is_granted(&self) -> bool {
        matches!(self, Verdict::Matched(true))
    }
}

/// A provider failed internally while resolving a resource.
///
/// This is never used for "not found" or "not allowed"; those are
/// `Verdict::Matched(false)`.
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    #[error("Backend unavailable: {0}")]
    Backend(String),
}

/// Answers naming and access queries for one resource type.
///
/// Providers hold no per-request state. Anything learned during
/// [`can_access`](ResourceProvider::can_access) goes into the caller's
/// [`ResolutionCache`].
pub trait ResourceProvider: Send + Sync {
    /// Unique key of this provider within a registry.
    fn name(&self) -> &str;

    /// The resource type this provider answers for.
    fn resource_type(&self) -> &str;

    fn handles(&self, resource: &Resource) -> bool {
        resource.resource_type() == self.resource_type()
    }

    /// Human-readable label of a resource this provider has already
    /// resolved in `cache`. `None` until a successful access check.
    fn display_name(
        &self,
        resource: &Resource,
        cache: &ResolutionCache,
    ) -> Result<Option<String>, ResolutionError> {
        Ok(cache.label(self.name(), resource).map(str::to_owned))
    }

    /// Decide whether `user` may access `resource`.
    ///
    /// Anonymous callers (`user == None`) are denied by every built-in
    /// provider. On success the resolved label must be recorded in `cache`.
    fn can_access(
        &self,
        resource: &Resource,
        user: Option<&User>,
        cache: &mut ResolutionCache,
    ) -> Result<Verdict, ResolutionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    impl ResourceProvider for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn resource_type(&self) -> &str {
            "deck"
        }

        fn can_access(
            &self,
            resource: &Resource,
            _user: Option<&User>,
            cache: &mut ResolutionCache,
        ) -> Result<Verdict, ResolutionError> {
            cache.record(self.name(), resource, "Board");
            Ok(Verdict::Matched(true))
        }
    }

    #[test]
    fn default_display_name_reads_cache() {
        let provider = Fixed;
        let board = Resource::new("deck", "3");
        let mut cache = ResolutionCache::new();

        assert_eq!(provider.display_name(&board, &cache).unwrap(), None);
        provider.can_access(&board, None, &mut cache).unwrap();
        assert_eq!(
            provider.display_name(&board, &cache).unwrap().as_deref(),
            Some("Board")
        );
    }

    #[test]
    fn handles_compares_type() {
        assert!(Fixed.handles(&Resource::new("deck", "1")));
        assert!(!Fixed.handles(&Resource::new("files", "1")));
    }

    #[test]
    fn only_matched_true_is_granted() {
        assert!(Verdict::Matched(true).is_granted());
        assert!(!Verdict::Matched(false).is_granted());
        assert!(!Verdict::Inconclusive.is_granted());
    }
}
