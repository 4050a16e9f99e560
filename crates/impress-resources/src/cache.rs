//! Request-scoped memory of what providers resolved during access checks.

use std::collections::HashMap;

use crate::resource::Resource;

/// Labels recorded by providers after a successful access check.
///
/// Entries are keyed by provider name and resource, so two providers that
/// both claim a resource never see each other's labels. A cache lives for
/// one request; nothing is ever evicted.
#[derive(Debug, Clone, Default)]
pub struct ResolutionCache {
    labels: HashMap<String, HashMap<Resource, String>>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the label `provider` resolved for `resource`.
    pub fn record(&mut self, provider: &str, resource: &Resource, label: impl Into<String>) {
        self.labels
            .entry(provider.to_string())
            .or_default()
            .insert(resource.clone(), label.into());
    }

    /// The label `provider` recorded for `resource`, if any.
    pub fn label(&self, provider: &str, resource: &Resource) -> Option<&str> {
        self.labels
            .get(provider)
            .and_then(|by_resource| by_resource.get(resource))
            .map(String::as_str)
    }

    /// Total number of recorded labels across all providers.
    pub fn len(&self) -> usize {
        self.labels.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }
}
