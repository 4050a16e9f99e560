use serde::Serialize;

use crate::resource::Resource;

/// Store-assigned collection identifier.
pub type CollectionId = i64;

/// A named group of resources.
///
/// Handles are built by the [`Manager`](crate::Manager) from persisted rows
/// and mutated only through it, so the member list always mirrors the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collection {
    id: CollectionId,
    name: String,
    resources: Vec<Resource>,
}

impl Collection {
    pub(crate) fn new(id: CollectionId, name: impl Into<String>, resources: Vec<Resource>) -> Self {
        Self {
            id,
            name: name.into(),
            resources,
        }
    }

    pub fn id(&self) -> CollectionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Members in the order they were added.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn contains(&self, resource: &Resource) -> bool {
        self.resources.contains(resource)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub(crate) fn push(&mut self, resource: Resource) {
        if !self.contains(&resource) {
            self.resources.push(resource);
        }
    }

    pub(crate) fn remove(&mut self, resource: &Resource) {
        self.resources.retain(|r| r != resource);
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }
}
