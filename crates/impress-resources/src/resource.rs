//! Resource and user identities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Something that can be collected and shared: a file, a calendar, a room.
///
/// A resource is nothing more than its `(type, id)` pair. Whether it exists,
/// and who may see it, is decided later by a [`ResourceProvider`](crate::ResourceProvider).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Resource {
    resource_type: String,
    id: String,
}

impl Resource {
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// The kind of resource, e.g. `"files"`.
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// The id of the resource within its type's namespace.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource_type, self.id)
    }
}

/// An authenticated user, identified by an opaque uid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    uid: String,
}

impl User {
    pub fn new(uid: impl Into<String>) -> Self {
        Self { uid: uid.into() }
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_type_and_id() {
        let a = Resource::new("files", "42");
        let b = Resource::new("files", "42");
        let c = Resource::new("calendar", "42");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn display_joins_type_and_id() {
        assert_eq!(Resource::new("files", "7").to_string(), "files:7");
    }

    #[test]
    fn resource_serde_uses_field_names() {
        let json = serde_json::to_string(&Resource::new("files", "7")).unwrap();
        assert_eq!(json, r#"{"resource_type":"files","id":"7"}"#);
    }
}
