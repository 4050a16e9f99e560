//! Access provider for files owned by or shared with a user.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::cache::ResolutionCache;
use crate::provider::{ResolutionError, ResourceProvider, Verdict};
use crate::resource::{Resource, User};

/// Resource type handled by [`FilesProvider`].
pub const FILES_RESOURCE_TYPE: &str = "files";

/// A file or folder as seen from one user's folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileNode {
    pub id: i64,
    pub path: String,
}

/// Lookup of nodes inside a user's folder.
pub trait FileTree: Send + Sync {
    /// All nodes with `node_id` visible to `uid`. Empty when the user cannot
    /// see the node or it does not exist.
    fn nodes_by_id(&self, uid: &str, node_id: i64) -> Result<Vec<FileNode>, ResolutionError>;
}

/// Grants access to a `files` resource when the node is reachable from the
/// user's own folder.
pub struct FilesProvider {
    tree: Arc<dyn FileTree>,
}

impl FilesProvider {
    pub fn new(tree: Arc<dyn FileTree>) -> Self {
        Self { tree }
    }
}

impl ResourceProvider for FilesProvider {
    fn name(&self) -> &str {
        FILES_RESOURCE_TYPE
    }

    fn resource_type(&self) -> &str {
        FILES_RESOURCE_TYPE
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

        let Some(user) = user else {
            return Ok(Verdict::Matched(false));
        };

        let Ok(node_id) = resource.id().parse::<i64>() else {
            tracing::debug!(resource = %resource, "file id is not numeric");
            return Ok(Verdict::Matched(false));
        };

        let nodes = self.tree.nodes_by_id(user.uid(), node_id)?;
        match nodes.into_iter().next() {
            Some(node) => {
                cache.record(self.name(), resource, node.path);
                Ok(Verdict::Matched(true))
            }
            None => Ok(Verdict::Matched(false)),
        }
    }
}

/// In-memory [`FileTree`] keyed by uid.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileTree {
    nodes: HashMap<String, Vec<FileNode>>,
}

impl MemoryFileTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a node visible to `uid`.
    pub fn insert(&mut self, uid: impl Into<String>, id: i64, path: impl Into<String>) {
        self.nodes.entry(uid.into()).or_default().push(FileNode {
            id,
            path: path.into(),
        });
    }

    pub fn with_node(mut self, uid: impl Into<String>, id: i64, path: impl Into<String>) -> Self {
        self.insert(uid, id, path);
        self
    }
}

impl FileTree for MemoryFileTree {
    fn nodes_by_id(&self, uid: &str, node_id: i64) -> Result<Vec<FileNode>, ResolutionError> {
        Ok(self
            .nodes
            .get(uid)
            .map(|nodes| nodes.iter().filter(|n| n.id == node_id).cloned().collect())
            .unwrap_or_default())
    }
}
