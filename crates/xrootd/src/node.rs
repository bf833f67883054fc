// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`Node`]: one level of the XRootD hierarchy (spec §4.5). Conceptually
//! every node is a storage service, but is addressed through the overlay's
//! broadcast-search protocol rather than directly, hence the separate type
//! from [`wrench_storage::SimpleStorageService`].

use parking_lot::RwLock;
use std::sync::Arc;
use wrench_core::NodeId;
use wrench_storage::SimpleStorageService;

/// A node is a leaf (backed by a storage service), a pure supervisor, or
/// both at once (a storage server that also supervises children) — ported
/// from the original's comment that "conceptually all nodes ARE storage
/// services" even though the API for reaching a file through the overlay
/// differs entirely from addressing a storage service directly.
pub struct Node {
    id: NodeId,
    storage: Option<Arc<SimpleStorageService>>,
    children: RwLock<Vec<NodeId>>,
    parent: RwLock<Option<NodeId>>,
}

impl Node {
    pub fn new_leaf(storage: Arc<SimpleStorageService>) -> Self {
        Self { id: NodeId::new(), storage: Some(storage), children: RwLock::new(Vec::new()), parent: RwLock::new(None) }
    }

    pub fn new_supervisor() -> Self {
        Self { id: NodeId::new(), storage: None, children: RwLock::new(Vec::new()), parent: RwLock::new(None) }
    }

    pub fn new_storage_supervisor(storage: Arc<SimpleStorageService>) -> Self {
        Self { id: NodeId::new(), storage: Some(storage), children: RwLock::new(Vec::new()), parent: RwLock::new(None) }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn storage(&self) -> Option<&Arc<SimpleStorageService>> {
        self.storage.as_ref()
    }

    pub fn is_leaf(&self) -> bool {
        self.storage.is_some()
    }

    pub fn is_supervisor(&self) -> bool {
        !self.children.read().is_empty()
    }

    /// Stable child order: `get_child(i)` is deterministic across calls, as
    /// the broadcast-search protocol relies on visiting children in a fixed
    /// order when building its fan-out.
    pub fn get_child(&self, index: usize) -> Option<NodeId> {
        self.children.read().get(index).copied()
    }

    pub fn children(&self) -> Vec<NodeId> {
        self.children.read().clone()
    }

    pub fn child_count(&self) -> usize {
        self.children.read().len()
    }

    pub(crate) fn add_child(&self, child: NodeId) {
        self.children.write().push(child);
    }

    pub fn parent(&self) -> Option<NodeId> {
        *self.parent.read()
    }

    pub(crate) fn set_parent(&self, parent: NodeId) {
        *self.parent.write() = Some(parent);
    }
}

#[cfg(test)]
#[path = "node_tests.rs"]
mod tests;
