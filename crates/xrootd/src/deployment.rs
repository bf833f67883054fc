// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`XRootDDeployment`]: builds a tree of [`Node`]s and tracks, per file,
//! which leaf nodes actually hold it (the "metavisor" registry in the
//! original's `XRootD.h`).

use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use wrench_core::{DataFile, FileId, NodeId};
use wrench_storage::SimpleStorageService;

use crate::node::Node;

/// Default time-to-live for a trivial broadcast search before it gives up,
/// in hop count (spec §4.5, ported from the original's
/// `defaultTimeToLive=1024`).
pub const DEFAULT_TIME_TO_LIVE: u32 = 1024;

struct FileRecord {
    handle: Arc<DataFile>,
    locations: Vec<(NodeId, PathBuf)>,
}

/// Owns every [`Node`] in the overlay and the file→leaves registry used to
/// seed broadcast searches and validate `UpdateCache` reports.
#[derive(Default)]
pub struct XRootDDeployment {
    nodes: HashMap<NodeId, Arc<Node>>,
    files: RwLock<HashMap<FileId, FileRecord>>,
    pub default_time_to_live: u32,
}

impl XRootDDeployment {
    pub fn new() -> Self {
        Self { nodes: HashMap::new(), files: RwLock::new(HashMap::new()), default_time_to_live: DEFAULT_TIME_TO_LIVE }
    }

    pub fn create_storage_server(&mut self, storage: Arc<SimpleStorageService>) -> NodeId {
        self.insert(Node::new_leaf(storage))
    }

    pub fn create_supervisor(&mut self) -> NodeId {
        self.insert(Node::new_supervisor())
    }

    pub fn create_storage_supervisor(&mut self, storage: Arc<SimpleStorageService>) -> NodeId {
        self.insert(Node::new_storage_supervisor(storage))
    }

    fn insert(&mut self, node: Node) -> NodeId {
        let id = node.id();
        self.nodes.insert(id, Arc::new(node));
        id
    }

    pub fn attach_child(&self, parent: NodeId, child: NodeId) {
        if let Some(p) = self.nodes.get(&parent) {
            p.add_child(child);
        }
        if let Some(c) = self.nodes.get(&child) {
            c.set_parent(parent);
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&Arc<Node>> {
        self.nodes.get(&id)
    }

    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Register that `file` is known to actually reside at leaf `node`
    /// under `path` (called whenever a storage service first accepts a
    /// write), seeding the broadcast-search fan-out and `UpdateCache`
    /// validation.
    pub fn register_file_location(&self, file: Arc<DataFile>, node: NodeId, path: impl AsRef<Path>) {
        let mut files = self.files.write();
        let record = files.entry(file.id()).or_insert_with(|| FileRecord { handle: file, locations: Vec::new() });
        let path = path.as_ref().to_path_buf();
        if !record.locations.iter().any(|(n, p)| *n == node && *p == path) {
            record.locations.push((node, path));
        }
    }

    pub fn file_nodes(&self, file: FileId) -> Vec<NodeId> {
        self.files.read().get(&file).map(|r| r.locations.iter().map(|(n, _)| *n).collect()).unwrap_or_default()
    }

    pub fn file_node_paths(&self, file: FileId) -> Vec<(NodeId, PathBuf)> {
        self.files.read().get(&file).map(|r| r.locations.clone()).unwrap_or_default()
    }

    /// The shared [`DataFile`] handle registered alongside `file`'s known
    /// locations, if any have been registered yet.
    pub fn file_handle(&self, file: FileId) -> Option<Arc<DataFile>> {
        self.files.read().get(&file).map(|r| r.handle.clone())
    }

    /// Path from `root` down to `target` via parent-chasing on `target`,
    /// reversed — used to seed a [`crate::search_stack::SearchStack`] once a
    /// leaf holding the file has been identified (spec §4.5 step 5, ported
    /// from `Node::search`).
    pub fn path_to(&self, target: NodeId) -> Vec<NodeId> {
        let mut path = vec![target];
        let mut current = target;
        while let Some(node) = self.nodes.get(&current) {
            match node.parent() {
                Some(parent) => {
                    path.push(parent);
                    current = parent;
                }
                None => break,
            }
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
#[path = "deployment_tests.rs"]
mod tests;
