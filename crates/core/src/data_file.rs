// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File identity: [`DataFile`] and the process-wide [`FileRegistry`].

use crate::ids::FileId;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Immutable identity `(id, size_in_bytes)`. Created once and registered
/// process-wide; referenced by shared ownership from tasks, locations, and
/// services. Two files compare equal iff `id` matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataFile {
    id: FileId,
    name: String,
    size_in_bytes: u64,
}

impl DataFile {
    fn new(name: impl Into<String>, size_in_bytes: u64) -> Self {
        Self { id: FileId::new(), name: name.into(), size_in_bytes }
    }

    pub fn id(&self) -> FileId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size_in_bytes(&self) -> u64 {
        self.size_in_bytes
    }
}

impl PartialEq for DataFile {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for DataFile {}

impl std::hash::Hash for DataFile {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Process-wide, insert-only registry of [`DataFile`]s.
///
/// Scoped to a `Simulation` root (spec §9) rather than a true global so that
/// multiple simulations can coexist in the same process (e.g. in tests).
#[derive(Debug, Default)]
pub struct FileRegistry {
    files: RwLock<HashMap<FileId, Arc<DataFile>>>,
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and register a new file, returning a shared handle.
    pub fn add_file(&self, name: impl Into<String>, size_in_bytes: u64) -> Arc<DataFile> {
        let file = Arc::new(DataFile::new(name, size_in_bytes));
        self.files.write().insert(file.id(), file.clone());
        file
    }

    pub fn get(&self, id: FileId) -> Option<Arc<DataFile>> {
        self.files.read().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "data_file_tests.rs"]
mod tests;
