// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`FileLocation`]: the flyweight `(storage_service, path, file)` triple.

use crate::data_file::DataFile;
use crate::ids::{FileId, StorageServiceId};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A storage-addressable location: `(storage_service, path, file)` plus a
/// `is_scratch` flag.
///
/// Produced exclusively by [`LocationTable::get_or_create`], which
/// de-duplicates by `(storage_service, canonical(path), file)` so equal
/// locations share `Arc` identity — this is the flyweight pattern called out
/// in spec §3 and tested by spec §8.7 (`LOCATION(ss, p, f) == LOCATION(ss,
/// p, f)` as object identity, not merely value equality).
#[derive(Debug)]
pub struct FileLocation {
    storage_service: StorageServiceId,
    path: PathBuf,
    file: Arc<DataFile>,
    is_scratch: bool,
}

impl FileLocation {
    pub fn storage_service(&self) -> StorageServiceId {
        self.storage_service
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file(&self) -> &Arc<DataFile> {
        &self.file
    }

    pub fn file_id(&self) -> FileId {
        self.file.id()
    }

    pub fn is_scratch(&self) -> bool {
        self.is_scratch
    }
}

/// A file-location reference as written into an action before the job is
/// dispatched. [`FileLocationSpec::Scratch`] is a sentinel resolved against
/// the compute service actually running the job (spec §3: "`SCRATCH` is a
/// sentinel variant resolved against the compute service of the executing
/// job") — everywhere else a concrete [`FileLocation`] is already known.
#[derive(Debug, Clone)]
pub enum FileLocationSpec {
    Concrete(Arc<FileLocation>),
    Scratch { path: PathBuf, file: Arc<DataFile> },
}

impl FileLocationSpec {
    /// Resolve a scratch sentinel against `scratch_service`; concrete
    /// locations pass through unchanged.
    pub fn resolve(&self, locations: &LocationTable, scratch_service: StorageServiceId) -> Arc<FileLocation> {
        match self {
            FileLocationSpec::Concrete(loc) => loc.clone(),
            FileLocationSpec::Scratch { path, file } => {
                locations.get_or_create_scratch(scratch_service, path, file.clone())
            }
        }
    }
}

impl PartialEq for FileLocation {
    fn eq(&self, other: &Self) -> bool {
        self.storage_service == other.storage_service
            && self.path == other.path
            && self.file.id() == other.file.id()
            && self.is_scratch == other.is_scratch
    }
}
impl Eq for FileLocation {}

impl std::hash::Hash for FileLocation {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.storage_service.hash(state);
        self.path.hash(state);
        self.file.id().hash(state);
        self.is_scratch.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct LocationKey {
    storage_service: StorageServiceId,
    path: PathBuf,
    file: FileId,
    is_scratch: bool,
}

/// Process-wide flyweight factory for [`FileLocation`]s.
#[derive(Debug, Default)]
pub struct LocationTable {
    entries: Mutex<HashMap<LocationKey, Arc<FileLocation>>>,
}

impl LocationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonicalize a path for de-duplication purposes without touching the
    /// filesystem (this is a simulated path, not a real one).
    fn canonical(path: &Path) -> PathBuf {
        let mut out = PathBuf::new();
        for component in path.components() {
            out.push(component);
        }
        out
    }

    /// Return the shared [`FileLocation`] for `(storage_service, path,
    /// file)`, creating it on first use. Repeated calls with the same
    /// logical triple return `Arc`-identical locations.
    pub fn get_or_create(
        &self,
        storage_service: StorageServiceId,
        path: impl AsRef<Path>,
        file: Arc<DataFile>,
    ) -> Arc<FileLocation> {
        self.get_or_create_inner(storage_service, path, file, false)
    }

    /// Like [`Self::get_or_create`] but marks the location as scratch space.
    pub fn get_or_create_scratch(
        &self,
        storage_service: StorageServiceId,
        path: impl AsRef<Path>,
        file: Arc<DataFile>,
    ) -> Arc<FileLocation> {
        self.get_or_create_inner(storage_service, path, file, true)
    }

    fn get_or_create_inner(
        &self,
        storage_service: StorageServiceId,
        path: impl AsRef<Path>,
        file: Arc<DataFile>,
        is_scratch: bool,
    ) -> Arc<FileLocation> {
        let path = Self::canonical(path.as_ref());
        let key = LocationKey { storage_service, path: path.clone(), file: file.id(), is_scratch };
        let mut entries = self.entries.lock();
        entries
            .entry(key)
            .or_insert_with(|| Arc::new(FileLocation { storage_service, path, file, is_scratch }))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "file_location_tests.rs"]
mod tests;
