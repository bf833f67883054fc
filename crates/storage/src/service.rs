// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`SimpleStorageService`]: a logical filesystem over a
//! `HashSet<(FileId, size)>` per directory, with capacity accounting (spec
//! §4.3).

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use wrench_core::{DataFile, FailureCause, FileId, StorageServiceId};
use std::sync::Arc;

/// Behavior every storage service in the workspace exposes to the action
/// executor and the XRootD overlay, independent of backing representation.
pub trait StorageService: Send + Sync {
    fn id(&self) -> StorageServiceId;
    fn lookup_file(&self, file: FileId, directory: &Path) -> bool;
    fn write_file(&self, file: Arc<DataFile>, directory: &Path) -> Result<(), FailureCause>;
    fn delete_file(&self, file: FileId, directory: &Path) -> Result<(), FailureCause>;
    fn occupied_space(&self) -> u64;
    fn capacity(&self) -> u64;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Entry {
    file: FileId,
    size: u64,
}

/// An in-memory storage service: a directory-keyed logical filesystem with
/// a fixed total capacity (spec §4.3: "capacity is enforced at the
/// directory-entry level; exceeding it fails the write with
/// `StorageServiceNotEnoughSpace`").
pub struct SimpleStorageService {
    id: StorageServiceId,
    capacity: u64,
    directories: Mutex<HashMap<PathBuf, HashSet<Entry>>>,
    occupied: Mutex<u64>,
}

impl SimpleStorageService {
    pub fn new(capacity: u64) -> Self {
        Self { id: StorageServiceId::new(), capacity, directories: Mutex::new(HashMap::new()), occupied: Mutex::new(0) }
    }

    pub fn read_file(&self, file: FileId, directory: &Path) -> Result<(), FailureCause> {
        if self.lookup_file(file, directory) {
            Ok(())
        } else {
            Err(FailureCause::FileNotFound { file, location: directory.display().to_string() })
        }
    }

    /// Copy `file` from `src_dir` on this service to `dst_dir`, which may be
    /// on a different [`SimpleStorageService`]. Fails with
    /// `FileAlreadyBeingCopied` if `dst` already has a pending copy for this
    /// file tracked by the caller's `DataMovementManager` — that dedup
    /// happens one layer up, not here.
    pub fn copy_file(&self, file: Arc<DataFile>, src_dir: &Path, dst: &SimpleStorageService, dst_dir: &Path) -> Result<(), FailureCause> {
        if !self.lookup_file(file.id(), src_dir) {
            return Err(FailureCause::FileNotFound { file: file.id(), location: src_dir.display().to_string() });
        }
        dst.write_file(file, dst_dir)
    }
}

impl StorageService for SimpleStorageService {
    fn id(&self) -> StorageServiceId {
        self.id
    }

    fn lookup_file(&self, file: FileId, directory: &Path) -> bool {
        self.directories.lock().get(directory).map(|entries| entries.iter().any(|e| e.file == file)).unwrap_or(false)
    }

    fn write_file(&self, file: Arc<DataFile>, directory: &Path) -> Result<(), FailureCause> {
        let size = file.size_in_bytes();
        let mut occupied = self.occupied.lock();
        if *occupied + size > self.capacity {
            return Err(FailureCause::StorageServiceNotEnoughSpace { file: file.id(), storage_service: self.id });
        }
        let mut dirs = self.directories.lock();
        let entries = dirs.entry(directory.to_path_buf()).or_default();
        if entries.insert(Entry { file: file.id(), size }) {
            *occupied += size;
        }
        Ok(())
    }

    fn delete_file(&self, file: FileId, directory: &Path) -> Result<(), FailureCause> {
        let mut dirs = self.directories.lock();
        let entries = dirs.get_mut(directory).ok_or(FailureCause::FileNotFound { file, location: directory.display().to_string() })?;
        let removed = entries.iter().find(|e| e.file == file).cloned();
        match removed {
            Some(entry) => {
                entries.remove(&entry);
                *self.occupied.lock() -= entry.size;
                Ok(())
            }
            None => Err(FailureCause::FileNotFound { file, location: directory.display().to_string() }),
        }
    }

    fn occupied_space(&self) -> u64 {
        *self.occupied.lock()
    }

    fn capacity(&self) -> u64 {
        self.capacity
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
