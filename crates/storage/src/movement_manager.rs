// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`DataMovementManager`]: dedups concurrent copy/read/write requests that
//! target the same [`FileLocation`] by `Arc` identity, so two actions
//! racing to populate the same destination share one transfer instead of
//! running it twice (spec §4.4).

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use wrench_core::{FailureCause, FileLocation};

/// Key by pointer identity, not by value: two `Arc<FileLocation>` that
/// happen to describe the same `(storage_service, path, file)` triple are
/// only the *same* key if they came from the same
/// `LocationTable::get_or_create` call, which is exactly the flyweight
/// guarantee this manager relies on to dedup correctly.
#[derive(Clone)]
struct LocationKey(Arc<FileLocation>);

impl PartialEq for LocationKey {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
impl Eq for LocationKey {}

impl std::hash::Hash for LocationKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.0) as usize).hash(state);
    }
}

type Outcome = Result<(), FailureCause>;

/// Tracks in-flight copies/reads/writes keyed by destination location
/// identity so concurrent requests for the same location join the same
/// transfer rather than starting a redundant one.
#[derive(Default)]
pub struct DataMovementManager {
    pending_copies: Mutex<HashMap<LocationKey, broadcast::Sender<Outcome>>>,
    pending_reads: Mutex<HashMap<LocationKey, broadcast::Sender<Outcome>>>,
    pending_writes: Mutex<HashMap<LocationKey, broadcast::Sender<Outcome>>>,
}

/// What a caller gets back from [`DataMovementManager::join_or_start`]:
/// either it must drive the transfer itself and call
/// [`Self::complete`][DataMovementManager::complete] when done, or it can
/// just await another caller's in-flight transfer.
pub enum Lease {
    Drive(Arc<FileLocation>),
    Join(broadcast::Receiver<Outcome>),
}

impl DataMovementManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn join_or_start(table: &Mutex<HashMap<LocationKey, broadcast::Sender<Outcome>>>, location: Arc<FileLocation>) -> Lease {
        let key = LocationKey(location.clone());
        let mut pending = table.lock();
        if let Some(tx) = pending.get(&key) {
            return Lease::Join(tx.subscribe());
        }
        let (tx, _rx) = broadcast::channel(1);
        pending.insert(key, tx);
        Lease::Drive(location)
    }

    fn complete(table: &Mutex<HashMap<LocationKey, broadcast::Sender<Outcome>>>, location: &Arc<FileLocation>, outcome: Outcome) {
        let key = LocationKey(location.clone());
        if let Some(tx) = table.lock().remove(&key) {
            let _ = tx.send(outcome);
        }
    }

    pub fn join_or_start_copy(&self, destination: Arc<FileLocation>) -> Lease {
        Self::join_or_start(&self.pending_copies, destination)
    }

    pub fn complete_copy(&self, destination: &Arc<FileLocation>, outcome: Outcome) {
        Self::complete(&self.pending_copies, destination, outcome);
    }

    pub fn join_or_start_read(&self, location: Arc<FileLocation>) -> Lease {
        Self::join_or_start(&self.pending_reads, location)
    }

    pub fn complete_read(&self, location: &Arc<FileLocation>, outcome: Outcome) {
        Self::complete(&self.pending_reads, location, outcome);
    }

    pub fn join_or_start_write(&self, location: Arc<FileLocation>) -> Lease {
        Self::join_or_start(&self.pending_writes, location)
    }

    pub fn complete_write(&self, location: &Arc<FileLocation>, outcome: Outcome) {
        Self::complete(&self.pending_writes, location, outcome);
    }

    pub fn pending_copy_count(&self) -> usize {
        self.pending_copies.lock().len()
    }
}

#[cfg(test)]
#[path = "movement_manager_tests.rs"]
mod tests;
