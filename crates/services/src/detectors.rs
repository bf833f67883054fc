// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Failure detectors: which storage services are currently down (spec §7:
//! "an action depending on a service that goes down mid-execution fails with
//! `ServiceIsDown`"), and a host-state-change watcher built on
//! [`HostCatalog`]'s broadcast channel (spec §2 supplement).

use parking_lot::RwLock;
use std::collections::HashSet;
use wrench_core::{HostId, StorageServiceId};
use wrench_engine::{HostCatalog, HostState};

/// Shared registry of storage services currently considered down or
/// suspended. A [`crate::bare_metal::BareMetalComputeService`] consults this
/// before dispatching any action that depends on a storage service, and an
/// in-flight action's executor consults it again before each of its own
/// storage operations (a service can go down mid-action).
#[derive(Default)]
pub struct ServiceHealth {
    down: RwLock<HashSet<StorageServiceId>>,
    suspended: RwLock<HashSet<StorageServiceId>>,
}

impl ServiceHealth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_down(&self, service: StorageServiceId) {
        self.down.write().insert(service);
    }

    pub fn mark_up(&self, service: StorageServiceId) {
        self.down.write().remove(&service);
    }

    pub fn mark_suspended(&self, service: StorageServiceId) {
        self.suspended.write().insert(service);
    }

    pub fn mark_resumed(&self, service: StorageServiceId) {
        self.suspended.write().remove(&service);
    }

    pub fn is_down(&self, service: StorageServiceId) -> bool {
        self.down.read().contains(&service)
    }

    pub fn is_suspended(&self, service: StorageServiceId) -> bool {
        self.suspended.read().contains(&service)
    }
}

/// Watches a [`HostCatalog`]'s state-transition channel for a single host,
/// used by the action scheduler to evict a host from placement
/// consideration the moment it goes down (spec §2 supplement: "host
/// down/up events interrupt pending placement decisions, not just new
/// dispatch").
pub struct HostStateWatcher {
    receiver: tokio::sync::watch::Receiver<(HostId, HostState)>,
}

impl HostStateWatcher {
    pub fn new(catalog: &HostCatalog) -> Self {
        Self { receiver: catalog.subscribe() }
    }

    /// Wait for the next host state transition on the catalog, regardless of
    /// which host it concerns (callers filter by [`HostId`] themselves).
    /// Never resolves once the catalog itself is dropped.
    pub async fn next(&mut self) -> (HostId, HostState) {
        if self.receiver.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
        *self.receiver.borrow()
    }
}

#[cfg(test)]
#[path = "detectors_tests.rs"]
mod tests;
