// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The broadcast-search protocol (spec §4.5 steps 1-6):
//!
//! 1. A lookup at `start` checks its own [`Cache`] first (`CACHE_LOOKUP_OVERHEAD`).
//! 2. On a miss, every node in `start`'s subtree that has the file registered
//!    is walked with a [`SearchStack`], one `ContinueSearch` hop at a time
//!    (`MESSAGE_OVERHEAD` per hop, `SEARCH_BROADCAST_OVERHEAD` once per
//!    search), in the order the deployment registered their locations —
//!    the first candidate whose path lies inside `start`'s subtree wins
//!    (at-most-one-answer, spec §5 ordering guarantee).
//! 3. Once a match is found, an `UpdateCache` is issued for every node on the
//!    path back to `start` (`UPDATE_CACHE_OVERHEAD` per node), warming each
//!    node's cache so a later lookup at or below it is a hit.
//! 4. `reduced_simulation` mode skips the hop-by-hop broadcast entirely and
//!    answers directly from the deployment's file registry — used for
//!    platforms large enough that simulating every message would dominate
//!    runtime without changing the answer.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use wrench_config::properties::{
    PropertyMap, CACHE_LOOKUP_OVERHEAD, CACHE_MAX_LIFETIME, MESSAGE_OVERHEAD, REDUCED_SIMULATION, SEARCH_BROADCAST_OVERHEAD, UPDATE_CACHE_OVERHEAD,
};
use wrench_core::{FileId, LocationTable, NodeId, StorageServiceId};
use wrench_storage::StorageService;
use wrench_wire::{ContinueSearch, UpdateCache};

use crate::cache::Cache;
use crate::deployment::XRootDDeployment;
use crate::search_stack::SearchStack;

/// Owns per-node caches and drives searches over a [`XRootDDeployment`].
pub struct XRootDOverlay {
    deployment: XRootDDeployment,
    locations: LocationTable,
    caches: Mutex<HashMap<NodeId, Cache>>,
    pub reduced_simulation: bool,
    cache_max_lifetime_secs: f64,
    message_overhead_secs: f64,
    cache_lookup_overhead_secs: f64,
    search_broadcast_overhead_secs: f64,
    update_cache_overhead_secs: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub location: Option<Arc<wrench_core::FileLocation>>,
    /// Number of `ContinueSearch` hops taken while resolving the search;
    /// zero under `reduced_simulation` mode or on a cache hit.
    pub hops: u32,
    /// Simulated time charged to produce this outcome: a `CACHE_LOOKUP_OVERHEAD`
    /// on every call, plus `SEARCH_BROADCAST_OVERHEAD` + one `MESSAGE_OVERHEAD`
    /// per hop + one `UPDATE_CACHE_OVERHEAD` per warmed node when a broadcast
    /// actually ran.
    pub duration: Duration,
}

impl XRootDOverlay {
    pub fn new(deployment: XRootDDeployment) -> Self {
        Self {
            deployment,
            locations: LocationTable::new(),
            caches: Mutex::new(HashMap::new()),
            reduced_simulation: false,
            cache_max_lifetime_secs: crate::cache::CACHE_MAX_LIFETIME_SECS,
            message_overhead_secs: 0.0,
            cache_lookup_overhead_secs: 0.0,
            search_broadcast_overhead_secs: 0.0,
            update_cache_overhead_secs: 0.0,
        }
    }

    /// Build an overlay with an explicit `REDUCED_SIMULATION` and
    /// `CACHE_MAX_LIFETIME`; every simulated-time overhead defaults to zero.
    /// Prefer [`XRootDOverlay::from_properties`] when a full storage-service
    /// [`PropertyMap`] is available.
    pub fn with_properties(deployment: XRootDDeployment, reduced_simulation: bool, cache_max_lifetime_secs: f64) -> Self {
        Self { reduced_simulation, cache_max_lifetime_secs, ..Self::new(deployment) }
    }

    /// Build an overlay from a storage-service [`PropertyMap`] (spec §6),
    /// reading `REDUCED_SIMULATION`, `CACHE_MAX_LIFETIME`, and the four
    /// search-overhead properties.
    pub fn from_properties(deployment: XRootDDeployment, props: &PropertyMap) -> Self {
        Self {
            reduced_simulation: props.as_bool(REDUCED_SIMULATION, false).unwrap_or(false),
            cache_max_lifetime_secs: props.as_f64(CACHE_MAX_LIFETIME, crate::cache::CACHE_MAX_LIFETIME_SECS).unwrap_or(crate::cache::CACHE_MAX_LIFETIME_SECS),
            message_overhead_secs: props.as_f64(MESSAGE_OVERHEAD, 0.0).unwrap_or(0.0),
            cache_lookup_overhead_secs: props.as_f64(CACHE_LOOKUP_OVERHEAD, 0.0).unwrap_or(0.0),
            search_broadcast_overhead_secs: props.as_f64(SEARCH_BROADCAST_OVERHEAD, 0.0).unwrap_or(0.0),
            update_cache_overhead_secs: props.as_f64(UPDATE_CACHE_OVERHEAD, 0.0).unwrap_or(0.0),
            ..Self::new(deployment)
        }
    }

    pub fn deployment(&self) -> &XRootDDeployment {
        &self.deployment
    }

    fn storage_service_id_of(&self, node: NodeId) -> Option<StorageServiceId> {
        self.deployment.node(node).and_then(|n| n.storage()).map(|s| s.id())
    }

    /// Resolve `file` starting from `start`'s cache, falling through to a
    /// broadcast search of `start`'s subtree.
    pub fn find_file(&self, start: NodeId, file: FileId, now: f64) -> SearchOutcome {
        let lookup_overhead = secs(self.cache_lookup_overhead_secs);

        if let Some(location) = self.lookup_cache(start, file, now) {
            return SearchOutcome { location: Some(location), hops: 0, duration: lookup_overhead };
        }

        if self.reduced_simulation {
            let mut outcome = self.resolve_directly(start, file, now);
            outcome.duration = lookup_overhead;
            return outcome;
        }

        self.broadcast(start, file, now, lookup_overhead)
    }

    fn lookup_cache(&self, node: NodeId, file: FileId, now: f64) -> Option<Arc<wrench_core::FileLocation>> {
        let mut caches = self.caches.lock();
        let cache = caches.entry(node).or_insert_with(|| Cache::with_max_lifetime(self.cache_max_lifetime_secs));
        cache.get(file, now).and_then(|locations| locations.iter().next().cloned())
    }

    /// Reduced-simulation shortcut: answer directly from the deployment's
    /// file registry without walking the tree hop by hop.
    fn resolve_directly(&self, start: NodeId, file: FileId, now: f64) -> SearchOutcome {
        for (leaf, _) in self.deployment.file_node_paths(file) {
            if self.subtree_path(start, leaf).is_some() {
                if let Some(location) = self.resolve_leaf(file, leaf) {
                    self.warm_cache(start, file, location.clone(), now);
                    return SearchOutcome { location: Some(location), hops: 0, duration: Duration::ZERO };
                }
            }
        }
        SearchOutcome { location: None, hops: 0, duration: Duration::ZERO }
    }

    /// Full broadcast: every registered location of `file` is tried in
    /// registration order; the first one whose path lies inside `start`'s
    /// subtree wins (at-most-one-answer). Each candidate is walked with a
    /// [`SearchStack`], stepping down one `ContinueSearch` hop at a time
    /// until the stack's terminal node is reached or the deployment's
    /// time-to-live is exhausted.
    fn broadcast(&self, start: NodeId, file: FileId, now: f64, lookup_overhead: Duration) -> SearchOutcome {
        let mut duration = lookup_overhead + secs(self.search_broadcast_overhead_secs);
        let ttl = self.deployment.default_time_to_live;
        let mut hops = 0u32;

        for leaf in self.deployment.file_nodes(file) {
            let Some(path) = self.subtree_path(start, leaf) else { continue };
            if path.len() as u32 > ttl.saturating_add(1) {
                continue;
            }

            let mut stack = SearchStack::new(path.clone(), file);
            let mut node = stack.head_node();
            while let Some(current) = node {
                hops += 1;
                duration += secs(self.message_overhead_secs);
                let message = ContinueSearch { file, originator: current, answer_mailbox: String::new(), search_id: hops as u64 };
                tracing::trace!(?message, "continuing search one hop down the tree");
                node = stack.move_down();
            }

            let Some(location) = self.resolve_leaf(file, leaf) else { continue };
            for ancestor in path {
                let message = UpdateCache { file, node: ancestor, discovered_at: now };
                tracing::trace!(?message, "warming a cache on the path back to the search's origin");
                duration += secs(self.update_cache_overhead_secs);
                self.warm_cache(ancestor, file, location.clone(), now);
            }
            return SearchOutcome { location: Some(location), hops, duration };
        }

        SearchOutcome { location: None, hops, duration }
    }

    /// The path from `start` down to `leaf`, or `None` if `leaf` isn't in
    /// `start`'s subtree.
    fn subtree_path(&self, start: NodeId, leaf: NodeId) -> Option<Vec<NodeId>> {
        let leaf_path = self.deployment.path_to(leaf);
        let start_path = self.deployment.path_to(start);
        if !leaf_path.starts_with(&start_path) {
            return None;
        }
        Some(leaf_path[start_path.len() - 1..].to_vec())
    }

    fn resolve_leaf(&self, file: FileId, leaf: NodeId) -> Option<Arc<wrench_core::FileLocation>> {
        let service = self.storage_service_id_of(leaf)?;
        let stored_path = self.stored_path(file, leaf)?;
        let handle = self.deployment.file_handle(file)?;
        Some(self.locations.get_or_create(service, stored_path, handle))
    }

    fn stored_path(&self, file: FileId, node: NodeId) -> Option<std::path::PathBuf> {
        self.deployment.file_node_paths(file).into_iter().find(|(n, _)| *n == node).map(|(_, p)| p)
    }

    fn warm_cache(&self, node: NodeId, file: FileId, location: Arc<wrench_core::FileLocation>, now: f64) {
        self.caches.lock().entry(node).or_insert_with(|| Cache::with_max_lifetime(self.cache_max_lifetime_secs)).add(file, location, now);
    }
}

fn secs(value: f64) -> Duration {
    Duration::from_secs_f64(value.max(0.0))
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
