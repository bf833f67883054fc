// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for the S1-S6 example scenarios: a one-host
//! [`BareMetalComputeService`] and a five-level XRootD tree, both built with
//! a [`FakeClock`] so a scenario's reported timings are exact rather than
//! subject to scheduler jitter.

use std::collections::HashMap as StdHashMap;
use std::sync::Arc;
use wrench_core::{FileRegistry, HostId, LocationTable, NodeId, StorageServiceId};
use wrench_engine::{DiskCatalog, FakeClock, HostCatalog, MailboxHub};
use wrench_services::{BareMetalComputeService, ExecutionController, ServiceHealth};
use wrench_storage::{SimpleStorageService, StorageService};
use wrench_xrootd::deployment::XRootDDeployment;

/// A single-host platform with one compute host and a matching scratch
/// storage service, wired into a fresh [`ExecutionController`].
pub struct ComputeFixture {
    pub clock: FakeClock,
    pub host: HostId,
    pub service: Arc<BareMetalComputeService<FakeClock>>,
    pub controller: ExecutionController<FakeClock>,
}

pub fn single_host(cores: u32, ram: f64, flop_rate: f64) -> ComputeFixture {
    let clock = FakeClock::new();
    let host = HostId::new();
    let mut hosts = HostCatalog::new();
    hosts.register_host(host, cores, ram, flop_rate);
    let mut disks = DiskCatalog::new();
    disks.register_disk(host, 1.0e9, 1.0e9);

    let storage: Arc<SimpleStorageService> = Arc::new(SimpleStorageService::new(1_000_000_000));
    let scratch = storage.id();
    let mut services: StdHashMap<StorageServiceId, Arc<dyn StorageService>> = StdHashMap::new();
    services.insert(scratch, storage);

    let mailboxes = Arc::new(MailboxHub::new());
    let controller = ExecutionController::new(mailboxes.clone(), clock.clone());
    let service = BareMetalComputeService::new(
        vec![host],
        Arc::new(hosts),
        Arc::new(disks),
        Arc::new(services),
        scratch,
        Arc::new(LocationTable::new()),
        mailboxes,
        clock.clone(),
        Arc::new(ServiceHealth::new()),
        wrench_config::properties::PropertyMap::scheduler(),
    );

    ComputeFixture { clock, host, service, controller }
}

/// A five-node chain `root -> a -> b -> c -> leaf`, with `leaf` holding a
/// backing [`SimpleStorageService`], used by the XRootD-only scenarios
/// (S3-S5) that don't need a compute service at all.
pub struct XRootDFixture {
    pub deployment: XRootDDeployment,
    pub root: NodeId,
    pub leaf: NodeId,
    pub registry: FileRegistry,
}

pub fn chain_of_five() -> XRootDFixture {
    let mut deployment = XRootDDeployment::new();
    let root = deployment.create_supervisor();
    let a = deployment.create_supervisor();
    let b = deployment.create_supervisor();
    let c = deployment.create_supervisor();
    let leaf = deployment.create_storage_server(Arc::new(SimpleStorageService::new(1_000_000_000)));
    deployment.attach_child(root, a);
    deployment.attach_child(a, b);
    deployment.attach_child(b, c);
    deployment.attach_child(c, leaf);

    XRootDFixture { deployment, root, leaf, registry: FileRegistry::new() }
}
