// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`Action`]: the tagged-union unit of work inside a [`crate::job::CompoundJob`]
//! (spec §4).

use crate::failure::FailureCause;
use crate::file_location::FileLocationSpec;
use crate::ids::{ActionId, FileId, HostId, StorageServiceId};
use std::collections::HashSet;

/// Lifecycle state of an [`ActionRecord`], mirroring [`crate::workflow::TaskState`]
/// but tracked independently since actions live inside a job's DAG, not a
/// workflow's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionState {
    NotReady,
    Ready,
    Pending,
    Running,
    Completed,
    Failed,
    Killed,
}

crate::simple_display! {
    ActionState {
        NotReady => "not_ready",
        Ready => "ready",
        Pending => "pending",
        Running => "running",
        Completed => "completed",
        Failed => "failed",
        Killed => "killed",
    }
}

/// The ten action variants named in spec §4. Each carries only the payload
/// needed to execute it; resource requirements (`min_cores`, `ram`, ...) are
/// read off the variant by [`Action::min_cores`]/[`Action::ram`] where
/// applicable.
#[derive(Debug, Clone)]
pub enum Action {
    Compute { flops: f64, min_cores: u32, max_cores: u32, ram: f64 },
    FileRead { file: FileId, location: FileLocationSpec, num_bytes_to_read: Option<u64> },
    FileWrite { file: FileId, location: FileLocationSpec },
    FileCopy { file: FileId, src: FileLocationSpec, dst: FileLocationSpec },
    FileDelete { file: FileId, location: FileLocationSpec },
    FileRegistryAdd { file: FileId, location: FileLocationSpec },
    FileRegistryDelete { file: FileId, location: FileLocationSpec },
    Sleep { duration_secs: f64 },
    Custom { label: String },
    /// A fixed-rank MPI computation: `ranks` cores each carry out
    /// `flops_per_rank`, with no elasticity between `min_cores`/`max_cores`
    /// the way a plain `Compute` action has.
    Mpi { ranks: u32, flops_per_rank: f64 },
}

impl Action {
    /// Minimum worker threads the executor must reserve before running this
    /// action (spec §4: compute-like actions reserve a thread per core).
    pub fn min_cores(&self) -> u32 {
        match self {
            Action::Compute { min_cores, .. } => *min_cores,
            Action::Mpi { ranks, .. } => *ranks,
            _ => 1,
        }
    }

    pub fn max_cores(&self) -> u32 {
        match self {
            Action::Compute { max_cores, .. } => *max_cores,
            Action::Mpi { ranks, .. } => *ranks,
            _ => 1,
        }
    }

    pub fn ram(&self) -> f64 {
        match self {
            Action::Compute { ram, .. } => *ram,
            _ => 0.0,
        }
    }

    /// A short machine-readable tag used in logging and in
    /// `ActionExecutorDone`/`Failed` messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Compute { .. } => "compute",
            Action::FileRead { .. } => "file_read",
            Action::FileWrite { .. } => "file_write",
            Action::FileCopy { .. } => "file_copy",
            Action::FileDelete { .. } => "file_delete",
            Action::FileRegistryAdd { .. } => "file_registry_add",
            Action::FileRegistryDelete { .. } => "file_registry_delete",
            Action::Sleep { .. } => "sleep",
            Action::Custom { .. } => "custom",
            Action::Mpi { .. } => "mpi",
        }
    }
}

/// An [`Action`] plus its scheduling state inside a job's action DAG.
#[derive(Debug, Clone)]
pub struct ActionRecord {
    id: ActionId,
    action: Action,
    state: ActionState,
    failure_cause: Option<FailureCause>,
    assigned_host: Option<HostId>,
    used_storage_services: HashSet<StorageServiceId>,
}

impl ActionRecord {
    pub fn new(action: Action) -> Self {
        Self {
            id: ActionId::new(),
            action,
            state: ActionState::NotReady,
            failure_cause: None,
            assigned_host: None,
            used_storage_services: HashSet::new(),
        }
    }

    pub fn id(&self) -> ActionId {
        self.id
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    pub fn state(&self) -> ActionState {
        self.state
    }

    pub fn failure_cause(&self) -> Option<&FailureCause> {
        self.failure_cause.as_ref()
    }

    pub fn assigned_host(&self) -> Option<HostId> {
        self.assigned_host
    }

    pub(crate) fn set_state(&mut self, state: ActionState) {
        self.state = state;
    }

    pub(crate) fn set_failure_cause(&mut self, cause: FailureCause) {
        self.failure_cause = Some(cause);
    }

    pub(crate) fn assign_host(&mut self, host: HostId) {
        self.assigned_host = Some(host);
    }

    /// Mark a storage service as used by this action, for service-down
    /// detection (spec §7: an action depending on a service that goes down
    /// mid-execution fails with `ServiceIsDown`).
    pub(crate) fn note_storage_service_use(&mut self, service: StorageServiceId) {
        self.used_storage_services.insert(service);
    }

    pub fn used_storage_services(&self) -> impl Iterator<Item = StorageServiceId> + '_ {
        self.used_storage_services.iter().copied()
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
