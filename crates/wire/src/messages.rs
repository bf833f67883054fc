// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The message catalog exchanged between `JobManager`, compute services,
//! storage services, and the XRootD overlay. No wire protocol crosses a
//! real process boundary here; messages are typed in-process values.
//!
//! `Serialize`/`Deserialize` are kept on every variant even though nothing
//! here crosses a socket, purely so a running simulation can be logged or
//! snapshotted.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use wrench_core::{ActionId, FailureCause, HostId, JobId, NodeId};

/// Ask a compute service to admit and run a compound job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitCompoundJobRequest {
    pub job: JobId,
    pub answer_mailbox: String,
    /// `action_name -> "host:num_cores"` placement hints and composite-service
    /// routing keys (spec §6: recognized keys are validated by
    /// `wrench-config::service_args`, not here).
    pub service_specific_args: HashMap<String, String>,
}

/// Admission response for a just-submitted job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CompoundJobAck {
    Admitted,
    NotEnoughResources,
}

/// A compound job finished with every action completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundJobDone {
    pub job: JobId,
}

/// A compound job finished with at least one action failed or killed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundJobFailed {
    pub job: JobId,
    pub cause: FailureCause,
}

/// An action-executor thread finished its action successfully.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionExecutorDone {
    pub job: JobId,
    pub action: ActionId,
    pub host: HostId,
}

/// An action-executor thread finished its action with a failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionExecutorFailed {
    pub job: JobId,
    pub action: ActionId,
    pub host: HostId,
    pub cause: FailureCause,
}

/// An action-executor thread died unexpectedly (spec §7 `ComputeThreadHasDied`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionExecutorCrash {
    pub job: JobId,
    pub action: ActionId,
    pub host: HostId,
}

/// Request to kill a single in-flight action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminateAction {
    pub job: JobId,
    pub action: ActionId,
}

/// Request to kill an entire job and everything downstream of its
/// in-flight actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminateJob {
    pub job: JobId,
}

/// XRootD overlay: forward a file search one hop further down the tree
/// (spec §4.5 steps 1-6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContinueSearch {
    pub file: wrench_core::FileId,
    pub originator: NodeId,
    pub answer_mailbox: String,
    pub search_id: u64,
}

/// XRootD overlay: propagate a newly discovered file location back up the
/// tree so ancestor caches can be warmed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCache {
    pub file: wrench_core::FileId,
    pub node: NodeId,
    pub discovered_at: f64,
}

/// A cache entry's TTL elapsed; the owning node should evict it lazily on
/// next lookup (spec §9: "cache invalidation stays coarse: entries expire
/// on next lookup past their TTL, not via a scheduled sweep").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceTtlExpired {
    pub node: NodeId,
    pub file: wrench_core::FileId,
}

/// The tagged union of every message exchanged in-process between actors,
/// used by logging/snapshotting call sites that want one type to match on
/// rather than threading generics through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Message {
    SubmitCompoundJobRequest(SubmitCompoundJobRequest),
    CompoundJobAck(CompoundJobAck),
    CompoundJobDone(CompoundJobDone),
    CompoundJobFailed(CompoundJobFailed),
    ActionExecutorDone(ActionExecutorDone),
    ActionExecutorFailed(ActionExecutorFailed),
    ActionExecutorCrash(ActionExecutorCrash),
    TerminateAction(TerminateAction),
    TerminateJob(TerminateJob),
    ContinueSearch(ContinueSearch),
    UpdateCache(UpdateCache),
    ServiceTtlExpired(ServiceTtlExpired),
}

impl Message {
    /// A short machine-readable tag, used the same way `Action::kind` is
    /// used in logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::SubmitCompoundJobRequest(_) => "submit_compound_job_request",
            Message::CompoundJobAck(_) => "compound_job_ack",
            Message::CompoundJobDone(_) => "compound_job_done",
            Message::CompoundJobFailed(_) => "compound_job_failed",
            Message::ActionExecutorDone(_) => "action_executor_done",
            Message::ActionExecutorFailed(_) => "action_executor_failed",
            Message::ActionExecutorCrash(_) => "action_executor_crash",
            Message::TerminateAction(_) => "terminate_action",
            Message::TerminateJob(_) => "terminate_job",
            Message::ContinueSearch(_) => "continue_search",
            Message::UpdateCache(_) => "update_cache",
            Message::ServiceTtlExpired(_) => "service_ttl_expired",
        }
    }
}

#[cfg(test)]
#[path = "messages_tests.rs"]
mod tests;
