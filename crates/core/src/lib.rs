// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Data model and job/action graph for WRENCH-style workflow execution
//! simulators: files and their storage-addressable locations, workflow DAGs
//! of tasks, and the jobs (compound, standard, pilot) that carry actions
//! through a compute service.
//!
//! This crate has no knowledge of simulated time, mailboxes, or actors — see
//! `wrench-engine` for the substrate that schedules the types defined here.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

#[macro_use]
mod macros;

pub mod action;
pub mod data_file;
pub mod failure;
pub mod file_location;
pub mod ids;
pub mod job;
pub mod owner;
pub mod workflow;

pub use action::{Action, ActionRecord, ActionState};
pub use data_file::{DataFile, FileRegistry};
pub use failure::FailureCause;
pub use file_location::{FileLocation, FileLocationSpec, LocationTable};
pub use ids::{ActionId, FileId, HostId, JobId, NodeId, StorageServiceId, TaskId, WorkflowId};
pub use job::{CompoundJob, JobError, JobState, PilotJob, PilotJobState, StandardJob};
pub use owner::OriginatorMailbox;
pub use workflow::{ParallelModel, TaskState, Workflow, WorkflowError, WorkflowTask};
