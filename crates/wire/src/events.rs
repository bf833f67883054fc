// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ExecutionEvent`: the catalog an `ExecutionController` observes via
//! `wait_for_next_execution_event` (spec §4.6).

use serde::{Deserialize, Serialize};
use wrench_core::{FailureCause, FileId, JobId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExecutionEvent {
    StandardJobCompleted { job: JobId },
    StandardJobFailed { job: JobId, cause: FailureCause },
    CompoundJobCompleted { job: JobId },
    CompoundJobFailed { job: JobId, cause: FailureCause },
    PilotJobStarted { job: JobId },
    PilotJobExpired { job: JobId },
    FileCopyCompleted { file: FileId },
    FileCopyFailed { file: FileId, cause: FailureCause },
    Timer { tag: String },
}

impl ExecutionEvent {
    pub fn job(&self) -> Option<JobId> {
        match self {
            ExecutionEvent::StandardJobCompleted { job }
            | ExecutionEvent::StandardJobFailed { job, .. }
            | ExecutionEvent::CompoundJobCompleted { job }
            | ExecutionEvent::CompoundJobFailed { job, .. }
            | ExecutionEvent::PilotJobStarted { job }
            | ExecutionEvent::PilotJobExpired { job } => Some(*job),
            ExecutionEvent::FileCopyCompleted { .. } | ExecutionEvent::FileCopyFailed { .. } | ExecutionEvent::Timer { .. } => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ExecutionEvent::StandardJobFailed { .. } | ExecutionEvent::CompoundJobFailed { .. } | ExecutionEvent::FileCopyFailed { .. })
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
