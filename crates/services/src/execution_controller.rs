// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`ExecutionController`]: the workflow-management-system-facing facade
//! that owns one mailbox, submits jobs through a [`JobManager`], and blocks
//! on `wait_for_next_execution_event` the way spec §4.6 describes ("the
//! execution controller's main loop is exactly: submit work, then repeatedly
//! wait for the next event").

use std::collections::HashMap;
use std::sync::Arc;
use wrench_core::{CompoundJob, FailureCause, JobId};
use wrench_engine::{Clock, MailboxHub, RecvError};
use wrench_wire::ExecutionEvent;

use crate::bare_metal::BareMetalComputeService;
use crate::job_manager::JobManager;

pub struct ExecutionController<C: Clock> {
    mailbox: String,
    mailboxes: Arc<MailboxHub>,
    clock: C,
    job_manager: JobManager<C>,
}

impl<C: Clock + 'static> ExecutionController<C> {
    pub fn new(mailboxes: Arc<MailboxHub>, clock: C) -> Self {
        let mailbox = mailboxes.create_unique("wms");
        let job_manager = JobManager::new(mailboxes.clone(), clock.clone());
        Self { mailbox, mailboxes, clock, job_manager }
    }

    /// The mailbox name this controller owns. Every [`CompoundJob`] it
    /// submits must have been constructed with this name as its originator
    /// for `wait_for_next_execution_event` to observe the job's outcome.
    pub fn mailbox(&self) -> &str {
        &self.mailbox
    }

    pub fn submit_compound_job(
        &self,
        service: &Arc<BareMetalComputeService<C>>,
        job: CompoundJob,
        service_specific_args: HashMap<String, String>,
    ) -> Result<JobId, FailureCause> {
        self.job_manager.submit(service, job, service_specific_args)
    }

    /// Block until the next [`ExecutionEvent`] addressed to this controller
    /// arrives, or `timeout_secs` of simulated time elapses first.
    pub async fn wait_for_next_execution_event(&self, timeout_secs: f64) -> Result<ExecutionEvent, RecvError> {
        let envelope = self.mailboxes.get(&self.mailbox, &self.clock, timeout_secs).await?;
        envelope.downcast_ref::<ExecutionEvent>().cloned().ok_or(RecvError::Closed)
    }
}

#[cfg(test)]
#[path = "execution_controller_tests.rs"]
mod tests;
