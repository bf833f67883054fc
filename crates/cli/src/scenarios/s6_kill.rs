// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! S6: a job with a long `Sleep` action is submitted and then killed via
//! `terminate_job` before the sleep could ever complete, proving the kill
//! path reports `FailureCause::JobKilled` through the same
//! `CompoundJobFailed` event a natural failure would use, not a separate
//! channel.

use std::collections::HashMap;
use wrench_core::{Action, CompoundJob, FailureCause, OriginatorMailbox};
use wrench_wire::ExecutionEvent;

use super::common::single_host;
use super::{ScenarioOutcome, ScenarioReport, EVENT_TIMEOUT_SECS};

pub async fn run() -> ScenarioReport {
    let fixture = single_host(1, 4.0e9, 1.0e9);
    let mut report = ScenarioReport::new("s6_kill");

    let mut job = CompoundJob::new(OriginatorMailbox::new(fixture.controller.mailbox()));
    job.add_action(Action::Sleep { duration_secs: 1.0e6 });

    let job_id = match fixture.controller.submit_compound_job(&fixture.service, job, HashMap::new()) {
        Ok(id) => id,
        Err(cause) => {
            report.outcome = ScenarioOutcome::Failed(format!("submission rejected: {cause}"));
            return report;
        }
    };

    // No `.await` happens between submission and this call, so on the
    // single-threaded runtime `wrench-sim` drives, the sleep action's
    // executor task has not yet been polled when it is cancelled.
    fixture.service.terminate_job(job_id);
    report.log(format!("terminate_job({job_id}) issued before the sleep could elapse"));

    match fixture.controller.wait_for_next_execution_event(EVENT_TIMEOUT_SECS).await {
        Ok(ExecutionEvent::CompoundJobFailed { job, cause: FailureCause::JobKilled { .. } }) if job == job_id => {
            report.log(format!("job {job} failed with JobKilled as expected"));
            report.outcome = ScenarioOutcome::Passed;
        }
        Ok(ExecutionEvent::CompoundJobFailed { job, cause }) => {
            report.outcome = ScenarioOutcome::Failed(format!("job {job} failed with an unexpected cause: {cause}"));
        }
        Ok(other) => {
            report.outcome = ScenarioOutcome::Failed(format!("unexpected event: {other:?}"));
        }
        Err(err) => {
            report.outcome = ScenarioOutcome::Failed(format!("timed out waiting for the kill to be observed: {err}"));
        }
    }
    report
}

#[cfg(test)]
#[path = "s6_kill_tests.rs"]
mod tests;
