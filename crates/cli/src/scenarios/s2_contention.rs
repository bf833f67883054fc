// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! S2: two single-`Compute`-action jobs submitted to a two-core host, each
//! action requesting more RAM than half the host's total. Cores alone would
//! let both run side by side, but RAM accounting forces them to serialize:
//! the second job cannot be admitted onto the host until the first's RAM
//! is released, exercising `wrench-services`'s own resource bookkeeping
//! rather than core-count contention as in S1.

use std::collections::HashMap;
use wrench_core::{Action, CompoundJob, OriginatorMailbox};
use wrench_wire::ExecutionEvent;

use super::common::single_host;
use super::{ScenarioOutcome, ScenarioReport, EVENT_TIMEOUT_SECS};

const HOST_RAM: f64 = 4.0e9;
const JOB_RAM: f64 = 3.0e9;

pub async fn run() -> ScenarioReport {
    let fixture = single_host(2, HOST_RAM, 1.0e9);
    let mut report = ScenarioReport::new("s2_contention");

    let mut job_ids = Vec::new();
    for _ in 0..2 {
        let mut job = CompoundJob::new(OriginatorMailbox::new(fixture.controller.mailbox()));
        job.add_action(Action::Compute { flops: 1.0e9, min_cores: 1, max_cores: 1, ram: JOB_RAM });
        let job_id = match fixture.controller.submit_compound_job(&fixture.service, job, HashMap::new()) {
            Ok(id) => id,
            Err(cause) => {
                report.outcome = ScenarioOutcome::Failed(format!("submission rejected: {cause}"));
                return report;
            }
        };
        job_ids.push(job_id);
    }

    let mut completed_in_order = Vec::new();
    for _ in 0..job_ids.len() {
        match fixture.controller.wait_for_next_execution_event(EVENT_TIMEOUT_SECS).await {
            Ok(ExecutionEvent::CompoundJobCompleted { job }) => {
                completed_in_order.push(job);
                report.log(format!("job {job} completed"));
            }
            Ok(ExecutionEvent::CompoundJobFailed { job, cause }) => {
                report.outcome = ScenarioOutcome::Failed(format!("job {job} failed: {cause}"));
                return report;
            }
            Ok(other) => {
                report.outcome = ScenarioOutcome::Failed(format!("unexpected event: {other:?}"));
                return report;
            }
            Err(err) => {
                report.outcome = ScenarioOutcome::Failed(format!("timed out waiting for completion: {err}"));
                return report;
            }
        }
    }

    if completed_in_order == job_ids {
        report.outcome = ScenarioOutcome::Passed;
    } else {
        report.outcome = ScenarioOutcome::Failed("RAM-constrained jobs completed out of submission order".to_string());
    }
    report
}

#[cfg(test)]
#[path = "s2_contention_tests.rs"]
mod tests;
