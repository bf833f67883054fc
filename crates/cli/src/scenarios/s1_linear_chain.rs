// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! S1: three single-`Compute`-action jobs submitted back to back on a
//! one-core host. Since the host has exactly one core, the second and
//! third jobs cannot be dispatched until the one before them frees its
//! core, so completions must be observed in submission order.

use std::collections::HashMap;
use wrench_core::{Action, CompoundJob, OriginatorMailbox};
use wrench_wire::ExecutionEvent;

use super::common::single_host;
use super::{ScenarioOutcome, ScenarioReport, EVENT_TIMEOUT_SECS};

const FLOP_RATE: f64 = 1.0e9;
const FLOPS_PER_TASK: f64 = 1.0e9;

pub async fn run() -> ScenarioReport {
    let fixture = single_host(1, 4.0e9, FLOP_RATE);
    let mut report = ScenarioReport::new("s1_linear_chain");

    let mut job_ids = Vec::new();
    for _ in 0..3 {
        let mut job = CompoundJob::new(OriginatorMailbox::new(fixture.controller.mailbox()));
        job.add_action(Action::Compute { flops: FLOPS_PER_TASK, min_cores: 1, max_cores: 1, ram: 0.0 });
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
                report.log(format!("job {job} completed at t={:.3}", fixture.clock.now()));
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
        report.outcome = ScenarioOutcome::Failed("completions arrived out of submission order on a one-core host".to_string());
    }
    report
}

#[cfg(test)]
#[path = "s1_linear_chain_tests.rs"]
mod tests;
