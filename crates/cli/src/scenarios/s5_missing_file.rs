// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! S5: searching for a file that was never registered anywhere in the
//! deployment must exhaust the broadcast and report `None`, not panic or
//! loop forever (spec §4.5's termination guarantee for an unanswerable
//! search).

use wrench_core::FileId;
use wrench_xrootd::search::XRootDOverlay;

use super::common::chain_of_five;
use super::{ScenarioOutcome, ScenarioReport};

pub async fn run() -> ScenarioReport {
    let mut report = ScenarioReport::new("s5_missing_file");
    let fixture = chain_of_five();

    let overlay = XRootDOverlay::new(fixture.deployment);
    let outcome = overlay.find_file(fixture.root, FileId::new(), 0.0);

    if outcome.location.is_some() {
        report.outcome = ScenarioOutcome::Failed("search reported a location for a file that was never registered".to_string());
        return report;
    }
    report.log(format!("search terminated after {} hops with no match", outcome.hops));

    report.outcome = ScenarioOutcome::Passed;
    report
}

#[cfg(test)]
#[path = "s5_missing_file_tests.rs"]
mod tests;
