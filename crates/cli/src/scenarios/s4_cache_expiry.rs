// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! S4: the same cached lookup as S3, but the second query lands after the
//! cache entry's configured lifetime has elapsed, so it must fall back to a
//! fresh broadcast (`hops > 0` again) instead of reusing the stale entry.

use wrench_xrootd::search::XRootDOverlay;

use super::common::chain_of_five;
use super::{ScenarioOutcome, ScenarioReport};

const SHORT_CACHE_LIFETIME_SECS: f64 = 10.0;

pub async fn run() -> ScenarioReport {
    let mut report = ScenarioReport::new("s4_cache_expiry");
    let fixture = chain_of_five();
    let file = fixture.registry.add_file("dataset.root", 1_024);
    fixture.deployment.register_file_location(file.clone(), fixture.leaf, "/data/dataset.root");

    let overlay = XRootDOverlay::with_properties(fixture.deployment, false, SHORT_CACHE_LIFETIME_SECS);
    let first = overlay.find_file(fixture.root, file.id(), 0.0);
    if first.hops == 0 {
        report.outcome = ScenarioOutcome::Failed("first lookup should not be a cache hit".to_string());
        return report;
    }
    report.log(format!("first lookup resolved in {} hops", first.hops));

    let past_expiry = SHORT_CACHE_LIFETIME_SECS + 1.0;
    let second = overlay.find_file(fixture.root, file.id(), past_expiry);
    if second.hops == 0 {
        report.outcome = ScenarioOutcome::Failed("lookup past the configured cache lifetime reused a stale entry".to_string());
        return report;
    }
    report.log(format!("lookup at t={past_expiry} re-broadcast after expiry, {} hops", second.hops));

    report.outcome = ScenarioOutcome::Passed;
    report
}

#[cfg(test)]
#[path = "s4_cache_expiry_tests.rs"]
mod tests;
