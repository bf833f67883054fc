// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! S3: a file registered on a leaf four hops from the root is found by a
//! broadcast search the first time (`hops > 0`, duration charging the
//! broadcast and per-hop message overheads), then answered straight from
//! the root's own cache on a second lookup at the same point in simulated
//! time (`hops == 0`, duration equal to exactly one cache-lookup overhead).

use wrench_config::properties::PropertyMap;
use wrench_xrootd::search::XRootDOverlay;

use super::common::chain_of_five;
use super::{ScenarioOutcome, ScenarioReport};

const CACHE_LOOKUP_OVERHEAD_SECS: f64 = 0.01;
const MESSAGE_OVERHEAD_SECS: f64 = 0.005;
const SEARCH_BROADCAST_OVERHEAD_SECS: f64 = 0.02;
const UPDATE_CACHE_OVERHEAD_SECS: f64 = 0.001;

pub async fn run() -> ScenarioReport {
    let mut report = ScenarioReport::new("s3_xrootd_cached");
    let fixture = chain_of_five();
    let file = fixture.registry.add_file("dataset.root", 1_024);
    fixture.deployment.register_file_location(file.clone(), fixture.leaf, "/data/dataset.root");

    let mut properties = PropertyMap::storage_service();
    properties.set(wrench_config::properties::CACHE_LOOKUP_OVERHEAD, CACHE_LOOKUP_OVERHEAD_SECS.to_string()).unwrap();
    properties.set(wrench_config::properties::MESSAGE_OVERHEAD, MESSAGE_OVERHEAD_SECS.to_string()).unwrap();
    properties.set(wrench_config::properties::SEARCH_BROADCAST_OVERHEAD, SEARCH_BROADCAST_OVERHEAD_SECS.to_string()).unwrap();
    properties.set(wrench_config::properties::UPDATE_CACHE_OVERHEAD, UPDATE_CACHE_OVERHEAD_SECS.to_string()).unwrap();

    let overlay = XRootDOverlay::from_properties(fixture.deployment, &properties);
    let first = overlay.find_file(fixture.root, file.id(), 0.0);
    if first.location.is_none() {
        report.outcome = ScenarioOutcome::Failed("file should have been found by the broadcast search".to_string());
        return report;
    }
    if first.hops == 0 {
        report.outcome = ScenarioOutcome::Failed("first lookup should not be a cache hit".to_string());
        return report;
    }
    // every node on the winning path gets exactly one ContinueSearch hop and
    // one UpdateCache warm, so both are charged `first.hops` times.
    let expected_first = std::time::Duration::from_secs_f64(
        CACHE_LOOKUP_OVERHEAD_SECS + SEARCH_BROADCAST_OVERHEAD_SECS + first.hops as f64 * (MESSAGE_OVERHEAD_SECS + UPDATE_CACHE_OVERHEAD_SECS),
    );
    if first.duration != expected_first {
        report.outcome = ScenarioOutcome::Failed(format!("first lookup duration {:?} should equal the charged broadcast overheads {:?}", first.duration, expected_first));
        return report;
    }
    report.log(format!("first lookup resolved in {} hops, {:?}", first.hops, first.duration));

    let second = overlay.find_file(fixture.root, file.id(), 1.0);
    if second.hops != 0 {
        report.outcome = ScenarioOutcome::Failed(format!("second lookup should hit the warmed cache, got {} hops", second.hops));
        return report;
    }
    let expected_second = std::time::Duration::from_secs_f64(CACHE_LOOKUP_OVERHEAD_SECS);
    if second.duration != expected_second {
        report.outcome = ScenarioOutcome::Failed(format!("second lookup duration {:?} should equal exactly one cache-lookup overhead {:?}", second.duration, expected_second));
        return report;
    }
    report.log(format!("second lookup answered from cache with zero hops in {:?}", second.duration));

    report.outcome = ScenarioOutcome::Passed;
    report
}

#[cfg(test)]
#[path = "s3_xrootd_cached_tests.rs"]
mod tests;
