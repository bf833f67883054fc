//! End-to-end specs for the six example scenarios, run through the
//! `wrench-sim` binary rather than by calling scenario functions directly.

use crate::prelude::*;

#[test]
fn s1_linear_chain_passes() {
    cli().args(&["run", "s1"]).passes().stdout_has("[PASS] s1_linear_chain");
}

#[test]
fn s2_contention_passes() {
    cli().args(&["run", "s2"]).passes().stdout_has("[PASS] s2_contention");
}

#[test]
fn s3_xrootd_cached_passes() {
    cli().args(&["run", "s3"]).passes().stdout_has("[PASS] s3_xrootd_cached");
}

#[test]
fn s4_cache_expiry_passes() {
    cli().args(&["run", "s4"]).passes().stdout_has("[PASS] s4_cache_expiry");
}

#[test]
fn s5_missing_file_passes() {
    cli().args(&["run", "s5"]).passes().stdout_has("[PASS] s5_missing_file");
}

#[test]
fn s6_kill_passes() {
    cli().args(&["run", "s6"]).passes().stdout_has("[PASS] s6_kill");
}

#[test]
fn running_all_scenarios_reports_a_clean_summary() {
    cli().args(&["run"]).passes().stdout_has("6/6 scenarios passed");
}

#[test]
fn an_unknown_scenario_name_is_rejected() {
    cli().args(&["run", "s7"]).fails();
}

#[test]
fn json_format_emits_a_parseable_document() {
    cli().args(&["run", "s1", "--format", "json"]).passes().stdout_has("\"passed\": true");
}
