// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The six example scenarios `wrench-sim` can run, each a small, fully
//! deterministic simulation exercising one facet of the engine/services/
//! xrootd stack end to end.

pub mod common;
pub mod s1_linear_chain;
pub mod s2_contention;
pub mod s3_xrootd_cached;
pub mod s4_cache_expiry;
pub mod s5_missing_file;
pub mod s6_kill;

/// Generous upper bound on how long a scenario will wait for its next
/// event; every scenario here completes almost immediately under a
/// [`wrench_engine::FakeClock`], so this only guards against a genuine
/// deadlock in the dispatch loop rather than real simulated duration.
pub const EVENT_TIMEOUT_SECS: f64 = 3600.0;

#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioOutcome {
    Passed,
    Failed(String),
}

impl ScenarioOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, ScenarioOutcome::Passed)
    }
}

/// What a scenario reports back to `main`: a pass/fail outcome plus a log
/// of the notable events it observed along the way, for `--format json` or
/// plain-text rendering by [`crate::output`].
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub name: &'static str,
    pub outcome: ScenarioOutcome,
    pub events: Vec<String>,
}

impl ScenarioReport {
    pub fn new(name: &'static str) -> Self {
        Self { name, outcome: ScenarioOutcome::Failed("scenario did not run to completion".to_string()), events: Vec::new() }
    }

    pub fn log(&mut self, message: impl Into<String>) {
        self.events.push(message.into());
    }
}

pub const ALL: &[&str] = &["s1", "s2", "s3", "s4", "s5", "s6"];

pub async fn run_by_name(name: &str) -> Option<ScenarioReport> {
    match name {
        "s1" => Some(s1_linear_chain::run().await),
        "s2" => Some(s2_contention::run().await),
        "s3" => Some(s3_xrootd_cached::run().await),
        "s4" => Some(s4_cache_expiry::run().await),
        "s5" => Some(s5_missing_file::run().await),
        "s6" => Some(s6_kill::run().await),
        _ => None,
    }
}
