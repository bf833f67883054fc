// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rendering a batch of [`ScenarioReport`]s as either a human-readable
//! narrative or a single JSON document, selected by `wrench-sim`'s
//! `--format` flag.

use serde_json::json;

use crate::scenarios::{ScenarioOutcome, ScenarioReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn render(format: OutputFormat, reports: &[ScenarioReport]) -> String {
    match format {
        OutputFormat::Text => render_text(reports),
        OutputFormat::Json => render_json(reports),
    }
}

fn render_text(reports: &[ScenarioReport]) -> String {
    let mut out = String::new();
    for report in reports {
        let status = if report.outcome.is_passed() { "PASS" } else { "FAIL" };
        out.push_str(&format!("[{status}] {}\n", report.name));
        for event in &report.events {
            out.push_str(&format!("    {event}\n"));
        }
        if let ScenarioOutcome::Failed(reason) = &report.outcome {
            out.push_str(&format!("    reason: {reason}\n"));
        }
    }
    let passed = reports.iter().filter(|r| r.outcome.is_passed()).count();
    out.push_str(&format!("{passed}/{} scenarios passed\n", reports.len()));
    out
}

fn render_json(reports: &[ScenarioReport]) -> String {
    let scenarios: Vec<_> = reports
        .iter()
        .map(|report| {
            let (passed, reason) = match &report.outcome {
                ScenarioOutcome::Passed => (true, None),
                ScenarioOutcome::Failed(reason) => (false, Some(reason.clone())),
            };
            json!({
                "name": report.name,
                "passed": passed,
                "reason": reason,
                "events": report.events,
            })
        })
        .collect();
    serde_json::to_string_pretty(&json!({ "scenarios": scenarios })).unwrap_or_default()
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
