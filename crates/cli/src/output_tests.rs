use super::*;
use crate::scenarios::ScenarioReport;

fn passed(name: &'static str) -> ScenarioReport {
    let mut report = ScenarioReport::new(name);
    report.log("did the thing");
    report.outcome = ScenarioOutcome::Passed;
    report
}

fn failed(name: &'static str) -> ScenarioReport {
    let mut report = ScenarioReport::new(name);
    report.outcome = ScenarioOutcome::Failed("went wrong".to_string());
    report
}

#[test]
fn text_output_reports_each_scenario_and_a_summary_line() {
    let rendered = render(OutputFormat::Text, &[passed("s1"), failed("s2")]);
    assert!(rendered.contains("[PASS] s1"));
    assert!(rendered.contains("[FAIL] s2"));
    assert!(rendered.contains("reason: went wrong"));
    assert!(rendered.contains("1/2 scenarios passed"));
}

#[test]
fn json_output_is_parseable_and_preserves_pass_fail() {
    let rendered = render(OutputFormat::Json, &[passed("s1"), failed("s2")]);
    let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    let scenarios = value["scenarios"].as_array().unwrap();
    assert_eq!(scenarios.len(), 2);
    assert_eq!(scenarios[0]["passed"], true);
    assert_eq!(scenarios[1]["passed"], false);
    assert_eq!(scenarios[1]["reason"], "went wrong");
}
