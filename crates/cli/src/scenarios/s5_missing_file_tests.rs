use super::*;

#[tokio::test]
async fn an_unregistered_file_is_reported_not_found() {
    let report = run().await;
    assert_eq!(report.outcome, ScenarioOutcome::Passed, "{:?}", report.outcome);
}
