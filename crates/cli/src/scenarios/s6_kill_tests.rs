use super::*;

#[tokio::test]
async fn killing_a_job_before_it_completes_reports_job_killed() {
    let report = run().await;
    assert_eq!(report.outcome, ScenarioOutcome::Passed, "{:?}", report.outcome);
}
