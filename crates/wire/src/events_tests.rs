use super::*;

#[yare::parameterized(
    completed = { ExecutionEvent::CompoundJobCompleted { job: JobId::new() }, false },
    failed = { ExecutionEvent::CompoundJobFailed { job: JobId::new(), cause: FailureCause::ComputeThreadHasDied }, true },
    file_copy_failed = { ExecutionEvent::FileCopyFailed { file: FileId::new(), cause: FailureCause::ComputeThreadHasDied }, true },
    timer = { ExecutionEvent::Timer { tag: "t".into() }, false },
)]
fn is_failure_matches_variant(event: ExecutionEvent, expected: bool) {
    assert_eq!(event.is_failure(), expected);
}

#[test]
fn job_extracts_the_carried_job_id_when_present() {
    let job = JobId::new();
    let event = ExecutionEvent::StandardJobCompleted { job };
    assert_eq!(event.job(), Some(job));
}

#[test]
fn file_copy_events_carry_no_job_id() {
    let event = ExecutionEvent::FileCopyCompleted { file: FileId::new() };
    assert_eq!(event.job(), None);
}
