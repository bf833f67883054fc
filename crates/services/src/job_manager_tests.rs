use super::*;
use std::collections::HashMap as StdHashMap;
use wrench_core::{Action, HostId, LocationTable, OriginatorMailbox, StorageServiceId};
use wrench_engine::{DiskCatalog, FakeClock, HostCatalog};
use wrench_storage::{SimpleStorageService, StorageService};

fn service_and_hub() -> (Arc<BareMetalComputeService<FakeClock>>, Arc<MailboxHub>) {
    let host = HostId::new();
    let mut catalog = HostCatalog::new();
    catalog.register_host(host, 2, 100.0, 1.0e9);
    let mut disks = DiskCatalog::new();
    disks.register_disk(host, 1.0e9, 1.0e9);
    let storage = Arc::new(SimpleStorageService::new(1_000_000));
    let mut services: StdHashMap<StorageServiceId, Arc<dyn StorageService>> = StdHashMap::new();
    let service_id = storage.id();
    services.insert(service_id, storage);
    let mailboxes = Arc::new(MailboxHub::new());
    let service = BareMetalComputeService::new(
        vec![host],
        Arc::new(catalog),
        Arc::new(disks),
        Arc::new(services),
        service_id,
        Arc::new(LocationTable::new()),
        mailboxes.clone(),
        FakeClock::new(),
        Arc::new(crate::detectors::ServiceHealth::new()),
        wrench_config::properties::PropertyMap::scheduler(),
    );
    (service, mailboxes)
}

#[tokio::test]
async fn a_completed_job_is_reported_to_its_originator_as_an_execution_event() {
    let (service, mailboxes) = service_and_hub();
    let originator = mailboxes.create("wms");
    let manager = JobManager::new(mailboxes.clone(), FakeClock::new());

    let mut job = CompoundJob::new(OriginatorMailbox::new(originator.clone()));
    job.add_action(Action::Sleep { duration_secs: 1.0 });
    let job_id = job.id();

    let submitted = manager.submit(&service, job, StdHashMap::new()).unwrap();
    assert_eq!(submitted, job_id);

    let envelope = mailboxes.get(&originator, &FakeClock::new(), 5.0).await.unwrap();
    let event = envelope.downcast_ref::<ExecutionEvent>().unwrap();
    assert!(matches!(event, ExecutionEvent::CompoundJobCompleted { job } if *job == job_id));
}

#[tokio::test]
async fn an_unadmittable_job_returns_not_enough_resources_without_touching_the_mailbox() {
    let (service, mailboxes) = service_and_hub();
    let originator = mailboxes.create("wms");
    let manager = JobManager::new(mailboxes.clone(), FakeClock::new());

    let mut job = CompoundJob::new(OriginatorMailbox::new(originator));
    job.add_action(Action::Compute { flops: 1.0, min_cores: 16, max_cores: 16, ram: 10.0 });

    let result = manager.submit(&service, job, StdHashMap::new());
    assert!(matches!(result, Err(FailureCause::NotEnoughResources { .. })));
}

#[tokio::test]
async fn an_unrecognized_service_specific_argument_key_is_rejected_before_admission() {
    let (service, mailboxes) = service_and_hub();
    let originator = mailboxes.create("wms");
    let manager = JobManager::new(mailboxes.clone(), FakeClock::new());

    let mut job = CompoundJob::new(OriginatorMailbox::new(originator));
    job.add_action(Action::Sleep { duration_secs: 1.0 });

    let mut args = StdHashMap::new();
    args.insert("bogus_key".to_string(), "1".to_string());
    let result = manager.submit(&service, job, args);
    assert!(matches!(result, Err(FailureCause::NotAllowed { .. })));
}

#[tokio::test]
async fn a_job_with_an_incomplete_parent_stays_pending_until_the_parent_completes() {
    let (service, mailboxes) = service_and_hub();
    let originator = mailboxes.create("wms");
    let manager = JobManager::new(mailboxes.clone(), FakeClock::new());

    let mut parent = CompoundJob::new(OriginatorMailbox::new(originator.clone()));
    parent.add_action(Action::Sleep { duration_secs: 1.0 });
    let parent_id = parent.id();

    let mut child = CompoundJob::new(OriginatorMailbox::new(originator.clone()));
    child.add_action(Action::Sleep { duration_secs: 1.0 });
    child.add_parent_job(parent_id).unwrap();
    let child_id = child.id();

    manager.submit(&service, child, StdHashMap::new()).unwrap();
    manager.submit(&service, parent, StdHashMap::new()).unwrap();

    let first = mailboxes.get(&originator, &FakeClock::new(), 5.0).await.unwrap();
    assert!(matches!(first.downcast_ref::<ExecutionEvent>().unwrap(), ExecutionEvent::CompoundJobCompleted { job } if *job == parent_id));

    let second = mailboxes.get(&originator, &FakeClock::new(), 5.0).await.unwrap();
    assert!(matches!(second.downcast_ref::<ExecutionEvent>().unwrap(), ExecutionEvent::CompoundJobCompleted { job } if *job == child_id));
}

#[tokio::test]
async fn terminating_a_still_pending_job_fails_it_without_touching_its_compute_service() {
    let (service, mailboxes) = service_and_hub();
    let originator = mailboxes.create("wms");
    let manager = JobManager::new(mailboxes.clone(), FakeClock::new());

    let mut parent = CompoundJob::new(OriginatorMailbox::new(originator.clone()));
    parent.add_action(Action::Sleep { duration_secs: 1.0 });
    let parent_id = parent.id();

    let mut child = CompoundJob::new(OriginatorMailbox::new(originator.clone()));
    child.add_action(Action::Sleep { duration_secs: 1.0 });
    child.add_parent_job(parent_id).unwrap();
    let child_id = child.id();

    manager.submit(&service, child, StdHashMap::new()).unwrap();
    manager.terminate_job(child_id);

    let envelope = mailboxes.get(&originator, &FakeClock::new(), 5.0).await.unwrap();
    let event = envelope.downcast_ref::<ExecutionEvent>().unwrap();
    assert!(matches!(event, ExecutionEvent::CompoundJobFailed { job, cause: FailureCause::JobKilled { .. } } if *job == child_id));
}

#[tokio::test]
async fn shutdown_fails_every_still_pending_job_with_job_manager_terminated() {
    let (service, mailboxes) = service_and_hub();
    let originator = mailboxes.create("wms");
    let manager = JobManager::new(mailboxes.clone(), FakeClock::new());

    let mut parent = CompoundJob::new(OriginatorMailbox::new(originator.clone()));
    parent.add_action(Action::Sleep { duration_secs: 1.0 });
    let parent_id = parent.id();

    let mut child = CompoundJob::new(OriginatorMailbox::new(originator.clone()));
    child.add_action(Action::Sleep { duration_secs: 1.0 });
    child.add_parent_job(parent_id).unwrap();
    let child_id = child.id();

    manager.submit(&service, child, StdHashMap::new()).unwrap();
    manager.shutdown();

    let envelope = mailboxes.get(&originator, &FakeClock::new(), 5.0).await.unwrap();
    let event = envelope.downcast_ref::<ExecutionEvent>().unwrap();
    assert!(matches!(event, ExecutionEvent::CompoundJobFailed { job, cause: FailureCause::JobManagerTerminated { .. } } if *job == child_id));
}

#[test]
fn create_compound_job_returns_a_fresh_unsubmitted_job() {
    let mailboxes = Arc::new(MailboxHub::new());
    let manager = JobManager::new(mailboxes, FakeClock::new());
    let job = manager.create_compound_job("wms");
    assert_eq!(job.state(), wrench_core::JobState::NotSubmitted);
}

#[test]
fn create_pilot_job_starts_immediately_against_the_given_hosts() {
    let mailboxes = Arc::new(MailboxHub::new());
    let manager = JobManager::new(mailboxes, FakeClock::new());
    let host = HostId::new();
    let pilot = manager.create_pilot_job("wms", 1, 2, 100.0, 60.0, vec![host]);
    assert_eq!(pilot.state(), wrench_core::PilotJobState::Running);
}
