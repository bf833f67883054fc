use super::*;
use std::collections::HashMap as StdHashMap;
use wrench_core::{Action, HostId, LocationTable, OriginatorMailbox, StorageServiceId};
use wrench_engine::{DiskCatalog, FakeClock, HostCatalog};
use wrench_storage::{SimpleStorageService, StorageService};

fn service_with_one_host() -> Arc<BareMetalComputeService<FakeClock>> {
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
    BareMetalComputeService::new(
        vec![host],
        Arc::new(catalog),
        Arc::new(disks),
        Arc::new(services),
        service_id,
        Arc::new(LocationTable::new()),
        mailboxes,
        FakeClock::new(),
        Arc::new(crate::detectors::ServiceHealth::new()),
        wrench_config::properties::PropertyMap::scheduler(),
    )
}

#[tokio::test]
async fn a_controller_observes_the_completion_of_a_job_it_submitted() {
    let mailboxes = Arc::new(MailboxHub::new());
    let controller = ExecutionController::new(mailboxes, FakeClock::new());
    let service = service_with_one_host();

    let mut job = CompoundJob::new(OriginatorMailbox::new(controller.mailbox()));
    job.add_action(Action::Sleep { duration_secs: 1.0 });
    let job_id = job.id();

    controller.submit_compound_job(&service, job, StdHashMap::new()).unwrap();
    let event = controller.wait_for_next_execution_event(5.0).await.unwrap();
    assert!(matches!(event, ExecutionEvent::CompoundJobCompleted { job } if job == job_id));
}

#[tokio::test]
async fn waiting_with_no_pending_event_times_out() {
    let mailboxes = Arc::new(MailboxHub::new());
    let controller = ExecutionController::new(mailboxes, FakeClock::new());
    let result = controller.wait_for_next_execution_event(0.001).await;
    assert_eq!(result.unwrap_err(), RecvError::Timeout);
}
