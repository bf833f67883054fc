use super::*;
use wrench_core::{Action, FileLocationSpec, FileRegistry};
use wrench_engine::FakeClock;
use wrench_storage::SimpleStorageService;

fn service_with_one_host(cores: u32, ram: f64) -> (Arc<BareMetalComputeService<FakeClock>>, HostId, Arc<MailboxHub>) {
    let host = HostId::new();
    let mut catalog = HostCatalog::new();
    catalog.register_host(host, cores, ram, 1.0e9);
    let mut disks = DiskCatalog::new();
    disks.register_disk(host, 1.0e9, 1.0e9);
    let storage = Arc::new(SimpleStorageService::new(1_000_000));
    let mut services: HashMap<StorageServiceId, Arc<dyn StorageService>> = HashMap::new();
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
        Arc::new(ServiceHealth::new()),
        wrench_config::properties::PropertyMap::scheduler(),
    );
    (service, host, mailboxes)
}

#[tokio::test]
async fn a_job_exceeding_every_host_capacity_is_rejected_at_admission() {
    let (service, _host, _mailboxes) = service_with_one_host(1, 10.0);
    let mut job = CompoundJob::new("wms");
    job.add_action(Action::Compute { flops: 1.0, min_cores: 4, max_cores: 4, ram: 10.0 });
    let ack = service.submit_compound_job(job, "answer", HashMap::new());
    assert!(matches!(ack, CompoundJobAck::NotEnoughResources));
}

#[tokio::test]
async fn a_single_action_job_runs_to_completion_and_reports_done() {
    let (service, _host, mailboxes) = service_with_one_host(2, 100.0);
    let mailbox = mailboxes.create("answer");
    let mut job = CompoundJob::new("wms");
    job.add_action(Action::Sleep { duration_secs: 1.0 });
    let ack = service.submit_compound_job(job, mailbox.clone(), HashMap::new());
    assert!(matches!(ack, CompoundJobAck::Admitted));

    let message = mailboxes.get(&mailbox, &FakeClock::new(), 5.0).await.unwrap();
    let message = message.downcast_ref::<Message>().unwrap();
    assert!(matches!(message, Message::CompoundJobDone(_)));
}

#[tokio::test]
async fn a_failing_file_read_reports_compound_job_failed() {
    let (service, _host, mailboxes) = service_with_one_host(2, 100.0);
    let mailbox = mailboxes.create("answer");
    let registry = FileRegistry::new();
    let file = registry.add_file("missing", 16);
    let location = FileLocationSpec::Scratch { path: "/data/missing".into(), file: file.clone() };
    let mut job = CompoundJob::new("wms");
    job.add_action(Action::FileRead { file: file.id(), location, num_bytes_to_read: None });
    service.submit_compound_job(job, mailbox.clone(), HashMap::new());

    let message = mailboxes.get(&mailbox, &FakeClock::new(), 5.0).await.unwrap();
    let message = message.downcast_ref::<Message>().unwrap();
    assert!(matches!(message, Message::CompoundJobFailed(_)));
}

#[tokio::test]
async fn terminating_an_in_flight_action_fails_its_job_with_job_killed() {
    let (service, _host, mailboxes) = service_with_one_host(2, 100.0);
    let mailbox = mailboxes.create("answer");
    let mut job = CompoundJob::new("wms");
    let action = job.add_action(Action::Sleep { duration_secs: 3600.0 });
    let job_id = job.id();
    service.submit_compound_job(job, mailbox.clone(), HashMap::new());

    service.terminate_action(action);
    let message = mailboxes.get(&mailbox, &FakeClock::new(), 5.0).await.unwrap();
    let message = message.downcast_ref::<Message>().unwrap();
    match message {
        Message::CompoundJobFailed(CompoundJobFailed { job, cause }) => {
            assert_eq!(*job, job_id);
            assert!(matches!(cause, FailureCause::JobKilled { .. }));
        }
        other => panic!("expected CompoundJobFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn two_compute_actions_needing_all_cores_run_one_after_the_other() {
    let (service, _host, mailboxes) = service_with_one_host(1, 100.0);
    let mailbox = mailboxes.create("answer");
    let mut job = CompoundJob::new("wms");
    job.add_action(Action::Sleep { duration_secs: 1.0 });
    job.add_action(Action::Sleep { duration_secs: 1.0 });
    service.submit_compound_job(job, mailbox.clone(), HashMap::new());

    let message = mailboxes.get(&mailbox, &FakeClock::new(), 5.0).await.unwrap();
    let message = message.downcast_ref::<Message>().unwrap();
    assert!(matches!(message, Message::CompoundJobDone(_)));
}
