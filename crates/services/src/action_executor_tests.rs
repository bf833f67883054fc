use super::*;
use std::path::PathBuf;
use wrench_core::{FileLocationSpec, FileRegistry};
use wrench_storage::SimpleStorageService;

fn context() -> (ExecutorContext<wrench_engine::FakeClock>, HostId) {
    let host = HostId::new();
    let mut hosts = HostCatalog::new();
    hosts.register_host(host, 4, 1024.0, 1.0e9);
    let mut disks = DiskCatalog::new();
    disks.register_disk(host, 1.0e9, 1.0e9);
    let storage = Arc::new(SimpleStorageService::new(1_000_000));
    let mut services: HashMap<StorageServiceId, Arc<dyn StorageService>> = HashMap::new();
    let service_id = storage.id();
    services.insert(service_id, storage);
    let ctx = ExecutorContext {
        clock: wrench_engine::FakeClock::new(),
        host_catalog: Arc::new(hosts),
        disk_catalog: Arc::new(disks),
        services: Arc::new(services),
        locations: Arc::new(LocationTable::new()),
        scratch_service: service_id,
        file_registry: Arc::new(Mutex::new(HashMap::new())),
        health: Arc::new(crate::detectors::ServiceHealth::new()),
    };
    (ctx, host)
}

#[tokio::test]
async fn sleep_action_completes_successfully() {
    let (ctx, host) = context();
    let job = JobId::new();
    let action = Action::Sleep { duration_secs: 5.0 };
    let (_cancel, join) = spawn_action_executor(job, ActionId::new(), action, host, 1, ctx);
    let outcome = join.await.unwrap();
    assert!(outcome.result.is_ok());
}

#[tokio::test]
async fn compute_action_fails_on_unknown_host() {
    let (ctx, _host) = context();
    let job = JobId::new();
    let unknown = HostId::new();
    let action = Action::Compute { flops: 1.0, min_cores: 1, max_cores: 1, ram: 0.0 };
    let (_cancel, join) = spawn_action_executor(job, ActionId::new(), action, unknown, 1, ctx);
    let outcome = join.await.unwrap();
    assert!(matches!(outcome.result, Err(FailureCause::HostError { .. })));
}

#[tokio::test]
async fn file_write_then_read_round_trips_through_a_storage_service() {
    let (ctx, host) = context();
    let registry = FileRegistry::new();
    let file = registry.add_file("f", 1_024);
    let service_id = ctx.scratch_service;
    let location = FileLocationSpec::Scratch { path: PathBuf::from("/data/f"), file: file.clone() };

    let job = JobId::new();
    let write = Action::FileWrite { file: file.id(), location: location.clone() };
    let (_cancel, join) = spawn_action_executor(job, ActionId::new(), write, host, 1, ctx.clone());
    let outcome = join.await.unwrap();
    assert_eq!(outcome.result.unwrap(), vec![service_id]);

    let read = Action::FileRead { file: file.id(), location, num_bytes_to_read: None };
    let (_cancel, join) = spawn_action_executor(job, ActionId::new(), read, host, 1, ctx);
    let outcome = join.await.unwrap();
    assert_eq!(outcome.result.unwrap(), vec![service_id]);
}

#[tokio::test]
async fn file_read_without_a_prior_write_fails_with_file_not_found() {
    let (ctx, host) = context();
    let registry = FileRegistry::new();
    let file = registry.add_file("missing", 16);
    let location = FileLocationSpec::Scratch { path: PathBuf::from("/data/missing"), file: file.clone() };

    let job = JobId::new();
    let read = Action::FileRead { file: file.id(), location, num_bytes_to_read: None };
    let (_cancel, join) = spawn_action_executor(job, ActionId::new(), read, host, 1, ctx);
    let outcome = join.await.unwrap();
    assert!(matches!(outcome.result, Err(FailureCause::FileNotFound { .. })));
}

#[tokio::test]
async fn a_write_against_a_service_marked_down_fails_with_service_is_down() {
    let (ctx, host) = context();
    ctx.health.mark_down(ctx.scratch_service);
    let registry = FileRegistry::new();
    let file = registry.add_file("f", 16);
    let location = FileLocationSpec::Scratch { path: PathBuf::from("/data/f"), file: file.clone() };

    let job = JobId::new();
    let write = Action::FileWrite { file: file.id(), location };
    let (_cancel, join) = spawn_action_executor(job, ActionId::new(), write, host, 1, ctx);
    let outcome = join.await.unwrap();
    assert!(matches!(outcome.result, Err(FailureCause::ServiceIsDown { .. })));
}

#[tokio::test]
async fn cancelling_the_token_before_completion_resolves_with_job_killed() {
    let (ctx, host) = context();
    let job = JobId::new();
    let action = Action::Sleep { duration_secs: 3600.0 };
    let (cancel, join) = spawn_action_executor(job, ActionId::new(), action, host, 1, ctx);
    cancel.cancel();
    let outcome = join.await.unwrap();
    assert!(matches!(outcome.result, Err(FailureCause::JobKilled { job: j }) if j == job));
}
