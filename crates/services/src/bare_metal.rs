// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`BareMetalComputeService`]: admits [`CompoundJob`]s, places their ready
//! actions on hosts via [`crate::action_scheduler`], and dispatches each onto
//! its own killable actor via [`crate::action_executor`] (spec §4.3).
//!
//! Follows an `Arc<Mutex<MaterializedState>>` bookkeeping
//! pattern (`crates/daemon/src/engine/executor.rs`): job and resource state
//! live behind a single lock mutated by short synchronous critical sections,
//! while the actual work — one tokio task per in-flight action — runs
//! outside the lock and reports back through a reaper task.

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;
use wrench_config::properties::{PropertyMap, RE_READY_ACTION_AFTER_ACTION_EXECUTOR_CRASH, TERMINATE_WHENEVER_ALL_RESOURCES_ARE_DOWN};
use wrench_core::{Action, ActionId, ActionState, CompoundJob, FailureCause, FileId, HostId, JobId, LocationTable, StorageServiceId};
use wrench_engine::{Clock, DiskCatalog, HostCatalog, HostState, MailboxHub};
use wrench_storage::StorageService;
use wrench_wire::{CompoundJobAck, CompoundJobDone, CompoundJobFailed, Message};

use crate::action_executor::{self, ActionOutcome, ExecutorContext};
use crate::action_scheduler;
use crate::detectors::{HostStateWatcher, ServiceHealth};

/// Identifies one compute service instance among possibly several in a
/// platform, for logging and for `FailureCause::NotEnoughResources`'s
/// `compute_service` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComputeServiceId(Uuid);

impl ComputeServiceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ComputeServiceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ComputeServiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct RunningAction {
    cancel: CancellationToken,
    host: HostId,
    cores: u32,
    ram: f64,
}

#[derive(Default)]
struct SchedulerState {
    jobs: HashMap<JobId, Arc<Mutex<CompoundJob>>>,
    answer_mailboxes: HashMap<JobId, String>,
    service_args: HashMap<JobId, HashMap<String, String>>,
    ram_available: HashMap<HostId, f64>,
    running_threads: HashMap<HostId, u32>,
    running: HashMap<ActionId, RunningAction>,
    /// Hosts the [`HostStateWatcher`] last reported as `Down`, excluded from
    /// placement until they come back up (spec §2 supplement).
    down_hosts: HashSet<HostId>,
}

/// A bare-metal compute service: a fixed set of hosts plus the storage
/// services reachable from them, admitting and running one
/// [`CompoundJob`] at a time per ready action (spec §4.3, §5).
pub struct BareMetalComputeService<C: Clock> {
    pub id: ComputeServiceId,
    hosts: Vec<HostId>,
    host_catalog: Arc<HostCatalog>,
    disk_catalog: Arc<DiskCatalog>,
    services: Arc<HashMap<StorageServiceId, Arc<dyn StorageService>>>,
    scratch_service: StorageServiceId,
    locations: Arc<LocationTable>,
    mailboxes: Arc<MailboxHub>,
    clock: C,
    health: Arc<ServiceHealth>,
    file_registry: Arc<Mutex<HashMap<FileId, HashSet<(StorageServiceId, PathBuf)>>>>,
    properties: PropertyMap,
    state: Mutex<SchedulerState>,
}

impl<C: Clock + 'static> BareMetalComputeService<C> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        hosts: Vec<HostId>,
        host_catalog: Arc<HostCatalog>,
        disk_catalog: Arc<DiskCatalog>,
        services: Arc<HashMap<StorageServiceId, Arc<dyn StorageService>>>,
        scratch_service: StorageServiceId,
        locations: Arc<LocationTable>,
        mailboxes: Arc<MailboxHub>,
        clock: C,
        health: Arc<ServiceHealth>,
        properties: PropertyMap,
    ) -> Arc<Self> {
        let mut ram_available = HashMap::new();
        for host in &hosts {
            ram_available.insert(*host, host_catalog.ram(*host).unwrap_or(0.0));
        }
        let service = Arc::new(Self {
            id: ComputeServiceId::new(),
            hosts,
            host_catalog,
            disk_catalog,
            services,
            scratch_service,
            locations,
            mailboxes,
            clock,
            health,
            file_registry: Arc::new(Mutex::new(HashMap::new())),
            properties,
            state: Mutex::new(SchedulerState { ram_available, ..Default::default() }),
        });
        service.spawn_host_watcher();
        service
    }

    /// Track host up/down transitions from the shared [`HostCatalog`]
    /// (spec §2 supplement): a down host is excluded from future placement,
    /// and once every host is down the whole service terminates its
    /// still-pending work if `TERMINATE_WHENEVER_ALL_RESOURCES_ARE_DOWN` is
    /// set.
    fn spawn_host_watcher(self: &Arc<Self>) {
        let mut watcher = HostStateWatcher::new(&self.host_catalog);
        let service = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                let (host, state) = watcher.next().await;
                service.on_host_state_changed(host, state);
            }
        });
    }

    fn on_host_state_changed(self: &Arc<Self>, host: HostId, state: HostState) {
        let all_down = {
            let mut guard = self.state.lock();
            match state {
                HostState::Down => {
                    guard.down_hosts.insert(host);
                }
                HostState::Up => {
                    guard.down_hosts.remove(&host);
                }
            }
            !self.hosts.is_empty() && self.hosts.iter().all(|h| guard.down_hosts.contains(h))
        };
        if all_down && self.properties.as_bool(TERMINATE_WHENEVER_ALL_RESOURCES_ARE_DOWN, false).unwrap_or(false) {
            self.terminate_all_jobs_due_to_resource_exhaustion();
        }
    }

    /// Fail every still-pending job once no host remains to run it (spec §6
    /// `TERMINATE_WHENEVER_ALL_RESOURCES_ARE_DOWN`): in-flight actions are
    /// killed through the normal `terminate_job` path, and actions that
    /// never got to run are failed directly since no host can ever admit
    /// them now.
    fn terminate_all_jobs_due_to_resource_exhaustion(self: &Arc<Self>) {
        let job_ids: Vec<JobId> = self.state.lock().jobs.keys().copied().collect();
        for job_id in job_ids {
            let Some(job_arc) = self.state.lock().jobs.get(&job_id).cloned() else { continue };
            if job_arc.lock().is_done() {
                continue;
            }
            let pending: Vec<ActionId> = {
                let job = job_arc.lock();
                job.actions().filter(|a| matches!(a.state(), ActionState::NotReady | ActionState::Ready)).map(|a| a.id()).collect()
            };
            for action_id in pending {
                job_arc.lock().mark_action_failed(action_id, FailureCause::FatalFailure { message: "all compute hosts are down".into() });
            }
            self.terminate_job(job_id);
            self.finish_if_done(job_id, &job_arc);
        }
    }

    pub fn hosts(&self) -> &[HostId] {
        &self.hosts
    }

    /// Admit `job` if every one of its actions could in principle be placed
    /// on some host (spec §4.3 admission check), then begin dispatching its
    /// ready actions. `answer_mailbox` receives the terminal
    /// `CompoundJobDone`/`CompoundJobFailed` message.
    pub fn submit_compound_job(
        self: &Arc<Self>,
        job: CompoundJob,
        answer_mailbox: impl Into<String>,
        service_specific_args: HashMap<String, String>,
    ) -> CompoundJobAck {
        let job_id = job.id();
        for record in job.actions() {
            if !action_scheduler::host_exists_for(record.action(), &self.hosts, &self.host_catalog) {
                return CompoundJobAck::NotEnoughResources;
            }
        }
        {
            let mut state = self.state.lock();
            state.jobs.insert(job_id, Arc::new(Mutex::new(job)));
            state.answer_mailboxes.insert(job_id, answer_mailbox.into());
            state.service_args.insert(job_id, service_specific_args);
        }
        self.dispatch(job_id);
        CompoundJobAck::Admitted
    }

    /// Kill a single in-flight action (spec §4.3 `TerminateAction`): cancels
    /// its executor and lets the reaper task record the resulting
    /// `JobKilled` cause and release its reserved resources.
    pub fn terminate_action(&self, action: ActionId) {
        let state = self.state.lock();
        if let Some(running) = state.running.get(&action) {
            running.cancel.cancel();
        }
    }

    /// Kill every in-flight action belonging to `job` (spec §4.3
    /// `TerminateJob`).
    pub fn terminate_job(&self, job: JobId) {
        let job_arc = { self.state.lock().jobs.get(&job).cloned() };
        let Some(job_arc) = job_arc else { return };
        let action_ids: Vec<ActionId> = job_arc.lock().actions().map(|a| a.id()).collect();
        for action in action_ids {
            self.terminate_action(action);
        }
    }

    /// Place and spawn every currently-ready, not-yet-running action of
    /// `job_id` for which a host is available; actions with no eligible host
    /// right now simply wait for the next `dispatch` pass triggered by some
    /// other action's completion.
    fn dispatch(self: &Arc<Self>, job_id: JobId) {
        let Some(job_arc) = self.state.lock().jobs.get(&job_id).cloned() else { return };
        let ready: Vec<ActionId> = job_arc.lock().get_ready_actions();

        for action_id in ready {
            let (action, hint) = {
                let state = self.state.lock();
                if state.running.contains_key(&action_id) {
                    continue;
                }
                let job = job_arc.lock();
                let Some(record) = job.get_action(action_id) else { continue };
                let hint = state.service_args.get(&job_id).and_then(|m| wrench_config::service_args::placement_hint(m, action_id)).map(str::to_string);
                (record.action().clone(), hint)
            };

            let placement = {
                let state = self.state.lock();
                let available: Vec<HostId> = self.hosts.iter().filter(|h| !state.down_hosts.contains(h)).copied().collect();
                action_scheduler::select_host(&action, &available, &self.host_catalog, &state.ram_available, &state.running_threads, hint.as_deref())
            };
            let Some((host, cores)) = placement else { continue };

            {
                let mut state = self.state.lock();
                *state.ram_available.entry(host).or_insert(0.0) -= action.ram();
                *state.running_threads.entry(host).or_insert(0) += cores;
            }
            {
                let mut job = job_arc.lock();
                job.assign_action_host(action_id, host);
                job.mark_action_running(action_id);
            }

            let ctx = ExecutorContext {
                clock: self.clock.clone(),
                host_catalog: self.host_catalog.clone(),
                disk_catalog: self.disk_catalog.clone(),
                services: self.services.clone(),
                locations: self.locations.clone(),
                scratch_service: self.scratch_service,
                file_registry: self.file_registry.clone(),
                health: self.health.clone(),
            };
            let ram = action.ram();
            let (cancel, join) = action_executor::spawn_action_executor(job_id, action_id, action, host, cores, ctx);
            self.state.lock().running.insert(action_id, RunningAction { cancel, host, cores, ram });

            let service = Arc::clone(self);
            tokio::spawn(async move {
                match join.await {
                    Ok(outcome) => service.on_action_finished(job_id, outcome),
                    Err(_join_error) => service.on_action_crashed(job_id, action_id),
                }
            });
        }
    }

    fn release(&self, action: ActionId) -> Option<RunningAction> {
        let mut state = self.state.lock();
        let running = state.running.remove(&action)?;
        *state.ram_available.entry(running.host).or_insert(0.0) += running.ram;
        if let Some(threads) = state.running_threads.get_mut(&running.host) {
            *threads = threads.saturating_sub(running.cores);
        }
        Some(running)
    }

    fn on_action_finished(self: &Arc<Self>, job_id: JobId, outcome: ActionOutcome) {
        self.release(outcome.action);
        let Some(job_arc) = self.state.lock().jobs.get(&job_id).cloned() else { return };
        match outcome.result {
            Ok(services_used) => {
                {
                    let mut job = job_arc.lock();
                    for service in services_used {
                        job.note_action_storage_service(outcome.action, service);
                    }
                    job.mark_action_completed(outcome.action);
                }
                self.finish_if_done(job_id, &job_arc);
            }
            Err(cause) => {
                job_arc.lock().mark_action_failed(outcome.action, cause);
                self.finish_if_done(job_id, &job_arc);
            }
        }
        self.dispatch(job_id);
    }

    /// An action executor's task panicked. If `RE_READY_ACTION_AFTER_ACTION_EXECUTOR_CRASH`
    /// is set, the action gets another chance by going back to `Ready`
    /// rather than failing its whole job (spec §6 scheduler properties).
    fn on_action_crashed(self: &Arc<Self>, job_id: JobId, action: ActionId) {
        self.release(action);
        let re_ready = self.properties.as_bool(RE_READY_ACTION_AFTER_ACTION_EXECUTOR_CRASH, false).unwrap_or(false);
        if let Some(job_arc) = self.state.lock().jobs.get(&job_id).cloned() {
            if re_ready {
                job_arc.lock().requeue_action(action);
            } else {
                job_arc.lock().mark_action_failed(action, FailureCause::ComputeThreadHasDied);
                self.finish_if_done(job_id, &job_arc);
            }
        }
        self.dispatch(job_id);
    }

    fn finish_if_done(&self, job_id: JobId, job_arc: &Arc<Mutex<CompoundJob>>) {
        let (done, failed, cause) = {
            let job = job_arc.lock();
            if !job.is_done() {
                return;
            }
            let failed = job.state() == wrench_core::JobState::Failed;
            let cause = job
                .actions()
                .filter(|a| a.state() == wrench_core::ActionState::Failed)
                .find_map(|a| a.failure_cause().cloned())
                .or_else(|| job.actions().find_map(|a| a.failure_cause().cloned()))
                .unwrap_or(FailureCause::FatalFailure { message: "job failed with no recorded cause".into() });
            (!failed, failed, cause)
        };
        let mailbox = { self.state.lock().answer_mailboxes.get(&job_id).cloned() };
        let Some(mailbox) = mailbox else { return };
        let message: Message = if done {
            Message::CompoundJobDone(CompoundJobDone { job: job_id })
        } else if failed {
            Message::CompoundJobFailed(CompoundJobFailed { job: job_id, cause })
        } else {
            return;
        };
        self.mailboxes.dput(&mailbox, Arc::new(message));
    }
}

#[cfg(test)]
#[path = "bare_metal_tests.rs"]
mod tests;
