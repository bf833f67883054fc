// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`JobManager`]: the factory/submission surface client code talks to
//! (spec §6 "External interfaces" — `createCompoundJob`/`createStandardJob`/
//! `createPilotJob`/`submitJob`/`terminateJob`). Submitted jobs whose
//! `parent_jobs` aren't all complete yet sit on a pending queue rather than
//! going straight to a compute service (spec §4.1 job readiness); a
//! background loop drains submit/terminate/wakeup/shutdown control messages
//! and retries the queue every time some job completes.

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::mpsc;
use wrench_core::{CompoundJob, FailureCause, JobId, OriginatorMailbox, PilotJob, StandardJob};
use wrench_engine::{Clock, MailboxHub};
use wrench_wire::{CompoundJobAck, CompoundJobDone, CompoundJobFailed, ExecutionEvent, Message};

use crate::bare_metal::BareMetalComputeService;

/// Effectively-unbounded wait for a job's terminal event: jobs are expected
/// to finish well within a simulation's lifetime, but the listener must not
/// hold a `Duration` that overflows (spec §9 determinism — no wall-clock
/// jitter, but also no silent panics from an oversized timeout).
const FOREVER_SECS: f64 = 1.0e12;

/// A job that has been handed to [`JobManager::submit`] but not yet passed
/// to its compute service, either because it's still queued behind a
/// `Control::Submit` or because its `parent_jobs` aren't all `Completed`.
struct PendingJob<C: Clock> {
    job: CompoundJob,
    service: Arc<BareMetalComputeService<C>>,
    service_specific_args: HashMap<String, String>,
}

/// Messages drained by the job manager's background loop (spec §6).
enum Control<C: Clock> {
    Submit(PendingJob<C>),
    Terminate(JobId),
    Wakeup,
    Shutdown,
}

struct JobManagerState<C: Clock> {
    pending: HashMap<JobId, PendingJob<C>>,
    dispatched: HashMap<JobId, Arc<BareMetalComputeService<C>>>,
    completed: HashSet<JobId>,
}

pub struct JobManager<C: Clock> {
    mailboxes: Arc<MailboxHub>,
    clock: C,
    state: Arc<Mutex<JobManagerState<C>>>,
    control: mpsc::UnboundedSender<Control<C>>,
}

impl<C: Clock + 'static> JobManager<C> {
    pub fn new(mailboxes: Arc<MailboxHub>, clock: C) -> Self {
        let state = Arc::new(Mutex::new(JobManagerState { pending: HashMap::new(), dispatched: HashMap::new(), completed: HashSet::new() }));
        let (control, rx) = mpsc::unbounded_channel();
        spawn_control_loop(rx, state.clone(), mailboxes.clone(), clock.clone(), control.clone());
        Self { mailboxes, clock, state, control }
    }

    /// Build a fresh, unsubmitted compound job (spec §6 `createCompoundJob`);
    /// the caller populates its action DAG, then submits it with
    /// [`JobManager::submit`].
    pub fn create_compound_job(&self, originator: impl Into<OriginatorMailbox>) -> CompoundJob {
        CompoundJob::new(originator)
    }

    /// Build a `StandardJob` façade (spec §6 `createStandardJob`), lowered
    /// into an equivalent `CompoundJob` by [`StandardJob::lower`] once
    /// submitted.
    pub fn create_standard_job(&self, flops: f64, min_cores: u32, max_cores: u32, ram: f64) -> StandardJob {
        StandardJob::new(flops, min_cores, max_cores, ram)
    }

    /// Build a pilot job lease (spec §6 `createPilotJob`). Nothing in this
    /// core models a separate pilot-scheduling service, so the lease starts
    /// immediately against `hosts`.
    pub fn create_pilot_job(&self, originator: impl Into<OriginatorMailbox>, num_hosts: u32, cores_per_host: u32, ram_per_host: f64, duration_secs: f64, hosts: Vec<wrench_core::HostId>) -> PilotJob {
        let mut pilot = PilotJob::new(originator, num_hosts, cores_per_host, ram_per_host, duration_secs);
        pilot.start(hosts);
        pilot
    }

    /// Submit `job` to `service`: dispatched immediately if every job in its
    /// `parent_jobs` set has already completed, otherwise queued until they
    /// do (spec §4.1, §6 `submitJob`). The job's `originator` mailbox
    /// receives a `CompoundJobCompleted`/`CompoundJobFailed` [`ExecutionEvent`]
    /// once it finishes, whenever that ends up happening.
    pub fn submit(&self, service: &Arc<BareMetalComputeService<C>>, job: CompoundJob, service_specific_args: HashMap<String, String>) -> Result<JobId, FailureCause> {
        wrench_config::service_args::validate(&service.id.to_string(), &service_specific_args)?;

        let job_id = job.id();
        let ready = {
            let state = self.state.lock();
            job.parent_jobs().all(|p| state.completed.contains(&p))
        };
        let pending = PendingJob { job, service: service.clone(), service_specific_args };

        if ready {
            self.dispatch_now(pending)
        } else {
            let _ = self.control.send(Control::Submit(pending));
            Ok(job_id)
        }
    }

    /// Kill `job`: drops it from the pending queue if it hasn't been
    /// dispatched yet, or forwards to its compute service's
    /// `terminate_job` if it has (spec §6 `terminateJob`).
    pub fn terminate_job(&self, job: JobId) {
        let _ = self.control.send(Control::Terminate(job));
    }

    /// Fail every job still on the pending queue with
    /// `FailureCause::JobManagerTerminated` and stop draining further
    /// control messages (spec §6: a terminated job manager admits nothing
    /// more).
    pub fn shutdown(&self) {
        let _ = self.control.send(Control::Shutdown);
    }

    fn dispatch_now(&self, pending: PendingJob<C>) -> Result<JobId, FailureCause> {
        let PendingJob { job, service, service_specific_args } = pending;
        let job_id = job.id();
        let originator = job.originator().as_str().to_string();
        let answer = self.mailboxes.create_unique("job_answer");

        let ack = service.submit_compound_job(job, answer.clone(), service_specific_args);
        if matches!(ack, CompoundJobAck::NotEnoughResources) {
            self.mailboxes.remove(&answer);
            return Err(FailureCause::NotEnoughResources { job: job_id, compute_service: service.id.to_string() });
        }

        self.state.lock().dispatched.insert(job_id, service);
        spawn_completion_listener(job_id, answer, originator, self.mailboxes.clone(), self.clock.clone(), self.state.clone(), self.control.clone());
        Ok(job_id)
    }
}

/// Background task draining [`Control`] messages: admits queued jobs whose
/// parents just completed, terminates pending or dispatched jobs, and runs
/// the shutdown sweep.
fn spawn_control_loop<C: Clock + 'static>(
    mut rx: mpsc::UnboundedReceiver<Control<C>>,
    state: Arc<Mutex<JobManagerState<C>>>,
    mailboxes: Arc<MailboxHub>,
    clock: C,
    control: mpsc::UnboundedSender<Control<C>>,
) {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match msg {
                Control::Submit(pending) => {
                    let ready = pending.job.parent_jobs().all(|p| state.lock().completed.contains(&p));
                    if ready {
                        dispatch_pending(pending, &mailboxes, &clock, &state, &control);
                    } else {
                        let job_id = pending.job.id();
                        state.lock().pending.insert(job_id, pending);
                    }
                }
                Control::Terminate(job_id) => {
                    let removed = state.lock().pending.remove(&job_id);
                    if let Some(pending) = removed {
                        let event = ExecutionEvent::CompoundJobFailed { job: job_id, cause: FailureCause::JobKilled { job: job_id } };
                        mailboxes.dput(pending.job.originator().as_str(), Arc::new(event));
                        continue;
                    }
                    let service = state.lock().dispatched.get(&job_id).cloned();
                    if let Some(service) = service {
                        service.terminate_job(job_id);
                    }
                }
                Control::Wakeup => {
                    let ready: Vec<JobId> = {
                        let state = state.lock();
                        state.pending.iter().filter(|(_, p)| p.job.parent_jobs().all(|parent| state.completed.contains(&parent))).map(|(id, _)| *id).collect()
                    };
                    for job_id in ready {
                        if let Some(pending) = state.lock().pending.remove(&job_id) {
                            dispatch_pending(pending, &mailboxes, &clock, &state, &control);
                        }
                    }
                }
                Control::Shutdown => {
                    let pendings: Vec<(JobId, PendingJob<C>)> = state.lock().pending.drain().collect();
                    for (job_id, pending) in pendings {
                        let event = ExecutionEvent::CompoundJobFailed { job: job_id, cause: FailureCause::JobManagerTerminated { job: job_id } };
                        mailboxes.dput(pending.job.originator().as_str(), Arc::new(event));
                    }
                    break;
                }
            }
        }
    });
}

/// Hand `pending` to its compute service. A `NotEnoughResources` admission
/// failure is reported asynchronously to the originator, since a job taking
/// this path already returned `Ok` from [`JobManager::submit`] while it sat
/// on the pending queue.
fn dispatch_pending<C: Clock + 'static>(pending: PendingJob<C>, mailboxes: &Arc<MailboxHub>, clock: &C, state: &Arc<Mutex<JobManagerState<C>>>, control: &mpsc::UnboundedSender<Control<C>>) {
    let PendingJob { job, service, service_specific_args } = pending;
    let job_id = job.id();
    let originator = job.originator().as_str().to_string();
    let answer = mailboxes.create_unique("job_answer");

    let ack = service.submit_compound_job(job, answer.clone(), service_specific_args);
    if matches!(ack, CompoundJobAck::NotEnoughResources) {
        mailboxes.remove(&answer);
        let event = ExecutionEvent::CompoundJobFailed { job: job_id, cause: FailureCause::NotEnoughResources { job: job_id, compute_service: service.id.to_string() } };
        mailboxes.dput(&originator, Arc::new(event));
        return;
    }

    state.lock().dispatched.insert(job_id, service);
    spawn_completion_listener(job_id, answer, originator, mailboxes.clone(), clock.clone(), state.clone(), control.clone());
}

/// Wait for `job_id`'s terminal message, forward it to `originator` as an
/// [`ExecutionEvent`], then record completion and nudge the control loop so
/// any job waiting on `job_id` as a parent gets re-evaluated.
fn spawn_completion_listener<C: Clock + 'static>(
    job_id: JobId,
    answer: String,
    originator: String,
    mailboxes: Arc<MailboxHub>,
    clock: C,
    state: Arc<Mutex<JobManagerState<C>>>,
    control: mpsc::UnboundedSender<Control<C>>,
) {
    tokio::spawn(async move {
        if let Ok(envelope) = mailboxes.get(&answer, &clock, FOREVER_SECS).await {
            if let Some(event) = translate(envelope.downcast_ref::<Message>()) {
                mailboxes.dput(&originator, Arc::new(event));
            }
        }
        mailboxes.remove(&answer);
        {
            let mut state = state.lock();
            state.dispatched.remove(&job_id);
            state.completed.insert(job_id);
        }
        let _ = control.send(Control::Wakeup);
    });
}

fn translate(message: Option<&Message>) -> Option<ExecutionEvent> {
    match message? {
        Message::CompoundJobDone(CompoundJobDone { job }) => Some(ExecutionEvent::CompoundJobCompleted { job: *job }),
        Message::CompoundJobFailed(CompoundJobFailed { job, cause }) => Some(ExecutionEvent::CompoundJobFailed { job: *job, cause: cause.clone() }),
        _ => None,
    }
}

#[cfg(test)]
#[path = "job_manager_tests.rs"]
mod tests;
