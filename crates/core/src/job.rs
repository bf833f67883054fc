// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Jobs: [`CompoundJob`] (an action DAG plus a per-job state index),
//! [`StandardJob`] (the legacy façade, lowered into a `CompoundJob`), and
//! [`PilotJob`] (supplemented from the original source — spec §4 describes
//! only `CompoundJob`/`StandardJob`; pilot jobs are carried forward from
//! `wrench/job/PilotJob.h` since nothing in the distilled spec's Non-goals
//! excludes them).

use crate::action::{Action, ActionRecord, ActionState};
use crate::file_location::FileLocationSpec;
use crate::ids::{ActionId, FileId, HostId, JobId};
use crate::owner::OriginatorMailbox;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// State of a [`CompoundJob`] as a whole, distinct from its constituent
/// actions' states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    NotSubmitted,
    Pending,
    Running,
    Completed,
    Failed,
}

crate::simple_display! {
    JobState {
        NotSubmitted => "not_submitted",
        Pending => "pending",
        Running => "running",
        Completed => "completed",
        Failed => "failed",
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum JobError {
    #[error("action {0:?} not found in job")]
    ActionNotFound(ActionId),
    #[error("adding an edge {parent:?} -> {child:?} would close a cycle")]
    WouldCreateCycle { parent: ActionId, child: ActionId },
    #[error("adding job edge {parent:?} -> {child:?} would close a cycle")]
    WouldCreateJobCycle { parent: JobId, child: JobId },
}

/// An action DAG submitted as a unit, with a `state_index` tracking each
/// action's readiness the same way [`crate::workflow::Workflow`] tracks task
/// readiness (spec §4: "a `CompoundJob` carries its own action-state index,
/// independent of any workflow"), plus a coarser `parent_jobs`/`child_jobs`
/// DAG between whole jobs: a job only becomes dispatchable once every job in
/// its `parent_jobs` set has reached `JobState::Completed` (spec §4.1).
#[derive(Debug)]
pub struct CompoundJob {
    id: JobId,
    originator: OriginatorMailbox,
    state: JobState,
    actions: HashMap<ActionId, ActionRecord>,
    parents: HashMap<ActionId, HashSet<ActionId>>,
    children: HashMap<ActionId, HashSet<ActionId>>,
    state_index: HashMap<ActionState, HashSet<ActionId>>,
    parent_jobs: HashSet<JobId>,
    child_jobs: HashSet<JobId>,
    priority: i64,
}

impl CompoundJob {
    pub fn new(originator: impl Into<OriginatorMailbox>) -> Self {
        Self {
            id: JobId::new(),
            originator: originator.into(),
            state: JobState::NotSubmitted,
            actions: HashMap::new(),
            parents: HashMap::new(),
            children: HashMap::new(),
            state_index: HashMap::new(),
            parent_jobs: HashSet::new(),
            child_jobs: HashSet::new(),
            priority: 0,
        }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn originator(&self) -> &OriginatorMailbox {
        &self.originator
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn priority(&self) -> i64 {
        self.priority
    }

    pub fn set_priority(&mut self, priority: i64) {
        self.priority = priority;
    }

    /// Jobs that must reach `JobState::Completed` before this job is
    /// dispatchable (spec §4.1's inter-job DAG, distinct from the intra-job
    /// action DAG above).
    pub fn parent_jobs(&self) -> impl Iterator<Item = JobId> + '_ {
        self.parent_jobs.iter().copied()
    }

    pub fn child_jobs(&self) -> impl Iterator<Item = JobId> + '_ {
        self.child_jobs.iter().copied()
    }

    /// Record `parent` as a whole-job dependency of this job. Transitive
    /// cycle detection across jobs belongs to whatever holds the job
    /// registry (the `JobManager`); this only rejects a job naming itself.
    pub fn add_parent_job(&mut self, parent: JobId) -> Result<(), JobError> {
        if parent == self.id {
            return Err(JobError::WouldCreateJobCycle { parent, child: self.id });
        }
        self.parent_jobs.insert(parent);
        Ok(())
    }

    pub fn add_child_job(&mut self, child: JobId) -> Result<(), JobError> {
        if child == self.id {
            return Err(JobError::WouldCreateJobCycle { parent: self.id, child });
        }
        self.child_jobs.insert(child);
        Ok(())
    }

    pub fn add_action(&mut self, action: Action) -> ActionId {
        let record = ActionRecord::new(action);
        let id = record.id();
        let state = record.state();
        self.actions.insert(id, record);
        self.parents.entry(id).or_default();
        self.children.entry(id).or_default();
        self.state_index.entry(state).or_default().insert(id);
        self.recompute_readiness(id);
        id
    }

    pub fn get_action(&self, id: ActionId) -> Option<&ActionRecord> {
        self.actions.get(&id)
    }

    pub fn actions(&self) -> impl Iterator<Item = &ActionRecord> {
        self.actions.values()
    }

    /// Actions currently in `state`, read off the `state_index` in O(1)
    /// rather than scanning every action (spec §3's rollup-query
    /// requirement).
    pub fn actions_in_state(&self, state: ActionState) -> impl Iterator<Item = ActionId> + '_ {
        self.state_index.get(&state).into_iter().flatten().copied()
    }

    /// Remove `id` from the job's action DAG entirely, detaching it from its
    /// parents/children and re-evaluating the readiness of any children left
    /// behind (spec §4.1 `removeAction`).
    pub fn remove_action(&mut self, id: ActionId) -> Result<(), JobError> {
        let record = self.actions.remove(&id).ok_or(JobError::ActionNotFound(id))?;
        if let Some(set) = self.state_index.get_mut(&record.state()) {
            set.remove(&id);
        }
        if let Some(parents) = self.parents.remove(&id) {
            for p in parents {
                if let Some(c) = self.children.get_mut(&p) {
                    c.remove(&id);
                }
            }
        }
        let children = self.children.remove(&id).unwrap_or_default();
        for child in &children {
            if let Some(p) = self.parents.get_mut(child) {
                p.remove(&id);
            }
        }
        for child in children {
            self.recompute_readiness(child);
        }
        self.recompute_job_state();
        Ok(())
    }

    pub fn add_action_dependency(&mut self, parent: ActionId, child: ActionId) -> Result<(), JobError> {
        if !self.actions.contains_key(&parent) {
            return Err(JobError::ActionNotFound(parent));
        }
        if !self.actions.contains_key(&child) {
            return Err(JobError::ActionNotFound(child));
        }
        if parent == child || self.reaches(child, parent) {
            return Err(JobError::WouldCreateCycle { parent, child });
        }
        self.children.entry(parent).or_default().insert(child);
        self.parents.entry(child).or_default().insert(parent);
        self.recompute_readiness(child);
        Ok(())
    }

    /// Move `id` to `state` in both the record and the `state_index`,
    /// keeping the two in lockstep on every transition.
    fn set_action_state(&mut self, id: ActionId, state: ActionState) {
        let Some(action) = self.actions.get_mut(&id) else { return };
        let old = action.state();
        if old == state {
            return;
        }
        action.set_state(state);
        if let Some(set) = self.state_index.get_mut(&old) {
            set.remove(&id);
        }
        self.state_index.entry(state).or_default().insert(id);
    }

    fn reaches(&self, from: ActionId, to: ActionId) -> bool {
        let mut stack = vec![from];
        let mut seen = HashSet::new();
        while let Some(cur) = stack.pop() {
            if cur == to {
                return true;
            }
            if !seen.insert(cur) {
                continue;
            }
            if let Some(children) = self.children.get(&cur) {
                stack.extend(children.iter().copied());
            }
        }
        false
    }

    fn recompute_readiness(&mut self, id: ActionId) {
        let all_parents_done = self
            .parents
            .get(&id)
            .map(|ps| ps.iter().all(|p| self.actions.get(p).map(|a| a.state() == ActionState::Completed).unwrap_or(false)))
            .unwrap_or(true);
        if let Some(action) = self.actions.get(&id) {
            if action.state() == ActionState::NotReady || action.state() == ActionState::Ready {
                self.set_action_state(id, if all_parents_done { ActionState::Ready } else { ActionState::NotReady });
            }
        }
    }

    pub fn get_ready_actions(&self) -> Vec<ActionId> {
        self.actions_in_state(ActionState::Ready).collect()
    }

    pub fn mark_action_running(&mut self, id: ActionId) {
        self.set_action_state(id, ActionState::Running);
        self.state = JobState::Running;
    }

    /// Return a `Running` action to `Ready` for redispatch elsewhere, used
    /// when its executor crashes and `RE_READY_ACTION_AFTER_ACTION_EXECUTOR_CRASH`
    /// is set (spec §6 scheduler properties) rather than failing its job.
    pub fn requeue_action(&mut self, id: ActionId) {
        if self.actions.get(&id).map(|a| a.state()) == Some(ActionState::Running) {
            self.set_action_state(id, ActionState::Ready);
        }
    }

    /// Record which host a dispatched action was placed on (spec §4.3:
    /// "record `action -> (host, cores)`").
    pub fn assign_action_host(&mut self, id: ActionId, host: HostId) {
        if let Some(a) = self.actions.get_mut(&id) {
            a.assign_host(host);
        }
    }

    /// Record that `id` used `service` while executing, for service-down
    /// detection (spec §7).
    pub fn note_action_storage_service(&mut self, id: ActionId, service: crate::ids::StorageServiceId) {
        if let Some(a) = self.actions.get_mut(&id) {
            a.note_storage_service_use(service);
        }
    }

    /// Kill `id` directly (spec §4.3 `TerminateAction`): the scheduler
    /// calls this after stopping the executor, recording `JobKilled` rather
    /// than propagating a natural failure.
    pub fn kill_action(&mut self, id: ActionId, cause: crate::failure::FailureCause) {
        if let Some(a) = self.actions.get(&id) {
            if !matches!(a.state(), ActionState::Completed | ActionState::Failed) {
                self.set_action_state(id, ActionState::Killed);
                self.actions.get_mut(&id).unwrap().set_failure_cause(cause);
            }
        }
        let mut to_kill: Vec<ActionId> = self.children.get(&id).cloned().unwrap_or_default().into_iter().collect();
        let mut seen: HashSet<ActionId> = HashSet::new();
        while let Some(descendant) = to_kill.pop() {
            if !seen.insert(descendant) {
                continue;
            }
            if let Some(a) = self.actions.get(&descendant) {
                if !matches!(a.state(), ActionState::Completed | ActionState::Failed) {
                    self.set_action_state(descendant, ActionState::Killed);
                    self.actions.get_mut(&descendant).unwrap().set_failure_cause(crate::failure::FailureCause::ParentActionFailed { parent: id });
                }
            }
            to_kill.extend(self.children.get(&descendant).cloned().unwrap_or_default());
        }
        self.recompute_job_state();
    }

    /// Complete `id` and promote any children whose other parents are all
    /// done. If every action is now terminal, the job itself transitions to
    /// `Completed` or `Failed` (spec §4: a job fails if any of its actions
    /// fails, per `ParentActionFailed` propagation).
    pub fn mark_action_completed(&mut self, id: ActionId) {
        self.set_action_state(id, ActionState::Completed);
        let children: Vec<ActionId> = self.children.get(&id).cloned().unwrap_or_default().into_iter().collect();
        for child in children {
            self.recompute_readiness(child);
        }
        self.recompute_job_state();
    }

    /// Fail `id` with `cause`, then kill every downstream descendant with
    /// `ParentActionFailed` (spec §7).
    pub fn mark_action_failed(&mut self, id: ActionId, cause: crate::failure::FailureCause) {
        self.set_action_state(id, ActionState::Failed);
        self.actions.get_mut(&id).unwrap().set_failure_cause(cause);
        let mut to_kill: Vec<ActionId> = self.children.get(&id).cloned().unwrap_or_default().into_iter().collect();
        let mut seen: HashSet<ActionId> = HashSet::new();
        while let Some(descendant) = to_kill.pop() {
            if !seen.insert(descendant) {
                continue;
            }
            if let Some(a) = self.actions.get(&descendant) {
                if !matches!(a.state(), ActionState::Completed | ActionState::Failed) {
                    self.set_action_state(descendant, ActionState::Killed);
                    self.actions.get_mut(&descendant).unwrap().set_failure_cause(crate::failure::FailureCause::ParentActionFailed { parent: id });
                }
            }
            to_kill.extend(self.children.get(&descendant).cloned().unwrap_or_default());
        }
        self.recompute_job_state();
    }

    /// O(1) rollup over the `state_index` rather than a scan over every
    /// action (spec §3's "state -> set<Action>" index requirement).
    fn recompute_job_state(&mut self) {
        let completed = self.state_index.get(&ActionState::Completed).map_or(0, HashSet::len);
        let failed = self.state_index.get(&ActionState::Failed).map_or(0, HashSet::len);
        let killed = self.state_index.get(&ActionState::Killed).map_or(0, HashSet::len);
        if completed + failed + killed != self.actions.len() {
            return;
        }
        self.state = if failed + killed > 0 { JobState::Failed } else { JobState::Completed };
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state, JobState::Completed | JobState::Failed)
    }
}

/// The legacy "standard job" façade, lowered on submission into an
/// equivalent [`CompoundJob`] (spec §3 "Lifecycles": "a pre-overhead action,
/// file-copy actions, per-task read actions, a compute action, per-task
/// write actions, post-copy actions, cleanup actions, and a scratch-cleanup
/// action, connected by the obvious order").
#[derive(Debug, Clone)]
pub struct StandardJob {
    flops: f64,
    min_cores: u32,
    max_cores: u32,
    ram: f64,
    input_files: Vec<(FileId, FileLocationSpec)>,
    output_files: Vec<(FileId, FileLocationSpec)>,
    pre_file_copies: Vec<(FileId, FileLocationSpec, FileLocationSpec)>,
    post_file_copies: Vec<(FileId, FileLocationSpec, FileLocationSpec)>,
    cleanup_deletions: Vec<(FileId, FileLocationSpec)>,
    pre_overhead_secs: f64,
    post_overhead_secs: f64,
}

impl StandardJob {
    pub fn new(flops: f64, min_cores: u32, max_cores: u32, ram: f64) -> Self {
        Self {
            flops,
            min_cores,
            max_cores,
            ram,
            input_files: Vec::new(),
            output_files: Vec::new(),
            pre_file_copies: Vec::new(),
            post_file_copies: Vec::new(),
            cleanup_deletions: Vec::new(),
            pre_overhead_secs: 0.0,
            post_overhead_secs: 0.0,
        }
    }

    pub fn add_input_file(&mut self, file: FileId, location: FileLocationSpec) {
        self.input_files.push((file, location));
    }

    pub fn add_output_file(&mut self, file: FileId, location: FileLocationSpec) {
        self.output_files.push((file, location));
    }

    /// Queue a file copy to run before any read action (spec §3
    /// `pre_file_copies`).
    pub fn add_pre_file_copy(&mut self, file: FileId, src: FileLocationSpec, dst: FileLocationSpec) {
        self.pre_file_copies.push((file, src, dst));
    }

    /// Queue a file copy to run after every write action (spec §3
    /// `post_file_copies`).
    pub fn add_post_file_copy(&mut self, file: FileId, src: FileLocationSpec, dst: FileLocationSpec) {
        self.post_file_copies.push((file, src, dst));
    }

    /// Queue a deletion to run once every copy/write action has finished
    /// (spec §3 `cleanup_file_deletions`).
    pub fn add_cleanup_deletion(&mut self, file: FileId, location: FileLocationSpec) {
        self.cleanup_deletions.push((file, location));
    }

    pub fn set_pre_overhead_secs(&mut self, secs: f64) {
        self.pre_overhead_secs = secs.max(0.0);
    }

    pub fn set_post_overhead_secs(&mut self, secs: f64) {
        self.post_overhead_secs = secs.max(0.0);
    }

    /// Lower this façade into an equivalent [`CompoundJob`], wiring each
    /// stage as a dependency of the next: pre-overhead, pre-copies, reads,
    /// compute, writes, post-copies, cleanup deletions, post-overhead, and
    /// finally a deletion for every input/output file that resolved to
    /// scratch space. A stage with no actions is skipped and the next
    /// non-empty stage depends on whatever came before it.
    pub fn lower(&self, originator: impl Into<OriginatorMailbox>) -> CompoundJob {
        let mut job = CompoundJob::new(originator);
        let mut frontier: Vec<ActionId> = Vec::new();

        if self.pre_overhead_secs > 0.0 {
            let pre = job.add_action(Action::Sleep { duration_secs: self.pre_overhead_secs });
            frontier = vec![pre];
        }

        let pre_copies: Vec<ActionId> = self
            .pre_file_copies
            .iter()
            .map(|(file, src, dst)| {
                let copy = job.add_action(Action::FileCopy { file: *file, src: src.clone(), dst: dst.clone() });
                connect(&mut job, &frontier, copy);
                copy
            })
            .collect();
        if !pre_copies.is_empty() {
            frontier = pre_copies;
        }

        let reads: Vec<ActionId> = self
            .input_files
            .iter()
            .map(|(file, loc)| {
                let read = job.add_action(Action::FileRead { file: *file, location: loc.clone(), num_bytes_to_read: None });
                connect(&mut job, &frontier, read);
                read
            })
            .collect();
        if !reads.is_empty() {
            frontier = reads;
        }

        let compute = job.add_action(Action::Compute { flops: self.flops, min_cores: self.min_cores, max_cores: self.max_cores, ram: self.ram });
        connect(&mut job, &frontier, compute);
        frontier = vec![compute];

        let writes: Vec<ActionId> = self
            .output_files
            .iter()
            .map(|(file, loc)| {
                let write = job.add_action(Action::FileWrite { file: *file, location: loc.clone() });
                connect(&mut job, &frontier, write);
                write
            })
            .collect();
        if !writes.is_empty() {
            frontier = writes;
        }

        let post_copies: Vec<ActionId> = self
            .post_file_copies
            .iter()
            .map(|(file, src, dst)| {
                let copy = job.add_action(Action::FileCopy { file: *file, src: src.clone(), dst: dst.clone() });
                connect(&mut job, &frontier, copy);
                copy
            })
            .collect();
        if !post_copies.is_empty() {
            frontier = post_copies;
        }

        let cleanups: Vec<ActionId> = self
            .cleanup_deletions
            .iter()
            .map(|(file, loc)| {
                let delete = job.add_action(Action::FileDelete { file: *file, location: loc.clone() });
                connect(&mut job, &frontier, delete);
                delete
            })
            .collect();
        if !cleanups.is_empty() {
            frontier = cleanups;
        }

        if self.post_overhead_secs > 0.0 {
            let post = job.add_action(Action::Sleep { duration_secs: self.post_overhead_secs });
            connect(&mut job, &frontier, post);
            frontier = vec![post];
        }

        let scratch_files: Vec<(FileId, FileLocationSpec)> =
            self.input_files.iter().chain(self.output_files.iter()).filter(|(_, loc)| matches!(loc, FileLocationSpec::Scratch { .. })).cloned().collect();
        for (file, loc) in scratch_files {
            let delete = job.add_action(Action::FileDelete { file, location: loc });
            connect(&mut job, &frontier, delete);
        }

        job
    }
}

/// Make `downstream` depend on every action in `frontier`, the last
/// non-empty stage of [`StandardJob::lower`]'s pipeline.
fn connect(job: &mut CompoundJob, frontier: &[ActionId], downstream: ActionId) {
    for upstream in frontier {
        job.add_action_dependency(*upstream, downstream).expect("fresh job graph is acyclic");
    }
}

/// A lease on a set of compute resources, usable to run standard/compound
/// jobs within its lifetime (supplemented from `wrench/job/PilotJob.h`; not
/// named in the distilled spec but not excluded by its Non-goals either).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PilotJobState {
    Pending,
    Running,
    Expired,
    Terminated,
}

crate::simple_display! {
    PilotJobState {
        Pending => "pending",
        Running => "running",
        Expired => "expired",
        Terminated => "terminated",
    }
}

#[derive(Debug)]
pub struct PilotJob {
    id: JobId,
    originator: OriginatorMailbox,
    num_hosts: u32,
    cores_per_host: u32,
    ram_per_host: f64,
    duration_secs: f64,
    state: PilotJobState,
    assigned_hosts: Vec<HostId>,
}

impl PilotJob {
    pub fn new(originator: impl Into<OriginatorMailbox>, num_hosts: u32, cores_per_host: u32, ram_per_host: f64, duration_secs: f64) -> Self {
        Self {
            id: JobId::new(),
            originator: originator.into(),
            num_hosts,
            cores_per_host,
            ram_per_host,
            duration_secs,
            state: PilotJobState::Pending,
            assigned_hosts: Vec::new(),
        }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn originator(&self) -> &OriginatorMailbox {
        &self.originator
    }

    pub fn state(&self) -> PilotJobState {
        self.state
    }

    pub fn num_hosts(&self) -> u32 {
        self.num_hosts
    }

    pub fn cores_per_host(&self) -> u32 {
        self.cores_per_host
    }

    pub fn ram_per_host(&self) -> f64 {
        self.ram_per_host
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    pub fn assigned_hosts(&self) -> &[HostId] {
        &self.assigned_hosts
    }

    pub fn start(&mut self, hosts: Vec<HostId>) {
        self.assigned_hosts = hosts;
        self.state = PilotJobState::Running;
    }

    pub fn expire(&mut self) {
        if self.state == PilotJobState::Running {
            self.state = PilotJobState::Expired;
        }
    }

    pub fn terminate(&mut self) {
        self.state = PilotJobState::Terminated;
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
