// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`WorkflowTask`] and the [`Workflow`] DAG (spec §3, §6 controller-facing API).

use crate::data_file::DataFile;
use crate::ids::{FileId, TaskId, WorkflowId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;

/// How a task's flops are split between a sequential prelude and a
/// per-thread parallel share.
#[derive(Clone)]
pub enum ParallelModel {
    /// Amdahl's law: a fraction `alpha` of the work is perfectly
    /// parallelizable; `1 - alpha` is strictly sequential.
    Amdahl(f64),
    /// A fixed per-thread efficiency `e` in `(0, 1]`: adding a thread adds
    /// `e` "effective cores" of throughput.
    ConstantEfficiency(f64),
    /// Custom split: `seq_fraction(total_flops) -> sequential flops`,
    /// `per_thread(total_flops, num_threads) -> flops run per thread`.
    ///
    /// Wrapped in `Arc` (rather than a bare `Fn`) so `ParallelModel` stays
    /// `Clone` — the same trick an `Effect` enum uses to carry
    /// heterogeneous closures-as-data through a `Clone`-able message type.
    Custom { seq_fn: Arc<dyn Fn(f64) -> f64 + Send + Sync>, per_thread_fn: Arc<dyn Fn(f64, u32) -> f64 + Send + Sync> },
}

impl ParallelModel {
    /// Split `total_flops` across `num_threads` into `(sequential_flops,
    /// flops_per_thread)`.
    pub fn split(&self, total_flops: f64, num_threads: u32) -> (f64, f64) {
        let num_threads = num_threads.max(1);
        match self {
            ParallelModel::Amdahl(alpha) => {
                let alpha = alpha.clamp(0.0, 1.0);
                let seq = total_flops * (1.0 - alpha);
                let par = total_flops * alpha / num_threads as f64;
                (seq, par)
            }
            ParallelModel::ConstantEfficiency(e) => {
                let e = e.max(f64::EPSILON);
                let effective_cores = (num_threads as f64) * e;
                (0.0, total_flops / effective_cores)
            }
            ParallelModel::Custom { seq_fn, per_thread_fn } => {
                let seq = seq_fn(total_flops);
                let per_thread = per_thread_fn(total_flops - seq, num_threads);
                (seq, per_thread)
            }
        }
    }
}

impl std::fmt::Debug for ParallelModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParallelModel::Amdahl(alpha) => f.debug_tuple("Amdahl").field(alpha).finish(),
            ParallelModel::ConstantEfficiency(e) => f.debug_tuple("ConstantEfficiency").field(e).finish(),
            ParallelModel::Custom { .. } => f.write_str("Custom(..)"),
        }
    }
}

/// State of a [`WorkflowTask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    NotReady,
    Ready,
    Pending,
    Running,
    Completed,
    Failed,
}

crate::simple_display! {
    TaskState {
        NotReady => "not_ready",
        Ready => "ready",
        Pending => "pending",
        Running => "running",
        Completed => "completed",
        Failed => "failed",
    }
}

/// A single computational task: `(id, flops, min_cores, max_cores, ram,
/// parallel_model)` plus input/output file sets and a lifecycle state.
#[derive(Debug, Clone)]
pub struct WorkflowTask {
    id: TaskId,
    name: String,
    flops: f64,
    min_cores: u32,
    max_cores: u32,
    ram: f64,
    parallel_model: ParallelModel,
    input_files: HashSet<FileId>,
    output_files: HashSet<FileId>,
    state: TaskState,
}

/// `min_cores > max_cores` at task construction (spec §3 invariant
/// `min_cores ≤ max_cores`).
#[derive(Debug, Error, PartialEq, Eq)]
#[error("min_cores ({min_cores}) must be <= max_cores ({max_cores})")]
pub struct InvalidCoreRange {
    pub min_cores: u32,
    pub max_cores: u32,
}

impl WorkflowTask {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        flops: f64,
        min_cores: u32,
        max_cores: u32,
        ram: f64,
        parallel_model: ParallelModel,
    ) -> Result<Self, InvalidCoreRange> {
        if min_cores > max_cores {
            return Err(InvalidCoreRange { min_cores, max_cores });
        }
        Ok(Self {
            id: TaskId::new(),
            name: name.into(),
            flops,
            min_cores,
            max_cores,
            ram,
            parallel_model,
            input_files: HashSet::new(),
            output_files: HashSet::new(),
            state: TaskState::NotReady,
        })
    }

    pub fn id(&self) -> TaskId {
        self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn flops(&self) -> f64 {
        self.flops
    }
    pub fn min_cores(&self) -> u32 {
        self.min_cores
    }
    pub fn max_cores(&self) -> u32 {
        self.max_cores
    }
    pub fn ram(&self) -> f64 {
        self.ram
    }
    pub fn parallel_model(&self) -> &ParallelModel {
        &self.parallel_model
    }
    pub fn state(&self) -> TaskState {
        self.state
    }
    pub fn input_files(&self) -> &HashSet<FileId> {
        &self.input_files
    }
    pub fn output_files(&self) -> &HashSet<FileId> {
        &self.output_files
    }

    pub fn add_input_file(&mut self, file: &Arc<DataFile>) {
        self.input_files.insert(file.id());
    }

    pub fn add_output_file(&mut self, file: &Arc<DataFile>) {
        self.output_files.insert(file.id());
    }

    pub(crate) fn set_state(&mut self, state: TaskState) {
        self.state = state;
    }
}

/// Errors raised by [`Workflow`] mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("task {0:?} not found in workflow")]
    TaskNotFound(TaskId),
    #[error("adding an edge {parent:?} -> {child:?} would close a cycle")]
    WouldCreateCycle { parent: TaskId, child: TaskId },
}

/// A DAG over tasks (control dependencies) plus maps `file -> producer task`
/// and `file -> consumer tasks`.
#[derive(Debug, Default)]
pub struct Workflow {
    id_opt: Option<WorkflowId>,
    tasks: HashMap<TaskId, WorkflowTask>,
    parents: HashMap<TaskId, HashSet<TaskId>>,
    children: HashMap<TaskId, HashSet<TaskId>>,
    producer: HashMap<FileId, TaskId>,
    consumers: HashMap<FileId, HashSet<TaskId>>,
}

impl Workflow {
    pub fn new() -> Self {
        Self { id_opt: Some(WorkflowId::new()), ..Default::default() }
    }

    pub fn id(&self) -> WorkflowId {
        self.id_opt.expect("Workflow::new always sets id_opt")
    }

    pub fn add_task(&mut self, task: WorkflowTask) -> TaskId {
        let id = task.id();
        self.tasks.insert(id, task);
        self.parents.entry(id).or_default();
        self.children.entry(id).or_default();
        self.recompute_readiness(id);
        id
    }

    pub fn get_task(&self, id: TaskId) -> Option<&WorkflowTask> {
        self.tasks.get(&id)
    }

    pub fn tasks(&self) -> impl Iterator<Item = &WorkflowTask> {
        self.tasks.values()
    }

    /// Register that `producer` writes `file`, and `consumers` read it.
    pub fn register_file_usage(&mut self, file: FileId, producer: Option<TaskId>, consumers: impl IntoIterator<Item = TaskId>) {
        if let Some(p) = producer {
            self.producer.insert(file, p);
        }
        self.consumers.entry(file).or_default().extend(consumers);
    }

    pub fn producer_of(&self, file: FileId) -> Option<TaskId> {
        self.producer.get(&file).copied()
    }

    pub fn consumers_of(&self, file: FileId) -> impl Iterator<Item = TaskId> + '_ {
        self.consumers.get(&file).into_iter().flatten().copied()
    }

    /// Add a control dependency `parent -> child`. Rejected if it would
    /// close a cycle (spec §3 invariant: "adding an edge that would close a
    /// cycle is rejected").
    pub fn add_control_dependency(&mut self, parent: TaskId, child: TaskId) -> Result<(), WorkflowError> {
        if !self.tasks.contains_key(&parent) {
            return Err(WorkflowError::TaskNotFound(parent));
        }
        if !self.tasks.contains_key(&child) {
            return Err(WorkflowError::TaskNotFound(child));
        }
        if parent == child || self.reaches(child, parent) {
            return Err(WorkflowError::WouldCreateCycle { parent, child });
        }
        self.children.entry(parent).or_default().insert(child);
        self.parents.entry(child).or_default().insert(parent);
        self.recompute_readiness(child);
        Ok(())
    }

    /// True if a path `from -> ... -> to` exists.
    fn reaches(&self, from: TaskId, to: TaskId) -> bool {
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

    /// `NOT_READY ⇔ ∃ parent ∉ COMPLETED` (spec §3). Does not downgrade a
    /// task that has already progressed past `Ready`.
    fn recompute_readiness(&mut self, id: TaskId) {
        let all_parents_completed = self
            .parents
            .get(&id)
            .map(|ps| ps.iter().all(|p| self.tasks.get(p).map(|t| t.state() == TaskState::Completed).unwrap_or(false)))
            .unwrap_or(true);
        if let Some(task) = self.tasks.get_mut(&id) {
            if task.state() == TaskState::NotReady || task.state() == TaskState::Ready {
                task.set_state(if all_parents_completed { TaskState::Ready } else { TaskState::NotReady });
            }
        }
    }

    /// Mark `id` as `Completed` and promote any children whose other
    /// parents are all already completed.
    pub fn mark_task_completed(&mut self, id: TaskId) {
        if let Some(task) = self.tasks.get_mut(&id) {
            task.set_state(TaskState::Completed);
        }
        let children: Vec<TaskId> = self.children.get(&id).cloned().unwrap_or_default().into_iter().collect();
        for child in children {
            self.recompute_readiness(child);
        }
    }

    pub fn mark_task_failed(&mut self, id: TaskId) {
        if let Some(task) = self.tasks.get_mut(&id) {
            task.set_state(TaskState::Failed);
        }
    }

    pub fn mark_task_running(&mut self, id: TaskId) {
        if let Some(task) = self.tasks.get_mut(&id) {
            task.set_state(TaskState::Running);
        }
    }

    pub fn get_ready_tasks(&self) -> Vec<TaskId> {
        self.tasks.values().filter(|t| t.state() == TaskState::Ready).map(|t| t.id()).collect()
    }

    pub fn is_done(&self) -> bool {
        self.tasks.values().all(|t| matches!(t.state(), TaskState::Completed | TaskState::Failed))
    }

    /// Remove `id`, dropping incident edges; may promote children to READY.
    pub fn remove_task(&mut self, id: TaskId) -> Result<(), WorkflowError> {
        if self.tasks.remove(&id).is_none() {
            return Err(WorkflowError::TaskNotFound(id));
        }
        let parents = self.parents.remove(&id).unwrap_or_default();
        let children = self.children.remove(&id).unwrap_or_default();
        for p in &parents {
            if let Some(c) = self.children.get_mut(p) {
                c.remove(&id);
            }
        }
        for c in &children {
            if let Some(p) = self.parents.get_mut(c) {
                p.remove(&id);
            }
        }
        for c in children {
            self.recompute_readiness(c);
        }
        Ok(())
    }

    pub fn parents_of(&self, id: TaskId) -> impl Iterator<Item = TaskId> + '_ {
        self.parents.get(&id).into_iter().flatten().copied()
    }

    pub fn children_of(&self, id: TaskId) -> impl Iterator<Item = TaskId> + '_ {
        self.children.get(&id).into_iter().flatten().copied()
    }
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
